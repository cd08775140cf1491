use crate::app::App;
use crate::input::InputAction;

pub fn dispatch(app: &mut App, action: InputAction) {
    match action {
        InputAction::None => {}
        InputAction::Quit => app.should_quit = true,
        InputAction::ToggleHelp => app.show_help = !app.show_help,
        InputAction::Dismiss => {
            if app.show_help {
                app.show_help = false;
            } else {
                app.should_quit = true;
            }
        }
        InputAction::MoveLeft => app.move_cursor(-1),
        InputAction::MoveRight => app.move_cursor(1),
        InputAction::MoveUp => app.move_row(false),
        InputAction::MoveDown => app.move_row(true),
        InputAction::HoldCursor => app.hold_cursor(),
        InputAction::HoldIndex(index) => app.hold_index(index),
        InputAction::Roll => app.roll(),
    }
}
