use crate::app::{App, DICE_PER_ROW};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Alignment, Color, Line, Modifier, Style, Stylize};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;
use tenzies_core::Die;

const DIE_WIDTH: u16 = 9;
const DIE_HEIGHT: u16 = 5;

pub fn draw(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(DIE_HEIGHT * 2 + 2),
            Constraint::Length(3),
            Constraint::Min(4),
        ])
        .split(frame.area());

    draw_header(frame, root[0], app);
    draw_dice(frame, root[1], app);
    draw_button(frame, root[2], app);
    draw_events(frame, root[3], app);

    if app.is_won() {
        draw_celebration(frame, app);
    }
    if app.show_help {
        draw_help_popup(frame);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let state = app.session.state();
    let lines = vec![
        Line::from("Tenzies".bold()),
        Line::from(
            "Roll until all dice are the same. Click a die to freeze its value between rolls.",
        ),
        Line::from(format!(
            "Game {}  Rolls {}  Held {}/{}  Status: {}",
            state.game,
            state.roll_count,
            state.held_count(),
            state.dice.len(),
            app.status_line
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(paragraph, area);
}

fn draw_dice(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(DIE_HEIGHT), Constraint::Length(DIE_HEIGHT)])
        .split(area);
    for (row_idx, chunk) in app.dice().chunks(DICE_PER_ROW).enumerate() {
        let Some(row_area) = rows.get(row_idx) else {
            break;
        };
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Length(DIE_WIDTH + 1); DICE_PER_ROW])
            .split(*row_area);
        for (col_idx, die) in chunk.iter().enumerate() {
            let index = row_idx * DICE_PER_ROW + col_idx;
            let cell = Rect {
                width: cells[col_idx].width.min(DIE_WIDTH),
                ..cells[col_idx]
            };
            draw_die(frame, cell, die, index, index == app.cursor);
        }
    }
}

fn draw_die(frame: &mut Frame, area: Rect, die: &Die, index: usize, focused: bool) {
    let face_style = if die.held {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let key = (index + 1) % 10;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!("{key}"));
    let body = Paragraph::new(vec![Line::from(""), Line::from(die.value.to_string())])
        .alignment(Alignment::Center)
        .style(face_style)
        .block(block);
    frame.render_widget(body, area);
}

fn draw_button(frame: &mut Frame, area: Rect, app: &App) {
    let label = format!("[ {} ]", app.primary_label());
    let button = Paragraph::new(Line::from(label.bold()))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Enter"));
    frame.render_widget(button, area);
}

fn draw_events(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .event_log
        .iter()
        .map(|line| ListItem::new(line.clone()))
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Events"));
    frame.render_widget(list, area);
}

fn draw_celebration(frame: &mut Frame, app: &App) {
    let state = app.session.state();
    let value = state
        .winning_value()
        .map(|value| value.to_string())
        .unwrap_or_else(|| "-".to_string());
    let area = centered_rect(50, 30, frame.area());
    let lines = vec![
        Line::from("* * * * * * * * *".fg(Color::Yellow)),
        Line::from("You won!".bold()),
        Line::from(format!("All dice show {value} after {} rolls", state.roll_count)),
        Line::from("Press Enter for a new game"),
        Line::from("* * * * * * * * *".fg(Color::Magenta)),
    ];
    let popup = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Tenzies"));
    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

fn draw_help_popup(frame: &mut Frame) {
    let area = centered_rect(60, 50, frame.area());
    let lines = vec![
        Line::from("Keys".bold()),
        Line::from("←/→ h/l   move between dice"),
        Line::from("↑/↓ k/j   move between rows"),
        Line::from("Space     hold or release the focused die"),
        Line::from("1-9, 0    hold or release die 1-10"),
        Line::from("Enter, r  roll (new game once won)"),
        Line::from("?         toggle this help"),
        Line::from("q, Esc    quit"),
    ];
    let popup = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Help"));
    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
