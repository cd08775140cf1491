use std::sync::Arc;
use std::time::Duration;
use tenzies_core::{Die, DieId, Event, GameError, GameState, Phase, RollOutcome, DICE_COUNT};
use tenzies_session::{
    load_records, GameResultRecord, JsonlRecorder, MemoryRecorder, RecordError, ResultRecorder,
    Session,
};

const WAIT: Duration = Duration::from_secs(5);

fn nearly_won(value: u8, roll_count: u32) -> GameState {
    let mut dice: Vec<Die> = (0..DICE_COUNT as u32)
        .map(|idx| Die {
            id: DieId(idx),
            value,
            held: true,
        })
        .collect();
    dice[0].held = false;
    GameState {
        game: 1,
        dice,
        roll_count,
        game_won: false,
        result_saved: false,
    }
}

fn session_with(state: GameState, recorder: Arc<dyn ResultRecorder>) -> Session {
    Session::restore(state, 0, recorder).expect("state")
}

#[test]
fn winning_hold_records_exactly_once() {
    let recorder = Arc::new(MemoryRecorder::new());
    let mut session = session_with(nearly_won(4, 6), recorder.clone());

    assert!(session.hold(DieId(0)));
    assert_eq!(session.phase(), Phase::Won);
    assert_eq!(session.primary_label(), "New Game");

    let done = session.flush(WAIT);
    assert_eq!(done.len(), 1);
    assert!(done[0].is_saved());
    assert!(session.state().result_saved);

    let records = recorder.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].dice_count, 10);
    assert_eq!(records[0].roll_count, 6);
    assert_eq!(records[0].winning_value, 4);
    assert_eq!(session.saves_attempted(), 1);
}

#[test]
fn restored_win_records_on_construction() {
    let recorder = Arc::new(MemoryRecorder::new());
    let mut state = nearly_won(2, 11);
    state.dice[0].held = true;
    let mut session = session_with(state, recorder.clone());
    assert_eq!(
        session.drain_events(),
        vec![Event::GameWon {
            game: 1,
            roll_count: 11,
            winning_value: 2
        }]
    );

    session.flush(WAIT);
    assert_eq!(recorder.records().len(), 1);
    assert_eq!(recorder.records()[0].winning_value, 2);
}

#[test]
fn restore_rejects_won_flag_over_mixed_dice() {
    let recorder = Arc::new(MemoryRecorder::new());
    let mut state = nearly_won(3, 1);
    state.dice[4].value = 5;
    state.game_won = true;
    let err = Session::restore(state, 0, recorder.clone()).err();
    assert_eq!(err, Some(GameError::WonWithoutWinningDice));
    assert!(recorder.records().is_empty());
}

#[test]
fn repeated_polls_while_won_do_not_record_again() {
    let recorder = Arc::new(MemoryRecorder::new());
    let mut session = session_with(nearly_won(5, 0), recorder.clone());
    session.hold(DieId(0));
    for _ in 0..5 {
        session.flush(WAIT);
        assert!(!session.hold(DieId(3)));
    }
    assert_eq!(recorder.records().len(), 1);
    assert_eq!(session.saves_attempted(), 1);
}

#[test]
fn failed_write_leaves_result_unsaved_and_play_continues() {
    let recorder = Arc::new(MemoryRecorder::rejecting("offline"));
    let mut session = session_with(nearly_won(3, 2), recorder);
    session.hold(DieId(0));

    let done = session.flush(WAIT);
    assert_eq!(done.len(), 1);
    assert!(!done[0].is_saved());
    assert!(session.state().game_won);
    assert!(!session.state().result_saved);

    assert_eq!(session.roll(), RollOutcome::Reset);
    assert_eq!(session.phase(), Phase::Rolling);
    assert_eq!(session.primary_label(), "Roll");
    assert_eq!(session.saves_attempted(), 1);
}

struct PanickingRecorder;

impl ResultRecorder for PanickingRecorder {
    fn record(&self, _record: &GameResultRecord) -> Result<(), RecordError> {
        panic!("sink blew up");
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

#[test]
fn panicking_sink_reports_failure_without_stalling_flush() {
    let mut session = session_with(nearly_won(2, 5), Arc::new(PanickingRecorder));
    session.hold(DieId(0));
    assert_eq!(session.pending_saves(), 1);

    let done = session.flush(WAIT);
    assert_eq!(done.len(), 1);
    assert!(!done[0].is_saved());
    assert_eq!(done[0].game, 1);
    assert_eq!(session.pending_saves(), 0);
    assert!(!session.state().result_saved);

    let started = std::time::Instant::now();
    assert!(session.flush(WAIT).is_empty());
    assert!(started.elapsed() < WAIT);
}

#[test]
fn save_completing_after_reset_does_not_mark_new_game() {
    let recorder = Arc::new(MemoryRecorder::new());
    let mut session = session_with(nearly_won(1, 4), recorder.clone());
    session.hold(DieId(0));
    session.roll();

    session.flush(WAIT);
    assert_eq!(recorder.records().len(), 1);
    assert!(!session.state().game_won);
    assert!(!session.state().result_saved);
}

#[test]
fn events_report_win_and_save() {
    let recorder = Arc::new(MemoryRecorder::new());
    let mut session = session_with(nearly_won(6, 9), recorder);
    session.hold(DieId(0));
    session.flush(WAIT);
    let events = session.drain_events();
    assert!(events.contains(&Event::GameWon {
        game: 1,
        roll_count: 9,
        winning_value: 6
    }));
    assert!(events.contains(&Event::ResultSaved { game: 1 }));
}

#[test]
fn fresh_session_announces_first_game() {
    let recorder = Arc::new(MemoryRecorder::new());
    let mut session = Session::with_seed(17, recorder);
    assert_eq!(session.seed(), 17);
    assert_eq!(session.drain_events(), vec![Event::GameStarted { game: 1 }]);
    assert_eq!(session.pending_saves(), 0);
}

#[test]
fn jsonl_sink_receives_winning_document() {
    let path = std::env::temp_dir().join(format!(
        "tenzies_session_jsonl_{}_{}.jsonl",
        std::process::id(),
        line!()
    ));
    let _ = std::fs::remove_file(&path);
    let recorder = Arc::new(JsonlRecorder::new(&path));
    let mut session = session_with(nearly_won(4, 13), recorder);
    assert_eq!(session.recorder_name(), "jsonl");
    session.hold(DieId(0));
    session.flush(WAIT);

    let records = load_records(&path).expect("load");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].roll_count, 13);
    let body = std::fs::read_to_string(&path).expect("read");
    assert!(body.contains("\"winningValue\":4"));
    assert!(body.contains("\"diceCount\":10"));
    let _ = std::fs::remove_file(path);
}
