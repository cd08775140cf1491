use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tenzies_core::{DieId, Event, Phase};
use tenzies_session::{
    init_tracing, load_records, resolve_seed, JsonlRecorder, LogTarget, Session, TenziesConfig,
};
use tiny_http::{Header, Method, Response, Server, StatusCode};

const BIND_ENV: &str = "TENZIES_BIND";
const DEFAULT_BIND: &str = "0.0.0.0:7878";

fn main() -> Result<()> {
    let config = TenziesConfig::load().context("load config")?;
    init_tracing(LogTarget::Stderr, &config.log_filter).context("init tracing")?;
    let bind = std::env::var(BIND_ENV).unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let server = Server::http(&bind)
        .map_err(|err| anyhow::anyhow!(err.to_string()))
        .with_context(|| format!("bind {bind}"))?;
    tracing::info!(%bind, records = %config.records_path.display(), "tenzies web server listening");
    let state = Arc::new(Mutex::new(AppState::new(&config)));
    for request in server.incoming_requests() {
        let state = state.clone();
        if let Err(err) = handle_request(request, state) {
            tracing::warn!(error = %err, "request error");
        }
    }
    Ok(())
}

struct AppState {
    session: Session,
    records_path: PathBuf,
}

impl AppState {
    fn new(config: &TenziesConfig) -> Self {
        let seed = resolve_seed(config.seed);
        let recorder = Arc::new(JsonlRecorder::new(config.records_path.clone()));
        Self {
            session: Session::with_seed(seed, recorder),
            records_path: config.records_path.clone(),
        }
    }
}

#[derive(Serialize)]
struct ApiResponse {
    ok: bool,
    error: Option<String>,
    state: UiState,
    events: Vec<Event>,
}

#[derive(Serialize)]
struct UiState {
    game: u64,
    phase: Phase,
    roll_count: u32,
    won: bool,
    winning_value: Option<u8>,
    button: &'static str,
    dice: Vec<UiDie>,
}

#[derive(Serialize)]
struct UiDie {
    id: DieId,
    value: u8,
    held: bool,
}

#[derive(Deserialize)]
struct ActionRequest {
    action: String,
    #[serde(default)]
    target: Option<u32>,
}

fn handle_request(
    mut request: tiny_http::Request,
    state: Arc<Mutex<AppState>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = request.url().to_string();
    match (request.method(), url.as_str()) {
        (&Method::Get, "/api/state") => {
            let mut guard = lock(&state)?;
            guard.session.poll();
            let response = build_response(&mut guard.session, None);
            respond_json(request, &response)?;
        }
        (&Method::Post, "/api/action") => {
            let mut body = String::new();
            request.as_reader().read_to_string(&mut body)?;
            let mut guard = lock(&state)?;
            guard.session.poll();
            let err = match serde_json::from_str::<ActionRequest>(&body) {
                Ok(action) => apply_action(&mut guard.session, action),
                Err(err) => Some(format!("bad request body: {err}")),
            };
            let response = build_response(&mut guard.session, err);
            respond_json(request, &response)?;
        }
        (&Method::Get, "/api/results") => {
            let path = lock(&state)?.records_path.clone();
            match load_records(&path) {
                Ok(records) => respond_json(request, &records)?,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "failed to read results");
                    let response = Response::from_string(err.to_string())
                        .with_status_code(StatusCode(500));
                    request.respond(response)?;
                }
            }
        }
        _ => {
            let response = Response::empty(StatusCode(404));
            request.respond(response)?;
        }
    }
    Ok(())
}

fn lock(
    state: &Mutex<AppState>,
) -> Result<std::sync::MutexGuard<'_, AppState>, Box<dyn std::error::Error>> {
    state
        .lock()
        .map_err(|err| format!("state lock poisoned: {err}").into())
}

fn respond_json<T: Serialize>(
    request: tiny_http::Request,
    body: &T,
) -> Result<(), Box<dyn std::error::Error>> {
    let body = serde_json::to_vec_pretty(body)?;
    let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .map_err(|_| "invalid content-type header")?;
    request.respond(Response::from_data(body).with_header(header))?;
    Ok(())
}

fn build_response(session: &mut Session, err: Option<String>) -> ApiResponse {
    let events = session.drain_events();
    ApiResponse {
        ok: err.is_none(),
        error: err,
        state: snapshot_state(session),
        events,
    }
}

fn snapshot_state(session: &Session) -> UiState {
    let state = session.state();
    UiState {
        game: state.game,
        phase: state.phase(),
        roll_count: state.roll_count,
        won: state.game_won,
        winning_value: state.winning_value(),
        button: session.primary_label(),
        dice: state
            .dice
            .iter()
            .map(|die| UiDie {
                id: die.id,
                value: die.value,
                held: die.held,
            })
            .collect(),
    }
}

fn apply_action(session: &mut Session, req: ActionRequest) -> Option<String> {
    match req.action.as_str() {
        "roll" => {
            session.roll();
            None
        }
        "hold" => {
            let Some(id) = req.target else {
                return Some("missing target die id".to_string());
            };
            // Unknown ids are ignored, matching a stale click on a replaced die.
            session.hold(DieId(id));
            None
        }
        "new_game" => {
            session.new_game();
            None
        }
        _ => Some("unknown action".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenzies_session::MemoryRecorder;

    fn session() -> Session {
        Session::with_seed(5, Arc::new(MemoryRecorder::new()))
    }

    fn request(action: &str, target: Option<u32>) -> ActionRequest {
        ActionRequest {
            action: action.to_string(),
            target,
        }
    }

    #[test]
    fn roll_action_increments_counter() {
        let mut session = session();
        assert_eq!(apply_action(&mut session, request("roll", None)), None);
        let response = build_response(&mut session, None);
        assert!(response.ok);
        assert_eq!(response.state.roll_count, 1);
        assert_eq!(response.state.button, "Roll");
        assert_eq!(response.state.dice.len(), 10);
    }

    #[test]
    fn hold_action_needs_a_target() {
        let mut session = session();
        assert!(apply_action(&mut session, request("hold", None)).is_some());
        let id = session.state().dice[3].id;
        assert_eq!(apply_action(&mut session, request("hold", Some(id.0))), None);
        assert!(session.state().dice[3].held);
    }

    #[test]
    fn unknown_action_is_reported() {
        let mut session = session();
        let err = apply_action(&mut session, request("cheat", None));
        let response = build_response(&mut session, err);
        assert!(!response.ok);
        assert_eq!(response.error.as_deref(), Some("unknown action"));
    }

    #[test]
    fn state_serializes_for_clients() {
        let mut session = session();
        let response = build_response(&mut session, None);
        let value = serde_json::to_value(&response).expect("json");
        assert_eq!(value["state"]["phase"], "Rolling");
        assert_eq!(value["state"]["dice"].as_array().map(Vec::len), Some(10));
        assert_eq!(value["events"][0]["GameStarted"]["game"], 1);
    }
}
