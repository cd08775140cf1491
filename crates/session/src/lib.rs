//! Wires the core game to a result sink and the ambient runtime pieces
//! (configuration, tracing).

mod config;
mod dispatch;
mod error;
mod jsonl;
mod logging;
mod record;
mod recorder;
mod session;

pub use config::*;
pub use dispatch::*;
pub use error::*;
pub use jsonl::*;
pub use logging::*;
pub use record::*;
pub use recorder::*;
pub use session::*;
