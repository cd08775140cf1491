//! Seeded headless play using a hold-the-majority strategy over the session API.

mod action;
mod config;
mod error;
mod simulator;
mod strategy;
mod trace;

pub use action::*;
pub use config::*;
pub use error::*;
pub use simulator::*;
pub use strategy::*;
pub use trace::*;
