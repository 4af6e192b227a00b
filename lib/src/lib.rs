#![cfg_attr(feature = "unstable", feature(test))]

//! Rules engine for a daily Wordle-style puzzle.
//!
//! [`evaluate`] computes per-letter hints for a guess. [`AttemptLifecycle`] tracks whether the
//! single attempt on each word is open, solved, or closed, and [`GameSession`] composes both into
//! the operations a request handler exposes, backed by any [`GameStore`].

mod config;
mod data;
mod engine;
mod lifecycle;
mod results;
mod session;
mod store;
mod validation;

pub use config::*;
pub use data::*;
pub use engine::*;
pub use lifecycle::*;
pub use results::*;
pub use session::*;
pub use store::*;
pub use validation::*;
