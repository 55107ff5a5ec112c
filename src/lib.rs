pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{LocalStorage, MemoryStorage};
pub use app::{submit_ballot, BallotSession, FormResponse};
pub use config::BallotConfig;
pub use core::{Candidate, Tally, VoteOutcome, VoteStore};
pub use utils::error::{BallotError, Result, VoteRejection};
