pub mod records;
pub mod vote_store;

pub use crate::domain::model::{Candidate, Tally, VoteOutcome, VoterEntry, VoterId};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
pub use vote_store::VoteStore;
