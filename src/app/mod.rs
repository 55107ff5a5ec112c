// Presentation layer: turns raw form input into calls on the vote store.

pub mod ballot_form;
pub mod session;

pub use ballot_form::{submit_ballot, FormResponse};
pub use session::{BallotSession, SessionStats};
