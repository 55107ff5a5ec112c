use crate::core::VoteStore;
use crate::domain::model::VoterId;
use crate::domain::ports::Storage;

pub const EMPTY_ID_MESSAGE: &str = "Please enter a valid voter ID.";
pub const NO_CANDIDATE_MESSAGE: &str = "Please select a candidate.";

/// What the ballot screen shows after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormResponse {
    pub success: bool,
    pub message: String,
    pub summary: String,
}

impl FormResponse {
    /// 投票成功後清空輸入欄位
    pub fn should_clear(&self) -> bool {
        self.success
    }
}

/// Handles one ballot submission from a form.
///
/// The form-level checks run first (blank ID, malformed ID, nothing
/// selected), then the store applies its own validation. Storage failures
/// are rendered as a failed response, never as success.
pub fn submit_ballot<S: Storage>(
    store: &VoteStore<S>,
    voter_id_text: &str,
    candidate: Option<&str>,
) -> FormResponse {
    let voter_id = voter_id_text.trim();

    let (success, message) = if voter_id.is_empty() {
        (false, EMPTY_ID_MESSAGE.to_string())
    } else {
        match (voter_id.parse::<VoterId>(), candidate) {
            (Err(rejection), _) => (false, rejection.to_string()),
            (Ok(_), None) => (false, NO_CANDIDATE_MESSAGE.to_string()),
            (Ok(voter_id), Some(candidate)) => match store.cast_vote(candidate, voter_id.as_str()) {
                Ok(outcome) => (outcome.success, outcome.message),
                Err(e) => {
                    tracing::error!("Ballot submission failed: {} ({:?})", e, e.category());
                    (false, e.user_friendly_message())
                }
            },
        }
    };

    let summary = store.summary().unwrap_or_else(|e| {
        tracing::warn!("Could not build tally summary: {}", e);
        String::new()
    });

    FormResponse {
        success,
        message,
        summary,
    }
}
