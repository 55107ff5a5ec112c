use thiserror::Error;

#[derive(Error, Debug)]
pub enum BallotError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to persist {store}: {message}")]
    PersistenceError { store: String, message: String },

    #[error("Vote store state is unavailable after a previous panic")]
    StatePoisoned,
}

/// 投票被拒絕的原因，Display 即為顯示給使用者的訊息
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteRejection {
    #[error("Invalid candidate.")]
    InvalidCandidate,

    #[error("UNO ID must be an 8-digit number.")]
    MalformedVoterId,

    #[error("Already Voted")]
    DuplicateVote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Storage,
    Data,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BallotError {
    pub fn persistence(store: impl Into<String>, source: &BallotError) -> Self {
        BallotError::PersistenceError {
            store: store.into(),
            message: source.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            BallotError::ConfigError { .. } | BallotError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            BallotError::IoError(_) | BallotError::PersistenceError { .. } => {
                ErrorCategory::Storage
            }
            BallotError::CsvError(_) | BallotError::SerializationError(_) => ErrorCategory::Data,
            BallotError::StatePoisoned => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BallotError::ConfigError { .. } | BallotError::InvalidConfigValueError { .. } => {
                ErrorSeverity::High
            }
            // 寫入失敗可重試，但這一票沒有被記錄
            BallotError::PersistenceError { .. } | BallotError::IoError(_) => {
                ErrorSeverity::Medium
            }
            BallotError::CsvError(_) | BallotError::SerializationError(_) => ErrorSeverity::High,
            BallotError::StatePoisoned => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BallotError::ConfigError { message } => format!("Configuration problem: {}", message),
            BallotError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            BallotError::PersistenceError { .. } | BallotError::IoError(_) => {
                "Your vote could not be saved. Please try again.".to_string()
            }
            BallotError::CsvError(_) | BallotError::SerializationError(_) => {
                "Stored voting data could not be processed.".to_string()
            }
            BallotError::StatePoisoned => {
                "The ballot is unavailable. Please restart the application.".to_string()
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the TOML configuration file and command line flags"
            }
            ErrorCategory::Storage => {
                "Make sure the data directory exists, is writable and has free space"
            }
            ErrorCategory::Data => "Inspect the tally and voter files for manual edits",
            ErrorCategory::Internal => "Restart the application",
        }
    }
}

pub type Result<T> = std::result::Result<T, BallotError>;
