use crate::utils::error::{BallotError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(BallotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(BallotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 檔名必須是單純的檔案名稱或相對路徑，不能指向目錄
pub fn validate_file_name(field_name: &str, name: &str) -> Result<()> {
    validate_path(field_name, name)?;

    if name.ends_with('/') || name.ends_with('\\') || Path::new(name).file_name().is_none() {
        return Err(BallotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "Value must name a file, not a directory".to_string(),
        });
    }

    Ok(())
}

pub fn validate_distinct_files(field_name: &str, first: &str, second: &str) -> Result<()> {
    if Path::new(first) == Path::new(second) {
        return Err(BallotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: first.to_string(),
            reason: "Tally and voter record must be stored in different files".to_string(),
        });
    }
    Ok(())
}

pub fn validate_log_level(field_name: &str, level: &str) -> Result<()> {
    const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

    if !LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        return Err(BallotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: level.to_string(),
            reason: format!("Unsupported log level. Valid levels: {}", LEVELS.join(", ")),
        });
    }
    Ok(())
}
