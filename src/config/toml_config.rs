use crate::domain::ports::ConfigProvider;
use crate::utils::error::{BallotError, Result};
use crate::utils::validation::{
    validate_distinct_files, validate_file_name, validate_log_level, validate_path, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallotConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    pub tally_file: String,
    pub voters_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: ".".to_string(),
            tally_file: "votes.csv".to_string(),
            voters_file: "voters.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: bool,
}

impl BallotConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BallotError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BallotError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BALLOT_DATA_DIR})，找不到的保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BallotError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 命令列參數覆蓋檔案設定
    pub fn with_overrides(
        mut self,
        data_dir: Option<String>,
        tally_file: Option<String>,
        voters_file: Option<String>,
    ) -> Self {
        if let Some(data_dir) = data_dir {
            self.storage.data_dir = data_dir;
        }
        if let Some(tally_file) = tally_file {
            self.storage.tally_file = tally_file;
        }
        if let Some(voters_file) = voters_file {
            self.storage.voters_file = voters_file;
        }
        self
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.level.as_deref()
    }
}

impl ConfigProvider for BallotConfig {
    fn data_dir(&self) -> &str {
        &self.storage.data_dir
    }

    fn tally_file(&self) -> &str {
        &self.storage.tally_file
    }

    fn voters_file(&self) -> &str {
        &self.storage.voters_file
    }
}

impl Validate for BallotConfig {
    fn validate(&self) -> Result<()> {
        validate_path("storage.data_dir", &self.storage.data_dir)?;
        validate_file_name("storage.tally_file", &self.storage.tally_file)?;
        validate_file_name("storage.voters_file", &self.storage.voters_file)?;
        validate_distinct_files(
            "storage.voters_file",
            &self.storage.tally_file,
            &self.storage.voters_file,
        )?;

        if let Some(level) = &self.logging.level {
            validate_log_level("logging.level", level)?;
        }

        Ok(())
    }
}
