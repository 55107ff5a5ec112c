use crate::domain::ports::Storage;
use crate::utils::error::{BallotError, Result};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-process storage, handy for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取得檔案內容（UTF-8），方便測試比對
    pub fn contents(&self, path: &str) -> Option<String> {
        let files = self.files.lock().ok()?;
        files
            .get(path)
            .map(|data| String::from_utf8_lossy(data).into_owned())
    }

    pub fn insert(&self, path: &str, data: impl Into<Vec<u8>>) -> Result<()> {
        let mut files = self.files.lock().map_err(|_| BallotError::StatePoisoned)?;
        files.insert(path.to_string(), data.into());
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn read_file(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let files = self.files.lock().map_err(|_| BallotError::StatePoisoned)?;
        Ok(files.get(path).cloned())
    }

    fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        self.insert(path, data)
    }

    fn append_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let mut files = self.files.lock().map_err(|_| BallotError::StatePoisoned)?;
        files
            .entry(path.to_string())
            .or_default()
            .extend_from_slice(data);
        Ok(())
    }
}
