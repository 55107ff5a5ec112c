use crate::utils::error::Result;

/// 扁平檔案的讀寫介面，路徑皆相對於儲存根目錄
pub trait Storage: Send + Sync {
    /// `Ok(None)` when the file has not been created yet.
    fn read_file(&self, path: &str) -> Result<Option<Vec<u8>>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
    fn append_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn data_dir(&self) -> &str;
    fn tally_file(&self) -> &str;
    fn voters_file(&self) -> &str;
}
