// Adapters layer: concrete storage backends for the ballot files.

pub mod local;
pub mod memory;

pub use local::LocalStorage;
pub use memory::MemoryStorage;
