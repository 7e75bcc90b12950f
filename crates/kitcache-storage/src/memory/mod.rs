//! In-memory cache backend

mod backend;
mod sweeper;
mod table;

pub use backend::{MemoryBackend, MemoryBuilder, MemoryConfig};
