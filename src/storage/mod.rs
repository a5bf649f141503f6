//! Storage backends for save files.

use std::io;
use std::path::PathBuf;

/// Named-blob storage the persistence layer writes through.
///
/// `write` must replace the previous content atomically: after a failed
/// write the old content is still readable.
pub trait Storage: Send {
    fn read(&self, name: &str) -> io::Result<Vec<u8>>;
    fn write(&mut self, name: &str, bytes: &[u8]) -> io::Result<()>;
    /// Removing a blob that does not exist is not an error.
    fn remove(&mut self, name: &str) -> io::Result<()>;
    fn exists(&self, name: &str) -> bool;
    /// Where `name` lives, for error messages and logs.
    fn locate(&self, name: &str) -> PathBuf;
}

pub mod fs;
pub mod in_memory;

pub use fs::FsStorage;
pub use in_memory::MemoryStorage;
