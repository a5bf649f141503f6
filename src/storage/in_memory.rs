use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::storage::Storage;

#[derive(Debug, Default)]
struct Inner {
    files: HashMap<String, Vec<u8>>,
    fail_writes: Option<io::ErrorKind>,
}

/// Storage kept in memory. Clones share the same files, so a test can keep
/// a handle to inspect or tamper with what a `SaveManager` wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock leaves the map intact.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Raw content of `name`, if present.
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.lock().files.get(name).cloned()
    }

    /// Overwrite `name` directly, bypassing failure injection.
    pub fn insert(&self, name: &str, bytes: impl Into<Vec<u8>>) {
        self.lock().files.insert(name.to_string(), bytes.into());
    }

    /// Make every following write fail with `kind`; `None` restores writes.
    pub fn fail_writes(&self, kind: Option<io::ErrorKind>) {
        self.lock().fail_writes = kind;
    }
}

impl Storage for MemoryStorage {
    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        self.get(name)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{} not found", name)))
    }

    fn write(&mut self, name: &str, bytes: &[u8]) -> io::Result<()> {
        let mut inner = self.lock();
        if let Some(kind) = inner.fail_writes {
            return Err(io::Error::new(kind, format!("write to {} refused", name)));
        }
        inner.files.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&mut self, name: &str) -> io::Result<()> {
        self.lock().files.remove(name);
        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        self.lock().files.contains_key(name)
    }

    fn locate(&self, name: &str) -> PathBuf {
        PathBuf::from("memory").join(name)
    }
}
