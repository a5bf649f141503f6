use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::storage::Storage;

/// Save files in a directory on disk, created on demand.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let storage = Self { root: root.into() };
        storage.ensure_root()?;
        Ok(storage)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_root(&self) -> io::Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
            info!("created save directory {}", self.root.display());
        }
        Ok(())
    }
}

impl Storage for FsStorage {
    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.locate(name))
    }

    fn write(&mut self, name: &str, bytes: &[u8]) -> io::Result<()> {
        self.ensure_root()?;
        let target = self.locate(name);
        let staging = self.root.join(format!("{}.tmp", name));
        let result = (|| {
            let mut file = File::create(&staging)?;
            file.write_all(bytes)?;
            file.sync_all()?;
            fs::rename(&staging, &target)
        })();
        if result.is_err() {
            let _ = fs::remove_file(&staging);
        }
        result
    }

    fn remove(&mut self, name: &str) -> io::Result<()> {
        match fs::remove_file(self.locate(name)) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    fn exists(&self, name: &str) -> bool {
        self.locate(name).is_file()
    }

    fn locate(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}
