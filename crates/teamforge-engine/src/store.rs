//! Counter store implementations.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use teamforge_core::{CounterStore, StoreError};

/// Counter kept in memory.
///
/// Clones share the same value, so a handle kept outside the allocator sees
/// every save.
#[derive(Debug, Clone, Default)]
pub struct MemoryCounterStore {
    value: Arc<Mutex<u64>>,
}

impl MemoryCounterStore {
    pub fn new(initial: u64) -> Self {
        Self {
            value: Arc::new(Mutex::new(initial)),
        }
    }

    /// Returns the last saved value.
    pub fn value(&self) -> u64 {
        *self.value.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CounterStore for MemoryCounterStore {
    fn load(&self) -> Result<u64, StoreError> {
        Ok(self.value())
    }

    fn save(&mut self, value: u64) -> Result<(), StoreError> {
        *self.value.lock().unwrap_or_else(|e| e.into_inner()) = value;
        Ok(())
    }
}

/// Counter stored as a plain-text integer in a file.
///
/// A missing file reads as 0. Saves go through a sibling temporary file and
/// a rename, so a crash mid-write leaves the previous value readable.
#[derive(Debug, Clone)]
pub struct FileCounterStore {
    path: PathBuf,
}

impl FileCounterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CounterStore for FileCounterStore {
    fn load(&self) -> Result<u64, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let trimmed = contents.trim();
        if trimmed.is_empty() {
            return Ok(0);
        }
        trimmed
            .parse()
            .map_err(|_| StoreError::Corrupt(format!("{trimmed:?} in {}", self.path.display())))
    }

    fn save(&mut self, value: u64) -> Result<(), StoreError> {
        let temp = self.temp_path();
        fs::write(&temp, format!("{value}\n"))?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}
