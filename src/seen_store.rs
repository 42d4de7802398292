use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use log::info;
use crate::error::AlertError;

/// Identifiers already notified.
pub type SeenSet = HashSet<String>;

/// JSON file holding the seen identifiers as a plain array of strings.
///
/// Loaded fresh each cycle and overwritten in full at cycle end.
pub struct SeenStore {
    path: PathBuf,
}

impl SeenStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        SeenStore { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the set. A missing file is an empty set, not an error.
    pub fn load(&self) -> Result<SeenSet, AlertError> {
        if !self.path.exists() {
            info!("No seen file at {:?}. Starting fresh.", self.path);
            return Ok(SeenSet::new());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|source| AlertError::SeenStoreRead { path: self.path.clone(), source })?;
        let ids: Vec<String> = serde_json::from_str(&content)
            .map_err(|source| AlertError::SeenStoreCorrupt { path: self.path.clone(), source })?;
        Ok(ids.into_iter().collect())
    }

    /// Overwrites the file with the whole set, sorted so the file diffs cleanly.
    pub fn save(&self, seen: &SeenSet) -> Result<(), AlertError> {
        let mut ids: Vec<&String> = seen.iter().collect();
        ids.sort();

        let write_err = |source: std::io::Error| AlertError::SeenStoreWrite { path: self.path.clone(), source };
        let json = serde_json::to_string_pretty(&ids)
            .map_err(|e| write_err(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(write_err)?;
        file.write_all(json.as_bytes()).map_err(write_err)?;
        Ok(())
    }
}
