//! The breadcrumb store: a `.breadcrumbs.json` file discovered by walking
//! up from the working directory, with an env-var override for tooling.

use crate::model::{Breadcrumb, StoreFile};
use anyhow::{Context, Result, anyhow};
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Store file name looked for in each ancestor directory.
pub const STORE_FILE_NAME: &str = ".breadcrumbs.json";

/// Current store format version.
pub const STORE_VERSION: u32 = 1;

/// Environment variable overriding store discovery.
pub const STORE_PATH_ENV: &str = "BREADCRUMBS_FILE";

/// Alphabet for generated record ids.
const ID_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A loaded store plus the path it round-trips through.
#[derive(Debug, Clone)]
pub struct Store {
    /// Where the store is persisted.
    path: PathBuf,
    /// Parsed file contents.
    pub file: StoreFile,
}

impl Store {
    /// Finds the store file for a directory: `BREADCRUMBS_FILE` if set,
    /// otherwise the nearest `.breadcrumbs.json` walking up to the root.
    #[must_use]
    pub fn discover(start: &Path) -> Option<PathBuf> {
        if let Ok(overridden) = std::env::var(STORE_PATH_ENV) {
            return Some(PathBuf::from(overridden));
        }

        let mut dir = start;
        loop {
            let candidate = dir.join(STORE_FILE_NAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            dir = dir.parent()?;
        }
    }

    /// Where `init` should create a store for a working directory: the
    /// `BREADCRUMBS_FILE` override when set, otherwise `.breadcrumbs.json`
    /// in the directory itself. Kept in lockstep with [`Store::discover`]
    /// so a freshly initialized store is the one later commands read.
    #[must_use]
    pub fn init_target(cwd: &Path) -> PathBuf {
        std::env::var(STORE_PATH_ENV).map_or_else(|_| cwd.join(STORE_FILE_NAME), PathBuf::from)
    }

    /// Loads a store from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// declares an unsupported version.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read store file: {}", path.display()))?;
        let file: StoreFile = serde_json::from_str(&content)
            .with_context(|| format!("Invalid store file: {}", path.display()))?;

        if file.version != STORE_VERSION {
            return Err(anyhow!(
                "Unsupported store version {} in {} (expected {STORE_VERSION})",
                file.version,
                path.display()
            ));
        }

        debug!(path = %path.display(), records = file.breadcrumbs.len(), "loaded store");
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Creates an empty store at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file already exists (unless `force`) or
    /// cannot be written.
    pub fn init(path: &Path, force: bool) -> Result<Self> {
        if path.exists() && !force {
            return Err(anyhow!(
                "Store file already exists at {}. Use --force to overwrite.",
                path.display()
            ));
        }

        let store = Self {
            path: path.to_path_buf(),
            file: StoreFile {
                version: STORE_VERSION,
                breadcrumbs: Vec::new(),
            },
        };
        store.save()?;
        Ok(store)
    }

    /// Writes the store back to its path, pretty-printed with a trailing
    /// newline so the file diffs cleanly under version control.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self) -> Result<()> {
        let mut content =
            serde_json::to_string_pretty(&self.file).context("Failed to serialize store")?;
        content.push('\n');
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write store file: {}", self.path.display()))?;
        debug!(path = %self.path.display(), records = self.file.breadcrumbs.len(), "saved store");
        Ok(())
    }

    /// The path this store persists to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Generates a fresh record id in `b_XXXXXX` form.
    #[must_use]
    pub fn generate_id() -> String {
        let mut rng = rand::rng();
        let suffix: String = (0..6)
            .map(|_| ID_CHARS[rng.random_range(0..ID_CHARS.len())] as char)
            .collect();
        format!("b_{suffix}")
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Breadcrumb> {
        self.file.breadcrumbs.iter().find(|b| b.id == id)
    }

    /// Looks up a record by its raw path string.
    #[must_use]
    pub fn find_by_path(&self, path: &str) -> Option<&Breadcrumb> {
        self.file.breadcrumbs.iter().find(|b| b.path == path)
    }

    /// Removes a record by id, returning it if present.
    pub fn remove_by_id(&mut self, id: &str) -> Option<Breadcrumb> {
        let index = self.file.breadcrumbs.iter().position(|b| b.id == id)?;
        Some(self.file.breadcrumbs.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Severity, Source};
    use tempfile::tempdir;

    #[test]
    fn test_init_load_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(STORE_FILE_NAME);

        let mut store = Store::init(&path, false)?;
        store.file.breadcrumbs.push(Breadcrumb::new(
            "b_abc123".into(),
            "src/a.rs".into(),
            "careful".into(),
            Severity::Warn,
            Source::Human,
        ));
        store.save()?;

        let loaded = Store::load(&path)?;
        assert_eq!(loaded.file.version, STORE_VERSION);
        assert_eq!(loaded.file.breadcrumbs.len(), 1);
        assert_eq!(loaded.file.breadcrumbs[0].id, "b_abc123");

        // Stable formatting: pretty JSON, trailing newline
        let raw = std::fs::read_to_string(&path)?;
        assert!(raw.ends_with('\n'));
        Ok(())
    }

    #[test]
    fn test_init_refuses_existing_without_force() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(STORE_FILE_NAME);
        Store::init(&path, false)?;
        assert!(Store::init(&path, false).is_err());
        assert!(Store::init(&path, true).is_ok());
        Ok(())
    }

    #[test]
    fn test_load_rejects_wrong_version() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(STORE_FILE_NAME);
        std::fs::write(&path, r#"{"version": 99, "breadcrumbs": []}"#)?;
        assert!(Store::load(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_load_rejects_garbage() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(STORE_FILE_NAME);
        std::fs::write(&path, "not json")?;
        assert!(Store::load(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_discover_walks_up() -> Result<()> {
        let dir = tempdir()?;
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested)?;
        let path = dir.path().join(STORE_FILE_NAME);
        Store::init(&path, false)?;

        assert_eq!(Store::discover(&nested), Some(path));
        Ok(())
    }

    #[test]
    fn test_generate_id_shape() {
        for _ in 0..32 {
            let id = Store::generate_id();
            assert_eq!(id.len(), 8);
            assert!(id.starts_with("b_"));
            assert!(id[2..].chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_remove_by_id() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(STORE_FILE_NAME);
        let mut store = Store::init(&path, false)?;
        store.file.breadcrumbs.push(Breadcrumb::new(
            "b_abc123".into(),
            "src/a.rs".into(),
            "careful".into(),
            Severity::Info,
            Source::Agent,
        ));

        assert!(store.remove_by_id("b_zzzzzz").is_none());
        let removed = store.remove_by_id("b_abc123").unwrap();
        assert_eq!(removed.path, "src/a.rs");
        assert!(store.file.breadcrumbs.is_empty());
        Ok(())
    }
}
