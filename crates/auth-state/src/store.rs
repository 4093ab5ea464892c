//! Durable key/value stores
//!
//! `KeyValueStore` is the `localStorage`-shaped map the credential adapter
//! writes through. All methods take `&self`; implementations use interior
//! mutability and are not meant to be shared across threads.
//!
//! `FileStore` keeps the whole map in memory and rewrites a JSON file on
//! every mutation using atomic temp-file + rename.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{debug, info};

use crate::error::{Error, Result};

/// String-keyed persistent map.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    /// Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}

/// In-memory store. Contents last as long as the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// JSON-file-backed store.
///
/// The file holds a single JSON object of string values. Other programs may
/// share the file's keys; only keys explicitly removed are dropped.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// If the file doesn't exist it is created as `{}`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| Error::Store(format!("reading {}: {e}", path.display())))?;
            let entries: BTreeMap<String, String> = serde_json::from_str(&contents)
                .map_err(|e| Error::Store(format!("parsing {}: {e}", path.display())))?;
            info!(path = %path.display(), keys = entries.len(), "opened store");
            entries
        } else {
            info!(path = %path.display(), "store file not found, starting empty");
            let entries = BTreeMap::new();
            write_atomic(&path, &entries)?;
            entries
        };

        Ok(Self {
            path,
            entries: RefCell::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `next`, then make it the in-memory view. A failed write
    /// leaves memory matching what is on disk.
    fn commit(&self, next: BTreeMap<String, String>) -> Result<()> {
        write_atomic(&self.path, &next)?;
        *self.entries.borrow_mut() = next;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut next = self.entries.borrow().clone();
        next.insert(key.to_owned(), value.to_owned());
        self.commit(next)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut next = self.entries.borrow().clone();
        if next.remove(key).is_none() {
            return Ok(());
        }
        self.commit(next)
    }
}

/// Write the map to `path` atomically.
///
/// Writes a temp file in the same directory, then renames it over the
/// target. Permissions are 0600 on unix since the file holds tokens.
fn write_atomic(path: &Path, entries: &BTreeMap<String, String>) -> Result<()> {
    let json = serde_json::to_string_pretty(entries)
        .map_err(|e| Error::Store(format!("serializing store: {e}")))?;

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let tmp_path = dir.join(format!(".auth-store.tmp.{}", std::process::id()));

    std::fs::write(&tmp_path, json.as_bytes())
        .map_err(|e| Error::Store(format!("writing temp store file: {e}")))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&tmp_path, perms)
            .map_err(|e| Error::Store(format!("setting store file permissions: {e}")))?;
    }

    std::fs::rename(&tmp_path, path)
        .map_err(|e| Error::Store(format!("renaming temp store file: {e}")))?;

    debug!(path = %path.display(), keys = entries.len(), "persisted store");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get_item("k").unwrap(), None);

        store.set_item("k", "v").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.len(), 1);

        store.remove_item("k").unwrap();
        store.remove_item("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn shared_store_sees_same_entries() {
        let store = Rc::new(MemoryStore::new());
        let other = Rc::clone(&store);
        other.set_item("k", "v").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn file_store_cold_start_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        assert!(!path.exists());
        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get_item("anything").unwrap(), None);
        assert!(path.exists());

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: BTreeMap<String, String> = serde_json::from_str(&contents).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn file_store_roundtrips_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::open(&path).unwrap();
        store.set_item("access_token", "at_1").unwrap();
        store.set_item("other", "keep").unwrap();
        store.remove_item("access_token").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get_item("access_token").unwrap(), None);
        assert_eq!(reopened.get_item("other").unwrap().as_deref(), Some("keep"));
    }

    #[test]
    fn failed_write_leaves_entries_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("store.json");
        std::fs::create_dir(path.parent().unwrap()).unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.path(), path.as_path());
        store.set_item("expires_at", "1000").unwrap();

        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();

        assert!(store.set_item("expires_at", "4102444800000").is_err());
        assert_eq!(
            store.get_item("expires_at").unwrap().as_deref(),
            Some("1000"),
            "memory must not run ahead of the file"
        );

        assert!(store.remove_item("expires_at").is_err());
        assert_eq!(
            store.get_item("expires_at").unwrap().as_deref(),
            Some("1000"),
            "a failed remove must keep the entry"
        );
    }

    #[test]
    fn file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, Error::Store(_)), "got: {err:?}");
    }

    #[cfg(unix)]
    #[test]
    fn file_permissions_are_0600() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = FileStore::open(&path).unwrap();
        store.set_item("id_token", "x.y.z").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "store file must be 0600, got {mode:o}");
    }
}
