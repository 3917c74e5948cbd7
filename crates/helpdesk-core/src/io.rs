use crate::error::Result;
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// Prevents partial writes from corrupting the collection files.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Write a file only if it does not already exist. Returns true if written.
pub fn write_if_missing(path: &Path, data: &[u8]) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    atomic_write(path, data)?;
    Ok(true)
}

/// Read a whole YAML collection. A missing or blank file is an empty list.
pub fn load_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_yaml::from_str(&content)?)
}

/// Replace a whole YAML collection on disk.
pub fn save_list<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let content = serde_yaml::to_string(items)?;
    atomic_write(path, content.as_bytes())
}

/// Sidecar lock for a collection file. The collection itself is replaced by
/// rename on every save, so the lock cannot live on its inode.
fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".lock");
    path.with_file_name(name)
}

/// Load, modify and save a YAML collection while holding an exclusive lock.
///
/// Concurrent writers (server requests on the blocking pool, or the CLI
/// running next to the server) serialize here, so none of them works from a
/// stale copy. Nothing is written when `op` fails.
pub fn update_list<T, R>(path: &Path, op: impl FnOnce(&mut Vec<T>) -> Result<R>) -> Result<R>
where
    T: Serialize + DeserializeOwned,
{
    let lock_path = lock_path(path);
    if let Some(parent) = lock_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let lock_file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(&lock_path)?;
    lock_file.lock_exclusive()?;

    let mut items = load_list(path)?;
    let result = op(&mut items)?;
    save_list(path, &items)?;
    drop(lock_file);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.yaml");
        atomic_write(&path, b"hello: world").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello: world");
    }

    #[test]
    fn atomic_write_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/c/test.yaml");
        atomic_write(&path, b"data").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn write_if_missing_skips_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("existing.txt");
        std::fs::write(&path, b"original").unwrap();
        let written = write_if_missing(&path, b"new").unwrap();
        assert!(!written);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn load_list_treats_missing_and_blank_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.yaml");
        let items: Vec<String> = load_list(&path).unwrap();
        assert!(items.is_empty());

        std::fs::write(&path, "  \n").unwrap();
        let items: Vec<String> = load_list(&path).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn save_then_load_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.yaml");
        save_list(&path, &["a".to_string(), "b".to_string()]).unwrap();
        let items: Vec<String> = load_list(&path).unwrap();
        assert_eq!(items, vec!["a", "b"]);
    }

    #[test]
    fn update_list_skips_save_when_op_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.yaml");
        save_list(&path, &["a".to_string()]).unwrap();

        let result: Result<()> = update_list(&path, |items: &mut Vec<String>| {
            items.push("b".to_string());
            Err(crate::error::HelpdeskError::TicketNotFound("x".to_string()))
        });
        assert!(result.is_err());
        let items: Vec<String> = load_list(&path).unwrap();
        assert_eq!(items, vec!["a"]);
    }

    #[test]
    fn update_list_serializes_concurrent_writers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("counter.yaml");

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let path = path.clone();
                std::thread::spawn(move || {
                    update_list(&path, |items: &mut Vec<u32>| {
                        items.push(i);
                        Ok(())
                    })
                    .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let mut items: Vec<u32> = load_list(&path).unwrap();
        items.sort_unstable();
        assert_eq!(items, (0..16).collect::<Vec<_>>());
    }
}
