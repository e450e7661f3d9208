use super::*;
use uuid::Uuid;

fn temp_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("supra-session-{}", Uuid::new_v4()))
        .join("tokens.json")
}

// =============================================================================
// MemoryTokenStore
// =============================================================================

#[test]
fn memory_get_missing_is_none() {
    let store = MemoryTokenStore::new();
    assert_eq!(store.get("accessToken").unwrap(), None);
}

#[test]
fn memory_set_then_get() {
    let store = MemoryTokenStore::new();
    store.set("accessToken", "abc").unwrap();
    assert_eq!(store.get("accessToken").unwrap().as_deref(), Some("abc"));
}

#[test]
fn memory_set_overwrites() {
    let store = MemoryTokenStore::new();
    store.set("accessToken", "abc").unwrap();
    store.set("accessToken", "def").unwrap();
    assert_eq!(store.get("accessToken").unwrap().as_deref(), Some("def"));
}

#[test]
fn memory_remove_absent_is_ok() {
    let store = MemoryTokenStore::new();
    store.remove("accessToken").unwrap();
    store.set("accessToken", "abc").unwrap();
    store.remove("accessToken").unwrap();
    assert_eq!(store.get("accessToken").unwrap(), None);
}

// =============================================================================
// FileTokenStore
// =============================================================================

#[test]
fn file_missing_reads_empty() {
    let store = FileTokenStore::new(temp_path());
    assert_eq!(store.get("accessToken").unwrap(), None);
    store.remove("accessToken").unwrap();
    assert!(!store.path().exists());
}

#[test]
fn file_persists_across_instances() {
    let path = temp_path();
    FileTokenStore::new(&path).set("accessToken", "abc").unwrap();

    let reopened = FileTokenStore::new(&path);
    assert_eq!(reopened.get("accessToken").unwrap().as_deref(), Some("abc"));

    reopened.remove("accessToken").unwrap();
    assert_eq!(FileTokenStore::new(&path).get("accessToken").unwrap(), None);

    std::fs::remove_dir_all(path.parent().unwrap()).ok();
}

#[test]
fn file_keeps_other_keys() {
    let path = temp_path();
    let store = FileTokenStore::new(&path);
    store.set("accessToken", "abc").unwrap();
    store.set("lang", "tr").unwrap();
    store.remove("accessToken").unwrap();
    assert_eq!(store.get("lang").unwrap().as_deref(), Some("tr"));

    std::fs::remove_dir_all(path.parent().unwrap()).ok();
}

#[test]
fn file_corrupt_contents_error() {
    let path = temp_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "not json").unwrap();

    let store = FileTokenStore::new(&path);
    assert!(matches!(store.get("accessToken"), Err(StorageError::Corrupt(_))));

    std::fs::remove_dir_all(path.parent().unwrap()).ok();
}

fn corrupt_file() -> PathBuf {
    let path = temp_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, r#"{"accessToken": "tru"#).unwrap();
    path
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf().into_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

#[test]
fn file_remove_replaces_corrupt_contents() {
    let path = corrupt_file();
    let store = FileTokenStore::new(&path);

    store.remove("accessToken").unwrap();
    assert_eq!(store.get("accessToken").unwrap(), None);

    std::fs::remove_dir_all(path.parent().unwrap()).ok();
}

#[test]
fn file_set_replaces_corrupt_contents() {
    let path = corrupt_file();
    let store = FileTokenStore::new(&path);

    store.set("accessToken", "abc").unwrap();
    assert_eq!(store.get("accessToken").unwrap().as_deref(), Some("abc"));

    std::fs::remove_dir_all(path.parent().unwrap()).ok();
}

#[test]
fn file_write_leaves_no_temp_file() {
    let path = temp_path();
    let store = FileTokenStore::new(&path);
    store.set("accessToken", "abc").unwrap();
    store.set("accessToken", "def").unwrap();

    assert!(path.exists());
    assert!(!tmp_sibling(&path).exists());
    assert_eq!(FileTokenStore::new(&path).get("accessToken").unwrap().as_deref(), Some("def"));

    std::fs::remove_dir_all(path.parent().unwrap()).ok();
}
