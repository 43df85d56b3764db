use dupestream::duplicates::{
    ClassifierFactory, ConsumerCoordinator, CoordinatorError, DuplicateFinder, FinderConfig,
    FinderError, SharedTables,
};
use dupestream::events::stage_channel;
use std::fs::{self, File};
use std::io::Write;
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn test_scan_non_existent_path() {
    let finder = DuplicateFinder::with_defaults();
    let result = finder.find_duplicates(std::path::Path::new("/non/existent/path/12345"));

    match result {
        Err(FinderError::PathNotFound(path)) => {
            assert!(path.to_string_lossy().contains("non/existent/path/12345"));
        }
        _ => panic!("Expected PathNotFound error, got {:?}", result),
    }
}

#[test]
fn test_scan_file_instead_of_directory() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("file.txt");
    File::create(&file_path).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let result = finder.find_duplicates(&file_path);

    match result {
        Err(FinderError::NotADirectory(path)) => {
            assert!(path.to_string_lossy().contains("file.txt"));
        }
        _ => panic!("Expected NotADirectory error, got {:?}", result),
    }
}

#[test]
fn test_invalid_worker_count_stops_before_work() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("a.txt"))
        .unwrap()
        .write_all(b"content")
        .unwrap();

    let finder = DuplicateFinder::new(FinderConfig {
        workers: 0,
        ..FinderConfig::default()
    });

    let result = finder.find_duplicates(dir.path());
    assert!(matches!(result, Err(FinderError::InvalidWorkerCount(0))));
}

#[test]
fn test_coordinator_double_start_is_invalid_state() {
    let (_tx, rx) = crossbeam_channel::unbounded();
    let tables = Arc::new(SharedTables::new());
    let factory = ClassifierFactory::new(tables);
    let (notifier, _signals) = stage_channel();

    let mut coordinator = ConsumerCoordinator::new(rx, factory, 2, notifier);

    assert!(coordinator.consume().is_ok());
    assert!(matches!(
        coordinator.consume(),
        Err(CoordinatorError::AlreadyStarted)
    ));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_does_not_abort_the_run() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();

    // A pair of readable duplicates plus one unreadable file
    File::create(dir.path().join("a.txt"))
        .unwrap()
        .write_all(b"public")
        .unwrap();
    File::create(dir.path().join("b.txt"))
        .unwrap()
        .write_all(b"public")
        .unwrap();

    let locked = dir.path().join("locked.txt");
    File::create(&locked)
        .unwrap()
        .write_all(b"secret")
        .unwrap();
    let mut perms = fs::metadata(&locked).unwrap().permissions();
    perms.set_mode(0o000);
    fs::set_permissions(&locked, perms).unwrap();

    if File::open(&locked).is_ok() {
        // Running as root; permission bits cannot make the file
        // unreadable here
        return;
    }

    let summary = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    // Restore permissions so the tempdir can be cleaned up
    let mut perms = fs::metadata(&locked).unwrap().permissions();
    perms.set_mode(0o644);
    fs::set_permissions(&locked, perms).unwrap();

    // The unreadable file is dropped; the readable pair is still found
    assert_eq!(summary.duplicate_regular, 1);
    assert!(summary.errors >= 1);
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_continues_with_siblings() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked_dir = dir.path().join("no_access");
    fs::create_dir(&locked_dir).unwrap();
    File::create(locked_dir.join("hidden.txt"))
        .unwrap()
        .write_all(b"secret")
        .unwrap();

    let mut perms = fs::metadata(&locked_dir).unwrap().permissions();
    perms.set_mode(0o000);
    fs::set_permissions(&locked_dir, perms).unwrap();

    if fs::read_dir(&locked_dir).is_ok() {
        // Running as root; permission bits cannot block traversal here
        let mut perms = fs::metadata(&locked_dir).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&locked_dir, perms).unwrap();
        return;
    }

    File::create(dir.path().join("ok1.txt"))
        .unwrap()
        .write_all(b"visible")
        .unwrap();
    File::create(dir.path().join("ok2.txt"))
        .unwrap()
        .write_all(b"visible")
        .unwrap();

    let result = DuplicateFinder::with_defaults().find_duplicates(dir.path());

    let mut perms = fs::metadata(&locked_dir).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&locked_dir, perms).unwrap();

    let summary = result.unwrap();
    assert_eq!(summary.duplicate_regular, 1);
    assert!(summary.errors >= 1);
}
