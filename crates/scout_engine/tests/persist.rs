use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::thread;

use scout_engine::{ensure_output_dir, numbered_name, safe_file_name, DownloadStore};
use tempfile::TempDir;

#[test]
fn creates_missing_download_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("downloads").join("session_1");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn save_keeps_earlier_download_of_same_name() {
    let temp = TempDir::new().unwrap();
    let store = DownloadStore::new(temp.path().to_path_buf());

    let first = store.save("content.txt", b"from site a").unwrap();
    assert_eq!(first.file_name().unwrap(), "content.txt");

    let second = store.save("content.txt", b"from site b").unwrap();
    assert_eq!(second.file_name().unwrap(), "content (1).txt");

    assert_eq!(fs::read_to_string(&first).unwrap(), "from site a");
    assert_eq!(fs::read_to_string(&second).unwrap(), "from site b");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 2);
}

#[test]
fn concurrent_saves_of_one_name_all_land() {
    let temp = TempDir::new().unwrap();
    let store = DownloadStore::new(temp.path().to_path_buf());

    let saved: Vec<PathBuf> = thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|i| {
                let store = &store;
                scope.spawn(move || store.save("x.bin", format!("payload {i}").as_bytes()))
            })
            .collect();
        workers
            .into_iter()
            .map(|worker| worker.join().unwrap().unwrap())
            .collect()
    });

    let distinct: HashSet<_> = saved.iter().collect();
    assert_eq!(distinct.len(), 8);
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 8);
    let mut contents: Vec<String> = saved
        .iter()
        .map(|path| fs::read_to_string(path).unwrap())
        .collect();
    contents.sort();
    let mut expected: Vec<String> = (0..8).map(|i| format!("payload {i}")).collect();
    expected.sort();
    assert_eq!(contents, expected);
}

#[test]
fn numbered_names_keep_the_extension() {
    assert_eq!(numbered_name("report.txt", 0), "report.txt");
    assert_eq!(numbered_name("report.txt", 2), "report (2).txt");
    assert_eq!(numbered_name("session_1.zip", 1), "session_1 (1).zip");
    assert_eq!(numbered_name("README", 3), "README (3)");
    assert_eq!(numbered_name("_.env", 1), "_ (1).env");
}

#[test]
fn save_sanitizes_server_supplied_names() {
    let temp = TempDir::new().unwrap();
    let store = DownloadStore::new(temp.path().to_path_buf());

    let saved = store.save("../../etc/passwd", b"x").unwrap();
    assert_eq!(saved.parent().unwrap(), temp.path());
    assert_eq!(saved.file_name().unwrap(), "_.._etc_passwd");
}

#[test]
fn no_partial_file_when_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let store = DownloadStore::new(file_path.clone());
    assert!(store.save("doc.txt", b"data").is_err());
    assert!(!file_path.with_file_name("doc.txt").exists());
}

#[test]
fn file_names_are_made_portable() {
    assert_eq!(safe_file_name("a:b*c?.txt"), "a_b_c_.txt");
    assert_eq!(safe_file_name("  .hidden. "), "hidden");
    assert_eq!(safe_file_name("..."), "download");
    assert_eq!(safe_file_name("///"), "download");
    assert_eq!(safe_file_name("con.txt"), "_con.txt");
    assert_eq!(safe_file_name("images.zip"), "images.zip");

    let long = format!("{}.tar", "x".repeat(200));
    let shortened = safe_file_name(&long);
    assert_eq!(shortened.chars().count(), 120);
    assert!(shortened.ends_with(".tar"));
}
