//! Tests for the command-line binary

use assert_cmd::Command;
use filetime::{set_file_mtime, FileTime};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_at(path: &Path, content: &[u8], secs: i64) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent");
    }
    fs::write(path, content).expect("Failed to write file");
    set_file_mtime(path, FileTime::from_unix_time(secs, 0)).expect("Failed to set mtime");
}

fn treesync(src: &Path, dst: &Path) -> Command {
    let mut cmd = Command::cargo_bin("treesync").expect("binary builds");
    cmd.arg("--no-swap")
        .arg("--source")
        .arg(src)
        .arg("--target")
        .arg(dst);
    cmd
}

#[test]
fn test_dry_run_prints_plan_and_changes_nothing() {
    let src = TempDir::new().expect("Failed to create source");
    let dst = TempDir::new().expect("Failed to create target");
    write_at(&src.path().join("new.txt"), b"new", 1_700_000_000);
    write_at(&dst.path().join("orphan.txt"), b"old", 1_700_000_000);

    treesync(src.path(), dst.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Delete file: "))
        .stdout(predicate::str::contains("orphan.txt"))
        .stdout(predicate::str::contains("Copy "))
        .stdout(predicate::str::contains("Proceed").not());

    assert!(dst.path().join("orphan.txt").exists());
    assert!(!dst.path().join("new.txt").exists());
}

#[test]
fn test_yes_applies_everything() {
    let src = TempDir::new().expect("Failed to create source");
    let dst = TempDir::new().expect("Failed to create target");
    write_at(&src.path().join("new.txt"), b"new", 1_700_000_000);
    write_at(&dst.path().join("orphan.txt"), b"old", 1_700_000_000);

    treesync(src.path(), dst.path())
        .arg("--yes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted "))
        .stdout(predicate::str::contains("Copied "));

    assert!(!dst.path().join("orphan.txt").exists());
    assert_eq!(fs::read(dst.path().join("new.txt")).expect("read"), b"new");
}

#[test]
fn test_piped_y_confirms() {
    let src = TempDir::new().expect("Failed to create source");
    let dst = TempDir::new().expect("Failed to create target");
    write_at(&dst.path().join("orphan.txt"), b"old", 1_700_000_000);

    treesync(src.path(), dst.path())
        .write_stdin("Y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Proceed with these changes? (y/n)"));

    assert!(!dst.path().join("orphan.txt").exists());
}

#[test]
fn test_anything_but_y_declines() {
    let src = TempDir::new().expect("Failed to create source");
    let dst = TempDir::new().expect("Failed to create target");
    write_at(&dst.path().join("orphan.txt"), b"old", 1_700_000_000);
    write_at(&src.path().join("new.txt"), b"new", 1_700_000_000);

    treesync(src.path(), dst.path())
        .write_stdin("yes\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted").not());

    assert!(dst.path().join("orphan.txt").exists());
    assert!(dst.path().join("new.txt").exists());
}

#[test]
fn test_settings_file_supplies_roots() {
    let src = TempDir::new().expect("Failed to create source");
    let dst = TempDir::new().expect("Failed to create target");
    let settings_dir = TempDir::new().expect("Failed to create settings dir");
    write_at(&src.path().join("new.txt"), b"new", 1_700_000_000);

    let settings = settings_dir.path().join("treesync.toml");
    fs::write(
        &settings,
        format!(
            "source = {:?}\ntarget = {:?}\n",
            src.path().display().to_string(),
            dst.path().display().to_string()
        ),
    )
    .expect("write settings");

    Command::cargo_bin("treesync")
        .expect("binary builds")
        .arg("--no-swap")
        .arg("--config")
        .arg(&settings)
        .assert()
        .success();

    assert!(dst.path().join("new.txt").exists());
}

#[test]
fn test_missing_target_is_an_error() {
    let src = TempDir::new().expect("Failed to create source");

    Command::cargo_bin("treesync")
        .expect("binary builds")
        .arg("--source")
        .arg(src.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No target directory given"));
}

#[test]
fn test_nested_roots_rejected() {
    let src = TempDir::new().expect("Failed to create source");
    let nested = src.path().join("inner");
    fs::create_dir_all(&nested).expect("create nested");

    treesync(src.path(), &nested)
        .arg("--yes")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not contain each other"));
}
