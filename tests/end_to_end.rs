//! Black-box integration tests: runs the real `hardsnap` binary against
//! `tempfile::TempDir` trees and asserts on the resulting filesystem state,
//! inode numbers, and exit codes. Mirrors the end-to-end scenarios.

use std::fs::{self, create_dir, write};
use std::os::unix::fs::{MetadataExt, PermissionsExt};

use assert_cmd::Command;
use filetime::FileTime;
use predicates::prelude::*;
use tempfile::tempdir;

fn hardsnap() -> Command {
    Command::cargo_bin("hardsnap").unwrap()
}

fn stamp_same_mtime(a: &std::path::Path, b: &std::path::Path) {
    let t = FileTime::from_system_time(std::time::SystemTime::now());
    filetime::set_file_mtime(a, t).unwrap();
    filetime::set_file_mtime(b, t).unwrap();
}

#[test]
fn new_tree_is_freshly_copied() {
    let root = tempdir().unwrap();
    let src = root.path().join("src");
    let refdir = root.path().join("ref");
    let tgt = root.path().join("tgt");
    create_dir(&src).unwrap();
    create_dir(&refdir).unwrap();
    create_dir(src.join("sub")).unwrap();
    write(src.join("a.txt"), b"0123456789").unwrap();
    write(src.join("sub/b.txt"), b"01234567890123456789").unwrap();

    hardsnap()
        .args([
            "--srcdir",
            src.to_str().unwrap(),
            "--refdir",
            refdir.to_str().unwrap(),
            "--tgtdir",
            tgt.to_str().unwrap(),
        ])
        .assert()
        .success();

    assert_eq!(fs::read(tgt.join("a.txt")).unwrap(), b"0123456789");
    assert_eq!(fs::read(tgt.join("sub/b.txt")).unwrap(), b"01234567890123456789");
}

#[test]
fn fully_unchanged_tree_hardlinks_everything() {
    let root = tempdir().unwrap();
    let src = root.path().join("src");
    let refdir = root.path().join("ref");
    let tgt = root.path().join("tgt");
    create_dir(&src).unwrap();
    create_dir(&refdir).unwrap();
    write(src.join("a.txt"), b"hello").unwrap();
    write(refdir.join("a.txt"), b"hello").unwrap();
    stamp_same_mtime(&src.join("a.txt"), &refdir.join("a.txt"));

    hardsnap()
        .args([
            "--srcdir",
            src.to_str().unwrap(),
            "--refdir",
            refdir.to_str().unwrap(),
            "--tgtdir",
            tgt.to_str().unwrap(),
        ])
        .assert()
        .success();

    let ref_ino = fs::metadata(refdir.join("a.txt")).unwrap().ino();
    let tgt_ino = fs::metadata(tgt.join("a.txt")).unwrap().ino();
    assert_eq!(ref_ino, tgt_ino);
}

#[test]
fn metadata_only_change_links_and_refreshes_attributes() {
    let root = tempdir().unwrap();
    let src = root.path().join("src");
    let refdir = root.path().join("ref");
    let tgt = root.path().join("tgt");
    create_dir(&src).unwrap();
    create_dir(&refdir).unwrap();
    write(src.join("a.txt"), b"hello").unwrap();
    write(refdir.join("a.txt"), b"hello").unwrap();
    stamp_same_mtime(&src.join("a.txt"), &refdir.join("a.txt"));
    fs::set_permissions(src.join("a.txt"), fs::Permissions::from_mode(0o644)).unwrap();
    fs::set_permissions(refdir.join("a.txt"), fs::Permissions::from_mode(0o600)).unwrap();

    hardsnap()
        .args([
            "--srcdir",
            src.to_str().unwrap(),
            "--refdir",
            refdir.to_str().unwrap(),
            "--tgtdir",
            tgt.to_str().unwrap(),
        ])
        .assert()
        .success();

    let ref_ino = fs::metadata(refdir.join("a.txt")).unwrap().ino();
    let tgt_ino = fs::metadata(tgt.join("a.txt")).unwrap().ino();
    assert_eq!(ref_ino, tgt_ino, "metadata-only drift must still hardlink");

    // Refreshing attributes on the shared inode alters both the target
    // and reference view: a documented consequence of the shared-inode
    // model, not a bug.
    assert_eq!(fs::metadata(tgt.join("a.txt")).unwrap().mode() & 0o7777, 0o644);
    assert_eq!(fs::metadata(refdir.join("a.txt")).unwrap().mode() & 0o7777, 0o644);
}

#[test]
fn content_change_forces_fresh_copy() {
    let root = tempdir().unwrap();
    let src = root.path().join("src");
    let refdir = root.path().join("ref");
    let tgt = root.path().join("tgt");
    create_dir(&src).unwrap();
    create_dir(&refdir).unwrap();
    write(refdir.join("a.txt"), vec![0u8; 50]).unwrap();
    write(src.join("a.txt"), vec![1u8; 100]).unwrap();

    let now = std::time::SystemTime::now();
    filetime::set_file_mtime(
        refdir.join("a.txt"),
        FileTime::from_system_time(now - std::time::Duration::from_secs(60)),
    )
    .unwrap();
    filetime::set_file_mtime(src.join("a.txt"), FileTime::from_system_time(now)).unwrap();

    hardsnap()
        .args([
            "--srcdir",
            src.to_str().unwrap(),
            "--refdir",
            refdir.to_str().unwrap(),
            "--tgtdir",
            tgt.to_str().unwrap(),
        ])
        .assert()
        .success();

    let ref_ino = fs::metadata(refdir.join("a.txt")).unwrap().ino();
    let tgt_ino = fs::metadata(tgt.join("a.txt")).unwrap().ino();
    assert_ne!(ref_ino, tgt_ino);
    assert_eq!(fs::metadata(tgt.join("a.txt")).unwrap().len(), 100);
}

#[test]
fn ignore_file_prunes_subtree() {
    let root = tempdir().unwrap();
    let src = root.path().join("src");
    let refdir = root.path().join("ref");
    let tgt = root.path().join("tgt");
    create_dir(&src).unwrap();
    create_dir(&refdir).unwrap();
    create_dir(src.join("junk")).unwrap();
    write(src.join("junk/secret.txt"), b"nope").unwrap();
    write(src.join(".waybackup.ignore"), "junk\n").unwrap();

    hardsnap()
        .args([
            "--srcdir",
            src.to_str().unwrap(),
            "--refdir",
            refdir.to_str().unwrap(),
            "--tgtdir",
            tgt.to_str().unwrap(),
            "--verbose",
        ])
        .assert()
        .success();

    assert!(!tgt.join("junk").exists());
}

#[test]
fn symlinks_are_recreated_without_following_target() -> anyhow::Result<()> {
    let root = tempdir()?;
    let src = root.path().join("src");
    let refdir = root.path().join("ref");
    let tgt = root.path().join("tgt");
    create_dir(&src)?;
    create_dir(&refdir)?;
    std::os::unix::fs::symlink("does/not/exist", src.join("dangling"))?;

    hardsnap()
        .args([
            "--srcdir",
            src.to_str().unwrap(),
            "--refdir",
            refdir.to_str().unwrap(),
            "--tgtdir",
            tgt.to_str().unwrap(),
        ])
        .assert()
        .success();

    assert_eq!(
        fs::read_link(tgt.join("dangling"))?,
        std::path::Path::new("does/not/exist")
    );
    Ok(())
}

#[test]
fn nonempty_target_is_rejected_before_any_mutation() {
    let root = tempdir().unwrap();
    let src = root.path().join("src");
    let refdir = root.path().join("ref");
    let tgt = root.path().join("tgt");
    create_dir(&src).unwrap();
    create_dir(&refdir).unwrap();
    create_dir(&tgt).unwrap();
    write(src.join("a.txt"), b"hello").unwrap();
    write(tgt.join("leftover"), b"stale").unwrap();

    hardsnap()
        .args([
            "--srcdir",
            src.to_str().unwrap(),
            "--refdir",
            refdir.to_str().unwrap(),
            "--tgtdir",
            tgt.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .code(3);

    assert!(!tgt.join("a.txt").exists());
}

#[test]
fn target_that_is_a_file_is_rejected_with_code_2() {
    let root = tempdir().unwrap();
    let src = root.path().join("src");
    let refdir = root.path().join("ref");
    let tgt = root.path().join("tgt");
    create_dir(&src).unwrap();
    create_dir(&refdir).unwrap();
    write(&tgt, b"not a directory").unwrap();

    hardsnap()
        .args([
            "--srcdir",
            src.to_str().unwrap(),
            "--refdir",
            refdir.to_str().unwrap(),
            "--tgtdir",
            tgt.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn dryrun_produces_no_filesystem_mutation() {
    let root = tempdir().unwrap();
    let src = root.path().join("src");
    let refdir = root.path().join("ref");
    let tgt = root.path().join("tgt");
    create_dir(&src).unwrap();
    create_dir(&refdir).unwrap();
    write(src.join("a.txt"), b"hello").unwrap();

    hardsnap()
        .args([
            "--srcdir",
            src.to_str().unwrap(),
            "--refdir",
            refdir.to_str().unwrap(),
            "--tgtdir",
            tgt.to_str().unwrap(),
            "--dryrun",
        ])
        .assert()
        .success();

    assert!(!tgt.exists());
}

#[test]
fn missing_required_flag_exits_with_clap_usage_error() {
    hardsnap()
        .args(["--srcdir", "/tmp/x", "--refdir", "/tmp/y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tgtdir"));
}
