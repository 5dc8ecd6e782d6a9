#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::{PredicateBooleanExt, predicate};

#[test]
fn test_help_lists_subcommands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("reelview");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("detail"))
        .stdout(predicate::str::contains("image-config"));
}

#[test]
fn test_list_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("reelview");
    cmd.args(["list", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--kind"))
        .stdout(predicate::str::contains("--pages"));
}

#[test]
fn test_list_rejects_page_zero() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("reelview");
    cmd.args(["list", "--page", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--page"));
}

#[test]
fn test_list_rejects_unknown_kind() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("reelview");
    cmd.args(["list", "--kind", "trending"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown movie list kind"));
}

#[test]
fn test_detail_missing_id() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("reelview");
    cmd.arg("detail")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--id"));
}

#[test]
fn test_genres_without_api_key_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("reelview");
    cmd.env_remove("TMDB_API_KEY")
        .arg("--dir")
        .arg(dir.path())
        .arg("genres")
        .assert()
        .failure()
        .stderr(predicate::str::contains("TMDB API key is not configured"));
}

#[test]
fn test_config_set_key_then_show() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act
    let mut set_key = cargo_bin_cmd!("reelview");
    set_key
        .arg("--dir")
        .arg(dir.path())
        .args(["config", "set-key", "--api-key", "secret-key", "--language", "ja-JP"])
        .assert()
        .success();

    // Assert
    let saved = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(saved.contains("secret-key"));
    assert!(saved.contains("ja-JP"));

    let mut show = cargo_bin_cmd!("reelview");
    show.arg("--dir")
        .arg(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api_key: set"))
        .stdout(predicate::str::contains("ja-JP"))
        .stdout(predicate::str::contains("secret-key").not());
}

#[test]
fn test_config_show_without_file() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("reelview");
    cmd.arg("--dir")
        .arg(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api_key: not set"));
}
