use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Runs the binary from an empty directory so no local config files leak in.
fn geoshift(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_geoshift"));
    cmd.current_dir(dir.path())
        .env_remove("VITE_API_URL")
        .env_remove("ENV")
        .env("RUST_LOG", "off");
    cmd
}

fn closed_port_uri() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

#[test]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();
    geoshift(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Geo Shift Spy sends before/after satellite images",
        ));
}

#[test]
fn test_cli_version() {
    let dir = TempDir::new().unwrap();
    geoshift(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("geoshift 0.1.0"));
}

#[test]
fn test_compare_help() {
    let dir = TempDir::new().unwrap();
    geoshift(&dir)
        .arg("compare")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("before"));
}

#[test]
fn test_area_in_hectares() {
    let dir = TempDir::new().unwrap();
    geoshift(&dir)
        .args(["area", "500000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("50.00 hectares"));
}

#[test]
fn test_bounds_check_rejects_inverted_latitudes() {
    let dir = TempDir::new().unwrap();
    geoshift(&dir)
        .args(["bounds", "--check", "1,2,3,4"])
        .assert()
        .code(2);
}

#[test]
fn test_missing_config_file_exits_with_config_error() {
    let dir = TempDir::new().unwrap();
    geoshift(&dir)
        .args(["--config", "missing.toml", "area", "1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_compare_against_closed_port_exits_with_network_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("before.png"), b"before-image").unwrap();
    std::fs::write(dir.path().join("after.png"), b"after-image").unwrap();

    geoshift(&dir)
        .env("VITE_API_URL", closed_port_uri())
        .args(["compare", "before.png", "after.png"])
        .assert()
        .code(3);
}
