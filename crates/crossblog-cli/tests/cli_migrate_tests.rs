//! CLI migrate integration tests

use std::process::Command;

use rusqlite::Connection;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_crossblog"))
}

#[test]
fn test_migrate_creates_schema() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("blog.db");

    let output = cli()
        .current_dir(temp_dir.path())
        .args(["migrate", "--db"])
        .arg(&db_path)
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "migrate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("applied 001_articles"));
    assert!(stdout.contains("applied 002_articles_indexes"));

    let conn = Connection::open(&db_path).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn test_migrate_twice_is_up_to_date() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("blog.db");

    for _ in 0..2 {
        let status = cli()
            .current_dir(temp_dir.path())
            .args(["migrate", "--db"])
            .arg(&db_path)
            .status()
            .unwrap();
        assert!(status.success());
    }

    let output = cli()
        .current_dir(temp_dir.path())
        .args(["migrate", "--db"])
        .arg(&db_path)
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("is up to date"));
    assert!(stdout.contains("2 migrations"));
}

#[test]
fn test_migrate_uses_config_file_path() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("crossblog.toml"),
        "[storage]\nsqlite_path = \"from-config.db\"\n",
    )
    .unwrap();

    let output = cli()
        .current_dir(temp_dir.path())
        .env_remove("CROSSBLOG__STORAGE__SQLITE_PATH")
        .arg("migrate")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(temp_dir.path().join("from-config.db").exists());
}

#[test]
fn test_unknown_backend_flag_is_rejected() {
    let output = cli().args(["serve", "--backend", "postgres"]).output().unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("postgres"));
}
