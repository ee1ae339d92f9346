use std::process::Command;

use tempfile::TempDir;

fn notefeed_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_notefeed"));
    cmd.env("HOME", home.path());
    cmd
}

#[test]
fn once_mode_writes_a_json_snapshot() {
    let home = TempDir::new().unwrap();
    let outfile = home.path().join("feed.json");

    let output = notefeed_cmd(&home)
        .args([
            "--once",
            "--no-fetch",
            "--scrolls",
            "2",
            "-o",
            outfile.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Card 1"));
    assert!(stdout.contains(":: Completed ::"));

    // first run drops a commented default config under $HOME
    assert!(home.path().join(".notefeed/config.yml").exists());

    let contents = std::fs::read_to_string(&outfile).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let cards = parsed.as_array().unwrap();
    assert_eq!(cards.len(), 8);
    assert_eq!(cards[0]["title"], "Card 1");
    assert_eq!(cards[7]["title"], "Card 8");
    assert_eq!(cards[0]["kind"], "placeholder");
}

#[test]
fn unreachable_endpoint_is_reported_but_not_fatal() {
    let home = TempDir::new().unwrap();

    let output = notefeed_cmd(&home)
        .args(["--once", "-u", "http://127.0.0.1:1/"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("failed"));
    assert!(stdout.contains("Card 1"));
}

#[test]
fn invalid_tolerance_fails_with_an_error() {
    let home = TempDir::new().unwrap();

    let output = notefeed_cmd(&home)
        .args(["--once", "--no-fetch", "--tol", "5"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("tolerance"));
}

#[test]
fn help_lists_grouped_options() {
    let home = TempDir::new().unwrap();

    let output = notefeed_cmd(&home).args(["--help"]).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Feed:"));
    assert!(stdout.contains("HTTP:"));
    assert!(stdout.contains("--batch-size"));
    assert!(stdout.contains("--no-fetch"));
}
