//! Runs the `deploy` binary itself. Standard output is reserved for the
//! report line, everything the binary logs has to end up on stderr.

use std::process::Command;

#[test]
fn failed_deployment_keeps_stdout_clean() {
    let artifacts = tempfile::TempDir::new().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_deploy"))
        .env_clear()
        .args([
            "--artifacts",
            artifacts.path().to_str().unwrap(),
            "--node-url",
            "http://127.0.0.1:1",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("running deploy with validated arguments"));
    assert!(stderr.contains("deployment failed: failed to get contract factory for RT_ERC721"));
}
