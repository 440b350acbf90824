//! Shared E2E test helpers for `kiln` binary tests.
#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default timeout for basic CLI tests.
pub const TIMEOUT_BASIC: Duration = Duration::from_secs(10);

/// Environment variables the binary reads; removed so the ambient test
/// environment cannot leak into assertions.
const KILN_ENV_VARS: &[&str] = &["KILN_LOG", "KILN_JOBS", "KILN_CACHE_DIR", "KILN_CONFIG"];

/// Builds a Command for the `kiln` binary with a clean environment and an
/// explicit config file.
///
/// Always points `--config` at a file in a fresh temp dir so the
/// developer's `~/.kiln/config.toml` never reaches a test. Returns
/// (command, _guard) — keep the guard alive for the test's duration.
pub fn kiln_cmd(config_toml: &str) -> (assert_cmd::Command, tempfile::TempDir) {
    let tmp = tempfile::tempdir().expect("create temp dir for config");
    let config_path = write_config(tmp.path(), config_toml);

    let mut cmd: assert_cmd::Command = cargo_bin_cmd!("kiln");
    cmd.timeout(TIMEOUT_BASIC);
    for var in KILN_ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.args(["--config", config_path.to_str().expect("valid utf8 path")]);
    (cmd, tmp)
}

/// Builds a bare Command without `--config` pre-set.
///
/// Use this only for tests that explicitly provide their own `--config`
/// (clap rejects the flag twice).
pub fn kiln_cmd_raw() -> assert_cmd::Command {
    let mut cmd: assert_cmd::Command = cargo_bin_cmd!("kiln");
    cmd.timeout(TIMEOUT_BASIC);
    for var in KILN_ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Writes `content` as `config.toml` under `dir`.
pub fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, content).expect("write config file");
    path
}

/// Config text mapping one command to a plugin script, with the pidfile
/// env var set so tests can track the subprocess.
pub fn plugin_command_config(name: &str, script: &Path, pidfile: &Path) -> String {
    format!(
        r#"
[commands]
{name} = {{ command = "{}", env = {{ KILN_TEST_PIDFILE = "{}" }} }}
"#,
        script.display(),
        pidfile.display()
    )
}

/// Reads the pid a test plugin wrote to its pidfile.
pub fn read_pid(pidfile: &Path) -> u32 {
    std::fs::read_to_string(pidfile)
        .expect("plugin should have written its pidfile")
        .trim()
        .parse()
        .expect("pidfile should contain a pid")
}

/// Probes process liveness with `kill -0`.
#[cfg(unix)]
pub fn process_alive(pid: u32) -> bool {
    std::process::Command::new("kill")
        .args(["-0", &pid.to_string()])
        .status()
        .expect("kill should run")
        .success()
}

/// Polls until `predicate` holds or the timeout elapses.
pub fn wait_until(timeout: Duration, mut predicate: impl FnMut() -> bool) -> bool {
    let deadline = std::time::Instant::now() + timeout;
    while std::time::Instant::now() < deadline {
        if predicate() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    predicate()
}
