//! E2E interrupt tests for the `kiln` binary.
//!
//! Sends real signals to a running `kiln` process, so unix only. The
//! dispatched command is a plugin that hangs forever after the
//! handshake; the pidfile it writes lets the test verify the cleanup
//! guarantee from outside.
#![cfg(unix)]

mod common;

use common::{plugin_command_config, process_alive, read_pid, wait_until, write_config};
use kiln_plugin::testing::{script_plugin, HANGING_COMMAND_PLUGIN};
use std::process::{Command, Stdio};
use std::time::Duration;

fn send_signal(pid: u32, signal: &str) {
    let status = Command::new("kill")
        .args([signal, &pid.to_string()])
        .status()
        .expect("kill should run");
    assert!(status.success(), "kill {signal} {pid} should succeed");
}

/// Spawns `kiln <command>` against the given config file.
fn spawn_kiln(config_path: &std::path::Path, command: &str) -> std::process::Child {
    Command::new(env!("CARGO_BIN_EXE_kiln"))
        .args(["--config", config_path.to_str().expect("valid utf8 path")])
        .arg(command)
        .env_remove("KILN_LOG")
        .env_remove("KILN_CACHE_DIR")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("kiln binary should spawn")
}

#[test]
fn sigint_terminates_plugin_and_exits_1() {
    let (script, dir) = script_plugin(HANGING_COMMAND_PLUGIN);
    let pidfile = dir.path().join("plugin.pid");
    let config_path = write_config(
        dir.path(),
        &plugin_command_config("hang", &script, &pidfile),
    );

    let mut kiln = spawn_kiln(&config_path, "hang");

    // The plugin writes its pidfile right after spawn; once it exists the
    // dispatch is committed and the subprocess is alive.
    assert!(
        wait_until(Duration::from_secs(10), || pidfile.exists()),
        "plugin should start and write its pidfile"
    );
    let plugin_pid = read_pid(&pidfile);
    assert!(process_alive(plugin_pid));

    send_signal(kiln.id(), "-INT");

    let status = kiln.wait().expect("kiln should exit after SIGINT");
    assert_eq!(status.code(), Some(1), "interrupted run should exit 1");

    assert!(
        wait_until(Duration::from_secs(5), || !process_alive(plugin_pid)),
        "interrupt cleanup should terminate the plugin subprocess"
    );
}

#[test]
fn sigterm_terminates_plugin_and_exits_1() {
    let (script, dir) = script_plugin(HANGING_COMMAND_PLUGIN);
    let pidfile = dir.path().join("plugin.pid");
    let config_path = write_config(
        dir.path(),
        &plugin_command_config("hang", &script, &pidfile),
    );

    let mut kiln = spawn_kiln(&config_path, "hang");

    assert!(
        wait_until(Duration::from_secs(10), || pidfile.exists()),
        "plugin should start and write its pidfile"
    );
    let plugin_pid = read_pid(&pidfile);

    send_signal(kiln.id(), "-TERM");

    let status = kiln.wait().expect("kiln should exit after SIGTERM");
    assert_eq!(status.code(), Some(1));

    assert!(
        wait_until(Duration::from_secs(5), || !process_alive(plugin_pid)),
        "cleanup should terminate the plugin subprocess"
    );
}
