//! Plugin-backed component resolution through the registry.
//!
//! Uses real shell-script plugins, so unix only.
#![cfg(unix)]

use kiln_plugin::testing::{script_plugin, ECHO_COMMAND_PLUGIN, WRONG_KIND_PLUGIN};
use kiln_plugin::PluginManager;
use kiln_runtime::{BuiltinSet, ComponentLoader, ComponentRegistry, EffectiveConfig, LaunchSpec};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

fn plugin_spec(script: &Path, pidfile: &Path) -> LaunchSpec {
    let mut env = BTreeMap::new();
    env.insert(
        "KILN_TEST_PIDFILE".to_string(),
        pidfile.to_string_lossy().into_owned(),
    );
    LaunchSpec::Plugin {
        command: script.to_string_lossy().into_owned(),
        args: Vec::new(),
        env,
    }
}

fn read_pid(pidfile: &Path) -> u32 {
    std::fs::read_to_string(pidfile)
        .expect("plugin should have written its pidfile")
        .trim()
        .parse()
        .expect("pidfile should contain a pid")
}

fn process_alive(pid: u32) -> bool {
    // kill -0 probes liveness without delivering a signal.
    std::process::Command::new("kill")
        .args(["-0", &pid.to_string()])
        .status()
        .expect("kill should run")
        .success()
}

#[tokio::test]
async fn plugin_command_spawns_once_and_is_cached() {
    let (script, dir) = script_plugin(ECHO_COMMAND_PLUGIN);
    let pidfile = dir.path().join("plugin.pid");

    let mut config = EffectiveConfig::default();
    config
        .commands
        .insert("greet".into(), plugin_spec(&script, &pidfile));

    let manager = Arc::new(PluginManager::new());
    let registry = ComponentRegistry::new(config, BuiltinSet::standard(), manager.clone());

    let first = registry.load_command("greet").await.expect("should resolve");
    let second = registry.load_command("greet").await.expect("should resolve");

    assert!(Arc::ptr_eq(&first, &second), "second load should hit the cache");
    assert_eq!(manager.client_count().await, 1, "one subprocess for two loads");

    let code = first.run(&[]).await.expect("plugin command should run");
    assert_eq!(code, 0);

    let pid = read_pid(&pidfile);
    assert!(process_alive(pid));

    assert_eq!(manager.cleanup_all().await, 1);
    assert!(!process_alive(pid), "cleanup should terminate the plugin");
}

#[tokio::test]
async fn spawned_plugin_is_registered_before_handle_returns() {
    let (script, dir) = script_plugin(ECHO_COMMAND_PLUGIN);
    let pidfile = dir.path().join("plugin.pid");

    let mut config = EffectiveConfig::default();
    config
        .commands
        .insert("greet".into(), plugin_spec(&script, &pidfile));

    let manager = Arc::new(PluginManager::new());
    let registry = ComponentRegistry::new(config, BuiltinSet::standard(), manager.clone());

    let _handle = registry.load_command("greet").await.expect("should resolve");
    assert_eq!(manager.client_count().await, 1);
}

#[tokio::test]
async fn kind_mismatch_is_a_load_failure() {
    let (script, _dir) = script_plugin(WRONG_KIND_PLUGIN);

    let mut config = EffectiveConfig::default();
    config.commands.insert(
        "impostor".into(),
        LaunchSpec::Path(script.to_string_lossy().into_owned()),
    );

    let manager = Arc::new(PluginManager::new());
    let registry = ComponentRegistry::new(config, BuiltinSet::standard(), manager.clone());

    let Err(err) = registry.load_command("impostor").await else {
        panic!("kind mismatch must fail resolution");
    };
    assert!(err.to_string().contains("impostor"));
}
