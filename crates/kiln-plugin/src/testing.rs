//! Test support: shell-script plugins.
//!
//! Real plugin subprocesses for tests, as small `sh` scripts speaking the
//! wire protocol of [`proto`](crate::proto). Unix only — the scripts rely
//! on `/bin/sh`.
//!
//! Every script writes its own pid to `$KILN_TEST_PIDFILE` when that
//! variable is set, so tests can verify the subprocess is really gone
//! after cleanup.

use std::path::PathBuf;
use tempfile::TempDir;

/// Command plugin that answers every request with exit code 0.
pub const ECHO_COMMAND_PLUGIN: &str = r#"#!/bin/sh
[ -n "$KILN_TEST_PIDFILE" ] && echo $$ > "$KILN_TEST_PIDFILE"
echo '{"protocol":1,"kind":"command"}'
while read line; do
  echo '{"ok":true,"value":0}'
done
"#;

/// Builder plugin that echoes the request payload back as the artifact.
pub const ECHO_BUILDER_PLUGIN: &str = r#"#!/bin/sh
[ -n "$KILN_TEST_PIDFILE" ] && echo $$ > "$KILN_TEST_PIDFILE"
echo '{"protocol":1,"kind":"builder"}'
while read line; do
  echo '{"ok":true,"value":{"artifact":"test"}}'
done
"#;

/// Plugin that announces kind `builder` — used to exercise kind-mismatch
/// rejection when configured as a command.
pub const WRONG_KIND_PLUGIN: &str = r#"#!/bin/sh
echo '{"protocol":1,"kind":"builder"}'
while read line; do
  echo '{"ok":true,"value":null}'
done
"#;

/// Command plugin that completes the handshake and then never responds.
pub const HANGING_COMMAND_PLUGIN: &str = r#"#!/bin/sh
[ -n "$KILN_TEST_PIDFILE" ] && echo $$ > "$KILN_TEST_PIDFILE"
echo '{"protocol":1,"kind":"command"}'
exec sleep 600
"#;

/// Returns a command plugin script reporting the given exit code.
#[must_use]
pub fn exit_code_command_plugin(code: i32) -> String {
    format!(
        r#"#!/bin/sh
[ -n "$KILN_TEST_PIDFILE" ] && echo $$ > "$KILN_TEST_PIDFILE"
echo '{{"protocol":1,"kind":"command"}}'
while read line; do
  echo '{{"ok":true,"value":{code}}}'
done
"#
    )
}

/// Writes `content` as an executable script in a fresh temp dir.
///
/// Returns the script path and the directory guard — keep the guard alive
/// for the duration of the test.
#[must_use]
pub fn script_plugin(content: &str) -> (PathBuf, TempDir) {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().expect("should create temp dir for plugin script");
    let path = dir.path().join("plugin.sh");
    std::fs::write(&path, content).expect("should write plugin script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("should mark plugin script executable");
    (path, dir)
}
