//! Builtin `version` command.

use async_trait::async_trait;
use kiln_component::{Command, ComponentError};

/// Prints the tool version and exits 0.
pub struct VersionCommand;

#[async_trait]
impl Command for VersionCommand {
    fn synopsis(&self) -> &str {
        "print the kiln version"
    }

    async fn run(&self, _args: &[String]) -> Result<i32, ComponentError> {
        println!("kiln {}", env!("CARGO_PKG_VERSION"));
        Ok(0)
    }
}
