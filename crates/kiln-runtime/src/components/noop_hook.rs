//! Builtin `noop` hook.

use async_trait::async_trait;
use kiln_component::{ComponentError, Hook};
use serde_json::Value;

/// Hook that accepts every lifecycle event and does nothing.
pub struct NoopHook;

#[async_trait]
impl Hook for NoopHook {
    async fn fire(&self, _event: Value) -> Result<(), ComponentError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn noop_accepts_any_event() {
        NoopHook
            .fire(json!({"point": "pre-build"}))
            .await
            .expect("noop should never fail");
    }
}
