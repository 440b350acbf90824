//! Builtin `null` builder.

use async_trait::async_trait;
use kiln_component::{Builder, ComponentError};
use serde_json::{json, Value};

/// Builder that produces no artifact.
///
/// Useful for exercising a template's hooks and provisioners without
/// paying for a real image build.
pub struct NullBuilder;

#[async_trait]
impl Builder for NullBuilder {
    async fn build(&self, _request: Value) -> Result<Value, ComponentError> {
        Ok(json!({ "artifact": Value::Null }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_builder_produces_no_artifact() {
        let out = NullBuilder
            .build(json!({"iso": "ignored.iso"}))
            .await
            .expect("should build");
        assert!(out["artifact"].is_null());
    }
}
