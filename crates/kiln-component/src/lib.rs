//! Component traits for kiln.
//!
//! This crate defines the interface boundary between the kiln runtime and
//! the behavioral pieces it resolves by name: builders, commands, hooks,
//! and provisioners. The runtime never knows whether a component is
//! compiled in or backed by an external plugin subprocess — both sides of
//! that split implement the same traits.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Plugin SDK Layer                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  kiln-types     : ComponentKind, ErrorCode                   │
//! │  kiln-component : Builder / Command / Hook /      ◄── HERE   │
//! │                   Provisioner traits                         │
//! │  kiln-plugin    : out-of-process adapters for the traits     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Payload Convention
//!
//! Builders, hooks, and provisioners exchange `serde_json::Value` payloads;
//! the shape of a payload is a contract between a template and the
//! component it names, not something the runtime interprets. Commands take
//! the raw argument list and report a process-style exit code.

mod component;
mod error;

pub use component::{Builder, Command, Hook, Provisioner};
pub use error::ComponentError;
