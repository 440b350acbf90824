//! Core types for kiln.
//!
//! This crate provides the foundational types shared by every layer of the
//! kiln provisioning tool.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Plugin SDK Layer                       │
//! │  (External, SemVer stable, safe to depend on)                │
//! ├──────────────────────────────────────────────────────────────┤
//! │  kiln-types     : ComponentKind, ErrorCode        ◄── HERE   │
//! │  kiln-component : Builder / Command / Hook / Provisioner     │
//! │  kiln-plugin    : PluginClient, PluginManager                │
//! └──────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Runtime Layer                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  kiln-runtime   : config, registry, environment, signals     │
//! └──────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  Application / Frontend Layer                │
//! ├──────────────────────────────────────────────────────────────┤
//! │  kiln-app       : bootstrap + lifecycle coordination         │
//! │  kiln-cli       : command-line interface (binary: kiln)      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Why a separate crate?
//!
//! Plugins only need `ComponentKind` and the component traits. Keeping this
//! crate lean means external plugin authors never pull in the runtime.

mod error;
mod kind;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use kind::ComponentKind;
