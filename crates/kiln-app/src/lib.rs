//! kiln application layer.
//!
//! Assembles the runtime pieces into one running application: the
//! frontend hands [`KilnApp::bootstrap`] a [`BootstrapConfig`] and gets
//! back an app whose [`run`](KilnApp::run) dispatches a command and
//! upholds the cleanup guarantee on every exit path.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Runtime Layer                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  kiln-runtime                                                │
//! └──────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Application Layer                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  kiln-app                                         ◄── HERE   │
//! │    BootstrapConfig : settings read once by the driver        │
//! │    KilnApp         : bootstrap → run → cleanup               │
//! │    AppError        : per-phase error unification             │
//! └──────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Frontend Layer                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  kiln-cli                                                    │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod app;
mod error;

pub use app::{BootstrapConfig, KilnApp};
pub use error::AppError;
