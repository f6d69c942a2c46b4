//! # Plugfind Core Kernel
//!
//! Shared foundations for the rest of the crate.
//!
//! - **Core Constants**: well-known names (manifest file, `dist` directory,
//!   log targets) via the `constants` submodule.
//! - **Error Handling**: the crate-wide [`Error`](error::Error) enum and its
//!   `Result` alias, into which the subsystem errors convert.
pub mod constants;
pub mod error;

pub use error::{Error, Result};
