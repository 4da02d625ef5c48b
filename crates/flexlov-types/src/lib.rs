//! Shared types, schema bindings, adapter traits, and core utilities for flexlov.
//!
//! This crate contains the foundational types that are shared between the
//! engine crate and the storage adapter implementations. Keeping them in a
//! separate crate lets adapters compile without pulling in the engine.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod binding;
pub mod defaults;
pub mod error;
pub mod hooks;
pub mod lov_adapter;
pub mod prelude;
pub mod types;

// vim: ts=4
