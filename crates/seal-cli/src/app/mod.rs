//! Application-level utilities for the Seal CLI.
//!
//! This module provides:
//! - The per-invocation context (CLI flags plus lazily loaded config)
//! - Key store, editor and prompt construction from that context

mod context;

pub use context::AppContext;
