//! Directory enumeration
//!
//! Walks a root and produces normalized `(kind, path)` pairs for the registry.

pub mod path;
pub mod walker;
