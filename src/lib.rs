//! fict: File Integrity Checking Tool
//!
//! A ledger of tracked files and directories. Each entry carries a BLAKE3
//! fingerprint plus one from a selectable secondary tool. Fingerprints are
//! computed by a bounded worker pool with periodic checkpoints, and can later
//! be re-derived to detect silent changes.

pub mod checkpoint;
pub mod cli;
pub mod config;
pub mod engine;
pub mod entry;
pub mod error;
pub mod hash;
pub mod ignore;
pub mod ledger;
pub mod logging;
pub mod registry;
pub mod status;
pub mod tree;
pub mod types;
pub mod verify;
