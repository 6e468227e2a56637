//! Integration tests for the fict integrity ledger

mod approval;
mod checkpoint_roundtrip;
mod config_integration;
mod external_tools;
mod ledger_lifecycle;
mod test_utils;
