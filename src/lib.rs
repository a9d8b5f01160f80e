//! update-checker - Composer package update checker library
//!
//! This library provides the core functionality for checking installed
//! Composer packages against their repositories:
//! - Stability classification and version ordering
//! - Constrained ("available") and unconstrained ("latest") update resolution
//! - Branch tracking by content hash
//! - Packagist, Composer repository and local index metadata sources

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod registry;
pub mod update;
