//! Configuration module for rendicion
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Report defaults (title, logo, signatures, page orientation)

pub mod paths;
pub mod settings;

pub use paths::RendicionPaths;
pub use settings::Settings;
