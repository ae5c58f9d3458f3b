//! Configuration module for Symposium.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{ApiSettings, GeneralSettings, PlayerSettings, Settings, SyncSettings};
