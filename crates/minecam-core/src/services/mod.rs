//! Core services orchestrating ports.

mod settings_service;

pub use settings_service::SettingsService;
