//! Data models for the endpoint switcher

pub mod candidates;
pub mod config;
pub mod settings;

// Re-export main model types
pub use candidates::{AddReport, CandidateList};
pub use config::Config;
pub use settings::{mask_token, SettingKey, SettingUpdate, TargetSettings};
