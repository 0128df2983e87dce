//! Configuration system
//!
//! Loads ~/.config/corkboard/config.yaml with support for:
//! - API base URL and request timeout
//! - Retry policy for ordinary requests
//! - Retry policy for drag-and-drop persistence
//!
//! Every field has a default, so a missing file is not an error for callers
//! that use `CorkboardConfig::load_or_default`.

mod corkboard_config;
pub mod validation;

pub use corkboard_config::{ApiConfig, CorkboardConfig, RetrySettings, API_URL_ENV};
pub use validation::{validate_config, validate_config_result, ValidationError};
