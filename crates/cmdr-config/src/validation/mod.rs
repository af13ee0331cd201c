//! Full configuration validation.
//!
//! Each section has its own check; this orchestrator calls them all and
//! collects errors into a single `ConfigError`.

mod sections;


use crate::schema::CmdrConfig;
use cmdr_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &CmdrConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    sections::validate_presence(&mut errors, config);
    sections::validate_connection(&mut errors, config);
    sections::validate_journal(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
