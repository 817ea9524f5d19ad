use std::path::Path;
use crate::error::{Result, LrcSyncError};

/// Centralized configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate numeric range
    pub fn validate_range<T>(value: T, min: T, max: T, field_name: &str) -> Result<()>
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        if value < min || value > max {
            return Err(LrcSyncError::Validation(format!(
                "{} must be between {} and {}, got {}",
                field_name, min, max, value
            )));
        }
        Ok(())
    }

    /// Validate that a config file path points at a TOML file
    pub fn validate_toml_path(path: &Path) -> Result<()> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(()),
            _ => Err(LrcSyncError::Validation(format!(
                "Config file should have a .toml extension, got: {}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_range() {
        assert!(ConfigValidator::validate_range(5u64, 1u64, 10u64, "test").is_ok());
        assert!(ConfigValidator::validate_range(15u64, 1u64, 10u64, "test").is_err());
        assert!(ConfigValidator::validate_range(0u64, 1u64, 10u64, "test").is_err());
    }

    #[test]
    fn test_validate_toml_path() {
        assert!(ConfigValidator::validate_toml_path(&PathBuf::from("config.toml")).is_ok());
        assert!(ConfigValidator::validate_toml_path(&PathBuf::from("Config.TOML")).is_ok());
        assert!(ConfigValidator::validate_toml_path(&PathBuf::from("config.json")).is_err());
        assert!(ConfigValidator::validate_toml_path(&PathBuf::from("config")).is_err());
    }
}
