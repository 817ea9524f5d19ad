use std::env;
use crate::error::{Result, LrcSyncError};

/// Environment variable configuration constants
pub struct EnvVars;

impl EnvVars {
    pub const FEED_MODE: &'static str = "LRCSYNC_FEED_MODE";
    pub const POLL_INTERVAL_MS: &'static str = "LRCSYNC_POLL_INTERVAL_MS";
    pub const CONTEXT_LINES: &'static str = "LRCSYNC_CONTEXT_LINES";
    pub const PREFER_EMBEDDED_LYRICS: &'static str = "LRCSYNC_PREFER_EMBEDDED_LYRICS";
    pub const END_GRACE_SECONDS: &'static str = "LRCSYNC_END_GRACE_SECONDS";
}

/// Environment variable parsing utilities with validation
pub struct EnvParser;

impl EnvParser {
    /// Parse environment variable as string with validation
    pub fn parse_string(var_name: &str, validator: Option<fn(&str) -> Result<()>>) -> Result<Option<String>> {
        match env::var(var_name) {
            Ok(value) => {
                let trimmed = value.trim().to_string();
                if trimmed.is_empty() {
                    return Ok(None);
                }

                if let Some(validate_fn) = validator {
                    validate_fn(&trimmed)?;
                }

                Ok(Some(trimmed))
            }
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => {
                Err(LrcSyncError::Validation(format!(
                    "Environment variable {} contains invalid UTF-8",
                    var_name
                )))
            }
        }
    }

    /// Parse environment variable as boolean
    pub fn parse_bool(var_name: &str) -> Result<Option<bool>> {
        if let Some(value_str) = Self::parse_string(var_name, None)? {
            match value_str.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(Some(true)),
                "false" | "0" | "no" | "off" => Ok(Some(false)),
                _ => Err(LrcSyncError::Validation(format!(
                    "Invalid boolean value in {}: '{}'. Use: true/false, 1/0, yes/no, on/off",
                    var_name, value_str
                )))
            }
        } else {
            Ok(None)
        }
    }

    /// Parse environment variable as u64 with range validation
    pub fn parse_u64(var_name: &str, min: u64, max: u64) -> Result<Option<u64>> {
        Self::parse_in_range(var_name, min, max)
    }

    /// Parse environment variable as usize with range validation
    pub fn parse_usize(var_name: &str, min: usize, max: usize) -> Result<Option<usize>> {
        Self::parse_in_range(var_name, min, max)
    }

    fn parse_in_range<T>(var_name: &str, min: T, max: T) -> Result<Option<T>>
    where
        T: std::str::FromStr + PartialOrd + std::fmt::Display + Copy,
    {
        let Some(value_str) = Self::parse_string(var_name, None)? else {
            return Ok(None);
        };

        let value = value_str.parse::<T>().map_err(|_| {
            LrcSyncError::Validation(format!(
                "Invalid number in {}: '{}'. Must be a positive integer",
                var_name, value_str
            ))
        })?;

        if value < min || value > max {
            return Err(LrcSyncError::Validation(format!(
                "Value in {} must be between {} and {}, got {}",
                var_name, min, max, value
            )));
        }

        Ok(Some(value))
    }
}
