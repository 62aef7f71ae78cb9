use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default upper bound on username length, in characters.
pub const DEFAULT_MAX_USERNAME_LENGTH: u32 = 32;
/// Metadata URI assigned to profiles created without one.
pub const DEFAULT_METADATA_URI: &str = "ipfs://default";

/// Process-wide identity registry parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Maximum username length, counted in characters.
    pub max_username_length: u32,
    pub default_metadata_uri: String,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_username_length: DEFAULT_MAX_USERNAME_LENGTH,
            default_metadata_uri: DEFAULT_METADATA_URI.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    #[error("max_username_length must be positive")]
    ZeroUsernameLength,
}

impl Params {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.max_username_length == 0 {
            return Err(ParamsError::ZeroUsernameLength);
        }
        Ok(())
    }

    /// Whether `username` fits within `max_username_length`.
    pub fn allows_username(&self, username: &str) -> bool {
        username.chars().count() <= self.max_username_length as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = Params::default();
        assert_eq!(params.max_username_length, 32);
        assert_eq!(params.default_metadata_uri, "ipfs://default");
        assert!(params.validate().is_ok());
    }

    #[test]
    fn zero_length_rejected() {
        let params = Params {
            max_username_length: 0,
            ..Params::default()
        };
        assert_eq!(params.validate(), Err(ParamsError::ZeroUsernameLength));
    }

    #[test]
    fn username_length_counts_characters() {
        let params = Params {
            max_username_length: 3,
            ..Params::default()
        };
        assert!(params.allows_username("abc"));
        assert!(params.allows_username("äöü"));
        assert!(!params.allows_username("abcd"));
    }
}
