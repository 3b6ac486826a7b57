//! Configuration access port trait.

use crate::domain::error::BacktesterError;

/// Typed getters fall back to `default` only when the key is absent; a value
/// that is present but malformed is a `ConfigInvalid` error.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, BacktesterError>;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, BacktesterError>;

    /// A float that must be present and numeric.
    fn require_double(&self, section: &str, key: &str) -> Result<f64, BacktesterError> {
        if self.get_string(section, key).is_none() {
            return Err(BacktesterError::missing(section, key));
        }
        self.get_double(section, key, 0.0)
    }

    /// A non-negative integer; `default` when absent.
    fn get_count(&self, section: &str, key: &str, default: usize) -> Result<usize, BacktesterError> {
        match self.get_string(section, key) {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|_| {
                BacktesterError::invalid(
                    section,
                    key,
                    format!("'{raw}' is not a non-negative integer"),
                )
            }),
        }
    }
}
