//! INI file configuration adapter.

use crate::domain::error::BacktesterError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BacktesterError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| BacktesterError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, BacktesterError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| BacktesterError::ConfigParse {
                file: "<string>".into(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, BacktesterError> {
        match self.config.getfloat(section, key) {
            Ok(value) => Ok(value.unwrap_or(default)),
            Err(_) => {
                let raw = self.config.get(section, key).unwrap_or_default();
                Err(BacktesterError::invalid(
                    section,
                    key,
                    format!("'{raw}' is not a number"),
                ))
            }
        }
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, BacktesterError> {
        match self.config.get(section, key) {
            None => Ok(default),
            Some(raw) => Self::parse_bool(&raw).ok_or_else(|| {
                BacktesterError::invalid(section, key, format!("'{raw}' is not a boolean"))
            }),
        }
    }
}
