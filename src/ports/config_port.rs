//! Configuration access port trait.

use crate::domain::error::SmatrendError;
use std::path::PathBuf;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    /// `default` when the key is absent or blank; `ConfigInvalid` when it is
    /// present but not an integer.
    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, SmatrendError>;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    fn get_path(&self, section: &str, key: &str) -> Option<PathBuf> {
        self.get_string(section, key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    }
}
