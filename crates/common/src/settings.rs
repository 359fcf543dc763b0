//! Per-session settings consulted by the access gate and the handlers.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Value;

/// The `readonly` setting.
///
/// `AllowSettings` is the level the HTTP interface applies to GET requests:
/// statements still cannot modify data or schema, but the client may change
/// settings and work with temporary tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ReadonlyLevel {
    #[default]
    Disabled,
    Absolute,
    AllowSettings,
}

impl ReadonlyLevel {
    pub fn is_readonly(self) -> bool {
        !matches!(self, ReadonlyLevel::Disabled)
    }

    pub fn as_u8(self) -> u8 {
        match self {
            ReadonlyLevel::Disabled => 0,
            ReadonlyLevel::Absolute => 1,
            ReadonlyLevel::AllowSettings => 2,
        }
    }
}

impl TryFrom<u8> for ReadonlyLevel {
    type Error = String;

    fn try_from(level: u8) -> std::result::Result<Self, Self::Error> {
        match level {
            0 => Ok(ReadonlyLevel::Disabled),
            1 => Ok(ReadonlyLevel::Absolute),
            2 => Ok(ReadonlyLevel::AllowSettings),
            other => Err(format!("readonly must be 0, 1 or 2, got {}", other)),
        }
    }
}

impl From<ReadonlyLevel> for u8 {
    fn from(level: ReadonlyLevel) -> Self {
        level.as_u8()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub readonly: ReadonlyLevel,
    pub allow_ddl: bool,
    pub insert_allow_materialized_columns: bool,
    pub max_threads: u64,
    pub log_queries: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            readonly: ReadonlyLevel::Disabled,
            allow_ddl: true,
            insert_allow_materialized_columns: false,
            max_threads: 8,
            log_queries: false,
        }
    }
}

impl Settings {
    pub const NAMES: &'static [&'static str] = &[
        "readonly",
        "allow_ddl",
        "insert_allow_materialized_columns",
        "max_threads",
        "log_queries",
    ];

    pub fn readonly() -> Self {
        Self {
            readonly: ReadonlyLevel::Absolute,
            ..Self::default()
        }
    }

    pub fn with_readonly(mut self, level: ReadonlyLevel) -> Self {
        self.readonly = level;
        self
    }

    pub fn with_allow_ddl(mut self, allow_ddl: bool) -> Self {
        self.allow_ddl = allow_ddl;
        self
    }

    pub fn with_insert_allow_materialized_columns(mut self, allow: bool) -> Self {
        self.insert_allow_materialized_columns = allow;
        self
    }

    /// Current value rendered as a string, `None` for unknown names.
    pub fn get(&self, name: &str) -> Option<String> {
        let flag = |b: bool| String::from(if b { "1" } else { "0" });
        match name {
            "readonly" => Some(self.readonly.as_u8().to_string()),
            "allow_ddl" => Some(flag(self.allow_ddl)),
            "insert_allow_materialized_columns" => {
                Some(flag(self.insert_allow_materialized_columns))
            }
            "max_threads" => Some(self.max_threads.to_string()),
            "log_queries" => Some(flag(self.log_queries)),
            _ => None,
        }
    }

    pub fn set(&mut self, name: &str, value: &Value) -> Result<()> {
        match name {
            "readonly" => {
                let level = value
                    .as_i64()
                    .and_then(|n| u8::try_from(n).ok())
                    .ok_or_else(|| Self::type_error(name, value))?;
                self.readonly = ReadonlyLevel::try_from(level).map_err(Error::InvalidQuery)?;
            }
            "allow_ddl" => self.allow_ddl = Self::bool_value(name, value)?,
            "insert_allow_materialized_columns" => {
                self.insert_allow_materialized_columns = Self::bool_value(name, value)?
            }
            "max_threads" => {
                self.max_threads = value
                    .as_i64()
                    .and_then(|n| u64::try_from(n).ok())
                    .ok_or_else(|| Self::type_error(name, value))?
            }
            "log_queries" => self.log_queries = Self::bool_value(name, value)?,
            _ => return Err(Error::UnknownSetting(name.to_string())),
        }
        Ok(())
    }

    fn bool_value(name: &str, value: &Value) -> Result<bool> {
        value.as_bool().ok_or_else(|| Self::type_error(name, value))
    }

    fn type_error(name: &str, value: &Value) -> Error {
        Error::invalid_query(format!(
            "Cannot parse value {} for setting '{}'",
            value.to_sql_literal(),
            name
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_allow_everything() {
        let settings = Settings::default();
        assert!(!settings.readonly.is_readonly());
        assert!(settings.allow_ddl);
        assert!(!settings.insert_allow_materialized_columns);
    }

    #[test]
    fn test_set_and_get_round_through_strings() {
        let mut settings = Settings::default();
        settings.set("readonly", &Value::Int64(2)).unwrap();
        settings.set("allow_ddl", &Value::string("false")).unwrap();
        settings.set("max_threads", &Value::Int64(16)).unwrap();

        assert_eq!(settings.readonly, ReadonlyLevel::AllowSettings);
        assert_eq!(settings.get("readonly").as_deref(), Some("2"));
        assert_eq!(settings.get("allow_ddl").as_deref(), Some("0"));
        assert_eq!(settings.get("max_threads").as_deref(), Some("16"));
    }

    #[test]
    fn test_set_rejects_unknown_and_ill_typed() {
        let mut settings = Settings::default();
        assert_eq!(
            settings.set("no_such_setting", &Value::Int64(1)),
            Err(Error::UnknownSetting("no_such_setting".to_string()))
        );
        assert!(matches!(
            settings.set("readonly", &Value::Int64(7)),
            Err(Error::InvalidQuery(_))
        ));
        assert!(matches!(
            settings.set("allow_ddl", &Value::string("maybe")),
            Err(Error::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_every_named_setting_is_readable() {
        let settings = Settings::default();
        for name in Settings::NAMES {
            assert!(settings.get(name).is_some(), "missing getter for {}", name);
        }
    }
}
