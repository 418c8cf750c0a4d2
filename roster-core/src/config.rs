//! Roster configuration: known people, shift column priority and off columns

use crate::error::ConfigError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Main roster configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Known person codes, in selector order
    pub people: Vec<String>,
    /// Shift columns in priority order (first match wins)
    pub shift_columns: Vec<ShiftColumn>,
    /// Columns that mark a person as off or on leave, checked in order
    pub off_columns: Vec<String>,
    /// Header prefix identifying the date column (case-insensitive)
    pub date_column_prefix: String,
}

impl RosterConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: RosterConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Check that the configuration can actually match anything
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.people.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }

        let mut seen = HashSet::new();
        for person in &self.people {
            // A code with non-letters can never equal a token
            if person.is_empty() || !person.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(ConfigError::InvalidPersonCode(person.clone()));
            }
            if !seen.insert(person.as_str()) {
                return Err(ConfigError::DuplicatePerson(person.clone()));
            }
        }

        if self.shift_columns.is_empty() {
            return Err(ConfigError::NoShiftColumns);
        }

        let mut columns = HashSet::new();
        let all_columns = self
            .shift_columns
            .iter()
            .map(|c| c.name.as_str())
            .chain(self.off_columns.iter().map(String::as_str));
        for name in all_columns {
            if !columns.insert(name) {
                return Err(ConfigError::DuplicateColumn(name.to_string()));
            }
        }

        if self.date_column_prefix.trim().is_empty() {
            return Err(ConfigError::EmptyDatePrefix);
        }

        Ok(())
    }

    /// Check if a code belongs to the roster (exact, case-sensitive)
    pub fn is_known_person(&self, code: &str) -> bool {
        self.people.iter().any(|p| p == code)
    }

    /// Check if a header names the date column
    pub fn is_date_header(&self, header: &str) -> bool {
        let prefix = self.date_column_prefix.trim().to_uppercase();
        header.trim().to_uppercase().starts_with(&prefix)
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            people: ["VB", "RR", "ST", "SRB", "AH"]
                .into_iter()
                .map(String::from)
                .collect(),
            shift_columns: vec![
                ShiftColumn::new("1st"),
                ShiftColumn::new("2nd"),
                ShiftColumn::new("3rd"),
                ShiftColumn::new("General"),
                ShiftColumn::with_label("LW/NI", "Line Walking (LW/NI)"),
            ],
            off_columns: vec!["Off".to_string(), "Leave".to_string()],
            date_column_prefix: "DATE".to_string(),
        }
    }
}

/// A shift category column and how its assignment is displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftColumn {
    pub name: String,
    /// Display label; defaults to "<name> Shift"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ShiftColumn {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
        }
    }

    pub fn with_label(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: Some(label.into()),
        }
    }

    /// Label shown when a person is assigned to this column
    pub fn display_label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("{} Shift", self.name),
        }
    }
}
