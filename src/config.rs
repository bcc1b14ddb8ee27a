use crate::markup::Node;
use crate::view::controls::select_plus::{
    SelectPlusState, ValuePattern, DEFAULT_PLACEHOLDER, DEFAULT_VALUE_PATTERN,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration of one select-plus control
///
/// Mirrors the attributes and children a host would put on the element.
/// Every field is optional in the JSON form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectPlusConfig {
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Initial value (empty = nothing selected)
    #[serde(default)]
    pub value: String,

    #[serde(default = "default_false")]
    pub hide_value: bool,

    /// Regular expression a typed query must contain a match of to be adopted
    #[serde(default = "default_value_pattern")]
    pub value_pattern: String,

    /// Tab order as written on the element; negative opts out of Tab traversal
    #[serde(default = "default_tabindex")]
    pub tabindex: String,

    /// Child markup carrying the `select-plus-option` elements
    #[serde(default)]
    pub children: Vec<Node>,
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}

fn default_false() -> bool {
    false
}

fn default_value_pattern() -> String {
    DEFAULT_VALUE_PATTERN.to_string()
}

fn default_tabindex() -> String {
    "0".to_string()
}

impl Default for SelectPlusConfig {
    fn default() -> Self {
        Self {
            placeholder: default_placeholder(),
            value: String::new(),
            hide_value: false,
            value_pattern: default_value_pattern(),
            tabindex: default_tabindex(),
            children: Vec::new(),
        }
    }
}

impl SelectPlusConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: SelectPlusConfig =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Compile the value pattern
    pub fn pattern(&self) -> Result<ValuePattern, ConfigError> {
        ValuePattern::new(&self.value_pattern)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// Parse the tab index
    pub fn tab_index(&self) -> Result<i32, ConfigError> {
        self.tabindex.trim().parse().map_err(|_| {
            ConfigError::ValidationError(format!(
                "tabindex must be an integer, got {:?}",
                self.tabindex
            ))
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pattern()?;
        self.tab_index()?;
        Ok(())
    }

    /// Build a detached control from this configuration
    pub fn build_state(&self) -> Result<SelectPlusState, ConfigError> {
        let pattern = self.pattern()?;
        let tab_index = self.tab_index()?;
        Ok(SelectPlusState::new()
            .with_children(&self.children)
            .with_value(self.value.clone())
            .with_placeholder(self.placeholder.clone())
            .with_hide_value(self.hide_value)
            .with_pattern(pattern)
            .with_tab_index(tab_index))
    }
}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
