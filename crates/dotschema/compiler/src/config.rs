// Dotlanth
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Configuration types for the class analyzer

use dotschema_common::DataType;
use serde::{Deserialize, Serialize};

/// Configuration for the class analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Type used in place of references that cannot be resolved or carry a pattern
    pub fallback_type: DataType,
    /// Name of the wildcard field added to mixed content classes
    pub mixed_content_name: String,
    /// Emit every class when no element, complex type or enumeration survives
    pub select_all_when_empty: bool,
    /// Rename clashing fields to a hash of their local name as a last resort
    pub hash_duplicate_names: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fallback_type: DataType::String,
            mixed_content_name: "content".to_string(),
            select_all_when_empty: true,
            hash_duplicate_names: true,
        }
    }
}

impl AnalyzerConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from a TOML document, missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Set the fallback type
    pub fn with_fallback_type(mut self, fallback_type: DataType) -> Self {
        self.fallback_type = fallback_type;
        self
    }

    /// Set the mixed content field name
    pub fn with_mixed_content_name(mut self, name: impl Into<String>) -> Self {
        self.mixed_content_name = name.into();
        self
    }

    /// Enable or disable the fallback to all classes
    pub fn with_select_all_when_empty(mut self, enable: bool) -> Self {
        self.select_all_when_empty = enable;
        self
    }

    /// Enable or disable hashed field names
    pub fn with_hash_duplicate_names(mut self, enable: bool) -> Self {
        self.hash_duplicate_names = enable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.fallback_type, DataType::String);
        assert_eq!(config.mixed_content_name, "content");
        assert!(config.select_all_when_empty);
        assert!(config.hash_duplicate_names);
    }

    #[test]
    fn test_config_builder() {
        let config = AnalyzerConfig::new()
            .with_fallback_type(DataType::AnySimpleType)
            .with_mixed_content_name("text")
            .with_select_all_when_empty(false)
            .with_hash_duplicate_names(false);

        assert_eq!(config.fallback_type, DataType::AnySimpleType);
        assert_eq!(config.mixed_content_name, "text");
        assert!(!config.select_all_when_empty);
        assert!(!config.hash_duplicate_names);
    }

    #[test]
    fn test_from_toml_str() {
        let config = AnalyzerConfig::from_toml_str("fallback_type = \"anySimpleType\"\nselect_all_when_empty = false\n").unwrap();
        assert_eq!(config.fallback_type, DataType::AnySimpleType);
        assert!(!config.select_all_when_empty);
        assert_eq!(config.mixed_content_name, "content");

        assert!(AnalyzerConfig::from_toml_str("fallback_type = \"bogus\"").is_err());
    }
}
