//! Runtime settings shared by the converter, the text writers and the function layer.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings for a [`FunctionContext`][crate::function::FunctionContext].
///
/// Every field has a default, so a partial JSON document is accepted:
///
/// ```
/// use geoexact::config::BridgeConfig;
///
/// let config = BridgeConfig::from_json(r#"{"output_precision": 6}"#).unwrap();
/// assert_eq!(config.output_precision, 6);
/// assert_eq!(config.max_nesting_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Decimal digits written by `geometry_out`. A negative value writes the shortest
    /// text that reads back to the same double.
    ///
    /// `ref_out` and `exact_out` always write exact `num/den` notation.
    pub output_precision: i32,

    /// Decimal digits used when rendering inputs of a failed call.
    pub diagnostic_precision: i32,

    /// Deepest collection nesting accepted by the converter and the readers.
    pub max_nesting_depth: usize,

    /// Segments per quarter circle used by `offset_polygon`.
    pub offset_segments: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            output_precision: 15,
            diagnostic_precision: -1,
            max_nesting_depth: 64,
            offset_segments: 8,
        }
    }
}

impl BridgeConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Parse a configuration from a JSON reader, such as an open file.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Serialize this configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = BridgeConfig::from_json("{}").unwrap();
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn reader_and_round_trip() {
        let config = BridgeConfig {
            output_precision: 3,
            diagnostic_precision: 2,
            max_nesting_depth: 8,
            offset_segments: 4,
        };
        let json = config.to_json().unwrap();
        let parsed = BridgeConfig::from_reader(json.as_bytes()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn rejects_wrong_field_type() {
        assert!(BridgeConfig::from_json(r#"{"max_nesting_depth": "deep"}"#).is_err());
    }
}
