//! Layout configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Grid side used when nothing else is configured.
pub const DEFAULT_MAX_SPAN: usize = 12;

/// Largest grid side accepted by [`TilingConfig::validate`].
pub const MAX_SPAN_LIMIT: usize = u16::MAX as usize;

/// Settings for a [`TilingLayout`](crate::TilingLayout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilingConfig {
    /// Side of the square grid. Bounds how many times a pane can be split
    /// along one axis.
    pub max_span: usize,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            max_span: DEFAULT_MAX_SPAN,
        }
    }
}

impl TilingConfig {
    /// Validated configuration for a grid of side `max_span`.
    pub fn new(max_span: usize) -> Result<Self, ConfigError> {
        let config = Self { max_span };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.max_span {
            0 => Err(ConfigError::ZeroSpan),
            span if span > MAX_SPAN_LIMIT => Err(ConfigError::SpanTooLarge { max_span: span }),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    ZeroSpan,
    SpanTooLarge { max_span: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSpan => write!(f, "max_span must be at least 1"),
            Self::SpanTooLarge { max_span } => write!(
                f,
                "max_span {max_span} exceeds the limit of {MAX_SPAN_LIMIT}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_span() {
        assert_eq!(TilingConfig::default().max_span, 12);
        assert_eq!(TilingConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_out_of_range_spans() {
        assert_eq!(TilingConfig::new(0), Err(ConfigError::ZeroSpan));
        assert_eq!(
            TilingConfig::new(MAX_SPAN_LIMIT + 1),
            Err(ConfigError::SpanTooLarge {
                max_span: MAX_SPAN_LIMIT + 1
            })
        );
        assert_eq!(TilingConfig::new(1).map(|c| c.max_span), Ok(1));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: TilingConfig = serde_json::from_str("{}").expect("empty object");
        assert_eq!(config, TilingConfig::default());
        let config: TilingConfig = serde_json::from_str(r#"{"max_span":4}"#).expect("span");
        assert_eq!(config.max_span, 4);
    }
}
