#![forbid(unsafe_code)]

//! List configuration.
//!
//! Built in code with `with_*` methods, or read from `VSCROLL_*`
//! environment variables. Environment parsing never fails outright: bad
//! values are skipped and reported alongside the resulting config.

use crate::scrollbar::DEFAULT_MIN_THUMB;
use crate::scroll_to::MAX_TIMES;
use std::env;
use std::fmt;

const ENV_HEIGHT: &str = "VSCROLL_HEIGHT";
const ENV_ITEM_HEIGHT: &str = "VSCROLL_ITEM_HEIGHT";
const ENV_VIRTUAL: &str = "VSCROLL_VIRTUAL";
const ENV_FULL_HEIGHT: &str = "VSCROLL_FULL_HEIGHT";
const ENV_MIN_THUMB: &str = "VSCROLL_MIN_THUMB";
const ENV_SCROLL_TO_RETRIES: &str = "VSCROLL_SCROLL_TO_RETRIES";
const ENV_DEV_WARNINGS: &str = "VSCROLL_DEV_WARNINGS";

/// How the container's height relates to the configured height.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContainerSizing {
    /// Exactly this tall.
    Fixed(f64),
    /// At most this tall; shrinks to short content.
    Max(f64),
    /// No height configured; the container sizes to content.
    Auto,
}

/// Configuration of a virtual list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VirtualListConfig {
    /// Viewport height in pixels. Windowing needs it.
    pub height: Option<f64>,
    /// Fallback height for unmeasured rows. Windowing needs it.
    pub item_height: Option<f64>,
    /// Set to `false` to always render every row.
    pub virtual_enabled: bool,
    /// Container is exactly `height` tall (otherwise at most).
    pub full_height: bool,
    /// Content width, enabling horizontal scrolling when wider than `width`.
    pub scroll_width: Option<f64>,
    /// Viewport width.
    pub width: f64,
    /// Smallest scrollbar thumb.
    pub min_thumb_size: f64,
    /// Iteration cap of a convergent scroll-to.
    pub scroll_to_retries: u32,
    /// Log development warnings (duplicate keys, scroll-to exhaustion).
    pub dev_warnings: bool,
}

impl Default for VirtualListConfig {
    fn default() -> Self {
        Self {
            height: None,
            item_height: None,
            virtual_enabled: true,
            full_height: true,
            scroll_width: None,
            width: 0.0,
            min_thumb_size: DEFAULT_MIN_THUMB,
            scroll_to_retries: MAX_TIMES,
            dev_warnings: cfg!(debug_assertions),
        }
    }
}

/// Configuration parse result with diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigParse {
    pub config: VirtualListConfig,
    pub errors: Vec<ConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl VirtualListConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Viewport height and fallback item height together, the usual way to
    /// turn windowing on.
    #[must_use]
    pub fn windowed(height: f64, item_height: f64) -> Self {
        Self::default()
            .with_height(height)
            .with_item_height(item_height)
    }

    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_item_height(mut self, item_height: f64) -> Self {
        self.item_height = Some(item_height);
        self
    }

    #[must_use]
    pub fn with_virtual(mut self, enabled: bool) -> Self {
        self.virtual_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_full_height(mut self, full: bool) -> Self {
        self.full_height = full;
        self
    }

    #[must_use]
    pub fn with_scroll_width(mut self, scroll_width: f64, width: f64) -> Self {
        self.scroll_width = Some(scroll_width);
        self.width = width;
        self
    }

    #[must_use]
    pub fn with_min_thumb_size(mut self, size: f64) -> Self {
        self.min_thumb_size = size;
        self
    }

    #[must_use]
    pub fn with_scroll_to_retries(mut self, retries: u32) -> Self {
        self.scroll_to_retries = retries;
        self
    }

    #[must_use]
    pub fn with_dev_warnings(mut self, on: bool) -> Self {
        self.dev_warnings = on;
        self
    }

    /// Container sizing implied by `height` and `full_height`.
    #[must_use]
    pub fn container_sizing(&self) -> ContainerSizing {
        match (self.height, self.full_height) {
            (Some(h), true) => ContainerSizing::Fixed(h),
            (Some(h), false) => ContainerSizing::Max(h),
            (None, _) => ContainerSizing::Auto,
        }
    }

    /// Parse config from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> ConfigParse {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Parse config from an arbitrary variable source.
    pub fn from_env_with<F>(mut get: F) -> ConfigParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let mut errors = Vec::new();

        if let Some(value) = get(ENV_HEIGHT) {
            match parse_positive(&value) {
                Some(h) => config.height = Some(h),
                None => errors.push(ConfigError::new("height", value, "expected a positive number")),
            }
        }
        if let Some(value) = get(ENV_ITEM_HEIGHT) {
            match parse_positive(&value) {
                Some(h) => config.item_height = Some(h),
                None => errors.push(ConfigError::new(
                    "item_height",
                    value,
                    "expected a positive number",
                )),
            }
        }
        if let Some(value) = get(ENV_VIRTUAL) {
            match parse_bool(&value) {
                Some(b) => config.virtual_enabled = b,
                None => errors.push(ConfigError::new("virtual", value, "expected boolean")),
            }
        }
        if let Some(value) = get(ENV_FULL_HEIGHT) {
            match parse_bool(&value) {
                Some(b) => config.full_height = b,
                None => errors.push(ConfigError::new("full_height", value, "expected boolean")),
            }
        }
        if let Some(value) = get(ENV_MIN_THUMB) {
            match parse_positive(&value) {
                Some(size) => config.min_thumb_size = size,
                None => errors.push(ConfigError::new(
                    "min_thumb_size",
                    value,
                    "expected a positive number",
                )),
            }
        }
        if let Some(value) = get(ENV_SCROLL_TO_RETRIES) {
            match value.trim().parse::<u32>() {
                Ok(n) if n > 0 => config.scroll_to_retries = n,
                _ => errors.push(ConfigError::new(
                    "scroll_to_retries",
                    value,
                    "expected an integer >= 1",
                )),
            }
        }
        if let Some(value) = get(ENV_DEV_WARNINGS) {
            match parse_bool(&value) {
                Some(b) => config.dev_warnings = b,
                None => errors.push(ConfigError::new("dev_warnings", value, "expected boolean")),
            }
        }

        if let Err(mut invalid) = config.validate() {
            errors.append(&mut invalid);
        }
        ConfigParse { config, errors }
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        validate_optional_positive("height", self.height, &mut errors);
        validate_optional_positive("item_height", self.item_height, &mut errors);
        validate_optional_positive("scroll_width", self.scroll_width, &mut errors);
        if !self.width.is_finite() || self.width < 0.0 {
            errors.push(ConfigError::new("width", self.width.to_string(), "must be >= 0"));
        }
        if !self.min_thumb_size.is_finite() || self.min_thumb_size < 0.0 {
            errors.push(ConfigError::new(
                "min_thumb_size",
                self.min_thumb_size.to_string(),
                "must be >= 0",
            ));
        }
        if self.scroll_to_retries == 0 {
            errors.push(ConfigError::new("scroll_to_retries", "0", "must be >= 1"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_positive(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

fn validate_optional_positive(field: &'static str, value: Option<f64>, errors: &mut Vec<ConfigError>) {
    if let Some(v) = value
        && !(v.is_finite() && v > 0.0)
    {
        errors.push(ConfigError::new(field, v.to_string(), "must be > 0"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(vars: &[(&str, &str)]) -> ConfigParse {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        VirtualListConfig::from_env_with(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_validate() {
        let config = VirtualListConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.virtual_enabled);
        assert_eq!(config.container_sizing(), ContainerSizing::Auto);
    }

    #[test]
    fn env_parses_all_fields() {
        let parsed = parse(&[
            ("VSCROLL_HEIGHT", "200"),
            ("VSCROLL_ITEM_HEIGHT", "20.5"),
            ("VSCROLL_VIRTUAL", "off"),
            ("VSCROLL_FULL_HEIGHT", "false"),
            ("VSCROLL_MIN_THUMB", "40"),
            ("VSCROLL_SCROLL_TO_RETRIES", "4"),
            ("VSCROLL_DEV_WARNINGS", "yes"),
        ]);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        let c = parsed.config;
        assert_eq!(c.height, Some(200.0));
        assert_eq!(c.item_height, Some(20.5));
        assert!(!c.virtual_enabled);
        assert_eq!(c.container_sizing(), ContainerSizing::Max(200.0));
        assert_eq!(c.min_thumb_size, 40.0);
        assert_eq!(c.scroll_to_retries, 4);
        assert!(c.dev_warnings);
    }

    #[test]
    fn bad_values_are_reported_and_skipped() {
        let parsed = parse(&[
            ("VSCROLL_HEIGHT", "-5"),
            ("VSCROLL_VIRTUAL", "maybe"),
            ("VSCROLL_SCROLL_TO_RETRIES", "0"),
        ]);
        let fields: Vec<&str> = parsed.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["height", "virtual", "scroll_to_retries"]);
        assert_eq!(parsed.config.height, None);
        assert!(parsed.config.virtual_enabled);
        assert_eq!(parsed.config.scroll_to_retries, MAX_TIMES);
    }

    #[test]
    fn validate_collects_every_violation() {
        let config = VirtualListConfig::default()
            .with_height(0.0)
            .with_item_height(f64::NAN)
            .with_scroll_to_retries(0);
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].to_string(), "height=0 (must be > 0)");
    }

    #[test]
    fn windowed_builder() {
        let c = VirtualListConfig::windowed(200.0, 20.0);
        assert_eq!(c.container_sizing(), ContainerSizing::Fixed(200.0));
        assert_eq!(c.item_height, Some(20.0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let config: VirtualListConfig =
            serde_json::from_str(r#"{"height":300.0,"item_height":24.0}"#).unwrap();
        assert_eq!(config, VirtualListConfig::windowed(300.0, 24.0));
    }
}
