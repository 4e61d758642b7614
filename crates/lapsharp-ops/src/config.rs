//! Filter configuration.
//!
//! Hosts hand filters a [`FilterConfig`]: a named, versioned bag of typed
//! properties. [`SharpenConfig`] is the typed view the sharpening filter
//! works with, converted to and from the bag.
//!
//! # Properties
//!
//! | Key | Type | Default |
//! |-----|------|---------|
//! | `depth` | int | 1 |
//! | `clip` | float | 0.45 |
//! | `scale` | float | 1.1 |
//! | `blur_a` | float | 0.5 |
//! | `threshold_scope` | text (`per_channel`, `all_channels`) | `per_channel` |
//! | `rounding` | text (`truncate`, `round`, `exact`) | `truncate` |
//!
//! Missing keys take their default.
//!
//! ```rust
//! use lapsharp_ops::config::{ConfigValue, SharpenConfig};
//!
//! let mut bag = SharpenConfig::default().to_filter_config();
//! bag.set("depth", 3);
//! bag.set("rounding", "round");
//!
//! let cfg = SharpenConfig::from_filter_config(&bag).unwrap();
//! assert_eq!(cfg.depth, 3);
//! assert_eq!(bag.get("depth"), Some(&ConfigValue::Int(3)));
//! ```

use crate::boost::{BoostParams, ThresholdScope};
use crate::recombine::RoundingPolicy;
use crate::sharpen::PyramidalSharpening;
use lapsharp_core::{Error, Result};
use std::collections::BTreeMap;

/// Deepest pyramid accepted by [`SharpenConfig::validate`].
pub const MAX_DEPTH: usize = 16;

/// A single property value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ConfigValue {
    /// Boolean flag
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// Free text
    Text(String),
}

impl ConfigValue {
    /// Integer value, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Float value; integers widen.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(v) => Some(*v),
            ConfigValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Text value, if this is `Text`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Boolean value, if this is `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Bool(_) => "bool",
            ConfigValue::Int(_) => "int",
            ConfigValue::Float(_) => "float",
            ConfigValue::Text(_) => "text",
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        ConfigValue::Bool(v)
    }
}

impl From<i64> for ConfigValue {
    fn from(v: i64) -> Self {
        ConfigValue::Int(v)
    }
}

impl From<i32> for ConfigValue {
    fn from(v: i32) -> Self {
        ConfigValue::Int(v as i64)
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        ConfigValue::Float(v)
    }
}

impl From<f32> for ConfigValue {
    fn from(v: f32) -> Self {
        ConfigValue::Float(v as f64)
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        ConfigValue::Text(v.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        ConfigValue::Text(v)
    }
}

/// Named, versioned property bag passed to [`ImageFilter::process`](crate::filter::ImageFilter::process).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterConfig {
    /// Id of the filter this configuration is for.
    pub name: String,
    /// Configuration format version.
    pub version: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    values: BTreeMap<String, ConfigValue>,
}

impl FilterConfig {
    /// Empty configuration for filter `name`.
    pub fn new(name: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            version,
            values: BTreeMap::new(),
        }
    }

    /// Sets `key`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Value of `key`.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.values.remove(key)
    }

    /// Whether `key` is set.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Properties in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` if no property is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn float(&self, key: &str, default: f32) -> Result<f32> {
        match self.values.get(key) {
            None => Ok(default),
            Some(v) => v
                .as_float()
                .map(|f| f as f32)
                .ok_or_else(|| wrong_type(key, "float", v)),
        }
    }

    fn text(&self, key: &str) -> Result<Option<&str>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(v) => v.as_text().map(Some).ok_or_else(|| wrong_type(key, "text", v)),
        }
    }
}

fn wrong_type(key: &str, expected: &str, got: &ConfigValue) -> Error {
    Error::invalid_parameter(key, format!("expected {expected}, got {}", got.type_name()))
}

/// Typed configuration of the pyramidal sharpening filter.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SharpenConfig {
    /// Pyramid depth `N`; the pyramid has `N + 1` levels.
    pub depth: usize,
    /// Fraction of the peak residual removed from the clip threshold.
    pub clip: f32,
    /// Gain on the clipped band.
    pub scale: f32,
    /// Booster blur shape.
    pub blur_a: f32,
    /// Threshold sharing between channels.
    pub threshold_scope: ThresholdScope,
    /// Boost quantization for integer samples. Float samples always add the boost unquantized.
    pub rounding: RoundingPolicy,
}

impl Default for SharpenConfig {
    fn default() -> Self {
        let boost = BoostParams::default();
        Self {
            depth: 1,
            clip: boost.clip,
            scale: boost.scale,
            blur_a: boost.blur_a,
            threshold_scope: boost.threshold_scope,
            rounding: RoundingPolicy::Truncate,
        }
    }
}

impl SharpenConfig {
    /// Version written by [`to_filter_config`](Self::to_filter_config).
    pub const VERSION: u32 = 1;

    /// Sets the pyramid depth.
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Sets the clip fraction.
    pub fn with_clip(mut self, clip: f32) -> Self {
        self.clip = clip;
        self
    }

    /// Sets the gain.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the blur shape.
    pub fn with_blur_a(mut self, blur_a: f32) -> Self {
        self.blur_a = blur_a;
        self
    }

    /// Sets the threshold scope.
    pub fn with_threshold_scope(mut self, scope: ThresholdScope) -> Self {
        self.threshold_scope = scope;
        self
    }

    /// Sets the rounding policy.
    pub fn with_rounding(mut self, rounding: RoundingPolicy) -> Self {
        self.rounding = rounding;
        self
    }

    /// Booster parameters carried by this configuration.
    pub fn boost_params(&self) -> BoostParams {
        BoostParams {
            clip: self.clip,
            scale: self.scale,
            blur_a: self.blur_a,
            threshold_scope: self.threshold_scope,
        }
    }

    /// Checks every field is in range.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if `depth` is outside `1..=MAX_DEPTH` or a
    /// booster parameter is out of range.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_DEPTH).contains(&self.depth) {
            return Err(Error::invalid_parameter(
                "depth",
                format!("must be within 1..={MAX_DEPTH}, got {}", self.depth),
            ));
        }
        self.boost_params().validate()
    }

    /// Property bag holding every field.
    pub fn to_filter_config(&self) -> FilterConfig {
        FilterConfig::new(PyramidalSharpening::ID.id, Self::VERSION)
            .with("depth", self.depth as i64)
            .with("clip", self.clip)
            .with("scale", self.scale)
            .with("blur_a", self.blur_a)
            .with("threshold_scope", scope_name(self.threshold_scope))
            .with("rounding", rounding_name(self.rounding))
    }

    /// Reads a property bag. Missing keys keep their defaults; the result
    /// isn't validated.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if the bag names another filter, or a
    /// property has the wrong type or an unknown value.
    pub fn from_filter_config(config: &FilterConfig) -> Result<Self> {
        if config.name != PyramidalSharpening::ID.id {
            return Err(Error::invalid_parameter(
                "name",
                format!(
                    "configuration is for '{}', not '{}'",
                    config.name,
                    PyramidalSharpening::ID.id
                ),
            ));
        }

        let defaults = Self::default();
        let depth = match config.get("depth") {
            None => defaults.depth,
            Some(v) => {
                let raw = v.as_int().ok_or_else(|| wrong_type("depth", "int", v))?;
                usize::try_from(raw).map_err(|_| {
                    Error::invalid_parameter("depth", format!("must be non-negative, got {raw}"))
                })?
            }
        };
        let threshold_scope = match config.text("threshold_scope")? {
            None => defaults.threshold_scope,
            Some(s) => parse_scope(s)?,
        };
        let rounding = match config.text("rounding")? {
            None => defaults.rounding,
            Some(s) => parse_rounding(s)?,
        };

        Ok(Self {
            depth,
            clip: config.float("clip", defaults.clip)?,
            scale: config.float("scale", defaults.scale)?,
            blur_a: config.float("blur_a", defaults.blur_a)?,
            threshold_scope,
            rounding,
        })
    }
}

fn scope_name(scope: ThresholdScope) -> &'static str {
    match scope {
        ThresholdScope::PerChannel => "per_channel",
        ThresholdScope::AllChannels => "all_channels",
    }
}

fn parse_scope(s: &str) -> Result<ThresholdScope> {
    match s {
        "per_channel" => Ok(ThresholdScope::PerChannel),
        "all_channels" => Ok(ThresholdScope::AllChannels),
        other => Err(Error::invalid_parameter(
            "threshold_scope",
            format!("unknown scope '{other}'"),
        )),
    }
}

fn rounding_name(rounding: RoundingPolicy) -> &'static str {
    match rounding {
        RoundingPolicy::Truncate => "truncate",
        RoundingPolicy::Round => "round",
        RoundingPolicy::Exact => "exact",
    }
}

fn parse_rounding(s: &str) -> Result<RoundingPolicy> {
    match s {
        "truncate" => Ok(RoundingPolicy::Truncate),
        "round" => Ok(RoundingPolicy::Round),
        "exact" => Ok(RoundingPolicy::Exact),
        other => Err(Error::invalid_parameter(
            "rounding",
            format!("unknown policy '{other}'"),
        )),
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn test_sharpen_config_json() {
        let cfg = SharpenConfig::default().with_depth(2);
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"rounding\":\"truncate\""));
        let back: SharpenConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_sharpen_config_partial_json() {
        let cfg: SharpenConfig = serde_json::from_str(r#"{"depth": 3}"#).unwrap();
        assert_eq!(cfg.depth, 3);
        assert_eq!(cfg.clip, 0.45);
    }

    #[test]
    fn test_filter_config_json() {
        let bag = SharpenConfig::default().to_filter_config();
        let json = serde_json::to_string(&bag).unwrap();
        let back: FilterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get("depth"), Some(&ConfigValue::Int(1)));
        assert_eq!(back.get("rounding"), Some(&ConfigValue::Text("truncate".into())));
    }
}
