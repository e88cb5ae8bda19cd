use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::chart::Limits;
use crate::chart::ticks::MAX_TICKS;
use crate::color::{Rgb, parse_color};
use crate::error::{PlotError, Result};

// ---------------------------------------------------------------------------
// Params – the per-plot configuration bag
// ---------------------------------------------------------------------------

/// Option name → value.  Every key is optional and read independently; the
/// renderer for each device decides which keys it looks at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params {
    values: BTreeMap<String, JsonValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object literal, e.g. `json!({"device": "oscilloscope"})`.
    pub fn from_json(value: JsonValue) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| PlotError::invalid("params", format!("expected a JSON object ({e})")))
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<JsonValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<JsonValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.values.get(key)
    }

    // -- typed accessors --

    /// A string option.  Numbers are accepted and rendered as text.
    pub fn str(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            None | Some(JsonValue::Null) => Ok(None),
            Some(JsonValue::String(s)) => Ok(Some(s.clone())),
            Some(JsonValue::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => Err(PlotError::invalid(key, format!("expected text, got {other}"))),
        }
    }

    /// A string option with a fallback.
    pub fn str_or(&self, key: &str, default: &str) -> Result<String> {
        Ok(self.str(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// An axis range given as `[min, max]`.
    pub fn range(&self, key: &str) -> Result<Option<Limits>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let bad = || PlotError::invalid(key, format!("expected [min, max], got {value}"));

        let items = value.as_array().ok_or_else(bad)?;
        if items.len() != 2 {
            return Err(bad());
        }
        let min = items[0].as_f64().ok_or_else(bad)?;
        let max = items[1].as_f64().ok_or_else(bad)?;
        if !min.is_finite() || !max.is_finite() || min == max {
            return Err(PlotError::invalid(
                key,
                format!("range must span two distinct finite values, got {value}"),
            ));
        }
        Ok(Some(Limits::new(min, max)))
    }

    /// A positive tick / bin count, at most [`MAX_TICKS`].
    pub fn count(&self, key: &str) -> Result<Option<usize>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        match value.as_u64() {
            Some(n) if n > 0 && n <= MAX_TICKS as u64 => Ok(Some(n as usize)),
            Some(n) if n > 0 => Err(PlotError::invalid(
                key,
                format!("at most {MAX_TICKS} ticks are supported, got {n}"),
            )),
            _ => Err(PlotError::invalid(
                key,
                format!("expected a positive integer, got {value}"),
            )),
        }
    }

    /// A colour option with a fallback.
    pub fn color_or(&self, key: &str, default: Rgb) -> Result<Rgb> {
        match self.str(key)? {
            None => Ok(default),
            Some(spec) => parse_color(&spec)
                .ok_or_else(|| PlotError::invalid(key, format!("unknown colour '{spec}'"))),
        }
    }

    /// The optional image destination.
    pub fn save_path(&self) -> Result<Option<PathBuf>> {
        Ok(self
            .str("save_path")?
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from))
    }
}
