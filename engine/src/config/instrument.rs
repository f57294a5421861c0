//! Per-instrument value tables
//!
//! Instrument identifiers are matched by substring (e.g. "BANK" matches
//! "NSE:NIFTY BANK"). Rules are checked in insertion order and the first
//! match wins; otherwise the default applies.

use serde::{Deserialize, Serialize};

/// A single substring rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentRule {
    pub pattern: String,
    pub value: f64,
}

/// Ordered substring rules with a fallback value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentTable {
    pub default: f64,
    pub rules: Vec<InstrumentRule>,
}

impl InstrumentTable {
    /// Create a table with no rules
    pub fn new(default: f64) -> Self {
        Self {
            default,
            rules: Vec::new(),
        }
    }

    /// Append a rule
    pub fn with_rule(mut self, pattern: impl Into<String>, value: f64) -> Self {
        self.rules.push(InstrumentRule {
            pattern: pattern.into(),
            value,
        });
        self
    }

    /// Parse `PATTERN=value` pairs separated by commas, e.g. `BANK=100,FIN=25`
    pub fn parse(rules: &str, default: f64) -> Result<Self, String> {
        let mut table = Self::new(default);
        for entry in rules.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (pattern, value) = entry
                .rsplit_once('=')
                .ok_or_else(|| format!("expected PATTERN=value, got '{}'", entry))?;
            let pattern = pattern.trim();
            if pattern.is_empty() {
                return Err(format!("empty pattern in '{}'", entry));
            }
            let value: f64 = value
                .trim()
                .parse()
                .map_err(|_| format!("invalid number in '{}'", entry))?;
            table = table.with_rule(pattern, value);
        }
        Ok(table)
    }

    /// Value for an instrument
    pub fn lookup(&self, instrument: &str) -> f64 {
        self.rules
            .iter()
            .find(|rule| instrument.contains(rule.pattern.as_str()))
            .map(|rule| rule.value)
            .unwrap_or(self.default)
    }

    fn values(&self) -> impl Iterator<Item = f64> + '_ {
        std::iter::once(self.default).chain(self.rules.iter().map(|r| r.value))
    }

    pub(crate) fn validate_positive(&self) -> Result<(), String> {
        match self.values().find(|v| !(v.is_finite() && *v > 0.0)) {
            Some(bad) => Err(format!("values must be positive, got {}", bad)),
            None => Ok(()),
        }
    }

    pub(crate) fn validate_non_negative(&self) -> Result<(), String> {
        match self.values().find(|v| !(v.is_finite() && *v >= 0.0)) {
            Some(bad) => Err(format!("values must be non-negative, got {}", bad)),
            None => Ok(()),
        }
    }
}
