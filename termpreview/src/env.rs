// ABOUTME: Immutable snapshot of the environment variables the preview subsystem reads
// ABOUTME: Captured once per preview call so every decision comes from one consistent view

use crate::constants::env_vars;
use std::collections::HashMap;
use std::env;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the relevant variables from the current process environment
    pub fn capture() -> Self {
        let vars = env_vars::ALL
            .iter()
            .filter_map(|name| env::var(name).ok().map(|value| (name.to_string(), value)))
            .collect();
        Self { vars }
    }

    /// Build a snapshot from explicit pairs, ignoring the process environment
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { vars }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// True when the variable is present and non-empty
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_empty())
    }

    /// Lowercased value, or an empty string when absent
    pub fn lower(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_lowercase()
    }

    /// Parse a strictly positive integer; anything else, surrounding whitespace included, is treated as unset
    pub fn positive_u32(&self, name: &str) -> Option<u32> {
        match self.get(name)?.parse::<i64>() {
            Ok(n) if n > 0 => u32::try_from(n).ok(),
            _ => None,
        }
    }

    /// PREVIEW_DEBUG accepts "1" or "true"
    pub fn debug_enabled(&self) -> bool {
        matches!(self.get(env_vars::PREVIEW_DEBUG), Some("1") | Some("true"))
    }
}
