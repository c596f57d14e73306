//! Typed per-rule configuration loaded from `[SL###]` config sections.

use crate::config::{Config, normalize_key};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A rule's configuration struct, deserialised from its config section
pub trait RuleConfig: Serialize + DeserializeOwned + Default + Clone {
    /// Section name, e.g. "SL001"
    const RULE_NAME: &'static str;
}

/// Load a rule's config section, falling back to defaults.
///
/// Keys are normalised to kebab-case first so `strict_placement` and
/// `strict-placement` are equivalent. A section that does not deserialise is
/// reported and ignored.
pub fn load_rule_config<T: RuleConfig>(config: &Config) -> T {
    let Some(section) = config.rules.get(T::RULE_NAME) else {
        return T::default();
    };

    let table: toml::Table = section
        .values
        .iter()
        .map(|(key, value)| (normalize_key(key), value.clone()))
        .collect();

    match toml::Value::Table(table).try_into::<T>() {
        Ok(rule_config) => rule_config,
        Err(err) => {
            log::warn!("Invalid configuration for {}: {err}; using defaults", T::RULE_NAME);
            T::default()
        }
    }
}

/// Default config section for a rule, `None` when it has no options
pub fn default_section<T: RuleConfig>() -> Option<(String, toml::Value)> {
    match toml::Value::try_from(T::default()).ok()? {
        toml::Value::Table(table) if !table.is_empty() => Some((T::RULE_NAME.to_string(), toml::Value::Table(table))),
        _ => None,
    }
}
