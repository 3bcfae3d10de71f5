//! Configuration composer — builds the sparse server configuration document.
//!
//! Composition is a filter-then-collect pass over `(key, Option<Value>)`
//! pairs: a key is present iff its stanza was supplied, and no key is ever
//! emitted with a `null` value.

use serde::Serialize;
use serde_json::{Map, Value};
use vaultplan_common::{DesiredState, ListenerSpec};

/// The canonical configuration document.
///
/// Keys are kept sorted, so two documents with the same content serialize
/// byte-identically.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigDocument(Map<String, Value>);

impl ConfigDocument {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Pretty JSON with a trailing newline, as written to the config file.
    ///
    /// # Errors
    ///
    /// Returns an error only if serialization fails, which cannot happen for
    /// string-keyed JSON values.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        let mut out = serde_json::to_string_pretty(&self.0)?;
        out.push('\n');
        Ok(out)
    }
}

/// Key owned by the `disable_mlock` parameter; never taken from `extra_config`.
pub const MLOCK_KEY: &str = "disable_mlock";

/// Compose the configuration document from the configuration-bearing fields.
///
/// `disable_mlock` is emitted only when `true`; an explicit `false` is the
/// server's own default and is omitted exactly like an unset value.
/// `extra_config` is merged last and wins on key collisions, except for
/// `disable_mlock`, which only the dedicated parameter sets.
#[must_use]
pub fn compose(desired: &DesiredState) -> ConfigDocument {
    let object = |stanza: Option<&Map<String, Value>>| stanza.cloned().map(Value::Object);

    let stanzas: [(&str, Option<Value>); 12] = [
        ("storage", object(desired.storage.as_ref())),
        ("ha_storage", object(desired.ha_storage.as_ref())),
        ("listener", desired.listener.as_ref().map(ListenerSpec::to_value)),
        ("seal", object(desired.seal.as_ref())),
        ("telemetry", object(desired.telemetry.as_ref())),
        ("service_registration", object(desired.service_registration.as_ref())),
        ("disable_cache", desired.disable_cache.map(Value::Bool)),
        (MLOCK_KEY, desired.mlock_disabled().then_some(Value::Bool(true))),
        ("default_lease_ttl", desired.default_lease_ttl.clone().map(Value::String)),
        ("max_lease_ttl", desired.max_lease_ttl.clone().map(Value::String)),
        ("ui", desired.enable_ui.map(Value::Bool)),
        ("api_addr", desired.api_addr.clone().map(Value::String)),
    ];

    let extra = desired
        .extra_config
        .iter()
        .flatten()
        .filter(|(k, _)| k.as_str() != MLOCK_KEY)
        .map(|(k, v)| (k.as_str(), Some(v.clone())));

    let map = stanzas
        .into_iter()
        .chain(extra)
        .filter_map(|(key, value)| match value {
            Some(Value::Null) | None => None,
            Some(value) => Some((key.to_string(), value)),
        })
        .collect();

    ConfigDocument(map)
}

// ── Unit tests ───────────────────────────────────────────────────────────────
