//! Property-based tests for URL templating, sparse composition and idempotence.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use proptest::prelude::*;
use serde_json::{Map, Value, json};

use vaultplan_cli::domain::{compose, resolve};
use vaultplan_common::{DesiredState, InstallMethod, ListenerSpec, NodeFacts, OsFamily};

fn family() -> impl Strategy<Value = OsFamily> {
    prop_oneof![
        Just(OsFamily::Debian),
        Just(OsFamily::RedHat),
        Just(OsFamily::Suse),
        Just(OsFamily::Other),
    ]
}

fn stanza() -> impl Strategy<Value = Map<String, Value>> {
    ("[a-z]{1,8}", "[a-z0-9/:.]{1,16}").prop_map(|(k, v)| {
        let mut map = Map::new();
        map.insert(k, json!({ "path": v }));
        map
    })
}

// ============================================================================
// Download URL template
// ============================================================================

proptest! {
    /// Archive installs always derive `{base}/{V}/{pkg}_{V}_{os}_{arch}.{ext}`.
    #[test]
    fn prop_archive_url_follows_template(
        major in 0u32..5,
        minor in 0u32..30,
        patch in 0u32..20,
        base in proptest::option::of("https://[a-z]{3,10}\\.example\\.com/[a-z]{1,6}/?"),
        package in proptest::option::of("[a-z]{3,12}"),
        ext in proptest::option::of(prop_oneof![Just("zip"), Just("tar.gz")]),
        family in family(),
    ) {
        let version = format!("{major}.{minor}.{patch}");
        let desired = DesiredState {
            install_method: Some(InstallMethod::Archive),
            version: Some(version.clone()),
            download_url_base: base.clone(),
            package_name: package.clone(),
            download_extension: ext.map(str::to_string),
            ..DesiredState::default()
        };
        let catalog = resolve(desired, NodeFacts::linux(family, 2)).expect("resolves");

        let base = base.as_deref().unwrap_or("https://releases.example.com/vault/");
        let expected = format!(
            "{}/{version}/{}_{version}_linux_amd64.{}",
            base.trim_end_matches('/'),
            package.as_deref().unwrap_or("vault"),
            ext.unwrap_or("zip"),
        );
        prop_assert_eq!(catalog.plan.download_url(), Some(expected.as_str()));
        let install_dir = catalog.plan.install_dir().expect("install dir");
        prop_assert!(install_dir.contains(&version));
    }
}

// ============================================================================
// Sparse configuration document
// ============================================================================

proptest! {
    /// Keys appear iff their field was supplied.
    #[test]
    fn prop_document_keys_match_supplied_fields(
        storage in proptest::option::of(stanza()),
        ha_storage in proptest::option::of(stanza()),
        seal in proptest::option::of(stanza()),
        telemetry in proptest::option::of(stanza()),
        disable_cache in proptest::option::of(any::<bool>()),
        enable_ui in proptest::option::of(any::<bool>()),
        api_addr in proptest::option::of("https://[a-z]{1,8}:8200"),
        max_lease_ttl in proptest::option::of("[1-9][0-9]{0,3}h"),
    ) {
        let desired = DesiredState {
            storage: storage.clone(),
            ha_storage: ha_storage.clone(),
            seal: seal.clone(),
            telemetry: telemetry.clone(),
            disable_cache,
            enable_ui,
            api_addr: api_addr.clone(),
            max_lease_ttl: max_lease_ttl.clone(),
            ..DesiredState::default()
        };
        let doc = compose(&desired);

        let expected = [
            ("storage", storage.is_some()),
            ("ha_storage", ha_storage.is_some()),
            ("seal", seal.is_some()),
            ("telemetry", telemetry.is_some()),
            ("disable_cache", disable_cache.is_some()),
            ("ui", enable_ui.is_some()),
            ("api_addr", api_addr.is_some()),
            ("max_lease_ttl", max_lease_ttl.is_some()),
        ];
        for (key, present) in expected {
            prop_assert_eq!(doc.contains_key(key), present, "key {}", key);
        }
        for absent in ["listener", "service_registration", "default_lease_ttl", "disable_mlock"] {
            prop_assert!(!doc.contains_key(absent), "unexpected key {}", absent);
        }
        prop_assert!(doc.as_map().values().all(|v| !v.is_null()));
    }

    /// Listener sequences keep their length and order.
    #[test]
    fn prop_listener_sequence_preserved(listeners in proptest::collection::vec(stanza(), 2..5)) {
        let desired = DesiredState {
            listener: Some(ListenerSpec::Many(listeners.clone())),
            ..DesiredState::default()
        };
        let doc = compose(&desired);
        let expected: Vec<Value> = listeners.into_iter().map(Value::Object).collect();
        prop_assert_eq!(doc.get("listener"), Some(&Value::Array(expected)));
    }
}

// ============================================================================
// Idempotence
// ============================================================================

proptest! {
    /// Same inputs, byte-identical artifacts.
    #[test]
    fn prop_resolution_is_idempotent(
        storage in proptest::option::of(stanza()),
        num_procs in proptest::option::of(1u32..64),
        options in "(-[a-z]{1,10}=[a-z]{1,6})?",
        family in family(),
        disable_mlock in proptest::option::of(any::<bool>()),
    ) {
        let desired = DesiredState {
            storage,
            num_procs,
            service_options: Some(options),
            disable_mlock,
            ..DesiredState::default()
        };
        let facts = NodeFacts::linux(family, 4);
        let a = resolve(desired.clone(), facts.clone()).expect("resolves");
        let b = resolve(desired, facts).expect("resolves");
        prop_assert_eq!(
            a.config_file.and_then(|f| f.content),
            b.config_file.and_then(|f| f.content)
        );
        prop_assert_eq!(
            a.service_file.map(|d| d.content),
            b.service_file.map(|d| d.content)
        );
    }
}
