//! Tests for the composition root
//!
//! Bootstraps full host contexts from configuration and checks that the
//! registry-resolved chain, the cache decorator and the context behave as
//! one system.

use latch_domain::registry::ProviderSettings;
use latch_host::bootstrap::{init_host, init_test_host};
use latch_host::config::HostConfig;

fn config_with(providers: Vec<ProviderSettings>) -> HostConfig {
    HostConfig {
        providers,
        ..HostConfig::default()
    }
}

#[test]
fn test_chain_priority_across_configured_providers() {
    let config = config_with(vec![
        ProviderSettings::new("memory")
            .with_priority(0)
            .with_value("motd", "low"),
        ProviderSettings::new("memory")
            .with_priority(10)
            .with_value("motd", "high"),
    ]);
    let host_context = init_host(config).unwrap();

    let motd: String = host_context.context().resolve_key("cfg:motd").unwrap();
    assert_eq!(motd, "high");
}

#[test]
fn test_unknown_provider_name_fails_with_available_list() {
    let config = config_with(vec![ProviderSettings::new("no-such-provider")]);
    let err = init_host(config).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("no-such-provider"));
    assert!(message.contains("Available providers"));
}

#[test]
fn test_cache_pins_absence_until_process_end() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with(vec![ProviderSettings::new("file")
        .with_path(dir.path())
        .with_extension("txt")]);
    let host_context = init_host(config).unwrap();
    let context = host_context.context();

    assert!(context
        .try_resolve_key::<String>("cfg:greeting")
        .unwrap()
        .is_none());

    // The backing file appears later, but the first observation is pinned.
    std::fs::write(dir.path().join("greeting.txt"), "hello").unwrap();
    assert!(context
        .try_resolve_key::<String>("cfg:greeting")
        .unwrap()
        .is_none());
}

#[test]
fn test_disabling_the_cache_sees_late_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_with(vec![ProviderSettings::new("file")
        .with_path(dir.path())
        .with_extension("txt")]);
    config.cache.enabled = false;
    let host_context = init_host(config).unwrap();
    let context = host_context.context();

    assert!(context
        .try_resolve_key::<String>("cfg:greeting")
        .unwrap()
        .is_none());

    std::fs::write(dir.path().join("greeting.txt"), "hello").unwrap();
    assert_eq!(
        context.try_resolve_key::<String>("cfg:greeting").unwrap(),
        Some("hello".to_string())
    );
}

#[test]
fn test_file_values_stay_byte_exact_through_the_stack() {
    let dir = tempfile::tempdir().unwrap();
    let raw = vec![0u8, 159, 146, 150];
    std::fs::write(dir.path().join("blob.bin"), &raw).unwrap();
    std::fs::write(dir.path().join("note.bin"), "grüße").unwrap();

    let config = config_with(vec![ProviderSettings::new("file")
        .with_path(dir.path())
        .with_extension("bin")]);
    let host_context = init_host(config).unwrap();
    let context = host_context.context();

    let blob: Vec<u8> = context.resolve_key("cfg:blob").unwrap();
    assert_eq!(blob, raw);
    let note: String = context.resolve_key("cfg:note").unwrap();
    assert_eq!(note, "grüße");
}

#[test]
fn test_test_host_resolves_inline_defaults_only() {
    let host_context = init_test_host().unwrap();
    let context = host_context.context();

    assert_eq!(context.resolve_key::<u64>("cfg:timeout=30").unwrap(), 30);
    assert!(context.try_resolve_key::<u64>("cfg:timeout").unwrap().is_none());
    assert!(host_context.config().providers.is_empty());
}
