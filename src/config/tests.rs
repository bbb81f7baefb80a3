//! Unit tests for configuration types and defaults.

use rstest::rstest;

use super::*;

#[rstest]
fn defaults_listen_on_localhost() {
    let config = AppConfig::default();
    let addr = config.listen_socket_addr().expect("default address parses");
    assert_eq!(addr.to_string(), "127.0.0.1:3000");
    assert!(config.engine_socket.is_none());
    assert!(config.provider.default_provider.is_none());
    assert!(config.provider.state_path.is_none());
}

#[rstest]
fn configured_listen_address_is_parsed() {
    let config = AppConfig {
        listen_addr: Some(String::from("0.0.0.0:8080")),
        ..AppConfig::default()
    };
    let addr = config.listen_socket_addr().expect("address parses");
    assert_eq!(addr.port(), 8080);
}

#[rstest]
#[case("not-an-address")]
#[case("localhost")]
#[case(":::9")]
fn malformed_listen_address_is_rejected(#[case] value: &str) {
    let config = AppConfig {
        listen_addr: Some(String::from(value)),
        ..AppConfig::default()
    };
    let error = config
        .listen_socket_addr()
        .expect_err("address must be rejected");
    assert!(matches!(
        error,
        crate::error::ConfigError::InvalidValue { field, .. } if field == "listen_addr"
    ));
}

#[rstest]
fn configuration_file_shape_deserialises() {
    let config: AppConfig = toml::from_str(
        r#"
        listen_addr = "127.0.0.1:4000"
        engine_socket = "/tmp/pinned.sock"

        [provider]
        default_provider = "podman"
        state_path = "/tmp/gangway/provider"
        "#,
    )
    .expect("sample configuration parses");

    assert_eq!(config.listen_addr.as_deref(), Some("127.0.0.1:4000"));
    assert_eq!(config.engine_socket.as_deref(), Some("/tmp/pinned.sock"));
    assert_eq!(config.provider.default_provider.as_deref(), Some("podman"));
    assert_eq!(
        config.provider.state_path.as_deref().map(camino::Utf8Path::as_str),
        Some("/tmp/gangway/provider")
    );
}

#[rstest]
fn env_var_table_covers_the_documented_surface() {
    let names = env_var_names();
    assert!(names.contains(&"GANGWAY_LISTEN_ADDR"));
    assert!(names.contains(&"GANGWAY_ENGINE_SOCKET"));
    assert!(names.contains(&"GANGWAY_PROVIDER_DEFAULT_PROVIDER"));
    assert!(names.contains(&"GANGWAY_PROVIDER_STATE_PATH"));
}
