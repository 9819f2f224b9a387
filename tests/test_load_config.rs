use serial_test::serial;
use std::env;

use pos_listmonk_sync::load_config::load_config;

const ALL_VARS: [(&str, &str); 9] = [
    ("EDGESERV_POS_HOST", "https://pos.example.com"),
    ("RESTAURANT_CODE", "my-restaurant"),
    ("CLIENT_ID", "client-id"),
    ("CLIENT_SECRET", "client-secret"),
    ("USERNAME", "api-user"),
    ("PASSWORD", "api-pass"),
    ("LISTMONK_HOST", "https://listmonk.example.com"),
    ("LISTMONK_USER", "listmonk-user"),
    ("LISTMONK_TOKEN", "listmonk-token"),
];

fn set_all_vars() {
    for (name, value) in ALL_VARS {
        env::set_var(name, value);
    }
}

/// A fully populated environment yields a complete config.
#[test]
#[serial]
fn test_load_config_success_from_env() {
    set_all_vars();

    let config = load_config().expect("Config should load");

    assert_eq!(config.pos.host, "https://pos.example.com");
    assert_eq!(config.pos.restaurant_code, "my-restaurant");
    assert_eq!(config.pos.client_id, "client-id");
    assert_eq!(config.pos.client_secret, "client-secret");
    assert_eq!(config.pos.username, "api-user");
    assert_eq!(config.pos.password, "api-pass");
    assert_eq!(config.listmonk.host, "https://listmonk.example.com");
    assert_eq!(config.listmonk.api_user, "listmonk-user");
    assert_eq!(config.listmonk.api_token, "listmonk-token");
}

/// Any missing variable fails the load with an error naming it.
#[test]
#[serial]
fn test_load_config_errors_on_each_missing_var() {
    for (missing, _) in ALL_VARS {
        set_all_vars();
        env::remove_var(missing);

        let err = load_config().expect_err("load must fail with a var missing");
        assert!(
            err.to_string().contains(missing),
            "error for missing {missing} should name it, got: {err}"
        );
    }
}
