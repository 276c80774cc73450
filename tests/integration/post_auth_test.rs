//! Integration tests for the post-auth MAC binding flow.

mod helpers;

use maclock_core::config::AppConfig;
use maclock_core::types::auth::{AuthStatus, HW_ADDR_PROPERTY};
use plugin_mac_lock::Denial;

const ALICE_MAC: &str = "aa:bb:cc:dd:ee:ff";
const OTHER_MAC: &str = "11:22:33:44:55:66";
const CLIENT_IP: &str = "203.0.113.7";

#[tokio::test]
async fn test_alice_binds_then_is_held_to_first_device() {
    let app = helpers::TestApp::new().await;

    let first = app.vpn_login("alice", CLIENT_IP, Some(ALICE_MAC)).await;
    assert_eq!(first.authret.status, AuthStatus::Success);
    assert_eq!(first.proplist_save.len(), 1);
    assert_eq!(
        first.proplist_save.get(HW_ADDR_PROPERTY).map(String::as_str),
        Some(ALICE_MAC)
    );

    let second = app.vpn_login("alice", CLIENT_IP, Some(ALICE_MAC)).await;
    assert_eq!(second.authret.status, AuthStatus::Success);
    assert!(second.proplist_save.is_empty());

    let third = app.vpn_login("alice", CLIENT_IP, Some(OTHER_MAC)).await;
    let mismatch = Denial::HardwareAddressMismatch.to_string();
    assert_eq!(third.authret.status, AuthStatus::Fail);
    assert_eq!(third.authret.reason.as_deref(), Some(mismatch.as_str()));
    assert_eq!(third.authret.client_reason.as_deref(), Some(mismatch.as_str()));
    assert!(third.proplist_save.is_empty());

    assert_eq!(
        app.store.get("alice", HW_ADDR_PROPERTY).await.unwrap().as_deref(),
        Some(ALICE_MAC)
    );
}

#[tokio::test]
async fn test_bindings_are_per_user() {
    let app = helpers::TestApp::new().await;

    app.vpn_login("alice", CLIENT_IP, Some(ALICE_MAC)).await;
    let bob = app.vpn_login("bob", CLIENT_IP, Some(OTHER_MAC)).await;

    assert!(bob.authret.is_success());
    assert_eq!(app.store.list_users().await.unwrap(), vec!["alice", "bob"]);
}

#[tokio::test]
async fn test_missing_address_is_denied() {
    let app = helpers::TestApp::new().await;
    let missing = Denial::MissingHardwareAddress.to_string();

    for hw_addr in [None, Some("")] {
        let response = app.vpn_login("alice", CLIENT_IP, hw_addr).await;
        assert_eq!(response.authret.status, AuthStatus::Fail);
        assert_eq!(response.authret.reason.as_deref(), Some(missing.as_str()));
        assert!(response.proplist_save.is_empty());
    }
    assert!(app.store.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_non_vpn_login_bypasses_check() {
    let app = helpers::TestApp::new().await;
    app.store.put("alice", HW_ADDR_PROPERTY, ALICE_MAC).await.unwrap();

    let response = app
        .login(helpers::request("alice", CLIENT_IP, None, false))
        .await;
    assert_eq!(response.authret.status, AuthStatus::Success);
    assert!(response.proplist_save.is_empty());
}

#[tokio::test]
async fn test_registration_allow_list() {
    let mut config = AppConfig::default();
    config.post_auth.first_login_ip_addr = "198.51.100.1".to_string();
    let app = helpers::TestApp::with_config(config).await;

    let outside = app.vpn_login("alice", CLIENT_IP, Some(ALICE_MAC)).await;
    let unapproved = Denial::UnapprovedRegistrationLocation.to_string();
    assert_eq!(outside.authret.status, AuthStatus::Fail);
    assert_eq!(outside.authret.reason.as_deref(), Some(unapproved.as_str()));
    assert!(outside.proplist_save.is_empty());

    let inside = app.vpn_login("alice", "198.51.100.1", Some(ALICE_MAC)).await;
    assert!(inside.authret.is_success());
    assert_eq!(inside.proplist_save.len(), 1);

    // Once registered, the allow-list no longer matters
    let roaming = app.vpn_login("alice", CLIENT_IP, Some(ALICE_MAC)).await;
    assert!(roaming.authret.is_success());
}

#[tokio::test]
async fn test_reset_binding_allows_new_device() {
    let app = helpers::TestApp::new().await;
    app.vpn_login("alice", CLIENT_IP, Some(ALICE_MAC)).await;

    assert!(app.store.delete("alice", HW_ADDR_PROPERTY).await.unwrap());

    let response = app.vpn_login("alice", CLIENT_IP, Some(OTHER_MAC)).await;
    assert!(response.authret.is_success());
    assert_eq!(
        app.store.get("alice", HW_ADDR_PROPERTY).await.unwrap().as_deref(),
        Some(OTHER_MAC)
    );
}

#[tokio::test]
async fn test_synchronous_mode_behaves_the_same() {
    let mut config = AppConfig::default();
    config.post_auth.synchronous = true;
    let app = helpers::TestApp::with_config(config).await;

    assert!(app.vpn_login("alice", CLIENT_IP, Some(ALICE_MAC)).await.authret.is_success());
    let denied = app.vpn_login("alice", CLIENT_IP, Some(OTHER_MAC)).await;
    assert_eq!(denied.authret.status, AuthStatus::Fail);
}

#[tokio::test]
async fn test_response_wire_format() {
    let app = helpers::TestApp::new().await;
    let request: maclock_core::types::auth::PostAuthRequest = serde_json::from_value(
        serde_json::json!({
            "authcred": {
                "username": "alice",
                "client_ip_addr": CLIENT_IP,
                "client_hw_addr": ALICE_MAC
            },
            "attributes": { "vpn_auth": true },
            "authret": { "status": "SUCCESS", "proplist": { "type": "user_compile" } }
        }),
    )
    .unwrap();

    let response = serde_json::to_value(app.login(request).await).unwrap();
    assert_eq!(response["authret"]["status"], "SUCCESS");
    assert_eq!(response["authret"]["proplist"]["type"], "user_compile");
    assert_eq!(response["authret"]["proplist"][HW_ADDR_PROPERTY], ALICE_MAC);
    assert_eq!(response["proplist_save"][HW_ADDR_PROPERTY], ALICE_MAC);
    assert!(response["authret"].get("reason").is_none());
}
