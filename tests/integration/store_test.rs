//! Integration tests for the file-backed property store.

mod helpers;

use maclock_core::types::auth::HW_ADDR_PROPERTY;
use maclock_store::FilePropertyStore;
use maclock_core::traits::property_store::UserPropertyStore;
use plugin_mac_lock::Denial;

#[tokio::test]
async fn test_registration_survives_restart() {
    let dir = tempfile::TempDir::new().unwrap();

    {
        let app = helpers::TestApp::with_file_store_in(&dir).await;
        let response = app
            .vpn_login("alice", "203.0.113.7", Some("aa:bb:cc:dd:ee:ff"))
            .await;
        assert!(response.authret.is_success());
        app.host.shutdown().await;
    }

    let app = helpers::TestApp::with_file_store_in(&dir).await;
    let response = app
        .vpn_login("alice", "203.0.113.7", Some("11:22:33:44:55:66"))
        .await;
    assert_eq!(
        response.authret.reason,
        Some(Denial::HardwareAddressMismatch.to_string())
    );
}

#[tokio::test]
async fn test_admin_edit_seen_by_running_host() {
    let app = helpers::TestApp::with_file_store().await;
    let dir = app.dir.as_ref().unwrap();

    // A second handle on the same file, as the admin CLI would open
    let admin = FilePropertyStore::open(helpers::store_path(dir)).await.unwrap();
    admin
        .put("alice", HW_ADDR_PROPERTY, "11:22:33:44:55:66")
        .await
        .unwrap();

    let response = app
        .vpn_login("alice", "203.0.113.7", Some("11:22:33:44:55:66"))
        .await;
    assert!(response.authret.is_success());
    assert!(response.proplist_save.is_empty());
}

#[tokio::test]
async fn test_document_is_plain_json() {
    let app = helpers::TestApp::with_file_store().await;
    app.vpn_login("alice", "203.0.113.7", Some("aa:bb:cc:dd:ee:ff"))
        .await;

    let path = helpers::store_path(app.dir.as_ref().unwrap());
    let raw = std::fs::read_to_string(path).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc["alice"][HW_ADDR_PROPERTY], "aa:bb:cc:dd:ee:ff");
}

#[tokio::test]
async fn test_corrupt_document_fails_host_build() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(helpers::store_path(&dir), "{ not json").unwrap();

    let mut config = maclock_core::config::AppConfig::default();
    config.store.path = helpers::store_path(&dir);
    let err = maclock_service::Host::build(config).await.unwrap_err();
    assert_eq!(err.kind, maclock_core::error::ErrorKind::Serialization);
}
