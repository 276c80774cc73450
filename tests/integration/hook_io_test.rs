//! Integration tests for the JSON-in, JSON-out hook entry point.

mod helpers;

use maclock_core::config::AppConfig;
use maclock_core::config::store::StoreProvider;
use maclock_core::traits::property_store::UserPropertyStore;
use maclock_core::types::auth::HW_ADDR_PROPERTY;
use maclock_store::FilePropertyStore;
use plugin_mac_lock::Denial;
use serde_json::{Value, json};
use tempfile::TempDir;

fn file_config(dir: &TempDir) -> AppConfig {
    let mut config = AppConfig::default();
    config.store.provider = StoreProvider::File;
    config.store.path = helpers::store_path(dir);
    config
}

fn request_json(hw_addr: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "authcred": {
            "username": "alice",
            "client_ip_addr": "203.0.113.7",
            "client_hw_addr": hw_addr
        },
        "attributes": { "vpn_auth": true },
        "authret": { "status": "SUCCESS", "proplist": {} }
    }))
    .unwrap()
}

async fn invoke(dir: &TempDir, hw_addr: &str) -> Value {
    let input = request_json(hw_addr);
    let mut output = Vec::new();
    maclock::run_hook(file_config(dir), input.as_slice(), &mut output)
        .await
        .expect("hook run");

    let text = String::from_utf8(output).unwrap();
    assert!(text.ends_with('\n'));
    assert_eq!(text.lines().count(), 1);
    serde_json::from_str(&text).unwrap()
}

#[tokio::test]
async fn test_hook_registers_then_denies_other_device() {
    let dir = TempDir::new().unwrap();

    let first = invoke(&dir, "aa:bb:cc:dd:ee:ff").await;
    assert_eq!(first["authret"]["status"], "SUCCESS");
    assert_eq!(first["proplist_save"][HW_ADDR_PROPERTY], "aa:bb:cc:dd:ee:ff");

    let store = FilePropertyStore::open(helpers::store_path(&dir)).await.unwrap();
    assert_eq!(
        store.get("alice", HW_ADDR_PROPERTY).await.unwrap().as_deref(),
        Some("aa:bb:cc:dd:ee:ff")
    );

    let second = invoke(&dir, "11:22:33:44:55:66").await;
    let mismatch = Denial::HardwareAddressMismatch.to_string();
    assert_eq!(second["authret"]["status"], "FAIL");
    assert_eq!(second["authret"]["reason"], mismatch.as_str());
    assert_eq!(second["authret"]["client_reason"], mismatch.as_str());
    assert_eq!(second["proplist_save"], json!({}));
}

#[tokio::test]
async fn test_hook_sees_binding_reset_by_admin() {
    let dir = TempDir::new().unwrap();
    invoke(&dir, "aa:bb:cc:dd:ee:ff").await;

    let admin = FilePropertyStore::open(helpers::store_path(&dir)).await.unwrap();
    assert!(admin.delete("alice", HW_ADDR_PROPERTY).await.unwrap());

    let after_reset = invoke(&dir, "11:22:33:44:55:66").await;
    assert_eq!(after_reset["authret"]["status"], "SUCCESS");
    assert_eq!(after_reset["proplist_save"][HW_ADDR_PROPERTY], "11:22:33:44:55:66");
}

#[tokio::test]
async fn test_hook_rejects_malformed_request() {
    let dir = TempDir::new().unwrap();
    let mut output = Vec::new();

    let err = maclock::run_hook(file_config(&dir), &b"{ not json"[..], &mut output)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("parsing post-auth request"));
    assert!(output.is_empty());
}
