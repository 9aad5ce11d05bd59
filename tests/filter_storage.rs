#![cfg(target_arch = "wasm32")]

use risk_dashboard_wasm::domain::filters::FilterState;
use risk_dashboard_wasm::infrastructure::{FilterStore, LocalStorageFilterStore};
use wasm_bindgen_test::*;
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn storage() -> web_sys::Storage {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten()).expect("localStorage")
}

#[wasm_bindgen_test]
fn selection_survives_reload() {
    let store = LocalStorageFilterStore::new("risk-dashboard-test-roundtrip");
    let selected = FilterState::new("orca", "USX-USDT", "24h");
    store.save(&selected.persisted());

    let mut restored = FilterState::new("raydium", "USX-USDC", "7d");
    restored.restore(&store.load().expect("stored filters"));
    assert_eq!(restored, selected);
}

#[wasm_bindgen_test]
fn unreadable_record_is_ignored() {
    let key = "risk-dashboard-test-garbage";
    storage().set_item(key, "{not json").expect("write");
    assert_eq!(LocalStorageFilterStore::new(key).load(), None);
}
