//! Tests for tracing initialization.

use std::sync::Mutex;

use causallm_core::tracing::init_tracing;

static TRACING_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn per_module_filter_is_accepted() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("CAUSALLM_LOG", "causallm_discovery=debug,causallm_inference=warn");
    init_tracing();
    std::env::remove_var("CAUSALLM_LOG");
}

#[test]
fn init_is_idempotent() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    init_tracing();
    tracing::info!("still alive after repeated init");
}

#[test]
fn garbage_filter_falls_back() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("CAUSALLM_LOG", "=====not a filter");
    init_tracing();
    std::env::remove_var("CAUSALLM_LOG");
}
