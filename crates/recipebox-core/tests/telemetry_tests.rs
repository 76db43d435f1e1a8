//! Subscriber installation. Kept in its own test binary because the
//! subscriber is process-global.

use recipebox_core::{telemetry, CoreError, RecipeBoxConfig, RecipeListViewModel};
use recipebox_store::InMemoryStore;
use std::sync::Arc;

#[tokio::test]
async fn installs_once_and_logs_view_model_activity() {
    let config = RecipeBoxConfig::new().with_log_filter("recipebox_core=debug");
    telemetry::init(&config).unwrap();
    assert!(matches!(telemetry::init(&config), Err(CoreError::Telemetry(_))));

    let vm = RecipeListViewModel::spawn(Arc::new(InMemoryStore::new()), &config).unwrap();
    vm.on_create("Soup", "water", "boil", None).await.unwrap();
    vm.settled().await.unwrap();
    assert_eq!(vm.snapshot().recipes.len(), 1);
}
