//! App builder and multi-catalog tests

mod common;

use std::sync::Arc;
use tempfile::TempDir;

use common::*;
use flexlov_adapter_sqlite::LovAdapterSqlite;
use flexlov_core::AppBuilder;
use flexlov_types::binding::{CatalogBinding, SelectionBinding};
use flexlov_types::error::Error;
use flexlov_types::types::TnId;

async fn build_with(bindings: Vec<CatalogBinding>) -> (Result<flexlov_core::App, Error>, TempDir) {
	let temp_dir = TempDir::new().unwrap();
	let adapter = LovAdapterSqlite::new(temp_dir.path()).await.unwrap();
	let mut builder = AppBuilder::new();
	builder.lov_adapter(Arc::new(adapter)).catalogs(bindings);
	(builder.build().await, temp_dir)
}

#[tokio::test]
async fn test_unknown_catalog_key() {
	let (app, _temp) = create_test_app(vec![crop_binding()]).await;

	let result = app.catalog("tenant_color");
	assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[tokio::test]
async fn test_binding_without_tenant_model() {
	let binding = CatalogBinding::new(CROP).selection(SelectionBinding::default());
	let (result, _temp) = build_with(vec![binding]).await;
	assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[tokio::test]
async fn test_binding_without_selection() {
	let binding = CatalogBinding::new(CROP).tenant_model("tenant");
	let (result, _temp) = build_with(vec![binding]).await;
	assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[tokio::test]
async fn test_duplicate_catalog_key() {
	let (result, _temp) = build_with(vec![crop_binding(), crop_binding()]).await;
	assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[tokio::test]
async fn test_missing_adapter() {
	let mut builder = AppBuilder::new();
	builder.catalog(crop_binding());
	let result = builder.build().await;
	assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[tokio::test]
async fn test_catalogs_in_registration_order() {
	let color = CatalogBinding::new("tenant_color")
		.tenant_model("tenant")
		.selection(SelectionBinding::default());
	let (app, _temp) = create_test_app(vec![crop_binding(), color]).await;

	let keys: Vec<&str> = app.catalogs().iter().map(|c| c.key()).collect();
	assert_eq!(keys, [CROP, "tenant_color"]);
}

#[tokio::test]
async fn test_reconcile_on_start() {
	let temp_dir = TempDir::new().unwrap();
	let adapter = LovAdapterSqlite::new(temp_dir.path()).await.unwrap();
	let mut builder = AppBuilder::new();
	builder
		.lov_adapter(Arc::new(adapter))
		.reconcile_on_start(true)
		.catalog(crop_binding().defaults(fruit_defaults()));
	let app = builder.build().await.unwrap();

	let catalog = app.catalog(CROP).unwrap();
	assert_eq!(names(&catalog.selected_for(TnId(1)).await.unwrap()), ["Fruit"]);
	assert_eq!(catalog.visible_to(TnId(1)).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_reconcile_all_isolates_failing_catalog() {
	let temp_dir = TempDir::new().unwrap();
	let inner = LovAdapterSqlite::new(temp_dir.path()).await.unwrap();
	let adapter = BrokenCatalogAdapter { inner, broken: "broken_crop" };

	let broken = CatalogBinding::new("broken_crop")
		.tenant_model("tenant")
		.selection(SelectionBinding::default())
		.defaults(fruit_defaults());
	let mut builder = AppBuilder::new();
	builder.lov_adapter(Arc::new(adapter)).catalog(broken).catalog(crop_binding().defaults(fruit_defaults()));
	let app = builder.build().await.expect("Storage failures do not fail the build");

	let results = app.reconcile_all().await;
	assert_eq!(results.len(), 2);

	assert_eq!(results[0].catalog.as_ref(), "broken_crop");
	assert!(matches!(results[0].result, Err(Error::DbError)));
	assert!(!results[0].is_success());

	assert_eq!(results[1].catalog.as_ref(), CROP);
	assert!(results[1].is_success());
	let report = results[1].result.as_ref().unwrap();
	assert_eq!(report.created, 3);
}

#[tokio::test]
async fn test_catalogs_share_adapter_but_not_values() {
	let color = CatalogBinding::new("tenant_color")
		.tenant_model("tenant")
		.selection(SelectionBinding::default());
	let (app, _temp) = create_test_app(vec![crop_binding(), color]).await;
	let crop = app.catalog(CROP).unwrap();
	let color = app.catalog("tenant_color").unwrap();

	crop.create_mandatory("Red").await.unwrap();
	color.create_mandatory("Red").await.expect("Each catalog has its own names");

	assert_eq!(crop.selected_for(TnId(1)).await.unwrap().len(), 1);
	assert_eq!(color.selected_for(TnId(1)).await.unwrap().len(), 1);
}

// vim: ts=4
