//! Defaults reconciler tests

mod common;

use std::sync::Arc;

use common::*;
use flexlov_types::defaults::DefaultsSpec;
use flexlov_types::error::Error;
use flexlov_types::lov_adapter::ListValueOptions;
use flexlov_types::types::{TnId, ValueType};

fn all_values() -> ListValueOptions {
	ListValueOptions { include_deleted: true, ..Default::default() }
}

#[tokio::test]
async fn test_reconcile_creates_defaults() {
	let (app, _temp) = create_test_app(vec![crop_binding().defaults(fruit_defaults())]).await;
	let catalog = app.catalog(CROP).unwrap();

	let report = catalog.reconcile_defaults().await;
	assert!(report.is_success(), "{:?}", report);
	assert_eq!(report.created, 3);
	assert_eq!(report.catalog.as_ref(), CROP);

	let values = catalog.list_values(&ListValueOptions::default()).await.unwrap();
	let kinds: Vec<(&str, ValueType)> = values.iter().map(|v| (v.name.as_ref(), v.value_type)).collect();
	assert_eq!(
		kinds,
		[
			("Fruit", ValueType::Mandatory),
			("Fruit - Apple", ValueType::Optional),
			("Fruit - Berry", ValueType::Optional),
		]
	);
	assert!(values.iter().all(|v| v.tn_id.is_none()));
}

#[tokio::test]
async fn test_reconcile_is_idempotent() {
	let (app, _temp) = create_test_app(vec![crop_binding().defaults(fruit_defaults())]).await;
	let catalog = app.catalog(CROP).unwrap();

	catalog.reconcile_defaults().await;
	let before = catalog.list_values(&all_values()).await.unwrap();

	let report = catalog.reconcile_defaults().await;
	assert!(report.is_success());
	assert_eq!((report.created, report.updated, report.unchanged), (0, 0, 3));

	let after = catalog.list_values(&all_values()).await.unwrap();
	assert_eq!(before, after);
}

#[tokio::test]
async fn test_custom_entry_does_not_block_siblings() {
	let (catalog, _app, _temp) = create_crop_catalog().await;
	let spec = DefaultsSpec::new()
		.mandatory("Fruit")
		.entry("Kiwi", Some(ValueType::Custom))
		.optional("Fruit - Apple");

	let report = catalog.reconcile_spec(&spec).await;

	assert_eq!(report.created, 2);
	assert_eq!(report.failures.len(), 1);
	assert_eq!(report.failures[0].name.as_ref(), "Kiwi");
	assert!(matches!(report.failures[0].error, Error::ValidationError(_)));
	assert_eq!(names(&catalog.visible_to(TnId(1)).await.unwrap()), ["Fruit", "Fruit - Apple"]);
}

#[tokio::test]
async fn test_invalid_name_entry_reported() {
	let (catalog, _app, _temp) = create_crop_catalog().await;
	let spec = DefaultsSpec::new().mandatory("").optional("Vegetable");

	let report = catalog.reconcile_spec(&spec).await;

	assert_eq!(report.created, 1);
	assert_eq!(report.failures.len(), 1);
	assert!(matches!(report.failures[0].error, Error::ValidationError(_)));
}

#[tokio::test]
async fn test_reconcile_flips_value_type() {
	let (catalog, _app, _temp) = create_crop_catalog().await;
	catalog.reconcile_spec(&DefaultsSpec::new().mandatory("Herbs")).await;
	let herbs = catalog.list_values(&ListValueOptions::default()).await.unwrap().remove(0);

	let report = catalog.reconcile_spec(&DefaultsSpec::new().optional("Herbs")).await;
	assert_eq!(report.updated, 1);

	let flipped = catalog.read_value(herbs.value_id).await.unwrap();
	assert_eq!(flipped.value_type, ValueType::Optional);
	// No longer selected automatically
	assert!(catalog.selected_for(TnId(1)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reconcile_matches_names_case_insensitively() {
	let (catalog, _app, _temp) = create_crop_catalog().await;
	catalog.create_mandatory("fruit").await.unwrap();

	let report = catalog.reconcile_spec(&DefaultsSpec::new().mandatory("Fruit")).await;

	assert_eq!(report.unchanged, 1);
	assert_eq!(catalog.list_values(&all_values()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_reconcile_leaves_other_values_alone() {
	let (catalog, _app, _temp) = create_crop_catalog().await;
	catalog.create_optional("Exotic").await.unwrap();
	catalog.create_for_tenant(TnId(1), "Kiwi").await.unwrap();

	let report = catalog.reconcile_spec(&fruit_defaults()).await;
	assert!(report.is_success(), "{:?}", report);
	assert_eq!(report.created, 3);

	let global = catalog
		.list_values(&ListValueOptions { global_only: true, ..Default::default() })
		.await
		.unwrap();
	assert_eq!(names(&global), ["Exotic", "Fruit", "Fruit - Apple", "Fruit - Berry"]);
	assert_eq!(catalog.visible_to(TnId(1)).await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_custom_value_name_blocks_default() {
	let (catalog, _app, _temp) = create_crop_catalog().await;
	catalog.create_for_tenant(TnId(1), "fruit - apple").await.unwrap();

	let report = catalog.reconcile_spec(&fruit_defaults()).await;

	assert_eq!(report.created, 2);
	assert_eq!(report.failures.len(), 1);
	assert_eq!(report.failures[0].name.as_ref(), "Fruit - Apple");
	assert!(matches!(report.failures[0].error, Error::UniquenessError(_)));
	assert_eq!(names(&catalog.visible_to(TnId(1)).await.unwrap()), ["Fruit", "fruit - apple", "Fruit - Berry"]);
}

#[tokio::test]
async fn test_reconcile_recreates_deleted_default() {
	let (catalog, _app, _temp) = create_crop_catalog().await;
	let fruit = catalog.create_mandatory("Fruit").await.unwrap();
	catalog.soft_delete(fruit.value_id, true).await.unwrap();

	let report = catalog.reconcile_spec(&DefaultsSpec::new().mandatory("Fruit")).await;
	assert_eq!(report.created, 1);

	let selected = catalog.selected_for(TnId(1)).await.unwrap();
	assert_eq!(names(&selected), ["Fruit"]);
	assert_ne!(selected[0].value_id, fruit.value_id);
}

#[tokio::test]
async fn test_reconcile_runs_hooks() {
	let hooks = Arc::new(RecordingHooks::default());
	let (app, _temp) = create_test_app(vec![crop_binding().hooks(hooks.clone())]).await;
	let catalog = app.catalog(CROP).unwrap();

	catalog.reconcile_spec(&DefaultsSpec::new().mandatory("Herbs")).await;
	catalog.reconcile_spec(&DefaultsSpec::new().mandatory("Herbs")).await;
	catalog.reconcile_spec(&DefaultsSpec::new().optional("Herbs")).await;

	assert_eq!(
		hooks.calls(),
		[
			"before_create tenant_crop Herbs",
			"after_create tenant_crop Herbs",
			"before_save tenant_crop Herbs optional",
			"after_save tenant_crop Herbs optional",
		]
	);
}

// vim: ts=4
