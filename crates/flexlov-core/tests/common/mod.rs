//! Shared setup for engine tests
//!
//! Every test gets its own SQLite database in a `TempDir` that is returned
//! alongside the app so it lives until the end of the test.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use flexlov_adapter_sqlite::LovAdapterSqlite;
use flexlov_core::{App, AppBuilder, Catalog};
use flexlov_types::binding::{CatalogBinding, CatalogSchema, SelectionBinding};
use flexlov_types::defaults::DefaultsSpec;
use flexlov_types::error::{ClResult, Error};
use flexlov_types::hooks::CatalogHooks;
use flexlov_types::lov_adapter::{ListValueOptions, LovAdapter, SelectionChanges, UpdateValueData};
use flexlov_types::types::{NewValue, Selection, TnId, Value, ValueId};

pub const CROP: &str = "tenant_crop";

pub fn crop_binding() -> CatalogBinding {
	CatalogBinding::new(CROP)
		.tenant_model("tenant")
		.selection(SelectionBinding { tenant_field: "tn_id".into(), value_field: "crop_id".into() })
}

pub fn fruit_defaults() -> DefaultsSpec {
	DefaultsSpec::new().mandatory("Fruit").optional("Fruit - Apple").optional("Fruit - Berry")
}

pub async fn create_test_app(bindings: Vec<CatalogBinding>) -> (App, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter = LovAdapterSqlite::new(temp_dir.path()).await.expect("Failed to create adapter");

	let mut builder = AppBuilder::new();
	builder.lov_adapter(Arc::new(adapter)).catalogs(bindings);
	let app = builder.build().await.expect("Failed to build app");

	(app, temp_dir)
}

/// App with the crop catalog registered, and its handle
pub async fn create_crop_catalog() -> (Catalog, App, TempDir) {
	let (app, temp_dir) = create_test_app(vec![crop_binding()]).await;
	let catalog = app.catalog(CROP).expect("Crop catalog should be registered");
	(catalog, app, temp_dir)
}

pub fn names(values: &[Value]) -> Vec<&str> {
	values.iter().map(|v| v.name.as_ref()).collect()
}

/// Hooks that write every call into a shared log
#[derive(Debug, Default)]
pub struct RecordingHooks {
	pub calls: Mutex<Vec<String>>,
}

impl RecordingHooks {
	pub fn calls(&self) -> Vec<String> {
		self.calls.lock().expect("poisoned").clone()
	}

	fn push(&self, call: String) {
		self.calls.lock().expect("poisoned").push(call);
	}
}

impl CatalogHooks for RecordingHooks {
	fn before_create(&self, catalog: &str, value: &NewValue<'_>) {
		self.push(format!("before_create {} {}", catalog, value.name));
	}

	fn after_create(&self, catalog: &str, value: &Value) {
		self.push(format!("after_create {} {}", catalog, value.name));
	}

	fn before_save(&self, catalog: &str, value: &Value) {
		self.push(format!("before_save {} {} {}", catalog, value.name, value.value_type));
	}

	fn after_save(&self, catalog: &str, value: &Value) {
		self.push(format!("after_save {} {} {}", catalog, value.name, value.value_type));
	}
}

/// SQLite adapter whose storage init fails for one catalog key
#[derive(Debug)]
pub struct BrokenCatalogAdapter {
	pub inner: LovAdapterSqlite,
	pub broken: &'static str,
}

impl BrokenCatalogAdapter {
	fn check(&self, schema: &CatalogSchema) -> ClResult<()> {
		if schema.key() == self.broken {
			return Err(Error::DbError);
		}
		Ok(())
	}
}

#[async_trait]
impl LovAdapter for BrokenCatalogAdapter {
	async fn init_catalog(&self, schema: &CatalogSchema) -> ClResult<()> {
		self.check(schema)?;
		self.inner.init_catalog(schema).await
	}

	async fn create_value(&self, schema: &CatalogSchema, value: &NewValue<'_>) -> ClResult<Value> {
		self.check(schema)?;
		self.inner.create_value(schema, value).await
	}

	async fn read_value(&self, schema: &CatalogSchema, value_id: ValueId) -> ClResult<Value> {
		self.check(schema)?;
		self.inner.read_value(schema, value_id).await
	}

	async fn list_values(
		&self,
		schema: &CatalogSchema,
		opts: &ListValueOptions,
	) -> ClResult<Vec<Value>> {
		self.check(schema)?;
		self.inner.list_values(schema, opts).await
	}

	async fn update_value(
		&self,
		schema: &CatalogSchema,
		value_id: ValueId,
		data: &UpdateValueData,
	) -> ClResult<Value> {
		self.check(schema)?;
		self.inner.update_value(schema, value_id, data).await
	}

	async fn list_selected_values(
		&self,
		schema: &CatalogSchema,
		tn_id: TnId,
	) -> ClResult<Vec<Value>> {
		self.check(schema)?;
		self.inner.list_selected_values(schema, tn_id).await
	}

	async fn list_selections(
		&self,
		schema: &CatalogSchema,
		tn_id: TnId,
	) -> ClResult<Vec<Selection>> {
		self.check(schema)?;
		self.inner.list_selections(schema, tn_id).await
	}

	async fn replace_selections(
		&self,
		schema: &CatalogSchema,
		tn_id: TnId,
		desired: &[ValueId],
	) -> ClResult<SelectionChanges> {
		self.check(schema)?;
		self.inner.replace_selections(schema, tn_id, desired).await
	}
}

// vim: ts=4
