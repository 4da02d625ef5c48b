//! Adapter that stores the values and selections of catalog types.
//!
//! Every method receives the resolved `CatalogSchema` of the catalog it works
//! on; the adapter decides how that catalog is laid out in its store. Each
//! mutating method is a single atomic unit in the store.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::binding::CatalogSchema;
use crate::prelude::*;
use crate::types::{NewValue, Selection, Value};

/// Options for listing values
#[derive(Debug, Default)]
pub struct ListValueOptions {
	/// Restrict to global values plus the custom values of this tenant
	pub visible_to: Option<TnId>,
	pub value_type: Option<ValueType>,
	/// Exact case-insensitive name match
	pub name: Option<Box<str>>,
	/// Only global (tenant-less) values
	pub global_only: bool,
	pub include_deleted: bool,
}

/// Data needed to update a value
#[derive(Debug, Default)]
pub struct UpdateValueData {
	pub value_type: Patch<ValueType>,
	pub deleted_at: Patch<Timestamp>,
}

/// Outcome of replacing a tenant's selections
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionChanges {
	pub added: Vec<ValueId>,
	pub removed: Vec<ValueId>,
}

impl SelectionChanges {
	pub fn is_empty(&self) -> bool {
		self.added.is_empty() && self.removed.is_empty()
	}
}

#[async_trait]
pub trait LovAdapter: Debug + Send + Sync {
	/// Creates the storage of a catalog type if it does not exist yet
	async fn init_catalog(&self, schema: &CatalogSchema) -> ClResult<()>;

	// Values
	//********

	/// Inserts a value. Fails with `UniquenessError` on a name collision in the same scope.
	async fn create_value(&self, schema: &CatalogSchema, value: &NewValue<'_>) -> ClResult<Value>;

	/// Reads a value, including soft-deleted ones
	async fn read_value(&self, schema: &CatalogSchema, value_id: ValueId) -> ClResult<Value>;

	/// Lists values ordered by case-insensitive name
	async fn list_values(
		&self,
		schema: &CatalogSchema,
		opts: &ListValueOptions,
	) -> ClResult<Vec<Value>>;

	async fn update_value(
		&self,
		schema: &CatalogSchema,
		value_id: ValueId,
		data: &UpdateValueData,
	) -> ClResult<Value>;

	// Selections
	//************

	/// Mandatory values, plus the non-deleted optional and own custom values the tenant selected
	async fn list_selected_values(&self, schema: &CatalogSchema, tn_id: TnId)
		-> ClResult<Vec<Value>>;

	/// Raw selection rows of a tenant, including the ones pointing at deleted values
	async fn list_selections(&self, schema: &CatalogSchema, tn_id: TnId)
		-> ClResult<Vec<Selection>>;

	/// Makes the tenant's selection rows match `desired` exactly, in one transaction.
	/// On any failure nothing is changed.
	async fn replace_selections(
		&self,
		schema: &CatalogSchema,
		tn_id: TnId,
		desired: &[ValueId],
	) -> ClResult<SelectionChanges>;
}

// vim: ts=4
