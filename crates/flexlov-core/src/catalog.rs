//! Handle to one registered catalog type.
//!
//! The value, selection and defaults operations are implemented on `Catalog`
//! in their own modules. All writes to a value go through `insert` (or the
//! `check_name_free` plus `write_new` pair it is made of) or `save`, so
//! validation and hooks run the same way for every caller.

use std::sync::Arc;

use flexlov_types::binding::CatalogSchema;
use flexlov_types::lov_adapter::{ListValueOptions, LovAdapter, UpdateValueData};
use flexlov_types::types::{NewValue, Value};

use crate::app::GlobalTenantPolicy;
use crate::prelude::*;

#[derive(Clone, Debug)]
pub struct Catalog {
	pub(crate) schema: Arc<CatalogSchema>,
	pub(crate) adapter: Arc<dyn LovAdapter>,
	pub(crate) global_tenant_policy: GlobalTenantPolicy,
}

impl Catalog {
	pub fn new(
		schema: Arc<CatalogSchema>,
		adapter: Arc<dyn LovAdapter>,
		global_tenant_policy: GlobalTenantPolicy,
	) -> Self {
		Self { schema, adapter, global_tenant_policy }
	}

	pub fn key(&self) -> &str {
		self.schema.key()
	}

	pub fn schema(&self) -> &CatalogSchema {
		&self.schema
	}

	/// Creates the catalog's storage if missing
	pub async fn init(&self) -> ClResult<()> {
		self.adapter.init_catalog(&self.schema).await.inspect_err(|err| {
			warn!(catalog = %self.key(), "Catalog storage init failed: {}", err);
		})
	}

	pub(crate) async fn insert(&self, value: &NewValue<'_>) -> ClResult<Value> {
		value.validate()?;
		self.check_name_free(value).await?;
		self.write_new(value).await
	}

	/// Fails with `UniquenessError` if the name would appear twice in some tenant's view.
	///
	/// A custom value collides with active global values and with the owner's
	/// custom values. A global value collides with every active value, since
	/// each tenant sees it next to its own custom ones.
	pub(crate) async fn check_name_free(&self, value: &NewValue<'_>) -> ClResult<()> {
		let opts = ListValueOptions { name: Some(value.name.into()), ..Default::default() };
		let existing = self.adapter.list_values(&self.schema, &opts).await?;
		let clash = existing.iter().find(|other| shares_a_view(value.tn_id, other));

		match clash {
			Some(other) => {
				debug!(catalog = %self.key(), value_id = %other.value_id, "Name {:?} already taken", value.name);
				Err(Error::UniquenessError(match other.tn_id {
					Some(owner) => {
						format!("'{}' is already a custom value of tenant {}", other.name, owner)
					}
					None => format!("'{}' is already a {} value", other.name, other.value_type),
				}))
			}
			None => Ok(()),
		}
	}

	/// Inserts an already validated value without the name lookup.
	/// The store's own per-scope constraint still applies.
	pub(crate) async fn write_new(&self, value: &NewValue<'_>) -> ClResult<Value> {
		let hooks = self.schema.hooks();
		hooks.before_create(self.key(), value);
		let created = self.adapter.create_value(&self.schema, value).await?;
		hooks.after_create(self.key(), &created);
		debug!(catalog = %self.key(), value_id = %created.value_id, "Created {} value {:?}", created.value_type, created.name);
		Ok(created)
	}

	pub(crate) async fn save(&self, current: &Value, data: &UpdateValueData) -> ClResult<Value> {
		let pending = apply_patch(current, data);
		pending.validate()?;
		let hooks = self.schema.hooks();
		hooks.before_save(self.key(), &pending);
		let saved = self.adapter.update_value(&self.schema, current.value_id, data).await?;
		hooks.after_save(self.key(), &saved);
		Ok(saved)
	}
}

/// Whether a value owned by `tn_id` (global if `None`) and `other` are visible to a common tenant
fn shares_a_view(tn_id: Option<TnId>, other: &Value) -> bool {
	match (tn_id, other.tn_id) {
		(Some(owner), Some(other_owner)) => owner == other_owner,
		_ => true,
	}
}

/// State a value will have once `data` is written
fn apply_patch(current: &Value, data: &UpdateValueData) -> Value {
	let mut pending = current.clone();
	if let Patch::Value(value_type) = data.value_type {
		pending.value_type = value_type;
	}
	match data.deleted_at {
		Patch::Undefined => {}
		Patch::Null => pending.deleted_at = None,
		Patch::Value(ts) => pending.deleted_at = Some(ts),
	}
	pending
}


// vim: ts=4
