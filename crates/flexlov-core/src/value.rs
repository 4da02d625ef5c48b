//! Value catalog: creating values, resolving what a tenant can see, soft deletion.

use flexlov_types::lov_adapter::{ListValueOptions, UpdateValueData};
use flexlov_types::types::{NewValue, Value};

use crate::app::GlobalTenantPolicy;
use crate::catalog::Catalog;
use crate::prelude::*;

impl Catalog {
	/// Creates a global value every tenant always has selected
	pub async fn create_mandatory(&self, name: &str) -> ClResult<Value> {
		self.create_value(None, name, ValueType::Mandatory).await
	}

	/// Creates a global value tenants may select
	pub async fn create_optional(&self, name: &str) -> ClResult<Value> {
		self.create_value(None, name, ValueType::Optional).await
	}

	/// Creates a custom value owned by `tn_id`
	pub async fn create_for_tenant(&self, tn_id: TnId, name: &str) -> ClResult<Value> {
		self.create_value(Some(tn_id), name, ValueType::Custom).await
	}

	/// Creates a value of any type.
	///
	/// A tenant passed together with a mandatory or optional type is handled by
	/// the configured `GlobalTenantPolicy`. A custom value without a tenant is
	/// rejected with `ValidationError`.
	pub async fn create_value(
		&self,
		tn_id: Option<TnId>,
		name: &str,
		value_type: ValueType,
	) -> ClResult<Value> {
		let tn_id = match (value_type.is_global(), tn_id, self.global_tenant_policy) {
			(true, Some(tn_id), GlobalTenantPolicy::Discard) => {
				warn!(catalog = %self.key(), "Ignoring tenant {} for {} value {:?}", tn_id, value_type, name);
				None
			}
			(_, tn_id, _) => tn_id,
		};

		self.insert(&NewValue { name, value_type, tn_id }).await
	}

	/// Every non-deleted value the tenant may see: all global values plus its own custom ones
	pub async fn visible_to(&self, tn_id: TnId) -> ClResult<Vec<Value>> {
		let opts = ListValueOptions { visible_to: Some(tn_id), ..Default::default() };
		self.adapter.list_values(&self.schema, &opts).await
	}

	/// Reads a value by id, including soft-deleted ones
	pub async fn read_value(&self, value_id: ValueId) -> ClResult<Value> {
		self.adapter.read_value(&self.schema, value_id).await
	}

	pub async fn list_values(&self, opts: &ListValueOptions) -> ClResult<Vec<Value>> {
		self.adapter.list_values(&self.schema, opts).await
	}

	/// Marks a value deleted.
	///
	/// Mandatory and optional values are protected: without `force` the call
	/// succeeds and leaves them untouched. Deleting an already deleted value is
	/// a no-op as well. Selection rows pointing at the value are kept.
	pub async fn soft_delete(&self, value_id: ValueId, force: bool) -> ClResult<()> {
		let value = self.read_value(value_id).await?;
		if value.is_deleted() {
			debug!(catalog = %self.key(), %value_id, "Value already deleted");
			return Ok(());
		}
		if value.value_type.is_global() && !force {
			info!(catalog = %self.key(), %value_id, "Refusing to delete {} value {:?}", value.value_type, value.name);
			return Ok(());
		}

		let data = UpdateValueData { deleted_at: Patch::Value(Timestamp::now()), ..Default::default() };
		self.save(&value, &data).await?;
		info!(catalog = %self.key(), %value_id, "Deleted {} value {:?}", value.value_type, value.name);
		Ok(())
	}
}

// vim: ts=4
