//! Selection registry: which values a tenant has chosen.

use std::collections::{BTreeSet, HashMap, HashSet};

use flexlov_types::lov_adapter::SelectionChanges;
use flexlov_types::types::{Selection, Value};

use crate::catalog::Catalog;
use crate::prelude::*;

impl Catalog {
	/// Values the tenant's users may pick from.
	///
	/// Always contains every non-deleted mandatory value, whether or not the
	/// tenant has a selection row for it.
	pub async fn selected_for(&self, tn_id: TnId) -> ClResult<Vec<Value>> {
		self.adapter.list_selected_values(&self.schema, tn_id).await
	}

	/// Raw selection rows of the tenant, including rows pointing at deleted values
	pub async fn list_selections(&self, tn_id: TnId) -> ClResult<Vec<Selection>> {
		self.adapter.list_selections(&self.schema, tn_id).await
	}

	/// Makes the tenant's selection exactly `requested` plus all mandatory values.
	///
	/// Every requested id must be visible to the tenant, otherwise the call fails
	/// with `IntegrityError` and nothing changes. Mandatory values cannot be
	/// deselected; omitting them is not an error. Rows pointing at deleted values
	/// are dropped.
	pub async fn apply_selection(
		&self,
		tn_id: TnId,
		requested: &[ValueId],
	) -> ClResult<SelectionChanges> {
		let visible: HashMap<ValueId, ValueType> =
			self.visible_to(tn_id).await?.into_iter().map(|v| (v.value_id, v.value_type)).collect();

		if let Some(unknown) = requested.iter().find(|id| !visible.contains_key(*id)) {
			warn!(catalog = %self.key(), %tn_id, "Rejected selection of value {}", unknown);
			return Err(Error::IntegrityError(format!(
				"value {} is not available to tenant {}",
				unknown, tn_id
			)));
		}

		let mut desired: BTreeSet<ValueId> = requested.iter().copied().collect();
		desired.extend(
			visible
				.iter()
				.filter(|(_, value_type)| **value_type == ValueType::Mandatory)
				.map(|(value_id, _)| *value_id),
		);
		let desired: Vec<ValueId> = desired.into_iter().collect();

		let changes =
			self.adapter.replace_selections(&self.schema, tn_id, &desired).await.inspect_err(|err| {
				warn!(catalog = %self.key(), %tn_id, "Selection update failed: {}", err);
			})?;
		info!(
			catalog = %self.key(),
			%tn_id,
			added = changes.added.len(),
			removed = changes.removed.len(),
			"Applied selection"
		);
		Ok(changes)
	}

	/// Checks that every id is among the tenant's selected values.
	///
	/// For layers letting a tenant's users pick from what the tenant selected.
	/// Fails with `ValidationError` naming the first id that is not selected.
	pub async fn ensure_selected(&self, tn_id: TnId, value_ids: &[ValueId]) -> ClResult<()> {
		let selected: HashSet<ValueId> =
			self.selected_for(tn_id).await?.into_iter().map(|v| v.value_id).collect();

		match value_ids.iter().find(|id| !selected.contains(*id)) {
			Some(value_id) => Err(Error::ValidationError(format!(
				"value {} is not selected by tenant {}",
				value_id, tn_id
			))),
			None => Ok(()),
		}
	}
}

// vim: ts=4
