//! Defaults reconciler: brings a catalog's global values in line with its seed list.
//!
//! Reconciling is idempotent. Each entry is handled on its own; a failing entry
//! is recorded in the report and the remaining entries are still processed.
//! Values missing from the seed list are never touched.

use flexlov_types::defaults::{DefaultEntry, DefaultsSpec};
use flexlov_types::lov_adapter::{ListValueOptions, UpdateValueData};
use flexlov_types::types::{validate_name, NewValue};

use crate::catalog::Catalog;
use crate::prelude::*;

/// A default entry that could not be applied
#[derive(Debug)]
pub struct EntryFailure {
	pub name: Box<str>,
	pub error: Error,
}

/// Outcome of one reconcile run over a catalog
#[derive(Debug, Default)]
pub struct ReconcileReport {
	pub catalog: Box<str>,
	pub created: usize,
	pub updated: usize,
	pub unchanged: usize,
	pub failures: Vec<EntryFailure>,
}

impl ReconcileReport {
	fn new(catalog: &str) -> Self {
		Self { catalog: catalog.into(), ..Default::default() }
	}

	pub fn is_success(&self) -> bool {
		self.failures.is_empty()
	}
}

/// Reconcile result of one catalog inside `AppState::reconcile_all`
#[derive(Debug)]
pub struct CatalogReconcileResult {
	pub catalog: Box<str>,
	pub result: ClResult<ReconcileReport>,
}

impl CatalogReconcileResult {
	pub fn is_success(&self) -> bool {
		self.result.as_ref().is_ok_and(ReconcileReport::is_success)
	}
}

enum EntryOutcome {
	Created,
	Updated,
	Unchanged,
}

impl Catalog {
	/// Reconciles the catalog with the defaults of its binding
	pub async fn reconcile_defaults(&self) -> ReconcileReport {
		self.reconcile_spec(self.schema.defaults()).await
	}

	/// Reconciles the catalog with an explicit defaults list
	pub async fn reconcile_spec(&self, spec: &DefaultsSpec) -> ReconcileReport {
		let mut report = ReconcileReport::new(self.key());

		for entry in spec.entries() {
			match self.reconcile_entry(entry).await {
				Ok(EntryOutcome::Created) => report.created += 1,
				Ok(EntryOutcome::Updated) => report.updated += 1,
				Ok(EntryOutcome::Unchanged) => report.unchanged += 1,
				Err(err) => {
					warn!(catalog = %self.key(), "Default {:?} failed: {}", entry.name, err);
					report.failures.push(EntryFailure { name: entry.name.clone(), error: err });
				}
			}
		}

		info!(
			catalog = %self.key(),
			created = report.created,
			updated = report.updated,
			unchanged = report.unchanged,
			failed = report.failures.len(),
			"Reconciled defaults"
		);
		report
	}

	async fn reconcile_entry(&self, entry: &DefaultEntry) -> ClResult<EntryOutcome> {
		let value_type = entry.options.value_type();
		if !value_type.is_global() {
			return Err(Error::ValidationError(format!(
				"default {:?} cannot be {}, only mandatory or optional",
				entry.name, value_type
			)));
		}
		validate_name(&entry.name)?;

		let opts = ListValueOptions { name: Some(entry.name.clone()), global_only: true, ..Default::default() };
		let existing = self.adapter.list_values(&self.schema, &opts).await?;

		match existing.into_iter().next() {
			None => {
				let new_value = NewValue { name: &entry.name, value_type, tn_id: None };
				// A tenant's custom value with this name blocks the entry
				self.check_name_free(&new_value).await?;
				self.write_new(&new_value).await.map_err(lift_uniqueness)?;
				Ok(EntryOutcome::Created)
			}
			Some(value) if value.value_type == value_type => Ok(EntryOutcome::Unchanged),
			Some(value) => {
				let data = UpdateValueData { value_type: Patch::Value(value_type), ..Default::default() };
				self.save(&value, &data).await?;
				debug!(catalog = %self.key(), value_id = %value.value_id, "Default {:?} changed from {} to {}", value.name, value.value_type, value_type);
				Ok(EntryOutcome::Updated)
			}
		}
	}
}

/// A name collision on insert means another writer created the entry in between
fn lift_uniqueness(err: Error) -> Error {
	match err {
		Error::UniquenessError(msg) => Error::IntegrityError(msg),
		err => err,
	}
}


// vim: ts=4
