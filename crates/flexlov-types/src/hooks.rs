//! Extension points invoked around value creation and saves.
//!
//! Hooks are pure side effects: nothing they do can change or veto the write.
//! Every method has an empty default so an implementation only overrides the
//! events it cares about.

use std::fmt::Debug;

use crate::types::{NewValue, Value};

pub trait CatalogHooks: Debug + Send + Sync {
	/// Called before a value is inserted, with the arguments of the insert.
	fn before_create(&self, _catalog: &str, _value: &NewValue<'_>) {}

	/// Called after a value was inserted.
	fn after_create(&self, _catalog: &str, _value: &Value) {}

	/// Called before an existing value is written back, with the state about to be stored.
	fn before_save(&self, _catalog: &str, _value: &Value) {}

	/// Called after an existing value was written back.
	fn after_save(&self, _catalog: &str, _value: &Value) {}
}

/// Hooks that do nothing, used when a binding registers none.
#[derive(Debug, Default)]
pub struct NoHooks;

impl CatalogHooks for NoHooks {}

// vim: ts=4
