//! Schema binding of concrete catalog types.
//!
//! A catalog type is described by a `CatalogBinding`: which tenant entity its
//! custom values and selections belong to, how its selection join is laid out,
//! its seed values and its optional hooks. The binding is resolved once at
//! registration into a `CatalogSchema`; a binding that cannot be resolved is a
//! configuration error and the catalog type cannot be used.

use serde::Deserialize;
use std::sync::Arc;

use crate::defaults::DefaultsSpec;
use crate::hooks::{CatalogHooks, NoHooks};
use crate::prelude::*;

const MAX_IDENTIFIER_LENGTH: usize = 48;

/// Columns the selections table always carries.
const RESERVED_SELECTION_COLUMNS: [&str; 2] = ["s_id", "created_at"];

fn default_tenant_field() -> Box<str> {
	"tn_id".into()
}

fn default_value_field() -> Box<str> {
	"value_id".into()
}

/// Layout of the selection join
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionBinding {
	#[serde(default = "default_tenant_field")]
	pub tenant_field: Box<str>,
	#[serde(default = "default_value_field")]
	pub value_field: Box<str>,
}

impl Default for SelectionBinding {
	fn default() -> Self {
		Self { tenant_field: default_tenant_field(), value_field: default_value_field() }
	}
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogBinding {
	pub key: Box<str>,
	#[serde(default)]
	pub tenant_model: Option<Box<str>>,
	#[serde(default)]
	pub selection: Option<SelectionBinding>,
	#[serde(default)]
	pub defaults: DefaultsSpec,
	#[serde(skip)]
	pub hooks: Option<Arc<dyn CatalogHooks>>,
}

impl CatalogBinding {
	pub fn new(key: impl Into<Box<str>>) -> Self {
		Self { key: key.into(), ..Default::default() }
	}

	pub fn tenant_model(mut self, tenant_model: impl Into<Box<str>>) -> Self {
		self.tenant_model = Some(tenant_model.into());
		self
	}

	pub fn selection(mut self, selection: SelectionBinding) -> Self {
		self.selection = Some(selection);
		self
	}

	pub fn defaults(mut self, defaults: DefaultsSpec) -> Self {
		self.defaults = defaults;
		self
	}

	pub fn hooks(mut self, hooks: Arc<dyn CatalogHooks>) -> Self {
		self.hooks = Some(hooks);
		self
	}

	/// Validate the binding and derive the storage layout of the catalog
	pub fn resolve(self) -> ClResult<CatalogSchema> {
		check_identifier("catalog key", &self.key)?;

		let Some(tenant_model) = self.tenant_model else {
			return Err(Error::ConfigError(format!(
				"catalog '{}': a tenant model must be specified",
				self.key
			)));
		};
		if tenant_model.trim().is_empty() {
			return Err(Error::ConfigError(format!(
				"catalog '{}': tenant model cannot be empty",
				self.key
			)));
		}

		let Some(selection) = self.selection else {
			return Err(Error::ConfigError(format!(
				"catalog '{}': a selection binding must be specified",
				self.key
			)));
		};
		check_identifier("tenant field", &selection.tenant_field)?;
		check_identifier("value field", &selection.value_field)?;
		if selection.tenant_field == selection.value_field {
			return Err(Error::ConfigError(format!(
				"catalog '{}': tenant field and value field must differ",
				self.key
			)));
		}
		for field in [&selection.tenant_field, &selection.value_field] {
			if RESERVED_SELECTION_COLUMNS.contains(&field.as_ref()) {
				return Err(Error::ConfigError(format!(
					"catalog '{}': '{}' is a reserved column name",
					self.key, field
				)));
			}
		}

		Ok(CatalogSchema {
			values_table: format!("{}_values", self.key).into(),
			selections_table: format!("{}_selections", self.key).into(),
			key: self.key,
			tenant_model,
			tenant_field: selection.tenant_field,
			value_field: selection.value_field,
			defaults: self.defaults,
			hooks: self.hooks.unwrap_or_else(|| Arc::new(NoHooks)),
		})
	}
}

/// Names end up in SQL statements, so only plain lowercase identifiers are accepted.
fn check_identifier(what: &str, ident: &str) -> ClResult<()> {
	let mut chars = ident.chars();
	let valid = matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
		&& chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
		&& ident.len() <= MAX_IDENTIFIER_LENGTH;

	if valid {
		Ok(())
	} else {
		Err(Error::ConfigError(format!(
			"invalid {} '{}': expected [a-z][a-z0-9_]* of at most {} characters",
			what, ident, MAX_IDENTIFIER_LENGTH
		)))
	}
}

/// A resolved catalog type
#[derive(Clone, Debug)]
pub struct CatalogSchema {
	key: Box<str>,
	tenant_model: Box<str>,
	values_table: Box<str>,
	selections_table: Box<str>,
	tenant_field: Box<str>,
	value_field: Box<str>,
	defaults: DefaultsSpec,
	hooks: Arc<dyn CatalogHooks>,
}

impl CatalogSchema {
	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn tenant_model(&self) -> &str {
		&self.tenant_model
	}

	pub fn values_table(&self) -> &str {
		&self.values_table
	}

	pub fn selections_table(&self) -> &str {
		&self.selections_table
	}

	/// Tenant column of the selections table
	pub fn tenant_field(&self) -> &str {
		&self.tenant_field
	}

	/// Value reference column of the selections table
	pub fn value_field(&self) -> &str {
		&self.value_field
	}

	pub fn defaults(&self) -> &DefaultsSpec {
		&self.defaults
	}

	pub fn hooks(&self) -> &dyn CatalogHooks {
		self.hooks.as_ref()
	}
}


// vim: ts=4
