//! Seed ("default") values of a catalog type.
//!
//! A `DefaultsSpec` is an ordered mapping from value name to its options. In
//! JSON it is written as an object, and the key order of that object is kept:
//!
//! ```text
//! {
//!     "Fruit": { "value_type": "mandatory" },
//!     "Fruit - Apple": { "value_type": "optional" },
//!     "Vegetable": {}
//! }
//! ```
//!
//! An entry without `value_type` is mandatory.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::ValueType;

/// Options of one default entry
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultOptions {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value_type: Option<ValueType>,
}

impl DefaultOptions {
	pub fn value_type(&self) -> ValueType {
		self.value_type.unwrap_or(ValueType::Mandatory)
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefaultEntry {
	pub name: Box<str>,
	pub options: DefaultOptions,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DefaultsSpec {
	entries: Vec<DefaultEntry>,
}

impl DefaultsSpec {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append an entry. `None` means mandatory.
	pub fn entry(mut self, name: impl Into<Box<str>>, value_type: Option<ValueType>) -> Self {
		self.entries.push(DefaultEntry { name: name.into(), options: DefaultOptions { value_type } });
		self
	}

	pub fn mandatory(self, name: impl Into<Box<str>>) -> Self {
		self.entry(name, Some(ValueType::Mandatory))
	}

	pub fn optional(self, name: impl Into<Box<str>>) -> Self {
		self.entry(name, Some(ValueType::Optional))
	}

	pub fn entries(&self) -> &[DefaultEntry] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl Serialize for DefaultsSpec {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut map = serializer.serialize_map(Some(self.entries.len()))?;
		for entry in &self.entries {
			map.serialize_entry(&entry.name, &entry.options)?;
		}
		map.end()
	}
}

struct DefaultsSpecVisitor;

impl<'de> Visitor<'de> for DefaultsSpecVisitor {
	type Value = DefaultsSpec;

	fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
		formatter.write_str("a map of value names to default options")
	}

	fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
	where
		A: MapAccess<'de>,
	{
		let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
		while let Some((name, options)) = access.next_entry::<Box<str>, DefaultOptions>()? {
			entries.push(DefaultEntry { name, options });
		}
		Ok(DefaultsSpec { entries })
	}
}

impl<'de> Deserialize<'de> for DefaultsSpec {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		deserializer.deserialize_map(DefaultsSpecVisitor)
	}
}


// vim: ts=4
