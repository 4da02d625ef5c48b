//! Common types used throughout flexlov.

use serde::{Deserialize, Serialize, Serializer};
use serde_with::skip_serializing_none;
use std::time::SystemTime;

use crate::prelude::*;

/// Longest accepted value name, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

// TnId //
//******//
/// Opaque tenant identity. The engine only ever compares it for equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TnId(pub u32);

impl std::fmt::Display for TnId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

// ValueId //
//*********//
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueId(pub i64);

impl std::fmt::Display for ValueId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionId(pub i64);

// Timestamp //
//***********//
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Timestamp {
		let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
		Timestamp(res.as_secs().try_into().unwrap_or(i64::MAX))
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

pub fn serialize_timestamp_iso<S>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	match chrono::DateTime::from_timestamp(ts.0, 0) {
		Some(dt) => serializer.serialize_str(&dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
		None => serializer.serialize_i64(ts.0),
	}
}

pub fn serialize_timestamp_iso_opt<S>(ts: &Option<Timestamp>, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	match ts {
		Some(ts) => serialize_timestamp_iso(ts, serializer),
		None => serializer.serialize_none(),
	}
}

// Patch //
//*******//
/// Field update for partial writes: leave as is, clear, or set.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Patch<T> {
	#[default]
	Undefined,
	Null,
	Value(T),
}

impl<T> Patch<T> {
	pub fn is_undefined(&self) -> bool {
		matches!(self, Patch::Undefined)
	}

	pub fn as_ref(&self) -> Patch<&T> {
		match self {
			Patch::Undefined => Patch::Undefined,
			Patch::Null => Patch::Null,
			Patch::Value(v) => Patch::Value(v),
		}
	}
}

// ValueType //
//***********//
/// Kind of a list-of-values entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
	/// Globally visible and always selected. Tenants cannot deselect it.
	Mandatory,
	/// Globally visible, selectable per tenant.
	Optional,
	/// Owned by a single tenant.
	Custom,
}

impl ValueType {
	/// Storage code
	pub fn as_code(self) -> &'static str {
		match self {
			ValueType::Mandatory => "M",
			ValueType::Optional => "O",
			ValueType::Custom => "C",
		}
	}

	pub fn from_code(code: &str) -> ClResult<Self> {
		match code {
			"M" => Ok(ValueType::Mandatory),
			"O" => Ok(ValueType::Optional),
			"C" => Ok(ValueType::Custom),
			_ => Err(Error::Parse),
		}
	}

	pub fn is_global(self) -> bool {
		!matches!(self, ValueType::Custom)
	}
}

impl std::fmt::Display for ValueType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ValueType::Mandatory => write!(f, "mandatory"),
			ValueType::Optional => write!(f, "optional"),
			ValueType::Custom => write!(f, "custom"),
		}
	}
}

/// Case-insensitive comparison key of a value name
pub fn name_key(name: &str) -> String {
	name.to_lowercase()
}

pub fn validate_name(name: &str) -> ClResult<()> {
	if name.trim().is_empty() {
		return Err(Error::ValidationError("value name cannot be empty".into()));
	}
	if name.chars().count() > MAX_NAME_LENGTH {
		return Err(Error::ValidationError(format!(
			"value name '{}' is longer than {} characters",
			name, MAX_NAME_LENGTH
		)));
	}
	Ok(())
}

/// Checks the tenant/type pairing every stored value must satisfy.
pub fn validate_scope(value_type: ValueType, tn_id: Option<TnId>) -> ClResult<()> {
	match (value_type, tn_id) {
		(ValueType::Custom, None) => {
			Err(Error::ValidationError("custom values must belong to a tenant".into()))
		}
		(ValueType::Mandatory | ValueType::Optional, Some(tn_id)) => Err(Error::ValidationError(
			format!("{} values cannot belong to a tenant (got tenant {})", value_type, tn_id),
		)),
		_ => Ok(()),
	}
}

// Records //
//*********//
/// One catalog entry
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Value {
	pub value_id: ValueId,
	pub name: Box<str>,
	pub value_type: ValueType,
	pub tn_id: Option<TnId>,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub created_at: Timestamp,
	#[serde(serialize_with = "serialize_timestamp_iso_opt")]
	pub deleted_at: Option<Timestamp>,
}

impl Value {
	pub fn is_deleted(&self) -> bool {
		self.deleted_at.is_some()
	}

	pub fn validate(&self) -> ClResult<()> {
		validate_name(&self.name)?;
		validate_scope(self.value_type, self.tn_id)
	}
}

impl std::fmt::Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.name)
	}
}

/// A value about to be inserted
#[derive(Clone, Debug)]
pub struct NewValue<'a> {
	pub name: &'a str,
	pub value_type: ValueType,
	pub tn_id: Option<TnId>,
}

impl NewValue<'_> {
	pub fn validate(&self) -> ClResult<()> {
		validate_name(self.name)?;
		validate_scope(self.value_type, self.tn_id)
	}
}

/// One (tenant, value) pair a tenant has chosen
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
	pub selection_id: SelectionId,
	pub tn_id: TnId,
	pub value_id: ValueId,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub created_at: Timestamp,
}


// vim: ts=4
