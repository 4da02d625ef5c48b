//! Shared utilities for the SQLite adapter
//!
//! Row decoding, the `push_patch!` helper and the mapping of sqlx errors to
//! flexlov errors.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use flexlov::prelude::*;
use flexlov::types::Value;

/// Columns selected for every value read
pub(crate) const VALUE_COLUMNS: &str = "v_id, name, type, tn_id, created_at, deleted_at";

/// Applies a Patch field to an UPDATE statement.
/// Returns true if the field was added (for tracking has_updates)
macro_rules! push_patch {
	($query:expr, $has_updates:expr, $field:literal, $patch:expr, |$v:ident| $convert:expr) => {{
		match $patch {
			Patch::Undefined => $has_updates,
			Patch::Null => {
				if $has_updates {
					$query.push(", ");
				}
				$query.push(concat!($field, "=NULL"));
				true
			}
			Patch::Value($v) => {
				if $has_updates {
					$query.push(", ");
				}
				$query.push(concat!($field, "=")).push_bind($convert);
				true
			}
		}
	}};
}

pub(crate) use push_patch;

/// Log database error for debugging
pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

/// Decode a row selected with `VALUE_COLUMNS`
pub(crate) fn row_to_value(row: &SqliteRow) -> Result<Value, sqlx::Error> {
	let typ: &str = row.try_get("type")?;
	Ok(Value {
		value_id: ValueId(row.try_get("v_id")?),
		name: row.try_get("name")?,
		value_type: ValueType::from_code(typ)
			.map_err(|_| sqlx::Error::Decode(format!("invalid value type '{}'", typ).into()))?,
		tn_id: row.try_get::<Option<u32>, _>("tn_id")?.map(TnId),
		created_at: Timestamp(row.try_get("created_at")?),
		deleted_at: row.try_get::<Option<i64>, _>("deleted_at")?.map(Timestamp),
	})
}

/// Map a single-row query result, translating SQL errors to ClResult
pub(crate) fn map_res<T, F>(row: Result<SqliteRow, sqlx::Error>, f: F) -> ClResult<T>
where
	F: FnOnce(&SqliteRow) -> Result<T, sqlx::Error>,
{
	match row {
		Ok(ref row) => f(row).inspect_err(inspect).map_err(|_| Error::DbError),
		Err(sqlx::Error::RowNotFound) => Err(Error::NotFound),
		Err(err) => {
			inspect(&err);
			Err(Error::DbError)
		}
	}
}

/// Collect result iterator into a vector
pub(crate) fn collect_res<T>(
	iter: impl Iterator<Item = Result<T, sqlx::Error>> + Unpin,
) -> ClResult<Vec<T>> {
	let mut items = Vec::new();
	for item in iter {
		items.push(item.inspect_err(inspect).map_err(|_| Error::DbError)?);
	}
	Ok(items)
}

/// Map the error of a write, keeping constraint violations distinguishable
pub(crate) fn map_write_err(err: sqlx::Error) -> Error {
	inspect(&err);
	match err {
		sqlx::Error::RowNotFound => Error::NotFound,
		sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
			Error::UniquenessError(db_err.message().to_string())
		}
		sqlx::Error::Database(db_err)
			if db_err.is_check_violation() || db_err.is_foreign_key_violation() =>
		{
			Error::IntegrityError(db_err.message().to_string())
		}
		_ => Error::DbError,
	}
}

/// Map any error inside a selection transaction.
///
/// The whole transaction is rolled back, so the caller only needs to know that
/// nothing changed and why.
pub(crate) fn map_tx_err(err: sqlx::Error) -> Error {
	inspect(&err);
	match err {
		sqlx::Error::Database(db_err) => Error::IntegrityError(db_err.message().to_string()),
		err => Error::IntegrityError(err.to_string()),
	}
}

// vim: ts=4
