//! Tenant selection storage

use std::collections::BTreeSet;

use sqlx::{Row, SqlitePool};

use crate::utils::*;
use flexlov::binding::CatalogSchema;
use flexlov::lov_adapter::SelectionChanges;
use flexlov::prelude::*;
use flexlov::types::{Selection, SelectionId, Value};

/// List the values a tenant has selected, including all mandatory ones
pub(crate) async fn list_selected_values(
	db: &SqlitePool,
	schema: &CatalogSchema,
	tn_id: TnId,
) -> ClResult<Vec<Value>> {
	let values = schema.values_table();
	let selections = schema.selections_table();
	let tenant_field = schema.tenant_field();
	let value_field = schema.value_field();

	let sql = format!(
		"SELECT {VALUE_COLUMNS} FROM {values} v
		WHERE v.deleted_at IS NULL AND (
			v.type = 'M'
			OR (v.type = 'O' AND EXISTS (
				SELECT 1 FROM {selections} s WHERE s.{value_field} = v.v_id AND s.{tenant_field} = ?1))
			OR (v.type = 'C' AND v.tn_id = ?1 AND EXISTS (
				SELECT 1 FROM {selections} s WHERE s.{value_field} = v.v_id AND s.{tenant_field} = ?1))
		)
		ORDER BY v.name_key, v.v_id"
	);
	let rows = sqlx::query(&sql)
		.bind(tn_id.0)
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	collect_res(rows.iter().map(row_to_value))
}

/// List the raw selection rows of a tenant
pub(crate) async fn list(
	db: &SqlitePool,
	schema: &CatalogSchema,
	tn_id: TnId,
) -> ClResult<Vec<Selection>> {
	let sql = format!(
		"SELECT s_id, {vf} AS value_id, created_at FROM {st} WHERE {tf} = ? ORDER BY s_id",
		vf = schema.value_field(),
		st = schema.selections_table(),
		tf = schema.tenant_field(),
	);
	let rows = sqlx::query(&sql)
		.bind(tn_id.0)
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	collect_res(rows.iter().map(|row| {
		Ok(Selection {
			selection_id: SelectionId(row.try_get("s_id")?),
			tn_id,
			value_id: ValueId(row.try_get("value_id")?),
			created_at: Timestamp(row.try_get("created_at")?),
		})
	}))
}

/// Replace the selection rows of a tenant with `desired` in one transaction.
///
/// Adding a row for a soft-deleted value fails with `IntegrityError` and rolls back.
pub(crate) async fn replace(
	db: &SqlitePool,
	schema: &CatalogSchema,
	tn_id: TnId,
	desired: &[ValueId],
) -> ClResult<SelectionChanges> {
	let values = schema.values_table();
	let selections = schema.selections_table();
	let tenant_field = schema.tenant_field();
	let value_field = schema.value_field();

	let mut tx = db.begin().await.map_err(map_tx_err)?;

	let rows = sqlx::query(&format!(
		"SELECT {value_field} AS value_id FROM {selections} WHERE {tenant_field} = ?"
	))
	.bind(tn_id.0)
	.fetch_all(&mut *tx)
	.await
	.map_err(map_tx_err)?;

	let mut existing = BTreeSet::new();
	for row in &rows {
		existing.insert(ValueId(row.try_get("value_id").map_err(map_tx_err)?));
	}
	let desired: BTreeSet<ValueId> = desired.iter().copied().collect();

	let mut changes = SelectionChanges::default();

	let deleted_sql = format!("SELECT 1 FROM {values} WHERE v_id = ? AND deleted_at IS NOT NULL");
	let insert_sql = format!(
		"INSERT INTO {selections} ({tenant_field}, {value_field}, created_at) VALUES (?, ?, ?)"
	);
	let created_at = Timestamp::now();
	for value_id in desired.difference(&existing) {
		// Deleted after the caller checked visibility
		let deleted = sqlx::query(&deleted_sql)
			.bind(value_id.0)
			.fetch_optional(&mut *tx)
			.await
			.map_err(map_tx_err)?;
		if deleted.is_some() {
			return Err(Error::IntegrityError(format!("value {} is deleted", value_id)));
		}

		sqlx::query(&insert_sql)
			.bind(tn_id.0)
			.bind(value_id.0)
			.bind(created_at.0)
			.execute(&mut *tx)
			.await
			.map_err(map_tx_err)?;
		changes.added.push(*value_id);
	}

	let delete_sql =
		format!("DELETE FROM {selections} WHERE {tenant_field} = ? AND {value_field} = ?");
	for value_id in existing.difference(&desired) {
		sqlx::query(&delete_sql)
			.bind(tn_id.0)
			.bind(value_id.0)
			.execute(&mut *tx)
			.await
			.map_err(map_tx_err)?;
		changes.removed.push(*value_id);
	}

	tx.commit().await.map_err(map_tx_err)?;

	Ok(changes)
}

// vim: ts=4
