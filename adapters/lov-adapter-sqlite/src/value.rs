//! Catalog value storage
//!
//! Values are never removed by the adapter; deletion is a `deleted_at` update.

use sqlx::SqlitePool;

use crate::utils::*;
use flexlov::binding::CatalogSchema;
use flexlov::lov_adapter::{ListValueOptions, UpdateValueData};
use flexlov::prelude::*;
use flexlov::types::{name_key, NewValue, Value};

/// Insert a new value and return it as stored
pub(crate) async fn create(
	db: &SqlitePool,
	schema: &CatalogSchema,
	value: &NewValue<'_>,
) -> ClResult<Value> {
	let sql = format!(
		"INSERT INTO {} (name, name_key, type, tn_id, created_at) VALUES (?, ?, ?, ?, ?)
		RETURNING {}",
		schema.values_table(),
		VALUE_COLUMNS
	);
	let row = sqlx::query(&sql)
		.bind(value.name)
		.bind(name_key(value.name))
		.bind(value.value_type.as_code())
		.bind(value.tn_id.map(|tn_id| tn_id.0))
		.bind(Timestamp::now().0)
		.fetch_one(db)
		.await
		.map_err(|err| match map_write_err(err) {
			Error::UniquenessError(_) => Error::UniquenessError(format!(
				"'{}' already exists in {}",
				value.name,
				match value.tn_id {
					Some(tn_id) => format!("the scope of tenant {}", tn_id),
					None => "the global scope".to_string(),
				}
			)),
			err => err,
		})?;

	row_to_value(&row).inspect_err(inspect).map_err(|_| Error::DbError)
}

/// Read a single value by ID, deleted or not
pub(crate) async fn read(db: &SqlitePool, schema: &CatalogSchema, value_id: ValueId) -> ClResult<Value> {
	let sql = format!("SELECT {} FROM {} WHERE v_id = ?", VALUE_COLUMNS, schema.values_table());
	let res = sqlx::query(&sql).bind(value_id.0).fetch_one(db).await;

	map_res(res, row_to_value)
}

/// List values with optional filtering
pub(crate) async fn list(
	db: &SqlitePool,
	schema: &CatalogSchema,
	opts: &ListValueOptions,
) -> ClResult<Vec<Value>> {
	let mut query = sqlx::QueryBuilder::new(format!(
		"SELECT {} FROM {} WHERE 1=1",
		VALUE_COLUMNS,
		schema.values_table()
	));

	if !opts.include_deleted {
		query.push(" AND deleted_at IS NULL");
	}
	if let Some(tn_id) = opts.visible_to {
		query.push(" AND (type IN ('M', 'O') OR (type = 'C' AND tn_id = ");
		query.push_bind(tn_id.0);
		query.push("))");
	}
	if let Some(value_type) = opts.value_type {
		query.push(" AND type = ").push_bind(value_type.as_code());
	}
	if let Some(name) = &opts.name {
		query.push(" AND name_key = ").push_bind(name_key(name));
	}
	if opts.global_only {
		query.push(" AND tn_id IS NULL");
	}
	query.push(" ORDER BY name_key, v_id");
	debug!("SQL: {}", query.sql());

	let rows = query
		.build()
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	collect_res(rows.iter().map(row_to_value))
}

/// Update a value and return its new state
pub(crate) async fn update(
	db: &SqlitePool,
	schema: &CatalogSchema,
	value_id: ValueId,
	data: &UpdateValueData,
) -> ClResult<Value> {
	let mut query = sqlx::QueryBuilder::new(format!("UPDATE {} SET ", schema.values_table()));

	let mut has_updates = false;
	has_updates = push_patch!(query, has_updates, "type", &data.value_type, |v| v.as_code());
	has_updates = push_patch!(query, has_updates, "deleted_at", &data.deleted_at, |v| v.0);

	if !has_updates {
		return read(db, schema, value_id).await;
	}

	query.push(" WHERE v_id = ").push_bind(value_id.0);
	query.push(" RETURNING ").push(VALUE_COLUMNS);

	let row = query.build().fetch_optional(db).await.map_err(map_write_err)?;
	let Some(row) = row else {
		return Err(Error::NotFound);
	};

	row_to_value(&row).inspect_err(inspect).map_err(|_| Error::DbError)
}

// vim: ts=4
