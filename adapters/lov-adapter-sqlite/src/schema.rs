//! Database schema initialization
//!
//! Each catalog type gets its own values and selections tables, named after
//! the catalog key. The statements only create what is missing, so running
//! them on every startup is safe.

use sqlx::SqlitePool;

use flexlov::binding::CatalogSchema;

/// Initialize the tables and indexes of one catalog type
pub(crate) async fn init_catalog(db: &SqlitePool, schema: &CatalogSchema) -> Result<(), sqlx::Error> {
	let values = schema.values_table();
	let selections = schema.selections_table();
	let tenant_field = schema.tenant_field();
	let value_field = schema.value_field();

	let mut tx = db.begin().await?;

	// Values
	//********
	sqlx::query(&format!(
		"CREATE TABLE IF NOT EXISTS {values} (
		v_id integer PRIMARY KEY AUTOINCREMENT,
		name text NOT NULL,
		name_key text NOT NULL,		-- lowercased name, compared case-insensitively
		type char(1) NOT NULL,		-- 'M' - Mandatory, 'O' - Optional, 'C' - Custom
		tn_id integer,				-- owner tenant, only for 'C'
		created_at datetime DEFAULT (unixepoch()),
		deleted_at datetime,
		CHECK ((type = 'C' AND tn_id IS NOT NULL) OR (type IN ('M', 'O') AND tn_id IS NULL))
	)"
	))
	.execute(&mut *tx)
	.await?;
	// NULL tenants would never collide in a plain unique index
	sqlx::query(&format!(
		"CREATE UNIQUE INDEX IF NOT EXISTS idx_{values}_name
		ON {values}(name_key, coalesce(tn_id, -1)) WHERE deleted_at IS NULL"
	))
	.execute(&mut *tx)
	.await?;
	sqlx::query(&format!(
		"CREATE INDEX IF NOT EXISTS idx_{values}_tnid ON {values}(tn_id) WHERE tn_id NOT NULL"
	))
	.execute(&mut *tx)
	.await?;

	// Selections
	//************
	sqlx::query(&format!(
		"CREATE TABLE IF NOT EXISTS {selections} (
		s_id integer PRIMARY KEY AUTOINCREMENT,
		{tenant_field} integer NOT NULL,
		{value_field} integer NOT NULL REFERENCES {values}(v_id),
		created_at datetime DEFAULT (unixepoch())
	)"
	))
	.execute(&mut *tx)
	.await?;
	sqlx::query(&format!(
		"CREATE UNIQUE INDEX IF NOT EXISTS idx_{selections}_pair
		ON {selections}({tenant_field}, {value_field})"
	))
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
