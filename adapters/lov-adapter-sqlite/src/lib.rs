//! SQLite implementation of the flexlov storage adapter.
//!
//! One database file holds every registered catalog type; each catalog type
//! gets its own values and selections tables.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

mod schema;
mod selection;
mod utils;
mod value;

use async_trait::async_trait;
use std::{path::Path, time::Duration};

use sqlx::sqlite::{self, SqlitePool};

use flexlov::{
	binding::CatalogSchema,
	lov_adapter::{self, ListValueOptions, SelectionChanges, UpdateValueData},
	prelude::*,
	types::{NewValue, Selection, Value},
};

const DB_FILE: &str = "lov.db";

#[derive(Debug)]
pub struct LovAdapterSqlite {
	db: SqlitePool,
}

impl LovAdapterSqlite {
	/// Opens (or creates) the database in the `path` directory
	pub async fn new(path: impl AsRef<Path>) -> ClResult<Self> {
		tokio::fs::create_dir_all(path.as_ref()).await?;

		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref().join(DB_FILE))
			.create_if_missing(true)
			.foreign_keys(true)
			.busy_timeout(Duration::from_secs(5))
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		info!("Opened list-of-values database in {}", path.as_ref().display());
		Ok(Self { db })
	}
}

#[async_trait]
impl lov_adapter::LovAdapter for LovAdapterSqlite {
	async fn init_catalog(&self, schema: &CatalogSchema) -> ClResult<()> {
		schema::init_catalog(&self.db, schema)
			.await
			.inspect_err(|err| error!(catalog = %schema.key(), "DbError: {:#?}", err))
			.or(Err(Error::DbError))
	}

	// Values
	//********
	async fn create_value(&self, schema: &CatalogSchema, value: &NewValue<'_>) -> ClResult<Value> {
		value::create(&self.db, schema, value).await
	}

	async fn read_value(&self, schema: &CatalogSchema, value_id: ValueId) -> ClResult<Value> {
		value::read(&self.db, schema, value_id).await
	}

	async fn list_values(
		&self,
		schema: &CatalogSchema,
		opts: &ListValueOptions,
	) -> ClResult<Vec<Value>> {
		value::list(&self.db, schema, opts).await
	}

	async fn update_value(
		&self,
		schema: &CatalogSchema,
		value_id: ValueId,
		data: &UpdateValueData,
	) -> ClResult<Value> {
		value::update(&self.db, schema, value_id, data).await
	}

	// Selections
	//************
	async fn list_selected_values(
		&self,
		schema: &CatalogSchema,
		tn_id: TnId,
	) -> ClResult<Vec<Value>> {
		selection::list_selected_values(&self.db, schema, tn_id).await
	}

	async fn list_selections(
		&self,
		schema: &CatalogSchema,
		tn_id: TnId,
	) -> ClResult<Vec<Selection>> {
		selection::list(&self.db, schema, tn_id).await
	}

	async fn replace_selections(
		&self,
		schema: &CatalogSchema,
		tn_id: TnId,
		desired: &[ValueId],
	) -> ClResult<SelectionChanges> {
		selection::replace(&self.db, schema, tn_id, desired).await
	}
}

// vim: ts=4
