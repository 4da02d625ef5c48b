//! Synchronizes the defaults of every catalog listed in the catalogs file.
//!
//! Exits with a failure status when a catalog or a single default could not be applied.

use std::{env, path::PathBuf, process::ExitCode, sync::Arc};

use flexlov_adapter_sqlite::LovAdapterSqlite;
use flexlov_core::config::CatalogsFile;
use flexlov_core::prelude::*;
use flexlov_core::AppBuilder;

pub struct Config {
	pub db_dir: PathBuf,
	pub catalogs_file: PathBuf,
}

impl Config {
	fn from_env() -> Self {
		Config {
			db_dir: env::var("LOV_DB_DIR").unwrap_or_else(|_| "./data".into()).into(),
			catalogs_file: env::var("LOV_CATALOGS").unwrap_or_else(|_| "./catalogs.json".into()).into(),
		}
	}
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
	// Sets up logging before anything else runs
	let builder = AppBuilder::new();

	match update_lovs(builder, Config::from_env()).await {
		Ok(true) => ExitCode::SUCCESS,
		Ok(false) => ExitCode::FAILURE,
		Err(err) => {
			error!("FATAL: {}", err);
			ExitCode::FAILURE
		}
	}
}

async fn update_lovs(mut builder: AppBuilder, config: Config) -> ClResult<bool> {
	let file = CatalogsFile::load(&config.catalogs_file).await?;
	let adapter = LovAdapterSqlite::new(&config.db_dir).await?;

	builder
		.lov_adapter(Arc::new(adapter))
		.global_tenant_policy(file.global_tenant_policy)
		.catalogs(file.catalogs);
	let app = builder.build().await?;

	let mut success = true;
	for res in app.reconcile_all().await {
		match &res.result {
			Ok(report) => {
				for failure in &report.failures {
					error!(catalog = %res.catalog, "Default {:?}: {}", failure.name, failure.error);
				}
				info!(
					catalog = %res.catalog,
					"{} created, {} updated, {} unchanged, {} failed",
					report.created,
					report.updated,
					report.unchanged,
					report.failures.len()
				);
			}
			Err(err) => error!(catalog = %res.catalog, "Catalog failed: {}", err),
		}
		success &= res.is_success();
	}

	Ok(success)
}

// vim: ts=4
