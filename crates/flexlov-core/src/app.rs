//! App state and builder

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use flexlov_types::binding::CatalogBinding;
use flexlov_types::lov_adapter::LovAdapter;

use crate::catalog::Catalog;
use crate::defaults::CatalogReconcileResult;
use crate::prelude::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// What to do with a tenant passed to the creation of a mandatory or optional value
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalTenantPolicy {
	/// Fail with `ValidationError`
	#[default]
	Reject,
	/// Drop the tenant and create the global value
	Discard,
}

#[derive(Clone, Debug, Default)]
pub struct AppBuilderOpts {
	pub global_tenant_policy: GlobalTenantPolicy,
	/// Reconcile every catalog's defaults in `build`
	pub reconcile_on_start: bool,
}

pub struct AppState {
	pub opts: AppBuilderOpts,
	catalogs: Vec<Catalog>,
}

impl AppState {
	/// Handle of a registered catalog type
	pub fn catalog(&self, key: &str) -> ClResult<Catalog> {
		self.catalogs
			.iter()
			.find(|catalog| catalog.key() == key)
			.cloned()
			.ok_or_else(|| Error::ConfigError(format!("catalog '{}' is not registered", key)))
	}

	/// All registered catalogs in registration order
	pub fn catalogs(&self) -> &[Catalog] {
		&self.catalogs
	}

	/// Initializes and reconciles every catalog. A failing catalog does not stop the others.
	pub async fn reconcile_all(&self) -> Vec<CatalogReconcileResult> {
		let mut results = Vec::with_capacity(self.catalogs.len());
		for catalog in &self.catalogs {
			let result = match catalog.init().await {
				Ok(()) => Ok(catalog.reconcile_defaults().await),
				Err(err) => {
					error!(catalog = %catalog.key(), "Skipping defaults: {}", err);
					Err(err)
				}
			};
			results.push(CatalogReconcileResult { catalog: catalog.key().into(), result });
		}
		results
	}
}

impl std::fmt::Debug for AppState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AppState")
			.field("opts", &self.opts)
			.field("catalogs", &self.catalogs.iter().map(Catalog::key).collect::<Vec<_>>())
			.finish_non_exhaustive()
	}
}

pub type App = Arc<AppState>;

pub struct AppBuilder {
	opts: AppBuilderOpts,
	lov_adapter: Option<Arc<dyn LovAdapter>>,
	bindings: Vec<CatalogBinding>,
}

impl AppBuilder {
	pub fn new() -> Self {
		// A subscriber may already be set by the embedding application
		let _ = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.try_init();
		AppBuilder { opts: AppBuilderOpts::default(), lov_adapter: None, bindings: Vec::new() }
	}

	// Opts
	pub fn global_tenant_policy(&mut self, policy: GlobalTenantPolicy) -> &mut Self {
		self.opts.global_tenant_policy = policy;
		self
	}
	pub fn reconcile_on_start(&mut self, reconcile: bool) -> &mut Self {
		self.opts.reconcile_on_start = reconcile;
		self
	}

	// Adapters
	pub fn lov_adapter(&mut self, lov_adapter: Arc<dyn LovAdapter>) -> &mut Self {
		self.lov_adapter = Some(lov_adapter);
		self
	}

	// Catalogs
	pub fn catalog(&mut self, binding: CatalogBinding) -> &mut Self {
		self.bindings.push(binding);
		self
	}
	pub fn catalogs(&mut self, bindings: impl IntoIterator<Item = CatalogBinding>) -> &mut Self {
		self.bindings.extend(bindings);
		self
	}

	/// Resolves every catalog binding and initializes their storage.
	///
	/// Fails with `ConfigError` if any binding is invalid or a key is registered
	/// twice. Storage failures of single catalogs are logged and left to
	/// surface on first use.
	pub async fn build(self) -> ClResult<App> {
		info!("flexlov V{}", VERSION);

		let Some(lov_adapter) = self.lov_adapter else {
			error!("FATAL: No lov adapter configured");
			return Err(Error::ConfigError("no lov adapter configured".into()));
		};

		let mut catalogs: Vec<Catalog> = Vec::with_capacity(self.bindings.len());
		for binding in self.bindings {
			let schema = binding.resolve().inspect_err(|err| error!("FATAL: {}", err))?;
			if catalogs.iter().any(|c| c.key() == schema.key()) {
				error!("FATAL: Catalog '{}' registered twice", schema.key());
				return Err(Error::ConfigError(format!(
					"catalog '{}' is registered twice",
					schema.key()
				)));
			}
			debug!(catalog = %schema.key(), tenant_model = %schema.tenant_model(), "Registered catalog");
			catalogs.push(Catalog::new(
				Arc::new(schema),
				lov_adapter.clone(),
				self.opts.global_tenant_policy,
			));
		}

		let app: App = Arc::new(AppState { opts: self.opts, catalogs });

		if app.opts.reconcile_on_start {
			for res in app.reconcile_all().await {
				if !res.is_success() {
					warn!(catalog = %res.catalog, "Defaults were not fully applied");
				}
			}
		} else {
			for catalog in &app.catalogs {
				if let Err(err) = catalog.init().await {
					error!(catalog = %catalog.key(), "Catalog unavailable until its storage is fixed: {}", err);
				}
			}
		}

		info!("{} catalogs ready", app.catalogs.len());
		Ok(app)
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

// vim: ts=4
