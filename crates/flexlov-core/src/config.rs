//! Catalogs file loading.
//!
//! ```text
//! {
//!     "global_tenant_policy": "reject",
//!     "catalogs": [
//!         {
//!             "key": "tenant_crop",
//!             "tenant_model": "tenant",
//!             "selection": { "tenant_field": "tn_id", "value_field": "crop_id" },
//!             "defaults": { "Fruit": {}, "Fruit - Apple": { "value_type": "optional" } }
//!         }
//!     ]
//! }
//! ```

use serde::Deserialize;
use std::path::Path;

use flexlov_types::binding::CatalogBinding;

use crate::app::GlobalTenantPolicy;
use crate::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogsFile {
	#[serde(default)]
	pub global_tenant_policy: GlobalTenantPolicy,
	pub catalogs: Vec<CatalogBinding>,
}

impl CatalogsFile {
	pub fn parse(json: &str) -> ClResult<Self> {
		Ok(serde_json::from_str(json)?)
	}

	pub async fn load(path: impl AsRef<Path>) -> ClResult<Self> {
		let path = path.as_ref();
		let json = tokio::fs::read_to_string(path).await.inspect_err(|err| {
			warn!("Cannot read catalogs file {}: {}", path.display(), err);
		})?;
		Self::parse(&json)
	}
}


// vim: ts=4
