pub use crate::app::App;
pub use flexlov_types::error::{ClResult, Error};
pub use flexlov_types::types::{Patch, Timestamp, TnId, ValueId, ValueType};

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
