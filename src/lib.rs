//! OAuth authorization-request, state and callback handling for the mail and cloud-storage
//! connectors that feed the document pipeline.
//!
//! The crate never exchanges authorization codes for tokens. It builds provider redirect URLs,
//! round-trips an opaque state token through the provider, classifies the callback, and keeps
//! the connected-account records the dashboard displays.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod connectors;
pub mod error;
pub mod flows;
pub mod obs;
pub mod provider;
pub mod store;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use url;
#[cfg(test)] use {color_eyre as _, tokio as _};
