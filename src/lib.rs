//! Keyed OAuth 2.0 credential cache for automated clients: one authorization flow per identity,
//! access-token or refresh-token caching behind one interface, and session claim preparation for
//! the issuing side.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cache;
pub mod claims;
pub mod error;
pub mod exchange;
pub mod obs;
pub mod policy;
pub mod settings;
pub mod store;

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		hash::Hash,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};

	pub use crate::error::{Error, Result};
}

pub use crate::{
	cache::{CacheStats, CredentialCache},
	policy::{AccessTokenSource, PolicyKind, build_source},
	settings::CacheSettings,
};

#[cfg(test)] use color_eyre as _;
