//! Crate-level error types shared across flows, the provider registry, and account stores.

// std
use std::path::PathBuf;
// self
use crate::{
	_prelude::*,
	auth::{IdentifierError, ScopeValidationError},
};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical error exposed by public APIs.
///
/// Callback classification and state decoding never produce this type; they report
/// failures through [`crate::flows::CallbackOutcome`] and `Option` respectively.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Requested provider key is not part of the registry.
	///
	/// This is a configuration bug in the caller, not a user-facing condition.
	#[error("Unknown OAuth provider: {provider}.")]
	UnknownProvider {
		/// Provider key that failed the lookup.
		provider: String,
	},
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Account store failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Connector-level rejection (IMAP form validation, non-OAuth sources).
	#[error(transparent)]
	Connect(#[from] ConnectError),
}
impl Error {
	pub(crate) fn unknown_provider(provider: impl Into<String>) -> Self {
		Self::UnknownProvider { provider: provider.into() }
	}
}

/// Configuration and validation failures raised while assembling providers or the
/// deployment origin.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Deployment origin cannot be parsed or is not a bare http(s) origin.
	#[error("Deployment origin `{origin}` is invalid: {reason}.")]
	InvalidOrigin {
		/// Origin string supplied by the caller.
		origin: String,
		/// Why the origin was rejected.
		reason: &'static str,
	},
	/// Provider descriptor violated one of its invariants.
	#[error(transparent)]
	InvalidDescriptor(#[from] crate::provider::ProviderDescriptorError),
	/// A URL inside the provider configuration could not be parsed.
	#[error("Provider `{provider}` declares an invalid URL.")]
	InvalidUrl {
		/// Provider key owning the URL.
		provider: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Identifier validation failed.
	#[error(transparent)]
	InvalidIdentifier(#[from] IdentifierError),
	/// Scope string cannot be normalized.
	#[error("Provider scopes are invalid.")]
	InvalidScope(#[from] ScopeValidationError),
	/// Registry file is not valid TOML.
	#[error("Provider registry configuration is not valid TOML.")]
	Toml(#[from] toml::de::Error),
	/// Registry document does not match the expected schema.
	#[error("Provider registry field `{}` is invalid.", source.path())]
	Schema {
		/// Path-aware deserialization failure.
		#[source]
		source: serde_path_to_error::Error<toml::de::Error>,
	},
	/// Registry file could not be read.
	#[error("Failed to read provider registry from {}.", path.display())]
	Read {
		/// Path that failed to load.
		path: PathBuf,
		/// Underlying I/O failure.
		#[source]
		source: std::io::Error,
	},
}

/// Rejections raised while connecting a source outside the OAuth redirect itself.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ConnectError {
	/// IMAP form was submitted without an email address or password.
	#[error("Email and password are required.")]
	MissingCredentials,
	/// IMAP form was submitted without a server host.
	#[error("IMAP server is required.")]
	MissingServer,
	/// Catalog source does not authorize through OAuth.
	#[error("Source `{source_id}` connects through IMAP, not OAuth.")]
	NotOAuth {
		/// Catalog identifier of the source.
		source_id: String,
	},
	/// Catalog source identifier is not known.
	#[error("Unknown source: {source_id}.")]
	UnknownSource {
		/// Catalog identifier that failed the lookup.
		source_id: String,
	},
}
