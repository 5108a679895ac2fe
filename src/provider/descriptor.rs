//! Provider descriptor data structures shared by the authorization and callback flows.
//!
//! A descriptor captures everything the redirect needs that is fixed per provider: the
//! client identifier issued by the provider, the authorization endpoint, the requested
//! scopes, and any extra query hints. The redirect URI is not stored; it is resolved against
//! the deployment origin at call time.

/// Builder API for assembling provider descriptors.
pub mod builder;
/// Extra authorization query hints.
pub mod hints;

pub use builder::*;
pub use hints::*;

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, ScopeSet},
};

/// Path prefix every provider redirects back to; the provider key is appended.
pub const CALLBACK_PATH_PREFIX: &str = "/auth/callback/";

/// Immutable provider descriptor consumed by flows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Registry key, also used as the callback path segment.
	pub id: ProviderId,
	/// Display label.
	pub name: String,
	/// Client identifier issued by the provider. Opaque to this crate.
	pub client_id: String,
	/// Base URL of the provider's authorization server.
	pub authorization_endpoint: Url,
	/// Permissions requested on every authorization.
	pub scope: ScopeSet,
	/// Extra query parameters appended to the authorization request.
	pub hints: AuthorizationHints,
}
impl ProviderDescriptor {
	/// Creates a new builder for the provided identifier.
	pub fn builder(id: ProviderId) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(id)
	}

	/// Reopens the descriptor as a builder so individual fields can be overridden.
	pub fn to_builder(&self) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder {
			id: self.id.clone(),
			name: Some(self.name.clone()),
			client_id: Some(self.client_id.clone()),
			authorization_endpoint: Some(self.authorization_endpoint.clone()),
			scope: self.scope.clone(),
			hints: self.hints.clone(),
		}
	}

	/// Callback path the provider redirects to, e.g. `/auth/callback/google`.
	pub fn callback_path(&self) -> String {
		callback_path(&self.id)
	}

	/// Resolves the redirect URI against the deployment origin.
	pub fn redirect_uri(&self, origin: &Url) -> Result<Url, url::ParseError> {
		origin.join(&self.callback_path())
	}
}

/// Callback path for a provider key.
pub fn callback_path(provider: &ProviderId) -> String {
	format!("{CALLBACK_PATH_PREFIX}{provider}")
}

/// Extracts the provider key from a callback path.
///
/// Returns `None` for paths outside the callback prefix, for nested segments, and for
/// segments that are not valid provider identifiers. A single trailing slash is tolerated.
pub fn provider_from_callback_path(path: &str) -> Option<ProviderId> {
	let rest = path.strip_prefix(CALLBACK_PATH_PREFIX)?;
	let segment = rest.strip_suffix('/').unwrap_or(rest);

	ProviderId::new(segment).ok()
}
