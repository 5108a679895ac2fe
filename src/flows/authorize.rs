//! Authorization-request construction.

// crates.io
use oauth2::{AuthUrl, ClientId, CsrfToken, RedirectUrl, Scope, basic::BasicClient};
// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	error::ConfigError,
	flows::state::StateToken,
	provider::ProviderDescriptor,
};

/// Everything the caller needs to send the user to the provider.
///
/// Nothing here has to be stored: the callback re-derives the expected provider from its
/// path and validates the state token on its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRequest {
	/// Provider the request targets.
	pub provider: ProviderId,
	/// Encoded state token embedded in the URL.
	pub state: String,
	/// Redirect URI registered with the provider and embedded in the URL.
	pub redirect_uri: Url,
	/// Fully-formed authorization URL to open in a popup or new window.
	pub authorize_url: Url,
}

/// Builds an authorization request for `descriptor` against the deployment `origin`.
pub(crate) fn build_request(
	descriptor: &ProviderDescriptor,
	origin: &Url,
) -> Result<AuthorizationRequest> {
	let redirect_uri = descriptor
		.redirect_uri(origin)
		.map_err(|source| ConfigError::InvalidUrl { provider: descriptor.id.to_string(), source })?;
	let state = StateToken::issue(descriptor.id.clone()).encode();
	let authorize_url = build_authorize_url(descriptor, &redirect_uri, &state);

	Ok(AuthorizationRequest {
		provider: descriptor.id.clone(),
		state,
		redirect_uri,
		authorize_url,
	})
}

fn build_authorize_url(descriptor: &ProviderDescriptor, redirect_uri: &Url, state: &str) -> Url {
	let client = BasicClient::new(ClientId::new(descriptor.client_id.clone()))
		.set_auth_uri(AuthUrl::from_url(descriptor.authorization_endpoint.clone()))
		.set_redirect_uri(RedirectUrl::from_url(redirect_uri.clone()));
	let mut request = client
		.authorize_url(|| CsrfToken::new(state.to_owned()))
		.add_scopes(descriptor.scope.iter().map(|scope| Scope::new(scope.clone())));

	for (name, value) in descriptor.hints.params() {
		request = request.add_extra_param(name.to_owned(), value.to_owned());
	}

	let (url, _) = request.url();

	url
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{auth::ScopeSet, flows::state::decode_state, provider::AuthorizationHints};

	fn descriptor(hints: AuthorizationHints) -> ProviderDescriptor {
		ProviderDescriptor::builder(ProviderId::new("google").expect("Provider id should be valid."))
			.client_id("client-123.apps.googleusercontent.com")
			.authorization_endpoint(
				Url::parse("https://accounts.google.com/o/oauth2/v2/auth")
					.expect("Endpoint fixture should parse."),
			)
			.scope(
				ScopeSet::from_str(
					"https://www.googleapis.com/auth/gmail.readonly https://www.googleapis.com/auth/drive.readonly",
				)
				.expect("Scope fixture should parse."),
			)
			.hints(hints)
			.build()
			.expect("Descriptor fixture should build.")
	}

	fn origin() -> Url {
		Url::parse("http://localhost:3000").expect("Origin fixture should parse.")
	}

	#[test]
	fn request_carries_every_required_parameter() {
		let request = build_request(&descriptor(AuthorizationHints::default()), &origin())
			.expect("Request should build.");
		let pairs: HashMap<_, _> = request.authorize_url.query_pairs().into_owned().collect();

		assert!(
			request.authorize_url.as_str().starts_with("https://accounts.google.com/o/oauth2/v2/auth?")
		);
		assert_eq!(pairs.get("client_id").map(String::as_str), Some("client-123.apps.googleusercontent.com"));
		assert_eq!(
			pairs.get("redirect_uri").map(String::as_str),
			Some("http://localhost:3000/auth/callback/google")
		);
		assert_eq!(
			pairs.get("scope").map(String::as_str),
			Some(
				"https://www.googleapis.com/auth/gmail.readonly https://www.googleapis.com/auth/drive.readonly"
			)
		);
		assert_eq!(pairs.get("response_type").map(String::as_str), Some("code"));
		assert_eq!(pairs.get("access_type").map(String::as_str), Some("offline"));
		assert_eq!(pairs.get("prompt").map(String::as_str), Some("consent"));
		assert_eq!(pairs.get("state"), Some(&request.state));
		assert_eq!(request.redirect_uri.as_str(), "http://localhost:3000/auth/callback/google");
	}

	#[test]
	fn embedded_state_names_the_provider() {
		let request = build_request(&descriptor(AuthorizationHints::default()), &origin())
			.expect("Request should build.");
		let token = decode_state(&request.state).expect("Embedded state should decode.");

		assert_eq!(token.provider, request.provider);
	}

	#[test]
	fn hints_can_be_disabled() {
		let request = build_request(&descriptor(AuthorizationHints::none()), &origin())
			.expect("Request should build.");
		let pairs: HashMap<_, _> = request.authorize_url.query_pairs().into_owned().collect();

		assert!(!pairs.contains_key("access_type"));
		assert!(!pairs.contains_key("prompt"));
	}
}
