//! Authorization and callback flows behind the [`Connector`] facade.

pub mod authorize;
pub mod callback;
pub mod state;

pub use authorize::*;
pub use callback::*;
pub use state::*;

// self
use crate::{
	_prelude::*,
	connectors::catalog,
	error::{ConfigError, ConnectError},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::ProviderRegistry,
};

/// Starts authorization flows and classifies their callbacks for one deployment.
///
/// The connector owns a shared, read-only [`ProviderRegistry`] and the deployment origin
/// redirect URIs are resolved against. It holds no per-flow state, so clones are cheap and
/// every call is independent.
#[derive(Clone, Debug)]
pub struct Connector {
	registry: Arc<ProviderRegistry>,
	origin: Url,
}
impl Connector {
	/// Origin used until [`Connector::with_origin`] is called.
	pub const DEFAULT_ORIGIN: &'static str = "http://localhost:3000";

	/// Creates a connector for the registry using [`Connector::DEFAULT_ORIGIN`].
	pub fn new(registry: impl Into<Arc<ProviderRegistry>>) -> Result<Self> {
		Self::with_origin(registry, Self::DEFAULT_ORIGIN)
	}

	/// Creates a connector for the registry and an explicit deployment origin.
	///
	/// The origin must be an absolute `http`/`https` URL with no path beyond `/`, query, or
	/// fragment.
	pub fn with_origin(registry: impl Into<Arc<ProviderRegistry>>, origin: &str) -> Result<Self> {
		Ok(Self { registry: registry.into(), origin: parse_origin(origin)? })
	}

	/// Provider table shared by every flow.
	pub fn registry(&self) -> &ProviderRegistry {
		&self.registry
	}

	/// Origin redirect URIs are resolved against.
	pub fn origin(&self) -> &Url {
		&self.origin
	}

	/// Builds the authorization request for a provider key.
	pub fn start_authorization(&self, provider: &str) -> Result<AuthorizationRequest> {
		const KIND: FlowKind = FlowKind::Authorization;

		let _span = FlowSpan::new(KIND, "start_authorization").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = self
			.registry
			.get(provider)
			.and_then(|descriptor| authorize::build_request(descriptor, &self.origin));

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_err) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);

				#[cfg(feature = "tracing")]
				tracing::error!(provider, error = %_err, "Failed to build authorization request.");
			},
		}

		result
	}

	/// Builds only the authorization URL for a provider key.
	pub fn authorization_url(&self, provider: &str) -> Result<Url> {
		self.start_authorization(provider).map(|request| request.authorize_url)
	}

	/// Starts authorization for a catalog source (`gmail`, `google-drive`, ...).
	pub fn authorization_for_source(&self, source_id: &str) -> Result<AuthorizationRequest> {
		let source = catalog::find_source(source_id)
			.ok_or_else(|| ConnectError::UnknownSource { source_id: source_id.into() })?;
		let provider = source
			.oauth_provider
			.ok_or_else(|| ConnectError::NotOAuth { source_id: source_id.into() })?;

		self.start_authorization(provider)
	}

	/// Redirect URI registered for a provider key.
	pub fn redirect_uri(&self, provider: &str) -> Result<Url> {
		let descriptor = self.registry.get(provider)?;

		descriptor.redirect_uri(&self.origin).map_err(|source| {
			ConfigError::InvalidUrl { provider: provider.into(), source }.into()
		})
	}

	/// Classifies callback parameters for the provider named by the callback path.
	pub fn classify_callback(&self, provider: &str, params: &CallbackParams) -> CallbackOutcome {
		self.observe_callback(provider, || callback::classify(provider, params))
	}

	/// Classifies a full callback URL, taking the expected provider from its path.
	///
	/// URLs outside `/auth/callback/{provider}` cannot name an expected provider, so they are
	/// rejected as [`ProtocolErrorReason::InvalidState`] unless the provider reported an error.
	pub fn handle_callback(&self, url: &Url) -> CallbackOutcome {
		let (provider, params) = CallbackParams::from_url(url);

		match provider {
			Some(provider) => self.classify_callback(&provider, &params),
			None => self.observe_callback("", || callback::classify_unrouted(&params)),
		}
	}

	fn observe_callback(
		&self,
		provider: &str,
		classify: impl FnOnce() -> CallbackOutcome,
	) -> CallbackOutcome {
		const KIND: FlowKind = FlowKind::Callback;

		let _span = FlowSpan::new(KIND, "classify_callback").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let outcome = classify();

		match &outcome {
			CallbackOutcome::AuthorizationGranted { .. } =>
				obs::record_flow_outcome(KIND, FlowOutcome::Success),
			CallbackOutcome::AuthorizationDenied { error, .. } => {
				obs::record_flow_outcome(KIND, FlowOutcome::Denied);

				#[cfg(feature = "tracing")]
				tracing::info!(provider, error = error.as_str(), "Provider denied authorization.");
				#[cfg(not(feature = "tracing"))]
				let _ = (provider, error);
			},
			CallbackOutcome::ProtocolError { reason } => {
				obs::record_flow_outcome(KIND, FlowOutcome::Rejected);

				#[cfg(feature = "tracing")]
				tracing::warn!(provider, reason = reason.as_str(), "Rejected OAuth callback.");
				#[cfg(not(feature = "tracing"))]
				let _ = (provider, reason);
			},
		}

		outcome
	}
}

fn parse_origin(origin: &str) -> Result<Url, ConfigError> {
	let invalid = |reason| ConfigError::InvalidOrigin { origin: origin.into(), reason };
	let url = Url::parse(origin).map_err(|_| invalid("not an absolute URL"))?;

	if !matches!(url.scheme(), "http" | "https") {
		return Err(invalid("scheme must be http or https"));
	}
	if url.host_str().is_none() {
		return Err(invalid("missing host"));
	}
	if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
		return Err(invalid("origin must not carry a path, query, or fragment"));
	}

	Ok(url)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn connector() -> Connector {
		let registry = ProviderRegistry::builtin().expect("Built-in providers should validate.");

		Connector::with_origin(registry, "https://dash.example.com")
			.expect("Origin fixture should be accepted.")
	}

	#[test]
	fn origin_validation() {
		let registry = ProviderRegistry::default();

		assert!(Connector::new(registry.clone()).is_ok());
		assert!(Connector::with_origin(registry.clone(), "https://dash.example.com/").is_ok());

		for origin in ["dash.example.com", "ftp://dash.example.com", "https://x.io/app", "https://x.io/?a=b"] {
			let err = Connector::with_origin(registry.clone(), origin)
				.expect_err("Origin should be rejected.");

			assert!(matches!(err, Error::Config(ConfigError::InvalidOrigin { .. })), "{origin}");
		}
	}

	#[test]
	fn unknown_provider_produces_no_url() {
		let err = connector()
			.authorization_url("not-a-real-provider")
			.expect_err("Unknown providers must fail.");

		assert!(matches!(err, Error::UnknownProvider { .. }));
	}

	#[test]
	fn sources_map_onto_their_oauth_provider() {
		let connector = connector();
		let request = connector
			.authorization_for_source("google-drive")
			.expect("Google Drive should authorize through Google.");

		assert_eq!(request.provider.as_str(), "google");

		let request =
			connector.authorization_for_source("onedrive").expect("OneDrive should authorize.");

		assert_eq!(request.provider.as_str(), "microsoft");

		let err = connector
			.authorization_for_source("custom-imap")
			.expect_err("IMAP sources have no OAuth flow.");

		assert!(matches!(err, Error::Connect(ConnectError::NotOAuth { .. })));

		let err = connector.authorization_for_source("dropbox").expect_err("Unknown source.");

		assert!(matches!(err, Error::Connect(ConnectError::UnknownSource { .. })));
	}

	#[test]
	fn redirect_uri_uses_the_deployment_origin() {
		let redirect = connector().redirect_uri("yahoo").expect("Yahoo should resolve.");

		assert_eq!(redirect.as_str(), "https://dash.example.com/auth/callback/yahoo");
	}

	#[test]
	fn non_callback_urls_are_rejected() {
		let connector = connector();
		let state = encode_state(&crate::auth::ProviderId::new("google").expect("Valid id."));
		let url = Url::parse(&format!("https://dash.example.com/elsewhere?code=abc&state={state}"))
			.expect("URL should parse.");

		assert_eq!(
			connector.handle_callback(&url),
			CallbackOutcome::ProtocolError { reason: ProtocolErrorReason::InvalidState }
		);

		for url in [
			"https://dash.example.com/elsewhere",
			"https://dash.example.com/elsewhere?code=abc",
			"https://dash.example.com/auth/callback/?code=abc",
		] {
			let url = Url::parse(url).expect("URL should parse.");

			assert_eq!(
				connector.handle_callback(&url),
				CallbackOutcome::ProtocolError { reason: ProtocolErrorReason::InvalidState },
				"{url}"
			);
		}

		let url = Url::parse("https://dash.example.com/elsewhere?error=access_denied")
			.expect("URL should parse.");

		assert!(matches!(
			connector.handle_callback(&url),
			CallbackOutcome::AuthorizationDenied { .. }
		));
	}

	#[test]
	fn accessors_expose_validated_configuration() {
		let connector = connector();

		assert_eq!(connector.origin().as_str(), "https://dash.example.com/");
		assert!(connector.registry().contains("google"));
	}
}
