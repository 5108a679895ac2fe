// std
use std::collections::HashMap;
// crates.io
use url::Url;
// self
use connector_auth::{
	error::Error,
	flows::{AuthorizationRequest, Connector, decode_state},
	provider::ProviderRegistry,
};

fn connector() -> Connector {
	let registry = ProviderRegistry::builtin().expect("Built-in providers should validate.");

	Connector::with_origin(registry, "https://dash.example.com")
		.expect("Origin fixture should be accepted.")
}

fn query(url: &Url) -> HashMap<String, String> {
	url.query_pairs().into_owned().collect()
}

#[test]
fn google_url_has_the_expected_shape() {
	let request = connector().start_authorization("google").expect("Google should authorize.");
	let AuthorizationRequest { provider, state, redirect_uri, authorize_url } = request;

	assert_eq!(provider.as_str(), "google");
	assert!(authorize_url.as_str().starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
	assert_eq!(redirect_uri.as_str(), "https://dash.example.com/auth/callback/google");

	let params = query(&authorize_url);

	assert_eq!(params.get("response_type").map(String::as_str), Some("code"));
	assert_eq!(params.get("client_id").map(String::as_str), Some("YOUR_GOOGLE_CLIENT_ID"));
	assert_eq!(params.get("redirect_uri").map(String::as_str), Some(redirect_uri.as_str()));
	assert_eq!(params.get("access_type").map(String::as_str), Some("offline"));
	assert_eq!(params.get("prompt").map(String::as_str), Some("consent"));
	assert_eq!(
		params.get("scope").map(String::as_str),
		Some(
			"https://www.googleapis.com/auth/gmail.readonly https://www.googleapis.com/auth/drive.readonly"
		)
	);

	let sent_state = params.get("state").expect("URL should carry a state parameter.");

	assert!(!sent_state.is_empty());
	assert_eq!(sent_state, &state);

	let token = decode_state(sent_state).expect("State should decode.");

	assert_eq!(token.provider.as_str(), "google");
}

#[test]
fn every_builtin_provider_builds_a_url() {
	let connector = connector();
	let expected = [
		("google", "https://accounts.google.com/o/oauth2/v2/auth"),
		("microsoft", "https://login.microsoftonline.com/common/oauth2/v2.0/authorize"),
		("yahoo", "https://api.login.yahoo.com/oauth2/request_auth"),
	];

	for (provider, endpoint) in expected {
		let url = connector.authorization_url(provider).expect("Built-in provider should build.");

		assert!(url.as_str().starts_with(endpoint), "{provider}: {url}");
		assert_eq!(
			query(&url).get("redirect_uri").map(String::as_str),
			Some(format!("https://dash.example.com/auth/callback/{provider}").as_str())
		);
	}
}

#[test]
fn every_attempt_gets_a_fresh_state() {
	let connector = connector();
	let first = connector.start_authorization("microsoft").expect("Microsoft should authorize.");
	let second = connector.start_authorization("microsoft").expect("Microsoft should authorize.");

	assert_ne!(first.state, second.state);
	assert_eq!(first.redirect_uri, second.redirect_uri);
}

#[test]
fn unknown_provider_is_a_configuration_error() {
	let err = connector()
		.authorization_url("not-a-real-provider")
		.expect_err("Unknown providers must not produce a URL.");

	assert!(matches!(err, Error::UnknownProvider { ref provider } if provider == "not-a-real-provider"));
}

#[test]
fn default_origin_is_localhost() {
	let registry = ProviderRegistry::builtin().expect("Built-in providers should validate.");
	let connector = Connector::new(registry).expect("Default origin should be valid.");

	assert_eq!(
		connector.redirect_uri("google").expect("Google should resolve.").as_str(),
		"http://localhost:3000/auth/callback/google"
	);
}
