//! Classifies a handful of provider redirects the way the `/auth/callback/{provider}` page does.

// crates.io
use color_eyre::Result;
use url::Url;
// self
use connector_auth::{
	auth::ProviderId,
	flows::{CallbackOutcome, Connector, encode_state},
	provider::ProviderRegistry,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let connector = Connector::new(ProviderRegistry::builtin()?)?;
	let google_state = encode_state(&ProviderId::new("google")?);
	let microsoft_state = encode_state(&ProviderId::new("microsoft")?);
	let redirects = [
		format!("http://localhost:3000/auth/callback/google?code=4%2F0Ab-demo&state={google_state}"),
		"http://localhost:3000/auth/callback/google?error=access_denied".to_owned(),
		format!("http://localhost:3000/auth/callback/google?code=abc&state={microsoft_state}"),
		"http://localhost:3000/auth/callback/yahoo?code=abc".to_owned(),
	];

	for redirect in redirects {
		let url = Url::parse(&redirect)?;
		let outcome = connector.handle_callback(&url);

		match &outcome {
			CallbackOutcome::AuthorizationGranted { code } => println!(
				"{}: granted; send the {}-byte code to the backend for exchange.",
				url.path(),
				code.expose().len()
			),
			_ => println!("{}: {}", url.path(), outcome.user_message()),
		}
	}

	Ok(())
}
