//! Builds the provider redirect for every OAuth source in the catalog, the way the dashboard's
//! "Connect" buttons do before opening the popup.

// crates.io
use color_eyre::Result;
// self
use connector_auth::{
	connectors::SOURCES,
	flows::{Connector, decode_state},
	provider::ProviderRegistry,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let registry = ProviderRegistry::builtin()?
		.with_client_id("google", "1093179039078-demo.apps.googleusercontent.com")?;
	let connector = Connector::with_origin(registry, "https://dash.example.com")?;

	for source in SOURCES {
		if !source.requires_oauth() {
			println!("{} connects with IMAP credentials; no redirect needed.", source.name);

			continue;
		}

		let request = connector.authorization_for_source(source.id)?;
		let token = decode_state(&request.state)
			.ok_or_else(|| color_eyre::eyre::eyre!("Freshly minted state did not decode."))?;

		println!("{} -> {}", source.name, request.authorize_url);
		println!("  redirect_uri: {}", request.redirect_uri);
		println!("  state names provider `{}`, minted at {}.", token.provider, token.issued_at);
	}

	Ok(())
}
