//! IMAP connection form: server inference and validation. No IMAP traffic happens here.

// self
use crate::{
	_prelude::*,
	auth::Secret,
	connectors::catalog::{self, Source},
	error::ConnectError,
};

/// Default IMAPS port.
pub const DEFAULT_IMAP_PORT: u16 = 993;

const KNOWN_SERVERS: &[(&str, &str)] = &[
	("gmail.com", "imap.gmail.com"),
	("googlemail.com", "imap.gmail.com"),
	("outlook.com", "outlook.office365.com"),
	("hotmail.com", "outlook.office365.com"),
	("yahoo.com", "imap.mail.yahoo.com"),
];
const OAUTH_DOMAINS: &[(&str, &str)] = &[
	("gmail.com", "gmail"),
	("googlemail.com", "gmail"),
	("outlook.com", "outlook"),
	("hotmail.com", "outlook"),
	("yahoo.com", "yahoo"),
];

/// Settings submitted through the custom IMAP form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImapSettings {
	/// Mailbox address; also used as the account label.
	pub email: String,
	/// Password or app password.
	pub password: Secret,
	/// IMAP host.
	pub server: String,
	/// IMAP port.
	#[serde(default = "default_port")]
	pub port: u16,
	/// Connect over TLS.
	#[serde(default = "default_ssl")]
	pub ssl: bool,
}
impl ImapSettings {
	/// Builds settings for an address, inferring the server for well-known domains.
	///
	/// The server stays empty for unknown domains and must be set with
	/// [`ImapSettings::with_server`].
	pub fn for_email(email: impl Into<String>, password: Secret) -> Self {
		let email = email.into();
		let server = known_server(email_domain(&email)).unwrap_or_default().to_owned();

		Self { email, password, server, port: DEFAULT_IMAP_PORT, ssl: true }
	}

	/// Overrides the server host.
	pub fn with_server(mut self, server: impl Into<String>) -> Self {
		self.server = server.into();

		self
	}

	/// Overrides the port.
	pub fn with_port(mut self, port: u16) -> Self {
		self.port = port;

		self
	}

	/// Toggles TLS.
	pub fn with_ssl(mut self, ssl: bool) -> Self {
		self.ssl = ssl;

		self
	}

	/// Checks that the form is complete.
	pub fn validate(&self) -> Result<(), ConnectError> {
		if self.email.trim().is_empty() || self.password.is_empty() {
			return Err(ConnectError::MissingCredentials);
		}
		if self.server.trim().is_empty() {
			return Err(ConnectError::MissingServer);
		}

		Ok(())
	}

	/// OAuth source that should be used instead of IMAP for this address, if any.
	pub fn suggested_oauth_source(&self) -> Option<&'static Source> {
		oauth_source_for_email(&self.email)
	}
}

/// Lower-cased domain after the last `@`; empty when the address has none.
pub fn email_domain(email: &str) -> String {
	email.rsplit_once('@').map(|(_, domain)| domain.trim().to_ascii_lowercase()).unwrap_or_default()
}

/// Returns true for consumer domains that connect through OAuth rather than IMAP.
pub fn is_oauth_domain(domain: &str) -> bool {
	OAUTH_DOMAINS.iter().any(|(known, _)| known.eq_ignore_ascii_case(domain))
}

/// Catalog source an address should connect through when its domain supports OAuth.
pub fn oauth_source_for_email(email: &str) -> Option<&'static Source> {
	let domain = email_domain(email);
	let (_, source_id) = OAUTH_DOMAINS.iter().find(|(known, _)| *known == domain)?;

	catalog::find_source(source_id)
}

fn known_server(domain: String) -> Option<&'static str> {
	KNOWN_SERVERS.iter().find(|(known, _)| *known == domain).map(|(_, server)| *server)
}

fn default_port() -> u16 {
	DEFAULT_IMAP_PORT
}

fn default_ssl() -> bool {
	true
}
