//! Immutable provider table.
//!
//! The registry is assembled once, either from the compiled-in defaults or from a TOML
//! document layered over them, and then shared behind an [`Arc`]. There is no mutation path
//! after it is handed to a [`crate::flows::Connector`].
//!
//! ```toml
//! [providers.google]
//! client_id = "1093179039078-abc.apps.googleusercontent.com"
//!
//! [providers.zoho]
//! name = "Zoho"
//! client_id = "zoho-client"
//! authorization_endpoint = "https://accounts.zoho.com/oauth/v2/auth"
//! scope = "ZohoMail.messages.READ"
//! prompt = "consent"
//! ```

// std
use std::path::Path;
// self
use crate::{
	_prelude::*,
	auth::{ProviderId, ScopeSet},
	error::ConfigError,
	provider::{AuthorizationHints, ProviderDescriptor, ProviderDescriptorBuilder},
};

struct BuiltinProvider {
	id: &'static str,
	name: &'static str,
	client_id: &'static str,
	authorization_endpoint: &'static str,
	scope: &'static str,
}

// Client ids are placeholders; deployments override them through configuration.
const BUILTIN_PROVIDERS: &[BuiltinProvider] = &[
	BuiltinProvider {
		id: "google",
		name: "Google",
		client_id: "YOUR_GOOGLE_CLIENT_ID",
		authorization_endpoint: "https://accounts.google.com/o/oauth2/v2/auth",
		scope: "https://www.googleapis.com/auth/gmail.readonly https://www.googleapis.com/auth/drive.readonly",
	},
	BuiltinProvider {
		id: "microsoft",
		name: "Microsoft",
		client_id: "YOUR_MICROSOFT_CLIENT_ID",
		authorization_endpoint: "https://login.microsoftonline.com/common/oauth2/v2.0/authorize",
		scope: "https://graph.microsoft.com/Mail.Read https://graph.microsoft.com/Files.Read.All",
	},
	BuiltinProvider {
		id: "yahoo",
		name: "Yahoo",
		client_id: "YOUR_YAHOO_CLIENT_ID",
		authorization_endpoint: "https://api.login.yahoo.com/oauth2/request_auth",
		scope: "mail-r",
	},
];

/// Read-only lookup table of provider descriptors keyed by provider id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProviderRegistry {
	providers: BTreeMap<ProviderId, ProviderDescriptor>,
}
impl ProviderRegistry {
	/// Google, Microsoft and Yahoo with placeholder client ids.
	pub fn builtin() -> Result<Self> {
		let mut registry = Self::default();

		for builtin in BUILTIN_PROVIDERS {
			let id = ProviderId::from_trusted(builtin.id);
			let endpoint = Url::parse(builtin.authorization_endpoint)
				.map_err(|source| ConfigError::InvalidUrl { provider: builtin.id.into(), source })?;
			let descriptor = ProviderDescriptor::builder(id)
				.name(builtin.name)
				.client_id(builtin.client_id)
				.authorization_endpoint(endpoint)
				.scope(ScopeSet::from_str(builtin.scope).map_err(ConfigError::from)?)
				.build()
				.map_err(ConfigError::from)?;

			registry = registry.with_descriptor(descriptor);
		}

		Ok(registry)
	}

	/// Builds a registry from a TOML document.
	pub fn from_toml_str(raw: &str) -> Result<Self> {
		let table = raw.parse::<toml::Table>().map_err(ConfigError::from)?;
		let config: RegistryConfig = serde_path_to_error::deserialize(toml::Value::Table(table))
			.map_err(|source| ConfigError::Schema { source })?;

		config.into_registry()
	}

	/// Reads and builds a registry from a TOML file.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let raw = std::fs::read_to_string(path)
			.map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

		Self::from_toml_str(&raw)
	}

	/// Inserts or replaces a descriptor.
	pub fn with_descriptor(mut self, descriptor: ProviderDescriptor) -> Self {
		self.providers.insert(descriptor.id.clone(), descriptor);

		self
	}

	/// Replaces the client id of an existing provider.
	pub fn with_client_id(mut self, provider: &str, client_id: impl Into<String>) -> Result<Self> {
		let current = self.get(provider)?;
		let descriptor = current.to_builder().client_id(client_id).build().map_err(ConfigError::from)?;

		self.providers.insert(descriptor.id.clone(), descriptor);

		Ok(self)
	}

	/// Looks up a provider, failing with [`Error::UnknownProvider`] when absent.
	pub fn get(&self, provider: &str) -> Result<&ProviderDescriptor> {
		self.providers.get(provider).ok_or_else(|| Error::unknown_provider(provider))
	}

	/// Returns true if the provider key is registered.
	pub fn contains(&self, provider: &str) -> bool {
		self.providers.contains_key(provider)
	}

	/// Iterates descriptors ordered by provider key.
	pub fn iter(&self) -> impl Iterator<Item = &ProviderDescriptor> {
		self.providers.values()
	}

	/// Number of registered providers.
	pub fn len(&self) -> usize {
		self.providers.len()
	}

	/// Returns true when no providers are registered.
	pub fn is_empty(&self) -> bool {
		self.providers.is_empty()
	}
}

/// On-disk registry configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
	/// Start from the compiled-in providers before applying entries.
	#[serde(default = "default_include_builtin")]
	pub include_builtin: bool,
	/// Entries keyed by provider id.
	#[serde(default)]
	pub providers: BTreeMap<String, ProviderEntry>,
}
impl RegistryConfig {
	/// Layers the entries over the (optional) built-ins and validates the result.
	pub fn into_registry(self) -> Result<ProviderRegistry> {
		let mut registry =
			if self.include_builtin { ProviderRegistry::builtin()? } else { ProviderRegistry::default() };

		for (key, entry) in self.providers {
			let id = ProviderId::new(&key).map_err(ConfigError::from)?;
			let base = match registry.providers.get(&id) {
				Some(existing) => existing.to_builder(),
				None => ProviderDescriptor::builder(id),
			};
			let descriptor = entry.apply(&key, base)?;

			registry = registry.with_descriptor(descriptor);
		}

		Ok(registry)
	}
}

fn default_include_builtin() -> bool {
	true
}

/// One `[providers.<key>]` table.
///
/// Every field is optional so an entry can override a single value of a built-in provider.
/// Entries for providers that are not built in must supply `client_id` and
/// `authorization_endpoint`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderEntry {
	/// Display label.
	pub name: Option<String>,
	/// Client identifier.
	pub client_id: Option<String>,
	/// Authorization endpoint.
	pub authorization_endpoint: Option<String>,
	/// Space-delimited scopes.
	pub scope: Option<ScopeSet>,
	/// `access_type` hint; an empty string removes it.
	pub access_type: Option<String>,
	/// `prompt` hint; an empty string removes it.
	pub prompt: Option<String>,
	/// Extra query hints.
	#[serde(default)]
	pub extra: BTreeMap<String, String>,
}
impl ProviderEntry {
	fn apply(
		self,
		key: &str,
		mut builder: ProviderDescriptorBuilder,
	) -> Result<ProviderDescriptor> {
		if let Some(name) = self.name {
			builder = builder.name(name);
		}
		if let Some(client_id) = self.client_id {
			builder = builder.client_id(client_id);
		}
		if let Some(endpoint) = self.authorization_endpoint {
			let url = Url::parse(&endpoint)
				.map_err(|source| ConfigError::InvalidUrl { provider: key.into(), source })?;

			builder = builder.authorization_endpoint(url);
		}
		if let Some(scope) = self.scope {
			builder = builder.scope(scope);
		}

		let mut hints: AuthorizationHints = builder.hints.clone();

		if let Some(access_type) = self.access_type {
			hints.access_type = Some(access_type).filter(|value| !value.is_empty());
		}
		if let Some(prompt) = self.prompt {
			hints.prompt = Some(prompt).filter(|value| !value.is_empty());
		}

		hints.extra.extend(self.extra);

		let descriptor = builder.hints(hints).build().map_err(ConfigError::from)?;

		Ok(descriptor)
	}
}
