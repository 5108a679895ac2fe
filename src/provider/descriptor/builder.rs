// self
use crate::{
	_prelude::*,
	auth::{ProviderId, ScopeSet},
	provider::{AuthorizationHints, ProviderDescriptor},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ProviderDescriptorError {
	/// Authorization endpoint is required.
	#[error("Provider `{provider}` is missing an authorization endpoint.")]
	MissingAuthorizationEndpoint {
		/// Provider key being built.
		provider: String,
	},
	/// Client identifier is required.
	#[error("Provider `{provider}` is missing a client id.")]
	MissingClientId {
		/// Provider key being built.
		provider: String,
	},
	/// Endpoints must use HTTPS.
	#[error("The authorization endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Authorization endpoints cannot carry a fragment.
	#[error("The authorization endpoint must not contain a fragment: {url}.")]
	EndpointFragment {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// A hint tried to override a parameter the flow owns.
	#[error("Hint parameter `{name}` is reserved by the authorization request.")]
	ReservedHint {
		/// Offending parameter name.
		name: String,
	},
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug)]
pub struct ProviderDescriptorBuilder {
	/// Identifier for the descriptor being constructed.
	pub id: ProviderId,
	/// Display label; defaults to the identifier.
	pub name: Option<String>,
	/// Client identifier issued by the provider.
	pub client_id: Option<String>,
	/// Authorization endpoint.
	pub authorization_endpoint: Option<Url>,
	/// Requested scopes.
	pub scope: ScopeSet,
	/// Extra query hints.
	pub hints: AuthorizationHints,
}
impl ProviderDescriptorBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(id: ProviderId) -> Self {
		Self {
			id,
			name: None,
			client_id: None,
			authorization_endpoint: None,
			scope: ScopeSet::default(),
			hints: AuthorizationHints::default(),
		}
	}

	/// Sets the display label.
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());

		self
	}

	/// Sets the client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the authorization endpoint.
	pub fn authorization_endpoint(mut self, url: Url) -> Self {
		self.authorization_endpoint = Some(url);

		self
	}

	/// Sets the requested scopes.
	pub fn scope(mut self, scope: ScopeSet) -> Self {
		self.scope = scope;

		self
	}

	/// Overrides the authorization hints.
	pub fn hints(mut self, hints: AuthorizationHints) -> Self {
		self.hints = hints;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let provider = self.id.to_string();
		let authorization_endpoint = self
			.authorization_endpoint
			.ok_or_else(|| ProviderDescriptorError::MissingAuthorizationEndpoint {
				provider: provider.clone(),
			})?;
		let client_id = self
			.client_id
			.filter(|value| !value.trim().is_empty())
			.ok_or(ProviderDescriptorError::MissingClientId { provider })?;
		let descriptor = ProviderDescriptor {
			name: self.name.unwrap_or_else(|| self.id.to_string()),
			id: self.id,
			client_id,
			authorization_endpoint,
			scope: self.scope,
			hints: self.hints,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), ProviderDescriptorError> {
		let endpoint = &self.authorization_endpoint;

		if endpoint.scheme() != "https" {
			return Err(ProviderDescriptorError::InsecureEndpoint { url: endpoint.to_string() });
		}
		if endpoint.fragment().is_some() {
			return Err(ProviderDescriptorError::EndpointFragment { url: endpoint.to_string() });
		}
		if let Some(name) = self.hints.reserved_collision() {
			return Err(ProviderDescriptorError::ReservedHint { name: name.to_owned() });
		}

		Ok(())
	}
}
