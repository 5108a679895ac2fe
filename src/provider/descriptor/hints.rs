// self
use crate::_prelude::*;

/// Query parameters the authorization request always carries and hints may not override.
pub const RESERVED_PARAMS: &[&str] =
	&["client_id", "redirect_uri", "scope", "response_type", "state"];

/// Provider-recommended query hints appended to the authorization request.
///
/// The defaults ask for offline access with a forced consent screen, which is what Google
/// needs to issue a refresh token. Providers that ignore the parameters are unaffected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationHints {
	/// `access_type` value, e.g. `offline`.
	pub access_type: Option<String>,
	/// `prompt` value, e.g. `consent`.
	pub prompt: Option<String>,
	/// Additional provider-specific parameters.
	pub extra: BTreeMap<String, String>,
}
impl AuthorizationHints {
	/// Hints that add nothing to the request.
	pub fn none() -> Self {
		Self { access_type: None, prompt: None, extra: BTreeMap::new() }
	}

	/// Adds a provider-specific parameter.
	pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.extra.insert(name.into(), value.into());

		self
	}

	/// Flattens the hints into `(name, value)` pairs in a stable order.
	pub fn params(&self) -> Vec<(&str, &str)> {
		let mut params = Vec::with_capacity(2 + self.extra.len());

		if let Some(access_type) = self.access_type.as_deref() {
			params.push(("access_type", access_type));
		}
		if let Some(prompt) = self.prompt.as_deref() {
			params.push(("prompt", prompt));
		}

		params.extend(self.extra.iter().map(|(k, v)| (k.as_str(), v.as_str())));

		params
	}

	/// First parameter name that collides with a reserved authorization parameter.
	pub(crate) fn reserved_collision(&self) -> Option<&str> {
		self.params().into_iter().map(|(name, _)| name).find(|name| RESERVED_PARAMS.contains(name))
	}
}
impl Default for AuthorizationHints {
	fn default() -> Self {
		Self {
			access_type: Some("offline".into()),
			prompt: Some("consent".into()),
			extra: BTreeMap::new(),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_hints_request_offline_consent() {
		assert_eq!(
			AuthorizationHints::default().params(),
			vec![("access_type", "offline"), ("prompt", "consent")]
		);
		assert!(AuthorizationHints::none().params().is_empty());
	}

	#[test]
	fn extra_params_cannot_shadow_reserved_names() {
		let hints = AuthorizationHints::none().with_param("response_mode", "query");

		assert_eq!(hints.reserved_collision(), None);

		let hints = hints.with_param("state", "forged");

		assert_eq!(hints.reserved_collision(), Some("state"));
	}
}
