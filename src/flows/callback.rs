//! Classification of the provider's redirect back to `/auth/callback/{provider}`.
//!
//! Classification is a pure, one-shot function of the query parameters and the provider
//! the callback path names. It never fails and never retries; every invocation yields
//! exactly one terminal [`CallbackOutcome`].

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, Secret},
	flows::state::StateToken,
	provider::provider_from_callback_path,
};

/// Query parameters delivered by the provider redirect.
///
/// Empty values are treated the same as absent ones.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CallbackParams {
	/// Authorization code.
	pub code: Option<Secret>,
	/// State token minted when the flow started.
	pub state: Option<String>,
	/// Provider-reported error code (`access_denied`, ...).
	pub error: Option<String>,
	/// Optional human-readable error detail.
	pub error_description: Option<String>,
}
impl CallbackParams {
	/// Parses an `application/x-www-form-urlencoded` query string (without the leading `?`).
	///
	/// Unknown parameters are ignored; when a parameter repeats, the first value wins.
	pub fn from_query(query: &str) -> Self {
		let mut params = Self::default();

		for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
			let slot = match name.as_ref() {
				"code" => {
					if params.code.is_none() {
						params.code = Some(Secret::new(value.into_owned()));
					}

					continue;
				},
				"state" => &mut params.state,
				"error" => &mut params.error,
				"error_description" => &mut params.error_description,
				_ => continue,
			};

			if slot.is_none() {
				*slot = Some(value.into_owned());
			}
		}

		params
	}

	/// Splits a full callback URL into the provider named by its path and its parameters.
	///
	/// The provider is `None` when the path is not a callback path.
	pub fn from_url(url: &Url) -> (Option<ProviderId>, Self) {
		let provider = provider_from_callback_path(url.path());
		let params = url.query().map(Self::from_query).unwrap_or_default();

		(provider, params)
	}

	fn code(&self) -> Option<&Secret> {
		self.code.as_ref().filter(|code| !code.is_empty())
	}

	fn state(&self) -> Option<&str> {
		self.state.as_deref().filter(|state| !state.is_empty())
	}

	fn error(&self) -> Option<&str> {
		self.error.as_deref().filter(|error| !error.is_empty())
	}
}

/// Why a callback violated the redirect contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolErrorReason {
	/// No `code` parameter.
	MissingCode,
	/// No `state` parameter.
	MissingState,
	/// `state` failed to decode or names a different provider.
	InvalidState,
}
impl ProtocolErrorReason {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProtocolErrorReason::MissingCode => "missing code",
			ProtocolErrorReason::MissingState => "missing state",
			ProtocolErrorReason::InvalidState => "invalid state",
		}
	}

	/// Message shown to the user.
	pub const fn user_message(self) -> &'static str {
		match self {
			ProtocolErrorReason::MissingCode => "No authorization code received",
			ProtocolErrorReason::MissingState => "No state parameter received",
			ProtocolErrorReason::InvalidState => "Invalid state parameter",
		}
	}
}
impl Display for ProtocolErrorReason {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Terminal result of a callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackOutcome {
	/// The user granted access; hand `code` to the backend for exchange.
	AuthorizationGranted {
		/// Authorization code issued by the provider.
		code: Secret,
	},
	/// The provider reported an error, typically because the user declined.
	AuthorizationDenied {
		/// Provider `error` value.
		error: String,
		/// Provider `error_description` value, when sent.
		description: Option<String>,
	},
	/// The redirect did not satisfy the contract.
	ProtocolError {
		/// What was wrong with it.
		reason: ProtocolErrorReason,
	},
}
impl CallbackOutcome {
	/// Returns true for [`CallbackOutcome::AuthorizationGranted`].
	pub fn is_granted(&self) -> bool {
		matches!(self, CallbackOutcome::AuthorizationGranted { .. })
	}

	/// Authorization code, when granted.
	pub fn code(&self) -> Option<&Secret> {
		match self {
			CallbackOutcome::AuthorizationGranted { code } => Some(code),
			_ => None,
		}
	}

	/// Message shown to the user; never contains the authorization code.
	pub fn user_message(&self) -> String {
		match self {
			CallbackOutcome::AuthorizationGranted { .. } =>
				"Copy the authorization code and send it to your backend".into(),
			CallbackOutcome::AuthorizationDenied { error, .. } => format!("OAuth Error: {error}"),
			CallbackOutcome::ProtocolError { reason } => reason.user_message().into(),
		}
	}

	fn rejected(reason: ProtocolErrorReason) -> Self {
		CallbackOutcome::ProtocolError { reason }
	}
}

/// Classifies the redirect parameters for the callback of `expected`.
///
/// Checks run in a fixed order: a provider `error` wins over everything else, then a
/// missing code, a missing state, and finally a state that does not decode or that was
/// minted for another provider. The token's age is not checked.
pub fn classify(expected: &str, params: &CallbackParams) -> CallbackOutcome {
	if let Some(error) = params.error() {
		return CallbackOutcome::AuthorizationDenied {
			error: error.to_owned(),
			description: params.error_description.clone().filter(|value| !value.is_empty()),
		};
	}

	let Some(code) = params.code() else {
		return CallbackOutcome::rejected(ProtocolErrorReason::MissingCode);
	};
	let Some(state) = params.state() else {
		return CallbackOutcome::rejected(ProtocolErrorReason::MissingState);
	};

	match StateToken::decode(state) {
		Some(token) if token.is_for(expected) =>
			CallbackOutcome::AuthorizationGranted { code: code.clone() },
		_ => CallbackOutcome::rejected(ProtocolErrorReason::InvalidState),
	}
}

/// Classifies parameters that arrived outside any callback path.
///
/// A provider `error` is still reported as a denial; anything else is an invalid state,
/// because no expected provider exists to check the token against.
pub fn classify_unrouted(params: &CallbackParams) -> CallbackOutcome {
	match classify("", params) {
		denied @ CallbackOutcome::AuthorizationDenied { .. } => denied,
		_ => CallbackOutcome::rejected(ProtocolErrorReason::InvalidState),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::flows::state::encode_state;

	fn state_for(provider: &str) -> String {
		encode_state(&ProviderId::new(provider).expect("Provider fixture should be valid."))
	}

	fn params(code: Option<&str>, state: Option<String>, error: Option<&str>) -> CallbackParams {
		CallbackParams {
			code: code.map(Secret::new),
			state,
			error: error.map(str::to_owned),
			error_description: None,
		}
	}

	#[test]
	fn valid_callback_is_granted() {
		let outcome = classify("google", &params(Some("abc123"), Some(state_for("google")), None));

		assert!(outcome.is_granted());
		assert_eq!(outcome.code().map(Secret::expose), Some("abc123"));
	}

	#[test]
	fn provider_error_wins_over_everything() {
		let outcome = classify(
			"google",
			&params(Some("abc123"), Some(state_for("google")), Some("access_denied")),
		);

		assert_eq!(
			outcome,
			CallbackOutcome::AuthorizationDenied { error: "access_denied".into(), description: None }
		);
		assert_eq!(outcome.user_message(), "OAuth Error: access_denied");

		let outcome = classify("google", &params(None, None, Some("access_denied")));

		assert!(matches!(outcome, CallbackOutcome::AuthorizationDenied { .. }));
	}

	#[test]
	fn missing_parameters_are_protocol_errors() {
		let outcome = classify("google", &params(None, Some(state_for("google")), None));

		assert_eq!(outcome, CallbackOutcome::ProtocolError { reason: ProtocolErrorReason::MissingCode });

		let outcome = classify("google", &params(Some("abc123"), None, None));

		assert_eq!(
			outcome,
			CallbackOutcome::ProtocolError { reason: ProtocolErrorReason::MissingState }
		);

		let outcome = classify("google", &params(Some(""), Some(String::new()), Some("")));

		assert_eq!(outcome, CallbackOutcome::ProtocolError { reason: ProtocolErrorReason::MissingCode });
	}

	#[test]
	fn state_for_another_provider_is_rejected() {
		let outcome =
			classify("google", &params(Some("abc123"), Some(state_for("microsoft")), None));

		assert_eq!(
			outcome,
			CallbackOutcome::ProtocolError { reason: ProtocolErrorReason::InvalidState }
		);
		assert_eq!(outcome.user_message(), "Invalid state parameter");

		let outcome = classify("google", &params(Some("abc123"), Some("garbage".into()), None));

		assert!(!outcome.is_granted());
	}

	#[test]
	fn unrouted_parameters_are_invalid_state_unless_denied() {
		let cases = [
			params(None, None, None),
			params(Some("abc123"), None, None),
			params(None, Some(state_for("google")), None),
			params(Some("abc123"), Some(state_for("google")), None),
		];

		for case in cases {
			assert_eq!(
				classify_unrouted(&case),
				CallbackOutcome::ProtocolError { reason: ProtocolErrorReason::InvalidState }
			);
		}

		let outcome = classify_unrouted(&params(None, None, Some("access_denied")));

		assert!(matches!(outcome, CallbackOutcome::AuthorizationDenied { .. }));
	}

	#[test]
	fn query_parsing_decodes_and_keeps_first_values() {
		let parsed = CallbackParams::from_query(
			"code=4%2F0Ab&state=xyz&error_description=User+declined&code=second&foo=bar",
		);

		assert_eq!(parsed.code.as_ref().map(Secret::expose), Some("4/0Ab"));
		assert_eq!(parsed.state.as_deref(), Some("xyz"));
		assert_eq!(parsed.error, None);
		assert_eq!(parsed.error_description.as_deref(), Some("User declined"));
	}

	#[test]
	fn from_url_reads_provider_from_path() {
		let url = Url::parse("https://dash.example.com/auth/callback/yahoo?error=access_denied")
			.expect("Callback fixture should parse.");
		let (provider, parsed) = CallbackParams::from_url(&url);

		assert_eq!(provider.as_deref(), Some("yahoo"));
		assert_eq!(parsed.error.as_deref(), Some("access_denied"));

		let url = Url::parse("https://dash.example.com/settings").expect("URL should parse.");

		assert_eq!(CallbackParams::from_url(&url), (None, CallbackParams::default()));
	}

	#[test]
	fn reason_labels_are_stable() {
		assert_eq!(ProtocolErrorReason::MissingCode.to_string(), "missing code");
		assert_eq!(ProtocolErrorReason::MissingState.to_string(), "missing state");
		assert_eq!(ProtocolErrorReason::InvalidState.to_string(), "invalid state");
	}
}
