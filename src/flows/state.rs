//! Opaque `state` token carried through the provider redirect.
//!
//! The token is a JSON record (`provider`, `timestamp` in Unix milliseconds, `random`)
//! encoded as unpadded URL-safe base64 so it can sit in a query string without further
//! escaping. It is not signed: it only lets the callback confirm which provider a flow was
//! started for and reject payloads that were never minted here.

// crates.io
use base64::{
	Engine as _,
	engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
};
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{_prelude::*, auth::ProviderId};

const RANDOM_LEN: usize = 16;
// Encoded tokens are ~120 bytes; anything far larger was not minted here.
const MAX_ENCODED_LEN: usize = 1024;

/// Decoded contents of a `state` parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateToken {
	/// Provider the flow was started for.
	pub provider: ProviderId,
	/// Creation instant, serialized as Unix milliseconds.
	#[serde(rename = "timestamp", with = "unix_millis")]
	pub issued_at: OffsetDateTime,
	/// Random component.
	pub random: String,
}
impl StateToken {
	/// Mints a token for the provider using the current clock and the thread RNG.
	pub fn issue(provider: ProviderId) -> Self {
		Self::issue_at(provider, OffsetDateTime::now_utc())
	}

	/// Mints a token with an explicit creation instant.
	pub fn issue_at(provider: ProviderId, issued_at: OffsetDateTime) -> Self {
		let random = rand::rng().sample_iter(Alphanumeric).take(RANDOM_LEN).map(char::from).collect();

		Self { provider, issued_at: truncate_to_millis(issued_at), random }
	}

	/// Serializes the token into its query-safe form.
	pub fn encode(&self) -> String {
		// A struct of strings and an integer always serializes.
		let json = serde_json::to_vec(self).unwrap_or_default();

		URL_SAFE_NO_PAD.encode(json)
	}

	/// Parses a token previously produced by [`StateToken::encode`].
	///
	/// Total over arbitrary input: truncated or corrupted base64, non-UTF-8 payloads, JSON
	/// with missing or extra fields, invalid provider ids, and empty random components all
	/// yield `None`. Standard (padded) base64 is accepted as well, matching tokens minted by
	/// a browser `btoa`.
	pub fn decode(token: &str) -> Option<Self> {
		if token.is_empty() || token.len() > MAX_ENCODED_LEN {
			return None;
		}

		let raw = URL_SAFE_NO_PAD.decode(token).or_else(|_| STANDARD.decode(token)).ok()?;
		let decoded: Self = serde_json::from_slice(&raw).ok()?;

		if decoded.random.is_empty() {
			return None;
		}

		Some(decoded)
	}

	/// Age of the token at `now`. Negative when the token claims a future creation time.
	///
	/// Nothing in the crate rejects tokens by age; callers that want a staleness window can
	/// compare against this value.
	pub fn age_at(&self, now: OffsetDateTime) -> Duration {
		now - self.issued_at
	}

	/// Returns true if the token was minted for `provider`.
	pub fn is_for(&self, provider: &str) -> bool {
		self.provider.as_str() == provider
	}
}

/// Mints and encodes a fresh token for `provider`.
pub fn encode_state(provider: &ProviderId) -> String {
	StateToken::issue(provider.clone()).encode()
}

/// Decodes a `state` parameter; see [`StateToken::decode`].
pub fn decode_state(token: &str) -> Option<StateToken> {
	StateToken::decode(token)
}

fn truncate_to_millis(instant: OffsetDateTime) -> OffsetDateTime {
	let millis = instant.unix_timestamp_nanos() / 1_000_000;

	OffsetDateTime::from_unix_timestamp_nanos(millis * 1_000_000).unwrap_or(instant)
}

mod unix_millis {
	// crates.io
	use serde::{Deserializer, Serializer, de::Error as DeError};
	// self
	use crate::_prelude::*;

	pub fn serialize<S>(instant: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let millis = instant.unix_timestamp_nanos() / 1_000_000;

		serializer.serialize_i64(i64::try_from(millis).unwrap_or(i64::MAX))
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
	where
		D: Deserializer<'de>,
	{
		let millis = i64::deserialize(deserializer)?;

		OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
			.map_err(DeError::custom)
	}
}
