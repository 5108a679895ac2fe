//! Connected-account records and their sync configuration.

// self
use crate::{
	_prelude::*,
	auth::{AccountId, SourceId},
	connectors::{
		ImapSettings,
		catalog::{self, IMAP_SOURCE_ID, Source, SourceKind},
	},
	error::ConnectError,
};

/// How often an account is synced.
#[derive(
	Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum SyncInterval {
	/// Every 15 minutes.
	#[serde(rename = "15m")]
	FifteenMinutes,
	/// Every 30 minutes.
	#[serde(rename = "30m")]
	ThirtyMinutes,
	/// Hourly.
	#[serde(rename = "1h")]
	OneHour,
	/// Every 6 hours.
	#[serde(rename = "6h")]
	SixHours,
	/// Every 12 hours.
	#[default]
	#[serde(rename = "12h")]
	TwelveHours,
	/// Daily.
	#[serde(rename = "24h")]
	Daily,
}
impl SyncInterval {
	/// Every interval, shortest first.
	pub const ALL: [SyncInterval; 6] = [
		SyncInterval::FifteenMinutes,
		SyncInterval::ThirtyMinutes,
		SyncInterval::OneHour,
		SyncInterval::SixHours,
		SyncInterval::TwelveHours,
		SyncInterval::Daily,
	];

	/// Short label (`15m`, `1h`, ...).
	pub const fn as_str(self) -> &'static str {
		match self {
			SyncInterval::FifteenMinutes => "15m",
			SyncInterval::ThirtyMinutes => "30m",
			SyncInterval::OneHour => "1h",
			SyncInterval::SixHours => "6h",
			SyncInterval::TwelveHours => "12h",
			SyncInterval::Daily => "24h",
		}
	}

	/// Interval length.
	pub const fn as_duration(self) -> Duration {
		match self {
			SyncInterval::FifteenMinutes => Duration::minutes(15),
			SyncInterval::ThirtyMinutes => Duration::minutes(30),
			SyncInterval::OneHour => Duration::hours(1),
			SyncInterval::SixHours => Duration::hours(6),
			SyncInterval::TwelveHours => Duration::hours(12),
			SyncInterval::Daily => Duration::hours(24),
		}
	}
}
impl Display for SyncInterval {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for SyncInterval {
	type Err = UnknownSyncInterval;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		SyncInterval::ALL
			.into_iter()
			.find(|interval| interval.as_str() == s)
			.ok_or_else(|| UnknownSyncInterval(s.to_owned()))
	}
}

/// Error returned when parsing an unsupported interval label.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unsupported sync interval: {0}.")]
pub struct UnknownSyncInterval(pub String);

/// Selectable folder or directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncTarget {
	/// Stable identifier within the account.
	pub id: String,
	/// Display label.
	pub name: String,
	/// Provider-side path.
	pub path: String,
	/// Included in syncs.
	pub enabled: bool,
	/// Last successful sync of this target.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub last_sync: Option<OffsetDateTime>,
}
impl SyncTarget {
	/// Creates a target that has never been synced.
	pub fn new(
		id: impl Into<String>,
		name: impl Into<String>,
		path: impl Into<String>,
		enabled: bool,
	) -> Self {
		Self { id: id.into(), name: name.into(), path: path.into(), enabled, last_sync: None }
	}
}

/// Mail folder selection.
pub type FolderConfig = SyncTarget;
/// Drive directory selection.
pub type DirectoryConfig = SyncTarget;

/// Document type filter entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentType {
	/// Stable identifier (`invoice`, `po`, ...).
	pub id: String,
	/// Display label.
	pub name: String,
	/// Selected for extraction.
	pub enabled: bool,
}

/// Per-account sync settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSyncConfig {
	/// Syncing is switched on.
	pub enabled: bool,
	/// How often to sync.
	pub sync_interval: SyncInterval,
	/// Mail folders; `None` for sources without folders.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub folders: Option<Vec<FolderConfig>>,
	/// Drive directories; `None` for sources without directories.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub directories: Option<Vec<DirectoryConfig>>,
	/// Document types to extract.
	pub document_types: Vec<DocumentType>,
}
impl AccountSyncConfig {
	/// Configuration a newly connected account of `source` starts with.
	pub fn defaults_for(source: &Source) -> Self {
		Self {
			enabled: true,
			sync_interval: SyncInterval::default(),
			folders: source.supports_folders.then(|| catalog::default_folders(source.id)),
			directories: source.supports_directories.then(|| catalog::default_directories(source.id)),
			document_types: catalog::document_types().into_iter().filter(|ty| ty.enabled).collect(),
		}
	}

	/// Replaces the interval.
	pub fn with_interval(mut self, interval: SyncInterval) -> Self {
		self.sync_interval = interval;

		self
	}

	/// Toggles a folder or directory by id. Returns false when the id is unknown.
	pub fn set_target_enabled(&mut self, id: &str, enabled: bool) -> bool {
		let mut targets = self.folders.iter_mut().chain(self.directories.iter_mut()).flatten();

		match targets.find(|target| target.id == id) {
			Some(target) => {
				target.enabled = enabled;

				true
			},
			None => false,
		}
	}

	/// Selects or deselects a document type, adding it from the catalog when needed.
	///
	/// Returns false when the id is not a known document type.
	pub fn set_document_type(&mut self, id: &str, enabled: bool) -> bool {
		if let Some(existing) = self.document_types.iter_mut().find(|ty| ty.id == id) {
			existing.enabled = enabled;

			return true;
		}

		match catalog::document_types().into_iter().find(|ty| ty.id == id) {
			Some(mut ty) => {
				ty.enabled = enabled;
				self.document_types.push(ty);

				true
			},
			None => false,
		}
	}

	/// Paths of the enabled folders and directories.
	pub fn enabled_paths(&self) -> Vec<&str> {
		self.folders
			.iter()
			.chain(self.directories.iter())
			.flatten()
			.filter(|target| target.enabled)
			.map(|target| target.path.as_str())
			.collect()
	}
}

/// Connection health shown on the account card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
	/// Connected and idle.
	#[default]
	Connected,
	/// Last sync or authorization failed.
	Error,
	/// A sync is running.
	Syncing,
}

/// An account linked to the pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedAccount {
	/// Record identifier.
	pub id: AccountId,
	/// Catalog source (`gmail`, `google-drive`, ...).
	pub provider_id: SourceId,
	/// Display label of the source.
	pub provider_name: String,
	/// Email address or account identifier.
	pub account_name: String,
	/// Email or cloud account.
	pub kind: SourceKind,
	/// Connection health.
	pub status: AccountStatus,
	/// Last successful sync.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub last_sync: Option<OffsetDateTime>,
	/// Sync settings.
	pub sync_config: AccountSyncConfig,
}
impl ConnectedAccount {
	/// Record for an account whose authorization (or IMAP login) just completed.
	pub fn from_grant(
		source: &Source,
		account_name: impl Into<String>,
		now: OffsetDateTime,
	) -> Self {
		Self {
			id: generate_account_id(source, now),
			provider_id: source.source_id(),
			provider_name: source.name.into(),
			account_name: account_name.into(),
			kind: source.kind,
			status: AccountStatus::Connected,
			last_sync: Some(now),
			sync_config: AccountSyncConfig::defaults_for(source),
		}
	}

	/// Record for a validated IMAP form submission.
	pub fn from_imap(settings: &ImapSettings, now: OffsetDateTime) -> Result<Self, ConnectError> {
		settings.validate()?;

		let source = catalog::find_source(IMAP_SOURCE_ID)
			.ok_or_else(|| ConnectError::UnknownSource { source_id: IMAP_SOURCE_ID.into() })?;

		Ok(Self::from_grant(source, settings.email.trim(), now))
	}

	/// Returns true when the next sync is due at `now`.
	pub fn sync_due(&self, now: OffsetDateTime) -> bool {
		if !self.sync_config.enabled || self.status == AccountStatus::Syncing {
			return false;
		}

		match self.last_sync {
			Some(last) => now - last >= self.sync_config.sync_interval.as_duration(),
			None => true,
		}
	}
}

fn generate_account_id(source: &Source, now: OffsetDateTime) -> AccountId {
	let millis = now.unix_timestamp_nanos() / 1_000_000;

	AccountId::from_trusted(format!("{}-{millis}", source.id))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::Secret;

	fn now() -> OffsetDateTime {
		OffsetDateTime::from_unix_timestamp(1_700_000_000).expect("Fixture timestamp is valid.")
	}

	fn source(id: &str) -> &'static Source {
		catalog::find_source(id).expect("Catalog fixture should exist.")
	}

	#[test]
	fn interval_labels_round_trip() {
		for interval in SyncInterval::ALL {
			assert_eq!(SyncInterval::from_str(interval.as_str()), Ok(interval));
			assert_eq!(
				serde_json::to_string(&interval).expect("Interval should serialize."),
				format!("\"{interval}\"")
			);
		}

		assert!(SyncInterval::from_str("2h").is_err());
		assert_eq!(SyncInterval::Daily.as_duration(), Duration::days(1));
	}

	#[test]
	fn defaults_depend_on_source_capabilities() {
		let mail = AccountSyncConfig::defaults_for(source("gmail"));

		assert!(mail.enabled);
		assert_eq!(mail.sync_interval, SyncInterval::TwelveHours);
		assert_eq!(mail.folders.as_ref().map(Vec::len), Some(4));
		assert!(mail.directories.is_none());
		assert_eq!(mail.document_types.len(), 2);

		let drive = AccountSyncConfig::defaults_for(source("google-drive"));

		assert!(drive.folders.is_none());
		assert_eq!(drive.enabled_paths(), vec!["/", "/Documents", "/Business/Invoices"]);
	}

	#[test]
	fn toggles_update_targets_and_document_types() {
		let mut config = AccountSyncConfig::defaults_for(source("outlook"));

		assert!(config.set_target_enabled("junk", true));
		assert!(!config.set_target_enabled("missing", true));
		assert!(config.enabled_paths().contains(&"Junk Email"));
		assert!(config.set_document_type("receipt", true));
		assert!(config.set_document_type("invoice", false));
		assert!(!config.set_document_type("memo", true));

		let selected: Vec<_> =
			config.document_types.iter().filter(|ty| ty.enabled).map(|ty| ty.id.as_str()).collect();

		assert_eq!(selected, vec!["po", "receipt"]);
	}

	#[test]
	fn granted_accounts_start_connected() {
		let account = ConnectedAccount::from_grant(source("onedrive"), "jane@contoso.com", now());

		assert_eq!(account.id.as_str(), "onedrive-1700000000000");
		assert_eq!(account.provider_id.as_str(), "onedrive");
		assert_eq!(account.kind, SourceKind::Cloud);
		assert_eq!(account.status, AccountStatus::Connected);
		assert!(!account.sync_due(now() + Duration::hours(11)));
		assert!(account.sync_due(now() + Duration::hours(12)));
	}

	#[test]
	fn imap_accounts_require_credentials() {
		let settings = ImapSettings::for_email("ops@example.org", Secret::new(""));

		assert_eq!(
			ConnectedAccount::from_imap(&settings, now()),
			Err(ConnectError::MissingCredentials)
		);

		let settings = ImapSettings::for_email("ops@example.org", Secret::new("pw"))
			.with_server("mail.example.org");
		let account = ConnectedAccount::from_imap(&settings, now()).expect("IMAP should connect.");

		assert_eq!(account.provider_id.as_str(), IMAP_SOURCE_ID);
		assert_eq!(account.account_name, "ops@example.org");
	}

	#[test]
	fn account_serializes_with_snake_case_labels() {
		let account = ConnectedAccount::from_grant(source("gmail"), "john.doe@gmail.com", now());
		let json = serde_json::to_value(&account).expect("Account should serialize.");

		assert_eq!(json["status"], "connected");
		assert_eq!(json["kind"], "email");
		assert_eq!(json["sync_config"]["sync_interval"], "12h");
		assert_eq!(json["last_sync"], "2023-11-14T22:13:20Z");
		assert!(json["sync_config"].get("directories").is_none());

		let back: ConnectedAccount = serde_json::from_value(json).expect("Account should parse.");

		assert_eq!(back, account);
	}
}
