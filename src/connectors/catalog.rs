//! Compiled-in catalog of connectable sources and their default sync targets.

// self
use crate::{
	_prelude::*,
	auth::SourceId,
	connectors::{DirectoryConfig, DocumentType, FolderConfig},
};

/// What a source holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
	/// Mailbox; synced by folder.
	Email,
	/// Cloud drive; synced by directory.
	Cloud,
}

/// A connectable mail or storage source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Source {
	/// Catalog identifier.
	pub id: &'static str,
	/// Display label.
	pub name: &'static str,
	/// What the source holds.
	pub kind: SourceKind,
	/// Icon shown next to the label.
	pub icon: &'static str,
	/// Registry key of the OAuth provider that authorizes this source; `None` for IMAP.
	pub oauth_provider: Option<&'static str>,
	/// Mail folders can be selected.
	pub supports_folders: bool,
	/// Drive directories can be selected.
	pub supports_directories: bool,
}
impl Source {
	/// Returns true if connecting goes through an OAuth redirect.
	pub fn requires_oauth(&self) -> bool {
		self.oauth_provider.is_some()
	}

	/// Typed catalog identifier.
	pub fn source_id(&self) -> SourceId {
		SourceId::from_trusted(self.id)
	}
}

/// Every source the dashboard offers.
pub const SOURCES: &[Source] = &[
	Source {
		id: "gmail",
		name: "Gmail",
		kind: SourceKind::Email,
		icon: "📧",
		oauth_provider: Some("google"),
		supports_folders: true,
		supports_directories: false,
	},
	Source {
		id: "outlook",
		name: "Outlook",
		kind: SourceKind::Email,
		icon: "📮",
		oauth_provider: Some("microsoft"),
		supports_folders: true,
		supports_directories: false,
	},
	Source {
		id: "yahoo",
		name: "Yahoo Mail",
		kind: SourceKind::Email,
		icon: "📬",
		oauth_provider: Some("yahoo"),
		supports_folders: true,
		supports_directories: false,
	},
	Source {
		id: "google-drive",
		name: "Google Drive",
		kind: SourceKind::Cloud,
		icon: "💾",
		oauth_provider: Some("google"),
		supports_folders: false,
		supports_directories: true,
	},
	Source {
		id: "onedrive",
		name: "OneDrive",
		kind: SourceKind::Cloud,
		icon: "☁️",
		oauth_provider: Some("microsoft"),
		supports_folders: false,
		supports_directories: true,
	},
	Source {
		id: "custom-imap",
		name: "Custom Email (IMAP)",
		kind: SourceKind::Email,
		icon: "✉️",
		oauth_provider: None,
		supports_folders: true,
		supports_directories: false,
	},
];

/// Catalog id of the IMAP source.
pub const IMAP_SOURCE_ID: &str = "custom-imap";

/// Looks up a catalog source.
pub fn find_source(id: &str) -> Option<&'static Source> {
	SOURCES.iter().find(|source| source.id == id)
}

/// Default mail folders for a source; empty when none are known.
pub fn default_folders(source_id: &str) -> Vec<FolderConfig> {
	let table: &[(&str, &str, &str, bool)] = match source_id {
		"gmail" => &[
			("inbox", "Inbox", "INBOX", true),
			("sent", "Sent", "[Gmail]/Sent Mail", false),
			("drafts", "Drafts", "[Gmail]/Drafts", false),
			("spam", "Spam", "[Gmail]/Spam", false),
		],
		"outlook" => &[
			("inbox", "Inbox", "Inbox", true),
			("sent", "Sent Items", "Sent Items", false),
			("drafts", "Drafts", "Drafts", false),
			("junk", "Junk Email", "Junk Email", false),
		],
		"yahoo" | "custom-imap" => &[("inbox", "Inbox", "INBOX", true)],
		_ => &[],
	};

	table
		.iter()
		.map(|(id, name, path, enabled)| FolderConfig::new(*id, *name, *path, *enabled))
		.collect()
}

/// Default drive directories for a source; empty when none are known.
pub fn default_directories(source_id: &str) -> Vec<DirectoryConfig> {
	let table: &[(&str, &str, &str, bool)] = match source_id {
		"google-drive" => &[
			("root", "My Drive", "/", true),
			("documents", "Documents", "/Documents", true),
			("invoices", "Invoices", "/Business/Invoices", true),
			("contracts", "Contracts", "/Business/Contracts", false),
		],
		"onedrive" => &[
			("root", "OneDrive", "/", true),
			("documents", "Documents", "/Documents", true),
			("business", "Business", "/Business", false),
		],
		_ => &[],
	};

	table
		.iter()
		.map(|(id, name, path, enabled)| DirectoryConfig::new(*id, *name, *path, *enabled))
		.collect()
}

/// Document types the pipeline classifies, with their default selection.
pub fn document_types() -> Vec<DocumentType> {
	[
		("invoice", "Invoice", true),
		("po", "Purchase Order", true),
		("delivery-challan", "Delivery Challan", false),
		("receipt", "Receipt", false),
		("contract", "Contract", false),
	]
	.into_iter()
	.map(|(id, name, enabled)| DocumentType { id: id.into(), name: name.into(), enabled })
	.collect()
}
