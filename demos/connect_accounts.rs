//! Connects an OAuth account and an IMAP mailbox, tunes their sync settings, and lists them.

// crates.io
use color_eyre::{Result, eyre::eyre};
use time::OffsetDateTime;
// self
use connector_auth::{
	auth::Secret,
	connectors::{ConnectedAccount, ImapSettings, SyncInterval, find_source},
	store::{AccountStore, MemoryAccountStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let store = MemoryAccountStore::default();
	let now = OffsetDateTime::now_utc();
	let drive = find_source("google-drive").ok_or_else(|| eyre!("Google Drive is not in the catalog."))?;
	let drive_account = ConnectedAccount::from_grant(drive, "john.doe@gmail.com", now);
	let imap = ImapSettings::for_email("ops@example.org", Secret::new("app-password"))
		.with_server("mail.example.org");

	if let Some(source) = imap.suggested_oauth_source() {
		println!("{} supports OAuth; prefer the {} connector.", imap.email, source.name);
	}

	let imap_account = ConnectedAccount::from_imap(&imap, now)?;

	store.connect(drive_account.clone()).await?;
	store.connect(imap_account).await?;

	let mut config = drive_account.sync_config.clone().with_interval(SyncInterval::OneHour);

	config.set_target_enabled("contracts", true);
	config.set_document_type("contract", true);
	store.update_sync_config(&drive_account.id, config).await?;

	for account in store.list().await? {
		println!(
			"{} ({}) every {}: {:?}",
			account.account_name,
			account.provider_name,
			account.sync_config.sync_interval,
			account.sync_config.enabled_paths()
		);
	}

	Ok(())
}
