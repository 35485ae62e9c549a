//! Subcommand implementations and the wiring they share.

pub mod ask;
pub mod chat;
pub mod doctor;
pub mod init;
pub mod status;
pub mod users;
pub mod view;

use scopedesk_agent::{Panel, QueryBridge, Selection};
use scopedesk_config::{AppConfig, CREDENTIAL_ENV_VARS};
use scopedesk_core::credential::Credential;
use scopedesk_core::dataset::Dataset;
use scopedesk_core::session::Session;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// Options accepted by every subcommand.
pub struct Globals {
    pub data: Option<PathBuf>,
    pub api_key: Option<String>,
}

impl Globals {
    /// `--api-key`, else the first credential environment variable that is set.
    pub fn credential(&self) -> Option<Credential> {
        self.api_key
            .clone()
            .and_then(Credential::new)
            .or_else(|| Credential::from_env(CREDENTIAL_ENV_VARS))
    }

    /// `--data`, else the configured path.
    pub fn data_path(&self, config: &AppConfig) -> PathBuf {
        self.data.clone().unwrap_or_else(|| config.data.path.clone())
    }
}

pub fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

/// Load the dataset at `path`. Any failure leaves the panel running on no data.
pub fn load_data(path: &Path) -> Dataset {
    match scopedesk_data::load_dataset(path) {
        Ok(loaded) => {
            for warning in &loaded.warnings {
                eprintln!("  ⚠️  {warning}");
            }
            loaded.dataset
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Dataset unusable, continuing with no data");
            eprintln!("  ⚠️  Could not load {}: {e}", path.display());
            eprintln!("      Continuing with no data.");
            Dataset::empty()
        }
    }
}

/// Wire config, identities, data and provider into a [`Panel`].
pub fn build_panel(
    globals: &Globals,
    config: &AppConfig,
) -> Result<Panel, Box<dyn std::error::Error>> {
    let directory = config.directory()?;
    let dataset = load_data(&globals.data_path(config));

    let router = scopedesk_providers::build_from_config(config)?;
    let provider = router.default().ok_or("No default provider configured")?;

    let bridge = QueryBridge::new(provider, config.model_for(&config.default_provider))
        .with_temperature(config.default_temperature)
        .with_max_tokens(config.default_max_tokens);

    Ok(Panel::new(Arc::new(directory), dataset, bridge))
}

/// A fresh session acting as `user`, or as the default identity.
pub fn open_session(
    panel: &Panel,
    globals: &Globals,
    user: Option<&str>,
) -> (Session, Selection) {
    let mut session = Session::new();
    session.set_credential(globals.credential());

    let selection = match user {
        Some(name) => panel.select(&mut session, name),
        None => panel.select_default(&mut session),
    };
    report_selection(&selection, user.unwrap_or_default());
    (session, selection)
}

/// Print the operator-facing problems with a selection, if any.
pub fn report_selection(selection: &Selection, requested: &str) {
    if selection.user.is_none() {
        eprintln!("  ⚠️  Unknown identity '{requested}', no data is visible.");
    }
    if let Some(e) = &selection.scope_error {
        eprintln!("  ⚠️  Data problem: {e}");
        eprintln!("      No rows are visible for this identity until the dataset is fixed.");
    }
}
