pub mod collection;
pub mod config;
pub mod list;
pub mod plugin;
pub mod theme;
pub mod token;

use std::sync::Arc;

use clap::{Args, Subcommand};
use collview_core::config::CollviewConfig;
use collview_store::{FileStore, LocalStore};

/// Options accepted by every subcommand.
#[derive(Args)]
pub struct GlobalOpts {
    /// Override the API base URL from the config file
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Use the development host services (theme, settings, page context)
    #[arg(long, global = true)]
    dev: bool,
}

impl GlobalOpts {
    /// Load the config file and apply command-line overrides.
    pub fn config(&self) -> anyhow::Result<CollviewConfig> {
        let mut config = CollviewConfig::load()?;
        if let Some(url) = &self.api_url {
            config = config.with_api_base_url(url)?;
        }
        if self.dev {
            config.dev_mode = true;
        }
        Ok(config)
    }
}

/// The local storage file holding the theme preference.
pub fn local_storage() -> anyhow::Result<Arc<dyn LocalStore>> {
    Ok(Arc::new(FileStore::new(CollviewConfig::storage_path()?)))
}

#[derive(Subcommand)]
pub enum Command {
    /// Show all collections
    List(list::ListArgs),
    /// Show one collection
    Show {
        /// Collection id
        id: String,
    },
    /// Create a collection
    Create(collection::CreateArgs),
    /// Update a collection
    Update(collection::UpdateArgs),
    /// Delete a collection
    Delete {
        /// Collection id
        id: String,
    },
    /// Initialize and manage collview configuration
    Config {
        #[command(subcommand)]
        action: config::ConfigAction,
    },
    /// Manage the stored API token
    Token {
        #[command(subcommand)]
        action: token::TokenAction,
    },
    /// Manage the development theme preference
    Theme {
        #[command(subcommand)]
        action: theme::ThemeAction,
    },
    /// Show the plugin manifest
    Plugin {
        #[command(subcommand)]
        action: plugin::PluginAction,
    },
}

pub async fn run(cmd: Command, global: &GlobalOpts) -> anyhow::Result<()> {
    match cmd {
        Command::List(args) => list::run(args, global).await,
        Command::Show { id } => collection::show(&id, global).await,
        Command::Create(args) => collection::create(args, global).await,
        Command::Update(args) => collection::update(args, global).await,
        Command::Delete { id } => collection::delete(&id, global).await,
        Command::Config { action } => config::run(action),
        Command::Token { action } => token::run(action),
        Command::Theme { action } => theme::run(action),
        Command::Plugin { action } => plugin::run(action),
    }
}
