use clap::Subcommand;
use collview_core::config::CollviewConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Initialize ~/.collview/ with a default config
    Init,
    /// Show current configuration
    Show,
    /// Set the API base URL
    SetUrl {
        /// Base URL, e.g. http://localhost:8005/api/v1
        url: String,
    },
}

pub fn run(action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let home = CollviewConfig::init()?;
            println!("Initialized collview at {}", home.display());
            println!("  config: {}", CollviewConfig::config_path()?.display());
            Ok(())
        }
        ConfigAction::Show => {
            let config = CollviewConfig::load()?;
            let toml_str = toml::to_string_pretty(&config)?;
            println!("{toml_str}");
            Ok(())
        }
        ConfigAction::SetUrl { url } => {
            let config = CollviewConfig::load()?.with_api_base_url(&url)?;
            config.save()?;
            println!("API base URL set to {}", config.api_base_url);
            Ok(())
        }
    }
}
