use clap::Subcommand;
use collview_core::models::theme::Theme;
use collview_viewer::dev::DevThemeService;
use collview_viewer::services::ThemeService;

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Show the current theme preference
    Show,
    /// Set the theme preference
    Set {
        /// "light" or "dark"
        theme: String,
    },
    /// Switch between light and dark
    Toggle,
}

pub fn run(action: ThemeAction) -> anyhow::Result<()> {
    let service = DevThemeService::new(super::local_storage()?);

    match action {
        ThemeAction::Show => {
            println!("{}", service.current_theme());
            Ok(())
        }
        ThemeAction::Set { theme } => {
            let theme: Theme = theme.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            service.set_theme(theme)?;
            println!("Theme set to {theme}");
            Ok(())
        }
        ThemeAction::Toggle => {
            let theme = service.toggle()?;
            println!("Theme set to {theme}");
            Ok(())
        }
    }
}
