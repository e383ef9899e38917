use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use console::Term;
use indicatif::{ProgressBar, ProgressStyle};

use collview_store::{KeyringStore, LocalStore};
use collview_viewer::dev::dev_services;
use collview_viewer::{CollectionViewer, FetchState, HostServices, RenderOptions};

use super::GlobalOpts;

#[derive(Args)]
pub struct ListArgs {
    /// On error, wait for a key press and reload on `r`
    #[arg(long, short)]
    interactive: bool,
    /// Print without colors
    #[arg(long)]
    plain: bool,
}

pub async fn run(args: ListArgs, global: &GlobalOpts) -> anyhow::Result<()> {
    let config = global.config()?;
    let tokens: Arc<dyn LocalStore> = Arc::new(KeyringStore::new());
    let services = if config.dev_mode {
        dev_services(super::local_storage()?)
    } else {
        HostServices::none()
    };
    tracing::debug!(?services, api_url = %config.api_base_url, "starting viewer");

    let term = Term::stdout();
    let options = RenderOptions {
        theme: config.theme,
        width: term.size().1,
        styled: !args.plain && term.is_term(),
        reload_hint: if args.interactive {
            "Press r to reload, any other key to quit".to_string()
        } else {
            "Run `collview list` again to reload".to_string()
        },
    };

    let mut viewer = CollectionViewer::new(&services, &config, tokens)?;
    viewer.mount();

    loop {
        let state = wait_with_spinner(&viewer).await?;
        println!("{}", viewer.render(&options));

        if !args.interactive || !matches!(state, FetchState::Failed(_)) {
            break;
        }
        match next_key(&term).await? {
            'r' | 'R' => viewer.reload(),
            _ => break,
        }
    }

    viewer.unmount();
    Ok(())
}

/// Read one key press off the runtime's worker threads.
async fn next_key(term: &Term) -> anyhow::Result<char> {
    let term = term.clone();
    Ok(tokio::task::spawn_blocking(move || term.read_char()).await??)
}

async fn wait_with_spinner(viewer: &CollectionViewer) -> anyhow::Result<FetchState> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")?
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
    );
    pb.set_message("Loading collections...");
    pb.enable_steady_tick(Duration::from_millis(80));

    let state = viewer.settled().await;
    pb.finish_and_clear();
    Ok(state)
}
