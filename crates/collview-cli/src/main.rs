mod commands;

use clap::Parser;

#[derive(Parser)]
#[command(name = "collview", version, about = "Browse document collections from the command line")]
struct Cli {
    #[command(flatten)]
    global: commands::GlobalOpts,

    #[command(subcommand)]
    command: commands::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    commands::run(cli.command, &cli.global).await
}
