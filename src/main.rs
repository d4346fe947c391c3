use clap::Parser;

mod commands;

#[tokio::main]
async fn main() {
    let cli = commands::Cli::parse();

    // Default to info level for our crate; RUST_LOG overrides
    let default_filter = if cli.verbose { "hamlog=debug" } else { "hamlog=info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = commands::run(cli).await {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
