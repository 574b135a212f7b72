//! expo-genie - scaffold Expo projects, add features, generate code

use clap::Parser;
use colored::Colorize;
use genie_core::commands::{self, init::InitArgs, Command, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "expo-genie")]
#[command(about = "CLI for scaffolding Expo projects with features and code generators")]
#[command(version)]
pub struct Args {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Logs go to stderr so prompts and listings on stdout stay clean
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("expo_genie=debug,genie_core=debug")
    } else {
        tracing_subscriber::EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_tracing(args.verbose);

    // No subcommand provided, default to init (interactive mode)
    let command = args.command.unwrap_or_else(|| Command::Init(InitArgs::default()));

    let result: anyhow::Result<()> = match Context::from_env() {
        Ok(ctx) => commands::run(command, &ctx).await,
        Err(e) => Err(e),
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
