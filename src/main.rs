use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mailforge::{AppError, BuildOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mailforge")]
#[command(version)]
#[command(
    about = "Build localized email templates from MJML and text sources",
    long_about = None
)]
struct Cli {
    /// Output root for build artifacts
    #[arg(long, global = true, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Use the configured asset base URL instead of the local fallback
    #[arg(long, global = true)]
    production: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean, copy assets, and render every template
    Build,
    /// Render HTML (MJML) templates only
    #[command(name = "build:html")]
    BuildHtml,
    /// Render text templates only
    #[command(name = "build:text")]
    BuildText,
    /// Copy static assets into the output tree
    #[command(name = "copy:assets")]
    CopyAssets,
    /// Remove the output tree
    Clean,
    /// Build, then re-render on source changes
    Watch,
    /// Watch plus a live-reloading dev server on port 1980
    Server,
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let options = BuildOptions {
        out: cli.out,
        production: cli.production || production_env(),
    };

    let result: Result<(), AppError> = match cli.command.unwrap_or(Commands::Server) {
        Commands::Build => mailforge::build(&options),
        Commands::BuildHtml => mailforge::build_html(&options),
        Commands::BuildText => mailforge::build_text(&options),
        Commands::CopyAssets => mailforge::copy_assets(&options),
        Commands::Clean => mailforge::clean(&options),
        Commands::Watch => mailforge::watch(&options),
        Commands::Server => mailforge::server(&options),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn production_env() -> bool {
    std::env::var(mailforge::ENV_MODE_VAR).is_ok_and(|v| v == "production")
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mailforge=info")),
        )
        .with_target(false)
        .init();
}
