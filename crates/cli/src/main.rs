mod commands;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blog-kit")]
#[command(version, about = "Content validation and feed generation for a personal blog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Initialize new site directory
    Init {
        /// Path to create site directory
        path: PathBuf,

        /// Site title written to site.toml
        #[arg(long)]
        title: Option<String>,

        /// Site origin, e.g. https://example.com
        #[arg(long)]
        origin: Option<String>,
    },

    /// Validate site.toml and every post
    Validate {
        /// Path to site directory
        path: PathBuf,
    },

    /// Build feed, sitemap and search index
    Build {
        /// Path to site directory
        path: PathBuf,

        /// Output directory for generated files
        #[arg(short, long)]
        output: PathBuf,

        /// Build the valid posts even when some posts fail validation
        #[arg(long)]
        allow_invalid: bool,
    },

    /// Print the RSS feed to stdout
    Feed {
        /// Path to site directory
        path: PathBuf,
    },

    /// Serve generated outputs locally, regenerated per request
    Preview {
        /// Path to site directory
        path: PathBuf,

        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Log to stderr, filtered by RUST_LOG (default: warn)
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Init {
            path,
            title,
            origin,
        } => commands::init::run(path, title, origin).await,
        Command::Validate { path } => commands::validate::run(path).await,
        Command::Build {
            path,
            output,
            allow_invalid,
        } => commands::build::run(path, output, allow_invalid).await,
        Command::Feed { path } => commands::feed::run(path).await,
        Command::Preview { path, port } => commands::preview::run(path, port).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "blog-kit", &mut io::stdout());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_build_flags() {
        let cli = Cli::parse_from(["blog-kit", "build", "site", "-o", "dist", "--allow-invalid"]);
        match cli.command {
            Command::Build {
                path,
                output,
                allow_invalid,
            } => {
                assert_eq!(path, PathBuf::from("site"));
                assert_eq!(output, PathBuf::from("dist"));
                assert!(allow_invalid);
            }
            _ => panic!("expected build"),
        }
    }
}
