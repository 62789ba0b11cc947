use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use folio::commands::{email::EmailCommand, serve::serve};
use folio_config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Set to `1` to switch to the multi-line log format.
const LOG_PRETTY_ENV: &str = "RUST_LOG_PRETTY";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Command::Completion { shell } = cli.command {
        clap_complete::generate(
            shell,
            &mut Cli::command(),
            env!("CARGO_BIN_NAME"),
            &mut std::io::stdout(),
        );
        return Ok(());
    }

    match dotenvy::dotenv() {
        Err(err) if !err.not_found() => return Err(err).context("Failed to load .env file"),
        _ => {}
    }

    init_tracing();

    let config = folio_config::load().context("Failed to load config")?;
    cli.command.run(config).await
}

#[derive(Debug, Parser)]
#[command(version, about = "Portfolio website with a contact form relayed over smtp")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the http server to serve the portfolio website
    #[command(aliases(["run", "start", "r", "s"]))]
    Serve,
    /// Test email deliverability
    #[command(aliases(["e"]))]
    Email {
        #[command(subcommand)]
        command: EmailCommand,
    },
    /// Validate configuration
    CheckConfig {
        /// Print a debug representation of the config
        #[arg(short, long)]
        verbose: bool,
    },
    /// Generate shell completions
    Completion {
        /// The shell to generate completions for
        #[clap(value_enum)]
        shell: Shell,
    },
}

impl Command {
    async fn run(self, config: Config) -> anyhow::Result<()> {
        match self {
            Self::Serve => serve(config).await,
            Self::Email { command } => command.invoke(config).await,
            Self::CheckConfig { verbose } => {
                if verbose {
                    println!("{config:#?}");
                } else {
                    println!("Config is valid");
                }
                Ok(())
            }
            Self::Completion { .. } => unreachable!(),
        }
    }
}

fn init_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let fmt_layer = if std::env::var(LOG_PRETTY_ENV).as_deref() == Ok("1") {
        fmt_layer.pretty().boxed()
    } else {
        fmt_layer.boxed()
    };

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(EnvFilter::from_default_env()))
        .init();
}
