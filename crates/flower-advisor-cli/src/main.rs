//! Flower Advisor — entry point.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use flower_advisor::imagery::image_url_for;
use flower_advisor::prompt::response_schema;
use flower_advisor::{landing_background_url, ViewState};

use flower_advisor_cli::config::AdvisorConfig;
use flower_advisor_cli::render::render_view;

#[derive(Parser)]
#[command(
    name = "flower-advisor",
    about = "Ask what to plant — AI flower recommendations by month, season or name",
    version
)]
struct Cli {
    /// Gemini API key. Also reads GEMINI_API_KEY, then API_KEY.
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Model name.
    #[arg(long, global = true)]
    model: Option<String>,

    /// Generative Language API base URL.
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch interactive REPL mode (default).
    Repl,

    /// Fetch recommendations once and print them.
    Recommend {
        /// Month (e.g. 7), season, or flower name. Empty means this month.
        query: Vec<String>,

        /// Print the sorted result list as JSON.
        #[arg(long)]
        json: bool,

        /// Show every card expanded, with image URLs.
        #[arg(long)]
        details: bool,
    },

    /// Print an illustrative image URL.
    ImageUrl {
        /// Flower name (English names give better images).
        #[arg(required_unless_present = "landing")]
        name: Option<String>,

        /// Card rank used to derive the image seed.
        #[arg(long, default_value_t = 1)]
        rank: u32,

        /// Print the landing background instead.
        #[arg(long, conflicts_with = "name")]
        landing: bool,
    },

    /// Print the response schema sent to the model as JSON.
    Schema,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   flower-advisor completions bash > ~/.local/share/bash-completion/completions/flower-advisor
    ///   flower-advisor completions zsh > ~/.zfunc/_flower-advisor
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = AdvisorConfig::resolve(
        cli.api_key.as_deref(),
        cli.endpoint.as_deref(),
        cli.model.as_deref(),
        cli.timeout_secs,
    );

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Repl => {
            let session = config.session()?;
            flower_advisor_cli::repl::run(session).await?;
        }

        Commands::Recommend {
            query,
            json,
            details,
        } => {
            let mut session = config.session()?;
            let state = session.submit(&query.join(" ")).await;

            if state != ViewState::Results {
                let view = session.snapshot().await;
                if let Some(detail) = view.last_failure() {
                    tracing::error!("{detail}");
                }
                eprintln!("{}", view.error_message().unwrap_or("Request did not complete"));
                std::process::exit(1);
            }

            let controller = session.controller();
            let mut view = controller.lock().await;
            if json {
                println!("{}", serde_json::to_string_pretty(view.flowers())?);
            } else {
                if details || view.is_single() {
                    let ranks: Vec<u32> = view.flowers().iter().map(|f| f.rank).collect();
                    for rank in ranks {
                        view.toggle_details(rank);
                    }
                }
                print!("{}", render_view(&view));
            }
        }

        Commands::ImageUrl {
            name,
            rank,
            landing,
        } => {
            if landing {
                println!("{}", landing_background_url());
            } else if let Some(name) = name {
                println!("{}", image_url_for(&name, rank));
            }
        }

        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&response_schema())?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "flower-advisor", &mut std::io::stdout());
        }
    }

    Ok(())
}
