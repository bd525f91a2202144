use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use dossier_core::{Config, ResearchAgent};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dossier", version)]
#[command(about = "Turn a research question into a structured, cited brief", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Research a question and print the brief
    Research {
        /// The research question
        #[arg(required = true)]
        query: Vec<String>,

        /// Desired structure of the final brief
        #[arg(long)]
        structure: Option<String>,

        /// Results to retrieve per sub-question
        #[arg(long)]
        results: Option<usize>,

        /// Restrict retrieval to a domain (repeatable)
        #[arg(long = "domain")]
        domains: Vec<String>,

        /// Retrieval provider (mock, google, serper)
        #[arg(long)]
        search: Option<String>,

        /// Generation provider (auto, mock, openai, anthropic, ollama)
        #[arg(long)]
        llm: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Split bullet evidence into facts and opinions
        #[arg(long)]
        classify: bool,
    },
    /// Print the effective configuration as TOML
    Config {
        /// Print the built-in defaults instead, ignoring config files and environment
        #[arg(long)]
        defaults: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load().wrap_err("failed to load configuration")?;

    match cli.command {
        Commands::Research {
            query,
            structure,
            results,
            domains,
            search,
            llm,
            format,
            classify,
        } => {
            if let Some(n) = results {
                config.search.results_per_task = n;
            }
            if !domains.is_empty() {
                config.search.domain_filters = domains;
            }
            if let Some(provider) = search {
                config.search.provider = provider;
            }
            if let Some(provider) = llm {
                config.llm.provider = provider;
            }
            if classify {
                config.synthesis.classify_claims = true;
            }
            config.validate()?;

            run_research(&config, &query.join(" "), structure.as_deref(), format).await
        }
        Commands::Config { defaults } => {
            let rendered = if defaults {
                Config::default_config_string()
            } else {
                config.to_toml_string().wrap_err("failed to render configuration")?
            };
            print!("{}", rendered);
            Ok(())
        }
    }
}

async fn run_research(
    config: &Config,
    query: &str,
    structure: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    tracing::debug!(
        llm = %config.llm.provider,
        search = %config.search.provider,
        results_per_task = config.search.results_per_task,
        "starting research"
    );
    let agent = ResearchAgent::from_config(config).wrap_err("failed to set up providers")?;

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Researching \"{}\"", query));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = agent.run(query, structure).await;
    spinner.finish_and_clear();
    let brief = result.wrap_err("research run failed")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&brief)?),
        OutputFormat::Markdown => print!("{}", brief.to_markdown()),
    }
    Ok(())
}

/// Logs go to stderr so stdout carries only the brief.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}
