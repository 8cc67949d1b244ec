//! # Candidate Scout CLI (`scout`)
//!
//! Submits structured or plain-text searches to the Sourcing Service and
//! prints the results as ranked, themed cards.
//!
//! ## Usage
//!
//! ```bash
//! scout --config ./config/scout.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `scout search [QUERY]` | Structured search (`POST /search`) |
//! | `scout ask [TEXT]` | Plain-text search (`POST /search-plain`) |
//! | `scout shell` | Interactive session that keeps form state |
//! | `scout themes` | List card theme tokens |
//!
//! ## Examples
//!
//! ```bash
//! # Structured search with experience bounds
//! scout search "type:user rust location:Berlin" --min-exp 3 --max-exp 10
//!
//! # Leave the upper bound unset (sent as null, not 0)
//! scout search "type:user go" --max-exp ""
//!
//! # Free text, ordered by experience, as JSON
//! scout ask "senior Rust engineers in Berlin" --sort experience --format json
//!
//! # Point at a deployed service
//! SCOUT_API_BASE=https://sourcing.example.com scout shell
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::style::Stylize;
use std::io::Write;
use std::path::{Path, PathBuf};

use candidate_scout::client::HttpSourcingService;
use candidate_scout::config::{self, Config};
use candidate_scout::logging;
use candidate_scout::orchestrator::{Orchestrator, Phase};
use candidate_scout::query::{QueryForm, QueryMode};
use candidate_scout::rank::SortKey;
use candidate_scout::render::{session_json, ColorChoice, Renderer};
use candidate_scout::shell::Shell;
use candidate_scout::theme::ThemeToken;

const DEFAULT_CONFIG: &str = "./config/scout.toml";

/// Candidate Scout: search a candidate-sourcing service from the terminal.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. When the default file is missing, built-in defaults are used.
#[derive(Parser)]
#[command(
    name = "scout",
    about = "Candidate Scout: search a candidate-sourcing service from the terminal",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Service origin; overrides `SCOUT_API_BASE` and `[service].base_url`.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// When to color output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Verbose diagnostics on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for one-shot searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Structured search.
    ///
    /// Sends `{query, min_experience, max_experience, limit}` to `/search`.
    /// Numeric flags take raw text: an empty value is sent as null, and a
    /// value that is not a number keeps the configured default.
    Search {
        /// Filter query in the service's syntax. Defaults to `[defaults].query`.
        query: Option<String>,

        /// Minimum years of experience.
        #[arg(long)]
        min_exp: Option<String>,

        /// Maximum years of experience.
        #[arg(long)]
        max_exp: Option<String>,

        /// Maximum number of candidates.
        #[arg(long)]
        limit: Option<String>,

        /// Display order. Defaults to `[defaults].sort`.
        #[arg(long, value_enum)]
        sort: Option<SortKey>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Plain-text search.
    ///
    /// Sends `{text}` to `/search-plain`. An empty string is a valid request.
    Ask {
        /// Free-form description. Defaults to `[defaults].text`.
        text: Option<String>,

        #[arg(long, value_enum)]
        sort: Option<SortKey>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Interactive session.
    ///
    /// Reads commands from stdin; both query modes keep their fields for the
    /// whole session. Type `help` for the command list.
    Shell,

    /// List card theme tokens in assignment order.
    Themes,
}

fn load(path: &Path) -> Result<Config> {
    if path == Path::new(DEFAULT_CONFIG) && !path.exists() {
        tracing::debug!("no config at {}, using built-in defaults", path.display());
        return Ok(Config::minimal());
    }
    config::load_config(path)
}

fn warn_rejected(flag: &str, raw: &str, accepted: bool, kept: &str) {
    if !accepted {
        tracing::warn!("{} '{}' is not a number, keeping '{}'", flag, raw, kept);
    }
}

/// Apply structured-search flags on top of the configured form.
fn structured_form(
    cfg: &Config,
    query: Option<String>,
    min_exp: Option<String>,
    max_exp: Option<String>,
    limit: Option<String>,
) -> QueryForm {
    let mut form = cfg.initial_form();
    if let Some(query) = query {
        form.set_query(query);
    }
    if let Some(raw) = min_exp {
        let ok = form.set_min_experience(&raw);
        warn_rejected("--min-exp", &raw, ok, form.structured().min_experience.as_str());
    }
    if let Some(raw) = max_exp {
        let ok = form.set_max_experience(&raw);
        warn_rejected("--max-exp", &raw, ok, form.structured().max_experience.as_str());
    }
    if let Some(raw) = limit {
        let ok = form.set_limit(&raw);
        warn_rejected("--limit", &raw, ok, form.structured().limit.as_str());
    }
    form
}

async fn run_once(
    service: HttpSourcingService,
    form: &QueryForm,
    sort: SortKey,
    format: Format,
    renderer: &Renderer,
) -> Result<()> {
    let mut orchestrator = Orchestrator::new(service);
    orchestrator.submit(&form.payload()).await;
    let state = orchestrator.state();

    match format {
        Format::Text => print!("{}", renderer.session(state, sort)),
        Format::Json => println!(
            "{}",
            serde_json::to_string_pretty(&session_json(state, sort))?
        ),
    }
    std::io::stdout().flush()?;

    if state.phase() == Phase::Error {
        std::process::exit(1);
    }
    Ok(())
}

fn print_themes(color: bool) {
    for token in ThemeToken::ALL {
        let accent = token.accent();
        let swatch = if color {
            "■■".with(accent.color()).to_string()
        } else {
            "■■".to_string()
        };
        println!(
            "{} {:<2} {:<8} {}  {}",
            swatch,
            token.index(),
            token.name(),
            accent.hex,
            accent.soft_hex
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let color = cli.color.enabled();

    if let Commands::Themes = cli.command {
        print_themes(color);
        return Ok(());
    }

    let cfg = load(&cli.config)?;
    let base_url = cfg.resolve_base_url(cli.base_url.as_deref());
    config::check_base_url(&base_url)?;
    tracing::debug!(%base_url, "resolved service origin");

    let service = HttpSourcingService::new(&base_url).context("Failed to build HTTP client")?;
    let renderer = Renderer::new(color, cfg.display.max_languages, cfg.display.bio_lines);

    match cli.command {
        Commands::Search {
            query,
            min_exp,
            max_exp,
            limit,
            sort,
            format,
        } => {
            let form = structured_form(&cfg, query, min_exp, max_exp, limit);
            let sort = sort.unwrap_or(cfg.defaults.sort);
            run_once(service, &form, sort, format, &renderer).await?;
        }
        Commands::Ask { text, sort, format } => {
            let mut form = cfg.initial_form();
            form.set_mode(QueryMode::Plain);
            if let Some(text) = text {
                form.set_text(text);
            }
            let sort = sort.unwrap_or(cfg.defaults.sort);
            run_once(service, &form, sort, format, &renderer).await?;
        }
        Commands::Shell => {
            let interactive = atty::is(atty::Stream::Stdin);
            if interactive {
                println!("scout shell @ {} (type 'help')", base_url);
            }
            let mut shell = Shell::new(cfg.initial_form(), service, cfg.defaults.sort, renderer)
                .with_prompt(interactive);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            shell.run(stdin, tokio::io::stdout()).await?;
        }
        Commands::Themes => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
