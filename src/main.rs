use std::io::IsTerminal;
use std::path::PathBuf;

use chrono::Utc;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};

use dossier_brief::{generate_brief, load_brief, save_brief, Brief};
use dossier_core::{DossierConfig, LlmConfig, OutputFormat};
use dossier_github::{GithubClient, RepoMetrics};
use dossier_ingest::{ingest_repository, select_content, RepositorySnapshot};
use dossier_insight::{provider_status, select_engine, Credentials, Insights, ReasoningEngine};
use dossier_signals::{extract_signals, TechnicalSignals};

#[derive(Parser)]
#[command(
    name = "dossier",
    version,
    about = "Repository inspector that writes a structured project brief",
    long_about = "Dossier inspects a repository (local path or GitHub URL), derives technical\n\
                   signals, optionally enriches them with GitHub metadata, runs a pluggable\n\
                   reasoning backend, and writes a structured YAML project brief.\n\n\
                   Examples:\n  \
                     dossier init .                       Generate dossier.yaml for this repo\n  \
                     dossier analyze ~/code/app           Inspect without writing anything\n  \
                     dossier remote https://github.com/serde-rs/serde\n  \
                     dossier providers                    List reasoning backends\n  \
                     dossier validate dossier.yaml        Check an existing brief"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .dossier.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text  Human-readable summaries (default)\n  \
                         json  Machine-readable JSON"
    )]
    format: OutputFormat,

    /// Enable verbose (debug-level) logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,
}

#[derive(clap::Args, Clone)]
struct BackendArgs {
    /// Reasoning backend: auto, openai, anthropic, ollama, rules, mock
    #[arg(long)]
    provider: Option<String>,

    /// Specific model to use with the chosen backend
    #[arg(long)]
    model: Option<String>,

    /// API key for the chosen backend
    #[arg(long)]
    api_key: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a project brief for a repository
    #[command(long_about = "Generate a project brief for a repository.\n\n\
        Accepts a local path or a GitHub URL. GitHub URLs are shallow-cloned\n\
        into a scratch directory that is removed after ingestion. The brief is\n\
        written to dossier.yaml in the repository (local) or the current\n\
        directory (remote).\n\n\
        Examples:\n  dossier init .\n  dossier init https://github.com/owner/repo --provider rules\n  dossier init ~/code/app --output brief.yaml")]
    Init {
        /// Repository path or GitHub URL
        repo: String,

        /// Output file path (default: dossier.yaml)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// GitHub API token for metadata enrichment
        #[arg(long, short = 't')]
        github_token: Option<String>,

        #[command(flatten)]
        backend: BackendArgs,
    },
    /// Analyze a repository and show signals without writing output
    #[command(
        long_about = "Analyze a repository and show derived signals without writing output.\n\n\
        Examples:\n  dossier analyze .\n  dossier analyze . --format json\n  dossier analyze . --provider mock"
    )]
    Analyze {
        /// Repository path or GitHub URL
        repo: String,

        /// GitHub API token for metadata enrichment
        #[arg(long, short = 't')]
        github_token: Option<String>,

        #[command(flatten)]
        backend: BackendArgs,
    },
    /// Generate a brief for a GitHub repository with full metadata
    #[command(
        long_about = "Generate a brief for a GitHub repository with the full metric printout.\n\n\
        Requires a GitHub URL. Without a token, API metadata is skipped and the\n\
        brief is built from the clone alone.\n\n\
        Examples:\n  dossier remote https://github.com/owner/repo\n  dossier remote https://github.com/owner/repo -t $GITHUB_TOKEN"
    )]
    Remote {
        /// GitHub repository URL
        url: String,

        /// Output file path (default: dossier.yaml in the current directory)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// GitHub API token (or set GITHUB_TOKEN)
        #[arg(long, short = 't')]
        github_token: Option<String>,

        #[command(flatten)]
        backend: BackendArgs,
    },
    /// List reasoning backends and their availability
    Providers,
    /// Check GitHub API rate-limit status
    RateLimit {
        /// GitHub API token (or set GITHUB_TOKEN)
        #[arg(long, short = 't')]
        github_token: Option<String>,
    },
    /// Validate an existing brief against the schema
    #[command(long_about = "Validate an existing brief against the schema.\n\n\
        Checks field presence, enumeration membership, and invariants.\n\n\
        Example:\n  dossier validate dossier.yaml")]
    Validate {
        /// Path to the brief YAML file
        file: PathBuf,
    },
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

fn print_welcome(use_color: bool) {
    let version = env!("CARGO_PKG_VERSION");

    if use_color {
        println!("\x1b[1mdossier\x1b[0m v{version} — turn any repository into a structured project brief\n");
        println!("Quick start:");
        println!("  \x1b[36mdossier init .\x1b[0m                 Generate dossier.yaml for this repo");
        println!("  \x1b[36mdossier analyze .\x1b[0m              Inspect signals without writing");
        println!("  \x1b[36mdossier providers\x1b[0m              List reasoning backends\n");
        println!("All commands:");
        println!("  \x1b[32minit\x1b[0m        Generate a brief for a local path or GitHub URL");
        println!("  \x1b[32manalyze\x1b[0m     Show derived signals, write nothing");
        println!("  \x1b[32mremote\x1b[0m      Target a GitHub repository with full metadata");
        println!("  \x1b[32mproviders\x1b[0m   Reasoning backend availability");
        println!("  \x1b[32mrate-limit\x1b[0m  GitHub API rate-limit status");
        println!("  \x1b[32mvalidate\x1b[0m    Check an existing brief against the schema\n");
    } else {
        println!("dossier v{version} — turn any repository into a structured project brief\n");
        println!("Quick start:");
        println!("  dossier init .                 Generate dossier.yaml for this repo");
        println!("  dossier analyze .              Inspect signals without writing");
        println!("  dossier providers              List reasoning backends\n");
        println!("All commands:");
        println!("  init        Generate a brief for a local path or GitHub URL");
        println!("  analyze     Show derived signals, write nothing");
        println!("  remote      Target a GitHub repository with full metadata");
        println!("  providers   Reasoning backend availability");
        println!("  rate-limit  GitHub API rate-limit status");
        println!("  validate    Check an existing brief against the schema\n");
    }

    println!("Run 'dossier <command> --help' for details.");
}

/// Token resolution: CLI flag > config file > GITHUB_TOKEN env var.
fn resolve_github_token(flag: Option<String>, config: &DossierConfig) -> Option<String> {
    flag.or_else(|| config.github.token.clone())
        .or_else(|| std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()))
}

/// Backend resolution: CLI flags override the `[llm]` config section.
fn resolve_llm_config(backend: &BackendArgs, config: &DossierConfig) -> LlmConfig {
    let mut llm = config.llm.clone();
    if let Some(provider) = &backend.provider {
        llm.provider = provider.clone();
    }
    if backend.model.is_some() {
        llm.model = backend.model.clone();
    }
    if backend.api_key.is_some() {
        llm.api_key = backend.api_key.clone();
    }
    llm
}

/// Fetch GitHub metrics for a remote-origin snapshot; failures warn, never abort.
async fn try_enrich(snapshot: &RepositorySnapshot, token: &Option<String>) -> Option<RepoMetrics> {
    let url = snapshot.origin_url.as_deref()?;
    token.as_deref()?;

    let client = match GithubClient::new(token.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("warning: could not create GitHub client: {e}");
            return None;
        }
    };
    match client.fetch_metrics(url).await {
        Ok(metrics) => {
            println!(
                "GitHub metrics: {} stars, {} forks, {} contributors",
                metrics.repository.stars,
                metrics.repository.forks,
                metrics.contributors.len()
            );
            Some(metrics)
        }
        Err(e) => {
            eprintln!("warning: could not fetch GitHub metadata: {e}");
            None
        }
    }
}

struct PipelineOutput {
    snapshot: RepositorySnapshot,
    signals: TechnicalSignals,
    metrics: Option<RepoMetrics>,
    insights: Insights,
    engine_name: &'static str,
}

/// Run ingestion, signal extraction, enrichment, and reasoning in sequence.
async fn run_pipeline(
    source: &str,
    github_token: Option<String>,
    backend: &BackendArgs,
    config: &DossierConfig,
) -> Result<PipelineOutput> {
    let token = resolve_github_token(github_token, config);

    println!("Analyzing repository: {source}");
    let snapshot = ingest_repository(source, &config.ingest)?;
    let signals = extract_signals(&snapshot);
    let metrics = try_enrich(&snapshot, &token).await;

    let llm = resolve_llm_config(backend, config);
    let engine: Box<dyn ReasoningEngine> = select_engine(&llm, &Credentials::from_env());
    let engine_name = engine.name();
    println!("Using {engine_name} reasoning engine");

    let content = select_content(&snapshot, config.ingest.content_budget);
    let insights = engine.reason(&signals, &content).await;

    Ok(PipelineOutput {
        snapshot,
        signals,
        metrics,
        insights,
        engine_name,
    })
}

fn default_output_path(source: &str, snapshot: &RepositorySnapshot) -> PathBuf {
    if snapshot.is_remote_clone {
        PathBuf::from("dossier.yaml")
    } else {
        PathBuf::from(source).join("dossier.yaml")
    }
}

fn truncate(s: &str, limit: usize) -> String {
    if s.chars().count() > limit {
        let cut: String = s.chars().take(limit).collect();
        format!("{cut}...")
    } else {
        s.to_string()
    }
}

fn print_analysis_text(output: &PipelineOutput) {
    let signals = &output.signals;
    println!("\nRepository analysis");
    println!("  Project type:  {}", signals.project_type);
    println!("  Maturity:      {}", signals.maturity);
    println!("  Activity:      {}", signals.activity);
    println!("  Languages:     {}", signals.languages.join(", "));
    println!("  Frameworks:    {}", signals.frameworks.join(", "));
    println!("  Tech stack:    {}", signals.tech_stack.join(", "));
    println!("  Files:         {}", output.snapshot.files.len());
    println!("  Commits read:  {}", output.snapshot.recent_commits.len());

    if let Some(metrics) = &output.metrics {
        let now = Utc::now();
        println!("  GitHub stars:  {}", metrics.repository.stars);
        println!("  GitHub forks:  {}", metrics.repository.forks);
        println!("  Contributors:  {}", metrics.contributors.len());
        println!("  Popularity:    {:.1}", metrics.popularity_score());
        println!("  Remote tier:   {}", metrics.activity_tier(now));
    }

    println!("  Problem:       {}", truncate(&output.insights.problem, 100));
    println!("  Solution:      {}", truncate(&output.insights.solution, 100));
}

fn print_analysis_json(output: &PipelineOutput) -> Result<()> {
    let now = Utc::now();
    let github = output.metrics.as_ref().map(|m| {
        serde_json::json!({
            "stars": m.repository.stars,
            "forks": m.repository.forks,
            "contributors": m.contributors.len(),
            "popularityScore": m.popularity_score(),
            "activityTier": m.activity_tier(now).to_string(),
        })
    });
    let value = serde_json::json!({
        "signals": output.signals,
        "github": github,
        "insights": output.insights,
        "engine": output.engine_name,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&value).into_diagnostic()?
    );
    Ok(())
}

fn print_remote_metrics(metrics: &RepoMetrics) {
    let now = Utc::now();
    println!("GitHub repository metrics:");
    println!("  Stars:            {}", metrics.repository.stars);
    println!("  Forks:            {}", metrics.repository.forks);
    println!("  Contributors:     {}", metrics.contributors.len());
    println!("  Open issues:      {}", metrics.repository.open_issues);
    println!(
        "  Primary language: {}",
        metrics
            .repository
            .language
            .as_deref()
            .unwrap_or("not specified")
    );
    println!(
        "  License:          {}",
        metrics.repository.license.as_deref().unwrap_or("none")
    );
    println!("  Activity tier:    {}", metrics.activity_tier(now));
    println!("  Popularity score: {:.1}", metrics.popularity_score());
    if !metrics.repository.topics.is_empty() {
        println!(
            "  Topics:           {}",
            metrics.repository.topics.join(", ")
        );
    }
}

fn finish_brief(output: &PipelineOutput, brief: &Brief, path: &PathBuf) -> Result<()> {
    save_brief(brief, path)?;
    println!("Brief generated successfully at {}", path.display());
    if let Some(metrics) = &output.metrics {
        println!(
            "Repository popularity score: {:.1}",
            metrics.popularity_score()
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            tracing_subscriber::EnvFilter::new("debug")
        } else {
            tracing_subscriber::EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => DossierConfig::from_file(path)?,
        None => {
            let default_path = std::path::Path::new(".dossier.toml");
            if default_path.exists() {
                DossierConfig::from_file(default_path)?
            } else {
                DossierConfig::default()
            }
        }
    };

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };

    match cli.command {
        None => {
            print_welcome(use_color);
            Ok(())
        }
        Some(Command::Init {
            ref repo,
            ref output,
            ref github_token,
            ref backend,
        }) => {
            let result = run_pipeline(repo, github_token.clone(), backend, &config).await?;
            let brief = generate_brief(&result.snapshot, &result.signals, &result.insights);
            let path = output
                .clone()
                .unwrap_or_else(|| default_output_path(repo, &result.snapshot));
            finish_brief(&result, &brief, &path)
        }
        Some(Command::Analyze {
            ref repo,
            ref github_token,
            ref backend,
        }) => {
            let result = run_pipeline(repo, github_token.clone(), backend, &config).await?;
            match cli.format {
                OutputFormat::Text => {
                    print_analysis_text(&result);
                    Ok(())
                }
                OutputFormat::Json => print_analysis_json(&result),
            }
        }
        Some(Command::Remote {
            ref url,
            ref output,
            ref github_token,
            ref backend,
        }) => {
            if !dossier_github::is_github_url(url) {
                miette::bail!("'{url}' is not a GitHub URL");
            }
            let token = resolve_github_token(github_token.clone(), &config);
            if token.is_none() {
                eprintln!(
                    "warning: no GitHub token provided; API metadata will be skipped \
                     (set GITHUB_TOKEN or pass --github-token)"
                );
            }
            let result = run_pipeline(url, token, backend, &config).await?;
            if let Some(metrics) = &result.metrics {
                print_remote_metrics(metrics);
            }
            let brief = generate_brief(&result.snapshot, &result.signals, &result.insights);
            let path = output
                .clone()
                .unwrap_or_else(|| PathBuf::from("dossier.yaml"));
            finish_brief(&result, &brief, &path)
        }
        Some(Command::Providers) => {
            let statuses = provider_status(&Credentials::from_env());
            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&statuses).into_diagnostic()?
                    );
                }
                OutputFormat::Text => {
                    println!("Reasoning backends:");
                    for s in &statuses {
                        let key = if !s.requires_key {
                            "no key needed"
                        } else if s.has_key {
                            "key found"
                        } else {
                            "key missing"
                        };
                        println!("  {:<10} {:<14} {}", s.name, key, s.status);
                    }
                    println!(
                        "\nSelection: --provider <name>, or 'auto' picks the first backend with credentials."
                    );
                }
            }
            Ok(())
        }
        Some(Command::RateLimit { ref github_token }) => {
            let token = resolve_github_token(github_token.clone(), &config);
            if token.is_none() {
                miette::bail!("GitHub token required: set GITHUB_TOKEN or pass --github-token");
            }
            let client = GithubClient::new(token)?;
            let rate = client.check_rate_limit().await?;
            println!("GitHub API rate limit:");
            println!("  Remaining: {}", rate.remaining);
            println!("  Limit:     {}", rate.limit);
            println!("  Reset:     {}", rate.reset);
            Ok(())
        }
        Some(Command::Validate { ref file }) => {
            if !file.exists() {
                miette::bail!("brief file not found: {}", file.display());
            }
            let brief = load_brief(file)?;
            println!(
                "Brief is valid: {} ({}, {})",
                brief.project_name, brief.project_type, brief.status
            );
            Ok(())
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "dossier", &mut std::io::stdout());
            Ok(())
        }
    }
}
