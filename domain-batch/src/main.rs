//! Domain Batch CLI Application
//!
//! A command-line interface for generating batches of candidate domains from a
//! position model, filtering them by digit patterns, and checking availability
//! through a WHOIS proxy. This CLI is a thin front-end to domain-batch-lib.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use console::Term;
use domain_batch_lib::{
    load_env_config, parse_timeout_string, BatchConfig, BatchRunner, ConfigManager, FileConfig,
    PatternFilter, PositionSpec, RunHandle, WhoisProxyClient, MAX_CONCURRENCY, MAX_POSITIONS,
};
use std::io::BufRead;
use std::process;
use std::str::FromStr;
use std::time::Duration;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domain-batch
#[derive(Parser, Debug)]
#[command(name = "domain-batch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate candidate domains from a position model and check availability")]
#[command(
    long_about = "Generate candidate domain names from a position model (digits, letters, fixed text),\nfilter them by digit patterns, and check availability through a WHOIS proxy.\n\nExample: domain-batch d,d --filter AA --suffix com"
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Position model, comma-separated: d=digit, l=letter, =TEXT for fixed text
    #[arg(
        value_name = "POSITIONS",
        value_delimiter = ',',
        help_heading = "Generation"
    )]
    pub positions: Vec<String>,

    /// Domain suffix appended to every candidate (e.g. com, io, co.uk)
    #[arg(
        short = 's',
        long = "suffix",
        value_name = "SUFFIX",
        allow_hyphen_values = true,
        help_heading = "Generation"
    )]
    pub suffix: Option<String>,

    /// Digit-pattern filter to apply (use --list-filters to see all)
    #[arg(long = "filter", value_name = "NAME", help_heading = "Generation")]
    pub filter: Option<String>,

    /// List all available pattern filters and exit
    #[arg(long = "list-filters", help_heading = "Generation")]
    pub list_filters: bool,

    /// Preview generated candidates without querying
    #[arg(long = "dry-run", help_heading = "Generation")]
    pub dry_run: bool,

    /// Max concurrent queries (default: 10, max: 30)
    #[arg(
        short = 'c',
        long = "concurrency",
        value_name = "N",
        help_heading = "Performance"
    )]
    pub concurrency: Option<usize>,

    /// Per-query timeout (e.g. 5s, 30s, 2m)
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Performance")]
    pub timeout: Option<String>,

    /// Skip confirmation prompts (for automation/agents)
    #[arg(long = "yes", short = 'y', help_heading = "Performance")]
    pub yes: bool,

    /// Output results in JSON format
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Output results in CSV format
    #[arg(long = "csv", help_heading = "Output Format")]
    pub csv: bool,

    /// Enable grouped, structured output with section headers
    #[arg(short = 'p', long = "pretty", help_heading = "Output Format")]
    pub pretty: bool,

    /// Only show domains that are available
    #[arg(long = "available-only", help_heading = "Output Format")]
    pub available_only: bool,

    /// Only show domains containing this substring
    #[arg(long = "keyword", value_name = "TEXT", help_heading = "Output Format")]
    pub keyword: Option<String>,

    /// WHOIS proxy endpoint URL
    #[arg(long = "endpoint", value_name = "URL", help_heading = "Protocol")]
    pub endpoint: Option<String>,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Show detailed debug information and error messages
    #[arg(short = 'd', long = "debug", help_heading = "Configuration")]
    pub debug: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Validate arguments
    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    // Handle --list-filters early
    if args.list_filters {
        print_filters();
        return;
    }

    // Set up logging if verbose or debug
    if args.verbose || args.debug {
        let level = if args.debug { "debug" } else { "info" };
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    if args.verbose {
        println!(
            "🔧 Domain Batch CLI v{} starting...",
            env!("CARGO_PKG_VERSION")
        );
    }

    // Run the batch
    if let Err(e) = run_batch(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    // --list-filters is self-contained, skip other validation
    if args.list_filters {
        return Ok(());
    }

    // Must have a position model
    if args.positions.is_empty() {
        return Err(
            "You must specify a position model, e.g. 'd,d' for two digits (see --help)"
                .to_string(),
        );
    }

    if args.positions.len() > MAX_POSITIONS {
        return Err(format!(
            "At most {} positions are supported, got {}",
            MAX_POSITIONS,
            args.positions.len()
        ));
    }

    // Can't have multiple output formats
    let output_formats = [args.json, args.csv].iter().filter(|&&x| x).count();
    if output_formats > 1 {
        return Err("Cannot specify multiple output formats (--json, --csv)".to_string());
    }

    // Validate concurrency
    if let Some(concurrency) = args.concurrency {
        if concurrency == 0 || concurrency > MAX_CONCURRENCY {
            return Err(format!(
                "Concurrency must be between 1 and {}",
                MAX_CONCURRENCY
            ));
        }
    }

    // Validate timeout format
    if let Some(timeout) = &args.timeout {
        if parse_timeout_string(timeout).is_none() {
            return Err(format!(
                "Invalid timeout '{}'. Use format like '5s', '30s', '2m'",
                timeout
            ));
        }
    }

    Ok(())
}

/// Print all available pattern filters with descriptions, then exit.
fn print_filters() {
    use console::Style;

    let heading = Style::new().yellow().bold();
    let name_style = Style::new().green().bold();

    println!();
    println!("{}", heading.apply_to("Available Pattern Filters:"));
    println!();

    for filter in PatternFilter::all() {
        println!(
            "  {}  {}",
            name_style.apply_to(format!("{:<12}", filter.as_str())),
            filter.description(),
        );
    }

    println!();
    println!("Filters only apply when every position is a digit.");
    println!("Use: domain-batch d,d,d --filter ABA");
}

/// Parse one position token: "d" (digit), "l" (letter), or "=TEXT" (fixed).
fn parse_position_spec(token: &str) -> Result<PositionSpec, String> {
    let token = token.trim();
    match token {
        "d" | "digit" => Ok(PositionSpec::Digit),
        "l" | "letter" => Ok(PositionSpec::Letter),
        _ => {
            if let Some(text) = token.strip_prefix('=') {
                if text.is_empty() {
                    return Err("Fixed-text position '=' cannot be empty".to_string());
                }
                Ok(PositionSpec::Fixed(text.to_string()))
            } else {
                Err(format!(
                    "Invalid position '{}'. Use 'd' (digit), 'l' (letter), or '=text' (fixed)",
                    token
                ))
            }
        }
    }
}

/// Main batch logic
async fn run_batch(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    // Build configuration from CLI args, environment, and config files
    let (config, endpoint) = build_config(&args)?;

    let runner = BatchRunner::new(config.clone());

    // Candidate generation is cheap and pure; compute it up front so the
    // dry-run path and the confirmation prompt share the same list
    let candidates = runner.candidates()?;

    // Dry-run: print candidates and exit without querying
    if args.dry_run {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&candidates)?);
        } else {
            for d in &candidates {
                println!("{}", d);
            }
        }
        eprintln!("{} domains would be queried", candidates.len());
        return Ok(());
    }

    // Interactive confirmation for large runs (TTY only)
    if candidates.len() > 5000 && !args.yes {
        let term = Term::stderr();
        if term.is_term() {
            eprint!(
                "Will query {} domains at concurrency {}. Proceed? [Y/n] ",
                candidates.len(),
                config.concurrency
            );
            let mut input = String::new();
            std::io::stdin().lock().read_line(&mut input)?;
            let answer = input.trim().to_lowercase();
            if answer == "n" || answer == "no" {
                eprintln!("Aborted.");
                return Ok(());
            }
        }
    }

    let endpoint = endpoint.ok_or(
        "No WHOIS proxy endpoint configured. Use --endpoint, DB_ENDPOINT, or a config file",
    )?;
    let client = WhoisProxyClient::new(&endpoint)?;

    if args.pretty {
        let filter_name = (config.filter != PatternFilter::None).then(|| config.filter.as_str());
        ui::print_header(candidates.len(), config.concurrency, filter_name);
    } else if args.verbose {
        println!(
            "🔍 Querying {} domains with concurrency: {}",
            candidates.len(),
            config.concurrency
        );
        println!();
    }

    // Ctrl-C requests cooperative cancellation; in-flight queries finish
    // and partial results are kept
    let handle = RunHandle::new();
    let ctrlc_handle = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nStopping after in-flight queries complete...");
            ctrlc_handle.stop();
        }
    });

    // Progress counter on stderr for text modes; structured modes get a
    // spinner instead so stdout stays machine-readable
    let is_structured = args.json || args.csv;
    let spinner = if is_structured && Term::stderr().is_term() {
        Some(ui::Spinner::start(format!(
            "Querying {} domains...",
            candidates.len()
        )))
    } else {
        None
    };
    let (progress_tx, mut progress_rx) =
        tokio::sync::mpsc::unbounded_channel::<domain_batch_lib::Progress>();
    let progress_task = if !is_structured {
        Some(tokio::spawn(async move {
            let term = Term::stderr();
            while let Some(p) = progress_rx.recv().await {
                let _ = term.clear_line();
                let _ = term.write_str(&format!(
                    "  [{}/{}] {:.0}% complete",
                    p.completed,
                    p.total,
                    p.percent()
                ));
            }
            let _ = term.clear_line();
        }))
    } else {
        None
    };

    let start_time = std::time::Instant::now();

    let summary = runner
        .run_with_proxy(&client, &handle, Some(progress_tx))
        .await?;

    let duration = start_time.elapsed();

    if let Some(spinner) = spinner {
        spinner.stop().await;
    }
    if let Some(task) = progress_task {
        // Sender side is dropped once the run finishes, so this join is bounded
        let _ = task.await;
    }

    display_results(&summary, &args, duration)?;

    Ok(())
}

/// Build BatchConfig from CLI arguments with config file integration.
///
/// Precedence order (highest to lowest):
/// 1. CLI arguments (explicit user input)
/// 2. Environment variables (DB_*)
/// 3. Local config file (./.domain-batch.toml)
/// 4. Global config file (~/.domain-batch.toml)
/// 5. XDG config file (~/.config/domain-batch/config.toml)
/// 6. Built-in defaults
///
/// Returns the resolved config and the proxy endpoint, if any source set one.
fn build_config(args: &Args) -> Result<(BatchConfig, Option<String>), Box<dyn std::error::Error>> {
    // Parse the position model first so errors surface before any file IO
    let positions = args
        .positions
        .iter()
        .map(|token| parse_position_spec(token))
        .collect::<Result<Vec<_>, _>>()?;

    let mut config = BatchConfig::new(positions, "com");
    let mut endpoint: Option<String> = None;

    // Create config manager for file discovery
    let config_manager = ConfigManager::new(args.verbose);

    // Step 1: Determine config file path and load config files
    let file_config = if let Some(explicit_config_path) = &args.config {
        // CLI --config flag provided
        if args.verbose {
            println!(
                "🔧 Using explicit config file (CLI --config): {}",
                explicit_config_path
            );
        }

        Some(config_manager.load_file(explicit_config_path).map_err(|e| {
            format!(
                "Failed to load config file '{}': {}",
                explicit_config_path, e
            )
        })?)
    } else if let Ok(env_config_path) = std::env::var("DB_CONFIG") {
        // DB_CONFIG environment variable provided
        if args.verbose {
            println!(
                "🔧 Using explicit config file (DB_CONFIG env var): {}",
                env_config_path
            );
        }

        Some(
            config_manager
                .load_file(&env_config_path)
                .map_err(|e| format!("Failed to load config file '{}': {}", env_config_path, e))?,
        )
    } else {
        // No explicit config: use automatic discovery
        if args.verbose {
            println!("🔧 Discovering config files...");
        }

        match config_manager.discover_and_load() {
            Ok(fc) => Some(fc),
            Err(e) => {
                if args.verbose {
                    eprintln!("⚠️ Config discovery warning: {}", e);
                }
                None
            }
        }
    };

    if let Some(fc) = file_config {
        apply_file_config(&mut config, &mut endpoint, fc)?;
    }

    // Step 2: Apply environment variables (DB_*)
    apply_environment_config(&mut config, &mut endpoint, args.verbose)?;

    // Step 3: Apply CLI arguments (highest precedence)
    apply_cli_args(&mut config, &mut endpoint, args)?;

    Ok((config, endpoint))
}

/// Merge FileConfig values into the run config.
fn apply_file_config(
    config: &mut BatchConfig,
    endpoint: &mut Option<String>,
    file_config: FileConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(defaults) = file_config.defaults {
        if let Some(concurrency) = defaults.concurrency {
            config.concurrency = concurrency.clamp(1, MAX_CONCURRENCY);
        }
        if let Some(suffix) = defaults.suffix {
            config.suffix = suffix;
        }
        if let Some(filter_name) = defaults.filter {
            config.filter = PatternFilter::from_str(&filter_name)?;
        }
        if let Some(timeout_str) = defaults.timeout {
            if let Some(secs) = parse_timeout_string(&timeout_str) {
                config.query_timeout = Some(Duration::from_secs(secs));
            }
        }
        if defaults.endpoint.is_some() {
            *endpoint = defaults.endpoint;
        }
    }

    Ok(())
}

/// Apply environment variables to the run config with DB_* support.
///
/// Uses the library's load_env_config() for validation and proper handling.
fn apply_environment_config(
    config: &mut BatchConfig,
    endpoint: &mut Option<String>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let env_config = load_env_config(verbose);

    if let Some(concurrency) = env_config.concurrency {
        config.concurrency = concurrency.clamp(1, MAX_CONCURRENCY);
    }
    if let Some(suffix) = env_config.suffix {
        config.suffix = suffix;
    }
    if let Some(filter_name) = env_config.filter {
        config.filter = PatternFilter::from_str(&filter_name)?;
    }
    if let Some(timeout_str) = env_config.timeout {
        if let Some(secs) = parse_timeout_string(&timeout_str) {
            config.query_timeout = Some(Duration::from_secs(secs));
        }
    }
    if env_config.endpoint.is_some() {
        *endpoint = env_config.endpoint;
    }

    Ok(())
}

/// Apply CLI arguments to the run config (highest precedence).
fn apply_cli_args(
    config: &mut BatchConfig,
    endpoint: &mut Option<String>,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency.clamp(1, MAX_CONCURRENCY);
    }
    if let Some(suffix) = &args.suffix {
        config.suffix = suffix.clone();
    }
    if let Some(filter_name) = &args.filter {
        config.filter = PatternFilter::from_str(filter_name)?;
    }
    if let Some(timeout_str) = &args.timeout {
        if let Some(secs) = parse_timeout_string(timeout_str) {
            config.query_timeout = Some(Duration::from_secs(secs));
        }
    }
    if args.endpoint.is_some() {
        *endpoint = args.endpoint.clone();
    }

    Ok(())
}

fn display_results(
    summary: &domain_batch_lib::RunSummary,
    args: &Args,
    duration: std::time::Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    // Apply keyword/availability filtering before any formatting
    let visible: Vec<&domain_batch_lib::QueryResult> = if args.available_only {
        domain_batch_lib::ResultView::partition(&summary.results, args.keyword.as_deref())
            .available
    } else {
        let keyword = args.keyword.as_deref().map(str::to_lowercase);
        summary
            .results
            .iter()
            .filter(|r| match &keyword {
                Some(kw) => r.domain.to_lowercase().contains(kw.as_str()),
                None => true,
            })
            .collect()
    };

    if args.json {
        display_json_results(&visible)?;
    } else if args.csv {
        display_csv_results(&visible);
    } else {
        display_text_results(summary, &visible, args, duration);
    }

    Ok(())
}

/// Display results in JSON format
fn display_json_results(
    results: &[&domain_batch_lib::QueryResult],
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(results)?;
    println!("{}", json);
    Ok(())
}

/// Display results in CSV format
fn display_csv_results(results: &[&domain_batch_lib::QueryResult]) {
    println!("domain,available,error");

    for result in results {
        let available = if result.error.is_some() {
            "unknown"
        } else if result.is_registered {
            "false"
        } else {
            "true"
        };

        let error = result
            .error
            .as_deref()
            .map(|e| e.replace(',', ";"))
            .unwrap_or_else(|| "-".to_string());

        println!("{},{},{}", result.domain, available, error);
    }
}

/// Display results in human-readable text format
fn display_text_results(
    summary: &domain_batch_lib::RunSummary,
    visible: &[&domain_batch_lib::QueryResult],
    args: &Args,
    duration: std::time::Duration,
) {
    if args.pretty {
        // Pretty mode: grouped layout with section headers
        let owned: Vec<domain_batch_lib::QueryResult> =
            visible.iter().map(|r| (*r).clone()).collect();
        ui::print_grouped_results(&owned, args.debug);
    } else {
        // Default mode: colored flat list
        for result in visible {
            ui::print_result(result, args.debug, None);
        }
    }

    // Summary covers the whole run, not just the visible subset
    let available = summary.results.iter().filter(|r| r.is_available()).count();
    let errors = summary
        .results
        .iter()
        .filter(|r| r.error.is_some())
        .count();
    let taken = summary.results.len() - available - errors;
    println!();
    ui::print_summary(
        summary.total,
        available,
        taken,
        errors,
        summary.stopped,
        duration,
    );
}

// domain-batch/src/main.rs tests module

#[cfg(test)]
mod tests {
    use super::*;

    // Helper function with all required fields
    fn create_test_args() -> Args {
        Args {
            positions: vec!["d".to_string(), "d".to_string()],
            suffix: None,
            filter: None,
            list_filters: false,
            dry_run: false,
            concurrency: None,
            timeout: None,
            yes: false,
            json: false,
            csv: false,
            pretty: false,
            available_only: false,
            keyword: None,
            endpoint: None,
            config: None,
            debug: false,
            verbose: false,
        }
    }

    #[test]
    fn test_parse_position_spec_variants() {
        assert_eq!(parse_position_spec("d").unwrap(), PositionSpec::Digit);
        assert_eq!(parse_position_spec("digit").unwrap(), PositionSpec::Digit);
        assert_eq!(parse_position_spec("l").unwrap(), PositionSpec::Letter);
        assert_eq!(parse_position_spec("letter").unwrap(), PositionSpec::Letter);
        assert_eq!(
            parse_position_spec("=shop").unwrap(),
            PositionSpec::Fixed("shop".to_string())
        );
    }

    #[test]
    fn test_parse_position_spec_rejects_garbage() {
        assert!(parse_position_spec("x").is_err());
        assert!(parse_position_spec("=").is_err());
        assert!(parse_position_spec("").is_err());
    }

    #[test]
    fn test_validate_args_requires_positions() {
        let mut args = create_test_args();
        args.positions = vec![];
        let result = validate_args(&args);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("position model"));
    }

    #[test]
    fn test_validate_args_position_cap() {
        let mut args = create_test_args();
        args.positions = vec!["d".to_string(); 7];
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_conflicting_formats() {
        let mut args = create_test_args();
        args.json = true;
        args.csv = true;
        let result = validate_args(&args);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("output formats"));
    }

    #[test]
    fn test_validate_args_concurrency_bounds() {
        let mut args = create_test_args();
        args.concurrency = Some(0);
        assert!(validate_args(&args).is_err());

        args.concurrency = Some(31);
        assert!(validate_args(&args).is_err());

        args.concurrency = Some(30);
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_bad_timeout() {
        let mut args = create_test_args();
        args.timeout = Some("soon".to_string());
        assert!(validate_args(&args).is_err());

        args.timeout = Some("5s".to_string());
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_list_filters_skips_checks() {
        let mut args = create_test_args();
        args.positions = vec![];
        args.list_filters = true;
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_cli_args_override_defaults() {
        let mut args = create_test_args();
        args.concurrency = Some(5);
        args.suffix = Some("io".to_string());
        args.filter = Some("aba".to_string());
        args.endpoint = Some("https://proxy.example.com".to_string());

        let mut config = BatchConfig::new(vec![PositionSpec::Digit], "com");
        let mut endpoint = None;
        apply_cli_args(&mut config, &mut endpoint, &args).unwrap();

        assert_eq!(config.concurrency, 5);
        assert_eq!(config.suffix, "io");
        assert_eq!(config.filter, PatternFilter::Aba);
        assert_eq!(endpoint.as_deref(), Some("https://proxy.example.com"));
    }

    #[test]
    fn test_cli_args_preserve_unset_values() {
        // When a flag is not passed, earlier-precedence values survive
        let args = create_test_args();
        let mut config = BatchConfig::new(vec![PositionSpec::Digit], "net").with_concurrency(7);
        let mut endpoint = Some("https://configured.example.com".to_string());
        apply_cli_args(&mut config, &mut endpoint, &args).unwrap();

        assert_eq!(config.concurrency, 7);
        assert_eq!(config.suffix, "net");
        assert_eq!(
            endpoint.as_deref(),
            Some("https://configured.example.com")
        );
    }

    #[test]
    fn test_file_config_applies_defaults() {
        let file_config = FileConfig {
            defaults: Some(domain_batch_lib::DefaultsConfig {
                concurrency: Some(15),
                suffix: Some("org".to_string()),
                filter: Some("consecutive".to_string()),
                timeout: Some("30s".to_string()),
                endpoint: Some("https://proxy.example.com/whois".to_string()),
            }),
            ..Default::default()
        };

        let mut config = BatchConfig::new(vec![PositionSpec::Digit], "com");
        let mut endpoint = None;
        apply_file_config(&mut config, &mut endpoint, file_config).unwrap();

        assert_eq!(config.concurrency, 15);
        assert_eq!(config.suffix, "org");
        assert_eq!(config.filter, PatternFilter::Consecutive);
        assert_eq!(config.query_timeout, Some(Duration::from_secs(30)));
        assert_eq!(
            endpoint.as_deref(),
            Some("https://proxy.example.com/whois")
        );
    }
}
