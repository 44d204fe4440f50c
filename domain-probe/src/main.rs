//! Domain Probe CLI Application
//!
//! A command-line interface for batch HTTPS status probing. Reads a CSV of
//! (domain, category) records, probes every domain through a fixed worker
//! pool, prints one line per result as it arrives, and finishes with
//! aggregate statistics.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use domain_probe_lib::{
    load_domains, load_env_config, parse_timeout_string, ConfigManager, EnvConfig, FileConfig,
    ProbeConfig, Prober, RunStats,
};
use std::process;
use std::time::Duration;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domain-probe
#[derive(Parser, Debug)]
#[command(name = "domain-probe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Probe a CSV of domains over HTTPS and report status codes and latency")]
#[command(
    long_about = "Probe every domain in a CSV file over HTTPS with a bounded worker pool.\n\nEach domain gets a single GET request (redirects are not followed); the per-domain\nstatus or failure is printed as it arrives, followed by summary statistics."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Input CSV file: header row, then `name,category` rows
    #[arg(value_name = "FILE", help_heading = "Input")]
    pub file: Option<String>,

    /// Probe only the first N records of the file
    #[arg(long = "limit", value_name = "N", help_heading = "Input")]
    pub limit: Option<usize>,

    /// Concurrent probe workers (default: 10, max: 100)
    #[arg(
        short = 'c',
        long = "concurrency",
        value_name = "N",
        help_heading = "Performance"
    )]
    pub concurrency: Option<usize>,

    /// Per-request timeout (e.g. "10s", "2m")
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Performance")]
    pub timeout: Option<String>,

    /// Delay each worker sleeps between jobs, in milliseconds
    #[arg(long = "delay-ms", value_name = "MS", help_heading = "Performance")]
    pub delay_ms: Option<u64>,

    /// Output results and summary as JSON instead of text
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_tracing(args.verbose);

    // Validate arguments
    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    // Run the probe batch
    if let Err(e) = run_probe(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Install the tracing subscriber.
///
/// RUST_LOG takes precedence; otherwise `-v` turns on debug events for the
/// probe crates and everything else stays at warn.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "warn,domain_probe=debug,domain_probe_lib=debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if let Some(concurrency) = args.concurrency {
        if concurrency == 0 || concurrency > 100 {
            return Err("Concurrency must be between 1 and 100".to_string());
        }
    }

    if let Some(timeout) = &args.timeout {
        if parse_timeout_string(timeout).is_none() {
            return Err(format!(
                "Invalid timeout '{}'. Use format like '5s', '30s', '2m'",
                timeout
            ));
        }
    }

    if args.limit == Some(0) {
        return Err("Limit must be at least 1 when set".to_string());
    }

    Ok(())
}

/// Main probing logic
async fn run_probe(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let env_config = load_env_config(args.verbose);

    // Build configuration with precedence: CLI > env > config file > defaults
    let config = build_config(&args, &env_config)?;
    tracing::debug!(?config, "resolved configuration");

    // Output mode and input file: CLI wins over DP_JSON / DP_FILE
    let json = args.json || env_config.json.unwrap_or(false);
    let file = match args.file.clone().or_else(|| env_config.file.clone()) {
        Some(file) => file,
        None => {
            return Err("You must specify an input CSV file (or set DP_FILE)".into());
        }
    };

    // Fatal on any load problem; no network activity has happened yet
    let domains = load_domains(&file)?;
    let probed_count = match config.limit {
        Some(limit) => domains.len().min(limit),
        None => domains.len(),
    };

    if !json {
        ui::print_header(domains.len(), probed_count, config.concurrency);
    }

    let prober = Prober::with_config(config);
    let mut results = prober.spawn(domains)?;

    let mut stats = RunStats::new();

    if json {
        // Collected mode: everything in one machine-readable document
        let mut collected = Vec::with_capacity(probed_count);
        while let Some(result) = results.recv().await {
            stats.record(&result);
            collected.push(result);
        }
        let document = serde_json::json!({
            "results": collected,
            "summary": stats,
        });
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        // Streaming mode: one line per result in arrival order
        while let Some(result) = results.recv().await {
            stats.record(&result);
            ui::print_result(&result);
        }
        ui::print_summary(&stats);
    }

    Ok(())
}

/// Build ProbeConfig with precedence: CLI args > DP_* env vars > config file
/// (explicit --config / DP_CONFIG, else discovered) > built-in defaults.
fn build_config(args: &Args, env_config: &EnvConfig) -> Result<ProbeConfig, Box<dyn std::error::Error>> {
    let mut config = ProbeConfig::default();

    let config_manager = ConfigManager::new(args.verbose);

    // Step 1: config files
    if let Some(explicit_path) = args.config.as_ref().or(env_config.config.as_ref()) {
        let file_config = config_manager
            .load_file(explicit_path)
            .map_err(|e| format!("Failed to load config file '{}': {}", explicit_path, e))?;
        config = merge_file_defaults(config, file_config);
    } else {
        match config_manager.discover_and_load() {
            Ok(file_config) => {
                config = merge_file_defaults(config, file_config);
            }
            Err(e) if args.verbose => {
                eprintln!("Config discovery warning: {}", e);
            }
            Err(_) => {
                // Silently continue with defaults if no config files found
            }
        }
    }

    // Step 2: environment variables (DP_*)
    config = apply_env_config(config, env_config);

    // Step 3: CLI arguments (highest precedence)
    config = apply_cli_args(config, args);

    Ok(config)
}

/// Merge config-file defaults into a ProbeConfig.
fn merge_file_defaults(mut config: ProbeConfig, file_config: FileConfig) -> ProbeConfig {
    if let Some(defaults) = file_config.defaults {
        if let Some(concurrency) = defaults.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(timeout_str) = defaults.timeout {
            if let Some(secs) = parse_timeout_string(&timeout_str) {
                config.request_timeout = Duration::from_secs(secs);
            }
        }
        if let Some(delay_ms) = defaults.delay_ms {
            config.politeness_delay = Duration::from_millis(delay_ms);
        }
        if let Some(limit) = defaults.limit {
            config.limit = Some(limit);
        }
        if let Some(user_agent) = defaults.user_agent {
            config.user_agent = user_agent;
        }
    }

    config
}

/// Apply DP_* environment variables on top of file/default values.
fn apply_env_config(mut config: ProbeConfig, env_config: &EnvConfig) -> ProbeConfig {
    if let Some(concurrency) = env_config.concurrency {
        config.concurrency = concurrency;
    }

    if let Some(timeout_str) = &env_config.timeout {
        if let Some(secs) = parse_timeout_string(timeout_str) {
            config.request_timeout = Duration::from_secs(secs);
        }
    }

    if let Some(delay_ms) = env_config.delay_ms {
        config.politeness_delay = Duration::from_millis(delay_ms);
    }

    if let Some(limit) = env_config.limit {
        config.limit = Some(limit);
    }

    if let Some(user_agent) = &env_config.user_agent {
        config.user_agent = user_agent.clone();
    }

    config
}

/// Apply CLI arguments (highest precedence). Only flags the user actually
/// passed override lower layers.
fn apply_cli_args(mut config: ProbeConfig, args: &Args) -> ProbeConfig {
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }

    if let Some(timeout_str) = &args.timeout {
        if let Some(secs) = parse_timeout_string(timeout_str) {
            config.request_timeout = Duration::from_secs(secs);
        }
    }

    if let Some(delay_ms) = args.delay_ms {
        config.politeness_delay = Duration::from_millis(delay_ms);
    }

    if let Some(limit) = args.limit {
        config.limit = Some(limit);
    }

    config
}

// domain-probe/src/main.rs tests module

#[cfg(test)]
mod tests {
    use super::*;
    use domain_probe_lib::DefaultsConfig;

    // Helper function with all required fields
    fn create_test_args() -> Args {
        Args {
            file: None,
            limit: None,
            concurrency: None,
            timeout: None,
            delay_ms: None,
            json: false,
            config: None,
            verbose: false,
        }
    }

    #[test]
    fn test_validate_args_defaults_ok() {
        let args = create_test_args();
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_concurrency_bounds() {
        let mut args = create_test_args();
        args.concurrency = Some(0);
        assert!(validate_args(&args).is_err());

        args.concurrency = Some(101);
        assert!(validate_args(&args).is_err());

        args.concurrency = Some(100);
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_timeout_format() {
        let mut args = create_test_args();
        args.timeout = Some("10s".to_string());
        assert!(validate_args(&args).is_ok());

        args.timeout = Some("soon".to_string());
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_zero_limit_rejected() {
        let mut args = create_test_args();
        args.limit = Some(0);
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_merge_file_defaults() {
        let file_config = FileConfig {
            defaults: Some(DefaultsConfig {
                concurrency: Some(25),
                timeout: Some("5s".to_string()),
                delay_ms: Some(0),
                limit: Some(200),
                user_agent: None,
            }),
        };

        let config = merge_file_defaults(ProbeConfig::default(), file_config);
        assert_eq!(config.concurrency, 25);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.politeness_delay, Duration::from_millis(0));
        assert_eq!(config.limit, Some(200));
        // Untouched fields keep their defaults
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_cli_args_override_lower_layers() {
        let file_config = FileConfig {
            defaults: Some(DefaultsConfig {
                concurrency: Some(25),
                ..Default::default()
            }),
        };
        let mut args = create_test_args();
        args.concurrency = Some(3);
        args.delay_ms = Some(50);

        let config = merge_file_defaults(ProbeConfig::default(), file_config);
        let config = apply_cli_args(config, &args);

        assert_eq!(config.concurrency, 3);
        assert_eq!(config.politeness_delay, Duration::from_millis(50));
    }

    #[test]
    fn test_unset_cli_args_preserve_config() {
        let args = create_test_args();
        let config = ProbeConfig::default().with_concurrency(42);
        let config = apply_cli_args(config, &args);
        assert_eq!(config.concurrency, 42);
    }

    #[test]
    fn test_env_config_applies_between_file_and_cli() {
        let env_config = EnvConfig {
            concurrency: Some(7),
            delay_ms: Some(10),
            ..Default::default()
        };

        let config = apply_env_config(ProbeConfig::default(), &env_config);
        assert_eq!(config.concurrency, 7);
        assert_eq!(config.politeness_delay, Duration::from_millis(10));

        // CLI still wins over env
        let mut args = create_test_args();
        args.concurrency = Some(2);
        let config = apply_cli_args(config, &args);
        assert_eq!(config.concurrency, 2);
    }
}
