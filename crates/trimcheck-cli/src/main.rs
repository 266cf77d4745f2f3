//! trimcheck CLI - contract verification for the trim optimizer API

mod logging;
mod storage;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};

use trimcheck_core::plan::build_plan;
use trimcheck_core::{Category, HarnessConfig, ScenarioSet, VerdictPolicy};
use trimcheck_runner::{Selection, SuiteRunner, guard};

#[derive(Parser)]
#[command(name = "trimcheck")]
#[command(about = "Contract verification for the trim optimizer and campaign scheduler API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "terminal")]
    output: OutputFormat,

    /// Config file (default: .trimcheck.toml in the current directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Deployment under test (overrides config and API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Per-request timeout in seconds (overrides config and API_TIMEOUT)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Emit log events as JSON
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scenario suite against the deployment
    Run {
        #[command(flatten)]
        select: SelectArgs,

        /// Shuffle scenario order with this seed
        #[arg(long)]
        seed: Option<u64>,

        /// Environment skips fail the run
        #[arg(long)]
        strict: bool,

        /// Report directory
        #[arg(long, default_value = storage::DEFAULT_REPORT_DIR)]
        report_dir: PathBuf,

        /// Do not persist the report
        #[arg(long)]
        no_save: bool,
    },

    /// Show what a run would send without sending anything
    Plan {
        #[command(flatten)]
        select: SelectArgs,
    },

    /// List the endpoint catalog and its scenarios
    List,

    /// Check the deployment once and report whether it is reachable
    Check,

    /// Initialize config file
    Init,

    /// Export JSON Schema for the run report
    Schema,
}

#[derive(Args)]
struct SelectArgs {
    /// Only these categories (comma separated)
    #[arg(long, value_delimiter = ',')]
    category: Vec<Category>,

    /// Only scenarios whose name contains this
    #[arg(long)]
    name: Option<String>,

    /// Skip the accessibility sweep
    #[arg(long)]
    no_sweep: bool,
}

impl SelectArgs {
    fn selection(&self) -> Selection {
        Selection {
            categories: self.category.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    Terminal,
    Json,
    Silent,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(3)
        }
    }
}

/// Defaults, then config file, then environment, then flags
fn load_config(cli: &Cli) -> Result<HarnessConfig> {
    let cfg = match &cli.config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::load_default()?,
    };
    let mut cfg = cfg.with_env(|key| std::env::var(key).ok())?;

    if let Some(url) = &cli.base_url {
        cfg.base_url.clone_from(url);
    }
    if let Some(timeout) = cli.timeout {
        if timeout == 0 {
            bail!("--timeout must be greater than zero");
        }
        cfg.timeout_secs = timeout;
    }
    Ok(cfg)
}

/// Built-in scenario table with the config's status overrides applied
fn scenario_set(cfg: &HarnessConfig) -> Result<ScenarioSet> {
    let mut set = ScenarioSet::builtin()?;
    cfg.apply_overrides(&mut set)?;
    Ok(set)
}

fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::Init => return init(Path::new(".trimcheck.toml")),
        Commands::Schema => {
            println!("{}", trimcheck_core::schema::generate_schema());
            return Ok(0);
        }
        _ => {}
    }

    let cfg = load_config(&cli)?;
    logging::init(&cfg.log_filter(), cli.log_json);
    let set = scenario_set(&cfg)?;

    match cli.command {
        Commands::Run {
            select,
            seed,
            strict,
            report_dir,
            no_save,
        } => {
            if cli.output != OutputFormat::Silent {
                eprintln!("Config:");
                eprintln!("  base_url: {}", cfg.base_url);
                eprintln!("  timeout:  {}s", cfg.timeout_secs);
                if !cfg.headers.is_empty() {
                    eprintln!("  headers:  {} configured", cfg.headers.len());
                }
                if !cfg.status_overrides.is_empty() {
                    eprintln!("  overrides: {}", cfg.status_overrides.len());
                }
                eprintln!();
            }

            let policy = if strict {
                VerdictPolicy::strict()
            } else {
                VerdictPolicy::default()
            };
            let report = SuiteRunner::new(&cfg, &set)
                .with_selection(select.selection())
                .with_seed(seed)
                .with_sweep(!select.no_sweep)
                .with_policy(policy)
                .with_progress(cli.output == OutputFormat::Terminal)
                .run()?;

            match cli.output {
                OutputFormat::Terminal => println!("\n{}", report.to_terminal()),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Silent => {}
            }

            if !no_save {
                match storage::save_report(&report, &cfg, &report_dir) {
                    Ok(path) => {
                        if cli.output != OutputFormat::Silent {
                            eprintln!("Report saved: {}", path.display());
                        }
                    }
                    Err(e) => eprintln!("Warning: failed to save report: {e}"),
                }
            }

            Ok(report.verdict.exit_code)
        }

        Commands::Plan { select } => {
            let selected: Vec<&str> = select
                .selection()
                .select(&set)
                .into_iter()
                .map(|(s, _)| s.name.as_str())
                .collect();
            let plan = build_plan(&cfg, &set, &selected, !select.no_sweep);
            match cli.output {
                OutputFormat::Terminal => println!("{}", plan.to_terminal()),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
                OutputFormat::Silent => {}
            }
            Ok(i32::from(plan.has_errors()))
        }

        Commands::List => {
            match cli.output {
                OutputFormat::Terminal => println!("{}", catalog_text(&set)),
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&catalog_json(&set))?);
                }
                OutputFormat::Silent => {}
            }
            Ok(0)
        }

        Commands::Check => {
            let report = guard::check_health(&cfg, set.registry());
            match cli.output {
                OutputFormat::Terminal => {
                    println!("{}: {}", cfg.base_url, report.summary());
                    if let Some(excerpt) = &report.excerpt {
                        println!("  body: {excerpt}");
                    }
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Silent => {}
            }
            Ok(if report.reachable { 0 } else { 3 })
        }

        Commands::Init | Commands::Schema => Ok(0),
    }
}

fn init(path: &Path) -> Result<i32> {
    if path.exists() {
        eprintln!("{} already exists", path.display());
        return Ok(1);
    }

    std::fs::write(path, HarnessConfig::example())?;
    println!("Created {}", path.display());
    println!("\nEdit the file to configure:");
    println!("  - base_url: deployment to verify");
    println!("  - api_token / api_key: credentials");
    println!("  - headers: extra request headers");
    println!("  - status_overrides: narrow broad accepted-status sets");
    Ok(0)
}

/// Endpoints grouped by category, each with its scenarios
fn catalog_text(set: &ScenarioSet) -> String {
    let mut lines = Vec::new();
    for category in Category::ALL {
        let endpoints = set.registry().by_category(category);
        if endpoints.is_empty() {
            continue;
        }
        lines.push(format!("{category} ({} endpoints)", endpoints.len()));
        for endpoint in endpoints {
            let names = scenario_names(set, endpoint);
            lines.push(format!("  {}", endpoint.label()));
            for name in names {
                let expected = set
                    .get(name)
                    .map(|s| s.expected_display())
                    .unwrap_or_default();
                lines.push(format!("    {name} -> {expected}"));
            }
        }
    }
    lines.push(format!(
        "\n{} endpoints, {} scenarios",
        set.registry().len(),
        set.scenarios().len()
    ));
    lines.join("\n")
}

fn catalog_json(set: &ScenarioSet) -> serde_json::Value {
    let endpoints: Vec<serde_json::Value> = set
        .registry()
        .iter()
        .map(|endpoint| {
            serde_json::json!({
                "method": endpoint.method.as_str(),
                "path": endpoint.path,
                "category": endpoint.category.as_str(),
                "required_params": endpoint.required_params,
                "scenarios": scenario_names(set, endpoint),
            })
        })
        .collect();
    serde_json::Value::Array(endpoints)
}

fn scenario_names<'a>(set: &'a ScenarioSet, endpoint: &trimcheck_core::EndpointSpec) -> Vec<&'a str> {
    set.scenarios()
        .iter()
        .filter(|s| s.method == endpoint.method && s.path == endpoint.path)
        .map(|s| s.name.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_run_flags() {
        let cli = Cli::try_parse_from([
            "trimcheck",
            "run",
            "--category",
            "health,campaign",
            "--name",
            "fetch",
            "--seed",
            "7",
            "--no-sweep",
            "--strict",
            "--output",
            "json",
        ])
        .unwrap();
        let Commands::Run {
            select,
            seed,
            strict,
            report_dir,
            ..
        } = cli.command
        else {
            panic!("expected run");
        };
        assert_eq!(select.category, vec![Category::Health, Category::Campaign]);
        assert_eq!(select.name.as_deref(), Some("fetch"));
        assert!(select.no_sweep);
        assert_eq!(seed, Some(7));
        assert!(strict);
        assert_eq!(report_dir, PathBuf::from(".trimcheck/reports"));
        assert!(cli.output == OutputFormat::Json);
    }

    #[test]
    fn unknown_category_rejected() {
        assert!(Cli::try_parse_from(["trimcheck", "plan", "--category", "billing"]).is_err());
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.toml");
        std::fs::write(&path, "base_url = \"http://from-file\"\ntimeout_secs = 9\n").unwrap();
        let path_arg = path.to_string_lossy().to_string();

        let cli = Cli::try_parse_from([
            "trimcheck",
            "plan",
            "--config",
            path_arg.as_str(),
            "--base-url",
            "http://from-flag",
        ])
        .unwrap();
        let cfg = load_config(&cli).unwrap();
        assert_eq!(cfg.base_url, "http://from-flag");
        assert_eq!(cfg.timeout_secs, 9);
    }

    #[test]
    fn zero_timeout_flag_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.toml");
        std::fs::write(&path, "").unwrap();
        let path_arg = path.to_string_lossy().to_string();
        let cli =
            Cli::try_parse_from(["trimcheck", "check", "--config", path_arg.as_str(), "--timeout", "0"])
                .unwrap();
        assert!(load_config(&cli).is_err());
    }

    #[test]
    fn loosening_override_is_fatal() {
        let cfg = HarnessConfig {
            status_overrides: vec![trimcheck_core::StatusOverride {
                scenario: "health_check".into(),
                statuses: vec![200, 503],
            }],
            ..HarnessConfig::default()
        };
        assert!(scenario_set(&cfg).is_err());
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".trimcheck.toml");
        assert_eq!(init(&path).unwrap(), 0);
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, HarnessConfig::example());
        assert_eq!(init(&path).unwrap(), 1);
    }

    #[test]
    fn catalog_lists_every_endpoint() {
        let set = ScenarioSet::builtin().unwrap();
        let text = catalog_text(&set);
        assert!(text.contains("health (1 endpoints)"));
        assert!(text.contains("    health_check -> {200}"));
        assert!(text.ends_with(&format!(
            "{} endpoints, {} scenarios",
            set.registry().len(),
            set.scenarios().len()
        )));
        assert_eq!(
            catalog_json(&set).as_array().unwrap().len(),
            set.registry().len()
        );
    }
}
