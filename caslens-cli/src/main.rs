use anyhow::{anyhow, bail, Context, Result};
use caslens_core::PortfolioSummary;
use caslens_ingest::{parse_statement, StatementVariant, UnnamedValuePolicy};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod config;
mod report;

use config::{Config, OutputFormat};

/// Exit status when a statement parsed cleanly but held no recognisable funds
const EXIT_NO_HOLDINGS: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "caslens", version, about = "Extract fund holdings from CAS statements")]
struct Cli {
    /// Log parser decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a password-protected CAS PDF and summarise its holdings
    Parse {
        /// Statement PDF
        file: PathBuf,

        /// PDF password (usually PAN or date of birth)
        #[arg(long)]
        password: String,

        /// Statement layout to accept
        #[arg(long, value_enum)]
        variant: Option<VariantArg>,

        /// Handling of values with no recoverable scheme name
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,

        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Manage ~/.caslens/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantArg {
    Summary,
    Any,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    Placeholder,
    Drop,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Parse {
            file,
            password,
            variant,
            policy,
            format,
            timeout_secs,
        } => {
            let mut cfg = config::load_config()?;
            if let Some(v) = variant {
                cfg.parser.variant = match v {
                    VariantArg::Summary => StatementVariant::Summary,
                    VariantArg::Any => StatementVariant::Any,
                };
            }
            if let Some(p) = policy {
                cfg.parser.unnamed_value_policy = match p {
                    PolicyArg::Placeholder => UnnamedValuePolicy::Placeholder,
                    PolicyArg::Drop => UnnamedValuePolicy::Drop,
                };
            }
            if let Some(f) = format {
                cfg.cli.format = f;
            }
            if let Some(t) = timeout_secs {
                cfg.cli.timeout_secs = t;
            }
            return parse_file(file, password, cfg).await;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn parse_file(file: PathBuf, password: String, cfg: Config) -> Result<ExitCode> {
    if !file.exists() {
        bail!("Statement not found: {}", file.display());
    }
    let bytes = std::fs::read(&file).with_context(|| format!("read {}", file.display()))?;
    tracing::debug!(
        file = %file.display(),
        variant = ?cfg.parser.variant,
        policy = ?cfg.parser.unnamed_value_policy,
        "parsing statement"
    );

    let parser_cfg = cfg.parser.clone();
    let task = tokio::task::spawn_blocking(move || parse_statement(&bytes, &password, &parser_cfg));
    let summary = tokio::time::timeout(Duration::from_secs(cfg.cli.timeout_secs), task)
        .await
        .map_err(|_| anyhow!("gave up on {} after {}s", file.display(), cfg.cli.timeout_secs))?
        .context("parser task failed")?
        .with_context(|| format!("parsing {}", file.display()))?;

    match cfg.cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Text => {
            print!("{}", report::render_text(&summary));
        }
    }

    if summary.is_empty() {
        eprintln!(
            "No holdings detected. Ensure this is a standard CAMS/KFintech CAS statement."
        );
    }
    Ok(ExitCode::from(exit_status(&summary)))
}

/// Process status for a statement that parsed without error
fn exit_status(summary: &PortfolioSummary) -> u8 {
    if summary.is_empty() { EXIT_NO_HOLDINGS } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caslens_core::{FundRecord, PlanType, RecordSource, DEFAULT_SAVINGS_RATE};

    #[test]
    fn test_empty_statement_exits_with_no_holdings_status() {
        let empty = PortfolioSummary::aggregate(Vec::new(), DEFAULT_SAVINGS_RATE);
        assert_eq!(exit_status(&empty), EXIT_NO_HOLDINGS);
        assert_ne!(EXIT_NO_HOLDINGS, 1);
    }

    #[test]
    fn test_statement_with_funds_exits_cleanly() {
        let fund = FundRecord::new("Axis Bluechip Fund Direct", PlanType::Direct, 100.0, RecordSource::IsinAnchor)
            .unwrap();
        let summary = PortfolioSummary::aggregate(vec![fund], DEFAULT_SAVINGS_RATE);
        assert_eq!(exit_status(&summary), 0);
    }

    #[test]
    fn test_parse_flags_are_accepted() {
        let cli = Cli::try_parse_from([
            "caslens", "parse", "cas.pdf", "--password", "ABCDE1234F", "--variant", "any", "--policy", "drop",
            "--format", "json",
        ])
        .unwrap();
        match cli.command {
            Command::Parse { variant, policy, format, .. } => {
                assert!(matches!(variant, Some(VariantArg::Any)));
                assert!(matches!(policy, Some(PolicyArg::Drop)));
                assert_eq!(format, Some(OutputFormat::Json));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
