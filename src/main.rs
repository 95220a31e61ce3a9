//! Spread Matcher - Binary Entry Point
//!
//! Reads a match request as JSON from a file or stdin, runs the matcher and
//! prints the result as pretty JSON on stdout. Logs go to stderr.
//!
//! ```text
//! spread-matcher request.json
//! cat request.json | spread-matcher --lenient --receipt -
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use spread_matcher::logging::{init_logging, LogFormat};
use spread_matcher::{MatchRequest, MatcherConfig, ReferencePolicy, SpreadMatcher};

/// Priority-tiered fair-share matcher
#[derive(Debug, Parser)]
#[command(name = "spread-matcher", version, about)]
struct Cli {
    /// Request file (`-` reads stdin)
    request: PathBuf,

    /// Matcher configuration file (JSON)
    #[arg(short, long, env = "SPREAD_MATCHER_CONFIG")]
    config: Option<PathBuf>,

    /// Skip priority nodes naming unknown entities instead of failing
    #[arg(long)]
    lenient: bool,

    /// List fully consumed entities in the leftover groups
    #[arg(long)]
    report_exhausted: bool,

    /// Log output format (pretty, json, compact)
    #[arg(long, default_value = "pretty")]
    log_format: LogFormat,

    /// Print the audit receipt after the result
    #[arg(long)]
    receipt: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format)?;
    debug!(?cli, "CLI arguments parsed");

    let config = resolve_config(&cli)?;
    let request = read_request(&cli.request)?;

    let matcher = SpreadMatcher::new(config);
    info!(
        references = ?matcher.config().references,
        report_exhausted = matcher.config().report_exhausted,
        demand = request.entity_groups[0].len(),
        supply = request.entity_groups[1].len(),
        tiers = request.priority.len(),
        "matching request"
    );
    let result = matcher.run_request(&request).context("matching failed")?;

    let receipt = result.receipt();
    info!(
        matches = receipt.match_count,
        matched = %receipt.matched_volume,
        leftover_demand = %receipt.leftover_demand,
        excess_supply = %receipt.excess_supply,
        digest = %receipt.digest_hex(),
        "request matched"
    );

    println!("{}", serde_json::to_string_pretty(&result)?);
    if cli.receipt {
        let summary = serde_json::json!({
            "matchCount": receipt.match_count,
            "matchedVolume": receipt.matched_volume,
            "leftoverDemand": receipt.leftover_demand,
            "excessSupply": receipt.excess_supply,
            "digest": receipt.digest_hex(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}

/// Config file first, then command-line flags on top.
fn resolve_config(cli: &Cli) -> Result<MatcherConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => MatcherConfig::default(),
    };

    if cli.lenient {
        config.references = ReferencePolicy::Lenient;
    }
    if cli.report_exhausted {
        config.report_exhausted = true;
    }

    debug!(?config, "matcher configuration");
    Ok(config)
}

fn read_request(path: &Path) -> Result<MatchRequest> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read request from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("failed to read request {}", path.display()))?
    };

    MatchRequest::from_json(&text).context("invalid match request")
}
