//! bnote
//!
//! Staking companion for the bNote token. Previews stake economics before
//! anything is signed, reports on open stakes, and keeps a small session
//! history of pool-wide figures.
//!
//! Usage:
//!   bnote preview   --amount <bNote> --days <n>
//!   bnote stakes    --owner <addr>
//!   bnote curve     --days <n>
//!   bnote analytics --owner <addr> [--json]
//!   bnote export    --owner <addr> [--out <file>]
//!   bnote stake     --owner <addr> --amount <bNote> --days <n> [--auto-renew] [--yes]
//!   bnote unstake   --owner <addr> --index <i> [--yes]
//!   bnote market    --token <addr> [--owner <addr>]
//!   bnote watch     [--token <addr>] [--interval <secs>]
//!   bnote history   --metric <total_shares|price_ratio>

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bnote_core::constants::{DEFAULT_REFRESH_INTERVAL_SECS, DEFAULT_TOKEN_DECIMALS};
use bnote_core::units::parse_units;
use bnote_core::{MarketSnapshot, ResolvedParameters, StakeIndex, Timestamp};
use bnote_engine::{analytics, penalty, preview, valuation::Valuation};
use bnote_ledger::{
    ConfigurationSource, DexScreenerClient, LedgerClient, MarketDataProvider, RpcLedgerClient,
    SnapshotLedger,
};
use bnote_session::{ChangeGate, Metric, SeriesStore};

mod render;
use render::AnalyticsReport;

// ── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "bnote", version, about = "bNote staking previews and analytics")]
struct Args {
    /// Staking gateway JSON-RPC endpoint.
    #[arg(long, global = true, default_value = "http://127.0.0.1:8545")]
    rpc: String,

    /// Read parameters and stakes from a JSON snapshot instead of the gateway.
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Stake owner address.
    #[arg(long, global = true)]
    owner: Option<String>,

    /// Directory for the session history database.
    #[arg(long, global = true, default_value = "~/.bnote/session")]
    data_dir: PathBuf,

    /// Market data API base URL.
    #[arg(long, global = true, default_value = "https://api.dexscreener.com")]
    market_url: String,

    /// Token contract address, for market data.
    #[arg(long, global = true)]
    token: Option<String>,

    /// Chain id fragment used to pick market pairs.
    #[arg(long, global = true, default_value = "pulse")]
    chain: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Preview bonus, shares, yield and penalties for a prospective stake.
    Preview {
        /// Amount in bNote (decimal).
        #[arg(long)]
        amount: String,
        #[arg(long)]
        days: u32,
    },

    /// List the owner's stakes with status and penalty estimate.
    Stakes,

    /// Print the penalty curve for a lock length.
    Curve {
        #[arg(long)]
        days: u32,
    },

    /// Supply split, maturity histogram, unlock calendar, ladder and totals.
    Analytics {
        /// Emit chart datasets as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Write the owner's stakes as CSV.
    Export {
        /// Output file; stdout if omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Open a stake. Only submits with --yes.
    Stake {
        #[arg(long)]
        amount: String,
        #[arg(long)]
        days: u32,
        #[arg(long, default_value_t = false)]
        auto_renew: bool,
        #[arg(long, default_value_t = false)]
        yes: bool,
    },

    /// End a stake. Only submits with --yes.
    Unstake {
        #[arg(long)]
        index: StakeIndex,
        #[arg(long, default_value_t = false)]
        yes: bool,
    },

    /// Market snapshot plus wallet value and market cap.
    Market,

    /// Refresh periodically and record total shares and price ratio on change.
    Watch {
        #[arg(long, default_value_t = DEFAULT_REFRESH_INTERVAL_SECS)]
        interval: u64,
    },

    /// Print a recorded session series.
    History {
        #[arg(long, value_parser = parse_metric)]
        metric: Metric,
    },
}

fn parse_metric(s: &str) -> Result<Metric, String> {
    Metric::from_key(s).ok_or_else(|| format!("unknown metric {s:?} (total_shares, price_ratio)"))
}

// ── Main ─────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,bnote=info")),
        )
        .init();

    let args = Args::parse();
    let ledger = connect(&args)?;

    match &args.command {
        Command::Preview { amount, days } => {
            let resolved = load_parameters(ledger.as_ref()).await?;
            let params = &resolved.params;
            let amount = parse_units(amount, params.token_decimals)?;
            let pv = preview::preview_stake(amount, *days, now(), params)?;
            render::stake_preview(&pv, params.token_decimals, params.basis_denominator);
            Ok(())
        }

        Command::Stakes => {
            let owner = require_owner(&args)?;
            let resolved = load_parameters(ledger.as_ref()).await?;
            let stakes = ledger.stakes_of(owner).await?;
            let rows = analytics::stake_rows(&stakes, &resolved.params, now())?;
            render::stake_table(&rows, resolved.params.token_decimals);
            Ok(())
        }

        Command::Curve { days } => {
            let resolved = load_parameters(ledger.as_ref()).await?;
            let points = penalty::curve(*days, &resolved.params)?;
            render::curve(&points);
            Ok(())
        }

        Command::Analytics { json } => {
            let owner = require_owner(&args)?;
            let resolved = load_parameters(ledger.as_ref()).await?;
            let params = &resolved.params;
            let stakes = ledger.stakes_of(owner).await?;
            let now = now();
            let report = AnalyticsReport {
                supply: analytics::supply_split(params),
                maturity: analytics::maturity_histogram(&stakes),
                calendar: analytics::unlock_calendar(&stakes, now),
                calendar_overflow: analytics::unlock_calendar_overflow(&stakes, now),
                ladder: analytics::ladder(&stakes),
                wallet: analytics::wallet_totals(&stakes),
            };
            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                render::analytics(&report, params.token_decimals);
            }
            Ok(())
        }

        Command::Export { out } => {
            let owner = require_owner(&args)?;
            let resolved = load_parameters(ledger.as_ref()).await?;
            let stakes = ledger.stakes_of(owner).await?;
            let csv = bnote_engine::stakes_csv(&stakes, &resolved.params, now())?;
            match out {
                Some(path) => {
                    std::fs::write(path, csv)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!(path = %path.display(), stakes = stakes.len(), "exported stakes");
                }
                None => println!("{csv}"),
            }
            Ok(())
        }

        Command::Stake { amount, days, auto_renew, yes } => {
            require_owner(&args)?;
            let resolved = load_parameters(ledger.as_ref()).await?;
            let params = &resolved.params;
            let amount = parse_units(amount, params.token_decimals)?;
            preview::validate_request(amount, *days, params)?;
            let pv = preview::preview_stake(amount, *days, now(), params)?;
            render::stake_preview(&pv, params.token_decimals, params.basis_denominator);
            if !yes {
                println!("Not submitted. Re-run with --yes to open this stake.");
                return Ok(());
            }
            let receipt = ledger.open_stake(amount, *days, *auto_renew).await?;
            println!("Stake submitted: {}", receipt.tx_hash);
            Ok(())
        }

        Command::Unstake { index, yes } => {
            let owner = require_owner(&args)?;
            let resolved = load_parameters(ledger.as_ref()).await?;
            let stakes = ledger.stakes_of(owner).await?;
            let cp = preview::close_preview(&stakes, *index, now(), &resolved.params)?;
            render::close_preview(&cp, resolved.params.token_decimals);
            if !yes {
                println!("Not submitted. Re-run with --yes to end this stake.");
                return Ok(());
            }
            let receipt = ledger.close_stake(*index).await?;
            println!("Close submitted: {}", receipt.tx_hash);
            Ok(())
        }

        Command::Market => {
            let provider = market_provider(&args)?;
            // Blank fields when the feed is down.
            let snapshot = provider.snapshot().await.ok();
            let v = market_valuation(ledger.as_ref(), args.owner.as_deref(), snapshot.as_ref()).await;
            render::market(snapshot.as_ref(), &v);
            Ok(())
        }

        Command::Watch { interval } => cmd_watch(&args, ledger.as_ref(), *interval).await,

        Command::History { metric } => {
            let store = SeriesStore::open(expand_tilde(&args.data_dir))?;
            render::history(&store.load(*metric)?);
            Ok(())
        }
    }
}

// ── Watch loop ────────────────────────────────────────────────────────────────

async fn cmd_watch(args: &Args, ledger: &dyn LedgerClient, interval_secs: u64) -> anyhow::Result<()> {
    if interval_secs == 0 {
        bail!("--interval must be at least 1 second");
    }
    let data_dir = expand_tilde(&args.data_dir);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data dir {}", data_dir.display()))?;
    let store = SeriesStore::open(&data_dir)?;
    let provider = args.token.as_ref().map(|_| market_provider(args)).transpose()?;

    let mut shares_gate = ChangeGate::new();
    let mut price_gate = ChangeGate::new();
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    info!(interval_secs, data_dir = %data_dir.display(), "watching");

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                store.flush()?;
                return Ok(());
            }
        }

        let now_ms = chrono::Utc::now().timestamp_millis();
        match ledger.resolved_parameters().await {
            Ok(resolved) => {
                let total = resolved.params.total_shares;
                if shares_gate.observe(&total) {
                    let len = store.record(Metric::TotalShares, total as f64, now_ms)?;
                    println!("total_shares {total} ({len} samples)");
                }
            }
            Err(e) => warn!(error = %e, "parameter refresh failed"),
        }

        if let Some(provider) = &provider {
            match provider.snapshot().await {
                Ok(snapshot) => {
                    if let Some(ratio) = snapshot.price_native {
                        if price_gate.observe(&ratio) {
                            let len = store.record(Metric::PriceRatio, ratio, now_ms)?;
                            println!("price_ratio {ratio} ({len} samples)");
                        }
                    }
                }
                Err(e) => warn!(error = %e, "market refresh failed"),
            }
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn connect(args: &Args) -> anyhow::Result<Box<dyn LedgerClient>> {
    match &args.snapshot {
        Some(path) => Ok(Box::new(SnapshotLedger::open(expand_tilde(path))?)),
        None => {
            let mut client = RpcLedgerClient::new(&args.rpc);
            if let Some(owner) = &args.owner {
                client = client.with_owner(owner);
            }
            Ok(Box::new(client))
        }
    }
}

fn market_provider(args: &Args) -> anyhow::Result<DexScreenerClient> {
    let token = args.token.as_deref().context("--token is required for market data")?;
    Ok(DexScreenerClient::new(&args.market_url, token, &args.chain))
}

async fn load_parameters(ledger: &dyn LedgerClient) -> anyhow::Result<ResolvedParameters> {
    let resolved = ledger
        .resolved_parameters()
        .await
        .context("loading protocol parameters")?;
    render::assumed_defaults(&resolved);
    Ok(resolved)
}

/// Wallet value and market cap. A ledger outage blanks only the figures
/// that depend on it; the market snapshot still renders.
async fn market_valuation(
    ledger: &dyn LedgerClient,
    owner: Option<&str>,
    snapshot: Option<&MarketSnapshot>,
) -> Valuation {
    let params = match ledger.resolved_parameters().await {
        Ok(resolved) => {
            render::assumed_defaults(&resolved);
            Some(resolved.params)
        }
        Err(e) => {
            warn!(error = %e, "protocol parameters unavailable");
            None
        }
    };
    let balance = match owner {
        Some(owner) => ledger
            .balance_of(owner)
            .await
            .map_err(|e| warn!(owner, error = %e, "balance unavailable"))
            .ok(),
        None => Some(0),
    };
    let decimals = params
        .as_ref()
        .map_or(DEFAULT_TOKEN_DECIMALS, |p| p.token_decimals);
    Valuation::derive(
        balance,
        params.as_ref().map(|p| p.total_supply),
        decimals,
        snapshot,
    )
}

fn require_owner(args: &Args) -> anyhow::Result<&str> {
    args.owner.as_deref().context("--owner is required for this command")
}

fn now() -> Timestamp {
    chrono::Utc::now().timestamp()
}

fn expand_tilde(path: &PathBuf) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Ok(home) = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) {
            return PathBuf::from(home).join(stripped);
        }
    }
    path.clone()
}
