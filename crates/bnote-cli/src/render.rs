//! Plain-text rendering for the terminal.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bnote_core::constants::TICKER;
use bnote_core::units::format_units;
use bnote_core::{
    Balance, MarketSnapshot, ParameterField, ResolvedParameters, SessionSamplePoint, Timestamp,
};
use bnote_engine::{
    CalendarEntry, CalendarOverflow, ClosePreview, CurvePoint, LadderRung, MaturityBucket,
    StakePreview, StakeRow, SupplySplit, Valuation, WalletTotals,
};

pub fn tokens(amount: Balance, decimals: u8) -> String {
    format!("{} {}", format_units(amount, decimals), TICKER)
}

pub fn date(ts: Timestamp) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| ts.to_string())
}

fn opt(v: Option<f64>, precision: usize) -> String {
    v.map(|x| format!("{x:.precision$}")).unwrap_or_default()
}

pub fn assumed_defaults(resolved: &ResolvedParameters) {
    if resolved.is_fully_verified() {
        return;
    }
    let names: Vec<&str> = resolved
        .assumed_defaults
        .iter()
        .map(ParameterField::name)
        .collect();
    println!("Note: assumed defaults for {}", names.join(", "));
}

pub fn stake_preview(p: &StakePreview, decimals: u8, basis: u64) {
    let pct = |bps: u64| bnote_core::math::bps_to_percent(bps, basis);
    println!("Amount:            {}", tokens(p.amount, decimals));
    println!("Lock:              {} days", p.lock_days);
    println!(
        "Longer Pays Better: +{:.2}%  ({} full years)",
        pct(p.bonus.lpb_bonus_bps),
        p.bonus.lpb_years
    );
    println!("Bigger Pays Better: +{:.2}%", pct(p.bonus.bpb_bonus_bps));
    println!("Effective amount:  {}", tokens(p.bonus.effective_principal, decimals));
    println!("Projected shares:  {}", format_units(p.bonus.projected_shares, decimals));
    println!("Estimated yield:   {}", tokens(p.yield_amount, decimals));
    println!("Unlocks:           {}", date(p.unlock_timestamp));
    println!(
        "Max penalty:       {:.2}% early / {:.2}% late",
        p.max_early_penalty_percent, p.max_late_penalty_percent
    );
    if let Some(w) = &p.range_warning {
        println!("Warning: {w}");
    }
}

pub fn stake_table(rows: &[StakeRow], decimals: u8) {
    if rows.is_empty() {
        println!("No open stakes.");
        return;
    }
    println!(
        "{:>5}  {:>24}  {:>6}  {:<22}  {:<13}  {:>9}  {:>8}",
        "index", "amount", "days", "unlock", "status", "remaining", "penalty"
    );
    for r in rows {
        println!(
            "{:>5}  {:>24}  {:>6}  {:<22}  {:<13}  {:>9}  {:>7.2}%",
            r.index,
            format_units(r.principal_amount, decimals),
            r.lock_days,
            date(r.unlock_timestamp),
            r.status.as_str(),
            r.days_remaining,
            r.estimated_penalty_percent
        );
    }
}

pub fn close_preview(c: &ClosePreview, decimals: u8) {
    println!("Stake #{}: {}", c.index, tokens(c.principal_amount, decimals));
    println!("{}", c.message());
    println!("Estimated penalty: {}", tokens(c.penalty_amount, decimals));
}

pub fn curve(points: &[CurvePoint]) {
    println!("{:>8}  {:>8}", "offset", "penalty");
    for p in points {
        println!("{:>8}  {:>7.2}%", p.offset, p.penalty_percent);
    }
}

/// Everything the analytics view charts, in one serializable value.
#[derive(Serialize)]
pub struct AnalyticsReport {
    pub supply: SupplySplit,
    pub maturity: Vec<MaturityBucket>,
    pub calendar: Vec<CalendarEntry>,
    pub calendar_overflow: CalendarOverflow,
    pub ladder: Vec<LadderRung>,
    pub wallet: WalletTotals,
}

pub fn analytics(r: &AnalyticsReport, decimals: u8) {
    println!("Supply");
    println!("  locked       {}", tokens(r.supply.staked_amount, decimals));
    println!("  circulating  {}", tokens(r.supply.circulating_amount, decimals));
    println!("  staked       {:.2}%", r.supply.staked_percent);

    println!("Maturity");
    for b in &r.maturity {
        println!("  {:<9} {:>4}  {}", b.label, b.count, tokens(b.amount, decimals));
    }

    println!("Unlocks (next 90 days)");
    for e in r.calendar.iter().filter(|e| e.count > 0) {
        println!("  {}  {:>3}  {}", e.date, e.count, tokens(e.amount, decimals));
    }
    let o = &r.calendar_overflow;
    if o.beyond_count > 0 {
        println!("  later       {:>3}  {}", o.beyond_count, tokens(o.beyond_amount, decimals));
    }
    if o.past_count > 0 {
        println!("  overdue     {:>3}  {}", o.past_count, tokens(o.past_amount, decimals));
    }

    println!("Ladder");
    for rung in &r.ladder {
        println!("  #{:<4} +{:<5}d  {} days", rung.index, rung.offset, rung.duration);
    }

    println!("Wallet");
    println!("  stakes       {}", r.wallet.stake_count);
    println!("  principal    {}", tokens(r.wallet.principal, decimals));
    println!("  shares       {}", format_units(r.wallet.shares, decimals));
}

pub fn market(m: Option<&MarketSnapshot>, v: &Valuation) {
    let blank = MarketSnapshot::default();
    let m = m.unwrap_or(&blank);
    println!("Pair:           {}", m.pair_address);
    println!("Price (USD):    {}", opt(m.price_usd, 8));
    println!("Price (native): {}", opt(m.price_native, 8));
    println!("Liquidity:      {}", opt(m.liquidity_usd, 2));
    println!("FDV:            {}", opt(m.fdv_usd, 2));
    println!("Volume 24h:     {}", opt(m.volume_24h_usd, 2));
    println!(
        "Change:         {}% 1h / {}% 24h",
        opt(m.price_change_1h, 2),
        opt(m.price_change_24h, 2)
    );
    println!(
        "Txns 24h:       {} buys / {} sells",
        m.buys_24h.map(|n| n.to_string()).unwrap_or_default(),
        m.sells_24h.map(|n| n.to_string()).unwrap_or_default()
    );
    println!("Wallet (USD):   {}", opt(v.wallet_value_usd, 2));
    println!("Wallet (native): {}", opt(v.wallet_value_native, 4));
    println!("Market cap:     {}", opt(v.market_cap_usd, 2));
}

pub fn history(points: &[SessionSamplePoint]) {
    for p in points {
        let when = DateTime::<Utc>::from_timestamp_millis(p.timestamp)
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| p.timestamp.to_string());
        println!("{when}  {}", p.value);
    }
}
