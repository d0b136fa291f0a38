use std::iter;

use core_sim::{generate_series, BoundedList, Eviction, RandomSource, Series, SimConfig};
use strategy::{synth_decision, synth_seed_signal, Decision, Position, Signal, Trade};
use time::{Duration, OffsetDateTime};

const PNL_HISTORY_SPAN: Duration = Duration::days(15);
const PNL_HISTORY_STEP: Duration = Duration::hours(2);
const SEED_SIGNAL_SPACING: Duration = Duration::minutes(2);
const SEED_DECISION_SPACING: Duration = Duration::minutes(3);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PnlPoint {
    pub at: OffsetDateTime,
    pub pnl: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveMarket {
    pub price: f64,
    pub rsi: f64,
    pub vwap: f64,
}

/// Everything the dashboard shows, kept in canonical (unformatted) form.
#[derive(Debug, Clone, PartialEq)]
pub struct StateStore {
    pub total_signals: u64,
    pub total_trades: u64,
    pub position: Position,
    pub cumulative_pnl: f64,
    pub projected_balance: f64,
    pub live: LiveMarket,
    pub series: Series,
    pub pnl_history: BoundedList<PnlPoint>,
    pub signals: BoundedList<Signal>,
    pub decisions: BoundedList<Decision>,
    pub trades: BoundedList<Trade>,
}

impl StateStore {
    /// Fresh start-up state: full PnL window, full signal and decision
    /// lists, no trades, flat position.
    pub fn seeded<R>(config: &SimConfig, rng: &mut R, now: OffsetDateTime) -> Self
    where
        R: RandomSource + ?Sized,
    {
        let interval = Duration::minutes(config.bar_interval_minutes);
        let (series, rsi) = generate_series(
            config.seed_price,
            config.series_length,
            interval,
            now,
            rng,
        );
        let price = series.last_close().unwrap_or(config.seed_price);

        let history_start = now - PNL_HISTORY_SPAN;
        let pnl_seeds = linspace(
            config.pnl_history_start,
            config.initial_pnl,
            config.pnl_window,
        );
        let pnl_history = BoundedList::seeded(
            config.pnl_window,
            Eviction::DropOldest,
            pnl_seeds.into_iter().enumerate().map(|(idx, pnl)| {
                let at = history_start + PNL_HISTORY_STEP * idx as i32;
                PnlPoint { at, pnl }
            }),
        );

        let signals = BoundedList::seeded(
            config.signal_capacity,
            Eviction::DropOldest,
            (0..config.signal_capacity).rev().map(|age| {
                let at = now - SEED_SIGNAL_SPACING * age as i32;
                synth_seed_signal(rng, at, config.seed_price)
            }),
        );

        let decisions = BoundedList::seeded(
            config.decision_capacity,
            Eviction::DropOldest,
            (0..config.decision_capacity).rev().map(|age| {
                let at = now - SEED_DECISION_SPACING * age as i32;
                synth_decision(rng, at, config.confidence_threshold)
            }),
        );

        Self {
            total_signals: config.initial_total_signals,
            total_trades: config.initial_total_trades,
            position: Position::Flat,
            cumulative_pnl: config.initial_pnl,
            projected_balance: config.initial_balance + config.initial_pnl,
            live: LiveMarket {
                price,
                rsi,
                vwap: config.initial_vwap,
            },
            series,
            pnl_history,
            signals,
            decisions,
            trades: BoundedList::new(config.trade_capacity, Eviction::PrependTruncate),
        }
    }
}

/// `count` evenly spaced values from `start` to `end` inclusive.
fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let last = count - 1;
            let step = (end - start) / last as f64;
            (0..last)
                .map(|idx| start + step * idx as f64)
                .chain(iter::once(end))
                .collect()
        }
    }
}
