use core_sim::round_to;
use serde::Serialize;
use thiserror::Error;
use time::{format_description::BorrowedFormatItem, macros::format_description};

use crate::{format::format_thousands, store::StateStore};

const FEED_TIME: &[BorrowedFormatItem<'_>] =
    format_description!("[month repr:short] [day], [hour repr:12]:[minute] [period]");
const CLOCK_TIME: &[BorrowedFormatItem<'_>] =
    format_description!("[hour repr:12]:[minute]:[second] [period]");
const BAR_TIME: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

const SCENARIO_LABEL: &str = "90-Day RL Model Projection";
const WORST_CASE_VALUE: f64 = -71_851.34;
const BEST_CASE_VALUE: f64 = -47_900.89;
const CURRENT_SIGNAL: &str = "HOLD (0)";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

/// Full dashboard payload. Field names follow what the dashboard script reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub metrics: Metrics,
    pub performance: Performance,
    pub trade_breakdown: TradeBreakdown,
    pub projected_balance: ProjectedBalance,
    pub risk_assessment: RiskAssessment,
    pub cumulative_pnl_data: CumulativePnl,
    pub candlestick_data: Candlesticks,
    pub live_data: LiveData,
    pub recent_signals: Vec<SignalRow>,
    pub recent_decisions: Vec<DecisionRow>,
    pub recent_trades: Vec<TradeRow>,
    pub projection_data: ProjectionData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub total_signals: u64,
    pub total_trades: u64,
    pub open_positions_count: u32,
    pub last_signal_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Performance {
    pub win_rate: &'static str,
    pub total_pnl: String,
    pub avg_win: &'static str,
    pub avg_loss: &'static str,
    pub max_loss: &'static str,
    pub risk_reward: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeBreakdown {
    pub total_trades: u64,
    pub winning: u64,
    pub losing: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedBalance {
    pub current: String,
    pub conservative: &'static str,
    pub realistic: &'static str,
    pub rl_enhanced: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub best_case: &'static str,
    pub worst_case: &'static str,
    pub expected_range: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativePnl {
    pub dates: Vec<String>,
    pub pnl: Vec<f64>,
}

/// Column-major bar data, one vector per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Candlesticks {
    pub dates: Vec<String>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
    pub rsi: Vec<f64>,
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub macd_hist: Vec<f64>,
    pub ema9: Vec<f64>,
    pub ema21: Vec<f64>,
    pub sma50: Vec<f64>,
    pub bb_upper: Vec<f64>,
    pub bb_lower: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveData {
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "RSI")]
    pub rsi: f64,
    #[serde(rename = "VWAP")]
    pub vwap: f64,
    #[serde(rename = "CurrentSignal")]
    pub current_signal: &'static str,
    #[serde(rename = "Side")]
    pub side: &'static str,
    #[serde(rename = "Size")]
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct SignalRow {
    pub time: String,
    pub signal: &'static str,
    pub strength: u8,
    pub price: f64,
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct DecisionRow {
    pub time: String,
    pub original: &'static str,
    pub rl_action: String,
    #[serde(rename = "FINAL")]
    pub final_action: &'static str,
    pub confidence: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct TradeRow {
    pub time: String,
    pub side: &'static str,
    pub entry: f64,
    pub pnl: f64,
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionData {
    pub scenario_label: &'static str,
    pub worst_case_value: f64,
    pub best_case_value: f64,
    pub current_balance: f64,
}

impl Snapshot {
    /// Formats the store for the wire. This is the only place numbers and
    /// timestamps become display strings.
    pub fn build(store: &StateStore) -> Result<Self, SnapshotError> {
        let last_signal_time = match store.signals.newest() {
            Some(signal) => signal.at.format(FEED_TIME)?,
            None => String::new(),
        };

        Ok(Self {
            metrics: Metrics {
                total_signals: store.total_signals,
                total_trades: store.total_trades,
                open_positions_count: store.position.open_count(),
                last_signal_time,
            },
            performance: Performance {
                win_rate: "0.00%",
                total_pnl: format_thousands(store.cumulative_pnl.abs(), 2),
                avg_win: "$0.00",
                avg_loss: "-$1064.46",
                max_loss: "-$1308.33",
                risk_reward: "1:0.00",
            },
            trade_breakdown: TradeBreakdown {
                total_trades: store.total_trades,
                winning: 0,
                losing: store.total_trades,
            },
            projected_balance: ProjectedBalance {
                current: format_thousands(store.projected_balance, 2),
                conservative: "$0",
                realistic: "$0",
                rl_enhanced: "$0",
            },
            risk_assessment: RiskAssessment {
                best_case: "-$47900.89",
                worst_case: "-$71851.34",
                expected_range: "$-71851 - $-47901",
            },
            cumulative_pnl_data: CumulativePnl {
                dates: store
                    .pnl_history
                    .iter()
                    .map(|point| point.at.format(FEED_TIME))
                    .collect::<Result<_, _>>()?,
                pnl: store
                    .pnl_history
                    .iter()
                    .map(|point| round_to(point.pnl, 2))
                    .collect(),
            },
            candlestick_data: candlesticks(store)?,
            live_data: LiveData {
                price: store.live.price,
                rsi: store.live.rsi,
                vwap: store.live.vwap,
                current_signal: CURRENT_SIGNAL,
                side: store.position.side_label(),
                size: store.position.size(),
            },
            recent_signals: store
                .signals
                .iter()
                .map(|signal| {
                    Ok(SignalRow {
                        time: signal.at.format(FEED_TIME)?,
                        signal: signal.kind.as_str(),
                        strength: signal.strength,
                        price: signal.price,
                        status: signal.status.as_str(),
                    })
                })
                .collect::<Result<_, SnapshotError>>()?,
            recent_decisions: store
                .decisions
                .iter()
                .map(|decision| {
                    Ok(DecisionRow {
                        time: decision.at.format(CLOCK_TIME)?,
                        original: decision.original.as_str(),
                        rl_action: decision.recommendation(),
                        final_action: decision.final_action.as_str(),
                        confidence: decision.confidence,
                        reason: decision.reason.clone(),
                    })
                })
                .collect::<Result<_, SnapshotError>>()?,
            recent_trades: store
                .trades
                .iter()
                .map(|trade| {
                    Ok(TradeRow {
                        time: trade.at.format(CLOCK_TIME)?,
                        side: trade.side.as_str(),
                        entry: trade.entry,
                        pnl: trade.pnl,
                        status: trade.status.as_str(),
                    })
                })
                .collect::<Result<_, SnapshotError>>()?,
            projection_data: ProjectionData {
                scenario_label: SCENARIO_LABEL,
                worst_case_value: WORST_CASE_VALUE,
                best_case_value: BEST_CASE_VALUE,
                current_balance: round_to(store.projected_balance, 2),
            },
        })
    }
}

fn candlesticks(store: &StateStore) -> Result<Candlesticks, SnapshotError> {
    let bars = store.series.bars();
    let mut columns = Candlesticks {
        dates: Vec::with_capacity(bars.len()),
        ..Candlesticks::default()
    };

    for bar in bars {
        columns.dates.push(bar.at.format(BAR_TIME)?);
        columns.open.push(bar.open);
        columns.high.push(bar.high);
        columns.low.push(bar.low);
        columns.close.push(bar.close);
        columns.volume.push(bar.volume);
        columns.rsi.push(bar.rsi);
        columns.macd_line.push(bar.macd_line);
        columns.signal_line.push(bar.signal_line);
        columns.macd_hist.push(bar.macd_hist);
        columns.ema9.push(bar.ema9);
        columns.ema21.push(bar.ema21);
        columns.sma50.push(bar.sma50);
        columns.bb_upper.push(bar.bb_upper);
        columns.bb_lower.push(bar.bb_lower);
    }

    Ok(columns)
}
