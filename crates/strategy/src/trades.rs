use core_sim::{pick, round_to, RandomSource};
use time::OffsetDateTime;

const TRADE_PNL_RANGE: (f64, f64) = (-100.0, 50.0);
const ENTRY_JITTER: f64 = 0.002;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Long,
    Short,
}

impl TradeSide {
    pub const ALL: [Self; 2] = [Self::Long, Self::Short];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Long => "LONG",
            Self::Short => "SHORT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeStatus {
    Closed,
    ClosedLoss,
}

impl TradeStatus {
    /// Zero counts as a loss.
    pub fn from_pnl(pnl: f64) -> Self {
        if pnl > 0.0 {
            Self::Closed
        } else {
            Self::ClosedLoss
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "CLOSED",
            Self::ClosedLoss => "CLOSED (Loss)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trade {
    pub at: OffsetDateTime,
    pub side: TradeSide,
    pub entry: f64,
    pub pnl: f64,
    pub status: TradeStatus,
}

/// Draws a closed trade entered near `price`.
pub fn synth_trade<R>(rng: &mut R, at: OffsetDateTime, price: f64) -> Trade
where
    R: RandomSource + ?Sized,
{
    let side = *pick(rng, &TradeSide::ALL);
    let pnl = round_to(rng.uniform(TRADE_PNL_RANGE.0, TRADE_PNL_RANGE.1), 2);
    let entry = round_to(price - rng.uniform(-ENTRY_JITTER, ENTRY_JITTER), 4);

    Trade {
        at,
        side,
        entry,
        pnl,
        status: TradeStatus::from_pnl(pnl),
    }
}

#[cfg(test)]
mod tests {
    use core_sim::{ScriptedSource, SeededSource};
    use time::macros::datetime;

    use super::{synth_trade, TradeSide, TradeStatus};

    #[test]
    fn status_follows_pnl_sign() {
        assert_eq!(TradeStatus::from_pnl(12.5), TradeStatus::Closed);
        assert_eq!(TradeStatus::from_pnl(0.0), TradeStatus::ClosedLoss);
        assert_eq!(TradeStatus::from_pnl(-3.0), TradeStatus::ClosedLoss);
    }

    #[test]
    fn low_draws_produce_losing_long() {
        let at = datetime!(2024-03-01 12:00 UTC);
        let trade = synth_trade(&mut ScriptedSource::constant(0.0), at, 3.5);

        assert_eq!(trade.side, TradeSide::Long);
        assert_eq!(trade.pnl, -100.0);
        assert_eq!(trade.status, TradeStatus::ClosedLoss);
        assert_eq!(trade.entry, 3.502);
    }

    #[test]
    fn drawn_trades_stay_in_range() {
        let at = datetime!(2024-03-01 12:00 UTC);
        let mut rng = SeededSource::new(5);

        for _ in 0..500 {
            let trade = synth_trade(&mut rng, at, 3.5);
            assert!((-100.0..=50.0).contains(&trade.pnl));
            assert!((trade.entry - 3.5).abs() <= 0.0021);
            assert_eq!(trade.status, TradeStatus::from_pnl(trade.pnl));
        }
    }
}
