pub mod decisions;
pub mod position;
pub mod signals;
pub mod trades;

pub use decisions::{decision_reason, synth_decision, Decision};
pub use position::{Position, PositionTransition};
pub use signals::{synth_seed_signal, synth_signal, Signal, SignalKind, SignalStatus};
pub use trades::{synth_trade, Trade, TradeSide, TradeStatus};

#[cfg(test)]
mod tests {
    use core_sim::ScriptedSource;
    use time::macros::datetime;

    use crate::{synth_decision, synth_signal, synth_trade, SignalKind, TradeSide};

    #[test]
    fn entities_share_one_random_stream() {
        let at = datetime!(2024-03-01 12:00 UTC);
        let mut rng = ScriptedSource::constant(0.0);

        let signal = synth_signal(&mut rng, at, 3.5);
        let decision = synth_decision(&mut rng, at, 0.7);
        let trade = synth_trade(&mut rng, at, 3.5);

        assert_eq!(signal.kind, SignalKind::Buy);
        assert_eq!(decision.final_action, SignalKind::Buy);
        assert_eq!(decision.reason, "Insufficient confidence.");
        assert_eq!(trade.side, TradeSide::Long);
    }
}
