use core_sim::{generate_series, round_to, RandomSource, SimConfig};
use strategy::{synth_decision, synth_signal, synth_trade};
use time::{Duration, OffsetDateTime};

use crate::{
    events::PollReport,
    store::{PnlPoint, StateStore},
};

const PRICE_DRIFT: (f64, f64) = (-0.001, -0.0005);
const VWAP_DRIFT: f64 = 0.0005;
const PNL_DECAY: (f64, f64) = (5.0, 15.0);

/// Advances the simulated state by one poll.
///
/// Steps run in a fixed order because later steps read what earlier ones
/// wrote (the trade entry and the new signal are quoted at the drifted price).
pub fn poll_cycle<R>(
    store: &mut StateStore,
    config: &SimConfig,
    rng: &mut R,
    now: OffsetDateTime,
    cycle: u64,
) -> PollReport
where
    R: RandomSource + ?Sized,
{
    let signals_added = rng.int_inclusive(1, 3) as u64;
    store.total_signals = store.total_signals.saturating_add(signals_added);

    let drift = rng.uniform(PRICE_DRIFT.0, PRICE_DRIFT.1);
    let price = round_to(store.live.price + drift, 4);
    let interval = Duration::minutes(config.bar_interval_minutes);
    let (series, rsi) = generate_series(price, config.series_length, interval, now, rng);
    store.live.price = price;
    store.live.rsi = rsi;
    store.series = series;

    store.live.vwap = round_to(store.live.vwap + rng.uniform(-VWAP_DRIFT, VWAP_DRIFT), 4);

    let pnl_before = store.cumulative_pnl;
    store.cumulative_pnl = pnl_before - rng.uniform(PNL_DECAY.0, PNL_DECAY.1);
    store.pnl_history.push(PnlPoint {
        at: now,
        pnl: store.cumulative_pnl,
    });

    store.projected_balance = config.initial_balance + store.cumulative_pnl;

    let new_trade = if rng.chance(config.trade_probability) {
        let trade = synth_trade(rng, now, price);
        store.total_trades = store.total_trades.saturating_add(1);
        store.trades.push(trade);
        Some(trade)
    } else {
        None
    };

    let position_transition = store
        .position
        .step(rng, config.open_probability, config.close_probability);

    store.signals.push(synth_signal(rng, now, price));

    store
        .decisions
        .push(synth_decision(rng, now, config.confidence_threshold));

    PollReport {
        cycle,
        signals_added,
        price,
        pnl_before,
        pnl_after: store.cumulative_pnl,
        new_trade,
        position_transition,
    }
}

#[cfg(test)]
mod tests {
    use core_sim::{ScriptedSource, SeededSource, SimConfig};
    use strategy::{Position, PositionTransition, TradeSide};
    use time::{macros::datetime, Duration, OffsetDateTime};

    use super::poll_cycle;
    use crate::store::StateStore;

    fn start() -> OffsetDateTime {
        datetime!(2024-03-01 12:00 UTC)
    }

    fn seeded_store(config: &SimConfig) -> StateStore {
        StateStore::seeded(config, &mut SeededSource::new(1), start())
    }

    #[test]
    fn pnl_never_increases_and_history_stays_full() {
        let config = SimConfig::default();
        let mut store = seeded_store(&config);
        let mut rng = SeededSource::new(77);

        for cycle in 1..=200 {
            let before = store.cumulative_pnl;
            let report = poll_cycle(&mut store, &config, &mut rng, start(), cycle);

            assert!(store.cumulative_pnl < before);
            assert!(report.pnl_delta() < -4.99 && report.pnl_delta() > -15.01);
            assert_eq!(store.pnl_history.len(), 20);
        }
    }

    #[test]
    fn twenty_five_polls_roll_the_pnl_window() {
        let config = SimConfig::default();
        let mut store = seeded_store(&config);
        let seeds: Vec<f64> = store.pnl_history.iter().map(|point| point.pnl).collect();
        let mut rng = SeededSource::new(3);
        let mut last_now = start();

        for cycle in 1..=25 {
            last_now = start() + Duration::seconds(10 * cycle as i64);
            poll_cycle(&mut store, &config, &mut rng, last_now, cycle);
        }

        let newest = store.pnl_history.last().unwrap();
        assert_eq!(store.pnl_history.len(), 20);
        assert_eq!(newest.pnl, store.cumulative_pnl);
        assert_eq!(newest.at, last_now);
        // 25 pushes into a 20-slot window: every seed point is gone.
        assert!(store
            .pnl_history
            .iter()
            .all(|point| !seeds.contains(&point.pnl)));
        assert_eq!(
            store.pnl_history.first().unwrap().at,
            start() + Duration::seconds(60)
        );
    }

    #[test]
    fn bounded_lists_respect_capacity_over_many_polls() {
        let config = SimConfig {
            trade_probability: 1.0,
            ..SimConfig::default()
        };
        let mut store = seeded_store(&config);
        let mut rng = SeededSource::new(12);

        for cycle in 1..=40 {
            poll_cycle(&mut store, &config, &mut rng, start(), cycle);
            assert!(store.signals.len() <= 10);
            assert!(store.decisions.len() <= 5);
            assert!(store.trades.len() <= 10);
            assert!(store.pnl_history.len() <= 20);
        }

        assert_eq!(store.trades.len(), 10);
        assert_eq!(store.total_trades, 85 + 40);
    }

    #[test]
    fn new_trades_are_prepended() {
        let config = SimConfig {
            trade_probability: 1.0,
            ..SimConfig::default()
        };
        let mut store = seeded_store(&config);
        let mut rng = SeededSource::new(21);

        let first = poll_cycle(&mut store, &config, &mut rng, start(), 1)
            .new_trade
            .unwrap();
        let second = poll_cycle(&mut store, &config, &mut rng, start(), 2)
            .new_trade
            .unwrap();

        let trades: Vec<_> = store.trades.iter().copied().collect();
        assert_eq!(trades, vec![second, first]);
    }

    #[test]
    fn newest_signal_and_decision_are_appended() {
        let config = SimConfig::default();
        let mut store = seeded_store(&config);
        let oldest_signal = *store.signals.first().unwrap();
        let later = start() + Duration::minutes(1);

        let report = poll_cycle(&mut store, &config, &mut SeededSource::new(6), later, 1);

        let newest = store.signals.newest().unwrap();
        assert_eq!(newest.at, later);
        assert_eq!(newest.price, report.price);
        assert_ne!(store.signals.first().unwrap(), &oldest_signal);
        assert_eq!(store.decisions.newest().unwrap().at, later);
    }

    #[test]
    fn price_drifts_down_and_series_follows() {
        let config = SimConfig::default();
        let mut store = seeded_store(&config);
        let before = store.live.price;

        let report = poll_cycle(&mut store, &config, &mut SeededSource::new(10), start(), 1);

        assert!(report.price < before);
        assert!(before - report.price <= 0.0011);
        assert_eq!(store.live.price, report.price);
        assert_eq!(store.series.len(), config.series_length);
        assert_eq!(store.live.rsi, store.series.bars().last().unwrap().rsi);
    }

    #[test]
    fn signal_counter_grows_by_one_to_three() {
        let config = SimConfig::default();
        let mut store = seeded_store(&config);
        let mut rng = SeededSource::new(14);

        for cycle in 1..=50 {
            let before = store.total_signals;
            let report = poll_cycle(&mut store, &config, &mut rng, start(), cycle);
            assert!((1..=3).contains(&report.signals_added));
            assert_eq!(store.total_signals, before + report.signals_added);
        }
    }

    #[test]
    fn forced_draws_open_then_close_the_position() {
        let config = SimConfig::default();
        let mut store = seeded_store(&config);
        let mut rng = ScriptedSource::constant(0.01);

        let opened = poll_cycle(&mut store, &config, &mut rng, start(), 1);
        match opened.position_transition {
            Some(PositionTransition::Opened { side, size }) => {
                assert!(matches!(side, TradeSide::Long | TradeSide::Short));
                assert!(size > 50.0 && size < 150.0);
            }
            other => panic!("expected open transition, got {other:?}"),
        }
        assert_eq!(store.position.open_count(), 1);

        let closed = poll_cycle(&mut store, &config, &mut rng, start(), 2);
        assert_eq!(closed.position_transition, Some(PositionTransition::Closed));
        assert_eq!(store.position, Position::Flat);
        assert_eq!(store.position.side_label(), "NONE");
        assert_eq!(store.position.size(), 0.0);
    }

    #[test]
    fn high_draws_skip_every_optional_step() {
        let config = SimConfig::default();
        let mut store = seeded_store(&config);
        let trades_before = store.total_trades;
        let mut rng = ScriptedSource::constant(0.99);

        let report = poll_cycle(&mut store, &config, &mut rng, start(), 1);

        assert_eq!(report.new_trade, None);
        assert_eq!(report.position_transition, None);
        assert_eq!(store.total_trades, trades_before);
        assert!(store.trades.is_empty());
    }

    #[test]
    fn projected_balance_tracks_pnl() {
        let config = SimConfig::default();
        let mut store = seeded_store(&config);

        poll_cycle(&mut store, &config, &mut SeededSource::new(2), start(), 1);

        assert_eq!(
            store.projected_balance,
            config.initial_balance + store.cumulative_pnl
        );
    }
}
