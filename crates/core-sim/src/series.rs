use time::{Duration, OffsetDateTime};

use crate::{rng::RandomSource, round_to};

const NEUTRAL_RSI: f64 = 50.0;

/// One candle plus its indicator overlays.
///
/// Indicator fields are noise around the close, not computed indicators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub at: OffsetDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub rsi: f64,
    pub macd_line: f64,
    pub signal_line: f64,
    pub macd_hist: f64,
    pub ema9: f64,
    pub ema21: f64,
    pub sma50: f64,
    pub bb_upper: f64,
    pub bb_lower: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    bars: Vec<Bar>,
}

impl Series {
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|bar| bar.close)
    }
}

/// Random-walks `length` bars ending at `now`, spaced `interval` apart,
/// starting near `seed_price`. Returns the series and the last bar's RSI.
pub fn generate_series<R>(
    seed_price: f64,
    length: usize,
    interval: Duration,
    now: OffsetDateTime,
    rng: &mut R,
) -> (Series, f64)
where
    R: RandomSource + ?Sized,
{
    let mut bars = Vec::with_capacity(length);
    let mut price = seed_price + rng.uniform(-0.02, 0.02);

    for i in 0..length {
        let steps_back = (length - 1 - i) as i32;
        let at = now - interval * steps_back;

        let open = price;
        let close = open + rng.uniform(-0.005, 0.005);
        let high = open.max(close) + rng.uniform(0.0, 0.002);
        let low = open.min(close) - rng.uniform(0.0, 0.002);
        let volume = rng.uniform(100_000.0, 3_000_000.0);

        let phase = i as f64 / 15.0 + rng.uniform(-0.1, 0.1);
        let rsi = round_to(NEUTRAL_RSI + 20.0 * phase.sin(), 1);

        let macd_line = rng.uniform(-0.001, 0.001);
        let signal_line = rng.uniform(-0.0008, 0.0008);

        let ema9 = round_to(close + rng.uniform(-0.001, 0.001), 4);
        let ema21 = round_to(close + rng.uniform(-0.0015, 0.0015), 4);
        let sma50 = round_to(close + rng.uniform(-0.002, 0.002), 4);
        let bb_upper = round_to(close + 0.01 + rng.uniform(-0.001, 0.001), 4);
        let bb_lower = round_to(close - 0.01 - rng.uniform(-0.001, 0.001), 4);

        bars.push(Bar {
            at,
            open: round_to(open, 4),
            high: round_to(high, 4),
            low: round_to(low, 4),
            close: round_to(close, 4),
            volume,
            rsi,
            macd_line,
            signal_line,
            macd_hist: macd_line - signal_line,
            ema9,
            ema21,
            sma50,
            bb_upper,
            bb_lower,
        });

        price = close;
    }

    let last_rsi = bars.last().map_or(NEUTRAL_RSI, |bar| bar.rsi);
    (Series { bars }, last_rsi)
}

#[cfg(test)]
mod tests {
    use time::{macros::datetime, Duration, OffsetDateTime};

    use super::{generate_series, Series};
    use crate::rng::{RandomSource, ScriptedSource, SeededSource};

    const NOW: OffsetDateTime = datetime!(2024-03-01 12:00 UTC);

    fn walk<R: RandomSource>(length: usize, rng: &mut R) -> (Series, f64) {
        generate_series(3.55, length, Duration::minutes(30), NOW, rng)
    }

    #[test]
    fn bars_are_chronological_and_end_at_now() {
        let (series, _) = walk(50, &mut SeededSource::new(1));

        assert_eq!(series.len(), 50);
        assert_eq!(series.bars()[49].at, NOW);
        assert_eq!(series.bars()[0].at, NOW - Duration::minutes(30 * 49));
        assert!(series
            .bars()
            .windows(2)
            .all(|pair| pair[1].at - pair[0].at == Duration::minutes(30)));
    }

    #[test]
    fn high_and_low_bracket_open_and_close() {
        let (series, _) = walk(200, &mut SeededSource::new(11));

        for bar in series.bars() {
            assert!(bar.high >= bar.open.max(bar.close));
            assert!(bar.low <= bar.open.min(bar.close));
            assert!((100_000.0..3_000_000.0).contains(&bar.volume));
        }
    }

    #[test]
    fn returned_rsi_is_last_bar_rsi() {
        let (series, rsi) = walk(30, &mut SeededSource::new(5));

        assert_eq!(series.bars().last().map(|bar| bar.rsi), Some(rsi));
        assert!((10.0..=90.0).contains(&rsi));
    }

    #[test]
    fn midpoint_draws_produce_flat_walk() {
        let (series, _) = walk(4, &mut ScriptedSource::constant(0.5));

        for bar in series.bars() {
            assert_eq!(bar.open, 3.55);
            assert_eq!(bar.close, 3.55);
            assert_eq!(bar.macd_hist, 0.0);
        }
        assert_eq!(series.bars()[0].rsi, 50.0);
    }

    #[test]
    fn zero_length_series_is_empty_with_neutral_rsi() {
        let (series, rsi) = walk(0, &mut SeededSource::new(2));

        assert!(series.is_empty());
        assert_eq!(series.last_close(), None);
        assert_eq!(rsi, 50.0);
    }
}
