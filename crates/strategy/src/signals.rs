use core_sim::{pick, round_to, RandomSource};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Buy,
    Sell,
    Hold,
}

impl SignalKind {
    pub const ALL: [Self; 3] = [Self::Buy, Self::Sell, Self::Hold];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalStatus {
    Executed,
    Pending,
}

impl SignalStatus {
    pub const ALL: [Self; 2] = [Self::Executed, Self::Pending];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Executed => "Executed",
            Self::Pending => "Pending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signal {
    pub at: OffsetDateTime,
    pub kind: SignalKind,
    /// 0..=100, always 0 for `Hold`.
    pub strength: u8,
    pub price: f64,
    pub status: SignalStatus,
}

/// Draws a signal quoted at `price`.
pub fn synth_signal<R>(rng: &mut R, at: OffsetDateTime, price: f64) -> Signal
where
    R: RandomSource + ?Sized,
{
    let kind = *pick(rng, &SignalKind::ALL);
    let strength = match kind {
        SignalKind::Hold => 0,
        SignalKind::Buy | SignalKind::Sell => rng.int_inclusive(0, 100) as u8,
    };
    let status = *pick(rng, &SignalStatus::ALL);

    Signal {
        at,
        kind,
        strength,
        price: round_to(price, 4),
        status,
    }
}

/// Draws a seed-time signal quoted within a cent of `reference_price`.
pub fn synth_seed_signal<R>(rng: &mut R, at: OffsetDateTime, reference_price: f64) -> Signal
where
    R: RandomSource + ?Sized,
{
    let price = reference_price + rng.uniform(-0.01, 0.01);
    synth_signal(rng, at, price)
}
