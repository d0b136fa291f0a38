use core_sim::{pick, round_to, RandomSource};

use crate::trades::TradeSide;

const SIZE_RANGE: (f64, f64) = (50.0, 150.0);

/// Single position slot: flat, or open on one side with a size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Position {
    #[default]
    Flat,
    Open { side: TradeSide, size: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionTransition {
    Opened { side: TradeSide, size: f64 },
    Closed,
}

impl Position {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    /// 0 or 1.
    pub fn open_count(&self) -> u32 {
        u32::from(self.is_open())
    }

    pub fn side_label(&self) -> &'static str {
        match self {
            Self::Flat => "NONE",
            Self::Open { side, .. } => side.as_str(),
        }
    }

    pub fn size(&self) -> f64 {
        match self {
            Self::Flat => 0.0,
            Self::Open { size, .. } => *size,
        }
    }

    /// One probabilistic step: a flat slot opens with `open_probability`, an
    /// open slot closes with `close_probability`. Takes exactly one draw to
    /// decide, so open and close never both happen.
    pub fn step<R>(
        &mut self,
        rng: &mut R,
        open_probability: f64,
        close_probability: f64,
    ) -> Option<PositionTransition>
    where
        R: RandomSource + ?Sized,
    {
        match *self {
            Self::Flat => {
                if !rng.chance(open_probability) {
                    return None;
                }
                let side = *pick(rng, &TradeSide::ALL);
                let size = round_to(rng.uniform(SIZE_RANGE.0, SIZE_RANGE.1), 1);
                *self = Self::Open { side, size };
                Some(PositionTransition::Opened { side, size })
            }
            Self::Open { .. } => {
                if !rng.chance(close_probability) {
                    return None;
                }
                *self = Self::Flat;
                Some(PositionTransition::Closed)
            }
        }
    }
}
