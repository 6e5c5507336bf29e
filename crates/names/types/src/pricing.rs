//! Registration price schedule
//!
//! Prices are keyed on name length. A schedule is a list of tiers, each
//! applying from its `from_length` up to (but excluding) the next tier's.
//! The last tier is open-ended. Names shorter than the first tier cannot be
//! registered at all, and no schedule may admit names shorter than
//! [`MIN_NAME_LENGTH`].

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::TypeError;

/// Shortest name any schedule may allow.
pub const MIN_NAME_LENGTH: usize = 3;

/// Length of a name as counted by the registry (Unicode scalar values).
pub fn name_length(name: &str) -> usize {
    name.chars().count()
}

/// One price tier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTier {
    /// Shortest name length this tier applies to
    pub from_length: usize,
    /// Required payment
    pub price: Amount,
}

/// Length-keyed price table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PriceTier>", into = "Vec<PriceTier>")]
pub struct PriceSchedule {
    tiers: Vec<PriceTier>,
}

impl PriceSchedule {
    /// Build a schedule from tiers.
    ///
    /// Tiers must be non-empty, strictly ascending in `from_length`, start at
    /// [`MIN_NAME_LENGTH`] or later, and never get more expensive for longer
    /// names.
    pub fn new(tiers: Vec<PriceTier>) -> Result<Self, TypeError> {
        let first = tiers
            .first()
            .ok_or_else(|| TypeError::InvalidPriceSchedule("no tiers".to_string()))?;
        if first.from_length < MIN_NAME_LENGTH {
            return Err(TypeError::InvalidPriceSchedule(format!(
                "minimum name length must be at least {}, got {}",
                MIN_NAME_LENGTH, first.from_length
            )));
        }

        for pair in tiers.windows(2) {
            if pair[1].from_length <= pair[0].from_length {
                return Err(TypeError::InvalidPriceSchedule(format!(
                    "tier lengths must ascend: {} after {}",
                    pair[1].from_length, pair[0].from_length
                )));
            }
            if pair[1].price > pair[0].price {
                return Err(TypeError::InvalidPriceSchedule(format!(
                    "length {} costs more than length {}",
                    pair[1].from_length, pair[0].from_length
                )));
            }
        }

        Ok(Self { tiers })
    }

    /// Shortest registrable name length.
    pub fn min_length(&self) -> usize {
        self.tiers[0].from_length
    }

    pub fn tiers(&self) -> &[PriceTier] {
        &self.tiers
    }

    /// Price for a name of `length` characters, `None` below the minimum.
    pub fn price_for_length(&self, length: usize) -> Option<Amount> {
        self.tiers
            .iter()
            .rev()
            .find(|tier| tier.from_length <= length)
            .map(|tier| tier.price)
    }

    /// Price for registering `name`, `None` if the name is too short.
    pub fn price(&self, name: &str) -> Option<Amount> {
        self.price_for_length(name_length(name))
    }
}

impl Default for PriceSchedule {
    /// 3 characters: 0.05, 4 characters: 0.03, 5 or more: 0.01.
    fn default() -> Self {
        Self {
            tiers: vec![
                PriceTier {
                    from_length: 3,
                    price: Amount::from_base_units(50_000_000_000_000_000),
                },
                PriceTier {
                    from_length: 4,
                    price: Amount::from_base_units(30_000_000_000_000_000),
                },
                PriceTier {
                    from_length: 5,
                    price: Amount::from_base_units(10_000_000_000_000_000),
                },
            ],
        }
    }
}

impl TryFrom<Vec<PriceTier>> for PriceSchedule {
    type Error = TypeError;

    fn try_from(value: Vec<PriceTier>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PriceSchedule> for Vec<PriceTier> {
    fn from(value: PriceSchedule) -> Self {
        value.tiers
    }
}
