use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Number of decimal places between a native unit and a base unit.
pub const NATIVE_DECIMALS: u32 = 18;

const BASE_UNITS_PER_NATIVE: u128 = 10u128.pow(NATIVE_DECIMALS);

/// Native value held in base units (1 native unit = 10^18 base units).
///
/// Parsing and formatting go through decimal strings so that prices like
/// `0.05` and `0.049` compare exactly. Serialized as a decimal string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_base_units(units: u128) -> Self {
        Self(units)
    }

    pub const fn base_units(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parse a decimal amount in native units, e.g. `"0.05"` or `"1234"`.
    pub fn parse(input: &str) -> Result<Self, TypeError> {
        let invalid = |reason: &str| TypeError::InvalidAmount {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty"));
        }

        let (whole, fraction) = match trimmed.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (trimmed, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("no digits"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("only decimal digits and one '.' are allowed"));
        }
        if fraction.len() > NATIVE_DECIMALS as usize {
            return Err(invalid("more than 18 fractional digits"));
        }

        let whole_units: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| TypeError::AmountOverflow)?
        };

        let mut fraction_units: u128 = 0;
        for digit in fraction.bytes() {
            fraction_units = fraction_units * 10 + u128::from(digit - b'0');
        }
        fraction_units *= 10u128.pow(NATIVE_DECIMALS - fraction.len() as u32);

        whole_units
            .checked_mul(BASE_UNITS_PER_NATIVE)
            .and_then(|units| units.checked_add(fraction_units))
            .map(Self)
            .ok_or(TypeError::AmountOverflow)
    }

    pub fn checked_add(self, other: Amount) -> Result<Amount, TypeError> {
        self.0
            .checked_add(other.0)
            .map(Amount)
            .ok_or(TypeError::AmountOverflow)
    }

    pub fn checked_sub(self, other: Amount) -> Result<Amount, TypeError> {
        self.0
            .checked_sub(other.0)
            .map(Amount)
            .ok_or(TypeError::AmountOverflow)
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let whole = self.0 / BASE_UNITS_PER_NATIVE;
        let fraction = self.0 % BASE_UNITS_PER_NATIVE;
        if fraction == 0 {
            return write!(f, "{}", whole);
        }
        let digits = format!("{:0width$}", fraction, width = NATIVE_DECIMALS as usize);
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}

impl std::str::FromStr for Amount {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Amount {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Amount> for String {
    fn from(value: Amount) -> Self {
        value.to_string()
    }
}
