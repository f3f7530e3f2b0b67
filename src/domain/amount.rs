//! Exact fixed-point token amounts.
//!
//! A raw signed 256-bit magnitude paired with an implied decimal scale. All arithmetic
//! stays on the integer; floating point only ever feeds the percent multiplier.

use ethers_core::types::{I256, U256};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal as RustDecimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Scale of on-chain native token amounts (wei).
pub const NATIVE_SCALE: u32 = 18;

/// Fractional digits shown for every rendered amount. Always truncated, never rounded.
pub const DISPLAY_DIGITS: u32 = 6;

/// Decimal digits of the percent kept when deriving the integer multiplier.
pub const DEFAULT_PERCENT_PRECISION: u32 = 4;

const MAX_PERCENT_PRECISION: u32 = 18;
const MAX_POW10: u32 = 76;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("cannot display {display_digits} fractional digits of an amount with scale {scale}")]
    InvalidPrecision { display_digits: u32, scale: u32 },
    #[error("scale mismatch: {left} vs {right}")]
    ScaleMismatch { left: u32, right: u32 },
    #[error("percent must be finite, got {0}")]
    InvalidPercent(String),
    #[error("percent precision of {0} digits exceeds the supported 18")]
    PrecisionTooLarge(u32),
    #[error("arithmetic overflow")]
    Overflow,
    #[error("invalid amount: {0:?}")]
    Parse(String),
}

/// Lossless token amount: `raw / 10^scale`.
///
/// Serializes as `{"raw": "<decimal string>", "scale": <u32>}` so that JSON consumers
/// never round the magnitude through a double.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedPointAmount {
    #[serde(with = "raw_string")]
    raw: I256,
    scale: u32,
}

impl FixedPointAmount {
    pub fn new(raw: I256, scale: u32) -> Self {
        Self { raw, scale }
    }

    /// An amount of the chain's native token, in wei.
    pub fn native(raw: I256) -> Self {
        Self::new(raw, NATIVE_SCALE)
    }

    pub fn from_i128(raw: i128, scale: u32) -> Self {
        Self::new(i256_from_i128(raw), scale)
    }

    pub fn zero(scale: u32) -> Self {
        Self::new(I256::from_raw(U256::zero()), scale)
    }

    /// Parse a decimal string such as `"-1.25"` into an amount at `scale`.
    ///
    /// # Errors
    /// Fails on non-digit characters, more fractional digits than `scale`, or overflow.
    pub fn parse(text: &str, scale: u32) -> Result<Self, AmountError> {
        let invalid = || AmountError::Parse(text.to_string());
        let trimmed = text.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if frac_part.len() > scale as usize {
            return Err(invalid());
        }

        let mut digits = String::with_capacity(int_part.len() + scale as usize + 1);
        if negative {
            digits.push('-');
        }
        digits.push_str(if int_part.is_empty() { "0" } else { int_part });
        digits.push_str(frac_part);
        digits.extend(std::iter::repeat('0').take(scale as usize - frac_part.len()));

        let raw = I256::from_dec_str(&digits).map_err(|_| invalid())?;
        Ok(Self::new(raw, scale))
    }

    pub fn raw(&self) -> I256 {
        self.raw
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.raw.is_negative()
    }

    pub fn checked_add(&self, rhs: &Self) -> Result<Self, AmountError> {
        self.ensure_same_scale(rhs)?;
        let raw = self.raw.checked_add(rhs.raw).ok_or(AmountError::Overflow)?;
        Ok(Self::new(raw, self.scale))
    }

    pub fn checked_sub(&self, rhs: &Self) -> Result<Self, AmountError> {
        self.ensure_same_scale(rhs)?;
        let raw = self.raw.checked_sub(rhs.raw).ok_or(AmountError::Overflow)?;
        Ok(Self::new(raw, self.scale))
    }

    /// Convert to another scale. Dropping digits truncates toward zero.
    pub fn rescale(&self, scale: u32) -> Result<Self, AmountError> {
        let raw = if scale >= self.scale {
            self.raw
                .checked_mul(pow10(scale - self.scale)?)
                .ok_or(AmountError::Overflow)?
        } else {
            self.raw
                .checked_div(pow10(self.scale - scale)?)
                .ok_or(AmountError::Overflow)?
        };
        Ok(Self::new(raw, scale))
    }

    /// `percent` percent of this amount, at the same scale.
    pub fn percentage(&self, percent: f64, precision_digits: u32) -> Result<Self, AmountError> {
        let raw = percentage_of(self.raw, percent, precision_digits)?;
        Ok(Self::new(raw, self.scale))
    }

    /// Render with `display_digits` fractional digits (truncated).
    pub fn format(&self, display_digits: u32) -> Result<String, AmountError> {
        format_raw(self.raw, self.scale, display_digits)
    }

    fn ensure_same_scale(&self, other: &Self) -> Result<(), AmountError> {
        if self.scale != other.scale {
            return Err(AmountError::ScaleMismatch {
                left: self.scale,
                right: other.scale,
            });
        }
        Ok(())
    }
}

impl fmt::Display for FixedPointAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = format_raw(self.raw, self.scale, self.scale).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// `raw * percent / 100`, computed on integers only.
///
/// The multiplier is `percent * 10^precision_digits`, rounded half away from zero; the
/// product is then divided by `100 * 10^precision_digits`, truncating toward zero.
pub fn percentage_of(raw: I256, percent: f64, precision_digits: u32) -> Result<I256, AmountError> {
    if !percent.is_finite() {
        return Err(AmountError::InvalidPercent(percent.to_string()));
    }
    if precision_digits > MAX_PERCENT_PRECISION {
        return Err(AmountError::PrecisionTooLarge(precision_digits));
    }

    let percent_dec = RustDecimal::from_f64(percent)
        .ok_or_else(|| AmountError::InvalidPercent(percent.to_string()))?;
    let multiplier = percent_dec
        .checked_mul(RustDecimal::from(10u64.pow(precision_digits)))
        .ok_or(AmountError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i128()
        .ok_or(AmountError::Overflow)?;

    if multiplier == 0 || raw.is_zero() {
        return Ok(I256::from_raw(U256::zero()));
    }

    raw.checked_mul(i256_from_i128(multiplier))
        .ok_or(AmountError::Overflow)?
        .checked_div(pow10(precision_digits + 2)?)
        .ok_or(AmountError::Overflow)
}

/// Render `raw / 10^scale` with `display_digits` fractional digits.
///
/// The fraction is zero-padded to `scale` digits before truncation, so leading zeros
/// survive (`50000000000000` at scale 18 shows as `0.000050`). Only strictly negative
/// input carries a `-`.
pub fn format_raw(raw: I256, scale: u32, display_digits: u32) -> Result<String, AmountError> {
    if display_digits > scale {
        return Err(AmountError::InvalidPrecision {
            display_digits,
            scale,
        });
    }

    let scale = scale as usize;
    let digits = raw.unsigned_abs().to_string();
    let padded = if digits.len() <= scale {
        format!("{:0>width$}", digits, width = scale + 1)
    } else {
        digits
    };
    let (int_part, frac_part) = padded.split_at(padded.len() - scale);

    let mut out = String::with_capacity(int_part.len() + display_digits as usize + 2);
    if raw.is_negative() {
        out.push('-');
    }
    out.push_str(int_part);
    if display_digits > 0 {
        out.push('.');
        out.push_str(&frac_part[..display_digits as usize]);
    }
    Ok(out)
}

fn pow10(exp: u32) -> Result<I256, AmountError> {
    if exp > MAX_POW10 {
        return Err(AmountError::Overflow);
    }
    Ok(I256::from_raw(U256::exp10(exp as usize)))
}

fn i256_from_i128(value: i128) -> I256 {
    let magnitude = I256::from_raw(U256::from(value.unsigned_abs()));
    if value < 0 {
        -magnitude
    } else {
        magnitude
    }
}

mod raw_string {
    use ethers_core::types::I256;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(raw: &I256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&raw.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<I256, D::Error> {
        let text = String::deserialize(deserializer)?;
        I256::from_dec_str(text.trim())
            .map_err(|_| serde::de::Error::custom(format!("invalid raw amount {:?}", text)))
    }
}
