//! Amount type for exact monetary values.
//!
//! JSON numbers in the sales feed are parsed into `Decimal` so that summing totals and payments
//! never accumulates floating point error.

use rust_decimal::Decimal;
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents a monetary amount such as a sale `total` or a payment `amount`.
///
/// Two amounts are equal when their numeric values are equal, regardless of scale, so `100` and
/// `100.00` compare equal. `Display` writes the normalized value without trailing zeros.
///
/// ```
/// # use sales_report::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("60.50").unwrap();
/// let b = Amount::from_str("39.5").unwrap();
/// assert_eq!(a.checked_add(b).unwrap().to_string(), "100");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    pub const ZERO: Amount = Amount::new(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Converts a JSON number. Integers and plain decimals are exact; numbers that `serde_json`
    /// prints in scientific notation go through `Decimal::from_scientific`. Fails when the number
    /// does not fit a `Decimal`.
    pub fn from_json(number: &serde_json::Number) -> Result<Self, AmountError> {
        Amount::from_str(&number.to_string())
    }

    /// Returns `None` when the sum does not fit a `Decimal`.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.value.checked_add(rhs.value).map(Amount::new)
    }
}

/// An error that can occur when parsing strings into `Decimal` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = if trimmed.contains(['e', 'E']) {
            Decimal::from_scientific(trimmed)
        } else {
            Decimal::from_str(trimmed)
        }
        .map_err(AmountError)?;

        Ok(Amount::new(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.value.normalize(), f)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount::new(Decimal::from(value))
    }
}
