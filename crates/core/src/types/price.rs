//! Integer money type for catalog prices.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use serde::{Deserialize, Serialize};

/// A price in minor currency units (cents).
///
/// Catalog prices are whole integers and the store trades in a single
/// currency, so this is a plain `i64` of cents rather than a decimal.
/// Line totals are `unit price × quantity`; sums of line totals form
/// order and cart subtotals.
///
/// ```
/// use copperleaf_core::Price;
///
/// let unit = Price::from_cents(1999);
/// assert_eq!(unit.times(3).as_cents(), 5997);
/// assert_eq!(unit.to_string(), "$19.99");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Zero price.
    pub const ZERO: Self = Self(0);

    /// Create a price from minor units (cents).
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The price in minor units (cents).
    #[must_use]
    pub const fn as_cents(&self) -> i64 {
        self.0
    }

    /// Multiply a unit price by a quantity.
    ///
    /// Saturates on overflow; a cart would need quintillions of cents to
    /// get there, but saturating beats wrapping for money.
    #[must_use]
    pub const fn times(&self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as i64))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

// SQLx support (with postgres feature): stored as BIGINT
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i64 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let cents = <i64 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(cents))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_times() {
        assert_eq!(Price::from_cents(250).times(4), Price::from_cents(1000));
        assert_eq!(Price::from_cents(100).times(0), Price::ZERO);
    }

    #[test]
    fn test_sum() {
        let subtotal: Price = [Price::from_cents(199), Price::from_cents(301)]
            .into_iter()
            .sum();
        assert_eq!(subtotal, Price::from_cents(500));
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_cents(0).to_string(), "$0.00");
        assert_eq!(Price::from_cents(5).to_string(), "$0.05");
        assert_eq!(Price::from_cents(1999).to_string(), "$19.99");
        assert_eq!(Price::from_cents(120_000).to_string(), "$1200.00");
    }

    #[test]
    fn test_times_saturates() {
        let huge = Price::from_cents(i64::MAX);
        assert_eq!(huge.times(2), Price::from_cents(i64::MAX));
    }

    #[test]
    fn test_serde_transparent() {
        let price = Price::from_cents(1234);
        assert_eq!(serde_json::to_string(&price).unwrap(), "1234");
        let parsed: Price = serde_json::from_str("1234").unwrap();
        assert_eq!(parsed, price);
    }
}
