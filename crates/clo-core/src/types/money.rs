//! Decimal-backed monetary and rate newtypes.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

macro_rules! decimal_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
        #[serde(transparent)]
        pub struct $name(pub Decimal);

        impl $name {
            /// Zero value.
            pub fn zero() -> Self {
                Self(Decimal::ZERO)
            }

            /// Inner `Decimal` value.
            pub fn inner(self) -> Decimal {
                self.0
            }

            /// Floors this value at zero.
            pub fn floor_at_zero(self) -> Self {
                if self.0 < Decimal::ZERO {
                    Self::zero()
                } else {
                    self
                }
            }

            /// Returns the maximum of `self` and zero.
            pub fn max_with_zero(self) -> Self {
                self.floor_at_zero()
            }
        }

        impl From<Decimal> for $name {
            fn from(d: Decimal) -> Self {
                Self(d)
            }
        }

        impl From<$name> for Decimal {
            fn from(v: $name) -> Self {
                v.0
            }
        }

        impl Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl Neg for $name {
            type Output = Self;
            fn neg(self) -> Self {
                Self(-self.0)
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl SubAssign for $name {
            fn sub_assign(&mut self, rhs: Self) {
                self.0 -= rhs.0;
            }
        }

        impl Mul<Decimal> for $name {
            type Output = Self;
            fn mul(self, rhs: Decimal) -> Self {
                Self(self.0 * rhs)
            }
        }

        impl Div<Decimal> for $name {
            type Output = Self;
            fn div(self, rhs: Decimal) -> Self {
                Self(self.0 / rhs)
            }
        }

        impl Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::zero(), |acc, v| acc + v)
            }
        }
    };
}

decimal_newtype!(Money);
decimal_newtype!(Rate);

impl Mul<Rate> for Money {
    type Output = Money;

    fn mul(self, rhs: Rate) -> Money {
        Money(self.0 * rhs.0)
    }
}

impl Mul<Money> for Rate {
    type Output = Money;

    fn mul(self, rhs: Money) -> Money {
        Money(self.0 * rhs.0)
    }
}

/// Coupon/accrual payment frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    /// Once a year.
    Annual,
    /// Twice a year.
    SemiAnnual,
    /// Four times a year.
    Quarterly,
    /// Twelve times a year.
    Monthly,
}

impl Frequency {
    /// Number of periods per year.
    pub fn periods_per_year(self) -> u32 {
        match self {
            Frequency::Annual => 1,
            Frequency::SemiAnnual => 2,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
        }
    }

    /// Length of one period in whole months.
    pub fn months_per_period(self) -> i32 {
        12 / self.periods_per_year() as i32
    }
}
