//! Cash account: balance with bounded debit and unchecked credit.

use clo_core::Money;

use crate::error::{EngineError, EngineResult};

/// A cash account. Shared mutable state is limited to two instances of this
/// type (interest and principal) owned exclusively by the [`crate::clo::Clo`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CashAccount {
    balance: Money,
}

impl CashAccount {
    /// Opens an account with the given starting balance.
    pub fn new(balance: Money) -> Self {
        Self { balance }
    }

    /// Current balance.
    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Debits up to `amount` from the account. Never overdraws: if `amount`
    /// is negative, or the balance is already negative, nothing is debited.
    /// Returns the amount actually debited.
    pub fn debit(&mut self, amount: Money) -> Money {
        if amount.inner().is_sign_negative() || self.balance.inner().is_sign_negative() {
            return Money::zero();
        }

        let debited = if amount.inner() > self.balance.inner() {
            let all = self.balance;
            self.balance = Money::zero();
            all
        } else {
            self.balance -= amount;
            amount
        };

        debited
    }

    /// Credits `amount` to the account. Fails if `amount` is negative.
    pub fn credit(&mut self, amount: Money) -> EngineResult<Money> {
        if amount.inner().is_sign_negative() {
            return Err(EngineError::invalid_input("cannot credit a negative amount to a cash account"));
        }
        self.balance += amount;
        Ok(self.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn debit_is_bounded_by_balance() {
        let mut account = CashAccount::new(Money::from(dec!(100)));
        let debited = account.debit(Money::from(dec!(150)));
        assert_eq!(debited.inner(), dec!(100));
        assert_eq!(account.balance().inner(), dec!(0));
    }

    #[test]
    fn debit_of_negative_amount_is_a_no_op() {
        let mut account = CashAccount::new(Money::from(dec!(100)));
        assert_eq!(account.debit(Money::from(dec!(-5))).inner(), dec!(0));
        assert_eq!(account.balance().inner(), dec!(100));
    }

    #[test]
    fn credit_rejects_negative_amounts() {
        let mut account = CashAccount::new(Money::zero());
        assert!(account.credit(Money::from(dec!(-1))).is_err());
    }

    #[test]
    fn credit_increments_balance() {
        let mut account = CashAccount::new(Money::from(dec!(10)));
        let new_balance = account.credit(Money::from(dec!(5))).unwrap();
        assert_eq!(new_balance.inner(), dec!(15));
    }
}
