//! Contractual payment priority ordering.
//!
//! The source dispatches payments via duck-typed lookup (`getattr(entity,
//! 'pay_interest')`) over a list built from whichever tranches/fees the deal
//! happens to have. Rust has no duck typing; the waterfall here is a tagged
//! variant over the *kinds* of payable entity, each entry resolved against
//! the [`crate::clo::Clo`]-owned containers passed in at `pay` time rather
//! than owned directly by the waterfall (the entities themselves stay
//! singly-owned on `Clo`; see the no-aliasing discipline for cash accounts).

use clo_core::Money;

use crate::account::CashAccount;
use crate::error::EngineResult;
use crate::fee::{Fee, IncentiveFee};
use crate::tranche::Tranche;

/// Which side of the economics a waterfall run is distributing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentSource {
    /// Interest collections.
    Interest,
    /// Principal collections.
    Principal,
}

/// One position in a waterfall's priority ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaterfallEntry {
    /// The senior management fee (fixed expense + variable rate blended).
    SeniorManagementFee,
    /// A debt tranche, by index into the owning [`crate::clo::Clo`]'s tranche list.
    DebtTranche(usize),
    /// The junior (subordinated) management fee.
    JuniorManagementFee,
    /// The incentive (carried-interest) fee.
    IncentiveFee,
    /// The equity residual tranche, by index into the tranche list. Always last.
    Equity(usize),
}

/// An ordered list of payable entries sharing one source cash account.
///
/// Two instances exist on [`crate::clo::Clo`]: one for interest, one for
/// principal. Both are built with the same entry ordering; only the
/// `PaymentSource` tag passed to [`Waterfall::pay`] differs.
#[derive(Debug, Clone)]
pub struct Waterfall {
    entries: Vec<WaterfallEntry>,
}

impl Waterfall {
    /// Builds a waterfall from a pre-ordered entry list. Callers are
    /// responsible for ordering: senior management fee, debt tranches
    /// senior to junior, junior management fee, incentive fee, equity.
    pub fn new(entries: Vec<WaterfallEntry>) -> Self {
        Self { entries }
    }

    /// The configured entry ordering.
    pub fn entries(&self) -> &[WaterfallEntry] {
        &self.entries
    }

    /// Runs every entry in priority order against `account`, crediting fee
    /// rebates back to the equity tranche as they're generated.
    #[allow(clippy::too_many_arguments)]
    pub fn pay(
        &self,
        source: PaymentSource,
        account: &mut CashAccount,
        tranches: &mut [Tranche],
        senior_fee: &mut Fee,
        junior_fee: &mut Fee,
        incentive_fee: &mut IncentiveFee,
    ) -> EngineResult<()> {
        let mut pending_rebate = Money::zero();

        for entry in &self.entries {
            match *entry {
                WaterfallEntry::SeniorManagementFee => {
                    pending_rebate += senior_fee.pay(account)?;
                }
                WaterfallEntry::JuniorManagementFee => {
                    pending_rebate += junior_fee.pay(account)?;
                }
                WaterfallEntry::IncentiveFee => {
                    incentive_fee.pay(account)?;
                }
                WaterfallEntry::DebtTranche(idx) => match source {
                    PaymentSource::Interest => tranches[idx].pay_interest(account),
                    PaymentSource::Principal => tranches[idx].pay_principal(account),
                },
                WaterfallEntry::Equity(idx) => {
                    if !pending_rebate.inner().is_zero() {
                        tranches[idx].record_fee_rebate(pending_rebate);
                        pending_rebate = Money::zero();
                    }
                    match source {
                        PaymentSource::Interest => tranches[idx].pay_interest(account),
                        PaymentSource::Principal => tranches[idx].pay_principal(account),
                    }
                }
            }
        }

        Ok(())
    }
}
