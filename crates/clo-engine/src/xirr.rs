//! Internal rate of return for an irregular cashflow stream.
//!
//! [`crate::tranche::Tranche::irr`] needs to solve for the discount rate
//! that zeroes the net present value of a purchase outlay followed by the
//! tranche's historical interest + principal payments, with irregular
//! (monthly, not annual) spacing between cashflow dates. This mirrors the
//! Newton-Raphson-with-fallback shape of this codebase's yield solver, but
//! is self-contained (no external root-finding crate): the solver here only
//! ever needs a handful of iterations over a small cashflow vector.

use clo_core::Date;

use crate::error::{EngineError, EngineResult};

const MAX_NEWTON_ITERATIONS: u32 = 100;
const MAX_BISECTION_ITERATIONS: u32 = 200;
const TOLERANCE: f64 = 1e-9;

/// Solves for the annualised rate `r` such that
/// `Σ cashflow_i / (1 + r)^(days_i / 365)` is zero.
///
/// `cashflows` must be non-empty and ordered by date; the first entry is
/// typically a negative purchase outlay.
pub fn xirr(cashflows: &[(Date, f64)]) -> EngineResult<f64> {
    if cashflows.is_empty() {
        return Err(EngineError::invalid_input("xirr requires at least one cashflow"));
    }

    let t0 = cashflows[0].0;
    let years: Vec<f64> = cashflows
        .iter()
        .map(|(d, _)| t0.days_between(*d) as f64 / 365.0)
        .collect();
    let amounts: Vec<f64> = cashflows.iter().map(|(_, a)| *a).collect();

    let npv = |rate: f64| -> f64 {
        years
            .iter()
            .zip(&amounts)
            .map(|(t, a)| a / (1.0 + rate).powf(*t))
            .sum()
    };
    let dnpv = |rate: f64| -> f64 {
        years
            .iter()
            .zip(&amounts)
            .map(|(t, a)| -t * a / (1.0 + rate).powf(t + 1.0))
            .sum()
    };

    let mut rate = 0.1;
    for _ in 0..MAX_NEWTON_ITERATIONS {
        let f = npv(rate);
        if f.abs() < TOLERANCE {
            return Ok(rate);
        }
        let f_prime = dnpv(rate);
        if f_prime.abs() < f64::EPSILON {
            break;
        }
        let next = rate - f / f_prime;
        if !next.is_finite() || next <= -1.0 {
            break;
        }
        rate = next;
    }

    // Newton's method failed to converge (likely a bad initial guess for a
    // sign-changing npv); fall back to bisection over a wide bracket.
    bisection(&npv)
}

fn bisection(npv: &dyn Fn(f64) -> f64) -> EngineResult<f64> {
    let mut lo = -0.999;
    let mut hi = 10.0;
    let mut f_lo = npv(lo);

    if f_lo.signum() == npv(hi).signum() {
        return Err(EngineError::invalid_input(
            "xirr cashflow stream has no sign change; cannot bracket a root",
        ));
    }

    for _ in 0..MAX_BISECTION_ITERATIONS {
        let mid = (lo + hi) / 2.0;
        let f_mid = npv(mid);
        if f_mid.abs() < TOLERANCE || (hi - lo) < TOLERANCE {
            return Ok(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Ok((lo + hi) / 2.0)
}
