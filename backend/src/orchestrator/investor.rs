//! Investor channel
//!
//! Negative gearing and the ownership cap act on the evolving investor
//! share, so they are evaluated per step here rather than in the static
//! policy channels.
//!
//! # Ownership cap
//!
//! ```text
//! excess     = max(0, investor_share - cap_share)
//! requested  = excess * enforcement * (phased ? 1 / max(ramp_years, 1) : ramp)
//! divested   = min(requested, max_annual_divestment_share)
//! suppressed = 1 - enforcement * ramp * min(1, excess / investor_share)
//! ```

use crate::core::ramp_fraction;
use crate::methodology::{CoreConstants, Curves};
use crate::policy::TaxLevers;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvestorChannelOutput {
    /// Product of the negative gearing and cap-pressure multipliers
    pub investor_multiplier: f64,
    /// Share of stock divested this step (after the annual cap)
    pub divested_share: f64,
    /// Divestment before the annual cap
    pub requested_divestment: f64,
    /// Share of rental supply withdrawn by divestment
    pub rental_supply_shock: f64,
}

impl InvestorChannelOutput {
    pub fn divestment_capped(&self) -> bool {
        self.requested_divestment > self.divested_share
    }
}

/// Evaluate the investor channel for one city at `step`
///
/// `tax` must already be clamped.
pub fn evaluate_investor_channel(
    step: usize,
    investor_share: f64,
    tax: &TaxLevers,
    curves: &Curves,
    constants: &CoreConstants,
) -> InvestorChannelOutput {
    let ng = &tax.negative_gearing;
    let signed = ng.mode.direction() * ng.intensity * ramp_fraction(step, ng.ramp_years);
    let gearing_multiplier = curves.investor_shock.multiplier(signed);

    let cap = &tax.ownership_cap;
    let (cap_multiplier, requested, divested) = if cap.enabled {
        let ramp = ramp_fraction(step, cap.ramp_years);
        let excess = (investor_share - cap.cap_share).max(0.0);
        // Phased divestment spreads the excess evenly over the ramp instead
        // of scaling it by the ramp fraction.
        let pace = if cap.phased_divestment {
            1.0 / f64::from(cap.ramp_years.max(1))
        } else {
            ramp
        };
        let requested = excess * cap.enforcement * pace;
        let divested = requested.min(constants.max_annual_divestment_share.max(0.0));
        let pressure = (excess / investor_share.max(f64::EPSILON)).min(1.0);
        let suppressed = (1.0 - cap.enforcement * ramp * pressure).max(0.0);
        (suppressed, requested, divested)
    } else {
        (1.0, 0.0, 0.0)
    };

    InvestorChannelOutput {
        investor_multiplier: gearing_multiplier * cap_multiplier,
        divested_share: divested,
        requested_divestment: requested,
        rental_supply_shock: curves.rental_supply.divestment_shock(divested),
    }
}
