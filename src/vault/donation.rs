//! Donation policy: taxes realized profit, never principal.
//!
//! The taxable slice of a redemption is computed from cumulative lifetime
//! figures, not per-transaction ones: only the portion of this redemption
//! that pushes cumulative realized value above cumulative deposits is
//! donated. A user who is still under water pays nothing, and a redemption
//! straddling the break-even line is taxed only on the part above it.

use crate::domain::UserAccount;
use crate::numeric::{mul_div_floor, BPS_DENOMINATOR};

/// How a gross redemption splits between the receiver and the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DonationTerms {
    pub gross: u128,
    pub donation: u128,
    pub net: u128,
}

/// Split `gross` per the profit-only policy at `donation_bps`.
///
/// The rate is clamped to 10_000 here even if a misconfiguration elsewhere
/// let a larger value through, so `net` can never go negative; the donation
/// itself is additionally capped at `gross`.
pub fn donation_for(account: &UserAccount, gross: u128, donation_bps: u16) -> DonationTerms {
    let bps = u128::from(donation_bps.min(10_000));

    let realized = account.realized();
    let above_after = realized
        .saturating_add(gross)
        .saturating_sub(account.deposited);
    let above_before = realized.saturating_sub(account.deposited);
    let profit_slice = above_after - above_before;

    // profit_slice <= gross and bps <= 10_000, so this cannot overflow or
    // exceed gross, but the clamp keeps the conservation property explicit.
    let donation = mul_div_floor(profit_slice, bps, BPS_DENOMINATOR)
        .unwrap_or(0)
        .min(gross);

    DonationTerms {
        gross,
        donation,
        net: gross - donation,
    }
}
