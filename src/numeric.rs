//! Shared integer utilities for share and settlement math.
//!
//! All amounts are unsigned fixed-point integers: assets carry 6 decimals,
//! vault shares carry 18, the relay amount carries 8. Every division floors;
//! the single ceiling division lives in [`mul_div_ceil`] and is used only for
//! the bridge's share burn so a redemption never under-delivers.

use alloy::primitives::U256;

/// Bridges the 6-decimal asset base into the 18-decimal share base so the
/// first deposit prices at exactly 1.0.
pub const SHARE_SCALAR: u128 = 1_000_000_000_000;

/// Basis point denominator for the donation rate.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Multiplier taking a 6-decimal asset amount to the relay's 8-decimal base.
pub const RESCALE_6_TO_8: u128 = 100;

/// `a * b / d`, truncated toward zero. `None` on division by zero or if the
/// quotient does not fit in a `u128`.
pub fn mul_div_floor(a: u128, b: u128, d: u128) -> Option<u128> {
    if d == 0 {
        return None;
    }
    let q = U256::from(a) * U256::from(b) / U256::from(d);
    if q > U256::from(u128::MAX) {
        None
    } else {
        Some(q.to::<u128>())
    }
}

/// `a * b / d`, rounded up. `None` on division by zero or overflow.
pub fn mul_div_ceil(a: u128, b: u128, d: u128) -> Option<u128> {
    if d == 0 {
        return None;
    }
    let n = U256::from(a) * U256::from(b);
    let q = (n + U256::from(d) - U256::from(1u8)) / U256::from(d);
    if q > U256::from(u128::MAX) {
        None
    } else {
        Some(q.to::<u128>())
    }
}

/// Rescale a 6-decimal asset amount to the relay's 8-decimal base.
///
/// `None` when the rescaled value does not fit in 64 unsigned bits; callers
/// must reject such amounts before touching the external venue so the
/// settlement instruction is never silently truncated.
pub fn rescale_6_to_8(amount: u128) -> Option<u64> {
    let rescaled = amount.checked_mul(RESCALE_6_TO_8)?;
    u64::try_from(rescaled).ok()
}
