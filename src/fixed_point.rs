// ALICE-Option-Core — Integer-only scaled currency arithmetic
// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Moroya Sakamoto

//! Prices are integers in hundredths of a currency unit, quantities are
//! integers in hundredths of a contract unit. Every division truncates
//! toward zero; there is no rounding anywhere.

/// Scale of one currency (or quantity) unit: values are hundredths.
pub const CENTS: u64 = 100;

/// Denominator for rates expressed in basis points.
pub const BPS: u64 = 10_000;

/// `a * b / d` with a 128-bit intermediate, truncating.
///
/// Returns `None` when `d == 0` or the quotient does not fit in `u64`.
#[inline]
pub fn mul_div(a: u64, b: u64, d: u64) -> Option<u64> {
    if d == 0 {
        return None;
    }
    let q = (a as u128) * (b as u128) / (d as u128);
    u64::try_from(q).ok()
}

/// Like [`mul_div`], but saturates to `u64::MAX` on overflow and yields 0 for
/// a zero divisor. Used on paths that must be total.
#[inline]
pub fn mul_div_saturating(a: u64, b: u64, d: u64) -> u64 {
    if d == 0 {
        return 0;
    }
    mul_div(a, b, d).unwrap_or(u64::MAX)
}

/// `max(0, hi - lo) * quantity / CENTS`.
#[inline]
pub fn scaled_gain(hi: u64, lo: u64, quantity: u64) -> u64 {
    mul_div_saturating(hi.saturating_sub(lo), quantity, CENTS)
}

/// Lower half of a 64-bit word.
#[inline(always)]
pub fn low_half(v: u64) -> u32 {
    (v & 0xFFFF_FFFF) as u32
}
