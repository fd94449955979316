// ALICE-Option-Core — C ABI entry points
// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Moroya Sakamoto

//! Each entry point returns the number of output bytes written, or a
//! negative status. Rejections write nothing, matching the guest's
//! zero-length convention, but the status still names the reason.

use core::slice;

use crate::error::{HostError, RejectionReason, WireError};
use crate::host::{run_purchase, run_settlement, BufferHost};
use crate::purchase::PurchaseValidator;
use crate::settlement::SettlementEvaluator;
use crate::wire::WireCodec;

pub const STATUS_NULL_POINTER: i32 = -1;
pub const STATUS_LENGTH_MISMATCH: i32 = -2;
pub const STATUS_INVALID_FIELD: i32 = -3;
pub const STATUS_OUTPUT_TOO_SMALL: i32 = -4;
pub const STATUS_MALFORMED_INPUT: i32 = -10;
pub const STATUS_ZERO_AMOUNT: i32 = -11;
pub const STATUS_UNKNOWN_OPTION_KIND: i32 = -12;
pub const STATUS_PREMIUM_TOO_HIGH: i32 = -13;
pub const STATUS_INVALID_SPOT_PRICE: i32 = -14;
pub const STATUS_INSUFFICIENT_POOL_BALANCE: i32 = -15;
pub const STATUS_ARITHMETIC_OVERFLOW: i32 = -16;

/// Map a host failure to its C status code.
pub fn status_code(err: &HostError) -> i32 {
    match err {
        HostError::Wire(WireError::LengthMismatch { .. }) => STATUS_LENGTH_MISMATCH,
        HostError::Wire(WireError::InvalidField { .. }) => STATUS_INVALID_FIELD,
        HostError::Wire(WireError::OutputTooSmall { .. }) => STATUS_OUTPUT_TOO_SMALL,
        HostError::Rejected(reason) => match reason {
            RejectionReason::MalformedInput { .. } => STATUS_MALFORMED_INPUT,
            RejectionReason::ZeroAmount => STATUS_ZERO_AMOUNT,
            RejectionReason::UnknownOptionKind(_) => STATUS_UNKNOWN_OPTION_KIND,
            RejectionReason::PremiumTooHigh { .. } => STATUS_PREMIUM_TOO_HIGH,
            RejectionReason::InvalidSpotPrice => STATUS_INVALID_SPOT_PRICE,
            RejectionReason::InsufficientPoolBalance { .. } => STATUS_INSUFFICIENT_POOL_BALANCE,
            RejectionReason::ArithmeticOverflow => STATUS_ARITHMETIC_OVERFLOW,
        },
    }
}

/// Build a host over raw buffers, or `None` for a null pointer with a
/// non-zero length.
///
/// # Safety
/// Non-null pointers must be valid for their lengths for `'a`, and the two
/// regions must not overlap.
unsafe fn host_from_raw<'a>(
    input: *const u8,
    input_len: usize,
    output: *mut u8,
    output_cap: usize,
) -> Option<BufferHost<'a>> {
    let input: &'a [u8] = if input_len == 0 {
        &[]
    } else if input.is_null() {
        return None;
    } else {
        slice::from_raw_parts(input, input_len)
    };
    let output: &'a mut [u8] = if output_cap == 0 {
        &mut []
    } else if output.is_null() {
        return None;
    } else {
        slice::from_raw_parts_mut(output, output_cap)
    };
    Some(BufferHost::new(input, output))
}

/// Settle the 32-byte contract at `input` into `output`.
///
/// # Safety
/// `input` must be readable for `input_len` bytes and `output` writable for
/// `output_cap` bytes; the regions must not overlap.
#[no_mangle]
pub unsafe extern "C" fn alice_settle(
    input: *const u8,
    input_len: usize,
    output: *mut u8,
    output_cap: usize,
) -> i32 {
    let Some(mut host) = host_from_raw(input, input_len, output, output_cap) else {
        return STATUS_NULL_POINTER;
    };
    match run_settlement(
        &mut host,
        &SettlementEvaluator::default(),
        &WireCodec::default(),
    ) {
        Ok(_) => host.written() as i32,
        Err(e) => status_code(&e),
    }
}

/// Validate the 88-byte purchase request at `input` into `output`.
///
/// # Safety
/// Same contract as [`alice_settle`].
#[no_mangle]
pub unsafe extern "C" fn alice_validate_purchase(
    input: *const u8,
    input_len: usize,
    output: *mut u8,
    output_cap: usize,
) -> i32 {
    let Some(mut host) = host_from_raw(input, input_len, output, output_cap) else {
        return STATUS_NULL_POINTER;
    };
    match run_purchase(&mut host, &PurchaseValidator::default()) {
        Ok(_) => host.written() as i32,
        Err(e) => status_code(&e),
    }
}
