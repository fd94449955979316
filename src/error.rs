/*
    ALICE-Option-Core
    Copyright (C) 2026 Moroya Sakamoto
*/

use thiserror::Error;

/// Reason a proposed option purchase was rejected.
///
/// Checks run in a fixed order and the first failure wins, so a request with
/// several problems always reports the same reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectionReason {
    /// Input buffer length does not match the fixed request layout.
    #[error("malformed input: expected {expected} bytes, got {actual}")]
    MalformedInput { expected: usize, actual: usize },
    /// Quantity or premium is zero.
    #[error("quantity and premium must be non-zero")]
    ZeroAmount,
    /// Option kind code is neither Call (0) nor Put (1).
    #[error("unknown option kind {0}")]
    UnknownOptionKind(u8),
    /// Premium exceeds the allowed share of notional quantity.
    #[error("premium {premium} exceeds maximum {max_premium}")]
    PremiumTooHigh { premium: u64, max_premium: u64 },
    /// Spot price is zero, so a put payout cannot be bounded.
    #[error("spot price must be non-zero")]
    InvalidSpotPrice,
    /// Pool cannot cover the maximum payout.
    #[error("pool balance {available} below maximum payout {required}")]
    InsufficientPoolBalance { required: u64, available: u64 },
    /// An intermediate value does not fit the output width.
    #[error("arithmetic overflow")]
    ArithmeticOverflow,
}

/// Fixed-layout encoding and decoding failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WireError {
    /// Buffer length differs from the record layout.
    #[error("length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    /// A field holds a code outside its enumeration.
    #[error("invalid {field} code {value}")]
    InvalidField { field: &'static str, value: u32 },
    /// Output location cannot hold the encoded record.
    #[error("output needs {required} bytes, only {available} available")]
    OutputTooSmall { required: usize, available: usize },
}

/// Failure at the host I/O boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HostError {
    #[error(transparent)]
    Wire(#[from] WireError),
    #[error("purchase rejected: {0}")]
    Rejected(#[from] RejectionReason),
}
