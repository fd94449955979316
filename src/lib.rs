/*
    ALICE-Option-Core
    Copyright (C) 2026 Moroya Sakamoto
*/

//! # ALICE-Option-Core
//!
//! Deterministic, integer-only option settlement and purchase validation for
//! the ALICE fraud-proof guest. Two parties run the same bytes through the
//! same code and must produce bit-identical output; there is no floating
//! point, no allocation, and no I/O inside the core.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`fixed_point`] | Truncating scaled-integer helpers |
//! | [`contract`] | `ContractDescriptor` and `SettlementResult` value types |
//! | [`settlement`] | `SettlementEvaluator`: barrier, moneyness, intrinsic value, early exercise, P&L |
//! | [`purchase`] | `PurchaseValidator`: solvency and pricing checks, purchase records |
//! | [`checksum`] | Integrity checksum for purchase records |
//! | [`wire`] | Fixed-layout encoding of host records |
//! | [`host`] | `HostIo` port and run-to-completion drivers |
//! | [`replay`] | Re-execution and dispute verification |
//! | [`error`] | Rejection and wire error taxonomy |
//!
//! # Quick Start
//!
//! ```rust
//! use alice_option_core::contract::{ContractDescriptor, ExerciseStyle, OptionKind};
//! use alice_option_core::settlement::SettlementEvaluator;
//!
//! let evaluator = SettlementEvaluator::default();
//! let result = evaluator.evaluate(&ContractDescriptor {
//!     kind: OptionKind::Call,
//!     strike: 10_000, spot: 11_000, quantity: 100,
//!     barrier: 0, exercise: ExerciseStyle::European,
//!     time_to_expiry: 0, volatility: 0,
//! });
//! assert_eq!(result.payout, 1_000); // (11000 - 10000) * 100 / 100
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod checksum;
pub mod contract;
pub mod error;
/// C ABI entry points over raw buffers.
#[cfg(feature = "ffi")]
pub mod ffi;
/// Integer-only scaled currency arithmetic.
pub mod fixed_point;
pub mod host;
pub mod purchase;
/// Deterministic re-execution and dispute verification.
pub mod replay;
pub mod settlement;
pub mod wire;

#[cfg(feature = "sha2")]
pub use checksum::Sha256Checksum;
pub use checksum::{Fnv32Mix, IntegrityHasher};
pub use contract::{
    ContractDescriptor, ExerciseStyle, Moneyness, OptionKind, PnlSign, SettlementResult,
};
pub use error::{HostError, RejectionReason, WireError};
pub use host::{run_purchase, run_settlement, BufferHost, HostIo};
pub use purchase::{
    PurchaseKind, PurchaseRecord, PurchaseRequest, PurchaseValidator, PutPayoutMode,
    ValidatorConfig,
};
pub use replay::{ReplayReport, ReplayVerifier, Verdict};
pub use settlement::{EvaluatorConfig, SettlementEvaluator};
pub use wire::{ByteOrder, WireCodec};
