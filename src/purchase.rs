// ALICE-Option-Core — Option purchase validation
// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Moroya Sakamoto

use tracing::debug;

use crate::checksum::{Fnv32Mix, IntegrityHasher, CHECKSUM_LEN};
use crate::error::RejectionReason;
use crate::fixed_point::{low_half, mul_div};
use crate::wire::{WireCodec, PURCHASE_REQUEST_LEN};

/// Length of the opaque option identifier.
pub const OPTION_ID_LEN: usize = 6;
/// Length of a compressed public key.
pub const PUBKEY_LEN: usize = 33;
/// Length of a derived purchase identifier.
pub const PURCHASE_ID_LEN: usize = 8;

// ── Types ──────────────────────────────────────────────────────────────

/// A proposed option purchase together with the pool and market state it is
/// checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseRequest {
    pub option_id: [u8; OPTION_ID_LEN],
    /// Opaque to validation; only its first two bytes feed the purchase id.
    pub buyer_pubkey: [u8; PUBKEY_LEN],
    pub quantity: u64,
    pub premium: u64,
    pub strike: u64,
    /// Expiry timestamp.
    pub expiry: u64,
    /// Raw kind code; see [`PurchaseKind`].
    pub option_kind: u8,
    pub spot: u64,
    pub pool_balance: u64,
}

impl PurchaseRequest {
    /// Deterministic purchase identifier.
    ///
    /// Bytes 0-1 come from the option id, 2-3 from the buyer key, 4-7 are the
    /// low 32 bits of expiry, big-endian. No other field contributes.
    pub fn purchase_id(&self) -> [u8; PURCHASE_ID_LEN] {
        let mut id = [0u8; PURCHASE_ID_LEN];
        id[0..2].copy_from_slice(&self.option_id[0..2]);
        id[2..4].copy_from_slice(&self.buyer_pubkey[0..2]);
        id[4..8].copy_from_slice(&(self.expiry as u32).to_be_bytes());
        id
    }
}

/// Option kinds that can be purchased from the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PurchaseKind {
    Call = 0,
    Put = 1,
}

impl PurchaseKind {
    #[inline]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(PurchaseKind::Call),
            1 => Some(PurchaseKind::Put),
            _ => None,
        }
    }
}

/// Accepted purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseRecord {
    pub purchase_id: [u8; PURCHASE_ID_LEN],
    /// Checksum over the raw request bytes.
    pub checksum: [u8; CHECKSUM_LEN],
    /// Most the pool can owe on this purchase.
    pub max_payout: u64,
}

// ── Configuration ──────────────────────────────────────────────────────

/// How the put payout bound `strike * quantity / spot` is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PutPayoutMode {
    /// Operands narrowed to their low 32 bits, product formed in 64 bits.
    /// A spot whose low half is zero falls back to `quantity`. Matches the
    /// deployed guest program.
    #[default]
    Narrowed,
    /// Full-width operands with a 128-bit product.
    Exact,
}

/// Configuration for the purchase validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Premium may not exceed `quantity / max_premium_divisor`.
    pub max_premium_divisor: u64,
    pub put_payout: PutPayoutMode,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_premium_divisor: 2,
            put_payout: PutPayoutMode::Narrowed,
        }
    }
}

// ── Purchase Validator ─────────────────────────────────────────────────

/// Solvency and pricing checks for option purchases.
///
/// Checks run in order: layout, zero amounts, option kind, premium cap,
/// payout bound, pool balance. The first failure is returned and no record is
/// produced.
#[derive(Debug, Clone)]
pub struct PurchaseValidator<H = Fnv32Mix> {
    config: ValidatorConfig,
    codec: WireCodec,
    hasher: H,
}

impl Default for PurchaseValidator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}

impl PurchaseValidator {
    /// Create a validator using the protocol checksum and little-endian wire
    /// format.
    pub fn new(config: ValidatorConfig) -> Self {
        Self::with_hasher(config, WireCodec::default(), Fnv32Mix)
    }
}

impl<H: IntegrityHasher> PurchaseValidator<H> {
    pub fn with_hasher(config: ValidatorConfig, codec: WireCodec, hasher: H) -> Self {
        Self {
            config,
            codec,
            hasher,
        }
    }

    /// Validate a typed request. The checksum covers its wire encoding.
    pub fn validate(&self, request: &PurchaseRequest) -> Result<PurchaseRecord, RejectionReason> {
        let raw = self.codec.encode_purchase_request(request);
        self.finish(request, &raw)
    }

    /// Validate a raw request buffer as delivered by the host.
    pub fn validate_bytes(&self, input: &[u8]) -> Result<PurchaseRecord, RejectionReason> {
        if input.len() != PURCHASE_REQUEST_LEN {
            let reason = RejectionReason::MalformedInput {
                expected: PURCHASE_REQUEST_LEN,
                actual: input.len(),
            };
            debug!(reason = %reason, "purchase rejected");
            return Err(reason);
        }
        let request = self.codec.read_purchase_request(input);
        self.finish(&request, input)
    }

    fn finish(
        &self,
        request: &PurchaseRequest,
        raw: &[u8],
    ) -> Result<PurchaseRecord, RejectionReason> {
        debug_assert_eq!(raw.len(), PURCHASE_REQUEST_LEN);
        match self.max_payout(request) {
            Ok(max_payout) => {
                debug!(max_payout, "purchase accepted");
                Ok(PurchaseRecord {
                    purchase_id: request.purchase_id(),
                    checksum: self.hasher.checksum(raw),
                    max_payout,
                })
            }
            Err(reason) => {
                debug!(reason = %reason, "purchase rejected");
                Err(reason)
            }
        }
    }

    /// Run the business-rule checks and return the solvency-checked maximum
    /// payout.
    pub fn max_payout(&self, request: &PurchaseRequest) -> Result<u64, RejectionReason> {
        if request.quantity == 0 || request.premium == 0 {
            return Err(RejectionReason::ZeroAmount);
        }

        let kind = PurchaseKind::from_code(request.option_kind)
            .ok_or(RejectionReason::UnknownOptionKind(request.option_kind))?;

        let max_premium = request.quantity / self.config.max_premium_divisor.max(1);
        if request.premium > max_premium {
            return Err(RejectionReason::PremiumTooHigh {
                premium: request.premium,
                max_premium,
            });
        }

        let max_payout = match kind {
            // Upside capped at full notional.
            PurchaseKind::Call => request.quantity,
            PurchaseKind::Put => self.put_payout(request)?,
        };

        if request.pool_balance < max_payout {
            return Err(RejectionReason::InsufficientPoolBalance {
                required: max_payout,
                available: request.pool_balance,
            });
        }

        Ok(max_payout)
    }

    fn put_payout(&self, request: &PurchaseRequest) -> Result<u64, RejectionReason> {
        if request.spot == 0 {
            return Err(RejectionReason::InvalidSpotPrice);
        }
        match self.config.put_payout {
            PutPayoutMode::Narrowed => {
                let spot_low = low_half(request.spot);
                if spot_low == 0 {
                    return Ok(request.quantity);
                }
                let product = low_half(request.strike) as u64 * low_half(request.quantity) as u64;
                Ok(product / spot_low as u64)
            }
            PutPayoutMode::Exact => mul_div(request.strike, request.quantity, request.spot)
                .ok_or(RejectionReason::ArithmeticOverflow),
        }
    }

    /// Access the current configuration.
    #[inline]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Codec used to read requests and to write the records this validator
    /// produces.
    #[inline]
    pub fn codec(&self) -> &WireCodec {
        &self.codec
    }
}

// ── Tests ──────────────────────────────────────────────────────────────
