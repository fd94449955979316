// ALICE-Option-Core — Deterministic re-execution and dispute verification
// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Moroya Sakamoto

use tracing::warn;

use crate::checksum::{fnv1a, Fnv32Mix, IntegrityHasher};
use crate::purchase::PurchaseValidator;
use crate::settlement::SettlementEvaluator;
use crate::wire::{WireCodec, PURCHASE_RECORD_LEN, SETTLEMENT_RESULT_LEN};

// ── Types ──────────────────────────────────────────────────────────────

/// Whether a claimed output matches the recomputed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Agree,
    /// Offset of the first differing byte. A length difference with a
    /// common prefix reports the shorter length.
    Diverge { first_mismatch: usize },
}

/// Outcome of re-executing one input and comparing against a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayReport {
    pub verdict: Verdict,
    /// Length of the recomputed output; 0 when the input is rejected.
    pub expected_len: usize,
    pub claimed_len: usize,
    /// FNV-1a fingerprint of the recomputed output.
    pub expected_fingerprint: u64,
    /// FNV-1a fingerprint of the claimed output.
    pub claimed_fingerprint: u64,
}

impl ReplayReport {
    #[inline]
    pub fn agrees(&self) -> bool {
        self.verdict == Verdict::Agree
    }
}

// ── Replay Verifier ────────────────────────────────────────────────────

/// Recomputes guest outputs so a counter-party's claim can be checked.
///
/// Both parties run the same integer-only evaluation over the same bytes, so
/// any divergence in the claimed output is a fault in the claim. Rejected or
/// undecodable inputs recompute to zero-length output, matching what the
/// guest writes. All records are read and written with the validator's
/// codec.
#[derive(Debug, Clone)]
pub struct ReplayVerifier<H = Fnv32Mix> {
    evaluator: SettlementEvaluator,
    validator: PurchaseValidator<H>,
}

impl Default for ReplayVerifier {
    fn default() -> Self {
        Self::new(SettlementEvaluator::default(), PurchaseValidator::default())
    }
}

impl<H: IntegrityHasher> ReplayVerifier<H> {
    pub fn new(evaluator: SettlementEvaluator, validator: PurchaseValidator<H>) -> Self {
        Self {
            evaluator,
            validator,
        }
    }

    /// Re-run settlement on `input` and compare with `claimed`.
    pub fn verify_settlement(&self, input: &[u8], claimed: &[u8]) -> ReplayReport {
        let codec = self.codec();
        let mut expected = [0u8; SETTLEMENT_RESULT_LEN];
        let len = match codec.decode_contract(input) {
            Ok(contract) => {
                let result = self.evaluator.evaluate(&contract);
                expected = codec.encode_settlement_result(&result);
                SETTLEMENT_RESULT_LEN
            }
            Err(_) => 0,
        };
        Self::compare(&expected[..len], claimed)
    }

    /// Re-run purchase validation on `input` and compare with `claimed`.
    pub fn verify_purchase(&self, input: &[u8], claimed: &[u8]) -> ReplayReport {
        let mut expected = [0u8; PURCHASE_RECORD_LEN];
        let len = match self.validator.validate_bytes(input) {
            Ok(record) => {
                expected = self.codec().encode_purchase_record(&record);
                PURCHASE_RECORD_LEN
            }
            Err(_) => 0,
        };
        Self::compare(&expected[..len], claimed)
    }

    fn compare(expected: &[u8], claimed: &[u8]) -> ReplayReport {
        let first_mismatch = expected
            .iter()
            .zip(claimed)
            .position(|(a, b)| a != b)
            .or_else(|| {
                (expected.len() != claimed.len()).then(|| expected.len().min(claimed.len()))
            });

        let expected_fingerprint = fnv1a(expected);
        let claimed_fingerprint = fnv1a(claimed);

        let verdict = match first_mismatch {
            Some(offset) => {
                warn!(
                    offset,
                    expected_len = expected.len(),
                    claimed_len = claimed.len(),
                    "replay divergence"
                );
                Verdict::Diverge {
                    first_mismatch: offset,
                }
            }
            None => Verdict::Agree,
        };

        ReplayReport {
            verdict,
            expected_len: expected.len(),
            claimed_len: claimed.len(),
            expected_fingerprint,
            claimed_fingerprint,
        }
    }

    /// Access the settlement evaluator used for re-execution.
    #[inline]
    pub fn evaluator(&self) -> &SettlementEvaluator {
        &self.evaluator
    }

    /// Codec shared by both record families.
    #[inline]
    pub fn codec(&self) -> &WireCodec {
        self.validator.codec()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{ContractDescriptor, ExerciseStyle, OptionKind};
    use crate::purchase::{PurchaseRequest, ValidatorConfig, PUBKEY_LEN};
    use crate::settlement::EvaluatorConfig;
    use crate::wire::ByteOrder;

    fn verifier() -> ReplayVerifier {
        ReplayVerifier::default()
    }

    fn contract_bytes() -> [u8; 32] {
        WireCodec::default().encode_contract(&ContractDescriptor {
            kind: OptionKind::Put,
            strike: 10_000,
            spot: 9_000,
            quantity: 200,
            barrier: 0,
            exercise: ExerciseStyle::European,
            time_to_expiry: 0,
            volatility: 0,
        })
    }

    fn big_endian_verifier() -> ReplayVerifier {
        let validator = PurchaseValidator::with_hasher(
            ValidatorConfig::default(),
            WireCodec::new(ByteOrder::Big),
            Fnv32Mix,
        );
        ReplayVerifier::new(SettlementEvaluator::default(), validator)
    }

    fn request_bytes(premium: u64) -> [u8; 88] {
        request_bytes_in(WireCodec::default(), premium)
    }

    fn request_bytes_in(codec: WireCodec, premium: u64) -> [u8; 88] {
        codec.encode_purchase_request(&PurchaseRequest {
            option_id: [7; 6],
            buyer_pubkey: [2; PUBKEY_LEN],
            quantity: 1_000,
            premium,
            strike: 10_000,
            expiry: 42,
            option_kind: 0,
            spot: 10_000,
            pool_balance: 1_000,
        })
    }

    fn honest_settlement(input: &[u8]) -> [u8; SETTLEMENT_RESULT_LEN] {
        let codec = WireCodec::default();
        let c = codec.decode_contract(input).unwrap();
        codec.encode_settlement_result(&SettlementEvaluator::default().evaluate(&c))
    }

    #[test]
    fn honest_settlement_claim_agrees() {
        let input = contract_bytes();
        let claimed = honest_settlement(&input);
        let report = verifier().verify_settlement(&input, &claimed);
        assert!(report.agrees());
        assert_eq!(report.expected_len, 32);
        assert_eq!(report.expected_fingerprint, report.claimed_fingerprint);
    }

    #[test]
    fn inflated_payout_diverges_at_first_byte() {
        let input = contract_bytes();
        let mut claimed = honest_settlement(&input);
        // payout is the leading little-endian u64
        claimed[0] = claimed[0].wrapping_add(1);
        let report = verifier().verify_settlement(&input, &claimed);
        assert_eq!(report.verdict, Verdict::Diverge { first_mismatch: 0 });
        assert_ne!(report.expected_fingerprint, report.claimed_fingerprint);
    }

    #[test]
    fn truncated_claim_diverges_at_length() {
        let input = contract_bytes();
        let claimed = honest_settlement(&input);
        let report = verifier().verify_settlement(&input, &claimed[..20]);
        assert_eq!(report.verdict, Verdict::Diverge { first_mismatch: 20 });
        assert_eq!(report.claimed_len, 20);
    }

    #[test]
    fn undecodable_input_expects_empty_output() {
        let report = verifier().verify_settlement(&[0u8; 5], &[]);
        assert!(report.agrees());
        assert_eq!(report.expected_len, 0);

        let report = verifier().verify_settlement(&[0u8; 5], &[1]);
        assert_eq!(report.verdict, Verdict::Diverge { first_mismatch: 0 });
    }

    #[test]
    fn config_mismatch_is_detected() {
        // A claimant running the vanilla variant ignores the barrier.
        let codec = WireCodec::default();
        let mut c = codec.decode_contract(&contract_bytes()).unwrap();
        c.barrier = 9_500;
        let input = codec.encode_contract(&c);
        let vanilla = SettlementEvaluator::new(EvaluatorConfig::vanilla());
        let claimed = codec.encode_settlement_result(&vanilla.evaluate(&c));

        let report = verifier().verify_settlement(&input, &claimed);
        assert!(!report.agrees());
    }

    #[test]
    fn purchase_claims() {
        let v = verifier();
        let input = request_bytes(100);
        let record = PurchaseValidator::default().validate_bytes(&input).unwrap();
        let claimed = WireCodec::default().encode_purchase_record(&record);
        assert!(v.verify_purchase(&input, &claimed).agrees());

        // Forged checksum byte.
        let mut forged = claimed;
        forged[8] ^= 0xFF;
        assert_eq!(
            v.verify_purchase(&input, &forged).verdict,
            Verdict::Diverge { first_mismatch: 8 }
        );
    }

    #[test]
    fn rejected_purchase_expects_empty_output() {
        let v = verifier();
        let input = request_bytes(600);
        assert!(v.verify_purchase(&input, &[]).agrees());

        // Claiming a record for a rejected purchase is a fault.
        let accepted = request_bytes(100);
        let record = PurchaseValidator::default()
            .validate_bytes(&accepted)
            .unwrap();
        let claimed = WireCodec::default().encode_purchase_record(&record);
        let report = v.verify_purchase(&input, &claimed);
        assert_eq!(report.verdict, Verdict::Diverge { first_mismatch: 0 });
        assert_eq!(report.expected_len, 0);
    }

    #[test]
    fn big_endian_purchase_claim_agrees() {
        let codec = WireCodec::new(ByteOrder::Big);
        let v = big_endian_verifier();
        let input = request_bytes_in(codec, 100);
        let record = v.validator.validate_bytes(&input).unwrap();
        assert_eq!(record.max_payout, 1_000);

        let claimed = codec.encode_purchase_record(&record);
        let report = v.verify_purchase(&input, &claimed);
        assert!(report.agrees());
        assert_eq!(report.expected_len, PURCHASE_RECORD_LEN);

        // The same record in little-endian is not what a big-endian guest writes.
        let wrong_order = WireCodec::default().encode_purchase_record(&record);
        assert!(!v.verify_purchase(&input, &wrong_order).agrees());
    }

    #[test]
    fn big_endian_settlement_claim_agrees() {
        let codec = WireCodec::new(ByteOrder::Big);
        let c = WireCodec::default().decode_contract(&contract_bytes()).unwrap();
        let input = codec.encode_contract(&c);
        let claimed = codec.encode_settlement_result(&SettlementEvaluator::default().evaluate(&c));
        assert!(big_endian_verifier().verify_settlement(&input, &claimed).agrees());
    }
}
