// ALICE-Option-Core — Option settlement evaluator
// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Moroya Sakamoto

use tracing::trace;

use crate::contract::{
    ContractDescriptor, ExerciseStyle, Moneyness, OptionKind, PnlSign, SettlementResult,
};
use crate::fixed_point::{mul_div_saturating, scaled_gain, BPS, CENTS};

// ── Configuration ──────────────────────────────────────────────────────

/// Configuration for the settlement evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Half-width of the at-the-money band around strike, in currency
    /// hundredths.
    pub atm_buffer: u64,
    /// American puts exercise early when `strike > spot * pct / 100`.
    pub early_exercise_threshold_pct: u64,
    /// Assumed premium as basis points of `strike * quantity` notional.
    pub premium_rate_bps: u64,
    /// Apply knock-out barriers.
    pub barrier_enabled: bool,
    /// Apply the American early-exercise policy.
    pub early_exercise_enabled: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            atm_buffer: 100,
            early_exercise_threshold_pct: 115,
            premium_rate_bps: 200,
            barrier_enabled: true,
            early_exercise_enabled: true,
        }
    }
}

impl EvaluatorConfig {
    /// Plain vanilla settlement: barriers and early exercise are ignored.
    pub fn vanilla() -> Self {
        Self {
            barrier_enabled: false,
            early_exercise_enabled: false,
            ..Self::default()
        }
    }
}

// ── Settlement Evaluator ───────────────────────────────────────────────

/// Deterministic option settlement.
///
/// `evaluate` is total: every representable contract yields a result and
/// nothing wraps, since all products are formed in 64- or 128-bit
/// intermediates from 32-bit inputs. The pipeline is barrier check, moneyness,
/// intrinsic value, early exercise, terminal payout, then profit/loss. The
/// barrier and early-exercise steps end evaluation when they fire.
#[derive(Debug, Clone, Default)]
pub struct SettlementEvaluator {
    config: EvaluatorConfig,
}

impl SettlementEvaluator {
    /// Create a new evaluator with the given configuration.
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    /// Settle a single contract.
    pub fn evaluate(&self, contract: &ContractDescriptor) -> SettlementResult {
        let strike = contract.strike as u64;
        let spot = contract.spot as u64;
        let quantity = contract.quantity as u64;

        if self.config.barrier_enabled && Self::barrier_hit(contract) {
            trace!(
                barrier = contract.barrier,
                spot = contract.spot,
                "barrier knock-out"
            );
            return SettlementResult::knocked_out();
        }

        let moneyness = self.moneyness(contract.kind, strike, spot);
        let intrinsic = Self::intrinsic_value(contract.kind, strike, spot, quantity);

        if self.should_exercise_early(contract) {
            trace!(payout = intrinsic, "american put exercised early");
            return SettlementResult {
                payout: intrinsic,
                moneyness,
                barrier_hit: false,
                profit_loss: 0,
                pnl_sign: PnlSign::Flat,
                early_exercised: true,
            };
        }

        // No time value is modelled: before expiry the payout is still the
        // intrinsic value.
        let payout = intrinsic;

        let premium_paid = self.premium_paid(strike, quantity);
        let (profit_loss, pnl_sign) = if payout > premium_paid {
            (payout - premium_paid, PnlSign::Profit)
        } else if payout < premium_paid {
            (premium_paid - payout, PnlSign::Loss)
        } else {
            (0, PnlSign::Flat)
        };

        SettlementResult {
            payout,
            moneyness,
            barrier_hit: false,
            profit_loss,
            pnl_sign,
            early_exercised: false,
        }
    }

    /// Knock-out test. Call-like contracts are hit at or above the barrier,
    /// put-like at or below. A zero barrier never hits.
    pub fn barrier_hit(contract: &ContractDescriptor) -> bool {
        if contract.barrier == 0 {
            return false;
        }
        if contract.kind.is_call_like() {
            contract.spot >= contract.barrier
        } else {
            contract.spot <= contract.barrier
        }
    }

    /// Classify moneyness with a symmetric buffer around strike.
    pub fn moneyness(&self, kind: OptionKind, strike: u64, spot: u64) -> Moneyness {
        let buf = self.config.atm_buffer;
        // Buffer added to the smaller side so strikes below the buffer do not
        // underflow.
        let (gain_side, loss_side) = if kind.is_call_like() {
            (spot, strike)
        } else {
            (strike, spot)
        };
        if gain_side > loss_side.saturating_add(buf) {
            Moneyness::InTheMoney
        } else if gain_side.saturating_add(buf) < loss_side {
            Moneyness::OutOfTheMoney
        } else {
            Moneyness::AtTheMoney
        }
    }

    /// Payout if exercised now, ignoring time value.
    pub fn intrinsic_value(kind: OptionKind, strike: u64, spot: u64, quantity: u64) -> u64 {
        match kind {
            OptionKind::Call => scaled_gain(spot, strike, quantity),
            OptionKind::Put => scaled_gain(strike, spot, quantity),
            OptionKind::BinaryCall if spot >= strike => quantity.saturating_mul(CENTS),
            OptionKind::BinaryPut if spot <= strike => quantity.saturating_mul(CENTS),
            OptionKind::BinaryCall | OptionKind::BinaryPut => 0,
        }
    }

    /// Only American puts deep enough in the money exercise early.
    fn should_exercise_early(&self, contract: &ContractDescriptor) -> bool {
        if !self.config.early_exercise_enabled
            || contract.exercise != ExerciseStyle::American
            || contract.time_to_expiry == 0
            || contract.kind != OptionKind::Put
        {
            return false;
        }
        let threshold = mul_div_saturating(
            contract.spot as u64,
            self.config.early_exercise_threshold_pct,
            CENTS,
        );
        (contract.strike as u64) > threshold
    }

    /// Premium assumed paid: `strike * quantity * rate_bps / (BPS * CENTS)`.
    ///
    /// With the default 200 bps this equals `strike * 2 * quantity / 10000`.
    fn premium_paid(&self, strike: u64, quantity: u64) -> u64 {
        mul_div_saturating(
            strike * quantity,
            self.config.premium_rate_bps,
            BPS * CENTS,
        )
    }

    /// Access the current configuration.
    #[inline]
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }
}

// ── Tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn contract(kind: OptionKind, strike: u32, spot: u32, quantity: u32) -> ContractDescriptor {
        ContractDescriptor {
            kind,
            strike,
            spot,
            quantity,
            barrier: 0,
            exercise: ExerciseStyle::European,
            time_to_expiry: 0,
            volatility: 2_500,
        }
    }

    fn evaluate(c: &ContractDescriptor) -> SettlementResult {
        SettlementEvaluator::default().evaluate(c)
    }

    #[test]
    fn call_in_the_money() {
        let r = evaluate(&contract(OptionKind::Call, 10_000, 11_000, 100));
        // (11000 - 10000) * 100 / 100
        assert_eq!(r.payout, 1_000);
        assert_eq!(r.moneyness, Moneyness::InTheMoney);
        assert!(!r.barrier_hit);
        // premium = 10000 * 2 * 100 / 10000 = 200
        assert_eq!(r.profit_loss, 800);
        assert_eq!(r.pnl_sign, PnlSign::Profit);
        assert_eq!(r.signed_pnl(), 800);
    }

    #[test]
    fn call_out_of_the_money() {
        let r = evaluate(&contract(OptionKind::Call, 10_000, 9_000, 100));
        assert_eq!(r.payout, 0);
        assert_eq!(r.moneyness, Moneyness::OutOfTheMoney);
        assert_eq!(r.profit_loss, 200);
        assert_eq!(r.pnl_sign, PnlSign::Loss);
        assert_eq!(r.signed_pnl(), -200);
    }

    #[test]
    fn put_in_the_money() {
        let r = evaluate(&contract(OptionKind::Put, 10_000, 9_000, 200));
        // (10000 - 9000) * 200 / 100
        assert_eq!(r.payout, 2_000);
        assert_eq!(r.moneyness, Moneyness::InTheMoney);
    }

    #[test]
    fn intrinsic_truncates() {
        // 150 * 33 / 100 = 49.5 -> 49
        let r = evaluate(&contract(OptionKind::Call, 10_000, 10_150, 33));
        assert_eq!(r.payout, 49);
        let r = evaluate(&contract(OptionKind::Put, 10_150, 10_000, 33));
        assert_eq!(r.payout, 49);
    }

    #[test]
    fn atm_band_boundaries() {
        let ev = SettlementEvaluator::default();
        // Exactly strike + 100 is still ATM.
        assert_eq!(
            ev.moneyness(OptionKind::Call, 10_000, 10_100),
            Moneyness::AtTheMoney
        );
        assert_eq!(
            ev.moneyness(OptionKind::Call, 10_000, 10_101),
            Moneyness::InTheMoney
        );
        assert_eq!(
            ev.moneyness(OptionKind::Call, 10_000, 9_900),
            Moneyness::AtTheMoney
        );
        assert_eq!(
            ev.moneyness(OptionKind::Call, 10_000, 9_899),
            Moneyness::OutOfTheMoney
        );
        // Puts mirror.
        assert_eq!(
            ev.moneyness(OptionKind::Put, 10_000, 9_899),
            Moneyness::InTheMoney
        );
        assert_eq!(
            ev.moneyness(OptionKind::Put, 10_000, 10_101),
            Moneyness::OutOfTheMoney
        );
        assert_eq!(
            ev.moneyness(OptionKind::BinaryPut, 10_000, 10_050),
            Moneyness::AtTheMoney
        );
    }

    #[test]
    fn small_strike_does_not_underflow() {
        let ev = SettlementEvaluator::default();
        // strike - 100 would wrap in 32 bits.
        assert_eq!(ev.moneyness(OptionKind::Call, 50, 0), Moneyness::AtTheMoney);
        assert_eq!(ev.moneyness(OptionKind::Put, 0, 50), Moneyness::AtTheMoney);
        assert_eq!(ev.moneyness(OptionKind::Put, 0, 101), Moneyness::OutOfTheMoney);
    }

    #[test]
    fn binary_all_or_nothing() {
        let r = evaluate(&contract(OptionKind::BinaryCall, 10_000, 10_000, 7));
        assert_eq!(r.payout, 700);
        let r = evaluate(&contract(OptionKind::BinaryCall, 10_000, 9_999, 7));
        assert_eq!(r.payout, 0);
        let r = evaluate(&contract(OptionKind::BinaryPut, 10_000, 10_000, 7));
        assert_eq!(r.payout, 700);
        let r = evaluate(&contract(OptionKind::BinaryPut, 10_000, 10_001, 7));
        assert_eq!(r.payout, 0);
    }

    #[test]
    fn put_barrier_knocks_out() {
        let mut c = contract(OptionKind::Put, 10_000, 9_000, 200);
        c.barrier = 9_500;
        let r = evaluate(&c);
        assert!(r.barrier_hit);
        assert_eq!(r.payout, 0);
        assert_eq!(r.moneyness, Moneyness::OutOfTheMoney);
        assert_eq!(r.profit_loss, 0);
    }

    #[test]
    fn call_barrier_inclusive() {
        let mut c = contract(OptionKind::Call, 10_000, 12_000, 100);
        c.barrier = 12_000;
        assert!(evaluate(&c).barrier_hit);

        c.barrier = 12_001;
        let r = evaluate(&c);
        assert!(!r.barrier_hit);
        assert_eq!(r.payout, 2_000);
    }

    #[test]
    fn barrier_runs_before_early_exercise() {
        let mut c = contract(OptionKind::Put, 12_000, 10_000, 100);
        c.exercise = ExerciseStyle::American;
        c.time_to_expiry = 60;
        c.barrier = 10_000;
        let r = evaluate(&c);
        assert!(r.barrier_hit);
        assert!(!r.early_exercised);
        assert_eq!(r.payout, 0);
    }

    #[test]
    fn american_put_exercises_early() {
        let mut c = contract(OptionKind::Put, 12_000, 10_000, 100);
        c.exercise = ExerciseStyle::American;
        c.time_to_expiry = 1_440;
        let r = evaluate(&c);
        // 12000 > 10000 * 115 / 100 = 11500
        assert!(r.early_exercised);
        assert_eq!(r.payout, 2_000);
        assert_eq!(r.moneyness, Moneyness::InTheMoney);
        // P&L step is skipped on this path.
        assert_eq!(r.profit_loss, 0);
        assert_eq!(r.pnl_sign, PnlSign::Flat);
    }

    #[test]
    fn american_put_threshold_is_strict() {
        let mut c = contract(OptionKind::Put, 11_500, 10_000, 100);
        c.exercise = ExerciseStyle::American;
        c.time_to_expiry = 30;
        let r = evaluate(&c);
        assert!(!r.early_exercised);
        assert_eq!(r.payout, 1_500);
        // premium = 11500 * 2 * 100 / 10000 = 230
        assert_eq!(r.profit_loss, 1_270);
    }

    #[test]
    fn american_at_expiry_and_calls_fall_through() {
        let mut c = contract(OptionKind::Put, 12_000, 10_000, 100);
        c.exercise = ExerciseStyle::American;
        assert!(!evaluate(&c).early_exercised);

        let mut c = contract(OptionKind::Call, 10_000, 20_000, 100);
        c.exercise = ExerciseStyle::American;
        c.time_to_expiry = 600;
        let r = evaluate(&c);
        assert!(!r.early_exercised);
        assert_eq!(r.payout, 10_000);
    }

    #[test]
    fn vanilla_config_ignores_barrier_and_early_exercise() {
        let ev = SettlementEvaluator::new(EvaluatorConfig::vanilla());
        let mut c = contract(OptionKind::Put, 12_000, 10_000, 100);
        c.barrier = 11_000;
        c.exercise = ExerciseStyle::American;
        c.time_to_expiry = 60;
        let r = ev.evaluate(&c);
        assert!(!r.barrier_hit);
        assert!(!r.early_exercised);
        assert_eq!(r.payout, 2_000);
        assert!(!ev.config().barrier_enabled);
    }

    #[test]
    fn degenerate_contract_is_zero_atm() {
        let r = evaluate(&contract(OptionKind::Call, 0, 0, 0));
        assert_eq!(r.payout, 0);
        assert_eq!(r.moneyness, Moneyness::AtTheMoney);
        assert_eq!(r.pnl_sign, PnlSign::Flat);
    }

    #[test]
    fn extreme_inputs_do_not_wrap() {
        let r = evaluate(&contract(OptionKind::Call, 0, u32::MAX, u32::MAX));
        assert_eq!(r.payout, (u32::MAX as u64) * (u32::MAX as u64) / 100);

        let r = evaluate(&contract(OptionKind::Put, u32::MAX, 0, u32::MAX));
        // premium = MAX * MAX * 2 / 10000, larger than u32 arithmetic allows
        let premium = ((u32::MAX as u128) * (u32::MAX as u128) * 2 / 10_000) as u64;
        assert_eq!(r.profit_loss, r.payout - premium);
    }

    proptest! {
        #[test]
        fn call_payout_formula(strike: u32, spot: u32, quantity: u32) {
            let r = evaluate(&contract(OptionKind::Call, strike, spot, quantity));
            let expected = if spot > strike {
                (spot as u64 - strike as u64) * quantity as u64 / 100
            } else {
                0
            };
            prop_assert_eq!(r.payout, expected);
        }

        #[test]
        fn put_payout_formula(strike: u32, spot: u32, quantity: u32) {
            let r = evaluate(&contract(OptionKind::Put, strike, spot, quantity));
            let expected = if strike > spot {
                (strike as u64 - spot as u64) * quantity as u64 / 100
            } else {
                0
            };
            prop_assert_eq!(r.payout, expected);
        }

        #[test]
        fn binary_payout_is_all_or_nothing(
            strike: u32,
            spot: u32,
            quantity: u32,
            put in any::<bool>(),
        ) {
            let kind = if put { OptionKind::BinaryPut } else { OptionKind::BinaryCall };
            let r = evaluate(&contract(kind, strike, spot, quantity));
            prop_assert!(r.payout == 0 || r.payout == quantity as u64 * 100);
        }

        #[test]
        fn call_like_barrier_short_circuits(
            strike: u32,
            barrier in 1u32..,
            extra: u32,
            quantity: u32,
            binary in any::<bool>(),
        ) {
            let kind = if binary { OptionKind::BinaryCall } else { OptionKind::Call };
            let mut c = contract(kind, strike, barrier.saturating_add(extra), quantity);
            c.barrier = barrier;
            let r = evaluate(&c);
            prop_assert!(r.barrier_hit);
            prop_assert_eq!(r.payout, 0);
        }

        #[test]
        fn deep_american_put_pays_intrinsic(
            spot in 0u32..1_000_000,
            extra in 1u32..1_000_000,
            quantity: u32,
            minutes in 1u32..,
        ) {
            let strike = (spot as u64 * 115 / 100) as u32 + extra;
            let mut c = contract(OptionKind::Put, strike, spot, quantity);
            c.exercise = ExerciseStyle::American;
            c.time_to_expiry = minutes;
            let r = evaluate(&c);
            let intrinsic = SettlementEvaluator::intrinsic_value(
                OptionKind::Put,
                strike as u64,
                spot as u64,
                quantity as u64,
            );
            prop_assert!(r.early_exercised);
            prop_assert_eq!(r.payout, intrinsic);
        }
    }
}
