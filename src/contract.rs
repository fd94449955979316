/*
    ALICE-Option-Core
    Copyright (C) 2026 Moroya Sakamoto
*/

/// Option payoff family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum OptionKind {
    Call = 0,
    Put = 1,
    /// Pays a fixed amount when spot is at or above strike.
    BinaryCall = 2,
    /// Pays a fixed amount when spot is at or below strike.
    BinaryPut = 3,
}

impl OptionKind {
    /// Call and BinaryCall profit from a rising spot.
    #[inline(always)]
    pub fn is_call_like(self) -> bool {
        matches!(self, OptionKind::Call | OptionKind::BinaryCall)
    }

    #[inline]
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(OptionKind::Call),
            1 => Some(OptionKind::Put),
            2 => Some(OptionKind::BinaryCall),
            3 => Some(OptionKind::BinaryPut),
            _ => None,
        }
    }
}

/// When the holder may exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ExerciseStyle {
    /// Only at expiry.
    European = 0,
    /// Any time up to expiry.
    American = 1,
}

impl ExerciseStyle {
    #[inline]
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(ExerciseStyle::European),
            1 => Some(ExerciseStyle::American),
            _ => None,
        }
    }
}

/// Contract terms plus the market snapshot it is settled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractDescriptor {
    pub kind: OptionKind,
    /// Strike price in currency hundredths.
    pub strike: u32,
    /// Spot price in currency hundredths.
    pub spot: u32,
    /// Quantity in unit hundredths.
    pub quantity: u32,
    /// Knock-out level in currency hundredths; 0 means no barrier.
    pub barrier: u32,
    pub exercise: ExerciseStyle,
    /// Minutes remaining; 0 means at expiry.
    pub time_to_expiry: u32,
    /// Implied volatility in percent hundredths. Carried on the wire, not
    /// priced.
    pub volatility: u32,
}

/// Moneyness classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Moneyness {
    /// No exercise decision recorded.
    NotApplicable = 0,
    InTheMoney = 1,
    OutOfTheMoney = 2,
    AtTheMoney = 3,
}

impl Moneyness {
    #[inline]
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Moneyness::NotApplicable),
            1 => Some(Moneyness::InTheMoney),
            2 => Some(Moneyness::OutOfTheMoney),
            3 => Some(Moneyness::AtTheMoney),
            _ => None,
        }
    }
}

/// Direction of the holder's profit/loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum PnlSign {
    #[default]
    Flat = 0,
    Profit = 1,
    Loss = 2,
}

impl PnlSign {
    #[inline]
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(PnlSign::Flat),
            1 => Some(PnlSign::Profit),
            2 => Some(PnlSign::Loss),
            _ => None,
        }
    }
}

/// Outcome of settling a single contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementResult {
    /// Payout in currency hundredths.
    pub payout: u64,
    pub moneyness: Moneyness,
    /// True when the knock-out barrier voided the contract.
    pub barrier_hit: bool,
    /// Magnitude of `payout - premium_paid`.
    pub profit_loss: u64,
    pub pnl_sign: PnlSign,
    /// True when the American early-exercise branch settled the contract.
    pub early_exercised: bool,
}

impl SettlementResult {
    /// Result for a contract voided by its barrier.
    pub(crate) fn knocked_out() -> Self {
        Self {
            payout: 0,
            moneyness: Moneyness::OutOfTheMoney,
            barrier_hit: true,
            profit_loss: 0,
            pnl_sign: PnlSign::Flat,
            early_exercised: false,
        }
    }

    /// Signed profit/loss, saturating at the `i64` range.
    pub fn signed_pnl(&self) -> i64 {
        let mag = i64::try_from(self.profit_loss).unwrap_or(i64::MAX);
        match self.pnl_sign {
            PnlSign::Loss => -mag,
            PnlSign::Profit => mag,
            PnlSign::Flat => 0,
        }
    }

    /// Payout as a process exit status, saturated to `u32`.
    ///
    /// Legacy hosts read only this scalar; the encoded result is the full
    /// channel.
    #[inline]
    pub fn exit_code(&self) -> u32 {
        u32::try_from(self.payout).unwrap_or(u32::MAX)
    }
}
