// ALICE-Option-Core — Fixed-layout wire encoding
// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Moroya Sakamoto

//! Flat, packed record layouts exchanged with the host. Fields sit at fixed
//! offsets with no padding and no length prefix; a buffer is valid only if
//! its length equals the layout length exactly.
//!
//! | Record | Bytes | Fields |
//! |--------|-------|--------|
//! | contract | 32 | kind, strike, spot, quantity, barrier, exercise, time_to_expiry, volatility (u32 each) |
//! | settlement result | 32 | payout u64, moneyness u32, barrier_hit u32, profit_loss u64, pnl_sign u32, early_exercised u32 |
//! | purchase request | 88 | option_id [6], buyer_pubkey [33], quantity, premium, strike, expiry (u64), option_kind u8, spot, pool_balance (u64) |
//! | purchase record | 48 | purchase_id [8], checksum [32], max_payout u64 |

use crate::checksum::CHECKSUM_LEN;
use crate::contract::{
    ContractDescriptor, ExerciseStyle, Moneyness, OptionKind, PnlSign, SettlementResult,
};
use crate::error::WireError;
use crate::purchase::{
    PurchaseRecord, PurchaseRequest, OPTION_ID_LEN, PUBKEY_LEN, PURCHASE_ID_LEN,
};

pub const CONTRACT_LEN: usize = 32;
pub const SETTLEMENT_RESULT_LEN: usize = 32;
pub const PURCHASE_REQUEST_LEN: usize = 88;
pub const PURCHASE_RECORD_LEN: usize = 48;

/// Byte order of multi-byte integer fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

// ── Cursors ────────────────────────────────────────────────────────────

/// Sequential reader over a buffer whose length was already checked.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    order: ByteOrder,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8], order: ByteOrder) -> Self {
        Self { buf, pos: 0, order }
    }

    fn bytes<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        out
    }

    fn u8(&mut self) -> u8 {
        self.bytes::<1>()[0]
    }

    fn u32(&mut self) -> u32 {
        let b = self.bytes::<4>();
        match self.order {
            ByteOrder::Little => u32::from_le_bytes(b),
            ByteOrder::Big => u32::from_be_bytes(b),
        }
    }

    fn u64(&mut self) -> u64 {
        let b = self.bytes::<8>();
        match self.order {
            ByteOrder::Little => u64::from_le_bytes(b),
            ByteOrder::Big => u64::from_be_bytes(b),
        }
    }

    fn flag(&mut self, field: &'static str) -> Result<bool, WireError> {
        match self.u32() {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(WireError::InvalidField { field, value }),
        }
    }
}

/// Sequential writer into a fixed-size record.
struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
    order: ByteOrder,
}

impl<'a> Writer<'a> {
    fn new(buf: &'a mut [u8], order: ByteOrder) -> Self {
        Self { buf, pos: 0, order }
    }

    fn bytes(&mut self, b: &[u8]) {
        self.buf[self.pos..self.pos + b.len()].copy_from_slice(b);
        self.pos += b.len();
    }

    fn u8(&mut self, v: u8) {
        self.bytes(&[v]);
    }

    fn u32(&mut self, v: u32) {
        match self.order {
            ByteOrder::Little => self.bytes(&v.to_le_bytes()),
            ByteOrder::Big => self.bytes(&v.to_be_bytes()),
        }
    }

    fn u64(&mut self, v: u64) {
        match self.order {
            ByteOrder::Little => self.bytes(&v.to_le_bytes()),
            ByteOrder::Big => self.bytes(&v.to_be_bytes()),
        }
    }
}

#[inline]
fn check_len(buf: &[u8], expected: usize) -> Result<(), WireError> {
    if buf.len() != expected {
        return Err(WireError::LengthMismatch {
            expected,
            actual: buf.len(),
        });
    }
    Ok(())
}

// ── Codec ──────────────────────────────────────────────────────────────

/// Encoder/decoder for the four host records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WireCodec {
    pub byte_order: ByteOrder,
}

impl WireCodec {
    pub fn new(byte_order: ByteOrder) -> Self {
        Self { byte_order }
    }

    pub fn decode_contract(&self, buf: &[u8]) -> Result<ContractDescriptor, WireError> {
        check_len(buf, CONTRACT_LEN)?;
        let mut r = Reader::new(buf, self.byte_order);
        let kind_code = r.u32();
        let kind = OptionKind::from_code(kind_code).ok_or(WireError::InvalidField {
            field: "option_kind",
            value: kind_code,
        })?;
        let strike = r.u32();
        let spot = r.u32();
        let quantity = r.u32();
        let barrier = r.u32();
        let exercise_code = r.u32();
        let exercise = ExerciseStyle::from_code(exercise_code).ok_or(WireError::InvalidField {
            field: "exercise",
            value: exercise_code,
        })?;
        Ok(ContractDescriptor {
            kind,
            strike,
            spot,
            quantity,
            barrier,
            exercise,
            time_to_expiry: r.u32(),
            volatility: r.u32(),
        })
    }

    pub fn encode_contract(&self, c: &ContractDescriptor) -> [u8; CONTRACT_LEN] {
        let mut out = [0u8; CONTRACT_LEN];
        let mut w = Writer::new(&mut out, self.byte_order);
        w.u32(c.kind as u32);
        w.u32(c.strike);
        w.u32(c.spot);
        w.u32(c.quantity);
        w.u32(c.barrier);
        w.u32(c.exercise as u32);
        w.u32(c.time_to_expiry);
        w.u32(c.volatility);
        out
    }

    pub fn decode_settlement_result(&self, buf: &[u8]) -> Result<SettlementResult, WireError> {
        check_len(buf, SETTLEMENT_RESULT_LEN)?;
        let mut r = Reader::new(buf, self.byte_order);
        let payout = r.u64();
        let moneyness_code = r.u32();
        let moneyness = Moneyness::from_code(moneyness_code).ok_or(WireError::InvalidField {
            field: "moneyness",
            value: moneyness_code,
        })?;
        let barrier_hit = r.flag("barrier_hit")?;
        let profit_loss = r.u64();
        let sign_code = r.u32();
        let pnl_sign = PnlSign::from_code(sign_code).ok_or(WireError::InvalidField {
            field: "pnl_sign",
            value: sign_code,
        })?;
        let early_exercised = r.flag("early_exercised")?;
        Ok(SettlementResult {
            payout,
            moneyness,
            barrier_hit,
            profit_loss,
            pnl_sign,
            early_exercised,
        })
    }

    pub fn encode_settlement_result(&self, res: &SettlementResult) -> [u8; SETTLEMENT_RESULT_LEN] {
        let mut out = [0u8; SETTLEMENT_RESULT_LEN];
        let mut w = Writer::new(&mut out, self.byte_order);
        w.u64(res.payout);
        w.u32(res.moneyness as u32);
        w.u32(res.barrier_hit as u32);
        w.u64(res.profit_loss);
        w.u32(res.pnl_sign as u32);
        w.u32(res.early_exercised as u32);
        out
    }

    /// Only the length is checked here; field values are the validator's
    /// business.
    pub fn decode_purchase_request(&self, buf: &[u8]) -> Result<PurchaseRequest, WireError> {
        check_len(buf, PURCHASE_REQUEST_LEN)?;
        Ok(self.read_purchase_request(buf))
    }

    /// Decode a request whose length is already known to match. Every byte
    /// pattern is a valid request; field checks belong to the validator.
    pub(crate) fn read_purchase_request(&self, buf: &[u8]) -> PurchaseRequest {
        let mut r = Reader::new(buf, self.byte_order);
        PurchaseRequest {
            option_id: r.bytes::<OPTION_ID_LEN>(),
            buyer_pubkey: r.bytes::<PUBKEY_LEN>(),
            quantity: r.u64(),
            premium: r.u64(),
            strike: r.u64(),
            expiry: r.u64(),
            option_kind: r.u8(),
            spot: r.u64(),
            pool_balance: r.u64(),
        }
    }

    pub fn encode_purchase_request(&self, req: &PurchaseRequest) -> [u8; PURCHASE_REQUEST_LEN] {
        let mut out = [0u8; PURCHASE_REQUEST_LEN];
        let mut w = Writer::new(&mut out, self.byte_order);
        w.bytes(&req.option_id);
        w.bytes(&req.buyer_pubkey);
        w.u64(req.quantity);
        w.u64(req.premium);
        w.u64(req.strike);
        w.u64(req.expiry);
        w.u8(req.option_kind);
        w.u64(req.spot);
        w.u64(req.pool_balance);
        out
    }

    pub fn decode_purchase_record(&self, buf: &[u8]) -> Result<PurchaseRecord, WireError> {
        check_len(buf, PURCHASE_RECORD_LEN)?;
        let mut r = Reader::new(buf, self.byte_order);
        Ok(PurchaseRecord {
            purchase_id: r.bytes::<PURCHASE_ID_LEN>(),
            checksum: r.bytes::<CHECKSUM_LEN>(),
            max_payout: r.u64(),
        })
    }

    pub fn encode_purchase_record(&self, rec: &PurchaseRecord) -> [u8; PURCHASE_RECORD_LEN] {
        let mut out = [0u8; PURCHASE_RECORD_LEN];
        let mut w = Writer::new(&mut out, self.byte_order);
        w.bytes(&rec.purchase_id);
        w.bytes(&rec.checksum);
        w.u64(rec.max_payout);
        out
    }
}

// ── Tests ──────────────────────────────────────────────────────────────
