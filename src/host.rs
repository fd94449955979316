// ALICE-Option-Core — Host I/O boundary
// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Moroya Sakamoto

//! The guest program reads one input record and writes one output record.
//! Where those bytes live (memory-mapped addresses, a file, a test buffer) is
//! the adapter's concern; the drivers here only see [`HostIo`].

use tracing::debug;

use crate::checksum::IntegrityHasher;
use crate::contract::SettlementResult;
use crate::error::{HostError, WireError};
use crate::purchase::{PurchaseRecord, PurchaseValidator};
use crate::settlement::SettlementEvaluator;
use crate::wire::WireCodec;

/// Port to the host's input and output locations.
pub trait HostIo {
    /// Raw bytes at the input location.
    fn read_input(&self) -> &[u8];

    /// Replace the output with `bytes`. An empty slice is the zero-length
    /// output that legacy callers read as rejection.
    fn write_output(&mut self, bytes: &[u8]) -> Result<(), WireError>;
}

/// Adapter over caller-owned input and output buffers.
#[derive(Debug)]
pub struct BufferHost<'a> {
    input: &'a [u8],
    output: &'a mut [u8],
    written: usize,
}

impl<'a> BufferHost<'a> {
    pub fn new(input: &'a [u8], output: &'a mut [u8]) -> Self {
        Self {
            input,
            output,
            written: 0,
        }
    }

    /// Number of bytes in the last output write.
    #[inline]
    pub fn written(&self) -> usize {
        self.written
    }

    /// The bytes written by the last output write.
    #[inline]
    pub fn output(&self) -> &[u8] {
        &self.output[..self.written]
    }
}

impl HostIo for BufferHost<'_> {
    fn read_input(&self) -> &[u8] {
        self.input
    }

    fn write_output(&mut self, bytes: &[u8]) -> Result<(), WireError> {
        if bytes.len() > self.output.len() {
            self.written = 0;
            return Err(WireError::OutputTooSmall {
                required: bytes.len(),
                available: self.output.len(),
            });
        }
        self.output[..bytes.len()].copy_from_slice(bytes);
        self.written = bytes.len();
        Ok(())
    }
}

/// Decode a contract from the host, settle it, and write the encoded result.
///
/// An undecodable input produces zero-length output and the decode error.
pub fn run_settlement<H: HostIo>(
    host: &mut H,
    evaluator: &SettlementEvaluator,
    codec: &WireCodec,
) -> Result<SettlementResult, HostError> {
    let contract = match codec.decode_contract(host.read_input()) {
        Ok(c) => c,
        Err(e) => {
            debug!(error = %e, "settlement input rejected");
            host.write_output(&[])?;
            return Err(e.into());
        }
    };
    let result = evaluator.evaluate(&contract);
    host.write_output(&codec.encode_settlement_result(&result))?;
    Ok(result)
}

/// Validate the host's purchase request and write the encoded record.
///
/// The record is written with the validator's codec, so request and record
/// share one byte order. A rejection produces zero-length output; the typed
/// reason is returned to the caller.
pub fn run_purchase<H: HostIo, X: IntegrityHasher>(
    host: &mut H,
    validator: &PurchaseValidator<X>,
) -> Result<PurchaseRecord, HostError> {
    match validator.validate_bytes(host.read_input()) {
        Ok(record) => {
            host.write_output(&validator.codec().encode_purchase_record(&record))?;
            Ok(record)
        }
        Err(reason) => {
            host.write_output(&[])?;
            Err(reason.into())
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────
