// ALICE-Option-Core — Integrity checksums and content fingerprints
// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Moroya Sakamoto

/// Length of a purchase integrity checksum.
pub const CHECKSUM_LEN: usize = 32;

const FNV32_OFFSET: u32 = 0x811c_9dc5;
const FNV32_PRIME: u32 = 0x0100_0193;

/// FNV-1a 64-bit (crate-internal content fingerprint).
#[inline(always)]
pub(crate) fn fnv1a(data: &[u8]) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for &b in data {
        h ^= b as u64;
        h = h.wrapping_mul(0x100000001b3);
    }
    h
}

/// Produces the 32-byte integrity checksum attached to a purchase record.
pub trait IntegrityHasher {
    fn checksum(&self, data: &[u8]) -> [u8; CHECKSUM_LEN];
}

/// Protocol checksum: FNV-1a 32-bit over the input, stretched to 32 bytes.
///
/// Each round emits the four state bytes low byte first, then remixes the
/// state as `h * prime + i`. Non-cryptographic; collisions are cheap to find,
/// so it must not guard real value transfer. See `Sha256Checksum`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fnv32Mix;

impl IntegrityHasher for Fnv32Mix {
    fn checksum(&self, data: &[u8]) -> [u8; CHECKSUM_LEN] {
        let mut h = FNV32_OFFSET;
        for &b in data {
            h ^= b as u32;
            h = h.wrapping_mul(FNV32_PRIME);
        }

        let mut out = [0u8; CHECKSUM_LEN];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = (h >> ((i % 4) * 8)) as u8;
            if i % 4 == 3 {
                h = h.wrapping_mul(FNV32_PRIME).wrapping_add(i as u32);
            }
        }
        out
    }
}

/// SHA-256 checksum for deployments that move real value.
#[cfg(feature = "sha2")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Checksum;

#[cfg(feature = "sha2")]
impl IntegrityHasher for Sha256Checksum {
    fn checksum(&self, data: &[u8]) -> [u8; CHECKSUM_LEN] {
        use sha2::{Digest, Sha256};
        Sha256::digest(data).into()
    }
}
