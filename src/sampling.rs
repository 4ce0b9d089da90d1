use alloc::vec;
use alloc::vec::Vec;

use crate::helpers::SqueezeState;
use crate::params::{Params, SampleKind};

/// CBD for η=1: two bits per coefficient, no SWAR needed.
fn cbd1(input: &[u8], out: &mut [i16]) {
    for (byte_idx, &byte) in input.iter().enumerate() {
        let mut b = byte;
        for j in 0..4 {
            let b0 = i16::from(b & 1);
            let b1 = i16::from((b >> 1) & 1);
            out[byte_idx * 4 + j] = b0 - b1;
            b >>= 2;
        }
    }
}

/// CBD for η=2, using the SWAR popcount-pair trick on nibble pairs.
fn cbd2(input: &[u8], out: &mut [i16]) {
    for (byte_idx, &byte) in input.iter().enumerate() {
        let mut b = u32::from(byte) & 0x55;
        b += (u32::from(byte) >> 1) & 0x55;
        out[byte_idx * 2] = i16::try_from((b & 0x3) as i32 - ((b >> 2) & 0x3) as i32).unwrap();
        out[byte_idx * 2 + 1] =
            i16::try_from(((b >> 4) & 0x3) as i32 - ((b >> 6) & 0x3) as i32).unwrap();
    }
}

/// CBD for η=3, operating on 32-bit little-endian words (4 coefficients
/// per word) via an interleaved 3-bit popcount mask.
fn cbd3(input: &[u8], out: &mut [i16]) {
    for (word_idx, chunk) in input.chunks(3).enumerate() {
        let mut word = u32::from(chunk[0]) | (u32::from(chunk[1]) << 8) | (u32::from(chunk[2]) << 16);
        let mut b = word & 0x0024_9249;
        b += (word >> 1) & 0x0024_9249;
        b += (word >> 2) & 0x0024_9249;
        for i in 0..4 {
            out[word_idx * 4 + i] = i16::try_from(
                ((b >> (6 * i)) & 0x7) as i32 - ((b >> (6 * i + 3)) & 0x7) as i32,
            )
            .unwrap();
        }
        let _ = &mut word;
    }
}

/// CBD for η=7, operating on 64-bit little-endian words (4 coefficients
/// per word) via an interleaved 7-bit popcount mask.
fn cbd7(input: &[u8], out: &mut [i16]) {
    for (word_idx, chunk) in input.chunks(7).enumerate() {
        let mut word = 0u64;
        for (i, &byte) in chunk.iter().enumerate() {
            word |= u64::from(byte) << (8 * i);
        }
        let mut b = word & 0x0002_0408_1020_4081;
        for shift in 1..7 {
            b += (word >> shift) & 0x0002_0408_1020_4081;
        }
        for i in 0..4 {
            out[word_idx * 4 + i] = i16::try_from(
                ((b >> (14 * i)) & 0x7F) as i32 - ((b >> (14 * i + 7)) & 0x7F) as i32,
            )
            .unwrap();
        }
        let _ = &mut word;
    }
}

/// Samples the `m * nbar`-entry secret-noise matrix `E` for keygen, drawing
/// from `CBD_{eta1}` over a SHAKE256 stream keyed by `seed`.
pub(crate) fn sample_eta1(params: &Params, seed: &[u8], matrix_e: &mut [i16]) {
    let count = params.m * params.nbar;
    let byte_len = (count * 2 * params.eta1 as usize) / 8;
    let mut bytes = vec![0u8; byte_len];
    let mut squeeze = SqueezeState::new(seed);
    squeeze.squeeze(&mut bytes);

    match params.eta1 {
        2 => cbd2(&bytes, matrix_e),
        3 => cbd3(&bytes, matrix_e),
        7 => cbd7(&bytes, matrix_e),
        _ => unreachable!("eta1 is always 2, 3, or 7"),
    }
}

/// Samples the two encaps-side noise matrices `E1` (`mbar * n`) and `E2`
/// (`mbar * nbar`) from a single concatenated SHAKE256 stream keyed by
/// `seed`. `E2`'s byte length rounds up, matching its potentially-odd bit
/// count.
pub(crate) fn sample_eta2(params: &Params, seed: &[u8], matrix_e1: &mut [i16], matrix_e2: &mut [i16]) {
    let count1 = params.mbar * params.n;
    let count2 = params.mbar * params.nbar;
    let hash1_len = (count1 * 2 * params.eta2 as usize) / 8;
    let hash2_len = (count2 * 2 * params.eta2 as usize + 7) / 8;

    let mut bytes = vec![0u8; hash1_len + hash2_len];
    let mut squeeze = SqueezeState::new(seed);
    squeeze.squeeze(&mut bytes);
    let (bytes1, bytes2) = bytes.split_at(hash1_len);

    match params.eta2 {
        1 => {
            cbd1(bytes1, matrix_e1);
            cbd1(bytes2, matrix_e2);
        }
        2 => {
            cbd2(bytes1, matrix_e1);
            cbd2(bytes2, matrix_e2);
        }
        7 => {
            cbd7(bytes1, matrix_e1);
            cbd7(bytes2, matrix_e2);
        }
        _ => unreachable!("eta2 is always 1, 2, or 7"),
    }
}

/// Size, in bytes, of one re-squeezable candidate block shared by
/// `sample_psi`/`sample_phi`.
const CANDIDATE_BLOCK_LEN: usize = 680;

/// Reads a little-endian `u64` starting at byte `off`, treating bytes past
/// `block`'s end as zero so strides near the tail of a block never panic.
fn load_u64_le(block: &[u8], off: usize) -> u64 {
    let mut word = 0u64;
    for i in 0..8 {
        if let Some(&b) = block.get(off + i) {
            word |= u64::from(b) << (8 * i);
        }
    }
    word
}

/// Decodes the first `mnin` bytes of a 680-byte candidate block into a
/// vector of unbiased candidates in `[0, bound)`, using the same
/// overlapping byte/bit strides as the reference word-width and digit
/// radix for the security level's sample kind.
fn decode_candidates(kind: SampleKind, block: &[u8], mnin: usize, bound: usize) -> Vec<usize> {
    let mut out = Vec::new();
    let block = &block[..mnin];
    match kind {
        SampleKind::Base600 => {
            for stride in block.chunks(7) {
                if stride.len() < 7 {
                    continue;
                }
                for &byte_off in &[0usize, 3] {
                    let word = u32::from(stride[byte_off])
                        | (u32::from(stride[byte_off + 1]) << 8)
                        | (u32::from(stride[byte_off + 2]) << 16)
                        | (u32::from(stride[byte_off + 3]) << 24);
                    let shifted = if byte_off == 3 { word >> 4 } else { word };
                    let tmp = u64::from(shifted & 0xFFF_FFFF);
                    if tmp >= 216_000_000 {
                        continue;
                    }
                    for digit in [tmp % 600, (tmp / 600) % 600, (tmp / 360_000) % 600] {
                        let d = digit as usize;
                        if d < bound {
                            out.push(d);
                        }
                    }
                }
            }
        }
        SampleKind::Mask11 => {
            // 11 bytes yield 8 overlapping 11-bit fields, each read from a
            // 16- or 32-bit little-endian load at a specific byte offset.
            for stride in block.chunks(11) {
                if stride.len() < 11 {
                    continue;
                }
                let w16 = |off: usize| u32::from(stride[off]) | (u32::from(stride[off + 1]) << 8);
                let w32 = |off: usize| {
                    u32::from(stride[off])
                        | (u32::from(stride[off + 1]) << 8)
                        | (u32::from(stride[off + 2]) << 16)
                        | (u32::from(stride[off + 3]) << 24)
                };
                let fields = [
                    w16(0) & 0x7FF,
                    (w16(1) >> 3) & 0x7FF,
                    (w32(2) >> 6) & 0x7FF,
                    (w16(4) >> 1) & 0x7FF,
                    (w16(5) >> 4) & 0x7FF,
                    (w32(6) >> 7) & 0x7FF,
                    (w16(8) >> 2) & 0x7FF,
                    (w16(9) >> 5) & 0x7FF,
                ];
                for field in fields {
                    let d = field as usize;
                    if d < bound {
                        out.push(d);
                    }
                }
            }
        }
        SampleKind::Base1120 => {
            // 13 overlapping 51-byte strides yield 8 values each (51-bit
            // fields at byte offsets 0/6/12/19/25/31/38/44, progressively
            // shifted), followed by one 17-byte tail stride yielding 2 more.
            let full_strides = block.len() / 51;
            for i in 0..full_strides {
                let base = i * 51;
                let words = [
                    load_u64_le(block, base) & 0x7_FFFF_FFFF_FFFF,
                    (load_u64_le(block, base + 6) >> 3) & 0x7_FFFF_FFFF_FFFF,
                    (load_u64_le(block, base + 12) >> 6) & 0x7_FFFF_FFFF_FFFF,
                    (load_u64_le(block, base + 19) >> 1) & 0x7_FFFF_FFFF_FFFF,
                    (load_u64_le(block, base + 25) >> 4) & 0x7_FFFF_FFFF_FFFF,
                    (load_u64_le(block, base + 31) >> 7) & 0x7_FFFF_FFFF_FFFF,
                    (load_u64_le(block, base + 38) >> 2) & 0x7_FFFF_FFFF_FFFF,
                    (load_u64_le(block, base + 44) >> 5) & 0x7_FFFF_FFFF_FFFF,
                ];
                for tmp in words {
                    if tmp >= 1_762_341_683_200_000 {
                        continue;
                    }
                    let digits = [
                        tmp % 1120,
                        (tmp / 1120) % 1120,
                        (tmp / 1_254_400) % 1120,
                        (tmp / 1_404_928_000) % 1120,
                        (tmp / 1_573_519_360_000) % 1120,
                    ];
                    for digit in digits {
                        let d = digit as usize;
                        if d < bound {
                            out.push(d);
                        }
                    }
                }
            }
            let tail = full_strides * 51;
            let words = [
                load_u64_le(block, tail) & 0x7_FFFF_FFFF_FFFF,
                (load_u64_le(block, tail + 6) >> 3) & 0x7_FFFF_FFFF_FFFF,
            ];
            for tmp in words {
                if tmp >= 1_762_341_683_200_000 {
                    continue;
                }
                let digits = [
                    tmp % 1120,
                    (tmp / 1120) % 1120,
                    (tmp / 1_254_400) % 1120,
                    (tmp / 1_404_928_000) % 1120,
                    (tmp / 1_573_519_360_000) % 1120,
                ];
                for digit in digits {
                    let d = digit as usize;
                    if d < bound {
                        out.push(d);
                    }
                }
            }
        }
    }
    out
}

/// Draws a fixed-weight ternary row of length `row_len` with exactly
/// `weight` entries each of `+1` and `-1`, consuming unbiased location
/// candidates from a resumable SHAKE256 stream, re-squeezing another
/// 680-byte block whenever the current one is exhausted.
fn sample_fixed_weight_row(
    params: &Params, squeeze: &mut SqueezeState, row_len: usize, weight: usize, row: &mut [i16],
) {
    row.iter_mut().for_each(|v| *v = 0);
    let mut block = [0u8; CANDIDATE_BLOCK_LEN];
    squeeze.squeeze(&mut block);
    let mut candidates = decode_candidates(params.sample_kind, &block, params.mnin, row_len);
    let mut cand_idx = 0usize;
    let mut filled = 0usize;
    let mut parity = 0usize;

    while filled < 2 * weight {
        if cand_idx == candidates.len() {
            squeeze.squeeze(&mut block);
            candidates = decode_candidates(params.sample_kind, &block, params.mnin, row_len);
            cand_idx = 0;
        }
        let location = candidates[cand_idx];
        cand_idx += 1;
        if row[location] == 0 {
            row[location] = if parity & 1 == 0 { 1 } else { -1 };
            parity += 1;
            filled += 1;
        }
    }
}

/// Samples the secret matrix `S` (`nbar` rows of length `n`, `h1` each of
/// `+1`/`-1` per row) from `seed`.
pub(crate) fn sample_psi(params: &Params, seed: &[u8], matrix_s: &mut [i16]) {
    let mut squeeze = SqueezeState::new(seed);
    for row in matrix_s.chunks_mut(params.n) {
        sample_fixed_weight_row(params, &mut squeeze, params.n, params.h1, row);
    }
}

/// Samples the secret matrix `S'` (`mbar` rows of length `m`, `h2` each of
/// `+1`/`-1` per row) from `seed`.
pub(crate) fn sample_phi(params: &Params, seed: &[u8], matrix_sp: &mut [i16]) {
    let mut squeeze = SqueezeState::new(seed);
    for row in matrix_sp.chunks_mut(params.m) {
        sample_fixed_weight_row(params, &mut squeeze, params.m, params.h2, row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cbd_outputs_stay_in_range() {
        let eta_cases: [(fn(&[u8], &mut [i16]), u8); 3] = [(cbd2, 2), (cbd3, 3), (cbd7, 7)];
        for (f, eta) in eta_cases {
            let input = [0xFFu8; 64];
            let mut out = [0i16; 16];
            f(&input, &mut out);
            for v in out {
                assert!(v.unsigned_abs() <= u16::from(eta));
            }
        }
    }

    #[test]
    fn fixed_weight_row_has_exact_weight() {
        use crate::params::PARAMS_128;
        let seed = [7u8; 32];
        let mut squeeze = SqueezeState::new(&seed);
        let mut row = vec![0i16; PARAMS_128.n];
        sample_fixed_weight_row(&PARAMS_128, &mut squeeze, PARAMS_128.n, PARAMS_128.h1, &mut row);
        let ones = row.iter().filter(|&&v| v == 1).count();
        let neg_ones = row.iter().filter(|&&v| v == -1).count();
        assert_eq!(ones, PARAMS_128.h1);
        assert_eq!(neg_ones, PARAMS_128.h1);
    }
}
