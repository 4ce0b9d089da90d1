//! C4 — the matrix pipeline: AES-128-ECB-driven expansion of the public
//! matrix `A`, and the four LWE-style matrix products used by keygen,
//! encapsulation, and decapsulation.

use alloc::vec;
use alloc::vec::Vec;

use aes::cipher::{BlockEncrypt, KeyInit};
use aes::Aes128;

use crate::params::Params;

/// The 16-byte ECB input for one AES block of the `A` expansion: a
/// little-endian 32-bit `counter` in the first four bytes, zero elsewhere.
/// One block's ciphertext yields 8 consecutive 12-bit coefficients of a
/// row.
fn counter_block(counter: u32) -> aes::Block {
    let mut block = aes::Block::from([0u8; 16]);
    block[0..4].copy_from_slice(&counter.to_le_bytes());
    block
}

/// Expands `row_count` consecutive rows of `A` (each `n` coefficients wide,
/// `n` a multiple of 8) starting at `row_start`. Each row is covered by
/// `n / 8` AES blocks; block `b` of row `row_start + r` is keyed by the
/// counter `(row_start + r) * (n / 8) + b`, read back as 8 little-endian
/// `u16` coefficients. This uses AES-128 purely as a deterministic
/// pseudorandom generator keyed by the 16-byte matrix seed, never as an
/// authenticated cipher; every row is expanded independently.
fn expand_rows(seed_a: &[u8; 16], row_start: usize, row_count: usize, n: usize, out: &mut [u16]) {
    debug_assert_eq!(n % 8, 0, "row width must be a multiple of 8 coefficients");
    let cipher = Aes128::new(seed_a.into());
    let blocks_per_row = n / 8;

    for r in 0..row_count {
        for b in 0..blocks_per_row {
            let counter = ((row_start + r) * blocks_per_row + b) as u32;
            let mut block = counter_block(counter);
            cipher.encrypt_block(&mut block);
            let out_off = r * n + b * 8;
            for (i, pair) in block.chunks(2).enumerate() {
                out[out_off + i] = u16::from_le_bytes([pair[0], pair[1]]);
            }
        }
    }
}

/// `B = A·S + E` (keygen). `A` (shape `m x n`) is expanded from `seed_a` in
/// strides of 4 rows; `S` is `nbar x n`, `E`/`B` are `m x nbar`.
pub(crate) fn as_e(params: &Params, seed_a: &[u8; 16], matrix_s: &[i16], matrix_e: &[i16], matrix_b: &mut [u16]) {
    let (m, n, nbar) = (params.m, params.n, params.nbar);
    matrix_b.iter_mut().zip(matrix_e).for_each(|(b, &e)| *b = e as u16 & 0xFFF);

    let mut row_a = vec![0u16; 4 * n];
    let mut row_start = 0;
    while row_start < m {
        expand_rows(seed_a, row_start, 4, n, &mut row_a);
        for k in 0..nbar {
            for r in 0..4 {
                let mut acc = 0i32;
                for q in 0..n {
                    acc += i32::from(row_a[r * n + q]) * i32::from(matrix_s[k * n + q]);
                }
                let cell = &mut matrix_b[(row_start + r) * nbar + k];
                *cell = (*cell).wrapping_add(acc as u16) & 0xFFF;
            }
        }
        row_start += 4;
    }
}

/// `C1 = S'·A + E1` (encaps). `A` (shape `m x n`) is expanded from
/// `seed_a` in strides of up to 8 rows; `S'` is `mbar x m` and is
/// accumulated row-by-row into `C1` (`mbar x n`, pre-seeded with `E1`).
pub(crate) fn sa_e(params: &Params, seed_a: &[u8; 16], matrix_sp: &[i16], matrix_c1: &mut [i16]) {
    let (mbar, m, n) = (params.mbar, params.m, params.n);

    let mut row_a = vec![0u16; 8 * n];
    let mut row_start = 0;
    while row_start < m {
        let rows = core::cmp::min(8, m - row_start);
        expand_rows(seed_a, row_start, rows, n, &mut row_a);
        for j in 0..mbar {
            for r in 0..rows {
                let row = row_start + r;
                let s_val = i32::from(matrix_sp[j * m + row]);
                for q in 0..n {
                    let idx = j * n + q;
                    matrix_c1[idx] = (i32::from(matrix_c1[idx]) + s_val * i32::from(row_a[r * n + q])) as i16;
                }
            }
        }
        row_start += rows;
    }
}

/// `C2 = S'·B + E2` (encaps). Plain matrix product, no AES involved since
/// `B` is already materialized from the public key.
pub(crate) fn sb_e(params: &Params, matrix_sp: &[i16], matrix_b: &[u16], matrix_e2: &[i16], matrix_c2: &mut [u16]) {
    let (mbar, nbar, m) = (params.mbar, params.nbar, params.m);
    for i in 0..mbar {
        for j in 0..nbar {
            let mut acc = i32::from(matrix_e2[i * nbar + j]);
            for k in 0..m {
                acc += i32::from(matrix_sp[i * m + k]) * i32::from(matrix_b[k * nbar + j]);
            }
            matrix_c2[i * nbar + j] = (acc as u16) & 0xFFF;
        }
    }
}

/// `D = C1·S` (decaps). Plain matrix product.
pub(crate) fn cs(params: &Params, matrix_c1: &[u16], matrix_s: &[i16], matrix_d: &mut [u16]) {
    let (mbar, nbar, n) = (params.mbar, params.nbar, params.n);
    matrix_d.iter_mut().for_each(|d| *d = 0);
    for i in 0..mbar {
        for j in 0..nbar {
            let mut acc = 0i32;
            for k in 0..n {
                acc += i32::from(matrix_c1[i * n + k]) * i32::from(matrix_s[j * n + k]);
            }
            matrix_d[i * nbar + j] = (acc as u16) & 0xFFF;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::PARAMS_128;

    #[test]
    fn as_e_produces_masked_coefficients() {
        let seed_a = [3u8; 16];
        let s = vec![1i16; PARAMS_128.n * PARAMS_128.nbar];
        let e = vec![0i16; PARAMS_128.m * PARAMS_128.nbar];
        let mut b = vec![0u16; PARAMS_128.m * PARAMS_128.nbar];
        as_e(&PARAMS_128, &seed_a, &s, &e, &mut b);
        assert!(b.iter().all(|&v| v < 4096));
    }

    #[test]
    fn counter_block_places_a_little_endian_32_bit_counter_first() {
        let block = counter_block(0x0102_0304);
        assert_eq!(block[0], 0x04);
        assert_eq!(block[1], 0x03);
        assert_eq!(block[2], 0x02);
        assert_eq!(block[3], 0x01);
        assert!(block[4..].iter().all(|&b| b == 0));
    }

    // Regression guard for the AES-PRG layout: each 16-byte ECB input must
    // hold a single 32-bit counter `(row_start + r) * (n / 8) + b`, not a
    // per-coefficient index. This re-derives the expected ciphertext for
    // every block directly (independently of `expand_rows`'s internals) and
    // checks it against the real output, so reverting to a per-coefficient
    // layout fails this test even without reference KAT bytes.
    #[test]
    fn expand_rows_keys_each_block_by_row_major_counter() {
        let seed_a = [7u8; 16];
        let n = 16; // two 8-wide blocks per row
        let row_start = 3;
        let row_count = 2;
        let mut out = vec![0u16; row_count * n];
        expand_rows(&seed_a, row_start, row_count, n, &mut out);

        let cipher = Aes128::new((&seed_a).into());
        let blocks_per_row = n / 8;
        for r in 0..row_count {
            for b in 0..blocks_per_row {
                let counter = ((row_start + r) * blocks_per_row + b) as u32;
                let mut expected = counter_block(counter);
                cipher.encrypt_block(&mut expected);
                let want: Vec<u16> =
                    expected.chunks(2).map(|p| u16::from_le_bytes([p[0], p[1]])).collect();
                let got = &out[r * n + b * 8..r * n + b * 8 + 8];
                assert_eq!(got, want.as_slice());
            }
        }
    }
}
