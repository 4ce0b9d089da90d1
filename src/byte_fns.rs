//! C2 — byte packing for every wire representation: the public-key matrix
//! `B`, the ternary secret `S`, and the two ciphertext components `C1`/`C2`
//! (whose bit widths are level-specific).

use alloc::vec;
use alloc::vec::Vec;

/// Packs `values` as a contiguous, LSB-first bitstream of `bit_width`-bit
/// fields: value `i`'s bits occupy global bits `[i*bit_width, (i+1)*bit_width)`,
/// split into bytes low-bit-first. Used for the public key's 12-bit
/// coefficient pairs and, where a level's ciphertext component shares that
/// width, for `C1`/`C2` too. Handles a ragged tail (a value count not a
/// multiple of the byte/field ratio) by simply leaving the unused high bits
/// of the final byte zero.
pub(crate) fn pack_bits_lsb(values: &[u16], bit_width: u32) -> Vec<u8> {
    let total_bits = values.len() * bit_width as usize;
    let mut out = vec![0u8; (total_bits + 7) / 8];
    let mut bit_pos = 0usize;
    for &v in values {
        for b in 0..bit_width {
            if (v >> b) & 1 == 1 {
                out[(bit_pos + b as usize) / 8] |= 1 << ((bit_pos + b as usize) % 8);
            }
        }
        bit_pos += bit_width as usize;
    }
    out
}

/// Inverse of [`pack_bits_lsb`]: recovers `count` `bit_width`-bit fields
/// from a contiguous LSB-first bitstream.
pub(crate) fn unpack_bits_lsb(bytes: &[u8], bit_width: u32, count: usize) -> Vec<u16> {
    let mut out = vec![0u16; count];
    let mut bit_pos = 0usize;
    for v in &mut out {
        let mut field = 0u16;
        for b in 0..bit_width {
            let byte = bytes[(bit_pos + b as usize) / 8];
            if (byte >> ((bit_pos + b as usize) % 8)) & 1 == 1 {
                field |= 1 << b;
            }
        }
        *v = field;
        bit_pos += bit_width as usize;
    }
    out
}

/// Packs `values` (each holding `8 + high_bits` significant bits) as two
/// byte planes: one low byte per value, followed by the high `high_bits`
/// bits of every `8 / high_bits` values accumulated MSB-first into a single
/// trailer byte. Used by the ciphertext components whose coefficient width
/// exceeds a byte by one or two bits.
pub(crate) fn pack_low_high(values: &[u16], high_bits: u32) -> Vec<u8> {
    let group = 8 / high_bits as usize;
    let mut out = vec![0u8; values.len() + values.len() / group];
    for (i, &v) in values.iter().enumerate() {
        out[i] = v as u8;
    }
    let high_mask = (1u16 << high_bits) - 1;
    for (i, group_vals) in values.chunks(group).enumerate() {
        let mut trailer = 0u8;
        for &v in group_vals {
            trailer = (trailer << high_bits) | (((v >> 8) & high_mask) as u8);
        }
        out[values.len() + i] = trailer;
    }
    out
}

/// Inverse of [`pack_low_high`].
pub(crate) fn unpack_low_high(bytes: &[u8], high_bits: u32, count: usize) -> Vec<u16> {
    let group = 8 / high_bits as usize;
    let mut out = vec![0u16; count];
    for i in 0..count {
        out[i] = u16::from(bytes[i]);
    }
    let high_mask: u32 = ((1u32 << high_bits) - 1) << 8;
    for (i, group_vals) in out.chunks_mut(group).enumerate() {
        let trailer = u32::from(bytes[count + i]);
        for (k, v) in group_vals.iter_mut().enumerate() {
            let shift = high_bits * (k as u32 + 1);
            *v |= ((trailer << shift) & high_mask) as u16;
        }
    }
    out
}

/// Packs the public matrix `B` (`m * nbar` 12-bit coefficients) into
/// `Pack-PK`'s wire form: pairs of coefficients packed into 3 bytes.
pub(crate) fn pack_pk(matrix_b: &[u16]) -> Vec<u8> {
    pack_bits_lsb(matrix_b, 12)
}

/// Inverse of [`pack_pk`].
pub(crate) fn unpack_pk(bytes: &[u8], count: usize) -> Vec<u16> {
    unpack_bits_lsb(bytes, 12, count)
}

/// Packs the ternary secret `S` (`n * nbar` entries in `{-1, 0, 1}`) as
/// 2-bit signed fields, four per byte.
pub(crate) fn pack_sk(matrix_s: &[i16]) -> Vec<u8> {
    let mut out = vec![0u8; (matrix_s.len() + 3) / 4];
    for (chunk_idx, chunk) in matrix_s.chunks(4).enumerate() {
        let mut byte = 0u8;
        for (j, &v) in chunk.iter().enumerate() {
            byte |= ((v as u8) & 0x3) << (2 * j);
        }
        out[chunk_idx] = byte;
    }
    out
}

/// Inverse of [`pack_sk`]; sign-extends each 2-bit field back to `i16`.
pub(crate) fn unpack_sk(bytes: &[u8], count: usize) -> Vec<i16> {
    let mut out = vec![0i16; count];
    for (byte_idx, &byte) in bytes.iter().enumerate() {
        for j in 0..4 {
            let idx = byte_idx * 4 + j;
            if idx >= count {
                break;
            }
            let field = (byte >> (2 * j)) & 0x3;
            out[idx] = (((field << 14) as i16) >> 14) as i16;
        }
    }
    out
}

/// Packs ciphertext component `C1` (`mbar * n` coefficients, `logq1` bits
/// wide). `logq1` is 9 at P128 (low byte + 1 high bit), 12 at P192 (plain
/// 12-bit pairs, same layout as `Pack-PK`), or 10 at P256 (low byte + 2
/// high bits).
pub(crate) fn pack_c1(matrix_c1: &[u16], logq1: u32) -> Vec<u8> {
    match logq1 {
        9 => pack_low_high(matrix_c1, 1),
        12 => pack_bits_lsb(matrix_c1, 12),
        10 => pack_low_high(matrix_c1, 2),
        _ => unreachable!("logq1 is always 9, 10, or 12"),
    }
}

/// Inverse of [`pack_c1`].
pub(crate) fn unpack_c1(bytes: &[u8], logq1: u32, count: usize) -> Vec<u16> {
    match logq1 {
        9 => unpack_low_high(bytes, 1, count),
        12 => unpack_bits_lsb(bytes, 12, count),
        10 => unpack_low_high(bytes, 2, count),
        _ => unreachable!("logq1 is always 9, 10, or 12"),
    }
}

/// Packs ciphertext component `C2` (`mbar * nbar` coefficients, `logq2`
/// bits wide). `logq2` is 7 at P128/P256 (contiguous 7-bit LSB bitstream,
/// possibly with a ragged tail at P256) or 10 at P192 (low byte + 2 high
/// bits, same layout as `C1` at P256).
pub(crate) fn pack_c2(matrix_c2: &[u16], logq2: u32) -> Vec<u8> {
    match logq2 {
        7 => pack_bits_lsb(matrix_c2, 7),
        10 => pack_low_high(matrix_c2, 2),
        _ => unreachable!("logq2 is always 7 or 10"),
    }
}

/// Inverse of [`pack_c2`].
pub(crate) fn unpack_c2(bytes: &[u8], logq2: u32, count: usize) -> Vec<u16> {
    match logq2 {
        7 => unpack_bits_lsb(bytes, 7, count),
        10 => unpack_low_high(bytes, 2, count),
        _ => unreachable!("logq2 is always 7 or 10"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pk_pairs_round_trip() {
        let values: Vec<u16> = (0..64).map(|i| (i * 37) % 4096).collect();
        let packed = pack_pk(&values);
        assert_eq!(packed.len(), values.len() * 3 / 2);
        let unpacked = unpack_pk(&packed, values.len());
        assert_eq!(values, unpacked);
    }

    #[test]
    fn sk_ternary_round_trip() {
        let values: Vec<i16> = (0..64).map(|i| [-1i16, 0, 1][i % 3]).collect();
        let packed = pack_sk(&values);
        let unpacked = unpack_sk(&packed, values.len());
        assert_eq!(values, unpacked);
    }

    #[test]
    fn c1_round_trips_at_every_width() {
        for logq1 in [9u32, 10, 12] {
            let bound = 1u16 << logq1;
            let values: Vec<u16> = (0..32).map(|i| (i as u16 * 7) % bound).collect();
            let packed = pack_c1(&values, logq1);
            let unpacked = unpack_c1(&packed, logq1, values.len());
            assert_eq!(values, unpacked);
        }
    }

    #[test]
    fn c2_round_trips_at_every_width() {
        for logq2 in [7u32, 10] {
            let bound = 1u16 << logq2;
            let values: Vec<u16> = (0..36).map(|i| (i as u16 * 11) % bound).collect();
            let packed = pack_c2(&values, logq2);
            let unpacked = unpack_c2(&packed, logq2, values.len());
            assert_eq!(values, unpacked);
        }
    }

    #[test]
    fn c2_handles_a_ragged_tail() {
        // mbar * nbar = 132 at P256 isn't a multiple of 8, so the 7-bit
        // bitstream ends mid-byte; this must still round-trip exactly.
        let values: Vec<u16> = (0..132).map(|i| (i as u16 * 3) % 128).collect();
        let packed = pack_c2(&values, 7);
        assert_eq!(packed.len(), 116);
        let unpacked = unpack_c2(&packed, 7, values.len());
        assert_eq!(values, unpacked);
    }
}
