use alloc::boxed::Box;

use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Digest, Sha3_256, Sha3_512, Shake256};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::params::MOD_Q_MASK;

/// `SHAKE-256(input)`, squeezed to exactly `out.len()` bytes.
pub(crate) fn shake256(input: &[u8], out: &mut [u8]) {
    let mut hasher = Shake256::default();
    hasher.update(input);
    let mut reader = hasher.finalize_xof();
    reader.read(out);
}

/// `SHA3-256(input)`.
pub(crate) fn sha3_256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    hasher.update(input);
    hasher.finalize().into()
}

/// `SHA3-512(a ‖ b)`, split by the caller into the two halves it needs.
pub(crate) fn sha3_512_concat(a: &[u8], b: &[u8]) -> [u8; 64] {
    let mut hasher = Sha3_512::new();
    hasher.update(a);
    hasher.update(b);
    hasher.finalize().into()
}

/// A resumable SHAKE-256 squeeze used by the fixed-weight samplers, which
/// must extend the same XOF state by another 680-byte block whenever a
/// 680-byte block of candidates is exhausted before a row is filled.
pub(crate) struct SqueezeState {
    reader: Box<dyn XofReader>,
}

impl SqueezeState {
    pub(crate) fn new(seed: &[u8]) -> Self {
        let mut hasher = Shake256::default();
        hasher.update(seed);
        SqueezeState { reader: Box::new(hasher.finalize_xof()) }
    }

    pub(crate) fn squeeze(&mut self, out: &mut [u8]) {
        self.reader.read(out);
    }
}

/// Elementwise modular addition, masking every result to 12 bits.
pub(crate) fn add_mod(a: &[u16], b: &[u16], out: &mut [u16]) {
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = x.wrapping_add(y) & MOD_Q_MASK;
    }
}

/// Elementwise modular subtraction, masking every result to 12 bits.
pub(crate) fn sub_mod(a: &[u16], b: &[u16], out: &mut [u16]) {
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = x.wrapping_sub(y) & MOD_Q_MASK;
    }
}

/// Constant-time equality over two equal-length byte slices. Returns a
/// [`Choice`] rather than a bare bool so callers route the result through
/// [`subtle::ConditionallySelectable`] instead of branching on it.
pub(crate) fn ct_eq(a: &[u8], b: &[u8]) -> Choice {
    a.ct_eq(b)
}

/// Selects between two equal-length byte buffers without branching on
/// `choice`, writing the result into `out`.
pub(crate) fn ct_select(out: &mut [u8], a: &[u8], b: &[u8], choice: Choice) {
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = u8::conditional_select(&x, &y, choice);
    }
}

/// Compresses one 12-bit coefficient down to `logqt` bits: `round((x <<
/// logqt) / q)`, ties away from zero, except for `C2` compression (every
/// security level, at whatever `logqt` that level uses), which instead
/// breaks ties toward even by decrementing the quotient whenever the scaled
/// remainder is exactly `3 * (q/2)` — the one asymmetric rounding rule the
/// wire format needs.
#[must_use]
pub(crate) fn compress(x: u16, logqt: u32, round_half_to_odd: bool) -> u16 {
    let scaled = (u32::from(x) << logqt) + 2048;
    let mut quotient = scaled >> 12;
    if round_half_to_odd && scaled % 6144 == 0 {
        quotient -= 1;
    }
    (quotient & ((1 << logqt) - 1)) as u16
}

/// Decompresses one `logqt`-bit coefficient back to 12 bits: `round((y *
/// q) / 2^logqt)`.
#[must_use]
pub(crate) fn decompress(y: u16, logqt: u32) -> u16 {
    let numerator = (u32::from(y) << 12) + (1 << (logqt - 1));
    ((numerator >> logqt) & MOD_Q_MASK as u32) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shake256_is_deterministic() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        shake256(b"seed", &mut a);
        shake256(b"seed", &mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn ct_select_picks_correctly() {
        let a = [1u8, 2, 3];
        let b = [4u8, 5, 6];
        let mut out = [0u8; 3];
        ct_select(&mut out, &a, &b, Choice::from(0));
        assert_eq!(out, a);
        ct_select(&mut out, &a, &b, Choice::from(1));
        assert_eq!(out, b);
    }

    #[test]
    fn compress_then_decompress_stays_close() {
        for x in [0u16, 1, 4095, 2048, 17] {
            let c = compress(x, 7, false);
            assert!(c < 128);
            let d = decompress(c, 7);
            assert!(d < 4096);
        }
    }

    // Regression guard for round-half-to-odd at P192's 10-bit C2
    // compression: x=4 sits exactly on a tie (scaled remainder is
    // `3 * (q/2)`), so the two rounding modes must disagree here. The
    // caller always passes `round_half_to_odd = true` for C2 at every
    // level, including P192's `logqt = 10`, not just P128/P256's 7.
    #[test]
    fn compress_breaks_p192_c2_ties_toward_even() {
        assert_eq!(compress(4, 10, false), 1);
        assert_eq!(compress(4, 10, true), 0);
    }
}
