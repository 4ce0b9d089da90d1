//! C6 — Barnes-Wall BW32 message codec.
//!
//! `msg_encode`/`msg_decode` map 8-byte message chunks onto/from length-16
//! vectors of Gaussian integers via a Kronecker-style recursive labelling,
//! and recover them from a noisy received vector via bounded-distance
//! decoding (BDD) over the same recursive lattice structure.

use crate::params::{Params, BW_COMPLEX_LEN};

/// A Gaussian integer, the coefficient domain of the BW32 lattice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Complex {
    pub real: i32,
    pub imag: i32,
}

impl Complex {
    const fn new(real: i32, imag: i32) -> Self {
        Complex { real, imag }
    }

    fn add(self, rhs: Self) -> Self {
        Complex::new(self.real + rhs.real, self.imag + rhs.imag)
    }

    fn sub(self, rhs: Self) -> Self {
        Complex::new(self.real - rhs.real, self.imag - rhs.imag)
    }

    fn mul(self, rhs: Self) -> Self {
        Complex::new(
            self.real * rhs.real - self.imag * rhs.imag,
            self.real * rhs.imag + self.imag * rhs.real,
        )
    }

    /// `self / (1 + i) = self * (1 - i) / 2`, exact whenever `self` lies on
    /// the Gaussian-integer sublattice produced by the forward labelling.
    fn div_phi(self) -> Self {
        Complex::new((self.real + self.imag) >> 1, (self.imag - self.real) >> 1)
    }
}

const PHI: Complex = Complex::new(1, 1);

/// Rounds `value` to the nearest multiple of `1 << (logq - tau)`, ties away
/// from zero, then re-scales back up by `1 << tau` so the result sits on the
/// `logq`-bit coefficient grid.
fn round(value: i32, logq: u32, tau: u32) -> i32 {
    let modulus = 1i32 << (logq - tau);
    let half = modulus >> 1;
    let rem = value.rem_euclid(modulus);
    let q = if rem >= half { value.div_euclid(modulus) + 1 } else { value.div_euclid(modulus) };
    q << tau
}

fn euclidean_distance_no_sqrt(a: &[Complex], b: &[Complex]) -> i64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let dr = i64::from(x.real - y.real);
            let di = i64::from(x.imag - y.imag);
            dr * dr + di * di
        })
        .sum()
}

/// Bounded-distance decode over a length-`bw_n` Barnes-Wall block. The base
/// case is a single complex pair rounded independently per coordinate; the
/// recursive case splits into two half-length blocks, decodes each plus a
/// "folded" correction, and keeps whichever of the two resulting full-length
/// candidates sits closer to `t` under squared Euclidean distance (ties
/// favor the second candidate).
fn bdd_for_bw_n(t: &[Complex], logq: u32, tau: u32, out: &mut [Complex]) {
    let bw_n = t.len();
    if bw_n == 2 {
        out[0] = Complex::new(round(t[0].real, logq, tau), round(t[0].imag, logq, tau));
        out[1] = Complex::new(round(t[1].real, logq, tau), round(t[1].imag, logq, tau));
        return;
    }

    let half = bw_n / 2;
    let (t1, t2) = t.split_at(half);

    let mut y1 = alloc::vec![Complex::default(); half];
    let mut y2 = alloc::vec![Complex::default(); half];
    bdd_for_bw_n(t1, logq, tau, &mut y1);
    bdd_for_bw_n(t2, logq, tau, &mut y2);

    let z1_in: alloc::vec::Vec<Complex> =
        (0..half).map(|i| t2[i].sub(y1[i]).div_phi()).collect();
    let z2_in: alloc::vec::Vec<Complex> =
        (0..half).map(|i| t1[i].sub(y2[i]).div_phi()).collect();

    let mut z1 = alloc::vec![Complex::default(); half];
    let mut z2 = alloc::vec![Complex::default(); half];
    bdd_for_bw_n(&z1_in, logq, tau, &mut z1);
    bdd_for_bw_n(&z2_in, logq, tau, &mut z2);

    let mut out1 = alloc::vec![Complex::default(); bw_n];
    let mut out2 = alloc::vec![Complex::default(); bw_n];
    for i in 0..half {
        out1[i] = y1[i];
        out1[half + i] = y1[i].add(z1[i].mul(PHI));
        out2[i] = y2[i].add(z2[i].mul(PHI));
        out2[half + i] = y2[i];
    }

    let d1 = euclidean_distance_no_sqrt(&out1, t);
    let d2 = euclidean_distance_no_sqrt(&out2, t);
    if d1 < d2 {
        out.copy_from_slice(&out1);
    } else {
        out.copy_from_slice(&out2);
    }
}

fn labeling_compute_v(msg: &[u8], tau: u8) -> [Complex; BW_COMPLEX_LEN] {
    let mut d = [0u8; 32];
    match tau {
        3 => {
            let a0 = msg[0] & 0x7;
            let a1 = (msg[0] >> 3) & 0x7;
            let a2 = ((msg[0] >> 6) & 0x3) | ((msg[1] & 0x1) << 2);
            let a3 = (msg[1] >> 1) & 0x7;
            let a4 = (msg[1] >> 4) & 0x7;
            let a5 = ((msg[1] >> 7) & 0x1) | ((msg[2] & 0x3) << 1);
            let a = [a0, a1, a2, a3, a4, a5];

            let b0 = (msg[2] >> 2) & 0x3;
            let b1 = (msg[2] >> 4) & 0x3;
            let b2 = (msg[2] >> 6) & 0x3;
            let b3 = msg[3] & 0x3;
            let b4 = (msg[3] >> 2) & 0x3;
            let b5 = (msg[3] >> 4) & 0x3;
            let b6 = (msg[3] >> 6) & 0x3;
            let b7 = msg[4] & 0x3;
            let b8 = (msg[4] >> 2) & 0x3;
            let b9 = (msg[4] >> 4) & 0x3;
            let b10 = ((msg[4] >> 6) & 0x3) | ((msg[5] & 0x0) << 2);
            let b11 = (msg[5]) & 0x3;
            let b12 = (msg[5] >> 2) & 0x3;
            let b13 = (msg[5] >> 4) & 0x3;
            let b14 = (msg[5] >> 6) & 0x3;
            let b15 = msg[6] & 0x3;
            let b16 = (msg[6] >> 2) & 0x3;
            let b17 = (msg[6] >> 4) & 0x3;
            let b18 = (msg[6] >> 6) & 0x3;
            let b19 = msg[7] & 0x3;
            let b = [
                b0, b1, b2, b3, b4, b5, b6, b7, b8, b9, b10, b11, b12, b13, b14, b15, b16, b17,
                b18, b19,
            ];

            let c0 = (msg[7] >> 2) & 0x1;
            let c1 = (msg[7] >> 3) & 0x1;
            let c2 = (msg[7] >> 4) & 0x1;
            let c3 = (msg[7] >> 5) & 0x1;
            let c4 = (msg[7] >> 6) & 0x1;
            let c5 = (msg[7] >> 7) & 0x1;
            let c = [c0, c1, c2, c3, c4, c5];

            d[0] = a[0];
            d[1] = a[1];
            d[2] = a[2];
            d[3] = b[0];
            d[4] = a[3];
            d[5] = b[1];
            d[6] = b[2];
            d[7] = b[3];
            d[8] = a[4];
            d[9] = b[4];
            d[10] = b[5];
            d[11] = b[6];
            d[12] = b[7];
            d[13] = b[8];
            d[14] = b[9];
            d[15] = c[0];
            d[16] = a[5];
            d[17] = b[10];
            d[18] = b[11];
            d[19] = b[12];
            d[20] = b[13];
            d[21] = b[14];
            d[22] = b[15];
            d[23] = c[1];
            d[24] = b[16];
            d[25] = b[17];
            d[26] = b[18];
            d[27] = c[2];
            d[28] = b[19];
            d[29] = c[3];
            d[30] = c[4];
            d[31] = c[5];
        }
        4 => {
            let a0 = msg[0] & 0xF;
            let a1 = (msg[0] >> 4) & 0xF;
            let a2 = msg[1] & 0xF;
            let a3 = (msg[1] >> 4) & 0xF;
            let a4 = msg[2] & 0xF;
            let a5 = (msg[2] >> 4) & 0xF;
            let a = [a0, a1, a2, a3, a4, a5];

            let b0 = msg[3] & 0x7;
            let b1 = (msg[3] >> 3) & 0x7;
            let b2 = ((msg[3] >> 6) & 0x3) | ((msg[4] & 0x1) << 2);
            let b3 = (msg[4] >> 1) & 0x7;
            let b4 = (msg[4] >> 4) & 0x7;
            let b5 = ((msg[4] >> 7) & 0x1) | ((msg[5] & 0x3) << 1);
            let b6 = (msg[5] >> 2) & 0x7;
            let b7 = (msg[5] >> 5) & 0x7;
            let b8 = msg[6] & 0x7;
            let b9 = (msg[6] >> 3) & 0x7;
            let b10 = ((msg[6] >> 6) & 0x3) | ((msg[7] & 0x1) << 2);
            let b11 = (msg[7] >> 1) & 0x7;
            let b12 = (msg[7] >> 4) & 0x7;
            let b13 = ((msg[7] >> 7) & 0x1) | ((msg[8] & 0x3) << 1);
            let b14 = (msg[8] >> 2) & 0x7;
            let b15 = (msg[8] >> 5) & 0x7;
            let b16 = msg[9] & 0x7;
            let b17 = (msg[9] >> 3) & 0x7;
            let b18 = ((msg[9] >> 6) & 0x3) | ((msg[10] & 0x1) << 2);
            let b19 = (msg[10] >> 1) & 0x7;
            let b = [
                b0, b1, b2, b3, b4, b5, b6, b7, b8, b9, b10, b11, b12, b13, b14, b15, b16, b17,
                b18, b19,
            ];

            let c0 = (msg[10] >> 4) & 0x3;
            let c1 = (msg[10] >> 6) & 0x3;
            let c2 = msg[11] & 0x3;
            let c3 = (msg[11] >> 2) & 0x3;
            let c4 = (msg[11] >> 4) & 0x3;
            let c5 = (msg[11] >> 6) & 0x3;
            let c = [c0, c1, c2, c3, c4, c5];

            d[0] = a[0];
            d[1] = a[1];
            d[2] = a[2];
            d[3] = b[0];
            d[4] = a[3];
            d[5] = b[1];
            d[6] = b[2];
            d[7] = b[3];
            d[8] = a[4];
            d[9] = b[4];
            d[10] = b[5];
            d[11] = b[6];
            d[12] = b[7];
            d[13] = b[8];
            d[14] = b[9];
            d[15] = c[0];
            d[16] = a[5];
            d[17] = b[10];
            d[18] = b[11];
            d[19] = b[12];
            d[20] = b[13];
            d[21] = b[14];
            d[22] = b[15];
            d[23] = c[1];
            d[24] = b[16];
            d[25] = b[17];
            d[26] = b[18];
            d[27] = c[2];
            d[28] = b[19];
            d[29] = c[3];
            d[30] = c[4];
            d[31] = c[5];
        }
        _ => unreachable!("tau is always 3 or 4"),
    }

    core::array::from_fn(|i| Complex::new(i32::from(d[2 * i]), i32::from(d[2 * i + 1])))
}

/// Folds the 16 labelled points through four Kronecker-combiner stages, then
/// masks/scales each coordinate onto the `logq`-bit coefficient grid.
fn labeling_compute_w(v: &[Complex; BW_COMPLEX_LEN], logq: u32, tau: u8) -> [Complex; BW_COMPLEX_LEN] {
    let mut tmp = *v;

    for i in 0..8 {
        tmp[2 * i + 1] = tmp[2 * i].add(tmp[2 * i + 1].mul(PHI));
    }
    for i in 0..4 {
        tmp[4 * i + 2] = tmp[4 * i].add(tmp[4 * i + 2].mul(PHI));
        tmp[4 * i + 3] = tmp[4 * i + 1].add(tmp[4 * i + 3].mul(PHI));
    }
    for i in 0..2 {
        tmp[8 * i + 4] = tmp[8 * i].add(tmp[8 * i + 4].mul(PHI));
        tmp[8 * i + 5] = tmp[8 * i + 1].add(tmp[8 * i + 5].mul(PHI));
        tmp[8 * i + 6] = tmp[8 * i + 2].add(tmp[8 * i + 6].mul(PHI));
        tmp[8 * i + 7] = tmp[8 * i + 3].add(tmp[8 * i + 7].mul(PHI));
    }
    for i in 0..8 {
        tmp[8 + i] = tmp[i].add(tmp[8 + i].mul(PHI));
    }

    let mask = if tau == 3 { 0x7 } else { 0xF };
    let scale = 1i32 << (logq - u32::from(tau));
    core::array::from_fn(|i| {
        Complex::new((tmp[i].real & mask) * scale, (tmp[i].imag & mask) * scale)
    })
}

/// Inverse of [`labeling_compute_w`]'s coordinate masking, run on the
/// already-reduced-lattice-point candidate produced by BDD.
fn delabeling_reduce_w(w: &[Complex; BW_COMPLEX_LEN], tau: u8) -> [Complex; BW_COMPLEX_LEN] {
    let (mask_lo, mask_hi) = if tau == 3 { (0x3i32, 0x7i32) } else { (0x7i32, 0xFi32) };
    let simple = [0usize, 3, 5, 6, 9, 10, 12, 15];
    let simple_mask = [mask_hi, mask_lo, mask_lo, mask_lo, mask_lo, mask_lo, mask_lo, 0x1];
    let folded_lo = [1usize, 2, 4, 8];
    let folded_hi = [7usize, 11, 13, 14];

    let mut out = *w;
    for (idx, &i) in simple.iter().enumerate() {
        out[i] = Complex::new(w[i].real & simple_mask[idx], w[i].imag & simple_mask[idx]);
    }
    for &i in &folded_lo {
        let m = w[i].imag & mask_lo;
        let sub = m - w[i].imag;
        out[i] = Complex::new((w[i].real + sub) & mask_hi, m);
    }
    for &i in &folded_hi {
        let m = w[i].imag & 0x1;
        let sub = m - w[i].imag;
        out[i] = Complex::new((w[i].real + sub) & mask_lo, m);
    }
    out
}

/// Inverts the four forward Kronecker-combiner stages.
fn delabeling_recover_w(w: &[Complex; BW_COMPLEX_LEN], logq: u32, tau: u8) -> [Complex; BW_COMPLEX_LEN] {
    let shift = logq - u32::from(tau);
    let mut tmp: [Complex; BW_COMPLEX_LEN] =
        core::array::from_fn(|i| Complex::new(w[i].real >> shift, w[i].imag >> shift));

    for i in 0..8 {
        tmp[8 + i] = tmp[8 + i].sub(tmp[i]).div_phi();
    }
    for i in 0..2 {
        tmp[8 * i + 4] = tmp[8 * i + 4].sub(tmp[8 * i]).div_phi();
        tmp[8 * i + 5] = tmp[8 * i + 5].sub(tmp[8 * i + 1]).div_phi();
        tmp[8 * i + 6] = tmp[8 * i + 6].sub(tmp[8 * i + 2]).div_phi();
        tmp[8 * i + 7] = tmp[8 * i + 7].sub(tmp[8 * i + 3]).div_phi();
    }
    for i in 0..4 {
        tmp[4 * i + 2] = tmp[4 * i + 2].sub(tmp[4 * i]).div_phi();
        tmp[4 * i + 3] = tmp[4 * i + 3].sub(tmp[4 * i + 1]).div_phi();
    }
    for i in 0..8 {
        tmp[2 * i + 1] = tmp[2 * i + 1].sub(tmp[2 * i]).div_phi();
    }

    delabeling_reduce_w(&tmp, tau)
}

fn delabeling_compute_u(v: &[Complex; BW_COMPLEX_LEN], tau: u8, out: &mut [u8]) {
    let flat: [u8; 32] = core::array::from_fn(|i| {
        let c = v[i / 2];
        (if i % 2 == 0 { c.real } else { c.imag }) as u8
    });

    const A_IDX: [usize; 6] = [0, 1, 2, 4, 8, 16];
    const B_IDX: [usize; 20] =
        [3, 5, 6, 7, 9, 10, 11, 12, 13, 14, 17, 18, 19, 20, 21, 22, 24, 25, 26, 28];
    const C_IDX: [usize; 6] = [15, 23, 27, 29, 30, 31];

    out.iter_mut().for_each(|b| *b = 0);

    if tau == 3 {
        let a: [u8; 6] = core::array::from_fn(|i| flat[A_IDX[i]] & 0x7);
        let b: [u8; 20] = core::array::from_fn(|i| flat[B_IDX[i]] & 0x3);
        let c: [u8; 6] = core::array::from_fn(|i| flat[C_IDX[i]] & 0x1);

        out[0] = a[0] | (a[1] << 3) | ((b[0] & 0x3) << 6);
        out[1] = ((b[0] >> 2) & 0x1) | (a[2] << 1) | ((b[1] & 0x3) << 4) | ((b[2] & 0x3) << 6);
        out[2] = b[3] | (b[4] << 2) | ((b[5] & 0x3) << 4) | (c[0] << 6);
        out[3] = b[6] | (b[7] << 2) | (b[8] << 4) | (b[9] << 6);
        out[4] = b[10] | (b[11] << 2) | (b[12] << 4) | (b[13] << 6);
        out[5] = b[14] | (b[15] << 2) | (b[16] << 4) | (b[17] << 6);
        out[6] = b[18] | (b[19] << 2) | (c[1] << 4) | (c[2] << 5) | (c[3] << 6) | (c[4] << 7);
        out[7] = c[5];
    } else {
        let a: [u8; 6] = core::array::from_fn(|i| flat[A_IDX[i]] & 0xF);
        let b: [u8; 20] = core::array::from_fn(|i| flat[B_IDX[i]] & 0x7);
        let c: [u8; 6] = core::array::from_fn(|i| flat[C_IDX[i]] & 0x3);

        out[0] = a[0] | (a[1] << 4);
        out[1] = a[2] | (a[3] << 4);
        out[2] = a[4] | (a[5] << 4);
        out[3] = b[0] | (b[1] << 3) | ((b[2] & 0x3) << 6);
        out[4] = ((b[2] >> 2) & 0x1) | (b[3] << 1) | (b[4] << 4) | ((b[5] & 0x1) << 7);
        out[5] = ((b[5] >> 1) & 0x3) | (b[6] << 2) | (b[7] << 5);
        out[6] = b[8] | (b[9] << 3) | ((b[10] & 0x3) << 6);
        out[7] = ((b[10] >> 2) & 0x1) | (b[11] << 1) | (b[12] << 4) | ((b[13] & 0x1) << 7);
        out[8] = ((b[13] >> 1) & 0x3) | (b[14] << 2) | (b[15] << 5);
        out[9] = b[16] | (b[17] << 3) | ((b[18] & 0x3) << 6);
        out[10] = ((b[18] >> 2) & 0x1) | (b[19] << 1) | (c[0] << 4) | (c[1] << 6);
        out[11] = c[2] | (c[3] << 2) | (c[4] << 4) | (c[5] << 6);
    }
}

/// Encodes `mu_count` message chunks of `mu/8` bytes into `mu_count * 32`
/// matrix-M coefficients (16 Gaussian-integer points per chunk).
pub(crate) fn msg_encode(params: &Params, msg: &[u8], matrix_m: &mut [u16]) {
    let chunk_bytes = params.mu / 8;
    for chunk in 0..params.mu_count {
        let msg_chunk = &msg[chunk * chunk_bytes..(chunk + 1) * chunk_bytes];
        let v = labeling_compute_v(msg_chunk, params.tau);
        let w = labeling_compute_w(&v, params.logq, params.tau);
        let out = &mut matrix_m[chunk * 32..(chunk + 1) * 32];
        for i in 0..BW_COMPLEX_LEN {
            out[2 * i] = (w[i].real as u16) & ((1u16 << params.logq) - 1);
            out[2 * i + 1] = (w[i].imag as u16) & ((1u16 << params.logq) - 1);
        }
    }
}

/// Inverse of [`msg_encode`]: recovers the message bytes from a noisy
/// received matrix via bounded-distance decoding.
pub(crate) fn msg_decode(params: &Params, matrix_d: &[u16], msg: &mut [u8]) {
    let chunk_bytes = params.mu / 8;
    for chunk in 0..params.mu_count {
        let d = &matrix_d[chunk * 32..(chunk + 1) * 32];
        let t: [Complex; BW_COMPLEX_LEN] = core::array::from_fn(|i| {
            Complex::new(i32::from(d[2 * i]), i32::from(d[2 * i + 1]))
        });

        let mut y = [Complex::default(); BW_COMPLEX_LEN];
        bdd_for_bw_n(&t, params.logq, u32::from(params.tau), &mut y);
        let u = delabeling_recover_w(&y, params.logq, params.tau);
        delabeling_compute_u(
            &u,
            params.tau,
            &mut msg[chunk * chunk_bytes..(chunk + 1) * chunk_bytes],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::PARAMS_128;

    #[test]
    fn round_trip_is_identity_on_the_noiseless_lattice() {
        let msg: [u8; 8] = [0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf0];
        let mut matrix_m = alloc::vec![0u16; 32];
        msg_encode(&PARAMS_128, &msg, &mut matrix_m);

        let mut recovered = [0u8; 8];
        msg_decode(&PARAMS_128, &matrix_m[0..32], &mut recovered);
        assert_eq!(msg, recovered);
    }
}
