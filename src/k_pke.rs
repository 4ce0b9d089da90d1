//! The IND-CPA lattice PKE that the FO transform (`kem.rs`) wraps: key
//! generation, encryption, and decryption. Corresponds to the
//! `PKEKeyGen`/`PKEEncrypt`/`PKEDecrypt` routines in the reference scheme.

use alloc::vec;
use alloc::vec::Vec;

use crate::bw32::{msg_decode, msg_encode};
use crate::byte_fns::{pack_c1, pack_c2, pack_pk, pack_sk, unpack_c1, unpack_c2, unpack_pk, unpack_sk};
use crate::helpers::{compress, decompress};
use crate::matrix::{as_e, cs, sa_e, sb_e};
use crate::params::{Params, MOD_Q_MASK, SEED_A_LEN};
use crate::sampling::{sample_eta1, sample_eta2, sample_phi, sample_psi};

/// Samples `S` (Ψ, from `r1`) and `E` (η1, from `r2`), expands `A` from
/// `seed_a`, computes `B = A·S + E`, and packs `pk = B ‖ seed_a` /
/// `pke_sk = S`.
pub(crate) fn key_gen(
    params: &Params, seed_a: &[u8; SEED_A_LEN], r1: &[u8], r2: &[u8], pk: &mut Vec<u8>,
    pke_sk: &mut Vec<u8>,
) {
    let mut matrix_s = vec![0i16; params.n * params.nbar];
    sample_psi(params, r1, &mut matrix_s);

    let mut matrix_e = vec![0i16; params.m * params.nbar];
    sample_eta1(params, r2, &mut matrix_e);

    let mut matrix_b = vec![0u16; params.m * params.nbar];
    as_e(params, seed_a, &matrix_s, &matrix_e, &mut matrix_b);

    *pk = pack_pk(&matrix_b);
    pk.extend_from_slice(seed_a);
    *pke_sk = pack_sk(&matrix_s);
}

/// Samples `S'` (Φ, from `r1`) and `(E1, E2)` (η2, from `r2`), computes
/// `C1 = S'·A + E1` and `C2 = S'·B + E2 + encode(msg)`, compresses both,
/// and packs the result into `ctx`.
pub(crate) fn encrypt(params: &Params, pk: &[u8], msg: &[u8], r1: &[u8], r2: &[u8], ctx: &mut Vec<u8>) {
    let (b_bytes, seed_a_bytes) = pk.split_at(pk.len() - SEED_A_LEN);
    let seed_a: [u8; SEED_A_LEN] = seed_a_bytes.try_into().expect("pk carries a 16-byte seed_a tail");
    let matrix_b = unpack_pk(b_bytes, params.m * params.nbar);

    let mut matrix_sp = vec![0i16; params.mbar * params.m];
    sample_phi(params, r1, &mut matrix_sp);

    let mut matrix_e1 = vec![0i16; params.mbar * params.n];
    let mut matrix_e2 = vec![0i16; params.mbar * params.nbar];
    sample_eta2(params, r2, &mut matrix_e1, &mut matrix_e2);

    let mut matrix_c1 = matrix_e1;
    sa_e(params, &seed_a, &matrix_sp, &mut matrix_c1);
    let c1_coeffs: Vec<u16> = matrix_c1.iter().map(|&v| (v as u16) & MOD_Q_MASK).collect();

    let mut matrix_c2 = vec![0u16; params.mbar * params.nbar];
    sb_e(params, &matrix_sp, &matrix_b, &matrix_e2, &mut matrix_c2);

    // The encoded message only ever fills `mu_count * 32` of the `mbar *
    // nbar` C2 coefficients; at P256 those counts differ (128 vs 132) and
    // the trailing four coefficients carry pure noise with no message bits.
    let mu_len = params.mu_count * 32;
    let mut matrix_mu = vec![0u16; mu_len];
    msg_encode(params, msg, &mut matrix_mu);
    for (c, &m) in matrix_c2.iter_mut().zip(matrix_mu.iter()) {
        *c = c.wrapping_add(m) & MOD_Q_MASK;
    }

    // C2 always breaks compression ties toward even, at every security
    // level (P192's 10-bit C2 included, not just P128/P256's 7-bit C2).
    let c1_compressed: Vec<u16> = c1_coeffs.iter().map(|&x| compress(x, params.logq1, false)).collect();
    let c2_compressed: Vec<u16> =
        matrix_c2.iter().map(|&x| compress(x, params.logq2, true)).collect();

    *ctx = pack_c1(&c1_compressed, params.logq1);
    ctx.extend_from_slice(&pack_c2(&c2_compressed, params.logq2));
}

/// Unpacks/decompresses `ctx` into `C1`/`C2`, computes `D = C1·S`, and
/// recovers the message from `C2 - D` via the BW32 decoder.
pub(crate) fn decrypt(params: &Params, pke_sk: &[u8], ctx: &[u8], msg: &mut [u8]) {
    let matrix_s = unpack_sk(pke_sk, params.n * params.nbar);

    let (c1_bytes, c2_bytes) = ctx.split_at(params.c1_size);
    let c1_compressed = unpack_c1(c1_bytes, params.logq1, params.mbar * params.n);
    let c2_compressed = unpack_c2(c2_bytes, params.logq2, params.mbar * params.nbar);

    let matrix_c1: Vec<u16> = c1_compressed.iter().map(|&y| decompress(y, params.logq1)).collect();
    let matrix_c2: Vec<u16> = c2_compressed.iter().map(|&y| decompress(y, params.logq2)).collect();

    let mut matrix_d = vec![0u16; params.mbar * params.nbar];
    cs(params, &matrix_c1, &matrix_s, &mut matrix_d);

    let mut matrix_mu = vec![0u16; params.mbar * params.nbar];
    for ((mu, &c2), &d) in matrix_mu.iter_mut().zip(matrix_c2.iter()).zip(matrix_d.iter()) {
        *mu = c2.wrapping_sub(d) & MOD_Q_MASK;
    }

    msg_decode(params, &matrix_mu, msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::PARAMS_128;

    #[test]
    fn encrypt_then_decrypt_recovers_the_message() {
        let seed_a = [9u8; SEED_A_LEN];
        let r1 = [1u8; 32];
        let r2 = [2u8; 32];
        let mut pk = Vec::new();
        let mut pke_sk = Vec::new();
        key_gen(&PARAMS_128, &seed_a, &r1, &r2, &mut pk, &mut pke_sk);
        assert_eq!(pk.len(), PARAMS_128.pk_size);
        assert_eq!(pke_sk.len(), PARAMS_128.pke_sk_size);

        let msg = [0x42u8; 16];
        let er1 = [3u8; 32];
        let er2 = [4u8; 32];
        let mut ctx = Vec::new();
        encrypt(&PARAMS_128, &pk, &msg, &er1, &er2, &mut ctx);
        assert_eq!(ctx.len(), PARAMS_128.ctx_size);

        let mut recovered = [0u8; 16];
        decrypt(&PARAMS_128, &pke_sk, &ctx, &mut recovered);
        assert_eq!(msg, recovered);
    }
}
