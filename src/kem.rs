//! C7 — the Fujisaki-Okamoto transform that wraps the lattice PKE
//! (`k_pke.rs`) into an IND-CCA2 KEM: key generation, encapsulation, and
//! decapsulation, including the constant-time implicit-rejection branch.

use alloc::vec;
use alloc::vec::Vec;

use rand_core::CryptoRngCore;

use crate::helpers::{ct_eq, ct_select, sha3_256, sha3_512_concat, shake256};
use crate::k_pke;
use crate::params::{Params, HPK_LEN, RAND_Z_LEN, SEED_A_LEN, SEED_R1_LEN, SEED_R2_LEN};
use crate::types::Error;

fn fill_random(rng: &mut impl CryptoRngCore, out: &mut [u8]) -> Result<(), Error> {
    rng.try_fill_bytes(out).map_err(|_| Error::OracleError)
}

/// §4.7 keygen: expands a random seed into `(seed_A, r1, r2)`, runs
/// `PKE.KeyGen`, and assembles `kem_sk = pke_sk ‖ pk ‖ H(pk) ‖ z`.
pub(crate) fn key_gen(params: &Params, rng: &mut impl CryptoRngCore, ek: &mut [u8], dk: &mut [u8]) -> Result<(), Error> {
    debug_assert_eq!(ek.len(), params.pk_size);
    debug_assert_eq!(dk.len(), params.kem_sk_size);

    let mut alpha = [0u8; 32];
    fill_random(rng, &mut alpha)?;

    let mut expanded = vec![0u8; SEED_A_LEN + SEED_R1_LEN + SEED_R2_LEN];
    shake256(&alpha, &mut expanded);
    let (seed_a_bytes, rest) = expanded.split_at(SEED_A_LEN);
    let (r1, r2) = rest.split_at(SEED_R1_LEN);
    let seed_a: [u8; SEED_A_LEN] = seed_a_bytes.try_into().expect("SEED_A_LEN bytes");

    let mut pk = Vec::new();
    let mut pke_sk = Vec::new();
    k_pke::key_gen(params, &seed_a, r1, r2, &mut pk, &mut pke_sk);

    let mut z = [0u8; RAND_Z_LEN];
    fill_random(rng, &mut z)?;
    let h_pk = sha3_256(&pk);

    ek.copy_from_slice(&pk);
    let mut off = 0;
    dk[off..off + pke_sk.len()].copy_from_slice(&pke_sk);
    off += pke_sk.len();
    dk[off..off + pk.len()].copy_from_slice(&pk);
    off += pk.len();
    dk[off..off + HPK_LEN].copy_from_slice(&h_pk);
    off += HPK_LEN;
    dk[off..off + RAND_Z_LEN].copy_from_slice(&z);

    Ok(())
}

/// §4.7 encaps: samples `m`, derives `(r, k)` and the PKE randomness from
/// the hash chain, encrypts `m` under `ek`, and derives the shared secret
/// from `k ‖ ctx`.
pub(crate) fn encaps(
    params: &Params, rng: &mut impl CryptoRngCore, ek: &[u8], ss: &mut [u8], ctx: &mut [u8],
) -> Result<(), Error> {
    debug_assert_eq!(ss.len(), params.ss);
    debug_assert_eq!(ctx.len(), params.ctx_size);

    let mut msg = vec![0u8; params.ss];
    fill_random(rng, &mut msg)?;

    let h_pk = sha3_256(ek);
    let rk = sha3_512_concat(&msg, &h_pk);
    let (r, k) = rk.split_at(32);

    let mut expanded = vec![0u8; SEED_R1_LEN + SEED_R2_LEN];
    shake256(r, &mut expanded);
    let (r1, r2) = expanded.split_at(SEED_R1_LEN);

    let mut ct = Vec::new();
    k_pke::encrypt(params, ek, &msg, r1, r2, &mut ct);
    ctx.copy_from_slice(&ct);

    let mut kdf_input = Vec::with_capacity(32 + ct.len());
    kdf_input.extend_from_slice(k);
    kdf_input.extend_from_slice(&ct);
    shake256(&kdf_input, ss);

    Ok(())
}

/// §4.7 decaps: decrypts `ctx`, re-derives the randomness and re-encrypts
/// under the stored public key, and constant-time-selects between the
/// re-encryption's derived key and the implicit-rejection secret before
/// the final KDF call.
pub(crate) fn decaps(params: &Params, dk: &[u8], ctx: &[u8], ss: &mut [u8]) -> Result<(), Error> {
    if ctx.len() != params.ctx_size {
        return Err(Error::InvalidArgument);
    }
    debug_assert_eq!(ss.len(), params.ss);
    debug_assert_eq!(dk.len(), params.kem_sk_size);

    let pke_sk = &dk[..params.pke_sk_size];
    let pk = &dk[params.pke_sk_size..params.pke_sk_size + params.pk_size];
    let h_pk_off = params.pke_sk_size + params.pk_size;
    let h_pk = &dk[h_pk_off..h_pk_off + HPK_LEN];
    let z = &dk[h_pk_off + HPK_LEN..h_pk_off + HPK_LEN + RAND_Z_LEN];

    let mut m_prime = vec![0u8; params.ss];
    k_pke::decrypt(params, pke_sk, ctx, &mut m_prime);

    let rk_prime = sha3_512_concat(&m_prime, h_pk);
    let (r_prime, k_prime) = rk_prime.split_at(32);

    let mut expanded = vec![0u8; SEED_R1_LEN + SEED_R2_LEN];
    shake256(r_prime, &mut expanded);
    let (r1, r2) = expanded.split_at(SEED_R1_LEN);

    let mut ctx_prime = Vec::new();
    k_pke::encrypt(params, pk, &m_prime, r1, r2, &mut ctx_prime);

    // `choice` is 1 when ctx == ctx_prime (the honest path) and 0 under
    // tampering; ct_select keeps both operands live so the final KDF input
    // address is not selected by a data-dependent branch.
    let choice = ct_eq(ctx, &ctx_prime);
    let mut kdf_key = vec![0u8; 32];
    ct_select(&mut kdf_key, z, k_prime, choice);

    let mut kdf_input = vec![0u8; 32 + ctx.len()];
    kdf_input[..32].copy_from_slice(&kdf_key);
    kdf_input[32..].copy_from_slice(ctx);
    shake256(&kdf_input, ss);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::PARAMS_128;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn round_trips_and_rejects_tampered_ciphertexts() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let mut ek = vec![0u8; PARAMS_128.pk_size];
        let mut dk = vec![0u8; PARAMS_128.kem_sk_size];
        key_gen(&PARAMS_128, &mut rng, &mut ek, &mut dk).unwrap();

        let mut ss1 = vec![0u8; PARAMS_128.ss];
        let mut ctx = vec![0u8; PARAMS_128.ctx_size];
        encaps(&PARAMS_128, &mut rng, &ek, &mut ss1, &mut ctx).unwrap();

        let mut ss2 = vec![0u8; PARAMS_128.ss];
        decaps(&PARAMS_128, &dk, &ctx, &mut ss2).unwrap();
        assert_eq!(ss1, ss2);

        ctx[0] ^= 0xFF;
        let mut ss3 = vec![0u8; PARAMS_128.ss];
        decaps(&PARAMS_128, &dk, &ctx, &mut ss3).unwrap();
        assert_ne!(ss1, ss3);
    }

    #[test]
    fn decaps_rejects_mismatched_ciphertext_length() {
        let mut rng = ChaCha20Rng::seed_from_u64(12);
        let mut ek = vec![0u8; PARAMS_128.pk_size];
        let mut dk = vec![0u8; PARAMS_128.kem_sk_size];
        key_gen(&PARAMS_128, &mut rng, &mut ek, &mut dk).unwrap();

        let short_ctx = vec![0u8; PARAMS_128.ctx_size - 1];
        let mut ss = vec![0u8; PARAMS_128.ss];
        assert_eq!(decaps(&PARAMS_128, &dk, &short_ctx, &mut ss), Err(Error::InvalidArgument));
    }
}
