// Deterministic scenario tests S-1 through S-6 from the design's testable
// properties. No known-answer-test vectors are bundled (none were available
// in the source material this crate was built from), so S-1/S-2/S-3 assert
// deterministic, seed-reproducible round trips per security level rather
// than byte-for-byte KAT matches.
//
// A round trip against this crate's own output cannot catch a wire-layout
// bug that disagrees with the reference while still being internally
// consistent (e.g. an AES-PRG expansion using the wrong plaintext layout, or
// a compression rounding rule applied at the wrong security levels) — it
// only proves self-consistency, not conformance. The two regressions of
// that shape found in review are pinned directly at the unit that owns the
// layout instead: `counter_block`/`expand_rows` in `src/matrix.rs` re-derive
// the expected AES ciphertext per block from the spec's counter formula, and
// `compress_breaks_p192_c2_ties_toward_even` in `src/helpers.rs` pins the
// exact tie value that only round-half-to-odd rounds correctly. S-1/S-2/S-3
// below additionally pin full keypair-and-ciphertext byte identity across
// two independently-seeded runs, so any future nondeterminism regression
// (not just a layout one) is still caught here.

use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;

use scloudplus::traits::{Decaps, Encaps, KeyGen, SerDes};
use scloudplus::{Context, Error};

#[test]
fn s1_keygen_encaps_decaps_round_trip_at_128() {
    use scloudplus::scloud_plus_128::KG;

    let mut rng_a = ChaCha20Rng::seed_from_u64(1281);
    let mut rng_b = ChaCha20Rng::seed_from_u64(1281);
    let (ek_a, dk_a) = KG::try_keygen_with_rng(&mut rng_a).unwrap();
    let (ek_b, dk_b) = KG::try_keygen_with_rng(&mut rng_b).unwrap();
    assert_eq!(ek_a.clone().into_bytes(), ek_b.clone().into_bytes());
    assert_eq!(dk_a.clone().into_bytes(), dk_b.into_bytes());

    let (ssk_sender, ct_a) = ek_a.try_encaps_with_rng(&mut rng_a).unwrap();
    let (_ssk_b, ct_b) = ek_b.try_encaps_with_rng(&mut rng_b).unwrap();
    assert_eq!(ct_a.clone().into_bytes(), ct_b.into_bytes());

    let ssk_receiver = dk_a.try_decaps(&ct_a).unwrap();
    assert_eq!(ssk_sender, ssk_receiver);
}

#[test]
fn s2_keygen_encaps_decaps_round_trip_at_192() {
    use scloudplus::scloud_plus_192::KG;

    let mut rng_a = ChaCha20Rng::seed_from_u64(1922);
    let mut rng_b = ChaCha20Rng::seed_from_u64(1922);
    let (ek_a, dk_a) = KG::try_keygen_with_rng(&mut rng_a).unwrap();
    let (ek_b, dk_b) = KG::try_keygen_with_rng(&mut rng_b).unwrap();
    assert_eq!(ek_a.clone().into_bytes(), ek_b.clone().into_bytes());
    assert_eq!(dk_a.clone().into_bytes(), dk_b.into_bytes());

    let (ssk_sender, ct_a) = ek_a.try_encaps_with_rng(&mut rng_a).unwrap();
    let (_ssk_b, ct_b) = ek_b.try_encaps_with_rng(&mut rng_b).unwrap();
    assert_eq!(ct_a.clone().into_bytes(), ct_b.into_bytes());

    let ssk_receiver = dk_a.try_decaps(&ct_a).unwrap();
    assert_eq!(ssk_sender, ssk_receiver);
}

#[test]
fn s3_keygen_encaps_decaps_round_trip_at_256() {
    use scloudplus::scloud_plus_256::KG;

    let mut rng_a = ChaCha20Rng::seed_from_u64(2563);
    let mut rng_b = ChaCha20Rng::seed_from_u64(2563);
    let (ek_a, dk_a) = KG::try_keygen_with_rng(&mut rng_a).unwrap();
    let (ek_b, dk_b) = KG::try_keygen_with_rng(&mut rng_b).unwrap();
    assert_eq!(ek_a.clone().into_bytes(), ek_b.clone().into_bytes());
    assert_eq!(dk_a.clone().into_bytes(), dk_b.into_bytes());

    let (ssk_sender, ct_a) = ek_a.try_encaps_with_rng(&mut rng_a).unwrap();
    let (_ssk_b, ct_b) = ek_b.try_encaps_with_rng(&mut rng_b).unwrap();
    assert_eq!(ct_a.clone().into_bytes(), ct_b.into_bytes());

    let ssk_receiver = dk_a.try_decaps(&ct_a).unwrap();
    assert_eq!(ssk_sender, ssk_receiver);
}

#[test]
fn s4_tampering_the_ciphertext_changes_the_recovered_secret() {
    use scloudplus::scloud_plus_128::{CipherText, KG};

    let mut rng = ChaCha20Rng::seed_from_u64(1281);
    let (ek, dk) = KG::try_keygen_with_rng(&mut rng).unwrap();
    let (ssk_sender, ct) = ek.try_encaps_with_rng(&mut rng).unwrap();

    let mut tampered = ct.into_bytes();
    tampered[0] ^= 0xFF;
    let tampered_ct = CipherText::try_from_bytes(tampered).unwrap();

    let ssk_receiver = dk.try_decaps(&tampered_ct).unwrap();
    assert_ne!(ssk_sender, ssk_receiver);
}

#[test]
fn s5_length_mismatched_ciphertext_is_rejected() {
    let mut rng = ChaCha20Rng::seed_from_u64(5);
    let mut ctx = Context::new();
    ctx.set_key_bits(128).unwrap();
    ctx.generate(&mut rng).unwrap();

    let (good_ct, _ss) = ctx.encapsulate(&mut rng).unwrap();
    let short_ct = &good_ct[..good_ct.len() - 1];
    assert_eq!(ctx.decapsulate(short_ct), Err(Error::InvalidArgument));
}

#[test]
fn s6_encapsulate_before_set_key_bits_is_null_input() {
    let mut rng = ChaCha20Rng::seed_from_u64(6);
    let ctx = Context::new();
    assert_eq!(ctx.encapsulate(&mut rng), Err(Error::NullInput));
}
