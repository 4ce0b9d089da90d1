#![no_std]
#![deny(clippy::pedantic)]
#![deny(warnings)]
#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

extern crate alloc;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::traits::SerDes;

// Component map, C1-C8:
//
// C1 Parameter registry                    --> params.rs
// C2 Byte packing                          --> byte_fns.rs
// C3 Error/secret sampling                 --> sampling.rs
// C4 Matrix arithmetic / AES-PRG expansion --> matrix.rs
// C5 Hashing, compression, constant time   --> helpers.rs
// C6 Barnes-Wall BW32 labelling/BDD        --> bw32.rs
// C7 IND-CPA PKE + FO-transform KEM        --> k_pke.rs, kem.rs
// C8 Stateful context (expansion)          --> context.rs
//
// The three parameter sets are modules in this file with injected macro
// code that connects them to `kem.rs`.

mod bw32;
mod byte_fns;
mod context;
mod helpers;
mod k_pke;
mod kem;
mod matrix;
mod params;
mod sampling;
mod types;

/// All functionality is covered by traits, such that consumers can utilize
/// trait objects as desired.
pub mod traits;

pub use context::Context;
pub use types::Error;

/// A shared secret produced by encapsulation/decapsulation, sized to the
/// `ss` field of the parameter set that produced it. Compared in constant
/// time; zeroised on drop.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecretKey<const N: usize>([u8; N]);

impl<const N: usize> SerDes for SharedSecretKey<N> {
    type ByteArray = [u8; N];

    fn into_bytes(self) -> Self::ByteArray { self.0 }

    fn try_from_bytes(ssk: Self::ByteArray) -> Result<Self, Error> { Ok(SharedSecretKey(ssk)) }
}

impl<const N: usize> PartialEq for SharedSecretKey<N> {
    fn eq(&self, other: &Self) -> bool {
        use subtle::ConstantTimeEq;
        self.0.ct_eq(&other.0).into()
    }
}

// This common functionality is injected into each parameter set module.
macro_rules! functionality {
    () => {
        use crate::kem::{decaps, encaps, key_gen};
        use crate::traits::{Decaps, Encaps, KeyGen, SerDes};
        use crate::{Error, SharedSecretKey};
        use rand_core::CryptoRngCore;
        use zeroize::{Zeroize, ZeroizeOnDrop};

        /// Correctly sized encapsulation key specific to this security
        /// parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct EncapsKey([u8; EK_LEN]);

        /// Correctly sized decapsulation key specific to this security
        /// parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct DecapsKey([u8; DK_LEN]);

        /// Correctly sized ciphertext specific to this security parameter
        /// set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct CipherText([u8; CT_LEN]);

        /// Key-generation entry point for this parameter set. Produces an
        /// encapsulation key (public) and a decapsulation key (private).
        pub struct KG();

        impl KeyGen for KG {
            type EncapsKey = EncapsKey;
            type DecapsKey = DecapsKey;

            fn try_keygen_with_rng(
                rng: &mut impl CryptoRngCore,
            ) -> Result<(EncapsKey, DecapsKey), Error> {
                let (mut ek, mut dk) = ([0u8; EK_LEN], [0u8; DK_LEN]);
                key_gen(PARAMS, rng, &mut ek, &mut dk)?;
                Ok((EncapsKey(ek), DecapsKey(dk)))
            }
        }

        impl Encaps for EncapsKey {
            type SharedSecretKey = SharedSecretKey<SS_LEN>;
            type CipherText = CipherText;

            fn try_encaps_with_rng(
                &self, rng: &mut impl CryptoRngCore,
            ) -> Result<(Self::SharedSecretKey, Self::CipherText), Error> {
                let (mut ss, mut ct) = ([0u8; SS_LEN], [0u8; CT_LEN]);
                encaps(PARAMS, rng, &self.0, &mut ss, &mut ct)?;
                Ok((SharedSecretKey(ss), CipherText(ct)))
            }
        }

        impl Decaps for DecapsKey {
            type CipherText = CipherText;
            type SharedSecretKey = SharedSecretKey<SS_LEN>;

            fn try_decaps(&self, ct: &CipherText) -> Result<Self::SharedSecretKey, Error> {
                let mut ss = [0u8; SS_LEN];
                decaps(PARAMS, &self.0, &ct.0, &mut ss)?;
                Ok(SharedSecretKey(ss))
            }
        }

        impl SerDes for EncapsKey {
            type ByteArray = [u8; EK_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(ek: Self::ByteArray) -> Result<Self, Error> { Ok(EncapsKey(ek)) }
        }

        impl SerDes for DecapsKey {
            type ByteArray = [u8; DK_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(dk: Self::ByteArray) -> Result<Self, Error> { Ok(DecapsKey(dk)) }
        }

        impl SerDes for CipherText {
            type ByteArray = [u8; CT_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(ct: Self::ByteArray) -> Result<Self, Error> { Ok(CipherText(ct)) }
        }

        #[cfg(test)]
        mod functionality_tests {
            use super::{CipherText, DecapsKey, EncapsKey, KG};
            use crate::traits::{Decaps, Encaps, KeyGen, SerDes};
            use rand_chacha::rand_core::SeedableRng;
            use rand_chacha::ChaCha20Rng;

            #[test]
            fn keygen_encaps_decaps_round_trips() {
                let mut rng = ChaCha20Rng::seed_from_u64(7);
                let (ek, dk) = KG::try_keygen_with_rng(&mut rng).unwrap();
                let (ssk_a, ct) = ek.try_encaps_with_rng(&mut rng).unwrap();
                let ssk_b = dk.try_decaps(&ct).unwrap();
                assert_eq!(ssk_a, ssk_b);
            }

            #[test]
            fn byte_round_trip_preserves_keys_and_ciphertext() {
                let mut rng = ChaCha20Rng::seed_from_u64(8);
                let (ek, dk) = KG::try_keygen_with_rng(&mut rng).unwrap();
                let ek2 = EncapsKey::try_from_bytes(ek.clone().into_bytes()).unwrap();
                let dk2 = DecapsKey::try_from_bytes(dk.into_bytes()).unwrap();
                let (ssk_a, ct) = ek2.try_encaps_with_rng(&mut rng).unwrap();
                let ct2 = CipherText::try_from_bytes(ct.into_bytes()).unwrap();
                let ssk_b = dk2.try_decaps(&ct2).unwrap();
                assert_eq!(ssk_a, ssk_b);
                let _ = ek;
            }
        }
    };
}

/// Functionality for the SCloud+-128 security parameter set (NIST category
/// 1): `m = n = 600`, fixed-weight secrets with `h1 = h2 = 150`.
#[cfg(feature = "scloud-plus-128")]
pub mod scloud_plus_128 {
    //! Typical usage flow:
    //! 1. The originator runs [`KG::try_keygen`](crate::traits::KeyGen::try_keygen)
    //!    to get an encapsulation key and a decapsulation key.
    //! 2. The originator serialises the encapsulation key via `into_bytes()`
    //!    and sends it to the remote party.
    //! 3. The remote party deserialises it via `try_from_bytes(..)` and
    //!    runs `try_encaps()` to get a shared secret and a ciphertext.
    //! 4. The remote party serialises the ciphertext and sends it back.
    //! 5. The originator deserialises the ciphertext and runs
    //!    `decapsKey.try_decaps(&ciphertext)` to recover the same secret.

    use crate::params::PARAMS_128;
    const PARAMS: &crate::params::Params = &PARAMS_128;

    /// Length in bytes of an [`EncapsKey`]'s byte encoding.
    pub const EK_LEN: usize = PARAMS_128.pk_size;
    /// Length in bytes of a [`DecapsKey`]'s byte encoding.
    pub const DK_LEN: usize = PARAMS_128.kem_sk_size;
    /// Length in bytes of a [`CipherText`]'s byte encoding.
    pub const CT_LEN: usize = PARAMS_128.ctx_size;
    /// Length in bytes of the shared secret this parameter set produces.
    pub const SS_LEN: usize = PARAMS_128.ss;

    functionality!();
}

/// Functionality for the SCloud+-192 security parameter set (NIST category
/// 3): `m = 928`, `n = 896`, fixed-weight secrets with `h1 = 224`, `h2 = 232`.
#[cfg(feature = "scloud-plus-192")]
pub mod scloud_plus_192 {
    //! See [`scloud_plus_128`](crate::scloud_plus_128) for the usage flow;
    //! it is identical across parameter sets.

    use crate::params::PARAMS_192;
    const PARAMS: &crate::params::Params = &PARAMS_192;

    /// Length in bytes of an [`EncapsKey`]'s byte encoding.
    pub const EK_LEN: usize = PARAMS_192.pk_size;
    /// Length in bytes of a [`DecapsKey`]'s byte encoding.
    pub const DK_LEN: usize = PARAMS_192.kem_sk_size;
    /// Length in bytes of a [`CipherText`]'s byte encoding.
    pub const CT_LEN: usize = PARAMS_192.ctx_size;
    /// Length in bytes of the shared secret this parameter set produces.
    pub const SS_LEN: usize = PARAMS_192.ss;

    functionality!();
}

/// Functionality for the SCloud+-256 security parameter set (NIST category
/// 5): `m = 1136`, `n = 1120`, fixed-weight secrets with `h1 = 280`,
/// `h2 = 284`.
#[cfg(feature = "scloud-plus-256")]
pub mod scloud_plus_256 {
    //! See [`scloud_plus_128`](crate::scloud_plus_128) for the usage flow;
    //! it is identical across parameter sets.

    use crate::params::PARAMS_256;
    const PARAMS: &crate::params::Params = &PARAMS_256;

    /// Length in bytes of an [`EncapsKey`]'s byte encoding.
    pub const EK_LEN: usize = PARAMS_256.pk_size;
    /// Length in bytes of a [`DecapsKey`]'s byte encoding.
    pub const DK_LEN: usize = PARAMS_256.kem_sk_size;
    /// Length in bytes of a [`CipherText`]'s byte encoding.
    pub const CT_LEN: usize = PARAMS_256.ctx_size;
    /// Length in bytes of the shared secret this parameter set produces.
    pub const SS_LEN: usize = PARAMS_256.ss;

    functionality!();
}
