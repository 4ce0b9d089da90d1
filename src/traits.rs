//! Trait surface shared by every parameter-set module (`scloud_plus_128`,
//! `scloud_plus_192`, `scloud_plus_256`): key generation, encapsulation,
//! decapsulation, and fixed-size byte (de)serialisation. Consumers can use
//! these as trait objects to write level-agnostic code.

use rand_core::CryptoRngCore;
#[cfg(feature = "default-rng")]
use rand_core::OsRng;

/// Generates an encapsulation/decapsulation keypair specific to one
/// security parameter set.
pub trait KeyGen {
    /// The public encapsulation key sent from the originator to the peer.
    type EncapsKey;
    /// The private decapsulation key retained by the originator.
    type DecapsKey;

    /// Generates a keypair using the OS default randomness source.
    ///
    /// # Errors
    /// Returns an error if the randomness source fails.
    ///
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use scloudplus::scloud_plus_128;
    /// use scloudplus::traits::{Decaps, Encaps, KeyGen, SerDes};
    ///
    /// let (ek, dk) = scloud_plus_128::KG::try_keygen()?;
    /// let ek_bytes = ek.into_bytes();
    /// let ek = scloud_plus_128::EncapsKey::try_from_bytes(ek_bytes)?;
    /// let (ssk_a, ct) = ek.try_encaps()?;
    /// let ssk_b = dk.try_decaps(&ct)?;
    /// assert_eq!(ssk_a, ssk_b);
    /// # Ok(())}
    /// ```
    #[cfg(feature = "default-rng")]
    fn try_keygen() -> Result<(Self::EncapsKey, Self::DecapsKey), crate::Error> {
        Self::try_keygen_with_rng(&mut OsRng)
    }

    /// Generates a keypair using a caller-supplied randomness source.
    ///
    /// # Errors
    /// Returns an error if the randomness source fails.
    fn try_keygen_with_rng(
        rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::EncapsKey, Self::DecapsKey), crate::Error>;
}

/// Generates a shared secret and ciphertext from an encapsulation key.
pub trait Encaps {
    /// The shared secret produced alongside the ciphertext.
    type SharedSecretKey;
    /// The ciphertext sent to the decapsulating party.
    type CipherText;

    /// Encapsulates using the OS default randomness source.
    ///
    /// # Errors
    /// Returns an error if the randomness source fails.
    #[cfg(feature = "default-rng")]
    fn try_encaps(&self) -> Result<(Self::SharedSecretKey, Self::CipherText), crate::Error> {
        self.try_encaps_with_rng(&mut OsRng)
    }

    /// Encapsulates using a caller-supplied randomness source.
    ///
    /// # Errors
    /// Returns an error if the randomness source fails.
    fn try_encaps_with_rng(
        &self, rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::SharedSecretKey, Self::CipherText), crate::Error>;
}

/// Recovers the shared secret from a ciphertext and a decapsulation key.
///
/// Per §7 of the design, this only ever fails on a structural problem with
/// `ct` (wrong length); a ciphertext that has been tampered with still
/// succeeds, returning a shared secret derived from the implicit-rejection
/// path rather than the one the encapsulator produced.
pub trait Decaps {
    /// The ciphertext received from the encapsulating party.
    type CipherText;
    /// The shared secret recovered during decapsulation.
    type SharedSecretKey;

    /// # Errors
    /// Returns an error if `ct` fails a structural (length) check.
    fn try_decaps(&self, ct: &Self::CipherText) -> Result<Self::SharedSecretKey, crate::Error>;
}

/// Converts between a cryptographic value and its fixed-size wire
/// representation.
pub trait SerDes {
    /// The fixed-size byte array type used on the wire.
    type ByteArray;

    /// Serialises `self` into its byte array.
    fn into_bytes(self) -> Self::ByteArray;

    /// Deserialises a byte array, validating its length.
    ///
    /// # Errors
    /// Returns an error on malformed input.
    fn try_from_bytes(bytes: Self::ByteArray) -> Result<Self, crate::Error>
    where
        Self: Sized;
}
