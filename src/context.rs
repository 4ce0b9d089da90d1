//! C8 (expansion) — the stateful context wrapping C1-C7: the three-state
//! control surface (`empty -> parameterised -> keyed`) through which a
//! surrounding framework drives key generation, encapsulation, and
//! decapsulation without committing to a parameter set at compile time.

use alloc::vec;
use alloc::vec::Vec;

use rand_core::CryptoRngCore;
#[cfg(feature = "default-rng")]
use rand_core::OsRng;
use zeroize::Zeroize;

use crate::kem;
use crate::params::{Params, PARAMS_128, PARAMS_192, PARAMS_256};
use crate::types::Error;

enum State {
    Empty,
    Parameterised(&'static Params),
    Keyed { params: &'static Params, pk: Option<Vec<u8>>, sk: Option<Vec<u8>> },
}

/// The per-operation context a caller owns across the lifetime of a key:
/// an optional bound parameter set, an optional public key, and an
/// optional private key. Key material is exclusively owned by the context
/// and is zeroised on [`Context::free`] or `Drop`.
///
/// ```
/// use scloudplus::Context;
///
/// let mut alice = Context::new();
/// alice.set_key_bits(128).unwrap();
/// alice.generate(&mut rand_core::OsRng).unwrap();
///
/// let mut bob = Context::new();
/// bob.set_key_bits(128).unwrap();
/// bob.import_pub(&alice.public_key().unwrap()).unwrap();
///
/// let (ctx, ss_bob) = bob.encapsulate(&mut rand_core::OsRng).unwrap();
/// let ss_alice = alice.decapsulate(&ctx).unwrap();
/// assert_eq!(ss_alice, ss_bob);
/// ```
pub struct Context {
    state: State,
}

impl Default for Context {
    fn default() -> Self { Context { state: State::Empty } }
}

impl Context {
    /// Creates an empty context bound to no parameter set and no keys.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// `SetKeyBits`: binds one of the three named security levels. Legal
    /// from the empty state; from the parameterised or keyed state it is a
    /// no-op if `bits` repeats the level already bound, and an
    /// [`Error::InvalidArgument`] if it names a different one. Any other
    /// value is always [`Error::InvalidArgument`].
    pub fn set_key_bits(&mut self, bits: u32) -> Result<(), Error> {
        let params: &'static Params = match bits {
            128 => &PARAMS_128,
            192 => &PARAMS_192,
            256 => &PARAMS_256,
            _ => return Err(Error::InvalidArgument),
        };
        match &self.state {
            State::Empty => {
                self.state = State::Parameterised(params);
                Ok(())
            }
            State::Parameterised(bound) | State::Keyed { params: bound, .. } => {
                if core::ptr::eq(*bound, params) {
                    Ok(())
                } else {
                    Err(Error::InvalidArgument)
                }
            }
        }
    }

    fn bound_params(&self) -> Result<&'static Params, Error> {
        match &self.state {
            State::Empty => Err(Error::NullInput),
            State::Parameterised(p) | State::Keyed { params: p, .. } => Ok(p),
        }
    }

    /// `Generate`: samples a fresh keypair for the bound parameter set
    /// using the supplied randomness source, moving the context to the
    /// keyed state.
    pub fn generate(&mut self, rng: &mut impl CryptoRngCore) -> Result<(), Error> {
        let params = self.bound_params()?;
        let mut pk = vec![0u8; params.pk_size];
        let mut sk = vec![0u8; params.kem_sk_size];
        kem::key_gen(params, rng, &mut pk, &mut sk)?;
        self.state = State::Keyed { params, pk: Some(pk), sk: Some(sk) };
        Ok(())
    }

    /// `Generate`, drawing randomness from [`OsRng`].
    #[cfg(feature = "default-rng")]
    pub fn generate_default_rng(&mut self) -> Result<(), Error> { self.generate(&mut OsRng) }

    /// `ImportPub`: adopts an externally-supplied public key of the
    /// correct length for the bound parameter set.
    pub fn import_pub(&mut self, pk: &[u8]) -> Result<(), Error> {
        let params = self.bound_params()?;
        if pk.len() != params.pk_size {
            return Err(Error::InvalidArgument);
        }
        match &mut self.state {
            State::Keyed { pk: slot, .. } => *slot = Some(pk.to_vec()),
            State::Parameterised(p) => self.state = State::Keyed { params: p, pk: Some(pk.to_vec()), sk: None },
            State::Empty => return Err(Error::NullInput),
        }
        Ok(())
    }

    /// `ImportPriv`: adopts an externally-supplied private key of the
    /// correct length for the bound parameter set.
    pub fn import_priv(&mut self, sk: &[u8]) -> Result<(), Error> {
        let params = self.bound_params()?;
        if sk.len() != params.kem_sk_size {
            return Err(Error::InvalidArgument);
        }
        match &mut self.state {
            State::Keyed { sk: slot, .. } => *slot = Some(sk.to_vec()),
            State::Parameterised(p) => self.state = State::Keyed { params: p, pk: None, sk: Some(sk.to_vec()) },
            State::Empty => return Err(Error::NullInput),
        }
        Ok(())
    }

    /// Borrows the bound public key, if one has been generated or
    /// imported.
    #[must_use]
    pub fn public_key(&self) -> Option<&[u8]> {
        match &self.state {
            State::Keyed { pk: Some(pk), .. } => Some(pk),
            _ => None,
        }
    }

    /// Borrows the bound private key, if one has been generated or
    /// imported.
    #[must_use]
    pub fn private_key(&self) -> Option<&[u8]> {
        match &self.state {
            State::Keyed { sk: Some(sk), .. } => Some(sk),
            _ => None,
        }
    }

    /// `Encapsulate`: requires a bound public key; returns `(ctx, ss)`.
    pub fn encapsulate(&self, rng: &mut impl CryptoRngCore) -> Result<(Vec<u8>, Vec<u8>), Error> {
        let (params, pk) = match &self.state {
            State::Keyed { params, pk: Some(pk), .. } => (*params, pk.as_slice()),
            _ => return Err(Error::NullInput),
        };
        let mut ss = vec![0u8; params.ss];
        let mut ctx = vec![0u8; params.ctx_size];
        kem::encaps(params, rng, pk, &mut ss, &mut ctx)?;
        Ok((ctx, ss))
    }

    /// `Decapsulate`: requires a bound private key; returns the shared
    /// secret. Unless `ctx` fails the length check, this always succeeds
    /// — a tampered ciphertext routes into implicit rejection rather than
    /// reporting an error.
    pub fn decapsulate(&self, ctx: &[u8]) -> Result<Vec<u8>, Error> {
        let (params, sk) = match &self.state {
            State::Keyed { params, sk: Some(sk), .. } => (*params, sk.as_slice()),
            _ => return Err(Error::NullInput),
        };
        let mut ss = vec![0u8; params.ss];
        kem::decaps(params, sk, ctx, &mut ss)?;
        Ok(ss)
    }

    /// `Free`: zeroises and releases any bound key material, returning the
    /// context to the empty state. The shared, immutable parameter record
    /// is never freed, matching its shared-immutable ownership model.
    pub fn free(&mut self) {
        if let State::Keyed { pk, sk, .. } = &mut self.state {
            if let Some(pk) = pk {
                pk.zeroize();
            }
            if let Some(sk) = sk {
                sk.zeroize();
            }
        }
        self.state = State::Empty;
    }
}

impl Drop for Context {
    fn drop(&mut self) { self.free(); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn lifecycle_round_trips_a_shared_secret() {
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        let mut alice = Context::new();
        alice.set_key_bits(128).unwrap();
        alice.generate(&mut rng).unwrap();

        let mut bob = Context::new();
        bob.set_key_bits(128).unwrap();
        bob.import_pub(alice.public_key().unwrap()).unwrap();

        let (ctx, ss_bob) = bob.encapsulate(&mut rng).unwrap();
        let ss_alice = alice.decapsulate(&ctx).unwrap();
        assert_eq!(ss_alice, ss_bob);
    }

    #[test]
    fn set_key_bits_rejects_unknown_level() {
        let mut ctx = Context::new();
        assert_eq!(ctx.set_key_bits(512), Err(Error::InvalidArgument));
    }

    #[test]
    fn set_key_bits_is_a_no_op_when_repeated() {
        let mut ctx = Context::new();
        ctx.set_key_bits(192).unwrap();
        assert_eq!(ctx.set_key_bits(192), Ok(()));
        assert_eq!(ctx.set_key_bits(256), Err(Error::InvalidArgument));
    }

    #[test]
    fn encapsulate_before_set_key_bits_is_null_input() {
        let ctx = Context::new();
        assert_eq!(ctx.encapsulate(&mut rand_chacha::ChaCha20Rng::seed_from_u64(1)), Err(Error::NullInput));
    }

    #[test]
    fn decapsulate_rejects_wrong_length_ciphertext() {
        let mut rng = ChaCha20Rng::seed_from_u64(22);
        let mut alice = Context::new();
        alice.set_key_bits(128).unwrap();
        alice.generate(&mut rng).unwrap();
        let bad_ctx = vec![0u8; 3];
        assert_eq!(alice.decapsulate(&bad_ctx), Err(Error::InvalidArgument));
    }
}
