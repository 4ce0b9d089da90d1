//! Parameter registry (C1): the three named security levels and their
//! derived byte sizes.

/// Modulus for all coefficient arithmetic; every stored `u16` coefficient is
/// implicitly reduced into `[0, Q)`.
pub(crate) const Q: u16 = 4096;
pub(crate) const MOD_Q_MASK: u16 = Q - 1;

/// Width, in coefficients, of a single Barnes-Wall BW32 chunk.
pub(crate) const BW_COMPLEX_LEN: usize = 16;

pub(crate) const ALPHA_LEN: usize = 32;
pub(crate) const SEED_A_LEN: usize = 16;
pub(crate) const SEED_R1_LEN: usize = 32;
pub(crate) const SEED_R2_LEN: usize = 32;
pub(crate) const HPK_LEN: usize = 32;
pub(crate) const RAND_Z_LEN: usize = 32;

/// Selects which unbiased candidate decoder `U8ToN`/`U8ToM`-style sampling
/// uses; tied to the security level rather than derivable from any other
/// field, so it is carried on the parameter record directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SampleKind {
    /// 28-bit words, three base-600 digits per word.
    Base600,
    /// 11-bit words, masked and rejected directly against `n`/`m`.
    Mask11,
    /// 51-bit words, five base-1120 digits per word.
    Base1120,
}

/// An immutable, per-security-level parameter record. Instances are `const`
/// and `'static`; they are never heap-allocated and never freed, matching
/// the shared-immutable ownership model.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Params {
    pub ss: usize,
    pub mbar: usize,
    pub nbar: usize,
    pub m: usize,
    pub n: usize,
    pub logq: u32,
    pub logq1: u32,
    pub logq2: u32,
    pub h1: usize,
    pub h2: usize,
    pub eta1: u32,
    pub eta2: u32,
    pub mu: usize,
    pub mu_count: usize,
    pub tau: u8,
    pub mnin: usize,
    pub mnout: usize,
    pub c1_size: usize,
    pub c2_size: usize,
    pub ctx_size: usize,
    pub pk_size: usize,
    pub pke_sk_size: usize,
    pub kem_sk_size: usize,
    pub sample_kind: SampleKind,
}

pub(crate) const PARAMS_128: Params = Params {
    ss: 16,
    mbar: 8,
    nbar: 8,
    m: 600,
    n: 600,
    logq: 12,
    logq1: 9,
    logq2: 7,
    h1: 150,
    h2: 150,
    eta1: 7,
    eta2: 7,
    mu: 64,
    mu_count: 2,
    tau: 3,
    mnin: 679,
    mnout: 582,
    c1_size: 5400,
    c2_size: 56,
    ctx_size: 5456,
    pk_size: 7216,
    pke_sk_size: 1200,
    kem_sk_size: 8480,
    sample_kind: SampleKind::Base600,
};

pub(crate) const PARAMS_192: Params = Params {
    ss: 24,
    mbar: 8,
    nbar: 8,
    m: 928,
    n: 896,
    logq: 12,
    logq1: 12,
    logq2: 10,
    h1: 224,
    h2: 232,
    eta1: 2,
    eta2: 1,
    mu: 96,
    mu_count: 2,
    tau: 4,
    mnin: 671,
    mnout: 488,
    c1_size: 10752,
    c2_size: 80,
    ctx_size: 10832,
    pk_size: 11152,
    pke_sk_size: 1792,
    kem_sk_size: 13008,
    sample_kind: SampleKind::Mask11,
};

pub(crate) const PARAMS_256: Params = Params {
    ss: 32,
    mbar: 12,
    nbar: 11,
    m: 1136,
    n: 1120,
    logq: 12,
    logq1: 10,
    logq2: 7,
    h1: 280,
    h2: 284,
    eta1: 3,
    eta2: 2,
    mu: 64,
    mu_count: 4,
    tau: 3,
    mnin: 680,
    mnout: 530,
    c1_size: 16800,
    c2_size: 116,
    ctx_size: 16916,
    pk_size: 18760,
    pke_sk_size: 3080,
    kem_sk_size: 21904,
    sample_kind: SampleKind::Base1120,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_invariants_hold() {
        for p in [&PARAMS_128, &PARAMS_192, &PARAMS_256] {
            assert_eq!(p.pke_sk_size + p.pk_size + HPK_LEN + RAND_Z_LEN, p.kem_sk_size);
            assert_eq!(p.c1_size + p.c2_size, p.ctx_size);
            assert!(p.h1 * 2 <= p.n);
            assert!(p.h2 * 2 <= p.m);
        }
    }
}
