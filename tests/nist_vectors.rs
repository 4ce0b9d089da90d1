include!("nist_vectors/mod.rs");
