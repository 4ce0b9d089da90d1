#![no_main]

use libfuzzer_sys::fuzz_target;
use rand_core::{CryptoRng, RngCore};
use scloudplus::scloud_plus_128;
use scloudplus::traits::{Decaps, Encaps, KeyGen, SerDes};

const RND_SIZE: usize = 32;


struct TestRng {
    data: Vec<Vec<u8>>,
}

impl RngCore for TestRng {
    fn next_u32(&mut self) -> u32 { unimplemented!() }

    fn next_u64(&mut self) -> u64 { unimplemented!() }

    fn fill_bytes(&mut self, out: &mut [u8]) {
        let x = self.data.pop().expect("TestRng problem");
        out.copy_from_slice(&x)
    }

    fn try_fill_bytes(&mut self, out: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(out);
        Ok(()) // panic on probs is OK
    }
}

impl CryptoRng for TestRng {}

impl TestRng {
    fn new() -> Self { TestRng { data: Vec::new() } }

    fn push(&mut self, new_data: &[u8]) {
        let x = new_data.to_vec();
        self.data.push(x);
    }
}

const SS_LEN: usize = scloud_plus_128::SS_LEN;

const DATA_LEN: usize = 2 * RND_SIZE
    + 2 * SS_LEN
    + scloud_plus_128::EK_LEN
    + scloud_plus_128::DK_LEN
    + scloud_plus_128::CT_LEN;

fuzz_target!(|data: [u8; DATA_LEN]| {

    let mut rng = TestRng::new();
    let mut start = 0;
    rng.push(&data[start..start + RND_SIZE]);
    start += RND_SIZE;
    rng.push(&data[start..start + RND_SIZE]);
    start += RND_SIZE;
    let keypair = scloud_plus_128::KG::try_keygen_with_rng(&mut rng); // consumes 2 rng values
    let (ek1, dk1) = keypair.unwrap(); // only rng can fail, which it won't

    let ek2_bytes = &data[start..start + scloud_plus_128::EK_LEN];
    start += scloud_plus_128::EK_LEN;
    let ek2 = scloud_plus_128::EncapsKey::try_from_bytes(ek2_bytes.try_into().unwrap());

    rng.push(&data[start..start + SS_LEN]);
    start += SS_LEN;
    rng.push(&data[start..start + SS_LEN]);
    start += SS_LEN;

    if let Ok(ek2) = ek2 {
        let _res = ek2.try_encaps_with_rng(&mut rng);
    }
    let _res = ek1.try_encaps_with_rng(&mut rng);


    let dk2_bytes = &data[start..start + scloud_plus_128::DK_LEN];
    start += scloud_plus_128::DK_LEN;
    let dk2 = scloud_plus_128::DecapsKey::try_from_bytes(dk2_bytes.try_into().unwrap());

    let ct_bytes = &data[start..start + scloud_plus_128::CT_LEN];
    start += scloud_plus_128::CT_LEN;
    let ct = scloud_plus_128::CipherText::try_from_bytes(ct_bytes.try_into().unwrap()).unwrap(); // always good

    if let Ok(dk2) = dk2 {
        let _res = dk2.try_decaps(&ct);
    }
    let _res = dk1.try_decaps(&ct);

    assert_eq!(start, data.len());
});
