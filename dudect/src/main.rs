// Note that this package does not provide any constant-time assurances.
// However, this code fragment lays the groundwork should that change.

use dudect_bencher::{ctbench_main, BenchRng, Class, CtRunner};
use scloudplus::scloud_plus_128;
use scloudplus::traits::{Decaps, Encaps, KeyGen};

use crate::scloud_plus_128::{CipherText, DecapsKey, EncapsKey};

fn encaps(runner: &mut CtRunner, mut _rng: &mut BenchRng) {
    const ITERATIONS_OUTER: usize = 1000;
    const ITERATIONS_INNER: usize = 100;

    let (ek1, _dk1) = scloud_plus_128::KG::try_keygen().unwrap();
    let (ek2, _dk2) = scloud_plus_128::KG::try_keygen().unwrap();

    let mut inputs: Vec<EncapsKey> = Vec::new();
    let mut classes = Vec::new();

    for _ in 0..ITERATIONS_OUTER {
        inputs.push(ek1.clone());
        classes.push(Class::Left);
    }

    for _ in 0..ITERATIONS_OUTER {
        inputs.push(ek2.clone());
        classes.push(Class::Right);
    }

    for (class, input) in classes.into_iter().zip(inputs.into_iter()) {
        runner.run_one(class, || {
            for _ in 0..ITERATIONS_INNER {
                let _ = input.try_encaps();
            }
        })
    }
}

fn decaps(runner: &mut CtRunner, mut _rng: &mut BenchRng) {
    const ITERATIONS_OUTER: usize = 1000;
    const ITERATIONS_INNER: usize = 100;

    let (ek1, dk1) = scloud_plus_128::KG::try_keygen().unwrap();
    let (_ssk, ct1) = ek1.try_encaps().unwrap();
    let (ek2, dk2) = scloud_plus_128::KG::try_keygen().unwrap();
    let (_ssk, ct2) = ek2.try_encaps().unwrap();

    let mut inputs: Vec<(DecapsKey, CipherText)> = Vec::new();
    let mut classes = Vec::new();

    for _ in 0..ITERATIONS_OUTER {
        inputs.push((dk1.clone(), ct1.clone()));
        classes.push(Class::Left);
    }

    for _ in 0..ITERATIONS_OUTER {
        inputs.push((dk2.clone(), ct2.clone()));
        classes.push(Class::Right);
    }

    for (class, input) in classes.into_iter().zip(inputs.into_iter()) {
        runner.run_one(class, || {
            for _ in 0..ITERATIONS_INNER {
                let _ = input.0.try_decaps(&input.1);
            }
        })
    }
}


ctbench_main!(encaps, decaps);

/*
See https://docs.rs/dudect-bencher/latest/dudect_bencher/

$ cargo run --release -- --continuous decaps
running 1 benchmark continuously
bench decaps seeded with 0x0cd3626e7d56f68c
...
*/
