//! Concurrency test: independent generate-and-export calls on separate
//! threads share only the OS random source.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use rand::rngs::OsRng;
use sigstore_keygen::{generate_key_pair_with, ExportedKeyPair, KdfParams, KeygenConfig};

#[test]
fn concurrent_generation_produces_distinct_valid_pairs() {
    let config = Arc::new(KeygenConfig::default().with_kdf(KdfParams::scrypt(1024, 1, 1).unwrap()));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let config = Arc::clone(&config);
            thread::spawn(move || {
                (0..10)
                    .map(|i| {
                        let passphrase = format!("thread-{t}-key-{i}");
                        let exported =
                            generate_key_pair_with(&mut OsRng, passphrase.as_bytes(), &config)
                                .expect("generation should succeed");
                        (passphrase, exported)
                    })
                    .collect::<Vec<(String, ExportedKeyPair)>>()
            })
        })
        .collect();

    let mut all = Vec::new();
    for handle in handles {
        all.extend(handle.join().expect("thread should not panic"));
    }
    assert_eq!(all.len(), 80);

    let unique: HashSet<_> = all.iter().map(|(_, e)| e.public_key().to_vec()).collect();
    assert_eq!(unique.len(), 80, "all public keys must be distinct");

    for (passphrase, exported) in &all {
        exported
            .verify_pair(passphrase.as_bytes())
            .expect("every pair should verify");
    }
}
