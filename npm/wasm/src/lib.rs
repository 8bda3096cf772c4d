//! sigstore-keygen WASM bindings.
//!
//! On instantiation a key pair is generated with an empty passphrase and
//! published as the JS globals `cosignPublicKey` and `cosignPrivateKey`.
//! A failure rejects the module start instead of being dropped.
//!
//! ```javascript
//! import init, { generateKeyPair } from 'sigstore-keygen-wasm';
//!
//! await init();
//! console.log(globalThis.cosignPublicKey);
//!
//! const pair = generateKeyPair(new TextEncoder().encode("passphrase"));
//! console.log(pair.publicKey, pair.privateKey);
//! ```

use rand::rngs::OsRng;
use sigstore_keygen::{
    generate_and_publish, generate_key_pair_with, ExportedKeyPair, KeyPairSink, KeygenConfig,
    KeygenError,
};
use wasm_bindgen::prelude::*;

/// Publishes into properties of the JS global object.
struct GlobalSink {
    global: js_sys::Object,
}

impl GlobalSink {
    fn new() -> Self {
        Self {
            global: js_sys::global(),
        }
    }

    fn set(&self, slot: &str, value: &str) -> sigstore_keygen::Result<()> {
        js_sys::Reflect::set(&self.global, &JsValue::from_str(slot), &JsValue::from_str(value))
            .map_err(|e| KeygenError::Publish(format!("set {slot}: {e:?}")))
            .and_then(|ok| {
                if ok {
                    Ok(())
                } else {
                    Err(KeygenError::Publish(format!("global {slot} is read-only")))
                }
            })
    }
}

impl KeyPairSink for GlobalSink {
    fn publish(&mut self, public_key_pem: &str, private_key_pem: &str) -> sigstore_keygen::Result<()> {
        self.set(sigstore_keygen::PUBLIC_KEY_SLOT, public_key_pem)?;
        self.set(sigstore_keygen::PRIVATE_KEY_SLOT, private_key_pem)
    }
}

/// Module entry point: generate with an empty passphrase and set the globals.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    generate_and_publish(&mut GlobalSink::new(), &mut OsRng, b"", &KeygenConfig::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// A generated key pair with its halves exposed under distinct names.
#[wasm_bindgen]
pub struct WasmKeyPair {
    inner: ExportedKeyPair,
}

#[wasm_bindgen]
impl WasmKeyPair {
    /// The `PUBLIC KEY` PEM block.
    #[wasm_bindgen(getter, js_name = publicKey)]
    pub fn public_key(&self) -> String {
        self.inner.public_key_pem().to_string()
    }

    /// The passphrase-encrypted private key PEM block.
    #[wasm_bindgen(getter, js_name = privateKey)]
    pub fn private_key(&self) -> String {
        self.inner.private_key_pem().to_string()
    }
}

/// Generate a key pair encrypted under `passphrase`.
#[wasm_bindgen(js_name = generateKeyPair)]
pub fn generate_key_pair(passphrase: &[u8]) -> Result<WasmKeyPair, JsValue> {
    let inner = generate_key_pair_with(&mut OsRng, passphrase, &KeygenConfig::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(WasmKeyPair { inner })
}
