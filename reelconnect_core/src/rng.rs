use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::error::CoreError;

// Provably-fair construction:
// server_seed (secret) + client_seed + nonce -> HMAC-SHA256 -> bytes -> floats in [0,1)

pub type HmacSha256 = Hmac<Sha256>;

pub fn derive_hash(input: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(input));
    out
}

pub fn derive_hash_hex(input: &[u8]) -> String {
    hex::encode(derive_hash(input))
}

pub fn derive_floats(seed_bytes: &[u8], count: usize) -> Vec<f64> {
    // Successive big-endian u32 chunks, scaled into [0,1)
    let mut out = Vec::with_capacity(count);
    let mut buffer = seed_bytes.to_vec();
    let mut i = 0usize;
    while out.len() < count {
        if i + 4 > buffer.len() {
            // out of entropy: chain the buffer through SHA-256
            buffer = derive_hash(&buffer).to_vec();
            i = 0;
            continue;
        }
        let v = u32::from_be_bytes([buffer[i], buffer[i + 1], buffer[i + 2], buffer[i + 3]]);
        out.push(v as f64 / (u32::MAX as f64 + 1.0));
        i += 4;
    }
    out
}

/// Seeds for one spin. The server seed stays secret until rotated; its hash
/// is published up front so players can check past spins.
#[derive(Debug, Clone)]
pub struct ProvablyFairRng {
    pub server_seed: String,
    pub client_seed: String,
    pub nonce: u64,
}

impl ProvablyFairRng {
    pub fn new(server_seed: impl Into<String>, client_seed: impl Into<String>, nonce: u64) -> Self {
        Self {
            server_seed: server_seed.into(),
            client_seed: client_seed.into(),
            nonce,
        }
    }

    pub fn server_seed_hash_hex(&self) -> String {
        derive_hash_hex(self.server_seed.as_bytes())
    }

    pub fn hmac_bytes(&self) -> Result<[u8; 32], CoreError> {
        let mut mac = HmacSha256::new_from_slice(self.server_seed.as_bytes())?;
        mac.update(format!("{}:{}", self.client_seed, self.nonce).as_bytes());
        let mut out = [0u8; 32];
        out.copy_from_slice(&mac.finalize().into_bytes());
        Ok(out)
    }

    pub fn next_floats(&self, count: usize) -> Result<Vec<f64>, CoreError> {
        Ok(derive_floats(&self.hmac_bytes()?, count))
    }

    /// Same seeds, following nonce.
    pub fn advance(&self) -> Self {
        Self {
            nonce: self.nonce + 1,
            ..self.clone()
        }
    }
}
