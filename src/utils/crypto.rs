use ring::digest::{Context, SHA256};
use ring::rand::SystemRandom;
use ring::signature::{
    EcdsaKeyPair, KeyPair, ECDSA_P256_SHA256_FIXED, ECDSA_P256_SHA256_FIXED_SIGNING,
};
use ripemd::{Digest as RipemdDigest, Ripemd160};

use crate::error::{BlockchainError, Result};
use std::time::{SystemTime, UNIX_EPOCH};

// Width of one P-256 field element (a curve coordinate or a signature scalar).
const P256_SCALAR_LEN: usize = 32;
const SEC1_UNCOMPRESSED_TAG: u8 = 0x04;

pub fn current_timestamp() -> Result<i64> {
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| BlockchainError::Crypto(format!("System time error: {e}")))?
        .as_millis();

    if duration > i64::MAX as u128 {
        return Err(BlockchainError::Crypto("Timestamp overflow".to_string()));
    }

    Ok(duration as i64)
}

pub fn sha256_digest(data: &[u8]) -> Vec<u8> {
    let mut context = Context::new(&SHA256);
    context.update(data);
    let digest = context.finish();
    digest.as_ref().to_vec()
}

pub fn ripemd160_digest(data: &[u8]) -> Vec<u8> {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

pub fn base58_encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

pub fn base58_decode(data: &str) -> Result<Vec<u8>> {
    bs58::decode(data)
        .into_vec()
        .map_err(|e| BlockchainError::InvalidAddress(format!("Invalid base58 encoding: {e}")))
}

pub fn new_key_pair() -> Result<Vec<u8>> {
    let rng = SystemRandom::new();
    let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, &rng)
        .map_err(|e| BlockchainError::Crypto(format!("Failed to generate ECDSA key pair: {e}")))?
        .as_ref()
        .to_vec();
    Ok(pkcs8)
}

/// Raw `x || y` public key of a PKCS#8 document, without the SEC1 tag byte.
pub fn public_key_from_pkcs8(pkcs8: &[u8]) -> Result<Vec<u8>> {
    let rng = SystemRandom::new();
    let key_pair = EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, pkcs8, &rng)
        .map_err(|e| {
            BlockchainError::Crypto(format!("Failed to create key pair from PKCS8: {e}"))
        })?;
    let encoded = key_pair.public_key().as_ref();
    match encoded.split_first() {
        Some((&SEC1_UNCOMPRESSED_TAG, coordinates)) => Ok(coordinates.to_vec()),
        _ => Err(BlockchainError::Crypto(
            "Unexpected public key encoding".to_string(),
        )),
    }
}

/// Signs `message` and returns the fixed-width `r || s` signature.
pub fn ecdsa_p256_sha256_sign_digest(pkcs8: &[u8], message: &[u8]) -> Result<Vec<u8>> {
    let rng = ring::rand::SystemRandom::new();
    let key_pair = EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, pkcs8, &rng)
        .map_err(|e| {
            BlockchainError::Crypto(format!("Failed to create key pair from PKCS8: {e}"))
        })?;
    let signature = key_pair
        .sign(&rng, message)
        .map_err(|e| BlockchainError::Crypto(format!("Failed to sign message: {e}")))?
        .as_ref()
        .to_vec();
    Ok(signature)
}

/// Verifies an `r || s` signature under an `x || y` public key.
///
/// Both blobs are split at their midpoint and each half is left-padded to the
/// P-256 field width before verification.
pub fn ecdsa_p256_sha256_sign_verify(public_key: &[u8], signature: &[u8], message: &[u8]) -> bool {
    let (x, y) = public_key.split_at(public_key.len() / 2);
    let (r, s) = signature.split_at(signature.len() / 2);

    let (Some(x), Some(y), Some(r), Some(s)) = (
        left_pad_scalar(x),
        left_pad_scalar(y),
        left_pad_scalar(r),
        left_pad_scalar(s),
    ) else {
        return false;
    };

    let mut point = Vec::with_capacity(1 + 2 * P256_SCALAR_LEN);
    point.push(SEC1_UNCOMPRESSED_TAG);
    point.extend_from_slice(&x);
    point.extend_from_slice(&y);

    let mut fixed_signature = Vec::with_capacity(2 * P256_SCALAR_LEN);
    fixed_signature.extend_from_slice(&r);
    fixed_signature.extend_from_slice(&s);

    let peer_public_key = ring::signature::UnparsedPublicKey::new(&ECDSA_P256_SHA256_FIXED, point);
    peer_public_key
        .verify(message, fixed_signature.as_slice())
        .is_ok()
}

fn left_pad_scalar(bytes: &[u8]) -> Option<[u8; P256_SCALAR_LEN]> {
    if bytes.is_empty() || bytes.len() > P256_SCALAR_LEN {
        return None;
    }
    let mut padded = [0u8; P256_SCALAR_LEN];
    padded[P256_SCALAR_LEN - bytes.len()..].copy_from_slice(bytes);
    Some(padded)
}
