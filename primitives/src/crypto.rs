// Copyright (C) 2019-2021 Crust Network Technologies Ltd.
// This file is part of Crust.

//! Resolution of a gateway's hashing and signature algorithms.

use sp_core::hashing::{blake2_128, blake2_512, blake2_64, keccak_512};
use sp_runtime::{
    traits::{BlakeTwo256, Hash as HashT, Keccak256 as Keccak},
    RuntimeDebug,
};
use sp_std::prelude::*;

#[cfg(feature = "full_crypto")]
use sp_core::{ecdsa, ed25519, sr25519, Pair};

use crate::{
    error::UnsupportedAlgorithmError,
    gateway::{CryptoAlgo, GatewayABIConfig, HasherAlgo},
};

/// Hash function of a gateway, `hasher` at `hash_size` output bytes.
#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub struct GatewayHasher {
    pub algo: HasherAlgo,
    pub output_len: u16,
}

impl GatewayHasher {
    pub fn new(algo: HasherAlgo, output_len: u16) -> Result<Self, UnsupportedAlgorithmError> {
        match (algo, output_len) {
            (HasherAlgo::Blake2, 8) | (HasherAlgo::Blake2, 16) | (HasherAlgo::Blake2, 32) |
            (HasherAlgo::Blake2, 64) | (HasherAlgo::Keccak256, 32) | (HasherAlgo::Keccak256, 64) => {
                Ok(GatewayHasher { algo, output_len })
            },
            _ => Err(UnsupportedAlgorithmError::HashSize { hasher: algo, size: output_len }),
        }
    }

    pub fn resolve(abi: &GatewayABIConfig) -> Result<Self, UnsupportedAlgorithmError> {
        Self::new(abi.hasher, abi.hash_size)
    }

    pub fn hash(&self, data: &[u8]) -> Vec<u8> {
        match (self.algo, self.output_len) {
            (HasherAlgo::Blake2, 8) => blake2_64(data).to_vec(),
            (HasherAlgo::Blake2, 16) => blake2_128(data).to_vec(),
            (HasherAlgo::Blake2, 64) => blake2_512(data).to_vec(),
            (HasherAlgo::Blake2, _) => <BlakeTwo256 as HashT>::hash(data).as_bytes().to_vec(),
            (HasherAlgo::Keccak256, 64) => keccak_512(data).to_vec(),
            (HasherAlgo::Keccak256, _) => <Keccak as HashT>::hash(data).as_bytes().to_vec(),
        }
    }

    /// Hash of the concatenation of `parts`.
    pub fn hash_concat(&self, parts: &[&[u8]]) -> Vec<u8> {
        self.hash(&parts.concat())
    }
}

/// Signature scheme of a gateway.
#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub struct SignatureScheme(pub CryptoAlgo);

impl SignatureScheme {
    pub fn resolve(abi: &GatewayABIConfig) -> Self {
        SignatureScheme(abi.crypto)
    }

    pub fn public_key_len(&self) -> usize {
        match self.0 {
            CryptoAlgo::Ed25519 | CryptoAlgo::Sr25519 => 32,
            // compressed secp256k1 point
            CryptoAlgo::Ecdsa => 33,
        }
    }

    pub fn signature_len(&self) -> usize {
        match self.0 {
            CryptoAlgo::Ed25519 | CryptoAlgo::Sr25519 => 64,
            CryptoAlgo::Ecdsa => 65,
        }
    }

    /// Whether `signature` over `message` was made by `public`.
    ///
    /// Ecdsa signs the 32 byte digest of `message` under the gateway's
    /// `hasher`, keccak for Ethereum. Malformed keys or signatures never verify.
    #[cfg(feature = "full_crypto")]
    pub fn verify(&self, signature: &[u8], message: &[u8], public: &[u8], hasher: &GatewayHasher) -> bool {
        match self.0 {
            CryptoAlgo::Ed25519 => {
                match (ed25519::Signature::try_from(signature), ed25519::Public::try_from(public)) {
                    (Ok(sig), Ok(public)) => ed25519::Pair::verify(&sig, message, &public),
                    _ => false,
                }
            },
            CryptoAlgo::Sr25519 => {
                match (sr25519::Signature::try_from(signature), sr25519::Public::try_from(public)) {
                    (Ok(sig), Ok(public)) => sr25519::Pair::verify(&sig, message, &public),
                    _ => false,
                }
            },
            CryptoAlgo::Ecdsa => {
                let digest: [u8; 32] = match hasher.hash(message).try_into() {
                    Ok(digest) => digest,
                    Err(_) => return false,
                };
                match (ecdsa::Signature::try_from(signature), ecdsa::Public::try_from(public)) {
                    (Ok(sig), Ok(public)) => ecdsa::Pair::verify_prehashed(&sig, &digest, &public),
                    _ => false,
                }
            },
        }
    }
}

/// Shorthand for [`GatewayAlgorithms::resolve`].
pub fn resolve_algorithms(abi: &GatewayABIConfig) -> Result<GatewayAlgorithms, UnsupportedAlgorithmError> {
    GatewayAlgorithms::resolve(abi)
}

/// Concrete algorithms a gateway's data must be checked with.
#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub struct GatewayAlgorithms {
    pub hasher: GatewayHasher,
    pub crypto: SignatureScheme,
}

impl GatewayAlgorithms {
    pub fn resolve(abi: &GatewayABIConfig) -> Result<Self, UnsupportedAlgorithmError> {
        Ok(GatewayAlgorithms { hasher: GatewayHasher::resolve(abi)?, crypto: SignatureScheme::resolve(abi) })
    }

    /// Checks `signature` with the gateway's crypto, digesting with its hasher
    /// where the scheme needs it.
    #[cfg(feature = "full_crypto")]
    pub fn verify(&self, signature: &[u8], message: &[u8], public: &[u8]) -> bool {
        self.crypto.verify(signature, message, public, &self.hasher)
    }

    /// Resolves straight from wire discriminants. Unknown ones are a hard
    /// failure, never a fallback to some default algorithm.
    pub fn from_discriminants(
        hasher: u8,
        hash_size: u16,
        crypto: u8,
    ) -> Result<Self, UnsupportedAlgorithmError> {
        let hasher = GatewayHasher::new(HasherAlgo::try_from(hasher)?, hash_size)?;
        let crypto = SignatureScheme(CryptoAlgo::try_from(crypto)?);
        Ok(GatewayAlgorithms { hasher, crypto })
    }
}
