// Copyright (C) 2019-2021 Crust Network Technologies Ltd.
// This file is part of Crust.

//! Binary Merkle inclusion proofs over a gateway's hasher.
//!
//! Leaves are positional. A leaf is `H(0x00 ++ data)` and an inner node is
//! `H(0x01 ++ left ++ right)`, so no leaf preimage can pass for a node. A level
//! with an odd number of nodes promotes its last node unchanged.

use codec::{Decode, Encode};
use sp_runtime::RuntimeDebug;
use sp_std::prelude::*;

use primitives::{crypto::GatewayHasher, Bytes};

const LEAF_PREFIX: u8 = 0x00;
const NODE_PREFIX: u8 = 0x01;

/// One step of an inclusion proof.
#[derive(Clone, PartialEq, Eq, Encode, Decode, RuntimeDebug)]
pub struct ProofNode {
    /// Hash of the sibling node
    pub hash: Bytes,
    /// Whether the sibling sits on the left of the running hash
    pub is_left: bool,
}

pub fn leaf_hash(hasher: &GatewayHasher, data: &[u8]) -> Bytes {
    hasher.hash_concat(&[&[LEAF_PREFIX][..], data])
}

pub fn node_hash(hasher: &GatewayHasher, left: &[u8], right: &[u8]) -> Bytes {
    hasher.hash_concat(&[&[NODE_PREFIX][..], left, right])
}

/// Leaf committing to a storage entry, over `SCALE((key, value))`.
pub fn storage_leaf(hasher: &GatewayHasher, key: &[u8], value: &Option<Bytes>) -> Bytes {
    leaf_hash(hasher, &(key, value).encode())
}

pub fn extrinsic_leaf(hasher: &GatewayHasher, extrinsic: &[u8]) -> Bytes {
    leaf_hash(hasher, extrinsic)
}

pub fn event_leaf(hasher: &GatewayHasher, record: &[u8]) -> Bytes {
    leaf_hash(hasher, record)
}

fn next_level(hasher: &GatewayHasher, level: &[Bytes]) -> Vec<Bytes> {
    level
        .chunks(2)
        .map(|pair| match pair {
            [left, right] => node_hash(hasher, left, right),
            [last] => last.clone(),
            _ => Vec::new(),
        })
        .collect()
}

/// Root over already hashed `leaves`, `None` for an empty tree.
pub fn merkle_root(hasher: &GatewayHasher, leaves: &[Bytes]) -> Option<Bytes> {
    let mut level = leaves.to_vec();
    while level.len() > 1 {
        level = next_level(hasher, &level);
    }
    level.pop()
}

/// Inclusion proof of `leaves[index]`, `None` when out of range.
pub fn merkle_proof(hasher: &GatewayHasher, leaves: &[Bytes], index: usize) -> Option<Vec<ProofNode>> {
    if index >= leaves.len() {
        return None;
    }

    let mut proof = Vec::new();
    let mut level = leaves.to_vec();
    let mut idx = index;
    while level.len() > 1 {
        if idx % 2 == 1 {
            proof.push(ProofNode { hash: level[idx - 1].clone(), is_left: true });
        } else if let Some(sibling) = level.get(idx + 1) {
            proof.push(ProofNode { hash: sibling.clone(), is_left: false });
        }
        // a promoted last node adds no step
        level = next_level(hasher, &level);
        idx /= 2;
    }
    Some(proof)
}

/// Folds `proof` over `leaf` and compares the result with `root`.
pub fn verify_proof(hasher: &GatewayHasher, leaf: &[u8], proof: &[ProofNode], root: &[u8]) -> bool {
    let computed = proof.iter().fold(leaf.to_vec(), |acc, node| match node.is_left {
        true => node_hash(hasher, &node.hash, &acc),
        false => node_hash(hasher, &acc, &node.hash),
    });
    computed == root
}
