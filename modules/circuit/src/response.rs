// Copyright (C) 2019-2021 Crust Network Technologies Ltd.
// This file is part of Crust.

//! Raw gateway responses.
//!
//! A response is one `ProofTriePointer` discriminant byte followed by a SCALE
//! encoded `ResponseBody`.

use codec::{Decode, Encode};
use sp_runtime::RuntimeDebug;
use sp_std::prelude::*;

use primitives::{Bytes, ProofError, ProofTriePointer};

use crate::proof::ProofNode;

/// Storage entry the gateway claims, with its inclusion proof.
#[derive(Clone, PartialEq, Eq, Encode, Decode, RuntimeDebug)]
pub struct StorageEntry {
    pub key: Bytes,
    /// `None` proves the key is absent
    pub value: Option<Bytes>,
    pub proof: Vec<ProofNode>,
}

/// Extrinsic the gateway claims was included in the block the response was
/// taken from. The block itself is attested by the transport.
#[derive(Clone, PartialEq, Eq, Encode, Decode, RuntimeDebug)]
pub struct ExtrinsicInclusion {
    pub extrinsic: Bytes,
    pub proof: Vec<ProofNode>,
}

/// Raw event record, starting with the event signature, and its inclusion
/// proof in the receipts trie.
#[derive(Clone, PartialEq, Eq, Encode, Decode, RuntimeDebug)]
pub struct EventRecord {
    pub record: Bytes,
    pub proof: Vec<ProofNode>,
}

#[derive(Clone, PartialEq, Eq, Default, Encode, Decode, RuntimeDebug)]
pub struct ResponseBody {
    pub storage: Vec<StorageEntry>,
    pub events: Vec<EventRecord>,
    pub extrinsic: Option<ExtrinsicInclusion>,
    pub output: Bytes,
}

#[derive(Clone, PartialEq, Eq, RuntimeDebug)]
pub struct GatewayResponse {
    pub trie: ProofTriePointer,
    pub body: ResponseBody,
}

impl GatewayResponse {
    /// Decodes a raw response. Unknown trie discriminants are reported as such,
    /// everything else that does not parse is `MalformedResponse`.
    pub fn decode(raw: &[u8]) -> Result<Self, ProofError> {
        let (&discriminant, mut rest) = raw.split_first().ok_or(ProofError::MalformedResponse)?;
        let trie = ProofTriePointer::try_from(discriminant)?;
        let body = ResponseBody::decode(&mut rest).map_err(|_| ProofError::MalformedResponse)?;
        if !rest.is_empty() {
            return Err(ProofError::MalformedResponse);
        }
        Ok(GatewayResponse { trie, body })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut raw = vec![self.trie.discriminant()];
        self.body.encode_to(&mut raw);
        raw
    }
}
