// Copyright (C) 2019-2021 Crust Network Technologies Ltd.
// This file is part of Crust.

use codec::{Decode, Encode};
use sp_runtime::RuntimeDebug;
use sp_std::prelude::*;

#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

use crate::{constants::message::NAME_SEPARATOR, error::ProofError, BlockHeight, Bytes};

/// Trie whose root a returned proof is checked against.
#[derive(Clone, Copy, PartialEq, Eq, Encode, Decode, RuntimeDebug)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub enum ProofTriePointer {
    #[codec(index = 0)]
    State,
    #[codec(index = 1)]
    Transaction,
    #[codec(index = 2)]
    Receipts,
}

impl ProofTriePointer {
    pub fn discriminant(&self) -> u8 {
        match self {
            ProofTriePointer::State => 0,
            ProofTriePointer::Transaction => 1,
            ProofTriePointer::Receipts => 2,
        }
    }
}

impl TryFrom<u8> for ProofTriePointer {
    type Error = ProofError;

    fn try_from(discriminant: u8) -> Result<Self, Self::Error> {
        match discriminant {
            0 => Ok(ProofTriePointer::State),
            1 => Ok(ProofTriePointer::Transaction),
            2 => Ok(ProofTriePointer::Receipts),
            _ => Err(ProofError::UnsupportedTrieType(discriminant)),
        }
    }
}

/// Shape of a verifiable response.
#[derive(Clone, PartialEq, Eq, Encode, Decode, RuntimeDebug)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub enum GatewayExpectedOutput {
    /// Storage entries; a `None` value accepts whatever value the proof carries
    #[codec(index = 0)]
    Storage { key: Vec<Vec<u8>>, value: Vec<Option<Bytes>> },
    /// Event records starting with each signature, proven in the receipts trie
    #[codec(index = 1)]
    Events { signatures: Vec<Bytes> },
    /// Inclusion at or after `block_height`, at any height when absent
    #[codec(index = 2)]
    Extrinsic { block_height: Option<BlockHeight> },
    #[codec(index = 3)]
    Output { output: Bytes },
}

impl GatewayExpectedOutput {
    /// Trie a proof for this expectation has to be rooted in, if it needs one.
    pub fn required_trie(&self) -> Option<ProofTriePointer> {
        match self {
            GatewayExpectedOutput::Storage { .. } => Some(ProofTriePointer::State),
            GatewayExpectedOutput::Extrinsic { .. } => Some(ProofTriePointer::Transaction),
            GatewayExpectedOutput::Events { .. } => Some(ProofTriePointer::Receipts),
            GatewayExpectedOutput::Output { .. } => None,
        }
    }
}

/// Pre-signed call data attached to an outbound message.
#[derive(Clone, PartialEq, Eq, Default, Encode, Decode, RuntimeDebug)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct ExtraMessagePayload {
    /// Public key of the signer
    pub signer: Bytes,
    pub module_name: Bytes,
    pub method_name: Bytes,
    pub call_bytes: Bytes,
    /// Signature of `signer` over `call_bytes`
    pub signature: Bytes,
    pub extra: Bytes,
    pub tx_signed: Bytes,
    pub custom_payload: Option<Bytes>,
}

/// Outbound call to a gateway together with what has to come back.
#[derive(Clone, PartialEq, Eq, Encode, Decode, RuntimeDebug)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct CircuitOutboundMessage {
    pub name: Bytes,
    pub module_name: Bytes,
    pub method_name: Bytes,
    pub sender: Option<Bytes>,
    pub target: Option<Bytes>,
    /// Each already encoded with the target gateway's ABI
    pub arguments: Vec<Bytes>,
    pub expected_output: Vec<GatewayExpectedOutput>,
    pub extra_payload: Option<ExtraMessagePayload>,
}

impl CircuitOutboundMessage {
    /// `module::method`
    pub fn compose_name(module_name: &[u8], method_name: &[u8]) -> Bytes {
        let mut name = Vec::with_capacity(module_name.len() + NAME_SEPARATOR.len() + method_name.len());
        name.extend_from_slice(module_name);
        name.extend_from_slice(NAME_SEPARATOR);
        name.extend_from_slice(method_name);
        name
    }

    pub fn with_sender(mut self, sender: Bytes) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn with_target(mut self, target: Bytes) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_extra_payload(mut self, payload: ExtraMessagePayload) -> Self {
        self.extra_payload = Some(payload);
        self
    }
}
