// Copyright (C) 2019-2021 Crust Network Technologies Ltd.
// This file is part of Crust.

#![cfg_attr(not(feature = "std"), no_std)]

//! Outbound calls to gateways and verification of what comes back.

use codec::{Decode, Encode};
use sp_runtime::RuntimeDebug;
use sp_std::prelude::*;

// Circuit primitives
use primitives::{
    crypto::{GatewayAlgorithms, GatewayHasher},
    traits::GatewayRegistry,
    BlockHeight, Bytes, CircuitOutboundMessage, GatewayABIConfig, GatewayExpectedOutput,
    GatewayPointer, ProofError, UnsupportedAlgorithmError,
};

pub mod proof;
pub mod response;

#[cfg(test)]
mod mock;


use proof::{event_leaf, extrinsic_leaf, storage_leaf, verify_proof};
use response::GatewayResponse;

pub(crate) const LOG_TARGET: &'static str = "circuit";

#[macro_export]
macro_rules! log {
    ($level:tt, $patter:expr $(, $values:expr)* $(,)?) => {
        log::$level!(
            target: crate::LOG_TARGET,
            $patter $(, $values)*
        )
    };
}

/// Lifecycle of an outbound message.
#[derive(Clone, Copy, PartialEq, Eq, Encode, Decode, RuntimeDebug)]
pub enum MessageStatus {
    Built,
    Sent,
    AwaitingProof,
    Verified,
    Rejected,
}

impl MessageStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MessageStatus::Verified | MessageStatus::Rejected)
    }
}

#[derive(Clone, PartialEq, Eq, RuntimeDebug, thiserror::Error)]
pub enum MessageError {
    #[error("module name is empty")]
    EmptyModuleName,
    #[error("method name is empty")]
    EmptyMethodName,
    #[error("argument {0} is empty")]
    EmptyArgument(u32),
    #[error("storage expectation lists {keys} keys but {values} values")]
    StorageArityMismatch { keys: u32, values: u32 },
    #[error("message has no extra payload")]
    MissingExtraPayload,
    #[error("extra payload targets another call than the message")]
    PayloadMismatch,
    #[error("extra payload signature does not verify")]
    InvalidSignature,
    #[error(transparent)]
    UnsupportedAlgorithm(#[from] UnsupportedAlgorithmError),
    #[error("cannot move a message from {from:?} to {to:?}")]
    InvalidTransition { from: MessageStatus, to: MessageStatus },
    #[error(transparent)]
    Proof(#[from] ProofError),
}

/// Builds the message for `module::method`.
///
/// Arguments are opaque here, already encoded with the target gateway's ABI.
/// Only their presence is checked.
pub fn build_message(
    module_name: &[u8],
    method_name: &[u8],
    arguments: Vec<Bytes>,
    expected_output: Vec<GatewayExpectedOutput>,
) -> Result<CircuitOutboundMessage, MessageError> {
    if module_name.is_empty() {
        return Err(MessageError::EmptyModuleName);
    }
    if method_name.is_empty() {
        return Err(MessageError::EmptyMethodName);
    }
    if let Some(index) = arguments.iter().position(|arg| arg.is_empty()) {
        return Err(MessageError::EmptyArgument(index as u32));
    }
    for expected in expected_output.iter() {
        if let GatewayExpectedOutput::Storage { key, value } = expected {
            if key.len() != value.len() {
                return Err(MessageError::StorageArityMismatch {
                    keys: key.len() as u32,
                    values: value.len() as u32,
                });
            }
        }
    }

    Ok(CircuitOutboundMessage {
        name: CircuitOutboundMessage::compose_name(module_name, method_name),
        module_name: module_name.to_vec(),
        method_name: method_name.to_vec(),
        sender: None,
        target: None,
        arguments,
        expected_output,
        extra_payload: None,
    })
}

/// Checks the pre-signed call attached to `message` with the gateway's crypto.
pub fn verify_extra_payload(
    message: &CircuitOutboundMessage,
    abi: &GatewayABIConfig,
) -> Result<(), MessageError> {
    let payload = message.extra_payload.as_ref().ok_or(MessageError::MissingExtraPayload)?;
    if payload.module_name != message.module_name || payload.method_name != message.method_name {
        return Err(MessageError::PayloadMismatch);
    }

    let algorithms = GatewayAlgorithms::resolve(abi)?;
    if !algorithms.verify(&payload.signature, &payload.call_bytes, &payload.signer) {
        log!(debug, "🔏 Invalid extra payload signature for {:?}", message.name);
        return Err(MessageError::InvalidSignature);
    }
    Ok(())
}

/// What a response proved, in the order the message expected it.
#[derive(Clone, PartialEq, Eq, Default, RuntimeDebug)]
pub struct VerifiedResult {
    /// Proven storage entries
    pub storage: Vec<(Bytes, Option<Bytes>)>,
    /// Proven event records matching the expected signatures
    pub events: Vec<Bytes>,
    /// Included extrinsic and the height of its block
    pub extrinsic: Option<(BlockHeight, Bytes)>,
    pub output: Option<Bytes>,
}

/// Verifies `raw` against everything `message` expects.
///
/// `trie_root` and `block_height` describe the block the response was taken
/// from, as attested by the transport. `trie_root` is the root of the trie the
/// response declares.
pub fn verify_response<R: GatewayRegistry + ?Sized>(
    message: &CircuitOutboundMessage,
    raw: &[u8],
    trie_root: &[u8],
    block_height: BlockHeight,
    pointer: &GatewayPointer,
    registry: &R,
) -> Result<VerifiedResult, ProofError> {
    let abi = registry.resolve_abi(pointer).map_err(|_| ProofError::UnknownGateway(*pointer))?;
    let hasher = GatewayHasher::resolve(&abi)?;
    let response = GatewayResponse::decode(raw)?;
    let body = &response.body;
    let mut result = VerifiedResult::default();

    for expected in message.expected_output.iter() {
        if let Some(required) = expected.required_trie() {
            if required != response.trie {
                return Err(ProofError::TrieMismatch { expected: required, found: response.trie });
            }
        }

        match expected {
            GatewayExpectedOutput::Storage { key, value } => {
                for (i, key) in key.iter().enumerate() {
                    let entry = body
                        .storage
                        .iter()
                        .find(|entry| entry.key == *key)
                        .ok_or_else(|| ProofError::StorageMismatch { key: key.clone() })?;
                    let value_matches = match value.get(i) {
                        Some(Some(expected)) => entry.value.as_ref() == Some(expected),
                        _ => true,
                    };
                    let leaf = storage_leaf(&hasher, &entry.key, &entry.value);
                    if !value_matches || !verify_proof(&hasher, &leaf, &entry.proof, trie_root) {
                        log!(debug, "🧾 Storage proof of {:?} rejected for {:?}", key, message.name);
                        return Err(ProofError::StorageMismatch { key: key.clone() });
                    }
                    result.storage.push((entry.key.clone(), entry.value.clone()));
                }
            },
            GatewayExpectedOutput::Events { signatures } => {
                for signature in signatures.iter() {
                    // unproven records never shadow a proven one
                    let event = body
                        .events
                        .iter()
                        .filter(|event| event.record.starts_with(signature))
                        .find(|event| {
                            verify_proof(&hasher, &event_leaf(&hasher, &event.record), &event.proof, trie_root)
                        })
                        .ok_or_else(|| {
                            log!(debug, "🧾 No proven event {:?} for {:?}", signature, message.name);
                            ProofError::EventNotFound { signature: signature.clone() }
                        })?;
                    result.events.push(event.record.clone());
                }
            },
            GatewayExpectedOutput::Extrinsic { block_height: required } => {
                let not_included = ProofError::ExtrinsicNotIncluded { required_height: *required };
                let inclusion = body.extrinsic.as_ref().ok_or_else(|| not_included.clone())?;
                if required.map_or(false, |required| block_height < required) {
                    return Err(not_included);
                }
                let leaf = extrinsic_leaf(&hasher, &inclusion.extrinsic);
                if !verify_proof(&hasher, &leaf, &inclusion.proof, trie_root) {
                    return Err(not_included);
                }
                result.extrinsic = Some((block_height, inclusion.extrinsic.clone()));
            },
            GatewayExpectedOutput::Output { output } => {
                if body.output != *output {
                    return Err(ProofError::OutputMismatch);
                }
                result.output = Some(body.output.clone());
            },
        }
    }

    Ok(result)
}

/// An outbound message moving through `Built -> Sent -> AwaitingProof ->
/// {Verified | Rejected}`.
///
/// Retries are up to the transport: a rejected message stays rejected.
#[derive(Clone, PartialEq, Eq, RuntimeDebug)]
pub struct TrackedMessage {
    pub message: CircuitOutboundMessage,
    status: MessageStatus,
    rejection: Option<ProofError>,
}

impl TrackedMessage {
    pub fn new(message: CircuitOutboundMessage) -> Self {
        TrackedMessage { message, status: MessageStatus::Built, rejection: None }
    }

    pub fn status(&self) -> MessageStatus {
        self.status
    }

    /// Why the response was rejected, once `Rejected`.
    pub fn rejection(&self) -> Option<&ProofError> {
        self.rejection.as_ref()
    }

    fn transition(&mut self, from: MessageStatus, to: MessageStatus) -> Result<(), MessageError> {
        if self.status != from {
            return Err(MessageError::InvalidTransition { from: self.status, to });
        }
        log!(trace, "📨 Message {:?} moved from {:?} to {:?}", self.message.name, from, to);
        self.status = to;
        Ok(())
    }

    /// SCALE encoding of the message, for the transport.
    pub fn mark_sent(&mut self) -> Result<Vec<u8>, MessageError> {
        self.transition(MessageStatus::Built, MessageStatus::Sent)?;
        Ok(self.message.encode())
    }

    pub fn await_proof(&mut self) -> Result<(), MessageError> {
        self.transition(MessageStatus::Sent, MessageStatus::AwaitingProof)
    }

    /// Verifies the response and settles the message as `Verified` or
    /// `Rejected`.
    pub fn process_response<R: GatewayRegistry + ?Sized>(
        &mut self,
        raw: &[u8],
        trie_root: &[u8],
        block_height: BlockHeight,
        pointer: &GatewayPointer,
        registry: &R,
    ) -> Result<VerifiedResult, MessageError> {
        if self.status != MessageStatus::AwaitingProof {
            return Err(MessageError::InvalidTransition { from: self.status, to: MessageStatus::Verified });
        }
        match verify_response(&self.message, raw, trie_root, block_height, pointer, registry) {
            Ok(result) => {
                self.transition(MessageStatus::AwaitingProof, MessageStatus::Verified)?;
                log!(info, "✅ Message {:?} verified", self.message.name);
                Ok(result)
            },
            Err(err) => {
                self.transition(MessageStatus::AwaitingProof, MessageStatus::Rejected)?;
                log!(info, "❌ Message {:?} rejected: {:?}, fatal: {}", self.message.name, err, err.is_fatal());
                self.rejection = Some(err.clone());
                Err(err.into())
            },
        }
    }
}
