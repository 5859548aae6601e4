// Copyright (C) 2019-2021 Crust Network Technologies Ltd.
// This file is part of Crust.

//! Error taxonomy shared by the descriptor model, the layout engine and the
//! response verifier.
//!
//! All of them are local, synchronous failures. Only the protocol-version
//! class (unknown algorithm discriminants, unknown trie pointers) is fatal,
//! see [`ProofError::is_fatal`].

use sp_runtime::RuntimeDebug;
use thiserror::Error;

use crate::{
    gateway::{GatewayPointer, HasherAlgo},
    message::ProofTriePointer,
    Bytes, Name,
};

/// Malformed or inconsistent `StructDecl`, or a buffer that does not fit it.
#[derive(Clone, PartialEq, Eq, RuntimeDebug, Error)]
pub enum LayoutError {
    #[error("struct declares {fields} fields but {offsets} offsets")]
    OffsetCountMismatch { fields: u32, offsets: u32 },
    #[error("offset of field {field:?} is lower than the offset before it")]
    UnsortedOffsets { field: Name },
    #[error("field {field:?} declared at offset {declared}, expected {expected}")]
    WidthMismatch { field: Name, expected: u32, declared: u32 },
    #[error("variable width field {field:?} must be the last field")]
    VariableWidthNotLast { field: Name },
    #[error("field {field:?} has an unsupported width")]
    UnsupportedWidth { field: Name },
    #[error("field {field:?} is declared twice")]
    DuplicateField { field: Name },
    #[error("struct {0:?} is declared twice")]
    DuplicateStruct(Name),
    #[error("type of field {field:?} is nested too deep")]
    TypeTooDeep { field: Name },
    #[error("struct layout does not fit into 16 bit offsets")]
    OffsetOverflow,
    #[error("field {field:?} needs {needed} bytes but only {available} are left")]
    BufferTooShort { field: Name, needed: u32, available: u32 },
    #[error("{0} bytes left after the last field")]
    TrailingBytes(u32),
    #[error("invalid length prefix in field {field:?}")]
    InvalidLengthPrefix { field: Name },
    #[error("invalid boolean byte {byte} in field {field:?}")]
    InvalidBool { field: Name, byte: u8 },
    #[error("invalid option tag {tag} in field {field:?}")]
    InvalidOptionTag { field: Name, tag: u8 },
    #[error("enum discriminant {discriminant} out of range in field {field:?}")]
    InvalidEnumDiscriminant { field: Name, discriminant: u8 },
    #[error("struct {0:?} is not declared by the gateway ABI")]
    UnknownStruct(Name),
}

/// A value handed to the encoder does not fit the declared primitive.
#[derive(Clone, PartialEq, Eq, RuntimeDebug, Error)]
pub enum TypeMismatchError {
    #[error("no value given for field {0:?}")]
    MissingField(Name),
    #[error("field {0:?} is not declared by the struct")]
    UnknownField(Name),
    #[error("field {field:?} expects a {expected} value")]
    Incompatible { field: Name, expected: &'static str },
    #[error("value of field {field:?} does not fit into {bits} bits")]
    ValueOverflow { field: Name, bits: u32 },
    #[error("field {field:?} expects {expected} bytes, got {actual}")]
    LengthMismatch { field: Name, expected: u32, actual: u32 },
    #[error("enum index {index} of field {field:?} is out of range")]
    EnumOutOfRange { field: Name, index: u8 },
}

/// Which closed descriptor set an unknown discriminant was read for.
#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub enum DescriptorKind {
    Hasher,
    Crypto,
    Vendor,
    GatewayType,
}

/// A wire byte outside of a closed descriptor set.
#[derive(Clone, PartialEq, Eq, RuntimeDebug, Error)]
#[error("unknown {kind:?} discriminant {discriminant}")]
pub struct UnknownDiscriminantError {
    pub kind: DescriptorKind,
    pub discriminant: u8,
}

#[derive(Clone, PartialEq, Eq, RuntimeDebug, Error)]
pub enum UnsupportedAlgorithmError {
    #[error(transparent)]
    UnknownDiscriminant(#[from] UnknownDiscriminantError),
    #[error("{hasher:?} cannot produce {size} byte hashes")]
    HashSize { hasher: HasherAlgo, size: u16 },
}

/// Failure of either half of the layout engine.
#[derive(Clone, PartialEq, Eq, RuntimeDebug, Error)]
pub enum CodecError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    TypeMismatch(#[from] TypeMismatchError),
    #[error(transparent)]
    UnsupportedAlgorithm(#[from] UnsupportedAlgorithmError),
}

/// A gateway response does not satisfy the expected output of its message.
#[derive(Clone, PartialEq, Eq, RuntimeDebug, Error)]
pub enum ProofError {
    #[error("unknown proof trie discriminant {0}")]
    UnsupportedTrieType(u8),
    #[error("expected a proof against the {expected:?} trie, got {found:?}")]
    TrieMismatch { expected: ProofTriePointer, found: ProofTriePointer },
    #[error("storage proof for key {key:?} does not match")]
    StorageMismatch { key: Bytes },
    #[error("event {signature:?} not found in the response")]
    EventNotFound { signature: Bytes },
    #[error("extrinsic not included at or after height {required_height:?}")]
    ExtrinsicNotIncluded { required_height: Option<u64> },
    #[error("returned output differs from the expected output")]
    OutputMismatch,
    #[error("response bytes cannot be decoded")]
    MalformedResponse,
    #[error("gateway {0:?} is not registered")]
    UnknownGateway(GatewayPointer),
    #[error(transparent)]
    UnsupportedAlgorithm(#[from] UnsupportedAlgorithmError),
}

impl ProofError {
    /// Protocol-version mismatches cannot be fixed by fetching another proof.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ProofError::UnsupportedTrieType(_) | ProofError::UnsupportedAlgorithm(_))
    }
}

#[derive(Clone, PartialEq, Eq, RuntimeDebug, Error)]
pub enum RegistryError {
    #[error("gateway {0:?} is already registered with a different descriptor")]
    GatewayAlreadyRegistered(GatewayPointer),
    #[error("gateway {0:?} is not registered")]
    GatewayNotFound(GatewayPointer),
    #[error("invalid gateway ABI: {0}")]
    InvalidAbi(#[from] CodecError),
}
