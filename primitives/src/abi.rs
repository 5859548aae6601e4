// Copyright (C) 2019-2021 Crust Network Technologies Ltd.
// This file is part of Crust.

//! Runtime-described record types.
//!
//! A `StructDecl` is loaded from chain-supplied configuration and interpreted
//! by the layout engine in [`crate::layout`]; nothing here is generated code.

use codec::{Decode, Encode};
use sp_core::U256;
use sp_runtime::RuntimeDebug;
use sp_std::{boxed::Box, collections::btree_map::BTreeMap, prelude::*};

#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

use crate::{
    error::LayoutError,
    gateway::GatewayABIConfig,
    layout::{self, StructLayout},
    Bytes, Name,
};

/// Primitive type vocabulary of a struct field.
///
/// `Address`, `Value`, `BlockNumber` and `Hash` take their width from the
/// gateway's `GatewayABIConfig`, every other fixed type carries it.
#[derive(Clone, PartialEq, Eq, Encode, Decode, RuntimeDebug)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub enum Type {
    #[codec(index = 0)]
    Bool,
    /// Unsigned integer of the given bit width
    #[codec(index = 1)]
    Uint(u16),
    /// Fixed size byte array, `Bytes(32)` is a `bytes32`
    #[codec(index = 2)]
    Bytes(u16),
    #[codec(index = 3)]
    DynamicBytes,
    #[codec(index = 4)]
    Address,
    #[codec(index = 5)]
    Value,
    #[codec(index = 6)]
    BlockNumber,
    #[codec(index = 7)]
    Hash,
    /// Variant names, encoded as a single index byte
    #[codec(index = 8)]
    Enum(Vec<Name>),
    #[codec(index = 9)]
    Option(Box<Type>),
    #[codec(index = 10)]
    Sequence(Box<Type>),
}

impl Type {
    pub fn option(inner: Type) -> Self {
        Type::Option(Box::new(inner))
    }

    pub fn sequence(inner: Type) -> Self {
        Type::Sequence(Box::new(inner))
    }

    /// Whether the encoded size depends on the value.
    pub fn is_variable(&self) -> bool {
        matches!(self, Type::DynamicBytes | Type::Option(_) | Type::Sequence(_))
    }

    /// Levels of `Option`/`Sequence` wrapping, a plain type has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Type::Option(inner) | Type::Sequence(inner) => 1 + inner.depth(),
            _ => 1,
        }
    }
}

/// A named, typed struct field.
#[derive(Clone, PartialEq, Eq, Encode, Decode, RuntimeDebug)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct Parameter {
    pub name: Name,
    pub ty: Type,
}

impl Parameter {
    pub fn new(name: &[u8], ty: Type) -> Self {
        Parameter { name: name.to_vec(), ty }
    }
}

/// Record layout: ordered fields and the byte offset of each of them.
#[derive(Clone, PartialEq, Eq, Encode, Decode, RuntimeDebug)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct StructDecl {
    pub name: Name,
    pub fields: Vec<Parameter>,
    /// Parallel to `fields`
    pub offsets: Vec<u16>,
}

impl StructDecl {
    /// Lays `fields` out back to back starting at offset 0.
    pub fn packed(
        name: &[u8],
        fields: Vec<Parameter>,
        abi: &GatewayABIConfig,
    ) -> Result<Self, LayoutError> {
        let mut offsets = Vec::with_capacity(fields.len());
        let mut cursor: usize = 0;
        for field in fields.iter() {
            offsets.push(u16::try_from(cursor).map_err(|_| LayoutError::OffsetOverflow)?);
            if let Some(width) = layout::field_width(field, abi)? {
                cursor += width;
            }
        }
        let decl = StructDecl { name: name.to_vec(), fields, offsets };
        decl.layout(abi)?;
        Ok(decl)
    }

    /// Validates the declaration against `abi` and computes its fixed region.
    pub fn layout(&self, abi: &GatewayABIConfig) -> Result<StructLayout, LayoutError> {
        StructLayout::compute(self, abi)
    }
}

/// A decoded field value.
#[derive(Clone, PartialEq, Eq, RuntimeDebug)]
pub enum Value {
    Bool(bool),
    Uint(U256),
    Bytes(Bytes),
    Enum(u8),
    Option(Option<Box<Value>>),
    Sequence(Vec<Value>),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Uint(_) => "uint",
            Value::Bytes(_) => "bytes",
            Value::Enum(_) => "enum",
            Value::Option(_) => "option",
            Value::Sequence(_) => "sequence",
        }
    }

    pub fn some(inner: Value) -> Self {
        Value::Option(Some(Box::new(inner)))
    }

    pub fn none() -> Self {
        Value::Option(None)
    }

    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Value::Uint(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Uint(U256::from(value))
    }
}

impl From<U256> for Value {
    fn from(value: U256) -> Self {
        Value::Uint(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

/// Field name to value mapping produced by the decoder.
pub type DecodedStruct = BTreeMap<Name, Value>;
