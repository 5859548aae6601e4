// Copyright (C) 2019-2021 Crust Network Technologies Ltd.
// This file is part of Crust.

#![cfg_attr(not(feature = "std"), no_std)]
use sp_std::vec::Vec;

pub mod abi;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod gateway;
pub mod layout;
pub mod message;
pub mod traits;

#[cfg(test)]
mod mock;


pub use abi::{DecodedStruct, Parameter, StructDecl, Type, Value};
pub use error::{
    CodecError, DescriptorKind, LayoutError, ProofError, RegistryError, TypeMismatchError,
    UnknownDiscriminantError, UnsupportedAlgorithmError,
};
pub use gateway::{
    CryptoAlgo, GatewayABIConfig, GatewayGenesisConfig, GatewayPointer, GatewayType,
    GatewayVendor, HasherAlgo, RuntimeVersion,
};
pub use message::{
    CircuitOutboundMessage, ExtraMessagePayload, GatewayExpectedOutput, ProofTriePointer,
};

/// Four byte identifier of a gateway chain, e.g. `*b"pdot"`.
pub type ChainId = [u8; 4];

/// Opaque byte blob whose meaning depends on the gateway's ABI.
pub type Bytes = Vec<u8>;

/// Height of a block on a remote gateway.
pub type BlockHeight = u64;

/// Name of a struct or of a struct field.
pub type Name = Vec<u8>;
