// Copyright (C) 2019-2021 Crust Network Technologies Ltd.
// This file is part of Crust.

//! Gateway descriptors: everything needed to interpret a remote chain's bytes.

use codec::{Decode, Encode};
use sp_runtime::RuntimeDebug;
use sp_std::{collections::btree_set::BTreeSet, prelude::*};

#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

use crate::{
    abi::{DecodedStruct, StructDecl},
    constants::abi::*,
    crypto::GatewayHasher,
    error::{CodecError, DescriptorKind, LayoutError, UnknownDiscriminantError},
    layout, Bytes, ChainId, Name,
};

/// Chain family of a gateway.
///
/// The discriminants are part of the wire contract and must never be reordered.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode, RuntimeDebug)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub enum GatewayVendor {
    #[codec(index = 0)]
    Substrate,
    #[codec(index = 1)]
    Ethereum,
}

/// Role of a gateway relative to the coordinating chain.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode, RuntimeDebug)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub enum GatewayType {
    #[codec(index = 0)]
    Internal,
    #[codec(index = 1)]
    External,
}

#[derive(Clone, Copy, PartialEq, Eq, Encode, Decode, RuntimeDebug)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub enum HasherAlgo {
    #[codec(index = 0)]
    Blake2,
    #[codec(index = 1)]
    Keccak256,
}

#[derive(Clone, Copy, PartialEq, Eq, Encode, Decode, RuntimeDebug)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub enum CryptoAlgo {
    #[codec(index = 0)]
    Ed25519,
    #[codec(index = 1)]
    Sr25519,
    #[codec(index = 2)]
    Ecdsa,
}

macro_rules! discriminants {
    ($ty:ident, $kind:expr, { $($variant:ident = $index:literal),+ $(,)? }) => {
        impl $ty {
            /// The single wire byte identifying this variant.
            pub fn discriminant(&self) -> u8 {
                match self {
                    $($ty::$variant => $index,)+
                }
            }
        }

        impl TryFrom<u8> for $ty {
            type Error = UnknownDiscriminantError;

            fn try_from(discriminant: u8) -> Result<Self, Self::Error> {
                match discriminant {
                    $($index => Ok($ty::$variant),)+
                    _ => Err(UnknownDiscriminantError { kind: $kind, discriminant }),
                }
            }
        }
    };
}

discriminants!(GatewayVendor, DescriptorKind::Vendor, { Substrate = 0, Ethereum = 1 });
discriminants!(GatewayType, DescriptorKind::GatewayType, { Internal = 0, External = 1 });
discriminants!(HasherAlgo, DescriptorKind::Hasher, { Blake2 = 0, Keccak256 = 1 });
discriminants!(CryptoAlgo, DescriptorKind::Crypto, { Ed25519 = 0, Sr25519 = 1, Ecdsa = 2 });

/// Encoding parameters of a gateway.
///
/// Immutable once registered: changing any width invalidates every
/// `StructDecl` offset computed against it.
#[derive(Clone, PartialEq, Eq, Encode, Decode, RuntimeDebug)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct GatewayABIConfig {
    /// Block number width in bits
    pub block_number_type_size: u16,
    /// Hash width in bytes
    pub hash_size: u16,
    pub hasher: HasherAlgo,
    pub crypto: CryptoAlgo,
    /// Address width in bytes
    pub address_length: u16,
    /// Balance width in bits
    pub value_type_size: u16,
    pub decimals: u16,
    pub structs: Vec<StructDecl>,
}

impl GatewayABIConfig {
    /// Encoding of a standard Substrate chain.
    pub fn substrate() -> Self {
        GatewayABIConfig {
            block_number_type_size: SUBSTRATE_BLOCK_NUMBER_BITS,
            hash_size: SUBSTRATE_HASH_SIZE,
            hasher: HasherAlgo::Blake2,
            crypto: CryptoAlgo::Sr25519,
            address_length: SUBSTRATE_ADDRESS_LENGTH,
            value_type_size: SUBSTRATE_VALUE_BITS,
            decimals: SUBSTRATE_DECIMALS,
            structs: Vec::new(),
        }
    }

    /// Encoding of an Ethereum chain.
    pub fn ethereum() -> Self {
        GatewayABIConfig {
            block_number_type_size: ETHEREUM_BLOCK_NUMBER_BITS,
            hash_size: ETHEREUM_HASH_SIZE,
            hasher: HasherAlgo::Keccak256,
            crypto: CryptoAlgo::Ecdsa,
            address_length: ETHEREUM_ADDRESS_LENGTH,
            value_type_size: ETHEREUM_VALUE_BITS,
            decimals: ETHEREUM_DECIMALS,
            structs: Vec::new(),
        }
    }

    pub fn with_struct(mut self, decl: StructDecl) -> Self {
        self.structs.push(decl);
        self
    }

    /// Checks the widths, the hasher and every declared struct layout.
    pub fn validate(&self) -> Result<(), CodecError> {
        let bit_widths: [(&[u8], u16); 2] = [
            (&b"block_number_type_size"[..], self.block_number_type_size),
            (&b"value_type_size"[..], self.value_type_size),
        ];
        for &(name, bits) in bit_widths.iter() {
            if bits == 0 || bits % 8 != 0 || bits > MAX_UINT_BITS {
                return Err(LayoutError::UnsupportedWidth { field: name.to_vec() }.into());
            }
        }
        if self.address_length == 0 {
            return Err(LayoutError::UnsupportedWidth { field: b"address_length".to_vec() }.into());
        }
        GatewayHasher::resolve(self)?;

        let mut names = BTreeSet::new();
        for decl in self.structs.iter() {
            if !names.insert(decl.name.clone()) {
                return Err(LayoutError::DuplicateStruct(decl.name.clone()).into());
            }
            decl.layout(self)?;
        }
        Ok(())
    }

    pub fn struct_decl(&self, name: &[u8]) -> Option<&StructDecl> {
        self.structs.iter().find(|decl| decl.name == name)
    }

    fn named_decl(&self, name: &[u8]) -> Result<&StructDecl, LayoutError> {
        self.struct_decl(name).ok_or_else(|| LayoutError::UnknownStruct(name.to_vec()))
    }

    /// Decodes `bytes` with the struct this gateway declares under `name`.
    pub fn decode_struct(&self, name: &[u8], bytes: &[u8]) -> Result<DecodedStruct, LayoutError> {
        layout::decode_struct(bytes, self.named_decl(name)?, self)
    }

    pub fn encode_struct(&self, name: &[u8], values: &DecodedStruct) -> Result<Vec<u8>, CodecError> {
        layout::encode_struct(values, self.named_decl(name)?, self)
    }
}

/// Version information of a gateway runtime.
#[derive(Clone, PartialEq, Eq, Default, Encode, Decode, RuntimeDebug)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct RuntimeVersion {
    pub spec_name: Name,
    pub impl_name: Name,
    pub authoring_version: u32,
    pub spec_version: u32,
    pub impl_version: u32,
    pub transaction_version: u32,
}

/// Chain identity data. Never consulted while decoding.
#[derive(Clone, PartialEq, Eq, Default, Encode, Decode, RuntimeDebug)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct GatewayGenesisConfig {
    /// SCALE encoded runtime modules metadata
    pub modules_encoded: Option<Bytes>,
    pub signed_extension: Option<Bytes>,
    pub runtime_version: RuntimeVersion,
    pub extrinsics_version: u8,
    pub genesis_hash: Bytes,
}

impl GatewayGenesisConfig {
    pub fn matches_genesis(&self, genesis_hash: &[u8]) -> bool {
        !self.genesis_hash.is_empty() && self.genesis_hash == genesis_hash
    }
}

/// Handle used everywhere to look up a gateway's descriptors.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode, RuntimeDebug)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct GatewayPointer {
    pub id: ChainId,
    pub vendor: GatewayVendor,
    pub gateway_type: GatewayType,
}
