// Copyright (C) 2019-2021 Crust Network Technologies Ltd.
// This file is part of Crust.

use crate::*;
use sp_core::U256;

/// `{ block_number: u16, hash: bytes32 }` at offsets `[0, 2]`.
pub fn header_decl() -> StructDecl {
    StructDecl {
        name: b"Header".to_vec(),
        fields: vec![
            Parameter::new(b"block_number", Type::Uint(16)),
            Parameter::new(b"hash", Type::Bytes(32)),
        ],
        offsets: vec![0, 2],
    }
}

/// Balance transfer record using ABI-relative widths and a variable tail.
pub fn transfer_decl(abi: &GatewayABIConfig) -> StructDecl {
    StructDecl::packed(
        b"Transfer",
        vec![
            Parameter::new(b"from", Type::Address),
            Parameter::new(b"to", Type::Address),
            Parameter::new(b"amount", Type::Value),
            Parameter::new(b"at", Type::BlockNumber),
            Parameter::new(b"kind", Type::Enum(vec![b"Keep".to_vec(), b"Reap".to_vec()])),
            Parameter::new(b"memo", Type::option(Type::DynamicBytes)),
        ],
        abi,
    )
    .expect("transfer layout is valid; qed")
}

pub fn transfer_values(abi: &GatewayABIConfig, memo: Option<&[u8]>) -> DecodedStruct {
    let address_len = abi.address_length as usize;
    let mut values = DecodedStruct::new();
    values.insert(b"from".to_vec(), Value::Bytes(vec![1u8; address_len]));
    values.insert(b"to".to_vec(), Value::Bytes(vec![2u8; address_len]));
    values.insert(b"amount".to_vec(), Value::Uint(U256::from(1_000_000_000_000u64)));
    values.insert(b"at".to_vec(), Value::from(4_242u64));
    values.insert(b"kind".to_vec(), Value::Enum(1));
    values.insert(
        b"memo".to_vec(),
        memo.map(|m| Value::some(Value::Bytes(m.to_vec()))).unwrap_or_else(Value::none),
    );
    values
}

pub fn header_bytes(block_number: u16, hash_byte: u8) -> Vec<u8> {
    let mut bytes = block_number.to_le_bytes().to_vec();
    bytes.extend_from_slice(&[hash_byte; 32]);
    bytes
}
