use crate::*;
use hex_literal::hex;
use primitives::{GatewayType, GatewayVendor, Parameter, RuntimeVersion, StructDecl, Type};

pub const POLKADOT_GENESIS: [u8; 32] = hex!("91b171bb158e2d3848fa23a9f1c25182fb8e20313b2c1eb49219da7a70ce90c3");
pub const ETHEREUM_GENESIS: [u8; 32] = hex!("d4e56740f876aef8c010b86a40d5f56745a118d0906a34e69aec8c0db1cb8fa3");

pub fn polkadot() -> GatewayPointer {
    GatewayPointer { id: *b"pdot", vendor: GatewayVendor::Substrate, gateway_type: GatewayType::External }
}

pub fn ethereum() -> GatewayPointer {
    GatewayPointer { id: *b"eth2", vendor: GatewayVendor::Ethereum, gateway_type: GatewayType::External }
}

pub fn circuit() -> GatewayPointer {
    GatewayPointer { id: *b"circ", vendor: GatewayVendor::Substrate, gateway_type: GatewayType::Internal }
}

/// `{ number: BlockNumber, parent_hash: Hash }`
pub fn header_decl(abi: &GatewayABIConfig) -> StructDecl {
    StructDecl::packed(
        b"Header",
        vec![Parameter::new(b"number", Type::BlockNumber), Parameter::new(b"parent_hash", Type::Hash)],
        abi,
    )
    .unwrap()
}

pub fn legal_substrate_abi() -> GatewayABIConfig {
    let abi = GatewayABIConfig::substrate();
    let header = header_decl(&abi);
    abi.with_struct(header)
}

pub fn legal_ethereum_abi() -> GatewayABIConfig {
    let abi = GatewayABIConfig::ethereum();
    let header = header_decl(&abi);
    abi.with_struct(header)
}

pub fn legal_genesis(genesis_hash: &[u8], spec_version: u32) -> GatewayGenesisConfig {
    GatewayGenesisConfig {
        modules_encoded: None,
        signed_extension: None,
        runtime_version: RuntimeVersion {
            spec_name: b"polkadot".to_vec(),
            impl_name: b"parity-polkadot".to_vec(),
            authoring_version: 0,
            spec_version,
            impl_version: 0,
            transaction_version: 7,
        },
        extrinsics_version: 4,
        genesis_hash: genesis_hash.to_vec(),
    }
}

pub struct CatalogBuilder {
    gateways: Vec<GatewayRecord>,
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self {
            gateways: vec![
                GatewayRecord {
                    pointer: polkadot(),
                    abi: legal_substrate_abi(),
                    genesis: legal_genesis(&POLKADOT_GENESIS, 9050),
                },
                GatewayRecord {
                    pointer: ethereum(),
                    abi: legal_ethereum_abi(),
                    genesis: legal_genesis(&ETHEREUM_GENESIS, 1),
                },
            ],
        }
    }
}

impl CatalogBuilder {
    pub fn empty() -> Self {
        Self { gateways: vec![] }
    }

    pub fn with_gateway(mut self, record: GatewayRecord) -> Self {
        self.gateways.push(record);
        self
    }

    pub fn genesis_config(&self) -> GenesisConfig {
        GenesisConfig { gateways: self.gateways.clone() }
    }

    pub fn build(self) -> GatewayCatalog {
        self.genesis_config().build().unwrap()
    }
}
