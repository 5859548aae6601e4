// Copyright (C) 2019-2021 Crust Network Technologies Ltd.
// This file is part of Crust.

//! Gateway catalog: the table of every gateway the circuit can address,
//! keyed by `GatewayPointer`.
//!
//! The catalog is an explicit object handed to its users. Lookups take a shared
//! read lock, only registration, override and purge take the write lock.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sp_std::{collections::btree_map::BTreeMap, prelude::*};
use thiserror::Error as ThisError;

use codec::{Decode, Encode};
use sp_runtime::RuntimeDebug;

// Circuit primitives
use primitives::{
    traits::GatewayRegistry, DecodedStruct, GatewayABIConfig, GatewayGenesisConfig,
    GatewayPointer, LayoutError, RegistryError,
};

#[cfg(test)]
mod mock;


pub(crate) const LOG_TARGET: &'static str = "xdns";

#[macro_export]
macro_rules! log {
    ($level:tt, $patter:expr $(, $values:expr)* $(,)?) => {
        log::$level!(
            target: crate::LOG_TARGET,
            $patter $(, $values)*
        )
    };
}

/// Everything the circuit knows about one gateway.
#[derive(Clone, PartialEq, Eq, Encode, Decode, RuntimeDebug, Serialize, Deserialize)]
pub struct GatewayRecord {
    pub pointer: GatewayPointer,
    /// Encoding parameters, fixed for the lifetime of the record
    pub abi: GatewayABIConfig,
    /// Chain identity, never used for decoding
    pub genesis: GatewayGenesisConfig,
}

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("malformed gateway genesis config: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Gateways registered at start up.
#[derive(Clone, PartialEq, Eq, Default, RuntimeDebug, Serialize, Deserialize)]
pub struct GenesisConfig {
    pub gateways: Vec<GatewayRecord>,
}

impl GenesisConfig {
    /// Registers every listed gateway into a fresh catalog.
    ///
    /// Listing one pointer twice with different descriptors fails just like
    /// a second `register` call would.
    pub fn build(&self) -> Result<GatewayCatalog, RegistryError> {
        let catalog = GatewayCatalog::new();
        for record in self.gateways.iter() {
            catalog.register(record.pointer, record.abi.clone(), record.genesis.clone())?;
        }
        Ok(catalog)
    }
}

#[derive(Default)]
pub struct GatewayCatalog {
    gateways: RwLock<BTreeMap<GatewayPointer, GatewayRecord>>,
}

impl GatewayCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a catalog from a JSON encoded `GenesisConfig`.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: GenesisConfig = serde_json::from_str(json)?;
        Ok(config.build()?)
    }

    /// Adds a gateway.
    ///
    /// Registering the exact same descriptors again is a no-op. Anything else
    /// under a taken pointer is rejected, use `override_gateway` to replace a
    /// record on purpose.
    pub fn register(
        &self,
        pointer: GatewayPointer,
        abi: GatewayABIConfig,
        genesis: GatewayGenesisConfig,
    ) -> Result<(), RegistryError> {
        abi.validate()?;
        let record = GatewayRecord { pointer, abi, genesis };

        let mut gateways = self.gateways.write();
        match gateways.get(&pointer) {
            Some(existing) if *existing == record => {
                log!(trace, "🌐 Gateway {:?} already registered with the same descriptor", pointer);
                Ok(())
            },
            Some(_) => {
                log!(debug, "🌐 Rejected re-registration of gateway {:?}", pointer);
                Err(RegistryError::GatewayAlreadyRegistered(pointer))
            },
            None => {
                gateways.insert(pointer, record);
                log!(info, "🌐 Gateway {:?} registered", pointer);
                Ok(())
            },
        }
    }

    /// Replaces (or adds) the record of `pointer`, returning the previous one.
    ///
    /// Data encoded against the previous ABI may no longer decode.
    pub fn override_gateway(
        &self,
        pointer: GatewayPointer,
        abi: GatewayABIConfig,
        genesis: GatewayGenesisConfig,
    ) -> Result<Option<GatewayRecord>, RegistryError> {
        abi.validate()?;
        let previous = self.gateways.write().insert(pointer, GatewayRecord { pointer, abi, genesis });
        if previous.is_some() {
            log!(warn, "🌐 Gateway {:?} overridden, previously encoded data may not decode", pointer);
        } else {
            log!(info, "🌐 Gateway {:?} registered through override", pointer);
        }
        Ok(previous)
    }

    pub fn resolve(&self, pointer: &GatewayPointer) -> Result<GatewayRecord, RegistryError> {
        self.gateways
            .read()
            .get(pointer)
            .cloned()
            .ok_or(RegistryError::GatewayNotFound(*pointer))
    }

    /// Removes a gateway, returning its record.
    pub fn purge(&self, pointer: &GatewayPointer) -> Result<GatewayRecord, RegistryError> {
        let removed = self.gateways.write().remove(pointer).ok_or(RegistryError::GatewayNotFound(*pointer))?;
        log!(info, "🌐 Gateway {:?} purged", pointer);
        Ok(removed)
    }

    pub fn contains(&self, pointer: &GatewayPointer) -> bool {
        self.gateways.read().contains_key(pointer)
    }

    pub fn gateway_pointers(&self) -> Vec<GatewayPointer> {
        self.gateways.read().keys().copied().collect()
    }

    pub fn records(&self) -> Vec<GatewayRecord> {
        self.gateways.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.gateways.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.gateways.read().is_empty()
    }

    /// Whether `genesis_hash` is the genesis the gateway was registered with.
    pub fn verify_chain_identity(
        &self,
        pointer: &GatewayPointer,
        genesis_hash: &[u8],
    ) -> Result<bool, RegistryError> {
        let gateways = self.gateways.read();
        let record = gateways.get(pointer).ok_or(RegistryError::GatewayNotFound(*pointer))?;
        Ok(record.genesis.matches_genesis(genesis_hash))
    }

    /// Decodes `bytes` with the struct `name` declared by the gateway's ABI.
    pub fn decode_struct(
        &self,
        pointer: &GatewayPointer,
        name: &[u8],
        bytes: &[u8],
    ) -> Result<DecodedStruct, Error> {
        let gateways = self.gateways.read();
        let record = gateways.get(pointer).ok_or(RegistryError::GatewayNotFound(*pointer))?;
        Ok(record.abi.decode_struct(name, bytes)?)
    }

    /// Snapshot of the catalog as a `GenesisConfig`, in pointer order.
    pub fn genesis_config(&self) -> GenesisConfig {
        GenesisConfig { gateways: self.records() }
    }
}

impl GatewayRegistry for GatewayCatalog {
    fn resolve(
        &self,
        pointer: &GatewayPointer,
    ) -> Result<(GatewayABIConfig, GatewayGenesisConfig), RegistryError> {
        GatewayCatalog::resolve(self, pointer).map(|record| (record.abi, record.genesis))
    }
}
