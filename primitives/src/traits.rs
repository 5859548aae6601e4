// Copyright (C) 2019-2021 Crust Network Technologies Ltd.
// This file is part of Crust.

use crate::{
    error::RegistryError,
    gateway::{GatewayABIConfig, GatewayGenesisConfig, GatewayPointer},
};

/// Means for looking up the descriptors a gateway was registered with.
pub trait GatewayRegistry {
    // Resolve both descriptors of the gateway behind `pointer`
    fn resolve(
        &self,
        pointer: &GatewayPointer,
    ) -> Result<(GatewayABIConfig, GatewayGenesisConfig), RegistryError>;

    // Resolve only the encoding parameters
    fn resolve_abi(&self, pointer: &GatewayPointer) -> Result<GatewayABIConfig, RegistryError> {
        self.resolve(pointer).map(|(abi, _)| abi)
    }
}
