/// Gateway encoding parameters.
pub mod abi {
    // Substrate
    pub const SUBSTRATE_BLOCK_NUMBER_BITS: u16 = 32;
    pub const SUBSTRATE_HASH_SIZE: u16 = 32;
    pub const SUBSTRATE_ADDRESS_LENGTH: u16 = 32;
    pub const SUBSTRATE_VALUE_BITS: u16 = 64;
    pub const SUBSTRATE_DECIMALS: u16 = 12;

    // Ethereum
    pub const ETHEREUM_BLOCK_NUMBER_BITS: u16 = 64;
    pub const ETHEREUM_HASH_SIZE: u16 = 32;
    pub const ETHEREUM_ADDRESS_LENGTH: u16 = 20;
    pub const ETHEREUM_VALUE_BITS: u16 = 256;
    pub const ETHEREUM_DECIMALS: u16 = 18;

    /// Widest unsigned integer a field can hold, `U256`.
    pub const MAX_UINT_BITS: u16 = 256;
}

/// Struct layout engine limits.
pub mod layout {
    /// Nesting limit for `Option`/`Sequence` types, keeps decoding stack bounded.
    pub const MAX_TYPE_DEPTH: usize = 16;

    pub const OPTION_NONE_TAG: u8 = 0;
    pub const OPTION_SOME_TAG: u8 = 1;
}

/// Outbound messages.
pub mod message {
    /// Separator between module and method in a message name.
    pub const NAME_SEPARATOR: &[u8] = b"::";
}
