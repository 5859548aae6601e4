use crate::{proof::*, response::*, *};
use primitives::{GatewayType, GatewayVendor, ProofTriePointer};
use xdns::GatewayCatalog;

/// Height of the block responses are taken from, as the transport reports it.
pub const BLOCK_HEIGHT: u64 = 120;

pub fn polkadot() -> GatewayPointer {
    GatewayPointer { id: *b"pdot", vendor: GatewayVendor::Substrate, gateway_type: GatewayType::External }
}

pub fn ethereum() -> GatewayPointer {
    GatewayPointer { id: *b"eth2", vendor: GatewayVendor::Ethereum, gateway_type: GatewayType::External }
}

pub fn new_catalog() -> GatewayCatalog {
    let catalog = GatewayCatalog::new();
    catalog.register(polkadot(), GatewayABIConfig::substrate(), Default::default()).unwrap();
    catalog.register(ethereum(), GatewayABIConfig::ethereum(), Default::default()).unwrap();
    catalog
}

pub fn hasher_of(abi: &GatewayABIConfig) -> GatewayHasher {
    GatewayHasher::resolve(abi).unwrap()
}

/// Five balance entries of a substrate state, `(key, value)`.
pub fn legal_state() -> Vec<(Bytes, Option<Bytes>)> {
    vec![
        (b"balances:alice".to_vec(), Some(1_000u64.to_le_bytes().to_vec())),
        (b"balances:bob".to_vec(), Some(2_000u64.to_le_bytes().to_vec())),
        (b"balances:charlie".to_vec(), None),
        (b"balances:dave".to_vec(), Some(0u64.to_le_bytes().to_vec())),
        (b"balances:eve".to_vec(), Some(42u64.to_le_bytes().to_vec())),
    ]
}

/// State root over `state` and the proven entries at `indices`.
pub fn prove_state(
    hasher: &GatewayHasher,
    state: &[(Bytes, Option<Bytes>)],
    indices: &[usize],
) -> (Bytes, Vec<StorageEntry>) {
    let leaves: Vec<Bytes> = state.iter().map(|(key, value)| storage_leaf(hasher, key, value)).collect();
    let root = merkle_root(hasher, &leaves).unwrap();
    let entries = indices
        .iter()
        .map(|&i| StorageEntry {
            key: state[i].0.clone(),
            value: state[i].1.clone(),
            proof: merkle_proof(hasher, &leaves, i).unwrap(),
        })
        .collect();
    (root, entries)
}

pub fn legal_block() -> Vec<Bytes> {
    vec![b"timestamp.set".to_vec(), b"balances.transfer(bob, 2000)".to_vec(), b"system.remark".to_vec()]
}

/// Transaction root over `extrinsics` and the inclusion of `extrinsics[index]`.
pub fn prove_extrinsic(hasher: &GatewayHasher, extrinsics: &[Bytes], index: usize) -> (Bytes, ExtrinsicInclusion) {
    let leaves: Vec<Bytes> = extrinsics.iter().map(|xt| extrinsic_leaf(hasher, xt)).collect();
    let root = merkle_root(hasher, &leaves).unwrap();
    let inclusion = ExtrinsicInclusion {
        extrinsic: extrinsics[index].clone(),
        proof: merkle_proof(hasher, &leaves, index).unwrap(),
    };
    (root, inclusion)
}

pub fn legal_events() -> Vec<Bytes> {
    vec![
        b"Withdraw(alice,2000)".to_vec(),
        b"Transfer(alice,bob,2000)".to_vec(),
        b"Deposit(bob,2000)".to_vec(),
    ]
}

/// Receipts root over `events`, with every record proven.
pub fn prove_events(hasher: &GatewayHasher, events: &[Bytes]) -> (Bytes, Vec<EventRecord>) {
    let leaves: Vec<Bytes> = events.iter().map(|record| event_leaf(hasher, record)).collect();
    let root = merkle_root(hasher, &leaves).unwrap();
    let records = events
        .iter()
        .enumerate()
        .map(|(i, record)| EventRecord { record: record.clone(), proof: merkle_proof(hasher, &leaves, i).unwrap() })
        .collect();
    (root, records)
}

pub fn raw_response(trie: ProofTriePointer, body: ResponseBody) -> Vec<u8> {
    GatewayResponse { trie, body }.encode()
}

pub fn storage_message(keys: Vec<Bytes>, values: Vec<Option<Bytes>>) -> CircuitOutboundMessage {
    build_message(
        b"balances",
        b"transfer",
        vec![b"bob".to_vec(), 2_000u64.encode()],
        vec![GatewayExpectedOutput::Storage { key: keys, value: values }],
    )
    .unwrap()
}
