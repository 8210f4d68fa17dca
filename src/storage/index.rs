//! Address indexing
//!
//! Reverse map from participant identity to the chain locations of every
//! record referencing it, maintained incrementally as blocks are sealed.
//! The index is append-only and never pruned; history lookups through it
//! cost O(k) in the number of matching records instead of a chain scan.

use crate::core::block::Block;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Position of a record within the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxLocation {
    /// Block position in the chain
    pub block: usize,
    /// Record position within the block
    pub tx: usize,
}

/// Index statistics
#[derive(Debug, Clone, PartialEq)]
pub struct IndexStats {
    /// Distinct indexed addresses
    pub addresses: usize,
    /// Total location entries
    pub entries: usize,
}

/// Reverse index from address to record locations
#[derive(Debug, Clone, Default)]
pub struct AddressIndex {
    by_address: HashMap<String, Vec<TxLocation>>,
}

impl AddressIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every address reference in a freshly sealed block
    pub fn index_block(&mut self, block: &Block, position: usize) {
        for (tx_pos, tx) in block.transactions.iter().enumerate() {
            let location = TxLocation {
                block: position,
                tx: tx_pos,
            };
            if let Some(sender) = &tx.sender {
                self.by_address
                    .entry(sender.clone())
                    .or_default()
                    .push(location);
            }
            // A self-transfer gets one entry, not two
            if tx.sender.as_deref() != Some(tx.recipient.as_str()) {
                self.by_address
                    .entry(tx.recipient.clone())
                    .or_default()
                    .push(location);
            }
        }
    }

    /// Locations of every record referencing the address, oldest first
    pub fn locations(&self, address: &str) -> &[TxLocation] {
        self.by_address
            .get(address)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether the address has ever been indexed
    pub fn contains(&self, address: &str) -> bool {
        self.by_address.contains_key(address)
    }

    /// Iterate over every indexed address
    pub fn addresses(&self) -> impl Iterator<Item = &String> {
        self.by_address.keys()
    }

    /// Number of distinct indexed addresses
    pub fn len(&self) -> usize {
        self.by_address.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            addresses: self.by_address.len(),
            entries: self.by_address.values().map(Vec::len).sum(),
        }
    }
}
