use std::collections::HashMap;

use alloy::primitives::Address;

/// Per-oracle assignment of request indices.
///
/// Populated once by the registration phase and read-only afterwards, so
/// event dispatch needs no locking. Matching is a linear scan over the
/// pool; with 30 oracles a reverse index->oracles map buys nothing.
#[derive(Clone, Debug, Default)]
pub struct IndexRegistry {
    indices: HashMap<Address, [u8; 3]>,
}

impl IndexRegistry {
    /// Records the indices assigned to `oracle`. Write-once per oracle.
    pub fn assign(&mut self, oracle: Address, indices: [u8; 3]) {
        let prev = self.indices.insert(oracle, indices);
        debug_assert!(prev.is_none(), "indices are write-once per oracle");
    }

    /// Indices assigned to `oracle`, if registered.
    pub fn indices_of(&self, oracle: Address) -> Option<&[u8; 3]> {
        self.indices.get(&oracle)
    }

    /// All oracles whose assigned indices contain `index`.
    pub fn matching_identities(&self, index: u8) -> Vec<Address> {
        self.indices
            .iter()
            .filter(|(_, indices)| indices.contains(&index))
            .map(|(oracle, _)| *oracle)
            .collect()
    }

    /// Number of registered oracles.
    pub fn len(&self) -> usize { self.indices.len() }

    pub fn is_empty(&self) -> bool { self.indices.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_identities() {
        let a = Address::with_last_byte(1);
        let b = Address::with_last_byte(2);
        let c = Address::with_last_byte(3);

        let mut registry = IndexRegistry::default();
        registry.assign(a, [7, 1, 4]);
        registry.assign(b, [2, 7, 9]);
        registry.assign(c, [0, 3, 5]);

        let mut matching = registry.matching_identities(7);
        matching.sort();
        assert_eq!(matching, vec![a, b]);
        assert!(registry.matching_identities(8).is_empty());
    }

    #[test]
    fn test_indices_of() {
        let a = Address::with_last_byte(1);

        let mut registry = IndexRegistry::default();
        assert!(registry.indices_of(a).is_none());
        registry.assign(a, [1, 2, 3]);

        assert_eq!(registry.indices_of(a), Some(&[1, 2, 3]));
        assert_eq!(registry.len(), 1);
    }
}
