use std::hash::{DefaultHasher, Hash, Hasher};

/// Structural hash of a composite node, computed once when the node is built.
///
/// Children that carry their own `NodeHash` contribute a single word, so
/// building a node costs the same at any depth and hashing it never walks
/// the subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct NodeHash(u64);

impl NodeHash {
    pub(crate) fn of<T: Hash + ?Sized>(parts: &T) -> Self {
        let mut hasher = DefaultHasher::new();
        parts.hash(&mut hasher);
        NodeHash(hasher.finish())
    }

    pub(crate) fn value(self) -> u64 {
        self.0
    }
}

impl Hash for NodeHash {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0);
    }
}

/// `Hash` for nodes with a `hash: NodeHash` field: writes the cached value only.
macro_rules! cached_hash {
    ($($name:ident),* $(,)?) => {
        $(
            impl std::hash::Hash for $name {
                fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                    std::hash::Hash::hash(&self.hash, state);
                }
            }
        )*
    };
}
pub(crate) use cached_hash;
