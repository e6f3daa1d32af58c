use foundation::handles::Handle;

/// Identifies a node in a [`crate::SceneGraph`].
///
/// Ids are generational: once a node is removed its id never resolves again,
/// even if the slot is reused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub Handle);

impl NodeId {
    pub fn index(&self) -> u32 {
        self.0.index()
    }

    pub fn generation(&self) -> u32 {
        self.0.generation()
    }
}
