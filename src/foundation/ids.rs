/// Generational handle to a node stored in a [`Scene`](crate::Scene).
///
/// Handles stay valid until the node is destroyed; a destroyed slot may be reused, but the
/// generation bump makes old handles resolve to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    pub(crate) fn from_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Arena slot index.
    pub fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot when this handle was issued.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Identifier of one enqueued animation job, unique within a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub(crate) u64);

impl JobId {
    /// Raw sequence number.
    pub fn get(self) -> u64 {
        self.0
    }
}
