use crate::foundation::ids::NodeId;

/// Slot storage with generational handles.
///
/// Freed slots are reused; bumping the generation on removal makes stale handles miss.
#[derive(Debug)]
pub(crate) struct NodeArena<T> {
    slots: Vec<Option<T>>,
    generations: Vec<u32>,
    free_indices: Vec<usize>,
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_indices: Vec::new(),
        }
    }
}

impl<T> NodeArena<T> {
    pub(crate) fn insert(&mut self, value: T) -> NodeId {
        if let Some(index) = self.free_indices.pop() {
            self.slots[index] = Some(value);
            return NodeId::from_parts(index as u32, self.generations[index]);
        }

        let index = self.slots.len();
        self.slots.push(Some(value));
        self.generations.push(0);
        NodeId::from_parts(index as u32, 0)
    }

    fn live_index(&self, id: NodeId) -> Option<usize> {
        let index = id.index() as usize;
        (index < self.slots.len()
            && self.generations[index] == id.generation()
            && self.slots[index].is_some())
        .then_some(index)
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&T> {
        let index = self.live_index(id)?;
        self.slots[index].as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        let index = self.live_index(id)?;
        self.slots[index].as_mut()
    }

    pub(crate) fn remove(&mut self, id: NodeId) -> Option<T> {
        let index = self.live_index(id)?;
        self.generations[index] = self.generations[index].wrapping_add(1);
        let removed = self.slots[index].take();
        self.free_indices.push(index);
        removed
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.live_index(id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free_indices.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/arena.rs"]
mod tests;
