//! Named node hierarchy.
//!
//! Nodes live in an arena owned by [`Scene`] and are addressed by generational [`NodeId`]
//! handles. Each node keeps an ordered child list (order is paint order) and a non-owning parent
//! handle, so every hierarchy rule is checked by the scene in one place.

use std::any::Any;
use std::fmt;

use crate::{
    animation::anim::{AnimTarget, Repeat},
    animation::scheduler::{AnimationJob, AnimationQueue, CompletedJob},
    foundation::error::{TableauError, TableauResult},
    foundation::ids::{JobId, NodeId},
    render::surface::{Renderable, Surface},
    scene::arena::NodeArena,
    transform::state::{TransformKind, TransformState},
};

/// Name of the scene root.
pub const ROOT_NAME: &str = "scene";

/// Drawable entity with its own transform state and animation queue.
pub struct GameObject {
    transform: TransformState,
    animations: AnimationQueue,
    drawable: Box<dyn Renderable>,
}

impl GameObject {
    fn new(drawable: Box<dyn Renderable>) -> Self {
        Self {
            transform: TransformState::default(),
            animations: AnimationQueue::new(),
            drawable,
        }
    }

    /// Settled transform state.
    pub fn transform(&self) -> &TransformState {
        &self.transform
    }

    /// Mutable transform state. Changes take effect on the next render.
    pub fn transform_mut(&mut self) -> &mut TransformState {
        &mut self.transform
    }

    /// Queued animation jobs.
    pub fn animations(&self) -> &AnimationQueue {
        &self.animations
    }

    /// Attached drawable.
    pub fn drawable(&self) -> &dyn Renderable {
        self.drawable.as_ref()
    }

    /// Attached drawable as its concrete type.
    pub fn drawable_as<T: Renderable>(&self) -> Option<&T> {
        let any: &dyn Any = self.drawable.as_ref();
        any.downcast_ref::<T>()
    }

    /// Attached drawable as its concrete type, mutably.
    pub fn drawable_as_mut<T: Renderable>(&mut self) -> Option<&mut T> {
        let any: &mut dyn Any = self.drawable.as_mut();
        any.downcast_mut::<T>()
    }

    /// Swap the drawable, returning the previous one.
    pub fn set_drawable(&mut self, drawable: impl Renderable) -> Box<dyn Renderable> {
        std::mem::replace(&mut self.drawable, Box::new(drawable))
    }
}

impl fmt::Debug for GameObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameObject")
            .field("transform", &self.transform)
            .field("animations", &self.animations)
            .field("bounds", &self.drawable.bounds())
            .finish_non_exhaustive()
    }
}

/// What a node is.
#[derive(Debug)]
pub enum NodeKind {
    /// Pure structure: no transform, no drawable.
    Group,
    /// Drawable game object.
    Object(GameObject),
}

/// One entry of the hierarchy.
#[derive(Debug)]
pub struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    visible: bool,
    kind: NodeKind,
}

impl Node {
    fn new(name: String, kind: NodeKind) -> Self {
        Self {
            name,
            parent: None,
            children: Vec::new(),
            visible: true,
            kind,
        }
    }

    /// Name, unique among siblings.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent handle; `None` for detached nodes and the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in paint order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether the node and its subtree are drawn.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Group or object payload.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Object payload, if this node is an object.
    pub fn as_object(&self) -> Option<&GameObject> {
        match &self.kind {
            NodeKind::Object(obj) => Some(obj),
            NodeKind::Group => None,
        }
    }
}

/// Completion notification for one animation job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationEvent {
    /// Object the job ran on.
    pub node: NodeId,
    /// Completed job.
    pub job: JobId,
    /// Transform kind the job animated.
    pub kind: TransformKind,
}

/// Arena of nodes plus the distinguished root group.
#[derive(Debug)]
pub struct Scene {
    nodes: NodeArena<Node>,
    root: NodeId,
    next_job: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Empty scene holding only the root group.
    pub fn new() -> Self {
        let mut nodes = NodeArena::default();
        let root = nodes.insert(Node::new(ROOT_NAME.to_owned(), NodeKind::Group));
        Self {
            nodes,
            root,
            next_job: 1,
        }
    }

    /// Root group handle.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether only the root exists.
    pub fn is_empty(&self) -> bool {
        self.len() == 1
    }

    /// Create a detached group.
    pub fn create_group(&mut self, name: impl Into<String>) -> TableauResult<NodeId> {
        let name = validate_name(name.into())?;
        Ok(self.nodes.insert(Node::new(name, NodeKind::Group)))
    }

    /// Create a detached game object around `drawable`.
    pub fn create_object(
        &mut self,
        name: impl Into<String>,
        drawable: impl Renderable,
    ) -> TableauResult<NodeId> {
        let name = validate_name(name.into())?;
        let obj = GameObject::new(Box::new(drawable));
        Ok(self.nodes.insert(Node::new(name, NodeKind::Object(obj))))
    }

    /// Whether `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> TableauResult<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| TableauError::not_found(format!("node {id} does not exist")))
    }

    fn node_mut(&mut self, id: NodeId) -> TableauResult<&mut Node> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| TableauError::not_found(format!("node {id} does not exist")))
    }

    /// Node name.
    pub fn name(&self, id: NodeId) -> TableauResult<&str> {
        Ok(self.node(id)?.name())
    }

    /// Parent handle.
    pub fn parent(&self, id: NodeId) -> TableauResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    /// Children in paint order.
    pub fn children(&self, id: NodeId) -> TableauResult<&[NodeId]> {
        Ok(self.node(id)?.children())
    }

    /// Direct child of `parent` called `name`.
    pub fn child(&self, parent: NodeId, name: &str) -> TableauResult<NodeId> {
        self.find_child(parent, name)?.ok_or_else(|| {
            TableauError::not_found(format!("'{}' has no child '{name}'", self.display(parent)))
        })
    }

    fn find_child(&self, parent: NodeId, name: &str) -> TableauResult<Option<NodeId>> {
        let parent_node = self.node(parent)?;
        Ok(parent_node
            .children
            .iter()
            .copied()
            .find(|&c| self.nodes.get(c).is_some_and(|n| n.name == name)))
    }

    /// Resolve a name path starting below the root, e.g. `["world", "player"]`.
    pub fn find_path(&self, path: &[&str]) -> TableauResult<NodeId> {
        path.iter()
            .try_fold(self.root, |node, name| self.child(node, name))
    }

    /// Whether `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.ancestors(id).any(|n| n == self.root)
    }

    /// `id` followed by its parent chain up to the topmost ancestor.
    fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.contains(id).then_some(id), move |&n| {
            self.nodes.get(n).and_then(|node| node.parent)
        })
    }

    /// Attach `child` under `parent`, detaching it from any previous parent.
    ///
    /// All checks run before anything changes, so a rejected call leaves both parents intact.
    /// Moving a node keeps its animation queue.
    pub fn add(&mut self, parent: NodeId, child: NodeId) -> TableauResult<()> {
        self.node(parent)?;
        let child_node = self.node(child)?;
        if child == self.root {
            return Err(TableauError::invalid_parameter(
                "the scene root cannot be given a parent",
            ));
        }
        if child_node.parent == Some(parent) {
            return Ok(());
        }
        if self.ancestors(parent).any(|n| n == child) {
            return Err(TableauError::cycle(format!(
                "'{}' cannot be added under its own descendant '{}'",
                self.display(child),
                self.display(parent)
            )));
        }
        let name = child_node.name.clone();
        if let Some(existing) = self.find_child(parent, &name)?
            && existing != child
        {
            return Err(TableauError::duplicate_name(format!(
                "'{}' already has a child named '{name}'",
                self.display(parent)
            )));
        }

        self.detach(child)?;
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        tracing::debug!(%parent, %child, name = %name, "node attached");
        Ok(())
    }

    /// Detach `child` from `parent`, cancelling every animation in the detached subtree.
    pub fn remove(&mut self, parent: NodeId, child: NodeId) -> TableauResult<()> {
        self.node(parent)?;
        if self.node(child)?.parent != Some(parent) {
            return Err(TableauError::not_found(format!(
                "'{}' is not a child of '{}'",
                self.display(child),
                self.display(parent)
            )));
        }
        self.detach(child)?;

        let subtree: Vec<NodeId> = self.descendants(child).collect();
        let mut cancelled = 0;
        for id in subtree {
            if let Some(NodeKind::Object(obj)) = self.nodes.get_mut(id).map(|n| &mut n.kind) {
                cancelled += obj.animations.clear();
            }
        }
        tracing::debug!(%parent, %child, cancelled, "node removed");
        Ok(())
    }

    /// Free `id` and its whole subtree. Handles into the subtree go stale.
    ///
    /// Returns the number of freed nodes.
    pub fn destroy(&mut self, id: NodeId) -> TableauResult<usize> {
        self.node(id)?;
        if id == self.root {
            return Err(TableauError::invalid_parameter(
                "the scene root cannot be destroyed",
            ));
        }
        self.detach(id)?;
        let subtree: Vec<NodeId> = self.descendants(id).collect();
        for &n in &subtree {
            self.nodes.remove(n);
        }
        tracing::debug!(node = %id, freed = subtree.len(), "subtree destroyed");
        Ok(subtree.len())
    }

    fn detach(&mut self, child: NodeId) -> TableauResult<()> {
        let Some(old) = self.node_mut(child)?.parent.take() else {
            return Ok(());
        };
        if let Some(old_parent) = self.nodes.get_mut(old) {
            old_parent.children.retain(|&c| c != child);
        }
        Ok(())
    }

    /// Show or hide `id` and its subtree. Hidden objects keep animating.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> TableauResult<()> {
        self.node_mut(id)?.visible = visible;
        Ok(())
    }

    /// Pre-order walk of `id`'s subtree, starting with `id` itself. Empty for stale handles.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = if self.contains(id) { vec![id] } else { Vec::new() };
        Descendants { scene: self, stack }
    }

    /// Object payload of `id`.
    pub fn object(&self, id: NodeId) -> TableauResult<&GameObject> {
        let node = self.node(id)?;
        match &node.kind {
            NodeKind::Object(obj) => Ok(obj),
            NodeKind::Group => Err(not_an_object(&node.name)),
        }
    }

    /// Mutable object payload of `id`.
    pub fn object_mut(&mut self, id: NodeId) -> TableauResult<&mut GameObject> {
        let node = self.node_mut(id)?;
        match &mut node.kind {
            NodeKind::Object(obj) => Ok(obj),
            NodeKind::Group => Err(not_an_object(&node.name)),
        }
    }

    /// Settled transform state of an object.
    pub fn transform(&self, id: NodeId) -> TableauResult<&TransformState> {
        Ok(self.object(id)?.transform())
    }

    /// Mutable transform state of an object.
    pub fn transform_mut(&mut self, id: NodeId) -> TableauResult<&mut TransformState> {
        Ok(self.object_mut(id)?.transform_mut())
    }

    /// Queue an animation on an object.
    ///
    /// Jobs of the same transform kind run one after another; different kinds run in parallel.
    pub fn animate(
        &mut self,
        id: NodeId,
        target: AnimTarget,
        duration_ms: f64,
        repeat: Repeat,
    ) -> TableauResult<JobId> {
        let job_id = JobId(self.next_job);
        let job = AnimationJob::new(job_id, target, duration_ms, repeat)?;
        self.object_mut(id)?.animations.push(job);
        self.next_job += 1;
        Ok(job_id)
    }

    /// Cancel one queued job.
    pub fn cancel(&mut self, id: NodeId, job: JobId) -> TableauResult<()> {
        self.object_mut(id)?.animations.cancel(job)?;
        Ok(())
    }

    /// Cancel every queued job of one kind; returns how many were removed.
    pub fn cancel_kind(&mut self, id: NodeId, kind: TransformKind) -> TableauResult<usize> {
        Ok(self.object_mut(id)?.animations.cancel_kind(kind))
    }

    /// Cancel every queued job of an object; returns how many were removed.
    pub fn clear_animations(&mut self, id: NodeId) -> TableauResult<usize> {
        Ok(self.object_mut(id)?.animations.clear())
    }

    /// Advance every animation reachable from the root by `delta_ms`.
    ///
    /// Each object's new state is computed on a copy and swapped in whole. Returns completion
    /// events in traversal order.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn advance(&mut self, delta_ms: f64) -> Vec<AnimationEvent> {
        let delta_ms = if delta_ms.is_finite() {
            delta_ms.max(0.0)
        } else {
            0.0
        };
        let order: Vec<NodeId> = self.descendants(self.root).collect();
        let mut events = Vec::new();
        let mut done: Vec<CompletedJob> = Vec::new();
        for id in order {
            let Some(Node {
                kind: NodeKind::Object(obj),
                ..
            }) = self.nodes.get_mut(id)
            else {
                continue;
            };
            if let Some(next) = obj.animations.advance(&obj.transform, delta_ms, &mut done) {
                obj.transform = next;
            }
            events.extend(done.drain(..).map(|c| AnimationEvent {
                node: id,
                job: c.job,
                kind: c.kind,
            }));
        }
        events
    }

    /// Draw every visible node reachable from the root, depth-first in paint order.
    ///
    /// Returns the number of objects drawn.
    pub fn render(&self, surface: &mut dyn Surface) -> TableauResult<usize> {
        let mut drawn = 0;
        self.render_node(self.root, surface, &mut drawn)?;
        Ok(drawn)
    }

    fn render_node(
        &self,
        id: NodeId,
        surface: &mut dyn Surface,
        drawn: &mut usize,
    ) -> TableauResult<()> {
        let node = self.node(id)?;
        if !node.visible {
            return Ok(());
        }

        surface.save();
        let result = self.render_contents(node, surface, drawn);
        // Pop this node's state even when drawing failed; the first error wins.
        let restored = surface.restore();
        result.and(restored)
    }

    fn render_contents(
        &self,
        node: &Node,
        surface: &mut dyn Surface,
        drawn: &mut usize,
    ) -> TableauResult<()> {
        if let NodeKind::Object(obj) = &node.kind {
            let t = &obj.transform;
            surface.concat_transform(t.local_affine(obj.drawable.bounds()));
            surface.multiply_alpha(t.opacity);
            surface.set_blend_mode(t.blend);
            surface.compose_color_adjust(t.color_adjust());
            for filter in t.filter_list() {
                surface.push_filter(filter);
            }
            obj.drawable.render(surface)?;
            *drawn += 1;
        }
        for &child in &node.children {
            self.render_node(child, surface, drawn)?;
        }
        Ok(())
    }

    fn display(&self, id: NodeId) -> String {
        self.nodes
            .get(id)
            .map_or_else(|| id.to_string(), |n| n.name.clone())
    }
}

/// Pre-order iterator returned by [`Scene::descendants`].
pub struct Descendants<'a> {
    scene: &'a Scene,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Some(node) = self.scene.nodes.get(id) {
            self.stack.extend(node.children.iter().rev().copied());
        }
        Some(id)
    }
}

fn validate_name(name: String) -> TableauResult<String> {
    if name.is_empty() {
        return Err(TableauError::invalid_parameter("node name must not be empty"));
    }
    Ok(name)
}

fn not_an_object(name: &str) -> TableauError {
    TableauError::invalid_parameter(format!("'{name}' is a group, not a game object"))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
