use crate::components::{Geometry, Light, Material, SegmentBuffer, Starfield, Transform};
use crate::entity::NodeId;
use foundation::handles::Handle;
use foundation::math::{MAT4_IDENTITY, Mat4, mat4_mul};

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Pure transform node.
    Group,
    Mesh {
        geometry: Geometry,
        material: Material,
    },
    Lines {
        segments: SegmentBuffer,
        material: Material,
    },
    Points {
        starfield: Starfield,
        material: Material,
    },
    Light(Light),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: &'static str,
    pub transform: Transform,
    /// Hidden nodes hide their whole subtree.
    pub visible: bool,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(name: &'static str, kind: NodeKind) -> Self {
        Self {
            name,
            transform: Transform::identity(),
            visible: true,
            kind,
        }
    }

    pub fn group(name: &'static str) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn mesh(name: &'static str, geometry: Geometry, material: Material) -> Self {
        Self::new(name, NodeKind::Mesh { geometry, material })
    }

    pub fn lines(name: &'static str, segments: SegmentBuffer, material: Material) -> Self {
        Self::new(name, NodeKind::Lines { segments, material })
    }

    pub fn points(name: &'static str, starfield: Starfield, material: Material) -> Self {
        Self::new(name, NodeKind::Points { starfield, material })
    }

    pub fn light(name: &'static str, light: Light) -> Self {
        Self::new(name, NodeKind::Light(light))
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn material(&self) -> Option<&Material> {
        match &self.kind {
            NodeKind::Mesh { material, .. }
            | NodeKind::Lines { material, .. }
            | NodeKind::Points { material, .. } => Some(material),
            NodeKind::Group | NodeKind::Light(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    UnknownNode(NodeId),
    RootRemoval,
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::UnknownNode(id) => {
                write!(f, "unknown scene node {}:{}", id.index(), id.generation())
            }
            SceneError::RootRemoval => write!(f, "the root node cannot be removed"),
        }
    }
}

impl std::error::Error for SceneError {}

#[derive(Debug)]
struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

#[derive(Debug)]
struct Entry {
    node: Node,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Owned tree of renderable nodes.
///
/// Every node except the root has exactly one parent. Removing a node
/// removes its whole subtree and invalidates the removed ids.
#[derive(Debug)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    len: usize,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        let root = NodeId(Handle::new(0, 0));
        Self {
            slots: vec![Slot {
                generation: 0,
                entry: Some(Entry {
                    node: Node::group("root"),
                    parent: None,
                    children: Vec::new(),
                }),
            }],
            free: Vec::new(),
            root,
            len: 1,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.entry(id).is_some()
    }

    pub fn add(&mut self, parent: NodeId, node: Node) -> Result<NodeId, SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        Ok(self.insert(parent, node))
    }

    /// Removes `id` and its descendants, returning how many nodes were dropped.
    pub fn remove(&mut self, id: NodeId) -> Result<usize, SceneError> {
        if id == self.root {
            return Err(SceneError::RootRemoval);
        }
        let parent = self
            .entry(id)
            .ok_or(SceneError::UnknownNode(id))?
            .parent;
        if let Some(parent) = parent
            && let Some(parent) = self.entry_mut(parent)
        {
            parent.children.retain(|child| *child != id);
        }

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let slot = &mut self.slots[next.index() as usize];
            if let Some(entry) = slot.entry.take() {
                stack.extend(entry.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(next.index());
                removed += 1;
            }
        }
        self.len -= removed;
        Ok(removed)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.entry(id).map(|e| &e.node)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.entry_mut(id).map(|e| &mut e.node)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entry(id).and_then(|e| e.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.entry(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    /// First node with the given name in depth-first order.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let entry = self.entry(id)?;
            if entry.node.name == name {
                return Some(id);
            }
            stack.extend(entry.children.iter().rev().copied());
        }
        None
    }

    /// Composed local-to-world matrix of a node.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let entry = self.entry(current)?;
            chain.push(entry.node.transform.to_matrix());
            cursor = entry.parent;
        }
        Some(
            chain
                .into_iter()
                .rev()
                .fold(MAT4_IDENTITY, |acc, local| mat4_mul(acc, local)),
        )
    }

    /// Depth-first, parents before children, siblings in insertion order.
    /// Hidden subtrees are skipped.
    pub fn visit_visible<'a>(&'a self, mut f: impl FnMut(NodeId, &'a Node, Mat4)) {
        let mut stack = vec![(self.root, MAT4_IDENTITY)];
        while let Some((id, parent_world)) = stack.pop() {
            let Some(entry) = self.entry(id) else {
                continue;
            };
            if !entry.node.visible {
                continue;
            }
            let world = mat4_mul(parent_world, entry.node.transform.to_matrix());
            f(id, &entry.node, world);
            for child in entry.children.iter().rev() {
                stack.push((*child, world));
            }
        }
    }

    fn insert(&mut self, parent: NodeId, node: Node) -> NodeId {
        let entry = Entry {
            node,
            parent: Some(parent),
            children: Vec::new(),
        };
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.entry = Some(entry);
                NodeId(Handle::new(index, slot.generation))
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                NodeId(Handle::new(index, 0))
            }
        };
        if let Some(parent) = self.entry_mut(parent) {
            parent.children.push(id);
        }
        self.len += 1;
        id
    }

    fn entry(&self, id: NodeId) -> Option<&Entry> {
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.entry.as_ref()
    }

    fn entry_mut(&mut self, id: NodeId) -> Option<&mut Entry> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.entry.as_mut()
    }
}

/// Assembles a [`SceneGraph`] top-down.
///
/// `open` descends into the new node, `close` returns to its parent.
#[derive(Debug)]
pub struct SceneGraphBuilder {
    graph: SceneGraph,
    stack: Vec<NodeId>,
}

impl Default for SceneGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraphBuilder {
    pub fn new() -> Self {
        let graph = SceneGraph::new();
        let root = graph.root();
        Self {
            graph,
            stack: vec![root],
        }
    }

    fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(self.graph.root)
    }

    /// Adds a leaf under the current node.
    pub fn push(&mut self, node: Node) -> NodeId {
        let parent = self.current();
        self.graph.insert(parent, node)
    }

    /// Adds a node and makes it the current parent.
    pub fn open(&mut self, node: Node) -> NodeId {
        let id = self.push(node);
        self.stack.push(id);
        id
    }

    pub fn close(&mut self) -> &mut Self {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
        self
    }

    pub fn build(self) -> SceneGraph {
        self.graph
    }
}
