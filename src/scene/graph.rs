use slab::Slab;

use super::camera::Projection;
use super::material::MaterialId;
use super::transform::Transform;

/// Stable handle to a node inside a [`SceneGraph`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl std::fmt::Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("NodeId").field(&self.0).finish()
    }
}

/// A mesh-bearing visual attached to a node.
#[derive(Clone, Debug)]
pub struct MeshVisual {
    /// Name of the underlying mesh asset. May differ from the node name.
    pub mesh_name: String,
    pub material: MaterialId,
}

pub struct Node {
    pub name: String,
    pub enabled: bool,
    pub transform: Transform,
    pub visual: Option<MeshVisual>,
    /// Present on camera nodes.
    pub projection: Option<Projection>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            transform: Transform::default(),
            visual: None,
            projection: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_visual(mut self, mesh_name: impl Into<String>, material: MaterialId) -> Self {
        self.visual = Some(MeshVisual {
            mesh_name: mesh_name.into(),
            material,
        });
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn is_camera(&self) -> bool {
        self.projection.is_some()
    }
}

/// An ownership tree of named nodes backed by a slab arena.
///
/// Children are an ordinary sized list, so traversal is plain iteration and
/// never has to probe for an out-of-range child.
pub struct SceneGraph {
    nodes: Slab<Node>,
    root: NodeId,
}

impl SceneGraph {
    pub fn new(root_name: impl Into<String>) -> Self {
        let mut nodes = Slab::new();
        let root = NodeId(nodes.insert(Node::new(root_name)));
        Self { nodes, root }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Insert `node` as the last child of `parent`.
    pub fn insert_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        node.parent = Some(parent);
        let id = NodeId(self.nodes.insert(node));
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Depth-first iterator over `start` and all of its descendants.
    pub fn descendants(&self, start: NodeId) -> Descendants<'_> {
        Descendants {
            graph: self,
            stack: vec![start],
        }
    }

    /// First node whose name matches exactly, depth-first from `start`.
    pub fn find_by_name(&self, start: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(start)
            .find(|id| self.nodes[id.0].name == name)
    }

    /// First camera-carrying node, depth-first from `start`.
    pub fn find_camera(&self, start: NodeId) -> Option<NodeId> {
        self.descendants(start)
            .find(|id| self.nodes[id.0].is_camera())
    }
}

pub struct Descendants<'a> {
    graph: &'a SceneGraph,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Some(node) = self.graph.node(id) {
            // Reversed so children come off the stack in document order.
            self.stack.extend(node.children.iter().rev().copied());
        }
        Some(id)
    }
}
