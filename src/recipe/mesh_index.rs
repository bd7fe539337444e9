use ahash::{AHashMap, AHashSet};

use crate::scene::graph::{NodeId, SceneGraph};

/// Mapping from mesh name to the scene nodes that carry it.
///
/// Built by a single depth-first traversal at session start and read-only
/// afterwards. Never mutates the scene.
#[derive(Debug, Default)]
pub struct MeshIndex {
    entries: AHashMap<String, Vec<NodeId>>,
}

impl MeshIndex {
    /// Register every node under `root` whose own name, or whose mesh asset
    /// name, is in `target_names`. A node appears at most once per name.
    pub fn build(graph: &SceneGraph, root: NodeId, target_names: &AHashSet<String>) -> Self {
        let mut entries: AHashMap<String, Vec<NodeId>> = AHashMap::new();

        for id in graph.descendants(root) {
            let Some(node) = graph.node(id) else { continue };

            if target_names.contains(node.name.as_str()) {
                register(&mut entries, &node.name, id);
            }

            if let Some(visual) = &node.visual {
                if target_names.contains(visual.mesh_name.as_str()) {
                    register(&mut entries, &visual.mesh_name, id);
                }
            }
        }

        Self { entries }
    }

    /// Nodes registered under a mesh name. Empty for unknown names.
    pub fn nodes(&self, mesh_name: &str) -> &[NodeId] {
        self.entries
            .get(mesh_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[NodeId])> {
        self.entries
            .iter()
            .map(|(name, nodes)| (name.as_str(), nodes.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn register(entries: &mut AHashMap<String, Vec<NodeId>>, name: &str, id: NodeId) {
    let nodes = entries.entry(name.to_string()).or_default();
    if !nodes.contains(&id) {
        nodes.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::graph::Node;
    use crate::scene::material::{Material, MaterialStore};

    fn targets(names: &[&str]) -> AHashSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn indexes_by_node_name_and_mesh_asset_name() {
        let mut graph = SceneGraph::new("Root");
        let mut materials = MaterialStore::default();
        let material = materials.insert(Material::untinted());

        // Matches by its own name.
        let pot = graph.insert_child(graph.root(), Node::new("pot"));
        // Matches by its mesh asset name, not its node name.
        let jug = graph.insert_child(
            graph.root(),
            Node::new("JugHolder").with_visual("jug", material),
        );
        // Referenced by no step.
        graph.insert_child(graph.root(), Node::new("table"));

        let index = MeshIndex::build(&graph, graph.root(), &targets(&["pot", "jug"]));
        assert_eq!(index.nodes("pot"), &[pot]);
        assert_eq!(index.nodes("jug"), &[jug]);
        assert_eq!(index.nodes("table"), &[] as &[NodeId]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn node_matching_both_ways_registers_once() {
        let mut graph = SceneGraph::new("Root");
        let mut materials = MaterialStore::default();
        let material = materials.insert(Material::untinted());

        let mug = graph.insert_child(
            graph.root(),
            Node::new("mug").with_visual("mug", material),
        );

        let index = MeshIndex::build(&graph, graph.root(), &targets(&["mug"]));
        assert_eq!(index.nodes("mug"), &[mug]);
    }

    #[test]
    fn rebuild_yields_the_same_membership() {
        let mut graph = SceneGraph::new("Root");
        for name in ["pot", "jug", "mug"] {
            graph.insert_child(graph.root(), Node::new(name));
        }

        let names = targets(&["pot", "jug", "mug", "absent"]);
        let first = MeshIndex::build(&graph, graph.root(), &names);
        let second = MeshIndex::build(&graph, graph.root(), &names);

        assert_eq!(first.len(), second.len());
        for (name, nodes) in first.iter() {
            let mut a: Vec<NodeId> = nodes.to_vec();
            let mut b: Vec<NodeId> = second.nodes(name).to_vec();
            a.sort_by_key(|id| format!("{id:?}"));
            b.sort_by_key(|id| format!("{id:?}"));
            assert_eq!(a, b);
        }
        // Absent names are tolerated and simply produce no entry.
        assert!(first.nodes("absent").is_empty());
    }
}
