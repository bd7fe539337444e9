use tracing::warn;

use crate::scene::graph::{NodeId, SceneGraph};

/// Optional collaborator that can hand over the camera it uses for its own
/// interaction ray casts.
pub trait InteractionSource {
    fn camera(&self) -> Option<NodeId>;
}

/// Which rung of the fallback chain produced the camera.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraSource {
    Configured,
    Interaction,
    NamedNode,
    SceneSearch,
}

/// Resolve the camera used to turn taps into rays. Priority order, first
/// success wins: the explicitly configured camera, the interaction
/// collaborator's camera, a node found by exact name, then the first camera
/// anywhere in the scene.
pub fn resolve_camera(
    graph: &SceneGraph,
    configured: Option<NodeId>,
    interaction: Option<&dyn InteractionSource>,
    camera_node_name: &str,
) -> Option<(NodeId, CameraSource)> {
    if let Some(id) = configured {
        if is_camera(graph, id) {
            return Some((id, CameraSource::Configured));
        }
        warn!("Configured camera node does not carry a camera, falling back");
    }

    if let Some(id) = interaction.and_then(InteractionSource::camera) {
        if is_camera(graph, id) {
            return Some((id, CameraSource::Interaction));
        }
    }

    if let Some(id) = graph.find_by_name(graph.root(), camera_node_name) {
        if is_camera(graph, id) {
            return Some((id, CameraSource::NamedNode));
        }
    }

    graph
        .find_camera(graph.root())
        .map(|id| (id, CameraSource::SceneSearch))
}

fn is_camera(graph: &SceneGraph, id: NodeId) -> bool {
    graph.node(id).is_some_and(|node| node.is_camera())
}
