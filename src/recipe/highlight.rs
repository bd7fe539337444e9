use std::f32::consts::TAU;

use glam::Vec3;

use crate::scene::graph::{NodeId, SceneGraph};
use crate::scene::material::{MaterialId, MaterialStore};

use super::mesh_index::MeshIndex;
use super::steps::Step;

/// Per-channel glow offsets, scaled by the pulse intensity before they are
/// composited. Warm yellow-white: strong red and green, a touch of blue.
const GLOW_OFFSET: Vec3 = Vec3::new(0.5, 0.5, 0.3);

const PULSES_PER_SECOND: f32 = 2.0;

/// Sinusoidal pulse intensity at `t` seconds into the glow, in [0.3, 1.0].
#[inline]
pub fn glow_intensity(t: f32) -> f32 {
    let pulse = ((t * PULSES_PER_SECOND * TAU).sin() + 1.0) * 0.5;
    0.3 + pulse * 0.7
}

/// The set of nodes currently glowing for the active step.
///
/// Glowing is an overlay on the node's material, so restoring a material is
/// simply clearing its overlay; base colors are never touched.
#[derive(Default)]
pub struct HighlightSet {
    entries: Vec<(NodeId, MaterialId)>,
    pulse_time: f32,
}

impl HighlightSet {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    /// Replace the highlight set with the nodes required by `step` and
    /// restart the pulse. Disabled nodes and materials without a base color
    /// are left alone; shared materials are tracked once.
    pub fn highlight_step(
        &mut self,
        step: &Step,
        graph: &SceneGraph,
        index: &MeshIndex,
        materials: &mut MaterialStore,
    ) {
        self.clear(materials);

        for mesh_name in &step.mesh_names {
            for &id in index.nodes(mesh_name) {
                let Some(node) = graph.node(id) else { continue };
                if !node.enabled {
                    continue;
                }
                let Some(visual) = &node.visual else { continue };

                let material_id = visual.material;
                let Some(material) = materials.get(material_id) else {
                    continue;
                };
                if !material.supports_base_color() {
                    continue;
                }
                if self.entries.iter().any(|(_, existing)| *existing == material_id) {
                    continue;
                }
                self.entries.push((id, material_id));
            }
        }

        self.pulse_time = 0.0;
    }

    /// Drop the highlight for a single mesh name, restoring its materials.
    /// Used when its mesh is tapped while the rest of the step keeps glowing.
    pub fn remove_mesh(
        &mut self,
        mesh_name: &str,
        index: &MeshIndex,
        materials: &mut MaterialStore,
    ) {
        let nodes = index.nodes(mesh_name);
        self.entries.retain(|(id, material_id)| {
            if nodes.contains(id) {
                if let Some(material) = materials.get_mut(*material_id) {
                    material.clear_overlay();
                }
                false
            } else {
                true
            }
        });
    }

    /// Restore every highlighted material and empty the set.
    pub fn clear(&mut self, materials: &mut MaterialStore) {
        for (_, material_id) in self.entries.drain(..) {
            if let Some(material) = materials.get_mut(material_id) {
                material.clear_overlay();
            }
        }
    }

    /// Advance the pulse clock and re-apply the glow overlays. Does nothing
    /// while the set is empty or an animation is running, mirroring a tick
    /// that disables itself.
    pub fn update(&mut self, delta_time: f32, playing: bool, materials: &mut MaterialStore) {
        if self.entries.is_empty() || playing {
            return;
        }

        self.pulse_time += delta_time;
        let intensity = glow_intensity(self.pulse_time);

        for (_, material_id) in &self.entries {
            if let Some(material) = materials.get_mut(*material_id) {
                material.set_overlay(GLOW_OFFSET * intensity);
            }
        }
    }
}
