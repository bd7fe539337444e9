#![allow(dead_code)]

pub mod camera;
pub mod graph;
pub mod material;
pub mod transform;

pub mod prelude {
    pub use super::camera::{Camera, Matrices, Projection};
    pub use super::graph::{MeshVisual, Node, NodeId, SceneGraph};
    pub use super::material::{Material, MaterialId, MaterialStore};
    pub use super::transform::Transform;
    pub use glam::{Quat, Vec2, Vec3, Vec4};
}
