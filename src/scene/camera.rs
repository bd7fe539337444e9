use glam::{Mat4, Quat, Vec2, Vec3, Vec4Swizzles};

use super::graph::Node;

/// Perspective projection parameters carried by a camera node.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov: 60.0_f32.to_radians(),
            aspect_ratio: 9.0 / 16.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[derive(Clone, Copy, Default)]
pub struct Matrices {
    pub projection: Mat4,
    pub view: Mat4,
}

/// A camera pose plus projection, resolved from a camera-carrying node.
///
/// Screen coordinates are normalized: (0, 0) is the top-left corner of the
/// screen, (1, 1) the bottom-right.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Quat,
    pub projection: Projection,
}

impl Camera {
    pub const FORWARD: Vec3 = Vec3::Y;
    pub const UP: Vec3 = Vec3::Z;

    /// Build a camera from a node's transform and projection. `None` when the
    /// node carries no projection.
    pub fn from_node(node: &Node) -> Option<Self> {
        Some(Self {
            position: node.transform.translation,
            rotation: node.transform.rotation,
            projection: node.projection?,
        })
    }

    pub fn calculate_matrices(&self) -> Matrices {
        let projection = Mat4::perspective_lh(
            self.projection.fov,
            self.projection.aspect_ratio,
            self.projection.near,
            self.projection.far,
        );

        let target = self.position + self.rotation * Self::FORWARD;
        let view = Mat4::look_at_lh(self.position, target, self.rotation * Self::UP);

        Matrices { projection, view }
    }

    /// Project a normalized screen point to the world-space position at the
    /// given distance from the camera.
    pub fn screen_space_to_world_space(&self, screen: Vec2, depth: f32) -> Vec3 {
        let ndc = Vec3::new(screen.x * 2.0 - 1.0, 1.0 - screen.y * 2.0, 1.0);

        let matrices = self.calculate_matrices();
        let inverse_view_proj = (matrices.projection * matrices.view).inverse();

        let far_point = inverse_view_proj.project_point3(ndc);
        let direction = (far_point - self.position).normalize();

        self.position + direction * depth
    }

    /// Project a world-space point to normalized screen coordinates. Returns
    /// `None` for points behind the camera.
    pub fn world_space_to_screen_space(&self, world: Vec3) -> Option<Vec2> {
        let matrices = self.calculate_matrices();
        let clip = matrices.projection * matrices.view * world.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        Some(Vec2::new((ndc.x + 1.0) * 0.5, (1.0 - ndc.y) * 0.5))
    }
}
