use glam::{Vec3, Vec4};
use slab::Slab;

/// Stable id of a material inside a [`MaterialStore`]. Materials are shared
/// between nodes, so the id is the identity used for de-duplication.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(usize);

impl std::fmt::Debug for MaterialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("MaterialId").field(&self.0).finish()
    }
}

/// A shared, mutable material.
///
/// The base color is a typed capability: a material either exposes one or it
/// does not, checked once instead of probing property names per access. A
/// glow is an additive overlay composited on top of the base color at query
/// time; the base color itself is never rewritten, so removing the overlay is
/// a lossless restore.
#[derive(Clone, Debug, Default)]
pub struct Material {
    base_color: Option<Vec4>,
    overlay: Option<Vec3>,
}

impl Material {
    pub fn with_base_color(color: Vec4) -> Self {
        Self {
            base_color: Some(color),
            overlay: None,
        }
    }

    /// A material without a tintable base color.
    pub fn untinted() -> Self {
        Self::default()
    }

    #[inline]
    pub fn supports_base_color(&self) -> bool {
        self.base_color.is_some()
    }

    #[inline]
    pub fn base_color(&self) -> Option<Vec4> {
        self.base_color
    }

    /// Set the additive color offset composited over the base color.
    pub fn set_overlay(&mut self, offset: Vec3) {
        if self.base_color.is_some() {
            self.overlay = Some(offset);
        }
    }

    /// Remove the overlay; the displayed color falls back to the base color.
    pub fn clear_overlay(&mut self) {
        self.overlay = None;
    }

    #[inline]
    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    /// The color as it should be rendered: the base color with the overlay
    /// composited on top. Color channels clamp to 1.0, alpha is untouched.
    pub fn displayed_color(&self) -> Option<Vec4> {
        let base = self.base_color?;
        Some(match self.overlay {
            Some(offset) => (base.truncate() + offset).min(Vec3::ONE).extend(base.w),
            None => base,
        })
    }
}

#[derive(Default)]
pub struct MaterialStore {
    materials: Slab<Material>,
}

impl MaterialStore {
    pub fn insert(&mut self, material: Material) -> MaterialId {
        MaterialId(self.materials.insert(material))
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn get_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_composites_and_clamps() {
        let mut material = Material::with_base_color(Vec4::new(0.4, 0.9, 0.9, 0.5));
        assert_eq!(
            material.displayed_color(),
            Some(Vec4::new(0.4, 0.9, 0.9, 0.5))
        );

        material.set_overlay(Vec3::new(0.5, 0.5, 0.3));
        // Green and blue clamp, alpha is untouched.
        assert_eq!(
            material.displayed_color(),
            Some(Vec4::new(0.9, 1.0, 1.0, 0.5))
        );

        material.clear_overlay();
        assert_eq!(
            material.displayed_color(),
            Some(Vec4::new(0.4, 0.9, 0.9, 0.5))
        );
    }

    #[test]
    fn untinted_material_has_no_capability() {
        let mut material = Material::untinted();
        assert!(!material.supports_base_color());
        assert_eq!(material.displayed_color(), None);

        // Overlays need a base color to composite over.
        material.set_overlay(Vec3::ONE);
        assert!(!material.has_overlay());
    }

    #[test]
    fn repeated_overlays_do_not_drift_the_base_color() {
        let base = Vec4::new(0.2, 0.3, 0.4, 1.0);
        let mut material = Material::with_base_color(base);
        for i in 0..100 {
            material.set_overlay(Vec3::splat(i as f32 / 100.0));
        }
        material.clear_overlay();
        assert_eq!(material.displayed_color(), Some(base));
    }
}
