//! Game object capabilities
//!
//! Every scene entity is updatable and (optionally) drawable. The set of
//! object kinds is closed and flat: player, spawner, projectile, floor,
//! walls, light. Nothing inherits behavior from anything else.

use glam::Mat4;
use std::rc::Rc;

use super::lifecycle::Lifecycle;
use crate::error::ResourceError;
use crate::material::Material;
use crate::mesh::MeshData;
use crate::resources::ResourceCache;

/// One mesh draw for the depth and lit passes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    /// Resource cache key of the mesh
    pub mesh: &'static str,
    pub material: Material,
    pub world: Mat4,
    /// Rendered into the shadow map
    pub casts_shadow: bool,
}

/// A mesh/material pair shared through the resource cache
#[derive(Debug, Clone)]
pub struct MeshMaterial {
    pub mesh_key: &'static str,
    pub mesh: Rc<MeshData>,
    pub material: Rc<Material>,
}

impl MeshMaterial {
    /// Fetch both halves from the cache, creating whichever is missing
    pub fn resolve(
        cache: &mut ResourceCache,
        mesh_key: &'static str,
        material_key: &str,
        build_mesh: impl FnOnce() -> MeshData,
        material: Material,
    ) -> Result<Self, ResourceError> {
        let mesh = cache.get_or_create_with(mesh_key, build_mesh)?;
        let material = cache.get_or_create_with(material_key, || material)?;
        Ok(Self {
            mesh_key,
            mesh,
            material,
        })
    }

    pub fn draw(&self, world: Mat4, casts_shadow: bool) -> DrawItem {
        DrawItem {
            mesh: self.mesh_key,
            material: *self.material,
            world,
            casts_shadow,
        }
    }
}

/// Shared object contract
pub trait GameObject {
    /// Short name used in lifecycle diagnostics
    fn kind(&self) -> &'static str;

    fn lifecycle(&self) -> Lifecycle;

    /// Advance one frame. Panics unless initialized.
    fn tick(&mut self, delta_seconds: f32);

    /// Describe this frame's draw. Panics unless initialized.
    fn draw(&self) -> Option<DrawItem>;

    /// Give up resources. Legal exactly once, from Initialized.
    fn release(&mut self);

    fn is_live(&self) -> bool {
        self.lifecycle().is_live()
    }
}
