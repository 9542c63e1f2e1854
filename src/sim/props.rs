//! Static room fixtures: floor and four walls
//!
//! Walls are named from the player's default facing: north is -Z.

use glam::{Mat4, Vec3};

use super::lifecycle::Lifecycle;
use super::object::{DrawItem, GameObject, MeshMaterial};
use crate::consts::*;
use crate::error::ResourceError;
use crate::material::Material;
use crate::mesh::create_cuboid;
use crate::resources::ResourceCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropKind {
    Floor,
    NorthWall,
    SouthWall,
    WestWall,
    EastWall,
}

impl PropKind {
    /// Fixed slot order
    pub const ALL: [PropKind; 5] = [
        PropKind::Floor,
        PropKind::NorthWall,
        PropKind::SouthWall,
        PropKind::WestWall,
        PropKind::EastWall,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PropKind::Floor => "floor",
            PropKind::NorthWall => "north wall",
            PropKind::SouthWall => "south wall",
            PropKind::WestWall => "west wall",
            PropKind::EastWall => "east wall",
        }
    }

    fn mesh_key(&self) -> &'static str {
        match self {
            PropKind::Floor => FLOOR_MESH_KEY,
            PropKind::NorthWall | PropKind::SouthWall => WALL_X_MESH_KEY,
            PropKind::WestWall | PropKind::EastWall => WALL_Z_MESH_KEY,
        }
    }

    fn material_key(&self) -> &'static str {
        match self {
            PropKind::Floor => FLOOR_MATERIAL_KEY,
            _ => WALL_MATERIAL_KEY,
        }
    }

    fn material(&self) -> Material {
        match self {
            PropKind::Floor => Material::STONE,
            _ => Material::PLASTER,
        }
    }

    /// Box half extents
    fn half_extents(&self) -> Vec3 {
        let h = ROOM_HALF_EXTENT;
        let t = WALL_THICKNESS / 2.0;
        match self {
            PropKind::Floor => Vec3::new(h + t, FLOOR_THICKNESS / 2.0, h + t),
            PropKind::NorthWall | PropKind::SouthWall => Vec3::new(h + t, WALL_HEIGHT / 2.0, t),
            PropKind::WestWall | PropKind::EastWall => Vec3::new(t, WALL_HEIGHT / 2.0, h - t),
        }
    }

    /// Box center in world space
    fn center(&self) -> Vec3 {
        let h = ROOM_HALF_EXTENT;
        let y = WALL_HEIGHT / 2.0;
        match self {
            PropKind::Floor => Vec3::new(0.0, -FLOOR_THICKNESS / 2.0, 0.0),
            PropKind::NorthWall => Vec3::new(0.0, y, -h),
            PropKind::SouthWall => Vec3::new(0.0, y, h),
            PropKind::WestWall => Vec3::new(-h, y, 0.0),
            PropKind::EastWall => Vec3::new(h, y, 0.0),
        }
    }
}

#[derive(Debug)]
pub struct StaticProp {
    kind: PropKind,
    lifecycle: Lifecycle,
    world: Mat4,
    look: Option<MeshMaterial>,
}

impl StaticProp {
    pub fn new(kind: PropKind) -> Self {
        Self {
            kind,
            lifecycle: Lifecycle::Uninitialized,
            world: Mat4::IDENTITY,
            look: None,
        }
    }

    pub fn initialize(&mut self, cache: &mut ResourceCache) -> Result<(), ResourceError> {
        let half_extents = self.kind.half_extents();
        let look = MeshMaterial::resolve(
            cache,
            self.kind.mesh_key(),
            self.kind.material_key(),
            || create_cuboid(half_extents),
            self.kind.material(),
        )?;
        self.lifecycle.initialize(self.kind.name());
        self.world = Mat4::from_translation(self.kind.center());
        self.look = Some(look);
        Ok(())
    }
}

impl GameObject for StaticProp {
    fn kind(&self) -> &'static str {
        self.kind.name()
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn tick(&mut self, _delta_seconds: f32) {
        self.lifecycle.expect_live(self.kind.name());
    }

    fn draw(&self) -> Option<DrawItem> {
        self.lifecycle.expect_live(self.kind.name());
        self.look.as_ref().map(|look| look.draw(self.world, true))
    }

    fn release(&mut self) {
        self.lifecycle.release(self.kind.name());
        self.look = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_opposite_walls_share_mesh() {
        let mut cache = ResourceCache::new();
        let mut north = StaticProp::new(PropKind::NorthWall);
        let mut south = StaticProp::new(PropKind::SouthWall);
        north.initialize(&mut cache).unwrap();
        south.initialize(&mut cache).unwrap();
        let (n, s) = (north.look.as_ref().unwrap(), south.look.as_ref().unwrap());
        assert!(Rc::ptr_eq(&n.mesh, &s.mesh));
    }

    #[test]
    fn test_walls_enclose_room() {
        for kind in [PropKind::WestWall, PropKind::EastWall] {
            let inner = kind.center().x.abs() - kind.half_extents().x;
            assert!(inner < ROOM_HALF_EXTENT);
        }
        let floor_top = PropKind::Floor.center().y + PropKind::Floor.half_extents().y;
        assert!(floor_top.abs() < 0.0001);
    }

    #[test]
    fn test_draw_casts_shadow() {
        let mut cache = ResourceCache::new();
        let mut floor = StaticProp::new(PropKind::Floor);
        floor.initialize(&mut cache).unwrap();
        let item = floor.draw().unwrap();
        assert_eq!(item.mesh, FLOOR_MESH_KEY);
        assert!(item.casts_shadow);
    }

    #[test]
    #[should_panic(expected = "already initialized")]
    fn test_double_initialize_panics() {
        let mut cache = ResourceCache::new();
        let mut floor = StaticProp::new(PropKind::Floor);
        floor.initialize(&mut cache).unwrap();
        let _ = floor.initialize(&mut cache);
    }

    #[test]
    #[should_panic(expected = "has already been released")]
    fn test_tick_after_release_panics() {
        let mut cache = ResourceCache::new();
        let mut wall = StaticProp::new(PropKind::EastWall);
        wall.initialize(&mut cache).unwrap();
        wall.release();
        wall.tick(0.1);
    }
}
