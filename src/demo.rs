//! Demo autopilot
//!
//! Produces player input for unattended sessions: wander between random
//! points in the room and sidestep any projectile on a collision course.
//! Seeded, so a given seed replays the same session.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{PLAY_HEIGHT, ROOM_HALF_EXTENT};
use crate::sim::{Projectile, TickInput};

/// Projectiles further ahead than this are ignored
const DANGER_RANGE: f32 = 6.0;
/// Closest-approach distance that counts as a threat
const DANGER_WIDTH: f32 = 1.5;
/// Seconds before picking a new wander point
const RETARGET_SECONDS: f32 = 3.0;
/// Wander points stay this far inside the walls
const WANDER_MARGIN: f32 = 2.0;

#[derive(Debug, Clone)]
pub struct DemoPilot {
    rng: Pcg32,
    target: Vec3,
    retarget_in: f32,
}

impl DemoPilot {
    pub fn new(seed: u64) -> Self {
        let mut pilot = Self {
            rng: Pcg32::seed_from_u64(seed),
            target: Vec3::new(0.0, PLAY_HEIGHT, 0.0),
            retarget_in: 0.0,
        };
        pilot.retarget();
        pilot
    }

    fn retarget(&mut self) {
        let reach = ROOM_HALF_EXTENT - WANDER_MARGIN;
        self.target = Vec3::new(
            self.rng.random_range(-reach..reach),
            PLAY_HEIGHT,
            self.rng.random_range(-reach..reach),
        );
        self.retarget_in = RETARGET_SECONDS;
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Input for this frame
    pub fn steer(&mut self, dt: f32, player: Vec3, projectiles: &[Projectile]) -> TickInput {
        let evade = projectiles
            .iter()
            .filter_map(|p| threat(player, p))
            .fold(Vec3::ZERO, |acc, away| acc + away);
        if let Some(away) = evade.try_normalize() {
            return TickInput::new(away.x, away.z);
        }

        self.retarget_in -= dt;
        let to_target = (self.target - player).with_y(0.0);
        if to_target.length() < 0.5 || self.retarget_in <= 0.0 {
            self.retarget();
        }
        let heading = (self.target - player).with_y(0.0).normalize_or_zero();
        TickInput::new(heading.x, heading.z)
    }
}

/// Direction to step out of `projectile`'s path, if it is a threat
fn threat(player: Vec3, projectile: &Projectile) -> Option<Vec3> {
    let direction = projectile.direction().with_y(0.0).normalize_or_zero();
    let relative = (player - projectile.position()).with_y(0.0);
    let ahead = relative.dot(direction);
    if ahead <= 0.0 || ahead > DANGER_RANGE {
        return None;
    }
    let miss = relative - direction * ahead;
    if miss.length() > DANGER_WIDTH {
        return None;
    }
    // Dead-on hits pick a side
    let side = miss
        .try_normalize()
        .unwrap_or_else(|| direction.cross(Vec3::Y).normalize_or_zero());
    // Closer threats weigh more
    Some(side * (DANGER_RANGE - ahead))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BULLET_MATERIAL_KEY, BULLET_MESH_KEY};
    use crate::material::Material;
    use crate::mesh::create_sphere;
    use crate::resources::ResourceCache;
    use crate::sim::MeshMaterial;
    use crate::tuning::ProjectileParams;

    fn incoming(origin: Vec3, direction: Vec3) -> Projectile {
        let mut cache = ResourceCache::new();
        let look = MeshMaterial::resolve(
            &mut cache,
            BULLET_MESH_KEY,
            BULLET_MATERIAL_KEY,
            || create_sphere(1.0, 4, 4),
            Material::CHROME,
        )
        .unwrap();
        let mut projectile = Projectile::new();
        projectile.initialize(
            origin,
            direction,
            ProjectileParams {
                speed: 5.0,
                max_distance: 30.0,
                radius: 0.2,
            },
            look,
        );
        projectile
    }

    #[test]
    fn test_same_seed_same_targets() {
        let a = DemoPilot::new(7);
        let b = DemoPilot::new(7);
        assert_eq!(a.target(), b.target());
        let reach = ROOM_HALF_EXTENT - WANDER_MARGIN;
        assert!(a.target().x.abs() <= reach && a.target().z.abs() <= reach);
    }

    #[test]
    fn test_sidesteps_incoming() {
        let mut pilot = DemoPilot::new(1);
        let player = Vec3::new(0.0, PLAY_HEIGHT, 0.0);
        let bullet = incoming(Vec3::new(3.0, PLAY_HEIGHT, 0.3), Vec3::NEG_X);
        let input = pilot.steer(0.016, player, &[bullet]);
        // Bullet passes at +Z, so step toward -Z
        assert!(input.move_z < -0.9);
        assert!(input.move_x.abs() < 0.1);
    }

    #[test]
    fn test_ignores_receding() {
        let player = Vec3::new(0.0, PLAY_HEIGHT, 0.0);
        let bullet = incoming(Vec3::new(3.0, PLAY_HEIGHT, 0.0), Vec3::X);
        assert!(threat(player, &bullet).is_none());
    }

    #[test]
    fn test_wanders_toward_target() {
        let mut pilot = DemoPilot::new(3);
        let player = Vec3::new(0.0, PLAY_HEIGHT, 0.0);
        let input = pilot.steer(0.016, player, &[]);
        let target = pilot.target();
        let heading = Vec3::new(input.move_x, 0.0, input.move_z);
        let wanted = (target - player).with_y(0.0).normalize_or_zero();
        assert!(heading.dot(wanted) > 0.99);
    }
}
