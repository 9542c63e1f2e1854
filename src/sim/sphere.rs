//! Bounding sphere collision primitive

use glam::Vec3;

/// Center + radius. Radius is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingSphere {
    pub center: Vec3,
    radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        assert!(radius >= 0.0, "bounding sphere radius must be >= 0, got {radius}");
        Self { center, radius }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) {
        assert!(radius >= 0.0, "bounding sphere radius must be >= 0, got {radius}");
        self.radius = radius;
    }

    /// Two spheres intersect iff the distance between centers is at most the
    /// sum of radii (touching counts).
    ///
    /// Compared squared so the boundary case is exact for representable inputs.
    #[inline]
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance_squared(other.center) <= reach * reach
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_touching_spheres_intersect() {
        let a = BoundingSphere::new(Vec3::ZERO, 1.0);
        let b = BoundingSphere::new(Vec3::new(3.0, 0.0, 0.0), 2.0);
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_separated_spheres_miss() {
        let a = BoundingSphere::new(Vec3::ZERO, 1.0);
        let b = BoundingSphere::new(Vec3::new(0.0, 3.5, 0.0), 2.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_coincident_centers() {
        let a = BoundingSphere::new(Vec3::splat(2.0), 0.5);
        let b = BoundingSphere::new(Vec3::splat(2.0), 0.0);
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_point_containment() {
        let sphere = BoundingSphere::new(Vec3::ZERO, 1.0);
        let inside = BoundingSphere::new(Vec3::new(0.5, 0.0, 0.0), 0.0);
        let outside = BoundingSphere::new(Vec3::new(1.5, 0.0, 0.0), 0.0);
        assert!(sphere.intersects(&inside));
        assert!(!sphere.intersects(&outside));
    }

    #[test]
    #[should_panic(expected = "radius must be >= 0")]
    fn test_negative_radius_rejected() {
        let _ = BoundingSphere::new(Vec3::ZERO, -1.0);
    }

    fn coord() -> impl Strategy<Value = f32> {
        -100.0_f32..100.0
    }

    fn sphere() -> impl Strategy<Value = BoundingSphere> {
        (coord(), coord(), coord(), 0.0_f32..50.0)
            .prop_map(|(x, y, z, r)| BoundingSphere::new(Vec3::new(x, y, z), r))
    }

    proptest! {
        #[test]
        fn prop_symmetric(a in sphere(), b in sphere()) {
            prop_assert_eq!(a.intersects(&b), b.intersects(&a));
        }

        #[test]
        fn prop_self_intersects(a in sphere()) {
            prop_assert!(a.intersects(&a));
        }

        #[test]
        fn prop_distance_rule(a in sphere(), b in sphere()) {
            let d = a.center.distance(b.center);
            let reach = a.radius() + b.radius();
            // Skip the thin band where sqrt rounding could flip the answer
            prop_assume!((d - reach).abs() > 1e-3);
            prop_assert_eq!(a.intersects(&b), d <= reach);
        }

        #[test]
        fn prop_exact_boundary_on_axis(r1 in 0_u32..64, r2 in 0_u32..64) {
            // Integer radii keep the boundary distance exactly representable
            let a = BoundingSphere::new(Vec3::ZERO, r1 as f32);
            let b = BoundingSphere::new(Vec3::new((r1 + r2) as f32, 0.0, 0.0), r2 as f32);
            prop_assert!(a.intersects(&b));
        }
    }
}
