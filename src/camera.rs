//! Camera that trails the player

use glam::{Mat4, Vec3};

/// Offset from the player to the eye
const FOLLOW_OFFSET: Vec3 = Vec3::new(0.0, 9.0, 9.0);
const FOV_Y_RADIANS: f32 = std::f32::consts::FRAC_PI_4;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;

#[derive(Debug, Clone)]
pub struct MovableCamera {
    eye: Vec3,
    target: Vec3,
    aspect: f32,
}

impl MovableCamera {
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: FOLLOW_OFFSET,
            target: Vec3::ZERO,
            aspect: aspect.max(0.01),
        }
    }

    /// Look at `target` from the fixed follow offset
    pub fn follow(&mut self, target: Vec3) {
        self.target = target;
        self.eye = target + FOLLOW_OFFSET;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect > 0.0 && aspect.is_finite() {
            self.aspect = aspect;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(FOV_Y_RADIANS, self.aspect, Z_NEAR, Z_FAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_projects_to_center() {
        let mut camera = MovableCamera::new(16.0 / 9.0);
        camera.follow(Vec3::new(3.0, 0.5, -2.0));
        let ndc = (camera.projection() * camera.view()).project_point3(Vec3::new(3.0, 0.5, -2.0));
        assert!(ndc.x.abs() < 0.001 && ndc.y.abs() < 0.001);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn test_bad_aspect_ignored() {
        let mut camera = MovableCamera::new(2.0);
        camera.set_aspect(0.0);
        camera.set_aspect(f32::NAN);
        assert_eq!(camera.aspect, 2.0);
    }
}
