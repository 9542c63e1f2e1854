//! Play-info overlay
//!
//! A flat screen-space board drawn on top of the lit geometry: a survival
//! timer bar, one pip per live projectile and a red tint with a ring once
//! the player has been hit. It never takes part in the depth pass.

use glam::Vec2;

use crate::renderer::shapes;
use crate::renderer::vertex::{OverlayVertex, colors};
use crate::sim::{DrawItem, GameObject, Lifecycle};

/// Seconds of survival that fill the timer bar
pub const SURVIVAL_GOAL: f32 = 60.0;
/// Pips beyond this are summarized by one overflow pip
const MAX_PIPS: usize = 24;

const PANEL_MIN: Vec2 = Vec2::new(-0.96, 0.78);
const PANEL_MAX: Vec2 = Vec2::new(-0.30, 0.96);
const BAR_INSET: f32 = 0.02;
const BAR_HEIGHT: f32 = 0.05;
const PIP_RADIUS: f32 = 0.018;
const PIP_SEGMENTS: u32 = 10;

#[derive(Debug)]
pub struct UiBoard {
    lifecycle: Lifecycle,
    survived: f32,
    live_projectiles: usize,
    game_over: bool,
    /// Width / height of the render target
    aspect: f32,
}

impl Default for UiBoard {
    fn default() -> Self {
        Self {
            lifecycle: Lifecycle::Uninitialized,
            survived: 0.0,
            live_projectiles: 0,
            game_over: false,
            aspect: 1.0,
        }
    }
}

impl UiBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initialize(&mut self, aspect: f32) {
        self.lifecycle.initialize(self.kind());
        self.set_aspect(aspect);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect > 0.0 && aspect.is_finite() {
            self.aspect = aspect;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Latest scene status, pushed by the scene after each update
    pub fn set_status(&mut self, live_projectiles: usize, game_over: bool) {
        self.lifecycle.expect_live(self.kind());
        self.live_projectiles = live_projectiles;
        self.game_over = game_over;
    }

    pub fn survived(&self) -> f32 {
        self.survived
    }

    /// Timer bar fill fraction
    pub fn progress(&self) -> f32 {
        (self.survived / SURVIVAL_GOAL).clamp(0.0, 1.0)
    }

    /// Triangle list for the overlay pipeline
    pub fn overlay_vertices(&self) -> Vec<OverlayVertex> {
        self.lifecycle.expect_live(self.kind());
        let mut vertices = shapes::quad(PANEL_MIN, PANEL_MAX, colors::PANEL);

        // Timer bar
        let bar_min = Vec2::new(PANEL_MIN.x + BAR_INSET, PANEL_MAX.y - BAR_INSET - BAR_HEIGHT);
        let bar_width = PANEL_MAX.x - PANEL_MIN.x - 2.0 * BAR_INSET;
        let progress = self.progress();
        if progress > 0.0 {
            let bar_max = Vec2::new(bar_min.x + bar_width * progress, bar_min.y + BAR_HEIGHT);
            let color = if progress >= 1.0 {
                colors::TIMER_FULL
            } else {
                colors::TIMER_FILL
            };
            vertices.extend(shapes::quad(bar_min, bar_max, color));
        }

        // Live projectile pips
        let x_scale = 1.0 / self.aspect;
        let pip_step = bar_width / MAX_PIPS as f32;
        let pip_y = bar_min.y - BAR_INSET - PIP_RADIUS * 2.0;
        let shown = self.live_projectiles.min(MAX_PIPS);
        for i in 0..shown {
            let color = if i + 1 == MAX_PIPS && self.live_projectiles > MAX_PIPS {
                colors::PIP_OVERFLOW
            } else {
                colors::PIP
            };
            let center = Vec2::new(bar_min.x + pip_step * (i as f32 + 0.5), pip_y);
            vertices.extend(shapes::circle(center, PIP_RADIUS, x_scale, color, PIP_SEGMENTS));
        }

        if self.game_over {
            vertices.extend(shapes::quad(Vec2::splat(-1.0), Vec2::splat(1.0), colors::GAME_OVER_TINT));
            vertices.extend(shapes::ring(Vec2::ZERO, 0.30, 0.36, x_scale, colors::GAME_OVER_RING, 48));
        }

        vertices
    }
}

impl GameObject for UiBoard {
    fn kind(&self) -> &'static str {
        "ui board"
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Counts survival time until the game ends
    fn tick(&mut self, delta_seconds: f32) {
        self.lifecycle.expect_live(self.kind());
        if !self.game_over {
            self.survived += delta_seconds;
        }
    }

    /// Drawn through the overlay, never as a mesh
    fn draw(&self) -> Option<DrawItem> {
        self.lifecycle.expect_live(self.kind());
        None
    }

    fn release(&mut self) {
        self.lifecycle.release(self.kind());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_board() -> UiBoard {
        let mut board = UiBoard::new();
        board.initialize(16.0 / 9.0);
        board
    }

    #[test]
    fn test_timer_stops_at_game_over() {
        let mut board = live_board();
        board.tick(2.0);
        board.set_status(0, true);
        board.tick(2.0);
        assert!((board.survived() - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_pips_capped() {
        let mut board = live_board();
        board.set_status(3, false);
        let few = board.overlay_vertices().len();
        board.set_status(1000, false);
        let many = board.overlay_vertices().len();
        let per_pip = (PIP_SEGMENTS * 3) as usize;
        assert_eq!(many - few, (MAX_PIPS - 3) * per_pip);
    }

    #[test]
    fn test_game_over_adds_tint() {
        let mut board = live_board();
        let before = board.overlay_vertices().len();
        board.set_status(0, true);
        assert!(board.overlay_vertices().len() > before);
        assert!(board.draw().is_none());
    }

    #[test]
    #[should_panic(expected = "not initialized")]
    fn test_overlay_requires_initialize() {
        UiBoard::new().overlay_vertices();
    }

    #[test]
    #[should_panic(expected = "already initialized")]
    fn test_double_initialize_panics() {
        let mut board = live_board();
        board.initialize(1.0);
    }

    #[test]
    #[should_panic(expected = "has already been released")]
    fn test_tick_after_release_panics() {
        let mut board = live_board();
        board.release();
        board.tick(0.1);
    }
}
