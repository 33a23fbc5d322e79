//! Particle bursts for gameplay feedback
//!
//! Purely cosmetic. Particles are spawned from `GameEvent`s, advanced once per
//! rendered frame and never read by the simulation.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::sim::{Cell, GameEvent};

/// Per-frame velocity damping
pub const DAMPING: f32 = 0.97;

/// Colors shared by particles and renderers (0xRRGGBB)
pub mod palette {
    pub const TEAL: u32 = 0x5eead4;
    pub const CYAN: u32 = 0x22d3ee;
    pub const VIOLET: u32 = 0xa78bfa;
    pub const ROSE: u32 = 0xfb7185;
    pub const AMBER: u32 = 0xf59e0b;
    pub const OBSTACLE: u32 = 0xef4444;
    pub const SNAKE_HEAD: u32 = 0x34d399;
    pub const SNAKE_BODY: u32 = 0x10b981;

    /// `#rrggbb` for CSS/canvas styles
    pub fn css(color: u32) -> String {
        format!("#{:06x}", color & 0xffffff)
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Pixels
    pub pos: Vec2,
    /// Pixels per frame
    pub vel: Vec2,
    /// Frames remaining
    pub life: f32,
    pub color: u32,
    pub radius: f32,
}

/// Burst shape for one event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Burst {
    pub color: u32,
    pub count: usize,
    pub spread: f32,
}

impl Burst {
    /// Burst matching a gameplay event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Burst> {
        use palette::*;
        let (color, count, spread) = match event {
            GameEvent::SessionStart => return None,
            GameEvent::MoveTick { boosted: true, .. } => (CYAN, 2, 0.6),
            GameEvent::MoveTick { boosted: false, .. } => (TEAL, 2, 0.6),
            GameEvent::Eat { .. } => (AMBER, 14, 2.1),
            GameEvent::Boost { .. } => (CYAN, 18, 2.4),
            GameEvent::ShieldGain { .. } => (VIOLET, 20, 2.6),
            GameEvent::ShieldBreak { .. } => (VIOLET, 16, 2.2),
            GameEvent::Death { .. } => (ROSE, 26, 3.0),
        };
        Some(Burst {
            color,
            count,
            spread,
        })
    }
}

/// Center of a grid cell in pixels
pub fn cell_center(cell: Cell, cell_size: f32) -> Vec2 {
    (cell.as_vec2() + Vec2::splat(0.5)) * cell_size
}

/// Owns every live particle
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    max_particles: usize,
    rng: Pcg32,
}

impl ParticleSystem {
    pub fn new(max_particles: usize) -> Self {
        Self::with_seed(rand::random(), max_particles)
    }

    pub fn with_seed(seed: u64, max_particles: usize) -> Self {
        Self {
            particles: Vec::new(),
            max_particles,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn set_max_particles(&mut self, max: usize) {
        self.max_particles = max;
        self.particles.truncate(max);
    }

    /// Spawn `count` particles flying outward from `pos`.
    ///
    /// Speed is `0.5 + rand * spread` px/frame. Particles beyond the cap are dropped.
    pub fn emit(&mut self, pos: Vec2, color: u32, count: usize, spread: f32) {
        let room = self.max_particles.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let angle = self.rng.random::<f32>() * std::f32::consts::TAU;
            let speed = 0.5 + self.rng.random::<f32>() * spread;
            self.particles.push(Particle {
                pos,
                vel: Vec2::from_angle(angle) * speed,
                life: 24.0 + self.rng.random::<f32>() * 16.0,
                color,
                radius: 1.5 + self.rng.random::<f32>() * 2.5,
            });
        }
    }

    /// Emit the burst for an event at its cell
    pub fn burst_for(&mut self, event: &GameEvent, cell_size: f32) {
        let (Some(burst), Some(cell)) = (Burst::for_event(event), event.cell()) else {
            return;
        };
        self.emit(
            cell_center(cell, cell_size),
            burst.color,
            burst.count,
            burst.spread,
        );
    }

    /// Step every particle by one frame and drop the expired ones
    pub fn advance(&mut self) {
        for particle in self.particles.iter_mut() {
            particle.pos += particle.vel;
            particle.vel *= DAMPING;
            particle.life -= 1.0;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    #[test]
    fn test_emit_ranges() {
        let mut fx = ParticleSystem::with_seed(5, 500);
        fx.emit(Vec2::new(100.0, 100.0), palette::AMBER, 50, 2.0);
        assert_eq!(fx.len(), 50);
        for p in fx.particles() {
            let speed = p.vel.length();
            assert!((0.5 - 1e-4..=2.5 + 1e-4).contains(&speed));
            assert!((24.0..=40.0).contains(&p.life));
            assert!((1.5..=4.0).contains(&p.radius));
            assert_eq!(p.pos, Vec2::new(100.0, 100.0));
        }
    }

    #[test]
    fn test_advance_damps_and_expires() {
        let mut fx = ParticleSystem::with_seed(1, 10);
        fx.emit(Vec2::ZERO, palette::TEAL, 1, 0.0);
        let v0 = fx.particles()[0].vel;
        let life = fx.particles()[0].life;

        fx.advance();
        let p = &fx.particles()[0];
        assert_eq!(p.pos, v0);
        assert!((p.vel - v0 * DAMPING).length() < 1e-6);
        assert_eq!(p.life, life - 1.0);

        for _ in 0..40 {
            fx.advance();
        }
        assert!(fx.is_empty());
    }

    #[test]
    fn test_cap() {
        let mut fx = ParticleSystem::with_seed(2, 20);
        fx.emit(Vec2::ZERO, palette::ROSE, 26, 3.0);
        assert_eq!(fx.len(), 20);
        fx.emit(Vec2::ZERO, palette::ROSE, 5, 3.0);
        assert_eq!(fx.len(), 20);
        fx.set_max_particles(0);
        assert!(fx.is_empty());
    }

    #[test]
    fn test_burst_for_events() {
        let mut fx = ParticleSystem::with_seed(3, 500);
        let at = IVec2::new(2, 3);
        fx.burst_for(&GameEvent::SessionStart, 20.0);
        assert!(fx.is_empty());

        fx.burst_for(&GameEvent::Death { at }, 20.0);
        assert_eq!(fx.len(), 26);
        assert_eq!(fx.particles()[0].pos, Vec2::new(50.0, 70.0));
        assert_eq!(fx.particles()[0].color, palette::ROSE);

        let burst = Burst::for_event(&GameEvent::MoveTick { at, boosted: true }).unwrap();
        assert_eq!(burst.color, palette::CYAN);
        assert_eq!(burst.count, 2);
    }

    #[test]
    fn test_css() {
        assert_eq!(palette::css(palette::AMBER), "#f59e0b");
        assert_eq!(palette::css(0x00000a), "#00000a");
    }
}
