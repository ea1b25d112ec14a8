//! Landing dust: a small bounded pool of leaf-green squares

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

use crate::anim::Rgb;
use crate::consts::MAX_PARTICLES;

/// Downward pull applied to particles each frame
const PARTICLE_GRAVITY: f32 = 0.25;
/// Velocity retained per frame
const PARTICLE_DRAG: f32 = 0.98;
/// Life lost per frame
const LIFE_DECAY: f32 = 0.02;

/// Leaf palette as (color, alpha)
const GREENS: [(Rgb, f32); 8] = [
    (Rgb::new(0x2c, 0x65, 0x2e), 1.0),
    (Rgb::new(0x21, 0x52, 0x23), 1.0),
    (Rgb::new(0x66, 0xbb, 0x6a), 0.34),
    (Rgb::new(0x00, 0x52, 0x04), 1.0),
    (Rgb::new(0x2e, 0x7d, 0x32), 0.36),
    (Rgb::new(0x1b, 0x5e, 0x1f), 0.28),
    (Rgb::new(0x81, 0xc7, 0x84), 0.27),
    (Rgb::new(0x00, 0x22, 0x01), 1.0),
];

#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub color: Rgb,
    pub color_alpha: f32,
}

impl Particle {
    /// Fade factor, also used to shrink the particle
    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    pub fn current_size(&self) -> f32 {
        self.size * self.alpha()
    }
}

/// Fixed-capacity particle pool. Requests beyond capacity are silently capped.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    capacity: usize,
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new(MAX_PARTICLES)
    }
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Spray up to `count` particles upward from `pos`. Returns how many spawned.
    pub fn burst<R: Rng>(&mut self, pos: Vec2, count: usize, rng: &mut R) -> usize {
        let free = self.capacity.saturating_sub(self.particles.len());
        let n = count.min(free);

        for _ in 0..n {
            let angle = -PI / 2.0 + (rng.random::<f32>() - 0.5) * PI;
            let speed = rng.random_range(2.0..6.0);
            let (color, color_alpha) = GREENS[rng.random_range(0..GREENS.len())];
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                rotation: rng.random::<f32>() * TAU,
                rotation_speed: (rng.random::<f32>() - 0.5) * 0.3,
                life: 1.0,
                max_life: rng.random_range(1.0..1.5),
                size: rng.random_range(6.0..24.0),
                color,
                color_alpha,
            });
        }
        n
    }

    /// Integrate one frame and drop dead particles
    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.vel.y += PARTICLE_GRAVITY;
            p.rotation += p.rotation_speed;
            p.vel *= PARTICLE_DRAG;
            p.life -= LIFE_DECAY;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
