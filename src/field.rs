use iced::Point;
use rand::Rng;

use crate::config::Parameters;
use crate::error::{Error, Result};

/// Velocity components are drawn from `[-MAX_INITIAL_SPEED, MAX_INITIAL_SPEED)`.
const MAX_INITIAL_SPEED: f32 = 0.2;
const MIN_RADIUS: f32 = 0.5;
const MAX_RADIUS: f32 = 2.0;
const MIN_ALPHA: f32 = 0.1;
const MAX_ALPHA: f32 = 0.5;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub base_alpha: f32,
}

impl Particle {
    fn random<R: Rng + ?Sized>(width: f32, height: f32, rng: &mut R) -> Self {
        Particle {
            x: rng.gen::<f32>() * width,
            y: rng.gen::<f32>() * height,
            vx: (rng.gen::<f32>() - 0.5) * 2.0 * MAX_INITIAL_SPEED,
            vy: (rng.gen::<f32>() - 0.5) * 2.0 * MAX_INITIAL_SPEED,
            radius: MIN_RADIUS + rng.gen::<f32>() * (MAX_RADIUS - MIN_RADIUS),
            base_alpha: MIN_ALPHA + rng.gen::<f32>() * (MAX_ALPHA - MIN_ALPHA),
        }
    }

    /// One unit time step: integrate, wrap to the far edge, pull toward the
    /// pointer when inside the attraction radius, then damp.
    fn step(&mut self, width: f32, height: f32, pointer: Point, parameters: &Parameters) {
        self.x += self.vx;
        self.y += self.vy;

        if self.x < 0.0 {
            self.x = width;
        }
        if self.x > width {
            self.x = 0.0;
        }
        if self.y < 0.0 {
            self.y = height;
        }
        if self.y > height {
            self.y = 0.0;
        }

        let dx = pointer.x - self.x;
        let dy = pointer.y - self.y;
        let dist = (dx * dx + dy * dy).sqrt();
        // hard cutoff, no force at or beyond the radius
        if dist < parameters.attraction_radius {
            self.vx += dx * parameters.attraction_gain;
            self.vy += dy * parameters.attraction_gain;
        }

        self.vx *= parameters.damping;
        self.vy *= parameters.damping;
    }
}

/// Fixed-size particle population. The count never changes after creation.
#[derive(Clone, Debug)]
pub struct Field {
    particles: Vec<Particle>,
}

impl Field {
    pub fn new<R: Rng + ?Sized>(count: i32, width: f32, height: f32, rng: &mut R) -> Result<Self> {
        if count <= 0 {
            return Err(Error::InvalidParticleCount(count));
        }

        let particles = (0..count)
            .map(|_| Particle::random(width, height, rng))
            .collect();

        Ok(Field { particles })
    }

    #[cfg(test)]
    pub(crate) fn from_particles(particles: Vec<Particle>) -> Self {
        assert!(!particles.is_empty());
        Field { particles }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn advance(&mut self, width: f32, height: f32, pointer: Point, parameters: &Parameters) {
        for particle in self.particles.iter_mut() {
            particle.step(width, height, pointer, parameters);
        }
    }
}
