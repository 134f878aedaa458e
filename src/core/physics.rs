//! Force kernel, damped integrator and wall reflection.
//!
//! All three act on one particle at a time so the caller can write each
//! result back before the next particle is evaluated.

use crate::{
    config,
    types::{Particle, VecN},
};

/// Net force on a particle at `pos` from every position in `targets`.
///
/// With `d = pos - other` and `s = |d|^2`, each pair inside
/// `NEAR_FIELD_CUTOFF_SQ < s < cutoff_sq` adds `d * g / sqrt(s)`. The lower
/// bound drops the self pair and exact overlaps.
pub fn net_force<const D: usize, I>(pos: VecN<D>, targets: I, g: f64, cutoff_sq: f64) -> VecN<D>
where
    I: IntoIterator<Item = VecN<D>>,
{
    let mut force = VecN::ZERO;
    for other in targets {
        let d = pos - other;
        let s = d.length_sq();
        if s > config::NEAR_FIELD_CUTOFF_SQ && s < cutoff_sq {
            let f = g / s.sqrt();
            force += d * f;
        }
    }
    force
}

/// `v' = (v + force) * damping`, then `pos' = pos + v'`.
pub fn integrate<const D: usize>(particle: &mut Particle<D>, force: VecN<D>, damping: f64) {
    particle.vel = (particle.vel + force) * damping;
    particle.pos += particle.vel;
}

/// Any axis at or past a wall has its velocity flipped and its position
/// clamped back to the wall.
pub fn reflect<const D: usize>(particle: &mut Particle<D>, half_extent: f64) {
    for k in 0..D {
        let x = particle.pos[k];
        if x <= -half_extent || x >= half_extent {
            particle.vel[k] = -particle.vel[k];
            particle.pos[k] = x.clamp(-half_extent, half_extent);
        }
    }
}
