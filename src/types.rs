use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Sub, SubAssign};
use std::str::FromStr;

/// Fixed-dimension vector used for positions, velocities and forces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VecN<const D: usize>(pub [f64; D]);

impl<const D: usize> Default for VecN<D> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const D: usize> VecN<D> {
    pub const ZERO: VecN<D> = VecN([0.0; D]);

    pub fn new(components: [f64; D]) -> Self {
        Self(components)
    }

    pub fn length_sq(self) -> f64 {
        self.0.iter().map(|c| c * c).sum()
    }

    pub fn length(self) -> f64 {
        self.length_sq().sqrt()
    }

    pub fn max_abs(self) -> f64 {
        self.0.iter().fold(0.0_f64, |acc, c| acc.max(c.abs()))
    }
}

impl<const D: usize> From<[f64; D]> for VecN<D> {
    fn from(components: [f64; D]) -> Self {
        Self(components)
    }
}

impl<const D: usize> Index<usize> for VecN<D> {
    type Output = f64;

    fn index(&self, axis: usize) -> &f64 {
        &self.0[axis]
    }
}

impl<const D: usize> IndexMut<usize> for VecN<D> {
    fn index_mut(&mut self, axis: usize) -> &mut f64 {
        &mut self.0[axis]
    }
}

impl<const D: usize> Add for VecN<D> {
    type Output = VecN<D>;

    fn add(mut self, rhs: VecN<D>) -> VecN<D> {
        self += rhs;
        self
    }
}

impl<const D: usize> AddAssign for VecN<D> {
    fn add_assign(&mut self, rhs: VecN<D>) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a += b;
        }
    }
}

impl<const D: usize> Sub for VecN<D> {
    type Output = VecN<D>;

    fn sub(mut self, rhs: VecN<D>) -> VecN<D> {
        self -= rhs;
        self
    }
}

impl<const D: usize> SubAssign for VecN<D> {
    fn sub_assign(&mut self, rhs: VecN<D>) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a -= b;
        }
    }
}

impl<const D: usize> Mul<f64> for VecN<D> {
    type Output = VecN<D>;

    fn mul(mut self, rhs: f64) -> VecN<D> {
        for c in &mut self.0 {
            *c *= rhs;
        }
        self
    }
}

impl<const D: usize> Mul<VecN<D>> for f64 {
    type Output = VecN<D>;

    fn mul(self, rhs: VecN<D>) -> VecN<D> {
        rhs * self
    }
}

pub type Vec2 = VecN<2>;
pub type Vec3 = VecN<3>;

/// Index of a group in the world's group table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub usize);

/// Stable particle index into the world arena.
pub type ParticleId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorId {
    White,
    Red,
    Yellow,
    Green,
    Blue,
    Cyan,
    Magenta,
}

impl ColorId {
    pub fn name(self) -> &'static str {
        match self {
            ColorId::White => "white",
            ColorId::Red => "red",
            ColorId::Yellow => "yellow",
            ColorId::Green => "green",
            ColorId::Blue => "blue",
            ColorId::Cyan => "cyan",
            ColorId::Magenta => "magenta",
        }
    }
}

impl FromStr for ColorId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" => Ok(ColorId::White),
            "red" => Ok(ColorId::Red),
            "yellow" => Ok(ColorId::Yellow),
            "green" => Ok(ColorId::Green),
            "blue" => Ok(ColorId::Blue),
            "cyan" => Ok(ColorId::Cyan),
            "magenta" => Ok(ColorId::Magenta),
            other => Err(format!("unknown color '{other}'")),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Particle<const D: usize> {
    pub id: ParticleId,
    pub pos: VecN<D>,
    pub vel: VecN<D>,
    pub group: GroupId,
}

/// What the presentation layer copies out of the world each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSnapshot<const D: usize> {
    pub id: ParticleId,
    pub pos: VecN<D>,
    pub color: ColorId,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldStats {
    pub ticks: u64,
    pub particle_count: usize,
    pub mean_speed: f64,
    pub max_speed: f64,
    /// Largest |coordinate| over all particles; never exceeds the half-extent.
    pub max_abs_coord: f64,
}
