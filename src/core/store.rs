use crate::{
    config::GroupSpec,
    types::{ColorId, GroupId, Particle, ParticleId, VecN},
};

#[derive(Clone, Debug)]
pub struct GroupEntry {
    pub name: String,
    pub color: ColorId,
    pub members: Vec<ParticleId>,
}

/// Particle arena plus one index list per group. Both are fixed at
/// construction; groups occupy contiguous runs of the arena in group order.
#[derive(Clone, Debug)]
pub struct ParticleStore<const D: usize> {
    pub(crate) particles: Vec<Particle<D>>,
    pub(crate) groups: Vec<GroupEntry>,
}

impl<const D: usize> ParticleStore<D> {
    /// `positions[g]` holds the starting positions of group `g`. Callers
    /// guarantee the outer length matches `specs`.
    pub fn build(specs: &[GroupSpec], positions: Vec<Vec<VecN<D>>>) -> Self {
        debug_assert_eq!(specs.len(), positions.len());
        let total = positions.iter().map(Vec::len).sum();
        let mut particles = Vec::with_capacity(total);
        let mut groups = Vec::with_capacity(specs.len());

        for (g, (spec, group_positions)) in specs.iter().zip(positions).enumerate() {
            let mut members = Vec::with_capacity(group_positions.len());
            for pos in group_positions {
                let id = particles.len();
                particles.push(Particle {
                    id,
                    pos,
                    vel: VecN::ZERO,
                    group: GroupId(g),
                });
                members.push(id);
            }
            groups.push(GroupEntry {
                name: spec.name.clone(),
                color: spec.color,
                members,
            });
        }

        Self { particles, groups }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle<D>] {
        &self.particles
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle<D>> {
        self.particles.get(id)
    }

    pub fn groups(&self) -> &[GroupEntry] {
        &self.groups
    }

    pub fn group(&self, id: GroupId) -> Option<&GroupEntry> {
        self.groups.get(id.0)
    }

    pub fn members(&self, id: GroupId) -> &[ParticleId] {
        self.group(id).map(|g| g.members.as_slice()).unwrap_or(&[])
    }

    pub fn color_of(&self, particle: &Particle<D>) -> ColorId {
        self.groups
            .get(particle.group.0)
            .map(|g| g.color)
            .unwrap_or(ColorId::White)
    }
}
