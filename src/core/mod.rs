pub mod physics;
pub mod store;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    config::WorldConfig,
    error::{ConfigError, Result},
    rules::RuleTable,
    types::{GroupId, Particle, ParticleSnapshot, VecN, WorldStats},
};

pub use store::{GroupEntry, ParticleStore};

/// A particle-life world of dimension `D`.
///
/// Each tick runs the rule table in declared order. A rule application moves
/// every particle of its source group one at a time and writes the result
/// back immediately, so later particles and later rules in the same tick see
/// positions that were already updated.
pub struct World<const D: usize> {
    config: WorldConfig,
    store: ParticleStore<D>,
    rules: RuleTable,
    cutoff_sq: f64,
    ticks: u64,
}

impl<const D: usize> World<D> {
    /// Builds a world with uniformly random positions in `[-H, H]^D`.
    pub fn new(config: &WorldConfig) -> Result<Self> {
        let rules = Self::check(config)?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let h = config.half_extent;
        let positions: Vec<Vec<VecN<D>>> = config
            .groups
            .iter()
            .map(|group| {
                (0..group.count)
                    .map(|_| {
                        let mut pos = VecN::<D>::ZERO;
                        for k in 0..D {
                            pos[k] = rng.gen_range(-h..=h);
                        }
                        pos
                    })
                    .collect()
            })
            .collect();
        Ok(Self::assemble(config, rules, positions))
    }

    /// Builds a world from explicit starting positions, one list per group in
    /// group order. Velocities start at zero.
    pub fn with_layout(config: &WorldConfig, layout: Vec<Vec<[f64; D]>>) -> Result<Self> {
        let rules = Self::check(config)?;
        let h = config.half_extent;
        if layout.len() > config.groups.len() {
            return Err(ConfigError::LayoutMismatch {
                group: format!("#{}", config.groups.len()),
                expected: 0,
                actual: layout[config.groups.len()].len(),
            }
            .into());
        }
        if let Some(group) = config.groups.get(layout.len()) {
            return Err(ConfigError::LayoutMismatch {
                group: group.name.clone(),
                expected: group.count,
                actual: 0,
            }
            .into());
        }
        for (group, positions) in config.groups.iter().zip(&layout) {
            if positions.len() != group.count {
                return Err(ConfigError::LayoutMismatch {
                    group: group.name.clone(),
                    expected: group.count,
                    actual: positions.len(),
                }
                .into());
            }
            if let Some(index) = positions
                .iter()
                .position(|p| p.iter().any(|c| !c.is_finite() || c.abs() > h))
            {
                return Err(ConfigError::LayoutOutOfBounds {
                    group: group.name.clone(),
                    index,
                    half_extent: h,
                }
                .into());
            }
        }
        let positions: Vec<Vec<VecN<D>>> = layout
            .into_iter()
            .map(|group| group.into_iter().map(VecN).collect())
            .collect();
        Ok(Self::assemble(config, rules, positions))
    }

    fn check(config: &WorldConfig) -> Result<RuleTable> {
        let checked = Self::check_dimension()
            .and_then(|()| config.validate())
            .and_then(|()| RuleTable::resolve(&config.groups, &config.rules));
        checked.map_err(|e| {
            log::warn!("rejected world configuration: {e}");
            e.into()
        })
    }

    fn check_dimension() -> std::result::Result<(), ConfigError> {
        if D == 2 || D == 3 {
            Ok(())
        } else {
            Err(ConfigError::UnsupportedDimension(D))
        }
    }

    fn assemble(config: &WorldConfig, rules: RuleTable, positions: Vec<Vec<VecN<D>>>) -> Self {
        let store = ParticleStore::build(&config.groups, positions);
        log::info!(
            "created {}-D world: {} particles in {} groups, {} rules, H={}, R={}, damping={}",
            D,
            store.len(),
            store.groups().len(),
            rules.len(),
            config.half_extent,
            config.cutoff_radius,
            config.damping
        );
        Self {
            cutoff_sq: config.cutoff_radius * config.cutoff_radius,
            config: config.clone(),
            store,
            rules,
            ticks: 0,
        }
    }

    pub fn tick(&mut self) {
        let rules = std::mem::take(&mut self.rules);
        for rule in rules.iter() {
            self.apply_rule(rule.source, rule.target, rule.coefficient);
        }
        self.rules = rules;
        self.ticks += 1;
        log::trace!("tick {} done", self.ticks);
    }

    /// One rule application: every particle of `source` feels `target` with
    /// coefficient `g`, then moves. Unknown groups are a no-op.
    pub fn apply_rule(&mut self, source: GroupId, target: GroupId, g: f64) {
        let ParticleStore { particles, groups } = &mut self.store;
        let (Some(sources), Some(targets)) = (groups.get(source.0), groups.get(target.0)) else {
            log::warn!("skipping rule {source:?}->{target:?}: unknown group");
            return;
        };
        let damping = self.config.damping;
        let half_extent = self.config.half_extent;

        for &i in &sources.members {
            let force = physics::net_force(
                particles[i].pos,
                targets.members.iter().map(|&j| particles[j].pos),
                g,
                self.cutoff_sq,
            );
            let p = &mut particles[i];
            physics::integrate(p, force, damping);
            physics::reflect(p, half_extent);
        }
    }

    /// Fills `out` with every particle's position and color in arena order.
    pub fn snapshot(&self, out: &mut Vec<ParticleSnapshot<D>>) {
        out.clear();
        out.extend(self.store.particles().iter().map(|p| ParticleSnapshot {
            id: p.id,
            pos: p.pos,
            color: self.store.color_of(p),
        }));
    }

    pub fn particles(&self) -> &[Particle<D>] {
        self.store.particles()
    }

    pub fn groups(&self) -> &[GroupEntry] {
        self.store.groups()
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn stats(&self) -> WorldStats {
        let mut stats = WorldStats {
            ticks: self.ticks,
            particle_count: self.store.len(),
            ..WorldStats::default()
        };
        let mut speed_sum = 0.0;
        for p in self.store.particles() {
            let speed = p.vel.length();
            speed_sum += speed;
            stats.max_speed = stats.max_speed.max(speed);
            stats.max_abs_coord = stats.max_abs_coord.max(p.pos.max_abs());
        }
        if !self.store.is_empty() {
            stats.mean_speed = speed_sum / self.store.len() as f64;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{GroupSpec, RuleSpec},
        error::Error,
        types::ColorId,
    };

    const EPS: f64 = 1e-9;

    fn pair_config(rules: Vec<RuleSpec>) -> WorldConfig {
        WorldConfig {
            half_extent: 250.0,
            cutoff_radius: 100.0,
            damping: 0.5,
            groups: vec![
                GroupSpec::new("a", ColorId::Red, 1),
                GroupSpec::new("b", ColorId::Green, 1),
            ],
            rules,
            seed: None,
        }
    }

    mod new {
        use super::*;

        #[test]
        fn preset_population_is_placed_inside_world() -> Result<()> {
            let config = WorldConfig::preset_2d()
                .with_particles_per_group(50)
                .with_seed(3);
            let world = World::<2>::new(&config)?;
            assert_eq!(world.particles().len(), 150);
            for p in world.particles() {
                assert!(p.pos.max_abs() <= 250.0);
                assert_eq!(p.vel, VecN::ZERO);
            }
            Ok(())
        }

        #[test]
        fn same_seed_gives_same_layout() -> Result<()> {
            let config = WorldConfig::preset_3d()
                .with_particles_per_group(20)
                .with_seed(99);
            let a = World::<3>::new(&config)?;
            let b = World::<3>::new(&config)?;
            let pa: Vec<_> = a.particles().iter().map(|p| p.pos).collect();
            let pb: Vec<_> = b.particles().iter().map(|p| p.pos).collect();
            assert_eq!(pa, pb);
            Ok(())
        }

        #[test]
        fn unknown_rule_group_fails_before_construction() {
            let config = pair_config(vec![RuleSpec::new("a", "z", 1.0)]);
            let err = World::<2>::new(&config).err().unwrap();
            assert!(matches!(
                err,
                Error::Config(ConfigError::UnknownGroup(ref name)) if name == "z"
            ));
        }

        #[test]
        fn invalid_scalar_fails() {
            let mut config = pair_config(vec![]);
            config.cutoff_radius = 0.0;
            assert!(World::<3>::new(&config).is_err());
        }

        #[test]
        fn four_dimensions_are_rejected() {
            let config = pair_config(vec![]);
            let err = World::<4>::new(&config).err().unwrap();
            assert!(matches!(
                err,
                Error::Config(ConfigError::UnsupportedDimension(4))
            ));
        }
    }

    mod with_layout {
        use super::*;

        #[test]
        fn wrong_group_size_is_rejected() {
            let config = pair_config(vec![]);
            let err = World::<2>::with_layout(&config, vec![vec![[0.0, 0.0]], vec![]])
                .err()
                .unwrap();
            assert!(matches!(
                err,
                Error::Config(ConfigError::LayoutMismatch { expected: 1, actual: 0, .. })
            ));
        }

        #[test]
        fn missing_group_is_rejected() {
            let config = pair_config(vec![]);
            let err = World::<2>::with_layout(&config, vec![vec![[0.0, 0.0]]])
                .err()
                .unwrap();
            assert!(matches!(
                err,
                Error::Config(ConfigError::LayoutMismatch { .. })
            ));
        }

        #[test]
        fn position_outside_world_is_rejected() {
            let config = pair_config(vec![]);
            let err = World::<2>::with_layout(&config, vec![vec![[0.0, 0.0]], vec![[300.0, 0.0]]])
                .err()
                .unwrap();
            assert!(matches!(
                err,
                Error::Config(ConfigError::LayoutOutOfBounds { index: 0, .. })
            ));
        }
    }

    mod tick {
        use super::*;

        #[test]
        fn two_particle_scenario_matches_hand_computation() -> Result<()> {
            let config = pair_config(vec![RuleSpec::new("a", "b", 1.0)]);
            let mut world = World::<2>::with_layout(&config, vec![vec![[0.0, 0.0]], vec![[10.0, 0.0]]])?;
            world.tick();
            let a = world.particles()[0];
            assert!((a.vel[0] - -0.5).abs() < EPS);
            assert!(a.vel[1].abs() < EPS);
            assert!((a.pos[0] - -0.5).abs() < EPS);
            assert!(a.pos[1].abs() < EPS);
            // b has no rule of its own
            assert_eq!(world.particles()[1].pos.0, [10.0, 0.0]);
            assert_eq!(world.ticks(), 1);
            Ok(())
        }

        #[test]
        fn later_rule_sees_positions_written_by_earlier_rule() -> Result<()> {
            // a moves first (a->b), then b reacts to a's new position (b->a).
            let config = pair_config(vec![
                RuleSpec::new("a", "b", 1.0),
                RuleSpec::new("b", "a", 1.0),
            ]);
            let mut world = World::<2>::with_layout(&config, vec![vec![[0.0, 0.0]], vec![[10.0, 0.0]]])?;
            world.tick();
            // b: d = 10 - (-0.5) = 10.5, F = 1/10.5, force = 1, v = 0.5
            let b = world.particles()[1];
            assert!((b.vel[0] - 0.5).abs() < EPS);
            assert!((b.pos[0] - 10.5).abs() < EPS);
            Ok(())
        }

        #[test]
        fn rule_order_changes_outcome() -> Result<()> {
            // a is pushed away first; b then finds it beyond the cutoff.
            let forward = pair_config(vec![
                RuleSpec::new("a", "b", 3.0),
                RuleSpec::new("b", "a", 2.0),
            ]);
            let mut reversed = forward.clone();
            reversed.rules.reverse();
            let layout = vec![vec![[0.0, 0.0]], vec![[99.9, 0.0]]];
            let mut w1 = World::<2>::with_layout(&forward, layout.clone())?;
            let mut w2 = World::<2>::with_layout(&reversed, layout)?;
            w1.tick();
            w2.tick();
            assert_eq!(w1.particles()[1].pos.0, [99.9, 0.0]);
            assert!((w2.particles()[1].pos[0] - 100.9).abs() < EPS);
            Ok(())
        }

        #[test]
        fn same_group_particles_see_earlier_members_already_moved() -> Result<()> {
            let config = WorldConfig {
                groups: vec![GroupSpec::new("a", ColorId::Red, 2)],
                rules: vec![RuleSpec::new("a", "a", 1.0)],
                ..pair_config(vec![])
            };
            let mut world = World::<2>::with_layout(&config, vec![vec![[0.0, 0.0], [10.0, 0.0]]])?;
            world.tick();
            // first particle: -> (-0.5, 0); second sees distance 10.5
            let second = world.particles()[1];
            assert!((second.pos[0] - 10.5).abs() < EPS);
            Ok(())
        }

        #[test]
        fn apply_rule_with_unknown_group_is_a_no_op() -> Result<()> {
            let config = pair_config(vec![]);
            let mut world = World::<2>::with_layout(&config, vec![vec![[1.0, 1.0]], vec![[2.0, 2.0]]])?;
            world.apply_rule(GroupId(0), GroupId(7), 5.0);
            assert_eq!(world.particles()[0].pos.0, [1.0, 1.0]);
            Ok(())
        }
    }

    mod snapshot {
        use super::*;

        #[test]
        fn reports_every_particle_with_group_color_in_order() -> Result<()> {
            let config = pair_config(vec![]);
            let world = World::<2>::with_layout(&config, vec![vec![[1.0, 2.0]], vec![[3.0, 4.0]]])?;
            let mut out = Vec::new();
            world.snapshot(&mut out);
            assert_eq!(out.len(), 2);
            assert_eq!(out[0].id, 0);
            assert_eq!(out[0].color, ColorId::Red);
            assert_eq!(out[0].pos.0, [1.0, 2.0]);
            assert_eq!(out[1].color, ColorId::Green);
            Ok(())
        }

        #[test]
        fn reuses_output_buffer() -> Result<()> {
            let config = pair_config(vec![]);
            let world = World::<2>::with_layout(&config, vec![vec![[1.0, 2.0]], vec![[3.0, 4.0]]])?;
            let mut out = Vec::new();
            world.snapshot(&mut out);
            world.snapshot(&mut out);
            assert_eq!(out.len(), 2);
            Ok(())
        }
    }

    mod stats {
        use super::*;

        #[test]
        fn reports_speeds_after_tick() -> Result<()> {
            let config = pair_config(vec![RuleSpec::new("a", "b", 1.0)]);
            let mut world = World::<2>::with_layout(&config, vec![vec![[0.0, 0.0]], vec![[10.0, 0.0]]])?;
            world.tick();
            let stats = world.stats();
            assert_eq!(stats.ticks, 1);
            assert_eq!(stats.particle_count, 2);
            assert!((stats.max_speed - 0.5).abs() < EPS);
            assert!((stats.mean_speed - 0.25).abs() < EPS);
            assert_eq!(stats.max_abs_coord, 10.0);
            Ok(())
        }
    }
}
