use std::collections::HashSet;

use crate::error::ConfigError;
use crate::types::ColorId;

pub const TICK_HZ: f32 = 60.0;
pub const RENDER_HZ: f32 = 30.0;
pub const TICK_INTERVAL: f32 = 1.0 / TICK_HZ;
/// Upper bound on catch-up ticks per frame when the viewer falls behind.
pub const MAX_TICKS_PER_FRAME: u32 = 4;

pub const WORLD_SIZE: f64 = 500.0;
pub const HALF_EXTENT: f64 = WORLD_SIZE / 2.0;

pub const PARTICLES_PER_GROUP: usize = 1000;

pub const CUTOFF_RADIUS_2D: f64 = 80.0;
pub const CUTOFF_RADIUS_3D: f64 = 100.0;

pub const DAMPING: f64 = 0.5;

/// Pairs at or below this squared distance exert no force.
pub const NEAR_FIELD_CUTOFF_SQ: f64 = 0.001;

pub const GROUPS: [(&str, ColorId); 3] = [
    ("red", ColorId::Red),
    ("yellow", ColorId::Yellow),
    ("green", ColorId::Green),
];

/// Applied in this order every tick.
pub const RULES: [(&str, &str, f64); 6] = [
    ("red", "red", 0.1),
    ("yellow", "red", 0.15),
    ("green", "green", -0.7),
    ("green", "red", -0.2),
    ("red", "green", -0.1),
    ("yellow", "yellow", 0.1),
];

pub const ZOOM_STEP: f32 = 1.25;
pub const PAN_STEP: f64 = 20.0;
pub const YAW_STEP: f64 = 0.1;

#[derive(Clone, Debug, PartialEq)]
pub struct GroupSpec {
    pub name: String,
    pub color: ColorId,
    pub count: usize,
}

impl GroupSpec {
    pub fn new(name: impl Into<String>, color: ColorId, count: usize) -> Self {
        Self {
            name: name.into(),
            color,
            count,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RuleSpec {
    pub source: String,
    pub target: String,
    pub coefficient: f64,
}

impl RuleSpec {
    pub fn new(source: impl Into<String>, target: impl Into<String>, coefficient: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            coefficient,
        }
    }
}

/// Everything needed to build a world. Dimension is chosen by the caller's
/// `World<D>` type; the cutoff radius is the only per-variant tuned value.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    pub half_extent: f64,
    pub cutoff_radius: f64,
    pub damping: f64,
    pub groups: Vec<GroupSpec>,
    pub rules: Vec<RuleSpec>,
    pub seed: Option<u64>,
}

impl WorldConfig {
    pub fn preset_2d() -> Self {
        Self::preset(CUTOFF_RADIUS_2D)
    }

    pub fn preset_3d() -> Self {
        Self::preset(CUTOFF_RADIUS_3D)
    }

    /// Preset for the given dimension; only 2 and 3 are known.
    pub fn preset_for(dim: usize) -> Result<Self, ConfigError> {
        match dim {
            2 => Ok(Self::preset_2d()),
            3 => Ok(Self::preset_3d()),
            other => Err(ConfigError::UnsupportedDimension(other)),
        }
    }

    fn preset(cutoff_radius: f64) -> Self {
        Self {
            half_extent: HALF_EXTENT,
            cutoff_radius,
            damping: DAMPING,
            groups: GROUPS
                .iter()
                .map(|&(name, color)| GroupSpec::new(name, color, PARTICLES_PER_GROUP))
                .collect(),
            rules: RULES
                .iter()
                .map(|&(source, target, g)| RuleSpec::new(source, target, g))
                .collect(),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_particles_per_group(mut self, count: usize) -> Self {
        for group in &mut self.groups {
            group.count = count;
        }
        self
    }

    pub fn total_particles(&self) -> usize {
        self.groups.iter().map(|g| g.count).sum()
    }

    /// Checks the scalar parameters and group table. Rule entries are checked
    /// when the rule table resolves them against the groups.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.half_extent.is_finite() || self.half_extent <= 0.0 {
            return Err(ConfigError::NonPositiveHalfExtent(self.half_extent));
        }
        if !self.cutoff_radius.is_finite() || self.cutoff_radius <= 0.0 {
            return Err(ConfigError::NonPositiveRadius(self.cutoff_radius));
        }
        if !self.damping.is_finite() || self.damping <= 0.0 || self.damping > 1.0 {
            return Err(ConfigError::DampingOutOfRange(self.damping));
        }
        if self.groups.is_empty() {
            return Err(ConfigError::NoGroups);
        }
        let mut seen = HashSet::new();
        for group in &self.groups {
            if group.count == 0 {
                return Err(ConfigError::EmptyGroup(group.name.clone()));
            }
            if !seen.insert(group.name.as_str()) {
                return Err(ConfigError::DuplicateGroup(group.name.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod presets {
        use super::*;

        #[test]
        fn variants_differ_only_in_cutoff_radius() {
            let two = WorldConfig::preset_2d();
            let three = WorldConfig::preset_3d();
            assert_eq!(two.cutoff_radius, 80.0);
            assert_eq!(three.cutoff_radius, 100.0);
            assert_eq!(two.groups, three.groups);
            assert_eq!(two.rules, three.rules);
            assert_eq!(two.half_extent, 250.0);
            assert_eq!(two.damping, 0.5);
        }

        #[test]
        fn preset_has_three_groups_of_one_thousand() {
            let config = WorldConfig::preset_2d();
            assert_eq!(config.groups.len(), 3);
            assert_eq!(config.total_particles(), 3000);
        }

        #[test]
        fn preset_rule_order_is_preserved() {
            let config = WorldConfig::preset_3d();
            let order: Vec<(&str, &str)> = config
                .rules
                .iter()
                .map(|r| (r.source.as_str(), r.target.as_str()))
                .collect();
            assert_eq!(
                order,
                vec![
                    ("red", "red"),
                    ("yellow", "red"),
                    ("green", "green"),
                    ("green", "red"),
                    ("red", "green"),
                    ("yellow", "yellow"),
                ]
            );
        }

        #[test]
        fn preset_for_rejects_other_dimensions() {
            assert!(WorldConfig::preset_for(2).is_ok());
            assert_eq!(
                WorldConfig::preset_for(4),
                Err(ConfigError::UnsupportedDimension(4))
            );
        }
    }

    mod validate {
        use super::*;

        #[test]
        fn preset_is_valid() {
            assert_eq!(WorldConfig::preset_2d().validate(), Ok(()));
        }

        #[test]
        fn rejects_non_positive_half_extent() {
            let mut config = WorldConfig::preset_2d();
            config.half_extent = 0.0;
            assert_eq!(
                config.validate(),
                Err(ConfigError::NonPositiveHalfExtent(0.0))
            );
        }

        #[test]
        fn rejects_non_positive_radius() {
            let mut config = WorldConfig::preset_3d();
            config.cutoff_radius = -5.0;
            assert_eq!(config.validate(), Err(ConfigError::NonPositiveRadius(-5.0)));
        }

        #[test]
        fn rejects_nan_radius() {
            let mut config = WorldConfig::preset_3d();
            config.cutoff_radius = f64::NAN;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::NonPositiveRadius(_))
            ));
        }

        #[test]
        fn damping_of_one_is_allowed_but_zero_is_not() {
            let mut config = WorldConfig::preset_2d();
            config.damping = 1.0;
            assert_eq!(config.validate(), Ok(()));
            config.damping = 0.0;
            assert_eq!(config.validate(), Err(ConfigError::DampingOutOfRange(0.0)));
        }

        #[test]
        fn rejects_zero_particle_count() {
            let config = WorldConfig::preset_2d().with_particles_per_group(0);
            assert_eq!(
                config.validate(),
                Err(ConfigError::EmptyGroup("red".to_string()))
            );
        }

        #[test]
        fn rejects_empty_group_table() {
            let mut config = WorldConfig::preset_2d();
            config.groups.clear();
            assert_eq!(config.validate(), Err(ConfigError::NoGroups));
        }

        #[test]
        fn rejects_duplicate_group_names() {
            let mut config = WorldConfig::preset_2d();
            config.groups.push(GroupSpec::new("red", ColorId::Blue, 10));
            assert_eq!(
                config.validate(),
                Err(ConfigError::DuplicateGroup("red".to_string()))
            );
        }
    }
}
