use std::{error::Error, io};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use particle_life::{config::RuleSpec, headless, ui, WorldConfig};

/// Particle life: emergent motion from group attraction/repulsion rules
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// World dimension (2 or 3)
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(2..=3))]
    dim: u8,
    /// Particles in every group
    #[arg(long)]
    per_group: Option<usize>,
    /// Interaction cutoff radius (preset: 80 in 2-D, 100 in 3-D)
    #[arg(long)]
    radius: Option<f64>,
    /// Velocity damping factor in (0, 1]
    #[arg(long)]
    damping: Option<f64>,
    /// Half the world edge length
    #[arg(long)]
    half_extent: Option<f64>,
    /// Seed for the initial layout
    #[arg(long)]
    seed: Option<u64>,
    /// Replace the rule list; SOURCE:TARGET:COEFFICIENT, applied in the order given
    #[arg(long = "rule", value_name = "SOURCE:TARGET:G", value_parser = parse_rule)]
    rules: Vec<RuleSpec>,
    /// Run without the terminal viewer
    #[arg(long, default_value_t = false)]
    headless: bool,
    /// Ticks to run in headless mode
    #[arg(long, default_value_t = 1000)]
    ticks: u64,
    /// Print stats every N ticks in headless mode (0 = only at the end)
    #[arg(long, default_value_t = 0)]
    report_every: u64,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completion scripts
    Completions {
        /// The shell to generate the script for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Args {
    fn world_config(&self) -> Result<WorldConfig, Box<dyn Error>> {
        let mut config = WorldConfig::preset_for(self.dim as usize)?;
        if let Some(count) = self.per_group {
            config = config.with_particles_per_group(count);
        }
        if let Some(radius) = self.radius {
            config.cutoff_radius = radius;
        }
        if let Some(damping) = self.damping {
            config.damping = damping;
        }
        if let Some(half_extent) = self.half_extent {
            config.half_extent = half_extent;
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if !self.rules.is_empty() {
            config.rules = self.rules.clone();
        }
        Ok(config)
    }
}

fn parse_rule(s: &str) -> Result<RuleSpec, String> {
    let parts: Vec<&str> = s.split(':').map(str::trim).collect();
    let [source, target, g] = parts.as_slice() else {
        return Err(format!("expected SOURCE:TARGET:G, got '{s}'"));
    };
    let coefficient: f64 = g
        .parse()
        .map_err(|e| format!("bad coefficient '{g}': {e}"))?;
    Ok(RuleSpec::new(*source, *target, coefficient))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    if let Some(Commands::Completions { shell }) = args.command {
        let mut cmd = Args::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let config = args.world_config()?;
    match (args.dim, args.headless) {
        (3, true) => {
            headless::run::<3>(&config, args.ticks, args.report_every)?;
        }
        (_, true) => {
            headless::run::<2>(&config, args.ticks, args.report_every)?;
        }
        (3, false) => ui::run::<3>(config)?,
        (_, false) => ui::run::<2>(config)?,
    }
    Ok(())
}
