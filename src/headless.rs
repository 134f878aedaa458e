use crate::{config::WorldConfig, core::World, error::Result, types::WorldStats};

/// Runs `ticks` ticks without a terminal UI, printing a stats line every
/// `report_every` ticks (0 disables intermediate reports) and once at the end.
pub fn run<const D: usize>(config: &WorldConfig, ticks: u64, report_every: u64) -> Result<WorldStats> {
    let mut world = World::<D>::new(config)?;
    log::info!("headless run: {ticks} ticks");
    for _ in 0..ticks {
        world.tick();
        let stats = world.stats();
        if report_every > 0 && stats.ticks % report_every == 0 && stats.ticks < ticks {
            println!("{}", format_stats(&stats));
        }
    }
    let stats = world.stats();
    println!("{}", format_stats(&stats));
    Ok(stats)
}

pub fn format_stats(stats: &WorldStats) -> String {
    format!(
        "tick={} particles={} mean_speed={:.6} max_speed={:.6} max_abs_coord={:.3}",
        stats.ticks, stats.particle_count, stats.mean_speed, stats.max_speed, stats.max_abs_coord
    )
}
