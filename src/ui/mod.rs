use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event as CrosstermEvent, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use crate::{
    config::{self, WorldConfig},
    core::World,
    error::Result,
    render,
    types::{ColorId, ParticleSnapshot},
};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

/// Runs the interactive viewer until the user quits. The world is built
/// before the terminal is touched so configuration errors print normally.
pub fn run<const D: usize>(config: WorldConfig) -> Result<()> {
    let world = World::<D>::new(&config)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, world);
    shutdown_terminal(&mut terminal)?;
    result
}

fn event_loop<const D: usize>(terminal: &mut Term, mut world: World<D>) -> Result<()> {
    let mut snapshot: Vec<ParticleSnapshot<D>> =
        Vec::with_capacity(world.config().total_particles());
    let mut ui_state = UiState::new();
    let legend = legend_line(&world);

    let tick_interval = Duration::from_secs_f32(config::TICK_INTERVAL);
    let render_interval = Duration::from_secs_f32(1.0 / config::RENDER_HZ);
    let mut accumulator = Duration::ZERO;
    let mut last_tick = Instant::now();
    let mut last_render = Instant::now();
    let mut tick_counter = 0_u32;
    let mut render_counter = 0_u32;
    let mut last_fps_sample = Instant::now();
    let mut tick_rate = 0.0_f32;
    let mut render_fps = 0.0_f32;

    loop {
        let now = Instant::now();
        accumulator += now - last_tick;
        last_tick = now;

        let mut ticks_this_frame = 0;
        while accumulator >= tick_interval {
            accumulator -= tick_interval;
            if ui_state.paused || ticks_this_frame >= config::MAX_TICKS_PER_FRAME {
                continue;
            }
            world.tick();
            ticks_this_frame += 1;
            tick_counter += 1;
        }

        while event::poll(Duration::from_millis(0))? {
            let CrosstermEvent::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char(' ') => ui_state.paused = !ui_state.paused,
                KeyCode::Char('n') if ui_state.paused => {
                    world.tick();
                    tick_counter += 1;
                }
                KeyCode::Char('r') => {
                    world = World::<D>::new(world.config())?;
                    log::info!("world rebuilt");
                }
                KeyCode::Char('+') | KeyCode::Char('=') => {
                    ui_state.camera.zoom *= config::ZOOM_STEP;
                }
                KeyCode::Char('-') => {
                    ui_state.camera.zoom = (ui_state.camera.zoom / config::ZOOM_STEP).max(0.1);
                }
                KeyCode::Left if D >= 3 => ui_state.camera.yaw -= config::YAW_STEP,
                KeyCode::Right if D >= 3 => ui_state.camera.yaw += config::YAW_STEP,
                KeyCode::Left => ui_state.camera.center[0] -= config::PAN_STEP,
                KeyCode::Right => ui_state.camera.center[0] += config::PAN_STEP,
                KeyCode::Up => ui_state.camera.center[1] += config::PAN_STEP,
                KeyCode::Down => ui_state.camera.center[1] -= config::PAN_STEP,
                _ => {}
            }
        }

        if last_render.elapsed() >= render_interval {
            world.snapshot(&mut snapshot);
            let stats = world.stats();
            if last_fps_sample.elapsed() >= Duration::from_secs(1) {
                let secs = last_fps_sample.elapsed().as_secs_f32();
                tick_rate = tick_counter as f32 / secs;
                render_fps = render_counter as f32 / secs;
                tick_counter = 0;
                render_counter = 0;
                last_fps_sample = Instant::now();
            }
            let half_extent = world.config().half_extent;
            terminal.draw(|frame| {
                let size = frame.size();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(3),
                        Constraint::Length(3),
                    ])
                    .split(size);

                let header = Paragraph::new(format!(
                    "tick: {} | particles: {} | mean speed: {:.3} | max speed: {:.3} | ticks/s: {:.1} | render fps: {:.1}{}",
                    stats.ticks,
                    stats.particle_count,
                    stats.mean_speed,
                    stats.max_speed,
                    tick_rate,
                    render_fps,
                    if ui_state.paused { " | PAUSED" } else { "" }
                ))
                .block(Block::default().borders(Borders::ALL).title(format!("particle-life {D}-D")));
                frame.render_widget(header, chunks[0]);

                // borders take one cell on each side
                let inner_w = chunks[1].width.saturating_sub(2);
                let inner_h = chunks[1].height.saturating_sub(2);
                render::draw(
                    &snapshot,
                    &ui_state.camera,
                    half_extent,
                    render::Viewport {
                        width: inner_w,
                        height: inner_h,
                    },
                    &mut ui_state.framebuf,
                );

                let framebuf = &ui_state.framebuf;
                let lines: Vec<Line> = (0..framebuf.height())
                    .map(|y| {
                        let spans: Vec<Span> = (0..framebuf.width())
                            .map(|x| {
                                let cell = framebuf.get(x, y);
                                Span::styled(cell.ch.to_string(), Style::default().fg(color_for(cell.color)))
                            })
                            .collect();
                        Line::from(spans)
                    })
                    .collect();
                let viewport = Paragraph::new(lines)
                    .block(Block::default().borders(Borders::ALL).title("World"));
                frame.render_widget(viewport, chunks[1]);

                let mut footer_spans = legend.clone();
                footer_spans.push(Span::raw(
                    " | space: pause | n: step | arrows: pan/orbit | +/-: zoom | r: reset | q: quit",
                ));
                let footer = Paragraph::new(Line::from(footer_spans))
                    .block(Block::default().borders(Borders::ALL).title("Controls"));
                frame.render_widget(footer, chunks[2]);
            })?;

            last_render = Instant::now();
            render_counter += 1;
        }

        std::thread::sleep(Duration::from_millis(1));
    }
}

fn shutdown_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

struct UiState {
    camera: render::Camera,
    framebuf: render::FrameBuffer,
    paused: bool,
}

impl UiState {
    fn new() -> Self {
        Self {
            camera: render::Camera::default(),
            framebuf: render::FrameBuffer::new(0, 0),
            paused: false,
        }
    }
}

fn legend_line<const D: usize>(world: &World<D>) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, group) in world.groups().iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(
            format!("{}({})", group.name, group.members.len()),
            Style::default().fg(color_for(group.color)),
        ));
    }
    spans
}

fn color_for(color: ColorId) -> Color {
    match color {
        ColorId::White => Color::White,
        ColorId::Red => Color::Red,
        ColorId::Yellow => Color::Yellow,
        ColorId::Green => Color::Green,
        ColorId::Blue => Color::Blue,
        ColorId::Cyan => Color::Cyan,
        ColorId::Magenta => Color::Magenta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_color_maps_to_a_terminal_color() {
        assert_eq!(color_for(ColorId::Red), Color::Red);
        assert_eq!(color_for(ColorId::Yellow), Color::Yellow);
        assert_eq!(color_for(ColorId::Green), Color::Green);
    }

    #[test]
    fn legend_lists_each_group_with_its_size() -> Result<()> {
        let config = WorldConfig::preset_2d()
            .with_particles_per_group(5)
            .with_seed(1);
        let world = World::<2>::new(&config)?;
        let spans = legend_line(&world);
        let text: String = spans.iter().map(|s| s.content.to_string()).collect();
        assert_eq!(text, "red(5) yellow(5) green(5)");
        Ok(())
    }
}
