use crate::types::{ColorId, ParticleSnapshot, VecN};

/// View onto the world: pan offset in world units, zoom on top of the
/// fit-to-viewport scale, and orbit yaw (3-D only) in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub center: [f64; 2],
    pub zoom: f32,
    pub yaw: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0],
            zoom: 1.0,
            yaw: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

#[derive(Clone, Copy, Debug)]
pub struct RenderCell {
    pub ch: char,
    pub depth: f64,
    pub count: u16,
    pub color: ColorId,
}

const EMPTY_CELL: RenderCell = RenderCell {
    ch: ' ',
    depth: f64::NEG_INFINITY,
    count: 0,
    color: ColorId::White,
};

#[derive(Debug)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<RenderCell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let mut buffer = Self {
            width,
            height,
            cells: Vec::new(),
        };
        buffer.resize(width, height);
        buffer
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let len = (width as usize).saturating_mul(height as usize);
        if self.cells.len() != len {
            self.cells.resize(len, EMPTY_CELL);
        }
        self.clear();
    }

    pub fn clear(&mut self) {
        self.cells.fill(EMPTY_CELL);
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn get(&self, x: u16, y: u16) -> RenderCell {
        debug_assert!(x < self.width && y < self.height, "get() out of bounds");
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        self.cells[idx]
    }

    /// Counts one more particle in the cell; the nearest one picks the color.
    fn plot(&mut self, x: u16, y: u16, depth: f64, color: ColorId) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        let cell = &mut self.cells[idx];
        cell.count = cell.count.saturating_add(1);
        cell.ch = glyph_for(cell.count);
        if depth >= cell.depth {
            cell.depth = depth;
            cell.color = color;
        }
    }
}

fn glyph_for(count: u16) -> char {
    match count {
        0 => ' ',
        1 => '·',
        2..=3 => '•',
        _ => '●',
    }
}

/// Terminal cells are roughly twice as tall as wide.
const CELL_ASPECT: f64 = 2.0;

/// Maps a world position to fractional screen coordinates plus a depth
/// (larger is nearer the viewer; always 0 in 2-D).
pub fn project<const D: usize>(
    pos: VecN<D>,
    camera: &Camera,
    half_extent: f64,
    viewport: Viewport,
) -> (f64, f64, f64) {
    let (x, depth) = if D >= 3 {
        let (sin, cos) = camera.yaw.sin_cos();
        (pos[0] * cos + pos[2] * sin, -pos[0] * sin + pos[2] * cos)
    } else {
        (pos[0], 0.0)
    };
    let y = if D >= 2 { pos[1] } else { 0.0 };

    let half_w = viewport.width as f64 / 2.0;
    let half_h = viewport.height as f64 / 2.0;
    let fit = (half_w / CELL_ASPECT).min(half_h) / half_extent;
    let scale = fit * camera.zoom as f64;

    let sx = (x - camera.center[0]) * scale * CELL_ASPECT + half_w;
    let sy = half_h - (y - camera.center[1]) * scale;
    (sx, sy, depth)
}

pub fn draw<const D: usize>(
    snapshot: &[ParticleSnapshot<D>],
    camera: &Camera,
    half_extent: f64,
    viewport: Viewport,
    frame: &mut FrameBuffer,
) {
    if frame.width() != viewport.width || frame.height() != viewport.height {
        frame.resize(viewport.width, viewport.height);
    } else {
        frame.clear();
    }

    for particle in snapshot {
        let (sx, sy, depth) = project(particle.pos, camera, half_extent, viewport);
        let sx = sx.floor();
        let sy = sy.floor();
        if sx < 0.0 || sy < 0.0 || sx >= viewport.width as f64 || sy >= viewport.height as f64 {
            continue;
        }
        frame.plot(sx as u16, sy as u16, depth, particle.color);
    }
}
