//! The step driver that owns the ping-pong grid pair.
//!
//! One step runs the transition rule (plus the capture/clear overlays) for
//! every cell in parallel, reading only the published "front" buffer and
//! writing only the "back" buffer, then swaps the two in O(1). No cell update
//! ever observes another cell's write from the same step, which is what makes
//! the pull-formulated rule correct; external readers only ever see a fully
//! completed step.

use std::fmt;
use std::time::Duration;

use log::{debug, info};
use ndarray::Zip;
use rayon::prelude::*;

use crate::sim::cell::{Cell, PackedCell};
use crate::sim::fields::{self, FIELD_PRESET_COUNT};
use crate::sim::grid::Grid;
use crate::sim::neighborhood::Neighborhood;
use crate::sim::rule;
use crate::sim::seeding;
use crate::util::clock::{Clock, FrameParity};
use crate::util::image::RawImage;
use crate::util::vectors::XyVector;

/// The external image the seeding subsystem reads brightness from.
/// `sample` maps a grid-normalized uv coordinate to a luminance value;
/// outputs are clamped into [0, 1] by the core, so a misbehaving source
/// cannot corrupt the simulation.
pub trait LuminanceSource: Send + Sync {
    fn sample(&self, u: f32, v: f32) -> f32;
}

impl<F> LuminanceSource for F
where
    F: Fn(f32, f32) -> f32 + Send + Sync,
{
    fn sample(&self, u: f32, v: f32) -> f32 {
        self(u, v)
    }
}

/// The per-step parameters, passed explicitly into every `step` call rather
/// than held as shared mutable state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepUniforms {
    /// Elapsed real time since the previous step, spent from sand lifetimes
    pub delta_time: Duration,
    /// When set, the seeding overlay stamps new sand from the luminance source
    pub is_capturing: bool,
    /// When set, the field overlay resets the grid to a preset pattern
    pub is_clearing: bool,
    /// Which preset a clear writes, wrapping modulo the preset count
    pub field_index: usize,
    /// Drives the horizontal mirroring of neighborhood sampling
    pub frame_parity: FrameParity,
}

impl StepUniforms {
    /// Derive the per-step uniforms from a driver clock plus the triggers
    pub fn from_clock(
        clock: &Clock,
        is_capturing: bool,
        is_clearing: bool,
        field_index: usize,
    ) -> Self {
        Self {
            delta_time: clock.get_last_delta(),
            is_capturing,
            is_clearing,
            field_index,
            frame_parity: clock.frame_parity(),
        }
    }
}

/// The validated construction-time parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatorConfig {
    pub width: usize,
    pub height: usize,
    /// Center of the circular capture region in uv space
    pub capture_center: (f32, f32),
    /// Radius of the capture region in uv space
    pub capture_radius: f32,
    /// Lattice pitch of the seeding overlay, in cells
    pub seed_spacing: usize,
    /// Lower bound of the seeded lifetime, in seconds
    pub ttl_min: f32,
    /// Upper bound of the seeded lifetime, in seconds
    pub ttl_max: f32,
    /// When false, sand lives forever
    pub ttl_decay_enabled: bool,
    /// Tiling scale of the mirrored uv transform applied before sampling
    /// the luminance source; a presentation tunable
    pub capture_uv_scale: f32,
}

/// Defines when the simulator was asked for a configuration it cannot run
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidConfig {
    ZeroDimension { width: usize, height: usize },
    TtlRangeReversed { min: f32, max: f32 },
    ZeroSeedSpacing,
    NegativeCaptureRadius(f32),
}

impl fmt::Display for InvalidConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ZeroDimension { width, height } => {
                write!(f, "grid dimensions must be positive, got {}x{}", width, height)
            }
            Self::TtlRangeReversed { min, max } => {
                write!(f, "ttl range is reversed: min {} > max {}", min, max)
            }
            Self::ZeroSeedSpacing => write!(f, "seed spacing must be at least 1"),
            Self::NegativeCaptureRadius(radius) => {
                write!(f, "capture radius must be non-negative, got {}", radius)
            }
        }
    }
}

impl std::error::Error for InvalidConfig {}

/// Builds a `SandSimulator`, validating the parameters before any grid is
/// allocated so the simulator can never exist in an invalid state
pub struct SandSimulatorBuilder {
    config: SimulatorConfig,
}

impl Default for SandSimulatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SandSimulatorBuilder {
    pub fn new() -> Self {
        Self {
            config: SimulatorConfig {
                width: 128,
                height: 128,
                capture_center: (0.5, 0.5),
                capture_radius: 0.5,
                seed_spacing: 2,
                ttl_min: 100.0,
                ttl_max: 200.0,
                ttl_decay_enabled: false,
                capture_uv_scale: 1.0,
            },
        }
    }

    pub fn width(mut self, width: usize) -> Self {
        self.config.width = width;
        self
    }

    pub fn height(mut self, height: usize) -> Self {
        self.config.height = height;
        self
    }

    pub fn capture_center(mut self, center: (f32, f32)) -> Self {
        self.config.capture_center = center;
        self
    }

    pub fn capture_radius(mut self, radius: f32) -> Self {
        self.config.capture_radius = radius;
        self
    }

    pub fn seed_spacing(mut self, spacing: usize) -> Self {
        self.config.seed_spacing = spacing;
        self
    }

    pub fn ttl_range(mut self, min: f32, max: f32) -> Self {
        self.config.ttl_min = min;
        self.config.ttl_max = max;
        self
    }

    pub fn ttl_decay(mut self, enabled: bool) -> Self {
        self.config.ttl_decay_enabled = enabled;
        self
    }

    pub fn capture_uv_scale(mut self, scale: f32) -> Self {
        self.config.capture_uv_scale = scale;
        self
    }

    /// Validates the configuration and allocates both grid buffers, all air
    pub fn build(
        self,
        source: impl LuminanceSource + 'static,
    ) -> Result<SandSimulator, InvalidConfig> {
        let config = self.config;
        if config.width == 0 || config.height == 0 {
            return Err(InvalidConfig::ZeroDimension {
                width: config.width,
                height: config.height,
            });
        }
        if config.ttl_min > config.ttl_max {
            return Err(InvalidConfig::TtlRangeReversed {
                min: config.ttl_min,
                max: config.ttl_max,
            });
        }
        if config.seed_spacing == 0 {
            return Err(InvalidConfig::ZeroSeedSpacing);
        }
        if config.capture_radius < 0.0 {
            return Err(InvalidConfig::NegativeCaptureRadius(config.capture_radius));
        }
        info!(
            "sand grid {}x{} ({} cells)",
            config.width,
            config.height,
            config.width * config.height
        );
        Ok(SandSimulator {
            front: Grid::new_fill(config.width, config.height, Cell::air()),
            back: Grid::new_fill(config.width, config.height, Cell::air()),
            config,
            source: Box::new(source),
        })
    }
}

/// The simulation core: two equally sized cell grids in a ping-pong pair,
/// the validated configuration, and the external luminance source
pub struct SandSimulator {
    config: SimulatorConfig,
    source: Box<dyn LuminanceSource>,
    front: Grid<Cell>,
    back: Grid<Cell>,
}

impl fmt::Debug for SandSimulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SandSimulator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/* ======================================
 * Stepping
 * ====================================== */
impl SandSimulator {
    /// Advance the simulation by one tick.
    ///
    /// Every cell's update reads only the front buffer and writes only its
    /// own slot of the back buffer, so the whole pass runs in parallel with
    /// no ordering dependency. The buffers swap roles once every cell has
    /// finished; nothing partial is ever published.
    pub fn step(&mut self, uniforms: &StepUniforms) {
        if uniforms.is_clearing {
            debug!(
                "clearing the field to preset {}",
                uniforms.field_index % FIELD_PRESET_COUNT
            );
        }
        if uniforms.is_capturing {
            debug!("capturing the luminance source into the grid");
        }

        let Self {
            config,
            source,
            front,
            back,
        } = self;
        let front: &Grid<Cell> = front;
        let config: &SimulatorConfig = config;
        let source: &dyn LuminanceSource = source.as_ref();

        Zip::indexed(back.get_data_mut()).par_for_each(|(x, y), out| {
            let pos = XyVector::new(x, y);
            let neighborhood = Neighborhood::sample(front, pos, uniforms.frame_parity);
            let mut next =
                rule::transition(&neighborhood, uniforms.delta_time, config.ttl_decay_enabled);
            if uniforms.is_clearing {
                next = fields::preset_cell(pos, config.width, config.height, uniforms.field_index);
            }
            if uniforms.is_capturing {
                if let Some(seeded) = seeding::seed_cell(pos, config, source) {
                    next = seeded;
                }
            }
            *out = next;
        });

        std::mem::swap(&mut self.front, &mut self.back);
    }
}

/* ======================================
 * Reading the published buffer
 * ====================================== */
impl SandSimulator {
    pub fn get_width(&self) -> usize {
        self.config.width
    }
    pub fn get_height(&self) -> usize {
        self.config.height
    }
    pub fn get_config(&self) -> &SimulatorConfig {
        &self.config
    }
    /// The cell at any signed coordinate of the published buffer, wrapping
    pub fn current_cell(&self, x: isize, y: isize) -> Cell {
        *self.front.get_wrapped(x, y)
    }
    /// The published buffer itself, read-only
    pub fn current_grid(&self) -> &Grid<Cell> {
        &self.front
    }
    /// Paint one cell of the published buffer, wrapping.
    /// This is the brush/scenario entry point for embedding applications;
    /// the step itself never mutates the published buffer.
    pub fn set_current_cell(&mut self, x: isize, y: isize, cell: Cell) {
        self.front.set_wrapped(x, y, cell);
    }
    /// Every cell of the published buffer in packed channel form, in
    /// `get_data_slice` order. The result can be viewed as raw bytes:
    /// ```ignore
    /// let packed = simulator.packed_cells();
    /// let bytes: &[u8] = bytemuck::cast_slice(&packed);
    /// ```
    pub fn packed_cells(&self) -> Vec<PackedCell> {
        self.front
            .get_data_slice()
            .par_iter()
            .map(Cell::pack)
            .collect()
    }
    /// Render the published buffer to an RGBA8 image, top row first
    pub fn to_raw_image(&self) -> RawImage {
        let (width, height) = (self.config.width, self.config.height);
        let mut image = RawImage::new(width as u32, height as u32);
        for row in 0..height {
            let y = height - 1 - row;
            for x in 0..width {
                let color = self.front.get(XyVector::new(x, y)).visualize();
                image.put_pixel(x as u32, row as u32, color);
            }
        }
        image
    }
}
