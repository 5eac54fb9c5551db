//! Stamps fresh sand into the capture region from the external luminance
//! source. Runs only on capture frames, after the transition rule, and wins
//! over every other overlay for the cells it touches.

use std::hash::{Hash, Hasher};

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::sim::cell::{Cell, Luminance, TimeToLive};
use crate::sim::simulator::{LuminanceSource, SimulatorConfig};
use crate::util::functions::mirrored01;
use crate::util::vectors::XyVector;

/// The seeded cell for this coordinate, or None when the coordinate is off
/// the seeding lattice or outside the capture region.
///
/// The lattice keeps the stamped mass sparse: only cells whose coordinates
/// are both multiples of the spacing receive a grain. Luminance comes from
/// the source through the mirrored uv transform, clamped to [0, 1] since the
/// sampler is external and untrusted. The lifetime is drawn uniformly from
/// the configured range with an rng seeded from the cell coordinate, so
/// reseeding the same spot reproduces the same lifetime while distinct spots
/// stay independent.
pub fn seed_cell(
    pos: XyVector,
    config: &SimulatorConfig,
    source: &dyn LuminanceSource,
) -> Option<Cell> {
    if (pos.x % config.seed_spacing) + (pos.y % config.seed_spacing) != 0 {
        return None;
    }
    let (u, v) = pos.to_uv(config.width, config.height);
    let (center_u, center_v) = config.capture_center;
    let distance = ((u - center_u).powi(2) + (v - center_v).powi(2)).sqrt();
    if distance > config.capture_radius {
        return None;
    }
    let sample = source.sample(
        mirrored01(u * config.capture_uv_scale),
        mirrored01(v * config.capture_uv_scale),
    );
    let luminance = Luminance(sample).clamped();
    Some(Cell::sand(luminance, draw_ttl(pos, config)))
}

/// A reproducible per-coordinate lifetime in [ttl_min, ttl_max]
fn draw_ttl(pos: XyVector, config: &SimulatorConfig) -> TimeToLive {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    pos.hash(&mut hasher);
    let mut rng = StdRng::seed_from_u64(hasher.finish());
    TimeToLive(rng.gen_range(config.ttl_min..=config.ttl_max))
}
