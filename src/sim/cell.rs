//! The atomic simulation unit and its packed wire form.
//! Inside the engine a cell is a plain value type; the packed four-channel
//! form exists only for the interop boundary with a numeric storage channel
//! (e.g. a texture the renderer reads), so encoding happens at that boundary
//! and nowhere inside the rule logic.

use bytemuck::{Pod, Zeroable};
use derive_more::{Add, AddAssign, From, Into, Sub, SubAssign};
use std::time::Duration;
use strum_macros::{EnumIter, FromRepr};

use crate::util::functions::lerp;

/// The material held by one grid cell.
/// Air and Sink are "air-like": sand can fall into them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, FromRepr)]
#[repr(u8)]
pub enum CellKind {
    #[default]
    Air = 0,
    Sand = 1,
    Wall = 2,
    Sink = 3,
}

impl CellKind {
    /// Whether falling sand can move into a cell of this kind
    pub fn is_air_like(&self) -> bool {
        matches!(self, CellKind::Air | CellKind::Sink)
    }
}

/// The brightness carried by a cell for coloring, normalized to [0, 1].
/// A display attribute only, the rule never branches on it.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, PartialOrd, Add, Sub, AddAssign, SubAssign, From, Into,
)]
pub struct Luminance(pub f32);

impl Luminance {
    /// Clamps into the normalized range
    pub fn clamped(self) -> Self {
        Self(self.0.clamp(0.0, 1.0))
    }
}

/// The remaining lifetime of a sand cell in seconds.
/// Only meaningful while the kind is Sand; every other kind carries zero.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, PartialOrd, Add, Sub, AddAssign, SubAssign, From, Into,
)]
pub struct TimeToLive(pub f32);

impl TimeToLive {
    pub const ZERO: Self = Self(0.0);

    /// The lifetime left after the given elapsed time
    pub fn decremented(self, delta: Duration) -> Self {
        Self(self.0 - delta.as_secs_f32())
    }

    /// Whether the lifetime has run out
    pub fn is_expired(&self) -> bool {
        self.0 <= 0.0
    }
}

/// One grid cell
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Cell {
    pub kind: CellKind,
    pub luminance: Luminance,
    pub ttl: TimeToLive,
}

/* =================
 * Construction
 * ================= */
impl Cell {
    /// An empty cell
    pub fn air() -> Self {
        Self::default()
    }

    /// A falling sand cell
    pub fn sand(luminance: Luminance, ttl: TimeToLive) -> Self {
        Self {
            kind: CellKind::Sand,
            luminance,
            ttl,
        }
    }

    /// An immovable obstacle
    pub fn wall(luminance: Luminance) -> Self {
        Self {
            kind: CellKind::Wall,
            luminance,
            ttl: TimeToLive::ZERO,
        }
    }

    /// A passable cell that erases sand on contact
    pub fn sink(luminance: Luminance) -> Self {
        Self {
            kind: CellKind::Sink,
            luminance,
            ttl: TimeToLive::ZERO,
        }
    }
}

/* =================
 * Packed codec
 * ================= */

/// The packed four-channel form of a cell: r holds the kind index over 255,
/// g the luminance, b the raw ttl (may exceed 1), a is fixed to 1.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct PackedCell {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Cell {
    /// Encode into the packed channel form
    pub fn pack(&self) -> PackedCell {
        PackedCell {
            r: self.kind as u8 as f32 / 255.0,
            g: self.luminance.clamped().0,
            b: self.ttl.0,
            a: 1.0,
        }
    }

    /// Decode from the packed channel form.
    /// The packed channels are a lossy numeric transport, so an index outside
    /// the known kinds clamps to Air instead of failing, and kinds that never
    /// carry a lifetime come back with a zero ttl.
    pub fn unpack(packed: PackedCell) -> Self {
        let kind =
            CellKind::from_repr((packed.r * 255.0).round() as u8).unwrap_or(CellKind::Air);
        let ttl = match kind {
            CellKind::Sand => TimeToLive(packed.b),
            _ => TimeToLive::ZERO,
        };
        Self {
            kind,
            luminance: Luminance(packed.g),
            ttl,
        }
    }
}

/* =================
 * Visualization
 * ================= */

/// Color ramp endpoints per kind, blended by luminance
const SAND_RAMP: ([f32; 3], [f32; 3]) = ([1.0, 0.0, 0.0], [1.0, 1.0, 0.0]);
const WALL_RAMP: ([f32; 3], [f32; 3]) = ([0.0, 0.0, 1.0], [0.0, 1.0, 1.0]);
const SINK_RAMP: ([f32; 3], [f32; 3]) = ([0.0, 0.1, 0.1], [0.0, 0.9, 0.7]);

fn blend(ramp: ([f32; 3], [f32; 3]), luminance: Luminance) -> [f32; 3] {
    let t = luminance.clamped().0;
    let (lo, hi) = ramp;
    [
        lerp(lo[0], hi[0], t),
        lerp(lo[1], hi[1], t),
        lerp(lo[2], hi[2], t),
    ]
}

impl Cell {
    /// The display color of this cell, fully opaque.
    /// Pure and reproducible from the cell alone; the renderer consumes it.
    pub fn visualize(&self) -> [f32; 4] {
        let rgb = match self.kind {
            CellKind::Air => [0.0, 0.0, 0.0],
            CellKind::Sand => blend(SAND_RAMP, self.luminance),
            CellKind::Wall => blend(WALL_RAMP, self.luminance),
            CellKind::Sink => blend(SINK_RAMP, self.luminance),
        };
        [rgb[0], rgb[1], rgb[2], 1.0]
    }
}
