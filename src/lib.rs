//! A falling-sand simulation core on a wrapping 2d grid.
//!
//! Each cell holds a typed material state that evolves every step according
//! to local neighborhood rules: gravity-driven sand flow, absorption by
//! sinks, time-limited sand decay, reseeding from an external luminance
//! source, and preset field resets. The crate is the state-transition engine
//! only; windowing, rendering and capture hardware live with the caller,
//! which supplies a [`sim::simulator::LuminanceSource`] and per-step
//! [`sim::simulator::StepUniforms`] and reads back cells, packed buffers or
//! an RGBA image.
//!
//! When contributing, please keep the following things in mind:
//! * This crate is maintained game engine agnostic. The renderer-facing
//!   outputs are plain value types on purpose; please do not introduce
//!   engine dependencies here.
//! * The rule is pull-formulated and every cell writes only its own slot.
//!   See [`sim::rule`] before changing movement semantics.
//!
//! ```
//! use std::time::Duration;
//! use toroidal_sand::sim::simulator::{SandSimulatorBuilder, StepUniforms};
//! use toroidal_sand::util::clock::Clock;
//!
//! let mut simulator = SandSimulatorBuilder::new()
//!     .width(64)
//!     .height(64)
//!     .seed_spacing(1)
//!     .capture_radius(1.0)
//!     .build(|u: f32, v: f32| (u + v) / 2.0)
//!     .unwrap();
//!
//! let mut clock = Clock::new();
//! clock.update(Duration::from_millis(16));
//! simulator.step(&StepUniforms::from_clock(&clock, true, false, 0));
//!
//! let image = simulator.to_raw_image();
//! assert_eq!(image.width, 64);
//! ```

pub mod sim;
pub mod util;
