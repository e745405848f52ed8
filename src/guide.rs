//! # Inkwash guide
//!
//! This module is a standalone walkthrough of Inkwash's architecture and public API.
//! It is intentionally detailed so hosts (and future features) can build on a shared
//! mental model of what "a frame" means in this codebase.
//!
//! If you are looking for copy/paste commands, start with the repository `README.md`.
//! If you are integrating or extending the stage, start here.
//!
//! ---
//!
//! ## Core concepts
//!
//! - [`StageSpec`](crate::StageSpec): viewport, frame rate, seed, and deck content
//! - [`Stage`](crate::Stage): the live simulation; owns every subsystem below
//! - [`GroveScene`](crate::GroveScene): the procedural stalk population and its sway clock
//! - [`InkTrail`](crate::InkTrail): the aging pointer-trail buffer
//! - [`CardDeck`](crate::CardDeck): swipe physics over a circular item sequence
//! - [`Surface`](crate::Surface): a viewport-sized `vello_cpu` raster target
//! - [`FrameRGBA`](crate::FrameRGBA): the output pixels (RGBA8, premultiplied alpha)
//!
//! The per-frame pipeline is explicitly staged:
//!
//! 1. Tick: [`Stage::tick_frame`](crate::Stage::tick_frame)
//! 2. Render: [`Stage::render_frame`](crate::Stage::render_frame)
//!
//! A convenience driver for tick+render at a fixed rate lives in
//! [`run_until_cancelled`](crate::run_until_cancelled).
//!
//! ---
//!
//! ## The frame contract
//!
//! Each subsystem is advanced by exactly one frame per tick, in this order:
//!
//! - the grove's time counter increments (all sway is a pure function of it)
//! - every trail point ages by one frame; points at the age limit are discarded
//! - the deck's in-flight animation (commit slide or snap-back) advances
//! - buffered pointer events are drained and applied
//!
//! Draining input *after* aging means a pointer move that arrived during the
//! frame is recorded at age 0 and drawn at full strength in the very frame it
//! appeared — and every point lives exactly [`TRAIL_AGE_LIMIT`](crate::trail::TRAIL_AGE_LIMIT)
//! frames from then on.
//!
//! No subsystem renders from inside an input handler. Hosts may push events at
//! any rate; the stage only acts on them at the tick, so a fast mouse never
//! forces extra renders.
//!
//! ---
//!
//! ## Premultiplied alpha (the pixel contract)
//!
//! Inkwash's internal and output pixel convention is **premultiplied RGBA8**:
//!
//! - surfaces are cleared to a premultiplied color each draw
//! - [`Surface::readback`](crate::Surface::readback) and [`Stage::render_frame`](crate::Stage::render_frame)
//!   return premultiplied pixels
//! - CPU compositing ([`composite_cpu`](crate::composite_cpu)) assumes premultiplied alpha
//! - image export flattens alpha over a background color
//!
//! The trail layer is composited with a multiply blend
//! ([`multiply_over_in_place`](crate::composite_cpu::multiply_over_in_place)),
//! so ink darkens the paper and stalks beneath it and can never lighten them.
//!
//! ---
//!
//! ## Determinism and seeding
//!
//! Grove generation draws every random parameter from an explicit
//! [`Rng64`](crate::Rng64) seeded by [`StageSpec::seed`](crate::StageSpec).
//! Equal seeds and viewports produce identical stalk populations, which is what
//! makes the distributional properties of the generator testable. Resizing the
//! viewport regenerates the population from scratch with the same seed; there
//! is no incremental resize.
//!
//! ---
//!
//! ## Driving a stage
//!
//! ```rust,no_run
//! use inkwash::{Fps, PointerEvent, Stage, StageSpec, Viewport, PAPER_RGBA};
//!
//! # fn main() -> inkwash::InkwashResult<()> {
//! let spec = StageSpec {
//!     viewport: Viewport { width: 1280.0, height: 720.0, dpr: 1.0 },
//!     fps: Fps { num: 60, den: 1 },
//!     seed: 7,
//!     background_rgba: PAPER_RGBA,
//!     pointer_hover: true,
//!     deck: Default::default(),
//!     deck_items: vec!["First card".into(), "Second card".into()],
//! };
//! let mut stage = Stage::new(spec)?;
//!
//! stage.push_event(PointerEvent::moved(640.0, 360.0, 0.0));
//! stage.tick_frame();
//! let frame = stage.render_frame()?;
//! assert_eq!(frame.width, 1280);
//! assert!(frame.premultiplied);
//! # Ok(())
//! # }
//! ```
//!
//! For a continuous loop, hand the stage to
//! [`run_until_cancelled`](crate::run_until_cancelled) with a cloned
//! [`CancelToken`](crate::CancelToken); cancelling the token from any thread
//! ends the loop after the frame in flight.
//!
//! ---
//!
//! ## Host integration notes
//!
//! - **Viewport and DPR**: geometry is specified in CSS pixels; surfaces
//!   allocate at device resolution and apply the device-pixel-ratio scale once
//!   per draw. On resize, call [`Stage::resize`](crate::Stage::resize) — the
//!   grove rebuilds and both surfaces reallocate.
//! - **Zero-sized viewports** are a silently-handled degenerate state: the
//!   generator yields an empty population and rendering yields an empty frame.
//! - **Hover capability**: set [`StageSpec::pointer_hover`](crate::StageSpec)
//!   to `false` on touch-primary hosts; the trail then records and draws
//!   nothing and its layer is skipped at composite time.
//! - **Deck styling**: the deck never draws. Hosts read
//!   [`active_index`](crate::CardDeck::active_index),
//!   [`offset`](crate::CardDeck::offset),
//!   [`rotation_deg`](crate::CardDeck::rotation_deg) and
//!   [`back_card`](crate::CardDeck::back_card) each frame and style their own
//!   card content from them.
