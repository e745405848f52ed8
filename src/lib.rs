//! Inkwash is the ambient procedural-rendering layer of a promotional page:
//! a swaying bamboo grove, a pointer-following ink trail, and a physics-driven
//! swipe deck, simulated frame by frame and composited on the CPU.
//!
//! # Frame loop
//!
//! 1. **Tick**: [`Stage::tick_frame`] ages every subsystem, then absorbs buffered input
//! 2. **Render**: [`Stage::render_frame`] draws the grove and trail and composites them
//! 3. **Present**: the host consumes the premultiplied [`FrameRGBA`]
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: equal seeds and viewports generate identical groves.
//! - **Premultiplied RGBA8** end-to-end: surfaces and frames carry premultiplied pixels.
//! - **Frame-clocked input**: pointer events are buffered and only applied at the tick.
//!
//! # Getting started
//!
//! - For end-user usage, see the repository README.
//! - For a standalone walkthrough of the API and architecture, see [`crate::guide`].
#![forbid(unsafe_code)]

pub mod composite_cpu;
pub mod core;
pub mod deck;
pub mod ease;
pub mod error;
pub mod fingerprint;
pub mod grove;
pub mod guide;
pub mod input;
pub mod model;
pub mod pipeline;
pub mod rng;
pub mod scene;
pub mod surface;
pub mod trail;
pub mod tween;

pub use crate::core::{Fps, FrameIndex, Viewport};
pub use crate::deck::{BackCardPose, CardDeck, DeckPhase, DeckTuning, SwipeDirection};
pub use crate::ease::Ease;
pub use crate::error::{InkwashError, InkwashResult};
pub use crate::fingerprint::{FrameFingerprint, fingerprint_frame};
pub use crate::grove::{ColorToken, Leaf, LeafSide, Stalk};
pub use crate::input::{InputQueue, PointerEvent, PointerKind};
pub use crate::model::{PAPER_RGBA, StageSpec};
pub use crate::pipeline::{CancelToken, RunStats, Stage, run_until_cancelled};
pub use crate::rng::Rng64;
pub use crate::scene::GroveScene;
pub use crate::surface::{FrameRGBA, Painter, Surface, SurfaceSettings};
pub use crate::trail::{InkTrail, TrailPoint};
pub use crate::tween::Tween;
