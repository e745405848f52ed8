use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::composite_cpu;
use crate::core::{FrameIndex, Viewport};
use crate::deck::{CardDeck, SwipeDirection};
use crate::error::InkwashResult;
use crate::input::{InputQueue, PointerEvent, PointerKind};
use crate::model::StageSpec;
use crate::scene::GroveScene;
use crate::surface::{FrameRGBA, Surface, SurfaceSettings};
use crate::trail::InkTrail;

/// A live stage: the grove scene, ink trail, and swipe deck advancing under
/// one frame clock and compositing into a single frame.
///
/// Per frame:
/// 1. [`Stage::tick_frame`] — age the subsystems, then absorb buffered input.
/// 2. [`Stage::render_frame`] — draw grove and trail to their surfaces and
///    composite, trail over grove with a multiply blend.
///
/// Input arrives asynchronously via [`Stage::push_event`] and is only acted
/// on at the next tick, so event rate never forces extra renders.
pub struct Stage {
    spec: StageSpec,
    frame: FrameIndex,
    grove: GroveScene,
    trail: InkTrail,
    deck: CardDeck<String>,
    grove_surface: Surface,
    trail_surface: Surface,
    queue: InputQueue,
}

impl Stage {
    pub fn new(spec: StageSpec) -> InkwashResult<Self> {
        spec.validate()?;
        let grove = GroveScene::new(spec.viewport, spec.seed);
        let trail = InkTrail::new(spec.pointer_hover);
        let deck = CardDeck::new(spec.deck_items.clone(), spec.deck)?;
        let grove_surface = Surface::new(
            spec.viewport,
            SurfaceSettings {
                clear_rgba: Some(spec.background_rgba),
            },
        )?;
        let trail_surface = Surface::new(spec.viewport, SurfaceSettings::default())?;
        Ok(Self {
            spec,
            frame: FrameIndex(0),
            grove,
            trail,
            deck,
            grove_surface,
            trail_surface,
            queue: InputQueue::new(),
        })
    }

    /// Buffer a pointer event for the next tick.
    pub fn push_event(&mut self, event: PointerEvent) {
        self.queue.push(event);
    }

    /// Apply a viewport change: the grove population is rebuilt from scratch
    /// and both surfaces are reallocated at the new device size.
    pub fn resize(&mut self, viewport: Viewport) -> InkwashResult<()> {
        self.spec.viewport = viewport;
        self.grove.resize(viewport);
        self.grove_surface.resize(viewport)?;
        self.trail_surface.resize(viewport)?;
        Ok(())
    }

    /// Advance the simulation by one frame: increment the clock, age every
    /// subsystem, then drain buffered input. Draining last means a pointer
    /// move recorded this frame is drawn at age 0, and drag state is current
    /// when the frame is rendered.
    pub fn tick_frame(&mut self) {
        self.frame.0 += 1;
        self.grove.tick();
        self.trail.tick();
        self.deck.tick(self.spec.fps.frame_duration());

        for event in self.queue.drain() {
            match event.kind {
                PointerKind::Down => self.deck.pointer_down(event.pos),
                PointerKind::Move => {
                    self.trail.record(event.pos);
                    self.deck.pointer_move(event.pos);
                }
                PointerKind::Up => self.deck.pointer_up(),
            }
        }
    }

    /// Composite the current state into a premultiplied RGBA frame. The
    /// trail layer is skipped entirely on hover-incapable hosts.
    #[tracing::instrument(skip(self), fields(frame = self.frame.0))]
    pub fn render_frame(&mut self) -> InkwashResult<FrameRGBA> {
        self.grove.render(&mut self.grove_surface)?;
        let mut frame = self.grove_surface.readback();
        if self.trail.enabled() {
            self.trail.render(&mut self.trail_surface)?;
            composite_cpu::multiply_over_in_place(
                &mut frame.data,
                self.trail_surface.data(),
                1.0,
            )?;
        }
        Ok(frame)
    }

    /// Trigger a programmatic swipe, as from a next/previous control.
    pub fn advance(&mut self, direction: SwipeDirection) {
        self.deck.advance(direction);
    }

    pub fn spec(&self) -> &StageSpec {
        &self.spec
    }

    /// Index of the most recently simulated frame; 0 before the first tick.
    pub fn frame(&self) -> FrameIndex {
        self.frame
    }

    pub fn grove(&self) -> &GroveScene {
        &self.grove
    }

    pub fn trail(&self) -> &InkTrail {
        &self.trail
    }

    pub fn deck(&self) -> &CardDeck<String> {
        &self.deck
    }
}

/// Cooperative stop signal for [`run_until_cancelled`]. Clone it into
/// whatever thread or handler decides when the stage should stop.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub frames: u64,
    /// Frames whose tick + render + sink overran the frame period.
    pub slow_frames: u64,
}

/// Drive a stage at its configured frame rate until the token is cancelled.
///
/// Each iteration ticks, renders, and hands the frame to `sink`; the loop
/// then sleeps out the remainder of the frame period. A frame that overruns
/// its period is counted in [`RunStats::slow_frames`] and the next deadline
/// shifts rather than trying to catch up.
pub fn run_until_cancelled(
    stage: &mut Stage,
    token: &CancelToken,
    mut sink: impl FnMut(FrameIndex, &FrameRGBA) -> InkwashResult<()>,
) -> InkwashResult<RunStats> {
    let period = stage.spec().fps.frame_duration();
    let mut stats = RunStats::default();
    let mut deadline = Instant::now() + period;

    while !token.is_cancelled() {
        stage.tick_frame();
        let frame = stage.render_frame()?;
        sink(stage.frame(), &frame)?;
        stats.frames += 1;

        let now = Instant::now();
        if now < deadline {
            std::thread::sleep(deadline - now);
            deadline += period;
        } else {
            stats.slow_frames += 1;
            deadline = now + period;
        }
    }
    Ok(stats)
}
