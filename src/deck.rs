use std::time::Duration;

use crate::core::{Point, Vec2};
use crate::ease::Ease;
use crate::error::{InkwashError, InkwashResult};
use crate::tween::Tween;

/// Commit direction of a swipe. Either way the deck advances forward; the
/// direction only decides which edge the card exits through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    pub fn signum(self) -> f64 {
        match self {
            SwipeDirection::Left => -1.0,
            SwipeDirection::Right => 1.0,
        }
    }
}

/// Externally visible phase of the deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeckPhase {
    Idle,
    Dragging,
    Committing(SwipeDirection),
}

/// Gesture and animation constants, in CSS pixels and milliseconds.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct DeckTuning {
    /// Drags released beyond this horizontal distance commit; at or under
    /// it they snap back.
    pub commit_threshold_px: f64,
    /// Vertical movement above this, when it dominates the horizontal
    /// component, classifies the gesture as page scroll.
    pub scroll_intent_px: f64,
    /// Horizontal distance the committed card slides out to.
    pub slide_out_px: f64,
    /// Duration of the commit slide, after which the active index advances.
    pub commit_ms: f64,
    /// Duration of the snap-back ease to the rest position.
    pub snap_back_ms: f64,
    /// Card tilt per pixel of horizontal offset, in degrees.
    pub rotation_deg_per_px: f64,
    /// Offset at which the background card reaches its full-reveal pose.
    pub back_reveal_px: f64,
}

impl Default for DeckTuning {
    fn default() -> Self {
        Self {
            commit_threshold_px: 60.0,
            scroll_intent_px: 5.0,
            slide_out_px: 800.0,
            commit_ms: 400.0,
            snap_back_ms: 500.0,
            rotation_deg_per_px: 0.05,
            back_reveal_px: 300.0,
        }
    }
}

impl DeckTuning {
    pub fn validate(&self) -> InkwashResult<()> {
        let positive = [
            ("deck.commit_threshold_px", self.commit_threshold_px),
            ("deck.scroll_intent_px", self.scroll_intent_px),
            ("deck.slide_out_px", self.slide_out_px),
            ("deck.commit_ms", self.commit_ms),
            ("deck.snap_back_ms", self.snap_back_ms),
            ("deck.back_reveal_px", self.back_reveal_px),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(InkwashError::validation(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        if !self.rotation_deg_per_px.is_finite() {
            return Err(InkwashError::validation(
                "deck.rotation_deg_per_px must be finite",
            ));
        }
        Ok(())
    }

    fn commit_duration(&self) -> Duration {
        Duration::from_secs_f64(self.commit_ms / 1000.0)
    }

    fn snap_back_duration(&self) -> Duration {
        Duration::from_secs_f64(self.snap_back_ms / 1000.0)
    }
}

/// Pose of the background (next) card, derived from the foreground offset.
/// It grows into place as the active card departs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackCardPose {
    pub scale: f64,
    pub opacity: f64,
    pub translate_y: f64,
}

enum Phase {
    Idle,
    Dragging { origin: Point },
    Committing { direction: SwipeDirection, slide: Tween },
}

/// Swipe physics for a circular card sequence.
///
/// One item is active and draggable; the item after it is the visible
/// background card. Dragging moves the active card horizontally only. On
/// release the offset either commits (slides out, then the index advances
/// by one) or snaps back. A commit in flight ignores further input until it
/// lands.
///
/// The deck never draws; hosts read `offset`, `rotation_deg` and
/// `back_card` each frame and style the cards themselves.
pub struct CardDeck<T> {
    items: Vec<T>,
    tuning: DeckTuning,
    active_index: usize,
    phase: Phase,
    offset: Vec2,
    settle: Option<Tween>,
}

impl<T> CardDeck<T> {
    pub fn new(items: Vec<T>, tuning: DeckTuning) -> InkwashResult<Self> {
        if items.is_empty() {
            return Err(InkwashError::validation("deck.items must not be empty"));
        }
        tuning.validate()?;
        Ok(Self {
            items,
            tuning,
            active_index: 0,
            phase: Phase::Idle,
            offset: Vec2::ZERO,
            settle: None,
        })
    }

    /// Begin a drag. Ignored while a commit is in flight; a drag started
    /// during a snap-back cancels the settle and takes over the card.
    pub fn pointer_down(&mut self, pos: Point) {
        match self.phase {
            Phase::Committing { .. } => {}
            Phase::Idle | Phase::Dragging { .. } => {
                self.settle = None;
                self.phase = Phase::Dragging { origin: pos };
            }
        }
    }

    /// Track a drag. Moves whose vertical component dominates and exceeds
    /// the scroll-intent threshold leave the offset untouched so the host
    /// page can scroll underneath; otherwise the offset follows the
    /// horizontal delta with the vertical component pinned to zero.
    pub fn pointer_move(&mut self, pos: Point) {
        let Phase::Dragging { origin } = self.phase else {
            return;
        };
        let dx = pos.x - origin.x;
        let dy = pos.y - origin.y;
        if dy.abs() > dx.abs() && dy.abs() > self.tuning.scroll_intent_px {
            return;
        }
        self.offset = Vec2::new(dx, 0.0);
    }

    /// End a drag: past the threshold the card commits in the direction of
    /// the offset, otherwise it snaps back to rest.
    pub fn pointer_up(&mut self) {
        if !matches!(self.phase, Phase::Dragging { .. }) {
            return;
        }
        if self.offset.x.abs() > self.tuning.commit_threshold_px {
            let direction = if self.offset.x > 0.0 {
                SwipeDirection::Right
            } else {
                SwipeDirection::Left
            };
            self.begin_commit(direction);
        } else {
            self.settle = Some(Tween::new(
                self.offset,
                Vec2::ZERO,
                self.tuning.snap_back_duration(),
                Ease::OutCubic,
            ));
            self.phase = Phase::Idle;
        }
    }

    /// Programmatic commit, as from a next/previous control. Only honored
    /// from rest so commits never overlap.
    pub fn advance(&mut self, direction: SwipeDirection) {
        if matches!(self.phase, Phase::Idle) {
            self.begin_commit(direction);
        }
    }

    fn begin_commit(&mut self, direction: SwipeDirection) {
        self.settle = None;
        let slide = Tween::new(
            self.offset,
            Vec2::new(direction.signum() * self.tuning.slide_out_px, 0.0),
            self.tuning.commit_duration(),
            Ease::OutCubic,
        );
        tracing::debug!(?direction, from_x = self.offset.x, "deck commit");
        self.phase = Phase::Committing { direction, slide };
    }

    /// Advance animations by one frame interval. When a commit slide lands,
    /// the active index steps forward (wrapping), the offset resets, and
    /// the deck returns to rest in the same tick.
    pub fn tick(&mut self, dt: Duration) {
        match &mut self.phase {
            Phase::Committing { slide, .. } => {
                slide.advance(dt);
                self.offset = slide.value();
                if slide.finished() {
                    self.active_index = (self.active_index + 1) % self.items.len();
                    self.offset = Vec2::ZERO;
                    self.phase = Phase::Idle;
                }
            }
            Phase::Idle => {
                if let Some(settle) = &mut self.settle {
                    settle.advance(dt);
                    self.offset = settle.value();
                    if settle.finished() {
                        self.offset = Vec2::ZERO;
                        self.settle = None;
                    }
                }
            }
            Phase::Dragging { .. } => {}
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_item(&self) -> &T {
        &self.items[self.active_index]
    }

    pub fn next_index(&self) -> usize {
        (self.active_index + 1) % self.items.len()
    }

    pub fn next_item(&self) -> &T {
        &self.items[self.next_index()]
    }

    /// Current drag/animation offset. The vertical component is always zero.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Card tilt, a pure function of the offset.
    pub fn rotation_deg(&self) -> f64 {
        self.offset.x * self.tuning.rotation_deg_per_px
    }

    /// Background card pose, a pure function of the offset.
    pub fn back_card(&self) -> BackCardPose {
        let progress = (self.offset.x.abs() / self.tuning.back_reveal_px).min(1.0);
        BackCardPose {
            scale: 0.9 + 0.1 * progress,
            opacity: 0.6 + 0.4 * progress,
            translate_y: 12.0 * (1.0 - progress),
        }
    }

    pub fn phase(&self) -> DeckPhase {
        match self.phase {
            Phase::Idle => DeckPhase::Idle,
            Phase::Dragging { .. } => DeckPhase::Dragging,
            Phase::Committing { direction, .. } => DeckPhase::Committing(direction),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }
}
