use crate::core::{Fps, Viewport};
use crate::deck::DeckTuning;
use crate::error::{InkwashError, InkwashResult};

/// Straight-alpha paper tone the stage is cleared to each frame.
pub const PAPER_RGBA: [u8; 4] = [253, 251, 247, 255];

/// Top-level description of a stage: viewport and timing, the seed for the
/// procedural grove, and the content the swipe deck cycles through.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct StageSpec {
    pub viewport: Viewport,
    pub fps: Fps,
    /// Seed for the grove population. Equal seeds and viewports yield
    /// identical stalks.
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_background")]
    pub background_rgba: [u8; 4],
    /// Whether the host device has pointer hover. Touch-primary hosts set
    /// this false and the ink trail stays inert.
    #[serde(default = "default_pointer_hover")]
    pub pointer_hover: bool,
    #[serde(default)]
    pub deck: DeckTuning,
    pub deck_items: Vec<String>,
}

fn default_background() -> [u8; 4] {
    PAPER_RGBA
}

fn default_pointer_hover() -> bool {
    true
}

/// The demo stage: a 960x540 paper-toned grove at 60fps with a three-card
/// deck of brush aphorisms.
impl Default for StageSpec {
    fn default() -> Self {
        Self {
            viewport: Viewport {
                width: 960.0,
                height: 540.0,
                dpr: 1.0,
            },
            fps: Fps { num: 60, den: 1 },
            seed: 7,
            background_rgba: PAPER_RGBA,
            pointer_hover: true,
            deck: DeckTuning::default(),
            deck_items: vec![
                "Stillness is a kind of motion".to_string(),
                "The brush remembers the hand".to_string(),
                "Ink settles where the water goes".to_string(),
            ],
        }
    }
}

impl StageSpec {
    pub fn validate(&self) -> InkwashResult<()> {
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(InkwashError::validation("fps must have num>0 and den>0"));
        }
        if !self.viewport.width.is_finite() || self.viewport.width < 0.0 {
            return Err(InkwashError::validation(
                "viewport.width must be finite and >= 0",
            ));
        }
        if !self.viewport.height.is_finite() || self.viewport.height < 0.0 {
            return Err(InkwashError::validation(
                "viewport.height must be finite and >= 0",
            ));
        }
        if !self.viewport.dpr.is_finite() || self.viewport.dpr <= 0.0 {
            return Err(InkwashError::validation(
                "viewport.dpr must be finite and > 0",
            ));
        }
        if self.deck_items.is_empty() {
            return Err(InkwashError::validation("deck_items must not be empty"));
        }
        self.deck.validate()?;
        Ok(())
    }
}
