use crate::config::WorldBounds;
use crate::engine::{Point, Rect, Size};
use crate::session::{GameSession, Position, WinSnapshot};
use rand::Rng;

// restart button : restart.png drawn at half size, 100px below the middle
const BUTTON_OFFSET_Y: f32 = 100.0;
pub const BUTTON_SCALE: f32 = 0.5;

/// Terminal screen shown after the winning hotdog. It only reads the
/// snapshot; the one thing it can do is send the player back into a fresh
/// session.
#[derive(Debug, Clone, PartialEq)]
pub struct WinScreen {
    snapshot: WinSnapshot,
}

impl WinScreen {
    pub fn enter(snapshot: WinSnapshot) -> Self {
        log!("You win! score {}", snapshot.score);
        WinScreen { snapshot }
    }

    /// Resets the session in place. The caller swaps the play scene back in.
    pub fn on_restart_requested<R: Rng>(&self, session: &mut GameSession<R>) {
        session.restart();
    }

    pub fn score(&self) -> u32 {
        self.snapshot.score
    }

    pub fn item_history(&self) -> &[Position] {
        &self.snapshot.item_history
    }

    pub fn snapshot(&self) -> &WinSnapshot {
        &self.snapshot
    }

    pub fn button_center(bounds: &WorldBounds) -> Point {
        Point {
            x: bounds.width / 2.0,
            y: bounds.height / 2.0 + BUTTON_OFFSET_Y,
        }
    }

    /// Where the restart button is, given the unscaled image size
    pub fn restart_button(bounds: &WorldBounds, image_size: Size) -> Rect {
        Rect::centered_at(
            Self::button_center(bounds),
            Size {
                width: image_size.width * BUTTON_SCALE,
                height: image_size.height * BUTTON_SCALE,
            },
        )
    }
}
