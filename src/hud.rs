use crate::engine::{Point, Renderer, TextStyle};

const SCORE_POSITION: Point = Point { x: 16.0, y: 16.0 };
const SCORE_FONT: &str = "32px sans-serif";
const INSTRUCTION_FONT: &str = "12px sans-serif";
const INSTRUCTION_TEXT: &str = "Use as setas do teclado para se mexer";
const WHITE: &str = "#fff";
const YELLOW: &str = "#ff0";

// flash tween : alpha 1.0 -> 0.1 over 800ms, cut off when the grace window ends
const FLASH_FADE_MS: f64 = 800.0;
const FLASH_MIN_ALPHA: f64 = 0.1;

/// Fading yellow highlight on the score after a collection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreFlash {
    elapsed_ms: f64,
    stop_after_ms: f64,
}

impl ScoreFlash {
    pub fn new(stop_after_ms: f64) -> Self {
        ScoreFlash {
            elapsed_ms: 0.0,
            stop_after_ms,
        }
    }

    /// false once the flash is over and can be dropped
    pub fn update(&mut self, dt_ms: f64) -> bool {
        self.elapsed_ms += dt_ms;
        self.elapsed_ms < self.stop_after_ms
    }

    pub fn alpha(&self) -> f64 {
        let progress = (self.elapsed_ms / FLASH_FADE_MS).min(1.0);
        1.0 + (FLASH_MIN_ALPHA - 1.0) * progress
    }
}

pub struct Hud {
    score: u32,
    flash: Option<ScoreFlash>,
    show_instructions: bool,
    width: f32,
}

impl Hud {
    pub fn new(width: f32) -> Self {
        Hud {
            score: 0,
            flash: None,
            show_instructions: true,
            width,
        }
    }

    /// A hotdog was collected : new score, flash, and the hint goes away
    pub fn on_collect(&mut self, score: u32, grace_ms: f64) {
        self.score = score;
        self.flash = Some(ScoreFlash::new(grace_ms));
        self.show_instructions = false;
    }

    pub fn update(&mut self, dt_ms: f64) {
        if let Some(flash) = self.flash.as_mut() {
            if !flash.update(dt_ms) {
                self.flash = None;
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Hud::new(self.width);
    }

    pub fn score_text(&self) -> String {
        format!("Score: {}", self.score)
    }

    /// (color, alpha) the score should be drawn with right now
    pub fn score_look(&self) -> (&'static str, f64) {
        match self.flash {
            Some(flash) => (YELLOW, flash.alpha()),
            None => (WHITE, 1.0),
        }
    }

    pub fn shows_instructions(&self) -> bool {
        self.show_instructions
    }

    pub fn draw(&self, renderer: &Renderer) {
        let (color, alpha) = self.score_look();
        renderer.draw_text(
            &self.score_text(),
            SCORE_POSITION,
            &TextStyle {
                font: SCORE_FONT.to_string(),
                color,
                alpha,
                ..TextStyle::default()
            },
        );
        if self.show_instructions {
            renderer.draw_text(
                INSTRUCTION_TEXT,
                Point {
                    x: self.width / 2.0,
                    y: 10.0,
                },
                &TextStyle {
                    font: INSTRUCTION_FONT.to_string(),
                    align: "center",
                    ..TextStyle::default()
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn flash_fades_then_holds() {
        let mut flash = ScoreFlash::new(1000.0);
        assert_relative_eq!(flash.alpha(), 1.0);
        flash.update(400.0);
        assert_relative_eq!(flash.alpha(), 0.55);
        flash.update(400.0);
        assert_relative_eq!(flash.alpha(), 0.1);
        assert!(flash.update(100.0));
        assert_relative_eq!(flash.alpha(), 0.1);
        assert!(!flash.update(100.0));
    }

    #[test]
    fn collect_flashes_yellow_until_grace_ends() {
        let mut hud = Hud::new(800.0);
        assert!(hud.shows_instructions());
        hud.on_collect(1, 1000.0);
        assert_eq!(hud.score_text(), "Score: 1");
        assert_eq!(hud.score_look().0, "#ff0");
        assert!(!hud.shows_instructions());

        hud.update(999.0);
        assert_eq!(hud.score_look().0, "#ff0");
        hud.update(1.0);
        assert_eq!(hud.score_look(), ("#fff", 1.0));
    }

    #[test]
    fn reset_brings_back_instructions() {
        let mut hud = Hud::new(800.0);
        hud.on_collect(4, 1000.0);
        hud.reset();
        assert_eq!(hud.score_text(), "Score: 0");
        assert!(hud.shows_instructions());
    }
}
