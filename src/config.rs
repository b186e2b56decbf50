use crate::engine::FRAME_SIZE;
use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

// ==================== Game Config ====================
/// Everything tunable about a run of the game, grouped the way the code uses
/// it:
/// - `world`   : size of the playfield (item placement + world bounds)
/// - `session` : score / timer bookkeeping
/// - `physics` : how the player moves
///
/// Every field has a default, so a partial `config.json` is fine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldBounds,
    pub session: SessionConfig,
    pub physics: PhysicsConfig,
}

impl GameConfig {
    /// Parse and validate, see `validate`
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GameConfig =
            serde_json::from_str(json).context("Failed to parse game config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the session can't run with:
    /// - a reposition delay shorter than one frame (or not a number)
    /// - a negative grace window
    /// - a win threshold of 0
    /// - an empty world
    pub fn validate(&self) -> Result<()> {
        let session = &self.session;
        ensure!(
            session.reposition_delay_ms >= f64::from(FRAME_SIZE),
            "reposition_delay_ms must be at least one frame ({} ms), got {}",
            FRAME_SIZE,
            session.reposition_delay_ms
        );
        ensure!(
            session.grace_ms >= 0.0,
            "grace_ms must not be negative, got {}",
            session.grace_ms
        );
        ensure!(session.win_threshold >= 1, "win_threshold must be at least 1");
        ensure!(
            self.world.width > 0.0 && self.world.height > 0.0,
            "world must have a positive size, got {} x {}",
            self.world.width,
            self.world.height
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldBounds {
    fn default() -> Self {
        WorldBounds {
            width: 800.0,
            height: 400.0,
        }
    }
}

impl WorldBounds {
    /// inclusive on both edges, like the placement policy
    pub fn contains(&self, x: f32, y: f32) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// D : how long an uncollected hotdog stays put
    pub reposition_delay_ms: f64,
    /// G : timer suspension right after a collection
    pub grace_ms: f64,
    pub win_threshold: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            reposition_delay_ms: 5000.0,
            grace_ms: 1000.0,
            win_threshold: 10,
        }
    }
}

/// Speeds are per second, angles in degrees. The player update converts
/// them to per-step values.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub run_speed: f32,
    pub jump_speed: f32,
    pub spin_speed: f32,
    /// player centre below this line means they fell off the platforms
    pub fall_limit: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            gravity: 300.0,
            run_speed: 160.0,
            jump_speed: 260.0,
            spin_speed: 350.0,
            fall_limit: 380.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let config = GameConfig::from_json("{}").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config =
            GameConfig::from_json(r#"{ "session": { "win_threshold": 3 }, "world": { "width": 640 } }"#)
                .unwrap();
        assert_eq!(config.session.win_threshold, 3);
        assert_eq!(config.session.reposition_delay_ms, 5000.0);
        assert_eq!(config.world.width, 640.0);
        assert_eq!(config.world.height, 400.0);
        assert_eq!(config.physics, PhysicsConfig::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = GameConfig::from_json("{ nope").unwrap_err();
        assert!(err.to_string().contains("game config"));
    }

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    fn with_session(session: SessionConfig) -> GameConfig {
        GameConfig {
            session,
            ..GameConfig::default()
        }
    }

    #[test]
    fn delay_shorter_than_a_frame_is_rejected() {
        for delay in [0.001, 0.0, -5.0, f64::NAN] {
            let config = with_session(SessionConfig {
                reposition_delay_ms: delay,
                ..SessionConfig::default()
            });
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("reposition_delay_ms"), "{}", err);
        }
        let one_frame = with_session(SessionConfig {
            reposition_delay_ms: f64::from(FRAME_SIZE),
            ..SessionConfig::default()
        });
        assert!(one_frame.validate().is_ok());
    }

    #[test]
    fn negative_grace_is_rejected() {
        let config = with_session(SessionConfig {
            grace_ms: -1.0,
            ..SessionConfig::default()
        });
        assert!(config.validate().is_err());

        let no_grace = with_session(SessionConfig {
            grace_ms: 0.0,
            ..SessionConfig::default()
        });
        assert!(no_grace.validate().is_ok());
    }

    #[test]
    fn zero_win_threshold_is_rejected() {
        let config = with_session(SessionConfig {
            win_threshold: 0,
            ..SessionConfig::default()
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("win_threshold"));
    }

    #[test]
    fn empty_world_is_rejected() {
        for (width, height) in [(0.0, 400.0), (800.0, -1.0), (f32::NAN, 400.0)] {
            let config = GameConfig {
                world: WorldBounds { width, height },
                ..GameConfig::default()
            };
            assert!(config.validate().is_err(), "{} x {}", width, height);
        }
    }

    #[test]
    fn from_json_validates() {
        let err = GameConfig::from_json(r#"{ "session": { "reposition_delay_ms": 0.001 } }"#)
            .unwrap_err();
        assert!(err.to_string().contains("reposition_delay_ms"));
        assert!(GameConfig::from_json(r#"{ "session": { "win_threshold": 0 } }"#).is_err());
    }

    #[test]
    fn bounds_are_inclusive() {
        let bounds = WorldBounds::default();
        assert!(bounds.contains(0.0, 0.0));
        assert!(bounds.contains(800.0, 400.0));
        assert!(!bounds.contains(800.5, 10.0));
        assert!(!bounds.contains(10.0, -1.0));
    }
}
