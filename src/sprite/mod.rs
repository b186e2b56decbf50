use crate::engine::{Point, Rect, Size};

// sans.png, 25 x 32 per frame
// +-------+----------+-------------+--------------+----------+
// | frame | 0        | 1 2 3 4     | 5 6 7 8      | 9        |
// | state | Standing | WalkingLeft | WalkingRight | Spinning |
// | rate  | still    | 10 fps loop | 10 fps loop  | still    |
// +-------+----------+-------------+--------------+----------+
pub mod player;
pub mod state;

// update steps per second, the game loop's fixed step
pub const TICKS_PER_SECOND: u32 = 60;

/// Where a state's animation lives on the sheet
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SpriteMetadata {
    pub first_frame: u32,
    pub frame_count: u32,
    pub frames_per_second: u32,
}

pub trait SpriteState {
    fn name() -> &'static str;
    fn metadata() -> SpriteMetadata;

    fn total_frames() -> u32 {
        Self::metadata().frame_count
    }

    /// Sheet index to show `ticks` update steps after entering the state
    fn frame_index(ticks: u32) -> u32 {
        let meta = Self::metadata();
        if meta.frame_count <= 1 || meta.frames_per_second == 0 {
            return meta.first_frame;
        }
        let advanced = ticks * meta.frames_per_second / TICKS_PER_SECOND;
        meta.first_frame + advanced % meta.frame_count
    }
}

#[derive(Debug, Copy, Clone)]
pub struct Standing;
#[derive(Debug, Copy, Clone)]
pub struct WalkingLeft;
#[derive(Debug, Copy, Clone)]
pub struct WalkingRight;
#[derive(Debug, Copy, Clone)]
pub struct Spinning;

impl SpriteState for Standing {
    fn name() -> &'static str {
        "MCstand"
    }

    fn metadata() -> SpriteMetadata {
        SpriteMetadata {
            first_frame: 0,
            frame_count: 1,
            frames_per_second: 0,
        }
    }
}

impl SpriteState for WalkingLeft {
    fn name() -> &'static str {
        "MCleft"
    }

    fn metadata() -> SpriteMetadata {
        SpriteMetadata {
            first_frame: 1,
            frame_count: 4,
            frames_per_second: 10,
        }
    }
}

impl SpriteState for WalkingRight {
    fn name() -> &'static str {
        "MCright"
    }

    fn metadata() -> SpriteMetadata {
        SpriteMetadata {
            first_frame: 5,
            frame_count: 4,
            frames_per_second: 10,
        }
    }
}

impl SpriteState for Spinning {
    fn name() -> &'static str {
        "MCspin"
    }

    fn metadata() -> SpriteMetadata {
        SpriteMetadata {
            first_frame: 9,
            frame_count: 1,
            frames_per_second: 10,
        }
    }
}

/// Grid spritesheet : equally sized frames, left to right then top to bottom
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpriteSheet {
    pub frame_size: Size,
    pub columns: u32,
}

impl SpriteSheet {
    pub const PLAYER_FRAME: Size = Size {
        width: 25.0,
        height: 32.0,
    };

    /// columns come from the image width, at least one
    pub fn new(frame_size: Size, image_width: f32) -> Self {
        let columns = if frame_size.width > 0.0 {
            (image_width / frame_size.width).floor().max(1.0) as u32
        } else {
            1
        };
        SpriteSheet {
            frame_size,
            columns,
        }
    }

    pub fn frame(&self, index: u32) -> Rect {
        let column = index % self.columns;
        let row = index / self.columns;
        Rect::new(
            Point {
                x: column as f32 * self.frame_size.width,
                y: row as f32 * self.frame_size.height,
            },
            self.frame_size,
        )
    }
}
