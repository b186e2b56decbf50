use crate::config::WorldBounds;
use crate::engine::{Point, Rect, Size};
use once_cell::sync::Lazy;

// ==================== Platform Layout ====================
// 4 rows x 5 columns of ledges plus one in the middle of the floor
//
//   y=50  ▬▬   ▬▬   ▬▬   ▬▬   ▬▬
//   y=150 ▬▬   ▬▬   ▬▬   ▬▬   ▬▬
//   y=250 ▬▬   ▬▬   ▬▬   ▬▬   ▬▬
//   y=350 ▬▬   ▬▬   ▬▬   ▬▬   ▬▬
//                  ▬▬               <- height - 16
//        x=100 300  500  700  900
const ROWS: usize = 4;
const COLUMNS: usize = 5;
const FIRST_X: f32 = 100.0;
const COLUMN_SPACING: f32 = 200.0;
const BOTTOM_ROW_Y: f32 = 350.0;
const ROW_SPACING: f32 = 100.0;
const MIDDLE_PLATFORM_LIFT: f32 = 16.0;

static LEDGE_CENTERS: Lazy<Vec<Point>> = Lazy::new(|| {
    (0..ROWS)
        .flat_map(|row| {
            (0..COLUMNS).map(move |column| Point {
                x: FIRST_X + column as f32 * COLUMN_SPACING,
                y: BOTTOM_ROW_Y - row as f32 * ROW_SPACING,
            })
        })
        .collect()
});

/// Centres of every platform, the middle floor platform last
pub fn platform_centers(bounds: &WorldBounds) -> impl Iterator<Item = Point> {
    let middle = Point {
        x: bounds.width / 2.0,
        y: bounds.height - MIDDLE_PLATFORM_LIFT,
    };
    LEDGE_CENTERS.iter().copied().chain(std::iter::once(middle))
}

/// Static level geometry the player collides with
#[derive(Debug, Clone)]
pub struct World {
    bounds: WorldBounds,
    platforms: Vec<Rect>,
}

impl World {
    pub fn new(bounds: WorldBounds, platform_size: Size) -> Self {
        let platforms = platform_centers(&bounds)
            .map(|center| Rect::centered_at(center, platform_size))
            .collect();
        World { bounds, platforms }
    }

    pub fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    pub fn platforms(&self) -> &[Rect] {
        &self.platforms
    }

    /// Keep a box inside the world, returns which edges it was pushed off
    /// (left/right, top, bottom)
    pub fn clamp(&self, rect: &mut Rect) -> Clamped {
        let mut clamped = Clamped::default();
        if rect.x() < 0.0 {
            rect.position.x = 0.0;
            clamped.horizontal = true;
        } else if rect.right() > self.bounds.width {
            rect.position.x = self.bounds.width - rect.size.width;
            clamped.horizontal = true;
        }
        if rect.y() < 0.0 {
            rect.position.y = 0.0;
            clamped.top = true;
        } else if rect.bottom() > self.bounds.height {
            rect.position.y = self.bounds.height - rect.size.height;
            clamped.bottom = true;
        }
        clamped
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Clamped {
    pub horizontal: bool,
    pub top: bool,
    pub bottom: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLATFORM: Size = Size {
        width: 100.0,
        height: 20.0,
    };

    #[test]
    fn layout_has_twenty_one_platforms() {
        let world = World::new(WorldBounds::default(), PLATFORM);
        assert_eq!(world.platforms().len(), 21);
    }

    #[test]
    fn ledges_follow_the_grid() {
        let centers: Vec<Point> = platform_centers(&WorldBounds::default()).collect();
        assert_eq!(centers[0], Point::new(100.0, 350.0));
        assert_eq!(centers[4], Point::new(900.0, 350.0));
        assert_eq!(centers[5], Point::new(100.0, 250.0));
        assert_eq!(centers[19], Point::new(900.0, 50.0));
    }

    #[test]
    fn middle_platform_sits_on_the_floor() {
        let centers: Vec<Point> = platform_centers(&WorldBounds::default()).collect();
        assert_eq!(centers.len(), 21);
        assert_eq!(centers.last(), Some(&Point::new(400.0, 384.0)));
    }

    #[test]
    fn clamp_pushes_back_inside() {
        let world = World::new(WorldBounds::default(), PLATFORM);
        let mut rect = Rect::new_from_x_y(-5.0, 390.0, 25.0, 32.0);
        let clamped = world.clamp(&mut rect);
        assert_eq!(rect.position, Point::new(0.0, 368.0));
        assert!(clamped.horizontal);
        assert!(clamped.bottom);
        assert!(!clamped.top);
    }
}
