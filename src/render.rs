// Import the simulation types we draw
use crate::config::{Point, SimulationConfig};
use crate::fly::FlyView;

// Image types from the image crate
// Rgba = Red, Green, Blue, Alpha (color with transparency)
// RgbaImage = 2D image with RGBA pixels
use image::{Rgba, RgbaImage};

// Drawing functions from imageproc
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

/// Colors and sizes used to draw a frame
///
/// The defaults are the classic flies palette: grey background,
/// black flies, green goals, 8 pixel flies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderStyle {
    pub background: Rgba<u8>,
    pub fly: Rgba<u8>,
    /// Flies that have used up their moves
    pub dead_fly: Rgba<u8>,
    pub goal: Rgba<u8>,
    /// Side of the square drawn for each fly, in pixels
    pub fly_size: u32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: Rgba([190, 190, 190, 255]),
            fly: Rgba([0, 0, 0, 255]),
            dead_fly: Rgba([90, 90, 90, 255]),
            goal: Rgba([0, 200, 0, 255]),
            fly_size: 8,
        }
    }
}

/// Square of side `size` centred on `center`
///
/// imageproc clips rectangles to the image, so squares hanging over the
/// border are drawn partially instead of panicking.
fn centred_square(center: Point, size: u32) -> Rect {
    let half = (size / 2) as i32;
    Rect::at(center.x - half, center.y - half).of_size(size, size)
}

/// Draw one frame of the simulation
///
/// The canvas is `(width + 1) x (height + 1)` pixels because positions are
/// clamped into the inclusive range `[0, width]`, so a fly sitting on the
/// far edge still lands on a pixel.
///
/// Goals are drawn first so flies stay visible on top of them.
///
/// **Rust Concept: Return types and ownership**
/// - Returns `RgbaImage` (not `&RgbaImage`)
/// - We're creating a new image and transferring ownership to caller
pub fn render_frame(
    config: &SimulationConfig,
    flies: &[FlyView],
    goals: &[Point],
    style: &RenderStyle,
) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(
        config.width as u32 + 1,
        config.height as u32 + 1,
        style.background,
    );

    let goal_size = (config.goal_radius as u32 * 2).max(1);
    for &goal in goals {
        draw_filled_rect_mut(&mut img, centred_square(goal, goal_size), style.goal);
    }

    for fly in flies {
        let color = if fly.alive { style.fly } else { style.dead_fly };
        let center = Point::new(fly.x, fly.y);
        draw_filled_rect_mut(&mut img, centred_square(center, style.fly_size.max(1)), color);
    }

    img
}
