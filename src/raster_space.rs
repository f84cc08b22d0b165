//! Raster space: drives containment tests over a scene and fills the
//! output buffer.
//!
//! Shape space has its Y axis pointing up; the output image has row 0 at
//! the top. Pixel `(x, y)` in shape space lands in image row
//! `height - 1 - y`.

use crate::basics::Point;
use crate::color::Rgb8;
use crate::error::{Error, Result};
use crate::primitive::{Geometry, Primitive};
use crate::rendering_buffer::RenderingBuffer;

// ============================================================================
// Configuration and statistics
// ============================================================================

/// Rasterization settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterConfig {
    /// Color of every pixel no primitive covers.
    pub background: Rgb8,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            background: Rgb8::WHITE,
        }
    }
}

/// Counters gathered by one [`RasterSpace::rasterize`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RasterStats {
    /// Primitives visited.
    pub primitives: usize,
    /// Pixel centers passed to `contains`.
    pub pixels_tested: u64,
    /// Pixel writes, counting overdraw.
    pub pixels_painted: u64,
}

// ============================================================================
// RasterSpace
// ============================================================================

/// A canvas together with the ordered scene painted onto it.
///
/// Later primitives overwrite earlier ones; there is no blending.
#[derive(Debug, Clone)]
pub struct RasterSpace {
    scene: Vec<Primitive>,
    config: RasterConfig,
    buf: RenderingBuffer,
}

impl RasterSpace {
    /// Canvas of `width` x `height` pixels on a white background.
    pub fn new(width: u32, height: u32, scene: Vec<Primitive>) -> Result<Self> {
        Self::with_config(width, height, scene, RasterConfig::default())
    }

    pub fn with_config(
        width: u32,
        height: u32,
        scene: Vec<Primitive>,
        config: RasterConfig,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyCanvas { width, height });
        }
        Ok(Self {
            scene,
            config,
            buf: RenderingBuffer::new(width, height, config.background),
        })
    }

    pub fn width(&self) -> u32 {
        self.buf.width()
    }

    pub fn height(&self) -> u32 {
        self.buf.height()
    }

    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    pub fn scene(&self) -> &[Primitive] {
        &self.scene
    }

    /// Paint every primitive in scene order.
    ///
    /// The buffer is reset to the background first, so repeated calls
    /// produce the same image. Each primitive is tested only at the pixel
    /// centers of its bounding box that fall on the canvas.
    pub fn rasterize(&mut self) -> RasterStats {
        let width = self.buf.width();
        let height = self.buf.height();
        self.buf.clear(self.config.background);

        let mut stats = RasterStats::default();
        for (index, prim) in self.scene.iter().enumerate() {
            let pixels = prim.bounding_box().pixels().clip(width, height);
            let tested = pixels.count_total();
            let mut painted = 0u64;

            for (x, y) in pixels {
                let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                if prim.contains(center) {
                    // Clipped above, so both coordinates are on the canvas.
                    let row = height - 1 - y as u32;
                    if self.buf.copy_pixel(x as u32, row, prim.color) {
                        painted += 1;
                    }
                }
            }

            log::debug!(
                "primitive {index} ({}): bbox {:?}, {tested} pixels tested, {painted} painted",
                prim.kind(),
                prim.bounding_box(),
            );
            stats.primitives += 1;
            stats.pixels_tested += tested;
            stats.pixels_painted += painted;
        }

        log::info!(
            "rasterized {} primitives on {width}x{height}: {} pixels tested, {} painted",
            stats.primitives,
            stats.pixels_tested,
            stats.pixels_painted,
        );
        stats
    }

    /// The output image, row-major, top row first.
    pub fn image(&self) -> &RenderingBuffer {
        &self.buf
    }

    pub fn into_image(self) -> RenderingBuffer {
        self.buf
    }

    /// Color of pixel `(x, y)` in shape space (Y up), or `None` off the
    /// canvas.
    pub fn pixel_at(&self, x: u32, y: u32) -> Option<Rgb8> {
        if y >= self.buf.height() {
            return None;
        }
        self.buf.pixel(x, self.buf.height() - 1 - y)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circle::Circle;
    use crate::polygon::{ConvexPolygon, Polygon};
    use crate::trans_affine::TransAffine;

    fn circle(x: f64, y: f64, r: f64, color: Rgb8) -> Primitive {
        Primitive::new(Circle::new(Point::new(x, y), r).unwrap(), color)
    }

    fn pts(v: &[(f64, f64)]) -> Vec<Point> {
        v.iter().copied().map(Point::from).collect()
    }

    #[test]
    fn test_empty_canvas_rejected() {
        assert!(matches!(
            RasterSpace::new(0, 10, Vec::new()),
            Err(Error::EmptyCanvas {
                width: 0,
                height: 10
            })
        ));
        assert!(RasterSpace::new(10, 0, Vec::new()).is_err());
    }

    #[test]
    fn test_empty_scene_is_background() {
        let mut rs = RasterSpace::new(8, 4, Vec::new()).unwrap();
        let stats = rs.rasterize();
        assert_eq!(stats, RasterStats::default());
        assert_eq!(rs.image().count_color(Rgb8::WHITE), 32);
    }

    #[test]
    fn test_circle_scenario() {
        let mut rs =
            RasterSpace::new(200, 600, vec![circle(100.0, 300.0, 10.0, Rgb8::RED)]).unwrap();
        let stats = rs.rasterize();
        assert_eq!(stats.primitives, 1);
        assert_eq!(stats.pixels_tested, 21 * 21);

        let mut expected = 0;
        for x in 0..200u32 {
            for y in 0..600u32 {
                let inside_square = (90..=110).contains(&x) && (290..=310).contains(&y);
                let px = rs.pixel_at(x, y).unwrap();
                if !inside_square {
                    assert_eq!(px, Rgb8::WHITE, "({x}, {y}) outside the square");
                    continue;
                }
                let dx = x as f64 + 0.5 - 100.0;
                let dy = y as f64 + 0.5 - 300.0;
                let inside = dx.hypot(dy) <= 10.0;
                assert_eq!(px == Rgb8::RED, inside, "({x}, {y})");
                if inside {
                    expected += 1;
                }
            }
        }
        assert_eq!(stats.pixels_painted, expected);
        assert_eq!(rs.pixel_at(100, 300), Some(Rgb8::RED));
    }

    #[test]
    fn test_triangle_scenario() {
        let tri = ConvexPolygon::new(pts(&[(50.0, 50.0), (100.0, 50.0), (100.0, 100.0)])).unwrap();
        let mut rs = RasterSpace::new(200, 200, vec![Primitive::new(tri, Rgb8::BLUE)]).unwrap();
        rs.rasterize();
        assert_eq!(rs.pixel_at(90, 60), Some(Rgb8::BLUE));
        assert_eq!(rs.pixel_at(51, 99), Some(Rgb8::WHITE));
    }

    #[test]
    fn test_l_shape_notch_left_empty() {
        let l = Polygon::new(pts(&[
            (0.0, 0.0),
            (40.0, 0.0),
            (40.0, 10.0),
            (10.0, 10.0),
            (10.0, 40.0),
            (0.0, 40.0),
        ]))
        .unwrap();
        let mut rs = RasterSpace::new(50, 50, vec![Primitive::new(l, Rgb8::GREEN)]).unwrap();
        rs.rasterize();
        assert_eq!(rs.pixel_at(35, 5), Some(Rgb8::GREEN));
        assert_eq!(rs.pixel_at(5, 35), Some(Rgb8::GREEN));
        assert_eq!(rs.pixel_at(25, 25), Some(Rgb8::WHITE));
        assert_eq!(rs.pixel_at(39, 39), Some(Rgb8::WHITE));
        // 40x10 + 10x30 pixels.
        assert_eq!(rs.image().count_color(Rgb8::GREEN), 700);
    }

    #[test]
    fn test_y_axis_flip() {
        let square = Polygon::new(pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])).unwrap();
        let mut rs = RasterSpace::new(3, 3, vec![Primitive::new(square, Rgb8::BLACK)]).unwrap();
        rs.rasterize();
        // Shape-space (0, 0) is the bottom-left image pixel.
        assert_eq!(rs.image().pixel(0, 2), Some(Rgb8::BLACK));
        assert_eq!(rs.image().pixel(0, 0), Some(Rgb8::WHITE));
        assert_eq!(rs.pixel_at(0, 0), Some(Rgb8::BLACK));
        assert_eq!(rs.pixel_at(0, 3), None);
    }

    #[test]
    fn test_clips_to_canvas() {
        let mut rs = RasterSpace::new(10, 10, vec![circle(0.0, 0.0, 5.0, Rgb8::RED)]).unwrap();
        let stats = rs.rasterize();
        // Bounding box covers -5..=5 on both axes; only 0..=5 is on the canvas.
        assert_eq!(stats.pixels_tested, 36);

        let mut expected = 0;
        for x in 0..10 {
            for y in 0..10 {
                if (x as f64 + 0.5).hypot(y as f64 + 0.5) <= 5.0 {
                    expected += 1;
                }
            }
        }
        assert_eq!(stats.pixels_painted, expected);
        assert_eq!(rs.image().count_color(Rgb8::RED) as u64, expected);
    }

    #[test]
    fn test_fully_off_canvas_primitive() {
        let mut rs = RasterSpace::new(10, 10, vec![circle(-50.0, 500.0, 5.0, Rgb8::RED)]).unwrap();
        let stats = rs.rasterize();
        assert_eq!(stats.pixels_tested, 0);
        assert_eq!(stats.pixels_painted, 0);
        assert_eq!(rs.image().count_color(Rgb8::WHITE), 100);
    }

    #[test]
    fn test_later_primitives_overwrite() {
        let scene = vec![
            circle(5.0, 5.0, 4.0, Rgb8::RED),
            circle(5.0, 5.0, 2.0, Rgb8::BLUE),
        ];
        let mut rs = RasterSpace::new(10, 10, scene).unwrap();
        let stats = rs.rasterize();
        assert_eq!(rs.pixel_at(5, 5), Some(Rgb8::BLUE));
        assert_eq!(rs.pixel_at(5, 8), Some(Rgb8::RED));
        let distinct = rs.image().count_color(Rgb8::RED) + rs.image().count_color(Rgb8::BLUE);
        assert!(stats.pixels_painted > distinct as u64);
    }

    #[test]
    fn test_background_config_and_repeat() {
        let config = RasterConfig {
            background: Rgb8::gray(40),
        };
        let mut rs =
            RasterSpace::with_config(6, 6, vec![circle(3.0, 3.0, 1.0, Rgb8::RED)], config)
                .unwrap();
        let first = rs.rasterize();
        let image = rs.image().clone();
        let second = rs.rasterize();
        assert_eq!(first, second);
        assert_eq!(*rs.image(), image);
        assert_eq!(rs.pixel_at(0, 0), Some(Rgb8::gray(40)));
    }

    #[test]
    fn test_transformed_circle_is_ellipse() {
        let mut prim = circle(0.0, 0.0, 5.0, Rgb8::RED);
        let mut m = TransAffine::new_scaling(3.0, 1.0);
        m *= TransAffine::new_translation(20.0, 10.0);
        prim.transform(&m).unwrap();
        let mut rs = RasterSpace::new(40, 20, vec![prim]).unwrap();
        rs.rasterize();
        assert_eq!(rs.pixel_at(33, 10), Some(Rgb8::RED));
        assert_eq!(rs.pixel_at(20, 16), Some(Rgb8::WHITE));
    }
}
