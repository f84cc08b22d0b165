//! # shape-raster
//!
//! Point-sampling rasterizer for 2D vector scenes.
//!
//! A scene is an ordered list of colored primitives (circles, general
//! polygons and convex polygons), each optionally placed by an affine
//! transform. Rasterization walks the integer pixels of every primitive's
//! bounding box and paints the pixel when its center lies inside the shape.
//! There is no anti-aliasing; later primitives overwrite earlier ones.
//!
//! ## Architecture
//!
//! 1. **Geometry**: points, affine transforms, line segments, bounding boxes
//! 2. **Primitives**: `Circle`, `Polygon`, `ConvexPolygon` behind the
//!    [`Geometry`](primitive::Geometry) trait
//! 3. **Raster space**: the fill loop over bounding-box pixels
//! 4. **Scene loading**: JSON scene descriptions (feature `scene`)
//!
//! ```
//! use shape_raster::basics::Point;
//! use shape_raster::circle::Circle;
//! use shape_raster::color::Rgb8;
//! use shape_raster::primitive::Primitive;
//! use shape_raster::raster_space::RasterSpace;
//!
//! let disk = Circle::new(Point::new(100.0, 300.0), 10.0).unwrap();
//! let mut space = RasterSpace::new(200, 600, vec![Primitive::new(disk, Rgb8::RED)]).unwrap();
//! space.rasterize();
//! assert_eq!(space.pixel_at(100, 300), Some(Rgb8::RED));
//! assert_eq!(space.pixel_at(0, 0), Some(Rgb8::WHITE));
//! ```

// Foundation types & math
pub mod basics;
pub mod color;
pub mod error;
pub mod math;

// Geometry
pub mod bounding_box;
pub mod line_segment;
pub mod trans_affine;

// Primitives
pub mod circle;
pub mod polygon;
pub mod primitive;

// Rasterization
pub mod raster_space;
pub mod rendering_buffer;

// Scene loading
#[cfg(feature = "scene")]
pub mod scene;

pub use error::{Error, Result};
