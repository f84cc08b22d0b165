//! JSON scene descriptions.
//!
//! ```json
//! { "width": 200, "height": 600,
//!   "scene": [
//!     { "shape": "circle", "center": [100, 300], "radius": 10, "color": [255, 0, 0] },
//!     { "shape": "triangle", "vertices": [[50, 50], [100, 50], [100, 100]],
//!       "color": [0, 0, 255], "xform": [[1, 0, 10], [0, 1, 0], [0, 0, 1]] }
//!   ] }
//! ```
//!
//! Every record must build, or the whole scene is rejected.

use std::io::Read;

use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};
use crate::primitive::{Primitive, ShapeRecord};
use crate::raster_space::{RasterConfig, RasterSpace};

/// Canvas size plus the ordered shape records to paint on it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SceneDescription {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub scene: Vec<ShapeRecord>,
}

impl SceneDescription {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Build every record in order.
    ///
    /// The first failing record aborts with [`Error::Record`] carrying its
    /// index.
    pub fn primitives(&self) -> Result<Vec<Primitive>> {
        self.scene
            .iter()
            .enumerate()
            .map(|(index, record)| {
                log::trace!("scene record {index}: {record:?}");
                Primitive::from_record(record).map_err(|e| Error::Record {
                    index,
                    source: Box::new(e),
                })
            })
            .collect()
    }

    pub fn into_raster_space(self) -> Result<RasterSpace> {
        self.into_raster_space_with(RasterConfig::default())
    }

    pub fn into_raster_space_with(self, config: RasterConfig) -> Result<RasterSpace> {
        let primitives = self.primitives()?;
        log::debug!(
            "loaded {} primitives for a {}x{} canvas",
            primitives.len(),
            self.width,
            self.height
        );
        RasterSpace::with_config(self.width, self.height, primitives, config)
    }
}

/// Accept any JSON value for a numeric field. Non-numbers become NaN so the
/// shape constructor rejects them as malformed parameters.
pub(crate) fn lenient_number<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.map(|v| v.as_f64().unwrap_or(f64::NAN)))
}

// ============================================================================
// Tests
// ============================================================================
