//! Opaque 8-bit RGB color.
//!
//! Rasterization writes colors without blending, so there is no alpha
//! channel: a later primitive simply replaces the pixel.

/// RGB color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "scene", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "scene", serde(from = "[u8; 3]", into = "[u8; 3]"))]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Rgb8 = Rgb8::new(0, 0, 0);
    pub const WHITE: Rgb8 = Rgb8::new(255, 255, 255);
    pub const RED: Rgb8 = Rgb8::new(255, 0, 0);
    pub const GREEN: Rgb8 = Rgb8::new(0, 255, 0);
    pub const BLUE: Rgb8 = Rgb8::new(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Gray level with all three channels equal.
    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v)
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from(c: [u8; 3]) -> Self {
        Rgb8::new(c[0], c[1], c[2])
    }
}

impl From<Rgb8> for [u8; 3] {
    fn from(c: Rgb8) -> Self {
        c.to_array()
    }
}

impl std::str::FromStr for Rgb8 {
    type Err = String;

    /// Parse `"r,g,b"` (decimal) or `"#rrggbb"` (hex).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(format!("expected #rrggbb, got '{s}'"));
            }
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .map_err(|e| format!("bad hex channel in '{s}': {e}"))
            };
            return Ok(Rgb8::new(channel(0)?, channel(2)?, channel(4)?));
        }

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(format!("expected r,g,b, got '{s}'"));
        }
        let mut c = [0u8; 3];
        for (dst, part) in c.iter_mut().zip(&parts) {
            *dst = part
                .parse()
                .map_err(|e| format!("bad channel '{part}' in '{s}': {e}"))?;
        }
        Ok(Rgb8::from(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(Rgb8::WHITE, Rgb8::gray(255));
        assert_eq!(Rgb8::BLACK, Rgb8::default());
        assert_eq!(Rgb8::RED.to_array(), [255, 0, 0]);
    }

    #[test]
    fn test_array_round_trip() {
        let c = Rgb8::from([12, 34, 56]);
        assert_eq!(c, Rgb8::new(12, 34, 56));
        let a: [u8; 3] = c.into();
        assert_eq!(a, [12, 34, 56]);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!("10, 20,30".parse::<Rgb8>(), Ok(Rgb8::new(10, 20, 30)));
        assert!("10,20".parse::<Rgb8>().is_err());
        assert!("10,20,300".parse::<Rgb8>().is_err());
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!("#ff8000".parse::<Rgb8>(), Ok(Rgb8::new(255, 128, 0)));
        assert!("#ff80".parse::<Rgb8>().is_err());
        assert!("#gg0000".parse::<Rgb8>().is_err());
    }
}
