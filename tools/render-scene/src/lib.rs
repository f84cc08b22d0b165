//! Image I/O and pixel comparison for rendered scenes.
//!
//! Provides buffer comparison, BMP and PNG I/O, and diff image generation.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use shape_raster::rendering_buffer::{RenderingBuffer, BPP};

// ============================================================================
// Image
// ============================================================================

/// An RGB24 image with dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    /// RGB pixel data, row-major, top-to-bottom. Length = width * height * 3.
    pub data: Vec<u8>,
}

impl Image {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width as usize * height as usize * BPP],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * self.width as usize + x as usize) * BPP;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

impl From<RenderingBuffer> for Image {
    fn from(buf: RenderingBuffer) -> Self {
        Self {
            width: buf.width(),
            height: buf.height(),
            data: buf.into_bytes(),
        }
    }
}

impl From<&RenderingBuffer> for Image {
    fn from(buf: &RenderingBuffer) -> Self {
        Self {
            width: buf.width(),
            height: buf.height(),
            data: buf.as_bytes().to_vec(),
        }
    }
}

// ============================================================================
// Comparison Result
// ============================================================================

/// Information about a single pixel difference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffInfo {
    pub x: u32,
    pub y: u32,
    pub pixel_a: [u8; 3],
    pub pixel_b: [u8; 3],
}

/// Result of comparing two images.
#[derive(Debug, Clone)]
pub struct CompareResult {
    /// True if every pixel in both images is identical.
    pub identical: bool,
    pub total_pixels: u64,
    /// Number of pixels that differ by at least 1 in any channel.
    pub different_pixels: u64,
    /// Maximum absolute difference across any single channel of any pixel.
    pub max_channel_diff: u8,
    /// Mean absolute difference across the differing channels.
    pub mean_channel_diff: f64,
    /// The first differing pixel (scanning left-to-right, top-to-bottom).
    pub first_diff: Option<DiffInfo>,
}

impl std::fmt::Display for CompareResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.identical {
            write!(f, "IDENTICAL: {} pixels match perfectly", self.total_pixels)
        } else {
            write!(
                f,
                "DIFFERENT: {}/{} pixels differ ({:.2}%), max_diff={}, mean_diff={:.4}",
                self.different_pixels,
                self.total_pixels,
                self.different_pixels as f64 / self.total_pixels as f64 * 100.0,
                self.max_channel_diff,
                self.mean_channel_diff,
            )?;
            if let Some(ref d) = self.first_diff {
                write!(
                    f,
                    "\n  First diff at ({}, {}): A={:?} B={:?}",
                    d.x, d.y, d.pixel_a, d.pixel_b
                )?;
            }
            Ok(())
        }
    }
}

fn check_same_size(a: &Image, b: &Image) -> Result<()> {
    if a.width != b.width || a.height != b.height {
        bail!(
            "image sizes differ: {}x{} vs {}x{}",
            a.width,
            a.height,
            b.width,
            b.height
        );
    }
    Ok(())
}

// ============================================================================
// Comparison
// ============================================================================

/// Compare two images channel by channel. Both must have the same size.
pub fn compare_buffers(a: &Image, b: &Image) -> Result<CompareResult> {
    check_same_size(a, b)?;

    let total_pixels = a.width as u64 * a.height as u64;
    let mut different_pixels = 0u64;
    let mut max_channel_diff = 0u8;
    let mut total_diff_sum = 0u64;
    let mut total_diff_channels = 0u64;
    let mut first_diff: Option<DiffInfo> = None;

    for y in 0..a.height {
        for x in 0..a.width {
            let pa = a.pixel(x, y);
            let pb = b.pixel(x, y);

            let mut pixel_differs = false;
            for c in 0..BPP {
                let diff = pa[c].abs_diff(pb[c]);
                if diff > 0 {
                    pixel_differs = true;
                    max_channel_diff = max_channel_diff.max(diff);
                    total_diff_sum += diff as u64;
                    total_diff_channels += 1;
                }
            }

            if pixel_differs {
                different_pixels += 1;
                if first_diff.is_none() {
                    first_diff = Some(DiffInfo {
                        x,
                        y,
                        pixel_a: pa,
                        pixel_b: pb,
                    });
                }
            }
        }
    }

    let mean_channel_diff = if total_diff_channels > 0 {
        total_diff_sum as f64 / total_diff_channels as f64
    } else {
        0.0
    };

    Ok(CompareResult {
        identical: different_pixels == 0,
        total_pixels,
        different_pixels,
        max_channel_diff,
        mean_channel_diff,
        first_diff,
    })
}

/// Visual diff: identical pixels are dark gray, differing pixels red with
/// brightness proportional to the largest channel difference (amplified 10x).
pub fn generate_diff_image(a: &Image, b: &Image) -> Result<Image> {
    check_same_size(a, b)?;

    let mut diff = Image::new(a.width, a.height);
    for (i, out) in diff.data.chunks_exact_mut(BPP).enumerate() {
        let o = i * BPP;
        let max_diff = (0..BPP)
            .map(|c| a.data[o + c].abs_diff(b.data[o + c]))
            .max()
            .unwrap_or(0);
        if max_diff == 0 {
            out.copy_from_slice(&[40, 40, 40]);
        } else {
            let v = (max_diff as u16 * 10).min(255) as u8;
            out.copy_from_slice(&[v, 0, 0]);
        }
    }
    Ok(diff)
}

// ============================================================================
// BMP I/O (24-bit BGR, top-down)
// ============================================================================

/// Row size in bytes, padded to a multiple of 4 as BMP requires.
///
/// `None` when the row does not fit in `usize`.
fn bmp_row_stride(width: u32, bytes_pp: usize) -> Option<usize> {
    let unpadded = (width as usize).checked_mul(bytes_pp)?;
    Some(unpadded.checked_add(3)? / 4 * 4)
}

/// Save an image as a 24-bit BMP file (top-down, BGR).
pub fn save_bmp(path: &Path, img: &Image) -> Result<()> {
    let w = img.width;
    let h = img.height;
    let row_size = bmp_row_stride(w, 3).context("image too wide for BMP")?;
    let (image_size, file_size) = row_size
        .checked_mul(h as usize)
        .and_then(|n| u32::try_from(n).ok())
        .and_then(|n| Some((n, n.checked_add(14 + 40)?)))
        .context("image too large for BMP")?;
    let height = i32::try_from(h).context("image too tall for BMP")?;

    let mut f = BufWriter::new(File::create(path)?);

    // BMP file header (14 bytes)
    f.write_all(b"BM")?;
    f.write_all(&file_size.to_le_bytes())?;
    f.write_all(&[0u8; 4])?; // reserved
    f.write_all(&(14u32 + 40).to_le_bytes())?; // pixel data offset

    // BITMAPINFOHEADER (40 bytes)
    f.write_all(&40u32.to_le_bytes())?;
    f.write_all(&w.to_le_bytes())?;
    f.write_all(&(-height).to_le_bytes())?; // negative height = top-down
    f.write_all(&1u16.to_le_bytes())?; // planes
    f.write_all(&24u16.to_le_bytes())?; // bits per pixel
    f.write_all(&0u32.to_le_bytes())?; // compression (BI_RGB)
    f.write_all(&image_size.to_le_bytes())?;
    f.write_all(&[0u8; 4])?; // x pixels per meter
    f.write_all(&[0u8; 4])?; // y pixels per meter
    f.write_all(&0u32.to_le_bytes())?; // colors used
    f.write_all(&0u32.to_le_bytes())?; // important colors

    let mut row = vec![0u8; row_size];
    for y in 0..h {
        for x in 0..w {
            let [r, g, b] = img.pixel(x, y);
            let di = x as usize * 3;
            row[di] = b;
            row[di + 1] = g;
            row[di + 2] = r;
        }
        f.write_all(&row)?;
    }
    f.flush()?;

    Ok(())
}

/// Load an uncompressed 24-bit or 32-bit BMP file. Alpha is dropped.
pub fn load_bmp(path: &Path) -> Result<Image> {
    let mut data = Vec::new();
    File::open(path)?.read_to_end(&mut data)?;

    if data.len() < 54 || &data[0..2] != b"BM" {
        bail!("{}: not a valid BMP file", path.display());
    }

    let pixel_offset = u32::from_le_bytes([data[10], data[11], data[12], data[13]]) as usize;
    let w = i32::from_le_bytes([data[18], data[19], data[20], data[21]]);
    let h = i32::from_le_bytes([data[22], data[23], data[24], data[25]]);
    let bpp = u16::from_le_bytes([data[28], data[29]]) as usize;
    if bpp != 24 && bpp != 32 {
        bail!("{}: unsupported BMP depth {bpp}", path.display());
    }

    let width = w.unsigned_abs();
    let height = h.unsigned_abs();
    let top_down = h < 0;
    let bytes_pp = bpp / 8;
    let layout = bmp_row_stride(width, bytes_pp).and_then(|stride| {
        let end = stride
            .checked_mul(height as usize)?
            .checked_add(pixel_offset)?;
        Some((stride, end))
    });
    let Some((row_stride, pixel_end)) = layout else {
        bail!("{}: BMP dimensions {w}x{h} are too large", path.display());
    };
    if data.len() < pixel_end {
        bail!("{}: truncated BMP pixel data", path.display());
    }

    let mut img = Image::new(width, height);
    for y in 0..height as usize {
        let src_y = if top_down { y } else { height as usize - 1 - y };
        let row_offset = pixel_offset + src_y * row_stride;

        for x in 0..width as usize {
            let si = row_offset + x * bytes_pp;
            let di = (y * width as usize + x) * BPP;
            // BGR(A) -> RGB
            img.data[di] = data[si + 2];
            img.data[di + 1] = data[si + 1];
            img.data[di + 2] = data[si];
        }
    }

    Ok(img)
}

// ============================================================================
// PNG I/O
// ============================================================================

/// Save an image as an 8-bit RGB PNG.
pub fn save_png(path: &Path, img: &Image) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    let mut encoder = png::Encoder::new(file, img.width, img.height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&img.data)?;
    writer.finish()?;
    Ok(())
}

/// Load a PNG, converting grayscale and alpha variants to RGB.
pub fn load_png(path: &Path) -> Result<Image> {
    let mut decoder = png::Decoder::new(BufReader::new(File::open(path)?));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    let data = match info.color_type {
        png::ColorType::Rgb => buf,
        png::ColorType::Rgba => buf
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v]).collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|px| [px[0], px[0], px[0]])
            .collect(),
        png::ColorType::Indexed => bail!("{}: unexpanded indexed PNG", path.display()),
    };

    Ok(Image {
        width: info.width,
        height: info.height,
        data,
    })
}

// ============================================================================
// Format dispatch
// ============================================================================

/// Load an image file, detecting format by extension.
pub fn load_image(path: &Path) -> Result<Image> {
    match extension(path).as_deref() {
        Some("bmp") => load_bmp(path),
        Some("png") => load_png(path),
        _ => bail!("unsupported image format: {}", path.display()),
    }
    .with_context(|| format!("failed to read {}", path.display()))
}

/// Save an image file, detecting format by extension.
pub fn save_image(path: &Path, img: &Image) -> Result<()> {
    match extension(path).as_deref() {
        Some("bmp") => save_bmp(path, img),
        Some("png") => save_png(path, img),
        _ => bail!("unsupported image format: {}", path.display()),
    }
    .with_context(|| format!("failed to write {}", path.display()))
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

// ============================================================================
// Tests
// ============================================================================
