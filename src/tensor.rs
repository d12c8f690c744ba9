use crate::error::LlmApiError;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

/// Image batch as handed over by the host: row-major f32 values in [0, 1].
///
/// Accepted layouts are `[batch, 3, H, W]` (channel-first) and
/// `[batch, H, W, C]` with `C` of 1, 3 or 4 (channel-last). A 3-D shape is
/// read as a single image without the batch dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    shape: Vec<usize>,
    data: Vec<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    ChannelFirst,
    ChannelLast,
}

impl ImageTensor {
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Result<Self, LlmApiError> {
        if shape.len() != 3 && shape.len() != 4 {
            return Err(LlmApiError::ImageError(format!(
                "expected a 3-D or 4-D tensor, got shape {shape:?}"
            )));
        }
        let expected = shape
            .iter()
            .try_fold(1usize, |acc, dim| acc.checked_mul(*dim))
            .ok_or_else(|| {
                LlmApiError::ImageError(format!("shape {shape:?} is too large to address"))
            })?;
        if expected == 0 {
            return Err(LlmApiError::ImageError(format!(
                "tensor has an empty dimension: {shape:?}"
            )));
        }
        if expected != data.len() {
            return Err(LlmApiError::ImageError(format!(
                "shape {shape:?} needs {expected} values, got {}",
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn batch_size(&self) -> usize {
        if self.shape.len() == 4 {
            self.shape[0]
        } else {
            1
        }
    }

    /// Dimensions of one image with the batch axis removed.
    fn item_dims(&self) -> [usize; 3] {
        let s = &self.shape[self.shape.len() - 3..];
        [s[0], s[1], s[2]]
    }

    fn layout(&self) -> Result<(Layout, u32, u32, usize), LlmApiError> {
        let [a, b, c] = self.item_dims();
        let (layout, height, width, channels) = if a == 3 {
            (Layout::ChannelFirst, b, c, 3)
        } else if matches!(c, 1 | 3 | 4) {
            (Layout::ChannelLast, a, b, c)
        } else {
            return Err(LlmApiError::ImageError(format!(
                "cannot infer channel axis from shape {:?}",
                self.shape
            )));
        };

        let height = u32::try_from(height)
            .map_err(|_| LlmApiError::ImageError(format!("height {height} too large")))?;
        let width = u32::try_from(width)
            .map_err(|_| LlmApiError::ImageError(format!("width {width} too large")))?;
        Ok((layout, height, width, channels))
    }

    /// First image of the batch as interleaved 8-bit samples.
    pub fn to_hwc_u8(&self) -> Result<(Vec<u8>, u32, u32, usize), LlmApiError> {
        let (layout, height, width, channels) = self.layout()?;
        let (h, w) = (height as usize, width as usize);
        let item_len = h * w * channels;
        let item = &self.data[..item_len];

        let pixels = match layout {
            Layout::ChannelLast => item.iter().map(|v| to_u8(*v)).collect(),
            Layout::ChannelFirst => {
                let plane = h * w;
                let mut out = Vec::with_capacity(item_len);
                for idx in 0..plane {
                    for ch in 0..channels {
                        out.push(to_u8(item[ch * plane + idx]));
                    }
                }
                out
            }
        };

        Ok((pixels, height, width, channels))
    }

    pub fn to_png(&self) -> Result<Vec<u8>, LlmApiError> {
        if self.batch_size() > 1 {
            log::debug!(
                "image batch has {} items, encoding only the first",
                self.batch_size()
            );
        }

        let (pixels, height, width, channels) = self.to_hwc_u8()?;
        let color = match channels {
            1 => ExtendedColorType::L8,
            3 => ExtendedColorType::Rgb8,
            4 => ExtendedColorType::Rgba8,
            n => {
                return Err(LlmApiError::ImageError(format!(
                    "unsupported channel count {n}"
                )))
            }
        };

        let mut png_bytes = Vec::new();
        PngEncoder::new(&mut png_bytes).write_image(&pixels, width, height, color)?;
        log::debug!(
            "encoded {width}x{height} image ({channels} channels) to {} PNG bytes",
            png_bytes.len()
        );
        Ok(png_bytes)
    }
}

// Values outside [0, 1] are clamped; scaling truncates.
fn to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}
