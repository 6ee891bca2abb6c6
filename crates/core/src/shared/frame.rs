use image::RgbImage;
use ndarray::ArrayView3;

use crate::shared::region::FaceRegion;

pub const RGB_CHANNELS: usize = 3;

/// A decoded image: contiguous RGB bytes in row-major order.
///
/// Request-scoped. Format conversion happens in the decoder; everything
/// downstream sees packed RGB.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * RGB_CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
        }
    }

    pub fn from_rgb_image(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width, height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the frame holds no pixels at all.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(
            (self.height as usize, self.width as usize, RGB_CHANNELS),
            &self.data,
        )
        .expect("Frame data length must match dimensions")
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_raw(self.width, self.height, self.data.clone())
            .expect("Frame data length must match dimensions")
    }

    /// Copies the pixels under `region`, clamped to the frame bounds.
    ///
    /// A region that falls entirely outside the frame yields the whole frame.
    pub fn crop(&self, region: &FaceRegion) -> Frame {
        let clamped = match region.clamp_to(self.width, self.height) {
            Some(r) => r,
            None => return self.clone(),
        };
        let (x, y) = (clamped.x as usize, clamped.y as usize);
        let (w, h) = (clamped.width as usize, clamped.height as usize);
        let stride = self.width as usize * RGB_CHANNELS;

        let mut data = Vec::with_capacity(w * h * RGB_CHANNELS);
        for row in y..y + h {
            let start = row * stride + x * RGB_CHANNELS;
            data.extend_from_slice(&self.data[start..start + w * RGB_CHANNELS]);
        }
        Frame::new(data, w as u32, h as u32)
    }
}
