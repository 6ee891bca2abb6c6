/// A candidate face rectangle in frame pixel coordinates.
///
/// Detectors may report rectangles that poke past the frame edges;
/// [`FaceRegion::clamp_to`] trims them before cropping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FaceRegion {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl FaceRegion {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The region covering an entire `width` × `height` frame.
    pub fn full_frame(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    pub fn area(&self) -> i64 {
        self.width.max(0) as i64 * self.height.max(0) as i64
    }

    /// Intersects the region with the frame bounds.
    ///
    /// Returns `None` when nothing of the region lies inside the frame.
    pub fn clamp_to(&self, frame_w: u32, frame_h: u32) -> Option<FaceRegion> {
        let x1 = self.x.max(0);
        let y1 = self.y.max(0);
        let x2 = (self.x + self.width).min(frame_w as i32);
        let y2 = (self.y + self.height).min(frame_h as i32);
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(FaceRegion::new(x1, y1, x2 - x1, y2 - y1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_full_frame_covers_dimensions() {
        let r = FaceRegion::full_frame(640, 480);
        assert_eq!(r, FaceRegion::new(0, 0, 640, 480));
        assert_eq!(r.area(), 640 * 480);
    }

    #[rstest]
    #[case::square(FaceRegion::new(0, 0, 10, 10), 100)]
    #[case::wide(FaceRegion::new(5, 5, 40, 10), 400)]
    #[case::degenerate(FaceRegion::new(0, 0, 0, 50), 0)]
    #[case::negative_width(FaceRegion::new(0, 0, -3, 50), 0)]
    fn test_area(#[case] region: FaceRegion, #[case] expected: i64) {
        assert_eq!(region.area(), expected);
    }

    #[test]
    fn test_clamp_inside_is_identity() {
        let r = FaceRegion::new(10, 10, 20, 20);
        assert_eq!(r.clamp_to(100, 100), Some(r));
    }

    #[test]
    fn test_clamp_trims_overhang() {
        let r = FaceRegion::new(-5, 90, 20, 20);
        assert_eq!(r.clamp_to(100, 100), Some(FaceRegion::new(0, 90, 15, 10)));
    }

    #[test]
    fn test_clamp_outside_is_none() {
        let r = FaceRegion::new(200, 200, 20, 20);
        assert_eq!(r.clamp_to(100, 100), None);
    }
}
