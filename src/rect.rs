//! Rectangles in panel pixel coordinates

/// A rectangle
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct Rect {
    /// Origin X
    pub x: u16,
    /// Origin Y
    pub y: u16,
    /// Width
    pub w: u16,
    /// Height
    pub h: u16,
}

impl Rect {
    /// Construct a new rectangle
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Rect {
        Rect { x, y, w, h }
    }

    /// Rectangle covering a whole `width` x `height` panel
    pub const fn full(width: u16, height: u16) -> Rect {
        Rect::new(0, 0, width, height)
    }

    /// Test whether the rectangle is empty.
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Test whether the rectangle lies completely inside a `width` x `height` panel
    pub fn fits_within(&self, width: u16, height: u16) -> bool {
        self.right() <= u32::from(width) && self.bottom() <= u32::from(height)
    }

    /// Exclusive right edge, widened so it can't overflow
    pub fn right(&self) -> u32 {
        u32::from(self.x) + u32::from(self.w)
    }

    /// Exclusive bottom edge, widened so it can't overflow
    pub fn bottom(&self) -> u32 {
        u32::from(self.y) + u32::from(self.h)
    }
}

#[test]
fn empty_rects() {
    assert!(Rect::new(3, 3, 0, 10).is_empty());
    assert!(Rect::new(3, 3, 10, 0).is_empty());
    assert!(!Rect::full(1, 1).is_empty());
}

#[test]
fn fits_within_panel() {
    assert!(Rect::full(1200, 825).fits_within(1200, 825));
    assert!(Rect::new(1100, 800, 100, 25).fits_within(1200, 825));
    assert!(!Rect::new(1100, 800, 101, 25).fits_within(1200, 825));
    assert!(!Rect::new(u16::MAX, 0, 2, 1).fits_within(u16::MAX, 1));
}
