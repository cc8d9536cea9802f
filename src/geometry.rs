//! Core geometry types for layout
//!
//! All units are CSS pixels. The coordinate system has its origin at the
//! top-left corner: positive X extends to the right, positive Y downward,
//! matching CSS 2.1 Section 8.3.1.

use std::fmt;

/// A 2D size in CSS pixels
///
/// This is what a measure callback returns and what the measurement cache
/// stores as its computed output.
///
/// # Examples
///
/// ```
/// use flexlay::Size;
///
/// let size = Size::new(100.0, 50.0);
/// assert_eq!(size.width, 100.0);
/// assert_eq!(size.height, 50.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
  /// Width (horizontal extent)
  pub width: f32,
  /// Height (vertical extent)
  pub height: f32,
}

impl Size {
  /// A size with zero width and height
  pub const ZERO: Self = Self {
    width: 0.0,
    height: 0.0,
  };

  /// Creates a new size with the given dimensions
  ///
  /// # Examples
  ///
  /// ```
  /// use flexlay::Size;
  ///
  /// let size = Size::new(200.0, 100.0);
  /// assert_eq!(size.width, 200.0);
  /// ```
  pub const fn new(width: f32, height: f32) -> Self {
    Self { width, height }
  }

  /// Returns true if either width or height is zero
  pub fn is_empty(self) -> bool {
    self.width == 0.0 || self.height == 0.0
  }
}

impl fmt::Display for Size {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}×{}", self.width, self.height)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn zero_is_empty() {
    assert!(Size::ZERO.is_empty());
    assert!(Size::new(0.0, 10.0).is_empty());
    assert!(!Size::new(10.0, 10.0).is_empty());
  }

  #[test]
  fn display_formats_dimensions() {
    assert_eq!(Size::new(3.0, 4.0).to_string(), "3×4");
  }
}
