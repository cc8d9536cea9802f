//! Style type definitions
//!
//! This module contains all the enum types used in node styles and layout
//! queries. These types represent CSS property values that can be applied to
//! flex containers and items.

use std::fmt;

/// Text direction
///
/// CSS: `direction`
/// Reference: CSS Writing Modes Level 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
  /// Inherit the parent's resolved direction (LTR at the root).
  #[default]
  Inherit,
  Ltr,
  Rtl,
}

/// Main-axis orientation of a flex container
///
/// CSS: `flex-direction`
/// Reference: CSS Flexible Box Layout Module Level 1
///
/// The engine defaults to `Column`, matching the mobile-first convention
/// rather than the CSS spec default of `row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexDirection {
  #[default]
  Column,
  ColumnReverse,
  Row,
  RowReverse,
}

impl FlexDirection {
  /// True for `Row` and `RowReverse`.
  #[inline]
  pub fn is_row(self) -> bool {
    matches!(self, Self::Row | Self::RowReverse)
  }

  /// True for `Column` and `ColumnReverse`.
  #[inline]
  pub fn is_column(self) -> bool {
    matches!(self, Self::Column | Self::ColumnReverse)
  }

  /// True for the `*Reverse` directions, whose trailing edge precedes the
  /// leading edge in physical coordinates.
  #[inline]
  pub fn is_reverse(self) -> bool {
    matches!(self, Self::RowReverse | Self::ColumnReverse)
  }

  /// The physical edge content flows away from.
  pub fn leading_edge(self) -> Edge {
    match self {
      Self::Column => Edge::Top,
      Self::ColumnReverse => Edge::Bottom,
      Self::Row => Edge::Left,
      Self::RowReverse => Edge::Right,
    }
  }

  /// The physical edge content flows toward.
  pub fn trailing_edge(self) -> Edge {
    match self {
      Self::Column => Edge::Bottom,
      Self::ColumnReverse => Edge::Top,
      Self::Row => Edge::Right,
      Self::RowReverse => Edge::Left,
    }
  }

  /// The layout-position slot children are placed into along this axis.
  pub fn position_edge(self) -> Edge {
    self.leading_edge()
  }

  /// The dimension this axis measures.
  pub fn dimension(self) -> DimensionIndex {
    if self.is_row() {
      DimensionIndex::Width
    } else {
      DimensionIndex::Height
    }
  }
}

/// Main-axis distribution of free space
///
/// CSS: `justify-content`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
  #[default]
  FlexStart,
  Center,
  FlexEnd,
  SpaceBetween,
  SpaceAround,
}

/// Cross-axis alignment for items and multi-line content
///
/// CSS: `align-items`, `align-self`, `align-content`
///
/// `Auto` is only meaningful for `align-self`, where it defers to the
/// parent's `align-items`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
  Auto,
  FlexStart,
  Center,
  FlexEnd,
  Stretch,
}

/// Positioning scheme of a node
///
/// CSS: `position`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionType {
  /// Participates in flex layout; position offsets shift the final spot.
  #[default]
  Relative,
  /// Taken out of flow and sized/positioned against the parent's box.
  Absolute,
}

/// Line wrapping behavior of a flex container
///
/// CSS: `flex-wrap` (`wrap-reverse` is not supported)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexWrap {
  #[default]
  NoWrap,
  Wrap,
}

/// Overflow behavior for content that exceeds container bounds
///
/// CSS: `overflow`
///
/// `Scroll` additionally changes how children are measured along the
/// scrollable axis when computing flex bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
  #[default]
  Visible,
  Hidden,
  Scroll,
}

/// Sizing rule attached to an available dimension
///
/// Maps onto the CSS sizing terms (CSS Sizing Level 3):
/// `Undefined` is max-content, `Exactly` is fill-available, `AtMost` is
/// fit-content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureMode {
  /// Treat the availability as infinite; size to content.
  Undefined,
  /// The measured dimension must match the availability.
  Exactly,
  /// The measured dimension must fit within the availability.
  AtMost,
}

impl fmt::Display for MeasureMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Undefined => write!(f, "UNDEFINED"),
      Self::Exactly => write!(f, "EXACTLY"),
      Self::AtMost => write!(f, "AT_MOST"),
    }
  }
}

/// Slots of a per-edge style value set.
///
/// The first six are concrete edges; Horizontal, Vertical and All are
/// shorthands that concrete edges fall back to during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Edge {
  Left,
  Top,
  Right,
  Bottom,
  Start,
  End,
  Horizontal,
  Vertical,
  All,
}

impl Edge {
  /// Number of slots in an edge set.
  pub const COUNT: usize = 9;
}

/// Index into a width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionIndex {
  Width,
  Height,
}

impl DimensionIndex {
  /// Number of dimensions.
  pub const COUNT: usize = 2;
}
