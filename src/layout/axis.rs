//! Writing-direction and flex-axis resolution.
//!
//! The layout algorithm works in terms of a resolved main axis and cross
//! axis. Under RTL the row axes flip (Row becomes RowReverse and vice
//! versa); column axes are unaffected by the writing direction.

use crate::style::{Direction, FlexDirection};

/// Resolves a node's style direction against the parent's resolved
/// direction: Inherit takes the parent's LTR/RTL, defaulting to LTR at the
/// root.
pub fn resolve_direction(style_direction: Direction, parent_direction: Direction) -> Direction {
  match style_direction {
    Direction::Inherit => match parent_direction {
      Direction::Ltr | Direction::Rtl => parent_direction,
      Direction::Inherit => Direction::Ltr,
    },
    explicit => explicit,
  }
}

/// Maps a style flex-direction onto the physical main axis for the given
/// writing direction.
pub fn resolve_axis(flex_direction: FlexDirection, direction: Direction) -> FlexDirection {
  if direction == Direction::Rtl {
    match flex_direction {
      FlexDirection::Row => return FlexDirection::RowReverse,
      FlexDirection::RowReverse => return FlexDirection::Row,
      _ => {}
    }
  }
  flex_direction
}

/// The axis perpendicular to a resolved main axis: Column when the main axis
/// is a row, otherwise the direction-resolved Row.
pub fn cross_flex_direction(main_axis: FlexDirection, direction: Direction) -> FlexDirection {
  if main_axis.is_column() {
    resolve_axis(FlexDirection::Row, direction)
  } else {
    FlexDirection::Column
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn inherit_takes_parent_direction() {
    assert_eq!(
      resolve_direction(Direction::Inherit, Direction::Rtl),
      Direction::Rtl
    );
    assert_eq!(
      resolve_direction(Direction::Inherit, Direction::Ltr),
      Direction::Ltr
    );
    assert_eq!(
      resolve_direction(Direction::Inherit, Direction::Inherit),
      Direction::Ltr
    );
  }

  #[test]
  fn explicit_direction_wins() {
    assert_eq!(
      resolve_direction(Direction::Rtl, Direction::Ltr),
      Direction::Rtl
    );
    assert_eq!(
      resolve_direction(Direction::Ltr, Direction::Rtl),
      Direction::Ltr
    );
  }

  #[test]
  fn rtl_flips_row_axes_only() {
    assert_eq!(
      resolve_axis(FlexDirection::Row, Direction::Rtl),
      FlexDirection::RowReverse
    );
    assert_eq!(
      resolve_axis(FlexDirection::RowReverse, Direction::Rtl),
      FlexDirection::Row
    );
    assert_eq!(
      resolve_axis(FlexDirection::Column, Direction::Rtl),
      FlexDirection::Column
    );
    assert_eq!(
      resolve_axis(FlexDirection::Row, Direction::Ltr),
      FlexDirection::Row
    );
  }

  #[test]
  fn cross_axis_is_perpendicular() {
    assert_eq!(
      cross_flex_direction(FlexDirection::Row, Direction::Ltr),
      FlexDirection::Column
    );
    assert_eq!(
      cross_flex_direction(FlexDirection::Column, Direction::Ltr),
      FlexDirection::Row
    );
    assert_eq!(
      cross_flex_direction(FlexDirection::Column, Direction::Rtl),
      FlexDirection::RowReverse
    );
    assert_eq!(
      cross_flex_direction(FlexDirection::ColumnReverse, Direction::Rtl),
      FlexDirection::RowReverse
    );
  }
}
