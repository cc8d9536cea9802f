//! Node style storage
//!
//! A [`Style`] carries every input the layout algorithm reads: flex
//! container/item properties, per-edge margin/position/padding/border sets,
//! and width/height with optional min/max clamps. All numeric fields default
//! to the undefined sentinel except the flex factors, which default to zero.
//!
//! The axis-aware accessors (`leading_margin`, `trailing_padding`, …) fold in
//! the Start/End logical-edge overrides on row axes and the per-field
//! negative-value policy: padding and border clamp negatives to zero, margin
//! passes them through.

pub mod types;
pub mod value;

pub use types::{
  Align, DimensionIndex, Direction, Edge, FlexDirection, FlexWrap, Justify, MeasureMode, Overflow,
  PositionType,
};
pub use value::{approx_eq, is_defined, is_undefined, EdgeValues, UNDEFINED};

/// The full set of style inputs for one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
  pub direction: Direction,
  pub flex_direction: FlexDirection,
  pub justify_content: Justify,
  pub align_content: Align,
  pub align_items: Align,
  pub align_self: Align,
  pub position_type: PositionType,
  pub flex_wrap: FlexWrap,
  pub overflow: Overflow,
  pub flex_grow: f32,
  pub flex_shrink: f32,
  pub flex_basis: f32,
  pub margin: EdgeValues,
  pub position: EdgeValues,
  pub padding: EdgeValues,
  pub border: EdgeValues,
  pub dimensions: [f32; DimensionIndex::COUNT],
  pub min_dimensions: [f32; DimensionIndex::COUNT],
  pub max_dimensions: [f32; DimensionIndex::COUNT],
}

impl Default for Style {
  fn default() -> Self {
    Self {
      direction: Direction::Inherit,
      flex_direction: FlexDirection::Column,
      justify_content: Justify::FlexStart,
      align_content: Align::FlexStart,
      align_items: Align::Stretch,
      align_self: Align::Auto,
      position_type: PositionType::Relative,
      flex_wrap: FlexWrap::NoWrap,
      overflow: Overflow::Visible,
      flex_grow: 0.0,
      flex_shrink: 0.0,
      flex_basis: UNDEFINED,
      margin: EdgeValues::undefined(),
      position: EdgeValues::undefined(),
      padding: EdgeValues::undefined(),
      border: EdgeValues::undefined(),
      dimensions: [UNDEFINED; DimensionIndex::COUNT],
      min_dimensions: [UNDEFINED; DimensionIndex::COUNT],
      max_dimensions: [UNDEFINED; DimensionIndex::COUNT],
    }
  }
}

impl Style {
  /// The style dimension along `axis` (width for row axes, height for
  /// column axes).
  #[inline]
  pub fn dimension(&self, axis: FlexDirection) -> f32 {
    self.dimensions[axis.dimension() as usize]
  }

  /// True when the style dimension along `axis` is set to a usable
  /// (non-negative) value.
  #[inline]
  pub fn is_dim_defined(&self, axis: FlexDirection) -> bool {
    let value = self.dimension(axis);
    is_defined(value) && value >= 0.0
  }

  /// A node can flex only when it participates in flow and has a non-zero
  /// grow or shrink factor.
  #[inline]
  pub fn is_flex(&self) -> bool {
    self.position_type == PositionType::Relative
      && (self.flex_grow != 0.0 || self.flex_shrink != 0.0)
  }

  // Margin. Start/End override the physical edges on row axes; negative
  // margins are legal.

  pub fn leading_margin(&self, axis: FlexDirection) -> f32 {
    if axis.is_row() && is_defined(self.margin.get(Edge::Start)) {
      return self.margin.get(Edge::Start);
    }
    self.margin.resolve(axis.leading_edge(), 0.0)
  }

  pub fn trailing_margin(&self, axis: FlexDirection) -> f32 {
    if axis.is_row() && is_defined(self.margin.get(Edge::End)) {
      return self.margin.get(Edge::End);
    }
    self.margin.resolve(axis.trailing_edge(), 0.0)
  }

  pub fn margin_axis(&self, axis: FlexDirection) -> f32 {
    self.leading_margin(axis) + self.trailing_margin(axis)
  }

  // Padding and border. Negative values are configuration anomalies and
  // read as zero.

  pub fn leading_padding(&self, axis: FlexDirection) -> f32 {
    if axis.is_row() {
      let start = self.padding.get(Edge::Start);
      if is_defined(start) && start >= 0.0 {
        return start;
      }
    }
    let resolved = self.padding.resolve(axis.leading_edge(), 0.0);
    if resolved >= 0.0 {
      resolved
    } else {
      0.0
    }
  }

  pub fn trailing_padding(&self, axis: FlexDirection) -> f32 {
    if axis.is_row() {
      let end = self.padding.get(Edge::End);
      if is_defined(end) && end >= 0.0 {
        return end;
      }
    }
    let resolved = self.padding.resolve(axis.trailing_edge(), 0.0);
    if resolved >= 0.0 {
      resolved
    } else {
      0.0
    }
  }

  pub fn leading_border(&self, axis: FlexDirection) -> f32 {
    if axis.is_row() {
      let start = self.border.get(Edge::Start);
      if is_defined(start) && start >= 0.0 {
        return start;
      }
    }
    let resolved = self.border.resolve(axis.leading_edge(), 0.0);
    if resolved >= 0.0 {
      resolved
    } else {
      0.0
    }
  }

  pub fn trailing_border(&self, axis: FlexDirection) -> f32 {
    if axis.is_row() {
      let end = self.border.get(Edge::End);
      if is_defined(end) && end >= 0.0 {
        return end;
      }
    }
    let resolved = self.border.resolve(axis.trailing_edge(), 0.0);
    if resolved >= 0.0 {
      resolved
    } else {
      0.0
    }
  }

  pub fn leading_padding_and_border(&self, axis: FlexDirection) -> f32 {
    self.leading_padding(axis) + self.leading_border(axis)
  }

  pub fn trailing_padding_and_border(&self, axis: FlexDirection) -> f32 {
    self.trailing_padding(axis) + self.trailing_border(axis)
  }

  pub fn padding_and_border_axis(&self, axis: FlexDirection) -> f32 {
    self.leading_padding_and_border(axis) + self.trailing_padding_and_border(axis)
  }

  // Position offsets. Start/End override physical edges on row axes; the
  // per-edge default is the undefined sentinel, not zero.

  pub fn is_leading_position_defined(&self, axis: FlexDirection) -> bool {
    (axis.is_row() && is_defined(self.position.resolve(Edge::Start, UNDEFINED)))
      || is_defined(self.position.resolve(axis.leading_edge(), UNDEFINED))
  }

  pub fn is_trailing_position_defined(&self, axis: FlexDirection) -> bool {
    (axis.is_row() && is_defined(self.position.resolve(Edge::End, UNDEFINED)))
      || is_defined(self.position.resolve(axis.trailing_edge(), UNDEFINED))
  }

  pub fn leading_position(&self, axis: FlexDirection) -> f32 {
    if axis.is_row() {
      let start = self.position.resolve(Edge::Start, UNDEFINED);
      if is_defined(start) {
        return start;
      }
    }
    let leading = self.position.resolve(axis.leading_edge(), UNDEFINED);
    if is_defined(leading) {
      leading
    } else {
      0.0
    }
  }

  pub fn trailing_position(&self, axis: FlexDirection) -> f32 {
    if axis.is_row() {
      let end = self.position.resolve(Edge::End, UNDEFINED);
      if is_defined(end) {
        return end;
      }
    }
    let trailing = self.position.resolve(axis.trailing_edge(), UNDEFINED);
    if is_defined(trailing) {
      trailing
    } else {
      0.0
    }
  }

  /// Offset a relatively positioned node by: the leading offset when set,
  /// otherwise the negated trailing offset.
  pub fn relative_position(&self, axis: FlexDirection) -> f32 {
    if self.is_leading_position_defined(axis) {
      self.leading_position(axis)
    } else {
      -self.trailing_position(axis)
    }
  }

  /// Clamps `value` into the min/max range for `axis`. Undefined or
  /// negative bounds are ignored.
  pub fn bound_axis_within_min_and_max(&self, axis: FlexDirection, value: f32) -> f32 {
    let dim = axis.dimension() as usize;
    let min = self.min_dimensions[dim];
    let max = self.max_dimensions[dim];

    let mut bound = value;
    if is_defined(max) && max >= 0.0 && bound > max {
      bound = max;
    }
    if is_defined(min) && min >= 0.0 && bound < min {
      bound = min;
    }
    bound
  }

  /// Like [`Style::bound_axis_within_min_and_max`] but also floors the value
  /// at the axis padding+border, which a box can never be smaller than.
  pub fn bound_axis(&self, axis: FlexDirection, value: f32) -> f32 {
    self
      .bound_axis_within_min_and_max(axis, value)
      .max(self.padding_and_border_axis(axis))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_match_engine_conventions() {
    let style = Style::default();
    assert_eq!(style.direction, Direction::Inherit);
    assert_eq!(style.flex_direction, FlexDirection::Column);
    assert_eq!(style.justify_content, Justify::FlexStart);
    assert_eq!(style.align_items, Align::Stretch);
    assert_eq!(style.align_self, Align::Auto);
    assert_eq!(style.flex_wrap, FlexWrap::NoWrap);
    assert_eq!(style.overflow, Overflow::Visible);
    assert_eq!(style.flex_grow, 0.0);
    assert_eq!(style.flex_shrink, 0.0);
    assert!(is_undefined(style.flex_basis));
    assert!(is_undefined(style.dimensions[0]));
    assert!(is_undefined(style.max_dimensions[1]));
  }

  #[test]
  fn start_overrides_left_margin_on_row_axes() {
    let mut style = Style::default();
    style.margin.set(Edge::Left, 10.0);
    style.margin.set(Edge::Start, 4.0);
    assert_eq!(style.leading_margin(FlexDirection::Row), 4.0);
    // Column axes ignore the Start override.
    assert_eq!(style.leading_margin(FlexDirection::Column), 0.0);
  }

  #[test]
  fn negative_padding_reads_as_zero_but_negative_margin_passes() {
    let mut style = Style::default();
    style.padding.set(Edge::Left, -5.0);
    style.margin.set(Edge::Left, -5.0);
    assert_eq!(style.leading_padding(FlexDirection::Row), 0.0);
    assert_eq!(style.leading_margin(FlexDirection::Row), -5.0);
  }

  #[test]
  fn relative_position_prefers_leading_then_negates_trailing() {
    let mut style = Style::default();
    style.position.set(Edge::Right, 8.0);
    assert_eq!(style.relative_position(FlexDirection::Row), -8.0);
    style.position.set(Edge::Left, 3.0);
    assert_eq!(style.relative_position(FlexDirection::Row), 3.0);
  }

  #[test]
  fn bound_axis_applies_min_max_and_padding_floor() {
    let mut style = Style::default();
    style.min_dimensions[0] = 20.0;
    style.max_dimensions[0] = 50.0;
    style.padding.set(Edge::All, 5.0);
    assert_eq!(style.bound_axis(FlexDirection::Row, 100.0), 50.0);
    assert_eq!(style.bound_axis(FlexDirection::Row, 0.0), 20.0);
    style.min_dimensions[0] = UNDEFINED;
    // Padding floor kicks in when min is gone: 5 + 5 on the row axis.
    assert_eq!(style.bound_axis(FlexDirection::Row, 0.0), 10.0);
  }

  #[test]
  fn negative_min_max_are_ignored() {
    let mut style = Style::default();
    style.min_dimensions[0] = -10.0;
    style.max_dimensions[0] = -10.0;
    assert_eq!(style.bound_axis(FlexDirection::Row, 42.0), 42.0);
  }

  #[test]
  fn style_dim_defined_rejects_negative_values() {
    let mut style = Style::default();
    assert!(!style.is_dim_defined(FlexDirection::Row));
    style.dimensions[0] = -1.0;
    assert!(!style.is_dim_defined(FlexDirection::Row));
    style.dimensions[0] = 80.0;
    assert!(style.is_dim_defined(FlexDirection::Row));
  }

  #[test]
  fn is_flex_requires_relative_position_and_a_factor() {
    let mut style = Style::default();
    assert!(!style.is_flex());
    style.flex_grow = 1.0;
    assert!(style.is_flex());
    style.position_type = PositionType::Absolute;
    assert!(!style.is_flex());
  }
}
