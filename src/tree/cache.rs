//! A per-node cache for the results of sizing passes.
//!
//! Each node keeps one slot for its most recent full-layout result plus a
//! small ring of prior measurement results. The layout algorithm probes the
//! cache before recursing; for nodes with a measure callback a relaxed
//! compatibility predicate decides whether an earlier answer can stand in
//! for a new query, for everything else only exact-input matches are reused.

use crate::geometry::Size;
use crate::style::{approx_eq, MeasureMode};

/// Number of measurement slots per node. Chosen empirically by the scheme
/// this engine derives from: even complicated layouts stay within 16 distinct
/// measurements per pass.
pub(crate) const MAX_CACHED_RESULTS: usize = 16;

/// One remembered sizing query and its answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CachedMeasurement {
  pub available_width: f32,
  pub available_height: f32,
  pub width_measure_mode: MeasureMode,
  pub height_measure_mode: MeasureMode,
  pub computed_width: f32,
  pub computed_height: f32,
}

impl CachedMeasurement {
  pub(crate) fn output(&self) -> Size {
    Size::new(self.computed_width, self.computed_height)
  }
}

/// The inputs of a cache probe.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CacheQuery {
  pub is_text: bool,
  pub available_width: f32,
  pub available_height: f32,
  pub margin_row: f32,
  pub margin_column: f32,
  pub width_measure_mode: MeasureMode,
  pub height_measure_mode: MeasureMode,
}

/// Decides whether `entry` can answer `query`, returning the size to use.
///
/// The returned size is usually the entry's stored output; the text-node
/// narrowing case instead clamps the height to the query's tighter bound.
/// The entry itself is never mutated.
pub(crate) fn usable_measurement(
  entry: &CachedMeasurement,
  query: &CacheQuery,
) -> Option<Size> {
  let height_same = (entry.height_measure_mode == MeasureMode::Undefined
    && query.height_measure_mode == MeasureMode::Undefined)
    || (entry.height_measure_mode == query.height_measure_mode
      && approx_eq(entry.available_height, query.available_height));

  let width_same = (entry.width_measure_mode == MeasureMode::Undefined
    && query.width_measure_mode == MeasureMode::Undefined)
    || (entry.width_measure_mode == query.width_measure_mode
      && approx_eq(entry.available_width, query.available_width));

  if height_same && width_same {
    return Some(entry.output());
  }

  let height_valid = (entry.height_measure_mode == MeasureMode::Undefined
    && query.height_measure_mode == MeasureMode::AtMost
    && entry.computed_height <= query.available_height - query.margin_column)
    || (query.height_measure_mode == MeasureMode::Exactly
      && approx_eq(
        entry.computed_height,
        query.available_height - query.margin_column,
      ));

  if width_same && height_valid {
    return Some(entry.output());
  }

  let width_valid = (entry.width_measure_mode == MeasureMode::Undefined
    && query.width_measure_mode == MeasureMode::AtMost
    && entry.computed_width <= query.available_width - query.margin_row)
    || (query.width_measure_mode == MeasureMode::Exactly
      && approx_eq(entry.computed_width, query.available_width - query.margin_row));

  if height_same && width_valid {
    return Some(entry.output());
  }

  if height_valid && width_valid {
    return Some(entry.output());
  }

  // Text measurements tolerate looser matches: text reflows only when the
  // width constraint changes.
  if query.is_text {
    if width_same {
      if query.height_measure_mode == MeasureMode::Undefined {
        // Same width, unrestricted height.
        return Some(entry.output());
      }

      let height_bound = query.available_height - query.margin_column;
      if query.height_measure_mode == MeasureMode::AtMost && entry.computed_height < height_bound {
        // Same width, and the cached height already fits the restriction.
        return Some(entry.output());
      }

      // Same width but a tighter height restriction than the cached
      // measurement: narrow the answer to the new bound.
      return Some(Size::new(entry.computed_width, height_bound));
    }

    if entry.width_measure_mode == MeasureMode::Undefined
      && (query.width_measure_mode == MeasureMode::Undefined
        || (query.width_measure_mode == MeasureMode::AtMost
          && entry.computed_width <= query.available_width - query.margin_row))
    {
      // Previously measured without a width restriction; a new restriction
      // at least as wide as the measured text changes nothing.
      return Some(entry.output());
    }
  }

  None
}

/// True when `entry` was produced by exactly the same query.
fn exact_match(
  entry: &CachedMeasurement,
  available_width: f32,
  available_height: f32,
  width_measure_mode: MeasureMode,
  height_measure_mode: MeasureMode,
) -> bool {
  approx_eq(entry.available_width, available_width)
    && approx_eq(entry.available_height, available_height)
    && entry.width_measure_mode == width_measure_mode
    && entry.height_measure_mode == height_measure_mode
}

/// Two-tier cache: a dedicated full-layout slot plus a FIFO measurement
/// ring that wraps at [`MAX_CACHED_RESULTS`].
#[derive(Debug, Clone)]
pub(crate) struct MeasurementCache {
  layout_entry: Option<CachedMeasurement>,
  entries: [Option<CachedMeasurement>; MAX_CACHED_RESULTS],
  next_index: usize,
}

impl MeasurementCache {
  pub(crate) const fn new() -> Self {
    Self {
      layout_entry: None,
      entries: [None; MAX_CACHED_RESULTS],
      next_index: 0,
    }
  }

  /// Drops every remembered result.
  pub(crate) fn invalidate(&mut self) {
    self.layout_entry = None;
    self.entries = [None; MAX_CACHED_RESULTS];
    self.next_index = 0;
  }

  /// Looks up a result for a node with a measure callback: the layout slot
  /// first, then the ring, both under the relaxed predicate.
  pub(crate) fn find_compatible(&self, query: &CacheQuery) -> Option<Size> {
    if let Some(entry) = &self.layout_entry {
      if let Some(size) = usable_measurement(entry, query) {
        return Some(size);
      }
    }
    self
      .measurements()
      .find_map(|entry| usable_measurement(entry, query))
  }

  /// Looks up the full-layout slot by exact input equality.
  pub(crate) fn find_exact_layout(
    &self,
    available_width: f32,
    available_height: f32,
    width_measure_mode: MeasureMode,
    height_measure_mode: MeasureMode,
  ) -> Option<Size> {
    self
      .layout_entry
      .as_ref()
      .filter(|entry| {
        exact_match(
          entry,
          available_width,
          available_height,
          width_measure_mode,
          height_measure_mode,
        )
      })
      .map(CachedMeasurement::output)
  }

  /// Looks up the measurement ring by exact input equality.
  pub(crate) fn find_exact_measurement(
    &self,
    available_width: f32,
    available_height: f32,
    width_measure_mode: MeasureMode,
    height_measure_mode: MeasureMode,
  ) -> Option<Size> {
    self
      .measurements()
      .find(|entry| {
        exact_match(
          entry,
          available_width,
          available_height,
          width_measure_mode,
          height_measure_mode,
        )
      })
      .map(CachedMeasurement::output)
  }

  /// Records a fresh result. Full layouts land in the dedicated slot;
  /// measurements append to the ring, overwriting the oldest slot once all
  /// sixteen are taken.
  pub(crate) fn store(&mut self, entry: CachedMeasurement, perform_layout: bool) {
    if perform_layout {
      self.layout_entry = Some(entry);
      return;
    }

    if self.next_index == MAX_CACHED_RESULTS {
      log::debug!("measurement cache full, wrapping to slot 0");
      self.next_index = 0;
    }
    self.entries[self.next_index] = Some(entry);
    self.next_index += 1;
  }

  /// Number of occupied measurement slots (the layout slot not included).
  #[cfg(test)]
  pub(crate) fn measurement_count(&self) -> usize {
    self.measurements().count()
  }

  fn measurements(&self) -> impl Iterator<Item = &CachedMeasurement> {
    self.entries.iter().flatten()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn entry(
    aw: f32,
    ah: f32,
    wm: MeasureMode,
    hm: MeasureMode,
    cw: f32,
    ch: f32,
  ) -> CachedMeasurement {
    CachedMeasurement {
      available_width: aw,
      available_height: ah,
      width_measure_mode: wm,
      height_measure_mode: hm,
      computed_width: cw,
      computed_height: ch,
    }
  }

  fn query(aw: f32, ah: f32, wm: MeasureMode, hm: MeasureMode) -> CacheQuery {
    CacheQuery {
      is_text: false,
      available_width: aw,
      available_height: ah,
      margin_row: 0.0,
      margin_column: 0.0,
      width_measure_mode: wm,
      height_measure_mode: hm,
    }
  }

  #[test]
  fn identical_query_is_reusable() {
    let e = entry(100.0, 50.0, MeasureMode::Exactly, MeasureMode::AtMost, 100.0, 30.0);
    let q = query(100.0, 50.0, MeasureMode::Exactly, MeasureMode::AtMost);
    assert_eq!(usable_measurement(&e, &q), Some(Size::new(100.0, 30.0)));
  }

  #[test]
  fn unconstrained_entry_satisfies_at_most_query_when_it_fits() {
    // Measured without restriction to 80 wide; an AtMost 100 query fits.
    let e = entry(
      f32::NAN,
      50.0,
      MeasureMode::Undefined,
      MeasureMode::Exactly,
      80.0,
      50.0,
    );
    let q = query(100.0, 50.0, MeasureMode::AtMost, MeasureMode::Exactly);
    assert!(usable_measurement(&e, &q).is_some());

    let too_small = query(60.0, 50.0, MeasureMode::AtMost, MeasureMode::Exactly);
    assert!(usable_measurement(&e, &too_small).is_none());
  }

  #[test]
  fn exactly_query_matches_computed_output() {
    let e = entry(200.0, 50.0, MeasureMode::AtMost, MeasureMode::Exactly, 120.0, 50.0);
    // Width query Exactly 120 matches the computed width even though the
    // original availability differed.
    let q = query(120.0, 50.0, MeasureMode::Exactly, MeasureMode::Exactly);
    assert!(usable_measurement(&e, &q).is_some());
  }

  #[test]
  fn margins_shrink_the_comparison_bound() {
    let e = entry(
      f32::NAN,
      50.0,
      MeasureMode::Undefined,
      MeasureMode::Exactly,
      95.0,
      50.0,
    );
    let mut q = query(100.0, 50.0, MeasureMode::AtMost, MeasureMode::Exactly);
    q.margin_row = 10.0;
    // 95 does not fit within 100 - 10.
    assert!(usable_measurement(&e, &q).is_none());
  }

  #[test]
  fn text_nodes_reuse_same_width_with_looser_height() {
    let e = entry(100.0, f32::NAN, MeasureMode::Exactly, MeasureMode::Undefined, 100.0, 40.0);
    let mut q = query(100.0, 90.0, MeasureMode::Exactly, MeasureMode::AtMost);
    q.is_text = true;
    // Cached height 40 < 90: reuse untouched.
    assert_eq!(usable_measurement(&e, &q), Some(Size::new(100.0, 40.0)));
  }

  #[test]
  fn text_nodes_narrow_height_to_a_tighter_bound() {
    let e = entry(100.0, f32::NAN, MeasureMode::Exactly, MeasureMode::Undefined, 100.0, 40.0);
    let mut q = query(100.0, 25.0, MeasureMode::Exactly, MeasureMode::AtMost);
    q.is_text = true;
    // The tighter bound clamps the answer; the entry itself stays intact.
    assert_eq!(usable_measurement(&e, &q), Some(Size::new(100.0, 25.0)));
  }

  #[test]
  fn text_nodes_reuse_unconstrained_width_that_fits() {
    let e = entry(
      f32::NAN,
      f32::NAN,
      MeasureMode::Undefined,
      MeasureMode::Undefined,
      60.0,
      20.0,
    );
    let mut q = query(80.0, 50.0, MeasureMode::AtMost, MeasureMode::AtMost);
    q.is_text = true;
    assert_eq!(usable_measurement(&e, &q), Some(Size::new(60.0, 20.0)));
  }

  #[test]
  fn non_text_misses_on_different_inputs() {
    let e = entry(100.0, 50.0, MeasureMode::AtMost, MeasureMode::AtMost, 70.0, 30.0);
    let q = query(90.0, 50.0, MeasureMode::AtMost, MeasureMode::AtMost);
    assert!(usable_measurement(&e, &q).is_none());
  }

  #[test]
  fn ring_wraps_after_sixteen_entries() {
    let mut cache = MeasurementCache::new();
    for i in 0..MAX_CACHED_RESULTS {
      cache.store(
        entry(
          i as f32,
          0.0,
          MeasureMode::Exactly,
          MeasureMode::Exactly,
          i as f32,
          0.0,
        ),
        false,
      );
    }
    assert_eq!(cache.measurement_count(), MAX_CACHED_RESULTS);
    assert!(cache
      .find_exact_measurement(0.0, 0.0, MeasureMode::Exactly, MeasureMode::Exactly)
      .is_some());

    // The seventeenth store evicts the oldest slot.
    cache.store(
      entry(99.0, 0.0, MeasureMode::Exactly, MeasureMode::Exactly, 99.0, 0.0),
      false,
    );
    assert_eq!(cache.measurement_count(), MAX_CACHED_RESULTS);
    assert!(cache
      .find_exact_measurement(0.0, 0.0, MeasureMode::Exactly, MeasureMode::Exactly)
      .is_none());
    assert!(cache
      .find_exact_measurement(99.0, 0.0, MeasureMode::Exactly, MeasureMode::Exactly)
      .is_some());
  }

  #[test]
  fn layout_slot_is_distinct_from_the_ring() {
    let mut cache = MeasurementCache::new();
    cache.store(
      entry(100.0, 50.0, MeasureMode::Exactly, MeasureMode::Exactly, 100.0, 50.0),
      true,
    );
    assert_eq!(cache.measurement_count(), 0);
    assert!(cache
      .find_exact_layout(100.0, 50.0, MeasureMode::Exactly, MeasureMode::Exactly)
      .is_some());
    assert!(cache
      .find_exact_measurement(100.0, 50.0, MeasureMode::Exactly, MeasureMode::Exactly)
      .is_none());
  }

  #[test]
  fn invalidate_clears_both_tiers() {
    let mut cache = MeasurementCache::new();
    cache.store(
      entry(1.0, 1.0, MeasureMode::Exactly, MeasureMode::Exactly, 1.0, 1.0),
      true,
    );
    cache.store(
      entry(2.0, 2.0, MeasureMode::Exactly, MeasureMode::Exactly, 2.0, 2.0),
      false,
    );
    cache.invalidate();
    assert!(cache
      .find_exact_layout(1.0, 1.0, MeasureMode::Exactly, MeasureMode::Exactly)
      .is_none());
    assert_eq!(cache.measurement_count(), 0);
  }
}
