//! Measure-callback interaction: what the callback sees, when the cache
//! spares a call, and how dirtying forces re-measurement.

use std::cell::RefCell;
use std::rc::Rc;

use flexlay::{
  is_undefined, Direction, Edge, FlexTree, MeasureMode, NodeId, Size, UNDEFINED,
};

fn assert_feq(actual: f32, expected: f32) {
  assert!(
    (actual - expected).abs() < 0.001,
    "expected {expected}, got {actual}"
  );
}

/// Surfaces the engine's pass tracing when tests run with RUST_LOG set.
fn init_logging() {
  let _ = env_logger::builder().is_test(true).try_init();
}

/// Installs a measure callback returning a fixed size and counting its
/// invocations.
fn counting_measure(tree: &mut FlexTree, node: NodeId, size: Size) -> Rc<RefCell<usize>> {
  let count = Rc::new(RefCell::new(0usize));
  let counter = Rc::clone(&count);
  tree.set_measure_func(
    node,
    Some(Box::new(move |_, _, _, _| {
      *counter.borrow_mut() += 1;
      size
    })),
  );
  count
}

#[test]
fn measure_receives_inner_constraints() {
  init_logging();
  let mut tree = FlexTree::new();
  let leaf = tree.new_node();
  tree.set_padding(leaf, Edge::All, 5.0);

  let seen = Rc::new(RefCell::new(None));
  let sink = Rc::clone(&seen);
  tree.set_measure_func(
    leaf,
    Some(Box::new(move |w, wm, h, hm| {
      *sink.borrow_mut() = Some((w, wm, h, hm));
      Size::new(42.0, 17.0)
    })),
  );

  tree.compute_layout(leaf, 100.0, UNDEFINED, Direction::Ltr);

  let (w, wm, h, hm) = seen.borrow().expect("measure was not called");
  // Inner width excludes the 5px padding on each side.
  assert_feq(w, 90.0);
  assert_eq!(wm, MeasureMode::Exactly);
  assert!(is_undefined(h));
  assert_eq!(hm, MeasureMode::Undefined);

  // Exact width sticks; the measured height gains the padding back.
  assert_feq(tree.layout(leaf).width(), 100.0);
  assert_feq(tree.layout(leaf).height(), 27.0);
}

#[test]
fn measured_leaf_stretches_inside_a_container() {
  init_logging();
  let mut tree = FlexTree::new();
  let root = tree.new_node();
  tree.set_width(root, 100.0);
  tree.set_height(root, 100.0);
  let leaf = tree.new_node();
  tree.add_child(root, leaf);
  let count = counting_measure(&mut tree, leaf, Size::new(42.0, 17.0));

  tree.compute_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr);

  // Stretch alignment hands the leaf the full width; content height wins.
  assert_feq(tree.layout(leaf).width(), 100.0);
  assert_feq(tree.layout(leaf).height(), 17.0);
  assert_feq(tree.layout(leaf).left(), 0.0);
  assert_feq(tree.layout(leaf).top(), 0.0);
  // All the flex passes resolved from one real measurement.
  assert_eq!(*count.borrow(), 1);

  // A second identical layout is answered entirely from the caches.
  tree.compute_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr);
  assert_eq!(*count.borrow(), 1);
}

#[test]
fn mark_dirty_forces_remeasurement() {
  init_logging();
  let mut tree = FlexTree::new();
  let root = tree.new_node();
  tree.set_width(root, 100.0);
  tree.set_height(root, 100.0);
  let leaf = tree.new_node();
  tree.add_child(root, leaf);
  let count = counting_measure(&mut tree, leaf, Size::new(42.0, 17.0));

  tree.compute_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr);
  let baseline = *count.borrow();

  tree.mark_dirty(leaf);
  assert!(tree.is_dirty(root));
  tree.compute_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr);

  assert!(*count.borrow() > baseline, "dirty leaf was not re-measured");
}

#[test]
fn clean_siblings_keep_their_measurements() {
  init_logging();
  let mut tree = FlexTree::new();
  let root = tree.new_node();
  tree.set_width(root, 100.0);
  tree.set_height(root, 200.0);
  let dirty_leaf = tree.new_node();
  tree.add_child(root, dirty_leaf);
  let clean_leaf = tree.new_node();
  tree.add_child(root, clean_leaf);

  let dirty_count = counting_measure(&mut tree, dirty_leaf, Size::new(42.0, 17.0));
  let clean_count = counting_measure(&mut tree, clean_leaf, Size::new(30.0, 11.0));

  tree.compute_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr);
  let dirty_baseline = *dirty_count.borrow();
  let clean_baseline = *clean_count.borrow();

  tree.mark_dirty(dirty_leaf);
  tree.compute_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr);

  assert!(*dirty_count.borrow() > dirty_baseline);
  assert_eq!(*clean_count.borrow(), clean_baseline);
}

#[test]
fn text_nodes_tolerate_looser_height_constraints() {
  init_logging();
  // The same tree twice: a text leaf re-uses its measurement when only the
  // height bound grows, a plain leaf measures again.
  fn measure_count_after_height_change(is_text: bool) -> usize {
    let mut tree = FlexTree::new();
    let root = tree.new_node();
    tree.set_width(root, 100.0);
    let leaf = tree.new_node();
    tree.set_is_text(leaf, is_text);
    tree.add_child(root, leaf);
    let count = counting_measure(&mut tree, leaf, Size::new(42.0, 17.0));

    tree.compute_layout(root, 100.0, 200.0, Direction::Ltr);
    tree.compute_layout(root, 100.0, 300.0, Direction::Ltr);
    let result = *count.borrow();
    result
  }

  assert_eq!(measure_count_after_height_change(true), 1);
  assert_eq!(measure_count_after_height_change(false), 2);
}

#[test]
fn zero_inner_space_skips_the_callback() {
  init_logging();
  let mut tree = FlexTree::new();
  let leaf = tree.new_node();
  tree.set_padding(leaf, Edge::All, 10.0);
  let count = counting_measure(&mut tree, leaf, Size::new(42.0, 17.0));

  // 20px of padding consumes the whole 15px availability.
  tree.compute_layout(leaf, 15.0, UNDEFINED, Direction::Ltr);

  assert_eq!(*count.borrow(), 0);
  // The leaf still reports at least its padding.
  assert_feq(tree.layout(leaf).height(), 20.0);
}
