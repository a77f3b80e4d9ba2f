#![allow(dead_code)]

use std::collections::BTreeSet;

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use vockit::ir::RawBox;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Image dimensions, including the degenerate zero case.
pub fn arb_image_dims() -> impl Strategy<Value = (u32, u32)> {
    (0u32..=4096, 0u32..=4096)
}

/// Raw box corners spanning well outside any image, in any order.
pub fn arb_raw_box() -> impl Strategy<Value = RawBox> {
    (
        -10_000i64..10_000,
        -10_000i64..10_000,
        -10_000i64..10_000,
        -10_000i64..10_000,
    )
        .prop_map(|(xmin, ymin, xmax, ymax)| RawBox::new(xmin, ymin, xmax, ymax))
}

/// A box already inside `[0, w) x [0, h)` with strictly ordered corners.
pub fn arb_inside_box() -> impl Strategy<Value = (RawBox, u32, u32)> {
    (2u32..=4096, 2u32..=4096).prop_flat_map(|(w, h)| {
        (0..w - 1, 0..h - 1).prop_flat_map(move |(x1, y1)| {
            (x1 + 1..w, y1 + 1..h).prop_map(move |(x2, y2)| {
                (
                    RawBox::new(x1 as i64, y1 as i64, x2 as i64, y2 as i64),
                    w,
                    h,
                )
            })
        })
    })
}

/// Filename-like stems.
pub fn arb_stem() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z0-9_]{1,8}").expect("valid stem regex")
}

pub fn arb_stem_set(max: usize) -> impl Strategy<Value = BTreeSet<String>> {
    proptest::collection::btree_set(arb_stem(), 0..max)
}
