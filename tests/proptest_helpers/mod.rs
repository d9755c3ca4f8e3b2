#![allow(dead_code)]

use jdx::format::{Annotation, Dataset, Item, Region};
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

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

/// Regions fully inside the unit square.
pub fn arb_region() -> BoxedStrategy<Region> {
    (0.0f32..1.0, 0.0f32..1.0, 0.0f32..1.0, 0.0f32..1.0)
        .prop_map(|(x0, y0, x1, y1)| {
            Region::from_xyxy(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
        })
        .boxed()
}

pub fn arb_labels(max_labels: usize) -> BoxedStrategy<Vec<String>> {
    vec("[a-z][a-z0-9_ ]{0,15}", 0..=max_labels).boxed()
}

/// Items whose class ids stay below `label_count` (or are arbitrary when
/// there are no labels).
pub fn arb_item(label_count: usize, max_annotations: usize) -> BoxedStrategy<Item> {
    let class_id = if label_count == 0 {
        any::<u32>().boxed()
    } else {
        (0..label_count as u32).boxed()
    };

    (
        vec(any::<u8>(), 0..64),
        vec((class_id, arb_region()), 0..=max_annotations),
    )
        .prop_map(|(payload, annotations)| Item {
            payload,
            annotations: annotations
                .into_iter()
                .map(|(class_id, region)| Annotation::new(class_id, region))
                .collect(),
        })
        .boxed()
}

pub fn arb_dataset(
    max_labels: usize,
    max_items: usize,
    max_annotations: usize,
) -> BoxedStrategy<Dataset> {
    arb_labels(max_labels)
        .prop_flat_map(move |labels| {
            let items = vec(arb_item(labels.len(), max_annotations), 0..=max_items);
            (Just(labels), items)
        })
        .prop_map(|(labels, items)| Dataset::from_items(labels, items))
        .boxed()
}
