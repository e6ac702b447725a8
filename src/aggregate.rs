//! Aggregator: groups stored results by (datatype, parallelism) and orders
//! each group ascending by element count.
//!
//! The store iterates in hash order, so every grouping here sorts
//! explicitly. Trend plots rely on that ordering.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::store::{LatencyResult, ResultStore};

/// One point of a trend line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TrendPoint {
    pub numelements: u64,
    /// log2 of the element count. Element counts are positive by construction.
    pub log2_elements: f64,
    /// Mean latency in µs.
    pub mean: f64,
    /// Population standard deviation in µs.
    pub std: f64,
}

impl TrendPoint {
    fn from_result(result: &LatencyResult) -> Self {
        Self {
            numelements: result.numelements(),
            log2_elements: (result.numelements() as f64).log2(),
            mean: result.mean(),
            std: result.std(),
        }
    }
}

/// (datatype, parallelism)
pub type GroupKey = (String, u32);

/// Read-only grouping view over a [`ResultStore`].
#[derive(Clone, Copy, Debug)]
pub struct Aggregator<'a> {
    store: &'a ResultStore,
}

impl<'a> Aggregator<'a> {
    pub fn new(store: &'a ResultStore) -> Self {
        Self { store }
    }

    /// Distinct datatypes, ascending.
    pub fn datatypes(&self) -> BTreeSet<&'a str> {
        self.store.iter().map(LatencyResult::datatype).collect()
    }

    /// Distinct parallelism values, ascending.
    pub fn parallelisms(&self) -> BTreeSet<u32> {
        self.store.iter().map(LatencyResult::parallel).collect()
    }

    /// Results for one (datatype, parallelism) pair, strictly ascending by
    /// element count. Empty when the pair has no results.
    pub fn group(&self, datatype: &str, parallel: u32) -> Vec<&'a LatencyResult> {
        let mut group: Vec<&'a LatencyResult> = self
            .store
            .iter()
            .filter(|r| r.datatype() == datatype && r.parallel() == parallel)
            .collect();
        sort_by_elements(&mut group);
        group
    }

    /// Every (datatype, parallelism) pair present, each group sorted.
    pub fn groups(&self) -> BTreeMap<GroupKey, Vec<&'a LatencyResult>> {
        let mut groups: BTreeMap<GroupKey, Vec<&'a LatencyResult>> = BTreeMap::new();
        for result in self.store.iter() {
            groups
                .entry((result.datatype().to_string(), result.parallel()))
                .or_default()
                .push(result);
        }
        for group in groups.values_mut() {
            sort_by_elements(group);
        }
        groups
    }

    /// Per-parallelism trend lines for one datatype.
    pub fn trends(&self, datatype: &str) -> BTreeMap<u32, Vec<TrendPoint>> {
        self.groups()
            .into_iter()
            .filter(|((dt, _), _)| dt == datatype)
            .map(|((_, parallel), group)| {
                let points = group.into_iter().map(TrendPoint::from_result).collect();
                (parallel, points)
            })
            .collect()
    }

    /// Every result in artifact order: datatype, then parallelism, then element count.
    pub fn ordered(&self) -> Vec<&'a LatencyResult> {
        self.groups().into_values().flatten().collect()
    }
}

fn sort_by_elements(group: &mut [&LatencyResult]) {
    group.sort_by_key(|r| r.numelements());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::{Configuration, NameLayout};
    use crate::stats::LatencyStats;
    use proptest::prelude::*;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn result(datatype: &str, numelements: u64, parallel: u32, mean_ns: f64) -> LatencyResult {
        LatencyResult {
            configuration: Configuration::new(datatype, numelements, parallel).unwrap(),
            layout: NameLayout::Current,
            source_file: format!("{datatype}_el{numelements}_par{parallel}.txt"),
            stats: LatencyStats::from_nanoseconds(&[mean_ns - 500.0, mean_ns + 500.0]).unwrap(),
        }
    }

    fn store_of(results: Vec<LatencyResult>) -> ResultStore {
        let mut store = ResultStore::new();
        for r in results {
            store.insert(r);
        }
        store
    }

    #[test]
    fn distinct_datatypes_and_parallelisms() {
        let store = store_of(vec![
            result("u32", 10, 1, 1000.0),
            result("u32", 10, 4, 1000.0),
            result("f64", 10, 2, 1000.0),
        ]);
        let agg = Aggregator::new(&store);
        assert_eq!(agg.datatypes().into_iter().collect::<Vec<_>>(), vec!["f64", "u32"]);
        assert_eq!(agg.parallelisms().into_iter().collect::<Vec<_>>(), vec![1, 2, 4]);
    }

    #[test]
    fn missing_pair_yields_empty_group() {
        let store = store_of(vec![result("u32", 10, 1, 1000.0)]);
        let agg = Aggregator::new(&store);
        assert!(agg.group("u32", 8).is_empty());
        assert!(agg.group("i8", 1).is_empty());
        assert!(agg.trends("i8").is_empty());
    }

    #[test]
    fn trend_points_use_log2_elements() {
        let store = store_of(vec![
            result("u32", 1024, 2, 4000.0),
            result("u32", 1, 2, 1000.0),
            result("u32", 32, 2, 2000.0),
        ]);
        let trends = Aggregator::new(&store).trends("u32");
        let points = &trends[&2];
        let xs: Vec<f64> = points.iter().map(|p| p.log2_elements).collect();
        assert_eq!(xs, vec![0.0, 5.0, 10.0]);
        let means: Vec<f64> = points.iter().map(|p| p.mean).collect();
        assert_eq!(means, vec![1.0, 2.0, 4.0]);
        assert!((points[0].std - 0.5).abs() < 1e-12);
    }

    #[test]
    fn ordered_follows_artifact_order() {
        let store = store_of(vec![
            result("u32", 100, 1, 1000.0),
            result("u32", 10, 2, 1000.0),
            result("f32", 5, 1, 1000.0),
            result("u32", 10, 1, 1000.0),
        ]);
        let names: Vec<&str> = Aggregator::new(&store)
            .ordered()
            .into_iter()
            .map(|r| r.source_file.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "f32_el5_par1.txt",
                "u32_el10_par1.txt",
                "u32_el100_par1.txt",
                "u32_el10_par2.txt",
            ]
        );
    }

    proptest! {
        #[test]
        fn groups_ascend_regardless_of_insertion_order(
            counts in prop::collection::btree_set(1u64..1_000_000, 1..40),
            seed in any::<u64>(),
        ) {
            let mut results: Vec<LatencyResult> = counts
                .iter()
                .flat_map(|&n| [result("u16", n, 1, 2000.0), result("u16", n, 3, 2000.0)])
                .collect();
            results.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
            let store = store_of(results);
            let agg = Aggregator::new(&store);
            for parallel in [1, 3] {
                let group = agg.group("u16", parallel);
                prop_assert_eq!(group.len(), counts.len());
                prop_assert!(group.windows(2).all(|w| w[0].numelements() < w[1].numelements()));
            }
            for group in agg.groups().values() {
                prop_assert!(group.windows(2).all(|w| w[0].numelements() < w[1].numelements()));
            }
        }
    }
}
