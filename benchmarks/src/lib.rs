//! Shared helpers for lazyfront benchmark suites.

use std::hint::black_box;

use lazyfront_harness::{barrier_grid, cross_grid, Scenario};
use lazyfront_search::{Cursor, LazyFrontier};

/// `count` ascending lists of `len` items, interleaving so every list
/// contributes throughout the merge.
#[must_use]
pub fn interleaved_lists(count: u64, len: u64) -> Vec<Vec<(u64, u64)>> {
    (0..count)
        .map(|list| {
            (0..len)
                .map(|i| (i * count + list, list * len + i))
                .collect()
        })
        .collect()
}

/// Spin for `rounds` iterations of integer mixing. Stands in for an
/// expensive sorted producer.
#[must_use]
pub fn busy_work(seed: u64, rounds: u32) -> u64 {
    let mut x = seed | 1;
    for _ in 0..rounds {
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
    }
    black_box(x)
}

/// Cursor over `items` that burns `rounds` of [`busy_work`] per item.
#[must_use]
pub fn expensive_cursor(items: Vec<(u64, u64)>, rounds: u32) -> Cursor<u64, u64> {
    Cursor::new(items.into_iter().map(move |(cost, value)| {
        black_box(busy_work(value, rounds));
        (cost, value)
    }))
}

/// Push every list, then pop until empty. Returns the number of pops.
///
/// # Panics
///
/// Panics if the frontier reports an error. Benchmark inputs never fail.
pub fn fill_and_drain(
    frontier: &mut dyn LazyFrontier<u64, u64>,
    cursors: impl IntoIterator<Item = Cursor<u64, u64>>,
) -> u64 {
    for cursor in cursors {
        frontier.push(cursor).expect("push");
    }
    let mut pops = 0;
    while let Some(item) = frontier.pop().expect("pop") {
        black_box(item);
        pops += 1;
    }
    pops
}

/// Named grid scenarios used by the routing benches.
///
/// # Panics
///
/// Panics if a scenario size is rejected. The sizes here are fixed and valid.
#[must_use]
pub fn grid_regimes() -> Vec<(&'static str, Scenario)> {
    vec![
        ("barrier_20", barrier_grid(20).expect("barrier 20")),
        ("barrier_60", barrier_grid(60).expect("barrier 60")),
        ("cross_24", cross_grid(24).expect("cross 24")),
        ("cross_80", cross_grid(80).expect("cross 80")),
    ]
}
