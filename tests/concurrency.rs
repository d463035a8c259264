//! Concurrency soundness: readers racing mutators must only ever observe
//! valid states, and neighbors that are never removed must stay routable
//! throughout.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use kaleido::{NodeName, RandomRoutingTable};

const CHURN_ITERATIONS: usize = 5_000;

#[test]
fn churn_never_breaks_pinned_routing() {
    let table = RandomRoutingTable::new();

    let pinned: Vec<NodeName> = (0..50).map(|i| NodeName::new(format!("pin{i}"))).collect();
    table.add_neighbors(pinned.clone());

    let churn_sets: Vec<Vec<NodeName>> = [("left", 25), ("right", 25)]
        .iter()
        .map(|(prefix, count)| {
            (0..*count)
                .map(|i| NodeName::new(format!("{prefix}{i}")))
                .collect()
        })
        .collect();

    let done = AtomicBool::new(false);

    thread::scope(|scope| {
        let writers: Vec<_> = churn_sets
            .iter()
            .map(|set| {
                let table = &table;
                scope.spawn(move || {
                    for _ in 0..CHURN_ITERATIONS {
                        table.add_neighbors(set.iter().cloned());
                        table.remove_neighbors(set.iter());
                    }
                })
            })
            .collect();

        for _ in 0..2 {
            let table = &table;
            let pinned = &pinned;
            let done = &done;
            scope.spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    let snapshot = table.snapshot();
                    assert!(snapshot.is_valid());

                    for neighbor in pinned {
                        assert!(table.contains(neighbor));
                        assert!(table.next_hop(neighbor).is_some());
                    }
                }
            });
        }

        for writer in writers {
            writer.join().expect("writer thread panicked");
        }
        done.store(true, Ordering::Relaxed);
    });

    // after the churn settles, only the pinned neighbors remain
    assert_eq!(table.len(), pinned.len());
    assert!(table.snapshot().is_valid());
}
