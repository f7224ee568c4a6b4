/*!
 * Queue Discipline Integration Tests
 *
 * The same contract checks run against every queue implementation.
 */

use prime_pipeline::{BlockingQueue, LockFreeQueue, SpinQueue, WorkQueue};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

/// Several producers push disjoint ranges, several consumers drain
fn check_no_loss_no_duplicates<Q: WorkQueue<u64> + 'static>() {
    const PRODUCERS: u64 = 4;
    const PER_PRODUCER: u64 = 5_000;
    const CONSUMERS: usize = 4;

    let queue = Arc::new(Q::default());
    let start = Arc::new(Barrier::new(PRODUCERS as usize + CONSUMERS));

    let consumers: Vec<_> = (0..CONSUMERS)
        .map(|c| {
            let queue = queue.clone();
            let start = start.clone();
            thread::spawn(move || {
                start.wait();
                let mut seen = Vec::new();
                // Mix both pop flavours
                loop {
                    if c % 2 == 0 {
                        if let Some(item) = queue.try_pop() {
                            seen.push(item);
                            continue;
                        }
                    }
                    match queue.wait_pop() {
                        Some(item) => seen.push(item),
                        None => break,
                    }
                }
                seen
            })
        })
        .collect();

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let queue = queue.clone();
            let start = start.clone();
            thread::spawn(move || {
                start.wait();
                for i in 0..PER_PRODUCER {
                    queue.push(p * PER_PRODUCER + i);
                }
            })
        })
        .collect();

    for producer in producers {
        producer.join().unwrap();
    }
    queue.close();

    let mut all = HashSet::new();
    let mut total = 0;
    for consumer in consumers {
        for item in consumer.join().unwrap() {
            total += 1;
            assert!(all.insert(item), "item {} returned twice", item);
        }
    }

    assert_eq!(total, (PRODUCERS * PER_PRODUCER) as usize);
    assert_eq!(all.len(), total);
    assert!(queue.is_empty());
}

/// End-of-stream must never be reported while items remain or before close
fn check_no_premature_end<Q: WorkQueue<u64> + 'static>() {
    let queue = Arc::new(Q::default());
    let finished = Arc::new(AtomicBool::new(false));

    let consumer = {
        let queue = queue.clone();
        let finished = finished.clone();
        thread::spawn(move || {
            let mut count = 0u64;
            while queue.wait_pop().is_some() {
                count += 1;
            }
            finished.store(true, Ordering::SeqCst);
            count
        })
    };

    for i in 0..1_000 {
        queue.push(i);
    }
    thread::sleep(Duration::from_millis(50));
    assert!(
        !finished.load(Ordering::SeqCst),
        "consumer saw end-of-stream before close"
    );

    for i in 1_000..2_000 {
        queue.push(i);
    }
    queue.close();

    assert_eq!(consumer.join().unwrap(), 2_000);
}

/// Closing twice behaves exactly like closing once
fn check_idempotent_close<Q: WorkQueue<u64>>() {
    let once = Q::default();
    let twice = Q::default();
    for q in [&once, &twice] {
        q.push(1);
        q.push(2);
    }
    once.close();
    twice.close();
    twice.close();

    assert_eq!(once.len(), twice.len());
    assert_eq!(once.is_closed(), twice.is_closed());
    let drain = |q: &Q| std::iter::from_fn(|| q.wait_pop()).collect::<Vec<_>>();
    assert_eq!(drain(&once), drain(&twice));
    assert_eq!(once.wait_pop(), twice.wait_pop());
}

/// Every consumer parked on an empty queue is released by close
fn check_close_releases_all_waiters<Q: WorkQueue<u64> + 'static>() {
    let queue = Arc::new(Q::default());
    let released = Arc::new(AtomicUsize::new(0));

    let waiters: Vec<_> = (0..3)
        .map(|_| {
            let queue = queue.clone();
            let released = released.clone();
            thread::spawn(move || {
                assert_eq!(queue.wait_pop(), None);
                released.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(50));
    assert_eq!(released.load(Ordering::SeqCst), 0);
    queue.close();

    for waiter in waiters {
        waiter.join().unwrap();
    }
    assert_eq!(released.load(Ordering::SeqCst), 3);
}

/// The item that races with close must still be delivered
fn check_last_item_before_close<Q: WorkQueue<u64> + 'static>() {
    for round in 0..200 {
        let queue = Arc::new(Q::default());
        let consumer = {
            let queue = queue.clone();
            thread::spawn(move || std::iter::from_fn(|| queue.wait_pop()).collect::<Vec<_>>())
        };
        queue.push(round);
        queue.close();
        assert_eq!(consumer.join().unwrap(), vec![round]);
    }
}

macro_rules! queue_contract_tests {
    ($module:ident, $queue:ty) => {
        mod $module {
            use super::*;

            #[test]
            fn test_no_loss_no_duplicates() {
                check_no_loss_no_duplicates::<$queue>();
            }

            #[test]
            fn test_no_premature_end() {
                check_no_premature_end::<$queue>();
            }

            #[test]
            fn test_idempotent_close() {
                check_idempotent_close::<$queue>();
            }

            #[test]
            fn test_close_releases_all_waiters() {
                check_close_releases_all_waiters::<$queue>();
            }

            #[test]
            fn test_last_item_before_close() {
                check_last_item_before_close::<$queue>();
            }
        }
    };
}

queue_contract_tests!(spin, SpinQueue<u64>);
queue_contract_tests!(lock_free, LockFreeQueue<u64>);
queue_contract_tests!(blocking, BlockingQueue<u64>);
