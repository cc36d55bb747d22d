//! Contended startup example for slot-registry.
//!
//! Demonstrates:
//! - Many threads racing to demand the same slot during process startup
//! - The factory runs exactly once; losers block, then share the instance
//! - Steady-state reads after construction never take an exclusive lock
//!
//! Run with: `cargo run --example contended_startup`

use slot_registry::define_registry;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

define_registry!(startup);

/// Stand-in for an expensive shared resource, e.g. a connection pool.
#[derive(Debug)]
struct Pool {
    built_by: String,
    size: usize,
}

fn main() {
    println!("=== slot-registry: Contended Startup ===\n");

    const WORKERS: usize = 16;

    let factory_runs = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(WORKERS));

    println!("1. Spawning {WORKERS} workers, all demanding the same slot...\n");

    let handles: Vec<_> = (0..WORKERS)
        .map(|worker| {
            let factory_runs = Arc::clone(&factory_runs);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                // Line every worker up so they hit the slot together
                barrier.wait();

                let pool: Arc<Pool> = startup::get_or_create("pool", move || {
                    factory_runs.fetch_add(1, Ordering::SeqCst);
                    println!("   worker {worker} won the race and is building the pool");
                    // Make construction slow enough that everyone else blocks
                    thread::sleep(Duration::from_millis(100));
                    Pool {
                        built_by: format!("worker {worker}"),
                        size: 8,
                    }
                })
                .unwrap();

                pool
            })
        })
        .collect();

    let pools: Vec<Arc<Pool>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    println!("\n2. Every worker got the same instance:");
    println!("   factory runs     = {}", factory_runs.load(Ordering::SeqCst));
    println!(
        "   shared instance  = {}",
        pools[1..].iter().all(|p| Arc::ptr_eq(&pools[0], p))
    );
    println!("   pool.built_by    = {}", pools[0].built_by);
    println!("   pool.size        = {}", pools[0].size);

    println!("\n3. Steady-state reads take the fast path...");

    let pool: Arc<Pool> = startup::get("pool").unwrap();
    println!("   get(\"pool\") -> built by {}", pool.built_by);

    println!("\n=== Done ===");
}
