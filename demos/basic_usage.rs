//! Basic usage example for slot-registry.
//!
//! Demonstrates:
//! - Constructing singletons on first demand with `get_or_create()`
//! - Reuse on later demands (the factory never runs twice)
//! - Fallible construction with `get_or_try_create()` and retry
//! - Checking slot status with `contains()`
//!
//! Run with: `cargo run --example basic_usage`

use slot_registry::define_registry;
use std::sync::Arc;

// Create an isolated registry for this example
define_registry!(app);

// Custom struct to demonstrate complex types
#[derive(Debug)]
struct AppConfig {
    name: String,
    version: u32,
    debug_mode: bool,
}

fn main() {
    println!("=== slot-registry: Basic Usage ===\n");

    // -------------------------------------------------------------------------
    // 1. Construct a singleton on first demand
    // -------------------------------------------------------------------------
    println!("1. First demand runs the factory...");

    let config: Arc<AppConfig> = app::get_or_create("config", || {
        println!("   (factory running)");
        AppConfig {
            name: "MyApp".to_string(),
            version: 1,
            debug_mode: true,
        }
    })
    .unwrap();

    println!(
        "   Constructed: {} v{} (debug: {})",
        config.name, config.version, config.debug_mode
    );

    // -------------------------------------------------------------------------
    // 2. Later demands reuse the instance
    // -------------------------------------------------------------------------
    println!("\n2. Second demand reuses the instance...");

    let same: Arc<AppConfig> = app::get_or_create("config", || {
        println!("   (this factory never runs)");
        AppConfig {
            name: "Replacement".to_string(),
            version: 2,
            debug_mode: false,
        }
    })
    .unwrap();

    println!("   Same instance: {}", Arc::ptr_eq(&config, &same));

    // -------------------------------------------------------------------------
    // 3. Distinct keys hold distinct singletons
    // -------------------------------------------------------------------------
    println!("\n3. Distinct keys are independent...");

    app::get_or_create("motd", || "Hello, slot-registry!".to_string()).unwrap();
    app::get_or_create("max-connections", || 100u32).unwrap();

    let motd: Arc<String> = app::get("motd").unwrap();
    let max_connections: Arc<u32> = app::get("max-connections").unwrap();
    println!("   motd            = {motd}");
    println!("   max-connections = {max_connections}");

    // -------------------------------------------------------------------------
    // 4. Check slot status with contains()
    // -------------------------------------------------------------------------
    println!("\n4. Checking slot status with contains()...");

    println!("   contains(\"config\")  = {}", app::contains("config").unwrap());
    println!("   contains(\"missing\") = {}", app::contains("missing").unwrap());

    // -------------------------------------------------------------------------
    // 5. Fallible construction: failure leaves the slot open for retry
    // -------------------------------------------------------------------------
    println!("\n5. Fallible construction with get_or_try_create()...");

    let failed: Result<Arc<String>, _> = app::get_or_try_create("database", || {
        Err::<String, _>(std::io::Error::other("database is still booting"))
    });
    println!("   First attempt:  {}", failed.unwrap_err());
    println!("   Slot initialized? {}", app::contains("database").unwrap());

    let connected = app::get_or_try_create("database", || {
        Ok::<_, std::io::Error>("postgres://localhost".to_string())
    })
    .unwrap();
    println!("   Second attempt: connected to {}", connected);

    println!("\n=== Done ===");
}
