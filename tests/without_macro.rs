//! Integration tests demonstrating how to use the lazy registry WITHOUT the
//! macro.
//!
//! This shows the manual implementation approach, which gives you full
//! control over the registry setup. This is useful when you need custom
//! behavior or want to understand how the macro works under the hood.
//!
//! NOTE: All tests use #[serial] because they share the same static registry
//! (MY_REGISTRY). Running them in parallel would cause interference and
//! non-deterministic failures.

use serial_test::serial;
use slot_registry::{LazySlot, RegistryApi, RegistryError, SlotKey, TraceCallback};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, RwLock};

// ============================================================================
// Manual Registry Implementation (Without Macro)
// ============================================================================

/// Define the static slot storage for our registry
static MY_STORAGE: LazyLock<RwLock<HashMap<SlotKey, Arc<LazySlot>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Define the static trace callback storage
static MY_TRACE: TraceCallback = LazyLock::new(|| Mutex::new(None));

/// Our custom registry API implementation
struct MyRegistry;

impl RegistryApi for MyRegistry {
    fn storage() -> &'static LazyLock<RwLock<HashMap<SlotKey, Arc<LazySlot>>>> {
        &MY_STORAGE
    }

    fn trace() -> &'static TraceCallback {
        &MY_TRACE
    }
}

/// Constant instance of our registry
const MY_REGISTRY: MyRegistry = MyRegistry;

// ============================================================================
// Tests Using Manual Implementation
// ============================================================================

#[test]
#[serial]
fn test_basic_get_or_create() {
    MY_REGISTRY.clear();

    // First demand constructs
    let value: Arc<i32> = MY_REGISTRY.get_or_create("answer", || 42).unwrap();
    assert_eq!(*value, 42);

    // Later demands reuse
    let again: Arc<i32> = MY_REGISTRY.get_or_create("answer", || 0).unwrap();
    assert!(Arc::ptr_eq(&value, &again));
}

#[test]
#[serial]
fn test_multiple_slots() {
    MY_REGISTRY.clear();

    MY_REGISTRY.get_or_create("count", || 100u32).unwrap();
    MY_REGISTRY
        .get_or_create("label", || "Hello".to_string())
        .unwrap();
    MY_REGISTRY.get_or_create("ratio", || 3.14f64).unwrap();

    let num: Arc<u32> = MY_REGISTRY.get("count").unwrap();
    let text: Arc<String> = MY_REGISTRY.get("label").unwrap();
    let pi: Arc<f64> = MY_REGISTRY.get("ratio").unwrap();

    assert_eq!(*num, 100);
    assert_eq!(&**text, "Hello");
    assert_eq!(*pi, 3.14);
}

#[test]
#[serial]
fn test_contains_check() {
    MY_REGISTRY.clear();

    MY_REGISTRY.get_or_create("present", || 999i64).unwrap();

    assert!(MY_REGISTRY.contains("present").unwrap());
    assert!(!MY_REGISTRY.contains("absent").unwrap());
}

#[test]
#[serial]
fn test_get_cloned() {
    MY_REGISTRY.clear();

    MY_REGISTRY
        .get_or_create("word", || "cloned".to_string())
        .unwrap();

    let value: String = MY_REGISTRY.get_cloned("word").unwrap();
    assert_eq!(value, "cloned");
}

#[test]
#[serial]
fn test_failed_construction_then_retry() {
    MY_REGISTRY.clear();

    let failing: Result<Arc<i32>, _> = MY_REGISTRY.get_or_try_create("retry-me", || {
        Err::<i32, _>(std::io::Error::other("not yet"))
    });
    assert!(matches!(failing, Err(RegistryError::Construction { .. })));

    // The slot stays open for a later successful attempt
    let value = MY_REGISTRY
        .get_or_try_create("retry-me", || Ok::<_, std::io::Error>(1i32))
        .unwrap();
    assert_eq!(*value, 1);
}

#[test]
#[serial]
fn test_with_tracing() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    MY_REGISTRY.clear();

    // Counter for trace events
    let event_count = Arc::new(AtomicUsize::new(0));
    let event_count_clone = Arc::clone(&event_count);

    MY_REGISTRY.set_trace_callback(move |_event| {
        event_count_clone.fetch_add(1, Ordering::SeqCst);
    });

    MY_REGISTRY.get_or_create("traced", || 777i32).unwrap(); // +1 create
    let _: Arc<i32> = MY_REGISTRY.get("traced").unwrap(); // +1 get
    MY_REGISTRY.contains("traced").unwrap(); // +1 contains

    assert_eq!(event_count.load(Ordering::SeqCst), 3);

    // Clean up trace callback
    MY_REGISTRY.clear_trace_callback();
}

#[test]
#[serial]
fn test_custom_struct() {
    MY_REGISTRY.clear();

    #[derive(Debug, Clone)]
    struct Config {
        host: String,
        port: u16,
    }

    let config: Arc<Config> = MY_REGISTRY
        .get_or_create("config", || Config {
            host: "localhost".to_string(),
            port: 8080,
        })
        .unwrap();

    assert_eq!(config.host, "localhost");
    assert_eq!(config.port, 8080);
}

// ============================================================================
// Multiple Manual Registries Example
// ============================================================================

/// Second registry for isolation testing
static ANOTHER_STORAGE: LazyLock<RwLock<HashMap<SlotKey, Arc<LazySlot>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

static ANOTHER_TRACE: TraceCallback = LazyLock::new(|| Mutex::new(None));

struct AnotherRegistry;

impl RegistryApi for AnotherRegistry {
    fn storage() -> &'static LazyLock<RwLock<HashMap<SlotKey, Arc<LazySlot>>>> {
        &ANOTHER_STORAGE
    }

    fn trace() -> &'static TraceCallback {
        &ANOTHER_TRACE
    }
}

const ANOTHER: AnotherRegistry = AnotherRegistry;

#[test]
#[serial]
fn test_multiple_manual_registries() {
    MY_REGISTRY.clear();
    ANOTHER.clear();

    // The same key in each registry names an independent slot
    MY_REGISTRY.get_or_create("value", || 100i32).unwrap();
    ANOTHER.get_or_create("value", || 200i32).unwrap();

    let my_val: Arc<i32> = MY_REGISTRY.get("value").unwrap();
    let another_val: Arc<i32> = ANOTHER.get("value").unwrap();

    assert_eq!(*my_val, 100);
    assert_eq!(*another_val, 200);
}

// ============================================================================
// Advanced: Custom Registry with Additional Features
// ============================================================================

#[cfg(test)]
mod advanced {
    use super::*;

    /// A registry wrapper with additional features
    struct LoggingRegistry {
        inner: MyRegistry,
    }

    impl LoggingRegistry {
        const fn new() -> Self {
            Self { inner: MyRegistry }
        }

        /// Construct with logging
        fn get_or_create_with_log<T: Send + Sync + 'static>(
            &self,
            key: &'static str,
            factory: impl FnOnce() -> T,
        ) -> Result<Arc<T>, RegistryError> {
            println!("Demanding slot: {key}");
            self.inner.get_or_create(key, factory)
        }
    }

    #[test]
    #[serial]
    fn test_logging_registry() {
        MY_REGISTRY.clear();

        let registry = LoggingRegistry::new();

        let value = registry.get_or_create_with_log("logged", || 42i32).unwrap();
        assert_eq!(*value, 42);
    }
}
