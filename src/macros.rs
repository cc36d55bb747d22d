//! Macros for creating lazy singleton registries.
//!
//! This module provides a simple macro-based approach to create type-safe,
//! thread-safe lazy singleton registries with zero external dependencies.

/// Creates a complete lazy singleton registry with a single macro invocation.
///
/// The macro generates a module containing:
/// - Slot storage static (hidden)
/// - Trace callback static (hidden)
/// - An `Api` struct that implements `RegistryApi`
/// - Free functions delegating to the `API` constant
///
/// # Examples
///
/// ```rust
/// use slot_registry::define_registry;
/// use std::sync::Arc;
///
/// // Create a global registry
/// define_registry!(global);
///
/// // First demand runs the factory and publishes the instance
/// let num: Arc<i32> = global::get_or_create("answer", || 42).unwrap();
///
/// // Later demands reuse it; the factory never runs again
/// let again: Arc<i32> = global::get_or_create("answer", || 0).unwrap();
///
/// assert_eq!(*num, 42);
/// assert!(Arc::ptr_eq(&num, &again));
/// ```
///
/// # Multiple Registries
///
/// You can create multiple isolated registries:
///
/// ```rust
/// use slot_registry::define_registry;
///
/// define_registry!(services);
/// define_registry!(caches);
/// use std::sync::Arc;
///
/// // Each registry is completely isolated: the same key names
/// // different slots
/// services::get_or_create("primary", || "db pool".to_string()).unwrap();
/// caches::get_or_create("primary", || "redis pool".to_string()).unwrap();
///
/// let service: Arc<String> = services::get("primary").unwrap();
/// let cache: Arc<String> = caches::get("primary").unwrap();
/// assert_eq!(&*service, "db pool");
/// assert_eq!(&*cache, "redis pool");
/// ```
///
/// # Trait-Based Usage
///
/// If you need trait-based usage, the `API` constant is available:
///
/// ```rust
/// use slot_registry::{define_registry, RegistryApi};
/// use std::sync::Arc;
///
/// define_registry!(app);
///
/// // Use API constant for trait-based access
/// let value: Arc<i32> = app::API.get_or_create("limit", || 100).unwrap();
/// assert_eq!(*value, 100);
/// ```
#[macro_export]
macro_rules! define_registry {
    ($name:ident) => {
        pub mod $name {
            use std::collections::HashMap;
            use std::sync::{Arc, LazyLock, Mutex, RwLock};

            use $crate::{LazySlot, RegistryApi, RegistryError, SlotKey};

            // Slot storage (module-private)
            static STORAGE: LazyLock<RwLock<HashMap<SlotKey, Arc<LazySlot>>>> =
                LazyLock::new(|| RwLock::new(HashMap::new()));

            // Trace callback storage (module-private)
            static TRACE: $crate::TraceCallback = LazyLock::new(|| Mutex::new(None));

            /// Zero-sized type that implements the registry API.
            ///
            /// All registry operations are provided by the `RegistryApi`
            /// trait's default implementations. This struct only provides
            /// access to the statics.
            pub struct Api;

            impl RegistryApi for Api {
                fn storage() -> &'static LazyLock<RwLock<HashMap<SlotKey, Arc<LazySlot>>>> {
                    &STORAGE
                }

                fn trace() -> &'static $crate::TraceCallback {
                    &TRACE
                }

                // All other methods (get_or_create, get, contains, etc.) are
                // provided by the trait's default implementations!
            }

            /// Convenient constant for accessing the registry API.
            pub const API: Api = Api;

            // Free functions for ergonomic usage - they delegate to API

            /// Get the instance for `key`, constructing it on first demand.
            pub fn get_or_create<T>(
                key: impl Into<SlotKey>,
                factory: impl FnOnce() -> T,
            ) -> Result<Arc<T>, RegistryError>
            where
                T: Send + Sync + 'static,
            {
                API.get_or_create(key, factory)
            }

            /// Get the instance for `key`, constructing it on first demand
            /// with a fallible factory. A factory error leaves the slot
            /// uninitialized so a later call may retry.
            pub fn get_or_try_create<T, E>(
                key: impl Into<SlotKey>,
                factory: impl FnOnce() -> Result<T, E>,
            ) -> Result<Arc<T>, RegistryError>
            where
                T: Send + Sync + 'static,
                E: std::error::Error + Send + Sync + 'static,
            {
                API.get_or_try_create(key, factory)
            }

            /// Retrieve an already-constructed instance.
            pub fn get<T>(key: impl Into<SlotKey>) -> Result<Arc<T>, RegistryError>
            where
                T: Send + Sync + 'static,
            {
                API.get(key)
            }

            /// Retrieve a cloned copy of an already-constructed instance.
            pub fn get_cloned<T>(key: impl Into<SlotKey>) -> Result<T, RegistryError>
            where
                T: Send + Sync + Clone + 'static,
            {
                API.get_cloned(key)
            }

            /// Check whether the slot for `key` holds an initialized
            /// instance.
            pub fn contains(key: impl Into<SlotKey>) -> Result<bool, RegistryError> {
                API.contains(key)
            }

            /// Drop every slot from the registry (test-oriented teardown).
            pub fn clear() {
                API.clear()
            }

            /// Set a tracing callback for registry operations.
            pub fn set_trace_callback(
                callback: impl Fn(&$crate::RegistryEvent) + Send + Sync + 'static,
            ) {
                API.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                API.clear_trace_callback()
            }
        }
    };
}
