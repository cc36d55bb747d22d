//! # Slot Registry
//!
//! A thread-safe lazy singleton registry: at most one instance per slot,
//! constructed on first demand and shared by every caller thereafter.
//!
//! For a given key, the registry guarantees that the factory runs at most
//! once over the life of the process, no matter how many threads race to
//! request the slot concurrently, and that all callers observe the same
//! instance once constructed. A failed construction leaves the slot
//! uninitialized, so a later call may try again.
//!
//! ## Quick Start
//!
//! ```rust
//! use slot_registry::define_registry;
//! use std::sync::Arc;
//!
//! define_registry!(app);
//!
//! // The factory runs on the first demand for the slot
//! let message: Arc<String> = app::get_or_create("motd", || "Hello, World!".to_string()).unwrap();
//! assert_eq!(&*message, "Hello, World!");
//!
//! // Every later demand returns the same instance; the factory is ignored
//! let same: Arc<String> = app::get_or_create("motd", || unreachable!()).unwrap();
//! assert!(Arc::ptr_eq(&message, &same));
//! ```
//!
//! ## Features
//!
//! - **Thread-safe**: concurrent demands for one slot block on a single
//!   construction; steady-state reads take no exclusive lock
//! - **At-most-once**: the factory runs exactly once per successful
//!   construction; misuse by direct construction is impossible because
//!   slots are only reachable through the accessor
//! - **Retry on failure**: a failed factory does not poison the slot
//! - **Isolated registries**: each [`define_registry!`] invocation gets its
//!   own storage
//! - **Tracing support**: optional callback system for monitoring registry
//!   operations
//!
//! ## Main Functions
//!
//! Each generated registry module exposes:
//!
//! - `get_or_create` - Get the slot's instance, constructing it on first demand
//! - `get_or_try_create` - Same, with a fallible factory
//! - `get` - Retrieve an already-constructed instance as `Arc<T>`
//! - `get_cloned` - Retrieve a cloned value (requires `Clone`)
//! - `contains` - Check whether a slot is initialized
//! - `clear` - Drop all slots (test-oriented teardown)
//! - `set_trace_callback` - Set up tracing for registry operations

mod macros;
mod registry_error;
mod registry_event;
mod registry_trait;
mod slot;

// Re-export the main public API
pub use registry_error::{ConstructionCause, RegistryError};
pub use registry_event::RegistryEvent;
pub use registry_trait::{RegistryApi, TraceCallback};
pub use slot::{LazySlot, SlotKey};
