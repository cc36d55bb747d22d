//! Core trait defining registry behavior.
//!
//! This module provides the `RegistryApi` trait with default implementations
//! for lazy, at-most-once construction and retrieval of singleton instances.
//!
//! The registry is slot-based: each key ([`SlotKey`]) can have exactly one
//! instance constructed over the life of the process. The first caller to
//! demand a slot runs its factory; every later caller, on any thread,
//! receives the same instance without the factory ever running again.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, RwLock};

use crate::slot::Payload;
use crate::{LazySlot, RegistryError, RegistryEvent, SlotKey};

/// Type alias for the trace callback storage.
pub type TraceCallback = LazyLock<Mutex<Option<Arc<dyn Fn(&RegistryEvent) + Send + Sync>>>>;

/// Core trait defining registry behavior.
///
/// Provides default implementations for all registry operations, requiring
/// only two accessor methods (`storage` and `trace`) to be implemented by
/// the implementor.
///
/// The registry stores singleton slots indexed by key. A slot's instance is
/// constructed at most once, by whichever caller wins the construction race;
/// the only path to an instance is through `get_or_create` /
/// `get_or_try_create`, so no second-construction misuse path exists.
pub trait RegistryApi {
    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Access the trace callback static.
    ///
    /// This method must be implemented to provide access to the registry's
    /// trace callback.
    fn trace() -> &'static TraceCallback;

    /// Set a tracing callback for registry operations.
    ///
    /// The callback will be invoked for every registry operation
    /// (construction, hit, failed construction, get, contains, clear).
    ///
    /// # Lock Poisoning Recovery
    ///
    /// If the trace lock is poisoned (due to a panic while holding the
    /// lock), this method automatically recovers by extracting the inner
    /// value. This is safe because trace operations are non-critical and
    /// idempotent.
    ///
    /// # Safety Restrictions
    ///
    /// The callback must NOT call any registry methods on the same registry,
    /// as this will cause a deadlock. The callback is invoked while holding
    /// the trace lock.
    fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        let mut guard = Self::trace().lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    /// Clear the tracing callback.
    ///
    /// After calling this, no tracing events will be emitted.
    /// Note: This does not affect constructed instances, only the tracing
    /// callback.
    fn clear_trace_callback(&self) {
        let mut guard = Self::trace().lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    /// Convenience wrapper to emit a registry event using the current
    /// callback.
    ///
    /// # Panics
    ///
    /// If the callback itself panics, the panic will propagate to the
    /// caller. The registry storage lock is not held during callback
    /// execution, so this won't poison the registry storage.
    fn emit_event(&self, event: &RegistryEvent) {
        let guard = Self::trace().lock().unwrap_or_else(|p| p.into_inner());
        if let Some(callback) = guard.as_ref() {
            callback(event);
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Registry
    // -------------------------------------------------------------------------------------------------

    /// Access the storage static.
    ///
    /// This method must be implemented to provide access to the registry's
    /// slot storage.
    fn storage() -> &'static LazyLock<RwLock<HashMap<SlotKey, Arc<LazySlot>>>>;

    /// Returns the slot for `key`, creating an empty one if absent.
    ///
    /// The storage map is read-locked for the common lookup and
    /// write-locked only to insert a missing slot; `entry` re-checks under
    /// the write lock so racing callers agree on a single slot. No map lock
    /// is held once this method returns, which is what allows factories to
    /// construct instances for *other* keys.
    ///
    /// # Lock Poisoning Recovery
    ///
    /// Both map locks recover from poisoning. The map only ever holds fully
    /// formed `Arc<LazySlot>` entries, so a recovered guard is always
    /// consistent.
    fn slot(&self, key: &SlotKey) -> Arc<LazySlot> {
        {
            let map = Self::storage().read().unwrap_or_else(|p| p.into_inner());
            if let Some(slot) = map.get(key) {
                return Arc::clone(slot);
            }
        }

        let mut map = Self::storage().write().unwrap_or_else(|p| p.into_inner());
        Arc::clone(map.entry(key.clone()).or_default())
    }

    /// Returns the instance for `key`, constructing it with `factory` if
    /// this is the first demand for the slot.
    ///
    /// The factory is invoked at most once per slot over the life of the
    /// process, no matter how many threads call concurrently; every caller
    /// receives an `Arc` to the same instance. Callers that lose the
    /// construction race block until the winner publishes, then return via
    /// the fast path.
    ///
    /// The factory may call back into the registry for *other* keys.
    /// Requesting the same key from inside its own factory deadlocks and is
    /// caller error.
    ///
    /// # Errors
    ///
    /// - The slot already holds an instance of a different concrete type
    fn get_or_create<T>(
        &self,
        key: impl Into<SlotKey>,
        factory: impl FnOnce() -> T,
    ) -> Result<Arc<T>, RegistryError>
    where
        T: Send + Sync + 'static,
    {
        self.get_or_try_create(key, || Ok::<T, std::convert::Infallible>(factory()))
    }

    /// Returns the instance for `key`, constructing it with a fallible
    /// `factory` if this is the first demand for the slot.
    ///
    /// Same contract as [`get_or_create`](RegistryApi::get_or_create), with
    /// one addition: a factory error does NOT mark the slot initialized.
    /// The error is returned to the caller whose factory ran; callers that
    /// were blocked waiting on the construction lock re-check, find the
    /// slot still empty, and attempt construction with their own factory.
    ///
    /// # Errors
    ///
    /// - The factory failed (`RegistryError::Construction`, with the cause
    ///   as `source`)
    /// - The slot already holds an instance of a different concrete type
    fn get_or_try_create<T, E>(
        &self,
        key: impl Into<SlotKey>,
        factory: impl FnOnce() -> Result<T, E>,
    ) -> Result<Arc<T>, RegistryError>
    where
        T: Send + Sync + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        let key = key.into();
        let slot = self.slot(&key);

        let mut constructed = false;
        let outcome = slot.get_or_try_init(|| {
            constructed = true;
            match factory() {
                Ok(instance) => Ok(Arc::new(instance) as Payload),
                Err(cause) => Err(RegistryError::Construction {
                    key: key.clone(),
                    source: Box::new(cause),
                }),
            }
        });

        match outcome {
            Ok(payload) => {
                if constructed {
                    self.emit_event(&RegistryEvent::Create {
                        key: key.clone(),
                        type_name: std::any::type_name::<T>(),
                    });
                } else {
                    self.emit_event(&RegistryEvent::Hit { key: key.clone() });
                }

                payload
                    .downcast::<T>()
                    .map_err(|_| RegistryError::TypeMismatch {
                        key,
                        requested: std::any::type_name::<T>(),
                    })
            }
            Err(error) => {
                self.emit_event(&RegistryEvent::ConstructionFailed { key });
                Err(error)
            }
        }
    }

    /// Retrieve an already-constructed instance without supplying a factory.
    ///
    /// Returns `Ok(Arc<T>)` only once some caller has constructed the slot.
    ///
    /// # Errors
    ///
    /// - The slot is absent or not yet initialized
    /// - The slot holds an instance of a different concrete type
    /// - Registry storage lock is poisoned
    fn get<T>(&self, key: impl Into<SlotKey>) -> Result<Arc<T>, RegistryError>
    where
        T: Send + Sync + 'static,
    {
        let key = key.into();

        let map = Self::storage()
            .read()
            .map_err(|_| RegistryError::StorageLock)?;
        let slot = map.get(&key).cloned();
        drop(map);

        let result = match slot.and_then(|slot| slot.get()) {
            Some(payload) => payload
                .downcast::<T>()
                .map_err(|_| RegistryError::TypeMismatch {
                    key: key.clone(),
                    requested: std::any::type_name::<T>(),
                }),
            None => Err(RegistryError::NotFound { key: key.clone() }),
        };

        self.emit_event(&RegistryEvent::Get {
            key,
            found: result.is_ok(),
        });

        result
    }

    /// Retrieve a cloned copy of an already-constructed instance.
    ///
    /// Returns an owned value by cloning the instance stored in the slot.
    /// The type `T` must implement `Clone`. This is useful if you need to
    /// own the value rather than share it via `Arc<T>`.
    ///
    /// # Errors
    ///
    /// - The slot is absent or not yet initialized
    /// - The slot holds an instance of a different concrete type
    fn get_cloned<T>(&self, key: impl Into<SlotKey>) -> Result<T, RegistryError>
    where
        T: Send + Sync + Clone + 'static,
    {
        let arc: Arc<T> = self.get(key)?;
        Ok((*arc).clone())
    }

    /// Check whether the slot for `key` holds an initialized instance.
    ///
    /// A slot whose construction is still in flight reports `false`: only
    /// fully published instances are observable.
    ///
    /// # Errors
    ///
    /// - Registry storage lock is poisoned
    fn contains(&self, key: impl Into<SlotKey>) -> Result<bool, RegistryError> {
        let key = key.into();

        let found = Self::storage()
            .read()
            .map(|map| {
                map.get(&key)
                    .is_some_and(|slot| slot.is_initialized())
            })
            .map_err(|_| RegistryError::StorageLock)?;

        self.emit_event(&RegistryEvent::Contains { key, found });

        Ok(found)
    }

    /// Drop every slot from the registry.
    ///
    /// This is the explicit teardown hook, primarily intended for tests
    /// that need to reset process-wide state between runs. It does NOT
    /// affect:
    /// - Already-retrieved `Arc<T>` references (they remain valid)
    /// - The tracing callback (use `clear_trace_callback()` to clear that)
    ///
    /// After `clear()`, the next `get_or_create` for a key runs its factory
    /// again.
    ///
    /// # Lock Poisoning Recovery
    ///
    /// If the storage lock is poisoned, this method silently fails.
    /// This is acceptable for a test-only method.
    fn clear(&self) {
        self.emit_event(&RegistryEvent::Clear {});

        if let Ok(mut map) = Self::storage().write() {
            map.clear();
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
