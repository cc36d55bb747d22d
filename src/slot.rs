//! Singleton slots: the registration key and the double-checked
//! construction cell that backs every registry operation.
//!
//! A [`LazySlot`] holds at most one instance for the whole process lifetime.
//! The instance is constructed on first demand by whichever caller wins the
//! construction race; every other caller, on any thread, observes that same
//! instance. A failed construction leaves the slot empty so a later call may
//! try again.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// Type-erased instance shared between a slot and every caller.
pub(crate) type Payload = Arc<dyn Any + Send + Sync>;

/// Identifies one singleton slot within a registry.
///
/// A key is an opaque token: the registry never interprets it beyond
/// equality and hashing. Keys convert from string literals and owned
/// strings, so call sites normally never name this type.
///
/// # Examples
///
/// ```rust
/// use slot_registry::SlotKey;
///
/// let a = SlotKey::from("database");
/// let b = SlotKey::from("database".to_string());
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "database");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey(Cow<'static, str>);

impl SlotKey {
    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for SlotKey {
    fn from(token: &'static str) -> Self {
        SlotKey(Cow::Borrowed(token))
    }
}

impl From<String> for SlotKey {
    fn from(token: String) -> Self {
        SlotKey(Cow::Owned(token))
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One singleton slot: an `initialized` flag plus a write-once instance.
///
/// The slot enforces the at-most-once contract with a double-checked
/// acquisition protocol:
///
/// 1. Fast path: an `Acquire` load of the flag. Once it reads `true` the
///    instance is fully published and is returned under the shared read
///    lock, concurrently with any number of other readers.
/// 2. Slow path: the exclusive write lock is taken and the slot re-checked,
///    because another thread may have finished construction while this one
///    was blocked on the lock.
/// 3. Still empty: the constructor runs, the instance is stored, and only
///    then is the flag set with `Release` ordering. The flag never reverts.
///
/// Construction state is never partially visible: the instance is written
/// before the flag, and readers load the flag before the instance.
pub struct LazySlot {
    /// Monotonic false -> true, set only after `value` holds the instance.
    ready: AtomicBool,
    /// Written exactly once, under the write lock. Never reassigned.
    value: RwLock<Option<Payload>>,
}

impl LazySlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        LazySlot {
            ready: AtomicBool::new(false),
            value: RwLock::new(None),
        }
    }

    /// True once an instance has been published. Never blocks.
    pub fn is_initialized(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Fast path: returns the published instance, or `None` if the slot is
    /// empty or still under construction.
    ///
    /// Takes only shared read access. The `Acquire` load pairs with the
    /// `Release` store in `get_or_try_init`, so a `true` flag guarantees the
    /// value read below observes the completed write.
    pub(crate) fn get(&self) -> Option<Payload> {
        if !self.is_initialized() {
            return None;
        }

        self.value
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Returns the instance, running `construct` first if this call wins the
    /// construction race.
    ///
    /// Callers that lose the race block on the write lock until the winner
    /// publishes or fails, then proceed: a published instance is returned
    /// from the re-check, a failed attempt leaves the slot empty and the
    /// blocked caller runs its own constructor.
    ///
    /// On `Err` the slot is untouched (not poisoned into a permanently
    /// failed state), so any later call may attempt construction again.
    ///
    /// # Lock Poisoning Recovery
    ///
    /// A constructor that panics poisons the write lock but never the slot
    /// contents: `value` is only written after the constructor returns, so a
    /// recovered guard always sees a consistent `Option` and later callers
    /// retry as if the attempt had returned `Err`.
    pub(crate) fn get_or_try_init<E>(
        &self,
        construct: impl FnOnce() -> Result<Payload, E>,
    ) -> Result<Payload, E> {
        if let Some(existing) = self.get() {
            return Ok(existing);
        }

        let mut guard = self
            .value
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Double check: another thread may have completed construction while
        // this one was blocked waiting for the lock.
        if let Some(existing) = guard.as_ref() {
            return Ok(Arc::clone(existing));
        }

        let instance = construct()?;
        *guard = Some(Arc::clone(&instance));
        self.ready.store(true, Ordering::Release);

        Ok(instance)
    }
}

impl Default for LazySlot {
    fn default() -> Self {
        LazySlot::new()
    }
}

impl fmt::Debug for LazySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySlot")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::atomic::AtomicUsize;

    fn payload<T: Send + Sync + 'static>(value: T) -> Payload {
        Arc::new(value)
    }

    #[test]
    fn test_key_conversions_agree() {
        let borrowed = SlotKey::from("config");
        let owned = SlotKey::from("config".to_string());

        assert_eq!(borrowed, owned);
        assert_eq!(borrowed.as_str(), "config");
        assert_eq!(owned.to_string(), "config");
    }

    #[test]
    fn test_empty_slot() {
        let slot = LazySlot::new();

        assert!(!slot.is_initialized());
        assert!(slot.get().is_none());
    }

    #[test]
    fn test_init_publishes_exactly_once() {
        let slot = LazySlot::new();
        let calls = AtomicUsize::new(0);

        let first = slot
            .get_or_try_init(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(payload(42i32))
            })
            .unwrap();

        // Second call must reuse the stored instance, not re-construct
        let second = slot
            .get_or_try_init(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(payload(99i32))
            })
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(slot.is_initialized());
        assert_eq!(*second.downcast::<i32>().unwrap(), 42);
    }

    #[test]
    fn test_failed_init_leaves_slot_empty() {
        let slot = LazySlot::new();

        let attempt: Result<Payload, &str> = slot.get_or_try_init(|| Err("constructor refused"));
        assert_eq!(attempt.unwrap_err(), "constructor refused");

        // The failure must not mark the slot initialized
        assert!(!slot.is_initialized());
        assert!(slot.get().is_none());

        // A later attempt constructs as if the failure never happened
        let recovered = slot
            .get_or_try_init(|| Ok::<_, &str>(payload("second try".to_string())))
            .unwrap();
        assert!(slot.is_initialized());
        assert_eq!(&*recovered.downcast::<String>().unwrap(), "second try");
    }

    #[test]
    fn test_fast_path_matches_slow_path() {
        let slot = LazySlot::new();

        let stored = slot
            .get_or_try_init(|| Ok::<_, Infallible>(payload(7u64)))
            .unwrap();
        let fast = slot.get().expect("initialized slot must serve the fast path");

        assert!(Arc::ptr_eq(&stored, &fast));
    }

    #[test]
    fn test_contended_init_runs_constructor_once() {
        use std::sync::Barrier;
        use std::thread;

        let slot = Arc::new(LazySlot::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let slot = Arc::clone(&slot);
                let calls = Arc::clone(&calls);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    slot.get_or_try_init(|| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok::<_, Infallible>(payload("winner".to_string()))
                    })
                    .unwrap()
                })
            })
            .collect();

        let instances: Vec<Payload> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        for instance in &instances[1..] {
            assert!(Arc::ptr_eq(&instances[0], instance));
        }
    }
}
