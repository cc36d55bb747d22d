use crate::SlotKey;

/// Events emitted by the registry during operations.
///
/// These events are passed to the tracing callback set via
/// `set_trace_callback`. The `Clone` derive allows callbacks to store or
/// forward events if needed.
///
/// # Examples
///
/// ```rust
/// use slot_registry::{RegistryEvent, SlotKey};
///
/// let event = RegistryEvent::Hit { key: SlotKey::from("config") };
/// println!("{:?}", event);
/// ```
#[derive(Debug, Clone)]
pub enum RegistryEvent {
    /// A factory ran and its instance was published into the slot.
    Create {
        /// The slot the instance was constructed for
        key: SlotKey,
        /// The concrete type of the constructed instance (e.g., "i32")
        type_name: &'static str,
    },

    /// The slot already held an instance; it was returned without running
    /// the factory.
    Hit {
        /// The slot that served the existing instance
        key: SlotKey,
    },

    /// A factory failed; the slot remains uninitialized.
    ConstructionFailed {
        /// The slot whose construction attempt failed
        key: SlotKey,
    },

    /// A value was requested without a factory.
    Get {
        /// The slot that was requested
        key: SlotKey,
        /// Whether an initialized instance was found
        found: bool,
    },

    /// A slot initialization check was performed.
    Contains {
        /// The slot that was checked
        key: SlotKey,
        /// Whether the slot holds an initialized instance
        found: bool,
    },

    /// The registry was cleared.
    Clear {},
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Create { key, type_name } => {
                write!(f, "create {{ key: {}, type_name: {} }}", key, type_name)
            }
            RegistryEvent::Hit { key } => write!(f, "hit {{ key: {} }}", key),
            RegistryEvent::ConstructionFailed { key } => {
                write!(f, "construction_failed {{ key: {} }}", key)
            }
            RegistryEvent::Get { key, found } => {
                write!(f, "get {{ key: {}, found: {} }}", key, found)
            }
            RegistryEvent::Contains { key, found } => {
                write!(f, "contains {{ key: {}, found: {} }}", key, found)
            }
            RegistryEvent::Clear {} => write!(f, "Clearing the Registry"),
        }
    }
}
