use std::error::Error;
use std::fmt;

use crate::SlotKey;

/// Boxed cause of a failed construction attempt, as returned by a factory.
pub type ConstructionCause = Box<dyn Error + Send + Sync + 'static>;

#[derive(Debug)]
pub enum RegistryError {
    /// The factory failed during the unique construction attempt. The slot
    /// stays uninitialized, so a later call may attempt construction again.
    Construction {
        key: SlotKey,
        source: ConstructionCause,
    },
    /// No initialized instance exists for the slot.
    NotFound { key: SlotKey },
    /// The slot holds an instance of a different concrete type than the
    /// caller requested.
    TypeMismatch {
        key: SlotKey,
        requested: &'static str,
    },
    /// Failed to acquire the registry storage lock.
    StorageLock,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Construction { key, source } => {
                write!(f, "Construction failed for slot {key}: {source}")
            }
            RegistryError::NotFound { key } => {
                write!(f, "Slot not initialized in registry: {key}")
            }
            RegistryError::TypeMismatch { key, requested } => {
                write!(
                    f,
                    "Type mismatch in registry for slot {key}: requested {requested}"
                )
            }
            RegistryError::StorageLock => write!(f, "Failed to acquire registry storage lock"),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RegistryError::Construction { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
