//! Error types for metadata resolution and field access

/// Result type for reflective operations
pub type ReflectResult<T> = Result<T, ReflectError>;

/// Reflection error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReflectError {
    /// The type (or one of its supertypes/interfaces) was never registered
    #[error("Type not registered: {name}")]
    UnregisteredType {
        /// Rust type name, or the raw `TypeId` when only an instance was available
        name: String,
    },

    /// A descriptor for this type already exists
    #[error("Type already registered: {name}")]
    AlreadyRegistered {
        /// Rust type name
        name: String,
    },

    /// No property field with this name is indexed for the type
    #[error("Field not found: {type_name}.{field}")]
    FieldNotFound {
        /// Type that was searched
        type_name: String,
        /// Requested field name
        field: String,
    },

    /// The requested value type does not match the slot's declared type
    #[error("Type mismatch on field '{field}': expected {expected}, got {got}")]
    TypeMismatch {
        /// Field name
        field: String,
        /// Declared slot type
        expected: String,
        /// Type the caller asked for
        got: String,
    },

    /// A pre-resolved field entry was used against an instance of another type
    #[error("Field '{field}' belongs to {owner}, not to the given instance")]
    ForeignInstance {
        /// Field name
        field: String,
        /// Type the entry was resolved for
        owner: String,
    },

    /// The type has no zero-argument constructor registered
    #[error("Type {name} has no zero-argument constructor")]
    MissingDefaultConstructor {
        /// Rust type name
        name: String,
    },

    /// Following superclass links returned to an already visited type
    #[error("Cyclic type hierarchy at {name}")]
    CyclicHierarchy {
        /// First type seen twice
        name: String,
    },
}

impl ReflectError {
    /// Build a `TypeMismatch` from a field name and two type names
    pub fn type_mismatch(field: &str, expected: &str, got: &str) -> Self {
        ReflectError::TypeMismatch {
            field: field.to_string(),
            expected: expected.to_string(),
            got: got.to_string(),
        }
    }
}
