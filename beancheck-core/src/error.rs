//! Error types for the beancheck core library.
//!
//! Defines the metadata, generation and invocation error enums, the
//! contract-violation reports produced by the verifier, and a convenient
//! result alias. Every enum exposes stable machine-readable codes.

use std::fmt;

use thiserror::Error;

use crate::{
    descriptor::{TypeChain, TypeDescriptor, TypeName},
    value::ValueKind,
};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error raised while extracting a type's metadata from its capability
/// surface. All variants signal that the type does not conform to the
/// expected conventions; policy flags downgrade some to silent tolerance.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum MetadataError {
    /// A reader-convention operation yields no usable value or no property
    /// name.
    #[error("invalid accessor `{operation}` on `{type_name}`: {reason}")]
    InvalidAccessor {
        /// Type whose surface was being walked.
        type_name: TypeName,
        /// Offending operation name.
        operation: String,
        /// Why the accessor was rejected.
        reason: String,
    },
    /// A readable property has no conventionally named writer.
    #[error("no writer named `{expected}` for property `{property}` on `{type_name}`")]
    MissingMutator {
        /// Type whose surface was being walked.
        type_name: TypeName,
        /// Property lacking a writer.
        property: String,
        /// Writer name that was looked for.
        expected: String,
    },
    /// A writer exists with no corresponding readable property, or a second
    /// writer conflicts with the one already attached.
    #[error("unexpected writer `{operation}` for property `{property}` on `{type_name}`")]
    UnexpectedMutator {
        /// Type whose surface was being walked.
        type_name: TypeName,
        /// Property the writer names.
        property: String,
        /// Offending operation name.
        operation: String,
    },
    /// A backing field's declared type disagrees with the property it backs.
    #[error(
        "backing field for `{property}` on `{type_name}` is declared {field} but the property is {declared}"
    )]
    FieldMismatch {
        /// Type whose surface was being walked.
        type_name: TypeName,
        /// Property with the mismatched backing slot.
        property: String,
        /// Type declared by the property's accessors.
        declared: TypeDescriptor,
        /// Type declared by the backing field.
        field: TypeDescriptor,
    },
    /// No constructor is available for instantiation.
    #[error("no usable constructor on `{type_name}`")]
    NoConstructor {
        /// Type that cannot be instantiated.
        type_name: TypeName,
    },
    /// The type name has no registered capability surface.
    #[error("`{type_name}` has no registered capability surface")]
    UnregisteredType {
        /// Unknown type name.
        type_name: TypeName,
    },
}

define_error_codes! {
    /// Stable codes describing [`MetadataError`] variants.
    enum MetadataErrorCode for MetadataError {
        /// A reader-convention operation yields no usable value.
        InvalidAccessor => InvalidAccessor { .. } => "METADATA_INVALID_ACCESSOR",
        /// A readable property has no conventionally named writer.
        MissingMutator => MissingMutator { .. } => "METADATA_MISSING_MUTATOR",
        /// A writer has no property or conflicts with an attached one.
        UnexpectedMutator => UnexpectedMutator { .. } => "METADATA_UNEXPECTED_MUTATOR",
        /// A backing field disagrees with its property's declared type.
        FieldMismatch => FieldMismatch { .. } => "METADATA_FIELD_MISMATCH",
        /// No constructor is available for instantiation.
        NoConstructor => NoConstructor { .. } => "METADATA_NO_CONSTRUCTOR",
        /// The type name has no registered capability surface.
        UnregisteredType => UnregisteredType { .. } => "METADATA_UNREGISTERED_TYPE",
    }
}

/// An error raised while synthesizing a random value. Always fatal to the
/// current verification run; no partial results are produced.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GenerateError {
    /// A container's element type was not resolved at registration time.
    #[error(
        "cannot generate elements for `{property}` on `{type_name}`: {container} has no resolved element type"
    )]
    UnresolvableElementType {
        /// Type owning the container property.
        type_name: TypeName,
        /// Property or argument being generated.
        property: String,
        /// The container descriptor lacking an element type.
        container: TypeDescriptor,
    },
    /// The container type has no canonical implementation to instantiate.
    #[error(
        "cannot generate `{property}` on `{type_name}`: no canonical implementation for collection `{collection}`"
    )]
    UnknownCollectionType {
        /// Type owning the container property.
        type_name: TypeName,
        /// Property or argument being generated.
        property: String,
        /// The container type with no canonical implementation.
        collection: TypeName,
    },
    /// The enumeration declares no variants to choose from.
    #[error("cannot generate `{property}` on `{type_name}`: enum `{enum_name}` has no variants")]
    EmptyEnum {
        /// Type owning the enum property.
        type_name: TypeName,
        /// Property or argument being generated.
        property: String,
        /// The empty enumeration.
        enum_name: TypeName,
    },
    /// Generation re-entered a type already being populated on the current
    /// chain.
    #[error("recursive reference at `{path}` re-enters a bean already being populated: {chain}")]
    RecursiveBean {
        /// Dotted property path of the offending reference.
        path: String,
        /// The full chain of in-flight types, outermost first.
        chain: TypeChain,
    },
    /// No value unequal to the current one could be produced.
    #[error(
        "cannot generate a value distinct from the current one for `{property}` ({target}) on `{type_name}`"
    )]
    NoDistinctValue {
        /// Type owning the property.
        type_name: TypeName,
        /// Property or argument being perturbed.
        property: String,
        /// Target type whose equality semantics could not be broken.
        target: TypeDescriptor,
    },
}

define_error_codes! {
    /// Stable codes describing [`GenerateError`] variants.
    enum GenerateErrorCode for GenerateError {
        /// A container's element type was not resolved.
        UnresolvableElementType => UnresolvableElementType { .. } => "GENERATE_UNRESOLVABLE_ELEMENT_TYPE",
        /// The container type has no canonical implementation.
        UnknownCollectionType => UnknownCollectionType { .. } => "GENERATE_UNKNOWN_COLLECTION_TYPE",
        /// The enumeration declares no variants.
        EmptyEnum => EmptyEnum { .. } => "GENERATE_EMPTY_ENUM",
        /// Generation re-entered an in-flight type.
        RecursiveBean => RecursiveBean { .. } => "GENERATE_RECURSIVE_BEAN",
        /// No distinct value could be produced.
        NoDistinctValue => NoDistinctValue { .. } => "GENERATE_NO_DISTINCT_VALUE",
    }
}

/// An error raised by a registered capability when it is invoked: a
/// constructor, reader, writer or field slot rejecting its receiver or its
/// input value.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum InvokeError {
    /// The dynamic receiver was not the type the capability was registered
    /// for.
    #[error("capability received a foreign instance, expected `{expected}`")]
    ReceiverMismatch {
        /// Rust type the capability expects.
        expected: &'static str,
    },
    /// The supplied value does not fit the target slot.
    #[error("expected a {expected} value, got {actual}")]
    ValueMismatch {
        /// Kind of value the slot accepts.
        expected: &'static str,
        /// Kind of value that was supplied.
        actual: ValueKind,
    },
    /// A positional constructor argument was absent.
    #[error("missing constructor argument at position {index}")]
    MissingArgument {
        /// Positional index of the absent argument.
        index: usize,
    },
    /// The capability refused the invocation.
    #[error("invocation failed: {reason}")]
    Failed {
        /// Human-readable refusal reason.
        reason: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`InvokeError`] variants.
    enum InvokeErrorCode for InvokeError {
        /// The dynamic receiver was not the registered type.
        ReceiverMismatch => ReceiverMismatch { .. } => "INVOKE_RECEIVER_MISMATCH",
        /// The supplied value does not fit the target slot.
        ValueMismatch => ValueMismatch { .. } => "INVOKE_VALUE_MISMATCH",
        /// A positional constructor argument was absent.
        MissingArgument => MissingArgument { .. } => "INVOKE_MISSING_ARGUMENT",
        /// The capability refused the invocation.
        Failed => Failed { .. } => "INVOKE_FAILED",
    }
}

/// A violation of the equals/hashCode contract detected by the verifier.
///
/// These are the *product* of the tool rather than faults in it: each
/// variant carries the operation under test, the property or argument
/// involved, the constructor signature and the display form of the
/// conflicting instances, so a failure can be diagnosed without re-running.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ContractViolation {
    /// Two instances expected to be equal were not.
    #[error(
        "`{type_name}`: expected instances to be equal while {operation} (constructor {constructor}): {left} vs {right}"
    )]
    NotEqual {
        /// Type under test.
        type_name: TypeName,
        /// Operation being performed when the check failed.
        operation: String,
        /// Signature of the constructor used to build the instances.
        constructor: String,
        /// Display form of the first instance.
        left: String,
        /// Display form of the second instance.
        right: String,
    },
    /// Equal instances reported different hash codes.
    #[error(
        "`{type_name}`: equal instances report different hash codes ({left_hash} vs {right_hash}) while {operation} (constructor {constructor}): {left} vs {right}"
    )]
    HashCodeMismatch {
        /// Type under test.
        type_name: TypeName,
        /// Operation being performed when the check failed.
        operation: String,
        /// Signature of the constructor used to build the instances.
        constructor: String,
        /// Hash code of the first instance.
        left_hash: u64,
        /// Hash code of the second instance.
        right_hash: u64,
        /// Display form of the first instance.
        left: String,
        /// Display form of the second instance.
        right: String,
    },
    /// An unmodified instance changed its hash code between calls.
    #[error(
        "`{type_name}`: hash code changed on an unmodified instance while {operation}: first call {first}, repeat call {repeat}, instance {instance}"
    )]
    UnstableHashCode {
        /// Type under test.
        type_name: TypeName,
        /// Operation being performed when the check failed.
        operation: String,
        /// Hash code observed first.
        first: u64,
        /// Hash code observed on a repeated call.
        repeat: u64,
        /// Display form of the instance.
        instance: String,
    },
    /// Changing a property did not break equality.
    #[error(
        "`{type_name}`: instances stayed equal after modifying property `{property}` (constructor {constructor}): {left} vs {right}"
    )]
    PropertyInsensitive {
        /// Type under test.
        type_name: TypeName,
        /// Property that failed to participate in equality.
        property: String,
        /// Signature of the constructor used to build the instances.
        constructor: String,
        /// Display form of the unmodified instance.
        left: String,
        /// Display form of the modified instance.
        right: String,
    },
    /// Restoring a property's original value did not restore equality.
    #[error(
        "`{type_name}`: equality was not restored after setting property `{property}` back (constructor {constructor}): {left} vs {right}"
    )]
    EqualityNotRestored {
        /// Type under test.
        type_name: TypeName,
        /// Property that was restored.
        property: String,
        /// Signature of the constructor used to build the instances.
        constructor: String,
        /// Display form of the unmodified instance.
        left: String,
        /// Display form of the restored instance.
        right: String,
    },
    /// Changing a constructor argument did not break equality.
    #[error(
        "`{type_name}`: instances stayed equal after changing constructor argument {index} ({arg}) of {constructor}: {left} vs {right}"
    )]
    ArgumentInsensitive {
        /// Type under test.
        type_name: TypeName,
        /// Positional index of the insensitive argument.
        index: usize,
        /// Declared type of the argument.
        arg: TypeDescriptor,
        /// Signature of the constructor under test.
        constructor: String,
        /// Display form of the original instance.
        left: String,
        /// Display form of the reconstructed instance.
        right: String,
    },
    /// A named constructor argument was not observable through its
    /// like-named property.
    #[error(
        "`{type_name}`: property `{property}` does not reflect constructor argument {index} of {constructor}: expected {expected}, got {actual}"
    )]
    ArgumentNotBound {
        /// Type under test.
        type_name: TypeName,
        /// Property bound to the argument by name.
        property: String,
        /// Positional index of the argument.
        index: usize,
        /// Signature of the constructor under test.
        constructor: String,
        /// Display form of the substituted argument value.
        expected: String,
        /// Display form of the value read back from the property.
        actual: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`ContractViolation`] variants.
    enum ContractViolationCode for ContractViolation {
        /// Two instances expected to be equal were not.
        NotEqual => NotEqual { .. } => "CONTRACT_NOT_EQUAL",
        /// Equal instances reported different hash codes.
        HashCodeMismatch => HashCodeMismatch { .. } => "CONTRACT_HASH_CODE_MISMATCH",
        /// An unmodified instance changed its hash code between calls.
        UnstableHashCode => UnstableHashCode { .. } => "CONTRACT_UNSTABLE_HASH_CODE",
        /// Changing a property did not break equality.
        PropertyInsensitive => PropertyInsensitive { .. } => "CONTRACT_PROPERTY_INSENSITIVE",
        /// Restoring a property did not restore equality.
        EqualityNotRestored => EqualityNotRestored { .. } => "CONTRACT_EQUALITY_NOT_RESTORED",
        /// Changing a constructor argument did not break equality.
        ArgumentInsensitive => ArgumentInsensitive { .. } => "CONTRACT_ARGUMENT_INSENSITIVE",
        /// A named argument was not observable through its property.
        ArgumentNotBound => ArgumentNotBound { .. } => "CONTRACT_ARGUMENT_NOT_BOUND",
    }
}

/// Error type produced by [`crate::BeanChecker`] operations.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum BeancheckError {
    /// Metadata extraction failed.
    #[error("metadata extraction failed: {0}")]
    Metadata(#[from] MetadataError),
    /// Value generation failed.
    #[error("value generation failed: {0}")]
    Generate(#[from] GenerateError),
    /// A registered capability rejected an invocation.
    #[error("capability invocation on `{type_name}` failed: {error}")]
    Invoke {
        /// Type whose capability was being invoked.
        type_name: TypeName,
        /// Underlying invocation failure.
        #[source]
        error: InvokeError,
    },
    /// The equals/hashCode contract does not hold for the type under test.
    #[error("contract violated: {0}")]
    Violation(#[from] ContractViolation),
}

impl BeancheckError {
    pub(crate) fn invoke(type_name: TypeName, error: InvokeError) -> Self {
        Self::Invoke { type_name, error }
    }

    /// Retrieve the contract violation when the run failed an assertion.
    #[must_use]
    pub const fn violation(&self) -> Option<&ContractViolation> {
        match self {
            Self::Violation(violation) => Some(violation),
            _ => None,
        }
    }

    /// Retrieve the stable [`ContractViolationCode`] for a failed assertion.
    #[must_use]
    pub const fn violation_code(&self) -> Option<ContractViolationCode> {
        match self {
            Self::Violation(violation) => Some(violation.code()),
            _ => None,
        }
    }

    /// Retrieve the inner [`MetadataErrorCode`] when introspection failed.
    #[must_use]
    pub const fn metadata_code(&self) -> Option<MetadataErrorCode> {
        match self {
            Self::Metadata(error) => Some(error.code()),
            _ => None,
        }
    }

    /// Retrieve the inner [`GenerateErrorCode`] when generation failed.
    #[must_use]
    pub const fn generate_code(&self) -> Option<GenerateErrorCode> {
        match self {
            Self::Generate(error) => Some(error.code()),
            _ => None,
        }
    }

    /// Retrieve the inner [`InvokeErrorCode`] when a capability refused an
    /// invocation.
    #[must_use]
    pub const fn invoke_code(&self) -> Option<InvokeErrorCode> {
        match self {
            Self::Invoke { error, .. } => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, BeancheckError>;
