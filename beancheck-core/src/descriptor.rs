//! Semantic type descriptors for the beancheck core library.
//!
//! Descriptors are built once, when a type's capability surface is
//! registered, and carry everything later stages need: the kind of value a
//! property holds and, for containers, the element descriptor. Generation
//! and verification never recover type information ad hoc.

use std::{fmt, sync::Arc};

/// Stable identifier for a registered type.
///
/// Cheap to clone and usable as a map key; the engine caches metadata and
/// tracks in-flight generation chains by `TypeName` identity.
///
/// # Examples
/// ```
/// use beancheck_core::TypeName;
///
/// let name = TypeName::new("Account");
/// assert_eq!(name.as_str(), "Account");
/// assert_eq!(name.to_string(), "Account");
/// ```
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TypeName(Arc<str>);

impl TypeName {
    /// Creates a type name from any string-like input.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Ordered chain of types that were in flight when a recursive reference
/// was detected, outermost first.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeChain(Vec<TypeName>);

impl TypeChain {
    pub(crate) fn new(links: Vec<TypeName>) -> Self {
        Self(links)
    }

    /// Returns the chain links, outermost type first.
    #[must_use]
    pub fn links(&self) -> &[TypeName] {
        &self.0
    }
}

impl fmt::Display for TypeChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for link in &self.0 {
            if !first {
                f.write_str(" -> ")?;
            }
            write!(f, "{link}")?;
            first = false;
        }
        Ok(())
    }
}

/// Container species a collection descriptor can take.
///
/// `List` and `Array` map to ordered sequences, `Set` deduplicates by value
/// equality. `Other` marks a container the engine has no canonical
/// implementation for; generating one fails.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CollectionKind {
    /// Ordered, growable sequence.
    List,
    /// Deduplicating collection; element order is not significant.
    Set,
    /// Fixed-shape sequence; generated like a list.
    Array,
    /// A container type with no canonical implementation.
    Other(TypeName),
}

/// Semantic descriptor of a declared property, argument or element type.
///
/// # Examples
/// ```
/// use beancheck_core::TypeDescriptor;
///
/// let names = TypeDescriptor::list(TypeDescriptor::Str);
/// assert_eq!(names.to_string(), "list<string>");
/// assert_eq!(names.element_type(), Some(&TypeDescriptor::Str));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeDescriptor {
    /// Boolean value.
    Bool,
    /// Signed 8-bit integer.
    I8,
    /// Signed 16-bit integer.
    I16,
    /// Signed 32-bit integer.
    I32,
    /// Signed 64-bit integer.
    I64,
    /// Unsigned 8-bit integer.
    U8,
    /// Unsigned 16-bit integer.
    U16,
    /// Unsigned 32-bit integer.
    U32,
    /// Unsigned 64-bit integer.
    U64,
    /// 32-bit floating point value.
    F32,
    /// 64-bit floating point value.
    F64,
    /// Single character.
    Char,
    /// Owned string.
    Str,
    /// Enumeration with its declared variants carried inline.
    Enum {
        /// Name of the enumeration type.
        name: TypeName,
        /// Declared variants, in declaration order.
        variants: Vec<String>,
    },
    /// Container of homogeneous elements. An unresolved element descriptor
    /// means the element type could not be determined at registration time;
    /// generating such a container fails.
    Collection {
        /// Container species.
        kind: CollectionKind,
        /// Element descriptor, when statically resolved.
        element: Option<Box<TypeDescriptor>>,
    },
    /// Composite type registered with its own capability surface.
    Bean(TypeName),
}

impl TypeDescriptor {
    /// Builds a list descriptor with a resolved element type.
    #[must_use]
    pub fn list(element: Self) -> Self {
        Self::Collection {
            kind: CollectionKind::List,
            element: Some(Box::new(element)),
        }
    }

    /// Builds a set descriptor with a resolved element type.
    #[must_use]
    pub fn set(element: Self) -> Self {
        Self::Collection {
            kind: CollectionKind::Set,
            element: Some(Box::new(element)),
        }
    }

    /// Builds an array descriptor with a resolved element type.
    #[must_use]
    pub fn array(element: Self) -> Self {
        Self::Collection {
            kind: CollectionKind::Array,
            element: Some(Box::new(element)),
        }
    }

    /// Builds an enumeration descriptor from its declared variants.
    ///
    /// # Examples
    /// ```
    /// use beancheck_core::TypeDescriptor;
    ///
    /// let colour = TypeDescriptor::enumeration("Colour", ["Red", "Green"]);
    /// assert_eq!(colour.to_string(), "enum Colour");
    /// ```
    #[must_use]
    pub fn enumeration(
        name: impl Into<TypeName>,
        variants: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::Enum {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a bean descriptor referencing a registered type by name.
    #[must_use]
    pub fn bean(name: impl Into<TypeName>) -> Self {
        Self::Bean(name.into())
    }

    /// Returns the element descriptor of a container, when resolved.
    #[must_use]
    pub fn element_type(&self) -> Option<&Self> {
        match self {
            Self::Collection { element, .. } => element.as_deref(),
            _ => None,
        }
    }

    /// Returns whether this descriptor names a container type.
    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::Collection { .. })
    }

    /// Returns the registered type name of a bean descriptor.
    #[must_use]
    pub const fn bean_name(&self) -> Option<&TypeName> {
        match self {
            Self::Bean(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::I8 => f.write_str("i8"),
            Self::I16 => f.write_str("i16"),
            Self::I32 => f.write_str("i32"),
            Self::I64 => f.write_str("i64"),
            Self::U8 => f.write_str("u8"),
            Self::U16 => f.write_str("u16"),
            Self::U32 => f.write_str("u32"),
            Self::U64 => f.write_str("u64"),
            Self::F32 => f.write_str("f32"),
            Self::F64 => f.write_str("f64"),
            Self::Char => f.write_str("char"),
            Self::Str => f.write_str("string"),
            Self::Enum { name, .. } => write!(f, "enum {name}"),
            Self::Collection { kind, element } => {
                let label = match kind {
                    CollectionKind::List => "list",
                    CollectionKind::Set => "set",
                    CollectionKind::Array => "array",
                    CollectionKind::Other(name) => return write!(f, "collection {name}"),
                };
                match element {
                    Some(element) => write!(f, "{label}<{element}>"),
                    None => write!(f, "{label}<?>"),
                }
            }
            Self::Bean(name) => write!(f, "bean {name}"),
        }
    }
}
