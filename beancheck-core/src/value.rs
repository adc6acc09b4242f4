//! Dynamic value universe shared by generation, population and comparison.
//!
//! The engine never sees concrete Rust types directly: readers produce
//! [`Value`]s, writers and constructors consume them, and bean instances are
//! carried as [`BeanInstance`]s whose equality, hashing and rendering are
//! supplied by the type's own implementations at registration time. That
//! keeps `Value` equality self-contained, including the (possibly broken)
//! equality of the type under test.

use std::{
    any::Any,
    cell::RefCell,
    fmt,
    hash::{Hash, Hasher},
    rc::Rc,
};

use crate::{descriptor::TypeName, error::InvokeError};

/// A dynamically typed value the engine can generate, compare and route
/// through accessors.
///
/// Equality is structural for primitives, strings, enums and containers
/// (floats compare bitwise; sets compare regardless of order) and delegates
/// to the registered instance operations for beans.
///
/// # Examples
/// ```
/// use beancheck_core::Value;
///
/// let value = Value::from("token");
/// let round_tripped: String = value.clone().try_into()?;
/// assert_eq!(round_tripped, "token");
/// assert_eq!(value.to_string(), "\"token\"");
/// # Ok::<(), beancheck_core::InvokeError>(())
/// ```
#[derive(Clone, Debug)]
pub enum Value {
    /// The absence of a value; written for ignored and cycle-broken
    /// properties.
    Absent,
    /// Boolean value.
    Bool(bool),
    /// Signed 8-bit integer.
    I8(i8),
    /// Signed 16-bit integer.
    I16(i16),
    /// Signed 32-bit integer.
    I32(i32),
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 8-bit integer.
    U8(u8),
    /// Unsigned 16-bit integer.
    U16(u16),
    /// Unsigned 32-bit integer.
    U32(u32),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 32-bit float; compared bitwise.
    F32(f32),
    /// 64-bit float; compared bitwise.
    F64(f64),
    /// Single character.
    Char(char),
    /// Owned string.
    Str(String),
    /// Enumeration constant.
    Enum {
        /// Enumeration type the constant belongs to.
        ty: TypeName,
        /// Variant name.
        variant: String,
    },
    /// Ordered sequence (lists and arrays).
    Seq(Vec<Value>),
    /// Deduplicated collection; order is not significant for equality.
    Set(Vec<Value>),
    /// Instance of a registered bean type.
    Bean(BeanInstance),
}

/// Discriminant of a [`Value`], used in diagnostics.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ValueKind {
    /// See [`Value::Absent`].
    Absent,
    /// See [`Value::Bool`].
    Bool,
    /// Any integer variant.
    Integer,
    /// Any float variant.
    Float,
    /// See [`Value::Char`].
    Char,
    /// See [`Value::Str`].
    Str,
    /// See [`Value::Enum`].
    Enum,
    /// See [`Value::Seq`].
    Seq,
    /// See [`Value::Set`].
    Set,
    /// See [`Value::Bean`].
    Bean,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Absent => "absent",
            Self::Bool => "bool",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Char => "char",
            Self::Str => "string",
            Self::Enum => "enum",
            Self::Seq => "sequence",
            Self::Set => "set",
            Self::Bean => "bean",
        };
        f.write_str(label)
    }
}

impl Value {
    /// Returns the discriminant of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Absent => ValueKind::Absent,
            Self::Bool(_) => ValueKind::Bool,
            Self::I8(_)
            | Self::I16(_)
            | Self::I32(_)
            | Self::I64(_)
            | Self::U8(_)
            | Self::U16(_)
            | Self::U32(_)
            | Self::U64(_) => ValueKind::Integer,
            Self::F32(_) | Self::F64(_) => ValueKind::Float,
            Self::Char(_) => ValueKind::Char,
            Self::Str(_) => ValueKind::Str,
            Self::Enum { .. } => ValueKind::Enum,
            Self::Seq(_) => ValueKind::Seq,
            Self::Set(_) => ValueKind::Set,
            Self::Bean(_) => ValueKind::Bean,
        }
    }

    /// Returns whether this value is [`Value::Absent`].
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Extracts the variant name of an enum value.
    ///
    /// # Errors
    /// Returns [`InvokeError::ValueMismatch`] for non-enum values.
    pub fn try_variant(&self) -> core::result::Result<&str, InvokeError> {
        match self {
            Self::Enum { variant, .. } => Ok(variant),
            other => Err(InvokeError::ValueMismatch {
                expected: "enum",
                actual: other.kind(),
            }),
        }
    }

    /// Converts the elements of a sequence or set value.
    ///
    /// # Errors
    /// Returns [`InvokeError::ValueMismatch`] when the value is not a
    /// container or an element does not convert.
    pub fn try_items<T>(&self) -> core::result::Result<Vec<T>, InvokeError>
    where
        T: TryFrom<Value, Error = InvokeError>,
    {
        match self {
            Self::Seq(items) | Self::Set(items) => {
                items.iter().cloned().map(T::try_from).collect()
            }
            other => Err(InvokeError::ValueMismatch {
                expected: "sequence or set",
                actual: other.kind(),
            }),
        }
    }

    /// Extracts a clone of the concrete state behind a bean value.
    ///
    /// # Errors
    /// Returns [`InvokeError::ValueMismatch`] for non-bean values and
    /// [`InvokeError::ReceiverMismatch`] when the instance holds another
    /// type.
    pub fn try_bean<T: Any + Clone>(&self) -> core::result::Result<T, InvokeError> {
        match self {
            Self::Bean(instance) => instance.extract(),
            other => Err(InvokeError::ValueMismatch {
                expected: "bean",
                actual: other.kind(),
            }),
        }
    }

    /// Like [`Value::try_bean`] but maps [`Value::Absent`] to `None`,
    /// matching optional bean-typed storage.
    ///
    /// # Errors
    /// Propagates the failures of [`Value::try_bean`].
    pub fn try_bean_opt<T: Any + Clone>(&self) -> core::result::Result<Option<T>, InvokeError> {
        match self {
            Self::Absent => Ok(None),
            other => other.try_bean().map(Some),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Absent, Self::Absent) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::U8(a), Self::U8(b)) => a == b,
            (Self::U16(a), Self::U16(b)) => a == b,
            (Self::U32(a), Self::U32(b)) => a == b,
            (Self::U64(a), Self::U64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a.to_bits() == b.to_bits(),
            (Self::F64(a), Self::F64(b)) => a.to_bits() == b.to_bits(),
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (
                Self::Enum { ty: a_ty, variant: a },
                Self::Enum { ty: b_ty, variant: b },
            ) => a_ty == b_ty && a == b,
            (Self::Seq(a), Self::Seq(b)) => a == b,
            (Self::Set(a), Self::Set(b)) => {
                a.len() == b.len() && a.iter().all(|item| b.contains(item))
            }
            (Self::Bean(a), Self::Bean(b)) => a.eq_to(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("<absent>"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::I8(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v:?}"),
            Self::Str(v) => write!(f, "{v:?}"),
            Self::Enum { ty, variant } => write!(f, "{ty}::{variant}"),
            Self::Seq(items) => render_items(f, items, "[", "]"),
            Self::Set(items) => render_items(f, items, "{", "}"),
            Self::Bean(instance) => f.write_str(&instance.render()),
        }
    }
}

fn render_items(
    f: &mut fmt::Formatter<'_>,
    items: &[Value],
    open: &str,
    close: &str,
) -> fmt::Result {
    f.write_str(open)?;
    let mut first = true;
    for item in items {
        if !first {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
        first = false;
    }
    f.write_str(close)
}

macro_rules! impl_value_conversions {
    ($($Variant:ident => $ty:ty, $expected:literal);+ $(;)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$Variant(value)
                }
            }

            impl TryFrom<Value> for $ty {
                type Error = InvokeError;

                fn try_from(value: Value) -> core::result::Result<Self, InvokeError> {
                    match value {
                        Value::$Variant(inner) => Ok(inner),
                        other => Err(InvokeError::ValueMismatch {
                            expected: $expected,
                            actual: other.kind(),
                        }),
                    }
                }
            }
        )+
    };
}

impl_value_conversions! {
    Bool => bool, "bool";
    I8 => i8, "i8";
    I16 => i16, "i16";
    I32 => i32, "i32";
    I64 => i64, "i64";
    U8 => u8, "u8";
    U16 => u16, "u16";
    U32 => u32, "u32";
    U64 => u64, "u64";
    F32 => f32, "f32";
    F64 => f64, "f64";
    Char => char, "char";
    Str => String, "string";
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

type DynEqFn = Box<dyn Fn(&dyn Any, &dyn Any) -> bool>;
type DynHashFn = Box<dyn Fn(&dyn Any) -> u64>;
type DynDisplayFn = Box<dyn Fn(&dyn Any) -> String>;

/// Per-type equality, hashing and rendering operations captured when the
/// type's surface is registered. These are the implementations under test.
pub struct InstanceOps {
    eq: DynEqFn,
    hash: DynHashFn,
    display: DynDisplayFn,
}

impl InstanceOps {
    /// Captures `T`'s own `PartialEq`, `Hash` and `Debug` implementations.
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: Any + PartialEq + Hash + fmt::Debug,
    {
        Self {
            eq: Box::new(|left, right| {
                match (left.downcast_ref::<T>(), right.downcast_ref::<T>()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }),
            hash: Box::new(|state| {
                state.downcast_ref::<T>().map_or(0, |value| {
                    let mut hasher = std::hash::DefaultHasher::new();
                    value.hash(&mut hasher);
                    hasher.finish()
                })
            }),
            display: Box::new(|state| {
                state
                    .downcast_ref::<T>()
                    .map_or_else(|| String::from("<foreign state>"), |value| format!("{value:?}"))
            }),
        }
    }
}

impl fmt::Debug for InstanceOps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceOps").finish_non_exhaustive()
    }
}

/// A live instance of a registered bean type.
///
/// The concrete state is held behind shared ownership so values can be
/// cloned into several instances the way object references are; equality,
/// hashing and rendering delegate to the operations registered for the
/// type.
#[derive(Clone)]
pub struct BeanInstance {
    ty: TypeName,
    ops: Rc<InstanceOps>,
    state: Rc<RefCell<Box<dyn Any>>>,
}

impl BeanInstance {
    /// Wraps a concrete value using its own trait implementations.
    ///
    /// Primarily useful in readers that expose nested bean-typed state.
    #[must_use]
    pub fn of<T>(ty: impl Into<TypeName>, value: T) -> Self
    where
        T: Any + PartialEq + Hash + fmt::Debug,
    {
        Self::from_parts(ty.into(), Rc::new(InstanceOps::of::<T>()), Box::new(value))
    }

    pub(crate) fn from_parts(ty: TypeName, ops: Rc<InstanceOps>, state: Box<dyn Any>) -> Self {
        Self {
            ty,
            ops,
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Returns the registered name of the instance's type.
    #[must_use]
    pub const fn type_name(&self) -> &TypeName {
        &self.ty
    }

    /// Compares this instance to another using the registered equality.
    ///
    /// Instances of different registered types are never equal.
    #[must_use]
    pub fn eq_to(&self, other: &Self) -> bool {
        if self.ty != other.ty {
            return false;
        }
        let left = self.state.borrow();
        let right = other.state.borrow();
        (self.ops.eq)(left.as_ref(), right.as_ref())
    }

    /// Computes the instance's hash code using the registered hashing.
    #[must_use]
    pub fn hash_value(&self) -> u64 {
        let state = self.state.borrow();
        (self.ops.hash)(state.as_ref())
    }

    /// Renders the instance for diagnostics.
    #[must_use]
    pub fn render(&self) -> String {
        let state = self.state.borrow();
        (self.ops.display)(state.as_ref())
    }

    /// Extracts a clone of the concrete state.
    ///
    /// # Errors
    /// Returns [`InvokeError::ReceiverMismatch`] when the instance holds a
    /// different type than `T`.
    pub fn extract<T: Any + Clone>(&self) -> core::result::Result<T, InvokeError> {
        let state = self.state.borrow();
        state
            .downcast_ref::<T>()
            .cloned()
            .ok_or(InvokeError::ReceiverMismatch {
                expected: std::any::type_name::<T>(),
            })
    }

    pub(crate) fn read_with(
        &self,
        read: &dyn Fn(&dyn Any) -> core::result::Result<Value, InvokeError>,
    ) -> core::result::Result<Value, InvokeError> {
        let state = self.state.borrow();
        read(state.as_ref())
    }

    pub(crate) fn write_with(
        &self,
        write: &dyn Fn(&mut dyn Any, Value) -> core::result::Result<(), InvokeError>,
        value: Value,
    ) -> core::result::Result<(), InvokeError> {
        let mut state = self.state.borrow_mut();
        write(state.as_mut(), value)
    }
}

impl fmt::Debug for BeanInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanInstance")
            .field("type", &self.ty)
            .finish_non_exhaustive()
    }
}
