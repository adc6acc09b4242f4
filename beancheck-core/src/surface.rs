//! Capability surfaces: the engine's stand-in for runtime reflection.
//!
//! A [`TypeSurface`] enumerates everything the engine may do with a type
//! (invoke constructors, call operations, touch field slots) as typed
//! closures over the dynamic [`Value`] universe. Surfaces are
//! registered once in a [`TypeRegistry`] and queried during introspection;
//! nothing is looked up dynamically afterwards.

use std::{any::Any, collections::HashMap, fmt, hash::Hash, marker::PhantomData, rc::Rc};

use crate::{
    descriptor::{TypeDescriptor, TypeName},
    error::InvokeError,
    value::{InstanceOps, Value},
};

pub(crate) type ReadFn = Rc<dyn Fn(&dyn Any) -> Result<Value, InvokeError>>;
pub(crate) type WriteFn = Rc<dyn Fn(&mut dyn Any, Value) -> Result<(), InvokeError>>;
pub(crate) type CtorFn = Rc<dyn Fn(&ArgValues<'_>) -> Result<Box<dyn Any>, InvokeError>>;

/// Positional view over the argument vector handed to a constructor
/// capability.
///
/// # Examples
/// ```
/// use beancheck_core::{ArgValues, Value};
///
/// let values = [Value::from("label"), Value::from(7_i64)];
/// let args = ArgValues::new(&values);
/// let label: String = args.take(0)?;
/// let count: i64 = args.take(1)?;
/// assert_eq!((label.as_str(), count), ("label", 7));
/// # Ok::<(), beancheck_core::InvokeError>(())
/// ```
pub struct ArgValues<'a> {
    values: &'a [Value],
}

impl<'a> ArgValues<'a> {
    /// Wraps a positional argument slice.
    #[must_use]
    pub const fn new(values: &'a [Value]) -> Self {
        Self { values }
    }

    /// Returns the number of arguments.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether the argument vector is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the raw value at `index`, if present.
    #[must_use]
    pub fn raw(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Converts the argument at `index` into a concrete type.
    ///
    /// # Errors
    /// Returns [`InvokeError::MissingArgument`] when the position is absent
    /// and the conversion's own error when the value does not fit.
    pub fn take<T>(&self, index: usize) -> Result<T, InvokeError>
    where
        T: TryFrom<Value, Error = InvokeError>,
    {
        let value = self
            .values
            .get(index)
            .ok_or(InvokeError::MissingArgument { index })?;
        T::try_from(value.clone())
    }

    /// Extracts a bean-typed argument at `index`.
    ///
    /// # Errors
    /// Returns [`InvokeError::MissingArgument`] when the position is absent
    /// and the bean extraction failures otherwise.
    pub fn bean<T: Any + Clone>(&self, index: usize) -> Result<T, InvokeError> {
        self.values
            .get(index)
            .ok_or(InvokeError::MissingArgument { index })?
            .try_bean()
    }
}

/// Declared parameter of a registered constructor.
///
/// A name is attached only when the registering code can bind the parameter
/// to a like-named property; unnamed parameters cannot participate in the
/// verifier's binding checks.
#[derive(Clone, Debug)]
pub struct ParamSpec {
    pub(crate) name: Option<String>,
    pub(crate) ty: TypeDescriptor,
}

impl ParamSpec {
    /// Declares a parameter bound to the property of the same name.
    #[must_use]
    pub fn named(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: Some(name.into()),
            ty,
        }
    }

    /// Declares a positional parameter with no property binding.
    #[must_use]
    pub const fn unnamed(ty: TypeDescriptor) -> Self {
        Self { name: None, ty }
    }

    /// Returns the bound property name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the parameter's declared type.
    #[must_use]
    pub const fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }
}

pub(crate) struct ConstructorSpec {
    pub(crate) params: Vec<ParamSpec>,
    pub(crate) public: bool,
    pub(crate) invoke: CtorFn,
}

pub(crate) enum OperationShape {
    Reader {
        returns: TypeDescriptor,
        invoke: ReadFn,
    },
    Writer {
        param: TypeDescriptor,
        invoke: WriteFn,
    },
    // Zero-argument, value-free operation; only interesting when its name
    // follows a reader convention, which the introspector rejects.
    Action,
}

pub(crate) struct Operation {
    pub(crate) name: String,
    pub(crate) shape: OperationShape,
}

pub(crate) struct FieldSlot {
    pub(crate) name: String,
    pub(crate) ty: TypeDescriptor,
    pub(crate) public: bool,
    pub(crate) read: ReadFn,
    pub(crate) write: WriteFn,
}

/// The registered capability surface of one type: its constructors,
/// operations and field slots, plus the instance operations used to
/// compare, hash and render instances.
///
/// Build one with [`TypeSurface::builder`] and add it to a
/// [`TypeRegistry`].
pub struct TypeSurface {
    name: TypeName,
    constructors: Vec<ConstructorSpec>,
    operations: Vec<Operation>,
    fields: Vec<FieldSlot>,
    instance_ops: Rc<InstanceOps>,
}

impl TypeSurface {
    /// Starts building a surface for the concrete type `T`.
    #[must_use]
    pub fn builder<T>(name: impl Into<TypeName>) -> SurfaceBuilder<T>
    where
        T: Any + PartialEq + Hash + fmt::Debug,
    {
        SurfaceBuilder::new(name.into())
    }

    /// Returns the registered type name.
    #[must_use]
    pub const fn name(&self) -> &TypeName {
        &self.name
    }

    pub(crate) fn constructors(&self) -> &[ConstructorSpec] {
        &self.constructors
    }

    pub(crate) fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub(crate) fn fields(&self) -> &[FieldSlot] {
        &self.fields
    }

    pub(crate) const fn instance_ops(&self) -> &Rc<InstanceOps> {
        &self.instance_ops
    }
}

impl fmt::Debug for TypeSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeSurface")
            .field("name", &self.name)
            .field("constructors", &self.constructors.len())
            .field("operations", &self.operations.len())
            .field("fields", &self.fields.len())
            .finish_non_exhaustive()
    }
}

/// Fluent builder assembling a [`TypeSurface`] for a concrete type.
///
/// Closures are registered against `&T`/`&mut T`; the builder wraps them
/// with downcasts that surface [`InvokeError::ReceiverMismatch`] instead of
/// panicking when handed foreign state.
///
/// # Examples
/// ```
/// use beancheck_core::{TypeDescriptor, TypeSurface, Value};
///
/// #[derive(Debug, Default, PartialEq, Hash)]
/// struct Badge {
///     label: String,
/// }
///
/// let surface = TypeSurface::builder::<Badge>("Badge")
///     .ctor0(Badge::default)
///     .reader("label", TypeDescriptor::Str, |b: &Badge| {
///         Value::from(b.label.clone())
///     })
///     .writer("set_label", TypeDescriptor::Str, |b: &mut Badge, v| {
///         b.label = v.try_into()?;
///         Ok(())
///     })
///     .build();
/// assert_eq!(surface.name().as_str(), "Badge");
/// ```
pub struct SurfaceBuilder<T> {
    name: TypeName,
    constructors: Vec<ConstructorSpec>,
    operations: Vec<Operation>,
    fields: Vec<FieldSlot>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SurfaceBuilder<T>
where
    T: Any + PartialEq + Hash + fmt::Debug,
{
    fn new(name: TypeName) -> Self {
        Self {
            name,
            constructors: Vec::new(),
            operations: Vec::new(),
            fields: Vec::new(),
            _marker: PhantomData,
        }
    }

    fn push_ctor(
        &mut self,
        params: Vec<ParamSpec>,
        public: bool,
        make: impl Fn(&ArgValues<'_>) -> Result<T, InvokeError> + 'static,
    ) {
        let invoke: CtorFn = Rc::new(move |args| make(args).map(|value| Box::new(value) as Box<dyn Any>));
        self.constructors.push(ConstructorSpec {
            params,
            public,
            invoke,
        });
    }

    /// Registers a public zero-argument constructor.
    #[must_use]
    pub fn ctor0(mut self, make: impl Fn() -> T + 'static) -> Self {
        self.push_ctor(Vec::new(), true, move |_args| Ok(make()));
        self
    }

    /// Registers a zero-argument constructor that requires bypassing
    /// normal visibility to invoke.
    #[must_use]
    pub fn private_ctor0(mut self, make: impl Fn() -> T + 'static) -> Self {
        self.push_ctor(Vec::new(), false, move |_args| Ok(make()));
        self
    }

    /// Registers a public constructor with positional parameters.
    #[must_use]
    pub fn ctor(
        mut self,
        params: Vec<ParamSpec>,
        make: impl Fn(&ArgValues<'_>) -> Result<T, InvokeError> + 'static,
    ) -> Self {
        self.push_ctor(params, true, make);
        self
    }

    /// Registers a zero-argument, value-free operation.
    ///
    /// Harmless unless its name follows a reader convention, in which case
    /// introspection treats it as an invalid accessor.
    #[must_use]
    pub fn action(mut self, name: impl Into<String>) -> Self {
        self.operations.push(Operation {
            name: name.into(),
            shape: OperationShape::Action,
        });
        self
    }

    /// Registers a zero-argument reader operation.
    #[must_use]
    pub fn reader(
        mut self,
        name: impl Into<String>,
        returns: TypeDescriptor,
        read: impl Fn(&T) -> Value + 'static,
    ) -> Self {
        self.operations.push(Operation {
            name: name.into(),
            shape: OperationShape::Reader {
                returns,
                invoke: wrap_read(read),
            },
        });
        self
    }

    /// Registers a one-argument writer operation.
    #[must_use]
    pub fn writer(
        mut self,
        name: impl Into<String>,
        param: TypeDescriptor,
        write: impl Fn(&mut T, Value) -> Result<(), InvokeError> + 'static,
    ) -> Self {
        self.operations.push(Operation {
            name: name.into(),
            shape: OperationShape::Writer {
                param,
                invoke: wrap_write(write),
            },
        });
        self
    }

    /// Registers a publicly addressable field slot.
    #[must_use]
    pub fn field(
        self,
        name: impl Into<String>,
        ty: TypeDescriptor,
        read: impl Fn(&T) -> Value + 'static,
        write: impl Fn(&mut T, Value) -> Result<(), InvokeError> + 'static,
    ) -> Self {
        self.field_slot(name, ty, true, read, write)
    }

    /// Registers a field slot that requires bypassing normal visibility.
    #[must_use]
    pub fn private_field(
        self,
        name: impl Into<String>,
        ty: TypeDescriptor,
        read: impl Fn(&T) -> Value + 'static,
        write: impl Fn(&mut T, Value) -> Result<(), InvokeError> + 'static,
    ) -> Self {
        self.field_slot(name, ty, false, read, write)
    }

    fn field_slot(
        mut self,
        name: impl Into<String>,
        ty: TypeDescriptor,
        public: bool,
        read: impl Fn(&T) -> Value + 'static,
        write: impl Fn(&mut T, Value) -> Result<(), InvokeError> + 'static,
    ) -> Self {
        self.fields.push(FieldSlot {
            name: name.into(),
            ty,
            public,
            read: wrap_read(read),
            write: wrap_write(write),
        });
        self
    }

    /// Finishes the surface, capturing `T`'s equality, hashing and
    /// rendering implementations.
    #[must_use]
    pub fn build(self) -> TypeSurface {
        TypeSurface {
            name: self.name,
            constructors: self.constructors,
            operations: self.operations,
            fields: self.fields,
            instance_ops: Rc::new(InstanceOps::of::<T>()),
        }
    }
}

fn wrap_read<T: Any>(read: impl Fn(&T) -> Value + 'static) -> ReadFn {
    Rc::new(move |state| {
        let target = state
            .downcast_ref::<T>()
            .ok_or(InvokeError::ReceiverMismatch {
                expected: std::any::type_name::<T>(),
            })?;
        Ok(read(target))
    })
}

fn wrap_write<T: Any>(
    write: impl Fn(&mut T, Value) -> Result<(), InvokeError> + 'static,
) -> WriteFn {
    Rc::new(move |state, value| {
        let target = state
            .downcast_mut::<T>()
            .ok_or(InvokeError::ReceiverMismatch {
                expected: std::any::type_name::<T>(),
            })?;
        write(target, value)
    })
}

/// Registry mapping type names to their capability surfaces.
///
/// The registry is handed to the checker at construction time and consulted
/// exactly once per type, when the type is first introspected.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    surfaces: HashMap<TypeName, Rc<TypeSurface>>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a surface, replacing any previous registration for the name.
    pub fn register(&mut self, surface: TypeSurface) -> &mut Self {
        self.surfaces
            .insert(surface.name().clone(), Rc::new(surface));
        self
    }

    /// Looks up the surface registered under `name`.
    #[must_use]
    pub fn surface(&self, name: &TypeName) -> Option<Rc<TypeSurface>> {
        self.surfaces.get(name).cloned()
    }

    /// Returns whether a surface is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &TypeName) -> bool {
        self.surfaces.contains_key(name)
    }

    /// Returns the number of registered surfaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Returns whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}
