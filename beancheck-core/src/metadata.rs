//! The passive metadata model built by introspection.
//!
//! One [`TypeMetadata`] exists per introspected type, cached for the life
//! of the checker and shared as `Rc`. Every later stage operates on this
//! closed structure; no live lookups happen after the surface walk.

use std::{cell::OnceCell, collections::BTreeMap, fmt, fmt::Write as _, rc::Rc};

use crate::{
    descriptor::{TypeDescriptor, TypeName},
    error::InvokeError,
    surface::{ArgValues, CtorFn, ReadFn, WriteFn},
    value::{BeanInstance, InstanceOps, Value},
};

pub(crate) struct BackingField {
    pub(crate) read: ReadFn,
    pub(crate) write: WriteFn,
    pub(crate) public: bool,
}

/// Metadata for one named unit of a bean's observable state.
pub struct PropertyMetadata {
    pub(crate) name: String,
    pub(crate) declared: TypeDescriptor,
    pub(crate) read: Option<ReadFn>,
    pub(crate) write: Option<WriteFn>,
    pub(crate) backing: Option<BackingField>,
    pub(crate) ignored: bool,
    pub(crate) force_accessible: bool,
}

impl PropertyMetadata {
    pub(crate) fn new(
        name: impl Into<String>,
        declared: TypeDescriptor,
        ignored: bool,
        force_accessible: bool,
    ) -> Self {
        Self {
            name: name.into(),
            declared,
            read: None,
            write: None,
            backing: None,
            ignored,
            force_accessible,
        }
    }

    /// Returns the property name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type descriptor.
    #[must_use]
    pub const fn declared(&self) -> &TypeDescriptor {
        &self.declared
    }

    /// Returns the element descriptor when the property is indexed.
    #[must_use]
    pub fn element_type(&self) -> Option<&TypeDescriptor> {
        self.declared.element_type()
    }

    /// Returns whether the property is suppressed from population and
    /// comparison. Ignored properties stay discoverable.
    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        self.ignored
    }

    /// Returns whether bypassing normal visibility is permitted for this
    /// property.
    #[must_use]
    pub const fn force_accessible(&self) -> bool {
        self.force_accessible
    }

    /// Returns whether the property can be read back.
    #[must_use]
    pub const fn can_read(&self) -> bool {
        self.read.is_some() || self.backing.is_some()
    }

    /// Returns whether the property can be written, through its writer or
    /// its backing field.
    #[must_use]
    pub const fn has_mutator(&self) -> bool {
        self.write.is_some() || self.backing.is_some()
    }

    /// Returns whether the declared type is an indexed container.
    #[must_use]
    pub const fn is_indexed(&self) -> bool {
        self.declared.is_collection()
    }

    pub(crate) fn read_value(
        &self,
        instance: &BeanInstance,
    ) -> Result<Value, InvokeError> {
        if let Some(read) = &self.read {
            return instance.read_with(read.as_ref());
        }
        if let Some(backing) = &self.backing {
            return instance.read_with(backing.read.as_ref());
        }
        Err(InvokeError::Failed {
            reason: format!("property `{}` has no read capability", self.name),
        })
    }

    pub(crate) fn write_value(
        &self,
        instance: &BeanInstance,
        value: Value,
    ) -> Result<(), InvokeError> {
        if let Some(write) = &self.write {
            return instance.write_with(write.as_ref(), value);
        }
        if let Some(backing) = &self.backing {
            return instance.write_with(backing.write.as_ref(), value);
        }
        Err(InvokeError::Failed {
            reason: format!("property `{}` has no mutator", self.name),
        })
    }
}

impl fmt::Debug for PropertyMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMetadata")
            .field("name", &self.name)
            .field("declared", &self.declared)
            .field("readable", &self.read.is_some())
            .field("writable", &self.write.is_some())
            .field("backed", &self.backing.is_some())
            .field("ignored", &self.ignored)
            .finish_non_exhaustive()
    }
}

/// Metadata for one positional constructor argument.
///
/// A name is present only when the argument is presumed to initialize the
/// like-named property; unnamed arguments cannot be matched to properties.
#[derive(Clone, Debug)]
pub struct ArgMetadata {
    pub(crate) name: Option<String>,
    pub(crate) ty: TypeDescriptor,
}

impl ArgMetadata {
    /// Returns the bound property name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the argument's declared type.
    #[must_use]
    pub const fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    /// Returns whether the argument carries a property binding.
    #[must_use]
    pub const fn is_named(&self) -> bool {
        self.name.is_some()
    }
}

/// Metadata for one invocable constructor.
pub struct CtorMetadata {
    pub(crate) owner: TypeName,
    pub(crate) args: Vec<ArgMetadata>,
    pub(crate) public: bool,
    pub(crate) invoke: CtorFn,
    pub(crate) ops: Rc<InstanceOps>,
}

impl CtorMetadata {
    /// Returns the ordered argument metadata.
    #[must_use]
    pub fn args(&self) -> &[ArgMetadata] {
        &self.args
    }

    /// Returns the number of positional arguments.
    #[must_use]
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Returns whether the constructor is invocable without bypassing
    /// visibility.
    #[must_use]
    pub const fn is_public(&self) -> bool {
        self.public
    }

    /// Renders the constructor for diagnostics, e.g.
    /// `Account(field_a: string, field_b: i32)`.
    #[must_use]
    pub fn signature(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "{}(", self.owner);
        let mut first = true;
        for arg in &self.args {
            if !first {
                out.push_str(", ");
            }
            match arg.name() {
                Some(name) => {
                    let _ = write!(out, "{name}: {}", arg.ty());
                }
                None => {
                    let _ = write!(out, "_: {}", arg.ty());
                }
            }
            first = false;
        }
        out.push(')');
        out
    }

    /// Invokes the constructor over a positional argument vector.
    pub(crate) fn construct(&self, args: &[Value]) -> Result<BeanInstance, InvokeError> {
        let values = ArgValues::new(args);
        let state = (self.invoke)(&values)?;
        Ok(BeanInstance::from_parts(
            self.owner.clone(),
            Rc::clone(&self.ops),
            state,
        ))
    }
}

impl fmt::Debug for CtorMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CtorMetadata")
            .field("signature", &self.signature())
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

/// Cached description of one introspected type: its properties and
/// constructors, plus the lazily chosen representative constructor.
pub struct TypeMetadata {
    name: TypeName,
    properties: BTreeMap<String, PropertyMetadata>,
    constructors: Vec<CtorMetadata>,
    representative: OnceCell<usize>,
}

impl TypeMetadata {
    pub(crate) const fn new(
        name: TypeName,
        properties: BTreeMap<String, PropertyMetadata>,
        constructors: Vec<CtorMetadata>,
    ) -> Self {
        Self {
            name,
            properties,
            constructors,
            representative: OnceCell::new(),
        }
    }

    /// Returns the type's registered name.
    #[must_use]
    pub const fn name(&self) -> &TypeName {
        &self.name
    }

    /// Iterates the properties in deterministic (name) order.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyMetadata> {
        self.properties.values()
    }

    /// Looks up a property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyMetadata> {
        self.properties.get(name)
    }

    /// Iterates the property names in deterministic order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Returns the number of discovered properties.
    #[must_use]
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Returns whether a property exists under `name` and participates in
    /// population and comparison.
    #[must_use]
    pub fn has_non_ignored_property(&self, name: &str) -> bool {
        self.properties
            .get(name)
            .is_some_and(|property| !property.is_ignored())
    }

    /// Returns every discovered constructor in registration order.
    #[must_use]
    pub fn constructors(&self) -> &[CtorMetadata] {
        &self.constructors
    }

    pub(crate) fn representative_index(&self) -> Option<usize> {
        self.representative.get().copied()
    }

    pub(crate) fn record_representative(&self, index: usize) {
        // First resolution wins; the cell is written at most once.
        let _ = self.representative.set(index);
    }
}

impl fmt::Debug for TypeMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMetadata")
            .field("name", &self.name)
            .field("properties", &self.properties.keys().collect::<Vec<_>>())
            .field("constructors", &self.constructors.len())
            .finish_non_exhaustive()
    }
}
