//! Surface introspection: walking a type's capabilities into cached
//! metadata.
//!
//! A type is walked exactly once per checker. The walk enumerates readers,
//! pairs them with conventionally named writers, absorbs additional
//! writers, and optionally attaches backing fields, applying the inclusion
//! policy as it goes. The resulting [`TypeMetadata`] is immutable apart
//! from the lazily resolved representative constructor.

use std::{
    collections::{BTreeMap, HashSet},
    rc::Rc,
};

use tracing::{debug, instrument, warn};

use crate::{
    descriptor::{TypeDescriptor, TypeName},
    error::MetadataError,
    metadata::{ArgMetadata, BackingField, CtorMetadata, PropertyMetadata, TypeMetadata},
    options::CheckOptions,
    surface::{OperationShape, TypeRegistry, TypeSurface, WriteFn},
};

/// Operation names excluded from property discovery: identity, rendering,
/// hashing and structural-equality hooks are never bean state.
const RESERVED_OPERATIONS: &[&str] = &["type_id", "type_name", "to_string", "hash", "eq", "clone"];

/// Explicit owned cache from type name to built metadata; append-only for
/// the life of the checker.
#[derive(Debug, Default)]
pub(crate) struct MetadataCache {
    entries: std::collections::HashMap<TypeName, Rc<TypeMetadata>>,
}

/// Walks capability surfaces into [`TypeMetadata`], caching by type
/// identity.
#[derive(Debug)]
pub(crate) struct Introspector {
    registry: Rc<TypeRegistry>,
    options: Rc<CheckOptions>,
    cache: MetadataCache,
}

impl Introspector {
    pub(crate) fn new(registry: Rc<TypeRegistry>, options: Rc<CheckOptions>) -> Self {
        Self {
            registry,
            options,
            cache: MetadataCache::default(),
        }
    }

    pub(crate) fn options(&self) -> &Rc<CheckOptions> {
        &self.options
    }

    /// Returns the cached metadata for `name`, walking the surface on
    /// first request. Idempotent: repeated calls return the same `Rc`.
    #[instrument(level = "debug", skip(self), fields(type_name = %name))]
    pub(crate) fn introspect(&mut self, name: &TypeName) -> Result<Rc<TypeMetadata>, MetadataError> {
        if let Some(cached) = self.cache.entries.get(name) {
            return Ok(Rc::clone(cached));
        }
        let surface = self
            .registry
            .surface(name)
            .ok_or_else(|| MetadataError::UnregisteredType {
                type_name: name.clone(),
            })?;
        let metadata = Rc::new(self.walk(&surface)?);
        debug!(
            properties = metadata.property_count(),
            constructors = metadata.constructors().len(),
            "surface walked"
        );
        self.cache.entries.insert(name.clone(), Rc::clone(&metadata));
        Ok(metadata)
    }

    fn walk(&self, surface: &TypeSurface) -> Result<TypeMetadata, MetadataError> {
        let ty = surface.name().clone();
        let mut properties: BTreeMap<String, PropertyMetadata> = BTreeMap::new();

        self.collect_readers(surface, &ty, &mut properties)?;
        let consumed = self.pair_writers(surface, &ty, &mut properties)?;
        self.collect_additional_writers(surface, &ty, &mut properties, &consumed)?;
        if self.options.include_backing_fields {
            self.collect_fields(surface, &ty, &mut properties)?;
        }

        let constructors = surface
            .constructors()
            .iter()
            .map(|spec| CtorMetadata {
                owner: ty.clone(),
                args: spec
                    .params
                    .iter()
                    .map(|param| ArgMetadata {
                        name: param.name().map(str::to_owned),
                        ty: param.ty().clone(),
                    })
                    .collect(),
                public: spec.public,
                invoke: Rc::clone(&spec.invoke),
                ops: Rc::clone(surface.instance_ops()),
            })
            .collect();

        Ok(TypeMetadata::new(ty, properties, constructors))
    }

    /// Step 1: every zero-argument operation with a return descriptor
    /// yields a readable property under its de-conventionalized name.
    fn collect_readers(
        &self,
        surface: &TypeSurface,
        ty: &TypeName,
        properties: &mut BTreeMap<String, PropertyMetadata>,
    ) -> Result<(), MetadataError> {
        for op in surface.operations() {
            if RESERVED_OPERATIONS.contains(&op.name.as_str()) {
                continue;
            }
            match &op.shape {
                OperationShape::Reader { returns, invoke } => {
                    let name = reader_property_name(ty, &op.name, returns)?;
                    let include = self.options.is_property_included(ty, &name);
                    let property = properties.entry(name.clone()).or_insert_with(|| {
                        PropertyMetadata::new(
                            name,
                            returns.clone(),
                            !include,
                            self.options.force_accessible,
                        )
                    });
                    property.read = Some(Rc::clone(invoke));
                }
                OperationShape::Action => {
                    // A value-free operation named like a reader is a broken
                    // getter.
                    if let Some(name) = strip_reader_prefix(&op.name) {
                        let include = self.options.is_property_included(ty, name);
                        if include && self.options.fail_on_invalid_getters {
                            return Err(MetadataError::InvalidAccessor {
                                type_name: ty.clone(),
                                operation: op.name.clone(),
                                reason: String::from(
                                    "reader-convention operation yields no value",
                                ),
                            });
                        }
                        debug!(operation = %op.name, "tolerating value-free reader");
                    }
                }
                OperationShape::Writer { .. } => {}
            }
        }
        Ok(())
    }

    /// Step 2: every readable property looks for its `set_<name>` writer
    /// with the matching parameter type.
    fn pair_writers(
        &self,
        surface: &TypeSurface,
        ty: &TypeName,
        properties: &mut BTreeMap<String, PropertyMetadata>,
    ) -> Result<HashSet<usize>, MetadataError> {
        let mut consumed = HashSet::new();
        for (name, property) in properties.iter_mut() {
            if property.read.is_none() {
                continue;
            }
            let expected = format!("set_{name}");
            match find_writer(surface, &expected, &property.declared) {
                Some((index, invoke)) => {
                    property.write = Some(Rc::clone(invoke));
                    consumed.insert(index);
                }
                None => {
                    if self.options.fail_on_missing_setters {
                        return Err(MetadataError::MissingMutator {
                            type_name: ty.clone(),
                            property: name.clone(),
                            expected,
                        });
                    }
                    debug!(property = %name, "no conventional writer found");
                }
            }
        }
        Ok(consumed)
    }

    /// Step 3: writers not consumed by step 2 either attach to an existing
    /// property or create a write-only one, consistency-checked per
    /// policy.
    fn collect_additional_writers(
        &self,
        surface: &TypeSurface,
        ty: &TypeName,
        properties: &mut BTreeMap<String, PropertyMetadata>,
        consumed: &HashSet<usize>,
    ) -> Result<(), MetadataError> {
        for (index, op) in surface.operations().iter().enumerate() {
            if consumed.contains(&index) || RESERVED_OPERATIONS.contains(&op.name.as_str()) {
                continue;
            }
            let OperationShape::Writer { param, invoke } = &op.shape else {
                continue;
            };
            let Some(name) = op.name.strip_prefix("set_") else {
                continue;
            };
            if name.is_empty() {
                return Err(MetadataError::InvalidAccessor {
                    type_name: ty.clone(),
                    operation: op.name.clone(),
                    reason: String::from("writer-convention operation has no property name"),
                });
            }
            if let Some(property) = properties.get_mut(name) {
                if property.write.is_none() {
                    property.write = Some(Rc::clone(invoke));
                } else if !property.ignored && self.options.fail_on_additional_setters {
                    return Err(MetadataError::UnexpectedMutator {
                        type_name: ty.clone(),
                        property: name.to_owned(),
                        operation: op.name.clone(),
                    });
                } else {
                    warn!(property = %name, operation = %op.name, "ignoring conflicting writer");
                }
            } else {
                let include = self.options.is_property_included(ty, name);
                if include && self.options.fail_on_additional_setters {
                    return Err(MetadataError::UnexpectedMutator {
                        type_name: ty.clone(),
                        property: name.to_owned(),
                        operation: op.name.clone(),
                    });
                }
                let mut property = PropertyMetadata::new(
                    name,
                    param.clone(),
                    !include,
                    self.options.force_accessible,
                );
                property.write = Some(Rc::clone(invoke));
                properties.insert(name.to_owned(), property);
            }
        }
        Ok(())
    }

    /// Step 4: backing fields not already covered by an accessor pair.
    /// Non-public slots are only usable when visibility bypass is
    /// permitted.
    fn collect_fields(
        &self,
        surface: &TypeSurface,
        ty: &TypeName,
        properties: &mut BTreeMap<String, PropertyMetadata>,
    ) -> Result<(), MetadataError> {
        for field in surface.fields() {
            if !field.public && !self.options.force_accessible {
                debug!(field = %field.name, "skipping non-public field slot");
                continue;
            }
            if let Some(property) = properties.get_mut(&field.name) {
                if property.declared != field.ty {
                    if self.options.fail_on_mismatching_backing_fields {
                        return Err(MetadataError::FieldMismatch {
                            type_name: ty.clone(),
                            property: field.name.clone(),
                            declared: property.declared.clone(),
                            field: field.ty.clone(),
                        });
                    }
                    warn!(
                        property = %field.name,
                        "tolerating backing field with mismatched type"
                    );
                }
                property.backing = Some(BackingField {
                    read: Rc::clone(&field.read),
                    write: Rc::clone(&field.write),
                    public: field.public,
                });
            } else {
                let include = self.options.is_property_included(ty, &field.name);
                let mut property = PropertyMetadata::new(
                    field.name.clone(),
                    field.ty.clone(),
                    !include,
                    self.options.force_accessible,
                );
                property.backing = Some(BackingField {
                    read: Rc::clone(&field.read),
                    write: Rc::clone(&field.write),
                    public: field.public,
                });
                properties.insert(field.name.clone(), property);
            }
        }
        Ok(())
    }
}

/// De-conventionalizes a reader name: `get_` strips unconditionally, `is_`
/// strips for boolean readers, anything else names the property directly.
fn reader_property_name(
    ty: &TypeName,
    operation: &str,
    returns: &TypeDescriptor,
) -> Result<String, MetadataError> {
    let name = if let Some(rest) = operation.strip_prefix("get_") {
        rest
    } else if matches!(returns, TypeDescriptor::Bool) {
        operation.strip_prefix("is_").unwrap_or(operation)
    } else {
        operation
    };
    if name.is_empty() {
        return Err(MetadataError::InvalidAccessor {
            type_name: ty.clone(),
            operation: operation.to_owned(),
            reason: String::from("reader-convention operation has no property name"),
        });
    }
    Ok(name.to_owned())
}

fn strip_reader_prefix(operation: &str) -> Option<&str> {
    operation
        .strip_prefix("get_")
        .or_else(|| operation.strip_prefix("is_"))
}

fn find_writer<'s>(
    surface: &'s TypeSurface,
    name: &str,
    param_ty: &TypeDescriptor,
) -> Option<(usize, &'s WriteFn)> {
    surface
        .operations()
        .iter()
        .enumerate()
        .find_map(|(index, op)| match &op.shape {
            OperationShape::Writer { param, invoke } if op.name == name && param == param_ty => {
                Some((index, invoke))
            }
            _ => None,
        })
}
