//! Randomized value generation for properties and constructor arguments.
//!
//! Dispatch is by declared descriptor, most specific first. Bean types
//! recurse through the introspector: resolve a representative constructor,
//! generate its arguments, instantiate, then populate every non-ignored
//! mutable property. The active chain of in-flight types is carried
//! explicitly in [`GenContext`] so recursive references are detected
//! without inspecting the call stack.

use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};
use tracing::debug;

use std::rc::Rc;

use crate::{
    ctor::resolve_representative,
    descriptor::{CollectionKind, TypeChain, TypeDescriptor, TypeName},
    error::{BeancheckError, GenerateError},
    introspect::Introspector,
    metadata::{CtorMetadata, PropertyMetadata, TypeMetadata},
    options::CheckOptions,
    value::{BeanInstance, Value},
};

/// Collections are populated with between one and this many elements.
const MAX_COLLECTION_LEN: usize = 10;
/// Generated string tokens draw from this alphabet.
const STRING_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
/// Generated string tokens are between one and this many characters long.
const MAX_STRING_LEN: usize = 12;
/// Regeneration budget before distinctness is declared unattainable.
const MAX_DISTINCT_ATTEMPTS: usize = 32;

/// SplitMix64 increment (the 64-bit golden ratio) used to decorrelate
/// caller-provided seeds.
const SEED_INCREMENT: u64 = 0x9E37_79B9_7F4A_7C15;
const SPLITMIX_MULT_A: u64 = 0xBF58_476D_1CE4_E5B9;
const SPLITMIX_MULT_B: u64 = 0x94D0_49BB_1331_11EB;

#[inline]
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(SEED_INCREMENT);
    state = (state ^ (state >> 30)).wrapping_mul(SPLITMIX_MULT_A);
    state = (state ^ (state >> 27)).wrapping_mul(SPLITMIX_MULT_B);
    state ^ (state >> 31)
}

/// Mutable state threaded through one generation tree: the chain of types
/// currently being populated and the dotted property path from the root.
pub(crate) struct GenContext {
    chain: Vec<TypeName>,
    path: Vec<String>,
}

impl GenContext {
    pub(crate) const fn new() -> Self {
        Self {
            chain: Vec::new(),
            path: Vec::new(),
        }
    }

    fn on_chain(&self, ty: &TypeName) -> bool {
        self.chain.contains(ty)
    }

    fn dotted_with(&self, leaf: &str) -> String {
        if self.path.is_empty() {
            leaf.to_owned()
        } else {
            let mut path = self.path.join(".");
            path.push('.');
            path.push_str(leaf);
            path
        }
    }
}

/// Produces random and guaranteed-distinct values, recursing into the
/// introspector for nested bean types.
pub(crate) struct ValueGenerator<'a> {
    introspector: &'a mut Introspector,
    options: Rc<CheckOptions>,
    rng: SmallRng,
}

impl<'a> ValueGenerator<'a> {
    pub(crate) fn new(introspector: &'a mut Introspector, options: Rc<CheckOptions>) -> Self {
        let rng = match options.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(splitmix64(seed)),
            None => SmallRng::from_entropy(),
        };
        Self {
            introspector,
            options,
            rng,
        }
    }

    /// Generates a random value for the declared type of `name` on
    /// `owner`.
    pub(crate) fn generate(
        &mut self,
        ctx: &mut GenContext,
        owner: &TypeName,
        name: &str,
        ty: &TypeDescriptor,
    ) -> Result<Value, BeancheckError> {
        match ty {
            TypeDescriptor::Bool => Ok(Value::Bool(self.rng.gen_bool(0.5))),
            TypeDescriptor::I8 => Ok(Value::I8(self.rng.gen_range(i8::MIN..=i8::MAX))),
            TypeDescriptor::I16 => Ok(Value::I16(self.rng.gen_range(i16::MIN..=i16::MAX))),
            TypeDescriptor::I32 => Ok(Value::I32(self.rng.gen_range(i32::MIN..=i32::MAX))),
            TypeDescriptor::I64 => Ok(Value::I64(self.rng.gen_range(i64::MIN..=i64::MAX))),
            TypeDescriptor::U8 => Ok(Value::U8(self.rng.gen_range(u8::MIN..=u8::MAX))),
            TypeDescriptor::U16 => Ok(Value::U16(self.rng.gen_range(u16::MIN..=u16::MAX))),
            TypeDescriptor::U32 => Ok(Value::U32(self.rng.gen_range(u32::MIN..=u32::MAX))),
            TypeDescriptor::U64 => Ok(Value::U64(self.rng.gen_range(u64::MIN..=u64::MAX))),
            TypeDescriptor::F32 => Ok(Value::F32(self.rng.gen_range(-1.0e6_f32..1.0e6_f32))),
            TypeDescriptor::F64 => Ok(Value::F64(self.rng.gen_range(-1.0e6_f64..1.0e6_f64))),
            TypeDescriptor::Char => Ok(Value::Char(self.random_char())),
            TypeDescriptor::Str => Ok(Value::Str(self.random_token())),
            TypeDescriptor::Enum {
                name: enum_name,
                variants,
            } => {
                let variant = variants.choose(&mut self.rng).cloned().ok_or_else(|| {
                    GenerateError::EmptyEnum {
                        type_name: owner.clone(),
                        property: name.to_owned(),
                        enum_name: enum_name.clone(),
                    }
                })?;
                Ok(Value::Enum {
                    ty: enum_name.clone(),
                    variant,
                })
            }
            TypeDescriptor::Collection { kind, element } => {
                self.generate_collection(ctx, owner, name, kind, element.as_deref())
            }
            TypeDescriptor::Bean(bean) => self.generate_bean(ctx, owner, name, bean),
        }
    }

    /// Generates a value guaranteed unequal to `current` under the target
    /// type's own equality semantics.
    pub(crate) fn generate_distinct_from(
        &mut self,
        ctx: &mut GenContext,
        owner: &TypeName,
        name: &str,
        ty: &TypeDescriptor,
        current: &Value,
    ) -> Result<Value, BeancheckError> {
        let exhausted = || {
            BeancheckError::from(GenerateError::NoDistinctValue {
                type_name: owner.clone(),
                property: name.to_owned(),
                target: ty.clone(),
            })
        };
        match ty {
            TypeDescriptor::Bool => match current {
                Value::Bool(value) => Ok(Value::Bool(!value)),
                _ => Ok(Value::Bool(self.rng.gen_bool(0.5))),
            },
            TypeDescriptor::Enum {
                name: enum_name,
                variants,
            } => {
                let current_variant = match current {
                    Value::Enum { variant, .. } => Some(variant.as_str()),
                    _ => None,
                };
                let others: Vec<&String> = variants
                    .iter()
                    .filter(|variant| Some(variant.as_str()) != current_variant)
                    .collect();
                let variant = others.choose(&mut self.rng).ok_or_else(exhausted)?;
                Ok(Value::Enum {
                    ty: enum_name.clone(),
                    variant: (*variant).clone(),
                })
            }
            _ => {
                for _ in 0..MAX_DISTINCT_ATTEMPTS {
                    let candidate = self.generate(ctx, owner, name, ty)?;
                    if candidate != *current {
                        return Ok(candidate);
                    }
                }
                Err(exhausted())
            }
        }
    }

    /// Generates one argument vector for a constructor, positionally
    /// ordered.
    pub(crate) fn generate_args(
        &mut self,
        ctx: &mut GenContext,
        owner: &TypeName,
        ctor: &CtorMetadata,
    ) -> Result<Vec<Value>, BeancheckError> {
        ctor.args()
            .iter()
            .enumerate()
            .map(|(index, arg)| {
                let label = arg
                    .name()
                    .map_or_else(|| format!("arg{index}"), str::to_owned);
                self.generate(ctx, owner, &label, arg.ty())
            })
            .collect()
    }

    /// Constructs an instance through `ctor` and populates its properties.
    pub(crate) fn instantiate_and_populate(
        &mut self,
        ctx: &mut GenContext,
        metadata: &TypeMetadata,
        ctor: &CtorMetadata,
    ) -> Result<BeanInstance, BeancheckError> {
        let args = self.generate_args(ctx, metadata.name(), ctor)?;
        let instance = ctor
            .construct(&args)
            .map_err(|error| BeancheckError::invoke(metadata.name().clone(), error))?;
        self.populate(ctx, metadata, &instance)?;
        Ok(instance)
    }

    /// Populates every property that is not suppressed by policy.
    pub(crate) fn populate(
        &mut self,
        ctx: &mut GenContext,
        metadata: &TypeMetadata,
        instance: &BeanInstance,
    ) -> Result<(), BeancheckError> {
        for property in metadata.properties() {
            if self.should_skip(ctx, property) {
                continue;
            }
            let value = self.generate(ctx, metadata.name(), property.name(), property.declared())?;
            property
                .write_value(instance, value)
                .map_err(|error| BeancheckError::invoke(metadata.name().clone(), error))?;
        }
        Ok(())
    }

    /// Generates the shared batch of values the verifier applies to both
    /// instances, in deterministic property order.
    pub(crate) fn property_batch<'m>(
        &mut self,
        ctx: &mut GenContext,
        metadata: &'m TypeMetadata,
    ) -> Result<Vec<(&'m PropertyMetadata, Value)>, BeancheckError> {
        let mut batch = Vec::new();
        for property in metadata.properties() {
            if self.should_skip(ctx, property) {
                continue;
            }
            let value = self.generate(ctx, metadata.name(), property.name(), property.declared())?;
            batch.push((property, value));
        }
        Ok(batch)
    }

    /// A property is skipped when it is marked ignored, has no way to be
    /// written, or its exact dotted path is suppressed.
    pub(crate) fn should_skip(&self, ctx: &GenContext, property: &PropertyMetadata) -> bool {
        property.is_ignored()
            || !property.has_mutator()
            || self
                .options
                .is_path_suppressed(&ctx.dotted_with(property.name()))
    }

    fn generate_collection(
        &mut self,
        ctx: &mut GenContext,
        owner: &TypeName,
        name: &str,
        kind: &CollectionKind,
        element: Option<&TypeDescriptor>,
    ) -> Result<Value, BeancheckError> {
        match kind {
            CollectionKind::Other(collection) => {
                Err(GenerateError::UnknownCollectionType {
                    type_name: owner.clone(),
                    property: name.to_owned(),
                    collection: collection.clone(),
                }
                .into())
            }
            CollectionKind::List | CollectionKind::Array => {
                let element = require_element(owner, name, kind, element)?;
                let len = self.rng.gen_range(1..=MAX_COLLECTION_LEN);
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.generate(ctx, owner, name, element)?);
                }
                Ok(Value::Seq(items))
            }
            CollectionKind::Set => {
                let element = require_element(owner, name, kind, element)?;
                let len = self.rng.gen_range(1..=MAX_COLLECTION_LEN);
                let mut items: Vec<Value> = Vec::new();
                for _ in 0..len {
                    let item = self.generate(ctx, owner, name, element)?;
                    if !items.contains(&item) {
                        items.push(item);
                    }
                }
                Ok(Value::Set(items))
            }
        }
    }

    fn generate_bean(
        &mut self,
        ctx: &mut GenContext,
        owner: &TypeName,
        name: &str,
        bean: &TypeName,
    ) -> Result<Value, BeancheckError> {
        if ctx.on_chain(bean) {
            if self.options.fail_on_recursive_reference {
                let mut links = ctx.chain.clone();
                links.push(bean.clone());
                return Err(GenerateError::RecursiveBean {
                    path: ctx.dotted_with(name),
                    chain: TypeChain::new(links),
                }
                .into());
            }
            debug!(
                owner = %owner,
                property = %ctx.dotted_with(name),
                bean = %bean,
                "breaking recursive reference with an absent value"
            );
            return Ok(Value::Absent);
        }
        let metadata = self.introspector.introspect(bean)?;
        let ctor = resolve_representative(&metadata)?;
        // The chain entry lives only while this bean's own graph is in
        // flight, so a later sibling of the same type populates normally.
        ctx.chain.push(bean.clone());
        ctx.path.push(name.to_owned());
        let result = self.instantiate_and_populate(ctx, &metadata, ctor);
        ctx.path.pop();
        ctx.chain.pop();
        result.map(Value::Bean)
    }

    fn random_char(&mut self) -> char {
        let index = self.rng.gen_range(0..STRING_ALPHABET.len());
        STRING_ALPHABET.get(index).copied().map_or('a', char::from)
    }

    fn random_token(&mut self) -> String {
        let len = self.rng.gen_range(1..=MAX_STRING_LEN);
        (0..len).map(|_| self.random_char()).collect()
    }
}

fn require_element<'e>(
    owner: &TypeName,
    name: &str,
    kind: &CollectionKind,
    element: Option<&'e TypeDescriptor>,
) -> Result<&'e TypeDescriptor, BeancheckError> {
    element.ok_or_else(|| {
        GenerateError::UnresolvableElementType {
            type_name: owner.clone(),
            property: name.to_owned(),
            container: TypeDescriptor::Collection {
                kind: kind.clone(),
                element: None,
            },
        }
        .into()
    })
}
