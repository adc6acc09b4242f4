//! The equals/hashCode contract verifier and its public entry point.
//!
//! [`BeanChecker`] orchestrates the whole engine: introspection for
//! metadata, constructor resolution, value generation, then the
//! mutate-and-compare protocol. A run either returns normally, meaning the
//! contract holds, or surfaces exactly one failure describing the first
//! violated invariant in deterministic order.

use std::rc::Rc;

use tracing::{debug, instrument};

use crate::{
    ctor::{pick_for_property_phase, resolve_representative},
    descriptor::TypeName,
    error::{BeancheckError, ContractViolation, Result},
    generate::{GenContext, ValueGenerator},
    introspect::Introspector,
    metadata::{CtorMetadata, TypeMetadata},
    options::CheckOptions,
    surface::TypeRegistry,
    value::{BeanInstance, Value},
};

/// Repeated hash-code calls asserted on every unmodified instance.
const HASH_STABILITY_ROUNDS: usize = 3;

/// Configures and constructs [`BeanChecker`] instances.
///
/// # Examples
/// ```
/// use beancheck_core::{BeanCheckerBuilder, TypeRegistry};
///
/// let checker = BeanCheckerBuilder::new(TypeRegistry::new())
///     .with_test_constructors(false)
///     .with_rng_seed(7)
///     .build();
/// # let _ = checker;
/// ```
#[derive(Debug)]
pub struct BeanCheckerBuilder {
    registry: TypeRegistry,
    options: CheckOptions,
}

impl BeanCheckerBuilder {
    /// Creates a builder over a registry of capability surfaces, populated
    /// with default policy.
    #[must_use]
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            registry,
            options: CheckOptions::default(),
        }
    }

    /// Fails introspection when a reader-convention operation yields no
    /// value. Defaults to `false`.
    #[must_use]
    pub const fn with_fail_on_invalid_getters(mut self, fail: bool) -> Self {
        self.options.fail_on_invalid_getters = fail;
        self
    }

    /// Fails introspection when a readable property lacks its
    /// conventionally named writer. Defaults to `false`.
    #[must_use]
    pub const fn with_fail_on_missing_setters(mut self, fail: bool) -> Self {
        self.options.fail_on_missing_setters = fail;
        self
    }

    /// Fails introspection on writers with no corresponding readable
    /// property, or conflicting with an attached one. Defaults to `false`.
    #[must_use]
    pub const fn with_fail_on_additional_setters(mut self, fail: bool) -> Self {
        self.options.fail_on_additional_setters = fail;
        self
    }

    /// Fails introspection when a backing field disagrees with its
    /// property's declared type. Defaults to `true`.
    #[must_use]
    pub const fn with_fail_on_mismatching_backing_fields(mut self, fail: bool) -> Self {
        self.options.fail_on_mismatching_backing_fields = fail;
        self
    }

    /// Extracts backing field slots not covered by accessor pairs.
    /// Defaults to `false`.
    #[must_use]
    pub const fn with_include_backing_fields(mut self, include: bool) -> Self {
        self.options.include_backing_fields = include;
        self
    }

    /// Permits bypassing normal visibility to reach non-public state.
    /// Defaults to `false`.
    #[must_use]
    pub const fn with_force_accessible(mut self, force: bool) -> Self {
        self.options.force_accessible = force;
        self
    }

    /// Runs the constructor phase of verification. Defaults to `true`.
    #[must_use]
    pub const fn with_test_constructors(mut self, test: bool) -> Self {
        self.options.test_constructors = test;
        self
    }

    /// Asserts that changing any constructor argument breaks equality.
    /// Defaults to `true`.
    #[must_use]
    pub const fn with_test_constructor_args_change_equality(mut self, test: bool) -> Self {
        self.options.test_constructor_args_change_equality = test;
        self
    }

    /// Asserts that named constructor arguments are observable through
    /// their like-named properties. Defaults to `false`.
    #[must_use]
    pub const fn with_test_constructor_args_match_properties(mut self, test: bool) -> Self {
        self.options.test_constructor_args_match_properties = test;
        self
    }

    /// Runs the property phase of verification. Defaults to `true`.
    #[must_use]
    pub const fn with_test_properties(mut self, test: bool) -> Self {
        self.options.test_properties = test;
        self
    }

    /// Fails generation on recursive references instead of substituting an
    /// absent value. Defaults to `true`.
    #[must_use]
    pub const fn with_fail_on_recursive_reference(mut self, fail: bool) -> Self {
        self.options.fail_on_recursive_reference = fail;
        self
    }

    /// Clears the three accessor-failure flags in one call.
    #[must_use]
    pub const fn fail_silently(mut self) -> Self {
        self.options.fail_silently();
        self
    }

    /// Suppresses a property by unqualified name (anywhere it appears) or
    /// by exact dotted path from the generation root.
    ///
    /// # Examples
    /// ```
    /// use beancheck_core::{BeanCheckerBuilder, TypeRegistry};
    ///
    /// let checker = BeanCheckerBuilder::new(TypeRegistry::new())
    ///     .ignore_property("updated_at")
    ///     .ignore_property("audit.entries")
    ///     .build();
    /// # let _ = checker;
    /// ```
    #[must_use]
    pub fn ignore_property(mut self, name_or_path: impl Into<String>) -> Self {
        self.options.insert_ignore(name_or_path);
        self
    }

    /// Suppresses a property by name whenever the named type is populated.
    #[must_use]
    pub fn ignore_property_on(
        mut self,
        ty: impl Into<TypeName>,
        name: impl Into<String>,
    ) -> Self {
        self.options.insert_ignore_on(ty.into(), name);
        self
    }

    /// Seeds the random generator for reproducible runs.
    #[must_use]
    pub const fn with_rng_seed(mut self, seed: u64) -> Self {
        self.options.rng_seed = Some(seed);
        self
    }

    /// Constructs the checker.
    #[must_use]
    pub fn build(self) -> BeanChecker {
        let options = Rc::new(self.options);
        BeanChecker {
            introspector: Introspector::new(Rc::new(self.registry), Rc::clone(&options)),
            options,
        }
    }
}

/// Entry point for verifying the equals/hashCode contract of registered
/// types.
///
/// # Examples
/// ```
/// use beancheck_core::{
///     BeanCheckerBuilder, ParamSpec, TypeDescriptor, TypeName, TypeRegistry, TypeSurface, Value,
/// };
///
/// #[derive(Debug, Default, PartialEq, Hash)]
/// struct Account {
///     field_a: String,
///     field_b: i32,
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register(
///     TypeSurface::builder::<Account>("Account")
///         .ctor0(Account::default)
///         .reader("field_a", TypeDescriptor::Str, |a: &Account| {
///             Value::from(a.field_a.clone())
///         })
///         .writer("set_field_a", TypeDescriptor::Str, |a: &mut Account, v| {
///             a.field_a = v.try_into()?;
///             Ok(())
///         })
///         .reader("field_b", TypeDescriptor::I32, |a: &Account| {
///             Value::from(a.field_b)
///         })
///         .writer("set_field_b", TypeDescriptor::I32, |a: &mut Account, v| {
///             a.field_b = v.try_into()?;
///             Ok(())
///         })
///         .build(),
/// );
///
/// let mut checker = BeanCheckerBuilder::new(registry).with_rng_seed(42).build();
/// checker.verify_equals_hash_code(&TypeName::new("Account"))?;
/// # Ok::<(), beancheck_core::BeancheckError>(())
/// ```
#[derive(Debug)]
pub struct BeanChecker {
    options: Rc<CheckOptions>,
    introspector: Introspector,
}

impl BeanChecker {
    /// Returns the cached metadata for a type, walking its surface on
    /// first request. Identity-stable: repeated calls return the same
    /// shared structure.
    ///
    /// # Errors
    /// Returns [`BeancheckError::Metadata`] when the surface does not
    /// conform to the configured conventions.
    pub fn introspect(&mut self, ty: &TypeName) -> Result<Rc<TypeMetadata>> {
        self.introspector.introspect(ty).map_err(Into::into)
    }

    /// Builds one randomized, fully populated instance of a registered
    /// type.
    ///
    /// # Errors
    /// Returns metadata, generation or invocation failures as
    /// [`BeancheckError`].
    pub fn random_instance(&mut self, ty: &TypeName) -> Result<BeanInstance> {
        let metadata = self.introspector.introspect(ty)?;
        let mut generator = ValueGenerator::new(&mut self.introspector, Rc::clone(&self.options));
        let ctor = resolve_representative(&metadata)?;
        let mut ctx = GenContext::new();
        generator.instantiate_and_populate(&mut ctx, &metadata, ctor)
    }

    /// Verifies the equals/hashCode contract of `ty`.
    ///
    /// Runs the constructor phase (same-argument equality, hash stability,
    /// argument sensitivity and argument/property binding, as configured),
    /// then the property phase (identical population preserves equality;
    /// every non-ignored property individually breaks and restores it).
    ///
    /// # Errors
    /// Returns [`BeancheckError::Violation`] for the first violated
    /// invariant, or a metadata/generation/invocation failure when the
    /// engine cannot drive the protocol.
    #[instrument(name = "core.verify", err, skip(self), fields(type_name = %ty))]
    pub fn verify_equals_hash_code(&mut self, ty: &TypeName) -> Result<()> {
        let metadata = self.introspector.introspect(ty)?;
        let mut generator = ValueGenerator::new(&mut self.introspector, Rc::clone(&self.options));
        if self.options.test_constructors {
            run_constructor_phase(&mut generator, &self.options, &metadata)?;
        }
        if self.options.test_properties {
            run_property_phase(&mut generator, &metadata)?;
        }
        Ok(())
    }
}

fn construct(
    metadata: &TypeMetadata,
    ctor: &CtorMetadata,
    args: &[Value],
) -> Result<BeanInstance> {
    ctor.construct(args)
        .map_err(|error| BeancheckError::invoke(metadata.name().clone(), error))
}

/// Asserts mutual equality and identical, stable hash codes for a pair of
/// instances built the same way.
fn assert_equal_pair(
    metadata: &TypeMetadata,
    ctor: &CtorMetadata,
    operation: &str,
    left: &BeanInstance,
    right: &BeanInstance,
) -> Result<()> {
    if !left.eq_to(right) || !right.eq_to(left) {
        return Err(ContractViolation::NotEqual {
            type_name: metadata.name().clone(),
            operation: operation.to_owned(),
            constructor: ctor.signature(),
            left: left.render(),
            right: right.render(),
        }
        .into());
    }
    let left_hash = left.hash_value();
    let right_hash = right.hash_value();
    if left_hash != right_hash {
        return Err(ContractViolation::HashCodeMismatch {
            type_name: metadata.name().clone(),
            operation: operation.to_owned(),
            constructor: ctor.signature(),
            left_hash,
            right_hash,
            left: left.render(),
            right: right.render(),
        }
        .into());
    }
    for (instance, first) in [(left, left_hash), (right, right_hash)] {
        for _ in 0..HASH_STABILITY_ROUNDS {
            let repeat = instance.hash_value();
            if repeat != first {
                return Err(ContractViolation::UnstableHashCode {
                    type_name: metadata.name().clone(),
                    operation: operation.to_owned(),
                    first,
                    repeat,
                    instance: instance.render(),
                }
                .into());
            }
        }
    }
    Ok(())
}

/// Constructor phase: for every discovered constructor, same arguments
/// must yield equal instances, and each argument in turn must affect
/// equality and (when named and bound) be observable through its property.
fn run_constructor_phase(
    generator: &mut ValueGenerator<'_>,
    options: &CheckOptions,
    metadata: &TypeMetadata,
) -> Result<()> {
    for ctor in metadata.constructors() {
        debug!(constructor = %ctor.signature(), "constructor phase");
        let mut ctx = GenContext::new();
        let mut args = generator.generate_args(&mut ctx, metadata.name(), ctor)?;
        let first = construct(metadata, ctor, &args)?;
        let second = construct(metadata, ctor, &args)?;
        assert_equal_pair(
            metadata,
            ctor,
            "constructing two instances from identical arguments",
            &first,
            &second,
        )?;

        if options.test_constructor_args_change_equality {
            check_argument_sensitivity(generator, metadata, ctor, &mut ctx, &mut args, &first)?;
        }
        if options.test_constructor_args_match_properties {
            check_argument_bindings(generator, metadata, ctor, &mut ctx, &mut args)?;
        }
    }
    Ok(())
}

/// Substitutes each positional argument with a distinct value in turn,
/// restoring it before the next index so a failure isolates one argument.
fn check_argument_sensitivity(
    generator: &mut ValueGenerator<'_>,
    metadata: &TypeMetadata,
    ctor: &CtorMetadata,
    ctx: &mut GenContext,
    args: &mut [Value],
    first: &BeanInstance,
) -> Result<()> {
    for (index, arg) in ctor.args().iter().enumerate() {
        if let Some(name) = arg.name() {
            // An argument bound to an ignored property is excused from
            // affecting equality.
            if !metadata.has_non_ignored_property(name) {
                continue;
            }
        }
        let Some(original) = args.get(index).cloned() else {
            continue;
        };
        let label = arg
            .name()
            .map_or_else(|| format!("arg{index}"), str::to_owned);
        let distinct =
            generator.generate_distinct_from(ctx, metadata.name(), &label, arg.ty(), &original)?;
        if let Some(slot) = args.get_mut(index) {
            *slot = distinct;
        }
        let perturbed = construct(metadata, ctor, args)?;
        if first.eq_to(&perturbed) {
            return Err(ContractViolation::ArgumentInsensitive {
                type_name: metadata.name().clone(),
                index,
                arg: arg.ty().clone(),
                constructor: ctor.signature(),
                left: first.render(),
                right: perturbed.render(),
            }
            .into());
        }
        if let Some(slot) = args.get_mut(index) {
            *slot = original;
        }
    }
    Ok(())
}

/// For every named argument with a live, non-ignored, readable property
/// binding, asserts the substituted value is read back exactly.
fn check_argument_bindings(
    generator: &mut ValueGenerator<'_>,
    metadata: &TypeMetadata,
    ctor: &CtorMetadata,
    ctx: &mut GenContext,
    args: &mut [Value],
) -> Result<()> {
    for (index, arg) in ctor.args().iter().enumerate() {
        let Some(name) = arg.name() else {
            continue;
        };
        let Some(property) = metadata.property(name) else {
            debug!(argument = %name, "named argument has no property binding");
            continue;
        };
        if property.is_ignored() || !property.can_read() {
            continue;
        }
        let Some(original) = args.get(index).cloned() else {
            continue;
        };
        let substituted =
            generator.generate_distinct_from(ctx, metadata.name(), name, arg.ty(), &original)?;
        if let Some(slot) = args.get_mut(index) {
            *slot = substituted.clone();
        }
        let rebuilt = construct(metadata, ctor, args)?;
        let observed = property
            .read_value(&rebuilt)
            .map_err(|error| BeancheckError::invoke(metadata.name().clone(), error))?;
        if observed != substituted {
            return Err(ContractViolation::ArgumentNotBound {
                type_name: metadata.name().clone(),
                property: name.to_owned(),
                index,
                constructor: ctor.signature(),
                expected: substituted.to_string(),
                actual: observed.to_string(),
            }
            .into());
        }
        if let Some(slot) = args.get_mut(index) {
            *slot = original;
        }
    }
    Ok(())
}

/// Property phase: identical population preserves equality, then each
/// non-ignored property is perturbed and restored, one at a time.
fn run_property_phase(
    generator: &mut ValueGenerator<'_>,
    metadata: &TypeMetadata,
) -> Result<()> {
    let ctor = pick_for_property_phase(metadata)?;
    debug!(constructor = %ctor.signature(), "property phase");
    let mut ctx = GenContext::new();
    let args = generator.generate_args(&mut ctx, metadata.name(), ctor)?;
    let first = construct(metadata, ctor, &args)?;
    let second = construct(metadata, ctor, &args)?;
    assert_equal_pair(
        metadata,
        ctor,
        "constructing two instances from the same constructor",
        &first,
        &second,
    )?;

    let batch = generator.property_batch(&mut ctx, metadata)?;
    for (property, value) in &batch {
        let as_invoke =
            |error| BeancheckError::invoke(metadata.name().clone(), error);
        property
            .write_value(&first, value.clone())
            .map_err(as_invoke)?;
        property
            .write_value(&second, value.clone())
            .map_err(as_invoke)?;
    }
    assert_equal_pair(
        metadata,
        ctor,
        "populating both instances with identical values",
        &first,
        &second,
    )?;

    for (property, original) in &batch {
        let as_invoke =
            |error| BeancheckError::invoke(metadata.name().clone(), error);
        let distinct = generator.generate_distinct_from(
            &mut ctx,
            metadata.name(),
            property.name(),
            property.declared(),
            original,
        )?;
        property.write_value(&second, distinct).map_err(as_invoke)?;
        if first.eq_to(&second) {
            return Err(ContractViolation::PropertyInsensitive {
                type_name: metadata.name().clone(),
                property: property.name().to_owned(),
                constructor: ctor.signature(),
                left: first.render(),
                right: second.render(),
            }
            .into());
        }
        property
            .write_value(&second, original.clone())
            .map_err(as_invoke)?;
        if !first.eq_to(&second) || !second.eq_to(&first) {
            return Err(ContractViolation::EqualityNotRestored {
                type_name: metadata.name().clone(),
                property: property.name().to_owned(),
                constructor: ctor.signature(),
                left: first.render(),
                right: second.render(),
            }
            .into());
        }
        let left_hash = first.hash_value();
        let right_hash = second.hash_value();
        if left_hash != right_hash {
            return Err(ContractViolation::HashCodeMismatch {
                type_name: metadata.name().clone(),
                operation: format!("restoring property `{}`", property.name()),
                constructor: ctor.signature(),
                left_hash,
                right_hash,
                left: first.render(),
                right: second.render(),
            }
            .into());
        }
    }
    Ok(())
}
