//! Policy configuration consumed by introspection, generation and
//! verification.
//!
//! Defaults mirror conservative bean conventions: accessor anomalies are
//! tolerated silently, backing fields are not extracted, recursive
//! references fail, and both verification phases run.

use std::collections::{HashMap, HashSet};

use crate::descriptor::TypeName;

#[derive(Clone, Debug, Default)]
pub(crate) struct IgnoreSet {
    // Unqualified names and dotted paths share one bucket, as callers
    // supply them interchangeably. Unqualified entries suppress a property
    // wherever it appears by that name; dotted entries match the exact
    // path from the generation root.
    global: HashSet<String>,
    per_type: HashMap<TypeName, HashSet<String>>,
}

/// Resolved policy flags for one checker.
#[derive(Clone, Debug)]
pub(crate) struct CheckOptions {
    pub(crate) fail_on_invalid_getters: bool,
    pub(crate) fail_on_missing_setters: bool,
    pub(crate) fail_on_additional_setters: bool,
    pub(crate) fail_on_mismatching_backing_fields: bool,
    pub(crate) include_backing_fields: bool,
    pub(crate) force_accessible: bool,
    pub(crate) test_constructors: bool,
    pub(crate) test_constructor_args_change_equality: bool,
    pub(crate) test_constructor_args_match_properties: bool,
    pub(crate) test_properties: bool,
    pub(crate) fail_on_recursive_reference: bool,
    pub(crate) rng_seed: Option<u64>,
    pub(crate) ignore: IgnoreSet,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            fail_on_invalid_getters: false,
            fail_on_missing_setters: false,
            fail_on_additional_setters: false,
            fail_on_mismatching_backing_fields: true,
            include_backing_fields: false,
            force_accessible: false,
            test_constructors: true,
            test_constructor_args_change_equality: true,
            test_constructor_args_match_properties: false,
            test_properties: true,
            fail_on_recursive_reference: true,
            rng_seed: None,
            ignore: IgnoreSet::default(),
        }
    }
}

impl CheckOptions {
    /// Clears the three accessor-failure flags in one call.
    pub(crate) const fn fail_silently(&mut self) {
        self.fail_on_invalid_getters = false;
        self.fail_on_missing_setters = false;
        self.fail_on_additional_setters = false;
    }

    pub(crate) fn insert_ignore(&mut self, name_or_path: impl Into<String>) {
        self.ignore.global.insert(name_or_path.into());
    }

    pub(crate) fn insert_ignore_on(&mut self, ty: TypeName, name: impl Into<String>) {
        self.ignore.per_type.entry(ty).or_default().insert(name.into());
    }

    /// Inclusion policy applied per property while walking a surface.
    pub(crate) fn is_property_included(&self, ty: &TypeName, name: &str) -> bool {
        if self.ignore.global.contains(name) {
            return false;
        }
        !self
            .ignore
            .per_type
            .get(ty)
            .is_some_and(|names| names.contains(name))
    }

    /// Exact-path suppression applied during generation; `path` is dotted
    /// from the generation root.
    pub(crate) fn is_path_suppressed(&self, path: &str) -> bool {
        self.ignore.global.contains(path)
    }
}
