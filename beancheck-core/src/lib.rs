//! Beancheck core library.
//!
//! Verifies the `equals`/`hashCode` contract of data-holding types
//! ("beans") without per-type test code. A type is described once by a
//! [`TypeSurface`] (its constructors, reader/writer operations and field
//! slots as invocable capabilities) and registered in a [`TypeRegistry`].
//! The [`BeanChecker`] then:
//!
//! 1. introspects the surface into cached [`TypeMetadata`],
//! 2. synthesizes random instances, recursing through nested bean types
//!    with explicit cycle detection, and
//! 3. runs a mutate-and-compare protocol proving two instances are equal
//!    iff their observable state is equal, with stable hash codes.
//!
//! A verification run either completes silently or reports the first
//! violated invariant with enough context to diagnose it without
//! re-running.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod ctor;
mod descriptor;
mod error;
mod generate;
mod introspect;
mod metadata;
mod options;
mod surface;
mod value;
mod verify;

pub use crate::{
    descriptor::{CollectionKind, TypeChain, TypeDescriptor, TypeName},
    error::{
        BeancheckError, ContractViolation, ContractViolationCode, GenerateError,
        GenerateErrorCode, InvokeError, InvokeErrorCode, MetadataError, MetadataErrorCode, Result,
    },
    metadata::{ArgMetadata, CtorMetadata, PropertyMetadata, TypeMetadata},
    surface::{ArgValues, ParamSpec, SurfaceBuilder, TypeRegistry, TypeSurface},
    value::{BeanInstance, InstanceOps, Value, ValueKind},
    verify::{BeanChecker, BeanCheckerBuilder},
};
