//! Constructor resolution policy.
//!
//! Two call sites pick a constructor: instantiation (nested bean
//! generation) wants the cheapest safe constructor and prefers a public
//! zero-argument one, then the public constructor with the longest argument
//! list, then a forced zero-argument one even if non-public. The property
//! phase of the verifier instead prefers zero arguments, then the
//! *shortest* list, so population exercises as many properties as
//! possible.

use crate::{
    error::MetadataError,
    metadata::{CtorMetadata, TypeMetadata},
};

/// Resolves and caches the representative constructor used to instantiate
/// a type during generation.
pub(crate) fn resolve_representative(
    metadata: &TypeMetadata,
) -> Result<&CtorMetadata, MetadataError> {
    let no_constructor = || MetadataError::NoConstructor {
        type_name: metadata.name().clone(),
    };
    if let Some(index) = metadata.representative_index() {
        return metadata.constructors().get(index).ok_or_else(no_constructor);
    }
    let index = choose_representative(metadata.constructors()).ok_or_else(no_constructor)?;
    metadata.record_representative(index);
    metadata.constructors().get(index).ok_or_else(no_constructor)
}

fn choose_representative(constructors: &[CtorMetadata]) -> Option<usize> {
    if let Some(index) = constructors
        .iter()
        .position(|ctor| ctor.is_public() && ctor.arg_count() == 0)
    {
        return Some(index);
    }
    let mut longest: Option<(usize, usize)> = None;
    for (index, ctor) in constructors.iter().enumerate() {
        if !ctor.is_public() {
            continue;
        }
        // Strictly-greater keeps the first of equally long candidates.
        if longest.is_none_or(|(_, count)| ctor.arg_count() > count) {
            longest = Some((index, ctor.arg_count()));
        }
    }
    if let Some((index, _)) = longest {
        return Some(index);
    }
    constructors.iter().position(|ctor| ctor.arg_count() == 0)
}

/// Picks the constructor the property phase builds its instance pair with:
/// zero arguments preferred, else the shortest argument list.
pub(crate) fn pick_for_property_phase(
    metadata: &TypeMetadata,
) -> Result<&CtorMetadata, MetadataError> {
    let mut shortest: Option<&CtorMetadata> = None;
    for ctor in metadata.constructors() {
        if ctor.arg_count() == 0 {
            return Ok(ctor);
        }
        if shortest.is_none_or(|best| best.arg_count() > ctor.arg_count()) {
            shortest = Some(ctor);
        }
    }
    shortest.ok_or_else(|| MetadataError::NoConstructor {
        type_name: metadata.name().clone(),
    })
}
