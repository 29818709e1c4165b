//! Disambiguation search: `base`, `base-2`, `base-3`, … until a free slot.

use super::slugify::crop;
use crate::core::{DbError, Result};

/// `base` carrying the disambiguator `index`, cropped so the whole probe
/// fits in `max_length` characters. The suffix is never cropped; `None`
/// when the suffix alone does not fit.
pub fn disambiguate(base: &str, separator: &str, index: u64, max_length: usize) -> Option<String> {
    let suffix = format!("{}{}", separator, index);
    let room = max_length.checked_sub(suffix.chars().count())?;
    Some(format!("{}{}", crop(base, room), suffix))
}

/// First probe of the sequence for which `is_taken` answers `false`.
///
/// The counter only ever increases, so no probe is checked twice. There is
/// no upper bound: a finite store always leaves some index free.
pub fn find_available<F>(
    candidate: &str,
    separator: &str,
    max_length: usize,
    mut is_taken: F,
) -> Result<String>
where
    F: FnMut(&str) -> Result<bool>,
{
    let base = crop(candidate, max_length);
    if !is_taken(&base)? {
        return Ok(base);
    }

    let mut index: u64 = 1;
    loop {
        index += 1;
        let probe = disambiguate(&base, separator, index, max_length).ok_or_else(|| {
            DbError::ConstraintViolation(format!(
                "Cannot fit disambiguator '{}{}' into {} characters",
                separator, index, max_length
            ))
        })?;
        if !is_taken(&probe)? {
            return Ok(probe);
        }
    }
}
