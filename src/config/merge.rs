//! Deep merging of configuration mappings

use serde_yaml::{Mapping, Value};

/// Merge `layers` from lowest to highest priority into a new mapping.
///
/// A later layer's value replaces an earlier one for the same key, except
/// when both values are mappings, in which case they are merged recursively.
/// Absent keys never clear present ones. The inputs are left untouched.
pub fn merge<'a, I>(layers: I) -> Mapping
where
    I: IntoIterator<Item = &'a Mapping>,
{
    let mut merged = Mapping::new();
    for layer in layers {
        merge_into(&mut merged, layer);
    }
    merged
}

/// Merge `overlay` on top of `base` in place
pub fn merge_into(base: &mut Mapping, overlay: &Mapping) {
    for (key, value) in overlay {
        if let (Some(Value::Mapping(existing)), Value::Mapping(incoming)) =
            (base.get_mut(key), value)
        {
            merge_into(existing, incoming);
            continue;
        }
        base.insert(key.clone(), value.clone());
    }
}
