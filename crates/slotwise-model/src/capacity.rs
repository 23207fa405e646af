// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Matching capacity rows to people.
//!
//! Capacity tables list `(id, max sections)` rows in any order. Every person
//! in the preference table must receive exactly one row. Ids are compared
//! after trimming surrounding whitespace on both sides. Rows naming an
//! unknown id, and repeated rows for an id that was already matched, are
//! logged and skipped.

use crate::error::ModelError;
use rustc_hash::FxHashMap;
use tracing::warn;

/// Returns the capacity of each id in `ids`, in the same order.
///
/// # Errors
///
/// Returns `ModelError::MissingCapacities` naming every id without a row,
/// in the order the ids appear in `ids`.
///
/// ```rust
/// use slotwise_model::capacity::match_capacities;
///
/// let ids = ["amy", "bo", "cy"];
/// let rows = vec![("cy".to_string(), 1), ("amy".to_string(), 3), ("bo".to_string(), 2)];
/// assert_eq!(match_capacities(&ids, rows).unwrap(), vec![3, 2, 1]);
/// ```
pub fn match_capacities<S, I>(ids: &[S], entries: I) -> Result<Vec<usize>, ModelError>
where
    S: AsRef<str>,
    I: IntoIterator<Item = (String, usize)>,
{
    let lookup: FxHashMap<&str, usize> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_ref().trim(), i))
        .collect();
    let mut capacities: Vec<Option<usize>> = vec![None; ids.len()];

    for (id, capacity) in entries {
        let Some(&index) = lookup.get(id.trim()) else {
            warn!(id = %id, "capacity entry without a matching preference entry, skipping");
            continue;
        };
        if capacities[index].is_some() {
            warn!(id = %id, "repeated capacity entry, keeping the first one");
            continue;
        }
        capacities[index] = Some(capacity);
    }

    let missing: Vec<String> = ids
        .iter()
        .zip(capacities.iter())
        .filter(|(_, c)| c.is_none())
        .map(|(id, _)| id.as_ref().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ModelError::MissingCapacities(missing));
    }

    Ok(capacities.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(items: &[(&str, usize)]) -> Vec<(String, usize)> {
        items.iter().map(|(id, c)| (id.to_string(), *c)).collect()
    }

    #[test]
    fn test_order_independent_matching() {
        let ids = ["m1", "m2"];
        let caps = match_capacities(&ids, rows(&[("m2", 4), ("m1", 1)])).unwrap();
        assert_eq!(caps, vec![1, 4]);
    }

    #[test]
    fn test_unknown_and_repeated_rows_are_skipped() {
        let ids = ["m1", "m2"];
        let caps = match_capacities(
            &ids,
            rows(&[("ghost", 9), ("m1", 2), ("m1", 7), ("m2", 3)]),
        )
        .unwrap();
        assert_eq!(caps, vec![2, 3]);
    }

    #[test]
    fn test_missing_rows_are_reported() {
        let ids = ["m1", "m2", "m3"];
        let err = match_capacities(&ids, rows(&[("m2", 1)])).unwrap_err();
        assert_eq!(
            err,
            ModelError::MissingCapacities(vec!["m1".to_string(), "m3".to_string()])
        );
    }

    #[test]
    fn test_whitespace_around_ids_is_ignored() {
        let ids = [" m1", "m2 "];
        let caps = match_capacities(&ids, rows(&[("m2", 4), ("m1  ", 1)])).unwrap();
        assert_eq!(caps, vec![1, 4]);
    }

    #[test]
    fn test_empty_population() {
        let ids: [&str; 0] = [];
        assert!(match_capacities(&ids, rows(&[("x", 1)])).unwrap().is_empty());
    }
}
