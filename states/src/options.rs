//! Helpers for choosing values offered in a table's "name" column.

use std::collections::HashSet;

use crate::{FieldValue, Row};

/// Candidates whose `key` value is not used by any row yet.
///
/// Only narrows what a picker offers; tables still accept duplicates.
pub fn deduplicated_options<'c, C, R: Row>(
    candidates: &'c [C],
    candidate_key: impl Fn(&C) -> &str,
    rows: &[R],
    key: &str,
) -> Vec<&'c C> {
    let used: HashSet<String> = rows
        .iter()
        .filter_map(|row| match row.get_field(key) {
            Some(FieldValue::Str(value)) => Some(value),
            _ => None,
        })
        .collect();

    candidates
        .iter()
        .filter(|candidate| !used.contains(candidate_key(*candidate)))
        .collect()
}

/// Name for a freshly added row.
///
/// The placeholder gains one trailing space per row whose name already
/// contains it, so repeated adds produce distinct names.
pub fn new_row_name<R: Row>(rows: &[R], placeholder: &str) -> String {
    let taken = rows
        .iter()
        .filter(|row| row.name().contains(placeholder))
        .count();
    format!("{placeholder}{}", " ".repeat(taken))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::tests::Item;

    const NAMES: &[&str] = &["Username", "Email", "Phone", "Password"];

    #[test]
    fn test_deduplicated_options_filters_used_names() {
        let rows = vec![Item::named("Email"), Item::named("Password")];
        let left = deduplicated_options(NAMES, |name| *name, &rows, "name");
        assert_eq!(left, vec![&"Username", &"Phone"]);
    }

    #[test]
    fn test_deduplicated_options_with_no_rows() {
        let left = deduplicated_options::<_, Item>(NAMES, |name| *name, &[], "name");
        assert_eq!(left.len(), NAMES.len());
    }

    #[test]
    fn test_deduplicated_options_ignores_non_string_keys() {
        let rows = vec![Item::named("Email")];
        let left = deduplicated_options(NAMES, |name| *name, &rows, "visible");
        assert_eq!(left.len(), NAMES.len());
    }

    #[test]
    fn test_new_row_name_pads_repeats() {
        let placeholder = "Please select an item";
        let mut rows: Vec<Item> = Vec::new();

        let first = new_row_name(&rows, placeholder);
        assert_eq!(first, placeholder);
        rows.push(Item::named(&first));

        let second = new_row_name(&rows, placeholder);
        assert_eq!(second, format!("{placeholder} "));
        rows.push(Item::named(&second));

        assert_eq!(new_row_name(&rows, placeholder), format!("{placeholder}  "));
    }
}
