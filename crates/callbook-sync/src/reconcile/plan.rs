//! Set difference by dedup key.
//!
//! Both directions go through [`missing`], so replacing the identity model
//! means replacing [`Keyed`] and nothing here.

use std::collections::HashSet;

use callbook_core::key::{DedupKey, Keyed};

/// Keys present on the target side at the start of a pass.
pub fn key_set<T: Keyed>(items: &[T]) -> HashSet<DedupKey> {
  items.iter().map(Keyed::dedup_key).collect()
}

/// Source items whose key is not in `existing`, in source order.
///
/// With `collapse_duplicates`, only the first item of each key is kept;
/// otherwise repeated keys in `source` are all returned.
pub fn missing<'a, T: Keyed>(
  source: &'a [T],
  existing: &HashSet<DedupKey>,
  collapse_duplicates: bool,
) -> Vec<&'a T> {
  let mut seen = HashSet::new();
  source
    .iter()
    .filter(|item| {
      let key = item.dedup_key();
      if existing.contains(&key) {
        return false;
      }
      !collapse_duplicates || seen.insert(key)
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use callbook_core::{contact::Contact, provider::PhoneEntry};

  use super::*;

  #[test]
  fn only_unknown_keys_are_missing() {
    let existing = key_set(&[Contact::new("A", "1")]);
    let source = [PhoneEntry::new("A", "1"), PhoneEntry::new("B", "2")];

    let out = missing(&source, &existing, false);
    assert_eq!(out, vec![&PhoneEntry::new("B", "2")]);
  }

  #[test]
  fn duplicates_kept_unless_collapsed() {
    let existing = HashSet::new();
    let source = [
      PhoneEntry::new("Huy", "1"),
      PhoneEntry::new("Huy", "1"),
      PhoneEntry::new("Huy", "2"),
    ];

    assert_eq!(missing(&source, &existing, false).len(), 3);
    assert_eq!(
      missing(&source, &existing, true),
      vec![&source[0], &source[2]]
    );
  }

  #[test]
  fn same_name_different_phone_is_a_different_contact() {
    let existing = key_set(&[PhoneEntry::new("Linh", "0901234567")]);
    let source = [Contact::new("Linh", "0900000000")];
    assert_eq!(missing(&source, &existing, false).len(), 1);
  }
}
