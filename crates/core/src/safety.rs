//! Product safety evaluation against the user's allergen selection
//!
//! Matching is substring containment, not token equality: a selected code
//! `en:gluten` matches the tag `en:gluten-free` too. Products that declare no
//! allergen tags at all are reported as [`SafetyVerdict::Unknown`], whatever
//! the selection.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Three-way safety classification of a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "matched", rename_all = "lowercase")]
pub enum SafetyVerdict {
    /// None of the product's tags matched a selected allergen
    Safe,
    /// Every product tag that matched at least one selected allergen, in tag order
    Unsafe(Vec<String>),
    /// The product carries no allergen information
    Unknown,
}

impl SafetyVerdict {
    /// Whether the product contains a selected allergen
    #[must_use]
    pub fn is_unsafe(&self) -> bool {
        matches!(self, Self::Unsafe(_))
    }

    /// Matched tags, empty unless unsafe
    #[must_use]
    pub fn matched(&self) -> &[String] {
        match self {
            Self::Unsafe(tags) => tags,
            Self::Safe | Self::Unknown => &[],
        }
    }
}

impl fmt::Display for SafetyVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safe => f.write_str("SAFE"),
            Self::Unsafe(_) => f.write_str("UNSAFE"),
            Self::Unknown => f.write_str("UNKNOWN"),
        }
    }
}

/// Compare a product's allergen tags with the selected codes
#[must_use]
pub fn evaluate(product_tags: Option<&[String]>, selected: &BTreeSet<String>) -> SafetyVerdict {
    let tags = match product_tags {
        Some(tags) if !tags.is_empty() => tags,
        _ => return SafetyVerdict::Unknown,
    };

    let needles: Vec<String> = selected.iter().map(|c| c.to_lowercase()).collect();

    let matched: Vec<String> = tags
        .iter()
        .filter(|tag| {
            let tag = tag.to_lowercase();
            needles.iter().any(|needle| tag.contains(needle.as_str()))
        })
        .cloned()
        .collect();

    if matched.is_empty() {
        SafetyVerdict::Safe
    } else {
        SafetyVerdict::Unsafe(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_absent_or_empty_tags_are_unknown() {
        assert_eq!(evaluate(None, &set(&["en:milk"])), SafetyVerdict::Unknown);
        assert_eq!(evaluate(Some(&[][..]), &set(&["en:milk"])), SafetyVerdict::Unknown);
        assert_eq!(evaluate(None, &BTreeSet::new()), SafetyVerdict::Unknown);
    }

    #[test]
    fn test_single_match() {
        let product = tags(&["en:gluten", "en:milk"]);
        assert_eq!(
            evaluate(Some(product.as_slice()), &set(&["en:gluten"])),
            SafetyVerdict::Unsafe(tags(&["en:gluten"]))
        );
    }

    #[test]
    fn test_substring_match_quirk() {
        let product = tags(&["en:gluten-free"]);
        assert_eq!(
            evaluate(Some(product.as_slice()), &set(&["en:gluten"])),
            SafetyVerdict::Unsafe(tags(&["en:gluten-free"]))
        );
    }

    #[test]
    fn test_no_overlap_is_safe() {
        let product = tags(&["en:fish"]);
        assert_eq!(evaluate(Some(product.as_slice()), &set(&["en:milk"])), SafetyVerdict::Safe);
    }

    #[test]
    fn test_case_insensitive() {
        let product = tags(&["EN:Milk"]);
        assert_eq!(
            evaluate(Some(product.as_slice()), &set(&["en:milk"])),
            SafetyVerdict::Unsafe(tags(&["EN:Milk"]))
        );
    }

    #[test]
    fn test_preserves_order_and_duplicates() {
        let product = tags(&["en:milk", "en:fish", "en:nuts", "en:milk"]);
        let verdict = evaluate(Some(product.as_slice()), &set(&["en:nuts", "en:milk"]));
        assert_eq!(verdict.matched(), tags(&["en:milk", "en:nuts", "en:milk"]).as_slice());
    }

    #[test]
    fn test_one_tag_matching_several_codes_listed_once() {
        let product = tags(&["en:sulphur-dioxide-and-sulphites"]);
        let verdict = evaluate(Some(product.as_slice()), &set(&["en:sulphites", "en:sulphur-dioxide-and-sulphites"]));
        assert_eq!(verdict.matched().len(), 1);
    }

    #[test]
    fn test_serialize_verdict() {
        let json = serde_json::to_value(SafetyVerdict::Unsafe(tags(&["en:milk"]))).unwrap();
        assert_eq!(json["verdict"], "unsafe");
        assert_eq!(json["matched"][0], "en:milk");

        let json = serde_json::to_value(SafetyVerdict::Safe).unwrap();
        assert_eq!(json["verdict"], "safe");
    }

    proptest! {
        #[test]
        fn prop_empty_selection_is_safe_or_unknown(list in prop::collection::vec("[a-z:-]{1,20}", 0..8)) {
            let verdict = evaluate(Some(list.as_slice()), &BTreeSet::new());
            if list.is_empty() {
                prop_assert_eq!(verdict, SafetyVerdict::Unknown);
            } else {
                prop_assert_eq!(verdict, SafetyVerdict::Safe);
            }
        }

        #[test]
        fn prop_unsafe_iff_matches_nonempty(
            list in prop::collection::vec("en:[a-z]{1,8}", 1..8),
            selected in prop::collection::btree_set("en:[a-z]{1,4}", 0..4),
        ) {
            let verdict = evaluate(Some(list.as_slice()), &selected);
            match &verdict {
                SafetyVerdict::Unsafe(matched) => {
                    prop_assert!(!matched.is_empty());
                    for tag in matched {
                        prop_assert!(list.contains(tag));
                        prop_assert!(selected.iter().any(|c| tag.contains(c.as_str())));
                    }
                }
                SafetyVerdict::Safe => {
                    prop_assert!(list.iter().all(|t| selected.iter().all(|c| !t.contains(c.as_str()))));
                }
                SafetyVerdict::Unknown => prop_assert!(false, "non-empty list must not be unknown"),
            }
        }
    }
}
