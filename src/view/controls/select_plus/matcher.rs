//! Query matching for the option list

use crate::markup::SelectOption;

/// Whether `option` matches `query`
///
/// Case-insensitive substring match on the label, or case-insensitive
/// equality on the value. An empty query matches everything.
pub fn option_matches(option: &SelectOption, query: &str) -> bool {
    matches_lowered(option, &query.to_lowercase())
}

fn matches_lowered(option: &SelectOption, lowered_query: &str) -> bool {
    option.label.to_lowercase().contains(lowered_query)
        || option.value.to_lowercase() == lowered_query
}

/// Indices (into `options`) of the options matching `query`, in order
pub fn filtered_indices(options: &[SelectOption], query: &str) -> Vec<usize> {
    let lowered = query.to_lowercase();
    options
        .iter()
        .enumerate()
        .filter(|(_, option)| matches_lowered(option, &lowered))
        .map(|(i, _)| i)
        .collect()
}

/// The options matching `query`, in order
pub fn filter_options<'a>(options: &'a [SelectOption], query: &str) -> Vec<&'a SelectOption> {
    let lowered = query.to_lowercase();
    options
        .iter()
        .filter(|option| matches_lowered(option, &lowered))
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn option_strategy() -> impl Strategy<Value = SelectOption> {
        ("[a-zA-Z0-9]{0,4}", "[a-zA-Z ]{0,12}").prop_map(|(v, l)| SelectOption::new(v, l))
    }

    proptest! {
        /// Filtering keeps exactly the options the predicate accepts, in order
        #[test]
        fn filter_agrees_with_predicate(
            options in prop::collection::vec(option_strategy(), 0..12),
            query in "[a-zA-Z0-9]{0,3}"
        ) {
            let expected: Vec<usize> = options
                .iter()
                .enumerate()
                .filter(|(_, o)| {
                    o.label.to_lowercase().contains(&query.to_lowercase())
                        || o.value.to_lowercase() == query.to_lowercase()
                })
                .map(|(i, _)| i)
                .collect();
            prop_assert_eq!(filtered_indices(&options, &query), expected);
        }

        /// The empty query never filters anything out
        #[test]
        fn empty_query_keeps_everything(
            options in prop::collection::vec(option_strategy(), 0..12)
        ) {
            prop_assert_eq!(filter_options(&options, "").len(), options.len());
        }

        /// Matching is insensitive to the case of the query
        #[test]
        fn query_case_does_not_matter(
            options in prop::collection::vec(option_strategy(), 0..12),
            query in "[a-z]{0,3}"
        ) {
            prop_assert_eq!(
                filtered_indices(&options, &query),
                filtered_indices(&options, &query.to_uppercase())
            );
        }
    }
}
