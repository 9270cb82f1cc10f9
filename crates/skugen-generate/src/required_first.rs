use std::iter::FusedIterator;

use skugen_core::AttributeSet;

use crate::cursor::{ProductCursor, SubsetProduct};
use crate::enumerate::{Combination, EnumerationStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Root,
    Optional,
    RequiredAlone,
    Done,
}

/// Layout that always leads with one value of every required attribute.
///
/// For each tuple of the required product, yields the tuple extended with
/// every optional-subset tuple, then the required tuple on its own. Without
/// optional attributes only the required tuples are yielded. Required
/// coverage holds by construction, so nothing is filtered.
#[derive(Debug, Clone)]
pub struct RequiredFirst<'a> {
    required: Vec<&'a AttributeSet>,
    has_optional: bool,
    required_cursor: ProductCursor,
    optional_cursor: SubsetProduct<'a>,
    stage: Stage,
    stats: EnumerationStats,
}

impl<'a> RequiredFirst<'a> {
    /// Optional sets are the members of `sets` whose attribute position does
    /// not appear among `required_sets`.
    pub fn new(sets: &'a [AttributeSet], required_sets: &'a [AttributeSet]) -> Self {
        let required: Vec<&'a AttributeSet> = required_sets.iter().collect();
        let optional: Vec<&'a AttributeSet> = sets
            .iter()
            .filter(|set| !required.iter().any(|req| req.position == set.position))
            .collect();

        let stage = if required.is_empty() && optional.is_empty() {
            Stage::Root
        } else {
            Stage::Optional
        };

        Self {
            required_cursor: ProductCursor::new(required.iter().map(|set| set.len()).collect()),
            has_optional: !optional.is_empty(),
            optional_cursor: SubsetProduct::new(optional),
            required,
            stage,
            stats: EnumerationStats::default(),
        }
    }

    pub fn stats(&self) -> EnumerationStats {
        self.stats
    }

    fn required_values(&self) -> Option<Vec<&'a str>> {
        if self.required_cursor.is_done() {
            return None;
        }
        let values = self
            .required
            .iter()
            .zip(self.required_cursor.digits())
            .map(|(&set, &digit)| set.values[digit].as_str())
            .collect();
        Some(values)
    }

    fn next_required(&mut self) {
        self.required_cursor.advance();
        self.optional_cursor.reset();
        self.stage = Stage::Optional;
    }

    fn emit(&mut self, values: Vec<&'a str>) -> Option<Combination<'a>> {
        self.stats.candidates += 1;
        Some(Combination::new(values))
    }
}

impl<'a> Iterator for RequiredFirst<'a> {
    type Item = Combination<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.stage {
                Stage::Done => return None,
                Stage::Root => {
                    self.stage = Stage::Done;
                    return Some(Combination::root());
                }
                Stage::Optional => {
                    let Some(required) = self.required_values() else {
                        self.stage = Stage::Done;
                        continue;
                    };

                    if !self.has_optional {
                        self.next_required();
                        return self.emit(required);
                    }

                    match self.optional_cursor.current() {
                        Some(optional) => {
                            self.optional_cursor.advance();
                            let mut values = required;
                            values.extend(optional);
                            return self.emit(values);
                        }
                        None => self.stage = Stage::RequiredAlone,
                    }
                }
                Stage::RequiredAlone => {
                    let required = self.required_values();
                    self.next_required();
                    match required {
                        Some(values) if !values.is_empty() => return self.emit(values),
                        _ => continue,
                    }
                }
            }
        }
    }
}

impl FusedIterator for RequiredFirst<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(position: usize, name: &str, values: &[&str]) -> AttributeSet {
        AttributeSet::new(position, name, values.iter().copied())
    }

    fn skus(iter: RequiredFirst<'_>) -> Vec<String> {
        iter.map(|c| c.values().join("-")).collect()
    }

    #[test]
    fn required_tuple_leads_then_stands_alone() {
        let color = set(0, "Color", &["red", "blue"]);
        let size = set(1, "Size", &["S", "M"]);
        let sets = vec![color.clone(), size];
        let required = vec![color];

        let out = skus(RequiredFirst::new(&sets, &required));

        assert_eq!(
            out,
            vec!["red-S", "red-M", "red", "blue-S", "blue-M", "blue"]
        );
    }

    #[test]
    fn only_required_sets_yield_their_product() {
        let color = set(0, "Color", &["red", "blue"]);
        let trim = set(1, "Trim", &["CLT", "FLT"]);
        let sets = vec![color.clone(), trim.clone()];
        let required = vec![color, trim];

        let out = skus(RequiredFirst::new(&sets, &required));

        assert_eq!(out, vec!["red-CLT", "red-FLT", "blue-CLT", "blue-FLT"]);
    }

    #[test]
    fn no_required_sets_yield_optional_subsets() {
        let sets = vec![set(0, "A", &["a"]), set(1, "B", &["b1", "b2"])];

        let out = skus(RequiredFirst::new(&sets, &[]));

        assert_eq!(out, vec!["a", "b1", "b2", "a-b1", "a-b2"]);
    }

    #[test]
    fn no_sets_yield_root() {
        let mut iter = RequiredFirst::new(&[], &[]);

        assert!(iter.next().expect("root").is_root());
        assert!(iter.next().is_none());
    }

    #[test]
    fn empty_required_set_yields_nothing() {
        let empty = set(0, "Color", &[]);
        let sets = vec![empty.clone(), set(1, "Size", &["S"])];
        let required = vec![empty];

        let mut iter = RequiredFirst::new(&sets, &required);

        assert!(iter.next().is_none());
        assert_eq!(iter.stats().candidates, 0);
    }
}
