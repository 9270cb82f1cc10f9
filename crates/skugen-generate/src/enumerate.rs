use std::collections::HashSet;
use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};
use skugen_core::{AttributeSet, DerivedSets};

use crate::cursor::SubsetProduct;
use crate::required_first::RequiredFirst;

/// Ordered tuple of attribute values.
///
/// The root combination is empty and only appears when there is nothing to
/// enumerate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Combination<'a> {
    values: Vec<&'a str>,
}

impl<'a> Combination<'a> {
    pub fn new(values: Vec<&'a str>) -> Self {
        Self { values }
    }

    pub fn root() -> Self {
        Self { values: Vec::new() }
    }

    pub fn is_root(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[&'a str] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Counters kept while enumerating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumerationStats {
    /// Tuples produced before the required-coverage filter.
    pub candidates: u64,
    /// Tuples dropped by the filter.
    pub rejected: u64,
}

/// Which combination layout to enumerate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumerationStrategy {
    /// Every subset of attributes, filtered by required coverage.
    #[default]
    Subsets,
    /// Required values first, optional subsets appended.
    RequiredFirst,
}

/// Exact-match coverage test against the required sets.
#[derive(Debug, Clone)]
struct RequiredCoverage<'a> {
    sets: Vec<HashSet<&'a str>>,
}

impl<'a> RequiredCoverage<'a> {
    fn new(required_sets: &'a [AttributeSet]) -> Self {
        let sets = required_sets
            .iter()
            .map(|set| set.values.iter().map(String::as_str).collect())
            .collect();
        Self { sets }
    }

    fn covers(&self, values: &[&'a str]) -> bool {
        self.sets
            .iter()
            .all(|required| values.iter().any(|value| required.contains(value)))
    }
}

/// Lazy enumeration of every attribute subset's cartesian product, keeping
/// only tuples that carry a value from each required set.
///
/// Order: ascending subset size, then lexicographic index subsets, then
/// nested-loop product order with the last attribute varying fastest.
#[derive(Debug, Clone)]
pub struct Combinations<'a> {
    cursor: SubsetProduct<'a>,
    required: RequiredCoverage<'a>,
    root_pending: bool,
    stats: EnumerationStats,
}

impl<'a> Combinations<'a> {
    pub fn new(sets: &'a [AttributeSet], required_sets: &'a [AttributeSet]) -> Self {
        Self {
            cursor: SubsetProduct::new(sets.iter().collect()),
            required: RequiredCoverage::new(required_sets),
            root_pending: sets.is_empty(),
            stats: EnumerationStats::default(),
        }
    }

    pub fn stats(&self) -> EnumerationStats {
        self.stats
    }
}

impl<'a> Iterator for Combinations<'a> {
    type Item = Combination<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.root_pending {
            self.root_pending = false;
            return Some(Combination::root());
        }

        loop {
            let values = self.cursor.current()?;
            self.cursor.advance();
            self.stats.candidates += 1;
            if self.required.covers(&values) {
                return Some(Combination::new(values));
            }
            self.stats.rejected += 1;
        }
    }
}

impl FusedIterator for Combinations<'_> {}

/// Enumeration for either strategy.
#[derive(Debug, Clone)]
pub enum Enumeration<'a> {
    Subsets(Combinations<'a>),
    RequiredFirst(RequiredFirst<'a>),
}

impl Enumeration<'_> {
    pub fn stats(&self) -> EnumerationStats {
        match self {
            Enumeration::Subsets(inner) => inner.stats(),
            Enumeration::RequiredFirst(inner) => inner.stats(),
        }
    }
}

impl<'a> Iterator for Enumeration<'a> {
    type Item = Combination<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Enumeration::Subsets(inner) => inner.next(),
            Enumeration::RequiredFirst(inner) => inner.next(),
        }
    }
}

impl FusedIterator for Enumeration<'_> {}

/// Start enumerating the derived sets with the given strategy.
pub fn enumerate(strategy: EnumerationStrategy, derived: &DerivedSets) -> Enumeration<'_> {
    match strategy {
        EnumerationStrategy::Subsets => {
            Enumeration::Subsets(Combinations::new(&derived.sets, &derived.required_sets))
        }
        EnumerationStrategy::RequiredFirst => Enumeration::RequiredFirst(RequiredFirst::new(
            &derived.sets,
            &derived.required_sets,
        )),
    }
}

/// Number of tuples the subset strategy tests before filtering:
/// `∏(1 + |set|) − 1`. `None` when the count overflows `u128`.
pub fn candidate_count(sets: &[AttributeSet]) -> Option<u128> {
    sets.iter()
        .try_fold(1_u128, |acc, set| {
            u128::try_from(set.len())
                .ok()
                .and_then(|len| len.checked_add(1))
                .and_then(|factor| acc.checked_mul(factor))
        })
        .map(|total| total - 1)
}
