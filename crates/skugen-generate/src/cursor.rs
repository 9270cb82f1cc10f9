use skugen_core::AttributeSet;

/// Mixed-radix counter over the cartesian product of a fixed list of sets.
///
/// The last slot varies fastest. A zero radix means the product is empty; an
/// empty radix list yields exactly one empty tuple.
#[derive(Debug, Clone)]
pub(crate) struct ProductCursor {
    radices: Vec<usize>,
    digits: Vec<usize>,
    done: bool,
}

impl ProductCursor {
    pub(crate) fn new(radices: Vec<usize>) -> Self {
        let done = radices.contains(&0);
        let digits = vec![0; radices.len()];
        Self {
            radices,
            digits,
            done,
        }
    }

    pub(crate) fn is_done(&self) -> bool {
        self.done
    }

    pub(crate) fn digits(&self) -> &[usize] {
        &self.digits
    }

    pub(crate) fn advance(&mut self) {
        if self.done {
            return;
        }
        for slot in (0..self.digits.len()).rev() {
            self.digits[slot] += 1;
            if self.digits[slot] < self.radices[slot] {
                return;
            }
            self.digits[slot] = 0;
        }
        self.done = true;
    }
}

/// Lexicographic `k`-subsets of `0..n`, ascending indices within each subset.
#[derive(Debug, Clone)]
pub(crate) struct SubsetCursor {
    n: usize,
    indices: Vec<usize>,
    done: bool,
}

impl SubsetCursor {
    pub(crate) fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            done: k > n,
        }
    }

    pub(crate) fn is_done(&self) -> bool {
        self.done
    }

    pub(crate) fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub(crate) fn advance(&mut self) {
        if self.done {
            return;
        }
        let k = self.indices.len();
        for slot in (0..k).rev() {
            if self.indices[slot] < self.n - k + slot {
                self.indices[slot] += 1;
                for next in slot + 1..k {
                    self.indices[next] = self.indices[next - 1] + 1;
                }
                return;
            }
        }
        self.done = true;
    }
}

/// Walks every non-empty subset of `sets` by ascending size and, inside each
/// subset, the cartesian product of its values.
///
/// Holds one subset and one counter at a time, so memory is bounded by the
/// number of sets.
#[derive(Debug, Clone)]
pub(crate) struct SubsetProduct<'a> {
    sets: Vec<&'a AttributeSet>,
    size: usize,
    subsets: SubsetCursor,
    product: ProductCursor,
    done: bool,
}

impl<'a> SubsetProduct<'a> {
    pub(crate) fn new(sets: Vec<&'a AttributeSet>) -> Self {
        let mut cursor = Self {
            size: 1,
            subsets: SubsetCursor::new(sets.len(), 1),
            product: ProductCursor::new(Vec::new()),
            done: sets.is_empty(),
            sets,
        };
        cursor.reset();
        cursor
    }

    /// Rewind to the first tuple of the first subset.
    pub(crate) fn reset(&mut self) {
        self.done = self.sets.is_empty();
        self.size = 1;
        self.subsets = SubsetCursor::new(self.sets.len(), 1);
        self.product = ProductCursor::new(self.radices());
        self.settle();
    }

    /// Values of the current tuple, or `None` once every subset is exhausted.
    pub(crate) fn current(&self) -> Option<Vec<&'a str>> {
        if self.done {
            return None;
        }
        let values = self
            .subsets
            .indices()
            .iter()
            .zip(self.product.digits())
            .map(|(&index, &digit)| {
                let set: &'a AttributeSet = self.sets[index];
                set.values[digit].as_str()
            })
            .collect();
        Some(values)
    }

    pub(crate) fn advance(&mut self) {
        if self.done {
            return;
        }
        self.product.advance();
        self.settle();
    }

    fn radices(&self) -> Vec<usize> {
        if self.subsets.is_done() {
            return Vec::new();
        }
        self.subsets
            .indices()
            .iter()
            .map(|&index| self.sets[index].len())
            .collect()
    }

    // Moves past exhausted products, including subsets that contain an
    // empty set and therefore have no tuples at all.
    fn settle(&mut self) {
        while !self.done && self.product.is_done() {
            self.subsets.advance();
            if self.subsets.is_done() {
                self.size += 1;
                if self.size > self.sets.len() {
                    self.done = true;
                    return;
                }
                self.subsets = SubsetCursor::new(self.sets.len(), self.size);
            }
            self.product = ProductCursor::new(self.radices());
        }
    }
}
