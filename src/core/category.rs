use std::cmp::Ordering;
use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use crate::core::types::Sample;

/// Category resolution for the x axis a series is plotted against.
pub trait CategoryAxis {
    /// Grouped axes merge samples that share a category and lay them out by
    /// category index instead of by position.
    fn is_grouped(&self) -> bool;

    /// Category slot of `sample`.
    fn category_index(&self, sample: &Sample) -> usize;

    /// Called once per layout pass with every visible sample x value.
    fn prepare(&mut self, _x_values: &[f64]) {}
}

/// Indexed mode: every sample occupies its own position.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexedAxis;

impl CategoryAxis for IndexedAxis {
    fn is_grouped(&self) -> bool {
        false
    }

    fn category_index(&self, sample: &Sample) -> usize {
        sample.index
    }
}

/// Grouped mode: distinct x values, ascending, map to categories `0..n`.
#[derive(Debug, Clone, Default)]
pub struct GroupedCategoryAxis {
    categories: BTreeMap<OrderedFloat<f64>, usize>,
}

impl GroupedCategoryAxis {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }
}

impl CategoryAxis for GroupedCategoryAxis {
    fn is_grouped(&self) -> bool {
        true
    }

    fn category_index(&self, sample: &Sample) -> usize {
        match self.categories.get(&OrderedFloat(sample.x)) {
            Some(index) => *index,
            None if sample.x.is_finite() && sample.x > 0.0 => sample.x.round() as usize,
            None => 0,
        }
    }

    fn prepare(&mut self, x_values: &[f64]) {
        self.categories.clear();
        let mut distinct: Vec<OrderedFloat<f64>> = x_values
            .iter()
            .copied()
            .filter(|x| x.is_finite())
            .map(OrderedFloat)
            .collect();
        distinct.sort_unstable();
        distinct.dedup();
        for (index, x) in distinct.into_iter().enumerate() {
            self.categories.insert(x, index);
        }
    }
}

/// Permutation produced by grouping samples by category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryGrouping {
    /// Original sample positions in grouped order.
    pub order: Vec<usize>,
    /// Category of each entry of `order`.
    pub categories: Vec<usize>,
}

impl CategoryGrouping {
    /// Reorders samples in lockstep with the grouping, renumbering indices and
    /// placing each sample at its category.
    #[must_use]
    pub fn apply(&self, samples: &[Sample]) -> Vec<Sample> {
        self.order
            .iter()
            .zip(&self.categories)
            .enumerate()
            .map(|(index, (&source, &category))| {
                let mut sample = samples[source].clone();
                sample.index = index;
                sample.x = category as f64;
                sample
            })
            .collect()
    }
}

/// Groups samples by category, ordering duplicates within a category by
/// descending y. Empty samples sort last inside their category.
#[must_use]
pub fn group_by_category<A: CategoryAxis + ?Sized>(
    samples: &[Sample],
    axis: &A,
) -> CategoryGrouping {
    let mut keyed: Vec<(usize, usize)> = samples
        .iter()
        .enumerate()
        .map(|(position, sample)| (axis.category_index(sample), position))
        .collect();

    keyed.sort_by(|a, b| {
        a.0.cmp(&b.0).then_with(|| {
            let (ya, yb) = (samples[a.1].y, samples[b.1].y);
            match (ya.is_nan(), yb.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => yb.total_cmp(&ya),
            }
        })
    });

    CategoryGrouping {
        order: keyed.iter().map(|(_, position)| *position).collect(),
        categories: keyed.iter().map(|(category, _)| *category).collect(),
    }
}
