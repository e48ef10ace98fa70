use serde::Serialize;
use std::collections::HashMap;

/// One slice of a pie chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

impl CategoryCount {
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Count occurrences of each label.
///
/// Largest slice first; ties in label order so the output is stable.
pub fn tally<I, L>(labels: I) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = L>,
    L: Into<String>,
{
    tally_weighted(labels.into_iter().map(|label| (label, 1)))
}

/// Sum a weight per label, for records that each stand for several
/// vehicles. Labels whose weights sum to zero are left out.
pub fn tally_weighted<I, L>(weighted: I) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = (L, usize)>,
    L: Into<String>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for (label, weight) in weighted {
        *counts.entry(label.into()).or_default() += weight;
    }

    let mut breakdown: Vec<CategoryCount> = counts
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(label, count)| CategoryCount { label, count })
        .collect();
    breakdown.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    breakdown
}

/// Sum of all slice counts.
pub fn total(breakdown: &[CategoryCount]) -> usize {
    breakdown.iter().map(|c| c.count).sum()
}
