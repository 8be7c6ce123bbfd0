use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::error::DataError;

// ---------------------------------------------------------------------------
// Dataset – the loaded (features, labels) pair
// ---------------------------------------------------------------------------

/// Feature matrix and label vector as produced by the loader.
///
/// Row `i` of `x` is one instance, `y[i]` its dense class label.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Feature matrix, shape `(n_instances, n_features)`.
    pub x: Array2<f64>,
    /// Class labels, length `n_instances`.
    pub y: Array1<i64>,
}

impl Dataset {
    pub fn new(x: Array2<f64>, y: Array1<i64>) -> Self {
        debug_assert_eq!(x.nrows(), y.len());
        Dataset { x, y }
    }

    /// Stack per-instance rows into a matrix. All rows must have the
    /// length of the first one.
    pub fn from_rows(rows: Vec<Vec<f64>>, labels: Vec<i64>) -> Result<Self, DataError> {
        debug_assert_eq!(rows.len(), labels.len());
        let n_rows = rows.len();
        let n_features = rows.first().map_or(0, Vec::len);

        let mut flat = Vec::with_capacity(n_rows * n_features);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != n_features {
                return Err(DataError::RaggedInstances {
                    row,
                    expected: n_features,
                    found: values.len(),
                });
            }
            flat.extend(values);
        }

        let x = Array2::from_shape_vec((n_rows, n_features), flat)
            .expect("flat buffer length matches shape");
        Ok(Dataset::new(x, Array1::from(labels)))
    }

    /// A dataset with no instances and no features.
    pub fn empty() -> Self {
        Dataset {
            x: Array2::zeros((0, 0)),
            y: Array1::zeros(0),
        }
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Borrow the pair as a read-only [`WebsiteData`] view.
    pub fn view(&self) -> WebsiteData<'_> {
        WebsiteData::new(self.x.view(), self.y.view())
    }
}

// ---------------------------------------------------------------------------
// WebsiteData – read-only query view
// ---------------------------------------------------------------------------

/// Result of [`WebsiteData::get_site`]: every feature of the matching rows,
/// or a single feature column of them.
#[derive(Debug, Clone, PartialEq)]
pub enum SiteSelection {
    Rows(Array2<f64>),
    Column(Array1<f64>),
}

impl SiteSelection {
    /// Number of instances selected.
    pub fn len(&self) -> usize {
        match self {
            SiteSelection::Rows(rows) => rows.nrows(),
            SiteSelection::Column(col) => col.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Convenience view over a feature matrix and its labels.
///
/// The view only borrows the arrays. Every accessor hands back an owned
/// copy, so callers can mutate results freely without touching the data
/// behind the view.
#[derive(Debug, Clone, Copy)]
pub struct WebsiteData<'a> {
    x: ArrayView2<'a, f64>,
    y: ArrayView1<'a, i64>,
    n_sites: usize,
}

impl<'a> WebsiteData<'a> {
    pub fn new(x: ArrayView2<'a, f64>, y: ArrayView1<'a, i64>) -> Self {
        let n_sites = y.iter().collect::<BTreeSet<_>>().len();
        WebsiteData { x, y, n_sites }
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.x.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Feature indices, `0..n_features`.
    pub fn features(&self) -> Range<usize> {
        0..self.x.ncols()
    }

    /// Site indices, `0..n_distinct_labels`. Assumes labels are already
    /// dense, which the loader guarantees.
    pub fn sites(&self) -> Range<usize> {
        0..self.n_sites
    }

    /// Copy of the label vector.
    pub fn get_labels(&self) -> Array1<i64> {
        self.y.to_owned()
    }

    /// Copy of all instances labelled `label`, optionally narrowed to one
    /// feature column.
    ///
    /// # Panics
    /// If `feature` is out of range.
    pub fn get_site(&self, label: i64, feature: Option<usize>) -> SiteSelection {
        let rows: Vec<usize> = self
            .y
            .iter()
            .enumerate()
            .filter(|&(_, &y)| y == label)
            .map(|(i, _)| i)
            .collect();

        match feature {
            Some(f) => SiteSelection::Column(self.x.column(f).select(Axis(0), &rows)),
            None => SiteSelection::Rows(self.x.select(Axis(0), &rows)),
        }
    }

    /// Copy of one feature column across all instances.
    ///
    /// # Panics
    /// If `feature` is out of range.
    pub fn get_feature(&self, feature: usize) -> Array1<f64> {
        self.x.column(feature).to_owned()
    }

    /// Number of instances per label.
    pub fn site_counts(&self) -> BTreeMap<i64, usize> {
        let mut counts = BTreeMap::new();
        for &label in self.y.iter() {
            *counts.entry(label).or_insert(0) += 1;
        }
        counts
    }
}
