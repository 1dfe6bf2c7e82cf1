use std::collections::BTreeMap;

/// Values kept per feature series
pub const SUMMARY_WIDTH: usize = 4;

/// Min, mean, max and population variance of a series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Smallest value
    pub min: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// Largest value
    pub max: f64,
    /// Population variance
    pub var: f64,
}

impl Summary {
    /// Summarise a series; an empty series yields all zeros
    pub fn of<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<f64>,
    {
        let values: Vec<f64> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Summary {
                min: 0.0,
                mean: 0.0,
                max: 0.0,
                var: 0.0,
            };
        }

        let n = values.len() as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;

        Summary {
            min,
            mean,
            max,
            var,
        }
    }

    /// Values in output order
    pub fn to_array(self) -> [f64; SUMMARY_WIDTH] {
        [self.min, self.mean, self.max, self.var]
    }
}

/// Named feature series flattened in sorted name order
#[derive(Debug, Default)]
pub struct FeatureGroups {
    groups: BTreeMap<String, Summary>,
}

impl FeatureGroups {
    /// Create an empty collection
    pub fn new() -> Self {
        FeatureGroups::default()
    }

    /// Summarise and store a named series, replacing any previous one
    pub fn insert<S, I>(&mut self, name: S, values: I)
    where
        S: Into<String>,
        I: IntoIterator,
        I::Item: Into<f64>,
    {
        self.groups.insert(name.into(), Summary::of(values));
    }

    /// Number of named groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if no group was inserted
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group names in output order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Flatten to a vector, groups sorted by name
    pub fn flatten(&self) -> Vec<f64> {
        self.groups
            .values()
            .flat_map(|summary| summary.to_array())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let summary = Summary::of([1.0f32, 2.0, 3.0, 4.0]);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 4.0);
        assert_eq!(summary.mean, 2.5);
        assert!((summary.var - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_summary_empty() {
        let summary = Summary::of(Vec::<f64>::new());
        assert_eq!(summary.to_array(), [0.0; 4]);
    }

    #[test]
    fn test_groups_flatten_sorted() {
        let mut groups = FeatureGroups::new();
        groups.insert("zeta", [5.0f64]);
        groups.insert("mfcc_10", [2.0f64]);
        groups.insert("mfcc_2", [3.0f64]);
        groups.insert("alpha", [1.0f64]);

        let names: Vec<&str> = groups.names().collect();
        assert_eq!(names, vec!["alpha", "mfcc_10", "mfcc_2", "zeta"]);

        let flat = groups.flatten();
        assert_eq!(flat.len(), 16);
        assert_eq!(&flat[0..4], &[1.0, 1.0, 1.0, 0.0]);
        assert_eq!(flat[4], 2.0);
        assert_eq!(flat[12], 5.0);
    }
}
