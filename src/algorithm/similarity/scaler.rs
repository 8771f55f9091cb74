//! z-score standardisation fitted on the historical pool

/// Standard deviations below this are treated as zero
const MIN_STD: f64 = 1e-12;

/// Per-feature mean and population standard deviation
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    /// Fit on the rows of a pool; every row must have `dimension` features
    ///
    /// Features with zero variance get a standard deviation of 1.0.
    #[must_use]
    pub fn fit(rows: &[Vec<f64>], dimension: usize) -> Self {
        if rows.is_empty() {
            return Self {
                means: vec![0.0; dimension],
                stds: vec![1.0; dimension],
            };
        }

        let count = rows.len() as f64;
        let mut means = vec![0.0; dimension];
        for row in rows {
            for (mean, value) in means.iter_mut().zip(row) {
                *mean += value;
            }
        }
        for mean in &mut means {
            *mean /= count;
        }

        let mut stds = vec![0.0; dimension];
        for row in rows {
            for ((variance, value), mean) in stds.iter_mut().zip(row).zip(&means) {
                *variance += (value - mean).powi(2);
            }
        }
        for std in &mut stds {
            *std = (*std / count).sqrt();
            if *std < MIN_STD {
                *std = 1.0;
            }
        }

        Self { means, stds }
    }

    /// Standardise one vector
    #[must_use]
    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .zip(self.means.iter().zip(&self.stds))
            .map(|(value, (mean, std))| (value - mean) / std)
            .collect()
    }

    /// Number of features the scaler was fitted on
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.means.len()
    }
}
