//! Ordinary least squares of one column on another.

/// Fitted line `y ≈ slope · x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination of the fit on its own data.
    pub r_squared: f64,
}

impl LinearFit {
    /// Fit `y` on `x`. `None` when `x` has fewer than two samples or no spread.
    pub fn fit(x: &[f64], y: &[f64]) -> Option<Self> {
        debug_assert_eq!(x.len(), y.len());
        let n = x.len();
        if n < 2 {
            return None;
        }
        let nf = n as f64;
        let mean_x = x.iter().sum::<f64>() / nf;
        let mean_y = y.iter().sum::<f64>() / nf;

        let mut sxy = 0.0;
        let mut sxx = 0.0;
        for (&xi, &yi) in x.iter().zip(y) {
            sxy += (xi - mean_x) * (yi - mean_y);
            sxx += (xi - mean_x) * (xi - mean_x);
        }
        if sxx == 0.0 {
            return None;
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;

        let mut ss_res = 0.0;
        let mut ss_tot = 0.0;
        for (&xi, &yi) in x.iter().zip(y) {
            let residual = yi - (slope * xi + intercept);
            ss_res += residual * residual;
            ss_tot += (yi - mean_y) * (yi - mean_y);
        }
        // A constant target is explained perfectly by a flat line.
        let r_squared = if ss_tot == 0.0 {
            1.0
        } else {
            1.0 - ss_res / ss_tot
        };

        Some(Self {
            slope,
            intercept,
            r_squared,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}
