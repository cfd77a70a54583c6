use crate::config::Likelihood;
use statrs::{
    distribution::{Continuous, ContinuousCDF, Normal},
    statistics::Statistics,
};

/// A normal distribution fitted to a bucket's sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaussian {
    mean: f64,
    std_dev: f64,
    dist: Normal,
}

impl Gaussian {
    /// Fit with the sample mean and the sample variance (n - 1 denominator).
    ///
    /// Returns `None` with fewer than two values or when the variance is zero or not finite.
    pub fn fit(values: &[f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }

        let mean = values.iter().mean();
        let variance = values.iter().variance();
        if !mean.is_finite() || !variance.is_finite() || variance <= 0.0 {
            return None;
        }

        let std_dev = variance.sqrt();
        let dist = Normal::new(mean, std_dev).ok()?;

        Some(Gaussian {
            mean,
            std_dev,
            dist,
        })
    }

    /// The fitted mean.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// The fitted standard deviation.
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Score `x` against the fit.
    pub fn likelihood(&self, x: f64, form: Likelihood) -> f64 {
        match form {
            Likelihood::Windowed { half_width } => {
                self.dist.cdf(x + half_width) - self.dist.cdf(x - half_width)
            }
            Likelihood::Density => self.dist.pdf(x),
        }
    }
}

/// The likelihood of `x` under a Gaussian fitted to `values`, zero if no fit is possible.
pub(crate) fn fitted_likelihood(values: &[f64], x: f64, form: Likelihood) -> f64 {
    Gaussian::fit(values).map_or(0.0, |g| g.likelihood(x, form))
}
