//! Ordered sample storage.
//!
//! A [`Series`] only ever grows at the end: every appended sample must have an
//! `x` no smaller than the current maximum. Index lookup relies on that order.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{ChartError, ChartResult};

/// One `(x, y)` data point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

impl Sample {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Sample {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Data-space bounding box of one or more series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataExtents {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl DataExtents {
    /// Smallest extents covering both.
    pub fn union(self, other: DataExtents) -> DataExtents {
        DataExtents {
            x_min: self.x_min.min(other.x_min),
            x_max: self.x_max.max(other.x_max),
            y_min: self.y_min.min(other.y_min),
            y_max: self.y_max.max(other.y_max),
        }
    }
}

/// Series shared between the caller and the bindings that draw it.
pub type SharedSeries = Rc<RefCell<Series>>;

/// A named, x-ordered list of samples with running statistics.
#[derive(Debug, Clone)]
pub struct Series {
    name: String,
    samples: Vec<Sample>,
    y_sum: f64,
    y_min: f64,
    y_max: f64,
    sample_spacing: Option<f64>,
    revision: u64,
}

impl Default for Series {
    fn default() -> Self {
        Self::new("")
    }
}

impl Series {
    /// Create an empty series.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            samples: Vec::new(),
            y_sum: 0.0,
            y_min: f64::INFINITY,
            y_max: f64::NEG_INFINITY,
            sample_spacing: None,
            revision: 0,
        }
    }

    /// Create a series from an initial list, rejecting out-of-order input.
    pub fn from_samples<I, S>(name: impl Into<String>, samples: I) -> ChartResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Sample>,
    {
        let mut series = Self::new(name);
        series.extend(samples)?;
        Ok(series)
    }

    /// Declare the nominal distance between samples, used for box widths.
    pub fn with_sample_spacing(mut self, spacing: f64) -> Self {
        self.set_sample_spacing(Some(spacing));
        self
    }

    /// Wrap into a [`SharedSeries`].
    pub fn shared(self) -> SharedSeries {
        Rc::new(RefCell::new(self))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.revision += 1;
    }

    /// Declared sample spacing, if any. Non-positive or non-finite values are
    /// ignored.
    pub fn sample_spacing(&self) -> Option<f64> {
        self.sample_spacing
    }

    pub fn set_sample_spacing(&mut self, spacing: Option<f64>) {
        self.sample_spacing = spacing.filter(|s| s.is_finite() && *s > 0.0);
        self.revision += 1;
    }

    /// Append one sample.
    ///
    /// # Errors
    ///
    /// [`ChartError::SeriesOrdering`] if `x` is below the current maximum `x`
    /// (or NaN). The series is left unchanged.
    pub fn append(&mut self, x: f64, y: f64) -> ChartResult<()> {
        self.check_order(x, self.x_max())?;
        self.push_unchecked(Sample { x, y });
        self.revision += 1;
        Ok(())
    }

    /// Append many samples, all or nothing.
    pub fn extend<I, S>(&mut self, samples: I) -> ChartResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<Sample>,
    {
        let incoming: Vec<Sample> = samples.into_iter().map(Into::into).collect();

        let mut max_x = self.x_max();
        for sample in &incoming {
            self.check_order(sample.x, max_x)?;
            max_x = Some(sample.x);
        }

        if incoming.is_empty() {
            return Ok(());
        }
        self.samples.reserve(incoming.len());
        for sample in incoming {
            self.push_unchecked(sample);
        }
        self.revision += 1;
        Ok(())
    }

    /// Remove every sample.
    pub fn clear(&mut self) {
        self.samples.clear();
        self.y_sum = 0.0;
        self.y_min = f64::INFINITY;
        self.y_max = f64::NEG_INFINITY;
        self.revision += 1;
    }

    fn check_order(&self, x: f64, max_x: Option<f64>) -> ChartResult<()> {
        match max_x {
            Some(max_x) if x.is_nan() || x < max_x => {
                Err(ChartError::SeriesOrdering { x, max_x })
            }
            None if x.is_nan() => Err(ChartError::SeriesOrdering {
                x,
                max_x: f64::NEG_INFINITY,
            }),
            _ => Ok(()),
        }
    }

    fn push_unchecked(&mut self, sample: Sample) {
        self.y_sum += sample.y;
        self.y_min = self.y_min.min(sample.y);
        self.y_max = self.y_max.max(sample.y);
        self.samples.push(sample);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<Sample> {
        self.samples.get(index).copied()
    }

    #[inline]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn x_min(&self) -> Option<f64> {
        self.samples.first().map(|s| s.x)
    }

    pub fn x_max(&self) -> Option<f64> {
        self.samples.last().map(|s| s.x)
    }

    pub fn y_min(&self) -> Option<f64> {
        (!self.is_empty()).then_some(self.y_min)
    }

    pub fn y_max(&self) -> Option<f64> {
        (!self.is_empty()).then_some(self.y_max)
    }

    pub fn y_sum(&self) -> f64 {
        self.y_sum
    }

    pub fn y_mean(&self) -> Option<f64> {
        (!self.is_empty()).then(|| self.y_sum / self.len() as f64)
    }

    /// Bounding box of all samples, `None` when empty.
    pub fn extents(&self) -> Option<DataExtents> {
        Some(DataExtents {
            x_min: self.x_min()?,
            x_max: self.x_max()?,
            y_min: self.y_min()?,
            y_max: self.y_max()?,
        })
    }

    /// Counter bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Highest index `i` with `samples[i].x < x`.
    ///
    /// Returns `0` when `x` is at or below the first sample and `len - 1` when
    /// above the last. Tries an O(1) guess assuming uniform spacing before
    /// falling back to [`bisect_index`](Self::bisect_index).
    pub fn index_for_x_val(&self, x: f64) -> usize {
        let n = self.samples.len();
        if n == 0 {
            return 0;
        }
        let first = self.samples[0].x;
        let last = self.samples[n - 1].x;
        if !(x > first) {
            return 0;
        }
        if x > last {
            return n - 1;
        }

        let avg_step = (last - first) / (n - 1) as f64;
        if avg_step > 0.0 && avg_step.is_finite() {
            let guess = ((x - first) / avg_step).floor();
            if guess.is_finite() {
                let guess = (guess.max(0.0) as usize).min(n - 2);
                if self.samples[guess].x < x && x <= self.samples[guess + 1].x {
                    return guess;
                }
            }
        }

        self.bisect_index(x)
    }

    /// Bisection-only form of [`index_for_x_val`](Self::index_for_x_val).
    pub fn bisect_index(&self, x: f64) -> usize {
        self.samples
            .partition_point(|s| s.x < x)
            .saturating_sub(1)
            .min(self.samples.len().saturating_sub(1))
    }

    /// Number of samples with `lo <= x <= hi`.
    pub fn visible_count(&self, lo: f64, hi: f64) -> usize {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let start = self.samples.partition_point(|s| s.x < lo);
        let end = self.samples.partition_point(|s| s.x <= hi);
        end.saturating_sub(start)
    }
}
