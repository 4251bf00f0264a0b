//! Range normalization, "nice" tick spacing and the bounded tick walk.
//!
//! Every division-based transform in the engine goes through a range that
//! has passed [`normalize_range`], so `max - min` is always positive and
//! finite.

/// Hard cap on ticks emitted by one side of a [`TickWalk`].
pub const MAX_TICKS: usize = 512;

/// Magnitudes below this count as zero when expanding a degenerate range.
pub const ZERO_EPSILON: f64 = 1e-12;

/// Width used when a degenerate range sits at zero.
pub const ZERO_RANGE_WIDTH: f64 = 0.001;

/// Thresholds on `range / 10^(exp+1)` paired with the step, in units of
/// `10^(exp-2)`, chosen when the ratio reaches that threshold. Each row
/// lands between roughly 2.5 and 6 ticks across the range.
const RATIONAL_STEPS: [(f64, f64); 4] = [(0.5, 200.0), (0.25, 100.0), (0.15, 50.0), (0.1, 25.0)];

/// Upper end of the ratio table; ratios are always below it.
const RATIONAL_CEILING: f64 = 1.0;

/// Lowest decade the spacing search starts from, so `10^-exp` stays finite.
const MIN_DECADE: i32 = -300;

/// Make `[min, max]` safe to divide by.
///
/// Reversed input is swapped and non-finite input becomes `[0, 1]`. A range
/// whose width overflows has both ends halved. A zero-width range is
/// expanded: around zero to `[0, 0.001]`, otherwise
/// outward by scaling (`[v/2, v*1.5]` for positive `v`, `[v*1.5, v/2]` for
/// negative `v`).
pub fn normalize_range(min: f64, max: f64) -> (f64, f64) {
    if !min.is_finite() || !max.is_finite() {
        tracing::warn!(min, max, "non-finite range replaced with [0, 1]");
        return (0.0, 1.0);
    }

    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    if !(hi - lo).is_finite() {
        let halved = (lo / 2.0, hi / 2.0);
        tracing::warn!(min, max, ?halved, "range too wide to span, halved");
        return halved;
    }
    if hi > lo {
        return (lo, hi);
    }

    let v = lo;
    let expanded = if v.abs() < ZERO_EPSILON {
        (0.0, ZERO_RANGE_WIDTH)
    } else if v > 0.0 {
        (v / 2.0, v * 1.5)
    } else {
        (v * 1.5, v / 2.0)
    };
    tracing::debug!(value = v, ?expanded, "expanded degenerate range");
    expanded
}

/// `mantissa × 10^exp`, dividing for negative exponents so that results
/// such as `5.0` or `0.25` come out exact.
pub fn scale_pow10(mantissa: f64, exp: i32) -> f64 {
    if exp >= 0 {
        mantissa * 10f64.powi(exp)
    } else {
        mantissa / 10f64.powi(-exp)
    }
}

/// Pick a tick spacing of the form `{1, 2, 2.5, 5} × 10^k` for `[min, max]`.
///
/// Deterministic: the same input always produces the same spacing.
pub fn rational_tick_spacing(min: f64, max: f64) -> f64 {
    let (min, max) = normalize_range(min, max);
    let range = max - min;

    // A finite positive range has its decade within [-324, 308].
    let mut exp = (range.log10().floor() as i32).max(MIN_DECADE);
    let mut ratio = decade_ratio(range, exp);
    // log10 can land a hair off an exact power of ten.
    if ratio < RATIONAL_STEPS[RATIONAL_STEPS.len() - 1].0 {
        exp -= 1;
        ratio = decade_ratio(range, exp);
    } else if ratio >= RATIONAL_CEILING {
        exp += 1;
        ratio = decade_ratio(range, exp);
    }

    let units = RATIONAL_STEPS
        .iter()
        .find(|(threshold, _)| ratio >= *threshold)
        .map(|(_, units)| *units)
        .unwrap_or(RATIONAL_STEPS[RATIONAL_STEPS.len() - 1].1);

    scale_pow10(units, exp - 2)
}

/// `range / 10^(exp+1)`, without forming `10^309` for the widest ranges.
fn decade_ratio(range: f64, exp: i32) -> f64 {
    if exp < f64::MAX_10_EXP {
        range / scale_pow10(1.0, exp + 1)
    } else {
        range / scale_pow10(1.0, exp) / 10.0
    }
}

/// Major or minor graduation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickKind {
    /// Labelled tick at a whole multiple of the spacing.
    Major,
    /// Unlabelled half-step tick.
    Minor,
}

/// One position produced by a [`TickWalk`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkedTick {
    /// Signed distance from the anchor, in steps (halves for minor ticks).
    pub steps: f64,
    /// Position in the walked coordinate.
    pub position: f64,
    /// Major or minor.
    pub kind: TickKind,
}

/// Outward walk from a fixed anchor in equal steps, one loop per side so the
/// anchor never drifts with range asymmetry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickWalk {
    /// Starting coordinate; clamped into `[lo, hi]` by the walk.
    pub anchor: f64,
    /// Distance between majors; must be positive.
    pub step: f64,
    /// Lower bound of the walked coordinate.
    pub lo: f64,
    /// Upper bound of the walked coordinate.
    pub hi: f64,
    /// Emit a minor tick half a step from each major.
    pub minor: bool,
}

impl TickWalk {
    /// Run the walk. Returns nothing for a non-positive or non-finite step.
    pub fn walk(&self) -> Vec<WalkedTick> {
        let mut ticks = Vec::new();
        if !(self.step > 0.0)
            || !self.step.is_finite()
            || !self.anchor.is_finite()
            || !(self.hi >= self.lo)
        {
            return ticks;
        }

        let anchor = self.anchor.clamp(self.lo, self.hi);
        let eps = (self.hi - self.lo).abs() * 1e-6 + 1e-9;
        let half = self.step / 2.0;

        // Positive side, anchor included.
        for i in 0..MAX_TICKS {
            let position = anchor + i as f64 * self.step;
            if position > self.hi + eps {
                break;
            }
            ticks.push(WalkedTick {
                steps: i as f64,
                position,
                kind: TickKind::Major,
            });
            if self.minor && position + half <= self.hi + eps {
                ticks.push(WalkedTick {
                    steps: i as f64 + 0.5,
                    position: position + half,
                    kind: TickKind::Minor,
                });
            }
        }

        // Negative side.
        for i in 1..MAX_TICKS {
            let position = anchor - i as f64 * self.step;
            if position < self.lo - eps {
                break;
            }
            ticks.push(WalkedTick {
                steps: -(i as f64),
                position,
                kind: TickKind::Major,
            });
            if self.minor {
                ticks.push(WalkedTick {
                    steps: -(i as f64) + 0.5,
                    position: position + half,
                    kind: TickKind::Minor,
                });
            }
        }

        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_rational(spacing: f64) -> bool {
        let exp = spacing.log10().floor() as i32;
        let mantissa = spacing / scale_pow10(1.0, exp);
        [1.0, 2.0, 2.5, 5.0, 10.0]
            .iter()
            .any(|m| (mantissa - m).abs() < 1e-9)
    }

    #[test]
    fn test_normalize_degenerate_ranges() {
        assert_eq!(normalize_range(0.0, 0.0), (0.0, 0.001));
        assert_eq!(normalize_range(1e-13, 1e-13), (0.0, 0.001));
        assert_eq!(normalize_range(4.0, 4.0), (2.0, 6.0));
        assert_eq!(normalize_range(-4.0, -4.0), (-6.0, -2.0));
    }

    #[test]
    fn test_normalize_swaps_and_sanitizes() {
        assert_eq!(normalize_range(5.0, -1.0), (-1.0, 5.0));
        assert_eq!(normalize_range(f64::NAN, 3.0), (0.0, 1.0));
        assert_eq!(normalize_range(0.0, f64::INFINITY), (0.0, 1.0));
    }

    #[test]
    fn test_overflowing_width_is_halved() {
        assert_eq!(normalize_range(-1.7e308, 1.7e308), (-8.5e307, 8.5e307));
        assert_eq!(normalize_range(f64::MAX, -f64::MAX), (-f64::MAX / 2.0, f64::MAX / 2.0));
    }

    #[test]
    fn test_rational_spacing_at_float_extremes() {
        let wide = rational_tick_spacing(-1.7e308, 1.7e308);
        assert!(wide.is_finite() && wide > 0.0);
        assert!(is_rational(wide));

        let widest = rational_tick_spacing(-f64::MAX, f64::MAX);
        assert!(widest.is_finite() && widest > 0.0);

        let tiny = rational_tick_spacing(0.0, 5e-324);
        assert!(tiny.is_finite() && tiny > 0.0);
    }

    #[test]
    fn test_rational_spacing_for_negative_range() {
        let spacing = rational_tick_spacing(-14.0, 10.0);
        assert_eq!(spacing, 5.0);
        assert!(is_rational(spacing));
    }

    #[test]
    fn test_rational_spacing_is_deterministic_and_nice() {
        for &(lo, hi) in &[
            (0.0, 1.0),
            (0.0, 7.3),
            (-0.003, 0.004),
            (100.0, 101.7),
            (-5e6, 2.2e7),
            (0.0, 1000.0),
            (3.0, 3.0),
            (1e-5, 3e-5),
        ] {
            let a = rational_tick_spacing(lo, hi);
            let b = rational_tick_spacing(lo, hi);
            assert_eq!(a, b);
            assert!(is_rational(a), "{a} for [{lo}, {hi}]");
            let (nlo, nhi) = normalize_range(lo, hi);
            let count = (nhi - nlo) / a;
            assert!((2.0..=7.0).contains(&count), "{count} ticks for [{lo}, {hi}]");
        }
    }

    #[test]
    fn test_walk_keeps_anchor_fixed() {
        let walk = TickWalk {
            anchor: 30.0,
            step: 10.0,
            lo: 0.0,
            hi: 55.0,
            minor: false,
        };
        let mut positions: Vec<f64> = walk.walk().iter().map(|t| t.position).collect();
        positions.sort_by(f64::total_cmp);
        assert_eq!(positions, vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0]);
    }

    #[test]
    fn test_walk_minor_ticks() {
        let walk = TickWalk {
            anchor: 0.0,
            step: 10.0,
            lo: -20.0,
            hi: 20.0,
            minor: true,
        };
        let minors: Vec<f64> = walk
            .walk()
            .iter()
            .filter(|t| t.kind == TickKind::Minor)
            .map(|t| t.position)
            .collect();
        assert_eq!(minors, vec![5.0, 15.0, -5.0, -15.0]);
    }

    #[test]
    fn test_walk_guards_bad_steps() {
        for step in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let walk = TickWalk {
                anchor: 0.0,
                step,
                lo: 0.0,
                hi: 10.0,
                minor: true,
            };
            assert!(walk.walk().is_empty());
        }
    }

    #[test]
    fn test_walk_is_capped() {
        let walk = TickWalk {
            anchor: 0.0,
            step: 1e-9,
            lo: -1.0,
            hi: 1.0,
            minor: false,
        };
        assert!(walk.walk().len() <= 2 * MAX_TICKS);
    }
}
