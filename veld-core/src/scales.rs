//! Linear rescaling of state components to `[0, 1]`.
//!
//! Environments register the bounds of their state components here and
//! basis functions read them back when computing features. The registry is
//! an explicit context object with the lifetime of one training run.
use crate::error::VeldError;
use std::collections::HashMap;

/// A registered `[min, max]` interval with precomputed coefficients.
///
/// Degenerate intervals (`min == max`) have no coefficients and scale
/// every value to `1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMaxScale {
    /// Lower bound of the source interval.
    pub scale_min: f64,
    /// Upper bound of the source interval.
    pub scale_max: f64,
    coeff_a: Option<f64>,
    coeff_b: Option<f64>,
}

impl MinMaxScale {
    /// Rescales `value` from `[min, max]` to `[0, 1]`.
    pub fn apply(&self, value: f64) -> f64 {
        match (self.coeff_a, self.coeff_b) {
            (Some(a), Some(b)) => a * value - b,
            _ => 1.0,
        }
    }
}

/// Registry of named linear scales.
#[derive(Clone, Debug, Default)]
pub struct Scales {
    scales: HashMap<String, MinMaxScale>,
}

impl Scales {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the interval `[scale_min, scale_max]` under `key`.
    ///
    /// Re-registering a key with matching bounds is a no-op; conflicting
    /// bounds are a configuration error.
    pub fn register(&mut self, key: &str, scale_min: f64, scale_max: f64) -> Result<(), VeldError> {
        if let Some(existing) = self.scales.get(key) {
            if scale_min == existing.scale_min || scale_max == existing.scale_max {
                return Ok(());
            }
            return Err(VeldError::ScaleConflict {
                key: key.to_string(),
            });
        }

        let (coeff_a, coeff_b) = if scale_min == scale_max {
            (None, None)
        } else {
            (
                Some(1.0 / (scale_max - scale_min)),
                Some(scale_min / (scale_max - scale_min)),
            )
        };

        self.scales.insert(
            key.to_string(),
            MinMaxScale {
                scale_min,
                scale_max,
                coeff_a,
                coeff_b,
            },
        );
        Ok(())
    }

    /// Looks up a registered scale.
    pub fn get(&self, key: &str) -> Option<&MinMaxScale> {
        self.scales.get(key)
    }

    /// Rescales `value` with the scale registered under `key`.
    pub fn value(&self, value: f64, key: &str) -> Result<f64, VeldError> {
        let scale = self.scales.get(key).ok_or_else(|| VeldError::UnknownScale {
            key: key.to_string(),
        })?;
        Ok(scale.apply(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_to_unit_interval() {
        let mut scales = Scales::new();
        scales.register("player", 4.0, 21.0).unwrap();
        assert_eq!(scales.value(4.0, "player").unwrap(), 0.0);
        assert!((scales.value(21.0, "player").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_interval_scales_to_one() {
        let mut scales = Scales::new();
        scales.register("flat", 3.0, 3.0).unwrap();
        assert_eq!(scales.value(3.0, "flat").unwrap(), 1.0);
    }

    #[test]
    fn conflicting_bounds_are_rejected() {
        let mut scales = Scales::new();
        scales.register("row", 0.0, 2.0).unwrap();
        assert!(scales.register("row", 0.0, 2.0).is_ok());
        assert!(scales.register("row", 1.0, 5.0).is_err());
    }

    #[test]
    fn unknown_key_fails() {
        let scales = Scales::new();
        assert!(scales.value(1.0, "missing").is_err());
    }
}
