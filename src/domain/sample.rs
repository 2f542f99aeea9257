use serde::{Deserialize, Serialize};

/// One labelled example: a flat feature vector and its class index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationSample {
    pub features: Vec<f32>,
    pub label:    usize,
}

impl ClassificationSample {
    pub fn new(features: Vec<f32>, label: usize) -> Self {
        Self { features, label }
    }
}

/// Summary of one pass over a dataset.
///
/// `accuracy` is a percentage in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    #[serde(with = "non_finite_as_null")]
    pub loss:     f64,
    #[serde(with = "non_finite_as_null")]
    pub accuracy: f64,
    pub samples:  usize,
}

/// JSON has no NaN or infinity. A diverged run writes `null` and reads it
/// back as NaN.
mod non_finite_as_null {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, s: S) -> Result<S::Ok, S::Error> {
        value.is_finite().then_some(*value).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::NAN))
    }
}

impl EpochStats {
    pub fn new(loss: f64, accuracy: f64, samples: usize) -> Self {
        Self { loss, accuracy, samples }
    }

    /// Returns true if this pass improved over the previous best loss
    pub fn is_improvement(&self, best_loss: f64) -> bool {
        self.loss < best_loss
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_improvement() {
        let s = EpochStats::new(2.3, 40.0, 128);
        assert!(s.is_improvement(3.0));
        assert!(!s.is_improvement(2.0));
    }

    #[test]
    fn test_diverged_stats_survive_json() {
        let s = EpochStats::new(f64::NAN, 10.0, 8);
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"loss\":null"));

        let back: EpochStats = serde_json::from_str(&json).unwrap();
        assert!(back.loss.is_nan());
        assert_eq!((back.accuracy, back.samples), (10.0, 8));
    }
}
