use serde::{Deserialize, Serialize};

/// Descriptive statistics for one numeric column.
///
/// `coefficient_of_variation` is NaN or infinite when the mean is zero and
/// serializes as `null` in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStatistics {
    pub column: String,
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub standard_deviation: f64,
    #[serde(deserialize_with = "nullable_f64")]
    pub coefficient_of_variation: f64,
}

impl ColumnStatistics {
    /// Whether the coefficient of variation carries meaning.
    pub fn has_meaningful_variation(&self) -> bool {
        self.coefficient_of_variation.is_finite()
    }
}

fn nullable_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_round_trips_through_null() {
        let stats = ColumnStatistics {
            column: "Zero".to_string(),
            count: 2,
            sum: 0.0,
            mean: 0.0,
            median: 0.0,
            min: -1.0,
            max: 1.0,
            range: 2.0,
            standard_deviation: 1.0,
            coefficient_of_variation: f64::INFINITY,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert!(json["coefficientOfVariation"].is_null());
        assert_eq!(json["standardDeviation"], 1.0);

        let back: ColumnStatistics = serde_json::from_value(json).unwrap();
        assert!(!back.has_meaningful_variation());
    }
}
