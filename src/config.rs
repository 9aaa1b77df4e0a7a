use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Maps each ride field to the header of the column holding it.
///
/// Stored as a plain JSON object on disk:
/// ```json
/// {
///   "begin_time": "Begin Trip Time",
///   "dropoff_time": "Dropoff Time",
///   "fare": "Fare Amount",
///   "status": "Trip or Order Status",
///   "city": "City",
///   "distance": "Distance (miles)",
///   "product_type": "Product Type",
///   "distance_unit": "miles"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub begin_time: String,
    pub dropoff_time: String,
    pub fare: String,
    pub status: String,
    pub city: String,
    pub distance: String,
    pub product_type: String,

    /// Label used when reporting the distance total.
    #[serde(default = "default_distance_unit")]
    pub distance_unit: String,
}

fn default_distance_unit() -> String {
    "miles".to_string()
}

impl ColumnMapping {
    /// Column names of the current rider data export.
    pub fn rider_export() -> Self {
        Self {
            begin_time: "Begin Trip Time".into(),
            dropoff_time: "Dropoff Time".into(),
            fare: "Fare Amount".into(),
            status: "Trip or Order Status".into(),
            city: "City".into(),
            distance: "Distance (miles)".into(),
            product_type: "Product Type".into(),
            distance_unit: "miles".into(),
        }
    }

    /// Older export with short lowercase columns and distances in kilometres.
    pub fn legacy() -> Self {
        Self {
            begin_time: "Begin Trip Time".into(),
            dropoff_time: "Drop off Time".into(),
            fare: "cost".into(),
            status: "status".into(),
            city: "city".into(),
            distance: "distance".into(),
            product_type: "Product Type".into(),
            distance_unit: "km".into(),
        }
    }

    /// Loads a mapping from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mapping: ColumnMapping = serde_json::from_str(&content)?;
        Ok(mapping)
    }

    /// Picks the first known export layout whose columns are all present.
    pub fn detect<'a>(headers: impl IntoIterator<Item = &'a str> + Clone) -> Option<Self> {
        [Self::rider_export(), Self::legacy()]
            .into_iter()
            .find(|m| m.missing_column(headers.clone()).is_none())
    }

    /// Required column names, in the order they are reported when missing.
    pub fn columns(&self) -> [&str; 7] {
        [
            self.begin_time.as_str(),
            self.dropoff_time.as_str(),
            self.fare.as_str(),
            self.status.as_str(),
            self.city.as_str(),
            self.distance.as_str(),
            self.product_type.as_str(),
        ]
    }

    /// Returns the first required column absent from `headers`.
    pub fn missing_column<'a>(&self, headers: impl IntoIterator<Item = &'a str>) -> Option<&str> {
        let present: Vec<&str> = headers.into_iter().map(str::trim).collect();
        self.columns()
            .into_iter()
            .find(|column| !present.iter().any(|header| header == column))
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self::rider_export()
    }
}
