use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Monitoring feed document as served by the status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedDocument {
    #[serde(default, deserialize_with = "lenient")]
    pub meta: Option<FeedMeta>,
    /// Kept undecoded so one malformed entry cannot reject the whole document.
    pub data: Vec<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedMeta {
    #[serde(default, deserialize_with = "lenient")]
    pub period: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub count: Option<f64>,
}

/// One provider + service + channel observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHealthEntry {
    pub provider: String,
    #[serde(default)]
    pub provider_url: String,
    pub service: String,
    #[serde(default, deserialize_with = "lenient")]
    pub channel: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "lenient")]
    pub current_status: Option<CurrentStatus>,
    #[serde(default, deserialize_with = "lenient_timeline")]
    pub timeline: Vec<TimelinePoint>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrentStatus {
    #[serde(default, deserialize_with = "lenient_integer")]
    pub status: Option<i64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub latency: Option<f64>,
    /// Unix seconds.
    #[serde(default, deserialize_with = "lenient_integer")]
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelinePoint {
    #[serde(default, deserialize_with = "lenient_number")]
    pub availability: Option<f64>,
}

impl FeedDocument {
    /// Decode the `data` array, skipping entries without a provider or service.
    pub fn entries(&self) -> Vec<RawHealthEntry> {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(index, raw)| {
                match RawHealthEntry::deserialize(raw) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        warn!(index, error = %e, "Skipping malformed health feed entry");
                        None
                    }
                }
            })
            .collect()
    }
}

impl TimelinePoint {
    pub fn new(availability: f64) -> Self {
        Self {
            availability: Some(availability),
        }
    }
}

fn number_from_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Any value that does not decode as `T` becomes `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Some(n) = value.as_i64() {
        return Ok(Some(n));
    }
    Ok(number_from_value(&value)
        .filter(|n| n.fract() == 0.0 && n.abs() < i64::MAX as f64)
        .map(|n| n as i64))
}

fn lenient_timeline<'de, D>(deserializer: D) -> Result<Vec<TimelinePoint>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let points = match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    };
    Ok(points)
}
