use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Plan usage as reported by `GET /automate/plan.json`.
///
/// Fields that are missing, `null` or of the wrong type stay at zero; the
/// remaining fields are still decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlanStatus {
    #[serde(deserialize_with = "lenient_string")]
    pub automate_plan: String,
    #[serde(deserialize_with = "lenient_int")]
    pub parallel_sessions_running: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub team_parallel_sessions_max_allowed: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub parallel_sessions_max_allowed: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub queued_sessions: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub queued_sessions_max_allowed: i64,
}

fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        value => Ok(value.as_i64().unwrap_or_else(|| {
            tracing::warn!("Plan status: expected an integer, got {}", value);
            0
        })),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        value => {
            tracing::warn!("Plan status: expected a string, got {}", value);
            Ok(String::new())
        }
    }
}
