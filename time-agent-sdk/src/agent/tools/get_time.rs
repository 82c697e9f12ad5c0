use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::{TZ_VARIANTS, Tz};
use serde_json::{Value, json};

use super::{Tool, ToolProvider};

const CITY_ALIASES: &[(&str, &str)] = &[
    ("nyc", "America/New_York"),
    ("ny", "America/New_York"),
    ("new york", "America/New_York"),
    ("new york city", "America/New_York"),
    ("chicago", "America/Chicago"),
    ("los angeles", "America/Los_Angeles"),
    ("la", "America/Los_Angeles"),
    ("san francisco", "America/Los_Angeles"),
    ("sf", "America/Los_Angeles"),
    ("delhi", "Asia/Kolkata"),
    ("new delhi", "Asia/Kolkata"),
    ("mumbai", "Asia/Kolkata"),
    ("bangalore", "Asia/Kolkata"),
    ("london", "Europe/London"),
    ("paris", "Europe/Paris"),
    ("berlin", "Europe/Berlin"),
    ("tokyo", "Asia/Tokyo"),
    ("singapore", "Asia/Singapore"),
    ("sydney", "Australia/Sydney"),
    ("utc", "UTC"),
];

/// Tools exposed by the time namespace.
pub struct TimeTools;

impl ToolProvider for TimeTools {
    fn namespace(&self) -> &str {
        "time"
    }

    fn tools(&self) -> Vec<Box<dyn Tool>> {
        vec![Box::new(GetTimeTool)]
    }
}

pub struct GetTimeTool;

impl GetTimeTool {
    /// Resolves an IANA zone name (any case) or a well-known city name.
    pub fn resolve(input: &str) -> Option<Tz> {
        let key = input.trim().to_lowercase();
        if key.is_empty() {
            return None;
        }
        if let Some((_, zone)) = CITY_ALIASES.iter().find(|(city, _)| *city == key) {
            return zone.parse().ok();
        }
        TZ_VARIANTS
            .iter()
            .find(|tz| tz.name().eq_ignore_ascii_case(&key))
            .copied()
    }

    /// Builds the tool result for `input` at the instant `now`.
    pub fn report_at(input: &str, now: DateTime<Utc>) -> Value {
        match Self::resolve(input) {
            Some(tz) => {
                let local = now.with_timezone(&tz);
                json!({
                    "status": "success",
                    "timezone": tz.name(),
                    "datetime": local.to_rfc3339(),
                    "report": format!(
                        "The current time in {} is {}.",
                        tz.name(),
                        local.format("%H:%M:%S (%Z)")
                    ),
                })
            }
            None => json!({
                "status": "error",
                "error_message": format!("Unknown timezone or city: '{}'", input.trim()),
            }),
        }
    }
}

#[async_trait]
impl Tool for GetTimeTool {
    fn name(&self) -> String {
        "get_time".to_string()
    }

    fn description(&self) -> String {
        "Get the current time in a timezone. Accepts an IANA timezone name \
        (e.g. 'America/New_York', 'Asia/Kolkata') or a major city name (e.g. 'nyc', 'delhi'). \
        Returns a JSON object whose 'status' is 'success' with a 'report', or 'error' with an 'error_message'."
            .to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "timezone": {
                    "type": "string",
                    "description": "IANA timezone name or city name"
                }
            },
            "required": ["timezone"]
        })
    }

    async fn call(&self, args: Value) -> Result<String, String> {
        let timezone = args
            .get("timezone")
            .and_then(|v| v.as_str())
            .ok_or("Missing 'timezone' argument")?;

        let result = Self::report_at(timezone, Utc::now());
        tracing::debug!("get_time({}) -> {}", timezone, result["status"]);
        Ok(result.to_string())
    }
}
