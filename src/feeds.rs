use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub const DEFAULT_SERVER: &str = "http://192.168.0.199:5000";

/// Why one document never made it to its renderer.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server answered {0}")]
    Status(StatusCode),
    #[error("malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A single row (alert, watch, observation, forecast day) that did not
/// have the expected shape. Only that row is dropped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct EntryError(String);

impl EntryError {
    fn missing() -> Self {
        Self("field is missing".to_string())
    }
}

pub type Fetched<T> = Result<T, FeedError>;
pub type Entry<T> = Result<T, EntryError>;

pub mod conditions {
    use super::*;
    use crate::units::{beaufort, numeric};

    pub const PATH: &str = "current_conditions";

    #[derive(Deserialize, Debug)]
    pub struct Conditions {
        #[serde(default, deserialize_with = "lenient_text")]
        pub textdescription: Option<String>,

        #[serde(default = "missing_entry", deserialize_with = "entry")]
        pub temperature: Entry<Observation>,

        #[serde(default = "missing_entry", deserialize_with = "entry")]
        pub dewpoint: Entry<Observation>,

        #[serde(default = "missing_entry", deserialize_with = "entry")]
        pub humidity: Entry<Observation>,

        #[serde(default = "missing_entry", deserialize_with = "entry")]
        pub heatindex: Entry<Observation>,

        #[serde(default = "missing_entry", deserialize_with = "entry")]
        pub windchill: Entry<Observation>,

        #[serde(default = "missing_entry", deserialize_with = "entry")]
        pub wind: Entry<Observation>,

        #[serde(default = "missing_entry", deserialize_with = "entry")]
        pub gusts: Entry<Observation>,

        #[serde(default, deserialize_with = "lenient_text")]
        pub wind_cardinal: Option<String>,

        #[serde(default, deserialize_with = "lenient_or_default")]
        pub pressure: Measure,

        #[serde(default, deserialize_with = "lenient_or_default")]
        pub wind_direction: Measure,

        #[serde(default, deserialize_with = "beaufort::lenient")]
        pub beaufort: Option<i64>,

        #[serde(default, deserialize_with = "lenient_text")]
        pub weather_icon: Option<String>,

        #[serde(default, deserialize_with = "lenient_text")]
        pub moon_icon: Option<String>,
    }

    impl Conditions {
        pub async fn from_server(client: &Client, server: &str) -> Fetched<Self> {
            get_document(client, server, PATH).await
        }

        /// Observation rows in the order they are displayed.
        pub fn observations(&self) -> [(&'static str, &Entry<Observation>); 7] {
            [
                ("temperature", &self.temperature),
                ("dewpoint", &self.dewpoint),
                ("humidity", &self.humidity),
                ("heatindex", &self.heatindex),
                ("windchill", &self.windchill),
                ("wind", &self.wind),
                ("gusts", &self.gusts),
            ]
        }
    }

    #[derive(Deserialize, Debug, Clone, PartialEq)]
    pub struct Observation {
        pub label: String,

        #[serde(default, deserialize_with = "numeric::lenient")]
        pub value: Option<f64>,

        #[serde(default, deserialize_with = "lenient_units")]
        pub units: String,
    }

    #[derive(Deserialize, Debug, Default, Clone, PartialEq)]
    pub struct Measure {
        #[serde(default, deserialize_with = "numeric::lenient")]
        pub value: Option<f64>,

        #[serde(default, deserialize_with = "lenient_units")]
        pub units: String,
    }
}

pub mod satellite {
    use super::*;

    pub const PATH: &str = "satellite";

    #[derive(Deserialize, Debug)]
    pub struct Satellite {
        pub image_html: String,
    }

    impl Satellite {
        pub async fn from_server(client: &Client, server: &str) -> Fetched<Self> {
            get_document(client, server, PATH).await
        }
    }
}

pub mod alerts {
    use super::*;

    pub const PATH: &str = "alerts";

    #[derive(Deserialize, Debug)]
    pub struct Alerts {
        #[serde(default, deserialize_with = "lenient_or_default")]
        pub hwo: Outlook,

        #[serde(default, deserialize_with = "lenient_or_default")]
        pub flags: Flags,

        #[serde(default, deserialize_with = "entries")]
        pub alert: Vec<Entry<Bulletin>>,

        #[serde(default, deserialize_with = "entries")]
        pub warn: Vec<Entry<Bulletin>>,

        #[serde(default, deserialize_with = "entries")]
        pub watch: Vec<Entry<Watch>>,
    }

    impl Alerts {
        pub async fn from_server(client: &Client, server: &str) -> Fetched<Self> {
            get_document(client, server, PATH).await
        }
    }

    /// Hazardous weather outlook. Each section is a `[label, content]` pair.
    #[derive(Deserialize, Debug)]
    pub struct Outlook {
        #[serde(default = "missing_entry", deserialize_with = "entry")]
        pub dayone: Entry<(String, String)>,

        #[serde(default = "missing_entry", deserialize_with = "entry")]
        pub spotter: Entry<(String, String)>,
    }

    impl Default for Outlook {
        fn default() -> Self {
            Self {
                dayone: missing_entry(),
                spotter: missing_entry(),
            }
        }
    }

    #[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct Flags {
        #[serde(default, deserialize_with = "truthy")]
        pub has_spotter: bool,

        #[serde(default, deserialize_with = "truthy")]
        pub has_alerts: bool,

        #[serde(default, deserialize_with = "truthy")]
        pub has_watches: bool,

        #[serde(default, deserialize_with = "truthy")]
        pub has_warnings: bool,
    }

    /// An active alert or a warning.
    #[derive(Deserialize, Debug, Clone, PartialEq)]
    pub struct Bulletin {
        pub event_type: String,
        pub summary: String,
        pub alert_icon: String,
    }

    #[derive(Deserialize, Debug, Clone, PartialEq)]
    pub struct Watch {
        pub event_type: String,
        pub summary: String,

        #[serde(default)]
        pub alert_icon: Option<String>,

        #[serde(default)]
        pub severity: String,

        #[serde(default)]
        pub certainty: String,
    }
}

pub mod forecast {
    use super::*;

    pub const PATH: &str = "forecast";

    /// Daily entries, today first.
    #[derive(Deserialize, Debug)]
    #[serde(transparent)]
    pub struct Forecast {
        #[serde(deserialize_with = "entries")]
        pub days: Vec<Entry<Day>>,
    }

    impl Forecast {
        pub async fn from_server(client: &Client, server: &str) -> Fetched<Self> {
            get_document(client, server, PATH).await
        }
    }

    #[derive(Deserialize, Debug, Clone, PartialEq)]
    pub struct Day {
        pub day: String,
        pub shortcast: String,
        pub icon: String,
    }
}

pub mod discussion {
    use super::*;

    pub const PATH: &str = "afd";

    /// Area forecast discussion.
    #[derive(Deserialize, Debug, Default)]
    pub struct Discussion {
        #[serde(default, deserialize_with = "lenient_text")]
        pub short_term: Option<String>,

        #[serde(default, deserialize_with = "lenient_text")]
        pub long_term: Option<String>,

        #[serde(default, deserialize_with = "lenient_text")]
        pub short_title: Option<String>,

        #[serde(default, deserialize_with = "lenient_text")]
        pub long_title: Option<String>,
    }

    impl Discussion {
        pub async fn from_server(client: &Client, server: &str) -> Fetched<Self> {
            get_document(client, server, PATH).await
        }
    }
}

pub fn build_client() -> Result<Client, reqwest::Error> {
    Client::builder().user_agent("wx-dashboard").build()
}

async fn get_document<T: DeserializeOwned>(client: &Client, server: &str, path: &str) -> Fetched<T> {
    let url = format!("{}/{path}", server.trim_end_matches('/'));
    let response = client.get(&url).send().await?;
    if response.status() != StatusCode::OK {
        return Err(FeedError::Status(response.status()));
    }
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

fn missing_entry<T>() -> Entry<T> {
    Err(EntryError::missing())
}

fn decode_entry<T: DeserializeOwned>(raw: Value) -> Entry<T> {
    if raw.is_null() {
        return Err(EntryError::missing());
    }
    serde_json::from_value(raw).map_err(|e| EntryError(e.to_string()))
}

fn entry<'de, D, T>(deserializer: D) -> Result<Entry<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(decode_entry(Value::deserialize(deserializer)?))
}

/// Decodes every element on its own so one malformed entry only loses
/// itself. A `null` or non-array sequence reads as empty.
fn entries<'de, D, T>(deserializer: D) -> Result<Vec<Entry<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items.into_iter().map(decode_entry).collect()),
        _ => Ok(Vec::new()),
    }
}

/// Nested objects outside the row sequences (pressure, flags, the outlook)
/// fall back to their defaults when null or misshapen, so the rest of the
/// document still renders.
fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = Value::deserialize(deserializer)?;
    if raw.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(raw).unwrap_or_else(|e| {
        tracing::warn!("using defaults for {}: {e}", std::any::type_name::<T>());
        T::default()
    }))
}

/// Text fields that are anything but a string read as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_units<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

/// Flags are set by whatever wrote the feed; read them as JavaScript would.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}
