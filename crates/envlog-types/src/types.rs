//! Core types for envlog sensor data.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use crate::error::{ParseError, ParseResult};

/// A measurement submitted by a sensor, before the server stamps it.
///
/// The wire format uses the short field names the sensors send
/// (`name`, `temp`, `humidity`, `pressure`). Any other field in the
/// payload, including a client-supplied `time`, is ignored.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reading {
    /// Name of the sensor or host the reading came from.
    #[cfg_attr(feature = "serde", serde(rename = "name"))]
    pub source: String,
    /// Temperature, in whatever unit the sensor reports.
    #[cfg_attr(feature = "serde", serde(rename = "temp"))]
    pub temperature: f64,
    /// Relative humidity percentage.
    pub humidity: f64,
    /// Atmospheric pressure.
    pub pressure: f64,
}

impl Reading {
    /// Create a reading for the given source.
    pub fn new(source: impl Into<String>, temperature: f64, humidity: f64, pressure: f64) -> Self {
        Self {
            source: source.into(),
            temperature,
            humidity,
            pressure,
        }
    }

    /// Parse a reading from a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidInput`] if the payload is not a JSON
    /// object with a string `name` and numeric `temp`, `humidity`, and
    /// `pressure` fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use envlog_types::Reading;
    ///
    /// let reading = Reading::from_json(br#"{"name":"office","temp":71.3,"humidity":40.2,"pressure":1012.9}"#).unwrap();
    /// assert_eq!(reading.source, "office");
    /// assert!(Reading::from_json(b"{}").is_err());
    /// ```
    #[cfg(feature = "serde")]
    pub fn from_json(payload: &[u8]) -> ParseResult<Self> {
        serde_json::from_slice(payload).map_err(|e| ParseError::InvalidInput(e.to_string()))
    }

    /// Attach a server-side timestamp, producing an unsaved sample.
    ///
    /// The returned sample has `id == 0`; the store assigns the real row id.
    #[must_use]
    pub fn into_sample(self, time: i64) -> StoredSample {
        StoredSample {
            id: 0,
            source: self.source,
            temperature: self.temperature,
            humidity: self.humidity,
            pressure: self.pressure,
            time,
        }
    }
}

/// A persisted, timestamped reading.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StoredSample {
    /// Database row ID, assigned at insert time.
    pub id: i64,
    /// Sensor or host name.
    pub source: String,
    /// Temperature, rounded to 2 decimal places.
    pub temperature: f64,
    /// Humidity, rounded to 2 decimal places.
    pub humidity: f64,
    /// Pressure, rounded to 2 decimal places.
    pub pressure: f64,
    /// Server-assigned Unix timestamp in seconds.
    pub time: i64,
}

impl StoredSample {
    /// Return a copy with every measurement rounded to 2 decimal places.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            temperature: round_hundredths(self.temperature),
            humidity: round_hundredths(self.humidity),
            pressure: round_hundredths(self.pressure),
            ..self.clone()
        }
    }
}

/// Paired values and timestamps, as returned by range queries and by
/// the downsampling engine.
///
/// Serialized as `{"Temps": [...], "Times": [...]}` for the chart client.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Series {
    /// Sample values.
    #[cfg_attr(feature = "serde", serde(rename = "Temps"))]
    pub values: Vec<f64>,
    /// Unix timestamps, aligned with `values`.
    #[cfg_attr(feature = "serde", serde(rename = "Times"))]
    pub times: Vec<i64>,
}

impl Series {
    /// Create an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty series with room for `capacity` points.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            times: Vec::with_capacity(capacity),
        }
    }

    /// Append one point.
    pub fn push(&mut self, value: f64, time: i64) {
        self.values.push(value);
        self.times.push(time);
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no points.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(value, time)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, i64)> + '_ {
        self.values.iter().copied().zip(self.times.iter().copied())
    }
}

impl FromIterator<(f64, i64)> for Series {
    fn from_iter<I: IntoIterator<Item = (f64, i64)>>(iter: I) -> Self {
        let mut series = Series::new();
        for (value, time) in iter {
            series.push(value, time);
        }
        series
    }
}

/// Round to 2 decimal places, half away from zero.
///
/// Values too large to scale by 100 have no fractional digits and are
/// returned unchanged, as are NaN and infinities.
///
/// # Examples
///
/// ```
/// use envlog_types::round_hundredths;
///
/// assert_eq!(round_hundredths(21.456), 21.46);
/// assert_eq!(round_hundredths(-3.14159), -3.14);
/// ```
#[must_use]
pub fn round_hundredths(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}
