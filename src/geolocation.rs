/// Geolocation flow
///
/// A one-shot position request against a [`LocationProvider`], with the
/// timeout enforced by [`Locator`] and a short-lived cache of the last fix
/// kept by [`GeolocationFlow`].
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::LocationSource;
use crate::state::data::Coordinate;

/// Request parameters for a single position lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocateOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// A fix younger than this may be reused instead of asking again
    pub maximum_age: Duration,
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(60),
        }
    }
}

/// A position reported by a provider
#[derive(Debug, Clone, PartialEq)]
pub struct Fix {
    pub coordinate: Coordinate,
    /// Accuracy radius in meters, when the provider knows it
    pub accuracy: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// Failure of a position request, numbered like the W3C geolocation codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location access was denied")]
    PermissionDenied,
    #[error("Location information unavailable")]
    PositionUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Unable to retrieve your location")]
    Other(u16),
}

impl LocationError {
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => LocationError::PermissionDenied,
            2 => LocationError::PositionUnavailable,
            3 => LocationError::Timeout,
            other => LocationError::Other(other),
        }
    }

    pub fn code(self) -> u16 {
        match self {
            LocationError::PermissionDenied => 1,
            LocationError::PositionUnavailable => 2,
            LocationError::Timeout => 3,
            LocationError::Other(code) => code,
        }
    }
}

pub type LocationFuture = Pin<Box<dyn Future<Output = Result<Fix, LocationError>> + Send>>;

/// A source of the device position
pub trait LocationProvider: fmt::Debug + Send + Sync {
    /// False when this system has no location capability at all
    fn is_available(&self) -> bool {
        true
    }

    fn current_position(&self, options: LocateOptions) -> LocationFuture;
}

/// No location capability
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

impl LocationProvider for Unsupported {
    fn is_available(&self) -> bool {
        false
    }

    fn current_position(&self, _options: LocateOptions) -> LocationFuture {
        Box::pin(async { Err(LocationError::PositionUnavailable) })
    }
}

/// Always reports the same coordinate
#[derive(Debug, Clone, Copy)]
pub struct FixedProvider {
    pub coordinate: Coordinate,
}

impl LocationProvider for FixedProvider {
    fn current_position(&self, _options: LocateOptions) -> LocationFuture {
        let coordinate = self.coordinate;
        Box::pin(async move {
            Ok(Fix {
                coordinate,
                accuracy: None,
                timestamp: Utc::now(),
            })
        })
    }
}

/// Reads the latest report written by an external GPS bridge.
///
/// The file holds either `{"lat": .., "lng": .., "accuracy": ..}` or
/// `{"code": n}` for a failure.
#[derive(Debug, Clone)]
pub struct ReportFileProvider {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PositionReport {
    Position {
        lat: f64,
        lng: f64,
        #[serde(default)]
        accuracy: Option<f64>,
    },
    Failure {
        code: u16,
    },
}

impl PositionReport {
    fn into_fix(self) -> Result<Fix, LocationError> {
        match self {
            PositionReport::Position { lat, lng, accuracy } => Ok(Fix {
                coordinate: Coordinate::new(lat, lng),
                accuracy,
                timestamp: Utc::now(),
            }),
            PositionReport::Failure { code } => Err(LocationError::from_code(code)),
        }
    }
}

impl LocationProvider for ReportFileProvider {
    fn current_position(&self, _options: LocateOptions) -> LocationFuture {
        let path = self.path.clone();
        Box::pin(async move {
            let json = tokio::fs::read_to_string(&path).await.map_err(|err| {
                debug!(path = %path.display(), error = %err, "position report unreadable");
                match err.kind() {
                    std::io::ErrorKind::NotFound => LocationError::PositionUnavailable,
                    std::io::ErrorKind::PermissionDenied => LocationError::PermissionDenied,
                    _ => LocationError::Other(0),
                }
            })?;

            let report: PositionReport = serde_json::from_str(&json).map_err(|err| {
                warn!(path = %path.display(), error = %err, "malformed position report");
                LocationError::Other(0)
            })?;

            report.into_fix()
        })
    }
}

/// Build the provider selected by the configuration
pub fn provider_for(source: &LocationSource) -> Arc<dyn LocationProvider> {
    match source {
        LocationSource::None => Arc::new(Unsupported),
        LocationSource::Fixed { lat, lng } => Arc::new(FixedProvider {
            coordinate: Coordinate::new(*lat, *lng),
        }),
        LocationSource::ReportFile { path } => Arc::new(ReportFileProvider { path: path.clone() }),
    }
}

/// Runs position requests against a provider, enforcing the request timeout
#[derive(Debug, Clone)]
pub struct Locator {
    provider: Arc<dyn LocationProvider>,
}

impl Locator {
    pub fn new(provider: Arc<dyn LocationProvider>) -> Self {
        Self { provider }
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_available()
    }

    pub async fn locate(&self, options: LocateOptions) -> Result<Fix, LocationError> {
        debug!(
            high_accuracy = options.high_accuracy,
            timeout_ms = options.timeout.as_millis() as u64,
            "requesting position"
        );
        match tokio::time::timeout(options.timeout, self.provider.current_position(options)).await {
            Ok(result) => result,
            Err(_) => Err(LocationError::Timeout),
        }
    }
}

/// What a click on "locate me" should do
#[derive(Debug, Clone, PartialEq)]
pub enum LocateStart {
    /// No location capability; nothing is requested
    Unsupported,
    /// A request is already in flight
    Busy,
    /// The last fix is recent enough to reuse
    Cached(Fix),
    /// Issue a request with these options
    Request(LocateOptions),
}

/// State of the locate control and the last known fix
#[derive(Debug)]
pub struct GeolocationFlow {
    supported: bool,
    options: LocateOptions,
    pending: bool,
    last_fix: Option<Fix>,
}

impl GeolocationFlow {
    pub fn new(supported: bool, options: LocateOptions) -> Self {
        Self {
            supported,
            options,
            pending: false,
            last_fix: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Label of the locate control
    pub fn button_label(&self) -> &'static str {
        if self.pending {
            "Locating..."
        } else {
            "Locate me"
        }
    }

    pub fn begin(&mut self, now: DateTime<Utc>) -> LocateStart {
        if !self.supported {
            return LocateStart::Unsupported;
        }
        if self.pending {
            return LocateStart::Busy;
        }

        if let Some(fix) = &self.last_fix {
            let max_age = chrono::Duration::from_std(self.options.maximum_age)
                .unwrap_or_else(|_| chrono::Duration::zero());
            let age = now.signed_duration_since(fix.timestamp);
            if age >= chrono::Duration::zero() && age <= max_age {
                debug!(age_ms = age.num_milliseconds(), "reusing cached position");
                return LocateStart::Cached(fix.clone());
            }
        }

        self.pending = true;
        LocateStart::Request(self.options)
    }

    /// Complete the in-flight request. The control is enabled again on every path.
    pub fn finish(&mut self, result: &Result<Fix, LocationError>) {
        self.pending = false;
        match result {
            Ok(fix) => {
                info!(position = %fix.coordinate, accuracy = ?fix.accuracy, "position found");
                self.last_fix = Some(fix.clone());
            }
            Err(err) => warn!(code = err.code(), error = %err, "position request failed"),
        }
    }
}
