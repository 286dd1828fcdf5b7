//! Earthquake events and the immutable in-memory catalog.

use crate::error::{Error, Result};
use crate::region::BoundingBox;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single catalog event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Event {
    /// Latitude in degrees, [-90, 90].
    pub latitude: f64,
    /// Longitude in degrees, [-180, 180].
    pub longitude: f64,
    /// Origin time.
    pub time: DateTime<Utc>,
    /// Magnitude on the catalog's single scale.
    pub magnitude: f64,
    /// Hypocentral depth in km, when the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_km: Option<f64>,
}

impl Event {
    pub fn new(latitude: f64, longitude: f64, time: DateTime<Utc>, magnitude: f64) -> Self {
        Event {
            latitude,
            longitude,
            time,
            magnitude,
            depth_km: None,
        }
    }

    pub fn with_depth(mut self, depth_km: f64) -> Self {
        self.depth_km = Some(depth_km);
        self
    }

    fn validate(&self, index: usize) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::InvalidEvent(format!(
                "event {} has latitude {} outside [-90, 90]",
                index, self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::InvalidEvent(format!(
                "event {} has longitude {} outside [-180, 180]",
                index, self.longitude
            )));
        }
        if !self.magnitude.is_finite() {
            return Err(Error::InvalidEvent(format!(
                "event {} has non-finite magnitude",
                index
            )));
        }
        if let Some(depth) = self.depth_km {
            if !depth.is_finite() {
                return Err(Error::InvalidEvent(format!(
                    "event {} has non-finite depth",
                    index
                )));
            }
        }
        Ok(())
    }
}

/// Immutable table of events, loaded once and shared read-only.
///
/// The catalog is `Send + Sync`; wrap it in an `Arc` to hand the same
/// instance to concurrent analyses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventCatalog {
    events: Vec<Event>,
}

impl EventCatalog {
    /// Build a catalog, rejecting events with non-finite or out-of-range fields.
    pub fn new(events: Vec<Event>) -> Result<Self> {
        for (index, event) in events.iter().enumerate() {
            event.validate(index)?;
        }
        Ok(EventCatalog { events })
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Smallest bounding box enclosing every event, or `None` for an
    /// empty catalog.
    pub fn extent(&self) -> Option<BoundingBox> {
        let first = self.events.first()?;
        let mut bbox = BoundingBox {
            west: first.longitude,
            south: first.latitude,
            east: first.longitude,
            north: first.latitude,
        };
        for event in &self.events[1..] {
            bbox.west = bbox.west.min(event.longitude);
            bbox.east = bbox.east.max(event.longitude);
            bbox.south = bbox.south.min(event.latitude);
            bbox.north = bbox.north.max(event.latitude);
        }
        Some(bbox)
    }

    /// Earliest and latest origin times.
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = self.events.first()?.time;
        Some(self.events.iter().fold((first, first), |(lo, hi), e| {
            (lo.min(e.time), hi.max(e.time))
        }))
    }
}
