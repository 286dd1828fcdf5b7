//! Spatial/temporal selection of catalog events.

use crate::logging::{event_names, Stage};
use chrono::{DateTime, Utc};
use gr_common::{Event, EventCatalog, Region, Result, TimeRange};

/// Non-owning view of the events matched by a selection.
///
/// Holds indices into the catalog in catalog order; the catalog itself is
/// never copied or mutated.
#[derive(Debug, Clone)]
pub struct Subset<'a> {
    catalog: &'a EventCatalog,
    indices: Vec<usize>,
}

impl<'a> Subset<'a> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Catalog positions of the selected events, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Event> + '_ {
        let catalog = self.catalog;
        self.indices.iter().filter_map(move |&i| catalog.get(i))
    }

    pub fn magnitudes(&self) -> Vec<f64> {
        self.iter().map(|e| e.magnitude).collect()
    }

    /// Earliest and latest origin time among the selected events.
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let mut events = self.iter();
        let first = events.next()?.time;
        Some(events.fold((first, first), |(lo, hi), e| (lo.min(e.time), hi.max(e.time))))
    }
}

impl PartialEq for Subset<'_> {
    fn eq(&self, other: &Self) -> bool {
        (std::ptr::eq(self.catalog, other.catalog) || self.catalog == other.catalog)
            && self.indices == other.indices
    }
}

/// Select the events inside `region` (boundary inclusive) whose origin
/// time falls in `time_range`.
///
/// An empty result is not an error. Fails only on a malformed region or
/// a time range whose start is after its end.
pub fn select<'a>(
    catalog: &'a EventCatalog,
    region: &Region,
    time_range: &TimeRange,
) -> Result<Subset<'a>> {
    region.validate()?;
    time_range.validate()?;

    let indices: Vec<usize> = catalog
        .events()
        .iter()
        .enumerate()
        .filter(|(_, e)| time_range.contains(e.time) && region.contains(e.latitude, e.longitude))
        .map(|(i, _)| i)
        .collect();

    tracing::debug!(
        event = event_names::SELECT_FINISHED,
        stage = %Stage::Select,
        catalog_size = catalog.len(),
        selected = indices.len(),
        "selection finished"
    );

    Ok(Subset { catalog, indices })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use gr_common::{BoundingBox, Error, GeoPoint, Polygon};

    fn at(year: i32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, 6, 1, 0, 0, 0).unwrap()
    }

    fn catalog() -> EventCatalog {
        EventCatalog::new(vec![
            Event::new(1.0, 1.0, at(2000), 4.0),
            Event::new(5.0, 5.0, at(2005), 5.0),
            Event::new(20.0, 20.0, at(2005), 6.0),
            Event::new(0.0, 5.0, at(2010), 4.5),
        ])
        .unwrap()
    }

    fn square() -> Region {
        Polygon::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 10.0),
            GeoPoint::new(10.0, 10.0),
            GeoPoint::new(10.0, 0.0),
        ])
        .unwrap()
        .into()
    }

    #[test]
    fn selects_inside_and_on_boundary() {
        let catalog = catalog();
        let subset = select(&catalog, &square(), &TimeRange::unbounded()).unwrap();
        assert_eq!(subset.indices(), &[0, 1, 3]);
        assert_eq!(subset.magnitudes(), vec![4.0, 5.0, 4.5]);
    }

    #[test]
    fn time_range_end_is_exclusive() {
        let catalog = catalog();
        let range = TimeRange::new(Some(at(2005)), Some(at(2010))).unwrap();
        let subset = select(&catalog, &square(), &range).unwrap();
        assert_eq!(subset.indices(), &[1]);
    }

    #[test]
    fn empty_selection_is_ok() {
        let catalog = catalog();
        let region = BoundingBox::new(100.0, 50.0, 110.0, 60.0).unwrap().into();
        let subset = select(&catalog, &region, &TimeRange::unbounded()).unwrap();
        assert!(subset.is_empty());
        assert!(subset.time_span().is_none());
    }

    #[test]
    fn invalid_time_range_is_rejected() {
        let catalog = catalog();
        let range = TimeRange {
            start: Some(at(2010)),
            end: Some(at(2000)),
        };
        let err = select(&catalog, &square(), &range).unwrap_err();
        assert!(matches!(err, Error::InvalidTimeRange { .. }));
        assert!(err.is_caller_error());
    }

    #[test]
    fn deserialized_degenerate_bbox_is_rejected() {
        let catalog = catalog();
        let region: Region = serde_json::from_str(
            r#"{"kind":"bounding_box","west":0.0,"south":5.0,"east":1.0,"north":5.0}"#,
        )
        .unwrap();
        let err = select(&catalog, &region, &TimeRange::unbounded()).unwrap_err();
        assert!(matches!(err, Error::InvalidRegion(_)));
    }

    #[test]
    fn selection_is_idempotent() {
        let catalog = catalog();
        let a = select(&catalog, &square(), &TimeRange::unbounded()).unwrap();
        let b = select(&catalog, &square(), &TimeRange::unbounded()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn time_span_covers_selected_events() {
        let catalog = catalog();
        let subset = select(&catalog, &square(), &TimeRange::unbounded()).unwrap();
        assert_eq!(subset.time_span(), Some((at(2000), at(2010))));
    }
}
