//! Catalog loading from ISC-GEM style CSV files.
//!
//! The file may open with a `#`-commented preamble. The header row is the
//! first line naming the `date`, `lat` and `lon` columns, and may itself be
//! commented (`#date, lat, lon, ...`). Column names are matched
//! case-insensitively after trimming whitespace and a leading `#`.

use crate::logging::{event_names, Stage};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use gr_common::{Error, Event, EventCatalog, Result};
use std::io::Write;
use std::path::Path;

const MAGNITUDE_COLUMNS: &[&str] = &["mw", "mag", "magnitude"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Counters from one catalog load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Data rows read, including skipped ones.
    pub rows: usize,
    /// Rows dropped for having no magnitude.
    pub skipped_rows: usize,
}

#[derive(Debug)]
struct Columns {
    date: usize,
    lat: usize,
    lon: usize,
    magnitude: usize,
    depth: Option<usize>,
}

impl Columns {
    fn from_names(names: &[String]) -> Option<Self> {
        let find = |wanted: &str| names.iter().position(|n| n == wanted);
        Some(Columns {
            date: find("date")?,
            lat: find("lat")?,
            lon: find("lon")?,
            magnitude: MAGNITUDE_COLUMNS.iter().find_map(|c| find(c))?,
            depth: find("depth"),
        })
    }
}

/// Load a catalog from a CSV file.
pub fn load_catalog(path: &Path) -> Result<EventCatalog> {
    load_catalog_with_stats(path).map(|(catalog, _)| catalog)
}

/// Load a catalog and report how many rows were skipped.
pub fn load_catalog_with_stats(path: &Path) -> Result<(EventCatalog, LoadStats)> {
    let text = std::fs::read_to_string(path)?;
    let (catalog, stats) = parse_catalog(&text)?;

    tracing::info!(
        event = event_names::CATALOG_LOADED,
        stage = %Stage::Load,
        path = %path.display(),
        events = catalog.len(),
        skipped_rows = stats.skipped_rows,
        "catalog loaded"
    );

    Ok((catalog, stats))
}

const BOM: char = '\u{feff}';

fn normalize_name(raw: &str) -> String {
    raw.trim_start_matches(BOM)
        .trim()
        .trim_start_matches('#')
        .trim()
        .to_lowercase()
}

/// Column names of a candidate header line, split by the same CSV
/// dialect that reads the body.
fn header_names(line: &str) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes());
    let mut record = csv::StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => record.iter().map(normalize_name).collect(),
        _ => Vec::new(),
    }
}

fn parse_error(line: u64, message: impl Into<String>) -> Error {
    Error::CatalogParse {
        line,
        message: message.into(),
    }
}

/// Locate the header row: returns its zero-based line index.
fn find_header(text: &str) -> Result<usize> {
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim_start_matches(BOM).trim();
        if trimmed.is_empty() {
            continue;
        }
        if Columns::from_names(&header_names(trimmed)).is_some() {
            return Ok(idx);
        }
        if !trimmed.starts_with('#') {
            return Err(parse_error(
                idx as u64 + 1,
                "header must name date, lat, lon and a magnitude column (mw, mag or magnitude)",
            ));
        }
    }
    Err(parse_error(0, "no header row found"))
}

/// Parse an origin time. Times without an offset are taken as UTC.
pub fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
            return Some(t.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
}

fn parse_float(field: &str, name: &str, line: u64) -> Result<f64> {
    field
        .parse::<f64>()
        .map_err(|_| parse_error(line, format!("{} is not a number: {:?}", name, field)))
}

/// Round to the catalog's reporting precision of 0.1.
fn round_magnitude(m: f64) -> f64 {
    (m * 10.0).round() / 10.0
}

/// Parse catalog CSV text.
pub fn parse_catalog(text: &str) -> Result<(EventCatalog, LoadStats)> {
    let header_idx = find_header(text)?;
    let body_start: usize = text
        .split_inclusive('\n')
        .take(header_idx)
        .map(str::len)
        .sum();
    let body = &text[body_start..];
    let line_offset = header_idx as u64;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .comment(None)
        .from_reader(body.as_bytes());

    let names: Vec<String> = reader
        .headers()
        .map_err(|e| parse_error(line_offset + 1, e.to_string()))?
        .iter()
        .map(normalize_name)
        .collect();
    let columns = Columns::from_names(&names)
        .ok_or_else(|| parse_error(line_offset + 1, "header is missing a required column"))?;

    let mut events = Vec::new();
    let mut stats = LoadStats::default();

    for record in reader.records() {
        let record = record.map_err(|e| {
            let line = e.position().map_or(0, |p| p.line() + line_offset);
            parse_error(line, e.to_string())
        })?;
        let line = record.position().map_or(0, |p| p.line() + line_offset);
        stats.rows += 1;

        let field = |idx: usize| record.get(idx).unwrap_or("");

        let mag_field = field(columns.magnitude);
        if mag_field.is_empty() {
            stats.skipped_rows += 1;
            tracing::trace!(
                event = event_names::CATALOG_ROW_SKIPPED,
                stage = %Stage::Load,
                line,
                "row without magnitude skipped"
            );
            continue;
        }

        let time = parse_time(field(columns.date))
            .ok_or_else(|| parse_error(line, format!("unrecognized date: {:?}", field(columns.date))))?;
        let lat = parse_float(field(columns.lat), "lat", line)?;
        let lon = parse_float(field(columns.lon), "lon", line)?;
        let magnitude = round_magnitude(parse_float(mag_field, "magnitude", line)?);

        let mut event = Event::new(lat, lon, time, magnitude);
        if let Some(idx) = columns.depth {
            let depth = field(idx);
            if !depth.is_empty() {
                event = event.with_depth(parse_float(depth, "depth", line)?);
            }
        }
        events.push(event);
    }

    Ok((EventCatalog::new(events)?, stats))
}

/// Write a catalog as CSV with a `date,lat,lon,depth,mw` header.
///
/// The output is readable by [`parse_catalog`].
pub fn write_catalog<W: Write>(catalog: &EventCatalog, writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["date", "lat", "lon", "depth", "mw"])
        .map_err(std::io::Error::from)?;
    for event in catalog.events() {
        out.write_record([
            event.time.to_rfc3339_opts(SecondsFormat::Secs, true),
            event.latitude.to_string(),
            event.longitude.to_string(),
            event.depth_km.map(|d| d.to_string()).unwrap_or_default(),
            event.magnitude.to_string(),
        ])
        .map_err(std::io::Error::from)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ISC_GEM: &str = "\
# ISC-GEM Global Instrumental Earthquake Catalogue
# Version 9.1
#
#date, lat, lon, smajax, sminax, strike, q, depth, unc, q, mw, unc, q, s, mo, fac, mo_auth, mpp, mpr, mrr, mrt, mtp, mtt, str1, dip1, rake1, str2, dip2, rake2, type, eventid
 1904-04-04 10:02:34.56,  41.802,  23.108, 12.5, 10.2, 90.0, A, 15.0, 4.8, C,  7.04, 0.20, A, 0, , , , , , , , , , , , , , , , , 16957819
 1904-04-04 10:26:00.35,  41.758,  23.249, 13.0, 10.9, 80.0, A, 15.0, 5.2, C,  7.55, 0.20, A, 0, , , , , , , , , , , , , , , , , 16957820
 1904-06-25 14:45:39.14,  52.300, 159.000, 30.0, 20.0, 10.0, C, 15.0, 25.0, C,      , 0.40, C, 0, , , , , , , , , , , , , , , , , 16957829
";

    #[test]
    fn parses_commented_header_and_preamble() {
        let (catalog, stats) = parse_catalog(ISC_GEM).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(stats.rows, 3);
        assert_eq!(stats.skipped_rows, 1);

        let first = &catalog.events()[0];
        assert_eq!(first.latitude, 41.802);
        assert_eq!(first.longitude, 23.108);
        assert_eq!(first.magnitude, 7.0);
        assert_eq!(first.depth_km, Some(15.0));
        assert_eq!(
            first.time,
            Utc.with_ymd_and_hms(1904, 4, 4, 10, 2, 34).unwrap()
                + chrono::Duration::milliseconds(560)
        );
        assert_eq!(catalog.events()[1].magnitude, 7.6);
    }

    #[test]
    fn plain_header_with_mag_column() {
        let text = "time_ignored,date,lat,lon,mag\nx,2001-02-03T04:05:06Z,10,20,5.25\n";
        let (catalog, _) = parse_catalog(text).unwrap();
        assert_eq!(catalog.events()[0].magnitude, 5.3);
        assert_eq!(catalog.events()[0].depth_km, None);
    }

    #[test]
    fn quoted_header_names() {
        let text = "\"date\",\"lat\",\"lon\",\"mw\"\n2001-01-01,1,2,5.0\n";
        let (catalog, stats) = parse_catalog(text).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(stats.rows, 1);
        assert_eq!(catalog.events()[0].magnitude, 5.0);
    }

    #[test]
    fn byte_order_mark_before_header() {
        let text = "\u{feff}date,lat,lon,mw\n2001-01-01,1,2,5.0\n2001-01-02,3,4,6.1\n";
        let (catalog, _) = parse_catalog(text).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.events()[1].latitude, 3.0);

        let commented = "\u{feff}# exported catalog\n#date,lat,lon,mw\n2001-01-01,1,2,5.0\n";
        let (catalog, _) = parse_catalog(commented).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn bad_number_reports_line() {
        let text = "# preamble\ndate,lat,lon,mw\n2001-01-01,10,20,5.0\n2001-01-02,abc,20,5.0\n";
        let err = parse_catalog(text).unwrap_err();
        match err {
            Error::CatalogParse { line, message } => {
                assert_eq!(line, 4);
                assert!(message.contains("lat"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_date_is_parse_error() {
        let text = "date,lat,lon,mw\nyesterday,10,20,5.0\n";
        let err = parse_catalog(text).unwrap_err();
        assert!(matches!(err, Error::CatalogParse { line: 2, .. }));
    }

    #[test]
    fn missing_columns_is_parse_error() {
        let err = parse_catalog("date,lat,mw\n2001-01-01,1,5\n").unwrap_err();
        assert!(matches!(err, Error::CatalogParse { line: 1, .. }));

        let err = parse_catalog("# only comments\n").unwrap_err();
        assert!(matches!(err, Error::CatalogParse { line: 0, .. }));
    }

    #[test]
    fn out_of_range_latitude_is_invalid_event() {
        let err = parse_catalog("date,lat,lon,mw\n2001-01-01,95,20,5.0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidEvent(_)));
    }

    #[test]
    fn date_formats() {
        let expected = Utc.with_ymd_and_hms(2010, 5, 6, 7, 8, 0).unwrap();
        assert_eq!(parse_time("2010-05-06 07:08"), Some(expected));
        assert_eq!(parse_time("2010-05-06T07:08:00"), Some(expected));
        assert_eq!(parse_time("2010-05-06T09:08:00+02:00"), Some(expected));
        assert_eq!(
            parse_time("2010-05-06"),
            Some(Utc.with_ymd_and_hms(2010, 5, 6, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_time("06/05/2010"), None);
    }

    #[test]
    fn written_catalog_reads_back() {
        let t = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let catalog = EventCatalog::new(vec![
            Event::new(1.5, -2.5, t, 3.1).with_depth(10.0),
            Event::new(-4.0, 170.0, t, 4.7),
        ])
        .unwrap();
        let mut buf = Vec::new();
        write_catalog(&catalog, &mut buf).unwrap();
        let (back, stats) = parse_catalog(std::str::from_utf8(&buf).unwrap()).unwrap();
        assert_eq!(back, catalog);
        assert_eq!(stats.skipped_rows, 0);
    }
}
