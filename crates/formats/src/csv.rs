//! CSV point ingestion.
//!
//! The first non-blank line is the header. Coordinates come from the first
//! column named `lng`, `lon` or `longitude` and the first named `lat` or
//! `latitude` (case-insensitive). Other columns are ignored.

use foundation::geo::LonLat;
use tracing::debug;

use crate::dataset::DatasetError;
use crate::record::SourceRecord;

const LON_COLUMNS: &[&str] = &["lng", "lon", "longitude"];
const LAT_COLUMNS: &[&str] = &["lat", "latitude"];

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CsvPoints {
    pub records: Vec<SourceRecord>,
    /// Data rows dropped because their coordinates did not parse.
    pub skipped: usize,
}

pub fn parse_points(text: &str) -> Result<CsvPoints, DatasetError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines.next().ok_or(DatasetError::EmptyCsv)?;
    let columns: Vec<String> = split_fields(header)
        .into_iter()
        .map(|c| c.to_ascii_lowercase())
        .collect();
    let lon_ix = find_column(&columns, LON_COLUMNS).ok_or(DatasetError::MissingColumn("lng"))?;
    let lat_ix = find_column(&columns, LAT_COLUMNS).ok_or(DatasetError::MissingColumn("lat"))?;

    let mut out = CsvPoints::default();
    for (line_index, line) in lines {
        let fields = split_fields(line);
        let position = match (fields.get(lon_ix), fields.get(lat_ix)) {
            (Some(lon), Some(lat)) => parse_coordinate(lon)
                .zip(parse_coordinate(lat))
                .and_then(|(lon, lat)| LonLat::checked(lon, lat)),
            _ => None,
        };
        match position {
            Some(position) => out.records.push(SourceRecord::CsvPoint { position }),
            None => {
                debug!(line = line_index + 1, "skipping csv row without coordinates");
                out.skipped += 1;
            }
        }
    }

    Ok(out)
}

fn find_column(columns: &[String], names: &[&str]) -> Option<usize> {
    columns.iter().position(|c| names.contains(&c.as_str()))
}

fn parse_coordinate(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Splits one line on commas, honoring double quotes and `""` escapes.
/// Fields are trimmed.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

#[cfg(test)]
mod tests {
    use super::{parse_points, split_fields};
    use crate::dataset::DatasetError;
    use crate::record::SourceRecord;
    use foundation::geo::LonLat;

    #[test]
    fn parses_lng_lat_rows() {
        let text = "lng,lat\n-122.42,37.77\n-122.41,37.78\n";
        let parsed = parse_points(text).unwrap();
        assert_eq!(parsed.skipped, 0);
        assert_eq!(
            parsed.records,
            vec![
                SourceRecord::CsvPoint {
                    position: LonLat::new(-122.42, 37.77)
                },
                SourceRecord::CsvPoint {
                    position: LonLat::new(-122.41, 37.78)
                },
            ]
        );
    }

    #[test]
    fn column_order_and_aliases_do_not_matter() {
        let text = "id,Latitude,Longitude\r\n7,40.5,-73.9\r\n";
        let parsed = parse_points(text).unwrap();
        assert_eq!(parsed.records[0].position(), LonLat::new(-73.9, 40.5));
    }

    #[test]
    fn malformed_rows_are_skipped_and_counted() {
        let text = "lng,lat\n-122.4,37.7\nabc,37.7\n-122.4\n\n999,1\n";
        let parsed = parse_points(text).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.skipped, 3);
    }

    #[test]
    fn missing_header_columns_are_errors() {
        assert!(matches!(
            parse_points("x,lat\n1,2\n"),
            Err(DatasetError::MissingColumn("lng"))
        ));
        assert!(matches!(parse_points("  \n"), Err(DatasetError::EmptyCsv)));
    }

    #[test]
    fn quoted_fields_keep_commas() {
        assert_eq!(
            split_fields(r#""Mount Sinai, NY",-73.95,"say ""hi""""#),
            vec!["Mount Sinai, NY", "-73.95", r#"say "hi""#]
        );
    }
}
