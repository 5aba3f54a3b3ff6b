use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

use super::error::DataError;
use super::record::MeasurementRecord;

/// Read a measurement log from a CSV file
///
/// The header row names the [`MeasurementRecord`] fields (`timestamp`, `estrogenLevel`,
/// `testosteroneLevel`, `estradiol`, `progesterone`, `antiAndrogen`, `testosterone`,
/// `antiEstrogen`, `otherSubstanceName`, `otherSubstanceDose`); missing columns read as
/// absent values. Lines starting with `#` are comments.
///
/// Records are returned in file order. Sorting and de-duplicating timestamps is left to
/// the caller.
///
/// # Example
///
/// ```rust,no_run
/// use hormtrack::data::parser::read_records;
///
/// let records = read_records("path/to/log.csv").unwrap();
/// println!("Number of check-ins: {}", records.len());
/// ```
pub fn read_records(path: impl AsRef<std::path::Path>) -> Result<Vec<MeasurementRecord>, DataError> {
    let reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| DataError::CsvError(e.to_string()))?;
    records_from_reader(reader)
}

/// Read a measurement log in CSV form from any reader
pub fn records_from_csv<R: std::io::Read>(input: R) -> Result<Vec<MeasurementRecord>, DataError> {
    let reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);
    records_from_reader(reader)
}

fn records_from_reader<R: std::io::Read>(
    mut reader: csv::Reader<R>,
) -> Result<Vec<MeasurementRecord>, DataError> {
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: MeasurementRecord = row.map_err(|e| DataError::CsvError(e.to_string()))?;
        records.push(record);
    }
    Ok(records)
}

/// Parse a JSON array of records, as exported by the tracking app
pub fn records_from_json(json: &str) -> Result<Vec<MeasurementRecord>, DataError> {
    serde_json::from_str(json).map_err(|e| DataError::JsonError(e.to_string()))
}

/// Deserialize an optional number from a number or a string
///
/// Empty strings, placeholders (`.`, `NA`), unparsable text and non-finite values all read
/// as `None`; they never fail the whole record.
pub(crate) fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => match s.trim() {
            "" | "." | "NA" => None,
            text => text.parse::<f64>().ok(),
        },
        _ => None,
    };
    Ok(parsed.filter(|v| v.is_finite()))
}

/// Deserialize an optional free-text name; blank names read as `None`
pub(crate) fn deserialize_lenient_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

/// Deserialize a millisecond timestamp from an integer, a float, or numeric text
pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(float_timestamp)),
        Value::String(s) => {
            let text = s.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(float_timestamp))
        }
        _ => None,
    };
    parsed.ok_or_else(|| de::Error::custom(format!("expected a timestamp in ms, got {}", value)))
}

/// Truncate a float timestamp; `None` when it is not finite or does not fit an `i64`
fn float_timestamp(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
