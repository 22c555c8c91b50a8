//! Dataset Acquisition
//!
//! Download the zipped dataset, pull one CSV member out of it in memory and
//! parse it into an [`ObservationTable`]. Any failure is returned to the caller
//! untouched, there is no retry and nothing is cached between runs.
use crate::config::ReportConfig;
use crate::data::{parse_timestamp, ObservationTable};
use crate::errors::DriftError;
use log::info;
use std::io::{Cursor, Read};

/// Download the archive at `url` into memory.
pub fn fetch_archive(url: &str) -> Result<Vec<u8>, DriftError> {
    info!("Downloading dataset from {}", url);
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    let body = response.bytes()?;
    info!("Downloaded {} bytes", body.len());
    Ok(body.to_vec())
}

/// Read a single member of a ZIP archive into memory.
pub fn extract_member(archive: &[u8], member: &str) -> Result<Vec<u8>, DriftError> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive))?;
    let mut file = zip.by_name(member)?;
    let mut buf = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Parse a CSV table with a header row.
///
/// * `reader` - Source of the CSV text.
/// * `index_column` - Column holding timestamps, used as the row index.
///
/// Every other column must be numeric, empty cells become NaN.
pub fn parse_table<R: Read>(reader: R, index_column: &str) -> Result<ObservationTable, DriftError> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let index_pos = headers
        .iter()
        .position(|h| h == index_column)
        .ok_or_else(|| DriftError::MissingColumn(index_column.to_string()))?;

    let value_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index_pos)
        .map(|(i, h)| (i, h.to_string()))
        .collect();

    let mut timestamps = Vec::new();
    let mut data_columns: Vec<Vec<f64>> = vec![Vec::new(); value_cols.len()];

    for (row, result) in csv_reader.records().enumerate() {
        let record = result?;

        let raw_ts = &record[index_pos];
        let ts = parse_timestamp(raw_ts).ok_or_else(|| DriftError::ParseTimestamp(row, raw_ts.to_string()))?;
        timestamps.push(ts);

        for ((idx, name), col) in value_cols.iter().zip(data_columns.iter_mut()) {
            let val_str = record[*idx].trim();
            let val = if val_str.is_empty() {
                f64::NAN
            } else {
                val_str
                    .parse::<f64>()
                    .map_err(|_| DriftError::ParseValue(name.clone(), row, val_str.to_string()))?
            };
            col.push(val);
        }
    }

    let columns = value_cols
        .into_iter()
        .map(|(_, name)| name)
        .zip(data_columns)
        .collect();
    ObservationTable::new(timestamps, columns)
}

/// Download, extract and parse the configured dataset.
pub fn fetch(cfg: &ReportConfig) -> Result<ObservationTable, DriftError> {
    let archive = fetch_archive(&cfg.dataset_url)?;
    let csv_bytes = extract_member(&archive, &cfg.dataset_member)?;
    let table = parse_table(csv_bytes.as_slice(), &cfg.index_column)?;
    info!(
        "Parsed {} rows and {} columns from {}",
        table.rows(),
        table.column_names().len(),
        cfg.dataset_member
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HOUR_CSV: &str = "instant,dteday,season,hr,temp,cnt\n\
                            1,2011-01-01,1,0,0.24,16\n\
                            2,2011-01-01,1,1,0.22,40\n\
                            3,2011-01-02,1,0,0.46,\n";

    fn zipped(name: &str, content: &str) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        zip.start_file("Readme.txt", options).unwrap();
        zip.write_all(b"bike sharing").unwrap();
        zip.start_file(name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extract_member() {
        let archive = zipped("hour.csv", HOUR_CSV);
        let bytes = extract_member(&archive, "hour.csv").unwrap();
        assert_eq!(bytes, HOUR_CSV.as_bytes());
        assert!(matches!(extract_member(&archive, "day.csv"), Err(DriftError::Archive(_))));
        assert!(matches!(extract_member(b"not a zip", "hour.csv"), Err(DriftError::Archive(_))));
    }

    #[test]
    fn test_parse_table() {
        let table = parse_table(HOUR_CSV.as_bytes(), "dteday").unwrap();
        assert_eq!(table.rows(), 3);
        assert_eq!(table.column_names(), &["instant", "season", "hr", "temp", "cnt"]);
        assert_eq!(table.column("temp").unwrap(), &[0.24, 0.22, 0.46]);
        assert!(table.column("cnt").unwrap()[2].is_nan());
        assert_eq!(table.timestamps()[2], parse_timestamp("2011-01-02").unwrap());
    }

    #[test]
    fn test_parse_table_errors() {
        let missing_index = parse_table(HOUR_CSV.as_bytes(), "date");
        assert!(matches!(missing_index, Err(DriftError::MissingColumn(_))));

        let bad_value = "dteday,temp\n2011-01-01,warm\n";
        assert!(matches!(
            parse_table(bad_value.as_bytes(), "dteday"),
            Err(DriftError::ParseValue(ref c, 0, ref v)) if c == "temp" && v == "warm"
        ));

        let bad_ts = "dteday,temp\nyesterday,0.1\n";
        assert!(matches!(
            parse_table(bad_ts.as_bytes(), "dteday"),
            Err(DriftError::ParseTimestamp(0, _))
        ));
    }
}
