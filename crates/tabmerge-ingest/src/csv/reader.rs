//! CSV file reading into Polars DataFrames.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, PolarsError, SerReader};

use crate::error::{IngestError, Result};

/// Number of leading rows used for dtype inference.
pub const INFER_SCHEMA_ROWS: usize = 100;

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Detect encoding and validate it's supported (UTF-8 only).
///
/// Checks for UTF-16 BOM markers which are not supported.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = open(path)?;

    let mut buffer = [0u8; 4];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read >= 2 {
        if buffer[0..2] == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer[0..2] == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }

    Ok(())
}

/// Fails with [`IngestError::EmptyCsv`] when the file has no header line.
fn ensure_header(path: &Path) -> Result<()> {
    let mut reader = BufReader::new(open(path)?);
    let mut first = String::new();
    reader
        .read_line(&mut first)
        .map_err(|e| IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

    let header = first.strip_prefix('\u{feff}').unwrap_or(&first);
    if header.trim().is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Reads a delimited file with a header row into a DataFrame.
///
/// Column dtypes are inferred from the first [`INFER_SCHEMA_ROWS`] rows and
/// date-like strings are parsed into temporal columns where Polars can.
pub fn read_dataset(path: &Path) -> Result<DataFrame> {
    validate_encoding(path)?;
    ensure_header(path)?;

    let parse_error = |e: PolarsError| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .map_parse_options(|options| options.with_try_parse_dates(true))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(parse_error)?
        .finish()
        .map_err(parse_error)?;

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Read dataset"
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::DataType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_dataset() {
        let file = create_temp_csv("A,B,C\n1,2.5,x\n4,5.0,y\n");
        let df = read_dataset(file.path()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.get_column_names_str(), vec!["A", "B", "C"]);
        assert_eq!(df.column("A").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("B").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("C").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_read_dataset_header_only() {
        let file = create_temp_csv("A,B\n");
        let df = read_dataset(file.path()).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn test_read_dataset_empty_file() {
        let file = create_temp_csv("");
        let result = read_dataset(file.path());
        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn test_read_dataset_ragged_rows() {
        let file = create_temp_csv("a,b\n1,2,3\n");
        let result = read_dataset(file.path());
        assert!(matches!(result, Err(IngestError::CsvParse { .. })));
    }

    #[test]
    fn test_validate_encoding_rejects_utf16() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xFF, 0xFE, b'a', 0x00]).unwrap();
        let result = validate_encoding(file.path());
        assert!(matches!(
            result,
            Err(IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_encoding_accepts_utf8() {
        let file = create_temp_csv("\u{feff}A,B\n1,2\n");
        assert!(validate_encoding(file.path()).is_ok());
    }
}
