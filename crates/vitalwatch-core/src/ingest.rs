//! Measurement ingestion
//!
//! Parses the producer formats and appends well-formed records to a
//! [`DataStorage`]. Malformed input stops here; the alerting core only ever
//! sees validated records.
//!
//! Two formats are understood:
//! - the socket line protocol, `patientId,timestamp,type,value`
//! - the flat-file log, `Patient ID: 1, Timestamp: 1714376789050, Label: ECG, Data: 0.42`

use std::path::PathBuf;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::MeasurementRecord;
use crate::storage::DataStorage;

/// Parse one socket line: `patientId,timestamp,type,value`
pub fn parse_line(line: &str) -> Result<MeasurementRecord> {
    let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();
    let [patient_id, timestamp, label, value] = fields[..] else {
        return Err(Error::parse(line, format!("expected 4 fields, found {}", fields.len())));
    };

    build_record(line, patient_id, timestamp, label, value)
}

/// Parse one log line: `Patient ID: <id>, Timestamp: <ts>, Label: <type>, Data: <value>`
pub fn parse_log_line(line: &str) -> Result<MeasurementRecord> {
    let parts: Vec<&str> = line.trim().splitn(4, ',').collect();
    let [patient_id, timestamp, label, value] = parts[..] else {
        return Err(Error::parse(line, format!("expected 4 fields, found {}", parts.len())));
    };

    let field = |part: &str, name: &str| -> Result<String> {
        part.trim()
            .strip_prefix(name)
            .and_then(|rest| rest.strip_prefix(':'))
            .map(|rest| rest.trim().to_string())
            .ok_or_else(|| Error::parse(line, format!("missing '{name}' field")))
    };

    build_record(
        line,
        &field(patient_id, "Patient ID")?,
        &field(timestamp, "Timestamp")?,
        &field(label, "Label")?,
        &field(value, "Data")?,
    )
}

fn build_record(
    line: &str,
    patient_id: &str,
    timestamp: &str,
    label: &str,
    value: &str,
) -> Result<MeasurementRecord> {
    if patient_id.is_empty() {
        return Err(Error::parse(line, "empty patient id"));
    }
    if label.is_empty() {
        return Err(Error::parse(line, "empty measurement type"));
    }

    let timestamp: i64 = timestamp
        .parse()
        .map_err(|_| Error::parse(line, format!("invalid timestamp '{timestamp}'")))?;

    // saturation is produced as a percentage, e.g. "97.0%"
    let value: f64 = value
        .trim_end_matches('%')
        .parse()
        .map_err(|_| Error::parse(line, format!("invalid value '{value}'")))?;

    if !value.is_finite() {
        return Err(Error::parse(line, "value is not finite"));
    }

    Ok(MeasurementRecord::new(patient_id, label, value, timestamp))
}

/// A source of measurements that fills a [`DataStorage`]
#[async_trait::async_trait]
pub trait DataReader: Send + Sync {
    /// Read the source to its end; returns the number of records stored
    async fn read_into(&self, storage: &DataStorage) -> Result<usize>;
}

/// Store every parseable line, logging and skipping the rest
fn ingest_lines<'a>(
    storage: &DataStorage,
    lines: impl Iterator<Item = &'a str>,
    parse: fn(&str) -> Result<MeasurementRecord>,
) -> usize {
    let mut stored = 0;
    for line in lines.filter(|line| !line.trim().is_empty()) {
        match parse(line) {
            Ok(record) => {
                storage.add_record(record);
                stored += 1;
            }
            Err(e) => warn!(error = %e, "Skipping measurement"),
        }
    }
    stored
}

/// Reads simulator log files: a single file, or every `*.txt` file in a directory
#[derive(Debug, Clone)]
pub struct FileReader {
    path: PathBuf,
}

impl FileReader {
    /// Create a reader for a file or directory
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn files(&self) -> Result<Vec<PathBuf>> {
        if !tokio::fs::metadata(&self.path).await?.is_dir() {
            return Ok(vec![self.path.clone()]);
        }

        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.path).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "txt") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

#[async_trait::async_trait]
impl DataReader for FileReader {
    async fn read_into(&self, storage: &DataStorage) -> Result<usize> {
        let mut stored = 0;

        for file in self.files().await? {
            let contents = tokio::fs::read_to_string(&file).await?;
            let count = ingest_lines(storage, contents.lines(), parse_log_line);
            debug!(file = %file.display(), records = count, "Read measurement file");
            stored += count;
        }

        info!(path = %self.path.display(), records = stored, "Finished reading measurements");
        Ok(stored)
    }
}

/// Streams the line protocol from a TCP producer until it disconnects
#[derive(Debug, Clone)]
pub struct TcpReader {
    addr: String,
    connect_timeout: Duration,
}

impl TcpReader {
    /// Create a reader for `host:port`
    pub fn new(addr: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            connect_timeout,
        }
    }

    async fn connect(&self) -> Result<TcpStream> {
        match tokio::time::timeout(self.connect_timeout, TcpStream::connect(&self.addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(Error::connection(format!("{}: {e}", self.addr))),
            Err(_) => Err(Error::connection(format!(
                "{}: timed out after {:?}",
                self.addr, self.connect_timeout
            ))),
        }
    }
}

#[async_trait::async_trait]
impl DataReader for TcpReader {
    async fn read_into(&self, storage: &DataStorage) -> Result<usize> {
        let stream = self.connect().await?;
        info!(addr = %self.addr, "Connected to measurement producer");

        let mut lines = BufReader::new(stream).lines();
        let mut stored = 0;

        while let Some(line) = lines.next_line().await? {
            stored += ingest_lines(storage, std::iter::once(line.as_str()), parse_line);
        }

        info!(addr = %self.addr, records = stored, "Measurement producer disconnected");
        Ok(stored)
    }
}
