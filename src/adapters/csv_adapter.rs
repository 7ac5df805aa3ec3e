//! CSV bar input and annotated series output.
//!
//! Input columns are located by header name (`timestamp,open,high,low,close,volume`),
//! so files written by `CsvReportWriter` can be read back. Extra columns are ignored.

use chrono::SecondsFormat;
use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;

use crate::domain::annotate::AnnotatedBar;
use crate::domain::error::SimchartError;
use crate::domain::indicator::Overlay;
use crate::domain::ohlcv::Bar;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

const COLUMNS: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn read_bars<R: Read>(reader: R) -> Result<Vec<Bar>, SimchartError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers = rdr
            .headers()
            .map_err(|e| SimchartError::DataFormat {
                reason: format!("CSV header error: {}", e),
            })?
            .clone();

        let mut index = [0usize; 6];
        for (slot, name) in index.iter_mut().zip(COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| SimchartError::DataFormat {
                    reason: format!("missing {} column", name),
                })?;
        }

        let mut bars: Vec<Bar> = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| SimchartError::DataFormat {
                reason: format!("CSV parse error: {}", e),
            })?;
            let line = row + 2;

            let timestamp: i64 =
                field(&record, &index, 0, line)?
                    .parse()
                    .map_err(|e| SimchartError::DataFormat {
                        reason: format!("line {}: invalid timestamp: {}", line, e),
                    })?;
            if let Some(prev) = bars.last() {
                if timestamp <= prev.timestamp {
                    return Err(SimchartError::DataFormat {
                        reason: format!(
                            "line {}: timestamp {} does not increase (previous {})",
                            line, timestamp, prev.timestamp
                        ),
                    });
                }
            }

            let bar = Bar {
                timestamp,
                open: number(&record, &index, 1, line)?,
                high: number(&record, &index, 2, line)?,
                low: number(&record, &index, 3, line)?,
                close: number(&record, &index, 4, line)?,
                volume: number(&record, &index, 5, line)?,
            };
            if bar.volume < 0.0 {
                return Err(SimchartError::DataFormat {
                    reason: format!("line {}: negative volume", line),
                });
            }
            bars.push(bar);
        }

        Ok(bars)
    }
}

fn field<'a>(
    record: &'a csv::StringRecord,
    index: &[usize; 6],
    col: usize,
    line: usize,
) -> Result<&'a str, SimchartError> {
    record
        .get(index[col])
        .map(str::trim)
        .ok_or_else(|| SimchartError::DataFormat {
            reason: format!("line {}: missing {} value", line, COLUMNS[col]),
        })
}

fn number(
    record: &csv::StringRecord,
    index: &[usize; 6],
    col: usize,
    line: usize,
) -> Result<f64, SimchartError> {
    let raw = field(record, index, col, line)?;
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| SimchartError::DataFormat {
            reason: format!("line {}: invalid {} value '{}'", line, COLUMNS[col], raw),
        })
}

impl DataPort for CsvAdapter {
    fn load_bars(&self) -> Result<Vec<Bar>, SimchartError> {
        let file = File::open(&self.path).map_err(|e| {
            SimchartError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to open {}: {}", self.path.display(), e),
            ))
        })?;
        Self::read_bars(file)
    }
}

/// Writes `timestamp,time,open,high,low,close,volume` followed by the columns of
/// each selected overlay. Missing indicator values are written as empty cells.
#[derive(Debug, Default)]
pub struct CsvReportWriter;

fn format_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl ReportPort for CsvReportWriter {
    fn write(
        &self,
        bars: &[AnnotatedBar],
        overlays: &[Overlay],
        out: &mut dyn Write,
    ) -> Result<(), SimchartError> {
        let mut wtr = csv::Writer::from_writer(out);

        let mut header: Vec<String> = vec!["timestamp".into(), "time".into()];
        header.extend(COLUMNS[1..].iter().map(|c| c.to_string()));
        for overlay in overlays {
            header.extend(overlay.columns());
        }
        wtr.write_record(&header)
            .map_err(|e| SimchartError::Io(e.into()))?;

        for annotated in bars {
            let bar = &annotated.bar;
            let time = bar
                .datetime()
                .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_default();
            let mut record = vec![
                bar.timestamp.to_string(),
                time,
                bar.open.to_string(),
                bar.high.to_string(),
                bar.low.to_string(),
                bar.close.to_string(),
                bar.volume.to_string(),
            ];
            for overlay in overlays {
                record.extend(overlay.values(&annotated.indicators).into_iter().map(format_value));
            }
            wtr.write_record(&record)
                .map_err(|e| SimchartError::Io(e.into()))?;
        }

        wtr.flush()?;
        Ok(())
    }
}
