//! CSV record source
//!
//! Reads a header row, locates the needed columns by name, then yields one
//! `RawRecord` per non-blank line. The first failure ends the stream.

use super::error::{AnalyticsError, AnalyticsResult};
use super::record::RawRecord;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnIndex {
    campaign_id: usize,
    date: Option<usize>,
    impressions: usize,
    clicks: usize,
    spend: usize,
    conversions: usize,
}

impl ColumnIndex {
    fn from_header(header: &str) -> AnalyticsResult<Self> {
        let names: Vec<String> = split_csv_line(header.trim_start_matches('\u{feff}'))
            .into_iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();

        let find = |name: &str| names.iter().position(|n| n == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| AnalyticsError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            campaign_id: require("campaign_id")?,
            date: find("date"),
            impressions: require("impressions")?,
            clicks: require("clicks")?,
            spend: require("spend")?,
            conversions: require("conversions")?,
        })
    }
}

pub struct CsvRecordSource<R> {
    path: PathBuf,
    lines: Lines<R>,
    columns: ColumnIndex,
    line_no: usize,
    finished: bool,
}

impl CsvRecordSource<BufReader<File>> {
    /// Open a CSV file and read its header
    pub fn open(path: impl AsRef<Path>) -> AnalyticsResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| AnalyticsError::SourceRead {
            path: path.clone(),
            source,
        })?;

        log::debug!("Opened record source: {}", path.display());
        Self::from_reader(BufReader::new(file), path)
    }
}

impl<R: BufRead> CsvRecordSource<R> {
    /// Wrap any buffered reader. `path` is only used in error messages.
    pub fn from_reader(reader: R, path: impl Into<PathBuf>) -> AnalyticsResult<Self> {
        let path = path.into();
        let mut lines = reader.lines();
        let mut line_no = 0;

        let header = loop {
            match lines.next() {
                Some(Ok(line)) => {
                    line_no += 1;
                    if !line.trim().is_empty() {
                        break line;
                    }
                }
                Some(Err(source)) => return Err(AnalyticsError::SourceRead { path, source }),
                // No header at all means the id column is missing too
                None => return Err(AnalyticsError::MissingColumn("campaign_id".to_string())),
            }
        };

        let columns = ColumnIndex::from_header(&header)?;

        Ok(Self {
            path,
            lines,
            columns,
            line_no,
            finished: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse_row(&self, row: usize, line: &str) -> AnalyticsResult<RawRecord> {
        let cols = split_csv_line(line);
        let field = |idx: usize, name: &'static str| {
            cols.get(idx)
                .map(String::as_str)
                .ok_or_else(|| AnalyticsError::parse(row, name, ""))
        };

        let campaign_id = field(self.columns.campaign_id, "campaign_id")?;
        let impressions = parse_count(row, "impressions", field(self.columns.impressions, "impressions")?)?;
        let clicks = parse_count(row, "clicks", field(self.columns.clicks, "clicks")?)?;
        let spend = parse_spend(row, field(self.columns.spend, "spend")?)?;
        let conversions = parse_count(row, "conversions", field(self.columns.conversions, "conversions")?)?;

        let record = RawRecord::new(row, campaign_id, impressions, clicks, spend, conversions)?;

        Ok(match self.columns.date.and_then(|idx| cols.get(idx)) {
            Some(date) if !date.is_empty() => record.with_date(date.as_str()),
            _ => record,
        })
    }
}

impl<R: BufRead> Iterator for CsvRecordSource<R> {
    type Item = AnalyticsResult<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(source) => {
                    self.finished = true;
                    return Some(Err(AnalyticsError::SourceRead {
                        path: self.path.clone(),
                        source,
                    }));
                }
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                continue;
            }

            let result = self.parse_row(self.line_no, &line);
            if result.is_err() {
                self.finished = true;
            }
            return Some(result);
        }
    }
}

fn parse_count(row: usize, field: &'static str, value: &str) -> AnalyticsResult<u64> {
    value
        .parse::<u64>()
        .map_err(|_| AnalyticsError::parse(row, field, value))
}

fn parse_spend(row: usize, value: &str) -> AnalyticsResult<f64> {
    value
        .parse::<f64>()
        .map_err(|_| AnalyticsError::parse(row, "spend", value))
}

/// Split one line into trimmed fields.
///
/// A field opening with `"` runs to the closing quote, so it may contain
/// commas; `""` inside it is a literal quote. Quoted line breaks are not
/// supported.
fn split_csv_line(line: &str) -> Vec<String> {
    let line = line.trim_end_matches(&['\r', '\n'][..]);
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut field).trim().to_string()),
            _ => field.push(c),
        }
    }

    fields.push(field.trim().to_string());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn source(content: &str) -> AnalyticsResult<CsvRecordSource<Cursor<Vec<u8>>>> {
        CsvRecordSource::from_reader(Cursor::new(content.as_bytes().to_vec()), "test.csv")
    }

    #[test]
    fn test_reads_rows_in_order() {
        let csv = "campaign_id,date,impressions,clicks,spend,conversions\n\
                   CMP1,2023-01-01,1000,10,100.0,2\n\
                   CMP2,2023-01-02,500,50,50.5,1\n";

        let records: Vec<RawRecord> = source(csv).unwrap().collect::<Result<_, _>>().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].campaign_id, "CMP1");
        assert_eq!(records[0].date.as_deref(), Some("2023-01-01"));
        assert_eq!(records[1].spend, 50.5);
        assert_eq!(records[1].conversions, 1);
    }

    #[test]
    fn test_columns_resolved_by_name() {
        let csv = "Spend , \"campaign_id\",conversions,clicks,impressions\n\
                   20.0,CMP9,3,7,70\n";

        let records: Vec<RawRecord> = source(csv).unwrap().collect::<Result<_, _>>().unwrap();

        assert_eq!(records[0].campaign_id, "CMP9");
        assert_eq!(records[0].impressions, 70);
        assert_eq!(records[0].clicks, 7);
        assert_eq!(records[0].spend, 20.0);
        assert_eq!(records[0].conversions, 3);
        assert_eq!(records[0].date, None);
    }

    #[test]
    fn test_blank_lines_skipped_and_crlf_handled() {
        let csv = "\r\ncampaign_id,date,impressions,clicks,spend,conversions\r\n\r\nCMP1,2023-01-01,1,1,1.0,1\r\n";

        let records: Vec<RawRecord> = source(csv).unwrap().collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].conversions, 1);
    }

    #[test]
    fn test_missing_column() {
        let err = source("campaign_id,date,impressions,clicks,spend\n").err().unwrap();
        assert!(matches!(err, AnalyticsError::MissingColumn(ref c) if c == "conversions"));
    }

    #[test]
    fn test_empty_input_has_no_header() {
        let err = source("").err().unwrap();
        assert!(matches!(err, AnalyticsError::MissingColumn(_)));
    }

    #[test]
    fn test_non_numeric_field_reports_row_and_stops() {
        let csv = "campaign_id,date,impressions,clicks,spend,conversions\n\
                   CMP1,2023-01-01,1000,10,100.0,2\n\
                   CMP2,2023-01-01,abc,10,100.0,2\n\
                   CMP3,2023-01-01,1000,10,100.0,2\n";

        let mut reader = source(csv).unwrap();
        assert!(reader.next().unwrap().is_ok());

        match reader.next().unwrap() {
            Err(AnalyticsError::RecordParse { row, field, value }) => {
                assert_eq!(row, 3);
                assert_eq!(field, "impressions");
                assert_eq!(value, "abc");
            }
            other => panic!("expected parse error, got {:?}", other),
        }

        assert!(reader.next().is_none());
    }

    #[test]
    fn test_short_row_is_parse_error() {
        let csv = "campaign_id,date,impressions,clicks,spend,conversions\nCMP1,2023-01-01,10\n";

        let err = source(csv).unwrap().next().unwrap().unwrap_err();
        assert!(matches!(err, AnalyticsError::RecordParse { field: "clicks", .. }));
    }

    #[test]
    fn test_negative_count_is_parse_error() {
        let csv = "campaign_id,date,impressions,clicks,spend,conversions\nCMP1,2023-01-01,10,-1,1.0,0\n";

        let err = source(csv).unwrap().next().unwrap().unwrap_err();
        assert!(matches!(err, AnalyticsError::RecordParse { row: 2, field: "clicks", .. }));
    }

    #[test]
    fn test_quoted_id_may_contain_commas() {
        let csv = "campaign_id,date,impressions,clicks,spend,conversions\n\
                   \"A,B\",2023-01-01,10,1,1.0,1\n\
                   \"say \"\"hi\"\"\",2023-01-02,20,2,2.0,0\n";

        let records: Vec<RawRecord> = source(csv).unwrap().collect::<Result<_, _>>().unwrap();

        assert_eq!(records[0].campaign_id, "A,B");
        assert_eq!(records[0].impressions, 10);
        assert_eq!(records[0].date.as_deref(), Some("2023-01-01"));
        assert_eq!(records[1].campaign_id, "say \"hi\"");
        assert_eq!(records[1].clicks, 2);
    }

    #[test]
    fn test_split_keeps_empty_fields() {
        assert_eq!(split_csv_line("a,,\" c \","), vec!["a", "", "c", ""]);
    }

    #[test]
    fn test_open_missing_file() {
        let err = CsvRecordSource::open("/definitely/not/here.csv").err().unwrap();
        assert!(matches!(err, AnalyticsError::SourceRead { .. }));
    }
}
