use std::{
    fs::File,
    io::{self, BufRead, BufReader, Lines},
    path::Path,
    str::FromStr,
};

use thiserror::Error;

use crate::types::{Class, Features, NUM_FEATURES};

/// One line of a feature dataset: a URL, its ground-truth label, and the 11
/// precomputed feature values
///
/// The line format is `url, label, f1, ..., f11` with comma separators;
/// whitespace around fields is insignificant. Some dataset writers emit a
/// trailing separator after the last feature; the parser accepts and ignores
/// it. Nothing in this crate writes one.
#[derive(Clone, Debug, PartialEq)]
pub struct UrlRecord {
    pub url: String,
    pub label: Class,
    pub features: Features,
}

/// Error parsing a single dataset record
#[derive(Debug, Error, PartialEq)]
pub enum ParseRecordError {
    #[error("expected url, label, and {NUM_FEATURES} features, found {found} fields")]
    FieldCount { found: usize },
    #[error("invalid label {value:?}, expected 0 or 1")]
    Label { value: String },
    #[error("invalid feature value {value:?}")]
    Feature { value: String },
}

impl FromStr for UrlRecord {
    type Err = ParseRecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields = line
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect::<Vec<_>>();

        if fields.len() != 2 + NUM_FEATURES {
            return Err(ParseRecordError::FieldCount {
                found: fields.len(),
            });
        }

        let url = fields[0].to_owned();
        let label = fields[1]
            .parse::<usize>()
            .ok()
            .and_then(Class::from_repr)
            .ok_or_else(|| ParseRecordError::Label {
                value: fields[1].to_owned(),
            })?;

        let mut features = [0.0; NUM_FEATURES];
        for (slot, field) in features.iter_mut().zip(&fields[2..]) {
            *slot = field.parse().map_err(|_| ParseRecordError::Feature {
                value: (*field).to_owned(),
            })?;
        }

        Ok(Self {
            url,
            label,
            features,
        })
    }
}

/// Error reading a feature dataset file
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("line {line}: {source}")]
    Record {
        line: usize,
        source: ParseRecordError,
    },
}

/// Streams [records](UrlRecord) from a line-oriented dataset file
///
/// Blank lines are skipped; any malformed line surfaces as a
/// [`DatasetError::Record`] carrying its line number.
pub struct DatasetReader {
    lines: Lines<BufReader<File>>,
    line: usize,
}

impl DatasetReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let file = File::open(path)?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
            line: 0,
        })
    }
}

impl Iterator for DatasetReader {
    type Item = Result<UrlRecord, DatasetError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line += 1;

            if line.trim().is_empty() {
                continue;
            }

            return Some(line.parse().map_err(|source| DatasetError::Record {
                line: self.line,
                source,
            }));
        }
    }
}
