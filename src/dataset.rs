//! Labelled records and the streaming pixel-CSV decoder
//!
//! Each line of a dataset file is `label,pixel_0,pixel_1,...,pixel_783`. The label
//! becomes a one-hot output vector and every pixel is divided by 256.0, which maps
//! the 0..=255 byte range into [0, 1).

use crate::error::{NetworkError, Result};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Pixels per digit image (28 x 28).
pub const NUM_INPUTS: usize = 784;
/// Digit classes.
pub const NUM_OUTPUTS: usize = 10;
/// Divisor applied to raw pixel values.
pub const PIXEL_SCALE: f64 = 256.0;

/// One training or test example.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub inputs: Vec<f64>,
    pub outputs: Vec<f64>,
}

impl Record {
    pub fn new(inputs: Vec<f64>, outputs: Vec<f64>) -> Self {
        Self { inputs, outputs }
    }

    /// Index of the hot output unit.
    pub fn label(&self) -> usize {
        crate::network::argmax(&self.outputs)
    }
}

/// Decoder dimensions. The default matches the digit dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvDecoder {
    inputs: usize,
    outputs: usize,
}

impl Default for CsvDecoder {
    fn default() -> Self {
        Self {
            inputs: NUM_INPUTS,
            outputs: NUM_OUTPUTS,
        }
    }
}

impl CsvDecoder {
    /// Decoder for lines of `1 + inputs` fields and labels in `[0, outputs)`.
    pub fn new(inputs: usize, outputs: usize) -> Self {
        Self { inputs, outputs }
    }

    pub fn inputs(&self) -> usize {
        self.inputs
    }

    pub fn outputs(&self) -> usize {
        self.outputs
    }

    /// Stream records from `reader` in file order.
    pub fn records<R: BufRead>(&self, reader: R) -> RecordReader<R> {
        RecordReader {
            decoder: *self,
            reader,
            line: String::new(),
            line_number: 0,
            failed: false,
        }
    }

    /// Drain `reader` into a vector, aborting on the first malformed line.
    pub fn decode<R: BufRead>(&self, reader: R) -> Result<Vec<Record>> {
        self.records(reader).collect()
    }

    pub fn decode_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Record>> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let records = self.decode(BufReader::new(file))?;

        debug!("Decoded {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Parse a single line (without its terminator).
    pub fn decode_line(&self, line: &str, line_number: usize) -> Result<Record> {
        let malformed = |reason: String| NetworkError::MalformedRecord {
            line: line_number,
            reason,
        };

        let mut fields = line.split(',');

        let label_field = fields.next().unwrap_or_default();
        let label: usize = label_field
            .parse()
            .map_err(|_| malformed(format!("cannot parse label '{}'", label_field)))?;
        if label >= self.outputs {
            return Err(malformed(format!(
                "label {} is outside 0..{}",
                label, self.outputs
            )));
        }

        let mut inputs = Vec::with_capacity(self.inputs);
        for field in fields {
            if inputs.len() == self.inputs {
                return Err(malformed(format!(
                    "expected {} pixel fields, found more",
                    self.inputs
                )));
            }
            let pixel: u8 = field
                .parse()
                .map_err(|_| malformed(format!("cannot parse pixel '{}'", field)))?;
            inputs.push(f64::from(pixel) / PIXEL_SCALE);
        }

        if inputs.len() != self.inputs {
            return Err(malformed(format!(
                "expected {} pixel fields, found {}",
                self.inputs,
                inputs.len()
            )));
        }

        let mut outputs = vec![0.0; self.outputs];
        outputs[label] = 1.0;

        Ok(Record::new(inputs, outputs))
    }
}

/// Iterator over the records of a line-delimited pixel CSV stream.
///
/// Blank lines are skipped. After the first error the iterator is fused and
/// yields nothing more.
pub struct RecordReader<R> {
    decoder: CsvDecoder,
    reader: R,
    line: String,
    line_number: usize,
    failed: bool,
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err.into()));
                }
            }
            self.line_number += 1;

            let content = self.line.trim_end_matches(&['\n', '\r'][..]);
            if content.trim().is_empty() {
                continue;
            }

            let result = self.decoder.decode_line(content, self.line_number);
            if result.is_err() {
                self.failed = true;
            }
            return Some(result);
        }
    }
}

/// Decode a digit dataset from any buffered reader.
pub fn decode<R: BufRead>(reader: R) -> Result<Vec<Record>> {
    CsvDecoder::default().decode(reader)
}

/// Decode a digit dataset file.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    CsvDecoder::default().decode_file(path)
}
