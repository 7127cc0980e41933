use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use csv::Writer;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResultErrors {
    #[error("{0}")]
    Csv(#[from] csv::Error),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("record has {got} fields but the header has {expected}")]
    FieldCountMismatch { expected: usize, got: usize },
}

/// Writes one header row followed by one record per simulation step.
pub struct ResultWriter<W: Write> {
    writer: Writer<W>,
    n_fields: usize,
    n_records: usize,
}

/// Creates the file at `path`, including any missing parent directories.
pub fn create_file(path: &Path) -> Result<BufWriter<File>, ResultErrors> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    tracing::debug!("writing results to {}", path.display());
    Ok(BufWriter::new(file))
}

impl ResultWriter<BufWriter<File>> {
    pub fn create(path: &Path, headers: &[&str]) -> Result<Self, ResultErrors> {
        Self::new(create_file(path)?, headers)
    }
}

impl<W: Write> ResultWriter<W> {
    pub fn new(inner: W, headers: &[&str]) -> Result<Self, ResultErrors> {
        let mut writer = Writer::from_writer(inner);
        writer.write_record(headers)?;
        Ok(Self {
            writer,
            n_fields: headers.len(),
            n_records: 0,
        })
    }

    pub fn write_record(&mut self, content: &[String]) -> Result<(), ResultErrors> {
        if content.len() != self.n_fields {
            return Err(ResultErrors::FieldCountMismatch {
                expected: self.n_fields,
                got: content.len(),
            });
        }
        self.writer.write_record(content)?;
        self.n_records += 1;
        Ok(())
    }

    /// Number of records written so far, not counting the header.
    pub fn len(&self) -> usize {
        self.n_records
    }

    pub fn is_empty(&self) -> bool {
        self.n_records == 0
    }

    pub fn flush(&mut self) -> Result<(), ResultErrors> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and hands back the underlying writer.
    pub fn into_inner(mut self) -> Result<W, ResultErrors> {
        self.writer.flush()?;
        self.writer
            .into_inner()
            .map_err(|e| ResultErrors::Io(std::io::Error::new(e.error().kind(), e.to_string())))
    }
}

pub trait SimResult {
    /// Column names of the result file, in record order.
    fn headers(&self) -> Vec<&'static str>;
    /// Writes every record of the result.
    fn write_result<W: Write>(&self, results: &mut ResultWriter<W>) -> Result<(), ResultErrors>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_records() {
        let mut writer = ResultWriter::new(Vec::new(), &["step", "value"]).unwrap();
        writer
            .write_record(&["0".to_string(), "1.5".to_string()])
            .unwrap();
        writer
            .write_record(&["1".to_string(), "-2".to_string()])
            .unwrap();
        assert_eq!(writer.len(), 2);
        let bytes = writer.into_inner().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "step,value\n0,1.5\n1,-2\n");
    }

    #[test]
    fn test_field_count_mismatch() {
        let mut writer = ResultWriter::new(Vec::new(), &["step", "value"]).unwrap();
        let result = writer.write_record(&["0".to_string()]);
        assert!(matches!(
            result,
            Err(ResultErrors::FieldCountMismatch {
                expected: 2,
                got: 1
            })
        ));
        assert!(writer.is_empty());
    }

    #[test]
    fn test_create_makes_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("runs").join("a").join("out.csv");
        let mut writer = ResultWriter::create(&path, &["step"]).unwrap();
        writer.write_record(&["0".to_string()]).unwrap();
        writer.flush().unwrap();
        drop(writer);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "step\n0\n");
    }
}
