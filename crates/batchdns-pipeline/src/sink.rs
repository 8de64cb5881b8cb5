//! Serialized result output.
//!
//! All resolver workers share one sink. Each record is formatted in full
//! before the sink's lock is taken and written with a single call, so
//! concurrent writers can never interleave bytes of two records. The sink's
//! lock is independent of the queue and tracker locks.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use crate::error::PipelineError;

/// One hostname's resolution outcome.
///
/// An empty address list means the lookup failed or returned nothing; the
/// sink substitutes its sentinel in that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    pub hostname: String,
    pub addresses: Vec<String>,
}

/// Append-only, lock-serialized record sink.
///
/// Writes are deliberately unbuffered: each record is already one
/// pre-formatted string, and a buffer in between would defer I/O errors to
/// the final flush, past the per-record accounting in the worker that
/// submitted the record.
pub struct ResultSink {
    writer: Mutex<Box<dyn Write + Send>>,
    sentinel: String,
}

impl ResultSink {
    /// Open `path` for append (creating it if needed).
    ///
    /// Failure here is fatal to the pipeline: with no sink, no result can be
    /// durably recorded.
    pub fn open(path: &Path, sentinel: impl Into<String>) -> Result<Self, PipelineError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| PipelineError::OutputOpen {
                path: path.to_owned(),
                source,
            })?;
        Ok(Self::from_writer(file, sentinel))
    }

    /// Build a sink over any writer. Used by tests to capture output in
    /// memory.
    pub fn from_writer(writer: impl Write + Send + 'static, sentinel: impl Into<String>) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            sentinel: sentinel.into(),
        }
    }

    /// Append one record: `host,addr1,addr2,...\n`, or `host,<sentinel>\n`
    /// when the address list is empty.
    ///
    /// An I/O error surfaces here, on the call that wrote the record, so the
    /// submitting worker can count the loss.
    pub fn write(&self, result: &ResolutionResult) -> io::Result<()> {
        let record = self.format_record(result);
        let mut writer = self.writer.lock().unwrap();
        writer.write_all(record.as_bytes())
    }

    /// Flush the underlying writer.
    pub fn flush(&self) -> io::Result<()> {
        self.writer.lock().unwrap().flush()
    }

    fn format_record(&self, result: &ResolutionResult) -> String {
        let mut record = String::with_capacity(result.hostname.len() + 16);
        record.push_str(&result.hostname);
        if result.addresses.is_empty() {
            record.push(',');
            record.push_str(&self.sentinel);
        } else {
            for address in &result.addresses {
                record.push(',');
                record.push_str(address);
            }
        }
        record.push('\n');
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    /// Shared in-memory writer for inspecting sink output.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_record_format_with_addresses() {
        let buf = SharedBuf::default();
        let sink = ResultSink::from_writer(buf.clone(), "none");
        sink.write(&ResolutionResult {
            hostname: "example.com".to_string(),
            addresses: vec!["93.184.216.34".to_string(), "2606:2800::1".to_string()],
        })
        .unwrap();
        sink.flush().unwrap();

        assert_eq!(buf.contents(), "example.com,93.184.216.34,2606:2800::1\n");
    }

    #[test]
    fn test_sentinel_substituted_for_empty_list() {
        let buf = SharedBuf::default();
        let sink = ResultSink::from_writer(buf.clone(), "none");
        sink.write(&ResolutionResult {
            hostname: "bogus.invalid".to_string(),
            addresses: Vec::new(),
        })
        .unwrap();
        sink.flush().unwrap();

        assert_eq!(buf.contents(), "bogus.invalid,none\n");
    }

    #[test]
    fn test_write_error_surfaces_per_record() {
        struct BrokenWriter;

        impl Write for BrokenWriter {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "disk full"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        // The error must come back from the write call itself, not get
        // deferred to a later flush.
        let sink = ResultSink::from_writer(BrokenWriter, "none");
        let result = sink.write(&ResolutionResult {
            hostname: "a.example".to_string(),
            addresses: Vec::new(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_concurrent_records_never_interleave() {
        let buf = SharedBuf::default();
        let sink = Arc::new(ResultSink::from_writer(buf.clone(), "none"));

        let mut handles = Vec::new();
        for t in 0..8 {
            let sink = sink.clone();
            handles.push(thread::spawn(move || {
                for i in 0..50 {
                    sink.write(&ResolutionResult {
                        hostname: format!("host-{t}-{i}.example"),
                        addresses: vec!["10.0.0.1".to_string(), "10.0.0.2".to_string()],
                    })
                    .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        sink.flush().unwrap();

        let output = buf.contents();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 400);
        for line in lines {
            // Every line must be one complete, well-formed record.
            let fields: Vec<&str> = line.split(',').collect();
            assert_eq!(fields.len(), 3, "garbled record: {line:?}");
            assert!(fields[0].starts_with("host-"), "garbled record: {line:?}");
            assert_eq!(fields[1], "10.0.0.1");
            assert_eq!(fields[2], "10.0.0.2");
        }
    }
}
