use std::io::{self, Write, Read, Seek, SeekFrom};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;

pub const MAX_LOG_FILE_BYTES: u64 = 10 * 1024 * 1024;

pub fn init_logging(log_level: Level, log_file: Option<&str>) {
    let level_filter = LevelFilter::from_level(log_level);
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_filter(level_filter);

    let file_layer = log_file.map(|path| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(make_capped_file_writer(PathBuf::from(path), MAX_LOG_FILE_BYTES))
            .with_filter(level_filter)
    });

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();
}

pub(crate) fn make_capped_file_writer(path: PathBuf, max_len: u64) -> impl Fn() -> CappedFileWriter {
    let lock = Arc::new(Mutex::new(()));
    move || CappedFileWriter { path: path.clone(), max_len, lock: lock.clone() }
}

/// Appends to `path`; once the file reaches `max_len` only its newer half is kept.
pub(crate) struct CappedFileWriter {
    path: PathBuf,
    max_len: u64,
    lock: Arc<Mutex<()>>,
}

impl CappedFileWriter {
    fn keep_tail(&self) -> io::Result<()> {
        let keep_bytes = self.max_len / 2;
        let mut tail = Vec::new();
        if let Ok(mut rf) = OpenOptions::new().read(true).open(&self.path) {
            let size = rf.metadata()?.len();
            rf.seek(SeekFrom::Start(size.saturating_sub(keep_bytes)))?;
            rf.read_to_end(&mut tail)?;
        }
        let mut wf = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        wf.write_all(&tail)
    }
}

impl Write for CappedFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let over_cap = std::fs::metadata(&self.path)
            .map(|meta| meta.len() >= self.max_len)
            .unwrap_or(false);
        if over_cap {
            self.keep_tail()?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> { Ok(()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pddd.log");
        let make_writer = make_capped_file_writer(path.clone(), 1024);

        make_writer().write_all(b"first\n").unwrap();
        make_writer().write_all(b"second\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_file_stays_near_cap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pddd.log");
        let max_len = 64;
        let make_writer = make_capped_file_writer(path.clone(), max_len);

        let mut last = String::new();
        for i in 0..50 {
            last = format!("line {:04} ........\n", i);
            make_writer().write_all(last.as_bytes()).unwrap();
            let len = std::fs::metadata(&path).unwrap().len();
            assert!(len < max_len + last.len() as u64, "log grew to {} bytes", len);
        }

        let content = std::fs::read(&path).unwrap();
        assert!(content.ends_with(last.as_bytes()));
        assert!(!String::from_utf8_lossy(&content).contains("line 0000"));
    }
}
