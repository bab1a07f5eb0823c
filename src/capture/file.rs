//! Capture file creation and naming

use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Upper bound on `_N` suffixes tried for one timestamp
const MAX_NAME_SUFFIX: u32 = 1000;

/// One open capture file
///
/// Lines are buffered; [`CaptureFile::flush`] makes them durable.
pub struct CaptureFile {
    path: PathBuf,
    writer: Box<dyn Write + Send>,
    lines_written: u64,
}

impl std::fmt::Debug for CaptureFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureFile")
            .field("path", &self.path)
            .field("lines_written", &self.lines_written)
            .finish_non_exhaustive()
    }
}

impl CaptureFile {
    /// Wrap an arbitrary writer; used for files and in tests
    pub fn from_writer(path: impl Into<PathBuf>, writer: Box<dyn Write + Send>) -> Self {
        Self {
            path: path.into(),
            writer,
            lines_written: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Write one line followed by `\n`
    pub fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.lines_written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Flush and release the file, returning its path
    ///
    /// The handle is dropped even if the final flush fails.
    pub fn close(mut self) -> (PathBuf, io::Result<()>) {
        let result = self.writer.flush();
        (self.path, result)
    }

    /// Release the file after a failed write without flushing again
    pub fn abandon(self) -> PathBuf {
        self.path
    }
}

/// Creates capture files on demand
///
/// The engine calls this on the first byte of each burst.
pub trait CaptureOpener: Send {
    fn open(&mut self, dir: &Path) -> io::Result<CaptureFile>;
}

/// Names files `<prefix>_<YYYYMMDD>_<HHMMSS>.<ext>` in the output directory
#[derive(Debug, Clone)]
pub struct FileNaming {
    pub prefix: String,
    pub extension: String,
}

impl FileNaming {
    pub fn new(prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            extension: extension.into(),
        }
    }

    /// File name for `stamp`, with `_N` appended when `suffix` is nonzero
    pub fn file_name(&self, stamp: &DateTime<Local>, suffix: u32) -> String {
        let base = format!("{}_{}", self.prefix, stamp.format("%Y%m%d_%H%M%S"));
        if suffix == 0 {
            format!("{}.{}", base, self.extension)
        } else {
            format!("{}_{}.{}", base, suffix, self.extension)
        }
    }

    /// Create a new file for `stamp` in `dir` without touching existing files
    pub fn create_at(&self, dir: &Path, stamp: &DateTime<Local>) -> io::Result<CaptureFile> {
        std::fs::create_dir_all(dir)?;

        for suffix in 0..MAX_NAME_SUFFIX {
            let path = dir.join(self.file_name(stamp, suffix));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    let writer: BufWriter<File> = BufWriter::new(file);
                    return Ok(CaptureFile::from_writer(path, Box::new(writer)));
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            }
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free capture file name for {}", stamp.format("%Y%m%d_%H%M%S")),
        ))
    }
}

impl CaptureOpener for FileNaming {
    fn open(&mut self, dir: &Path) -> io::Result<CaptureFile> {
        self.create_at(dir, &Local::now())
    }
}
