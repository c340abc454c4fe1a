
// struct to handle tab separated file buffers, plain or gzip compressed


use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use flate2::read::MultiGzDecoder;
use log::{debug, trace};
use crate::error::{MetaError, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub struct FileBufferHelper {
    pub path: PathBuf,
    pub buffer_reader: Box<dyn BufRead>,
    pub line: String,
    // 1-based number of the line currently held in `line`
    pub line_number: usize,
}

impl FileBufferHelper {
    pub fn new(file: &Path) -> Result<FileBufferHelper> {
        // initialise instance of FileBufferHelper
        // gzip is picked up from the suffix or from the magic bytes
        let gzipped = is_gzipped(file)?;
        Self::open(file, gzipped)
    }

    /// Uncompressed text whatever the file name says.
    pub fn plain(file: &Path) -> Result<FileBufferHelper> {
        Self::open(file, false)
    }

    fn open(file: &Path, gzipped: bool) -> Result<FileBufferHelper> {
        let file_open = File::open(file).map_err(|e| MetaError::io(file, e))?;
        debug!("FileHelper created for: {:?} (gzip: {})", file, gzipped);
        let buffer_reader: Box<dyn BufRead> = if gzipped {
            Box::new(BufReader::new(MultiGzDecoder::new(file_open)))
        } else {
            Box::new(BufReader::new(file_open))
        };
        Ok(Self {
            path: file.to_path_buf(),
            buffer_reader,
            line: String::new(),
            line_number: 0,
        })
    }

    /// Load the next non-blank line into `self.line` without its line ending.
    /// Returns false once the buffer is exhausted.
    pub fn next_line(&mut self) -> Result<bool> {
        loop {
            self.line.clear();
            let read = self.buffer_reader.read_line(&mut self.line)
                .map_err(|e| MetaError::io(&self.path, e))?;
            if read == 0 {
                return Ok(false);
            }
            self.line_number += 1;
            let content_length = self.line.trim_end_matches(|c: char| c == '\n' || c == '\r').len();
            self.line.truncate(content_length);
            if !self.line.trim().is_empty() {
                return Ok(true);
            }
            trace!("Skipping blank line {} of {:?}", self.line_number, self.path);
        }
    }

    pub fn fields(&self) -> Vec<&str> {
        self.line.split('\t').collect()
    }

    /// First non-blank line split on tabs.
    pub fn read_header(&mut self) -> Result<Vec<String>> {
        if !self.next_line()? {
            return Err(MetaError::empty(&self.path, "has no header line"));
        }
        Ok(self.line.split('\t').map(String::from).collect())
    }
}

pub fn is_gzipped(file: &Path) -> Result<bool> {
    if file.extension().map_or(false, |ext| ext == "gz") {
        return Ok(true);
    }
    let mut magic = Vec::with_capacity(2);
    File::open(file)
        .and_then(|f| f.take(2).read_to_end(&mut magic))
        .map_err(|e| MetaError::io(file, e))?;
    Ok(magic == GZIP_MAGIC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn reads_plain_and_gzip_alike() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("meta.tsv");
        std::fs::write(&plain, "id\tvalue\r\n\nA\t1\n").unwrap();
        // gzip without a .gz suffix, found by magic bytes
        let packed = dir.path().join("meta.bin");
        let mut encoder = GzEncoder::new(File::create(&packed).unwrap(), Compression::default());
        encoder.write_all(b"id\tvalue\r\n\nA\t1\n").unwrap();
        encoder.finish().unwrap();

        for path in [&plain, &packed] {
            let mut helper = FileBufferHelper::new(path).unwrap();
            assert_eq!(helper.read_header().unwrap(), vec!["id", "value"]);
            assert!(helper.next_line().unwrap());
            assert_eq!(helper.fields(), vec!["A", "1"]);
            assert_eq!(helper.line_number, 3);
            assert!(!helper.next_line().unwrap());
        }
        assert!(!is_gzipped(&plain).unwrap());
        assert!(is_gzipped(&packed).unwrap());
    }

    #[test]
    fn plain_ignores_gz_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.tsv.gz");
        std::fs::write(&path, "Sample\tWeight\nA\t0.5000\n").unwrap();
        assert!(FileBufferHelper::new(&path).unwrap().read_header().is_err());
        let mut helper = FileBufferHelper::plain(&path).unwrap();
        assert_eq!(helper.read_header().unwrap(), vec!["Sample", "Weight"]);
    }

    #[test]
    fn empty_file_has_no_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.tsv");
        std::fs::write(&path, "").unwrap();
        let mut helper = FileBufferHelper::new(&path).unwrap();
        assert!(matches!(helper.read_header(), Err(MetaError::EmptyTable { .. })));
    }
}
