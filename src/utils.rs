//! Utility functions for file access.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

//-----------------------------------------------------------------------------

/// Returns the full file name for a specific test file.
pub fn get_test_data(filename: &'static str) -> PathBuf {
    let mut buf = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    buf.push("test-data");
    buf.push(filename);
    buf
}

//-----------------------------------------------------------------------------

// Magic bytes at the start of a gzip stream.
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Returns `true` if the file exists.
pub fn file_exists<P: AsRef<Path>>(filename: P) -> bool {
    fs::metadata(filename).is_ok()
}

/// Returns `true` if the file appears to be gzip-compressed.
pub fn is_gzipped<P: AsRef<Path>>(filename: P) -> bool {
    let mut magic = [0; 2];
    match File::open(filename) {
        Ok(mut file) => match file.read_exact(&mut magic) {
            Ok(()) => magic == GZIP_MAGIC,
            Err(_) => false,
        },
        Err(_) => false,
    }
}

/// Returns a buffered reader for the file, which may be gzip-compressed.
///
/// Both factorization files and graph files are opened through this function,
/// so either may be compressed without the caller noticing.
pub fn open_file<P: AsRef<Path>>(filename: P) -> Result<Box<dyn BufRead>, String> {
    let file = File::open(&filename).map_err(|x| x.to_string())?;
    if is_gzipped(&filename) {
        let inner = MultiGzDecoder::new(BufReader::new(file));
        Ok(Box::new(BufReader::new(inner)))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

//-----------------------------------------------------------------------------


//-----------------------------------------------------------------------------
