// Key file helpers: the create flow only needs the first line of an SSH
// public key file. The content is not validated here, the API rejects
// malformed keys with 422.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::KeysError;

/// Read the first line of `path`, line terminator included. An empty file
/// yields an empty string.
pub fn read_first_line(path: &Path) -> Result<String, KeysError> {
    let key_file_error = |source| KeysError::KeyFile {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(key_file_error)?;
    let mut line = String::new();
    BufReader::new(file)
        .read_line(&mut line)
        .map_err(key_file_error)?;
    Ok(line)
}

/// Drop the trailing `\n` (or `\r\n`) left by [`read_first_line`].
pub fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches('\n').trim_end_matches('\r')
}
