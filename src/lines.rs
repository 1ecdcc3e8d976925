use std::io::{self, BufRead};

use itertools::Itertools;

/// Text lines of `reader`, split on `\n`, `\r\n` and lone `\r`.
///
/// Terminators are stripped. Each line must be valid UTF-8; anything else is
/// an `InvalidData` error.
pub fn text_lines<R: BufRead>(reader: R) -> impl Iterator<Item = io::Result<String>> {
    reader
        .split(b'\n')
        .map_ok(split_carriage_returns)
        .flatten_ok()
        .map(|line| line.and_then(decode))
}

// A `\n`-delimited chunk may still hold old Mac line breaks.
fn split_carriage_returns(mut chunk: Vec<u8>) -> Vec<Vec<u8>> {
    // `\r\n`, or a lone `\r` right before EOF
    if chunk.last() == Some(&b'\r') {
        chunk.pop();
    }
    chunk.split(|b| *b == b'\r').map(<[u8]>::to_vec).collect()
}

fn decode(bytes: Vec<u8>) -> io::Result<String> {
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
