use anyhow::{Context, Result};
use std::io::{ErrorKind, Read};

/// Initial capacity of the line buffer, and the fixed step it grows by.
const LINE_BUFFER_STEP: usize = 1024;

/// Reads raw lines from an input stream, one byte at a time.
///
/// The buffer starts at [`LINE_BUFFER_STEP`] bytes and is extended by the
/// same fixed step whenever it fills up; everything read so far survives the
/// growth, so lines of any length come back intact.
pub(crate) struct LineReader<R> {
    input: R,
}

impl<R: Read> LineReader<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    /// Read one line, without its terminating newline.
    ///
    /// Returns `Ok(None)` once the stream is exhausted. A line cut short by
    /// end-of-stream is still returned; the `None` follows on the next call.
    /// A failed buffer reservation is fatal to the caller and comes back as
    /// an error rather than a truncated line.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf: Vec<u8> = Vec::new();
        reserve_step(&mut buf)?;

        let mut byte = [0u8; 1];
        loop {
            let n = match self.input.read(&mut byte) {
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e).context("failed to read from the input stream"),
            };
            if n == 0 {
                if buf.is_empty() {
                    return Ok(None);
                }
                break;
            }
            if byte[0] == b'\n' {
                break;
            }
            // Fixed-step growth; the push below never reallocates.
            if buf.len() == buf.capacity() {
                reserve_step(&mut buf)?;
            }
            buf.push(byte[0]);
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}

fn reserve_step(buf: &mut Vec<u8>) -> Result<()> {
    buf.try_reserve_exact(LINE_BUFFER_STEP)
        .context("could not grow the line buffer")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_lines_in_order_then_signals_end() {
        let mut reader = LineReader::new(Cursor::new("hello\nworld\n"));
        assert_eq!(reader.read_line().unwrap(), Some("hello".to_string()));
        assert_eq!(reader.read_line().unwrap(), Some("world".to_string()));
        assert_eq!(reader.read_line().unwrap(), None);
    }

    #[test]
    fn empty_line_is_distinct_from_end_of_stream() {
        let mut reader = LineReader::new(Cursor::new("\n\n"));
        assert_eq!(reader.read_line().unwrap(), Some(String::new()));
        assert_eq!(reader.read_line().unwrap(), Some(String::new()));
        assert_eq!(reader.read_line().unwrap(), None);
    }

    #[test]
    fn unterminated_final_line_is_returned() {
        let mut reader = LineReader::new(Cursor::new("partial"));
        assert_eq!(reader.read_line().unwrap(), Some("partial".to_string()));
        assert_eq!(reader.read_line().unwrap(), None);
    }

    #[test]
    fn line_longer_than_one_buffer_step_survives_growth() {
        // Well past the initial capacity, with a recognizable pattern so any
        // corruption during growth would show up.
        let long: String = (0..2000).map(|i| (b'a' + (i % 26) as u8) as char).collect();
        let input = format!("{long}\nnext\n");
        let mut reader = LineReader::new(Cursor::new(input));
        assert_eq!(reader.read_line().unwrap(), Some(long));
        assert_eq!(reader.read_line().unwrap(), Some("next".to_string()));
        assert_eq!(reader.read_line().unwrap(), None);
    }

    #[test]
    fn line_exactly_at_the_step_boundary() {
        let long = "x".repeat(LINE_BUFFER_STEP);
        let input = format!("{long}\n");
        let mut reader = LineReader::new(Cursor::new(input));
        assert_eq!(reader.read_line().unwrap(), Some(long));
        assert_eq!(reader.read_line().unwrap(), None);
    }
}
