//! Reference container parser
//!
//! A reference file is a small binary container holding zlib-compressed
//! blocks of signal definition text. All integers are big-endian.
//!
//! ```text
//! header text      CR LF
//! serial text      CR LF
//! u16 len, [len]   zlib, serial blob (ignored)
//! u16 count
//! count x (u16 len, [len])   zlib, newline separated signal lines
//! ```
//!
//! ## Error handling
//! - Framing problems (truncated header, length or payload) are fatal
//! - A single entry that fails to decompress is skipped with a warning
//! - Bytes after the last entry produce a warning

use crate::types::{ConverterError, Result, Warning, WarningKind};
use byteorder::{BigEndian, ReadBytesExt};
use flate2::read::ZlibDecoder;
use std::io::{self, BufRead, BufReader, Read};

/// Everything extracted from a reference container
#[derive(Debug, Clone, Default)]
pub struct ContainerContents {
    /// Free-form header text
    pub header: String,
    /// Serial/identification text
    pub serial: String,
    /// Number of entries declared by the container
    pub entry_count: u16,
    /// Non-blank text lines from all readable entries, in order
    pub lines: Vec<String>,
    /// Non-fatal anomalies
    pub warnings: Vec<Warning>,
}

/// Streaming reader for reference containers
pub struct ReferenceReader<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> ReferenceReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }

    /// Read the whole container
    pub fn read_contents(mut self) -> Result<ContainerContents> {
        let mut contents = ContainerContents {
            header: self.read_text_field("header")?,
            ..Default::default()
        };
        contents.serial = self.read_text_field("serial string")?;
        log::debug!("Header: {:?}, serial: {:?}", contents.header, contents.serial);

        let serial_blob = self.read_block("zlib serial block")?;
        match decompress(&serial_blob) {
            Ok(data) => log::debug!("Serial blob: {} bytes decompressed", data.len()),
            Err(e) => log::debug!("Serial blob is not zlib data: {}", e),
        }

        contents.entry_count = self
            .reader
            .read_u16::<BigEndian>()
            .map_err(|e| ConverterError::truncated("total entries count", e))?;
        log::info!("Found {} entries to process", contents.entry_count);

        for index in 1..=usize::from(contents.entry_count) {
            let block = self.read_block(&format!("entry #{}", index))?;

            let data = match decompress(&block) {
                Ok(data) => data,
                Err(e) => {
                    let warning = Warning::for_entry(
                        WarningKind::EntryDecompression,
                        index,
                        e.to_string(),
                    );
                    warning.log();
                    contents.warnings.push(warning);
                    continue;
                }
            };

            let before = contents.lines.len();
            contents.lines.extend(
                decode_text(&data)
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(str::to_string),
            );
            log::debug!(
                "Entry #{}: {} bytes, {} lines",
                index,
                data.len(),
                contents.lines.len() - before
            );
        }

        if self.has_trailing_data()? {
            let warning = Warning::for_container(
                WarningKind::TrailingData,
                "unparsed data after the last entry",
            );
            warning.log();
            contents.warnings.push(warning);
        }

        Ok(contents)
    }

    /// Read a text field up to the CR LF that ends it
    ///
    /// The CR LF is the two-byte delimiter after the field and is consumed
    /// here; it is not part of the returned text. Hitting end of input first
    /// means the delimiter is missing, which is fatal.
    fn read_text_field(&mut self, context: &str) -> Result<String> {
        let mut field = Vec::new();

        loop {
            let read = self
                .reader
                .read_until(b'\n', &mut field)
                .map_err(|e| ConverterError::truncated(context, e))?;

            if read == 0 {
                return Err(ConverterError::truncated(
                    format!("{} delimiter", context),
                    io::Error::new(io::ErrorKind::UnexpectedEof, "missing CR LF"),
                ));
            }

            if field.ends_with(b"\r\n") {
                field.truncate(field.len() - 2);
                return Ok(decode_text(&field));
            }
        }
    }

    /// Read a u16 length-prefixed block
    fn read_block(&mut self, context: &str) -> Result<Vec<u8>> {
        let length = self
            .reader
            .read_u16::<BigEndian>()
            .map_err(|e| ConverterError::truncated(format!("{} length", context), e))?;

        let mut data = vec![0u8; usize::from(length)];
        self.reader.read_exact(&mut data).map_err(|e| {
            ConverterError::truncated(format!("{} data (expected {} bytes)", context, length), e)
        })?;

        Ok(data)
    }

    /// Check whether any byte follows the last entry
    fn has_trailing_data(&mut self) -> Result<bool> {
        loop {
            match self.reader.fill_buf() {
                Ok(buf) => return Ok(!buf.is_empty()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(ConverterError::InvalidContainer(format!(
                        "error while checking for remaining data: {}",
                        e
                    )))
                }
            }
        }
    }
}

/// Inflate one zlib block
fn decompress(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

/// Decode text, trying UTF-8 first and falling back to Latin-1
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            log::trace!("Text is not UTF-8, decoding as Latin-1");
            bytes.iter().map(|&b| b as char).collect()
        }
    }
}
