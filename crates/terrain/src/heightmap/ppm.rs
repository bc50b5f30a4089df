//! Portable pixmap (PPM) files.
//!
//! Writes binary `P6` with a max channel value of 255. Reads `P6` and the ASCII `P3`
//! variant, with `#` comments allowed between header tokens.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::errors::{FormatError, TerrainError};

use super::{Heightmap, Rgb, check_dimensions};

const MAX_CHANNEL: u32 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    Binary,
    Ascii,
}

/// Reads and writes heightmaps as PPM images.
pub struct Ppm;

impl Ppm {
    /// Loads a heightmap from a PPM file.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Heightmap, TerrainError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let image = Self::read(BufReader::new(file))?;
        tracing::debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "loaded heightmap"
        );
        Ok(image)
    }

    /// Reads a heightmap from any byte stream.
    pub fn read(mut reader: impl Read) -> Result<Heightmap, TerrainError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self::load_bytes(&data)?)
    }

    /// Parses a heightmap from PPM data in memory. Bytes after the pixel data are ignored.
    pub fn load_bytes(data: &[u8]) -> Result<Heightmap, FormatError> {
        let mut header = Header { data, pos: 0 };

        let tag = header.token().ok_or(FormatError::TruncatedHeader("format tag"))?;
        let variant = match tag {
            b"P6" => Variant::Binary,
            b"P3" => Variant::Ascii,
            other => {
                return Err(FormatError::UnsupportedTag(
                    String::from_utf8_lossy(other).into_owned(),
                ));
            }
        };

        let width = header.number("width")?;
        let height = header.number("height")?;
        let max_value = header.number("max value")?;

        check_dimensions(width, height)?;
        if max_value == 0 || max_value > 65_535 {
            return Err(FormatError::InvalidHeaderField {
                field: "max value",
                value: max_value.to_string(),
            });
        }
        if max_value as u32 != MAX_CHANNEL {
            return Err(FormatError::UnsupportedMaxValue(max_value as u32));
        }

        let count = width * height;
        let pixels = match variant {
            Variant::Binary => {
                let expected = count * 3;
                let body = binary_body(data, header.pos, expected)?;
                if body.len() < expected {
                    return Err(FormatError::TruncatedBody {
                        expected,
                        found: body.len(),
                    });
                }
                body[..expected]
                    .chunks_exact(3)
                    .map(|c| [c[0], c[1], c[2]])
                    .collect()
            }
            Variant::Ascii => header.ascii_pixels(count)?,
        };

        Heightmap::new(width, height, pixels)
    }

    /// Writes `image` as a binary PPM file, replacing any existing file.
    pub fn write_file(path: impl AsRef<Path>, image: &Heightmap) -> Result<(), TerrainError> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        Self::write(&mut writer, image)?;
        writer.flush()?;
        tracing::debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "wrote heightmap"
        );
        Ok(())
    }

    /// Writes `image` as binary PPM to any byte sink.
    pub fn write(mut writer: impl Write, image: &Heightmap) -> std::io::Result<()> {
        writer.write_all(binary_header(image).as_bytes())?;
        writer.write_all(bytemuck::cast_slice::<Rgb, u8>(image.pixels()))
    }

    /// Encodes `image` as binary PPM bytes.
    pub fn to_bytes(image: &Heightmap) -> Vec<u8> {
        let header = binary_header(image);
        let pixels = bytemuck::cast_slice::<Rgb, u8>(image.pixels());
        let mut out = Vec::with_capacity(header.len() + pixels.len());
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(pixels);
        out
    }
}

fn binary_header(image: &Heightmap) -> String {
    format!("P6\n{} {}\n{}\n", image.width(), image.height(), MAX_CHANNEL)
}

/// Raster bytes following the header token that ends at `pos`.
///
/// One whitespace byte ends the header. A `\r\n` pair is consumed as a single terminator
/// unless that would leave fewer than `expected` bytes.
fn binary_body(data: &[u8], pos: usize, expected: usize) -> Result<&[u8], FormatError> {
    match data.get(pos..).unwrap_or_default() {
        [b'\r', b'\n', body @ ..] if body.len() >= expected => Ok(body),
        [separator, body @ ..] if separator.is_ascii_whitespace() => Ok(body),
        [] => Ok(&[]),
        [other, ..] => Err(FormatError::InvalidHeaderField {
            field: "header terminator",
            value: char::from(*other).to_string(),
        }),
    }
}

/// Cursor over the whitespace-separated header tokens.
struct Header<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Header<'a> {
    fn skip_separators(&mut self) {
        while let Some(&byte) = self.data.get(self.pos) {
            if byte == b'#' {
                while let Some(&c) = self.data.get(self.pos) {
                    if c == b'\n' || c == b'\r' {
                        break;
                    }
                    self.pos += 1;
                }
            } else if byte.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Next token; leaves `pos` on the byte that ended it.
    fn token(&mut self) -> Option<&'a [u8]> {
        self.skip_separators();
        let start = self.pos;
        while let Some(&byte) = self.data.get(self.pos) {
            if byte.is_ascii_whitespace() || byte == b'#' {
                break;
            }
            self.pos += 1;
        }
        (self.pos > start).then(|| &self.data[start..self.pos])
    }

    fn number(&mut self, field: &'static str) -> Result<usize, FormatError> {
        let token = self.token().ok_or(FormatError::TruncatedHeader(field))?;
        std::str::from_utf8(token)
            .ok()
            .filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| FormatError::InvalidHeaderField {
                field,
                value: String::from_utf8_lossy(token).into_owned(),
            })
    }

    fn ascii_pixels(&mut self, count: usize) -> Result<Vec<Rgb>, FormatError> {
        let expected = count * 3;
        let mut channels = Vec::with_capacity(expected);
        while channels.len() < expected {
            let Some(token) = self.token() else {
                return Err(FormatError::TruncatedBody {
                    expected,
                    found: channels.len(),
                });
            };
            let value = std::str::from_utf8(token)
                .ok()
                .and_then(|s| s.parse::<u32>().ok())
                .filter(|&v| v <= MAX_CHANNEL)
                .ok_or_else(|| {
                    FormatError::InvalidSample(String::from_utf8_lossy(token).into_owned())
                })?;
            channels.push(value as u8);
        }
        Ok(channels
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect())
    }
}
