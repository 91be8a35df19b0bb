//! Binary image header sniffing.
//!
//! Identifies JPEG/PNG/WebP by magic bytes and reads dimensions straight
//! out of the header layout, without decoding any pixel data.
//!
//! Known limitations, kept deliberately narrow: only the baseline JPEG
//! start-of-frame marker (`FF C0`) is scanned, so progressive JPEGs
//! (`FF C2`) stay unresolved; only the simple lossy `VP8 ` WebP chunk is
//! parsed, so VP8L/VP8X stay unresolved. Unresolved dimensions read as
//! `(0, 0)`, which scores zero downstream -- a safe degradation, not an
//! error.

/// Image formats this sniffer can identify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SniffedFormat {
    Jpeg,
    Png,
    Webp,
}

/// Identify the format from its magic prefix, if recognized.
pub fn detect_format(buf: &[u8]) -> Option<SniffedFormat> {
    if buf.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some(SniffedFormat::Jpeg)
    } else if buf.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        Some(SniffedFormat::Png)
    } else if buf.len() >= 12 && buf.starts_with(b"RIFF") && &buf[8..12] == b"WEBP" {
        Some(SniffedFormat::Webp)
    } else {
        None
    }
}

/// Width and height from the header, or `(0, 0)` when unresolved.
/// Total function: no input can make it panic.
pub fn dimensions(buf: &[u8]) -> (u32, u32) {
    match detect_format(buf) {
        Some(SniffedFormat::Jpeg) => jpeg_dimensions(buf),
        Some(SniffedFormat::Png) => png_dimensions(buf),
        Some(SniffedFormat::Webp) => webp_dimensions(buf),
        None => (0, 0),
    }
}

fn be_u16(hi: u8, lo: u8) -> u32 {
    u32::from(u16::from_be_bytes([hi, lo]))
}

/// Scan for the baseline SOF0 marker; height and width are big-endian
/// 16-bit values at fixed offsets behind it.
fn jpeg_dimensions(buf: &[u8]) -> (u32, u32) {
    let mut i = 2;
    while i + 9 <= buf.len() {
        if buf[i] == 0xFF && buf[i + 1] == 0xC0 {
            let height = be_u16(buf[i + 5], buf[i + 6]);
            let width = be_u16(buf[i + 7], buf[i + 8]);
            return (width, height);
        }
        i += 1;
    }
    (0, 0)
}

/// IHDR is the first chunk of a well-formed PNG, so width and height
/// sit at fixed offsets 16 and 20.
fn png_dimensions(buf: &[u8]) -> (u32, u32) {
    if buf.len() < 24 {
        return (0, 0);
    }
    let width = u32::from_be_bytes([buf[16], buf[17], buf[18], buf[19]]);
    let height = u32::from_be_bytes([buf[20], buf[21], buf[22], buf[23]]);
    (width, height)
}

/// Locate the simple lossy `VP8 ` chunk tag near the front of the file;
/// width and height are little-endian 14-bit values behind it.
fn webp_dimensions(buf: &[u8]) -> (u32, u32) {
    let end = buf.len().min(30);
    let mut i = 12;
    while i + 4 <= end {
        if &buf[i..i + 4] == b"VP8 " {
            if i + 10 > buf.len() {
                return (0, 0);
            }
            let width = u32::from(u16::from_le_bytes([buf[i + 6], buf[i + 7]])) & 0x3FFF;
            let height = u32::from(u16::from_le_bytes([buf[i + 8], buf[i + 9]])) & 0x3FFF;
            return (width, height);
        }
        i += 1;
    }
    (0, 0)
}
