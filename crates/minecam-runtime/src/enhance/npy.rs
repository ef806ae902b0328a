//! Minimal reader for NumPy `.npy` arrays.
//!
//! Only what LUT files need: little-endian numeric dtypes, any header
//! version, C or Fortran order. Values are returned as `f64` in C order.

use thiserror::Error;

const MAGIC: &[u8] = b"\x93NUMPY";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NpyError {
    #[error("not an .npy file")]
    BadMagic,
    #[error("unsupported .npy version {0}")]
    UnsupportedVersion(u8),
    #[error("file is truncated")]
    Truncated,
    #[error("malformed header: {0}")]
    Header(String),
    #[error("unsupported dtype {0}")]
    UnsupportedDtype(String),
    /// Well-formed array of the wrong dimensions for its use.
    #[error("expected shape {expected:?}, got {actual:?}")]
    Shape {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
}

/// A decoded array.
#[derive(Debug, Clone, PartialEq)]
pub struct NpyArray {
    pub shape: Vec<usize>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Copy)]
enum Dtype {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
}

impl Dtype {
    fn parse(descr: &str) -> Result<Self, NpyError> {
        let (order, code) = descr.split_at(1.min(descr.len()));
        if order == ">" {
            return Err(NpyError::UnsupportedDtype(descr.to_string()));
        }
        if !matches!(order, "<" | "|" | "=") {
            return Err(NpyError::UnsupportedDtype(descr.to_string()));
        }
        Ok(match code {
            "u1" => Self::U8,
            "i1" => Self::I8,
            "u2" => Self::U16,
            "i2" => Self::I16,
            "u4" => Self::U32,
            "i4" => Self::I32,
            "u8" => Self::U64,
            "i8" => Self::I64,
            "f4" => Self::F32,
            "f8" => Self::F64,
            _ => return Err(NpyError::UnsupportedDtype(descr.to_string())),
        })
    }

    const fn size(self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    fn read(self, b: &[u8]) -> f64 {
        match self {
            Self::U8 => f64::from(b[0]),
            Self::I8 => f64::from(b[0] as i8),
            Self::U16 => f64::from(u16::from_le_bytes([b[0], b[1]])),
            Self::I16 => f64::from(i16::from_le_bytes([b[0], b[1]])),
            Self::U32 => f64::from(u32::from_le_bytes([b[0], b[1], b[2], b[3]])),
            Self::I32 => f64::from(i32::from_le_bytes([b[0], b[1], b[2], b[3]])),
            Self::U64 => u64::from_le_bytes(eight(b)) as f64,
            Self::I64 => i64::from_le_bytes(eight(b)) as f64,
            Self::F32 => f64::from(f32::from_le_bytes([b[0], b[1], b[2], b[3]])),
            Self::F64 => f64::from_le_bytes(eight(b)),
        }
    }
}

fn eight(b: &[u8]) -> [u8; 8] {
    let mut out = [0; 8];
    out.copy_from_slice(&b[..8]);
    out
}

/// Parse an `.npy` byte buffer.
pub fn parse(bytes: &[u8]) -> Result<NpyArray, NpyError> {
    if bytes.len() < 10 || &bytes[..6] != MAGIC {
        return Err(NpyError::BadMagic);
    }
    let major = bytes[6];
    let (header_len, header_start) = match major {
        1 => (usize::from(u16::from_le_bytes([bytes[8], bytes[9]])), 10),
        2 | 3 => {
            if bytes.len() < 12 {
                return Err(NpyError::Truncated);
            }
            let len = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
            (len as usize, 12)
        }
        v => return Err(NpyError::UnsupportedVersion(v)),
    };

    let data_start = header_start + header_len;
    let header = bytes
        .get(header_start..data_start)
        .ok_or(NpyError::Truncated)?;
    let header = std::str::from_utf8(header).map_err(|e| NpyError::Header(e.to_string()))?;

    let descr = dict_value(header, "descr")?;
    let descr = descr.trim_matches(|c| c == '\'' || c == '"');
    let dtype = Dtype::parse(descr)?;
    let fortran = dict_value(header, "fortran_order")? == "True";
    let shape = parse_shape(&dict_value(header, "shape")?)?;

    let count: usize = shape.iter().product();
    let needed = count * dtype.size();
    let data = bytes
        .get(data_start..data_start + needed)
        .ok_or(NpyError::Truncated)?;

    let mut values: Vec<f64> = data.chunks_exact(dtype.size()).map(|c| dtype.read(c)).collect();
    if fortran && shape.len() == 2 {
        values = transpose(&values, shape[1], shape[0]);
    }

    Ok(NpyArray { shape, values })
}

/// Convert a column-major `rows x cols` buffer (stored as `cols` runs of
/// `rows`) into row-major order.
fn transpose(values: &[f64], cols: usize, rows: usize) -> Vec<f64> {
    let mut out = vec![0.0; values.len()];
    for c in 0..cols {
        for r in 0..rows {
            out[r * cols + c] = values[c * rows + r];
        }
    }
    out
}

/// Pull the raw text of a key's value out of the header dict literal.
fn dict_value(header: &str, key: &str) -> Result<String, NpyError> {
    let needle_single = format!("'{key}'");
    let needle_double = format!("\"{key}\"");
    let pos = header
        .find(&needle_single)
        .map(|p| p + needle_single.len())
        .or_else(|| header.find(&needle_double).map(|p| p + needle_double.len()))
        .ok_or_else(|| NpyError::Header(format!("missing key {key}")))?;

    let rest = header[pos..].trim_start();
    let rest = rest
        .strip_prefix(':')
        .ok_or_else(|| NpyError::Header(format!("expected ':' after {key}")))?
        .trim_start();

    let end = if rest.starts_with('(') {
        rest.find(')').map(|i| i + 1)
    } else {
        rest.find([',', '}'])
    }
    .ok_or_else(|| NpyError::Header(format!("unterminated value for {key}")))?;

    Ok(rest[..end].trim().to_string())
}

fn parse_shape(text: &str) -> Result<Vec<usize>, NpyError> {
    let inner = text
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .ok_or_else(|| NpyError::Header(format!("bad shape {text}")))?;
    inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.trim_end_matches('L')
                .parse()
                .map_err(|_| NpyError::Header(format!("bad dimension {s}")))
        })
        .collect()
}
