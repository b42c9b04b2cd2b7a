//! Results table assembly and `.npy` persistence.
//!
//! One row per successfully processed frame: `[timestamp, v_0 .. v_{k-1}]`,
//! where `k` is the catalog length. The table is persisted as a NumPy `.npy`
//! v1.0 array (`<f8`, C order) so downstream analysis tooling can load it
//! without any schema negotiation. No crate in our stack speaks `.npy`, so the
//! small v1.0 header codec lives here; the format is stable and fits in a
//! screenful.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use ndarray::Array2;

/// Fixed output filename, written into the input directory after a batch run.
pub const RESULTS_FILE_NAME: &str = "detection_results.npy";

const NPY_MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Accumulator for `(timestamp, presence vector)` rows.
///
/// Column count is fixed at construction from the catalog length, so a
/// zero-row batch still serializes with a well-defined shape `(0, 1 + k)`.
#[derive(Clone, Debug)]
pub struct ResultsTable {
    num_classes: usize,
    num_rows: usize,
    data: Vec<f64>,
}

impl ResultsTable {
    pub fn new(num_classes: usize) -> Self {
        Self {
            num_classes,
            num_rows: 0,
            data: Vec::new(),
        }
    }

    /// Append one row. The vector length must equal the catalog length the
    /// table was constructed with.
    pub fn push(&mut self, timestamp: f64, vector: &[u8]) {
        assert_eq!(
            vector.len(),
            self.num_classes,
            "presence vector width mismatch"
        );
        self.data.push(timestamp);
        self.data.extend(vector.iter().map(|&bit| f64::from(bit)));
        self.num_rows += 1;
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Row width: timestamp column plus one column per catalog class.
    pub fn num_columns(&self) -> usize {
        1 + self.num_classes
    }

    pub fn to_array(&self) -> Array2<f64> {
        Array2::from_shape_vec((self.num_rows, self.num_columns()), self.data.clone())
            .expect("row width is enforced by push")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_npy(path, &self.to_array())
    }
}

/// Write a 2-D f64 array in NumPy `.npy` v1.0 format (little-endian, C order).
pub fn write_npy(path: &Path, array: &Array2<f64>) -> Result<()> {
    let (rows, cols) = array.dim();
    let header_dict = format!(
        "{{'descr': '<f8', 'fortran_order': False, 'shape': ({}, {}), }}",
        rows, cols
    );
    // Pad with spaces so the data section starts on a 64-byte boundary.
    let unpadded = NPY_MAGIC.len() + 2 + 2 + header_dict.len() + 1;
    let padding = (64 - unpadded % 64) % 64;
    let header = format!("{}{}\n", header_dict, " ".repeat(padding));

    let mut file = File::create(path)
        .with_context(|| format!("failed to create table file {}", path.display()))?;
    file.write_all(NPY_MAGIC)?;
    file.write_all(&[0x01, 0x00])?;
    file.write_all(&(header.len() as u16).to_le_bytes())?;
    file.write_all(header.as_bytes())?;
    for value in array.iter() {
        file.write_all(&value.to_le_bytes())?;
    }
    Ok(())
}

/// Read a 2-D f64 `.npy` v1.0 array written by `write_npy` (or NumPy itself).
pub fn read_npy(path: &Path) -> Result<Array2<f64>> {
    let mut raw = Vec::new();
    File::open(path)
        .with_context(|| format!("failed to open table file {}", path.display()))?
        .read_to_end(&mut raw)?;

    if raw.len() < 10 || &raw[..6] != NPY_MAGIC {
        return Err(anyhow!("{} is not an .npy file", path.display()));
    }
    if raw[6] != 0x01 {
        return Err(anyhow!("unsupported .npy version {}.{}", raw[6], raw[7]));
    }
    let header_len = u16::from_le_bytes([raw[8], raw[9]]) as usize;
    let data_start = 10 + header_len;
    if raw.len() < data_start {
        return Err(anyhow!("truncated .npy header in {}", path.display()));
    }
    let header = std::str::from_utf8(&raw[10..data_start])
        .context("malformed .npy header (not ASCII)")?;

    if !header.contains("'<f8'") {
        return Err(anyhow!("expected '<f8' dtype, header was: {}", header.trim()));
    }
    if !header.contains("'fortran_order': False") {
        return Err(anyhow!("Fortran-order arrays are not supported"));
    }
    let (rows, cols) = parse_shape(header)?;

    let expected = rows
        .checked_mul(cols)
        .and_then(|n| n.checked_mul(8))
        .ok_or_else(|| anyhow!("table shape overflows"))?;
    let data = &raw[data_start..];
    if data.len() != expected {
        return Err(anyhow!(
            "table data is {} bytes, shape ({}, {}) requires {}",
            data.len(),
            rows,
            cols,
            expected
        ));
    }

    let values: Vec<f64> = data
        .chunks_exact(8)
        .map(|chunk| {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            f64::from_le_bytes(bytes)
        })
        .collect();

    Array2::from_shape_vec((rows, cols), values).context("table shape mismatch")
}

fn parse_shape(header: &str) -> Result<(usize, usize)> {
    let open = header
        .find('(')
        .ok_or_else(|| anyhow!("no shape tuple in .npy header"))?;
    let close = header[open..]
        .find(')')
        .map(|i| open + i)
        .ok_or_else(|| anyhow!("unterminated shape tuple in .npy header"))?;
    let dims: Vec<usize> = header[open + 1..close]
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<usize>()
                .with_context(|| format!("bad shape dimension {:?}", part))
        })
        .collect::<Result<_>>()?;
    match dims.as_slice() {
        [rows, cols] => Ok((*rows, *cols)),
        other => Err(anyhow!("expected a 2-D table, shape had {} dims", other.len())),
    }
}
