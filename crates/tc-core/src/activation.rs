use core::fmt;

use crate::{Error, TilePos};

/// Row-major binary activation plane, one byte per tile, values `0` or `1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationMap {
    height: usize,
    width: usize,
    data: Vec<u8>,
}

impl ActivationMap {
    /// All-inactive plane.
    pub fn new(height: usize, width: usize) -> Self {
        let len = height.checked_mul(width).expect("activation map size overflow");
        Self {
            height,
            width,
            data: vec![0; len],
        }
    }

    pub fn from_vec(height: usize, width: usize, data: Vec<u8>) -> Result<Self, Error> {
        if height.checked_mul(width) != Some(data.len()) {
            return Err(Error::SizeMismatch {
                expected: height.saturating_mul(width),
                actual: data.len(),
            });
        }

        if let Some(i) = data.iter().position(|&v| v > 1) {
            return Err(Error::InvalidActivation {
                value: data[i],
                pos: TilePos::new(i / width, i % width),
            });
        }

        Ok(Self {
            height,
            width,
            data,
        })
    }

    /// Builds a plane from equally long rows.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, Error> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());

        let mut data = Vec::with_capacity(height * width);
        for r in rows {
            let r = r.as_ref();
            if r.len() != width {
                return Err(Error::ShapeMismatch {
                    expected: (height, width),
                    actual: (height, r.len()),
                });
            }
            data.extend_from_slice(r);
        }

        Self::from_vec(height, width, data)
    }

    /// Parses a text fixture: `#` or `1` is active, `.` or `0` inactive.
    /// Blank lines and surrounding whitespace are ignored.
    ///
    /// Any other character is reported as an invalid activation.
    pub fn from_ascii(text: &str) -> Result<Self, Error> {
        let mut rows = Vec::new();
        for (row, line) in text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .enumerate()
        {
            let mut out = Vec::with_capacity(line.len());
            for (col, ch) in line.chars().enumerate() {
                let v = match ch {
                    '#' | '1' => 1,
                    '.' | '0' => 0,
                    other => {
                        return Err(Error::InvalidActivation {
                            value: u8::try_from(other).unwrap_or(u8::MAX),
                            pos: TilePos::new(row, col),
                        });
                    }
                };
                out.push(v);
            }
            rows.push(out);
        }

        Self::from_rows(&rows)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// `(height, width)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn row(&self, r: usize) -> &[u8] {
        assert!(r < self.height, "row index out of bounds");
        let start = r * self.width;
        &self.data[start..start + self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        (0..self.height).map(move |r| self.row(r))
    }

    pub fn get(&self, pos: TilePos) -> Option<u8> {
        if pos.row >= self.height || pos.col >= self.width {
            return None;
        }
        self.data.get(pos.row * self.width + pos.col).copied()
    }

    pub fn is_active(&self, pos: TilePos) -> bool {
        self.get(pos) == Some(1)
    }

    pub fn set(&mut self, pos: TilePos, active: bool) -> Result<(), Error> {
        if pos.row >= self.height || pos.col >= self.width {
            return Err(Error::OutOfBounds {
                pos,
                height: self.height,
                width: self.width,
            });
        }
        self.data[pos.row * self.width + pos.col] = u8::from(active);
        Ok(())
    }

    pub fn count_active(&self) -> usize {
        self.data.iter().filter(|&&v| v == 1).count()
    }

    /// Active tile positions in row-major order.
    pub fn iter_active(&self) -> impl Iterator<Item = TilePos> + '_ {
        let w = self.width;
        self.data
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == 1)
            .map(move |(i, _)| TilePos::new(i / w, i % w))
    }
}

impl fmt::Display for ActivationMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for &v in row {
                f.write_str(if v == 1 { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
