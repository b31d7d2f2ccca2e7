//! Dense row-major matrix.
//!
//! Dimensions are fixed at construction. Shape preconditions follow the same
//! two-flavour scheme as [`Vector`]: `try_*` returns [`Checked`], the operators
//! and plain methods log and return the fallback.
//!
//! Fallbacks on mismatch:
//! - `+` / `-`: the left operand unchanged
//! - `matmul`: an empty `0x0` matrix
//! - `mul_vec`: a zero vector of length `rows`

use std::fmt;
use std::ops::{Add, Mul, Sub};

use num_traits::{Num, One, Zero};

use crate::error::{Checked, Degraded, Shape, ShapeMismatch, degrade};
use crate::kernel::gemm;
use crate::{Error, Result, Vector};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    /// Row-major, `rows * cols` elements.
    data: Vec<T>,
}

impl<T: Copy> Matrix<T> {
    pub(crate) fn from_raw(rows: usize, cols: usize, data: Vec<T>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { rows, cols, data }
    }

    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self::from_raw(rows, cols, vec![value; rows * cols])
    }

    /// Build from a row-major buffer.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        let expected = rows
            .checked_mul(cols)
            .ok_or_else(|| Error::InvalidData("matrix shape overflow".to_owned()))?;
        if data.len() != expected {
            return Err(Error::InvalidData(format!(
                "buffer length {} does not match {rows}x{cols}",
                data.len()
            )));
        }
        Ok(Self::from_raw(rows, cols, data))
    }

    /// Build from per-row slices; every row must have the same length.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(Error::InvalidData(format!(
                    "row {i} has len {}, expected {cols}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self::from_raw(rows.len(), cols, data))
    }

    /// Square `size x size` matrix filled with `value`.
    pub fn square_filled(size: usize, value: T) -> Self {
        Self::filled(size, size, value)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        Shape::Matrix(self.rows, self.cols)
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Element at `(row, col)`, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::OutOfBounds(format!(
                "index ({row}, {col}) out of range for {}x{} matrix",
                self.rows, self.cols
            )));
        }
        self.data[row * self.cols + col] = value;
        Ok(())
    }

    /// Copy of row `idx`.
    pub fn row(&self, idx: usize) -> Option<Vector<T>> {
        if idx >= self.rows {
            return None;
        }
        let start = idx * self.cols;
        Some(Vector::from_slice(&self.data[start..start + self.cols]))
    }

    /// Copy of column `idx`.
    pub fn col(&self, idx: usize) -> Option<Vector<T>> {
        if idx >= self.cols {
            return None;
        }
        Some(Vector::from_vec(
            self.data.iter().skip(idx).step_by(self.cols).copied().collect(),
        ))
    }

    pub fn set_row(&mut self, idx: usize, row: &Vector<T>) -> Result<()> {
        if idx >= self.rows {
            return Err(Error::OutOfBounds(format!(
                "row {idx} out of range for {} rows",
                self.rows
            )));
        }
        if row.len() != self.cols {
            return Err(ShapeMismatch::new("set_row", self.shape(), row.shape()).into());
        }
        let start = idx * self.cols;
        self.data[start..start + self.cols].copy_from_slice(row.as_slice());
        Ok(())
    }

    pub fn set_col(&mut self, idx: usize, col: &Vector<T>) -> Result<()> {
        if idx >= self.cols {
            return Err(Error::OutOfBounds(format!(
                "column {idx} out of range for {} columns",
                self.cols
            )));
        }
        if col.len() != self.rows {
            return Err(ShapeMismatch::new("set_col", self.shape(), col.shape()).into());
        }
        for (r, &v) in col.iter().enumerate() {
            self.data[r * self.cols + idx] = v;
        }
        Ok(())
    }

    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for c in 0..self.cols {
            data.extend(self.data.iter().skip(c).step_by(self.cols).copied());
        }
        Self::from_raw(self.cols, self.rows, data)
    }
}

impl<T: Copy + Zero> Matrix<T> {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, T::zero())
    }

    /// Zero-filled `size x size` matrix.
    pub fn square(size: usize) -> Self {
        Self::zeros(size, size)
    }

    /// The `0x0` matrix returned by failed products.
    pub fn empty() -> Self {
        Self::from_raw(0, 0, Vec::new())
    }
}

impl<T: Copy + Zero + PartialEq> Matrix<T> {
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|v| *v == T::zero())
    }
}

impl<T: Copy + Zero + One> Matrix<T> {
    pub fn identity(size: usize) -> Self {
        let mut m = Self::square(size);
        for i in 0..size {
            m.data[i * size + i] = T::one();
        }
        m
    }
}

impl<T: Copy + Num> Matrix<T> {
    pub fn scale(&self, scalar: T) -> Self {
        Self::from_raw(
            self.rows,
            self.cols,
            self.data.iter().map(|&v| v * scalar).collect(),
        )
    }

    fn elementwise(&self, op: &'static str, other: &Self, f: impl Fn(T, T) -> T) -> Checked<Self> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(Degraded::new(
                self.clone(),
                ShapeMismatch::new(op, self.shape(), other.shape()),
            ));
        }
        Ok(Self::from_raw(
            self.rows,
            self.cols,
            self.data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        ))
    }

    pub fn try_add(&self, other: &Self) -> Checked<Self> {
        self.elementwise("add", other, |a, b| a + b)
    }

    pub fn try_sub(&self, other: &Self) -> Checked<Self> {
        self.elementwise("sub", other, |a, b| a - b)
    }

    /// Matrix product; requires `self.cols == other.rows`.
    pub fn try_matmul(&self, other: &Self) -> Checked<Self> {
        if self.cols != other.rows {
            return Err(Degraded::new(
                Self::empty(),
                ShapeMismatch::new("matmul", self.shape(), other.shape()),
            ));
        }
        let mut out = Self::zeros(self.rows, other.cols);
        gemm(
            self.rows,
            other.cols,
            self.cols,
            &self.data,
            self.cols,
            1,
            &other.data,
            other.cols,
            1,
            &mut out.data,
            other.cols,
            1,
        );
        Ok(out)
    }

    pub fn matmul(&self, other: &Self) -> Self {
        degrade(self.try_matmul(other))
    }

    /// Matrix–vector product; requires `self.cols == vec.len()`.
    pub fn try_mul_vec(&self, vec: &Vector<T>) -> Checked<Vector<T>> {
        if self.cols != vec.len() {
            return Err(Degraded::new(
                Vector::zeros(self.rows),
                ShapeMismatch::new("mul_vec", self.shape(), vec.shape()),
            ));
        }
        let mut out = Vector::zeros(self.rows);
        gemm(
            self.rows,
            1,
            self.cols,
            &self.data,
            self.cols,
            1,
            vec.as_slice(),
            1,
            1,
            out.as_mut_slice(),
            1,
            1,
        );
        Ok(out)
    }

    pub fn mul_vec(&self, vec: &Vector<T>) -> Vector<T> {
        degrade(self.try_mul_vec(vec))
    }
}

impl<T: Copy + Num> Add for &Matrix<T> {
    type Output = Matrix<T>;

    fn add(self, rhs: Self) -> Matrix<T> {
        degrade(self.try_add(rhs))
    }
}

impl<T: Copy + Num> Sub for &Matrix<T> {
    type Output = Matrix<T>;

    fn sub(self, rhs: Self) -> Matrix<T> {
        degrade(self.try_sub(rhs))
    }
}

impl<T: Copy + Num> Mul for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: Self) -> Matrix<T> {
        self.matmul(rhs)
    }
}

impl<T: Copy + Num> Mul<&Vector<T>> for &Matrix<T> {
    type Output = Vector<T>;

    fn mul(self, rhs: &Vector<T>) -> Vector<T> {
        self.mul_vec(rhs)
    }
}

impl<T: fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for r in 0..self.rows {
            if r > 0 {
                f.write_str(",\n ")?;
            }
            f.write_str("[")?;
            for c in 0..self.cols {
                if c > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", self.data[r * self.cols + c])?;
            }
            f.write_str("]")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix<f32> {
        Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap()
    }

    #[test]
    fn constructors_and_bounds() {
        let a = Matrix::<f32>::zeros(3, 2);
        assert_eq!((a.rows(), a.cols()), (3, 2));
        assert!(a.is_zero());
        assert!(!a.is_square());

        let b = Matrix::filled(2, 3, 1.0_f32);
        assert!(!b.is_zero());
        assert_ne!(a, b);
        assert_eq!(b.clone(), b);

        let mut m = sample();
        assert_eq!(m.get(1, 2), Some(6.0));
        assert_eq!(m.get(2, 0), None);
        assert!(m.set(0, 3, 1.0).is_err());
        m.set(0, 0, 3.5).unwrap();
        assert_eq!(m.get(0, 0), Some(3.5));

        assert!(Matrix::from_vec(2, 2, vec![1.0_f32; 3]).is_err());
        assert!(Matrix::from_rows(&[vec![1.0_f32, 2.0], vec![3.0]]).is_err());
    }

    #[test]
    fn square_helpers_enforce_shape() {
        let d = Matrix::<f32>::square(2);
        assert!(d.is_square() && d.is_zero());

        let e = Matrix::square_filled(2, 5.0_f32);
        assert!(e.is_square());
        assert_eq!(e.get(1, 1), Some(5.0));

        let i = Matrix::<i32>::identity(3);
        assert_eq!(i.as_slice(), &[1, 0, 0, 0, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn rows_and_columns() {
        let mut m = sample();
        assert_eq!(m.row(1), Some(Vector::from_slice(&[4.0, 5.0, 6.0])));
        assert_eq!(m.col(2), Some(Vector::from_slice(&[3.0, 6.0])));
        assert_eq!(m.row(2), None);
        assert_eq!(m.col(3), None);

        m.set_row(0, &Vector::from_slice(&[7.0, 8.0, 9.0])).unwrap();
        m.set_col(1, &Vector::from_slice(&[0.0, -1.0])).unwrap();
        assert_eq!(m.as_slice(), &[7.0, 0.0, 9.0, 4.0, -1.0, 6.0]);

        assert!(m.set_row(0, &Vector::zeros(2)).is_err());
        assert!(matches!(m.set_col(5, &Vector::zeros(2)), Err(Error::OutOfBounds(_))));
    }

    #[test]
    fn transpose_twice_is_identity() {
        let m = sample();
        let t = m.transpose();
        assert_eq!((t.rows(), t.cols()), (3, 2));
        assert_eq!(t.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(t.transpose(), m);

        let empty_cols = Matrix::<f32>::zeros(3, 0);
        assert_eq!(empty_cols.transpose().transpose(), empty_cols);
    }

    #[test]
    fn add_sub_and_scale() {
        let g = Matrix::from_rows(&[[1.0_f32, 2.0], [3.0, 4.0]]).unwrap();
        let h = g.scale(2.0);
        assert_eq!(h.as_slice(), &[2.0, 4.0, 6.0, 8.0]);

        let i = &h + &g;
        assert_eq!(i.as_slice(), &[3.0, 6.0, 9.0, 12.0]);
        assert_eq!(&i - &g, h);
        assert_eq!(&(&g + &h) - &h, g);
    }

    #[test]
    fn mismatched_add_returns_left_operand() {
        let a = sample();
        let b = Matrix::<f32>::zeros(3, 2);
        assert_eq!(&a + &b, a);
        assert_eq!(&a - &b, a);
        let err = a.try_sub(&b).unwrap_err();
        assert_eq!(err.mismatch().op, "sub");
        assert_eq!(err.value(), &a);
    }

    #[test]
    fn matmul_and_identity() {
        let g = Matrix::from_rows(&[[1.0_f32, 2.0], [3.0, 4.0]]).unwrap();
        let j = Matrix::from_rows(&[[2.0_f32, 0.0], [1.0, 2.0]]).unwrap();
        assert_eq!((&g * &j).as_slice(), &[4.0, 4.0, 10.0, 8.0]);

        let m = sample();
        assert_eq!(&m * &Matrix::identity(3), m);
        assert_eq!(&Matrix::identity(2) * &m, m);
    }

    #[test]
    fn incompatible_matmul_is_empty() {
        let a = sample();
        let out = &a * &a;
        assert_eq!((out.rows(), out.cols()), (0, 0));
        assert_eq!(out, Matrix::empty());

        let err = a.try_matmul(&a).unwrap_err();
        assert_eq!(err.mismatch().left, Shape::Matrix(2, 3));
        assert_eq!(err.mismatch().right, Shape::Matrix(2, 3));
    }

    #[test]
    fn matrix_vector_product() {
        let g = Matrix::from_rows(&[[1.0_f32, 2.0], [3.0, 4.0]]).unwrap();
        let v = Vector::from_slice(&[1.0_f32, 2.0]);
        assert_eq!((&g * &v).as_slice(), &[5.0, 11.0]);

        let wrong = Vector::from_slice(&[1.0_f32, 2.0, 3.0]);
        assert_eq!(g.mul_vec(&wrong), Vector::zeros(2));
        assert_eq!(g.try_mul_vec(&wrong).unwrap_err().mismatch().op, "mul_vec");
    }

    #[test]
    fn display_nests_rows() {
        let g = Matrix::from_rows(&[[1.0_f32, 2.0], [3.0, 4.5]]).unwrap();
        assert_eq!(g.to_string(), "[[1, 2],\n [3, 4.5]]");
    }
}
