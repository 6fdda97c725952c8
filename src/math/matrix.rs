use rand::prelude::*;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;
use std::ops::{Add, Sub, Mul};

/// Row-major 2-D array of `f64`; rows are samples, columns are classes,
/// outputs or neurons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// `n × n` identity; row `i` is the one-hot encoding of class `i`.
    pub fn identity(n: usize) -> Matrix {
        let mut res = Matrix::zeros(n, n);
        for i in 0..n {
            res.data[i][i] = 1.0;
        }
        res
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal(rng: &mut ThreadRng) -> f64 {
        // (0, 1] keeps ln() finite.
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    fn normal(rows: usize, cols: usize, std_dev: f64) -> Matrix {
        let mut rng = rand::thread_rng();
        let mut res = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = Matrix::sample_standard_normal(&mut rng) * std_dev;
            }
        }
        res
    }

    /// He initialization: N(0, sqrt(2 / rows)).
    ///
    /// Weights are stored as (fan_in, fan_out) so that a batch is multiplied
    /// on the left (`inputs · W`); `rows` is therefore the fan-in.
    pub fn he(rows: usize, cols: usize) -> Matrix {
        Matrix::normal(rows, cols, (2.0 / rows as f64).sqrt())
    }

    /// Xavier (Glorot) initialization: N(0, sqrt(1 / rows)).
    pub fn xavier(rows: usize, cols: usize) -> Matrix {
        Matrix::normal(rows, cols, (1.0 / rows as f64).sqrt())
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Element-wise combination of two same-shape matrices.
    pub fn zip_map<F>(&self, other: &Matrix, functor: F) -> Matrix
    where
        F: Fn(f64, f64) -> f64,
    {
        assert_eq!(self.shape(), other.shape(), "Matrices are of incorrect sizes");
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(other.data.iter())
                .map(|(a, b)| a.iter().zip(b.iter()).map(|(&x, &y)| functor(x, y)).collect())
                .collect(),
        }
    }

    /// Element-wise (Hadamard) product.
    pub fn hadamard(&self, other: &Matrix) -> Matrix {
        self.zip_map(other, |x, y| x * y)
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Bounds every element into `[lo, hi]`.
    pub fn clip(&self, lo: f64, hi: f64) -> Matrix {
        self.map(|x| x.clamp(lo, hi))
    }

    /// Adds a `1 × cols` row vector to every row.
    pub fn add_row(&self, row: &Matrix) -> Matrix {
        assert!(row.rows == 1 && row.cols == self.cols, "Matrices are of incorrect sizes");
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter()
                .map(|r| r.iter().zip(row.data[0].iter()).map(|(x, b)| x + b).collect())
                .collect(),
        }
    }

    /// Column sums as a `1 × cols` row vector.
    pub fn sum_rows(&self) -> Matrix {
        let mut res = Matrix::zeros(1, self.cols);
        for row in &self.data {
            for (acc, x) in res.data[0].iter_mut().zip(row.iter()) {
                *acc += x;
            }
        }
        res
    }

    /// Gathers the given rows, in order, into a new matrix.
    pub fn select_rows(&self, indices: &[usize]) -> Matrix {
        Matrix {
            rows: indices.len(),
            cols: self.cols,
            data: indices.iter().map(|&i| self.data[i].clone()).collect(),
        }
    }

    /// Column index of the largest value in each row; the first one wins on ties.
    pub fn argmax_rows(&self) -> Vec<usize> {
        self.data.iter()
            .map(|row| {
                let mut best = 0;
                for (j, &x) in row.iter().enumerate() {
                    if x > row[best] {
                        best = j;
                    }
                }
                best
            })
            .collect()
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().map(|row| row.iter().sum::<f64>()).sum()
    }

    pub fn sum_abs(&self) -> f64 {
        self.data.iter().map(|row| row.iter().map(|x| x.abs()).sum::<f64>()).sum()
    }

    pub fn sum_squares(&self) -> f64 {
        self.data.iter().map(|row| row.iter().map(|x| x * x).sum::<f64>()).sum()
    }

    /// Builds a matrix from row vectors. Panics on ragged rows.
    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        let cols = data.first().map_or(0, Vec::len);
        assert!(data.iter().all(|row| row.len() == cols), "Rows must have equal length");
        Matrix {
            rows: data.len(),
            cols,
            data
        }
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl Add for Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Self::Output {
        self.zip_map(&rhs, |x, y| x + y)
    }
}

impl Sub for Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        self.zip_map(&rhs, |x, y| x - y)
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.cols != rhs.rows {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res =  Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        res
    }
}
