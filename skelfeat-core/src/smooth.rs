//! Temporal smoothing of joint trajectories
//!
//! ## Method
//!
//! Savitzky–Golay filtering: each (joint, coordinate) channel is replaced
//! by a local least-squares polynomial fit of degree P evaluated at every
//! sample inside a sliding window of odd length W. Interior samples use
//! the centered window; the first and last W/2 samples reuse the first and
//! last full window's fit, evaluated at the sample's own offset, so the
//! output always has the input's length. A degree-P fit reproduces any
//! polynomial of degree ≤ P exactly, which is what makes this smoothing
//! rather than resampling: constants and linear ramps pass through
//! untouched while per-frame jitter is averaged away.
//!
//! ## Numerics
//!
//! The projection weights are precomputed once per filter from the normal
//! equations of the window's Vandermonde system; all per-sample work is a
//! dot product in f64. Precision narrows back to f32 only at the
//! trajectory boundary, never inside the fit.
//!
//! Trajectories shorter than the window are refused
//! ([`FilterError::InsufficientLength`]); callers pre-filter on length
//! instead of receiving a silently degraded window.

use ndarray::Array3;

use crate::errors::FilterError;
use crate::topology::Trajectory;

/// Savitzky–Golay smoother over the time axis of a trajectory.
#[derive(Debug, Clone)]
pub struct TemporalSmoother {
    window: usize,
    order: usize,
    /// `window × window` projection matrix: row r holds the weights that
    /// evaluate the window's least-squares fit at offset r.
    weights: Vec<Vec<f64>>,
}

impl TemporalSmoother {
    /// Build a smoother with window length `window` and polynomial order
    /// `order`.
    ///
    /// The window must be odd and strictly greater than the order.
    pub fn new(window: usize, order: usize) -> Result<Self, FilterError> {
        if window % 2 == 0 {
            return Err(FilterError::EvenWindow { window });
        }
        if order >= window {
            return Err(FilterError::OrderTooHigh { order, window });
        }
        let weights =
            projection_matrix(window, order).ok_or(FilterError::IllConditioned { window, order })?;
        Ok(Self {
            window,
            order,
            weights,
        })
    }

    /// Configured window length.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Configured polynomial order.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Smooth every (joint, coordinate) channel of `trajectory`.
    ///
    /// The output has identical shape and topology. Fails with
    /// [`FilterError::InsufficientLength`] when the trajectory has fewer
    /// frames than the window.
    pub fn smooth(&self, trajectory: &Trajectory) -> Result<Trajectory, FilterError> {
        let frames = trajectory.frames();
        if frames < self.window {
            return Err(FilterError::InsufficientLength {
                frames,
                window: self.window,
            });
        }

        let data = trajectory.data();
        let joints = trajectory.topology().len();
        let mut out = Array3::zeros(data.raw_dim());
        let mut channel = vec![0.0f64; frames];
        let mut smoothed = vec![0.0f64; frames];

        for joint in 0..joints {
            for axis in 0..3 {
                for frame in 0..frames {
                    channel[frame] = f64::from(data[[frame, joint, axis]]);
                }
                self.smooth_channel(&channel, &mut smoothed);
                for frame in 0..frames {
                    out[[frame, joint, axis]] = smoothed[frame] as f32;
                }
            }
        }

        Ok(Trajectory::from_parts(trajectory.topology().clone(), out))
    }

    fn smooth_channel(&self, src: &[f64], dst: &mut [f64]) {
        let len = src.len();
        let window = self.window;
        let half = window / 2;

        for i in 0..len {
            // Interior samples center the window; the two edges reuse the
            // first/last full window, evaluated at the sample's offset.
            let (row, start) = if i < half {
                (i, 0)
            } else if i + half >= len {
                (window - (len - i), len - window)
            } else {
                (half, i - half)
            };
            let weights = &self.weights[row];
            let mut acc = 0.0;
            for (k, &w) in weights.iter().enumerate() {
                acc += w * src[start + k];
            }
            dst[i] = acc;
        }
    }
}

/// Least-squares projection matrix `A (AᵀA)⁻¹ Aᵀ` for a window of sample
/// offsets `-half ‥ half` and a polynomial basis of degree `order`.
fn projection_matrix(window: usize, order: usize) -> Option<Vec<Vec<f64>>> {
    let half = (window / 2) as isize;
    let cols = order + 1;

    // Vandermonde matrix over the window's offsets.
    let vander: Vec<Vec<f64>> = (0..window)
        .map(|i| {
            let t = (i as isize - half) as f64;
            (0..cols).map(|k| t.powi(k as i32)).collect()
        })
        .collect();

    // Normal matrix AᵀA, symmetric positive definite for window > order.
    let mut normal = vec![vec![0.0f64; cols]; cols];
    for r in 0..cols {
        for c in 0..cols {
            normal[r][c] = (0..window).map(|i| vander[i][r] * vander[i][c]).sum();
        }
    }
    let inverse = invert(normal)?;

    let mut projection = vec![vec![0.0f64; window]; window];
    for i in 0..window {
        for j in 0..window {
            let mut acc = 0.0;
            for r in 0..cols {
                for c in 0..cols {
                    acc += vander[i][r] * inverse[r][c] * vander[j][c];
                }
            }
            projection[i][j] = acc;
        }
    }
    Some(projection)
}

/// Gauss–Jordan inversion with partial pivoting, sized for the tiny
/// normal matrices of the fit (order + 1 ≤ window).
fn invert(mut m: Vec<Vec<f64>>) -> Option<Vec<Vec<f64>>> {
    let n = m.len();
    let mut inv = vec![vec![0.0f64; n]; n];
    for (i, row) in inv.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&a, &b| m[a][col].abs().total_cmp(&m[b][col].abs()))?;
        if m[pivot_row][col].abs() < f64::EPSILON {
            return None;
        }
        m.swap(col, pivot_row);
        inv.swap(col, pivot_row);

        let pivot = m[col][col];
        for k in 0..n {
            m[col][k] /= pivot;
            inv[col][k] /= pivot;
        }
        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = m[row][col];
            if factor == 0.0 {
                continue;
            }
            for k in 0..n {
                m[row][k] -= factor * m[col][k];
                inv[row][k] -= factor * inv[col][k];
            }
        }
    }
    Some(inv)
}
