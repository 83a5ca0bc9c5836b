use ndarray::{Array2, ArrayView2, Zip};

use super::error::CursorError;

/// An elliptical cursor on the phasor plot.
///
/// Selects every pixel whose (G, S) coordinate falls inside the ellipse, so a region
/// of the phasor plot can be mapped back onto the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhasorCursor {
    center_real: f64,
    center_imag: f64,
    radius_real: f64,
    radius_imag: f64,
}

impl PhasorCursor {
    /// Create a new cursor. Both radii must be positive and finite.
    pub fn new(
        center_real: f64,
        center_imag: f64,
        radius_real: f64,
        radius_imag: f64,
    ) -> Result<Self, CursorError> {
        let valid = |r: f64| r.is_finite() && r > 0.0;
        if !valid(radius_real) || !valid(radius_imag) {
            return Err(CursorError::InvalidRadius(radius_real, radius_imag));
        }
        Ok(Self {
            center_real,
            center_imag,
            radius_real,
            radius_imag,
        })
    }

    /// A circular cursor
    pub fn circle(center_real: f64, center_imag: f64, radius: f64) -> Result<Self, CursorError> {
        Self::new(center_real, center_imag, radius, radius)
    }

    /// Check if a single phasor is inside the cursor. Sentinel phasors never are.
    pub fn contains(&self, g: f64, s: f64) -> bool {
        let dg = (g - self.center_real) / self.radius_real;
        let ds = (s - self.center_imag) / self.radius_imag;
        // NaN compares false
        dg * dg + ds * ds <= 1.0
    }

    /// Boolean mask of the pixels inside the cursor
    pub fn mask(
        &self,
        real: ArrayView2<f64>,
        imag: ArrayView2<f64>,
    ) -> Result<Array2<bool>, CursorError> {
        if real.shape() != imag.shape() {
            return Err(CursorError::ShapeMismatch(
                real.shape().to_vec(),
                imag.shape().to_vec(),
            ));
        }
        Ok(Zip::from(&real)
            .and(&imag)
            .map_collect(|&g, &s| self.contains(g, s)))
    }

    /// Indices (row, column) of the pixels inside the cursor, in row-major order
    pub fn pixels(
        &self,
        real: ArrayView2<f64>,
        imag: ArrayView2<f64>,
    ) -> Result<Vec<(usize, usize)>, CursorError> {
        let mask = self.mask(real, imag)?;
        Ok(mask
            .indexed_iter()
            .filter_map(|(idx, &inside)| if inside { Some(idx) } else { None })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_circle_selection() {
        let cursor = PhasorCursor::circle(0.5, 0.3, 0.1).unwrap();
        let real = array![[0.5, 0.55, 0.9], [f64::NAN, 0.41, 0.5]];
        let imag = array![[0.3, 0.35, 0.3], [0.3, 0.3, 0.41]];
        let mask = cursor.mask(real.view(), imag.view()).unwrap();
        assert_eq!(mask, array![[true, true, false], [false, true, false]]);

        let pixels = cursor.pixels(real.view(), imag.view()).unwrap();
        assert_eq!(pixels, vec![(0, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn test_ellipse_axes() {
        let cursor = PhasorCursor::new(0.0, 0.0, 0.5, 0.1).unwrap();
        assert!(cursor.contains(0.45, 0.0));
        assert!(!cursor.contains(0.0, 0.2));
        assert!(!cursor.contains(f64::NAN, 0.0));
    }

    #[test]
    fn test_invalid_cursor() {
        assert!(PhasorCursor::circle(0.5, 0.3, 0.0).is_err());
        assert!(PhasorCursor::new(0.5, 0.3, 0.1, f64::NAN).is_err());
        let cursor = PhasorCursor::circle(0.5, 0.3, 0.1).unwrap();
        let a = array![[0.5]];
        let b = array![[0.5, 0.5]];
        assert_eq!(
            cursor.mask(a.view(), b.view()).unwrap_err(),
            CursorError::ShapeMismatch(vec![1, 1], vec![1, 2])
        );
    }
}
