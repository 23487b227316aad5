//! Viewing the plane on a Riemann sphere.  The raster covers the unit
//! square; each point of the unit disc is lifted onto the lower half of
//! a unit sphere, the sphere is turned, and the point is projected from
//! the north pole back to the plane, where the iteration runs.  The
//! angles read as latitude and longitude (increasing westwards).

use num::Complex;

type Matrix = [[f64; 3]; 3];

/// Points whose rotated coordinates come this close to zero lie on one
/// of the three great circles through the axes.
pub const LINE_GRADE: f64 = 0.003;

fn x_rotation(degrees: f64) -> Matrix {
    let (s, c) = degrees.to_radians().sin_cos();
    [[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]]
}

fn z_rotation(degrees: f64) -> Matrix {
    let (s, c) = degrees.to_radians().sin_cos();
    [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]]
}

fn apply(m: &Matrix, v: [f64; 3]) -> [f64; 3] {
    let mut out = [0.0; 3];
    for (row, o) in m.iter().zip(out.iter_mut()) {
        *o = row[0] * v[0] + row[1] * v[1] + row[2] * v[2];
    }
    out
}

/// A point of the disc after projection.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpherePoint {
    /// Where it lands on the plane.
    pub point: Complex<f64>,
    /// Whether it sits on a great circle.
    pub on_grid: bool,
}

/// The rotation and projection for one view of the sphere.
#[derive(Clone, Debug, PartialEq)]
pub struct SphereProjection {
    x_rot: Matrix,
    z_rot: Matrix,
    /// Draw the great circles.
    pub grid_lines: bool,
}

impl SphereProjection {
    /// A view turned by `x_angle` degrees of latitude and `z_angle`
    /// degrees of longitude.
    pub fn new(x_angle: f64, z_angle: f64, grid_lines: bool) -> SphereProjection {
        SphereProjection {
            x_rot: x_rotation(x_angle + 90.0),
            z_rot: z_rotation(z_angle),
            grid_lines,
        }
    }

    /// Project a point of the unit square.  Points outside the unit
    /// disc have no place on the hemisphere and give `None`.
    pub fn project(&self, p: Complex<f64>) -> Option<SpherePoint> {
        let hyp_sqr = p.re * p.re + p.im * p.im;
        if hyp_sqr > 1.0 {
            return None;
        }
        let v = [p.re, p.im, -(1.0 - hyp_sqr).sqrt()];
        let v = apply(&self.z_rot, apply(&self.x_rot, v));
        if v[2] == 1.0 {
            return Some(SpherePoint {
                point: Complex::new(0.0, 0.0),
                on_grid: false,
            });
        }
        let on_grid = v.iter().any(|c| c.abs() < LINE_GRADE);
        Some(SpherePoint {
            point: Complex::new(v[0] / (1.0 - v[2]), v[1] / (1.0 - v[2])),
            on_grid,
        })
    }
}
