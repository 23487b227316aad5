//! The iteration kernels.  Every pixel-per-value fractal here is the
//! same loop: apply a transition to a state up to some budget, test an
//! exit condition after every step, and report when (and how) the loop
//! stopped.  What varies is the transition and the test, so those are
//! the variants below; the loop itself is `iterate`.

use num::Complex;

use crate::math::{dist_sqr, is_degenerate, nudge_from_origin, powf, powu};

/// How a bounded iteration ended.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Exit<S> {
    /// The exit test held after step `.0` (counting from zero), with
    /// the state at that step.
    At(usize, S),
    /// The budget ran out first.  Carries the final state.
    Exhausted(S),
}

/// Apply `step` to `state` at most `max_iter` times, stopping at the
/// first state for which `exit` holds.
#[inline]
pub fn iterate<S, F, P>(mut state: S, max_iter: usize, mut step: F, mut exit: P) -> Exit<S>
where
    F: FnMut(S) -> S,
    P: FnMut(&S) -> bool,
{
    for i in 0..max_iter {
        state = step(state);
        if exit(&state) {
            return Exit::At(i, state);
        }
    }
    Exit::Exhausted(state)
}

/// The classification of a single pixel.  Every pixel resolves to
/// exactly one of these before it is coloured.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The orbit passed the escape limit at this iteration.
    Escaped(usize),
    /// Newton's method landed near a root.
    Converged {
        /// Which root, counting from 1 at `1 + 0i` anticlockwise.
        root: usize,
        /// The iteration at which it got close enough.
        iteration: usize,
    },
    /// Neither escaped nor converged within the budget.
    Exhausted,
    /// The arithmetic produced NaN or infinity at this iteration.
    Overflow(usize),
}

/// Which way the per-pixel constant enters the transition.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Sign {
    /// `z := f(z) + c`
    Plus,
    /// `z := f(z) - c`
    Minus,
}

/// What is iterated over the plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Family {
    /// The pixel is `c`; `z` starts at the seed (usually zero).
    Mandelbrot,
    /// The pixel is `z0`; `c` is the seed.
    Julia,
}

/// The escape-time transition rules.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Transition {
    /// `z := z² ± c`
    Quadratic,
    /// `z := z^p ± c` for a real power `p`.
    RealPower(f64),
    /// `z := ((z² + c − 1) / (2z + c − 2))²`
    Magnet,
}

impl Transition {
    /// One step.  `c` already carries its sign.
    #[inline]
    pub fn apply(&self, z: Complex<f64>, c: Complex<f64>) -> Complex<f64> {
        match *self {
            Transition::Quadratic => z * z + c,
            Transition::RealPower(p) => powf(z, p) + c,
            Transition::Magnet => {
                let one = Complex::new(1.0, 0.0);
                let two = Complex::new(2.0, 0.0);
                let q = (z * z + c - one) / (z * two + c - two);
                q * q
            }
        }
    }
}

/// Escape-time iteration: Mandelbrot, Julia and relatives.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EscapeTime {
    /// Which of pixel and seed plays `z0` and which plays `c`.
    pub family: Family,
    /// The transition rule.
    pub transition: Transition,
    /// Sign convention for `c`.
    pub sign: Sign,
    /// The fixed value: `z0` for Mandelbrot, `c` for Julia.
    pub seed: Complex<f64>,
    /// The orbit has escaped once `|z|²` exceeds this.
    pub limit: f64,
}

impl EscapeTime {
    /// Classify the point under this iteration.
    pub fn classify(&self, point: Complex<f64>, max_iter: usize) -> Outcome {
        let (z0, c) = match self.family {
            Family::Mandelbrot => (self.seed, point),
            Family::Julia => (point, self.seed),
        };
        let c = match self.sign {
            Sign::Plus => c,
            Sign::Minus => -c,
        };
        let limit = self.limit;
        let transition = self.transition;

        // NaN never compares greater, so test "not within" to stop on it.
        match iterate(z0, max_iter, |z| transition.apply(z, c), |z| {
            !(z.norm_sqr() <= limit)
        }) {
            Exit::At(i, z) if z.norm_sqr().is_nan() => Outcome::Overflow(i),
            Exit::At(i, _) => Outcome::Escaped(i),
            Exit::Exhausted(_) => Outcome::Exhausted,
        }
    }
}

/// Newton's method on `zⁿ − 1`, classified by which of the n roots of
/// unity the orbit settles near.
#[derive(Clone, Debug, PartialEq)]
pub struct NewtonBasin {
    degree: u32,
    epsilon: f64,
    roots: Vec<Complex<f64>>,
}

impl NewtonBasin {
    /// Basins for the `degree` roots of unity.  A point is at a root
    /// once its squared distance to it is below `epsilon`.
    pub fn new(degree: u32, epsilon: f64) -> NewtonBasin {
        let step = 2.0 * std::f64::consts::PI / f64::from(degree.max(1));
        let roots = (0..degree)
            .map(|k| {
                let theta = step * f64::from(k);
                Complex::new(theta.cos(), theta.sin())
            })
            .collect();
        NewtonBasin {
            degree,
            epsilon,
            roots,
        }
    }

    /// The n in `zⁿ − 1`.
    pub fn degree(&self) -> u32 {
        self.degree
    }

    /// The roots, root 1 first.
    pub fn roots(&self) -> &[Complex<f64>] {
        &self.roots
    }

    /// One Newton step, `z − (zⁿ − 1) / (n zⁿ⁻¹)`.  The origin is
    /// nudged off zero instead of being divided by.
    #[inline]
    pub fn step(&self, z: Complex<f64>) -> Complex<f64> {
        if z.re == 0.0 && z.im == 0.0 {
            return nudge_from_origin(z);
        }
        let n = f64::from(self.degree);
        let lower = powu(z, self.degree.saturating_sub(1));
        let upper = lower * z - Complex::new(1.0, 0.0);
        z - upper / (lower * n)
    }

    /// The root `z` is within reach of, numbered from 1.
    pub fn root_near(&self, z: Complex<f64>) -> Option<usize> {
        self.roots
            .iter()
            .position(|root| dist_sqr(z, *root) < self.epsilon)
            .map(|k| k + 1)
    }

    /// Classify the point as a starting guess.
    pub fn classify(&self, point: Complex<f64>, max_iter: usize) -> Outcome {
        match iterate(point, max_iter, |z| self.step(z), |z| {
            is_degenerate(*z) || self.root_near(*z).is_some()
        }) {
            Exit::At(i, z) => match self.root_near(z) {
                Some(root) => Outcome::Converged { root, iteration: i },
                None => Outcome::Overflow(i),
            },
            Exit::Exhausted(_) => Outcome::Exhausted,
        }
    }
}

/// One engine, many transition rules.
#[derive(Clone, Debug, PartialEq)]
pub enum Kernel {
    /// Escape-time families.
    Escape(EscapeTime),
    /// Newton root basins.
    Newton(NewtonBasin),
}

impl Kernel {
    /// Classify a point of the plane.
    pub fn classify(&self, point: Complex<f64>, max_iter: usize) -> Outcome {
        match self {
            Kernel::Escape(escape) => escape.classify(point, max_iter),
            Kernel::Newton(newton) => newton.classify(point, max_iter),
        }
    }
}
