//! Parametric membership functions, expanded into the `(x, degree)` point lists
//! a [`Variables`](crate::Variables) term is interpolated from.

use crate::error::{FuzzyError, Result};
use crate::linspace::Linspace;

const DEFAULT_POINTS: usize = 9;
const NUDGE: f64 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MembershipFn {
    /// Gaussian bump around `center`
    Gaussmf { center: f64, sigma: f64 },
    /// Generalized bell; a larger `shape` gives steeper shoulders
    Gbellmf { center: f64, width: f64, shape: f64 },
    /// S-curve rise followed by a Z-curve fall
    Pimf {
        left_feet: f64,
        left_peak: f64,
        right_peak: f64,
        right_feet: f64,
    },
    /// Sigmoid through 0.5 at `center`
    Sigmf { center: f64, width: f64 },
    /// S-shaped rise from `foot` to `shoulder`
    Smf { foot: f64, shoulder: f64 },
    Trapmf {
        left_feet: f64,
        left_peak: f64,
        right_peak: f64,
        right_feet: f64,
    },
    Trimf { left_feet: f64, peak: f64, right_feet: f64 },
    /// Z-shaped fall from `shoulder` to `feet`
    Zmf { shoulder: f64, feet: f64 },
}

impl MembershipFn {
    /// Builds a membership function from its name (`"trimf"`, `"gaussmf"`, ...)
    /// and positional parameters.
    pub fn from_spec(kind: &str, params: &[f64]) -> Result<Self> {
        fn arity<const N: usize>(kind: &'static str, params: &[f64]) -> Result<[f64; N]> {
            params.try_into().map_err(|_| FuzzyError::InvalidParameters {
                kind,
                expected: N,
                actual: params.len(),
            })
        }

        Ok(match kind.to_ascii_lowercase().as_str() {
            "gaussmf" => {
                let [center, sigma] = arity("gaussmf", params)?;
                Self::Gaussmf { center, sigma }
            },
            "gbellmf" => {
                let [center, width, shape] = arity("gbellmf", params)?;
                Self::Gbellmf { center, width, shape }
            },
            "pimf" => {
                let [left_feet, left_peak, right_peak, right_feet] = arity("pimf", params)?;
                Self::Pimf {
                    left_feet,
                    left_peak,
                    right_peak,
                    right_feet,
                }
            },
            "sigmf" => {
                let [center, width] = arity("sigmf", params)?;
                Self::Sigmf { center, width }
            },
            "smf" => {
                let [foot, shoulder] = arity("smf", params)?;
                Self::Smf { foot, shoulder }
            },
            "trapmf" => {
                let [left_feet, left_peak, right_peak, right_feet] = arity("trapmf", params)?;
                Self::Trapmf {
                    left_feet,
                    left_peak,
                    right_peak,
                    right_feet,
                }
            },
            "trimf" => {
                let [left_feet, peak, right_feet] = arity("trimf", params)?;
                Self::Trimf {
                    left_feet,
                    peak,
                    right_feet,
                }
            },
            "zmf" => {
                let [shoulder, feet] = arity("zmf", params)?;
                Self::Zmf { shoulder, feet }
            },
            _ => {
                return Err(FuzzyError::UnknownOperator {
                    kind: "membership function",
                    name: kind.to_owned(),
                })
            },
        })
    }

    pub fn points(&self) -> Vec<(f64, f64)> {
        self.points_with(DEFAULT_POINTS)
    }

    /// `n_points` controls how finely the curved shapes are sampled.
    pub fn points_with(&self, n_points: usize) -> Vec<(f64, f64)> {
        match *self {
            Self::Gaussmf { center, sigma } => {
                let xp = sorted_unique(Linspace::new(center - 2. * sigma, center + 2. * sigma, 2 * n_points).chain(Some(center)));
                let mut points = vec![(center - 3. * sigma, 0.)];

                points.extend(xp.into_iter().map(|x| (x, (-(x - center).powi(2) / (2. * sigma)).exp())));
                points.push((center + 3. * sigma, 0.));
                points
            },
            Self::Gbellmf { center, width, shape } => {
                let deltas = Linspace::new(-5., 5., 11).map(|k| center + width * k);
                let xp = sorted_unique(Linspace::new(center - 2. * width, center + 2. * width, 2 * n_points).chain(deltas));
                let mut points = vec![(center - 6. * width, 0.)];

                points.extend(
                    xp.into_iter()
                        .map(|x| (x, 1. / (1. + ((x - center) / width).abs().powf(2. * shape)))),
                );
                points.push((center + 6. * width, 0.));
                points
            },
            Self::Pimf {
                left_feet,
                left_peak,
                right_peak,
                right_feet,
            } => {
                let mut points = smf(left_feet, left_peak, n_points);

                points.extend(zmf(right_peak, right_feet, n_points));
                points
            },
            Self::Sigmf { center, width } => {
                let xp = sorted_unique(Linspace::new(center - 5. * width, center + 5. * width, 2 * n_points).chain(Some(center)));
                let mut points = vec![(center - 6. * width, 0.)];

                points.extend(xp.into_iter().map(|x| (x, 1. / (1. + (-width.abs() * (x - center)).exp()))));
                points.push((center + 6. * width, 1.));
                points
            },
            Self::Smf { foot, shoulder } => smf(foot, shoulder, n_points),
            Self::Trapmf {
                left_feet,
                left_peak,
                right_peak,
                right_feet,
            } => {
                let left_feet = if left_feet == left_peak { left_feet - NUDGE } else { left_feet };
                let right_feet = if right_feet == right_peak { right_feet + NUDGE } else { right_feet };

                vec![(left_feet, 0.), (left_peak, 1.), (right_peak, 1.), (right_feet, 0.)]
            },
            Self::Trimf {
                left_feet,
                peak,
                right_feet,
            } => {
                let left_feet = if left_feet == peak { left_feet - NUDGE } else { left_feet };
                let right_feet = if right_feet == peak { right_feet + NUDGE } else { right_feet };

                vec![(left_feet, 0.), (peak, 1.), (right_feet, 0.)]
            },
            Self::Zmf { shoulder, feet } => zmf(shoulder, feet, n_points),
        }
    }
}

fn sorted_unique(xp: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut xp: Vec<f64> = xp.into_iter().collect();

    xp.sort_unstable_by(f64::total_cmp);
    xp.dedup();
    xp
}

fn smf(foot: f64, shoulder: f64, n_points: usize) -> Vec<(f64, f64)> {
    let middle = (foot + shoulder) / 2.;

    Linspace::new(foot, shoulder, n_points)
        .map(|x| {
            let degree = if x <= foot {
                0.
            } else if x <= middle {
                2. * ((x - foot) / (shoulder - foot)).powi(2)
            } else if x <= shoulder {
                1. - 2. * ((x - shoulder) / (shoulder - foot)).powi(2)
            } else {
                1.
            };

            (x, degree)
        })
        .collect()
}

fn zmf(shoulder: f64, feet: f64, n_points: usize) -> Vec<(f64, f64)> {
    let middle = (shoulder + feet) / 2.;

    Linspace::new(shoulder, feet, n_points)
        .map(|x| {
            let degree = if x <= shoulder {
                1.
            } else if x <= middle {
                1. - 2. * ((x - shoulder) / (feet - shoulder)).powi(2)
            } else if x <= feet {
                2. * ((x - feet) / (feet - shoulder)).powi(2)
            } else {
                0.
            };

            (x, degree)
        })
        .collect()
}

#[cfg(test)]
fn assert_points_close(actual: &[(f64, f64)], expected: &[(f64, f64)]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?}");

    for ((ax, ay), (ex, ey)) in actual.iter().zip(expected) {
        assert!((ax - ex).abs() < 1e-9 && (ay - ey).abs() < 1e-9, "{actual:?} != {expected:?}");
    }
}

#[test]
fn test_trimf_and_trapmf() {
    assert_eq!(
        MembershipFn::from_spec("trimf", &[0., 1., 2.]).unwrap().points(),
        vec![(0., 0.), (1., 1.), (2., 0.)]
    );
    assert_eq!(
        MembershipFn::from_spec("trapmf", &[0., 1., 2., 3.]).unwrap().points(),
        vec![(0., 0.), (1., 1.), (2., 1.), (3., 0.)]
    );
}

#[test]
fn test_degenerate_feet_are_nudged() {
    let points = MembershipFn::Trimf {
        left_feet: 1.,
        peak: 1.,
        right_feet: 3.,
    }
    .points();

    assert_eq!(points, vec![(1. - NUDGE, 0.), (1., 1.), (3., 0.)]);
}

#[test]
fn test_smf_zmf_pimf() {
    let smf = MembershipFn::Smf { foot: 1., shoulder: 2. }.points_with(4);
    let zmf = MembershipFn::Zmf { shoulder: 1., feet: 2. }.points_with(4);

    assert_points_close(
        &smf,
        &[(1., 0.), (4. / 3., 2. / 9.), (5. / 3., 7. / 9.), (2., 1.)],
    );
    assert_points_close(
        &zmf,
        &[(1., 1.), (4. / 3., 7. / 9.), (5. / 3., 2. / 9.), (2., 0.)],
    );

    let pimf = MembershipFn::from_spec("pimf", &[1., 2., 3., 4.]).unwrap().points_with(4);

    assert_eq!(pimf.len(), 8);
    assert_eq!(pimf[3], (2., 1.));
    assert_eq!(pimf[4], (3., 1.));
}

#[test]
fn test_gaussmf() {
    let points = MembershipFn::Gaussmf { center: 5., sigma: 1. }.points_with(3);

    assert_points_close(
        &points,
        &[
            (2., 0.),
            (3., 0.1353352832366127),
            (3.8, 0.48675225595997157),
            (4.6, 0.9231163463866356),
            (5., 1.),
            (5.4, 0.9231163463866356),
            (6.2, 0.48675225595997157),
            (7., 0.1353352832366127),
            (8., 0.),
        ],
    );
}

#[test]
fn test_gbellmf_and_sigmf() {
    let bell = MembershipFn::Gbellmf {
        center: 5.,
        width: 1.,
        shape: 0.5,
    }
    .points_with(3);

    assert_eq!(bell.first(), Some(&(-1., 0.)));
    assert_eq!(bell.last(), Some(&(11., 0.)));
    assert!(bell.contains(&(5., 1.)));

    let sigmoid = MembershipFn::Sigmf { center: 5., width: 1. }.points_with(3);

    assert_eq!(sigmoid.first(), Some(&(-1., 0.)));
    assert_eq!(sigmoid.last(), Some(&(11., 1.)));
    assert!(sigmoid.contains(&(5., 0.5)));
}

#[test]
fn test_bad_specs() {
    assert_eq!(
        MembershipFn::from_spec("trimf", &[0., 1.]),
        Err(FuzzyError::InvalidParameters {
            kind: "trimf",
            expected: 3,
            actual: 2
        })
    );
    assert_eq!(
        MembershipFn::from_spec("cosmf", &[]),
        Err(FuzzyError::UnknownOperator {
            kind: "membership function",
            name: "cosmf".into()
        })
    );
}
