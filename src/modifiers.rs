//! Linguistic hedges applied element-wise to membership degrees.

use num::Float;

use crate::error::{FuzzyError, Result};

/// A linguistic hedge such as "very" or "not".
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Modifier {
    /// `u³`
    Extremely,
    /// `u²` below 0.5, `1 - 2(1 - u)²` above
    Intensify,
    /// `u^(1/2)`
    MoreOrLess,
    /// Rescales so the peak degree becomes exactly one
    Norm,
    /// `1 - u`
    Not,
    /// `u^1.25`
    Plus,
    /// `intensify(norm(min(plus(u), not(very(u)))))`
    Slightly,
    /// `u^(1/3)`
    Somewhat,
    /// `u²`
    Very,
}

named_variants!(Modifier, |name| FuzzyError::UnknownModifier { name }, {
    Extremely => "extremely",
    Intensify => "intensify",
    MoreOrLess => "more_or_less",
    Norm => "norm",
    Not => "not",
    Plus => "plus",
    Slightly => "slightly",
    Somewhat => "somewhat",
    Very => "very",
});

fn constant<F: Float>(value: f64) -> F {
    F::from(value).unwrap_or_else(F::nan)
}

fn intensify<F: Float>(u: F) -> F {
    let half = constant::<F>(0.5);
    let two = constant::<F>(2.);

    if u <= half {
        u.powi(2)
    } else {
        F::one() - two * (F::one() - u).powi(2)
    }
}

impl Modifier {
    pub fn apply<F: Float>(self, membership: &[F]) -> Vec<F> {
        match self {
            Self::Extremely => membership.iter().map(|u| u.powi(3)).collect(),
            Self::Intensify => membership.iter().copied().map(intensify).collect(),
            Self::MoreOrLess => membership.iter().map(|u| u.sqrt()).collect(),
            Self::Norm => {
                // A zero peak yields NaN; callers guard against empty sets
                let peak = membership.iter().copied().fold(F::neg_infinity(), F::max);

                membership.iter().map(|&u| u / peak).collect()
            },
            Self::Not => membership.iter().map(|&u| F::one() - u).collect(),
            Self::Plus => membership.iter().map(|u| u.powf(constant(1.25))).collect(),
            Self::Slightly => {
                let plus = Self::Plus.apply(membership);
                let not_very = Self::Not.apply(&Self::Very.apply(membership));
                let and: Vec<F> = plus.into_iter().zip(not_very).map(|(p, n)| p.min(n)).collect();

                Self::Intensify.apply(&Self::Norm.apply(&and))
            },
            Self::Somewhat => membership.iter().map(|u| u.powf(constant(1. / 3.))).collect(),
            Self::Very => membership.iter().map(|u| u.powi(2)).collect(),
        }
    }
}

/// Applies `modifiers` right to left, so the hedge written closest to the term
/// acts first: `[Not, Very]` yields `not(very(u))`.
pub fn apply_modifiers<F: Float>(membership: &[F], modifiers: &[Modifier]) -> Vec<F> {
    let mut membership = membership.to_vec();

    for modifier in modifiers.iter().rev() {
        membership = modifier.apply(&membership);
    }

    membership
}

/// Like [`apply_modifiers`], with hedges given by name (case insensitive).
pub fn apply_named_modifiers<F: Float, S: AsRef<str>>(membership: &[F], modifiers: &[S]) -> Result<Vec<F>> {
    let modifiers = modifiers
        .iter()
        .map(|name| name.as_ref().parse())
        .collect::<Result<Vec<Modifier>>>()?;

    Ok(apply_modifiers(membership, &modifiers))
}

#[cfg(test)]
const SAMPLE: [f64; 6] = [0., 0.2, 0.5, 0.64, 0.9, 1.];

#[test]
fn test_not_is_exact_complement() {
    let result = apply_modifiers(&SAMPLE, &[Modifier::Not]);

    assert_eq!(result, SAMPLE.iter().map(|u| 1. - u).collect::<Vec<_>>());
}

#[test]
fn test_double_negation() {
    let result = apply_named_modifiers(&SAMPLE, &["NOT", "NOT"]).unwrap();

    for (r, u) in result.iter().zip(SAMPLE) {
        assert!((r - u).abs() < 1e-12);
    }
}

#[test]
fn test_power_hedges() {
    assert_eq!(Modifier::Very.apply(&[0.5]), vec![0.25]);
    assert_eq!(Modifier::Extremely.apply(&[0.5]), vec![0.125]);
    assert!((Modifier::MoreOrLess.apply(&[0.64])[0] - 0.8).abs() < 1e-12);
    assert!((Modifier::Somewhat.apply(&[0.125])[0] - 0.5).abs() < 1e-12);
    assert!((Modifier::Plus.apply(&[0.5])[0] - 0.5f64.powf(1.25)).abs() < 1e-12);
}

#[test]
fn test_intensify_and_norm() {
    assert_eq!(Modifier::Intensify.apply(&[0.25, 0.5, 0.75]), vec![0.0625, 0.25, 0.875]);
    assert_eq!(Modifier::Norm.apply(&[0.1, 0.25, 0.5]), vec![0.2, 0.5, 1.]);
}

#[test]
fn test_modifier_order() {
    // not(very(u)) differs from very(not(u))
    assert_eq!(apply_modifiers(&[0.5], &[Modifier::Not, Modifier::Very]), vec![0.75]);
    assert_eq!(apply_modifiers(&[0.5], &[Modifier::Very, Modifier::Not]), vec![0.25]);
    assert_eq!(apply_modifiers(&SAMPLE, &[]), SAMPLE.to_vec());
}

#[test]
fn test_slightly_peaks_at_one() {
    let result = Modifier::Slightly.apply(&SAMPLE);
    let peak = result.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    assert_eq!(result.len(), SAMPLE.len());
    assert_eq!(peak, 1.);
    assert_eq!(result[0], 0.);
    // Fully-true inputs are "not slightly" anything
    assert_eq!(result[5], 0.);
}

#[test]
fn test_unknown_modifier() {
    assert_eq!(
        apply_named_modifiers(&SAMPLE, &["very", "kinda"]),
        Err(FuzzyError::UnknownModifier { name: "kinda".into() })
    );
    assert_eq!("More_Or_Less".parse::<Modifier>(), Ok(Modifier::MoreOrLess));
}
