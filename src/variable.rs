use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;
use std::ops::RangeInclusive;

use slotmap::{new_key_type, SlotMap};

use crate::error::{FuzzyError, Result};
use crate::linspace::Linspace;
use crate::math::interp;
use crate::modifiers::{apply_modifiers, Modifier};
use crate::terms::{Term, TermSpec, Terms};

const DEFAULT_STEP: f64 = 0.1;
/// Upper bound on the samples a universe starts with
const MAX_SAMPLES: usize = 10_000_000;

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

/// Typed handle to a variable whose terms are `I`.
pub struct Variable<I>(pub(crate) VariableKey, PhantomData<I>);

impl<I> Variable<I> {
    pub fn key(self) -> VariableKey {
        self.0
    }
}

impl<I> Clone for Variable<I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for Variable<I> {}

impl<I> Debug for Variable<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Variable").field(&self.0).finish()
    }
}

/// Arena of fuzzy variables sharing the term type `T`.
pub struct Variables<T>(pub(crate) SlotMap<VariableKey, FuzzyVariable<T>>);

impl<T> Default for Variables<T> {
    fn default() -> Self {
        Self(SlotMap::with_key())
    }
}

impl<T: Copy + Debug + Eq + Hash> Variables<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable over `universe_range`, sampled every `step` (0.1 when `None`),
    /// and loads its starting terms.
    pub fn add<I: Into<T> + Term + 'static>(
        &mut self,
        universe_range: RangeInclusive<f64>,
        terms: Terms<I>,
        step: Option<f64>,
    ) -> Result<Variable<I>> {
        let mut variable = FuzzyVariable::new(universe_range, step.unwrap_or(DEFAULT_STEP))?;

        for (term, spec) in terms.0.iter() {
            variable.set_term(term.into(), spec)?;
        }

        let key = self.0.insert(variable);

        Ok(Variable(key, PhantomData))
    }

    /// Adds or replaces one term, extending the universe with its points.
    pub fn set_term<'t, I: Into<T>>(&mut self, var: Variable<I>, term: I, spec: impl Into<TermSpec<'t>>) -> Result<()> {
        self.get_mut(var.0)?.set_term(term.into(), &spec.into())
    }

    pub fn add_points_to_universe<I>(&mut self, var: Variable<I>, points: impl IntoIterator<Item = f64>) -> Result<()> {
        self.get_mut(var.0)?.add_points_to_universe(points);

        Ok(())
    }

    pub fn universe<I>(&self, var: Variable<I>) -> Result<&[f64]> {
        Ok(&self.get(var.0)?.universe)
    }

    pub fn universe_range<I>(&self, var: Variable<I>) -> Result<RangeInclusive<f64>> {
        let variable = self.get(var.0)?;

        Ok(variable.min_u..=variable.max_u)
    }

    /// The term's degrees, aligned with [`Variables::universe`].
    pub fn membership<I: Into<T>>(&self, var: Variable<I>, term: I) -> Result<&[f64]> {
        let term = term.into();

        self.get(var.0)?
            .terms
            .get(&term)
            .map(Vec::as_slice)
            .ok_or_else(|| unknown_term(var.0, &term))
    }

    pub fn modified_membership<I: Into<T>>(&self, var: Variable<I>, term: I, modifiers: &[Modifier]) -> Result<Vec<f64>> {
        let term = term.into();

        self.get(var.0)?
            .get_modified_membership(&term, modifiers)
            .ok_or_else(|| unknown_term(var.0, &term))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn get(&self, key: VariableKey) -> Result<&FuzzyVariable<T>> {
        self.0.get(key).ok_or_else(|| unknown_variable(key))
    }

    pub(crate) fn get_mut(&mut self, key: VariableKey) -> Result<&mut FuzzyVariable<T>> {
        self.0.get_mut(key).ok_or_else(|| unknown_variable(key))
    }
}

pub(crate) fn unknown_variable(key: VariableKey) -> FuzzyError {
    FuzzyError::UnknownVariable {
        variable: format!("{key:?}"),
    }
}

pub(crate) fn unknown_term<T: Debug>(key: VariableKey, term: &T) -> FuzzyError {
    FuzzyError::UnknownTerm {
        variable: format!("{key:?}"),
        term: format!("{term:?}"),
    }
}

/// Sorts `(x, degree)` points by x, keeping the given order among equal xs.
pub(crate) fn sorted_points(points: &[(f64, f64)]) -> Result<Vec<(f64, f64)>> {
    if points.is_empty() {
        return Err(FuzzyError::EmptyMembership);
    }

    let mut points = points.to_vec();

    points.sort_by(|a, b| a.0.total_cmp(&b.0));

    Ok(points)
}

pub(crate) struct FuzzyVariable<T> {
    pub(crate) universe: Vec<f64>,
    pub(crate) min_u: f64,
    pub(crate) max_u: f64,
    pub(crate) terms: HashMap<T, Vec<f64>>,
}

impl<T: Eq + Hash> FuzzyVariable<T> {
    fn new(universe_range: RangeInclusive<f64>, step: f64) -> Result<Self> {
        let min_u = *universe_range.start();
        let max_u = *universe_range.end();

        if !min_u.is_finite() || !max_u.is_finite() || min_u > max_u {
            return Err(FuzzyError::InvalidUniverse {
                reason: format!("range {min_u}..={max_u} is not a finite, ordered interval"),
            });
        }
        if !step.is_finite() || step <= 0. {
            return Err(FuzzyError::InvalidUniverse {
                reason: format!("step {step} must be positive"),
            });
        }

        // Whole steps only, truncated. A range that isn't a multiple of `step`
        // still ends exactly on `max_u`, the spacing just grows a little.
        let steps = ((max_u - min_u) / step).floor();
        let num = Some(steps)
            .filter(|steps| *steps < MAX_SAMPLES as f64)
            .and_then(|steps| (steps as usize).checked_add(1))
            .ok_or_else(|| FuzzyError::InvalidUniverse {
                reason: format!("range {min_u}..={max_u} with step {step} needs more than {MAX_SAMPLES} samples"),
            })?;
        let universe = Linspace::new(min_u, max_u, num).collect();

        Ok(Self {
            universe,
            min_u,
            max_u,
            terms: HashMap::new(),
        })
    }

    pub(crate) fn set_term(&mut self, term: T, spec: &TermSpec<'_>) -> Result<()> {
        let points = sorted_points(&spec.points())?;

        self.add_points_to_universe(points.iter().map(|(x, _)| *x));
        self.terms.insert(term, interp(self.universe.iter().copied(), &points));

        Ok(())
    }

    pub(crate) fn add_points_to_universe(&mut self, points: impl IntoIterator<Item = f64>) {
        let iter = points
            .into_iter()
            .filter(|p| !p.is_nan())
            .map(|p| p.clamp(self.min_u, self.max_u));
        let mut universe: Vec<_> = self.universe.iter().copied().chain(iter).collect();

        universe.sort_unstable_by(f64::total_cmp);
        universe.dedup();

        if universe.len() == self.universe.len() {
            return;
        }

        tracing::trace!(added = universe.len() - self.universe.len(), "extending universe");

        // Expand existent membership functions with the new points
        let old_universe = std::mem::take(&mut self.universe);

        for term_values in self.terms.values_mut() {
            let coords: Vec<_> = old_universe.iter().copied().zip(term_values.iter().copied()).collect();

            *term_values = interp(universe.iter().copied(), &coords);
        }

        self.universe = universe;
    }

    pub(crate) fn get_modified_membership(&self, term: &T, modifiers: &[Modifier]) -> Option<Vec<f64>> {
        let membership = self.terms.get(term)?;

        Some(apply_modifiers(membership, modifiers))
    }

    /// Indicator of the crisp value on the (extended) universe.
    pub(crate) fn fuzzificate_crisp(&mut self, value: f64) -> Vec<f64> {
        self.add_points_to_universe(Some(value));

        self.universe
            .iter()
            .map(|u| if *u == value { 1. } else { 0. })
            .collect()
    }

    /// A fuzzy fact resampled onto the (extended) universe. `points` must be sorted.
    pub(crate) fn fuzzificate_fuzzy(&mut self, points: &[(f64, f64)]) -> Vec<f64> {
        self.add_points_to_universe(points.iter().map(|(x, _)| *x));

        interp(self.universe.iter().copied(), points)
    }
}

#[cfg(test)]
mod fixtures {
    use crate::terms::Key;

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
    pub(super) enum Score {
        High,
        Low,
        Medium,
    }
}

#[cfg(test)]
use fixtures::Score;

#[cfg(test)]
fn score_terms() -> Terms<'static, Score> {
    let mut terms = Terms::new();

    terms.insert(Score::High, &[(175., 0.), (180., 0.2), (185., 0.7), (190., 1.)]);
    terms.insert(Score::Low, &[(155., 1.), (160., 0.8), (165., 0.5), (170., 0.2), (175., 0.)]);
    terms
}

#[test]
fn test_variable_init() {
    let mut vars = Variables::<Score>::new();
    let unit = vars.add(0. ..=1., Terms::<Score>::new(), None).unwrap();
    let expected: Vec<_> = Linspace::new(0., 1., 11).collect();

    assert_eq!(vars.universe(unit).unwrap(), &expected[..]);
    assert_eq!(vars.universe_range(unit).unwrap(), 0. ..=1.);

    let coarse = vars.add(0. ..=10., Terms::<Score>::new(), Some(2.5)).unwrap();

    assert_eq!(vars.universe(coarse).unwrap(), &[0., 2.5, 5., 7.5, 10.]);
}

#[test]
fn test_terms_are_interpolated_onto_universe() {
    let mut vars = Variables::<Score>::new();
    let score = vars.add(150. ..=200., score_terms(), None).unwrap();
    let universe = vars.universe(score).unwrap();
    let high = vars.membership(score, Score::High).unwrap();
    let low = vars.membership(score, Score::Low).unwrap();

    assert_eq!(universe.first(), Some(&150.));
    assert_eq!(universe.last(), Some(&200.));
    assert_eq!(high.len(), universe.len());
    assert_eq!(low.len(), universe.len());

    let at = |x: f64| universe.iter().position(|u| *u == x).unwrap();

    assert_eq!(high[at(150.)], 0.);
    assert_eq!(high[at(185.)], 0.7);
    assert_eq!(high[at(200.)], 1.);
    assert_eq!(low[at(150.)], 1.);
    assert_eq!(low[at(165.)], 0.5);
    assert_eq!(low[at(200.)], 0.);
}

#[test]
fn test_universe_extension_preserves_alignment() {
    let mut vars = Variables::<Score>::new();
    let score = vars.add(150. ..=200., score_terms(), None).unwrap();
    let before_universe = vars.universe(score).unwrap().to_vec();
    let before_high = vars.membership(score, Score::High).unwrap().to_vec();
    let before_low = vars.membership(score, Score::Low).unwrap().to_vec();

    vars.add_points_to_universe(score, [182.123, 150.05, 10., 500., f64::NAN]).unwrap();

    let universe = vars.universe(score).unwrap();
    let high = vars.membership(score, Score::High).unwrap();
    let low = vars.membership(score, Score::Low).unwrap();

    // 10 and 500 clamp onto the existing bounds, NaN is dropped
    assert_eq!(universe.len(), before_universe.len() + 2);
    assert!(universe.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(high.len(), universe.len());
    assert_eq!(low.len(), universe.len());

    for (i, x) in before_universe.iter().enumerate() {
        let j = universe.iter().position(|u| u == x).unwrap();

        assert_eq!(high[j], before_high[i]);
        assert_eq!(low[j], before_low[i]);
    }

    let new = universe.iter().position(|u| *u == 182.123).unwrap();

    assert!((high[new] - (0.2 + 0.5 * 2.123 / 5.)).abs() < 1e-9);
}

#[test]
fn test_set_term_from_membership_function() {
    use crate::mf::MembershipFn;

    let mut vars = Variables::<Score>::new();
    let score = vars.add(150. ..=200., score_terms(), None).unwrap();
    let mf = MembershipFn::from_spec("trimf", &[165., 172.5, 180.]).unwrap();

    vars.set_term(score, Score::Medium, mf).unwrap();

    let universe = vars.universe(score).unwrap();
    let medium = vars.membership(score, Score::Medium).unwrap();
    let high = vars.membership(score, Score::High).unwrap();
    let peak = universe.iter().position(|u| *u == 172.5).unwrap();

    assert_eq!(medium[peak], 1.);
    assert_eq!(medium.len(), universe.len());
    assert_eq!(high.len(), universe.len());
    assert_eq!(medium[0], 0.);
}

#[test]
fn test_modified_membership() {
    let mut vars = Variables::<Score>::new();
    let mut terms = Terms::new();

    terms.insert(Score::High, &[(175., 0.), (185., 0.5), (190., 1.)]);

    let score = vars.add(150. ..=200., terms, Some(5.)).unwrap();
    let very_high = vars.modified_membership(score, Score::High, &[Modifier::Very]).unwrap();
    let not_high = vars.modified_membership(score, Score::High, &[Modifier::Not]).unwrap();
    let plain = vars.modified_membership(score, Score::High, &[]).unwrap();
    let i = vars.universe(score).unwrap().iter().position(|u| *u == 185.).unwrap();

    assert_eq!(very_high[i], 0.25);
    assert_eq!(not_high[i], 0.5);
    assert_eq!(plain, vars.membership(score, Score::High).unwrap());
    assert_eq!(
        vars.modified_membership(score, Score::Low, &[]),
        Err(unknown_term(score.key(), &Score::Low))
    );
}

#[test]
fn test_invalid_universe_and_terms() {
    let mut vars = Variables::<Score>::new();

    assert!(matches!(
        vars.add(10. ..=0., Terms::<Score>::new(), None),
        Err(FuzzyError::InvalidUniverse { .. })
    ));
    assert!(matches!(
        vars.add(0. ..=10., Terms::<Score>::new(), Some(0.)),
        Err(FuzzyError::InvalidUniverse { .. })
    ));
    // The sample count overflows or is far too large to allocate
    assert!(matches!(
        vars.add(0. ..=f64::MAX, Terms::<Score>::new(), Some(1e-300)),
        Err(FuzzyError::InvalidUniverse { .. })
    ));
    assert!(matches!(
        vars.add(0. ..=1e12, Terms::<Score>::new(), Some(1.)),
        Err(FuzzyError::InvalidUniverse { .. })
    ));
    assert_eq!(vars.add(0. ..=1e6, Terms::<Score>::new(), Some(1.)).map(|_| ()), Ok(()));
    assert_eq!(vars.len(), 1);

    let mut terms = Terms::new();

    terms.insert(Score::High, &[] as &[(f64, f64)]);

    assert!(matches!(vars.add(0. ..=10., terms, None), Err(FuzzyError::EmptyMembership)));
    assert_eq!(vars.len(), 1);
}

#[test]
fn test_fuzzification() {
    let mut variable = FuzzyVariable::<Score>::new(0. ..=4., 1.).unwrap();

    assert_eq!(variable.fuzzificate_crisp(2.5), vec![0., 0., 0., 1., 0., 0.]);
    assert_eq!(variable.universe, vec![0., 1., 2., 2.5, 3., 4.]);
    assert_eq!(
        variable.fuzzificate_fuzzy(&[(0.5, 0.), (1., 1.), (3., 0.)]),
        vec![0., 0., 1., 0.5, 0.25, 0., 0.]
    );
    assert_eq!(variable.universe, vec![0., 0.5, 1., 2., 2.5, 3., 4.]);
}
