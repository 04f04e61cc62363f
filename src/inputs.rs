use std::collections::HashMap;

use crate::variable::{Variable, VariableKey};

/// An observation about one input variable, with its certainty factor.
#[derive(Clone, Debug, PartialEq)]
pub enum Fact {
    Crisp { value: f64, cf: f64 },
    /// `(x, degree)` points, interpolated onto the variable's universe
    Fuzzy { points: Vec<(f64, f64)>, cf: f64 },
}

impl Fact {
    pub fn cf(&self) -> f64 {
        match self {
            Self::Crisp { cf, .. } | Self::Fuzzy { cf, .. } => *cf,
        }
    }

    pub fn kind(&self) -> FactKind {
        match self {
            Self::Crisp { .. } => FactKind::Crisp,
            Self::Fuzzy { .. } => FactKind::Fuzzy,
        }
    }
}

impl From<f64> for Fact {
    fn from(value: f64) -> Self {
        Self::Crisp { value, cf: 1. }
    }
}

impl From<(f64, f64)> for Fact {
    fn from((value, cf): (f64, f64)) -> Self {
        Self::Crisp { value, cf }
    }
}

impl From<Vec<(f64, f64)>> for Fact {
    fn from(points: Vec<(f64, f64)>) -> Self {
        Self::Fuzzy { points, cf: 1. }
    }
}

impl From<&[(f64, f64)]> for Fact {
    fn from(points: &[(f64, f64)]) -> Self {
        Self::Fuzzy {
            points: points.to_vec(),
            cf: 1.,
        }
    }
}

impl From<(Vec<(f64, f64)>, f64)> for Fact {
    fn from((points, cf): (Vec<(f64, f64)>, f64)) -> Self {
        Self::Fuzzy { points, cf }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FactKind {
    Crisp,
    Fuzzy,
}

#[derive(Clone, Debug, Default)]
pub struct Inputs(pub(crate) HashMap<VariableKey, Fact>);

impl Inputs {
    pub fn new() -> Self {
        Inputs(HashMap::new())
    }

    /// `190.` is a crisp fact, `(190., 0.9)` one with certainty 0.9, and a
    /// `Vec<(f64, f64)>` of points a fuzzy fact. A later fact for the same
    /// variable replaces the earlier one.
    pub fn add<I>(&mut self, var: Variable<I>, fact: impl Into<Fact>) {
        self.0.insert(var.0, fact.into());
    }

    pub fn get<I>(&self, var: Variable<I>) -> Option<&Fact> {
        self.0.get(&var.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[test]
fn test_fact_conversions() {
    assert_eq!(Fact::from(190.), Fact::Crisp { value: 190., cf: 1. });
    assert_eq!(Fact::from((190., 0.9)).cf(), 0.9);

    let fuzzy = Fact::from(vec![(180., 0.), (190., 1.)]);

    assert_eq!(fuzzy.kind(), FactKind::Fuzzy);
    assert_eq!(fuzzy.cf(), 1.);
    assert_eq!(Fact::from((vec![(1., 1.)], 0.5)).cf(), 0.5);
}
