pub use fixed_map::Key as Term;
pub use fixed_map::Key;
use fixed_map::Map as FixedMap;

use crate::mf::MembershipFn;

/// How a term's membership is given: sampled points or a parametric function.
#[derive(Clone, Debug, PartialEq)]
pub enum TermSpec<'t> {
    Points(&'t [(f64, f64)]),
    Function(MembershipFn),
}

impl TermSpec<'_> {
    pub(crate) fn points(&self) -> Vec<(f64, f64)> {
        match self {
            Self::Points(points) => points.to_vec(),
            Self::Function(mf) => mf.points(),
        }
    }
}

impl<'t> From<&'t [(f64, f64)]> for TermSpec<'t> {
    fn from(points: &'t [(f64, f64)]) -> Self {
        Self::Points(points)
    }
}

impl<'t, const N: usize> From<&'t [(f64, f64); N]> for TermSpec<'t> {
    fn from(points: &'t [(f64, f64); N]) -> Self {
        Self::Points(points)
    }
}

impl From<MembershipFn> for TermSpec<'_> {
    fn from(mf: MembershipFn) -> Self {
        Self::Function(mf)
    }
}

/// The starting terms of one variable, keyed by that variable's term enum.
pub struct Terms<'t, K: Term>(pub(crate) FixedMap<K, TermSpec<'t>>);

impl<'t, K: Term> Terms<'t, K> {
    pub fn new() -> Self {
        Self(FixedMap::new())
    }

    pub fn insert(&mut self, key: K, value: impl Into<TermSpec<'t>>) {
        self.0.insert(key, value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Term> Default for Terms<'_, K> {
    fn default() -> Self {
        Self::new()
    }
}
