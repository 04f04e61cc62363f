use std::collections::HashSet;

use crate::dsl::{Premise, Proposition};
use crate::error::{FuzzyError, Result};

#[derive(Clone, Debug)]
pub struct Rules<T>(pub(crate) Vec<Rule<T>>);

impl<T> Default for Rules<T> {
    fn default() -> Self {
        Rules(Vec::new())
    }
}

impl<T> Rules<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    /// Adds a rule with certainty factor 1 and firing threshold 0.
    pub fn add(
        &mut self,
        premise: impl Into<Premise<T>>,
        consequence: impl IntoIterator<Item = Proposition<T>>,
    ) -> Result<()> {
        self.0.push(Rule::new(premise, consequence)?);

        Ok(())
    }

    pub fn push(&mut self, rule: Rule<T>) {
        self.0.push(rule);
    }

    pub fn get(&self, index: usize) -> Option<&Rule<T>> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule<T>> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// IF premise THEN consequence, weighted by a certainty factor.
///
/// A rule only contributes to its outputs when its inferred certainty factor
/// reaches `threshold_cf`.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule<T> {
    pub(crate) premise: Premise<T>,
    pub(crate) consequence: Vec<Proposition<T>>,
    pub(crate) cf: f64,
    pub(crate) threshold_cf: f64,
}

impl<T> Rule<T> {
    /// Each consequence proposition is an independent output assertion. A variable
    /// may appear at most once in the premise and at most once in the consequence.
    pub fn new(premise: impl Into<Premise<T>>, consequence: impl IntoIterator<Item = Proposition<T>>) -> Result<Self> {
        let premise = premise.into();
        let consequence: Vec<_> = consequence.into_iter().collect();

        if consequence.is_empty() {
            return Err(FuzzyError::MalformedRule {
                reason: "a rule needs at least one consequence".into(),
            });
        }

        let mut seen = HashSet::new();

        if let Some(prop) = premise.propositions().find(|prop| !seen.insert(prop.variable)) {
            return Err(FuzzyError::MalformedRule {
                reason: format!("variable {:?} appears twice in the premise", prop.variable),
            });
        }

        seen.clear();

        if let Some(prop) = consequence.iter().find(|prop| !seen.insert(prop.variable)) {
            return Err(FuzzyError::MalformedRule {
                reason: format!("variable {:?} appears twice in the consequence", prop.variable),
            });
        }

        Ok(Self {
            premise,
            consequence,
            cf: 1.,
            threshold_cf: 0.,
        })
    }

    pub fn with_cf(mut self, cf: f64) -> Result<Self> {
        if !(0. ..=1.).contains(&cf) {
            return Err(FuzzyError::InvalidCertaintyFactor { value: cf });
        }

        self.cf = cf;

        Ok(self)
    }

    pub fn with_threshold_cf(mut self, threshold_cf: f64) -> Self {
        self.threshold_cf = threshold_cf;
        self
    }

    pub fn premise(&self) -> &Premise<T> {
        &self.premise
    }

    pub fn consequence(&self) -> &[Proposition<T>] {
        &self.consequence
    }

    pub fn cf(&self) -> f64 {
        self.cf
    }

    pub fn threshold_cf(&self) -> f64 {
        self.threshold_cf
    }
}

#[cfg(test)]
mod fixtures {
    use crate::terms::{Key, Terms};
    use crate::variable::{Variable, Variables};

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
    pub(super) enum Level {
        Low,
        High,
    }

    pub(super) fn variables() -> (Variable<Level>, Variable<Level>, Variable<Level>) {
        let mut vars = Variables::<Level>::new();
        let mut add = || vars.add(0. ..=1., Terms::<Level>::new(), None).unwrap();

        (add(), add(), add())
    }
}

#[test]
fn test_rule_defaults_and_builders() {
    use fixtures::{variables, Level};

    let (a, b, out) = variables();
    let rule = Rule::<Level>::new(a.is(Level::High).and(b.is(Level::Low)), [out.is(Level::High)])
        .unwrap()
        .with_cf(0.8)
        .unwrap()
        .with_threshold_cf(0.5);

    assert_eq!(rule.cf(), 0.8);
    assert_eq!(rule.threshold_cf(), 0.5);
    assert_eq!(rule.premise().len(), 2);
    assert_eq!(rule.consequence().len(), 1);

    let mut rules = Rules::<Level>::new();

    rules.add(a.is(Level::Low), [out.is(Level::Low)]).unwrap();
    rules.push(rule);

    assert_eq!(rules.len(), 2);
    assert_eq!(rules.get(0).map(Rule::cf), Some(1.));
    assert_eq!(rules.get(0).map(Rule::threshold_cf), Some(0.));
}

#[test]
fn test_rule_validation() {
    use fixtures::{variables, Level};

    let (a, b, out) = variables();

    assert!(matches!(
        Rule::<Level>::new(a.is(Level::High), Vec::<Proposition<Level>>::new()),
        Err(FuzzyError::MalformedRule { .. })
    ));
    assert!(matches!(
        Rule::<Level>::new(a.is(Level::High).and(a.is(Level::Low)), [out.is(Level::High)]),
        Err(FuzzyError::MalformedRule { .. })
    ));
    assert!(matches!(
        Rule::<Level>::new(a.is(Level::High), [out.is(Level::High), out.is(Level::Low)]),
        Err(FuzzyError::MalformedRule { .. })
    ));
    assert_eq!(
        Rule::<Level>::new(a.is(Level::High).or(b.is(Level::High)), [out.is(Level::High)])
            .and_then(|rule| rule.with_cf(1.5))
            .map(|_| ()),
        Err(FuzzyError::InvalidCertaintyFactor { value: 1.5 })
    );
}
