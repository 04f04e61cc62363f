use crate::error::FuzzyError;
use crate::modifiers::Modifier;
use crate::variable::{Variable, VariableKey};

/// How a premise proposition joins everything to its left.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Connective {
    And,
    Or,
}

named_variants!(Connective, |name| FuzzyError::MalformedRule {
    reason: format!("`{name}` is not a connective")
}, {
    And => "AND",
    Or => "OR",
});

/// `variable IS [modifiers...] term`
#[derive(Clone, Debug, PartialEq)]
pub struct Proposition<T> {
    pub(crate) variable: VariableKey,
    pub(crate) modifiers: Vec<Modifier>,
    pub(crate) term: T,
}

impl<T> Proposition<T> {
    pub fn variable(&self) -> VariableKey {
        self.variable
    }

    pub fn term(&self) -> &T {
        &self.term
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// Sets the hedges in reading order: `[Not, Very]` reads "NOT VERY term".
    pub fn hedged(mut self, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        self.modifiers = modifiers.into_iter().collect();
        self
    }

    pub fn and(self, rhs: Proposition<T>) -> Premise<T> {
        Premise::from(self).and(rhs)
    }

    pub fn or(self, rhs: Proposition<T>) -> Premise<T> {
        Premise::from(self).or(rhs)
    }
}

/// Propositions combined strictly left to right: `a AND b OR c` is `(a AND b) OR c`.
#[derive(Clone, Debug, PartialEq)]
pub struct Premise<T> {
    first: Proposition<T>,
    rest: Vec<(Connective, Proposition<T>)>,
}

impl<T> Premise<T> {
    pub fn and(mut self, rhs: Proposition<T>) -> Self {
        self.rest.push((Connective::And, rhs));
        self
    }

    pub fn or(mut self, rhs: Proposition<T>) -> Self {
        self.rest.push((Connective::Or, rhs));
        self
    }

    pub fn first(&self) -> &Proposition<T> {
        &self.first
    }

    /// Every proposition after the first, with the connective preceding it.
    pub fn rest(&self) -> &[(Connective, Proposition<T>)] {
        &self.rest
    }

    pub fn propositions(&self) -> impl Iterator<Item = &Proposition<T>> {
        std::iter::once(&self.first).chain(self.rest.iter().map(|(_, prop)| prop))
    }

    /// Number of propositions, never zero
    pub fn len(&self) -> usize {
        self.rest.len() + 1
    }
}

impl<T> From<Proposition<T>> for Premise<T> {
    fn from(first: Proposition<T>) -> Self {
        Self { first, rest: Vec::new() }
    }
}

impl<I> Variable<I> {
    pub fn is<T>(self, term: I) -> Proposition<T>
    where
        I: Into<T>,
    {
        Proposition {
            variable: self.0,
            modifiers: Vec::new(),
            term: term.into(),
        }
    }
}

#[test]
fn test_premise_is_flat_and_ordered() {
    use crate::terms::{Key, Terms};
    use crate::variable::Variables;

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
    enum Level {
        Low,
        High,
    }

    let mut vars = Variables::<Level>::new();
    let a = vars.add(0. ..=1., Terms::<Level>::new(), None).unwrap();
    let b = vars.add(0. ..=1., Terms::<Level>::new(), None).unwrap();
    let c = vars.add(0. ..=1., Terms::<Level>::new(), None).unwrap();
    let premise: Premise<Level> = a
        .is(Level::High)
        .and(b.is(Level::Low).hedged([Modifier::Not, Modifier::Very]))
        .or(c.is(Level::High));

    assert_eq!(premise.len(), 3);
    assert_eq!(premise.first().variable(), a.key());
    assert_eq!(
        premise.rest().iter().map(|(conn, prop)| (*conn, prop.variable())).collect::<Vec<_>>(),
        vec![(Connective::And, b.key()), (Connective::Or, c.key())]
    );
    assert_eq!(premise.rest()[0].1.modifiers(), &[Modifier::Not, Modifier::Very]);
    assert_eq!(
        premise.propositions().map(|prop| *prop.term()).collect::<Vec<_>>(),
        vec![Level::High, Level::Low, Level::High]
    );
    assert_eq!("or".parse::<Connective>(), Ok(Connective::Or));
}
