use num::Float;
use serde::{Deserialize, Serialize};

use crate::error::{FuzzyError, Result};
use crate::math::{interp, CollectMatrix, Matrix};

/// How a fact membership is pushed through an implication relation.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum CompositionOp {
    MaxMin,
    MaxProd,
}

named_variants!(CompositionOp, |name| FuzzyError::UnknownOperator { kind: "composition", name }, {
    MaxMin => "max-min",
    MaxProd => "max-prod",
});

impl CompositionOp {
    /// Combines `fact` (aligned with the implication rows) with every column of
    /// `implication`, then keeps the maximum down each column.
    pub(crate) fn compose<F: Float>(self, fact: &[F], implication: &Matrix<F>) -> Vec<F> {
        let fact_value = Matrix::new(fact.to_vec(), (fact.len(), 1));
        let fact_value = fact_value.tile((1, implication.shape().1));
        let shape = fact_value.shape();

        debug_assert_eq!(shape, implication.shape());

        let link = match self {
            Self::MaxMin => ProductionLink::Min,
            Self::MaxProd => ProductionLink::Prod,
        };

        link.call(fact_value, implication).collect_matrix(shape).column_max()
    }
}

/// Implication operator method for computing the compisitions of propositions
/// in a fuzzy rule premise.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum ImplicationOp {
    /// Zadeh arithmetic rule: `min(1, 1 - u + v)`
    Ra,
    /// Mamdani max-min rule: `max(min(u, v), 1 - u)`
    Rm,
    /// Correlation minimum: `min(u, v)`
    Rc,
    /// Boolean rule: `max(1 - u, v)`
    Rb,
    /// Standard sequence: `1` if `u <= v` else `0`
    Rs,
    /// Gödel: `1` if `u <= v` else `v`
    Rg,
    Rsg,
    Rgs,
    Rgg,
    Rss,
}

named_variants!(ImplicationOp, |name| FuzzyError::UnknownOperator { kind: "implication", name }, {
    Ra => "Ra",
    Rm => "Rm",
    Rc => "Rc",
    Rb => "Rb",
    Rs => "Rs",
    Rg => "Rg",
    Rsg => "Rsg",
    Rgs => "Rgs",
    Rgg => "Rgg",
    Rss => "Rss",
});

impl ImplicationOp {
    pub fn apply<F: Float>(self, u: F, v: F) -> F {
        let one = F::one();

        match self {
            Self::Ra => F::min(one, one - u + v),
            Self::Rm => F::max(F::min(u, v), one - u),
            Self::Rc => F::min(u, v),
            Self::Rb => F::max(one - u, v),
            Self::Rs => {
                if u <= v {
                    one
                } else {
                    F::zero()
                }
            },
            Self::Rg => {
                if u <= v {
                    one
                } else {
                    v
                }
            },
            Self::Rsg => F::min(Self::Rs.apply(u, v), Self::Rg.apply(one - u, one - v)),
            Self::Rgs => F::min(Self::Rg.apply(u, v), Self::Rs.apply(one - u, one - v)),
            Self::Rgg => F::min(Self::Rg.apply(u, v), Self::Rg.apply(one - u, one - v)),
            Self::Rss => F::min(Self::Rs.apply(u, v), Self::Rs.apply(one - u, one - v)),
        }
    }

    pub fn call<F: Float>(
        self,
        u: impl IntoIterator<Item = F>,
        v: impl IntoIterator<Item = F>,
    ) -> impl Iterator<Item = F> {
        u.into_iter().zip(v).map(move |(u, v)| self.apply(u, v))
    }
}

/// Pairwise fuzzy connective. Used for premise AND/OR combination and for
/// aggregating the conclusions of several rules; every setting accepts all of
/// the t-norms and t-conorms.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum ProductionLink {
    Min,
    Prod,
    BoundedProd,
    DrasticProd,
    Max,
    ProbOr,
    BoundedSum,
    DrasticSum,
}

named_variants!(ProductionLink, |name| FuzzyError::UnknownOperator { kind: "production link", name }, {
    Min => "min",
    Prod => "prod",
    BoundedProd => "bounded_prod",
    DrasticProd => "drastic_prod",
    Max => "max",
    ProbOr => "prob_or",
    BoundedSum => "bounded_sum",
    DrasticSum => "drastic_sum",
});

impl ProductionLink {
    pub fn call<F: Float>(
        self,
        u: impl IntoIterator<Item = F>,
        v: impl IntoIterator<Item = F>,
    ) -> impl IntoIterator<Item = F> {
        u.into_iter().zip(v).map(move |(u, v)| match self {
            Self::Max => F::max(u, v),
            Self::ProbOr => u + v - u * v,
            Self::BoundedSum => F::min(F::one(), u + v),
            Self::DrasticSum => {
                if v == F::zero() {
                    u
                } else if u == F::zero() {
                    v
                } else {
                    F::one()
                }
            },
            Self::Min => F::min(u, v),
            Self::Prod => u * v,
            Self::BoundedProd => F::max(F::zero(), u + v - F::one()),
            Self::DrasticProd => {
                if v == F::zero() {
                    u
                } else if u == F::one() {
                    v
                } else {
                    F::zero()
                }
            },
        })
    }

    /// Left-folds equally sized membership arrays into one.
    pub fn aggregate<F: Float, M: AsRef<[F]>>(self, memberships: &[M]) -> Result<Vec<F>> {
        let aggregated = fold(memberships, |acc, next| self.call(acc, next.iter().copied()).into_iter().collect())?;

        Ok(match self {
            Self::ProbOr => aggregated.into_iter().map(|u| u.max(F::zero()).min(F::one())).collect(),
            _ => aggregated,
        })
    }
}

fn fold<F: Float, M: AsRef<[F]>>(memberships: &[M], mut f: impl FnMut(Vec<F>, &[F]) -> Vec<F>) -> Result<Vec<F>> {
    let (first, rest) = memberships.split_first().ok_or(FuzzyError::EmptyOperand)?;
    let mut acc = first.as_ref().to_vec();

    for next in rest {
        debug_assert_eq!(acc.len(), next.as_ref().len());
        acc = f(acc, next.as_ref());
    }

    Ok(acc)
}

/// `max(0, u - v)` folded left to right.
pub fn bounded_diff<F: Float, M: AsRef<[F]>>(memberships: &[M]) -> Result<Vec<F>> {
    fold(memberships, |acc, next| {
        acc.into_iter()
            .zip(next.iter().copied())
            .map(|(u, v)| F::max(F::zero(), u - v))
            .collect()
    })
}

/// Method for defuzzifcating the resulting membership function.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum DefuzzificationOp {
    /// Center of Gravity
    Cog,
    /// Bisector of Area
    Boa,
    /// Mean of the values for which the membership function is maximum
    Mom,
    /// Largest value for which the membership function is maximum
    Lom,
    /// Smallest value for which the membership function is maximum
    Som,
}

named_variants!(DefuzzificationOp, |name| FuzzyError::UnknownOperator { kind: "defuzzification", name }, {
    Cog => "cog",
    Boa => "boa",
    Mom => "mom",
    Lom => "lom",
    Som => "som",
});

impl DefuzzificationOp {
    /// Reduces `membership`, sampled on `universe`, to one crisp value.
    ///
    /// An empty fuzzy set (all degrees zero) yields the mean of the universe
    /// samples rather than an error.
    pub fn call<F: Float>(self, universe: &[F], membership: &[F]) -> F {
        debug_assert_eq!(universe.len(), membership.len());

        let total = membership.iter().copied().fold(F::zero(), |acc, m| acc + m);

        match universe {
            [] => return F::zero(),
            [only] => return *only,
            _ if total == F::zero() => {
                let len = F::from(universe.len()).unwrap_or_else(F::one);

                return universe.iter().copied().fold(F::zero(), |acc, u| acc + u) / len;
            },
            _ => {},
        }

        let two = F::one() + F::one();
        let three = two + F::one();
        let n_areas = universe.len() - 1;

        match self {
            Self::Cog => {
                let mut num = F::zero();
                let mut den = F::zero();

                for i in 0..n_areas {
                    let base = universe[i + 1] - universe[i];
                    let area_rect = F::min(membership[i], membership[i + 1]) * base;
                    let center_rect = universe[i] + base / two;
                    let (area_tria, center_tri) = if membership[i + 1] == membership[i] {
                        (F::zero(), F::zero())
                    } else if membership[i + 1] > membership[i] {
                        (
                            base * F::abs(membership[i + 1] - membership[i]) / two,
                            universe[i] + two / three * base,
                        )
                    } else {
                        (
                            base * F::abs(membership[i + 1] - membership[i]) / two,
                            universe[i] + F::one() / three * base,
                        )
                    };
                    let area = area_rect + area_tria;
                    let center = if area == F::zero() {
                        F::zero()
                    } else {
                        (area_rect * center_rect + area_tria * center_tri) / area
                    };

                    num = num + area * center;
                    den = den + area;
                }

                num / den
            },
            Self::Boa => {
                let areas: Vec<F> = (0..n_areas)
                    .map(|i| (membership[i] + membership[i + 1]) * (universe[i + 1] - universe[i]) / two)
                    .collect();
                let total_area = areas.iter().copied().fold(F::zero(), |acc, a| acc + a);
                let target = total_area / two;
                let mut cum_area = F::zero();
                let mut i_area = 0;

                for (i, area) in areas.iter().enumerate() {
                    cum_area = cum_area + *area;
                    i_area = i;
                    if cum_area >= target {
                        break;
                    }
                }

                let coords = [
                    (cum_area - areas[i_area], universe[i_area]),
                    (cum_area, universe[i_area + 1]),
                ];

                interp(Some(target), &coords).pop().unwrap_or(target)
            },
            Self::Mom | Self::Lom | Self::Som => {
                let maximum = membership.iter().copied().fold(F::neg_infinity(), F::max);
                let at_maximum = universe
                    .iter()
                    .copied()
                    .zip(membership.iter().copied())
                    .filter_map(|(u, m)| if m == maximum { Some(u) } else { None });

                match self {
                    Self::Mom => {
                        let (len, sum) = at_maximum.fold((F::zero(), F::zero()), |(len, sum), u| (len + F::one(), sum + u));

                        sum / len
                    },
                    Self::Lom => at_maximum.fold(F::neg_infinity(), F::max),
                    _ => at_maximum.fold(F::infinity(), F::min),
                }
            },
        }
    }
}

#[cfg(test)]
const UNIVERSE: [f64; 5] = [0., 1., 2., 3., 4.];

#[cfg(test)]
const TRIANGLE: [f64; 5] = [0., 0., 0.5, 1., 1.];

#[test]
fn test_defuzzification() {
    let cog = DefuzzificationOp::Cog.call(&UNIVERSE, &TRIANGLE);

    assert!((cog - 2.9166666666666665).abs() < 1e-12);
    assert_eq!(DefuzzificationOp::Boa.call(&UNIVERSE, &TRIANGLE), 3.);
    assert_eq!(DefuzzificationOp::Mom.call(&UNIVERSE, &TRIANGLE), 3.5);
    assert_eq!(DefuzzificationOp::Lom.call(&UNIVERSE, &TRIANGLE), 4.);
    assert_eq!(DefuzzificationOp::Som.call(&UNIVERSE, &TRIANGLE), 3.);
}

#[test]
fn test_defuzzification_of_empty_set() {
    let universe = [0., 1., 2., 6.];

    for op in DefuzzificationOp::ALL {
        assert_eq!(op.call(&universe, &[0.; 4]), 2.25);
        assert_eq!(op.call(&UNIVERSE, &[0.; 5]), 2.);
    }
}

#[test]
fn test_cog_of_symmetric_set() {
    let membership = [0., 0.5, 1., 0.5, 0.];

    assert!((DefuzzificationOp::Cog.call(&UNIVERSE, &membership) - 2.).abs() < 1e-12);
    assert_eq!(DefuzzificationOp::Boa.call(&UNIVERSE, &membership), 2.);
    assert_eq!(DefuzzificationOp::Mom.call(&UNIVERSE, &membership), 2.);
}

#[test]
fn test_boa_between_samples() {
    assert_eq!(DefuzzificationOp::Boa.call(&[0., 1.], &[1., 1.]), 0.5);
    // Half of the 1.5 total area is reached inside the first interval
    assert_eq!(DefuzzificationOp::Boa.call(&[0., 1., 2.], &[1., 1., 0.]), 0.75);
}

#[test]
fn test_single_operand_is_identity() {
    let u = [0.1, 0.6, 1.];

    for link in ProductionLink::ALL {
        assert_eq!(link.aggregate(&[u]), Ok(u.to_vec()));
    }
    assert_eq!(bounded_diff(&[u]), Ok(u.to_vec()));
}

#[test]
fn test_empty_operand() {
    let empty: [Vec<f64>; 0] = [];

    assert_eq!(ProductionLink::Max.aggregate(&empty), Err(FuzzyError::EmptyOperand));
    assert_eq!(bounded_diff(&empty), Err(FuzzyError::EmptyOperand));
}

#[test]
fn test_pairwise_reducers() {
    let u = [0., 0.25, 0.5, 1.];
    let v = [0.5, 0., 0.75, 0.5];
    let pair = [&u[..], &v[..]];

    assert_eq!(ProductionLink::Min.aggregate(&pair), Ok(vec![0., 0., 0.5, 0.5]));
    assert_eq!(ProductionLink::Max.aggregate(&pair), Ok(vec![0.5, 0.25, 0.75, 1.]));
    assert_eq!(ProductionLink::Prod.aggregate(&pair), Ok(vec![0., 0., 0.375, 0.5]));
    assert_eq!(ProductionLink::BoundedProd.aggregate(&pair), Ok(vec![0., 0., 0.25, 0.5]));
    assert_eq!(ProductionLink::BoundedSum.aggregate(&pair), Ok(vec![0.5, 0.25, 1., 1.]));
    assert_eq!(ProductionLink::ProbOr.aggregate(&pair), Ok(vec![0.5, 0.25, 0.875, 1.]));
    assert_eq!(ProductionLink::DrasticProd.aggregate(&pair), Ok(vec![0., 0.25, 0., 0.5]));
    assert_eq!(ProductionLink::DrasticSum.aggregate(&pair), Ok(vec![0.5, 0.25, 1., 1.]));
    assert_eq!(bounded_diff(&pair), Ok(vec![0., 0.25, 0., 0.5]));
}

#[test]
fn test_three_way_fold() {
    let memberships = vec![vec![0.5, 0.5], vec![0.5, 0.], vec![0.5, 0.]];

    assert_eq!(ProductionLink::ProbOr.aggregate(&memberships), Ok(vec![0.875, 0.5]));
    assert_eq!(ProductionLink::Prod.aggregate(&memberships), Ok(vec![0.125, 0.]));
}

#[test]
fn test_implication_kernels() {
    let corners = [(0., 0.), (0., 1.), (1., 0.), (1., 1.)];
    let expected = [
        (ImplicationOp::Ra, [1., 1., 0., 1.]),
        (ImplicationOp::Rm, [1., 1., 0., 1.]),
        (ImplicationOp::Rc, [0., 0., 0., 1.]),
        (ImplicationOp::Rb, [1., 1., 0., 1.]),
        (ImplicationOp::Rs, [1., 1., 0., 1.]),
        (ImplicationOp::Rg, [1., 1., 0., 1.]),
        (ImplicationOp::Rsg, [1., 0., 0., 1.]),
        (ImplicationOp::Rgs, [1., 0., 0., 1.]),
        (ImplicationOp::Rgg, [1., 0., 0., 1.]),
        (ImplicationOp::Rss, [1., 0., 0., 1.]),
    ];

    for (op, values) in expected {
        for ((u, v), value) in corners.iter().zip(values) {
            assert_eq!(op.apply(*u, *v), value, "{op} at ({u}, {v})");
        }
    }

    assert_eq!(ImplicationOp::Rg.apply(0.8, 0.3), 0.3);
    assert_eq!(ImplicationOp::Ra.apply(0.75, 0.25), 0.5);
}

#[test]
fn test_composition() {
    // Rows follow the premise universe, columns the consequence universe
    let implication = Matrix::new(vec![0.2, 0.9, 0.6, 0.4], (2, 2));
    let fact = [1., 0.5];

    assert_eq!(CompositionOp::MaxMin.compose(&fact, &implication), vec![0.5, 0.9]);
    assert_eq!(CompositionOp::MaxProd.compose(&fact, &implication), vec![0.3, 0.9]);
}

#[test]
fn test_operator_names() {
    assert_eq!("bounded_prod".parse::<ProductionLink>(), Ok(ProductionLink::BoundedProd));
    assert_eq!("max-prod".parse::<CompositionOp>(), Ok(CompositionOp::MaxProd));
    assert_eq!("Rgs".parse::<ImplicationOp>(), Ok(ImplicationOp::Rgs));
    assert_eq!(DefuzzificationOp::Boa.to_string(), "boa");
    assert_eq!(
        "centroid".parse::<DefuzzificationOp>(),
        Err(FuzzyError::UnknownOperator {
            kind: "defuzzification",
            name: "centroid".into()
        })
    );
    assert!("prob-or".parse::<ProductionLink>().is_err());
}
