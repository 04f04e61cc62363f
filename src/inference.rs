use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::config::InferenceConfig;
use crate::dsl::{Connective, Proposition};
use crate::error::{FuzzyError, Result};
use crate::inputs::{Fact, FactKind, Inputs};
use crate::math::{meshgrid, CollectMatrix};
use crate::ops::*;
use crate::outputs::{Outputs, RuleTrace};
use crate::rules::{Rule, Rules};
use crate::variable::{sorted_points, unknown_term, VariableKey, Variables};

/// Decompositional (Mamdani) inference: each premise proposition is composed
/// with its own implication relation and the results are combined afterwards.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DecompInference {
    and_op: ProductionLink,
    or_op: ProductionLink,
    comp_op: CompositionOp,
    imp_op: ImplicationOp,
    prod_link: ProductionLink,
    defuzz_op: DefuzzificationOp,
}

impl DecompInference {
    pub fn new(
        and_op: ProductionLink,
        or_op: ProductionLink,
        comp_op: CompositionOp,
        imp_op: ImplicationOp,
        prod_link: ProductionLink,
        defuzz_op: DefuzzificationOp,
    ) -> Self {
        Self {
            and_op,
            or_op,
            comp_op,
            imp_op,
            prod_link,
            defuzz_op,
        }
    }

    pub fn config(&self) -> InferenceConfig {
        InferenceConfig {
            and_operator: self.and_op,
            or_operator: self.or_op,
            composition_operator: self.comp_op,
            implication_operator: self.imp_op,
            production_link: self.prod_link,
            defuzzification_operator: self.defuzz_op,
        }
    }

    /// Runs the rules against the facts in `inputs`.
    ///
    /// Fact values are added to the universes of their variables, which is
    /// the only change made to `vars`. Every fact, rule variable and rule term
    /// is checked first, so on error `vars` is left as it was.
    pub fn eval<T>(&self, vars: &mut Variables<T>, rules: &Rules<T>, inputs: &Inputs) -> Result<Outputs>
    where
        T: Copy + Debug + Eq + Hash,
    {
        let facts = check_facts(vars, inputs)?;

        check_rules(vars, rules, inputs)?;

        let _span = tracing::debug_span!("eval", rules = rules.len(), facts = facts.len()).entered();

        // Fuzzificate facts
        let mut fact_memberships = HashMap::with_capacity(facts.len());
        let mut fact_cf = HashMap::with_capacity(facts.len());

        for (key, fact, cf) in facts {
            let var = vars.get_mut(key)?;
            let fuzzificated = match fact {
                CheckedFact::Crisp(value) => (FactKind::Crisp, var.fuzzificate_crisp(value)),
                CheckedFact::Fuzzy(points) => (FactKind::Fuzzy, var.fuzzificate_fuzzy(&points)),
            };

            fact_memberships.insert(key, fuzzificated);
            fact_cf.insert(key, cf);
        }

        tracing::debug!(facts = fact_memberships.len(), "fuzzificated facts");

        // Universes are final from here on
        let vars = &*vars;
        let mut rule_traces = Vec::with_capacity(rules.len());

        for (i, rule) in rules.iter().enumerate() {
            let trace = self.eval_rule(vars, rule, &fact_memberships, &fact_cf)?;

            tracing::trace!(
                rule = i,
                inferred_cf = trace.inferred_cf,
                threshold_cf = rule.threshold_cf,
                fired = trace.fired,
                "evaluated rule"
            );

            rule_traces.push(trace);
        }

        tracing::debug!(fired = rule_traces.iter().filter(|t| t.fired).count(), "evaluated rules");

        // Collect rule memberships. Every consequence variable gets an entry,
        // even when none of its rules fired.
        let mut collected: HashMap<VariableKey, Vec<&[f64]>> = HashMap::new();

        for (rule, trace) in rules.iter().zip(&rule_traces) {
            for prop in &rule.consequence {
                let memberships = collected.entry(prop.variable).or_default();

                if !trace.fired {
                    continue;
                }

                if let Some(combined) = trace.combined_compositions.get(&prop.variable) {
                    memberships.push(combined);
                }
            }
        }

        // Aggregate and defuzzificate
        let mut aggregated_memberships = HashMap::with_capacity(collected.len());
        let mut defuzzificated_inferred_memberships = HashMap::with_capacity(collected.len());

        for (key, memberships) in collected {
            let var = vars.get(key)?;
            let aggregated = if memberships.is_empty() {
                vec![0.; var.universe.len()]
            } else {
                self.prod_link.aggregate(&memberships[..])?
            };
            let value = self.defuzz_op.call(&var.universe, &aggregated);

            tracing::debug!(variable = ?key, rules = memberships.len(), value, "defuzzificated");

            aggregated_memberships.insert(key, aggregated);
            defuzzificated_inferred_memberships.insert(key, value);
        }

        let inferred_cf = rule_traces.iter().map(|t| t.inferred_cf).fold(0., f64::max);

        tracing::debug!(inferred_cf, "inference done");

        Ok(Outputs {
            defuzzificated_inferred_memberships,
            aggregated_memberships,
            fact_memberships,
            rule_traces,
            inferred_cf,
        })
    }

    fn eval_rule<T>(
        &self,
        vars: &Variables<T>,
        rule: &Rule<T>,
        fact_memberships: &HashMap<VariableKey, (FactKind, Vec<f64>)>,
        fact_cf: &HashMap<VariableKey, f64>,
    ) -> Result<RuleTrace>
    where
        T: Copy + Debug + Eq + Hash,
    {
        // Modified premise memberships, in premise order
        let premise = rule
            .premise
            .propositions()
            .map(|prop| Ok((prop.variable, modified_membership(vars, prop)?)))
            .collect::<Result<Vec<_>>>()?;
        let consequence = rule
            .consequence
            .iter()
            .map(|prop| Ok((prop.variable, modified_membership(vars, prop)?)))
            .collect::<Result<Vec<_>>>()?;
        let mut combined_compositions = HashMap::with_capacity(consequence.len());

        for (consequence_key, consequence_membership) in &consequence {
            // Implication and composition, one per premise proposition
            let mut compositions = Vec::with_capacity(premise.len());

            for (premise_key, premise_membership) in &premise {
                let (_, fact) = fact_memberships
                    .get(premise_key)
                    .ok_or_else(|| missing_fact(*premise_key))?;
                let (v, u) = meshgrid(
                    consequence_membership.iter().copied(),
                    premise_membership.iter().copied(),
                );
                let shape = v.shape();
                let implication = self.imp_op.call(u, v).collect_matrix(shape);

                compositions.push(self.comp_op.compose(fact, &implication));
            }

            // Combine antecedents, strictly left to right
            let mut compositions = compositions.into_iter();
            let mut combined = compositions.next().ok_or(FuzzyError::EmptyOperand)?;

            for ((connective, _), composition) in rule.premise.rest().iter().zip(compositions) {
                combined = match connective {
                    Connective::And => self.and_op.call(combined, composition).into_iter().collect(),
                    Connective::Or => self.or_op.call(combined, composition).into_iter().collect(),
                };
            }

            combined_compositions.insert(*consequence_key, combined);
        }

        // Fact CFs are always combined with min/max, whatever the operators
        let cf_of = |key: VariableKey| fact_cf.get(&key).copied().ok_or_else(|| missing_fact(key));
        let mut premise_cf = cf_of(rule.premise.first().variable)?;

        for (connective, prop) in rule.premise.rest() {
            let cf = cf_of(prop.variable)?;

            premise_cf = match connective {
                Connective::And => premise_cf.min(cf),
                Connective::Or => premise_cf.max(cf),
            };
        }

        let inferred_cf = premise_cf * rule.cf;

        Ok(RuleTrace {
            modified_premise_memberships: premise.into_iter().collect(),
            modified_consequence_memberships: consequence.into_iter().collect(),
            combined_compositions,
            inferred_cf,
            fired: inferred_cf >= rule.threshold_cf,
        })
    }
}

impl Default for DecompInference {
    fn default() -> Self {
        InferenceConfig::default().into()
    }
}

impl From<InferenceConfig> for DecompInference {
    fn from(config: InferenceConfig) -> Self {
        Self::new(
            config.and_operator,
            config.or_operator,
            config.composition_operator,
            config.implication_operator,
            config.production_link,
            config.defuzzification_operator,
        )
    }
}

enum CheckedFact {
    Crisp(f64),
    /// Sorted by x
    Fuzzy(Vec<(f64, f64)>),
}

fn check_facts<T>(vars: &Variables<T>, inputs: &Inputs) -> Result<Vec<(VariableKey, CheckedFact, f64)>>
where
    T: Copy + Debug + Eq + Hash,
{
    inputs
        .0
        .iter()
        .map(|(key, fact)| {
            vars.get(*key)?;

            let checked = match fact {
                Fact::Crisp { value, .. } => CheckedFact::Crisp(*value),
                Fact::Fuzzy { points, .. } => CheckedFact::Fuzzy(sorted_points(points)?),
            };

            Ok((*key, checked, fact.cf()))
        })
        .collect()
}

fn check_rules<T>(vars: &Variables<T>, rules: &Rules<T>, inputs: &Inputs) -> Result<()>
where
    T: Copy + Debug + Eq + Hash,
{
    for rule in rules.iter() {
        for prop in rule.premise.propositions() {
            check_proposition(vars, prop)?;

            if !inputs.0.contains_key(&prop.variable) {
                return Err(missing_fact(prop.variable));
            }
        }

        for prop in &rule.consequence {
            check_proposition(vars, prop)?;
        }
    }

    Ok(())
}

fn check_proposition<T>(vars: &Variables<T>, prop: &Proposition<T>) -> Result<()>
where
    T: Copy + Debug + Eq + Hash,
{
    if vars.get(prop.variable)?.terms.contains_key(&prop.term) {
        Ok(())
    } else {
        Err(unknown_term(prop.variable, &prop.term))
    }
}

fn modified_membership<T>(vars: &Variables<T>, prop: &Proposition<T>) -> Result<Vec<f64>>
where
    T: Copy + Debug + Eq + Hash,
{
    vars.get(prop.variable)?
        .get_modified_membership(&prop.term, &prop.modifiers)
        .ok_or_else(|| unknown_term(prop.variable, &prop.term))
}

fn missing_fact(key: VariableKey) -> FuzzyError {
    FuzzyError::MissingFact {
        variable: format!("{key:?}"),
    }
}

#[cfg(test)]
mod fixtures {
    use crate::rules::Rules;
    use crate::terms::{Key, Terms};
    use crate::variable::{Variable, Variables};

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
    pub(super) enum Score {
        High,
        Low,
    }

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
    pub(super) enum Ratio {
        Good,
        Bad,
    }

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
    pub(super) enum Credit {
        Good,
        Bad,
    }

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
    pub(super) enum Decision {
        Approve,
        Reject,
    }

    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    pub(super) enum VarTerms {
        Score(Score),
        Ratio(Ratio),
        Credit(Credit),
        Decision(Decision),
    }

    macro_rules! var_terms_from {
        ($($term:ident),+) => {
            $(
                impl From<$term> for VarTerms {
                    fn from(term: $term) -> Self {
                        Self::$term(term)
                    }
                }
            )+
        };
    }

    var_terms_from!(Score, Ratio, Credit, Decision);

    pub(super) struct Loan {
        pub(super) vars: Variables<VarTerms>,
        pub(super) score: Variable<Score>,
        pub(super) ratio: Variable<Ratio>,
        pub(super) credit: Variable<Credit>,
        pub(super) decision: Variable<Decision>,
    }

    pub(super) fn decision_terms() -> Terms<'static, Decision> {
        let mut terms = Terms::new();

        terms.insert(Decision::Approve, &[(5., 0.), (6., 0.3), (7., 0.7), (8., 1.)]);
        terms.insert(Decision::Reject, &[(2., 1.), (3., 0.7), (4., 0.3), (5., 0.)]);
        terms
    }

    pub(super) fn loan() -> Loan {
        let mut score_terms = Terms::new();
        let mut ratio_terms = Terms::new();
        let mut credit_terms = Terms::new();

        score_terms.insert(Score::High, &[(175., 0.), (180., 0.2), (185., 0.7), (190., 1.)]);
        score_terms.insert(Score::Low, &[(155., 1.), (160., 0.8), (165., 0.5), (170., 0.2), (175., 0.)]);
        ratio_terms.insert(Ratio::Good, &[(0.3, 1.), (0.4, 0.7), (0.41, 0.3), (0.42, 0.)]);
        ratio_terms.insert(Ratio::Bad, &[(0.44, 0.), (0.45, 0.3), (0.5, 0.7), (0.7, 1.)]);
        credit_terms.insert(Credit::Good, &[(2., 1.), (3., 0.7), (4., 0.3), (5., 0.)]);
        credit_terms.insert(Credit::Bad, &[(5., 0.), (6., 0.3), (7., 0.7), (8., 1.)]);

        let mut vars = Variables::<VarTerms>::new();
        let score = vars.add(150. ..=200., score_terms, None).unwrap();
        let ratio = vars.add(0.1..=1., ratio_terms, None).unwrap();
        let credit = vars.add(0. ..=10., credit_terms, None).unwrap();
        let decision = vars.add(0. ..=10., decision_terms(), None).unwrap();

        Loan {
            vars,
            score,
            ratio,
            credit,
            decision,
        }
    }

    /// IF score IS High AND ratio IS Good AND credit IS Good THEN decision IS Approve
    /// IF score IS Low AND ratio IS Bad OR credit IS Bad THEN decision IS Reject
    pub(super) fn loan_rules(loan: &Loan) -> Rules<VarTerms> {
        let mut rules = Rules::new();

        rules
            .add(
                loan.score
                    .is(Score::High)
                    .and(loan.ratio.is(Ratio::Good))
                    .and(loan.credit.is(Credit::Good)),
                [loan.decision.is(Decision::Approve)],
            )
            .unwrap();
        rules
            .add(
                loan.score
                    .is(Score::Low)
                    .and(loan.ratio.is(Ratio::Bad))
                    .or(loan.credit.is(Credit::Bad)),
                [loan.decision.is(Decision::Reject)],
            )
            .unwrap();
        rules
    }
}

#[cfg(test)]
fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("no inferred value");

    assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
}

#[test]
fn test_bank_loan() {
    use fixtures::*;

    let mut loan = loan();
    let rules = loan_rules(&loan);
    let mut inputs = Inputs::new();

    inputs.add(loan.score, 190.);
    inputs.add(loan.ratio, 0.39);
    inputs.add(loan.credit, 1.5);

    let model = DecompInference::new(
        ProductionLink::Min,
        ProductionLink::Max,
        CompositionOp::MaxMin,
        ImplicationOp::Rc,
        ProductionLink::Max,
        DefuzzificationOp::Cog,
    );
    let outputs = model.eval(&mut loan.vars, &rules, &inputs).unwrap();

    assert_close(outputs.get_inferred_membership(loan.decision), 8.010492631084489);
    assert_eq!(outputs.inferred_cf(), 1.);
    assert_eq!(outputs.fact_kind(loan.score), Some(FactKind::Crisp));
    assert_eq!(outputs.rule_traces().len(), 2);
    assert!(outputs.rule_traces().iter().all(RuleTrace::fired));
    assert_eq!(
        outputs.aggregated_membership(loan.decision).map(<[f64]>::len),
        Some(loan.vars.universe(loan.decision).unwrap().len())
    );

    // The default configuration is the same operator bundle
    assert_eq!(DecompInference::default(), model);
    assert_eq!(DecompInference::from(model.config()), model);

    let outputs = DecompInference::default().eval(&mut loan.vars, &rules, &inputs).unwrap();

    assert_close(outputs.get_inferred_membership(loan.decision), 8.010492631084489);
}

#[test]
fn test_fact_and_rule_cfs() {
    use fixtures::*;

    let mut loan = loan();
    let mut rules = Rules::<VarTerms>::new();
    let [approve, reject]: [Rule<VarTerms>; 2] = loan_rules(&loan).0.try_into().unwrap();

    rules.push(approve.with_cf(0.8).unwrap());
    rules.push(reject.with_cf(0.7).unwrap());

    let mut inputs = Inputs::new();

    inputs.add(loan.score, (190., 0.9));
    inputs.add(loan.ratio, 0.39);
    inputs.add(loan.credit, 1.5);

    let outputs = DecompInference::default().eval(&mut loan.vars, &rules, &inputs).unwrap();

    // min(0.9, 1, 1) * 0.8 and max(min(0.9, 1), 1) * 0.7
    assert!((outputs.rule_traces()[0].inferred_cf() - 0.72).abs() < 1e-12);
    assert!((outputs.rule_traces()[1].inferred_cf() - 0.7).abs() < 1e-12);
    assert!((outputs.inferred_cf() - 0.72).abs() < 1e-12);
    // CFs never scale memberships
    assert_close(outputs.get_inferred_membership(loan.decision), 8.010492631084489);
}

#[test]
fn test_fuzzy_facts() {
    use fixtures::*;

    let mut loan = loan();
    let mut rules = Rules::<VarTerms>::new();
    let [approve, reject]: [Rule<VarTerms>; 2] = loan_rules(&loan).0.try_into().unwrap();

    rules.push(approve.with_cf(0.8).unwrap());
    rules.push(reject.with_cf(0.7).unwrap());

    let mut inputs = Inputs::new();

    inputs.add(loan.score, vec![(180., 0.), (190., 0.2), (195., 0.8), (200., 1.)]);
    inputs.add(
        loan.ratio,
        vec![(0.1, 1.), (0.3, 1.), (0.4, 0.6), (0.41, 0.2), (0.42, 0.)],
    );
    // Unsorted points are fine
    inputs.add(
        loan.credit,
        vec![(1., 1.), (0., 0.), (2., 1.), (3., 0.7), (4., 0.3), (5., 0.)],
    );

    let outputs = DecompInference::default().eval(&mut loan.vars, &rules, &inputs).unwrap();

    assert_close(outputs.get_inferred_membership(loan.decision), 8.152380952380954);
    assert!((outputs.inferred_cf() - 0.8).abs() < 1e-12);
    assert_eq!(outputs.fact_kind(loan.credit), Some(FactKind::Fuzzy));

    let universe = loan.vars.universe(loan.score).unwrap();
    let fact = outputs.fact_membership(loan.score).unwrap();
    let at = |x: f64| fact[universe.iter().position(|u| *u == x).unwrap()];

    assert_eq!(at(150.), 0.);
    assert_eq!(at(195.), 0.8);
    assert_eq!(at(200.), 1.);
}

#[test]
fn test_single_rule_with_crisp_fact() {
    use fixtures::*;

    for (imp_op, comp_op) in [
        (ImplicationOp::Rc, CompositionOp::MaxMin),
        (ImplicationOp::Rc, CompositionOp::MaxProd),
        (ImplicationOp::Ra, CompositionOp::MaxMin),
    ] {
        let mut loan = loan();
        let mut rules = Rules::<VarTerms>::new();

        rules
            .add(loan.score.is(Score::High), [loan.decision.is(Decision::Approve)])
            .unwrap();

        let mut inputs = Inputs::new();

        // High(185) is exactly 0.7
        inputs.add(loan.score, 185.);

        let model = DecompInference {
            imp_op,
            comp_op,
            ..DecompInference::default()
        };
        let outputs = model.eval(&mut loan.vars, &rules, &inputs).unwrap();
        let approve = loan.vars.membership(loan.decision, Decision::Approve).unwrap();
        let expected: Vec<_> = match imp_op {
            ImplicationOp::Ra => approve.iter().map(|m| f64::min(1., 1. - 0.7 + m)).collect(),
            _ => approve.iter().map(|m| m.min(0.7)).collect(),
        };

        assert_eq!(outputs.aggregated_membership(loan.decision), Some(&expected[..]));
    }
}

#[test]
fn test_multiple_consequences_infer_independently() {
    use fixtures::*;

    let mut loan = loan();
    let decision2 = loan.vars.add(0. ..=10., decision_terms(), None).unwrap();
    let mut rules = Rules::<VarTerms>::new();

    rules
        .add(
            loan.score
                .is(Score::High)
                .and(loan.ratio.is(Ratio::Good))
                .and(loan.credit.is(Credit::Good)),
            [loan.decision.is(Decision::Approve), decision2.is(Decision::Approve)],
        )
        .unwrap();
    rules
        .add(
            loan.score
                .is(Score::Low)
                .and(loan.ratio.is(Ratio::Bad))
                .or(loan.credit.is(Credit::Bad)),
            [loan.decision.is(Decision::Reject), decision2.is(Decision::Reject)],
        )
        .unwrap();

    let mut inputs = Inputs::new();

    inputs.add(loan.score, 190.);
    inputs.add(loan.ratio, 0.39);
    inputs.add(loan.credit, 1.5);

    let outputs = DecompInference::default().eval(&mut loan.vars, &rules, &inputs).unwrap();

    assert_close(outputs.get_inferred_membership(loan.decision), 8.010492631084489);
    assert_eq!(
        outputs.get_inferred_membership(loan.decision),
        outputs.get_inferred_membership(decision2)
    );
}

#[test]
fn test_threshold_excludes_rule() {
    use fixtures::*;

    let mut loan = loan();
    let mut rules = Rules::<VarTerms>::new();

    rules.push(
        Rule::new(loan.score.is(Score::High), [loan.decision.is(Decision::Approve)])
            .unwrap()
            .with_cf(0.5)
            .unwrap()
            .with_threshold_cf(0.9),
    );

    let mut inputs = Inputs::new();

    inputs.add(loan.score, 190.);

    let outputs = DecompInference::default().eval(&mut loan.vars, &rules, &inputs).unwrap();
    let universe = loan.vars.universe(loan.decision).unwrap();
    let mean = universe.iter().sum::<f64>() / universe.len() as f64;
    let trace = outputs.rule_trace(0).unwrap();

    assert!(!trace.fired());
    assert_eq!(trace.inferred_cf(), 0.5);
    assert!(trace.combined_composition(loan.decision).is_some());
    assert!(outputs
        .aggregated_membership(loan.decision)
        .unwrap()
        .iter()
        .all(|m| *m == 0.));
    assert_eq!(outputs.get_inferred_membership(loan.decision), Some(mean));
}

#[test]
fn test_hedged_propositions() {
    use crate::modifiers::Modifier;
    use fixtures::*;

    let mut loan = loan();
    let mut rules = Rules::<VarTerms>::new();

    rules
        .add(
            loan.score.is(Score::High).hedged([Modifier::Very]),
            [loan.decision.is(Decision::Approve).hedged([Modifier::Not])],
        )
        .unwrap();

    let mut inputs = Inputs::new();

    inputs.add(loan.score, 185.);

    let outputs = DecompInference::default().eval(&mut loan.vars, &rules, &inputs).unwrap();
    let trace = outputs.rule_trace(0).unwrap();
    let high = loan.vars.membership(loan.score, Score::High).unwrap();
    let approve = loan.vars.membership(loan.decision, Decision::Approve).unwrap();
    let very_high: Vec<_> = high.iter().map(|m| m.powi(2)).collect();
    let not_approve: Vec<_> = approve.iter().map(|m| 1. - m).collect();

    assert_eq!(trace.modified_premise_membership(loan.score), Some(&very_high[..]));
    assert_eq!(trace.modified_consequence_membership(loan.decision), Some(&not_approve[..]));
}

#[test]
fn test_failed_eval_leaves_variables_untouched() {
    use fixtures::*;

    let mut loan = loan();
    let score_len = loan.vars.universe(loan.score).unwrap().len();
    let mut inputs = Inputs::new();

    // Not on the sampled grid, so a successful run extends the universe.
    // Credit has no fact.
    inputs.add(loan.score, 190.05);
    inputs.add(loan.ratio, 0.39);

    let rules = loan_rules(&loan);
    let result = DecompInference::default().eval(&mut loan.vars, &rules, &inputs);

    assert!(matches!(result, Err(FuzzyError::MissingFact { .. })));
    assert_eq!(loan.vars.universe(loan.score).unwrap().len(), score_len);

    // A term the variable doesn't have
    let mut vars = Variables::<VarTerms>::new();
    let score = vars
        .add(150. ..=200., crate::terms::Terms::<Score>::new(), None)
        .unwrap();
    let decision = vars.add(0. ..=10., decision_terms(), None).unwrap();
    let score_len = vars.universe(score).unwrap().len();
    let mut rules = Rules::<VarTerms>::new();

    rules.add(score.is(Score::High), [decision.is(Decision::Approve)]).unwrap();

    let mut inputs = Inputs::new();

    inputs.add(score, 190.05);

    let result = DecompInference::default().eval(&mut vars, &rules, &inputs);

    assert!(matches!(result, Err(FuzzyError::UnknownTerm { .. })));
    assert_eq!(vars.universe(score).unwrap().len(), score_len);

    // Once the term exists the same inputs go through and extend the universe
    vars.set_term(score, Score::High, &[(175., 0.), (190., 1.)]).unwrap();

    let score_len = vars.universe(score).unwrap().len();

    DecompInference::default().eval(&mut vars, &rules, &inputs).unwrap();

    assert_eq!(vars.universe(score).unwrap().len(), score_len + 1);
}

#[test]
fn test_unknown_variables_and_empty_facts() {
    use fixtures::*;

    let mut loan = loan();
    let rules = loan_rules(&loan);

    // A handle from a bigger arena doesn't exist in this one
    let mut other = Variables::<Score>::new();
    let stray = (0..8)
        .map(|_| other.add(0. ..=1., crate::terms::Terms::<Score>::new(), None).unwrap())
        .last()
        .unwrap();
    let mut inputs = Inputs::new();

    inputs.add(stray, 0.5);

    let result = DecompInference::default().eval(&mut loan.vars, &rules, &inputs);

    assert!(matches!(result, Err(FuzzyError::UnknownVariable { .. })));

    let mut inputs = Inputs::new();

    inputs.add(loan.score, Vec::<(f64, f64)>::new());
    inputs.add(loan.ratio, 0.39);
    inputs.add(loan.credit, 1.5);

    let result = DecompInference::default().eval(&mut loan.vars, &rules, &inputs);

    assert_eq!(result.unwrap_err(), FuzzyError::EmptyMembership);
}

#[test]
fn test_no_rules() {
    use fixtures::*;

    let mut loan = loan();
    let mut inputs = Inputs::new();

    inputs.add(loan.score, 190.);

    let outputs = DecompInference::default()
        .eval(&mut loan.vars, &Rules::<VarTerms>::new(), &inputs)
        .unwrap();

    assert_eq!(outputs.inferred_cf(), 0.);
    assert_eq!(outputs.get_inferred_membership(loan.decision), None);
    assert!(outputs.fact_membership(loan.score).is_some());
}

/// IF score IS High AND ratio IS Good OR credit IS Bad THEN decision IS Approve,
/// fed facts where High = 0.7, Good = 0.7 and Bad = 0.3. Returns the Approve
/// membership, the rule's combined composition and its inferred CF.
#[cfg(test)]
fn eval_mixed_connectives(model: DecompInference) -> (Vec<f64>, Vec<f64>, f64) {
    use fixtures::*;

    let mut loan = loan();
    let mut rules = Rules::<VarTerms>::new();

    rules.push(
        Rule::new(
            loan.score
                .is(Score::High)
                .and(loan.ratio.is(Ratio::Good))
                .or(loan.credit.is(Credit::Bad)),
            [loan.decision.is(Decision::Approve)],
        )
        .unwrap()
        .with_cf(0.8)
        .unwrap(),
    );

    let mut inputs = Inputs::new();

    inputs.add(loan.score, (185., 0.9));
    inputs.add(loan.ratio, (0.4, 0.6));
    inputs.add(loan.credit, (6., 0.5));

    let outputs = model.eval(&mut loan.vars, &rules, &inputs).unwrap();
    let trace = outputs.rule_trace(0).unwrap();
    let approve = loan.vars.membership(loan.decision, Decision::Approve).unwrap();

    (
        approve.to_vec(),
        trace.combined_composition(loan.decision).unwrap().to_vec(),
        trace.inferred_cf(),
    )
}

#[test]
fn test_algebraic_connectives_leave_cf_on_min_max() {
    let model = DecompInference {
        and_op: ProductionLink::Prod,
        or_op: ProductionLink::ProbOr,
        ..DecompInference::default()
    };
    let (approve, combined, cf) = eval_mixed_connectives(model);
    let expected: Vec<_> = approve
        .iter()
        .map(|c| {
            let and = c.min(0.7) * c.min(0.7);
            let or = c.min(0.3);

            and + or - and * or
        })
        .collect();

    assert_eq!(combined, expected);
    // max(min(0.9, 0.6), 0.5) * 0.8, not the product/probabilistic sum of the CFs
    assert!((cf - 0.48).abs() < 1e-12);
}

#[test]
fn test_swapped_connectives_from_config() {
    let config: InferenceConfig = toml::from_str(
        r#"
        and_operator = "max"
        or_operator = "min"
        "#,
    )
    .unwrap();
    let (approve, combined, cf) = eval_mixed_connectives(config.into());
    let expected: Vec<_> = approve
        .iter()
        .map(|c| c.min(0.7).max(c.min(0.7)).min(c.min(0.3)))
        .collect();

    assert!(expected.iter().any(|m| *m > 0.));
    assert_eq!(combined, expected);
    assert!((cf - 0.48).abs() < 1e-12);
}
