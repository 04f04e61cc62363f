use serde::{Deserialize, Serialize};

use crate::ops::{CompositionOp, DefuzzificationOp, ImplicationOp, ProductionLink};

/// Operator choices for a [`DecompInference`](crate::DecompInference), readable
/// from any serde format by operator name.
///
/// ```toml
/// and_operator = "min"
/// or_operator = "max"
/// composition_operator = "max-min"
/// implication_operator = "Rc"
/// production_link = "max"
/// defuzzification_operator = "cog"
/// ```
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct InferenceConfig {
    pub and_operator: ProductionLink,
    pub or_operator: ProductionLink,
    pub composition_operator: CompositionOp,
    pub implication_operator: ImplicationOp,
    pub production_link: ProductionLink,
    pub defuzzification_operator: DefuzzificationOp,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            and_operator: ProductionLink::Min,
            or_operator: ProductionLink::Max,
            composition_operator: CompositionOp::MaxMin,
            implication_operator: ImplicationOp::Rc,
            production_link: ProductionLink::Max,
            defuzzification_operator: DefuzzificationOp::Cog,
        }
    }
}

#[test]
fn test_config_from_toml() {
    let config: InferenceConfig = toml::from_str(
        r#"
        and_operator = "prod"
        or_operator = "prob_or"
        composition_operator = "max-prod"
        implication_operator = "Rg"
        production_link = "bounded_sum"
        defuzzification_operator = "mom"
        "#,
    )
    .unwrap();

    assert_eq!(config.and_operator, ProductionLink::Prod);
    assert_eq!(config.or_operator, ProductionLink::ProbOr);
    assert_eq!(config.composition_operator, CompositionOp::MaxProd);
    assert_eq!(config.implication_operator, ImplicationOp::Rg);
    assert_eq!(config.production_link, ProductionLink::BoundedSum);
    assert_eq!(config.defuzzification_operator, DefuzzificationOp::Mom);
}

#[test]
fn test_config_defaults_and_round_trip() {
    let config: InferenceConfig = toml::from_str(r#"defuzzification_operator = "boa""#).unwrap();

    assert_eq!(
        config,
        InferenceConfig {
            defuzzification_operator: DefuzzificationOp::Boa,
            ..InferenceConfig::default()
        }
    );

    let text = toml::to_string(&config).unwrap();

    assert!(text.contains(r#"composition_operator = "max-min""#));
    assert_eq!(toml::from_str::<InferenceConfig>(&text).unwrap(), config);
}

#[test]
fn test_connectives_accept_every_link() {
    for link in ProductionLink::ALL {
        let config: InferenceConfig =
            toml::from_str(&format!("and_operator = \"{link}\"\nor_operator = \"{link}\"")).unwrap();

        assert_eq!(config.and_operator, *link);
        assert_eq!(config.or_operator, *link);
    }
}

#[test]
fn test_config_rejects_unknown_operator() {
    let err = toml::from_str::<InferenceConfig>(r#"implication_operator = "Rz""#).unwrap_err();

    assert!(err.to_string().contains("unknown implication operator `Rz`"));
}
