//! Mamdani-style fuzzy inference with certainty factors.
//!
//! Build [`Variables`] with typed [`Terms`], describe [`Rules`] with the
//! `var.is(term).and(...)` builders, feed crisp or fuzzy [`Inputs`] to a
//! [`DecompInference`] and read crisp values and the overall certainty factor
//! back from [`Outputs`].

/// Textual names for a closed set of operator variants: `as_str`, `Display`,
/// case-insensitive `FromStr` and the `String` conversions serde goes through.
macro_rules! named_variants {
    ($ty:ident, $unknown:expr, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = crate::error::FuzzyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($name) {
                        return Ok(Self::$variant);
                    }
                )+

                Err(($unknown)(s.to_owned()))
            }
        }

        impl TryFrom<String> for $ty {
            type Error = crate::error::FuzzyError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }

        impl From<$ty> for &'static str {
            fn from(value: $ty) -> Self {
                value.as_str()
            }
        }
    };
}

mod config;
mod dsl;
mod error;
mod inference;
mod inputs;
mod linspace;
mod math;
mod mf;
mod modifiers;
mod ops;
mod outputs;
mod rules;
mod terms;
mod variable;

pub use config::InferenceConfig;
pub use dsl::{Connective, Premise, Proposition};
pub use error::{FuzzyError, Result};
pub use inference::DecompInference;
pub use inputs::{Fact, FactKind, Inputs};
pub use mf::MembershipFn;
pub use modifiers::{apply_modifiers, apply_named_modifiers, Modifier};
pub use ops::{bounded_diff, CompositionOp, DefuzzificationOp, ImplicationOp, ProductionLink};
pub use outputs::{Outputs, RuleTrace};
pub use rules::{Rule, Rules};
pub use terms::{Key, Term, TermSpec, Terms};
pub use variable::{Variable, VariableKey, Variables};
