use super::diagnostics::Diagnostic;
use super::error::AssemblyError;
use crate::core::prototype::ChainPrototype;
use crate::core::prototype::flexible::FlexiblePrototype;

const FRACTION_TOLERANCE: f64 = 1e-9;

/// A chain prototype together with the fraction of matched sites it should occupy.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainSpec {
    pub prototype: ChainPrototype,
    pub fraction: f64,
}

/// The chain species of one assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesPlan {
    pub specs: Vec<ChainSpec>,
    /// Present when no fractions were given and a single species was assumed.
    pub default_notice: Option<Diagnostic>,
}

impl SpeciesPlan {
    /// Pairs prototypes with fractions.
    ///
    /// Without fractions, zero prototypes select the default alkyl chain of
    /// `chain_length` carbons and one prototype takes every matched site; both emit a
    /// warning. Two or more prototypes without fractions are ambiguous and rejected.
    /// An empty fraction list with no prototypes counts as no fractions.
    pub fn resolve(
        chains: &[ChainPrototype],
        fractions: Option<&[f64]>,
        chain_length: usize,
    ) -> Result<Self, AssemblyError> {
        let fractions = fractions.filter(|f| !(f.is_empty() && chains.is_empty()));
        let Some(fractions) = fractions else {
            let prototype = match chains {
                [] => ChainPrototype::from(FlexiblePrototype::alkane(chain_length)?),
                [single] => single.clone(),
                _ => {
                    return Err(AssemblyError::Configuration(format!(
                        "{} chain prototypes were given without fractions; the composition is ambiguous",
                        chains.len()
                    )));
                }
            };
            let default_notice = Some(Diagnostic::DefaultSpecies {
                prototype: prototype.name().to_string(),
            });
            return Ok(Self {
                specs: vec![ChainSpec {
                    prototype,
                    fraction: 1.0,
                }],
                default_notice,
            });
        };

        if fractions.len() != chains.len() {
            return Err(AssemblyError::Configuration(format!(
                "{} fractions were given for {} chain prototypes",
                fractions.len(),
                chains.len()
            )));
        }
        if let Some(bad) = fractions
            .iter()
            .find(|f| !f.is_finite() || **f < 0.0 || **f > 1.0)
        {
            return Err(AssemblyError::Configuration(format!(
                "fraction {} is outside [0, 1]",
                bad
            )));
        }
        let sum: f64 = fractions.iter().sum();
        if sum > 1.0 + FRACTION_TOLERANCE {
            return Err(AssemblyError::Configuration(format!(
                "fractions sum to {}, which exceeds 1",
                sum
            )));
        }

        Ok(Self {
            specs: chains
                .iter()
                .zip(fractions)
                .map(|(prototype, &fraction)| ChainSpec {
                    prototype: prototype.clone(),
                    fraction,
                })
                .collect(),
            default_notice: None,
        })
    }

    /// Species fractions followed by the implicit backfill share `max(0, 1 − Σf)`.
    pub fn shares(&self) -> Vec<f64> {
        let claimed: f64 = self.specs.iter().map(|s| s.fraction).sum();
        self.specs
            .iter()
            .map(|s| s.fraction)
            .chain(std::iter::once((1.0 - claimed).max(0.0)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
