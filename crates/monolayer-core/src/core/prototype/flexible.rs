use super::Attachable;
use super::fragment::{Fragment, FragmentError, Port};
use crate::core::models::template::{TemplateAtom, TemplateBond};
use crate::core::utils::geometry::generate_sp3_hydrogens;
use nalgebra::{Point3, Vector3};

const CC_BOND_LENGTH: f64 = 1.54;
const CH_BOND_LENGTH: f64 = 1.09;
// Zig-zag projections of a C-C bond at the tetrahedral angle.
const BACKBONE_RISE: f64 = 1.257;
const BACKBONE_OFFSET: f64 = 0.889;

/// A chain prototype generated from a length parameter.
///
/// The current family is the saturated n-alkyl chain `C(n)H(2n+1)`, whose first carbon
/// carries the port.
#[derive(Debug, Clone, PartialEq)]
pub struct FlexiblePrototype {
    fragment: Fragment,
    chain_length: usize,
}

impl FlexiblePrototype {
    /// Builds an all-trans alkyl chain of `chain_length` carbons.
    ///
    /// The backbone zig-zags in the xz plane and rises along `+z`; hydrogens are placed
    /// with ideal sp3 geometry. The port sits on `C1` and points along `-z`, giving
    /// `3n + 1` atoms and `3n` bonds.
    pub fn alkane(chain_length: usize) -> Result<Self, FragmentError> {
        if chain_length == 0 {
            return Err(FragmentError::InvalidParameter(
                "chain length must be at least 1",
            ));
        }

        let port_direction = -Vector3::z();
        let carbons: Vec<Point3<f64>> = (0..chain_length)
            .map(|k| {
                let x = if k % 2 == 1 { BACKBONE_OFFSET } else { 0.0 };
                Point3::new(x, 0.0, k as f64 * BACKBONE_RISE)
            })
            .collect();

        let mut atoms: Vec<TemplateAtom> = carbons
            .iter()
            .enumerate()
            .map(|(k, p)| TemplateAtom::new(&format!("C{}", k + 1), "C", *p))
            .collect();
        let mut bonds: Vec<TemplateBond> = (1..chain_length)
            .map(|k| TemplateBond::single(k - 1, k))
            .collect();

        let mut hydrogen_count = 0;
        for (k, carbon) in carbons.iter().enumerate() {
            let mut neighbors = Vec::with_capacity(2);
            match k {
                0 => neighbors.push(carbon + port_direction * CC_BOND_LENGTH),
                _ => neighbors.push(carbons[k - 1]),
            }
            if let Some(next) = carbons.get(k + 1) {
                neighbors.push(*next);
            }

            let hydrogens = generate_sp3_hydrogens(carbon, &neighbors, CH_BOND_LENGTH).ok_or(
                FragmentError::InvalidParameter("degenerate backbone geometry"),
            )?;
            for position in hydrogens {
                hydrogen_count += 1;
                bonds.push(TemplateBond::single(k, atoms.len()));
                atoms.push(TemplateAtom::new(
                    &format!("H{}", hydrogen_count),
                    "H",
                    position,
                ));
            }
        }

        let fragment = Fragment::new(
            &format!("alkane-C{}", chain_length),
            atoms,
            bonds,
            Port::open(0, port_direction),
            false,
        )?;
        Ok(Self {
            fragment,
            chain_length,
        })
    }

    /// Rebuilds the prototype with a different chain length.
    pub fn with_length(&self, chain_length: usize) -> Result<Self, FragmentError> {
        Self::alkane(chain_length)
    }

    pub fn chain_length(&self) -> usize {
        self.chain_length
    }
}

impl Attachable for FlexiblePrototype {
    fn fragment(&self) -> &Fragment {
        &self.fragment
    }

    fn fragment_mut(&mut self) -> &mut Fragment {
        &mut self.fragment
    }
}
