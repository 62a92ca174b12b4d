use super::site::Site;
use super::tiling::PeriodicityTracker;
use crate::core::models::periodic::{InvalidBoxError, PeriodicBox};
use crate::core::models::template::{TemplateAtom, TemplateBond};
use nalgebra::{Point3, Vector3};
use thiserror::Error;
use tracing::warn;

const LATTICE_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("Surface template has no attachment sites")]
    NoSites,
    #[error("Site {site} refers to atom {atom}, but the template has {atom_count} atoms")]
    SiteAtomOutOfRange {
        site: usize,
        atom: usize,
        atom_count: usize,
    },
    #[error("Site {site} has a zero-length normal")]
    DegenerateNormal { site: usize },
    #[error("Bond {bond} refers to a missing atom or bonds an atom to itself")]
    InvalidBond { bond: usize },
    #[error("Lattice vectors must span the surface plane")]
    DegenerateLattice,
    #[error(
        "Box lengths ({lx}, {ly}) do not match the in-plane lattice vector lengths ({a}, {b})"
    )]
    LatticeBoxMismatch { lx: f64, ly: f64, a: f64, b: f64 },
    #[error("Invalid periodic box: {0}")]
    InvalidBox(#[from] InvalidBoxError),
    #[error("Tiling factors must be at least 1, got {tile_x} x {tile_y}")]
    InvalidTiling { tile_x: usize, tile_y: usize },
    #[error("Invalid surface parameter: {0}")]
    InvalidParameter(&'static str),
}

/// Parameters of the built-in square-lattice surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareLatticeParams {
    pub sites_x: usize,
    pub sites_y: usize,
    pub spacing: f64,
    pub substrate_element: String,
    pub anchor_element: String,
    pub anchor_height: f64, // Substrate to anchor atom distance along +z
    pub attach_distance: f64, // Anchor atom to site position distance along +z
    pub box_height: f64,
}

impl Default for SquareLatticeParams {
    fn default() -> Self {
        Self {
            sites_x: 8,
            sites_y: 8,
            spacing: 5.0,
            substrate_element: "Si".to_string(),
            anchor_element: "O".to_string(),
            anchor_height: 1.63,
            attach_distance: 1.43,
            box_height: 40.0,
        }
    }
}

/// An immutable periodic surface cell exposing attachment sites.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceTemplate {
    name: String,
    atoms: Vec<TemplateAtom>,
    bonds: Vec<TemplateBond>,
    sites: Vec<Site>,
    tracker: PeriodicityTracker,
}

impl SurfaceTemplate {
    /// Creates a validated surface template.
    ///
    /// # Errors
    ///
    /// Returns a [`SurfaceError`] if there are no sites, a site or bond refers to a
    /// missing atom, a site normal has zero length, the lattice vectors are parallel
    /// in the surface plane, or axis-aligned lattice vectors disagree with the box
    /// lengths. Skewed lattices are accepted with a warning, since pattern points are
    /// scaled by the box.
    pub fn new(
        name: &str,
        atoms: Vec<TemplateAtom>,
        bonds: Vec<TemplateBond>,
        sites: Vec<Site>,
        periodic_box: PeriodicBox,
        lattice_a: Vector3<f64>,
        lattice_b: Vector3<f64>,
    ) -> Result<Self, SurfaceError> {
        if sites.is_empty() {
            return Err(SurfaceError::NoSites);
        }

        let mut normalized = Vec::with_capacity(sites.len());
        for (index, site) in sites.into_iter().enumerate() {
            if site.atom >= atoms.len() {
                return Err(SurfaceError::SiteAtomOutOfRange {
                    site: index,
                    atom: site.atom,
                    atom_count: atoms.len(),
                });
            }
            let normal = site
                .normal
                .try_normalize(1e-12)
                .ok_or(SurfaceError::DegenerateNormal { site: index })?;
            normalized.push(Site { normal, ..site });
        }

        if let Some(bond) = TemplateBond::find_invalid(&bonds, atoms.len()) {
            return Err(SurfaceError::InvalidBond { bond });
        }

        let in_plane_area = lattice_a.x * lattice_b.y - lattice_a.y * lattice_b.x;
        if !in_plane_area.is_finite() || in_plane_area.abs() < 1e-9 {
            return Err(SurfaceError::DegenerateLattice);
        }
        check_lattice_against_box(&periodic_box, &lattice_a, &lattice_b)?;

        Ok(Self {
            name: name.to_string(),
            atoms,
            bonds,
            sites: normalized,
            tracker: PeriodicityTracker::new(periodic_box, lattice_a, lattice_b),
        })
    }

    /// Builds a square grid of substrate atoms, each carrying one anchor atom and one site.
    ///
    /// Substrate atom `(i, j)` sits at `(i·spacing, j·spacing, 0)`; its anchor atom is
    /// directly above it and its site lies `attach_distance` further along `+z`.
    /// Substrate atoms are bonded to their anchors and to their non-wrapping nearest
    /// neighbours.
    pub fn square_lattice(params: &SquareLatticeParams) -> Result<Self, SurfaceError> {
        if params.sites_x == 0 || params.sites_y == 0 {
            return Err(SurfaceError::InvalidParameter("site counts must be positive"));
        }
        let lengths = [params.spacing, params.anchor_height, params.attach_distance];
        if lengths.iter().any(|l| !l.is_finite() || *l <= 0.0) {
            return Err(SurfaceError::InvalidParameter(
                "spacing and heights must be positive",
            ));
        }

        let (nx, ny) = (params.sites_x, params.sites_y);
        let mut atoms = Vec::with_capacity(2 * nx * ny);
        let mut bonds = Vec::new();
        let mut sites = Vec::with_capacity(nx * ny);

        let substrate_index = |i: usize, j: usize| 2 * (j * nx + i);

        for j in 0..ny {
            for i in 0..nx {
                let k = j * nx + i;
                let base = Point3::new(i as f64 * params.spacing, j as f64 * params.spacing, 0.0);
                let anchor = base + Vector3::z() * params.anchor_height;

                atoms.push(TemplateAtom::new(
                    &format!("{}{}", params.substrate_element, k + 1),
                    &params.substrate_element,
                    base,
                ));
                atoms.push(TemplateAtom::new(
                    &format!("{}{}", params.anchor_element, k + 1),
                    &params.anchor_element,
                    anchor,
                ));

                let s = substrate_index(i, j);
                bonds.push(TemplateBond::single(s, s + 1));
                if i + 1 < nx {
                    bonds.push(TemplateBond::single(s, substrate_index(i + 1, j)));
                }
                if j + 1 < ny {
                    bonds.push(TemplateBond::single(s, substrate_index(i, j + 1)));
                }

                sites.push(Site {
                    position: anchor + Vector3::z() * params.attach_distance,
                    normal: Vector3::z(),
                    atom: s + 1,
                    occupied: false,
                });
            }
        }

        let lx = nx as f64 * params.spacing;
        let ly = ny as f64 * params.spacing;
        Self::new(
            &format!("square-{}x{}", nx, ny),
            atoms,
            bonds,
            sites,
            PeriodicBox::new(lx, ly, params.box_height)?,
            Vector3::new(lx, 0.0, 0.0),
            Vector3::new(0.0, ly, 0.0),
        )
    }

    /// Replicates the cell `tile_x × tile_y` times along its lattice vectors.
    ///
    /// Copies are laid out with `y` outer and `x` inner. Every site of the result is
    /// unoccupied. `tile(1, 1)` yields a copy of `self`.
    pub fn tile(&self, tile_x: usize, tile_y: usize) -> Result<SurfaceTemplate, SurfaceError> {
        let offsets = self.tracker.offsets(tile_x, tile_y)?;
        let tiled_box = self.tracker.tiled_box(tile_x, tile_y)?;
        let (lattice_a, lattice_b) = self.tracker.tiled_lattice(tile_x, tile_y);

        let copies = offsets.len();
        let mut atoms = Vec::with_capacity(self.atoms.len() * copies);
        let mut bonds = Vec::with_capacity(self.bonds.len() * copies);
        let mut sites = Vec::with_capacity(self.sites.len() * copies);

        for offset in &offsets {
            let shift = atoms.len();
            atoms.extend(self.atoms.iter().map(|atom| atom.translated(offset)));
            bonds.extend(self.bonds.iter().map(|bond| bond.shifted(shift)));
            sites.extend(self.sites.iter().map(|site| site.replicated(offset, shift)));
        }

        Ok(Self {
            name: self.name.clone(),
            atoms,
            bonds,
            sites,
            tracker: PeriodicityTracker::new(tiled_box, lattice_a, lattice_b),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn atoms(&self) -> &[TemplateAtom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[TemplateBond] {
        &self.bonds
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    pub fn periodic_box(&self) -> &PeriodicBox {
        self.tracker.base_box()
    }

    pub fn tracker(&self) -> &PeriodicityTracker {
        &self.tracker
    }
}

fn check_lattice_against_box(
    periodic_box: &PeriodicBox,
    lattice_a: &Vector3<f64>,
    lattice_b: &Vector3<f64>,
) -> Result<(), SurfaceError> {
    let axis_aligned =
        lattice_a.y.abs() < LATTICE_TOLERANCE && lattice_b.x.abs() < LATTICE_TOLERANCE;
    let (lx, ly) = (periodic_box.lx(), periodic_box.ly());
    if !axis_aligned {
        warn!(
            "Lattice vectors {:?} and {:?} are not aligned with the box axes; pattern points are scaled by the box ({}, {}).",
            lattice_a.as_slice(),
            lattice_b.as_slice(),
            lx,
            ly
        );
        return Ok(());
    }
    let (a, b) = (lattice_a.x.abs(), lattice_b.y.abs());
    if (a - lx).abs() > LATTICE_TOLERANCE || (b - ly).abs() > LATTICE_TOLERANCE {
        return Err(SurfaceError::LatticeBoxMismatch { lx, ly, a, b });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_lattice() -> SurfaceTemplate {
        SurfaceTemplate::square_lattice(&SquareLatticeParams {
            sites_x: 3,
            sites_y: 2,
            spacing: 4.0,
            ..Default::default()
        })
        .unwrap()
    }

    fn one_site_cell() -> (Vec<TemplateAtom>, Vec<Site>, PeriodicBox) {
        let atoms = vec![
            TemplateAtom::new("Au1", "Au", Point3::origin()),
            TemplateAtom::new("S1", "S", Point3::new(0.0, 0.0, 2.0)),
        ];
        let sites = vec![Site {
            position: Point3::new(0.0, 0.0, 3.8),
            normal: Vector3::new(0.0, 0.0, 2.0),
            atom: 1,
            occupied: false,
        }];
        (atoms, sites, PeriodicBox::new(3.0, 3.0, 20.0).unwrap())
    }

    #[test]
    fn new_normalizes_site_normals() {
        let (atoms, sites, pbox) = one_site_cell();
        let surface = SurfaceTemplate::new(
            "gold",
            atoms,
            vec![TemplateBond::single(0, 1)],
            sites,
            pbox,
            Vector3::new(3.0, 0.0, 0.0),
            Vector3::new(0.0, 3.0, 0.0),
        )
        .unwrap();
        assert_eq!(surface.sites()[0].normal, Vector3::z());
    }

    #[test]
    fn new_rejects_invalid_templates() {
        let a = Vector3::new(3.0, 0.0, 0.0);
        let b = Vector3::new(0.0, 3.0, 0.0);

        let (atoms, _, pbox) = one_site_cell();
        assert_eq!(
            SurfaceTemplate::new("x", atoms, vec![], vec![], pbox, a, b),
            Err(SurfaceError::NoSites)
        );

        let (atoms, mut sites, pbox) = one_site_cell();
        sites[0].atom = 7;
        assert!(matches!(
            SurfaceTemplate::new("x", atoms, vec![], sites, pbox, a, b),
            Err(SurfaceError::SiteAtomOutOfRange { atom: 7, .. })
        ));

        let (atoms, mut sites, pbox) = one_site_cell();
        sites[0].normal = Vector3::zeros();
        assert_eq!(
            SurfaceTemplate::new("x", atoms, vec![], sites, pbox, a, b),
            Err(SurfaceError::DegenerateNormal { site: 0 })
        );

        let (atoms, sites, pbox) = one_site_cell();
        assert_eq!(
            SurfaceTemplate::new("x", atoms, vec![TemplateBond::single(0, 2)], sites, pbox, a, b),
            Err(SurfaceError::InvalidBond { bond: 0 })
        );

        let (atoms, sites, pbox) = one_site_cell();
        assert_eq!(
            SurfaceTemplate::new("x", atoms, vec![], sites, pbox, a, a * 2.0),
            Err(SurfaceError::DegenerateLattice)
        );
    }

    #[test]
    fn new_rejects_lattice_vectors_that_disagree_with_the_box() {
        let (atoms, sites, pbox) = one_site_cell();
        assert_eq!(
            SurfaceTemplate::new(
                "x",
                atoms,
                vec![],
                sites,
                pbox,
                Vector3::new(3.0, 0.0, 0.0),
                Vector3::new(0.0, 4.5, 0.0),
            ),
            Err(SurfaceError::LatticeBoxMismatch {
                lx: 3.0,
                ly: 3.0,
                a: 3.0,
                b: 4.5
            })
        );
    }

    #[test]
    fn new_accepts_skewed_lattices() {
        let (atoms, sites, pbox) = one_site_cell();
        let surface = SurfaceTemplate::new(
            "hex",
            atoms,
            vec![],
            sites,
            pbox,
            Vector3::new(3.0, 0.0, 0.0),
            Vector3::new(1.5, 2.6, 0.0),
        );
        assert!(surface.is_ok());
    }

    #[test]
    fn square_lattice_has_expected_counts_and_geometry() {
        let surface = small_lattice();
        assert_eq!(surface.atom_count(), 12);
        assert_eq!(surface.site_count(), 6);
        // 6 anchor bonds, 2x2 along x, 3x1 along y
        assert_eq!(surface.bond_count(), 6 + 4 + 3);
        assert_eq!(surface.periodic_box().lx(), 12.0);
        assert_eq!(surface.periodic_box().ly(), 8.0);

        let site = &surface.sites()[4];
        assert_eq!(site.atom, 9);
        assert_eq!(surface.atoms()[site.atom].element, "O");
        assert!((site.position - Point3::new(4.0, 4.0, 1.63 + 1.43)).norm() < 1e-12);
    }

    #[test]
    fn square_lattice_rejects_bad_parameters() {
        let zero_sites = SquareLatticeParams {
            sites_x: 0,
            ..Default::default()
        };
        assert!(SurfaceTemplate::square_lattice(&zero_sites).is_err());

        let bad_spacing = SquareLatticeParams {
            spacing: -1.0,
            ..Default::default()
        };
        assert!(SurfaceTemplate::square_lattice(&bad_spacing).is_err());
    }

    #[test]
    fn tile_one_by_one_returns_a_copy() {
        let surface = small_lattice();
        assert_eq!(surface.tile(1, 1).unwrap(), surface);
    }

    #[test]
    fn tile_scales_counts_and_box() {
        let surface = small_lattice();
        let tiled = surface.tile(2, 3).unwrap();

        assert_eq!(tiled.site_count(), surface.site_count() * 6);
        assert_eq!(tiled.atom_count(), surface.atom_count() * 6);
        assert_eq!(tiled.bond_count(), surface.bond_count() * 6);
        assert_eq!(tiled.periodic_box().lx(), surface.periodic_box().lx() * 2.0);
        assert_eq!(tiled.periodic_box().ly(), surface.periodic_box().ly() * 3.0);
        assert_eq!(tiled.periodic_box().lz(), surface.periodic_box().lz());
    }

    #[test]
    fn tile_offsets_sites_and_remaps_indices() {
        let surface = small_lattice();
        let tiled = surface.tile(2, 1).unwrap();
        let n_sites = surface.site_count();
        let n_atoms = surface.atom_count();

        let original = &surface.sites()[1];
        let copy = &tiled.sites()[n_sites + 1];
        assert!((copy.position - original.position - Vector3::new(12.0, 0.0, 0.0)).norm() < 1e-12);
        assert_eq!(copy.atom, original.atom + n_atoms);
        assert_eq!(
            tiled.atoms()[copy.atom].position,
            surface.atoms()[original.atom].position + Vector3::new(12.0, 0.0, 0.0)
        );
        assert_eq!(tiled.bonds()[surface.bond_count()].a, surface.bonds()[0].a + n_atoms);
    }

    #[test]
    fn tile_clears_occupancy() {
        let mut surface = small_lattice();
        surface.sites[0].occupied = true;
        let tiled = surface.tile(1, 1).unwrap();
        assert!(tiled.sites().iter().all(|s| !s.occupied));
    }

    #[test]
    fn tile_rejects_zero_factors() {
        assert_eq!(
            small_lattice().tile(0, 2),
            Err(SurfaceError::InvalidTiling { tile_x: 0, tile_y: 2 })
        );
    }
}
