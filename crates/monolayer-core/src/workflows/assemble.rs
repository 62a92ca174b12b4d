use crate::core::models::assembly::Assembly;
use crate::core::models::atom::Atom;
use crate::core::models::ids::{AtomId, InstanceId};
use crate::core::models::instance::InstanceKind;
use crate::core::models::template::TemplateAtom;
use crate::core::models::topology::BondKind;
use crate::core::prototype::fragment::Attachment;
use crate::core::prototype::{Attachable, ChainPrototype};
use crate::core::surface::site::Site;
use crate::core::surface::template::SurfaceTemplate;
use crate::engine::config::AssemblyConfig;
use crate::engine::diagnostics::Diagnostic;
use crate::engine::error::AssemblyError;
use crate::engine::matching::match_sites;
use crate::engine::partition::{interleave, largest_remainder};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::species::SpeciesPlan;
use tracing::{debug, info, instrument};

/// The chain species placed on one matched site, or `None` if the site was released
/// to the backfill pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteAssignment {
    pub site: usize,
    pub species: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct AssemblyOutput {
    pub assembly: Assembly,
    pub diagnostics: Vec<Diagnostic>,
    /// One entry per matched site, in pattern order.
    pub assignments: Vec<SiteAssignment>,
}

/// Builds monolayers from a fixed configuration.
#[derive(Debug, Clone)]
pub struct MonolayerAssembler {
    config: AssemblyConfig,
}

impl MonolayerAssembler {
    pub fn new(config: AssemblyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    /// Assembles `chains` onto `surface`. Neither input is modified.
    pub fn build(
        &self,
        surface: &SurfaceTemplate,
        chains: &[ChainPrototype],
    ) -> Result<AssemblyOutput, AssemblyError> {
        run(surface, chains, &self.config, &ProgressReporter::new())
    }
}

struct DiagnosticLog<'r, 'a> {
    entries: Vec<Diagnostic>,
    reporter: &'r ProgressReporter<'a>,
}

impl DiagnosticLog<'_, '_> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        diagnostic.log();
        self.reporter.report(Progress::Diagnostic(diagnostic.clone()));
        self.entries.push(diagnostic);
    }
}

#[instrument(skip_all, name = "assembly_workflow")]
pub fn run(
    surface: &SurfaceTemplate,
    chains: &[ChainPrototype],
    config: &AssemblyConfig,
    reporter: &ProgressReporter,
) -> Result<AssemblyOutput, AssemblyError> {
    info!(
        "Assembling monolayer on '{}' ({}x{} tiles, {} chain prototype(s)).",
        surface.name(),
        config.tile_x,
        config.tile_y,
        chains.len()
    );
    let mut log = DiagnosticLog {
        entries: Vec::new(),
        reporter,
    };

    // === Phase 0: Resolve chain species ===
    let plan = SpeciesPlan::resolve(chains, config.fractions.as_deref(), config.chain_length)?;
    if let Some(notice) = plan.default_notice.clone() {
        log.emit(notice);
    }

    // === Phase 1: Tile the surface ===
    let tiled = reporter.phase("Tiling", || surface.tile(config.tile_x, config.tile_y))?;
    log.emit(Diagnostic::SurfaceTiled {
        tile_x: config.tile_x,
        tile_y: config.tile_y,
        sites: tiled.site_count(),
    });

    // === Phase 2: Match pattern points to sites ===
    let (lx, ly) = (tiled.periodic_box().lx(), tiled.periodic_box().ly());
    let mut sites = tiled.sites().to_vec();
    let matched = reporter.phase("Matching", || {
        match_sites(&mut sites, config.pattern.as_ref(), lx, ly)
    })?;
    log.emit(Diagnostic::SitesMatched {
        matched: matched.len(),
        available: sites.len(),
    });

    // === Phase 3: Partition matched sites among species ===
    let assignments = assign_species(&plan, &matched)?;
    for assignment in assignments.iter().filter(|a| a.species.is_none()) {
        sites[assignment.site].occupied = false;
    }

    // === Phase 4: Attach chains ===
    let mut assembly = Assembly::new(*tiled.periodic_box());
    let surface_atoms = merge_surface(&mut assembly, &tiled)?;
    reporter.report(Progress::PhaseStart {
        name: "Attaching chains",
    });
    reporter.report(Progress::TaskStart {
        total_steps: assignments.len() as u64,
    });
    let mut species_counts = vec![0usize; plan.len()];
    for assignment in &assignments {
        if let Some(species) = assignment.species {
            let mut clone = plan.specs[species].prototype.clone();
            let site = &sites[assignment.site];
            let attachment = clone.attach(site)?;
            merge_attached(
                &mut assembly,
                &clone,
                InstanceKind::Chain { species },
                attachment,
                &surface_atoms,
            )?;
            species_counts[species] += 1;
        }
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    for (species, (spec, &count)) in plan.specs.iter().zip(&species_counts).enumerate() {
        log.emit(Diagnostic::SpeciesAdded {
            species,
            prototype: spec.prototype.name().to_string(),
            count,
        });
    }

    // === Phase 5: Backfill unoccupied sites ===
    let vacant: Vec<&Site> = sites.iter().filter(|s| !s.occupied).collect();
    reporter.report(Progress::PhaseStart { name: "Backfilling" });
    reporter.report(Progress::TaskStart {
        total_steps: vacant.len() as u64,
    });
    for site in &vacant {
        let mut cap = config.backfill.clone();
        let attachment = cap.attach(site)?;
        merge_attached(
            &mut assembly,
            &cap,
            InstanceKind::Cap,
            attachment,
            &surface_atoms,
        )?;
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);
    log.emit(Diagnostic::Backfilled {
        cap: config.backfill.fragment().name().to_string(),
        count: vacant.len(),
    });

    // === Phase 6: Every chain and cap must be bonded ===
    let open_ports = assembly.open_port_count();
    if open_ports != 0 {
        return Err(AssemblyError::Internal(format!(
            "{} instance(s) left with an open port",
            open_ports
        )));
    }
    info!("Workflow complete. {}", assembly.summary());
    Ok(AssemblyOutput {
        assembly,
        diagnostics: log.entries,
        assignments,
    })
}

/// Splits matched sites among species and the backfill share, then interleaves them.
fn assign_species(
    plan: &SpeciesPlan,
    matched: &[usize],
) -> Result<Vec<SiteAssignment>, AssemblyError> {
    let shares = plan.shares();
    let counts = largest_remainder(&shares, matched.len());

    for (species, spec) in plan.specs.iter().enumerate() {
        if spec.fraction > 0.0 && counts[species] == 0 && !matched.is_empty() {
            return Err(AssemblyError::Configuration(format!(
                "species {} '{}' (fraction {}) rounds to zero of {} matched sites",
                species,
                spec.prototype.name(),
                spec.fraction,
                matched.len()
            )));
        }
    }
    debug!("Species counts (last entry is backfill): {:?}", counts);

    let backfill = plan.len();
    Ok(matched
        .iter()
        .zip(interleave(&counts))
        .map(|(&site, slot)| SiteAssignment {
            site,
            species: (slot != backfill).then_some(slot),
        })
        .collect())
}

fn merge_surface(
    assembly: &mut Assembly,
    surface: &SurfaceTemplate,
) -> Result<Vec<AtomId>, AssemblyError> {
    let instance_id = assembly.add_instance(surface.name(), InstanceKind::Surface);
    let atom_ids = add_atoms(assembly, instance_id, surface.atoms())?;
    for bond in surface.bonds() {
        assembly
            .add_bond(atom_ids[bond.a], atom_ids[bond.b], bond.order, BondKind::Internal)
            .ok_or_else(|| AssemblyError::Internal("failed to copy surface bond".to_string()))?;
    }
    Ok(atom_ids)
}

fn merge_attached<P: Attachable>(
    assembly: &mut Assembly,
    prototype: &P,
    kind: InstanceKind,
    attachment: Attachment,
    surface_atoms: &[AtomId],
) -> Result<InstanceId, AssemblyError> {
    let fragment = prototype.fragment();
    let instance_id = assembly.add_instance(fragment.name(), kind);
    let atom_ids = add_atoms(assembly, instance_id, fragment.atoms())?;
    for bond in fragment.bonds() {
        assembly
            .add_bond(atom_ids[bond.a], atom_ids[bond.b], bond.order, BondKind::Internal)
            .ok_or_else(|| {
                AssemblyError::Internal(format!("failed to copy bond of '{}'", fragment.name()))
            })?;
    }

    let site_atom = surface_atoms.get(attachment.site_atom).copied().ok_or_else(|| {
        AssemblyError::Internal(format!("site atom {} is missing", attachment.site_atom))
    })?;
    assembly
        .close_port(instance_id, atom_ids[attachment.port_atom], site_atom)
        .ok_or_else(|| {
            AssemblyError::Internal(format!("failed to bond '{}' to its site", fragment.name()))
        })?;
    Ok(instance_id)
}

fn add_atoms(
    assembly: &mut Assembly,
    instance_id: InstanceId,
    atoms: &[TemplateAtom],
) -> Result<Vec<AtomId>, AssemblyError> {
    atoms
        .iter()
        .map(|atom| {
            assembly
                .add_atom_to_instance(
                    instance_id,
                    Atom::new(&atom.name, &atom.element, instance_id, atom.position),
                )
                .ok_or_else(|| AssemblyError::Internal("instance vanished during merge".to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::template::TemplateBond;
    use crate::core::pattern::{GridPattern, Pattern, PatternGenerator, RandomPattern};
    use crate::core::prototype::fragment::{Fragment, Port};
    use crate::core::prototype::rigid::RigidPrototype;
    use crate::core::surface::template::SquareLatticeParams;
    use crate::engine::config::AssemblyConfigBuilder;
    use nalgebra::{Point3, Vector3};
    use std::collections::HashSet;
    use std::sync::Mutex;

    fn lattice(n: usize) -> SurfaceTemplate {
        SurfaceTemplate::square_lattice(&SquareLatticeParams {
            sites_x: n,
            sites_y: n,
            ..Default::default()
        })
        .unwrap()
    }

    /// A straight chain of `n` atoms along +z with its port on the first atom.
    fn rod(name: &str, n: usize) -> ChainPrototype {
        let atoms = (0..n)
            .map(|k| TemplateAtom::new(&format!("C{}", k + 1), "C", Point3::new(0.0, 0.0, 1.5 * k as f64)))
            .collect();
        let bonds = (1..n).map(|k| TemplateBond::single(k - 1, k)).collect();
        let fragment = Fragment::new(name, atoms, bonds, Port::open(0, -Vector3::z()), false).unwrap();
        RigidPrototype::new(fragment).into()
    }

    fn grid(n_x: usize, n_y: usize) -> Pattern {
        GridPattern::new(n_x, n_y).generate().unwrap()
    }

    fn count_kind(output: &AssemblyOutput, kind: InstanceKind) -> usize {
        output.assembly.instances_of_kind(kind).count()
    }

    #[test]
    fn grid_scenario_has_expected_particle_and_bond_counts() {
        let surface = lattice(10);
        let config = AssemblyConfigBuilder::new().pattern(grid(8, 8)).build().unwrap();
        let output = MonolayerAssembler::new(config)
            .build(&surface, &[rod("rod36", 36)])
            .unwrap();

        let (n, m) = (surface.atom_count(), surface.bond_count());
        let caps = surface.site_count() - 64;
        assert_eq!(output.assembly.particle_count(), n + 64 * 36 + caps);
        assert_eq!(output.assembly.bond_count(), m + 64 * 35 + 64 + caps);
        assert_eq!(count_kind(&output, InstanceKind::Chain { species: 0 }), 64);
        assert_eq!(count_kind(&output, InstanceKind::Cap), caps);
    }

    #[test]
    fn grid_scenario_on_exactly_64_sites_leaves_no_caps() {
        let surface = lattice(8);
        let config = AssemblyConfigBuilder::new().pattern(grid(8, 8)).build().unwrap();
        let output = MonolayerAssembler::new(config)
            .build(&surface, &[rod("rod36", 36)])
            .unwrap();

        assert_eq!(
            output.assembly.particle_count(),
            surface.atom_count() + 64 * 36
        );
        assert_eq!(
            output.assembly.bond_count(),
            surface.bond_count() + 64 * 35 + 64
        );
        assert_eq!(count_kind(&output, InstanceKind::Cap), 0);
        assert!(output.diagnostics.contains(&Diagnostic::Backfilled {
            cap: "H".to_string(),
            count: 0
        }));
    }

    #[test]
    fn too_many_points_is_a_placement_error() {
        let pattern = RandomPattern::new(100).with_seed(11).generate().unwrap();
        let config = AssemblyConfigBuilder::new().pattern(pattern).build().unwrap();
        let result = MonolayerAssembler::new(config).build(&lattice(8), &[rod("rod", 4)]);
        assert_eq!(
            result.unwrap_err(),
            AssemblyError::Placement {
                points: 100,
                available: 64
            }
        );
    }

    #[test]
    fn two_prototypes_without_fractions_is_a_configuration_error() {
        let config = AssemblyConfigBuilder::new().pattern(grid(4, 4)).build().unwrap();
        let result =
            MonolayerAssembler::new(config).build(&lattice(8), &[rod("a", 3), rod("b", 5)]);
        assert!(matches!(result, Err(AssemblyError::Configuration(_))));
    }

    #[test]
    fn missing_fractions_default_to_one_species_with_a_warning() {
        let config = AssemblyConfigBuilder::new()
            .pattern(grid(2, 2))
            .chain_length(4)
            .build()
            .unwrap();
        let output = MonolayerAssembler::new(config).build(&lattice(4), &[]).unwrap();

        assert_eq!(
            output.diagnostics[0],
            Diagnostic::DefaultSpecies {
                prototype: "alkane-C4".to_string()
            }
        );
        assert_eq!(output.diagnostics[0].severity(), crate::engine::diagnostics::Severity::Warning);
        let chain = output
            .assembly
            .instances_of_kind(InstanceKind::Chain { species: 0 })
            .next()
            .unwrap()
            .1;
        assert_eq!(chain.atoms().len(), 13);
        assert_eq!(chain.name, "alkane-C4");
    }

    #[test]
    fn seeded_patterns_give_identical_assignments() {
        let build = || {
            let pattern = RandomPattern::new(30).with_seed(5).generate().unwrap();
            let config = AssemblyConfigBuilder::new()
                .pattern(pattern)
                .fractions(vec![0.5, 0.5])
                .build()
                .unwrap();
            MonolayerAssembler::new(config)
                .build(&lattice(10), &[rod("a", 2), rod("b", 3)])
                .unwrap()
        };
        let first = build();
        let second = build();

        assert_eq!(first.assignments, second.assignments);
        let positions = |o: &AssemblyOutput| -> Vec<Point3<f64>> {
            o.assembly.atoms_iter().map(|(_, a)| a.position).collect()
        };
        assert_eq!(positions(&first), positions(&second));
    }

    #[test]
    fn fraction_partition_law_holds_with_backfill_share() {
        let config = AssemblyConfigBuilder::new()
            .pattern(grid(8, 8))
            .fractions(vec![0.5, 0.3])
            .build()
            .unwrap();
        let surface = lattice(10);
        let output = MonolayerAssembler::new(config)
            .build(&surface, &[rod("a", 2), rod("b", 3)])
            .unwrap();

        let counts: Vec<usize> = (0..3)
            .map(|s| {
                let species = (s < 2).then_some(s);
                output.assignments.iter().filter(|a| a.species == species).count()
            })
            .collect();
        assert_eq!(counts, vec![32, 19, 13]);
        assert_eq!(counts.iter().sum::<usize>(), 64);
        for (count, fraction) in counts.iter().zip([0.5, 0.3, 0.2]) {
            assert!((*count as f64 - fraction * 64.0).abs() < 1.0);
        }
        assert_eq!(output.assembly.species_counts(), vec![(0, 32), (1, 19)]);
        assert_eq!(
            count_kind(&output, InstanceKind::Cap),
            surface.site_count() - 64 + 13
        );
    }

    #[test]
    fn species_are_interleaved_along_the_pattern() {
        let config = AssemblyConfigBuilder::new()
            .pattern(grid(4, 1))
            .fractions(vec![0.5, 0.5])
            .build()
            .unwrap();
        let output = MonolayerAssembler::new(config)
            .build(&lattice(4), &[rod("a", 2), rod("b", 3)])
            .unwrap();
        let species: Vec<Option<usize>> = output.assignments.iter().map(|a| a.species).collect();
        assert_eq!(species, vec![Some(0), Some(1), Some(0), Some(1)]);
    }

    #[test]
    fn species_rounding_to_zero_is_a_configuration_error() {
        let config = AssemblyConfigBuilder::new()
            .pattern(grid(3, 1))
            .fractions(vec![0.9, 0.1])
            .build()
            .unwrap();
        let result =
            MonolayerAssembler::new(config).build(&lattice(4), &[rod("a", 2), rod("b", 3)]);
        assert!(matches!(result, Err(AssemblyError::Configuration(msg)) if msg.contains("'b'")));
    }

    #[test]
    fn every_port_is_closed_and_atoms_are_owned_exclusively() {
        let config = AssemblyConfigBuilder::new()
            .pattern(grid(3, 3))
            .fractions(vec![0.6])
            .build()
            .unwrap();
        let output = MonolayerAssembler::new(config)
            .build(&lattice(5), &[rod("a", 4)])
            .unwrap();
        let assembly = &output.assembly;

        assert_eq!(assembly.open_port_count(), 0);
        let mut seen = HashSet::new();
        for (instance_id, instance) in assembly.instances_iter() {
            for &atom_id in instance.atoms() {
                assert!(seen.insert(atom_id), "atom owned twice");
                assert_eq!(assembly.atom(atom_id).unwrap().instance_id, instance_id);
            }
        }
        assert_eq!(seen.len(), assembly.particle_count());

        let attachment_bonds = assembly
            .bonds()
            .iter()
            .filter(|b| b.kind == BondKind::Attachment)
            .count();
        assert_eq!(attachment_bonds, assembly.instance_count() - 1);
    }

    #[test]
    fn port_atoms_sit_on_their_sites_and_bond_to_site_atoms() {
        let surface = lattice(4);
        let config = AssemblyConfigBuilder::new().pattern(grid(2, 2)).build().unwrap();
        let output = MonolayerAssembler::new(config)
            .build(&surface, &[rod("a", 3)])
            .unwrap();
        let assembly = &output.assembly;

        for (_, instance) in assembly.instances_of_kind(InstanceKind::Chain { species: 0 }) {
            let port = instance.port().unwrap();
            let port_atom = assembly.atom(port.port_atom).unwrap();
            let site_atom = assembly.atom(port.site_atom).unwrap();
            assert_eq!(site_atom.element, "O");
            assert!(((port_atom.position - site_atom.position).norm() - 1.43).abs() < 1e-9);
            let tail = assembly.atom(instance.atoms()[2]).unwrap();
            assert!(tail.position.z > port_atom.position.z);
        }
    }

    #[test]
    fn tiling_scales_box_and_sites() {
        let surface = lattice(4);
        let config = AssemblyConfigBuilder::new().tiling(2, 3).build().unwrap();
        let output = MonolayerAssembler::new(config)
            .build(&surface, &[rod("a", 2)])
            .unwrap();

        let pbox = output.assembly.periodic_box();
        assert_eq!(pbox.lx(), surface.periodic_box().lx() * 2.0);
        assert_eq!(pbox.ly(), surface.periodic_box().ly() * 3.0);
        assert_eq!(pbox.lz(), surface.periodic_box().lz());
        assert!(output.diagnostics.contains(&Diagnostic::SurfaceTiled {
            tile_x: 2,
            tile_y: 3,
            sites: 96
        }));
        // No pattern: every site carries a chain
        assert_eq!(count_kind(&output, InstanceKind::Chain { species: 0 }), 96);
        assert_eq!(count_kind(&output, InstanceKind::Cap), 0);
    }

    #[test]
    fn grid_pattern_spans_every_tile_of_a_tiled_surface() {
        let config = AssemblyConfigBuilder::new()
            .pattern(grid(8, 8))
            .tiling(2, 2)
            .build()
            .unwrap();
        let output = MonolayerAssembler::new(config)
            .build(&lattice(4), &[rod("a", 2)])
            .unwrap();

        assert_eq!(count_kind(&output, InstanceKind::Chain { species: 0 }), 64);
        assert_eq!(count_kind(&output, InstanceKind::Cap), 0);

        // Each base cell is 20 x 20; count chains landing in each of the four replicas
        let assembly = &output.assembly;
        let mut per_tile = [0usize; 4];
        for (_, chain) in assembly.instances_of_kind(InstanceKind::Chain { species: 0 }) {
            let port_atom = assembly.atom(chain.atoms()[0]).unwrap();
            let tx = usize::from(port_atom.position.x >= 20.0);
            let ty = usize::from(port_atom.position.y >= 20.0);
            per_tile[ty * 2 + tx] += 1;
        }
        assert_eq!(per_tile, [16; 4]);
    }

    #[test]
    fn empty_fractions_without_chains_use_the_default_species() {
        let config = AssemblyConfigBuilder::new()
            .pattern(grid(2, 2))
            .chain_length(3)
            .fractions(vec![])
            .build()
            .unwrap();
        let output = MonolayerAssembler::new(config).build(&lattice(4), &[]).unwrap();

        assert_eq!(count_kind(&output, InstanceKind::Chain { species: 0 }), 4);
        assert_eq!(count_kind(&output, InstanceKind::Cap), 12);
        assert!(output.diagnostics.contains(&Diagnostic::DefaultSpecies {
            prototype: "alkane-C3".to_string()
        }));
    }

    #[test]
    fn zero_tiling_factor_is_a_configuration_error() {
        let config = AssemblyConfig {
            tile_x: 0,
            ..Default::default()
        };
        let result = MonolayerAssembler::new(config).build(&lattice(4), &[rod("a", 2)]);
        assert!(matches!(result, Err(AssemblyError::Configuration(_))));
    }

    #[test]
    fn progress_reports_one_increment_per_site() {
        let increments = Mutex::new(0usize);
        let diagnostics = Mutex::new(0usize);
        let reporter = ProgressReporter::with_callback(Box::new(|event| match event {
            Progress::TaskIncrement => *increments.lock().unwrap() += 1,
            Progress::Diagnostic(_) => *diagnostics.lock().unwrap() += 1,
            _ => {}
        }));
        let config = AssemblyConfigBuilder::new().pattern(grid(2, 2)).build().unwrap();
        let output = run(&lattice(4), &[rod("a", 2)], &config, &reporter).unwrap();
        drop(reporter);

        assert_eq!(increments.into_inner().unwrap(), 16);
        assert_eq!(diagnostics.into_inner().unwrap(), output.diagnostics.len());
    }

    #[test]
    fn summary_reports_counts_and_box() {
        let config = AssemblyConfigBuilder::new().pattern(grid(1, 1)).build().unwrap();
        let output = MonolayerAssembler::new(config)
            .build(&lattice(2), &[rod("a", 2)])
            .unwrap();
        // 8 surface atoms, one 2-atom chain, three caps
        assert_eq!(
            output.assembly.to_string(),
            "Assembly: 13 particles, 13 bonds, 5 instances, box [Lx=10.0000 Ly=10.0000 Lz=40.0000]"
        );
    }
}
