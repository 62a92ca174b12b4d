use super::defaults::DefaultsConfig;
use super::file::{
    FileBackfillConfig, FileChainConfig, FileConfig, FilePatternConfig, FileSquareLattice,
    FileSurfaceConfig,
};
use super::models::AppConfig;
use crate::cli::BuildArgs;
use crate::error::{CliError, Result};
use crate::utils::parser::{self, PatternSpec};
use monolayer::core::definitions::{load_fragment, load_surface};
use monolayer::core::pattern::Pattern;
use monolayer::core::prototype::ChainPrototype;
use monolayer::core::prototype::cap::CapGroup;
use monolayer::core::prototype::flexible::FlexiblePrototype;
use monolayer::core::prototype::rigid::RigidPrototype;
use monolayer::core::surface::template::{SquareLatticeParams, SurfaceTemplate};
use monolayer::engine::config::AssemblyConfigBuilder;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

pub fn build_config(args: &BuildArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let (file_config, base_dir) = match &args.config {
        Some(path) => (
            FileConfig::from_file(path)?,
            path.parent().map(Path::to_path_buf).unwrap_or_default(),
        ),
        None => (FileConfig::default(), PathBuf::new()),
    };
    let file_config = apply_set_values(file_config, &args.set_values)?;

    let chain_length = args
        .chain_length
        .or(file_config.chain_length)
        .unwrap_or(defaults.chain_length);
    let tiling = file_config.tiling.clone().unwrap_or_default();
    let tile_x = args.tile_x.or(tiling.x).unwrap_or(defaults.tile_x);
    let tile_y = args.tile_y.or(tiling.y).unwrap_or(defaults.tile_y);

    let pattern = resolve_pattern(args, file_config.pattern.as_ref(), &defaults)?;
    let surface = resolve_surface(file_config.surface.as_ref(), &base_dir)?;
    let chains = resolve_chains(&file_config.chains, chain_length, &base_dir)?;
    let fractions = resolve_fractions(&file_config.chains)?;
    let backfill = resolve_backfill(file_config.backfill.as_ref(), &base_dir)?;

    let mut builder = AssemblyConfigBuilder::new()
        .tiling(tile_x, tile_y)
        .chain_length(chain_length)
        .backfill(backfill);
    if let Some(pattern) = pattern {
        builder = builder.pattern(pattern);
    }
    if let Some(fractions) = fractions {
        builder = builder.fractions(fractions);
    }
    let core_config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        surface,
        chains,
        core_config,
    })
}

fn relative_to(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn resolve_pattern(
    args: &BuildArgs,
    file_val: Option<&FilePatternConfig>,
    defaults: &DefaultsConfig,
) -> Result<Option<Pattern>> {
    let (file_spec, file_seed, file_separation) = match file_val {
        Some(FilePatternConfig::Grid { nx, ny }) => (
            Some(PatternSpec::Grid {
                n_x: *nx,
                n_y: *ny,
            }),
            None,
            None,
        ),
        Some(FilePatternConfig::Random {
            count,
            seed,
            min_separation,
        }) => (
            Some(PatternSpec::Random { count: *count }),
            *seed,
            *min_separation,
        ),
        Some(FilePatternConfig::Full) => (Some(PatternSpec::Full), None, None),
        None => (None, None, None),
    };

    let spec = match &args.pattern {
        Some(text) => parser::parse_pattern_spec(text)?,
        None => file_spec.unwrap_or(defaults.pattern),
    };
    let seed = args.seed.or(file_seed);
    if seed.is_some() && !matches!(spec, PatternSpec::Random { .. }) {
        warn!("A seed was given but the {:?} pattern is deterministic; ignoring it.", spec);
    }

    debug!("Generating placement pattern {:?} (seed: {:?})", spec, seed);
    Ok(spec.generate(seed, file_separation.unwrap_or(defaults.min_separation))?)
}

fn square_lattice_params(file_val: &FileSquareLattice) -> SquareLatticeParams {
    let d = SquareLatticeParams::default();
    SquareLatticeParams {
        sites_x: file_val.sites_x.unwrap_or(d.sites_x),
        sites_y: file_val.sites_y.unwrap_or(d.sites_y),
        spacing: file_val.spacing.unwrap_or(d.spacing),
        substrate_element: file_val
            .substrate_element
            .clone()
            .unwrap_or(d.substrate_element),
        anchor_element: file_val.anchor_element.clone().unwrap_or(d.anchor_element),
        anchor_height: file_val.anchor_height.unwrap_or(d.anchor_height),
        attach_distance: file_val.attach_distance.unwrap_or(d.attach_distance),
        box_height: file_val.box_height.unwrap_or(d.box_height),
    }
}

fn resolve_surface(
    file_val: Option<&FileSurfaceConfig>,
    base_dir: &Path,
) -> Result<SurfaceTemplate> {
    match file_val {
        Some(FileSurfaceConfig::File { path }) => Ok(load_surface(&relative_to(base_dir, path))?),
        Some(FileSurfaceConfig::SquareLattice(params)) => {
            SurfaceTemplate::square_lattice(&square_lattice_params(params))
                .map_err(|e| CliError::Config(format!("Invalid square lattice surface: {}", e)))
        }
        None => SurfaceTemplate::square_lattice(&SquareLatticeParams::default())
            .map_err(|e| CliError::Config(format!("Invalid square lattice surface: {}", e))),
    }
}

fn resolve_chains(
    file_val: &[FileChainConfig],
    chain_length: usize,
    base_dir: &Path,
) -> Result<Vec<ChainPrototype>> {
    file_val
        .iter()
        .enumerate()
        .map(|(index, chain)| match chain {
            FileChainConfig::Alkane { length, .. } => {
                FlexiblePrototype::alkane(length.unwrap_or(chain_length))
                    .map(ChainPrototype::from)
                    .map_err(|e| CliError::Config(format!("`chains[{}]`: {}", index, e)))
            }
            FileChainConfig::File { path, .. } => {
                let fragment = load_fragment(&relative_to(base_dir, path))?;
                Ok(RigidPrototype::new(fragment).into())
            }
        })
        .collect()
}

/// Either every chain entry sets a fraction or none does.
fn resolve_fractions(file_val: &[FileChainConfig]) -> Result<Option<Vec<f64>>> {
    let given: Vec<f64> = file_val.iter().filter_map(FileChainConfig::fraction).collect();
    match given.len() {
        0 => Ok(None),
        n if n == file_val.len() => Ok(Some(given)),
        n => Err(CliError::Config(format!(
            "{} of {} `chains` entries set a fraction; set it on all of them or on none",
            n,
            file_val.len()
        ))),
    }
}

fn resolve_backfill(file_val: Option<&FileBackfillConfig>, base_dir: &Path) -> Result<CapGroup> {
    match file_val {
        Some(FileBackfillConfig::File { path }) => Ok(CapGroup::new(load_fragment(
            &relative_to(base_dir, path),
        )?)),
        Some(FileBackfillConfig::Hydrogen) | None => Ok(CapGroup::hydrogen()),
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "chain-length" => {
                config.chain_length = Some(parse_value(key, value_str, "integer")?);
            }
            "tiling.x" => {
                config.tiling.get_or_insert_with(Default::default).x =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "tiling.y" => {
                config.tiling.get_or_insert_with(Default::default).y =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "pattern.seed" | "pattern.min-separation" => {
                let Some(FilePatternConfig::Random {
                    seed,
                    min_separation,
                    ..
                }) = config.pattern.as_mut()
                else {
                    return Err(CliError::Config(format!(
                        "`{}` requires a random `[pattern]` in the config file",
                        key
                    )));
                };
                if key == "pattern.seed" {
                    *seed = Some(parse_value(key, value_str, "integer")?);
                } else {
                    *min_separation = Some(parse_value(key, value_str, "float")?);
                }
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
