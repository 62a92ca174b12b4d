use monolayer::core::prototype::ChainPrototype;
use monolayer::core::surface::template::SurfaceTemplate;
use monolayer::engine::config::AssemblyConfig;

/// Everything the `build` command hands to the assembler.
pub struct AppConfig {
    pub surface: SurfaceTemplate,
    pub chains: Vec<ChainPrototype>,
    pub core_config: AssemblyConfig,
}
