use anyhow::Result;

mod app;
mod cleaner;
mod config;
mod engine;
mod gltf_import;
mod inspector;
mod rendering;
mod scene_graph;
#[cfg(test)]
mod test_logger;
mod window;

use config::CleanerConfig;

fn main() -> Result<()> {
    let mut logger = pretty_env_logger::formatted_builder();
    logger.filter_level(log::LevelFilter::Info);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        logger.parse_filters(&filters);
    }
    logger.init();

    let config = CleanerConfig::from_args(std::env::args().skip(1))?;

    if config.headless {
        return app::run_headless(config);
    }

    pollster::block_on(window::run(config))?;

    Ok(())
}
