use std::path::PathBuf;

use anyhow::{bail, Context};

const USAGE: &str =
    "usage: hierarchy-cleaner [--headless] [--original <name>] [--container-scale <scale>] [scene.gltf]";

#[derive(Debug, Clone, PartialEq)]
pub struct CleanerConfig {
    /// glTF file to load. A built-in sample hierarchy is used when unset.
    pub scene_path: Option<PathBuf>,
    /// Run all three steps without opening a window.
    pub headless: bool,
    /// Name of the object to use as the original hierarchy.
    pub original: Option<String>,
    /// Uniform local scale of the created "Meshes" container.
    pub meshes_container_scale: f32,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            scene_path: None,
            headless: false,
            original: None,
            meshes_container_scale: 100.0,
        }
    }
}

impl CleanerConfig {
    /// Parses arguments, excluding the program name.
    pub fn from_args<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--headless" => config.headless = true,
                "--original" => {
                    config.original = Some(args.next().context("--original needs a value")?);
                }
                "--container-scale" => {
                    let value = args.next().context("--container-scale needs a value")?;
                    let scale: f32 = value
                        .parse()
                        .with_context(|| format!("Invalid container scale: {value}"))?;
                    if !scale.is_finite() || scale == 0.0 {
                        bail!("Container scale must be finite and non-zero, got {value}");
                    }
                    config.meshes_container_scale = scale;
                }
                flag if flag.starts_with("--") => bail!("Unknown flag {flag}\n{USAGE}"),
                path => {
                    if config.scene_path.is_some() {
                        bail!("Only one scene file can be given\n{USAGE}");
                    }
                    config.scene_path = Some(PathBuf::from(path));
                }
            }
        }

        Ok(config)
    }
}
