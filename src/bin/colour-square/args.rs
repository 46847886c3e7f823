use std::path::PathBuf;

use clap::Parser;

use colour_square::config::{ConfigError, Settings};

#[derive(Debug, Parser)]
#[command(name = "colour-square", about = "Fly around a randomly coloured square")]
pub struct Args {
    /// JSON5 settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Vertex shader source, overrides the settings file
    #[arg(long)]
    pub vertex: Option<PathBuf>,
    /// Fragment shader source, overrides the settings file
    #[arg(long)]
    pub fragment: Option<PathBuf>,
    /// Seed for the corner colours, random when omitted
    #[arg(long)]
    pub seed: Option<u64>,
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        let mut settings = match &self.config {
            Some(path) => Settings::load_from_path(path)?,
            None => Settings::default(),
        };

        if let Some(vertex) = &self.vertex {
            settings.vertex_shader = vertex.clone();
        }

        if let Some(fragment) = &self.fragment {
            settings.fragment_shader = fragment.clone();
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_flags() {
        let args = Args::try_parse_from(["colour-square"]).unwrap();

        assert!(args.config.is_none());
        assert!(!args.verbose);
        assert_eq!(args.settings().unwrap(), Settings::default());
    }

    #[test]
    fn shader_overrides() {
        let args = Args::try_parse_from([
            "colour-square",
            "--vertex",
            "a.glsl",
            "--fragment",
            "b.glsl",
            "--seed",
            "9",
        ])
        .unwrap();

        let settings = args.settings().unwrap();

        assert_eq!(settings.vertex_shader, PathBuf::from("a.glsl"));
        assert_eq!(settings.fragment_shader, PathBuf::from("b.glsl"));
        assert_eq!(args.seed, Some(9));
    }

    #[test]
    fn missing_config_file() {
        let args = Args::try_parse_from(["colour-square", "-c", "nope.json5"]).unwrap();

        assert!(matches!(args.settings(), Err(ConfigError::Input(_))));
    }
}
