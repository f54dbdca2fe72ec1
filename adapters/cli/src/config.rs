use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use maze_chase_core::GridSize;
use maze_chase_system_generation::{GeneratorConfig, PartitionStrategy};
use maze_chase_system_pursuit::PursuitConfig;
use serde::Deserialize;

/// Settings read from an optional TOML file. Missing keys keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AppConfig {
    generator: GeneratorSection,
    pursuit: PursuitSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct GeneratorSection {
    rows: Option<u32>,
    columns: Option<u32>,
    random_holes: Option<usize>,
    carve_entrance: Option<bool>,
    carve_exit: Option<bool>,
    max_attempts: Option<u32>,
    partition: Option<Partition>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum Partition {
    DepthFirst,
    UnionFind,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PursuitSection {
    cycle_budget: Option<u32>,
    initial_limit_index: Option<usize>,
    widened_limit_index: Option<usize>,
    widen_after_ms: Option<u64>,
    abort_after_ms: Option<u64>,
    tick_ms: Option<u64>,
}

impl AppConfig {
    /// Reads the file when a path is given, otherwise returns the defaults.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid config file at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config toml contents")
    }

    /// Generator settings with file values applied over the defaults.
    pub(crate) fn generator_config(&self) -> GeneratorConfig {
        let section = &self.generator;
        let defaults = GeneratorConfig::default();

        GeneratorConfig {
            size: GridSize::new(
                section.rows.unwrap_or(defaults.size.rows()),
                section.columns.unwrap_or(defaults.size.columns()),
            ),
            random_holes: section.random_holes.unwrap_or(defaults.random_holes),
            carve_entrance: section.carve_entrance.unwrap_or(defaults.carve_entrance),
            carve_exit: section.carve_exit.unwrap_or(defaults.carve_exit),
            max_attempts: section.max_attempts.unwrap_or(defaults.max_attempts),
            partition: match section.partition {
                Some(Partition::DepthFirst) => PartitionStrategy::DepthFirst,
                Some(Partition::UnionFind) => PartitionStrategy::UnionFind,
                None => defaults.partition,
            },
        }
    }

    /// Pursuit settings with file values applied over the defaults.
    pub(crate) fn pursuit_config(&self) -> PursuitConfig {
        let section = &self.pursuit;
        let defaults = PursuitConfig::default();
        let millis = |value: Option<u64>, fallback: Duration| {
            value.map_or(fallback, Duration::from_millis)
        };

        PursuitConfig {
            cycle_budget: section.cycle_budget.unwrap_or(defaults.cycle_budget),
            initial_limit_index: section
                .initial_limit_index
                .unwrap_or(defaults.initial_limit_index),
            widened_limit_index: section
                .widened_limit_index
                .unwrap_or(defaults.widened_limit_index),
            widen_after: millis(section.widen_after_ms, defaults.widen_after),
            abort_after: millis(section.abort_after_ms, defaults.abort_after),
            tick_duration: millis(section.tick_ms, defaults.tick_duration),
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_keeps_defaults() {
        let config = AppConfig::parse("").expect("empty toml parses");
        assert_eq!(config.generator_config(), GeneratorConfig::default());
        assert_eq!(config.pursuit_config(), PursuitConfig::default());
    }

    #[test]
    fn sections_override_individual_values() {
        let config = AppConfig::parse(
            r#"
            [generator]
            rows = 12
            random_holes = 3
            partition = "union-find"

            [pursuit]
            cycle_budget = 4
            abort_after_ms = 1500
            "#,
        )
        .expect("valid toml");

        let generator = config.generator_config();
        assert_eq!(generator.size, GridSize::new(12, 16));
        assert_eq!(generator.random_holes, 3);
        assert_eq!(generator.partition, PartitionStrategy::UnionFind);

        let pursuit = config.pursuit_config();
        assert_eq!(pursuit.cycle_budget, 4);
        assert_eq!(pursuit.abort_after, Duration::from_millis(1500));
        assert_eq!(pursuit.tick_duration, Duration::from_millis(40));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(AppConfig::parse("[generator]\nwidth = 3\n").is_err());
    }
}
