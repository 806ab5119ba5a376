//! Named maze configurations.
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Static layout of a maze.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MazeStructure {
    /// (rows, columns).
    pub size: (usize, usize),
    /// Impassable cells.
    pub walls: Vec<(usize, usize)>,
    /// Cells that end the episode on entry.
    pub terminal_states: Vec<(usize, usize)>,
    /// Per-cell rewards; unlisted cells pay zero.
    pub rewards: Vec<((usize, usize), f64)>,
}

/// Configuration of [`MazeEnv`](crate::maze::MazeEnv).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MazeConfig {
    /// Maze layout.
    pub structure: MazeStructure,
    /// Reward added to every step.
    pub living_cost: f64,
    /// Probability mass of lateral movement noise.
    pub noise: f64,
}

impl MazeConfig {
    /// The classic 3x4 grid with one wall and a +1/-1 exit pair.
    pub fn simple() -> Self {
        Self {
            structure: MazeStructure {
                size: (3, 4),
                walls: vec![(1, 1)],
                terminal_states: vec![(0, 3), (1, 3)],
                rewards: vec![((0, 3), 1.0), ((1, 3), -1.0)],
            },
            living_cost: -0.04,
            noise: 0.2,
        }
    }

    /// A larger 8x7 maze with several traps and one rewarding exit.
    pub fn complex() -> Self {
        Self {
            structure: MazeStructure {
                size: (8, 7),
                walls: vec![
                    (1, 1),
                    (1, 2),
                    (1, 4),
                    (2, 1),
                    (2, 4),
                    (4, 3),
                    (4, 5),
                    (4, 6),
                    (5, 2),
                    (6, 3),
                    (6, 4),
                    (6, 5),
                    (7, 1),
                ],
                terminal_states: vec![
                    (1, 5),
                    (2, 2),
                    (2, 5),
                    (4, 1),
                    (4, 2),
                    (5, 1),
                    (5, 3),
                ],
                rewards: vec![
                    ((1, 5), -1.0),
                    ((2, 2), -1.0),
                    ((2, 5), -1.0),
                    ((4, 1), -1.0),
                    ((4, 2), -1.0),
                    ((5, 3), 1.0),
                    ((5, 1), -1.0),
                ],
            },
            living_cost: -0.01,
            noise: 0.2,
        }
    }

    /// Looks a configuration up by its variant name.
    pub fn named(variant: &str) -> Result<Self> {
        match variant {
            "simple" => Ok(Self::simple()),
            "complex" => Ok(Self::complex()),
            _ => bail!("unknown maze variant: {}", variant),
        }
    }

    /// Constructs a [`MazeConfig`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let config = serde_yaml::from_reader(rdr)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_variants_resolve() {
        assert_eq!(MazeConfig::named("simple").unwrap(), MazeConfig::simple());
        assert_eq!(MazeConfig::named("complex").unwrap(), MazeConfig::complex());
        assert!(MazeConfig::named("bogus").is_err());
    }

    #[test]
    fn config_roundtrips_through_yaml() {
        let config = MazeConfig::simple();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: MazeConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, config);
    }
}
