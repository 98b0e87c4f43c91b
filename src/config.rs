//! User configuration (`config.toml`).
//!
//! ```toml
//! [grid]
//! rows = 20
//! cols = 10
//!
//! [eval]
//! max_range_cells = 1000000
//! ```

use directories::ProjectDirs;
use gridform_core::{DEFAULT_COLS, DEFAULT_ROWS};
use gridform_engine::engine::{DEFAULT_MAX_RANGE_CELLS, EvalOptions, MAX_COLUMNS};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    grid: Option<GridSection>,
    eval: Option<EvalSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridSection {
    rows: Option<usize>,
    cols: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EvalSection {
    max_range_cells: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub rows: usize,
    pub cols: usize,
    pub max_range_cells: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            max_range_cells: DEFAULT_MAX_RANGE_CELLS,
        }
    }
}

impl Config {
    pub fn eval_options(&self) -> EvalOptions {
        EvalOptions {
            max_range_cells: self.max_range_cells,
        }
    }

    fn apply(&mut self, file: ConfigFile) {
        if let Some(grid) = file.grid {
            self.rows = grid.rows.unwrap_or(self.rows);
            self.cols = grid.cols.unwrap_or(self.cols);
        }
        if let Some(eval) = file.eval {
            self.max_range_cells = eval.max_range_cells.unwrap_or(self.max_range_cells);
        }
    }
}

/// Load configuration from `config_file`, or from the user config dir.
///
/// Never fails: problems are returned as warnings and defaults are used.
pub fn load_config(config_file: Option<&PathBuf>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let mut config = Config::default();

    let Some(path) = config_file.cloned().or_else(user_config_path) else {
        return (config, warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (config, warnings);
    }

    match read_config_file(&path) {
        Ok(file) => config.apply(file),
        Err(warning) => warnings.push(warning),
    }

    if config.cols > MAX_COLUMNS {
        warnings.push(format!(
            "{}: cols = {} exceeds {}; using {}",
            path.display(),
            config.cols,
            MAX_COLUMNS,
            MAX_COLUMNS
        ));
        config.cols = MAX_COLUMNS;
    }

    (config, warnings)
}

fn read_config_file(path: &Path) -> Result<ConfigFile, String> {
    let meta = std::fs::metadata(path)
        .map_err(|err| format!("Failed to read metadata for {}: {}", path.display(), err))?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        return Err(format!(
            "Refusing to read {}: file too large ({} bytes, max {})",
            path.display(),
            meta.len(),
            MAX_CONFIG_FILE_BYTES
        ));
    }
    let content = std::fs::read_to_string(path)
        .map_err(|err| format!("Failed to read {}: {}", path.display(), err))?;
    toml::from_str::<ConfigFile>(&content)
        .map_err(|err| format!("Failed to parse {}: {}", path.display(), err))
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "gridform")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("gridform_{}_{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_config_reads_all_sections() {
        let path = temp_config(
            "full.toml",
            "[grid]\nrows = 5\ncols = 3\n\n[eval]\nmax_range_cells = 42\n",
        );
        let (config, warnings) = load_config(Some(&path));
        let _ = std::fs::remove_file(&path);

        assert!(warnings.is_empty(), "{:?}", warnings);
        assert_eq!(
            config,
            Config {
                rows: 5,
                cols: 3,
                max_range_cells: 42,
            }
        );
    }

    #[test]
    fn load_config_partial_keeps_defaults() {
        let path = temp_config("partial.toml", "[grid]\nrows = 50\n");
        let (config, _) = load_config(Some(&path));
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.rows, 50);
        assert_eq!(config.cols, DEFAULT_COLS);
        assert_eq!(config.max_range_cells, DEFAULT_MAX_RANGE_CELLS);
    }

    #[test]
    fn load_config_falls_back_with_warning() {
        let path = temp_config("bad.toml", "[grid]\nrowz = 5\n");
        let (config, warnings) = load_config(Some(&path));
        let _ = std::fs::remove_file(&path);

        assert_eq!(config, Config::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Failed to parse"));
    }

    #[test]
    fn load_config_missing_explicit_file_warns() {
        let path = std::env::temp_dir().join("gridform_definitely_missing.toml");
        let (config, warnings) = load_config(Some(&path));
        assert_eq!(config, Config::default());
        assert!(warnings[0].starts_with("Config file not found"));
    }

    #[test]
    fn load_config_clamps_columns() {
        let path = temp_config("wide.toml", "[grid]\ncols = 40\n");
        let (config, warnings) = load_config(Some(&path));
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.cols, 26);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn load_config_rejects_oversized_file() {
        let path = temp_config("large.toml", &"#".repeat(1_048_577));
        let (config, warnings) = load_config(Some(&path));
        let _ = std::fs::remove_file(&path);

        assert_eq!(config, Config::default());
        assert!(warnings[0].starts_with("Refusing to read"));
    }
}
