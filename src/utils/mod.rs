pub mod table {
    // Display width in chars; names may carry non-ASCII labels
    fn width(s: &str) -> usize {
        s.chars().count()
    }

    fn sep(widths: &[usize]) -> String {
        let mut s = String::from("+");
        for w in widths {
            s.push_str(&"-".repeat(w + 2));
            s.push('+');
        }
        s
    }

    fn line(cells: &[String], widths: &[usize]) -> String {
        let mut s = String::from("|");
        for (cell, &w) in cells.iter().zip(widths) {
            s.push(' ');
            s.push_str(cell);
            s.push_str(&" ".repeat(w.saturating_sub(width(cell))));
            s.push_str(" |");
        }
        s
    }

    /// Render an ASCII table; missing cells render empty, extra cells are dropped.
    #[must_use]
    pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
        let cols = headers.len();
        let mut widths: Vec<usize> = headers.iter().map(|h| width(h)).collect();
        for row in rows {
            for (c, w) in widths.iter_mut().enumerate() {
                *w = (*w).max(row.get(c).map_or(0, |s| width(s)));
            }
        }

        let mut out = String::new();
        out.push_str(&sep(&widths));
        out.push('\n');
        let header_cells: Vec<String> = headers.iter().map(|s| (*s).to_string()).collect();
        out.push_str(&line(&header_cells, &widths));
        out.push('\n');
        out.push_str(&sep(&widths));
        out.push('\n');
        for row in rows {
            let cells: Vec<String> = (0..cols).map(|i| row.get(i).cloned().unwrap_or_default()).collect();
            out.push_str(&line(&cells, &widths));
            out.push('\n');
        }
        out.push_str(&sep(&widths));
        out
    }

    /// Numbered single-column table, as used by the list-style queries.
    #[must_use]
    pub fn numbered(header: &str, items: &[String]) -> String {
        let rows: Vec<Vec<String>> = items
            .iter()
            .enumerate()
            .map(|(i, v)| vec![(i + 1).to_string(), v.clone()])
            .collect();
        render(&["#", header], &rows)
    }
}

pub mod config {
    use log::warn;
    use serde::Deserialize;
    use std::fs;
    use std::path::{Path, PathBuf};

    pub const CONFIG_FILE_NAME: &str = "amass-mapper.toml";

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct ListConfig {
        pub mode: Option<String>, // "simple" | "categorized" | "detailed"
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct MapConfig {
        pub renderer: Option<String>, // "graphviz" | "dot" | "html" | "text"
        pub format: Option<String>,   // "svg" | "png" | "pdf"
        pub show_ips: Option<bool>,
        pub show_orgs: Option<bool>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct DotConfig {
        pub legend: Option<bool>,
        pub theme: Option<String>,   // "light" | "dark"
        pub rankdir: Option<String>, // "LR" | "TB"
        pub splines: Option<String>, // "curved" | "ortho" | "polyline"
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct SvgConfig {
        pub interactive: Option<bool>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct QueryConfig {
        pub default_format: Option<String>, // "text" | "json"
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct Config {
        pub list: Option<ListConfig>,
        pub map: Option<MapConfig>,
        pub dot: Option<DotConfig>,
        pub svg: Option<SvgConfig>,
        pub query: Option<QueryConfig>,
    }

    /// Config file looked up next to a report.
    #[must_use]
    pub fn default_config_path(input: &Path) -> PathBuf {
        input.parent().unwrap_or_else(|| Path::new(".")).join(CONFIG_FILE_NAME)
    }

    /// Load a config file. Unreadable or malformed files yield `None` with a warning.
    #[must_use]
    pub fn load_config_at(path: &Path) -> Option<Config> {
        let data = match fs::read_to_string(path) {
            Ok(d) => d,
            Err(e) => {
                warn!("ignoring config {}: {e}", path.display());
                return None;
            }
        };
        match toml::from_str::<Config>(&data) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                warn!("ignoring invalid config {}: {e}", path.display());
                None
            }
        }
    }

    /// Load `amass-mapper.toml` from the directory holding `input`, if present.
    #[must_use]
    pub fn load_config_near(input: &Path) -> Option<Config> {
        let p = default_config_path(input);
        if p.exists() {
            load_config_at(&p)
        } else {
            None
        }
    }

    /// Explicit `--config` wins; otherwise look next to the report.
    #[must_use]
    pub fn resolve(explicit: Option<&Path>, input: &Path) -> Config {
        match explicit {
            Some(p) => load_config_at(p),
            None => load_config_near(input),
        }
        .unwrap_or_default()
    }
}
