use crate::cli::{
    Cli, Commands, DotRankDirArg, DotSplinesArg, DotThemeArg, ImageFormatArg, ListModeArg, OnOffArg,
    OutputFormat, QueryCommands, RendererArg,
};
use crate::errors::MapperError;
use crate::graph::ReconModel;
use crate::parser::AmassParser;
use crate::query::{
    CategorizeQuery, ExternalQuery, Query, RelationsQuery, ResolveQuery, StatsQuery, SubdomainsQuery,
};
use crate::report::{self, ExportFormat, ListMode};
use crate::utils::config::{self, Config};
use crate::visualization::{
    default_output_name, DotGenerator, DotOptions, DotTheme, EdgeStyle, GraphvizRenderer, HtmlGenerator,
    ImageFormat, RankDir, RenderOptions,
};
use clap::CommandFactory;
use clap_complete::generate;
use log::{debug, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const EMPTY_REPORT: &str = "No domains found in the file";

/// Run the CLI logic in-process.
///
/// Returns an exit code (0 = success, including a report with no domains).
#[must_use]
pub fn run_cli(cli: Cli) -> i32 {
    let quiet = cli.quiet;
    let explicit_config = cli.config;
    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let mut out = io::stdout();
            generate(shell, &mut cmd, "amass-mapper", &mut out);
            0
        }
        Commands::List { file, mode, export, export_ips, export_categorized, export_clean } => {
            let Some(model) = load_model(&file) else { return 1 };
            if model.is_empty() {
                if !quiet {
                    println!("{EMPTY_REPORT}");
                }
                return 0;
            }
            let cfg = config::resolve(explicit_config.as_deref(), &file);

            let mode = match mode {
                Some(ListModeArg::Simple) => ListMode::Simple,
                Some(ListModeArg::Categorized) => ListMode::Categorized,
                Some(ListModeArg::Detailed) => ListMode::Detailed,
                None => match cfg.list.as_ref().and_then(|l| l.mode.as_deref()) {
                    Some("categorized") => ListMode::Categorized,
                    Some("detailed") => ListMode::Detailed,
                    _ => ListMode::Simple,
                },
            };
            if !quiet {
                print!("{}", report::render_list(&model, mode));
            }

            let mut exports: Vec<(PathBuf, ExportFormat)> = Vec::new();
            if let Some(path) = export {
                let format = if export_categorized {
                    ExportFormat::Categorized
                } else if export_ips {
                    ExportFormat::WithIps
                } else {
                    ExportFormat::Simple
                };
                exports.push((path, format));
            }
            if let Some(path) = export_clean {
                exports.push((path, ExportFormat::Clean));
            }
            for (path, format) in exports {
                match report::export_to_file(&model, &path, format) {
                    Ok(n) => {
                        if !quiet {
                            println!("{n} domains exported to {}", path.display());
                        }
                    }
                    Err(e) => {
                        eprintln!("{e}");
                        return 1;
                    }
                }
            }
            0
        }
        Commands::Map {
            file,
            renderer,
            format,
            no_ips,
            show_orgs,
            output,
            dot_theme,
            dot_rankdir,
            dot_splines,
            dot_legend,
            svg_interactive,
        } => {
            let Some(model) = load_model(&file) else { return 1 };
            if model.is_empty() {
                if !quiet {
                    println!("{EMPTY_REPORT}");
                }
                return 0;
            }
            let cfg = config::resolve(explicit_config.as_deref(), &file);
            let map_cfg = cfg.map.clone().unwrap_or_default();

            let renderer = renderer.unwrap_or_else(|| match map_cfg.renderer.as_deref() {
                Some("dot") => RendererArg::Dot,
                Some("html") => RendererArg::Html,
                Some("text") => RendererArg::Text,
                _ => RendererArg::Graphviz,
            });
            let image_format = match format {
                Some(ImageFormatArg::Svg) => ImageFormat::Svg,
                Some(ImageFormatArg::Png) => ImageFormat::Png,
                Some(ImageFormatArg::Pdf) => ImageFormat::Pdf,
                None => match map_cfg.format.as_deref() {
                    Some("png") => ImageFormat::Png,
                    Some("pdf") => ImageFormat::Pdf,
                    _ => ImageFormat::Svg,
                },
            };
            let mut dot_opts = dot_options(&cfg, dot_theme, dot_rankdir, dot_splines, dot_legend);
            dot_opts.show_ips = if no_ips { false } else { map_cfg.show_ips.unwrap_or(true) };
            dot_opts.show_orgs = show_orgs || map_cfg.show_orgs.unwrap_or(false);
            let interactive = match svg_interactive {
                Some(v) => v == OnOffArg::On,
                None => cfg.svg.as_ref().and_then(|s| s.interactive).unwrap_or(true),
            };
            debug!("map renderer={renderer:?} format={image_format:?} opts={dot_opts:?}");

            let rendered: Result<(Vec<u8>, &str), MapperError> = match renderer {
                RendererArg::Text => {
                    print!("{}", report::render_text_map(&model));
                    return 0;
                }
                RendererArg::Dot => DotGenerator::new()
                    .generate_dot_with_options(&model, dot_opts)
                    .map(|s| (s.into_bytes(), "dot")),
                RendererArg::Html => HtmlGenerator::new().generate_html(&model).map(|s| (s.into_bytes(), "html")),
                RendererArg::Graphviz => GraphvizRenderer::new()
                    .render(&model, RenderOptions { dot: dot_opts, format: image_format, interactive })
                    .map(|bytes| (bytes, image_format.extension())),
            };
            let (bytes, ext) = match rendered {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("{e}");
                    return 1;
                }
            };
            let out_path = output.unwrap_or_else(|| PathBuf::from(default_output_name(&model, ext)));
            if let Err(e) = fs::write(&out_path, bytes) {
                eprintln!("Failed to write map {}: {e}", out_path.display());
                return 1;
            }
            info!("wrote {ext} map to {}", out_path.display());
            if !quiet {
                println!("Map written to {}", out_path.display());
            }
            0
        }
        Commands::Query { query } => {
            let Some(model) = load_model(query.file()) else { return 1 };
            let cfg = config::resolve(explicit_config.as_deref(), query.file());
            let fmt = query.format().unwrap_or_else(|| {
                match cfg.query.as_ref().and_then(|q| q.default_format.as_deref()) {
                    Some("json") => OutputFormat::Json,
                    _ => OutputFormat::Text,
                }
            });
            let printed = match &query {
                QueryCommands::Categories { .. } => {
                    let categories = CategorizeQuery.run(&model);
                    emit(fmt, &categories, || {
                        let rows: Vec<Vec<String>> = categories
                            .non_empty()
                            .map(|(c, names)| vec![c.label().to_string(), names.len().to_string(), names.join(", ")])
                            .collect();
                        crate::utils::table::render(&["Category", "Count", "Domains"], &rows)
                    })
                }
                QueryCommands::Subdomains { .. } => list_result(fmt, "Subdomain", &SubdomainsQuery.run(&model)),
                QueryCommands::External { .. } => list_result(fmt, "External domain", &ExternalQuery.run(&model)),
                QueryCommands::Resolve { name, .. } => {
                    list_result(fmt, "Address", &ResolveQuery::new(name).run(&model))
                }
                QueryCommands::Relations { name, .. } => {
                    list_result(fmt, "Relation", &RelationsQuery::new(name).run(&model))
                }
                QueryCommands::Stats { .. } => {
                    let stats = StatsQuery.run(&model);
                    emit(fmt, &stats, || {
                        let rows = vec![
                            vec!["Root".to_string(), stats.root.clone()],
                            vec!["Domains".to_string(), stats.domains.to_string()],
                            vec!["Subdomains".to_string(), stats.subdomains.to_string()],
                            vec!["External domains".to_string(), stats.external.to_string()],
                            vec!["Unique IP addresses".to_string(), stats.addresses.to_string()],
                            vec!["Organizations".to_string(), stats.organizations.to_string()],
                            vec!["Relations".to_string(), stats.relations.to_string()],
                            vec!["Important relations".to_string(), stats.important_relations.to_string()],
                        ];
                        crate::utils::table::render(&["Metric", "Value"], &rows)
                    })
                }
            };
            match printed {
                Ok(()) => 0,
                Err(e) => {
                    eprintln!("{e}");
                    1
                }
            }
        }
    }
}

/// Parse the report, printing the failure on stderr.
fn load_model(path: &Path) -> Option<ReconModel> {
    match AmassParser::new().parse_file(path) {
        Ok(model) => Some(model),
        Err(e) => {
            eprintln!("Error: {e}");
            None
        }
    }
}

fn dot_options(
    cfg: &Config,
    theme: Option<DotThemeArg>,
    rankdir: Option<DotRankDirArg>,
    splines: Option<DotSplinesArg>,
    legend: Option<OnOffArg>,
) -> DotOptions {
    let defaults = DotOptions::default();
    let dot_cfg = cfg.dot.clone().unwrap_or_default();
    let theme = match theme {
        Some(DotThemeArg::Dark) => DotTheme::Dark,
        Some(DotThemeArg::Light) => DotTheme::Light,
        None => match dot_cfg.theme.as_deref() {
            Some("dark") => DotTheme::Dark,
            Some("light") => DotTheme::Light,
            _ => defaults.theme,
        },
    };
    let rankdir = match rankdir {
        Some(DotRankDirArg::LR) => RankDir::LR,
        Some(DotRankDirArg::TB) => RankDir::TB,
        None => match dot_cfg.rankdir.as_deref() {
            Some("LR") => RankDir::LR,
            Some("TB") => RankDir::TB,
            _ => defaults.rankdir,
        },
    };
    let splines = match splines {
        Some(DotSplinesArg::Curved) => EdgeStyle::Curved,
        Some(DotSplinesArg::Ortho) => EdgeStyle::Ortho,
        Some(DotSplinesArg::Polyline) => EdgeStyle::Polyline,
        None => match dot_cfg.splines.as_deref() {
            Some("curved") => EdgeStyle::Curved,
            Some("ortho") => EdgeStyle::Ortho,
            Some("polyline") => EdgeStyle::Polyline,
            _ => defaults.splines,
        },
    };
    let legend = match legend {
        Some(v) => v == OnOffArg::On,
        None => dot_cfg.legend.unwrap_or(defaults.legend),
    };
    DotOptions { legend, theme, rankdir, splines, ..defaults }
}

fn emit<T: serde::Serialize>(fmt: OutputFormat, value: &T, text: impl FnOnce() -> String) -> Result<(), MapperError> {
    match fmt {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => println!("{}", text()),
    }
    Ok(())
}

fn list_result(fmt: OutputFormat, header: &str, items: &[String]) -> Result<(), MapperError> {
    emit(fmt, &items, || crate::utils::table::numbered(header, items))
}
