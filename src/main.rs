//! frqviz - frequency heatmaps and sampling-location maps
//!
//! This is the command-line entry point.

use anyhow::Context;
use std::time::Instant;
use tracing::{error, info};

use frqviz::config::{Command, HeatmapArgs, MapArgs};
use frqviz::heatmap::plotly::write_figure;
use frqviz::heatmap::{self, HeatmapOptions, PlotlyBackend, RendererTarget, TitleOption};
use frqviz::loader::{load_dataset, LoadOptions};
use frqviz::map::{self, LeafletBackend, MapOptions};
use frqviz::{init_tracing, log_error, log_operation_end, log_operation_start, Config};

fn main() -> anyhow::Result<()> {
    let (config, command) = Config::load().context("loading configuration")?;

    init_tracing(&config.log_level);

    info!("Starting frqviz v{}", env!("CARGO_PKG_VERSION"));

    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    match command {
        Command::Heatmap(args) => run_heatmap(&config, &args),
        Command::Map(args) => run_map(&config, &args),
    }
}

fn run_heatmap(config: &Config, args: &HeatmapArgs) -> anyhow::Result<()> {
    let start = Instant::now();
    log_operation_start("heatmap", Some(&args.input.display().to_string()));

    let dataset = load_dataset(
        &args.input,
        &LoadOptions {
            index: args.dataset_index.clone(),
            title: args.dataset_title.clone(),
        },
    )
    .with_context(|| format!("loading {}", args.input.display()))?;

    let mut options = HeatmapOptions::from(&config.heatmap);
    options.width = args.width;
    options.height = args.height;
    options.title = if args.no_title {
        TitleOption::None
    } else {
        match &args.title {
            Some(title) => TitleOption::Explicit(title.clone()),
            None => TitleOption::UseEmbedded,
        }
    };

    let backend = PlotlyBackend::new(
        &config.output.output_dir,
        config.output.renderer.parse()?,
    );

    let result = match &args.output {
        // explicit file: build the figure and write it ourselves
        Some(path) => {
            options.show = false;
            let target = RendererTarget::from_path(path)?;
            heatmap::render(&dataset, &options, &backend).and_then(|figure| match figure {
                Some(figure) => write_figure(&figure, target, path),
                None => Ok(()),
            })
        }
        None => heatmap::render(&dataset, &options, &backend).map(|_| ()),
    };

    if let Err(e) = &result {
        log_error(e, "heatmap");
    }
    log_operation_end("heatmap", start, result.is_ok());

    result.context("rendering heatmap")?;
    if let Some(path) = &args.output {
        info!(path = %path.display(), "Heatmap written");
    }
    Ok(())
}

fn run_map(config: &Config, args: &MapArgs) -> anyhow::Result<()> {
    let start = Instant::now();
    log_operation_start("map", Some(&args.input.display().to_string()));

    let dataset = load_dataset(
        &args.input,
        &LoadOptions {
            index: args.dataset_index.clone(),
            title: None,
        },
    )
    .with_context(|| format!("loading {}", args.input.display()))?;

    let result = map::render(
        &dataset,
        args.taxa.as_slice(),
        &MapOptions::from(&config.map),
        &LeafletBackend,
    );

    let result = result.and_then(|m| match &args.output {
        Some(path) => m.save(path).map(|_| path.clone()),
        None => {
            std::fs::create_dir_all(&config.output.output_dir)?;
            let path = config
                .output
                .output_dir
                .join(format!("map-{}.html", frqviz::generate_render_id()));
            m.save(&path).map(|_| path)
        }
    });

    if let Err(e) = &result {
        log_error(e, "map");
    }
    log_operation_end("map", start, result.is_ok());

    let path = result.context("rendering map")?;
    info!(path = %path.display(), "Map written");
    Ok(())
}
