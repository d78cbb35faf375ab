use clap::{App, Arg};
use color_eyre::eyre::{self, WrapErr};
use color_eyre::Report;
use vnep_eval::{McfResult, RandRoundResult, SerializationFormat, SolutionStorage};
use vnep_plot::diagnostics::select_suspicious_scenarios;
use vnep_plot::progress::TracingProgressBar;
use vnep_plot::{EvaluationConfig, Renderer, TopologySizes};

struct Args {
    baseline: String,
    randround: String,
    format: SerializationFormat,
    config: EvaluationConfig,
    topology_sizes: TopologySizes,
    report_suspicious: bool,
}

fn main() -> Result<(), Report> {
    color_eyre::install()?;
    let args = parse_args()?;
    let progress = TracingProgressBar::init();

    // load both storages in parallel
    tracing::info!(
        "[main] loading {} and {}",
        args.baseline,
        args.randround
    );
    let (baseline, randround) = rayon::join(
        || SolutionStorage::<McfResult>::load(&args.baseline, args.format),
        || SolutionStorage::<RandRoundResult>::load(&args.randround, args.format),
    );
    let mut baseline = baseline?;
    let mut randround = randround?;

    let config = &args.config;
    if args.report_suspicious {
        let suspicious = select_suspicious_scenarios(
            &baseline,
            &config.baseline_algorithm_id,
            config.baseline_execution_id,
        )?;
        tracing::info!("[main] suspicious scenarios: {:?}", suspicious);
    }

    let mut renderer = renderer(config);
    vnep_plot::evaluate_baseline_and_randround(
        &mut baseline,
        &mut randround,
        config,
        &args.topology_sizes,
        renderer.as_mut(),
        &progress,
    )
    .wrap_err("evaluate baseline and randround")?;
    tracing::info!("[main] done");
    Ok(())
}

#[cfg(feature = "pyo3")]
fn renderer(config: &EvaluationConfig) -> Box<dyn Renderer> {
    Box::new(vnep_plot::plot::Matplotlib::new(
        config.output.show_plot,
        config.output.save_plot,
    ))
}

#[cfg(not(feature = "pyo3"))]
fn renderer(config: &EvaluationConfig) -> Box<dyn Renderer> {
    Box::new(vnep_plot::JsonRenderer::new(config.output.save_plot))
}

fn parse_args() -> Result<Args, Report> {
    let matches = App::new("vnep_plot")
        .version("0.1")
        .about("Plots the evaluation of baseline and randomized rounding solutions.")
        .arg(
            Arg::with_name("baseline")
                .long("baseline")
                .value_name("BASELINE_STORAGE")
                .help("solution storage of the baseline MIP")
                .required(true)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("randround")
                .long("randround")
                .value_name("RANDROUND_STORAGE")
                .help("solution storage of the randomized rounding")
                .required(true)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("format")
                .long("format")
                .value_name("FORMAT")
                .help("format of both storages: json, bincode or bincode.gz; default: bincode.gz")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("CONFIG")
                .help("JSON evaluation config; defaults are used if not set")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("topology_sizes")
                .long("topology-sizes")
                .value_name("TOPOLOGY_SIZES")
                .help("CSV file with the number of nodes of each topology")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("report_suspicious")
                .long("report-suspicious")
                .help("log baseline solutions with a very high gap or no requests"),
        )
        .arg(
            Arg::with_name("temporal")
                .long("temporal")
                .help("also compare MDK and MIP incumbents over time"),
        )
        .get_matches();

    let format = match matches.value_of("format") {
        Some(format) => SerializationFormat::parse(format)
            .ok_or_else(|| eyre::eyre!("unknown serialization format {:?}", format))?,
        None => SerializationFormat::BincodeGz,
    };
    let mut config = match matches.value_of("config") {
        Some(path) => EvaluationConfig::load(path)?,
        None => EvaluationConfig::default(),
    };
    if matches.is_present("temporal") {
        config.temporal = true;
    }
    let topology_sizes = match matches.value_of("topology_sizes") {
        Some(path) => TopologySizes::load(path)?,
        None => TopologySizes::default(),
    };

    Ok(Args {
        baseline: parse_path(matches.value_of("baseline"), "baseline")?,
        randround: parse_path(matches.value_of("randround"), "randround")?,
        format,
        config,
        topology_sizes,
        report_suspicious: matches.is_present("report_suspicious"),
    })
}

fn parse_path(path: Option<&str>, what: &str) -> Result<String, Report> {
    path.map(String::from)
        .ok_or_else(|| eyre::eyre!("{} storage should be set", what))
}
