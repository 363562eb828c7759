//! Arcsmooth CLI - smooths synthetic tangent-angle sequences.
//!
//! Usage: arcsmooth <COMMAND> [OPTIONS]
//!
//! The samples are generated from a circle (closed) or a circular arc (open)
//! with a deterministic perturbation, so the effect of each step rule can be
//! compared without any input files.
//!
//! Run `arcsmooth --help` for available commands. Library diagnostics (the
//! per-step energies of the gradient rules, convergence outcomes) are printed
//! when `RUST_LOG` is set, e.g. `RUST_LOG=arcsmooth=debug`.

use std::f64::consts::PI;
use std::io::Write;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};

use arcsmooth::angle;
use arcsmooth::prelude::*;
use std::result::Result;

#[derive(Parser)]
#[command(name = "arcsmooth")]
#[command(author, version, about = "Tangent-angle smoothing CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Smooth a synthetic curve with one step rule
    Smooth {
        #[command(flatten)]
        curve: CurveArgs,

        /// Step rule
        #[arg(short, long, value_enum, default_value = "standard")]
        method: Method,

        /// Initial step size for the gradient rules
        #[arg(short, long, default_value = "0.1")]
        step: f64,

        /// Print the smoothed angles
        #[arg(long)]
        values: bool,

        /// Print the energies of every gradient step
        #[arg(short, long)]
        verbose: bool,
    },

    /// Smooth the same synthetic curve with every step rule
    Compare {
        #[command(flatten)]
        curve: CurveArgs,

        /// Initial step size for the gradient rules
        #[arg(short, long, default_value = "0.1")]
        step: f64,
    },
}

#[derive(Args, Clone)]
struct CurveArgs {
    /// Number of samples
    #[arg(short = 'n', long, default_value = "64")]
    points: usize,

    /// Sample an open half-circle instead of a closed circle
    #[arg(long)]
    open: bool,

    /// Amplitude of the angular perturbation, in radians
    #[arg(long, default_value = "0.1")]
    noise: f64,

    /// Half-width of each admissible range around the perturbed angle
    #[arg(long, default_value = "0.25")]
    tolerance: f64,

    /// Maximum number of steps
    #[arg(short, long, default_value = "10000")]
    iterations: usize,

    /// Stop once the convergence measure falls below this value
    #[arg(short, long, default_value = "1e-8")]
    threshold: f64,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Method {
    /// Damped move half-way toward the neighbor midpoint
    Standard,
    /// In-place move to the neighbor midpoint
    Relaxation,
    /// Fixed-step gradient descent
    Gradient,
    /// Gradient descent with adaptive step
    Adaptive,
}

impl Method {
    const ALL: [Method; 4] = [
        Method::Standard,
        Method::Relaxation,
        Method::Gradient,
        Method::Adaptive,
    ];

    fn rule(self, step: f64, observer: Option<StepObserver>) -> Box<dyn StepRule> {
        match self {
            Method::Standard => Box::new(Standard),
            Method::Relaxation => Box::new(Relaxation),
            Method::Gradient => {
                let rule = GradientDescent::new(step);
                Box::new(match observer {
                    Some(observer) => rule.with_observer(observer),
                    None => rule,
                })
            }
            Method::Adaptive => {
                let rule = AdaptiveGradientDescent::new(step);
                Box::new(match observer {
                    Some(observer) => rule.with_observer(observer),
                    None => rule,
                })
            }
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Smooth {
            curve,
            method,
            step,
            values,
            verbose,
        } => cmd_smooth(&curve, method, step, values, verbose),
        Commands::Compare { curve, step } => cmd_compare(&curve, step),
    }
}

/// Ideal tangent angle of sample `i`, and the spacing to the next sample.
fn ideal_sample(curve: &CurveArgs, i: usize) -> (f64, f64) {
    let n = curve.points as f64;
    // the open arc spans half a turn, the closed curve a full one
    let sweep = if curve.open { PI } else { 2.0 * PI };
    let segments = if curve.open { n - 1.0 } else { n };
    let t = sweep * i as f64 / segments;
    let chord = 2.0 * (sweep / segments / 2.0).sin();
    (angle::cast(t + PI / 2.0), chord)
}

fn build_sequence(curve: &CurveArgs) -> Result<AngleSequence, SmoothError> {
    if curve.tolerance < 0.0 {
        return Err(SmoothError::invalid_param(
            "tolerance",
            curve.tolerance,
            "must be non-negative",
        ));
    }
    let mut seq = AngleSequence::new();
    seq.init(curve.points);
    seq.set_open(curve.open);
    for i in 0..curve.points {
        let (ideal, distance) = ideal_sample(curve, i);
        let perturbed = ideal + curve.noise * (i as f64 * 2.399).sin();
        seq.set_point(i, PointState::new(perturbed, distance).with_tolerance(curve.tolerance))?;
    }
    seq.validate()?;
    Ok(seq)
}

/// Largest angular distance between the smoothed and the ideal angles.
fn max_error(curve: &CurveArgs, seq: &AngleSequence) -> f64 {
    seq.values()
        .enumerate()
        .map(|(i, v)| angle::deviation(v, ideal_sample(curve, i).0).abs())
        .fold(0.0, f64::max)
}

fn converge_options(curve: &CurveArgs) -> ConvergeOptions {
    ConvergeOptions::default()
        .with_max_iterations(curve.iterations)
        .with_tolerance(curve.threshold)
}

/// Progress shown as a single rewritten status line on stderr.
fn create_progress() -> Progress {
    Progress::new(|iteration, budget, delta| {
        if iteration % 100 != 0 && iteration != budget {
            return;
        }
        eprint!("\r[{:>6}/{}] delta={:.3e}", iteration, budget, delta);
        let _ = std::io::stderr().flush();
    })
}

fn cmd_smooth(
    curve: &CurveArgs,
    method: Method,
    step: f64,
    print_values: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let seq = build_sequence(curve)?;
    let topology = if curve.open { "open" } else { "closed" };
    println!("Curve: {} samples ({})", seq.size(), topology);
    println!("Energy before: {:.6e}", seq.energy(0, 0));
    println!("Max angular error before: {:.6}", max_error(curve, &seq));

    let observer = verbose.then(|| {
        StepObserver::new(|r| {
            eprintln!("E1={:.6e} E2={:.6e} s={}", r.energy_before, r.energy_after, r.step)
        })
    });
    let mut minimizer = AngleMinimizer::with_sequence(method.rule(step, observer), seq);
    println!("Applying {}...", minimizer);

    let progress = if verbose { Progress::none() } else { create_progress() };
    let start = Instant::now();
    let report = minimize_until_converged(&mut minimizer, &converge_options(curve), &progress)?;
    let elapsed = start.elapsed();
    if !verbose {
        eprintln!();
    }

    let status = if report.converged { "converged" } else { "budget exhausted" };
    println!(
        "Result: {} after {} iterations ({:.2?}), last delta {:.3e}",
        status, report.iterations, elapsed, report.last_delta
    );
    println!("Energy after: {:.6e}", minimizer.sequence().energy(0, 0));
    println!("Max angular error after: {:.6}", max_error(curve, minimizer.sequence()));

    if print_values {
        for (i, v) in minimizer.values().enumerate() {
            println!("{:>5} {:>12.8}", i, v);
        }
    }

    Ok(())
}

fn cmd_compare(curve: &CurveArgs, step: f64) -> Result<(), Box<dyn std::error::Error>> {
    let seq = build_sequence(curve)?;
    println!(
        "Curve: {} samples, energy {:.6e}, max error {:.6}",
        seq.size(),
        seq.energy(0, 0),
        max_error(curve, &seq)
    );
    println!();
    println!(
        "{:<62} {:>10} {:>12} {:>12} {:>10}",
        "rule", "iterations", "energy", "max error", "time"
    );

    for method in Method::ALL {
        let mut minimizer = AngleMinimizer::with_sequence(method.rule(step, None), seq.clone());
        let name = minimizer.describe();
        let start = Instant::now();
        let report =
            minimize_until_converged(&mut minimizer, &converge_options(curve), &Progress::none())?;
        let elapsed = start.elapsed();
        let marker = if report.converged { "" } else { "*" };
        println!(
            "{:<62} {:>9}{} {:>12.6e} {:>12.6} {:>10.2?}",
            name,
            report.iterations,
            marker,
            minimizer.sequence().energy(0, 0),
            max_error(curve, minimizer.sequence()),
            elapsed
        );
    }
    println!();
    println!("* iteration budget exhausted before convergence");

    Ok(())
}
