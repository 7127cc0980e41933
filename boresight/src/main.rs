use std::{error::Error, path::PathBuf, time::Instant};

use boresight::{PlotOutcome, SimulationConfig, load_errors, run};
use boresight_plots::bitmap_plotter;
use boresight_result::create_file;
use clap::Parser;
use colored::Colorize;
use tracing::Level;

/// Run PID simulation on star-tracker errors
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// CSV file containing RA_error, DEC_error, and Roll_error columns
    #[arg(long, default_value = "attitude_errors_combined.csv")]
    input: PathBuf,

    /// CSV file to store the PID correction sequence
    #[arg(long, default_value = "pid_corrections.csv")]
    output: PathBuf,

    /// RON file with the simulation config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Proportional gain
    #[arg(long)]
    kp: Option<f64>,

    /// Integral gain
    #[arg(long)]
    ki: Option<f64>,

    /// Derivative gain
    #[arg(long)]
    kd: Option<f64>,

    /// Controller and attitude integration step
    #[arg(long)]
    dt: Option<f64>,

    /// Simulated days per step for orbit propagation
    #[arg(long)]
    step_days: Option<f64>,

    /// Spacecraft mass (kg)
    #[arg(long)]
    mass: Option<f64>,

    /// Spacecraft cube side length (m)
    #[arg(long)]
    side_length: Option<f64>,

    /// Orbital period (days)
    #[arg(long)]
    period_days: Option<f64>,

    /// Run the controllers only, without attitude and orbit propagation
    #[arg(long)]
    no_dynamics: bool,

    /// Image file for the correction plot
    #[arg(long, default_value = "pid_corrections.png")]
    plot: PathBuf,

    /// Skip plot generation
    #[arg(long)]
    no_plot: bool,

    /// Print the effective config as RON and exit
    #[arg(long)]
    print_config: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> Level {
        if self.quiet {
            return Level::WARN;
        }
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    fn simulation_config(&self) -> Result<SimulationConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_file(path)?,
            None => SimulationConfig::default(),
        };

        if let Some(kp) = self.kp {
            config.gains.kp = kp;
        }
        if let Some(ki) = self.ki {
            config.gains.ki = ki;
        }
        if let Some(kd) = self.kd {
            config.gains.kd = kd;
        }
        if let Some(dt) = self.dt {
            config.dt = dt;
        }
        if let Some(step_days) = self.step_days {
            config.step_days = step_days;
        }
        if self.no_dynamics {
            config.dynamics = None;
        } else if let Some(dynamics) = config.dynamics.as_mut() {
            if let Some(mass) = self.mass {
                dynamics.spacecraft.mass = mass;
            }
            if let Some(side_length) = self.side_length {
                dynamics.spacecraft.side_length = side_length;
            }
            if let Some(period_days) = self.period_days {
                dynamics.orbit.period_days = period_days;
            }
        } else if self.mass.is_some() || self.side_length.is_some() || self.period_days.is_some()
        {
            tracing::warn!("dynamics are disabled in the config; ignoring spacecraft and orbit flags");
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_target(false)
        .init();

    let config = cli.simulation_config()?;
    if cli.print_config {
        println!("{}", config.to_ron_string()?);
        return Ok(());
    }

    let start = Instant::now();
    let loaded = load_errors(&cli.input)?;

    let plotter = if cli.no_plot {
        None
    } else {
        bitmap_plotter(&cli.plot)
    };

    let output = create_file(&cli.output)?;
    let summary = run(&loaded.errors, &config, output, plotter.as_deref())?;

    println!(
        "{}",
        format!(
            "{} steps written to '{}' in {:.3} s",
            summary.steps,
            cli.output.display(),
            start.elapsed().as_secs_f64()
        )
        .green()
    );
    if loaded.skipped > 0 {
        println!(
            "{}",
            format!("{} malformed input rows skipped", loaded.skipped).yellow()
        );
    }
    if let Some(c) = summary.final_correction {
        println!(
            "final correction  RA {:.6}  DEC {:.6}  Roll {:.6}",
            c[0], c[1], c[2]
        );
    }
    if let Some(a) = summary.final_attitude {
        println!(
            "final attitude    RA {:.6}  DEC {:.6}  Roll {:.6}",
            a[0], a[1], a[2]
        );
    }
    if let Some(angle) = summary.final_orbit_angle {
        println!("final orbit angle {:.4} deg", angle);
    }
    match summary.plot {
        PlotOutcome::Rendered => println!("plot saved to '{}'", cli.plot.display()),
        PlotOutcome::Failed(e) => eprintln!("{}", format!("plot not saved: {}", e).red()),
        PlotOutcome::Unavailable => {}
    }

    Ok(())
}
