use std::fs::File;
use std::path::Path;

use clap::Parser;

use agner::{RunConfig, RunReport, ServerProfile, SimError, Simulation};

#[derive(Parser, Debug)]
#[clap(about, long_about = None)]
struct Args {
    /// Scenario JSON file (a full RunConfig); overrides the flags below.
    #[clap(long)]
    scenario: Option<String>,

    /// Simulated time after which no new arrivals are scheduled.
    #[clap(long, default_value = "100.0")]
    horizon: f64,

    /// Rate of the exponential inter-arrival distribution.
    #[clap(long, default_value = "1.0")]
    arrival_rate: f64,

    /// Comma-separated routing probabilities, one per server, summing to 1.
    #[clap(long, value_delimiter = ',', default_value = "1.0")]
    routing: Vec<f64>,

    /// Comma-separated backlog capacities, one per server.
    #[clap(long, value_delimiter = ',', default_value = "16")]
    capacities: Vec<usize>,

    /// Comma-separated service rates, one per server.
    #[clap(long, value_delimiter = ',', default_value = "1.0")]
    service_rates: Vec<f64>,

    /// Random seed.
    #[clap(long, default_value = "123")]
    seed: u64,

    /// Emit the report as JSON instead of the labeled block.
    #[clap(long)]
    json: bool,
}

fn build_config(args: &Args) -> Result<RunConfig, SimError> {
    if let Some(path) = &args.scenario {
        let file = File::open(Path::new(path))
            .map_err(|e| SimError::InvalidScenario(format!("{}: {}", path, e)))?;
        return serde_json::from_reader(file)
            .map_err(|e| SimError::InvalidScenario(format!("{}: {}", path, e)));
    }

    if args.capacities.len() != args.service_rates.len() {
        return Err(SimError::InvalidScenario(format!(
            "--capacities has {} entries but --service-rates has {}",
            args.capacities.len(),
            args.service_rates.len()
        )));
    }

    Ok(RunConfig {
        horizon: args.horizon,
        arrival_rate: args.arrival_rate,
        routing: args.routing.clone(),
        servers: args
            .capacities
            .iter()
            .zip(&args.service_rates)
            .map(|(&capacity, &service_rate)| ServerProfile { capacity, service_rate })
            .collect(),
        seed: args.seed,
    })
}

fn print_report(report: &RunReport) {
    println!("serviced          {}", report.serviced);
    println!("dropped           {}", report.dropped);
    println!("last departure    {:.4}", report.last_departure_time);
    println!("avg waiting time  {:.4}", report.avg_waiting_time);
    println!("avg service time  {:.4}", report.avg_service_time);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;

    let mut sim = Simulation::new(&config)?;
    tracing::info!(
        servers = config.servers.len(),
        horizon = config.horizon,
        seed = config.seed,
        "starting run"
    );
    let report = sim.run();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            scenario: None,
            horizon: 10.0,
            arrival_rate: 1.0,
            routing: vec![0.5, 0.5],
            capacities: vec![2, 4],
            service_rates: vec![1.0, 2.0],
            seed: 1,
            json: false,
        }
    }

    #[test]
    fn test_flags_build_a_config() {
        let config = build_config(&base_args()).unwrap();
        assert_eq!(config.servers.len(), 2);
        assert_eq!(config.servers[1].capacity, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mismatched_server_lists_rejected() {
        let mut args = base_args();
        args.capacities = vec![2];
        assert!(matches!(
            build_config(&args),
            Err(SimError::InvalidScenario(_))
        ));
    }

    #[test]
    fn test_missing_scenario_file_rejected() {
        let mut args = base_args();
        args.scenario = Some("/nonexistent/scenario.json".into());
        assert!(matches!(
            build_config(&args),
            Err(SimError::InvalidScenario(_))
        ));
    }
}
