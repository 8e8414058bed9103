use anyhow::{Context, Result};
use clap::Parser;
use hubfinder_lib::finder::ProximityFinder;
use hubfinder_lib::models::RankedHub;
use hubfinder_lib::search::{CloudantClient, PaginatedFetcher};
use hubfinder_lib::utils::cancel::CancellationSignal;
use hubfinder_lib::utils::config::SearchConfig;
use hubfinder_lib::utils::constants::{
    MAX_LATITUDE, MAX_LONGITUDE, MAX_RADIUS_KM, MIN_LATITUDE, MIN_LONGITUDE,
};
use hubfinder_lib::utils::env::load_env;
use hubfinder_lib::utils::input::{parse_and_validate_float, read_float_until_valid};
use hubfinder_lib::utils::progress::ProgressConfig;
use log::{info, warn};
use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};
use tabled::{settings::Style, Table, Tabled};

const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Find transport hubs within a radius of a point.
///
/// Any value not given on the command line is asked for interactively.
#[derive(Parser, Debug)]
#[command(name = "hubfinder", version, about)]
struct Args {
    /// Latitude of the search center in degrees [-90, 90]
    #[arg(long, allow_hyphen_values = true, value_parser = latitude_arg)]
    lat: Option<f64>,

    /// Longitude of the search center in degrees [-180, 180]
    #[arg(long, allow_hyphen_values = true, value_parser = longitude_arg)]
    lon: Option<f64>,

    /// Search radius in kilometers [0, 40075]
    #[arg(long, value_parser = radius_arg)]
    radius: Option<f64>,

    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn latitude_arg(raw: &str) -> Result<f64, String> {
    parse_and_validate_float(raw, MIN_LATITUDE, MAX_LATITUDE).map_err(|e| e.to_string())
}

fn longitude_arg(raw: &str) -> Result<f64, String> {
    parse_and_validate_float(raw, MIN_LONGITUDE, MAX_LONGITUDE).map_err(|e| e.to_string())
}

fn radius_arg(raw: &str) -> Result<f64, String> {
    parse_and_validate_float(raw, 0.0, MAX_RADIUS_KM).map_err(|e| e.to_string())
}

#[derive(Tabled)]
struct HubRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Distance (km)")]
    distance: String,
    #[tabled(rename = "Latitude")]
    latitude: String,
    #[tabled(rename = "Longitude")]
    longitude: String,
}

impl From<&RankedHub> for HubRow {
    fn from(ranked: &RankedHub) -> Self {
        Self {
            name: ranked.hub.name.clone(),
            distance: format!("{:.2}", ranked.distance_km),
            latitude: format!("{:.6}", ranked.hub.location.latitude),
            longitude: format!("{:.6}", ranked.hub.location.longitude),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    load_env();
    let args = Args::parse();

    let config = SearchConfig::from_env();
    config.validate().context("Invalid search configuration")?;
    config.log_config();
    let progress_config = ProgressConfig::from_env();

    let client = CloudantClient::new(&config).context("Failed to create search client")?;
    let fetcher = PaginatedFetcher::new(client)
        .with_page_size(config.page_size)
        .with_retries(config.max_retries, RETRY_DELAY);
    let finder = ProximityFinder::new(fetcher);

    let (latitude, longitude, radius_km) = {
        let stdin = io::stdin();
        let stdout = io::stdout();
        read_search_input(&args, &mut stdin.lock(), &mut stdout.lock())?
    };

    let cancel = match config.deadline {
        Some(deadline) => CancellationSignal::with_timeout(deadline),
        None => CancellationSignal::new(),
    };
    let ctrl_c_handle = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling search");
            ctrl_c_handle.cancel();
        }
    });

    info!(
        "Searching for hubs within {} km of ({}, {})",
        radius_km, latitude, longitude
    );
    let spinner = progress_config.create_spinner("Searching for transport hubs...");
    let start = Instant::now();

    let result = finder
        .find_nearby(latitude, longitude, radius_km, &cancel)
        .await;
    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }
    let hubs = result.context("Failed to find nearby hubs")?;
    info!("Search finished in {:.2?}", start.elapsed());

    if args.json {
        let json = serde_json::to_string_pretty(&hubs).context("Failed to serialize results")?;
        println!("{}", json);
    } else {
        print_table(&hubs);
    }
    Ok(())
}

const INTRO: &str = "This program finds transport hubs within a specified radius from a given point.";

/// Latitude, longitude and radius from the command line, prompting for any
/// that are missing.
fn read_search_input<R: BufRead, W: Write>(
    args: &Args,
    reader: &mut R,
    writer: &mut W,
) -> Result<(f64, f64, f64)> {
    if args.lat.is_none() || args.lon.is_none() || args.radius.is_none() {
        writeln!(writer, "{}", INTRO)?;
    }
    Ok((
        value_or_prompt(args.lat, reader, writer, "latitude", MIN_LATITUDE, MAX_LATITUDE)?,
        value_or_prompt(args.lon, reader, writer, "longitude", MIN_LONGITUDE, MAX_LONGITUDE)?,
        value_or_prompt(args.radius, reader, writer, "radius in km", 0.0, MAX_RADIUS_KM)?,
    ))
}

fn value_or_prompt<R: BufRead, W: Write>(
    given: Option<f64>,
    reader: &mut R,
    writer: &mut W,
    name: &str,
    min: f64,
    max: f64,
) -> Result<f64> {
    match given {
        Some(value) => Ok(value),
        None => read_float_until_valid(reader, writer, name, min, max),
    }
}

fn print_table(hubs: &[RankedHub]) {
    println!("Found {} transport hub(s):", hubs.len());
    if hubs.is_empty() {
        return;
    }
    let rows: Vec<HubRow> = hubs.iter().map(HubRow::from).collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn args(cli: &[&str]) -> Args {
        Args::parse_from(std::iter::once("hubfinder").chain(cli.iter().copied()))
    }

    #[test]
    fn test_intro_printed_before_prompting() {
        let mut input = Cursor::new("51.47\n-0.4543\n25\n");
        let mut output = Vec::new();
        let values = read_search_input(&args(&[]), &mut input, &mut output).unwrap();

        assert_eq!(values, (51.47, -0.4543, 25.0));
        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with(INTRO), "{}", output);
        assert!(output.contains("Please enter the latitude: "));
        assert!(output.contains("Please enter the radius in km: "));
    }

    #[test]
    fn test_intro_printed_when_one_value_missing() {
        let mut input = Cursor::new("100\n");
        let mut output = Vec::new();
        let values =
            read_search_input(&args(&["--lat", "-33.9", "--lon", "151.2"]), &mut input, &mut output)
                .unwrap();

        assert_eq!(values, (-33.9, 151.2, 100.0));
        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with(INTRO));
        assert!(!output.contains("latitude"));
    }

    #[test]
    fn test_no_output_when_all_values_given() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        let values = read_search_input(
            &args(&["--lat", "40.7128", "--lon", "-74.006", "--radius", "50"]),
            &mut input,
            &mut output,
        )
        .unwrap();

        assert_eq!(values, (40.7128, -74.006, 50.0));
        assert!(output.is_empty());
    }

    #[test]
    fn test_out_of_range_argument_rejected() {
        let result = Args::try_parse_from(["hubfinder", "--lat", "95"]);
        assert!(result.is_err());
    }
}
