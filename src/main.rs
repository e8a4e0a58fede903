use clap::{Parser, Subcommand};
use fleetrent::application::Services;
use fleetrent::domain::client::ClientId;
use fleetrent::domain::clock::SystemClock;
use fleetrent::domain::rental::RentalId;
use fleetrent::domain::vehicle::VehicleId;
use fleetrent::infrastructure::Backend;
use fleetrent::interfaces::csv::vehicle_reader::VehicleReader;
use fleetrent::interfaces::csv::vehicle_writer::VehicleWriter;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEMO_CLIENT_NAME: &str = "Demo Client";
const DEMO_CLIENT_EMAIL: &str = "demo.client@example.com";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the SQLite database. In-memory storage is used when omitted.
    #[arg(long, global = true, env = "FLEETRENT_DB")]
    db_path: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the tables if they do not exist yet
    Init,
    /// Add a vehicle to the fleet
    AddVehicle {
        model: String,
        #[arg(long)]
        hourly_rate: Decimal,
        #[arg(long)]
        per_km_rate: Decimal,
    },
    /// Add vehicles from a CSV file with a model,hourly_rate,per_km_rate header
    ImportVehicles { input: PathBuf },
    /// Print the fleet as CSV
    ListVehicles,
    /// Register a client
    AddClient { name: String, email: String },
    /// Open a rental for a client and a vehicle
    StartRental {
        #[arg(long)]
        client: i64,
        #[arg(long)]
        vehicle: i64,
    },
    /// Close a rental and print the amount due
    EndRental {
        #[arg(long)]
        rental: i64,
        #[arg(long)]
        km: Decimal,
    },
    /// Show a single rental
    ShowRental { rental: i64 },
    /// Seed a vehicle and a client, then run one rental from start to end
    Demo,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("fleetrent=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fleetrent=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let backend = Backend::open(cli.db_path.as_deref())
        .await
        .into_diagnostic()?;
    let services = backend.into_services(Box::new(SystemClock));

    // Idempotent; runs before every command.
    services.schema.initialize().await.into_diagnostic()?;

    match cli.command {
        Command::Init => println!("Schema ready"),
        Command::AddVehicle {
            model,
            hourly_rate,
            per_km_rate,
        } => {
            let id = services
                .fleet
                .add_vehicle(&model, hourly_rate, per_km_rate)
                .await
                .into_diagnostic()?;
            println!("Added vehicle {id}");
        }
        Command::ImportVehicles { input } => {
            let file = File::open(input).into_diagnostic()?;
            let records = VehicleReader::new(file).vehicles();
            let summary = services
                .fleet
                .import_vehicles(records)
                .await
                .into_diagnostic()?;
            for (position, error) in &summary.rejected {
                eprintln!("Error reading vehicle record {position}: {error}");
            }
            println!(
                "Imported {} vehicles, rejected {}",
                summary.imported.len(),
                summary.rejected.len()
            );
        }
        Command::ListVehicles => {
            let vehicles = services.fleet.list_vehicles().await.into_diagnostic()?;
            let stdout = io::stdout();
            VehicleWriter::new(stdout.lock())
                .write_vehicles(vehicles)
                .into_diagnostic()?;
        }
        Command::AddClient { name, email } => {
            let id = services
                .clients
                .register_client(&name, &email)
                .await
                .into_diagnostic()?;
            println!("Added client {id}");
        }
        Command::StartRental { client, vehicle } => {
            let id = services
                .rentals
                .start_rental(ClientId(client), VehicleId(vehicle))
                .await
                .into_diagnostic()?;
            println!("Rental {id} started");
        }
        Command::EndRental { rental, km } => {
            end_rental(&services, RentalId(rental), km).await?;
        }
        Command::ShowRental { rental } => {
            let rental = services
                .rentals
                .rental(RentalId(rental))
                .await
                .into_diagnostic()?;
            println!(
                "ID: {}, Client: {}, Vehicle: {}, Status: {:?}, Start: {}",
                rental.id,
                rental.client_id,
                rental.vehicle_id,
                rental.status(),
                rental.started_at.to_rfc3339()
            );
            if let (Some(ended_at), Some(distance), Some(total)) =
                (rental.ended_at, rental.distance, rental.total_amount)
            {
                println!(
                    "End: {}, Kilometers: {}, Total amount: €{total}",
                    ended_at.to_rfc3339(),
                    distance.km().normalize()
                );
            }
        }
        Command::Demo => demo(&services).await?,
    }

    Ok(())
}

async fn end_rental(services: &Services, rental: RentalId, km: Decimal) -> Result<()> {
    let total = services
        .rentals
        .end_rental(rental, km)
        .await
        .into_diagnostic()?;
    println!("Rental {rental} ended. Total amount: €{total}");
    Ok(())
}

async fn demo(services: &Services) -> Result<()> {
    println!("Car rental platform initialized");

    let vehicle = services
        .fleet
        .add_vehicle("Model 3", dec!(50), dec!(0.8))
        .await
        .into_diagnostic()?;

    println!("Available vehicles:");
    for v in services.fleet.list_vehicles().await.into_diagnostic()? {
        println!(
            "ID: {}, Model: {}, Hourly Rate: {}, Per Km Rate: {}",
            v.id, v.model, v.hourly_rate, v.per_km_rate
        );
    }

    let existing = services.clients.list_clients().await.into_diagnostic()?;
    let client = match existing.iter().find(|c| c.email == DEMO_CLIENT_EMAIL) {
        Some(client) => client.id,
        None => services
            .clients
            .register_client(DEMO_CLIENT_NAME, DEMO_CLIENT_EMAIL)
            .await
            .into_diagnostic()?,
    };

    let rental = services
        .rentals
        .start_rental(client, vehicle)
        .await
        .into_diagnostic()?;
    end_rental(services, rental, dec!(150)).await
}
