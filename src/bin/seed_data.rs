//! Seed data script - generates a synthetic inventory dataset
//!
//! Run with: cargo run --bin seed-data -- --count 25
//!
//! Produces the JSON array the API reads at startup. Purely offline; it
//! never touches the serving path.

use clap::Parser;
use tracing::info;

use casedesk_api::seeding;

#[derive(Parser, Debug)]
#[command(name = "seed-data", about = "Generate a synthetic inventory dataset")]
struct Args {
    /// Number of order records to generate
    #[arg(short = 'n', long, default_value_t = 25)]
    count: usize,

    /// Output path for the generated JSON array
    #[arg(short, long, default_value = "inventory_data.json")]
    output: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();

    let mut rng = rand::thread_rng();
    let records = seeding::generate(args.count, &mut rng);
    seeding::write_json(&args.output, &records)?;

    info!("Generated {} entries and saved to {}", records.len(), args.output);
    Ok(())
}
