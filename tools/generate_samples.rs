//! Sample input generator.
//!
//! Writes one small upload file per domain into ./samples for local
//! pipeline runs: a headered vessel CSV, a headerless whitespace
//! turbofan log, and a headered inventory CSV with the original
//! source column names.

use rand::Rng;
use std::fs::{self, File};
use std::io::{BufWriter, Write};

fn main() -> std::io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let rows: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(50);

    fs::create_dir_all("samples")?;
    write_vessel(rows)?;
    write_turbofan(rows)?;
    write_inventory(rows)?;

    println!("wrote {rows} rows per domain into ./samples");
    Ok(())
}

fn write_vessel(rows: usize) -> std::io::Result<()> {
    let mut rng = rand::thread_rng();
    let mut out = BufWriter::new(File::create("samples/vessel.csv")?);
    writeln!(
        out,
        "MMSI,BaseDateTime,SOG,SOG_1h,SOG_2h,SOG_3h,Heading,COG,Draft,WindSpeed,WaveHeight,DistanceToBerth,VesselType"
    )?;

    let types = ["Cargo", "Tanker", "Container", "Bulk Carrier", "Passenger"];
    for _ in 0..rows {
        let speed: f64 = rng.gen_range(0.0..22.0);
        writeln!(
            out,
            "{},2024-06-{:02} {:02}:{:02}:00,{:.1},{:.1},{:.1},{:.1},{},{},{:.1},{:.1},{:.1},{:.1},{}",
            rng.gen_range(200_000_000u64..799_999_999),
            rng.gen_range(1..29),
            rng.gen_range(0..24),
            rng.gen_range(0..60),
            speed,
            speed + rng.gen_range(-2.0..2.0),
            speed + rng.gen_range(-3.0..3.0),
            speed + rng.gen_range(-3.0..3.0),
            rng.gen_range(0..360),
            rng.gen_range(0..360),
            rng.gen_range(4.0..16.0),
            rng.gen_range(0.0..35.0),
            rng.gen_range(0.0..4.5),
            rng.gen_range(0.1..40.0),
            types[rng.gen_range(0..types.len())],
        )?;
    }
    out.flush()
}

fn write_turbofan(rows: usize) -> std::io::Result<()> {
    let mut rng = rand::thread_rng();
    let mut out = BufWriter::new(File::create("samples/turbofan.txt")?);

    let units = (rows / 10).max(1);
    let mut written = 0;
    'outer: for unit in 1..=units {
        for cycle in 1.. {
            if written >= rows {
                break 'outer;
            }
            let mut line = format!(
                "{unit} {cycle} {:.4} {:.4} {:.1}",
                rng.gen_range(-0.01..0.01),
                rng.gen_range(-0.01..0.01),
                100.0
            );
            for _ in 0..21 {
                line.push_str(&format!(" {:.2}", rng.gen_range(500.0..1600.0)));
            }
            writeln!(out, "{line}")?;
            written += 1;
        }
    }
    out.flush()
}

fn write_inventory(rows: usize) -> std::io::Result<()> {
    let mut rng = rand::thread_rng();
    let mut out = BufWriter::new(File::create("samples/inventory.csv")?);
    writeln!(
        out,
        "Date,Store ID,Product ID,Category,Region,Inventory Level,Units Sold,Units Ordered,Demand Forecast,Price,Discount,Weather Condition,Holiday/Promotion,Competitor Pricing,Seasonality"
    )?;

    let categories = ["Electronics", "Fashion", "Home", "Toys", "Groceries"];
    let regions = ["North", "South", "East", "West", "Central"];
    let weather = ["Clear", "Cloudy", "Rainy"];
    let seasonality = ["Regular", "Festive", "Summer", "Winter"];
    for i in 0..rows {
        let price: f64 = rng.gen_range(5.0..300.0);
        writeln!(
            out,
            "2024-06-{:02},STR_{:03},P{:05},{},{},{},{},{},{:.1},{:.2},{:.2},{},{},{:.2},{}",
            rng.gen_range(1..29),
            rng.gen_range(1..20),
            i,
            categories[rng.gen_range(0..categories.len())],
            regions[rng.gen_range(0..regions.len())],
            rng.gen_range(0..1000),
            rng.gen_range(0..150),
            rng.gen_range(0..200),
            rng.gen_range(0.0..180.0),
            price,
            rng.gen_range(0.0..0.5),
            weather[rng.gen_range(0..weather.len())],
            if rng.gen_bool(0.2) { "Holiday" } else { "None" },
            price + rng.gen_range(-20.0..20.0),
            seasonality[rng.gen_range(0..seasonality.len())],
        )?;
    }
    out.flush()
}
