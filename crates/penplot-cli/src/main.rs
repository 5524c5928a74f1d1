//! penplot - turn SVG drawings into pen plotter G-code
//!
//! Usage:
//!   penplot export <svg> [-c config.yaml] [-o out.gcode] [--calibration]
//!   penplot calibrate [-c config.yaml] -o out.gcode
//!   penplot stats <svg> [-c config.yaml] [--json]
//!   penplot help

use std::env;

use tracing_subscriber::EnvFilter;

mod cli;

use cli::{cmd_calibrate, cmd_export, cmd_stats, CliError};

fn print_usage(program: &str) {
    eprintln!("penplot - pen plotter G-code export");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {program} export <svg> [-c config.yaml] [-o out.gcode] [--calibration]");
    eprintln!("  {program} calibrate [-c config.yaml] -o out.gcode");
    eprintln!("  {program} stats <svg> [-c config.yaml] [--json]");
    eprintln!("  {program} help");
    eprintln!();
    eprintln!("Logging is controlled with RUST_LOG (default: info).");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("penplot", String::as_str);

    if args.len() < 2 {
        print_usage(program);
        std::process::exit(1);
    }

    init_tracing();

    let result: Result<(), CliError> = match args[1].as_str() {
        "export" => cmd_export(&args[2..]),
        "calibrate" => cmd_calibrate(&args[2..]),
        "stats" => cmd_stats(&args[2..]),
        "help" | "--help" | "-h" => {
            print_usage(program);
            Ok(())
        }
        other => Err(CliError::Usage(format!("unknown command: {other}"))),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        if matches!(e, CliError::Usage(_)) {
            eprintln!();
            print_usage(program);
        }
        std::process::exit(1);
    }
}
