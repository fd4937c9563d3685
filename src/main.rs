//! Entry point for the **xmodes** CLI.
//!
//! The binary is the presentation layer: it renders the catalog the core
//! produces and forwards a `(output, mode id)` selection into
//! [`switch::activate`].  Everything X11-specific stays behind the
//! [`DisplayServer`](xmodes::traits::DisplayServer) trait.
//!
//! ```text
//! xmodes list [--json]        list modes per connected output
//! xmodes set <output> <mode>  switch an output to a mode (XID, 0x.. or decimal)
//! ```

use log::error;
use std::process::ExitCode;
use xmodes::catalog::{self, OutputModes};
use xmodes::snapshot::ModeId;
use xmodes::switch;
use xmodes::traits::DisplayServer;
use xmodes::xrandr::XrandrServer;

fn usage() -> ExitCode {
    eprintln!("usage: xmodes list [--json]");
    eprintln!("       xmodes set <output> <mode-id>");
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    // Connecting is the one fatal precondition; every later failure either
    // degrades the listing or is reported as a failed action.
    let server = match XrandrServer::connect() {
        Ok(server) => server,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match args.first().map(String::as_str) {
        None | Some("list") => {
            let json = args.iter().any(|a| a == "--json");
            run_list(&server, json)
        }
        Some("set") => match (args.get(1), args.get(2)) {
            (Some(output), Some(mode)) => run_set(&server, output, mode),
            _ => usage(),
        },
        Some(_) => usage(),
    }
}

//  list

fn run_list(server: &XrandrServer, json: bool) -> ExitCode {
    let catalog = match catalog::build_catalog(server) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("failed to query outputs: {e}");
            return ExitCode::FAILURE;
        }
    };

    if json {
        match serde_json::to_string_pretty(&catalog) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                error!("json encoding failed: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        for entry in &catalog {
            print_output(entry);
        }
    }
    ExitCode::SUCCESS
}

fn print_output(entry: &OutputModes) {
    println!("{}", entry.title());
    println!(
        "  {:>10}  {:9}  {:16}  {:>8}  {:>10}",
        "XID", "Preferred", "Mode", "Refresh", "Pixclock"
    );
    for row in &entry.rows {
        println!(
            "  {:>10}  {:9}  {:16}  {:>8}  {:>10}",
            row.mode_text,
            if row.preferred { "*" } else { "" },
            row.name,
            row.refresh,
            row.pixel_clock
        );
    }
    println!();
}

//  set

fn run_set(server: &XrandrServer, output_name: &str, mode_arg: &str) -> ExitCode {
    let Some(mode) = parse_mode_id(mode_arg) else {
        eprintln!("invalid mode id: {mode_arg}");
        return ExitCode::FAILURE;
    };

    // Resolve the port name against a fresh snapshot.
    let snapshot = match server.snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("failed to query outputs: {e}");
            return ExitCode::FAILURE;
        }
    };
    let Some(output) = snapshot.outputs.iter().find(|o| o.name == output_name) else {
        eprintln!("no such output: {output_name}");
        return ExitCode::FAILURE;
    };

    match switch::activate(server, output.id, mode) {
        Ok(()) => {
            println!("{output_name} switched to mode {mode:#x}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            // A server rejection is an answer, not a crash.
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Parse a mode XID, accepting the `0x…` form the listing prints as well as
/// plain decimal.
fn parse_mode_id(arg: &str) -> Option<ModeId> {
    if let Some(hex) = arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        ModeId::from_str_radix(hex, 16).ok()
    } else {
        arg.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mode_id_accepts_hex_and_decimal() {
        assert_eq!(parse_mode_id("0x47"), Some(0x47));
        assert_eq!(parse_mode_id("0X47"), Some(0x47));
        assert_eq!(parse_mode_id("71"), Some(71));
        assert_eq!(parse_mode_id("banana"), None);
        assert_eq!(parse_mode_id("0x"), None);
    }
}
