//! Command-line tool to send commands to a running Glimmer instance

use std::env;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

#[cfg(unix)]
use std::os::unix::net::UnixStream;

fn socket_path() -> PathBuf {
    let runtime_dir = env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(runtime_dir).join("glimmer.sock")
}

fn print_usage() {
    eprintln!("Usage: glimmer-msg <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  show       Fade the loading bar in");
    eprintln!("  hide       Fade the loading bar out");
    eprintln!("  toggle     Flip between shown and hidden");
    eprintln!("  reload     Reload configuration");
    eprintln!("  status     Get bar status (JSON)");
}

#[cfg(unix)]
fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() {
        print_usage();
        std::process::exit(1);
    }

    let command = args.join(" ");
    let socket = socket_path();

    match UnixStream::connect(&socket) {
        Ok(mut stream) => {
            if let Err(e) = writeln!(stream, "{}", command) {
                eprintln!("Failed to send command: {}", e);
                std::process::exit(1);
            }

            let mut reader = BufReader::new(stream);
            let mut response = String::new();
            if let Err(e) = reader.read_line(&mut response) {
                eprintln!("Failed to read response: {}", e);
                std::process::exit(1);
            }

            println!("{}", response.trim());
        }
        Err(e) => {
            eprintln!("Failed to connect to Glimmer at {:?}: {}", socket, e);
            eprintln!("Is Glimmer running?");
            std::process::exit(1);
        }
    }
}

#[cfg(not(unix))]
fn main() {
    print_usage();
    eprintln!("glimmer-msg requires a Unix socket and only runs on Unix platforms.");
    std::process::exit(1);
}
