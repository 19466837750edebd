use glimmer::ipc;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Removes the Unix socket file on process exit.
#[cfg(unix)]
fn install_socket_cleanup() {
    let socket = ipc::socket_path();
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = std::fs::remove_file(&socket);
        std::process::exit(0);
    }) {
        log::warn!("Failed to install signal handler: {}", e);
    }
}

fn print_help() {
    println!(
        "glimmer {}
An animated gradient loading bar overlaid on the key window,
shaped around the MacBook notch

USAGE:
    glimmer [OPTIONS]

OPTIONS:
    -h, --help       Print this help message
    -v, --version    Print version information

ENVIRONMENT:
    RUST_LOG         Set log level (error, warn, info, debug, trace)

CONFIG:
    ~/.config/glimmer/config.toml

EXAMPLES:
    glimmer                     Run with default config
    glimmer-msg show            Fade the bar in
    RUST_LOG=debug glimmer      Run with debug logging

For more information, see: https://github.com/project-glimmer/glimmer",
        VERSION
    );
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if !args.is_empty() {
        match args[0].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-v" | "--version" => {
                println!("glimmer {}", VERSION);
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[0]);
                eprintln!("Try 'glimmer --help' for more information.");
                std::process::exit(1);
            }
        }
    }

    // Initialize logging (flush each line for interactive debugging).
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    logger
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{} {:>5} {}] {}",
                chrono::Utc::now().to_rfc3339(),
                record.level(),
                record.target(),
                record.args()
            )?;
            buf.flush()
        })
        .init();

    log::info!("Starting Glimmer v{}", VERSION);

    #[cfg(unix)]
    {
        if let Err(err) = ipc::start_ipc_listener(&ipc::socket_path()) {
            log::warn!("Failed to start IPC listener: {}", err);
        }
        install_socket_cleanup();
    }

    #[cfg(target_os = "macos")]
    {
        let mtm = objc2::MainThreadMarker::new().expect("must run on the main thread");
        let app = glimmer::app::App::new(mtm);
        app.run(mtm);
    }

    #[cfg(not(target_os = "macos"))]
    {
        log::error!("The overlay requires macOS; exiting.");
        eprintln!("glimmer: the overlay bar only runs on macOS.");
        std::process::exit(1);
    }
}
