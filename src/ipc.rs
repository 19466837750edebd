//! IPC command types, global command bus, and Unix socket listener.
//!
//! Commands are parsed from the socket, pushed onto an async channel, and
//! drained by the app loop on each tick. Replies are single lines; `status`
//! replies JSON.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use async_channel::{Receiver, Sender};

/// A command destined for the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarCommand {
    /// Fade the bar in.
    Show,
    /// Fade the bar out.
    Hide,
    /// Flip between shown and hidden.
    Toggle,
    /// Reload configuration from disk.
    Reload,
}

struct CommandBus {
    tx: Sender<BarCommand>,
    rx: Receiver<BarCommand>,
}

static COMMAND_BUS: OnceLock<CommandBus> = OnceLock::new();

fn command_bus() -> &'static CommandBus {
    COMMAND_BUS.get_or_init(|| {
        let (tx, rx) = async_channel::unbounded();
        CommandBus { tx, rx }
    })
}

/// Returns a receiver for the app loop's drain.
pub fn subscribe_commands() -> Receiver<BarCommand> {
    command_bus().rx.clone()
}

fn push_command(cmd: BarCommand) {
    let _ = command_bus().tx.try_send(cmd);
}

/// Last visibility target published by the app loop, read by `status`.
static BAR_VISIBLE: AtomicBool = AtomicBool::new(false);

pub fn set_visible_flag(visible: bool) {
    BAR_VISIBLE.store(visible, Ordering::SeqCst);
}

fn visible_flag() -> bool {
    BAR_VISIBLE.load(Ordering::SeqCst)
}

pub fn socket_path() -> PathBuf {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(runtime_dir).join("glimmer.sock")
}

/// Parses and dispatches a single command string, returning a response.
pub fn handle_ipc_command(command: &str) -> String {
    let verb = command.trim();

    match verb {
        "" => "ERR: empty command".to_string(),
        "show" => {
            push_command(BarCommand::Show);
            "OK".to_string()
        }
        "hide" => {
            push_command(BarCommand::Hide);
            "OK".to_string()
        }
        "toggle" => {
            push_command(BarCommand::Toggle);
            "OK".to_string()
        }
        "reload" => {
            push_command(BarCommand::Reload);
            "OK: reload requested".to_string()
        }
        "status" => {
            let status = serde_json::json!({
                "version": env!("CARGO_PKG_VERSION"),
                "running": true,
                "visible": visible_flag(),
            });
            status.to_string()
        }
        other => format!("ERR: unknown command '{}'", other),
    }
}

/// Starts the IPC listener on a Unix socket, spawning a background thread.
#[cfg(unix)]
pub fn start_ipc_listener(socket_path: &std::path::Path) -> std::io::Result<()> {
    use std::io::{BufRead, BufReader, Write};
    use std::os::unix::net::{UnixListener, UnixStream};

    if let Some(parent) = socket_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let listener = match UnixListener::bind(socket_path) {
        Ok(listener) => listener,
        Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
            if UnixStream::connect(socket_path).is_ok() {
                eprintln!("Glimmer is already running.");
                std::process::exit(0);
            }
            let _ = std::fs::remove_file(socket_path);
            UnixListener::bind(socket_path)?
        }
        Err(err) => return Err(err),
    };

    std::thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let mut reader = BufReader::new(stream);
            let mut line = String::new();
            let _ = reader.read_line(&mut line);
            let response = handle_ipc_command(&line);
            if let Ok(mut stream) = reader.into_inner().try_clone() {
                let _ = writeln!(stream, "{}", response);
            }
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // All bus-draining assertions live in this one test; the other tests only
    // exercise verbs that never push, so parallel runs cannot steal items.
    #[test]
    fn verbs_reach_the_command_bus_in_order() {
        let rx = subscribe_commands();

        assert_eq!(handle_ipc_command("show"), "OK");
        assert_eq!(handle_ipc_command("hide"), "OK");
        assert_eq!(handle_ipc_command("toggle"), "OK");
        assert!(handle_ipc_command("reload").starts_with("OK"));

        let mut drained = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            drained.push(cmd);
        }
        assert_eq!(
            drained,
            vec![
                BarCommand::Show,
                BarCommand::Hide,
                BarCommand::Toggle,
                BarCommand::Reload
            ]
        );
    }

    #[test]
    fn trailing_whitespace_is_ignored() {
        assert!(handle_ipc_command("status\n").starts_with('{'));
    }

    #[test]
    fn unknown_command_is_an_error() {
        let resp = handle_ipc_command("dance");
        assert!(resp.starts_with("ERR:"));
        assert!(resp.contains("dance"));
    }

    #[test]
    fn empty_command_is_an_error() {
        assert!(handle_ipc_command("   ").starts_with("ERR:"));
    }

    #[test]
    fn status_returns_json_with_expected_keys() {
        let resp = handle_ipc_command("status");
        let parsed: serde_json::Value = serde_json::from_str(&resp).unwrap();
        assert_eq!(parsed["running"], true);
        assert!(parsed["version"].is_string());
        assert!(parsed["visible"].is_boolean());
    }

    #[test]
    fn visible_flag_round_trips() {
        set_visible_flag(true);
        let resp = handle_ipc_command("status");
        let parsed: serde_json::Value = serde_json::from_str(&resp).unwrap();
        assert_eq!(parsed["visible"], true);
        set_visible_flag(false);
    }

    #[test]
    fn socket_path_is_under_runtime_dir() {
        let path = socket_path();
        assert_eq!(path.file_name().unwrap(), "glimmer.sock");
    }
}
