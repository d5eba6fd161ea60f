//! Opening the UI in the user's default browser.

use std::process::{Command, ExitStatus, Stdio};
use std::thread::JoinHandle;

use tracing::{info, warn};

/// The platform command that opens `url` with the default handler.
fn opener_command(url: &str) -> Command {
    #[cfg(target_os = "windows")]
    {
        let mut cmd = Command::new("rundll32");
        cmd.args(["url.dll,FileProtocolHandler", url]);
        cmd
    }

    #[cfg(target_os = "macos")]
    {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    }
}

/// Launches the default browser on `url` without waiting for it.
///
/// Failure is logged and otherwise ignored: the server keeps running and the
/// user can open the address by hand.
pub fn open_browser(url: &str) {
    match spawn_reaped(opener_command(url)) {
        Ok(_) => info!("opened {url} in the default browser"),
        Err(e) => warn!("could not open a browser ({e}); open {url} manually"),
    }
}

/// Spawns `cmd` with null stdio and waits for it on a short-lived thread, so
/// the exited opener does not linger as a zombie.
fn spawn_reaped(mut cmd: Command) -> std::io::Result<JoinHandle<std::io::Result<ExitStatus>>> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(std::thread::spawn(move || child.wait()))
}
