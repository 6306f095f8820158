//! Clipboard helper for the review step
//!
//! On Linux, clipboard contents vanish once the Clipboard object is
//! dropped, so the copy runs on a short-lived background thread that keeps
//! the contents alive for clipboard managers to grab.

use std::thread;
use std::time::Duration;

/// Copy the serialized configuration to the system clipboard, best-effort.
///
/// Failures are logged, never surfaced as errors: a missing clipboard must
/// not interrupt the wizard.
pub fn copy_text(text: String) {
    thread::spawn(move || match arboard::Clipboard::new() {
        Ok(mut clipboard) => {
            if let Err(e) = clipboard.set_text(&text) {
                tracing::warn!("Failed to copy to clipboard: {}", e);
                return;
            }
            #[cfg(target_os = "linux")]
            thread::sleep(Duration::from_secs(2));
        }
        Err(e) => {
            tracing::warn!("Failed to access clipboard: {}", e);
        }
    });
}
