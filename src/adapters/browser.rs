use crate::ports::{Browser, BrowserError};
use std::io::Write;

/// Prints URLs instead of launching a browser.
#[derive(Debug, Default)]
pub struct ConsoleBrowser;

impl Browser for ConsoleBrowser {
    fn open_url(&self, url: &str) -> Result<(), BrowserError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{url}").map_err(|e| BrowserError {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
