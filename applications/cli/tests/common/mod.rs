//! Shell test fixtures

#![allow(dead_code)]

use encore_cli::{build, Announcement, CliConfig, Dispatcher};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::sync::mpsc;

pub const TIMEOUT: Duration = Duration::from_secs(5);

/// Long enough that nothing finishes during a test
pub const CATALOG: &str = r#"
[[tracks]]
id = "op-1"
name = "Opening"
length = "10:00"
suggestions = ["cl-1"]

[[tracks]]
id = "md-1"
name = "Middle Eight"
length = "12:30"

[[tracks]]
id = "cl-1"
name = "Closing"
length = "9:45"
"#;

pub struct Shell {
    pub dispatcher: Dispatcher,
    pub announcements: mpsc::UnboundedReceiver<Announcement>,
    // Held so the catalog outlives the shell
    pub _catalog: NamedTempFile,
}

impl Shell {
    pub async fn send(&self, line: &str) -> String {
        self.dispatcher.handle_line(line).await
    }

    /// Wait for an announcement with the given text
    pub async fn expect_announcement(&mut self, session: &str, text: &str) {
        tokio::time::timeout(TIMEOUT, async {
            loop {
                let announcement = self
                    .announcements
                    .recv()
                    .await
                    .expect("announcement channel closed");
                if announcement.session == session && announcement.text == text {
                    return;
                }
            }
        })
        .await
        .unwrap_or_else(|_| panic!("no announcement {:?} for {}", text, session));
    }
}

pub fn catalog_file() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(CATALOG.as_bytes()).unwrap();
    file
}

pub async fn shell() -> Shell {
    let catalog = catalog_file();
    let mut config = CliConfig::default();
    config.catalog.path = catalog.path().to_path_buf();

    let (dispatcher, announcements) = build(&config).await.unwrap();
    Shell {
        dispatcher,
        announcements,
        _catalog: catalog,
    }
}
