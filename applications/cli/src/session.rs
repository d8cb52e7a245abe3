//! Interactive read-eval loop

use crate::announcer::Announcement;
use crate::commands::Dispatcher;
use crate::error::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::info;

const PROMPT: &str = "> ";

/// Run the shell until `quit`, `exit` or end of input
///
/// Replies and announcements are interleaved on `output` as they arrive.
/// Every session is closed before returning.
pub async fn run<R, W>(
    dispatcher: &Dispatcher,
    input: R,
    mut output: W,
    mut announcements: mpsc::UnboundedReceiver<Announcement>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut announcing = true;

    write_text(&mut output, PROMPT).await?;
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let line = line.trim();
                if matches!(line, "quit" | "exit") {
                    break;
                }
                if !line.is_empty() {
                    let reply = dispatcher.handle_line(line).await;
                    write_text(&mut output, &format!("{}\n", reply)).await?;
                }
                write_text(&mut output, PROMPT).await?;
            }
            announcement = announcements.recv(), if announcing => {
                match announcement {
                    Some(Announcement { session, text }) => {
                        write_text(&mut output, &format!("[{}] {}\n", session, text)).await?;
                    }
                    None => announcing = false,
                }
            }
        }
    }

    info!("Closing all sessions");
    dispatcher.registry().close_all().await;
    Ok(())
}

async fn write_text<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}
