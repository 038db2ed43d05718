use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use marketplace::contract::error::MarketplaceError;
use marketplace::Session;

use crate::commands::{self, Command};
use crate::render;

#[derive(Parser, Debug)]
#[command(name = "ptj", no_binary_name = true, disable_version_flag = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

/// Line-oriented event loop over one session. Errors are printed and the
/// loop carries on; EOF, `exit` or `quit` end it.
pub async fn run(session: &Session) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    render::status(&session.shell());
    loop {
        stdout.write_all(b"ptj> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let words = match split_words(&line) {
            Ok(words) => words,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };
        match words.first().map(String::as_str) {
            None => continue,
            Some("exit" | "quit") => break,
            Some(_) => {}
        }

        let command = match Line::try_parse_from(&words) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };
        if matches!(command, Command::Repl | Command::Check) {
            eprintln!("not available inside the repl");
            continue;
        }
        if let Err(e) = commands::dispatch(session, command).await {
            tracing::debug!(error = ?e, "command failed");
            match e.downcast_ref::<MarketplaceError>() {
                Some(MarketplaceError::Internal) => eprintln!("error: {e} (details in the log)"),
                Some(inline) => eprintln!("{inline}"),
                None => eprintln!("error: {e:#}"),
            }
        }
    }
    tracing::info!("repl closed");
    Ok(())
}

/// Whitespace split that keeps "double quoted" and 'single quoted' runs together.
fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quote.is_some() {
        return Err("unterminated quote".to_string());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
