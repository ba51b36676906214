// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Interactive mode: a line-based loop with colored output.

use std::io::{self, Write};

use crossterm::style::Stylize;

use crate::agent::{FileAgent, ResultRecord};
use crate::error::Result;
use crate::interpreter::{classify, Intent, SystemCommand};

/// Longest file content echoed back in full; the rest is truncated.
const CONTENT_PREVIEW_CHARS: usize = 2000;
/// Listing entries shown before eliding the tail.
const LISTING_PREVIEW_LINES: usize = 50;

/// Runs the interactive loop until `exit` or end of input.
pub async fn run(agent: FileAgent) -> Result<()> {
    print_banner(&agent);

    let stdin = io::stdin();
    loop {
        print!("{} ", "fred>".cyan().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            println!();
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        // Exit is handled here so the loop owns its own lifetime.
        if classify(input) == Intent::System(SystemCommand::Exit) {
            println!("{}", "Bye.".dark_grey());
            break;
        }

        let record = agent.execute(input).await;
        print_record(&record);
    }
    Ok(())
}

fn print_banner(agent: &FileAgent) {
    let status = agent.status();
    println!("{}", format!("fred {}", env!("CARGO_PKG_VERSION")).bold());
    println!(
        "provider {} | model {} | workspace {}",
        status.provider.as_str().green(),
        status.model.as_str().green(),
        status.workspace.display().to_string().green(),
    );
    println!("{}", "Type a command in plain language, or `help`.".dark_grey());
    println!();
}

/// Prints one result, colored. Also used for single-command mode.
pub fn print_record(record: &ResultRecord) {
    if record.success {
        println!("{} {}", "✓".green(), record.message);
        if let Some(payload) = &record.payload {
            print_payload(payload);
        }
    } else {
        let kind = record.error_kind.as_deref().unwrap_or("Error");
        println!(
            "{} {} {}",
            "✗".red(),
            record.message,
            format!("[{kind}]").dark_grey()
        );
    }
    println!();
}

fn print_payload(payload: &serde_json::Value) {
    match payload {
        serde_json::Value::String(content) => {
            let preview: String = content.chars().take(CONTENT_PREVIEW_CHARS).collect();
            println!("{preview}");
            let total = content.chars().count();
            if total > CONTENT_PREVIEW_CHARS {
                println!(
                    "{}",
                    format!("... ({} more characters)", total - CONTENT_PREVIEW_CHARS).dark_grey()
                );
            }
        }
        serde_json::Value::Array(entries) => {
            for entry in entries.iter().take(LISTING_PREVIEW_LINES) {
                let path = entry
                    .get("path")
                    .and_then(|p| p.as_str())
                    .unwrap_or_default();
                if entry.get("is_dir").and_then(|d| d.as_bool()).unwrap_or(false) {
                    println!("  {}", format!("{path}/").blue());
                } else {
                    let size = entry.get("size").and_then(|s| s.as_u64()).unwrap_or(0);
                    println!("  {path} ({size} bytes)");
                }
            }
            if entries.len() > LISTING_PREVIEW_LINES {
                println!(
                    "{}",
                    format!("  ... ({} more entries)", entries.len() - LISTING_PREVIEW_LINES)
                        .dark_grey()
                );
            }
        }
        serde_json::Value::Object(map) => {
            // Chat metadata: show the model and token count when present.
            if let Some(model) = map.get("model").and_then(|m| m.as_str()) {
                let tokens = map
                    .get("usage")
                    .and_then(|u| {
                        let prompt = u.get("prompt_tokens")?.as_u64()?;
                        let completion = u.get("completion_tokens")?.as_u64()?;
                        Some(prompt + completion)
                    })
                    .unwrap_or(0);
                println!("{}", format!("[{model}, {tokens} tokens]").dark_grey());
            }
        }
        _ => {}
    }
}
