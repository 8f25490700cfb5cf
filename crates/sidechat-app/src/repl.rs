//! Interactive loop: slash commands and prompt submission.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sidechat_ai::data_uri::encode_data_uri;
use sidechat_ai::{Orchestrator, TurnOutcome};
use sidechat_common::SidechatError;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use crate::presenter::{render_history, render_usage};

const HELP: &str = "\
commands:
  <text>                 send a prompt
  /image <path> [text]   send an image with optional text
  /clear                 clear the conversation
  /lang <code>           set response language (en, vi)
  /history               print the conversation
  /usage                 print call and token counters
  /quit                  exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Prompt(String),
    Image { path: PathBuf, text: String },
    Clear,
    Lang(String),
    History,
    Usage,
    Help,
    Quit,
    Unknown(String),
}

/// `None` for blank lines.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Some(Command::Prompt(line.to_string()));
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    let command = match name {
        "image" | "img" => {
            let (path, text) = match arg.split_once(char::is_whitespace) {
                Some((path, text)) => (path, text.trim()),
                None => (arg, ""),
            };
            if path.is_empty() {
                Command::Unknown("/image needs a file path".into())
            } else {
                Command::Image {
                    path: PathBuf::from(path),
                    text: text.to_string(),
                }
            }
        }
        "clear" => Command::Clear,
        "lang" | "language" => Command::Lang(arg.to_string()),
        "history" => Command::History,
        "usage" => Command::Usage,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => Command::Unknown(format!("unknown command /{other}")),
    };
    Some(command)
}

/// Image mime type from the file extension.
pub fn guess_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        _ => return None,
    };
    Some(mime)
}

/// Read an image file into a base64 `data:` URI.
pub async fn load_image(path: &Path) -> Result<String, SidechatError> {
    let mime =
        guess_mime(path).ok_or_else(|| SidechatError::UnsupportedImage(path.to_path_buf()))?;
    let bytes = tokio::fs::read(path).await?;
    debug!(path = %path.display(), bytes = bytes.len(), mime, "image attached");
    Ok(encode_data_uri(mime, &bytes))
}

/// Read commands from stdin until `/quit` or end of input.
pub async fn run(orchestrator: Arc<Orchestrator>) -> Result<(), SidechatError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    println!("Type a message, or /help for commands.");

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let Some(command) = parse_command(&line) else {
            continue;
        };
        if !execute(&orchestrator, command).await {
            break;
        }
    }
    info!("leaving interactive session");
    Ok(())
}

/// Returns `false` when the session should end.
async fn execute(orchestrator: &Orchestrator, command: Command) -> bool {
    match command {
        Command::Prompt(text) => {
            submit(orchestrator, &text, None).await;
        }
        Command::Image { path, text } => match load_image(&path).await {
            Ok(uri) => submit(orchestrator, &text, Some(&uri)).await,
            Err(e) => eprintln!("error: {e}"),
        },
        Command::Clear => {
            orchestrator.clear_history();
            println!("Conversation cleared.");
        }
        Command::Lang(code) if code.is_empty() => {
            println!("language: {}", orchestrator.language());
        }
        Command::Lang(code) => match orchestrator.set_language(&code) {
            Ok(language) => println!("language: {language}"),
            Err(e) => eprintln!("error: {e}"),
        },
        Command::History => {
            let rendered = render_history(&orchestrator.history());
            if rendered.is_empty() {
                println!("(no messages)");
            } else {
                println!("{rendered}");
            }
        }
        Command::Usage => println!("{}", render_usage(&orchestrator.usage())),
        Command::Help => println!("{HELP}"),
        Command::Quit => return false,
        Command::Unknown(message) => eprintln!("{message} (try /help)"),
    }
    true
}

async fn submit(orchestrator: &Orchestrator, text: &str, image: Option<&str>) {
    // the presenter has already shown the reply or the error
    if orchestrator.submit_prompt(text, image).await == TurnOutcome::Rejected {
        eprintln!("A response is already in progress.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_prompt() {
        assert_eq!(
            parse_command("  hello there "),
            Some(Command::Prompt("hello there".into()))
        );
        assert_eq!(parse_command("   "), None);
    }

    #[test]
    fn slash_commands() {
        assert_eq!(parse_command("/clear"), Some(Command::Clear));
        assert_eq!(parse_command("/history"), Some(Command::History));
        assert_eq!(parse_command("/usage"), Some(Command::Usage));
        assert_eq!(parse_command("/quit"), Some(Command::Quit));
        assert_eq!(parse_command("/lang vi"), Some(Command::Lang("vi".into())));
        assert_eq!(parse_command("/lang"), Some(Command::Lang(String::new())));
        assert!(matches!(parse_command("/nope"), Some(Command::Unknown(_))));
    }

    #[test]
    fn image_command_splits_path_and_text() {
        assert_eq!(
            parse_command("/image cat.png what breed is this?"),
            Some(Command::Image {
                path: PathBuf::from("cat.png"),
                text: "what breed is this?".into(),
            })
        );
        assert_eq!(
            parse_command("/image cat.png"),
            Some(Command::Image {
                path: PathBuf::from("cat.png"),
                text: String::new(),
            })
        );
        assert!(matches!(parse_command("/image"), Some(Command::Unknown(_))));
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(guess_mime(Path::new("a.PNG")), Some("image/png"));
        assert_eq!(guess_mime(Path::new("a.jpeg")), Some("image/jpeg"));
        assert_eq!(guess_mime(Path::new("a.webp")), Some("image/webp"));
        assert_eq!(guess_mime(Path::new("notes.txt")), None);
        assert_eq!(guess_mime(Path::new("noext")), None);
    }

    #[tokio::test]
    async fn load_image_builds_data_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.gif");
        std::fs::write(&path, b"GIF89a").unwrap();

        let uri = load_image(&path).await.unwrap();
        assert_eq!(uri, "data:image/gif;base64,R0lGODlh");
    }

    #[tokio::test]
    async fn load_image_rejects_unknown_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hi").unwrap();

        let err = load_image(&path).await.unwrap_err();
        assert!(matches!(err, SidechatError::UnsupportedImage(p) if p == path));
    }
}
