// region:    --- Imports
use auction_client::dom::{ContainerId, EventKind, FormData};
use auction_client::session::FileStorage;
use auction_client::{App, Config};
use std::str::SplitWhitespace;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Commands
/// 표준 입력 한 줄 명령
#[derive(Debug, PartialEq)]
enum Command {
    Go(String),
    Fire(String, EventKind, FormData),
    Show,
    Quit,
}

fn next_arg(parts: &mut SplitWhitespace<'_>, verb: &str) -> Result<String, String> {
    parts
        .next()
        .map(str::to_string)
        .ok_or_else(|| format!("usage: {} <id>", verb))
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Err("empty command".to_string());
    };
    match verb {
        "go" => Ok(Command::Go(next_arg(&mut parts, verb)?)),
        "click" => Ok(Command::Fire(next_arg(&mut parts, verb)?, EventKind::Click, FormData::new())),
        "submit" => {
            let id = next_arg(&mut parts, verb)?;
            let form = parts
                .map(|pair| {
                    let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                    (key.to_string(), value.replace('+', " "))
                })
                .collect();
            Ok(Command::Fire(id, EventKind::Submit, form))
        }
        "key" => {
            let key = next_arg(&mut parts, verb)?;
            let form = FormData::from([("key".to_string(), key)]);
            Ok(Command::Fire("document".to_string(), EventKind::KeyDown, form))
        }
        "show" => Ok(Command::Show),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command: {}", other)),
    }
}

fn print_screen(app: &App) {
    let ctx = app.context();
    let container = ctx.document.visible().unwrap_or(ContainerId::Home);
    println!("{}", ctx.location.hash());
    println!("{}", ctx.document.header().markup);
    println!("{}", ctx.document.markup(container));
    let toasts = ctx.toasts.render();
    if !toasts.is_empty() {
        println!("{}", toasts);
    }
}
// endregion: --- Commands

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let config = Config::from_env();
    if config.api_key.is_none() {
        warn!("{:<12} --> API 키가 설정되지 않음", "Main");
    }
    info!("{:<12} --> API: {}, 저장소: {}", "Main", config.api_base_url, config.storage_dir.display());

    let storage = Arc::new(FileStorage::new(config.storage_dir.clone()));
    let app = App::new(&config, storage);
    let router = app.start().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(Command::Go(path)) => app.context().navigate(&path),
            Ok(Command::Fire(target, event, form)) => {
                if !app.fire(&target, event, form).await {
                    println!("no {:?} binding on #{}", event, target);
                }
            }
            Ok(Command::Show) => print_screen(&app),
            Ok(Command::Quit) => break,
            Err(message) => println!("{}", message),
        }
    }

    if let Some(router) = router {
        router.abort();
    }
    info!("{:<12} --> 종료", "Main");
    Ok(())
}
// endregion: --- Main
