// Command-line interface for chatmd
//
// This binary adapts the chatmd-export library to a shell environment: it
// reads saved chat-thread captures, runs the conversion pipeline, and manages
// the clipboard capture queue between invocations.
//
// Exporting:
//
//  chatmd export <capture.html> [--url <thread-url>] [--title <title>]
//                [--no-meta] [--timestamps] [--collapse-images]
//                [-o <file-or-dir>] [--clipboard]
//
// Output goes to stdout by default. With -o pointing at a directory, the
// filename is derived from the title and the export time. With --clipboard,
// the document is written to the system clipboard instead.
//
// Queueing:
//
//  chatmd queue add <text> [--kind <origin>]   - capture a fragment
//  chatmd queue list                           - show what is queued
//  chatmd queue flush [--stdout]               - combine, copy, clear
//
// The queue lives in a session-scoped store (a JSON file under the OS temp
// dir by default, --session overrides) so it survives reinvocations within
// one session. A flush clears it only after the clipboard write succeeded.

mod clipboard;
mod filename;

use chatmd_config::{ChatmdConfig, Loader};
use chatmd_export::assemble::assemble_with_config;
use chatmd_export::options::ConversionOptions;
use chatmd_export::page::StaticPage;
use chatmd_export::queue::{CaptureQueue, ClipboardSink, JsonFileStore};
use chatmd_export::ExportError;
use chrono::Utc;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use std::io::Read;
use std::path::Path;
use std::time::Duration;

fn build_cli() -> Command {
    Command::new("chatmd")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert chat-thread captures to Markdown and manage the capture queue")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a chatmd.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("export")
                .about("Convert a saved thread capture to Markdown")
                .long_about(
                    "Convert the rendered HTML of a chat thread into a Markdown document.\n\n\
                    The capture is located with the configured message-node matchers, each\n\
                    turn is classified and converted, and the result is one document in\n\
                    thread order. Turns that cannot be converted are skipped.\n\n\
                    Examples:\n  \
                    chatmd export thread.html                         # Markdown to stdout\n  \
                    chatmd export thread.html -o out.md               # Write to a file\n  \
                    chatmd export thread.html -o exports/ --title T   # Derived filename\n  \
                    chatmd export thread.html --clipboard             # Copy instead",
                )
                .arg(
                    Arg::new("input")
                        .help("Path to the saved thread capture (HTML)")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("PATH")
                        .help("Output file, or a directory to derive the filename in")
                        .value_hint(ValueHint::AnyPath),
                )
                .arg(
                    Arg::new("clipboard")
                        .long("clipboard")
                        .help("Write the document to the system clipboard")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("output"),
                )
                .arg(
                    Arg::new("url")
                        .long("url")
                        .value_name("URL")
                        .help("Thread URL for the metadata preamble")
                        .value_hint(ValueHint::Url),
                )
                .arg(
                    Arg::new("title")
                        .long("title")
                        .value_name("TITLE")
                        .help("Title heading for the metadata preamble"),
                )
                .arg(
                    Arg::new("no-meta")
                        .long("no-meta")
                        .help("Skip the source/export-time preamble")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("timestamps")
                        .long("timestamps")
                        .help("Attach detected timestamps to message headers")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("collapse-images")
                        .long("collapse-images")
                        .help("Render images as bracketed text links")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("queue")
                .about("Manage the clipboard capture queue")
                .subcommand_required(true)
                .arg(
                    Arg::new("session")
                        .long("session")
                        .value_name("DIR")
                        .help("Session store directory (default: OS temp dir)")
                        .value_hint(ValueHint::DirPath)
                        .global(true),
                )
                .subcommand(
                    Command::new("add")
                        .about("Capture a text fragment into the queue")
                        .arg(
                            Arg::new("text")
                                .help("Fragment to capture, or '-' to read stdin")
                                .required(true)
                                .index(1),
                        )
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .value_name("ORIGIN")
                                .help("Capture origin label")
                                .default_value("copy"),
                        ),
                )
                .subcommand(
                    Command::new("list").about("Show the queued captures").arg(
                        Arg::new("json")
                            .long("json")
                            .help("Emit the queue as JSON")
                            .action(ArgAction::SetTrue),
                    ),
                )
                .subcommand(
                    Command::new("flush")
                        .about("Combine the queue into one document, copy it, clear on success")
                        .arg(
                            Arg::new("stdout")
                                .long("stdout")
                                .help("Print the combined document instead of copying")
                                .action(ArgAction::SetTrue),
                        ),
                ),
        )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = build_cli().get_matches();
    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));

    match matches.subcommand() {
        Some(("export", sub_matches)) => handle_export_command(sub_matches, &config),
        Some(("queue", queue_matches)) => {
            let store = open_store(queue_matches);
            match queue_matches.subcommand() {
                Some(("add", sub_matches)) => handle_queue_add(sub_matches, store, &config),
                Some(("list", sub_matches)) => handle_queue_list(sub_matches, store, &config),
                Some(("flush", sub_matches)) => handle_queue_flush(sub_matches, store, &config),
                _ => unreachable!("queue requires a subcommand"),
            }
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn load_cli_config(path: Option<&str>) -> ChatmdConfig {
    let loader = match path {
        Some(p) => Loader::new().with_file(p),
        None => Loader::new().with_optional_file("chatmd.toml"),
    };
    loader.build().unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        std::process::exit(1);
    })
}

fn open_store(queue_matches: &ArgMatches) -> JsonFileStore {
    match queue_matches.get_one::<String>("session") {
        Some(dir) => JsonFileStore::at(dir),
        None => JsonFileStore::session_default(),
    }
}

fn handle_export_command(sub_matches: &ArgMatches, config: &ChatmdConfig) {
    let input = sub_matches
        .get_one::<String>("input")
        .expect("input is required");
    let html = std::fs::read_to_string(input).unwrap_or_else(|e| {
        eprintln!("Error reading capture '{input}': {e}");
        std::process::exit(1);
    });

    let mut options: ConversionOptions = (&config.export).into();
    if let Some(title) = sub_matches.get_one::<String>("title") {
        options.include_title = Some(title.clone());
    }
    if sub_matches.get_flag("no-meta") {
        options.include_meta = false;
    }
    if sub_matches.get_flag("timestamps") {
        options.include_timestamps = true;
    }
    if sub_matches.get_flag("collapse-images") {
        options.collapse_images = true;
    }

    let mut page = StaticPage::new(html);
    if let Some(url) = sub_matches.get_one::<String>("url") {
        page = page.with_url(url);
    }

    // a saved capture has no lazy loading left to trigger; keep the passes
    // but skip the waits
    let mut assemble_config = config.assemble_config();
    assemble_config.settle.interval = Duration::ZERO;

    let markdown = match assemble_with_config(&mut page, &options, &assemble_config) {
        Ok(doc) => doc,
        Err(ExportError::NoMessages) => {
            eprintln!("No content was extracted. Make sure the capture holds a chat thread.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Export error: {e}");
            std::process::exit(1);
        }
    };

    if sub_matches.get_flag("clipboard") {
        let mut sink = clipboard::ToolClipboard::new();
        if let Err(e) = sink.write_text(&markdown) {
            eprintln!("Copy failed ({e}). Nothing was written; retry when a clipboard is available.");
            std::process::exit(1);
        }
        eprintln!("Copied export to clipboard.");
        return;
    }

    match sub_matches.get_one::<String>("output") {
        Some(output) => {
            let path = resolve_output_path(output, options.include_title.as_deref());
            std::fs::write(&path, &markdown).unwrap_or_else(|e| {
                eprintln!("Error writing '{}': {e}", path.display());
                std::process::exit(1);
            });
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{markdown}"),
    }
}

/// A directory output gets a filename derived from the title and export time.
fn resolve_output_path(output: &str, title: Option<&str>) -> std::path::PathBuf {
    let path = Path::new(output);
    if path.is_dir() {
        path.join(filename::suggest_filename(title.unwrap_or(""), Utc::now()))
    } else {
        path.to_path_buf()
    }
}

fn handle_queue_add(sub_matches: &ArgMatches, mut store: JsonFileStore, config: &ChatmdConfig) {
    let raw = sub_matches
        .get_one::<String>("text")
        .expect("text is required");
    let text = if raw == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).unwrap_or_else(|e| {
            eprintln!("Error reading stdin: {e}");
            std::process::exit(1);
        });
        buf
    } else {
        raw.clone()
    };
    let kind = sub_matches
        .get_one::<String>("kind")
        .expect("kind has a default");

    let mut queue = CaptureQueue::with_format((&config.queue).into());
    queue.restore(&store);
    if queue.enqueue(kind, &text, &mut store) {
        println!("Queued ({} item(s)).", queue.len());
    } else {
        eprintln!("Nothing to queue: capture was empty.");
    }
}

fn handle_queue_list(sub_matches: &ArgMatches, store: JsonFileStore, config: &ChatmdConfig) {
    let mut queue = CaptureQueue::with_format((&config.queue).into());
    queue.restore(&store);
    if sub_matches.get_flag("json") {
        let json = serde_json::to_string_pretty(queue.items()).unwrap_or_else(|e| {
            eprintln!("Error serializing queue: {e}");
            std::process::exit(1);
        });
        println!("{json}");
        return;
    }
    if queue.is_empty() {
        println!("Queue is empty.");
        return;
    }
    for (i, item) in queue.items().iter().enumerate() {
        let first_line = item.text.lines().next().unwrap_or("");
        println!(
            "{:>3}. [{}] {} {}",
            i + 1,
            item.kind,
            item.captured_at.format("%Y-%m-%d %H:%M:%S"),
            first_line
        );
    }
}

fn handle_queue_flush(sub_matches: &ArgMatches, mut store: JsonFileStore, config: &ChatmdConfig) {
    let mut queue = CaptureQueue::with_format((&config.queue).into());
    queue.restore(&store);
    if queue.is_empty() {
        println!("Queue is empty.");
        return;
    }
    let count = queue.len();

    let result = if sub_matches.get_flag("stdout") {
        queue.flush(&mut clipboard::StdoutSink, &mut store)
    } else {
        queue.flush(&mut clipboard::ToolClipboard::new(), &mut store)
    };

    match result {
        Ok(_) => {
            if !sub_matches.get_flag("stdout") {
                eprintln!("Copied queue to clipboard ({count} item(s)).");
            }
        }
        Err(e) => {
            eprintln!("Copy failed ({e}). The queue is unchanged; retry when a clipboard is available.");
            std::process::exit(1);
        }
    }
}
