use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the command tree in src/main.rs.
// We need to duplicate this here since build scripts can't access src/ modules.
fn completion_cli() -> Command {
    Command::new("chatmd")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert chat-thread captures to Markdown and manage the capture queue")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("export")
                .arg(
                    Arg::new("input")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_hint(ValueHint::AnyPath),
                )
                .arg(Arg::new("clipboard").long("clipboard").action(ArgAction::SetTrue))
                .arg(Arg::new("url").long("url").value_hint(ValueHint::Url))
                .arg(Arg::new("title").long("title"))
                .arg(Arg::new("no-meta").long("no-meta").action(ArgAction::SetTrue))
                .arg(Arg::new("timestamps").long("timestamps").action(ArgAction::SetTrue))
                .arg(
                    Arg::new("collapse-images")
                        .long("collapse-images")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("queue")
                .subcommand_required(true)
                .arg(
                    Arg::new("session")
                        .long("session")
                        .value_hint(ValueHint::DirPath)
                        .global(true),
                )
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("text").required(true).index(1))
                        .arg(Arg::new("kind").long("kind").default_value("copy")),
                )
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
                )
                .subcommand(
                    Command::new("flush")
                        .arg(Arg::new("stdout").long("stdout").action(ArgAction::SetTrue)),
                ),
        )
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = completion_cli();

    generate_to(Bash, &mut cmd, "chatmd", &outdir)?;
    generate_to(Zsh, &mut cmd, "chatmd", &outdir)?;
    generate_to(Fish, &mut cmd, "chatmd", &outdir)?;

    Ok(())
}
