//! Thin command shell around [`kernelsim::Simulator`].
//!
//! Owns no scheduling state and contains no primitive logic — only
//! argument parsing, prompting, and status-line formatting, per the
//! "core returns data, shell formats it" split the library documents.
//! Replays a script file of one command per line if given one, otherwise
//! drops into an interactive `rustyline` read loop.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use kernelsim::{ProcInfo, Report, SimError, Simulator, TotalInfo};

#[derive(Parser)]
#[command(
    name = "kernelsim-shell",
    about = "Interactive shell for the kernelsim process-control simulator"
)]
struct Cli {
    /// Verbosity passed to `tracing_subscriber::EnvFilter` (e.g. "info", "debug").
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// A script file of newline-separated commands to replay non-interactively.
    /// With no script, drops into an interactive prompt.
    script: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut sim = Simulator::new();

    match &cli.script {
        Some(path) => run_script(&mut sim, path),
        None => run_interactive(&mut sim),
    }
}

fn run_script(sim: &mut Simulator, path: &PathBuf) {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failure: could not read script {}: {e}", path.display());
            std::process::exit(1);
        }
    };
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        println!("sim> {line}");
        println!("{}", execute(sim, line));
    }
}

fn run_interactive(sim: &mut Simulator) {
    let mut rl = DefaultEditor::new().expect("failed to initialize line editor");
    loop {
        match rl.readline("sim> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);
                println!("{}", execute(sim, line));
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Failure: readline error: {e}");
                break;
            }
        }
    }
}

/// Parse one command line and run it against `sim`, returning the status
/// text the original interface describes (`Success: …` / `Failure: …`
/// plus any scheduling notifications).
fn execute(sim: &mut Simulator, line: &str) -> String {
    let mut parts = line.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim();

    match cmd {
        "C" => match parse_i32(rest) {
            Ok(priority) => match sim.create(priority) {
                Ok((pid, report)) => format!(
                    "Success: create complete, pid={}\n{}",
                    pid,
                    format_report(&report)
                ),
                Err(e) => format_failure(e),
            },
            Err(msg) => format!("Failure: {msg}"),
        },
        "F" => match sim.fork() {
            Ok((pid, report)) => format!(
                "Success: fork complete, pid={}\n{}",
                pid,
                format_report(&report)
            ),
            Err(e) => format_failure(e),
        },
        "K" => match parse_i32(rest) {
            Ok(pid) => report_or_failure("kill", sim.kill(pid)),
            Err(msg) => format!("Failure: {msg}"),
        },
        "E" => report_or_failure("exit", sim.exit_proc()),
        "Q" => report_or_failure("quantum", sim.quantum()),
        "S" => {
            let mut args = rest.splitn(2, char::is_whitespace);
            match (args.next(), args.next()) {
                (Some(pid_str), Some(msg)) => match parse_i32(pid_str) {
                    Ok(pid) => report_or_failure("send", sim.send(pid, msg.trim())),
                    Err(msg) => format!("Failure: {msg}"),
                },
                _ => "Failure: usage: S <pid> <message>".to_string(),
            }
        }
        "R" => report_or_failure("receive", sim.receive()),
        "Y" => {
            let mut args = rest.splitn(2, char::is_whitespace);
            match (args.next(), args.next()) {
                (Some(pid_str), Some(msg)) => match parse_i32(pid_str) {
                    Ok(pid) => report_or_failure("reply", sim.reply(pid, msg.trim())),
                    Err(msg) => format!("Failure: {msg}"),
                },
                _ => "Failure: usage: Y <pid> <message>".to_string(),
            }
        }
        "N" => {
            let mut args = rest.split_whitespace();
            match (args.next().map(parse_i32), args.next().map(parse_i64)) {
                (Some(Ok(sid)), Some(Ok(init))) => report_or_failure("new_Sem", sim.new_sem(sid, init)),
                _ => "Failure: usage: N <sid> <init>".to_string(),
            }
        }
        "P" => match parse_i32(rest) {
            Ok(sid) => report_or_failure("sem_P", sim.sem_p(sid)),
            Err(msg) => format!("Failure: {msg}"),
        },
        "V" => match parse_i32(rest) {
            Ok(sid) => report_or_failure("sem_V", sim.sem_v(sid)),
            Err(msg) => format!("Failure: {msg}"),
        },
        "I" => match parse_i32(rest) {
            Ok(pid) => match sim.procinfo(pid) {
                Ok(info) => format_procinfo(&info),
                Err(e) => format_failure(e),
            },
            Err(msg) => format!("Failure: {msg}"),
        },
        "T" => format_totalinfo(&sim.totalinfo()),
        "" => "Failure: empty command".to_string(),
        other => format!("Failure: unrecognized command '{other}'"),
    }
}

fn parse_i32(s: &str) -> Result<i32, String> {
    s.trim()
        .parse::<i32>()
        .map_err(|_| format!("'{s}' is not an integer"))
}

fn parse_i64(s: &str) -> Result<i64, String> {
    s.trim()
        .parse::<i64>()
        .map_err(|_| format!("'{s}' is not an integer"))
}

fn report_or_failure(op: &str, result: kernelsim::SimResult<Report>) -> String {
    match result {
        Ok(report) => format!("Success: {op} complete\n{}", format_report(&report)),
        Err(e) => format_failure(e),
    }
}

fn format_failure(e: SimError) -> String {
    format!("Failure: {e}")
}

fn format_report(report: &Report) -> String {
    let mut lines = Vec::new();
    if let Some(s) = &report.expired {
        lines.push(format!("  expired: pid={} priority={} state={:?}", s.pid, s.priority, s.state));
    }
    if let Some(s) = &report.new_current {
        lines.push(format!("  current: pid={} priority={} state={:?}", s.pid, s.priority, s.state));
    }
    if let Some(s) = &report.unblocked {
        lines.push(format!("  unblocked: pid={} priority={} state={:?}", s.pid, s.priority, s.state));
    }
    if let Some(m) = &report.delivered_message {
        lines.push(format!("  message from {}: {}", m.source, m.text));
    }
    if let Some(m) = &report.delivered_reply {
        lines.push(format!("  reply from {}: {}", m.source, m.text));
    }
    lines.join("\n")
}

fn format_procinfo(info: &ProcInfo) -> String {
    format!(
        "Success: procinfo complete\n  pid={} priority={} state={:?} wait_reason={:?} inbox={:?} reply={:?}",
        info.pid, info.priority, info.state, info.wait_reason, info.inbox_message, info.reply_message
    )
}

fn format_totalinfo(info: &TotalInfo) -> String {
    let mut out = String::from("Success: totalinfo complete\n");
    out.push_str(&format!("  current: pid={}\n", info.current.pid));
    out.push_str(&format!("  ready: {} process(es)\n", info.ready.len()));
    out.push_str(&format!("  waiting on send: {} process(es)\n", info.waiting_send.len()));
    out.push_str(&format!("  waiting on receive: {} process(es)\n", info.waiting_receive.len()));
    for sem in &info.semaphores {
        out.push_str(&format!(
            "  semaphore {}: value={} waiters={}\n",
            sem.sid,
            sem.value,
            sem.waiters.len()
        ));
    }
    out.trim_end().to_string()
}
