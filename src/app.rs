use std::collections::HashMap;
use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::time::Instant;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::feed::{Feed, FeedOptions};
use crate::output;
use crate::runner::{self, Runner};
use crate::tui;

fn print_banner(no_color: bool) {
    let _ = no_color;
    const BANNER: &str = r#"
             _        __               _
 _ __   ___ | |_ ___ / _| ___  ___  __| |
| '_ \ / _ \| __/ _ \ |_ / _ \/ _ \/ _` |
| | | | (_) | ||  __/  _|  __/  __/ (_| |
|_| |_|\___/ \__\___|_|  \___|\___|\__,_|
       v0.3.1 - terminal note-feed viewer
    "#;
    print!("{}", BANNER);
    println!();
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn render_custom_help() -> String {
    let cmd = CliArgs::command();
    let mut out = String::new();

    if let Some(version) = cmd.get_version() {
        out.push_str(cmd.get_name());
        out.push(' ');
        out.push_str(version);
        out.push('\n');
    } else {
        out.push_str(cmd.get_name());
        out.push('\n');
    }

    if let Some(about) = cmd.get_about() {
        out.push_str(&about.to_string());
        out.push('\n');
    }

    if let Some(long_about) = cmd.get_long_about() {
        out.push('\n');
        out.push_str(&long_about.to_string());
        out.push('\n');
    }

    out.push('\n');
    out.push_str("Usage: ");
    out.push_str(cmd.get_name());
    out.push_str(" [OPTIONS]\n\n");

    let mut sections: Vec<(String, Vec<&clap::Arg>)> = Vec::new();
    let mut section_idx: HashMap<String, usize> = HashMap::new();

    for arg in cmd.get_arguments() {
        if arg.is_hide_set() {
            continue;
        }

        let heading = arg.get_help_heading().unwrap_or("Options").to_string();

        let idx = match section_idx.get(&heading).copied() {
            Some(i) => i,
            None => {
                sections.push((heading.clone(), Vec::new()));
                let i = sections.len() - 1;
                section_idx.insert(heading, i);
                i
            }
        };

        sections[idx].1.push(arg);
    }

    for (heading, args) in sections {
        out.push_str(&heading);
        out.push_str(":\n");

        for arg in args {
            let mut parts: Vec<String> = Vec::new();

            if let Some(short) = arg.get_short() {
                parts.push(format!("-{short}"));
            }

            if let Some(long) = arg.get_long() {
                parts.push(format!("--{long}"));
            }

            if let Some(aliases) = arg.get_visible_aliases() {
                for alias in aliases {
                    let rendered = format!("--{alias}");
                    if !parts.iter().any(|p| p == &rendered) {
                        parts.push(rendered);
                    }
                }
            }

            let mut flags = parts.join(", ");

            if arg.get_action().takes_values() {
                let value_name = arg
                    .get_value_names()
                    .and_then(|names| names.first())
                    .map(|name| name.as_str())
                    .unwrap_or("VALUE");
                flags.push(' ');
                flags.push('<');
                flags.push_str(value_name);
                flags.push('>');
            }

            out.push_str("  ");
            out.push_str(&flags);
            out.push('\n');

            if let Some(help) = arg.get_help() {
                let help = help.to_string();
                if !help.trim().is_empty() {
                    out.push_str("          ");
                    out.push_str(help.trim());
                    out.push('\n');
                }
            }

            out.push('\n');
        }
    }

    out
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn format_cap(cap: usize) -> String {
    if cap == 0 {
        "unlimited".to_string()
    } else {
        cap.to_string()
    }
}

fn format_timeout(timeout: Option<u64>) -> String {
    match timeout {
        Some(seconds) => format!("{seconds}s"),
        None => "none".to_string(),
    }
}

#[derive(Clone, Debug)]
struct RunConfig {
    endpoint: String,
    batch_size: usize,
    cap: usize,
    tolerance: usize,
    scroll_step: usize,
    viewport_height: usize,
    scrolls: usize,
    once: bool,
    timeout: Option<u64>,
    http_proxy: String,
    header: String,
    follow_redirects: bool,
    no_fetch: bool,
    output: Option<String>,
    output_format: Option<String>,
    no_color: bool,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let endpoint = args
        .endpoint
        .or(cfg.endpoint)
        .unwrap_or_else(|| "http://127.0.0.1:8000/".to_string())
        .trim()
        .to_string();
    if url::Url::parse(&endpoint).is_err() {
        return Err(format!("invalid endpoint URL: {endpoint}"));
    }

    let batch_size = args.batch_size.or(cfg.batch_size).unwrap_or(4);
    if batch_size == 0 {
        return Err("invalid batch-size, expected positive integer".to_string());
    }

    let cap = args.cap.or(cfg.cap).unwrap_or(666);

    let tolerance = args.tolerance.or(cfg.tolerance).unwrap_or(1);
    if tolerance > 1 {
        return Err("invalid tolerance, expected 0 or 1".to_string());
    }

    let scroll_step = args.scroll_step.or(cfg.scroll_step).unwrap_or(1);
    if scroll_step == 0 {
        return Err("invalid scroll-step, expected positive integer".to_string());
    }

    let viewport_height = args.viewport_height.or(cfg.viewport_height).unwrap_or(24);
    if viewport_height == 0 {
        return Err("invalid viewport-height, expected positive integer".to_string());
    }

    let scrolls = args.scrolls.unwrap_or(1);
    let once = args.once;

    let timeout = args.timeout.or(cfg.timeout);
    let http_proxy = args.proxy.or(cfg.proxy).unwrap_or_default();
    let header = args.header.or(cfg.header).unwrap_or_default();
    let follow_redirects = args.follow_redirects || cfg.follow_redirects.unwrap_or(false);
    let no_fetch = args.no_fetch || cfg.no_fetch.unwrap_or(false);

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));
    let output_format = args.output_format.or(cfg.output_format);

    Ok(RunConfig {
        endpoint,
        batch_size,
        cap,
        tolerance,
        scroll_step,
        viewport_height,
        scrolls,
        once,
        timeout,
        http_proxy,
        header,
        follow_redirects,
        no_fetch,
        output,
        output_format,
        no_color,
    })
}

fn runner_options(run: &RunConfig) -> runner::Options {
    runner::Options {
        endpoint: run.endpoint.clone(),
        batch_size: run.batch_size,
        cap: run.cap,
        tolerance: run.tolerance,
        viewport_height: run.viewport_height,
        scrolls: run.scrolls,
        timeout_seconds: run.timeout,
        proxy: if run.http_proxy.is_empty() {
            None
        } else {
            Some(run.http_proxy.clone())
        },
        header: if run.header.is_empty() {
            None
        } else {
            Some(run.header.clone())
        },
        follow_redirects: run.follow_redirects,
        skip_fetch: run.no_fetch,
    }
}

fn start_spinner(message: &'static str) -> Result<ProgressBar, String> {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(200));
    pb.set_style(
        ProgressStyle::with_template(":: {msg} {spinner} :: Duration: [{elapsed_precise}]")
            .map_err(|e| format!("failed to build progress bar style: {e}"))?,
    );
    pb.set_message(message);
    Ok(pb)
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    print_banner(run.no_color);

    format_kv_line(
        "Endpoint",
        &format!(
            "{} fetch={}",
            run.endpoint,
            if run.no_fetch { "off" } else { "on" }
        ),
    );
    format_kv_line(
        "Feed",
        &format!(
            "batch={} cap={} tolerance={} step={} viewport={}",
            run.batch_size,
            format_cap(run.cap),
            run.tolerance,
            run.scroll_step,
            run.viewport_height
        ),
    );
    format_kv_line(
        "HTTP",
        &format!(
            "timeout={} redirects={} proxy={} header={}",
            format_timeout(run.timeout),
            format_bool(run.follow_redirects),
            if run.http_proxy.is_empty() {
                "off"
            } else {
                "on"
            },
            if run.header.is_empty() { "off" } else { "on" }
        ),
    );
    format_kv_line(
        "Mode",
        &if run.once {
            format!("once scrolls={}", run.scrolls)
        } else {
            "interactive".to_string()
        },
    );
    println!();

    if run.once {
        run_once(run).await
    } else {
        run_tui(run).await
    }
}

async fn run_once(run: RunConfig) -> Result<(), String> {
    let runner = Runner::new(runner_options(&run)).map_err(|e| e.to_string())?;

    let pb = start_spinner("building feed")?;
    let report = runner.run().await.map_err(|e| e.to_string())?;
    pb.finish_and_clear();

    let fetch_summary = if run.no_fetch {
        "skipped (--no-fetch)".to_string()
    } else {
        match report.fetch_error.as_deref() {
            Some(reason) => format!("{} {}", "failed".red(), reason),
            None => format!("{} notes={}", "ok".green(), report.notes_fetched),
        }
    };
    format_kv_line("Fetch", &fetch_summary);
    format_kv_line(
        "Cards",
        &format!(
            "total={} appended={} scrolls={} counter={} cap-reached={}",
            report.cards.len(),
            report.appended,
            report.scrolls,
            report.counter,
            format_bool(report.cap_reached)
        ),
    );
    println!();

    let records = output::build_records(&report.cards);
    let stdout_format = run
        .output_format
        .as_deref()
        .and_then(output::OutputFormat::parse)
        .unwrap_or(output::OutputFormat::Text);
    let rendered = match stdout_format {
        output::OutputFormat::Text => output::render_text(&records),
        output::OutputFormat::Json => output::render_json(&records),
    };
    print!("{}", String::from_utf8_lossy(&rendered));

    if let Some(outfile_path) = run.output.as_deref() {
        write_feed_file(outfile_path, run.output_format.as_deref(), &records).await?;
    }

    println!();
    println!(
        ":: Completed :: feed built in {}ms ::",
        report.elapsed.as_millis()
    );
    Ok(())
}

async fn run_tui(run: RunConfig) -> Result<(), String> {
    let runner = Runner::new(runner_options(&run)).map_err(|e| e.to_string())?;
    let now = Instant::now();

    let mut feed = Feed::new(FeedOptions {
        batch_size: run.batch_size,
        cap: run.cap,
        tolerance: run.tolerance,
    });

    let mut fetch_error: Option<String> = None;
    if run.no_fetch {
        format_kv_line("Fetch", "skipped (--no-fetch)");
    } else {
        let pb = start_spinner("fetching notes")?;
        match runner.fetch_notes().await {
            Ok(notes) => {
                for note in notes.iter() {
                    feed.push_note(note);
                }
                pb.finish_and_clear();
                format_kv_line("Fetch", &format!("{} notes={}", "ok".green(), notes.len()));
            }
            Err(e) => {
                pb.finish_and_clear();
                tracing::error!(error = %e, "note fetch failed");
                format_kv_line("Fetch", &format!("{} {}", "failed".red(), e));
                fetch_error = Some(e.to_string());
            }
        }
    }

    // The first gate pass fills an empty viewport before any input arrives.
    feed.on_scroll(run.viewport_height);

    let mut viewer = tui::Viewer::new(feed, run.scroll_step, run.endpoint.clone(), fetch_error);
    tui::run(&mut viewer).map_err(|e| format!("terminal error: {e}"))?;

    if let Some(outfile_path) = run.output.as_deref() {
        let records = output::build_records(viewer.feed().cards());
        write_feed_file(outfile_path, run.output_format.as_deref(), &records).await?;
    }

    println!();
    println!(
        ":: Completed :: session took {}s ::",
        now.elapsed().as_secs()
    );
    Ok(())
}

async fn write_feed_file(
    path: &str,
    format_raw: Option<&str>,
    records: &[output::CardRecord],
) -> Result<(), String> {
    let output_format = format_raw
        .and_then(output::OutputFormat::parse)
        .or_else(|| output::infer_format_from_path(path))
        .unwrap_or(output::OutputFormat::Text);
    let rendered = match output_format {
        output::OutputFormat::Text => output::render_text(records),
        output::OutputFormat::Json => output::render_json(records),
    };

    let mut outfile = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(|e| format!("failed to open output file: {e}"))?;
    outfile
        .write_all(&rendered)
        .await
        .map_err(|_| "failed to write output file".to_string())?;
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "notefeed=warn",
        1 => "notefeed=info",
        _ => "notefeed=debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", render_custom_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_tracing(args.verbose);

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => {
                config::ensure_default_config_file(&path)?;
                config::load_config(&path, true)?
            }
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}
