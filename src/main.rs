//! Ethereum Vanity Address Generator CLI
//!
//! Usage:
//!   vanity_engine -p dead               # Find address starting with "dead"
//!   vanity_engine -s beef               # Find address ending with "beef"
//!   vanity_engine -p cafe -s 00 -n 5    # Find 5 addresses matching both
//!   vanity_engine --request '{"prefix":"dead"}' --json

use std::process;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use vanity_engine::matcher::Pattern;
use vanity_engine::{CancelToken, Config, Message, VanityResult, WorkerPool};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();

    let request = match config.validate() {
        Ok(request) => request,
        Err(e) => {
            error!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    let mut pool = match WorkerPool::spawn(&request, config.pool_options()) {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to start search: {}", e);
            process::exit(1);
        }
    };

    if !config.json {
        print_header(pool.pattern(), pool.num_workers(), config.count);
    }
    info!(
        prefix = %request.prefix,
        suffix = %request.suffix,
        difficulty = pool.pattern().estimated_difficulty(),
        "searching (press Ctrl+C to stop)"
    );

    ctrlc_handler(pool.cancel_token());

    let mut found = 0;
    let report_interval = config.report_interval();

    loop {
        match pool.wait_for_message(report_interval) {
            Some(message) if config.json => {
                print_json(&message);
                if message.as_found().is_some() {
                    found += 1;
                }
            }
            Some(Message::Found { result }) => {
                found += 1;
                print_result(&result, found);
            }
            Some(Message::Progress { attempts, rate }) => {
                print_progress(pool.pattern(), attempts, rate);
            }
            None if pool.workers_finished() => {
                warn!("all workers exited");
                break;
            }
            None => {}
        }

        if config.count > 0 && found >= config.count {
            info!(found, "target reached");
            break;
        }

        if pool.is_cancelled() {
            info!("stopped by user");
            break;
        }
    }

    if !config.json {
        println!("\n--- Final Statistics ---");
        println!("Keys tried:     {}", format_number(pool.total_attempts()));
        println!("Matches found:  {}", pool.total_matches());
        println!("Time elapsed:   {:.2}s", pool.elapsed().as_secs_f64());
        println!(
            "Average speed:  {}/s",
            format_number(pool.keys_per_second() as u64)
        );
    }

    pool.join();
}

fn print_header(pattern: &Pattern, workers: usize, count: usize) {
    println!("Ethereum Vanity Address Generator");
    println!("==================================");
    println!("Prefix:     {}", display_part(pattern.prefix()));
    println!("Suffix:     {}", display_part(pattern.suffix()));
    let case = if pattern.case_sensitive() {
        "sensitive"
    } else {
        "insensitive"
    };
    println!("Case:       {}", case);
    println!(
        "Difficulty: {} (~{} attempts)",
        pattern.difficulty_description(),
        format_number(pattern.estimated_difficulty())
    );
    println!("Workers:    {}", workers);
    if count == 0 {
        println!("Target:     unlimited");
    } else {
        println!("Target:     {} address(es)", count);
    }
    println!();
}

fn display_part(part: &str) -> &str {
    if part.is_empty() {
        "(any)"
    } else {
        part
    }
}

fn print_result(result: &VanityResult, index: usize) {
    println!("=== Match #{} ===", index);
    println!("Address:     {}", result.address);
    println!("Private Key: {}", result.private_key);
    println!("Attempts:    {}", format_number(result.attempts));
    println!("Time:        {}", result.time);
    println!();
}

fn print_progress(pattern: &Pattern, attempts: u64, rate: u64) {
    let eta = pattern
        .estimated_time(rate as f64)
        .map(|d| format!(", ~{:.0}s expected per match", d.as_secs_f64()))
        .unwrap_or_default();
    println!(
        "Tried {} keys ({}/s{})",
        format_number(attempts),
        format_number(rate),
        eta
    );
}

fn print_json(message: &Message) {
    match serde_json::to_string(message) {
        Ok(line) => println!("{}", line),
        Err(e) => warn!(error = %e, "failed to encode message"),
    }
}

fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

fn ctrlc_handler(cancel: CancelToken) {
    if let Err(e) = ctrlc::set_handler(move || cancel.cancel()) {
        warn!(error = %e, "could not install Ctrl-C handler");
    }
}
