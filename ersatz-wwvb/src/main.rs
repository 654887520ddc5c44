//! CLI entry point for the WWVB time-code simulator. See `ersatz-jjy`'s
//! `main.rs` for the shared CLI-parsing rationale; WWVB carries no
//! `-f`/`-j` flags (spec.md §6).

mod audio_driver;

use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::{App, AppSettings, Arg, ErrorKind};
use log::error;

fn build_app() -> App<'static, 'static> {
    App::new("ersatz-wwvb")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Joe Thill <rocketlobster42@gmail.com>")
        .about("Output audio simulating the WWVB longwave radio time signal")
        .setting(AppSettings::DisableVersion)
        .arg(
            Arg::with_name("version")
                .short("v")
                .long("version")
                .help("Print version number and exit"),
        )
}

fn main() {
    env_logger::init();

    let matches = match build_app().get_matches_safe() {
        Ok(m) => m,
        Err(e) if e.kind == ErrorKind::HelpDisplayed => {
            print!("{e}");
            process::exit(0);
        }
        Err(e) => {
            let first_line = e.message.lines().next().unwrap_or("invalid arguments");
            eprintln!("Error: {first_line}");
            process::exit(1);
        }
    };

    if matches.is_present("version") {
        println!("ersatz-wwvb v{}", env!("CARGO_PKG_VERSION"));
        return;
    }

    println!("ersatz-wwvb v{}", env!("CARGO_PKG_VERSION"));
    if let Err(e) = run() {
        error!("{e:#}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let driver = audio_driver::AudioDriver::start()?;

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))?;
    }
    while running.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(500));
    }
    drop(driver);
    Ok(())
}
