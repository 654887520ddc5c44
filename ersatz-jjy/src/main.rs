//! CLI entry point for the JJY time-code simulator.
//!
//! Argument parsing uses `clap` 2's builder API (`App`/`Arg`) rather than
//! the derive API.

mod audio_driver;

use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::{App, AppSettings, Arg, ErrorKind};
use log::error;

fn build_app() -> App<'static, 'static> {
    App::new("ersatz-jjy")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Joe Thill <rocketlobster42@gmail.com>")
        .about("Output audio simulating the JJY longwave radio time signal")
        .setting(AppSettings::DisableVersion)
        .arg(
            Arg::with_name("fukushima")
                .short("f")
                .long("fukushima")
                .help("Use the 40kHz Fukushima carrier instead of the 60kHz standard"),
        )
        .arg(
            Arg::with_name("jst")
                .short("j")
                .long("jst")
                .help("Force JST regardless of the system timezone"),
        )
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
        println!("ersatz-jjy v{}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let fukushima = matches.is_present("fukushima");
    let jst = matches.is_present("jst");

    println!("ersatz-jjy v{}", env!("CARGO_PKG_VERSION"));
    if let Err(e) = run(fukushima, jst) {
        error!("{e:#}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(fukushima: bool, jst: bool) -> anyhow::Result<()> {
    let proto = ersatz_core::jjy::JjyProtocol { fukushima };
    let driver = audio_driver::AudioDriver::start(proto, jst)?;

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
