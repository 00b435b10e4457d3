mod flow;
mod prompt;
mod qr;
mod record;
mod reconcile;
mod uri;

use crate::prompt::TermPrompter;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "otpqr",
    version,
    about = "Rebuild OTP enrollment QR codes from a scan or manual input"
)]
struct Cli {
    /// Path to an image with an otpauth:// QR code; omit to enter
    /// everything by hand
    #[arg(value_name = "path/to/image")]
    image: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    // Скан — опционален; без него весь поток идёт через вопросы.
    let decoded = match cli.image {
        Some(ref path) => {
            eprintln!("Reading the QR code...\n");
            let raw = qr::read_qr(path)?;
            Some(uri::decode(&raw)?)
        }
        None => None,
    };

    let scanned = decoded.is_some();
    let decoded = decoded.unwrap_or_default();

    let mut prompter = TermPrompter::new();
    let uri = flow::run(decoded, scanned, &mut prompter)?;
    let code = qr::render_qr(&uri)?;

    eprintln!("\nURI: {uri}");
    eprintln!("\nHere is a new QR code. Scan it with your OTP app:");
    eprintln!("{code}");

    Ok(())
}
