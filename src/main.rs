use anyhow::{anyhow, bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

use bank_account::{load_ledger, replay, Account, Notification, Observable, Thresholds};

const USAGE: &str = "usage: bank-account <ledger.csv> [--account N] [--client N] [--balance X] [--thresholds file.json]";

#[derive(Debug)]
struct Options {
    ledger: PathBuf,
    account_number: String,
    client_number: String,
    balance: String,
    thresholds: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = parse_args(env::args().skip(1))?;
    run(options)
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<Options> {
    let mut ledger = None;
    let mut options = Options {
        ledger: PathBuf::new(),
        account_number: "1001".to_string(),
        client_number: "5001".to_string(),
        balance: "0".to_string(),
        thresholds: None,
    };

    while let Some(arg) = args.next() {
        let mut value = || args.next().ok_or_else(|| anyhow!("{} needs a value\n{}", arg, USAGE));
        match arg.as_str() {
            "--account" => options.account_number = value()?,
            "--client" => options.client_number = value()?,
            "--balance" => options.balance = value()?,
            "--thresholds" => options.thresholds = Some(PathBuf::from(value()?)),
            "-h" | "--help" => bail!(USAGE),
            _ if ledger.is_none() => ledger = Some(PathBuf::from(&arg)),
            _ => bail!("unexpected argument: {}\n{}", arg, USAGE),
        }
    }

    options.ledger = ledger.ok_or_else(|| anyhow!(USAGE))?;
    Ok(options)
}

fn run(options: Options) -> Result<()> {
    let thresholds = match &options.thresholds {
        Some(path) => Thresholds::from_file(path)?,
        None => Thresholds::default(),
    };

    let mut account = Account::parse(
        &options.account_number,
        &options.client_number,
        &options.balance,
        None,
    )
    .context("Failed to open account")?
    .with_thresholds(thresholds)
    .context("Failed to apply thresholds")?;

    // Forward every notification as a JSON line on stdout
    account.subscribe(Rc::new(|notification: &Notification| {
        match serde_json::to_string(notification) {
            Ok(json) => println!("{}", json),
            Err(err) => tracing::error!(%err, "failed to serialize notification"),
        }
    }));

    let entries = load_ledger(&options.ledger)?;
    let summary = replay(&mut account, &entries);

    for rejection in &summary.rejected {
        tracing::warn!(line = rejection.line, error = %rejection.error, "ledger entry rejected");
    }

    println!("{}", account);
    println!("{}", summary.summary());

    Ok(())
}
