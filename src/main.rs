use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use technews::cli::{Cli, Commands, SessionInput, SettingsCommand};
use technews::config::Config;
use technews::errors::{NewsError, NewsResult};
use technews::presenter::{ArticlePresenter, TerminalPresenter};
use technews::services::{
    Delivery, LoadService, SettingEntry, SettingsService, SystemBrowser, TcpConnectivityProbe,
    UrlOpener,
};
use technews::sources::{GuardianSource, QueryBuilder};
use technews::storage::sqlite::{SqlitePreferenceRepository, SqliteStorage};
use technews::storage::PreferenceRepository;

fn main() {
    init_logging();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = runtime.block_on(run());

    // A fetch or prompt read abandoned by Ctrl-C is not waited for
    runtime.shutdown_background();

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

async fn run() -> NewsResult<()> {
    let cli = Cli::parse();
    let interrupt = watch_interrupt();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize storage
    let storage = SqliteStorage::new(&config.db_path)?;
    let settings = SettingsService::new(SqlitePreferenceRepository::new(storage));

    match cli.command {
        Commands::List { json } => cmd_list(&config, &settings, &interrupt, json).await,
        Commands::Read => cmd_read(&config, &settings, &interrupt).await,
        Commands::Settings { command } => cmd_settings(&settings, command),
    }
}

/// Cancelled on the first Ctrl-C. Stays cancelled, so a signal that lands
/// between two waits is not lost.
fn watch_interrupt() -> CancellationToken {
    let interrupt = CancellationToken::new();
    let watcher = interrupt.clone();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => watcher.cancel(),
            Err(e) => debug!(error = %e, "Unable to listen for Ctrl-C"),
        }
    });

    interrupt
}

fn new_loader(config: &Config) -> NewsResult<LoadService> {
    let probe = TcpConnectivityProbe::for_url(&config.api_url)?;
    Ok(LoadService::new(
        Arc::new(GuardianSource::new()),
        Arc::new(probe),
    ))
}

/// Run one fetch cycle into `presenter`. Ctrl-C tears the screen down.
async fn load_into<P: ArticlePresenter>(
    loader: &LoadService,
    presenter: &mut P,
    interrupt: &CancellationToken,
    url: String,
) -> NewsResult<Delivery> {
    let Some(pending) = loader.trigger(url) else {
        return Ok(Delivery::Discarded);
    };

    presenter.show_loading()?;

    tokio::select! {
        delivery = pending.deliver(presenter) => delivery,
        _ = interrupt.cancelled() => {
            loader.destroy();
            println!("Cancelled.");
            Ok(Delivery::Discarded)
        }
    }
}

/// One line from stdin, `None` at end of input
async fn read_line() -> NewsResult<Option<String>> {
    let line = tokio::task::spawn_blocking(|| -> io::Result<Option<String>> {
        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(None);
        }
        Ok(Some(input))
    })
    .await
    .map_err(|e| NewsError::Io(io::Error::new(io::ErrorKind::Other, e)))??;

    Ok(line)
}

async fn cmd_list<R: PreferenceRepository>(
    config: &Config,
    settings: &SettingsService<R>,
    interrupt: &CancellationToken,
    json: bool,
) -> NewsResult<()> {
    let query = QueryBuilder::from_config(config)?;
    let loader = new_loader(config)?;
    let mut presenter = TerminalPresenter::new(io::stdout()).with_json(json);

    let url = query.build_for(&settings.preferences()?);
    load_into(&loader, &mut presenter, interrupt, url).await?;

    Ok(())
}

async fn cmd_read<R: PreferenceRepository>(
    config: &Config,
    settings: &SettingsService<R>,
    interrupt: &CancellationToken,
) -> NewsResult<()> {
    let query = QueryBuilder::from_config(config)?;
    let loader = new_loader(config)?;
    let browser = SystemBrowser;
    let mut presenter = TerminalPresenter::new(io::stdout());

    let url = query.build_for(&settings.preferences()?);
    if load_into(&loader, &mut presenter, interrupt, url).await? == Delivery::Discarded {
        return Ok(());
    }

    loop {
        print!("\nEnter number to open, 'r' to reload, 'set <key> <value>', or 'q' to quit: ");
        io::stdout().flush()?;

        let line = tokio::select! {
            line = read_line() => line?,
            _ = interrupt.cancelled() => {
                loader.destroy();
                println!("\nCancelled.");
                break;
            }
        };

        let Some(input) = line else {
            break;
        };

        match SessionInput::parse(&input) {
            SessionInput::Quit => break,
            SessionInput::Open(number) => match presenter.select(number) {
                Some(article) => {
                    println!("Opening {}", article.url());
                    browser.open(article.url());
                }
                None => println!("Number out of range"),
            },
            SessionInput::Reload => {
                let url = query.build_for(&settings.preferences()?);
                let delivery = load_into(&loader, &mut presenter, interrupt, url).await?;
                if delivery == Delivery::Discarded {
                    break;
                }
            }
            SessionInput::Set(key, value) => {
                match settings.set(key.as_str(), &value) {
                    Ok(entry) => print_entry(&entry),
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                }

                // A changed setting starts a new cycle
                let url = query.build_for(&settings.preferences()?);
                let delivery = load_into(&loader, &mut presenter, interrupt, url).await?;
                if delivery == Delivery::Discarded {
                    break;
                }
            }
            SessionInput::Invalid(message) => println!("{}", message),
        }
    }

    Ok(())
}

fn cmd_settings<R: PreferenceRepository>(
    settings: &SettingsService<R>,
    command: SettingsCommand,
) -> NewsResult<()> {
    match command {
        SettingsCommand::Show => {
            println!("Settings:\n");
            for entry in settings.show()? {
                print_entry(&entry);
            }
        }
        SettingsCommand::Set { key, value } => {
            let entry = settings.set(&key, &value)?;
            print_entry(&entry);
        }
        SettingsCommand::Reset { key } => {
            for key in settings.reset(key.as_deref())? {
                println!("Reset {} to {}", key, key.default_value());
            }
        }
    }

    Ok(())
}

fn print_entry(entry: &SettingEntry) {
    if entry.is_clamped() {
        println!(
            "  {:<10} {} (stored: {})",
            entry.key.as_str(),
            entry.summary,
            entry.value
        );
    } else {
        println!("  {:<10} {}", entry.key.as_str(), entry.summary);
    }
}
