use anyhow::Result;
use tokio::sync::mpsc;

use mastertask::app::{spawn_refresh_ticker, App};
use mastertask::backend::factory::create_backend;
use mastertask::config::Config;
use mastertask::session::SessionStore;
use mastertask::utils::datetime;
use mastertask::view::ViewSelector;
use mastertask::{logger, render};

fn print_usage() {
    println!("Usage: mastertask [VIEW] [--watch]");
    println!();
    println!("Views: inbox, today, upcoming, all, notifications");
    println!();
    println!("Options:");
    println!("  -w, --watch      Re-render on every refresh tick until Ctrl-C");
    println!("      --init-config  Write a default configuration file and exit");
    println!("  -h, --help       Show this help");
}

fn print_app(app: &mut App) {
    {
        let snapshot = app.snapshot(datetime::local_now());
        let notifications = app.notifications().map(|feed| feed.items()).unwrap_or_default();
        print!("{}", render::render_snapshot(&snapshot, app.date_format(), notifications));
    }

    for alert in app.alerts_mut().drain() {
        eprintln!("[{}] {}", alert.timestamp, alert.message);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut view: Option<ViewSelector> = None;
    let mut watch = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-w" | "--watch" => watch = true,
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            "--init-config" => {
                let path = Config::get_default_config_path()?;
                Config::generate_default_config(&path)?;
                println!("{}: {}", mastertask::constants::CONFIG_GENERATED, path.display());
                return Ok(());
            }
            other => view = Some(other.parse()?),
        }
    }

    let config = Config::load()?;
    logger::init(&config.logging)?;

    let backend = create_backend(&config.backend)?;
    let session = SessionStore::new(config.session_path()?);

    let mut app = App::new(config, backend, session)?;
    app.start().await;
    if let Some(view) = view {
        app.handle(mastertask::app::Action::Navigate(view)).await;
    }

    print_app(&mut app);
    app.take_needs_render();

    if !watch {
        return Ok(());
    }

    let Some(period) = app.config().refresh_interval() else {
        eprintln!("❌ Refresh is disabled (refresh.interval_seconds = 0)");
        return Ok(());
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let _ticker = spawn_refresh_ticker(period, tx);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            Some(action) = rx.recv() => {
                app.handle(action).await;
                if app.take_needs_render() {
                    println!();
                    print_app(&mut app);
                }
            }
            _ = &mut ctrl_c => break,
        }
    }

    Ok(())
}
