// Slotgrid agenda
// Prints the occurrences of one calendar view from the event API

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};

use slotgrid::models::ui::{CalendarView, GridWindow};
use slotgrid::services::event::HttpEventStore;
use slotgrid::services::mutation::MutationEngine;
use slotgrid::services::settings::SettingsService;

const USAGE: &str = "usage: slotgrid-agenda [day|three|week] [YYYY-MM-DD]";

fn parse_args(args: &[String]) -> Result<(CalendarView, NaiveDate)> {
    let mut view = CalendarView::default();
    let mut focus = Local::now().date_naive();

    for arg in args {
        if arg == "-h" || arg == "--help" {
            bail!(USAGE);
        }
        if let Some(parsed) = CalendarView::parse(arg) {
            view = parsed;
        } else {
            focus = NaiveDate::parse_from_str(arg, "%Y-%m-%d")
                .with_context(|| format!("'{}' is neither a view nor a date\n{}", arg, USAGE))?;
        }
    }
    Ok((view, focus))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (view, focus) = parse_args(&args)?;

    let settings = SettingsService::from_default_location().get()?;
    log::info!("Using event API at {}", settings.api_base_url);

    let store = HttpEventStore::from_settings(&settings)?;
    let engine = MutationEngine::new(store, &settings);
    engine.load().await.context("Failed to load events")?;

    let window = GridWindow::for_view(view, focus, settings.week_start);
    let occurrences = engine.visible(&window);

    for date in window.dates() {
        println!("{}", date.format("%A %d %B %Y"));
        let day: Vec<_> = occurrences.iter().filter(|o| o.date() == date).collect();
        if day.is_empty() {
            println!("  (nothing scheduled)");
        }
        for occ in day {
            let end_label = occ.event.end_time.time().format("%I:%M%P");
            let marker = if occ.is_repeated() { " ↻" } else { "" };
            println!(
                "  {} - {}  {}{}  [{}]",
                occ.start_slot.label(),
                end_label,
                occ.event.title,
                marker,
                occ.key()
            );
        }
    }

    for toast in engine.drain_toasts() {
        eprintln!("{} {}", toast.level.icon(), toast.message);
    }
    Ok(())
}
