//! Terminal front end: parses a command, runs it against a [`Session`] and
//! prints the resulting view.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::api::http::HttpCrmApi;
use crate::api::{AuthApi, BoardReader, EventWriter, NotificationReader};
use crate::db::{establish_connection_pool, run_migrations};
use crate::domain::event::{EventSummary, SlaStatus};
use crate::domain::filter::FilterSet;
use crate::domain::preferences::ViewMode;
use crate::domain::stage::PipelineStage;
use crate::domain::types::EventId;
use crate::models::config::ClientConfig;
use crate::preferences::errors::PreferenceError;
use crate::preferences::sqlite::DieselPreferenceStore;
use crate::preferences::{PreferencePersistence, PreferenceStore};
use crate::services::errors::ServiceError;
use crate::services::export;
use crate::services::notifications::{NotificationCenter, PollSchedule, format_elapsed};
use crate::services::session::{Credentials, Session};
use crate::services::store::ViewStateStore;
use crate::services::views::{ForecastView, RenderedView, StageColumn};

pub const USAGE: &str = "usage: eventos-board <board|list|forecast|export <path>|move <id> <STAGE>|view <board|list|forecast>|search <text>|notifications|watch>";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}\n{USAGE}")]
    Usage(String),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Preference(#[from] PreferenceError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Board,
    List,
    Forecast,
    Export(PathBuf),
    Move { event_id: EventId, stage: PipelineStage },
    View(ViewMode),
    Search(String),
    Notifications,
    Watch,
}

impl Command {
    /// Parses the arguments following the program name. No arguments shows
    /// the board.
    pub fn parse(args: &[String]) -> Result<Self, CliError> {
        let Some(command) = args.first() else {
            return Ok(Command::Board);
        };
        let rest = &args[1..];

        match command.as_str() {
            "board" => Ok(Command::Board),
            "list" => Ok(Command::List),
            "forecast" => Ok(Command::Forecast),
            "notifications" => Ok(Command::Notifications),
            "watch" => Ok(Command::Watch),
            "export" => match rest {
                [path] => Ok(Command::Export(PathBuf::from(path))),
                _ => Err(CliError::Usage("export expects a file path".to_string())),
            },
            "move" => match rest {
                [id, stage] => {
                    let raw: i32 = id
                        .parse()
                        .map_err(|_| CliError::Usage(format!("invalid event id: {id}")))?;
                    let event_id =
                        EventId::new(raw).map_err(|e| CliError::Usage(e.to_string()))?;
                    let stage = stage
                        .parse::<PipelineStage>()
                        .map_err(|e| CliError::Usage(e.to_string()))?;
                    Ok(Command::Move { event_id, stage })
                }
                _ => Err(CliError::Usage("move expects <id> <STAGE>".to_string())),
            },
            "view" => match rest {
                [mode] => mode
                    .parse::<ViewMode>()
                    .map(Command::View)
                    .map_err(|e| CliError::Usage(e.to_string())),
                _ => Err(CliError::Usage("view expects a mode".to_string())),
            },
            "search" if !rest.is_empty() => Ok(Command::Search(rest.join(" "))),
            "search" => Err(CliError::Usage("search expects a query".to_string())),
            other => Err(CliError::Usage(format!("unknown command: {other}"))),
        }
    }

    fn needs_board(&self) -> bool {
        !matches!(self, Command::Notifications | Command::Watch)
    }
}

/// Opens the preference database, builds the session and runs one command.
pub fn run(config: &ClientConfig, args: &[String]) -> Result<(), CliError> {
    let command = Command::parse(args)?;

    let pool = establish_connection_pool(&config.preferences_db).map_err(PreferenceError::from)?;
    run_migrations(&pool)?;
    let preferences = DieselPreferenceStore::new(pool);

    let api = HttpCrmApi::new(config.api_url.as_str(), config.request_timeout())
        .map_err(ServiceError::from)?;
    let mut session = Session::new(
        api,
        Credentials::new(config.email.as_str(), config.password.as_str()),
        PreferencePersistence::new(preferences.clone()),
        ViewStateStore::init(PreferencePersistence::new(preferences.clone())),
        NotificationCenter::new(PreferencePersistence::new(preferences)),
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&mut session, command, &mut out, config.poll_interval())
}

pub fn execute<A, S, W>(
    session: &mut Session<A, S>,
    command: Command,
    out: &mut W,
    poll_interval: Duration,
) -> Result<(), CliError>
where
    A: AuthApi + BoardReader + EventWriter + NotificationReader,
    S: PreferenceStore,
    W: Write,
{
    if command.needs_board() {
        session.load_board()?;
    }

    if matches!(
        command,
        Command::Board
            | Command::List
            | Command::Forecast
            | Command::View(_)
            | Command::Search(_)
    ) {
        render_active_filters(out, &session.store().preferences().filters)?;
    }

    match command {
        Command::Board => render_view(out, &RenderedView::Board(session.store().board_view()))?,
        Command::List => render_view(out, &RenderedView::List(session.store().list_events()))?,
        Command::Forecast => render_view(out, &RenderedView::Forecast(session.store().forecast()))?,
        Command::View(mode) => {
            session.store_mut().set_view_mode(mode);
            render_view(out, &session.store().current_view())?;
        }
        Command::Search(query) => {
            session.store_mut().set_search(query);
            render_view(out, &session.store().current_view())?;
        }
        Command::Export(path) => {
            let events = session.store().list_events();
            let count = events.len();
            let file = BufWriter::new(File::create(&path)?);
            export::write_csv(file, events)?;
            writeln!(out, "Exported {count} events to {}", path.display())?;
        }
        Command::Move { event_id, stage } => match session.move_event(event_id, stage)? {
            Some(event) => writeln!(
                out,
                "Event #{} moved to {}",
                event.id,
                event.stage.display_name()
            )?,
            None => writeln!(
                out,
                "Event #{event_id} is already in {}",
                stage.display_name()
            )?,
        },
        Command::Notifications => {
            session.refresh_notifications()?;
            render_notifications(out, session.notifications())?;
            session.notifications_mut().mark_all_seen();
        }
        Command::Watch => watch(session, out, poll_interval)?,
    }
    Ok(())
}

/// Polls SLA notifications until the process is stopped.
fn watch<A, S, W>(
    session: &mut Session<A, S>,
    out: &mut W,
    poll_interval: Duration,
) -> Result<(), CliError>
where
    A: AuthApi + BoardReader + EventWriter + NotificationReader,
    S: PreferenceStore,
    W: Write,
{
    let mut schedule = PollSchedule::new(poll_interval);
    log::info!("Polling SLA notifications every {}s", poll_interval.as_secs());

    loop {
        let now = Instant::now();
        if schedule.is_due(now) {
            schedule.mark(now);
            match session.refresh_notifications() {
                Ok(()) => render_notifications(out, session.notifications())?,
                Err(err) if err.is_retryable() => {
                    log::warn!("Notification poll failed, retrying later: {err}");
                }
                Err(err) => return Err(err.into()),
            }
        }
        thread::sleep(schedule.remaining(Instant::now()));
    }
}

pub fn render_view<W: Write>(out: &mut W, view: &RenderedView<'_>) -> io::Result<()> {
    match view {
        RenderedView::Board(columns) => render_board(out, columns),
        RenderedView::List(events) => render_list(out, events),
        RenderedView::Forecast(forecast) => render_forecast(out, forecast),
    }
}

/// Prints the active filter badge; nothing when no filter is set.
fn render_active_filters<W: Write>(out: &mut W, filters: &FilterSet) -> io::Result<()> {
    if filters.is_empty() {
        return Ok(());
    }
    writeln!(out, "Filtros activos: {}", filters.active_count())
}

fn render_board<W: Write>(out: &mut W, columns: &[StageColumn<'_>]) -> io::Result<()> {
    for column in columns {
        writeln!(
            out,
            "== {} ({} · ${:.0}) ==",
            column.stage.display_name(),
            column.totals.count,
            column.totals.amount
        )?;
        for event in &column.events {
            writeln!(out, "  {}", card_line(event))?;
        }
    }
    Ok(())
}

fn render_list<W: Write>(out: &mut W, events: &[&EventSummary]) -> io::Result<()> {
    for event in events {
        writeln!(
            out,
            "{:<18} {}",
            event.stage.display_name(),
            card_line(event)
        )?;
    }
    writeln!(out, "{} events", events.len())
}

fn render_forecast<W: Write>(out: &mut W, forecast: &ForecastView) -> io::Result<()> {
    writeln!(
        out,
        "Pipeline: {} events · ${:.0} · weighted ${:.0}",
        forecast.total_count, forecast.total_amount, forecast.weighted_amount
    )?;
    for month in &forecast.months {
        writeln!(
            out,
            "  {:04}-{:02}: {} events · ${:.0}",
            month.year, month.month, month.count, month.amount
        )?;
    }
    if forecast.undated.count > 0 {
        writeln!(
            out,
            "  sin fecha: {} events · ${:.0}",
            forecast.undated.count, forecast.undated.amount
        )?;
    }
    Ok(())
}

fn render_notifications<W: Write, S: PreferenceStore>(
    out: &mut W,
    center: &NotificationCenter<S>,
) -> io::Result<()> {
    let summary = center.summary();
    writeln!(
        out,
        "SLA: {} critical, {} alert ({} unseen)",
        summary.critical_count,
        summary.alert_count,
        center.badge_label().unwrap_or_else(|| "0".to_string())
    )?;
    for item in &summary.items {
        writeln!(
            out,
            "  [{}] #{} {} · {} · {}",
            sla_marker(item.sla_status),
            item.id,
            item.title(),
            item.client_name.as_deref().unwrap_or("-"),
            format_elapsed(item.elapsed_secs)
        )?;
    }
    Ok(())
}

fn card_line(event: &EventSummary) -> String {
    let mut line = format!("#{} {}", event.id, event.display_title());
    if let Some(date) = event.event_date {
        line.push_str(&format!(" · {}", date.format("%Y-%m-%d")));
    }
    if let Some(budget) = event.budget {
        line.push_str(&format!(" · ${budget:.0}"));
    }
    if !event.salesperson_name().is_empty() {
        line.push_str(&format!(" · {}", event.salesperson_name()));
    }
    if event.is_priority() {
        line.push_str(" !");
    }
    if let Some(sla) = event.sla.filter(|sla| sla.status != SlaStatus::None) {
        line.push_str(&format!(
            " [{} {}]",
            sla_marker(sla.status),
            format_elapsed(sla.elapsed_secs)
        ));
    }
    line
}

fn sla_marker(status: SlaStatus) -> &'static str {
    match status {
        SlaStatus::None => "ok",
        SlaStatus::Alert => "alerta",
        SlaStatus::Critical => "critico",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::board::{BoardSnapshot, StageTotals};
    use crate::domain::event::SlaIndicator;
    use crate::preferences::memory::MemoryPreferenceStore;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse(&[]).unwrap(), Command::Board);
        assert_eq!(
            Command::parse(&args(&["move", "42", "cotizado"])).unwrap(),
            Command::Move {
                event_id: EventId::new(42).unwrap(),
                stage: PipelineStage::Quoted
            }
        );
        assert_eq!(
            Command::parse(&args(&["view", "lista"])).unwrap(),
            Command::View(ViewMode::List)
        );
        assert_eq!(
            Command::parse(&args(&["search", "costa", "7070"])).unwrap(),
            Command::Search("costa 7070".to_string())
        );
        assert_eq!(
            Command::parse(&args(&["export", "out.csv"])).unwrap(),
            Command::Export(PathBuf::from("out.csv"))
        );
    }

    #[test]
    fn rejects_malformed_commands() {
        for bad in [
            args(&["move", "0", "COTIZADO"]),
            args(&["move", "42", "PENDIENTE"]),
            args(&["move", "42"]),
            args(&["view", "calendar"]),
            args(&["search"]),
            args(&["dance"]),
        ] {
            assert!(matches!(Command::parse(&bad), Err(CliError::Usage(_))));
        }
    }

    #[test]
    fn board_rendering_shows_server_totals_and_cards() {
        let mut board = BoardSnapshot::default();
        let mut event = EventSummary::new(EventId::new(42).unwrap(), PipelineStage::Quoted);
        event.server_title = Some("PAX 20 — Costa7070 — Social".to_string());
        event.budget = Some(1500.0);
        event.sla = Some(SlaIndicator {
            status: SlaStatus::Critical,
            elapsed_secs: 90_000,
        });
        board.push(PipelineStage::Quoted, event);
        board.totals.insert(
            PipelineStage::Quoted,
            StageTotals {
                count: 3,
                amount: 4200.0,
            },
        );

        let mut store =
            ViewStateStore::init(PreferencePersistence::new(MemoryPreferenceStore::new()));
        store.apply_snapshot(board);

        let mut out = Vec::new();
        render_view(&mut out, &store.current_view()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("== Cotizado (3 · $4200) =="));
        assert!(text.contains("#42 PAX 20 — Costa7070 — Social · $1500 [critico 1d 1h]"));
    }

    #[test]
    fn active_filter_badge_counts_set_constraints() {
        let mut out = Vec::new();
        render_active_filters(&mut out, &FilterSet::new()).unwrap();
        assert!(out.is_empty());

        let filters = FilterSet::new()
            .event_type("Social")
            .budget(Some(500.0), None)
            .event_type("  ");
        assert_eq!(filters.active_count(), 1);

        let filters = FilterSet::new()
            .event_type("Social")
            .budget(Some(500.0), Some(2000.0));
        render_active_filters(&mut out, &filters).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Filtros activos: 3\n");
    }
}
