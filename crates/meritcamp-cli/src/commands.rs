//! Command implementations. Each prints a plain-text report to stdout.

use anyhow::{bail, Result};
use chrono::Local;

use meritcamp_core::fixtures::{self, DEFAULT_PASSWORD};
use meritcamp_core::models::Role;
use meritcamp_core::utils::{
    format_date, format_optional, format_periods, format_phone, render_table, truncate_string,
};

use crate::app::App;

const COMMANDS: [&str; 11] = [
    "login", "logout", "whoami", "events", "badges", "offerings", "assignees", "roster", "stats",
    "export", "seed",
];

/// Width limit for free-text columns
const TEXT_COLUMN_WIDTH: usize = 40;

pub fn is_command(name: &str) -> bool {
    name == "help" || COMMANDS.contains(&name)
}

pub async fn run(app: &mut App, command: &str, args: &[String]) -> Result<()> {
    let event_arg = args.first().map(String::as_str);
    match command {
        "login" => app.login_interactive().await,
        "logout" => {
            app.logout()?;
            println!("Logged out");
            Ok(())
        }
        "whoami" => whoami(app).await,
        "seed" => seed(app).await,
        _ => {
            app.ensure_authenticated().await?;
            match command {
                "events" => events(app).await,
                "badges" => badges(app).await,
                "offerings" => offerings(app, event_arg).await,
                "assignees" => assignees(app, event_arg).await,
                "roster" => roster(app, event_arg).await,
                "stats" => stats(app, event_arg).await,
                "export" => export(app, event_arg).await,
                other => bail!("Unknown command: {}", other),
            }
        }
    }
}

async fn whoami(app: &App) -> Result<()> {
    if let Some(registry) = app.registry() {
        let saved = registry.snapshot_age().await;
        println!("Local snapshot, acting as its first admin");
        println!("Saved: {}", format_optional(saved.as_deref(), "never"));
        return Ok(());
    }
    match app.session.data {
        Some(ref data) if !data.is_expired() => {
            println!("{} <{}>", data.profile.full_name(), data.profile.email);
            println!("Role:    {}", data.profile.role);
            println!("Server:  {}", data.api_url);
            println!("Expires: in {} minutes", data.minutes_until_expiry());
            Ok(())
        }
        _ => bail!("Not logged in"),
    }
}

async fn events(app: &App) -> Result<()> {
    let backend = app.backend();
    let current = backend.current_event().await.ok().map(|e| e.id);
    let today = Local::now().date_naive();
    let rows: Vec<Vec<String>> = backend
        .list_events()
        .await?
        .into_iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.label(),
                format_date(e.date),
                format!(
                    "{} - {}",
                    format_date(e.registration_open),
                    format_date(e.registration_close)
                ),
                if e.is_registration_open(today) { "open" } else { "closed" }.to_string(),
                e.price.to_string(),
                if Some(e.id) == current { "*" } else { "" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        render_table(
            &["ID", "Event", "Date", "Registration", "Status", "Price", "Current"],
            &rows
        )
    );
    Ok(())
}

async fn badges(app: &App) -> Result<()> {
    let rows: Vec<Vec<String>> = app
        .backend()
        .list_badges()
        .await?
        .into_iter()
        .map(|b| {
            vec![
                b.id.to_string(),
                b.name,
                truncate_string(&b.description, TEXT_COLUMN_WIDTH),
            ]
        })
        .collect();
    println!("{}", render_table(&["ID", "Badge", "Description"], &rows));
    Ok(())
}

async fn offerings(app: &App, event_arg: Option<&str>) -> Result<()> {
    let backend = app.backend();
    let event = app.resolve_event(event_arg).await?;
    let (badges, offerings) =
        futures::try_join!(backend.list_badges(), backend.list_offerings(event.id))?;
    let rows: Vec<Vec<String>> = offerings
        .into_iter()
        .map(|o| {
            let name = badges
                .iter()
                .find(|b| b.id == o.badge_id)
                .map(|b| b.name.clone())
                .unwrap_or_else(|| format!("badge {}", o.badge_id));
            vec![
                o.id.to_string(),
                name,
                format_periods(&o.periods),
                o.duration.to_string(),
                o.size_limit.to_string(),
                o.price.to_string(),
                o.requirements.len().to_string(),
            ]
        })
        .collect();
    println!("{}\n", event.label());
    println!(
        "{}",
        render_table(
            &["ID", "Badge", "Periods", "Length", "Size", "Price", "Reqs"],
            &rows
        )
    );
    Ok(())
}

async fn assignees(app: &App, event_arg: Option<&str>) -> Result<()> {
    let event = app.resolve_event(event_arg).await?;
    let rosters = app.backend().offering_assignees(event.id).await?;
    println!("{}", event.label());
    for roster in rosters {
        println!("\n{} ({} assigned)", roster.badge_name, roster.total());
        for (period, scouts) in &roster.periods {
            println!(
                "  Period {}: {}/{} ({} open)",
                period,
                scouts.len(),
                roster.size_limit,
                roster.open_seats(*period)
            );
            for scout in scouts {
                let done = scout.completions.values().filter(|c| **c).count();
                println!(
                    "    {}, {} [{}] {}/{} requirements",
                    scout.lastname,
                    scout.firstname,
                    format_optional(scout.troop.as_deref(), "-"),
                    done,
                    scout.completions.len()
                );
            }
        }
    }
    Ok(())
}

async fn roster(app: &App, event_arg: Option<&str>) -> Result<()> {
    let event = app.resolve_event(event_arg).await?;
    let rows: Vec<Vec<String>> = app
        .backend()
        .event_registrations(event.id)
        .await?
        .into_iter()
        .map(|d| {
            vec![
                d.registration.id.to_string(),
                d.scout.display_name(),
                format_optional(d.scout.troop.as_deref(), "-"),
                d.scout.age_on(event.date).to_string(),
                d.preferences.len().to_string(),
                d.assignments.len().to_string(),
                d.purchases.len().to_string(),
                format_phone(&d.scout.emergency_phone),
            ]
        })
        .collect();
    println!("{} - {} registered\n", event.label(), rows.len());
    println!(
        "{}",
        render_table(
            &["Reg", "Scout", "Troop", "Age", "Prefs", "Classes", "Items", "Emergency"],
            &rows
        )
    );
    Ok(())
}

async fn stats(app: &App, event_arg: Option<&str>) -> Result<()> {
    let event = app.resolve_event(event_arg).await?;
    let stats = app.backend().event_stats(event.id).await?;
    println!("{}\n", event.label());
    println!("Registrations:          {}", stats.registrations);
    println!("Coordinators:           {}", stats.coordinators);
    println!("Offerings:              {}", stats.offerings);
    println!("Assignments:            {}", stats.assignments);
    println!("  completed:            {}", stats.completed_assignments);
    println!("Requirements completed: {}", stats.requirements_completed);
    println!("Preferences:            {}", stats.preferences);
    println!("Purchases:              {}", stats.purchases);
    println!();
    println!("Event fees:  ${}", stats.income.event_fees);
    println!("Class fees:  ${}", stats.income.class_fees);
    println!("Purchases:   ${}", stats.income.purchases);
    println!("Total:       ${}", stats.income.total);
    Ok(())
}

/// Print every registration of the event, with its preferences,
/// assignments and purchases, as JSON
async fn export(app: &App, event_arg: Option<&str>) -> Result<()> {
    let event = app.resolve_event(event_arg).await?;
    let details = app.backend().event_registrations(event.id).await?;
    let document = serde_json::json!({
        "event": event,
        "registrations": details,
    });
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

/// Fill an empty local snapshot with demo data and save it
async fn seed(app: &App) -> Result<()> {
    let Some(registry) = app.registry() else {
        bail!("seed only works with --local");
    };
    if !registry.users_with_role(Role::Admin).await.is_empty() {
        bail!("Snapshot already contains data");
    }

    let users = fixtures::seed_demo(registry).await?;
    registry.persist().await?;

    println!("Demo data written. Every account uses the password `{}`:", DEFAULT_PASSWORD);
    println!("  admin        {}", users.admin.profile.email);
    println!("  teacher      {}", users.teacher.profile.email);
    for coordinator in &users.coordinators {
        println!("  coordinator  {}", coordinator.profile.email);
    }
    Ok(())
}
