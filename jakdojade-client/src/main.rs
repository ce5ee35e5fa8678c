use chrono::{Days, Local};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use jakdojade_client::builder::RouteQueryBuilder;
use jakdojade_client::domain::{
    AvoidChanges, ConnectionPreference, Coordinate, Location, NormalizedRoute, Route, Segment,
};
use jakdojade_client::jakdojade::{JakdojadeClient, JakdojadeConfig, JakdojadeError};
use jakdojade_client::session::Credentials;

fn config_from_env() -> JakdojadeConfig {
    let mut config = JakdojadeConfig::new();

    if let Ok(url) = std::env::var("JAKDOJADE_BASE_URL") {
        config = config.with_base_url(url);
    }
    if let Ok(device_id) = std::env::var("JAKDOJADE_DEVICE_ID") {
        config = config.with_device_id(device_id);
    }

    match (
        std::env::var("JAKDOJADE_PROFILE_LOGIN"),
        std::env::var("JAKDOJADE_PASSWORD_HASH"),
    ) {
        (Ok(login), Ok(secret)) => config.with_credentials(Credentials::new(login, secret)),
        _ => config,
    }
}

fn print_segment(segment: &Segment) {
    let time = segment
        .start_time
        .as_deref()
        .and_then(|t| t.split('T').nth(1))
        .map(|t| t.chars().take(5).collect::<String>())
        .unwrap_or_else(|| "??:??".to_string());

    if segment.is_vehicle() {
        println!(
            "  {} [{} {}] {} -> {} ({} min)",
            time,
            segment.vehicle_type.as_deref().unwrap_or("?"),
            segment.line.as_deref().unwrap_or("?"),
            segment.from,
            segment.to,
            segment.duration_minutes
        );
        if let Some(direction) = &segment.direction {
            println!("         Dir: {}", direction);
        }
    } else {
        println!(
            "  {} [WALK] {} -> {} ({} min, {}m)",
            time,
            segment.from,
            segment.to,
            segment.duration_minutes,
            segment.distance_meters.unwrap_or(0.0).round()
        );
    }
}

fn print_route(route: &NormalizedRoute) {
    println!("Start:    {}", route.start_time.as_deref().unwrap_or("?"));
    println!("End:      {}", route.end_time.as_deref().unwrap_or("?"));
    println!("Duration: {} min", route.duration_minutes);
    println!("Changes:  {}", route.changes);
    println!("\nSegments:");
    for segment in &route.segments {
        print_segment(segment);
    }
}

#[tokio::main]
async fn main() -> Result<(), JakdojadeError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let client = JakdojadeClient::new(config_from_env())?;

    let start = Location::address("WARSZAWA", "Plac Defilad 1", Coordinate::new(52.2319, 21.0067));
    let destination = Location::stop_point(
        "WARSZAWA",
        "Międzynarodowa",
        "209802",
        Coordinate::new(52.22997, 21.068713),
    );

    let mut builder = RouteQueryBuilder::new()
        .from(start)
        .to(destination)
        .avoid_line(509)
        .avoid_line(159)
        .avoid_changes(AvoidChanges::AvoidChanges)
        .connection_type(ConnectionPreference::Fast);

    // Tomorrow 18:00 local time
    let tomorrow_evening = Local::now()
        .date_naive()
        .checked_add_days(Days::new(1))
        .and_then(|day| day.and_hms_opt(18, 0, 0))
        .and_then(|at| at.and_local_timezone(Local).earliest());
    match tomorrow_evening {
        Some(at) => builder = builder.departing_at(&at),
        None => warn!("Could not resolve tomorrow 18:00 locally; departing now"),
    }

    let query = builder.build()?;
    let response = client.search(&query).await?;

    if let Some(session) = client.session() {
        println!("Session profile login: {}", session.profile_login());
    }

    match response.routes.first() {
        Some(best) => {
            println!("Found {} routes.", response.routes.len());
            println!("\n--- Best Route Option ---");
            match best {
                Route::Normalized(route) => print_route(route),
                Route::Passthrough(fields) => {
                    println!("Route without parts: {}", serde_json::Value::Object(fields.clone()))
                }
            }
        }
        None => {
            println!("No routes found.");
            if let Some(error) = &response.error {
                println!("Error: {}", error);
            }
        }
    }

    Ok(())
}
