use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus_briefing::briefing::{BriefingService, CampusBriefing, Section};
use campus_briefing::config::AppConfig;
use campus_briefing::models::{Campus, ForecastRecord, Language, MenuLine, Stop, WeatherSample};
use campus_briefing::parse_iso_date;

#[derive(Parser)]
#[command(name = "campus-briefing")]
#[command(about = "Weather, nearby departures and lunch menus for university campuses")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print weather, stops and menu for a campus
    Briefing {
        /// Campus name (defaults to the configured campus)
        #[arg(long)]
        campus: Option<String>,

        /// Display language (fi, en)
        #[arg(long)]
        lang: Option<Language>,

        /// Menu date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Print the hourly forecast for a campus
    Weather {
        #[arg(long)]
        campus: Option<String>,

        #[arg(long)]
        lang: Option<Language>,
    },

    /// Print departures from stops near a campus
    Stops {
        #[arg(long)]
        campus: Option<String>,

        #[arg(long)]
        lang: Option<Language>,
    },

    /// Print the lunch menu of a campus restaurant
    Menu {
        #[arg(long)]
        campus: Option<String>,

        #[arg(long)]
        lang: Option<Language>,

        /// Menu date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// List known campuses
    Campuses,

    /// Start the API server
    Serve {
        /// Bind address (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port number (defaults to server.port)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn menu_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        None => Ok(Local::now().date_naive()),
        Some(raw) => parse_iso_date(raw)
            .with_context(|| format!("Invalid --date (expected YYYY-MM-DD): {}", raw)),
    }
}

// ── Plain-text rendering ────────────────────────────────────────

fn render_sample(sample: &WeatherSample, language: Language) -> String {
    format!(
        "{:>5}  {:>3}°C  {} {}°C  {}",
        sample.time,
        sample.temp.round() as i64,
        language.strings().feels_like,
        sample.feels_like.round() as i64,
        sample.description
    )
}

fn print_weather(forecast: &ForecastRecord, language: Language) {
    println!("{}", render_sample(&forecast.current, language));
    for sample in forecast.next_hours() {
        println!("{}", render_sample(sample, language));
    }
}

fn print_stops(stops: &[Stop]) {
    for stop in stops {
        match stop.distance_meters {
            Some(distance) => println!("{} ({} m)", stop.name, distance),
            None => println!("{}", stop.name),
        }
        for departure in &stop.departures {
            println!("  {}", departure.text);
        }
    }
}

fn print_menu(lines: &[MenuLine]) {
    for line in lines {
        println!("  {}", line);
    }
}

fn print_section<T>(title: &str, section: &Section<T>, print: impl FnOnce(&T)) {
    println!("\n== {} ==", title);
    match section {
        Section::Available(value) => print(value),
        Section::Unavailable { notice } => println!("{}", notice),
    }
}

fn print_briefing(briefing: &CampusBriefing) {
    println!("{} ({})", briefing.campus.name, briefing.date);
    print_section("Weather", &briefing.weather, |f| {
        print_weather(f, briefing.language)
    });
    print_section("Stops", &briefing.stops, |s| print_stops(s));
    print_section(
        &briefing.campus.restaurant.display_name,
        &briefing.menu,
        |m| print_menu(m),
    );
}

fn print_campuses(campuses: &[Campus], default_campus: &str) {
    for campus in campuses {
        let marker = if campus.matches(default_campus) { "*" } else { " " };
        println!(
            "{} {:<12} {:<20} ({}, {})  {}",
            marker,
            campus.name,
            campus.restaurant.display_name,
            campus.coords.latitude,
            campus.coords.longitude,
            campus.restaurant.provider
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    init_tracing(level, cli.json_logs);

    tracing::info!("Starting campus-briefing v{}", env!("CARGO_PKG_VERSION"));

    let directory = config.campus_directory();
    let service = BriefingService::from_config(&config)?;

    match cli.command {
        Commands::Briefing { campus, lang, date } => {
            let campus = directory.resolve(campus.as_deref())?;
            let language = lang.unwrap_or(config.language);
            let date = menu_date(date.as_deref())?;

            let briefing = service.briefing(campus, language, date).await;
            print_briefing(&briefing);
        }
        Commands::Weather { campus, lang } => {
            let campus = directory.resolve(campus.as_deref())?;
            let language = lang.unwrap_or(config.language);

            let forecast = service.weather(campus, language).await?;
            print_weather(&forecast, language);
        }
        Commands::Stops { campus, lang } => {
            let campus = directory.resolve(campus.as_deref())?;
            let language = lang.unwrap_or(config.language);

            let stops = service.stops(campus, language).await?;
            print_stops(&stops);
        }
        Commands::Menu { campus, lang, date } => {
            let campus = directory.resolve(campus.as_deref())?;
            let language = lang.unwrap_or(config.language);
            let date = menu_date(date.as_deref())?;

            let lines = service.menu(campus, language, date).await?;
            println!("{} ({})", campus.restaurant.display_name, date);
            print_menu(&lines);
        }
        Commands::Campuses => {
            print_campuses(directory.campuses(), &config.campus);
        }
        Commands::Serve { host, port } => {
            let state = campus_briefing::api::state::AppState {
                service: Arc::new(service),
                campuses: Arc::new(directory),
                default_language: config.language,
            };
            let app = campus_briefing::api::build_router(state, &config.server.cors_origin);
            let addr = format!(
                "{}:{}",
                host.unwrap_or(config.server.host),
                port.unwrap_or(config.server.port)
            );
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
