//! Booking demo binary
//!
//! Books two stays, lists every booking, then lists a filtered view.

use anyhow::Context as _;
use booking::config::DEFAULT_LOG_FILTER;
use booking::notifications::ConsoleEmailService;
use booking::{
    BookHotel, Booking, BookingFilter, Config, GetBookings, InMemoryBookingRepository, Services,
    build_mediator, sample_bookings,
};
use chrono::{Days, Local};
use mediator_runtime::global;
use mediator_runtime::metrics::MetricsExporter;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn print_bookings(title: &str, bookings: &[Booking]) {
    println!("\n{title}:");
    for booking in bookings {
        println!(
            " - {} for {} ({} to {})",
            booking.hotel_name,
            booking.guest_name,
            booking.check_in.format("%Y-%m-%d"),
            booking.check_out.format("%Y-%m-%d"),
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut exporter = MetricsExporter::new();
    if config.metrics_enabled {
        exporter.install()?;
    }

    let mut repository = InMemoryBookingRepository::new();
    if config.seed_demo_data {
        repository = repository
            .with_bookings(sample_bookings()?)
            .context("seeding demo bookings")?;
    }

    let services = Services::new(Arc::new(repository), Arc::new(ConsoleEmailService));
    global::set_global(build_mediator(&services, &config)?)?;

    let today = Local::now().date_naive();
    let stays = [
        ("Grand Hotel", "Alice", "alice@example.com", 0, 2),
        ("Seaside Resort", "Bob", "bob@example.com", 1, 3),
    ];
    for (hotel, guest, email, from, to) in stays {
        let request = BookHotel::new(
            hotel,
            guest,
            email,
            today + Days::new(from),
            today + Days::new(to),
        );
        let id = global::send(request).await?;
        tracing::info!(%id, guest, "Booking confirmed");
    }

    let bookings = global::send(GetBookings::all()).await?;
    print_bookings("All bookings", &bookings);

    let filter = BookingFilter::parse(&format!(
        "checkIn gte '{}'",
        today.format("%Y-%m-%d")
    ))?;
    let upcoming = global::send(GetBookings::with_filter(filter)).await?;
    print_bookings("Bookings from today on", &upcoming);

    let alice = global::send(GetBookings::matching(|b| b.guest_name == "Alice")).await?;
    print_bookings("Bookings for Alice", &alice);

    if let Some(rendered) = exporter.render() {
        println!("\nMetrics:\n{rendered}");
    }

    Ok(())
}
