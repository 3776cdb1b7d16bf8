//! Scripted kiosk session against an in-memory store.
//!
//! Picks a movie, a showing and two seats, books them for a registered
//! customer, then cancels one booking and prints the seat counts.

use cinereservas::{
    Customer, InMemoryBookingStorage, MockCatalog, ReservationAction, ReservationEnvironment,
    ReservationReducer, ReservationState, ReservationStore, Seat,
};
use cinereservas_core::environment::{Clock, SystemClock};
use cinereservas_server::{bootstrap, telemetry};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();
    println!("=== CineReservas kiosk demo ===\n");

    let storage = Arc::new(InMemoryBookingStorage::new());
    let env = ReservationEnvironment::new(
        Arc::new(SystemClock),
        Arc::new(MockCatalog::new()),
        storage.clone(),
    );
    let store = ReservationStore::new(ReservationState::new(), ReservationReducer::new(), env);

    bootstrap(&store).await?;
    let today = SystemClock.today();
    store.send(ReservationAction::LoadBillboards { date: today }).await?;

    let lineup = store
        .state(|s| s.billboards_by_date(today).into_iter().cloned().collect::<Vec<_>>())
        .await;
    println!("Showings on {today}:");
    for billboard in &lineup {
        println!(
            "  #{:<3} {}-{}  {:<28} {}",
            billboard.id,
            billboard.start_time.format("%H:%M"),
            billboard.end_time.format("%H:%M"),
            billboard.movie_name,
            billboard.room_name
        );
    }

    let Some(showing) = lineup.first() else {
        println!("\nNo showings scheduled, nothing to book.");
        return Ok(());
    };
    let (customer, seats) = store
        .state(|s| {
            let customer = s.active_customers().first().map(|c| (*c).clone());
            let seats: Vec<_> = s
                .seats
                .values()
                .filter(|seat| seat.room_id == showing.room_id && seat.status)
                .take(2)
                .map(|seat| seat.id)
                .collect();
            (customer, seats)
        })
        .await;

    let customer_name = customer
        .as_ref()
        .map_or_else(|| "nobody".to_string(), Customer::full_name);
    println!("\nCustomer at the kiosk: {customer_name}");

    let mut script = vec![
        ReservationAction::SelectMovie {
            movie_id: Some(showing.movie_id),
        },
        ReservationAction::SelectBillboard {
            billboard_id: Some(showing.id),
        },
        ReservationAction::SetCustomer { customer },
    ];
    script.extend(
        seats
            .iter()
            .map(|&seat_id| ReservationAction::ToggleSeatSelection { seat_id }),
    );
    for action in script {
        store.send(action).await?;
    }

    let selection = store.state(ReservationState::selection).await;
    println!(
        "Selected {} seat(s): {}",
        selection.seats.len(),
        selection
            .seats
            .iter()
            .map(Seat::label)
            .collect::<Vec<_>>()
            .join(", ")
    );

    println!("\nChecking out...");
    let (outcome, handle) = store
        .send_with(ReservationAction::Checkout, |s| {
            (s.last_error.clone(), s.last_created.clone())
        })
        .await?;
    handle.wait().await?;
    match outcome {
        (Some(error), _) => println!("  Checkout rejected: {error}"),
        (None, created) => println!("  Created: {created:?}"),
    }

    let bookings = store
        .state(|s| s.all_bookings().into_iter().cloned().collect::<Vec<_>>())
        .await;
    for booking in &bookings {
        println!(
            "  Booking #{}: {} seat {} for {} in {}",
            booking.id,
            booking.customer_name,
            booking.seat_label,
            booking.movie_name,
            booking.room_name
        );
    }

    if let Some(first) = bookings.first() {
        println!("\nCancelling booking #{}...", first.id);
        store
            .send(ReservationAction::CancelBooking {
                booking_id: first.id,
            })
            .await?
            .wait()
            .await?;
    }

    let availability = store.state(|s| s.seat_availability(today)).await;
    println!("\nSeat availability on {today}:");
    for (room_id, counts) in &availability {
        println!(
            "  Room {room_id}: {} of {} free ({} booked)",
            counts.available, counts.total, counts.occupied
        );
    }

    println!("\nBookings saved {} time(s)", storage.save_count());

    store.shutdown(Duration::from_secs(5)).await?;
    Ok(())
}
