//! Showtime arithmetic and the default daily lineup.

use crate::types::{Billboard, BillboardId, Movie, Room};
use chrono::{NaiveDate, NaiveTime, TimeDelta};

/// Number of showings generated for a date without a schedule
pub const LINEUP_SIZE: usize = 12;

/// Default start times as (hour, minute)
pub const DEFAULT_START_TIMES: [(u32, u32); 5] = [(12, 0), (14, 30), (17, 0), (19, 30), (22, 0)];

/// End of a showing: start plus the movie length, wrapping past midnight.
#[must_use]
pub fn end_time(start: NaiveTime, length_minutes: u16) -> NaiveTime {
    start
        .overflowing_add_signed(TimeDelta::minutes(i64::from(length_minutes)))
        .0
}

/// Start time of the `index`th default slot (cycling through the five slots)
#[must_use]
pub fn default_start_time(index: usize) -> NaiveTime {
    let (hour, minute) = DEFAULT_START_TIMES[index % DEFAULT_START_TIMES.len()];
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// The default lineup for `date`.
///
/// Showing `i` plays `movies[i % movies.len()]` in `rooms[i % rooms.len()]`
/// at the `i`th default start time. Ids run consecutively from `first_id`.
/// Returns nothing when either list is empty.
#[must_use]
pub fn daily_lineup(
    date: NaiveDate,
    movies: &[Movie],
    rooms: &[Room],
    first_id: BillboardId,
) -> Vec<Billboard> {
    if movies.is_empty() || rooms.is_empty() {
        return Vec::new();
    }

    let mut id = first_id;
    (0..LINEUP_SIZE)
        .map(|i| {
            let movie = &movies[i % movies.len()];
            let room = &rooms[i % rooms.len()];
            let start_time = default_start_time(i);
            let billboard = Billboard {
                id,
                date,
                start_time,
                end_time: end_time(start_time, movie.length_minutes),
                movie_id: movie.id,
                movie_name: movie.name.clone(),
                room_id: room.id,
                room_name: room.name.clone(),
                status: true,
            };
            id = id.next();
            billboard
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{MovieGenre, MovieId, RoomId};
    use proptest::prelude::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn movie(id: u32, length_minutes: u16) -> Movie {
        Movie {
            id: MovieId::new(id),
            name: format!("Movie {id}"),
            genre: MovieGenre::Drama,
            allowed_age: 7,
            length_minutes,
            status: true,
        }
    }

    fn room(id: u32) -> Room {
        Room {
            id: RoomId::new(id),
            name: format!("Sala {id}"),
            number: u16::try_from(id).unwrap(),
            status: true,
        }
    }

    #[test]
    fn end_time_adds_length() {
        assert_eq!(end_time(time(14, 30), 95), time(16, 5));
    }

    #[test]
    fn end_time_wraps_past_midnight() {
        assert_eq!(end_time(time(22, 0), 140), time(0, 20));
    }

    #[test]
    fn lineup_cycles_movies_rooms_and_slots() {
        let movies = vec![movie(1, 120), movie(2, 90)];
        let rooms = vec![room(1), room(2), room(3)];
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

        let lineup = daily_lineup(date, &movies, &rooms, BillboardId::new(40));

        assert_eq!(lineup.len(), LINEUP_SIZE);
        assert_eq!(lineup[0].id, BillboardId::new(40));
        assert_eq!(lineup[11].id, BillboardId::new(51));
        assert_eq!(lineup[3].movie_id, MovieId::new(2));
        assert_eq!(lineup[3].room_id, RoomId::new(1));
        assert_eq!(lineup[3].start_time, time(19, 30));
        assert_eq!(lineup[5].start_time, time(12, 0));
        assert_eq!(lineup[4].end_time, time(0, 0));
        assert!(lineup.iter().all(|b| b.date == date && b.status));
    }

    #[test]
    fn lineup_is_empty_without_movies_or_rooms() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert!(daily_lineup(date, &[], &[room(1)], BillboardId::new(1)).is_empty());
        assert!(daily_lineup(date, &[movie(1, 90)], &[], BillboardId::new(1)).is_empty());
    }

    proptest! {
        #[test]
        fn end_time_is_start_plus_length_modulo_a_day(
            start_minute in 0u32..1440,
            length in 0u16..=600,
        ) {
            let start = time(start_minute / 60, start_minute % 60);
            let end = end_time(start, length);
            let expected = (start_minute + u32::from(length)) % 1440;
            prop_assert_eq!(end, time(expected / 60, expected % 60));
        }

        #[test]
        fn lineup_ids_are_consecutive(first in 1u32..10_000, movies in 1usize..15, rooms in 1usize..5) {
            let movies: Vec<Movie> = (1..=movies).map(|i| movie(u32::try_from(i).unwrap(), 100)).collect();
            let rooms: Vec<Room> = (1..=rooms).map(|i| room(u32::try_from(i).unwrap())).collect();
            let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
            let lineup = daily_lineup(date, &movies, &rooms, BillboardId::new(first));
            for (offset, billboard) in lineup.iter().enumerate() {
                prop_assert_eq!(billboard.id.value(), first + u32::try_from(offset).unwrap());
            }
        }
    }
}
