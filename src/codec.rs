//! Line codec for the text-file persistence format
//!
//! Each entity type maps to one physical line of its backing file. Decoding
//! is tolerant: blank lines, recognized headers and byte-order-mark
//! artifacts are skipped silently, while malformed lines are logged (with
//! control characters sanitized) and skipped. A bad line never aborts the
//! surrounding load.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{Booking, Homestay, Tour};

/// Canonical date pattern used in all data files (dd/MM/yyyy)
pub const DATE_FORMAT: &str = "%d/%m/%Y";
/// Fallback pattern accepted when reading legacy booking lines (yyyy-MM-dd)
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";

/// Remove a leading byte-order mark, as found on the first line of files
/// written by some Windows editors
pub fn strip_bom(line: &str) -> &str {
    line.strip_prefix('\u{feff}').unwrap_or(line)
}

/// Make a raw line safe for log output
fn sanitize(line: &str) -> String {
    line.replace(['\r', '\n', '\t'], "_")
}

fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
}

fn encode_bool(b: bool) -> &'static str {
    if b {
        "TRUE"
    } else {
        "FALSE"
    }
}

// ---------------------------------------------------------------------------
// Homestay: HomeID-HomeName-RoomNumber-Address-MaxCapacity
// ---------------------------------------------------------------------------

/// Decode one homestay line, or `None` for blank/malformed input.
///
/// The address field may itself contain the `-` separator; any extra
/// segments between the room-count field and the trailing capacity field
/// are re-joined into the address rather than truncated.
pub fn decode_homestay(line: &str) -> Option<Homestay> {
    let line = strip_bom(line).trim();
    if line.is_empty() {
        return None;
    }

    let parts: Vec<&str> = line.split('-').collect();
    if parts.len() < 5 {
        tracing::warn!("Skipping homestay line, expected 5 fields, got {}: {}", parts.len(), sanitize(line));
        return None;
    }

    let id = parts[0].trim();
    let name = parts[1].trim();
    let room_count: u32 = match parts[2].trim().parse() {
        Ok(n) => n,
        Err(_) => {
            tracing::warn!("Skipping homestay line, invalid room count: {}", sanitize(line));
            return None;
        }
    };
    let address = parts[3..parts.len() - 1].join("-");
    let max_capacity: u32 = match parts[parts.len() - 1].trim().parse() {
        Ok(n) => n,
        Err(_) => {
            tracing::warn!("Skipping homestay line, invalid capacity: {}", sanitize(line));
            return None;
        }
    };

    match Homestay::new(id, name, room_count, address.trim(), max_capacity) {
        Ok(homestay) => Some(homestay),
        Err(e) => {
            tracing::warn!("Skipping homestay line ({}): {}", e, sanitize(line));
            None
        }
    }
}

pub fn encode_homestay(homestay: &Homestay) -> String {
    format!(
        "{}-{}-{}-{}-{}",
        homestay.id, homestay.name, homestay.room_count, homestay.address, homestay.max_capacity
    )
}

// ---------------------------------------------------------------------------
// Tour: TourID,TourName,Duration,Price,HomeID,Departure,End,Tourists,IsBooked
// ---------------------------------------------------------------------------

/// Decode one tour line, or `None` for blank/header/malformed input
pub fn decode_tour(line: &str) -> Option<Tour> {
    let line = strip_bom(line).trim();
    if line.is_empty() {
        return None;
    }

    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() < 9 {
        tracing::warn!("Skipping tour line, expected 9 fields, got {}: {}", parts.len(), sanitize(line));
        return None;
    }

    let id = parts[0].trim();
    if id.is_empty() || id.eq_ignore_ascii_case("TourID") {
        return None; // header or empty id
    }

    let name = parts[1].trim();
    let duration_label = parts[2].trim();
    let price: Decimal = match parts[3].trim().parse() {
        Ok(p) => p,
        Err(_) => {
            tracing::warn!("Skipping tour line, invalid price: {}", sanitize(line));
            return None;
        }
    };
    let homestay_id = parts[4].trim();
    let departure_date = match parse_date(parts[5].trim()) {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!("Skipping tour line, bad departure date (expected dd/MM/yyyy): {} - {}", sanitize(line), e);
            return None;
        }
    };
    let end_date = match parse_date(parts[6].trim()) {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!("Skipping tour line, bad end date (expected dd/MM/yyyy): {} - {}", sanitize(line), e);
            return None;
        }
    };
    let tourist_count: u32 = match parts[7].trim().parse() {
        Ok(n) => n,
        Err(_) => {
            tracing::warn!("Skipping tour line, invalid tourist count: {}", sanitize(line));
            return None;
        }
    };
    let booked = parts[8].trim().eq_ignore_ascii_case("true");

    match Tour::new(
        id,
        name,
        duration_label,
        price,
        homestay_id,
        departure_date,
        end_date,
        tourist_count,
        booked,
    ) {
        Ok(tour) => Some(tour),
        Err(e) => {
            tracing::warn!("Skipping tour line ({}): {}", e, sanitize(line));
            None
        }
    }
}

/// Encode a tour in the exact inverse field order, price with one decimal
/// place, booleans as TRUE/FALSE
pub fn encode_tour(tour: &Tour) -> String {
    format!(
        "{},{},{},{:.1},{},{},{},{},{}",
        tour.id,
        tour.name,
        tour.duration_label,
        tour.price_per_person,
        tour.homestay_id,
        tour.departure_date.format(DATE_FORMAT),
        tour.end_date.format(DATE_FORMAT),
        tour.tourist_count,
        encode_bool(tour.booked),
    )
}

// ---------------------------------------------------------------------------
// Booking: BookingID,FullName,TourID,BookingDate,Phone
// ---------------------------------------------------------------------------

/// Decode one booking line, or `None` for blank/header/malformed input.
/// The booking date is read as dd/MM/yyyy first, falling back to ISO
/// yyyy-MM-dd for legacy data.
pub fn decode_booking(line: &str) -> Option<Booking> {
    let line = strip_bom(line).trim();
    if line.is_empty() || line.starts_with("BookingID") {
        return None;
    }

    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() < 5 {
        tracing::warn!("Skipping booking line, expected 5 fields, got {}: {}", parts.len(), sanitize(line));
        return None;
    }

    let id = parts[0].trim();
    let customer_name = parts[1].trim();
    let tour_id = parts[2].trim();
    let date_str = parts[3].trim();
    let booking_date = match parse_date(date_str)
        .or_else(|_| NaiveDate::parse_from_str(date_str, DATE_FORMAT_ISO))
    {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!("Skipping booking line, bad booking date: {} - {}", sanitize(line), e);
            return None;
        }
    };
    let phone = parts[4].trim();

    match Booking::new(id, customer_name, tour_id, booking_date, phone) {
        Ok(booking) => Some(booking),
        Err(e) => {
            tracing::warn!("Skipping booking line ({}): {}", e, sanitize(line));
            None
        }
    }
}

pub fn encode_booking(booking: &Booking) -> String {
    format!(
        "{},{},{},{},{}",
        booking.id,
        booking.customer_name,
        booking.tour_id,
        booking.booking_date.format(DATE_FORMAT),
        booking.phone,
    )
}
