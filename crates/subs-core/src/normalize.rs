//! Input normalizer: web input → canonical records.
//!
//! Dates travel on the wire as `MM-YYYY` and are held in-process as the 1st
//! of that month. The end date is never supplied by a client; it is derived
//! from the start date and a duration in months, where a missing or
//! non-positive duration counts as one month.

use chrono::{Months, NaiveDate};

use crate::{
  Error, Result,
  input::{AddSubscription, PriceQuery, UpdateSubscription},
  subscription::{NewSubscription, PriceFilter, SubscriptionPatch},
};

// ─── Dates ───────────────────────────────────────────────────────────────────

/// Parse a strict `MM-YYYY` string into the first day of that month.
///
/// Exactly two month digits, a dash and four year digits are accepted;
/// anything else fails with [`Error::InvalidDate`].
pub fn parse_month_year(s: &str) -> Result<NaiveDate> {
  let invalid = || Error::InvalidDate(format!("{s:?} does not match MM-YYYY"));

  let (mm, yyyy) = s.split_once('-').ok_or_else(invalid)?;
  let all_digits = mm.bytes().chain(yyyy.bytes()).all(|b| b.is_ascii_digit());
  if mm.len() != 2 || yyyy.len() != 4 || !all_digits {
    return Err(invalid());
  }

  let month: u32 = mm.parse().map_err(|_| invalid())?;
  let year: i32 = yyyy.parse().map_err(|_| invalid())?;
  NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
}

/// The duration actually applied: `month` if positive, else 1.
pub fn effective_duration(month: i32) -> u32 {
  u32::try_from(month).ok().filter(|m| *m > 0).unwrap_or(1)
}

/// `start` advanced by `months` calendar months.
pub fn end_date(start: NaiveDate, months: u32) -> Result<NaiveDate> {
  start.checked_add_months(Months::new(months)).ok_or_else(|| {
    Error::InvalidDate(format!("{start} plus {months} months is out of range"))
  })
}

fn date_range(start_date: &str, month: i32) -> Result<(NaiveDate, NaiveDate)> {
  let start = parse_month_year(start_date)?;
  let end = end_date(start, effective_duration(month))?;
  Ok((start, end))
}

fn check_price(price: i64) -> Result<()> {
  if price < 0 {
    return Err(Error::InvalidArgument(format!(
      "price must not be negative: {price}"
    )));
  }
  Ok(())
}

fn non_empty(s: String) -> Option<String> {
  if s.is_empty() { None } else { Some(s) }
}

// ─── Normalizers ─────────────────────────────────────────────────────────────

/// Turn a create request into a [`NewSubscription`], deriving `end_date`.
pub fn normalize_create(input: AddSubscription) -> Result<NewSubscription> {
  if input.service_name.is_empty() {
    return Err(Error::MissingField("service_name"));
  }
  if input.user_id.is_empty() {
    return Err(Error::MissingField("user_id"));
  }
  check_price(input.price)?;

  let (start_date, end_date) = date_range(&input.start_date, input.month)?;

  Ok(NewSubscription {
    service_name: input.service_name,
    price: input.price,
    user_id: input.user_id,
    start_date,
    end_date,
  })
}

/// Turn an update request into a [`SubscriptionPatch`].
///
/// Zero price and empty strings become `None`. Both dates are set together or
/// not at all: an empty `start_date` leaves the stored range alone.
pub fn normalize_update(input: UpdateSubscription) -> Result<SubscriptionPatch> {
  check_price(input.price)?;

  let (start_date, end_date) = if input.start_date.is_empty() {
    (None, None)
  } else {
    let (start, end) = date_range(&input.start_date, input.month)?;
    (Some(start), Some(end))
  };

  Ok(SubscriptionPatch {
    id: input.id,
    service_name: non_empty(input.service_name),
    price: (input.price != 0).then_some(input.price),
    user_id: non_empty(input.user_id),
    start_date,
    end_date,
  })
}

/// Turn the aggregation query string into a [`PriceFilter`]. All four values
/// are required.
pub fn normalize_filter(input: PriceQuery) -> Result<PriceFilter> {
  for (name, value) in [
    ("serv", &input.serv),
    ("uuid", &input.uuid),
    ("sdate", &input.sdate),
    ("edate", &input.edate),
  ] {
    if value.is_empty() {
      return Err(Error::MissingField(name));
    }
  }

  Ok(PriceFilter {
    start_date:   parse_month_year(&input.sdate)?,
    end_date:     parse_month_year(&input.edate)?,
    service_name: input.serv,
    user_id:      input.uuid,
  })
}
