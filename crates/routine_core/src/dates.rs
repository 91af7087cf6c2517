use crate::error::AppError;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

const DATE_LEN: usize = "YYYY-MM-DD".len();

/// Today's date in the local timezone, as `YYYY-MM-DD`.
pub fn today() -> Result<String, AppError> {
    format_date(today_local())
}

fn today_local() -> Date {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetDateTime::now_utc().to_offset(offset).date()
}

pub fn format_date(date: Date) -> Result<String, AppError> {
    date.format(format_description!("[year]-[month]-[day]"))
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

/// Validates a user supplied `YYYY-MM-DD` date and returns it trimmed.
///
/// Month and day must be zero padded and the date must exist on the calendar.
pub fn parse_date(input: &str) -> Result<String, AppError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("date is required"));
    }

    let well_shaped = trimmed.len() == DATE_LEN
        && trimmed
            .bytes()
            .enumerate()
            .all(|(index, byte)| match index {
                4 | 7 => byte == b'-',
                _ => byte.is_ascii_digit(),
            });
    if !well_shaped {
        return Err(AppError::invalid_input("date must be YYYY-MM-DD"));
    }

    let parsed = Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
        .map_err(|_| AppError::invalid_input("date must be YYYY-MM-DD"))?;
    format_date(parsed)
}

#[cfg(test)]
mod tests {
    use super::{parse_date, today};

    #[test]
    fn parse_date_accepts_padded_dates() {
        assert_eq!(parse_date("2025-06-01").unwrap(), "2025-06-01");
        assert_eq!(parse_date("  2024-02-29 ").unwrap(), "2024-02-29");
    }

    #[test]
    fn parse_date_rejects_unpadded_and_impossible_dates() {
        for input in ["2025-01-1", "2025-1-01", "2025-13-01", "2025-02-30", "01/06/2025", ""] {
            let err = parse_date(input).unwrap_err();
            assert_eq!(err.code(), "invalid_input", "input {input:?}");
        }
    }

    #[test]
    fn today_is_a_valid_date() {
        let value = today().unwrap();
        assert_eq!(parse_date(&value).unwrap(), value);
    }
}
