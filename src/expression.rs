//! Cron expression parsing and field matching.

use crate::error::{CronError, CronResult};
use crate::tick;
use chrono::{DateTime, Datelike, Timelike, Utc};

/// Named shorthands, expanded to canonical expressions before tokenizing.
const ALIASES: [(&str, &str); 8] = [
    ("@midnight", "0 0 * * *"),
    ("@yearly", "0 0 1 1 *"),
    ("@annually", "0 0 1 1 *"),
    ("@monthly", "0 0 1 * *"),
    ("@weekly", "0 0 * * 0"),
    ("@daily", "0 0 * * *"),
    ("@hourly", "0 * * * *"),
    ("@minutely", "* * * * *"),
];

/// Alias names that are recognized but have no expansion.
const RESERVED_ALIASES: [&str; 2] = ["@boot", "@wakeup"];

/// One schedule field: the wildcard or a fixed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CronField {
    /// Matches any value (`*`)
    Any,

    /// Matches exactly one value
    Value(u32),
}

impl CronField {
    /// Check whether a concrete time component satisfies this field.
    pub fn matches(self, value: u32) -> bool {
        match self {
            CronField::Any => true,
            CronField::Value(v) => v == value,
        }
    }
}

/// Parsed cron expression.
///
/// Five whitespace-separated fields: minute (0-59), hour (0-23), day of
/// month (1-31), month (1-12), day of week (0-6, 0 = Monday). Each field is
/// either a bare integer or the `*` wildcard. Ranges (`1-5`), steps (`*/5`)
/// and comma lists (`1,5`) are not supported; register one job per concrete
/// schedule instead.
///
/// # Examples
///
/// ```
/// use cronloop::CronExpression;
///
/// // Every day at 03:30
/// let expr = CronExpression::parse("30 3 * * *").unwrap();
///
/// // Aliases expand to canonical expressions
/// let daily = CronExpression::parse("@daily").unwrap();
/// assert_eq!(daily.expression(), "0 0 * * *");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronExpression {
    pub(crate) minute: CronField,
    pub(crate) hour: CronField,
    pub(crate) day_of_month: CronField,
    pub(crate) month: CronField,
    pub(crate) day_of_week: CronField,
    expression: String,
}

impl CronExpression {
    /// Parse a cron expression or alias.
    ///
    /// Fails with [`CronError::FieldCountMismatch`] unless exactly 5 fields
    /// are present, and with [`CronError::InvalidField`] for any token that
    /// is not a bare in-range integer or `*`. A fixed day/month pair that
    /// can never occur on a calendar (e.g. day 31 in February) is rejected
    /// here so the next-tick search cannot loop without bound.
    pub fn parse(expression: &str) -> CronResult<Self> {
        let trimmed = expression.trim();
        if RESERVED_ALIASES.contains(&trimmed) {
            return Err(CronError::ReservedAlias(trimmed.to_string()));
        }
        let expanded = ALIASES
            .iter()
            .find(|&&(alias, _)| alias == trimmed)
            .map_or(trimmed, |&(_, canonical)| canonical);

        let tokens: Vec<&str> = expanded.split_whitespace().collect();
        if tokens.len() != 5 {
            return Err(CronError::FieldCountMismatch {
                expression: expanded.to_string(),
                found: tokens.len(),
            });
        }

        let minute = parse_field(tokens[0], 0, 59)?;
        let hour = parse_field(tokens[1], 0, 23)?;
        let day_of_month = parse_field(tokens[2], 1, 31)?;
        let month = parse_field(tokens[3], 1, 12)?;
        let day_of_week = parse_field(tokens[4], 0, 6)?;

        if let (CronField::Value(day), CronField::Value(month)) = (day_of_month, month)
            && day > max_days_in_month(month)
        {
            return Err(CronError::InvalidField {
                field: tokens[2].to_string(),
                reason: format!("day {day} never occurs in month {month}"),
            });
        }

        Ok(Self {
            minute,
            hour,
            day_of_month,
            month,
            day_of_week,
            expression: expanded.to_string(),
        })
    }

    /// Earliest instant strictly after `now` that satisfies every
    /// non-wildcard field.
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        tick::next_tick(self, now)
    }

    /// Check whether an instant satisfies every non-wildcard field.
    pub fn matches(&self, tick: DateTime<Utc>) -> bool {
        self.minute.matches(tick.minute())
            && self.hour.matches(tick.hour())
            && self.day_of_month.matches(tick.day())
            && self.month.matches(tick.month())
            && self.day_of_week.matches(tick.weekday().num_days_from_monday())
    }

    /// The canonical expression string (aliases expanded).
    pub fn expression(&self) -> &str {
        &self.expression
    }
}

impl std::fmt::Display for CronExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.expression)
    }
}

fn parse_field(token: &str, min: u32, max: u32) -> CronResult<CronField> {
    if token == "*" {
        return Ok(CronField::Any);
    }
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return Err(CronError::InvalidField {
            field: token.to_string(),
            reason: "only digits or '*' are supported (no ranges, steps, or lists)".to_string(),
        });
    }
    let value: u32 = token.parse().map_err(|_| CronError::InvalidField {
        field: token.to_string(),
        reason: "value does not fit in a cron field".to_string(),
    })?;
    if value < min || value > max {
        return Err(CronError::InvalidField {
            field: token.to_string(),
            reason: format!("value must be in {min}..={max}"),
        });
    }
    Ok(CronField::Value(value))
}

/// Largest day-of-month that can ever occur in `month` (Feb caps at 29).
fn max_days_in_month(month: u32) -> u32 {
    match month {
        2 => 29,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}
