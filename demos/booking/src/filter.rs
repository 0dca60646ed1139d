//! Structured booking filters and sort orders.
//!
//! Filters can be built in code or parsed from a small expression language:
//!
//! ```text
//! hotelName eq 'Hilton' AND checkIn gte '2024-06-12'
//! guest_name has 'O''Brien'
//! ```
//!
//! Each clause is `<field> <operator> '<value>'`; a doubled quote inside the
//! value stands for one quote. Clauses are joined by `AND` (any case). Sort
//! orders are `<field> [ASC|DESC]` separated by commas.

use crate::error::BookingError;
use crate::types::{Booking, BookingId, parse_date};
use chrono::NaiveDate;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\w+)\s+(\w+)\s+'((?:[^']|'')*)'").expect("clause pattern is valid")
});

#[allow(clippy::expect_used)]
static CONJUNCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+(?i:and)\s+").expect("conjunction pattern is valid"));

/// A booking attribute that can be filtered or sorted on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// Booking id
    Id,
    /// Hotel name
    HotelName,
    /// Guest name
    GuestName,
    /// Guest email
    Email,
    /// Check-in date
    CheckIn,
    /// Check-out date
    CheckOut,
}

/// The type of value a [`Field`] holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// UUID identifier
    Id,
    /// Free text
    Text,
    /// Calendar date
    Date,
}

impl Field {
    /// The field's type
    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::Id => FieldKind::Id,
            Self::HotelName | Self::GuestName | Self::Email => FieldKind::Text,
            Self::CheckIn | Self::CheckOut => FieldKind::Date,
        }
    }

    /// The field's canonical name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::HotelName => "hotel_name",
            Self::GuestName => "guest_name",
            Self::Email => "email",
            Self::CheckIn => "check_in",
            Self::CheckOut => "check_out",
        }
    }

    fn text(self, booking: &Booking) -> Option<&str> {
        match self {
            Self::HotelName => Some(&booking.hotel_name),
            Self::GuestName => Some(&booking.guest_name),
            Self::Email => Some(&booking.email),
            Self::Id | Self::CheckIn | Self::CheckOut => None,
        }
    }

    const fn date(self, booking: &Booking) -> Option<NaiveDate> {
        match self {
            Self::CheckIn => Some(booking.check_in),
            Self::CheckOut => Some(booking.check_out),
            Self::Id | Self::HotelName | Self::GuestName | Self::Email => None,
        }
    }

    fn compare(self, a: &Booking, b: &Booking) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::HotelName => a.hotel_name.cmp(&b.hotel_name),
            Self::GuestName => a.guest_name.cmp(&b.guest_name),
            Self::Email => a.email.cmp(&b.email),
            Self::CheckIn => a.check_in.cmp(&b.check_in),
            Self::CheckOut => a.check_out.cmp(&b.check_out),
        }
    }
}

impl FromStr for Field {
    type Err = BookingError;

    /// Accepts both the `hotelName` and the `hotel_name` spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "hotelName" | "hotel_name" => Ok(Self::HotelName),
            "guestName" | "guest_name" => Ok(Self::GuestName),
            "email" => Ok(Self::Email),
            "checkIn" | "check_in" => Ok(Self::CheckIn),
            "checkOut" | "check_out" => Ok(Self::CheckOut),
            other => Err(BookingError::UnknownField(other.to_string())),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Comparison applied by a filter clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    /// Equal
    Eq,
    /// Not equal
    Neq,
    /// Text contains the value (`has` or `in`)
    Contains,
    /// Strictly after
    Gt,
    /// Strictly before
    Lt,
    /// On or after
    Gte,
    /// On or before
    Lte,
}

impl Operator {
    /// The operator's keyword
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Contains => "has",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Gte => "gte",
            Self::Lte => "lte",
        }
    }

    /// Whether the operator can be applied to fields of `kind`
    #[must_use]
    pub const fn supports(self, kind: FieldKind) -> bool {
        match kind {
            FieldKind::Id => matches!(self, Self::Eq | Self::Neq),
            FieldKind::Text => matches!(self, Self::Eq | Self::Neq | Self::Contains),
            FieldKind::Date => !matches!(self, Self::Contains),
        }
    }

    const fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering.is_eq(),
            Self::Neq => ordering.is_ne(),
            Self::Gt => ordering.is_gt(),
            Self::Lt => ordering.is_lt(),
            Self::Gte => ordering.is_ge(),
            Self::Lte => ordering.is_le(),
            Self::Contains => false,
        }
    }
}

impl FromStr for Operator {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eq" => Ok(Self::Eq),
            "neq" => Ok(Self::Neq),
            "has" | "in" => Ok(Self::Contains),
            "gt" => Ok(Self::Gt),
            "lt" => Ok(Self::Lt),
            "gte" => Ok(Self::Gte),
            "lte" => Ok(Self::Lte),
            _ => Err(BookingError::UnknownOperator(s.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Right-hand side of a filter clause, typed to match its field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterValue {
    /// Booking id
    Id(BookingId),
    /// Text
    Text(String),
    /// Date
    Date(NaiveDate),
}

impl FilterValue {
    const fn kind(&self) -> FieldKind {
        match self {
            Self::Id(_) => FieldKind::Id,
            Self::Text(_) => FieldKind::Text,
            Self::Date(_) => FieldKind::Date,
        }
    }
}

impl From<BookingId> for FilterValue {
    fn from(id: BookingId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for FilterValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

/// One `<field> <operator> <value>` condition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldFilter {
    field: Field,
    operator: Operator,
    value: FilterValue,
}

impl FieldFilter {
    /// Build a condition, checking the operator and value against the field type.
    ///
    /// # Errors
    ///
    /// [`BookingError::UnsupportedOperator`] if the operator does not apply
    /// to the field, or if the value has a different type than the field.
    pub fn new(
        field: Field,
        operator: Operator,
        value: impl Into<FilterValue>,
    ) -> Result<Self, BookingError> {
        let value = value.into();
        if !operator.supports(field.kind()) || value.kind() != field.kind() {
            return Err(BookingError::UnsupportedOperator {
                field: field.name(),
                operator: operator.keyword(),
            });
        }
        Ok(Self {
            field,
            operator,
            value,
        })
    }

    /// Parse a raw value for `field` and build the condition.
    ///
    /// # Errors
    ///
    /// Invalid id or date values, or an operator the field does not support.
    pub fn parse(field: Field, operator: Operator, raw: &str) -> Result<Self, BookingError> {
        let value = match field.kind() {
            FieldKind::Id => FilterValue::Id(raw.parse()?),
            FieldKind::Text => FilterValue::Text(raw.to_string()),
            FieldKind::Date => FilterValue::Date(parse_date(field.name(), raw)?),
        };
        Self::new(field, operator, value)
    }

    /// The field this condition reads
    #[must_use]
    pub const fn field(&self) -> Field {
        self.field
    }

    /// The comparison applied
    #[must_use]
    pub const fn operator(&self) -> Operator {
        self.operator
    }

    /// The value compared against
    #[must_use]
    pub const fn value(&self) -> &FilterValue {
        &self.value
    }

    /// Whether `booking` satisfies this condition
    #[must_use]
    pub fn matches(&self, booking: &Booking) -> bool {
        match &self.value {
            FilterValue::Id(id) => self.operator.holds(booking.id.cmp(id)),
            FilterValue::Text(expected) => {
                let Some(actual) = self.field.text(booking) else {
                    return false;
                };
                match self.operator {
                    Operator::Contains => actual.contains(expected.as_str()),
                    op => op.holds(actual.cmp(expected.as_str())),
                }
            }
            FilterValue::Date(expected) => self
                .field
                .date(booking)
                .is_some_and(|actual| self.operator.holds(actual.cmp(expected))),
        }
    }
}

impl fmt::Display for FieldFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match &self.value {
            FilterValue::Id(id) => id.to_string(),
            FilterValue::Text(text) => text.replace('\'', "''"),
            FilterValue::Date(date) => date.format("%Y-%m-%d").to_string(),
        };
        write!(f, "{} {} '{}'", self.field, self.operator, value)
    }
}

/// A conjunction of [`FieldFilter`]s. The empty filter matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookingFilter {
    clauses: Vec<FieldFilter>,
}

impl BookingFilter {
    /// A filter matching every booking
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    /// Add a condition that must also hold
    #[must_use]
    pub fn and(mut self, clause: FieldFilter) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Parse a filter expression. Blank input yields the empty filter.
    ///
    /// # Errors
    ///
    /// [`BookingError::InvalidFilter`] for malformed clauses, and the field,
    /// operator and value errors of [`FieldFilter::parse`].
    pub fn parse(expression: &str) -> Result<Self, BookingError> {
        let mut filter = Self::new();
        let mut rest = expression.trim();

        while !rest.is_empty() {
            let captures = CLAUSE
                .captures(rest)
                .ok_or_else(|| BookingError::InvalidFilter(rest.to_string()))?;

            let field: Field = captures[1].parse()?;
            let operator: Operator = captures[2].parse()?;
            let value = captures[3].replace("''", "'");
            filter = filter.and(FieldFilter::parse(field, operator, &value)?);

            rest = &rest[captures[0].len()..];
            if rest.trim().is_empty() {
                break;
            }
            let conjunction = CONJUNCTION
                .find(rest)
                .ok_or_else(|| BookingError::InvalidFilter(rest.trim().to_string()))?;
            rest = &rest[conjunction.end()..];
        }

        Ok(filter)
    }

    /// The conditions, in the order they were added
    #[must_use]
    pub fn clauses(&self) -> &[FieldFilter] {
        &self.clauses
    }

    /// Whether the filter has no conditions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Whether `booking` satisfies every condition
    #[must_use]
    pub fn matches(&self, booking: &Booking) -> bool {
        self.clauses.iter().all(|clause| clause.matches(booking))
    }
}

impl fmt::Display for BookingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" AND ")?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}

/// One key of a sort order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortField {
    /// Field to compare
    pub field: Field,
    /// Largest first when `true`
    pub descending: bool,
}

impl SortField {
    /// Sort by `field`, smallest first
    #[must_use]
    pub const fn asc(field: Field) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    /// Sort by `field`, largest first
    #[must_use]
    pub const fn desc(field: Field) -> Self {
        Self {
            field,
            descending: true,
        }
    }
}

/// Parse a sort expression such as `checkIn DESC, guestName`.
///
/// Blank input yields no sort keys.
///
/// # Errors
///
/// [`BookingError::UnknownField`] for unknown fields and
/// [`BookingError::InvalidSort`] for anything other than `ASC`/`DESC` after
/// the field name.
pub fn parse_sort(expression: &str) -> Result<Vec<SortField>, BookingError> {
    if expression.trim().is_empty() {
        return Ok(Vec::new());
    }

    expression
        .split(',')
        .map(|part| {
            let mut tokens = part.split_whitespace();
            let field: Field = tokens
                .next()
                .ok_or_else(|| BookingError::InvalidSort(expression.to_string()))?
                .parse()?;
            let descending = match tokens.next() {
                None => false,
                Some(direction) if direction.eq_ignore_ascii_case("asc") => false,
                Some(direction) if direction.eq_ignore_ascii_case("desc") => true,
                Some(_) => return Err(BookingError::InvalidSort(part.trim().to_string())),
            };
            if tokens.next().is_some() {
                return Err(BookingError::InvalidSort(part.trim().to_string()));
            }
            Ok(SortField { field, descending })
        })
        .collect()
}

/// Stable-sort `bookings` by `keys`, earlier keys taking precedence.
pub fn sort_bookings(bookings: &mut [Booking], keys: &[SortField]) {
    if keys.is_empty() {
        return;
    }
    bookings.sort_by(|a, b| {
        keys.iter()
            .map(|key| {
                let ordering = key.field.compare(a, b);
                if key.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
}
