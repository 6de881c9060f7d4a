//! Filter building blocks shared by the dashboard tables.
//!
//! A table filter is a plain struct holding the values of its controls. It
//! implements [`RecordFilter`] by AND-ing the individual checks below.

/// A predicate over one record type.
pub trait RecordFilter<T> {
    fn matches(&self, record: &T) -> bool;
}

/// Accepts every record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoFilter;

impl<T> RecordFilter<T> for NoFilter {
    fn matches(&self, _record: &T) -> bool {
        true
    }
}

/// Adapts a closure or function into a [`RecordFilter`].
#[derive(Debug, Clone, Copy)]
pub struct FnFilter<F>(pub F);

impl<T, F> RecordFilter<T> for FnFilter<F>
where
    F: Fn(&T) -> bool,
{
    fn matches(&self, record: &T) -> bool {
        (self.0)(record)
    }
}

/// Case-insensitive free-text search. A blank term matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn new(raw: &str) -> Self {
        SearchTerm(raw.trim().to_lowercase())
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the term is blank or occurs in any of `fields`.
    pub fn matches_any<'a, I>(&self, fields: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.is_blank() || fields.into_iter().any(|field| field.to_lowercase().contains(&self.0))
    }
}

/// Value of a drop-down filter. The empty option and `all` mean no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Choice {
    #[default]
    Any,
    Exactly(String),
}

impl Choice {
    pub fn from_param(raw: &str) -> Self {
        let value = raw.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            Choice::Any
        } else {
            Choice::Exactly(value.to_string())
        }
    }

    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Choice::Any => true,
            Choice::Exactly(wanted) => wanted == value,
        }
    }

    /// Like [`Choice::accepts`] for optional record fields; a missing value
    /// only passes when no choice is made.
    pub fn accepts_opt(&self, value: Option<&str>) -> bool {
        match (self, value) {
            (Choice::Any, _) => true,
            (Choice::Exactly(_), None) => false,
            (Choice::Exactly(_), Some(v)) => self.accepts(v),
        }
    }

    pub fn as_param(&self) -> &str {
        match self {
            Choice::Any => "",
            Choice::Exactly(value) => value,
        }
    }
}
