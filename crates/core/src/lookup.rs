//! Flexible lookup: OR-combined, case-insensitive substring matching over a
//! fixed set of fields.
//!
//! A [`QueryTemplate`] names the terms; a [`MatchPolicy`] says how terms
//! are compared. The same template can be evaluated in memory with
//! [`match_records`] or pushed down to Postgres with [`ilike_predicate`].

use serde::Deserialize;

/// Fields a [`QueryTemplate`] can search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupField {
    Username,
    Email,
}

impl LookupField {
    pub const ALL: [LookupField; 2] = [LookupField::Username, LookupField::Email];

    /// Column / JSON field name.
    pub fn name(self) -> &'static str {
        match self {
            LookupField::Username => "username",
            LookupField::Email => "email",
        }
    }
}

/// Partial template for a flexible lookup. Unset and empty terms are excluded
/// from matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QueryTemplate {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl QueryTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_username(mut self, term: impl Into<String>) -> Self {
        self.username = Some(term.into());
        self
    }

    pub fn with_email(mut self, term: impl Into<String>) -> Self {
        self.email = Some(term.into());
        self
    }

    /// The populated term for a field, if any.
    pub fn term(&self, field: LookupField) -> Option<&str> {
        let term = match field {
            LookupField::Username => self.username.as_deref(),
            LookupField::Email => self.email.as_deref(),
        };
        term.filter(|p| !p.is_empty())
    }

    /// Populated `(field, term)` pairs in field order.
    pub fn populated(&self) -> impl Iterator<Item = (LookupField, &str)> + '_ {
        LookupField::ALL
            .into_iter()
            .filter_map(move |field| self.term(field).map(|p| (field, p)))
    }

    pub fn is_empty(&self) -> bool {
        self.populated().next().is_none()
    }
}

/// Records that expose the lookup fields.
pub trait Matchable {
    fn lookup_value(&self, field: LookupField) -> Option<&str>;
}

impl<T: Matchable + ?Sized> Matchable for &T {
    fn lookup_value(&self, field: LookupField) -> Option<&str> {
        (**self).lookup_value(field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringMatcher {
    /// Term appears anywhere in the value.
    Contains,
    /// Term equals the value.
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// A record matches if any populated term hits.
    Any,
    /// A record matches only if every populated term hits.
    All,
}

/// How template terms are compared against record values.
///
/// The default is the lookup policy used by the API: substring containment,
/// case-insensitive, OR across populated fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPolicy {
    pub matcher: StringMatcher,
    pub ignore_case: bool,
    pub combinator: Combinator,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            matcher: StringMatcher::Contains,
            ignore_case: true,
            combinator: Combinator::Any,
        }
    }
}

impl MatchPolicy {
    /// Whether a record satisfies the template. An empty template matches
    /// every record.
    pub fn matches<R: Matchable + ?Sized>(&self, record: &R, template: &QueryTemplate) -> bool {
        if template.is_empty() {
            return true;
        }
        let mut hits = template
            .populated()
            .map(|(field, term)| self.hit(record.lookup_value(field), term));
        match self.combinator {
            Combinator::Any => hits.any(|hit| hit),
            Combinator::All => hits.all(|hit| hit),
        }
    }

    fn hit(&self, value: Option<&str>, term: &str) -> bool {
        let Some(value) = value else {
            return false;
        };
        if self.ignore_case {
            let value = value.to_lowercase();
            let term = term.to_lowercase();
            self.compare(&value, &term)
        } else {
            self.compare(value, term)
        }
    }

    fn compare(&self, value: &str, term: &str) -> bool {
        match self.matcher {
            StringMatcher::Contains => value.contains(term),
            StringMatcher::Exact => value == term,
        }
    }
}

/// Filter records by template, preserving input order.
///
/// An empty template returns the full collection. A template that matches
/// nothing returns an empty vector; that is a successful lookup, not a miss.
pub fn match_records<R, I>(records: I, template: &QueryTemplate, policy: &MatchPolicy) -> Vec<R>
where
    R: Matchable,
    I: IntoIterator<Item = R>,
{
    if template.is_empty() {
        tracing::debug!("Empty lookup template, returning all records");
    }
    records
        .into_iter()
        .filter(|record| policy.matches(record, template))
        .collect()
}

/// A SQL `WHERE` fragment with its positional bind values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlPredicate {
    pub clause: String,
    pub binds: Vec<String>,
}

/// Translate a template under the default policy into an `ILIKE` predicate.
///
/// Placeholders are numbered from `first_param`. Returns `None` for an empty
/// template, in which case the caller applies no filter. `%`, `_` and `\` in
/// terms are escaped so they match literally.
pub fn ilike_predicate(template: &QueryTemplate, first_param: usize) -> Option<SqlPredicate> {
    let mut clauses = Vec::new();
    let mut binds = Vec::new();

    for (offset, (field, term)) in template.populated().enumerate() {
        clauses.push(format!("{} ILIKE ${}", field.name(), first_param + offset));
        binds.push(format!("%{}%", escape_like(term)));
    }

    if clauses.is_empty() {
        None
    } else {
        Some(SqlPredicate {
            clause: format!("({})", clauses.join(" OR ")),
            binds,
        })
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        username: &'static str,
        email: &'static str,
    }

    impl Matchable for Row {
        fn lookup_value(&self, field: LookupField) -> Option<&str> {
            match field {
                LookupField::Username => Some(self.username),
                LookupField::Email => Some(self.email),
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                username: "sgsakthi",
                email: "sgsakthi1992@gmail.com",
            },
            Row {
                username: "employee1",
                email: "emp1@yahoo.com",
            },
            Row {
                username: "jdoe",
                email: "John.Doe@Example.org",
            },
        ]
    }

    #[test]
    fn username_substring_matches_case_insensitively() {
        let template = QueryTemplate::new().with_username("SAKTHI");
        let found = match_records(rows(), &template, &MatchPolicy::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].username, "sgsakthi");
    }

    #[test]
    fn no_hit_is_empty_not_error() {
        let template = QueryTemplate::new().with_username("zzz");
        let found = match_records(rows(), &template, &MatchPolicy::default());
        assert!(found.is_empty());
    }

    #[test]
    fn populated_fields_are_or_combined() {
        let template = QueryTemplate::new()
            .with_username("sakthi")
            .with_email("example.org");
        let found = match_records(rows(), &template, &MatchPolicy::default());
        let names: Vec<&str> = found.iter().map(|r| r.username).collect();
        assert_eq!(names, vec!["sgsakthi", "jdoe"]);
    }

    #[test]
    fn empty_term_is_excluded() {
        let template = QueryTemplate::new().with_username("").with_email("yahoo");
        let found = match_records(rows(), &template, &MatchPolicy::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].username, "employee1");
    }

    #[test]
    fn empty_template_returns_everything_in_order() {
        let found = match_records(rows(), &QueryTemplate::new(), &MatchPolicy::default());
        assert_eq!(found, rows());
    }

    #[test]
    fn all_combinator_requires_every_term() {
        let policy = MatchPolicy {
            combinator: Combinator::All,
            ..MatchPolicy::default()
        };
        let template = QueryTemplate::new()
            .with_username("sakthi")
            .with_email("yahoo");
        assert!(match_records(rows(), &template, &policy).is_empty());
    }

    #[test]
    fn exact_case_sensitive_policy() {
        let policy = MatchPolicy {
            matcher: StringMatcher::Exact,
            ignore_case: false,
            combinator: Combinator::Any,
        };
        let hit = QueryTemplate::new().with_email("John.Doe@Example.org");
        let miss = QueryTemplate::new().with_email("john.doe@example.org");
        assert_eq!(match_records(rows(), &hit, &policy).len(), 1);
        assert!(match_records(rows(), &miss, &policy).is_empty());
    }

    #[test]
    fn matching_borrowed_records() {
        let rows = rows();
        let template = QueryTemplate::new().with_email("GMAIL");
        let found: Vec<&Row> = match_records(&rows, &template, &MatchPolicy::default());
        assert_eq!(found, vec![&rows[0]]);
    }

    #[test]
    fn ilike_predicate_numbers_placeholders_and_escapes() {
        let template = QueryTemplate::new()
            .with_username("50%_off")
            .with_email("gmail");
        let predicate = ilike_predicate(&template, 1).unwrap();
        assert_eq!(predicate.clause, "(username ILIKE $1 OR email ILIKE $2)");
        assert_eq!(predicate.binds, vec![r"%50\%\_off%", "%gmail%"]);
    }

    #[test]
    fn ilike_predicate_skips_unset_fields() {
        let template = QueryTemplate::new().with_email("gmail");
        let predicate = ilike_predicate(&template, 3).unwrap();
        assert_eq!(predicate.clause, "(email ILIKE $3)");
        assert!(ilike_predicate(&QueryTemplate::new(), 1).is_none());
    }
}
