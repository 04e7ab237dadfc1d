//! Static entity model: the two casting-agency resources and their field
//! rules, resolved at runtime by URL path segment.

/// Per-field validation rule. Every rule is checked and failures accumulate;
/// see [`crate::service::RecordValidator`].
#[derive(Debug)]
pub struct FieldRule {
    pub required: bool,
    /// Regex the trimmed value must match when present.
    pub pattern: Option<&'static str>,
    /// Enumerated choices; multi-selects arrive comma-joined and every token
    /// must be a member.
    pub allowed: Option<&'static [&'static str]>,
    /// Value must be a well-formed URL when present.
    pub url: bool,
}

impl FieldRule {
    const fn required() -> Self {
        FieldRule { required: true, pattern: None, allowed: None, url: false }
    }

    const fn optional() -> Self {
        FieldRule { required: false, pattern: None, allowed: None, url: false }
    }
}

#[derive(Debug)]
pub struct FieldDef {
    pub name: &'static str,
    pub rule: FieldRule,
}

/// One resource: table, URL names, and field set. The `id` column is implied
/// and never listed in `fields`.
#[derive(Debug)]
pub struct EntityDef {
    /// URL path segment and plural response key, e.g. "actors".
    pub path_segment: &'static str,
    /// Singular response key, e.g. "actor".
    pub singular: &'static str,
    /// Display label for pages and messages, e.g. "Actor".
    pub label: &'static str,
    pub table_name: &'static str,
    /// Column whose value names a record in messages.
    pub display_column: &'static str,
    /// Column searched by the substring filter.
    pub search_column: &'static str,
    pub fields: &'static [FieldDef],
}

impl EntityDef {
    /// Key used in the delete acknowledgment, e.g. "actor_id".
    pub fn id_key(&self) -> String {
        format!("{}_id", self.singular)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }
}

/// Digits with optional sign characters; ages are stored as free-form text.
pub const AGE_PATTERN: &str = r"^[0-9\-\+]+$";

pub const GENDER_CHOICES: &[&str] = &["Male", "Female", "Other"];

pub static ACTOR: EntityDef = EntityDef {
    path_segment: "actors",
    singular: "actor",
    label: "Actor",
    table_name: "actors",
    display_column: "name",
    search_column: "name",
    fields: &[
        FieldDef { name: "name", rule: FieldRule::required() },
        FieldDef {
            name: "age",
            rule: FieldRule { pattern: Some(AGE_PATTERN), ..FieldRule::required() },
        },
        FieldDef {
            name: "gender",
            rule: FieldRule { allowed: Some(GENDER_CHOICES), ..FieldRule::required() },
        },
        FieldDef {
            name: "image_link",
            rule: FieldRule { url: true, ..FieldRule::optional() },
        },
    ],
};

pub static MOVIE: EntityDef = EntityDef {
    path_segment: "movies",
    singular: "movie",
    label: "Movie",
    table_name: "movies",
    display_column: "title",
    search_column: "title",
    fields: &[
        FieldDef { name: "title", rule: FieldRule::required() },
        FieldDef { name: "release_date", rule: FieldRule::required() },
        FieldDef {
            name: "image_link",
            rule: FieldRule { url: true, ..FieldRule::optional() },
        },
    ],
};

pub static ALL: &[&EntityDef] = &[&ACTOR, &MOVIE];

/// Resolve a resource by its URL path segment.
pub fn entity_by_path(path: &str) -> Option<&'static EntityDef> {
    ALL.iter().find(|e| e.path_segment == path).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_path_segments() {
        assert_eq!(entity_by_path("actors").map(|e| e.table_name), Some("actors"));
        assert_eq!(entity_by_path("movies").map(|e| e.singular), Some("movie"));
        assert!(entity_by_path("directors").is_none());
    }

    #[test]
    fn id_key_is_singular_with_suffix() {
        assert_eq!(ACTOR.id_key(), "actor_id");
        assert_eq!(MOVIE.id_key(), "movie_id");
    }

    #[test]
    fn search_columns_are_the_primary_text_fields() {
        assert_eq!(ACTOR.search_column, "name");
        assert_eq!(MOVIE.search_column, "title");
    }
}
