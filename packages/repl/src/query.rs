//! Data query clause parsing.
//!
//! A data query is a filter expression, optionally preceded by a directive
//! and the clause separator:
//!
//! ```text
//! qty > 3
//! select id, name | qty > 3
//! count | qty > 3
//! ```

use dsvq_store::column;
use dsvq_store::{ColumnDescriptor, SelectionMask};

/// Separates a directive from the filter expression.
pub const CLAUSE_SEPARATOR: char = '|';

/// A data query ready to hand to the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub selection: SelectionMask,
    pub count_mode: bool,
    pub filter: String,
}

/// Why a data query was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryRejection {
    /// No clauses, or more than two.
    #[error("malformed query: expected '[select <columns> | count] | <filter>'")]
    Malformed,

    /// The directive is neither `select` nor `count`.
    #[error("unknown directive '{0}'")]
    UnknownDirective(String),

    #[error("Error - Invalid column: [{0}]")]
    InvalidColumn(String),
}

impl QueryRejection {
    /// Structural rejections re-prompt without a message.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            QueryRejection::Malformed | QueryRejection::UnknownDirective(_)
        )
    }
}

/// Split `text` into its directive and filter.
///
/// `selection` is the mask to use when the query does not narrow it; it is
/// never modified, so a rejected query leaves the caller's mask intact.
pub fn parse(
    text: &str,
    columns: &[ColumnDescriptor],
    selection: &SelectionMask,
) -> Result<ParsedQuery, QueryRejection> {
    let segments: Vec<&str> = text
        .split(CLAUSE_SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect();

    match segments.as_slice() {
        [filter] => Ok(ParsedQuery {
            selection: selection.clone(),
            count_mode: false,
            filter: filter.to_string(),
        }),
        [directive, filter] => {
            let (keyword, rest) = split_keyword(directive);

            if keyword.eq_ignore_ascii_case("select") {
                Ok(ParsedQuery {
                    selection: select(rest, columns)?,
                    count_mode: false,
                    filter: filter.to_string(),
                })
            } else if keyword.eq_ignore_ascii_case("count") {
                Ok(ParsedQuery {
                    selection: selection.clone(),
                    count_mode: true,
                    filter: filter.to_string(),
                })
            } else {
                Err(QueryRejection::UnknownDirective(keyword.to_string()))
            }
        }
        _ => Err(QueryRejection::Malformed),
    }
}

/// Split the first word of a directive from the rest. A comma ends the
/// word as well, so `select,a` is still a select.
fn split_keyword(directive: &str) -> (&str, &str) {
    match directive.find(|c: char| c.is_whitespace() || c == ',') {
        Some(end) => (&directive[..end], &directive[end..]),
        None => (directive, ""),
    }
}

fn select(list: &str, columns: &[ColumnDescriptor]) -> Result<SelectionMask, QueryRejection> {
    let mut mask = SelectionMask::none(columns.len());

    for token in list
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
    {
        let index = column::resolve(columns, token)
            .ok_or_else(|| QueryRejection::InvalidColumn(token.to_string()))?;
        mask.select(index);
    }

    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<ColumnDescriptor> {
        ["a_n", "b_s", "c_n"]
            .iter()
            .map(|cell| ColumnDescriptor::from_header(cell))
            .collect()
    }

    fn parse_default(text: &str) -> Result<ParsedQuery, QueryRejection> {
        parse(text, &columns(), &SelectionMask::all(3))
    }

    #[test]
    fn test_plain_filter() {
        let parsed = parse_default("a > 1").unwrap();
        assert_eq!(parsed.filter, "a > 1");
        assert!(!parsed.count_mode);
        assert_eq!(parsed.selection, SelectionMask::all(3));
    }

    #[test]
    fn test_select_columns() {
        let parsed = parse_default("select a,b | a > 1").unwrap();
        assert_eq!(parsed.selection.as_slice(), &[true, true, false]);
        assert_eq!(parsed.filter, "a > 1");
    }

    #[test]
    fn test_select_ignores_case_and_spacing() {
        let parsed = parse_default("SELECT  A ,  B| a > 1").unwrap();
        assert_eq!(parsed.selection.as_slice(), &[true, true, false]);

        let parsed = parse_default("select c b|a > 1").unwrap();
        assert_eq!(parsed.selection.as_slice(), &[false, true, true]);
    }

    #[test]
    fn test_select_duplicate_is_idempotent() {
        let parsed = parse_default("select a, a, A | a > 1").unwrap();
        assert_eq!(parsed.selection.as_slice(), &[true, false, false]);
    }

    #[test]
    fn test_select_unknown_column() {
        let mask = SelectionMask::all(3);
        let err = parse("select a, x | a > 1", &columns(), &mask).unwrap_err();
        assert_eq!(err, QueryRejection::InvalidColumn("x".to_string()));
        assert!(!err.is_silent());
        assert_eq!(mask, SelectionMask::all(3));
    }

    #[test]
    fn test_select_suffixed_name_is_unknown() {
        let err = parse_default("select a_n | a > 1").unwrap_err();
        assert_eq!(err, QueryRejection::InvalidColumn("a_n".to_string()));
    }

    #[test]
    fn test_select_without_columns_selects_nothing() {
        let parsed = parse_default("select | a > 1").unwrap();
        assert_eq!(parsed.selection.as_slice(), &[false, false, false]);
        assert!(!parsed.count_mode);
        assert_eq!(parsed.filter, "a > 1");
    }

    #[test]
    fn test_count_mode() {
        let parsed = parse_default("Count | b == 'x'").unwrap();
        assert!(parsed.count_mode);
        assert_eq!(parsed.selection, SelectionMask::all(3));
        assert_eq!(parsed.filter, "b == 'x'");
    }

    #[test]
    fn test_empty_segments_are_dropped() {
        let parsed = parse_default("| count || a > 1 |").unwrap();
        assert!(parsed.count_mode);
        assert_eq!(parsed.filter, "a > 1");
    }

    #[test]
    fn test_clause_count_limits() {
        assert_eq!(parse_default("").unwrap_err(), QueryRejection::Malformed);
        assert_eq!(parse_default(" | ").unwrap_err(), QueryRejection::Malformed);
        assert_eq!(
            parse_default("select a | count | a > 1").unwrap_err(),
            QueryRejection::Malformed
        );
    }

    #[test]
    fn test_unknown_directive_is_silent() {
        let err = parse_default("a == 5 | b == b").unwrap_err();
        assert_eq!(err, QueryRejection::UnknownDirective("a".to_string()));
        assert!(err.is_silent());
    }

    #[test]
    fn test_selection_keyword_must_be_whole_word() {
        let err = parse_default("selection a | a > 1").unwrap_err();
        assert!(matches!(err, QueryRejection::UnknownDirective(_)));
    }
}
