//! Property tests for the sanitizer, the search grammar and sync planning.

use pg_table_browser::catalog::{BridgeCandidate, BridgeForeignKey, ForeignKey, PrimaryKeys};
use pg_table_browser::sync::{plan_many_to_many, plan_one_to_many};
use pg_table_browser::{
    build_condition, is_valid_identifier, sanitize_identifier, tokenize_search, BrowserConfig,
    ManyToManyRelation, OneToManyRelation, SearchToken,
};
use proptest::prelude::*;

fn bridge_fk(column: &str, table: String) -> BridgeForeignKey {
    BridgeForeignKey {
        constraint_name: format!("{}_fkey", column),
        column_name: column.to_string(),
        foreign_table: table,
        foreign_column: "id".to_string(),
    }
}

fn matches_identifier_regex(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

proptest! {
    #[test]
    fn sanitizer_agrees_with_regex(s in "\\PC{0,16}") {
        prop_assert_eq!(is_valid_identifier(&s), matches_identifier_regex(&s));
    }

    #[test]
    fn sanitizer_accepts_generated_identifiers(s in "[A-Za-z_][A-Za-z0-9_]{0,30}") {
        prop_assert_eq!(sanitize_identifier(&s), Ok(s.as_str()));
    }

    #[test]
    fn tokenizer_never_panics(s in "\\PC{0,64}") {
        let _ = tokenize_search(&s);
    }

    #[test]
    fn tokenizer_handles_grammar_soup(
        parts in prop::collection::vec(
            prop_oneof![
                Just("AND".to_string()),
                Just("or".to_string()),
                Just("!=".to_string()),
                Just("\"\"".to_string()),
                Just("'".to_string()),
                Just("*".to_string()),
                "[a-z*]{1,6}",
            ],
            0..12,
        )
    ) {
        let input = parts.join(" ");
        let tokens = tokenize_search(&input);
        for token in &tokens {
            if let Some(value) = token.value() {
                prop_assert!(!value.contains(char::is_whitespace));
            }
        }
    }

    #[test]
    fn bound_values_are_wrapped_in_percent(s in "\\PC{0,40}") {
        let tokens = tokenize_search(&s);
        let cond = build_condition("\"c\"", &tokens, 1);
        prop_assert_eq!(cond.next_index, 1 + cond.params.len());
        for param in &cond.params {
            let text = param.as_str().unwrap_or_default();
            prop_assert!(text.starts_with('%') && text.ends_with('%'));
            prop_assert!(!text[1..text.len() - 1].contains('*'));
        }
        let expected = tokens
            .iter()
            .filter(|t| matches!(t, SearchToken::Include(v) | SearchToken::Exclude(v) if !v.is_empty()))
            .count();
        prop_assert_eq!(cond.params.len(), expected);
    }

    #[test]
    fn one_to_many_sync_is_idempotent(
        edges in prop::collection::vec((0usize..5, 0usize..5, 0usize..3), 0..12),
        pk_widths in prop::collection::vec(0usize..3, 5),
    ) {
        let table = |i: usize| format!("t{}", i);
        let fks: Vec<ForeignKey> = edges
            .iter()
            .map(|(s, t, c)| {
                ForeignKey::new(
                    format!("fk_{}_{}_{}", s, t, c),
                    table(*s),
                    format!("ref{}_id", c),
                    table(*t),
                    "id",
                )
            })
            .collect();
        let primary_keys: PrimaryKeys = pk_widths
            .iter()
            .enumerate()
            .filter(|(_, w)| **w > 0)
            .map(|(i, w)| (table(i), (0..*w).map(|k| format!("k{}", k)).collect()))
            .collect();

        let (first, _) = plan_one_to_many(&fks, &primary_keys, &[]);
        let persisted: Vec<OneToManyRelation> = first
            .to_insert
            .iter()
            .enumerate()
            .map(|(i, key)| OneToManyRelation::from(key.clone()).with_id(i as i64 + 1))
            .collect();

        let (second, _) = plan_one_to_many(&fks, &primary_keys, &persisted);
        prop_assert!(second.is_empty());
        prop_assert_eq!(second.unchanged, persisted.len());
    }

    #[test]
    fn many_to_many_sync_is_idempotent(
        tables in prop::collection::vec(
            (0usize..4, 0usize..4, any::<bool>(), any::<bool>(), 2i64..9),
            0..10,
        ),
    ) {
        let config = BrowserConfig::default();
        let candidates: Vec<BridgeCandidate> = tables
            .iter()
            .enumerate()
            .map(|(i, (a, b, marked, keyed, column_count))| BridgeCandidate {
                table_name: if *marked {
                    format!("b{}_relation", i)
                } else {
                    format!("b{}_pairs", i)
                },
                foreign_keys: vec![
                    bridge_fk("left_id", format!("t{}", a)),
                    bridge_fk("right_id", format!("t{}", b)),
                ],
                column_count: *column_count,
                primary_key: if *keyed {
                    vec!["left_id".to_string(), "right_id".to_string()]
                } else {
                    vec!["id".to_string()]
                },
            })
            .collect();

        let (first, skipped) = plan_many_to_many(&candidates, &config, &[]);
        prop_assert_eq!(first.to_insert.len() + skipped.len(), candidates.len());
        let persisted: Vec<ManyToManyRelation> = first
            .to_insert
            .iter()
            .enumerate()
            .map(|(i, key)| ManyToManyRelation::new(key.clone()).with_id(i as i64 + 1))
            .collect();

        let (second, _) = plan_many_to_many(&candidates, &config, &persisted);
        prop_assert!(second.is_empty());
        prop_assert_eq!(second.unchanged, persisted.len());
    }
}
