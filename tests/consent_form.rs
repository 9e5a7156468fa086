use port_flow::{
    consent::build_consent_form,
    flow::empty_result_set,
    model::{DataFrame, NamedTables, Translatable},
};

fn mk_tables(keys: &[&str]) -> NamedTables {
    let mut tables = NamedTables::new();
    for key in keys {
        tables.insert(
            key,
            Translatable::new(*key, *key),
            DataFrame::single_column("Value", vec!["x".to_string()]),
        );
    }
    tables
}

#[test]
fn keys_are_prefixed_with_platform_name() {
    let tables = mk_tables(&["interests", "account_created_at"]);
    let form = build_consent_form("Twitter", &tables);

    let keys: Vec<_> = form.tables.iter().map(|t| t.key.as_str()).collect();
    assert_eq!(keys, vec!["Twitter_interests", "Twitter_account_created_at"]);
}

#[test]
fn entry_order_follows_table_order() {
    let tables = mk_tables(&["c", "a", "b"]);
    let form = build_consent_form("Instagram", &tables);

    let keys: Vec<_> = form.tables.iter().map(|t| t.key.as_str()).collect();
    assert_eq!(keys, vec!["Instagram_c", "Instagram_a", "Instagram_b"]);
}

#[test]
fn titles_and_data_carry_over() {
    let mut tables = NamedTables::new();
    tables.insert(
        "interests",
        Translatable::new("Your interests", "Jouw interesses"),
        DataFrame::single_column("Interests", vec!["rust".to_string(), "music".to_string()]),
    );
    let form = build_consent_form("Twitter", &tables);

    assert_eq!(form.tables[0].title.en, "Your interests");
    assert_eq!(form.tables[0].data.rows.len(), 2);
}

#[test]
fn empty_result_set_builds_single_placeholder() {
    let tables = empty_result_set();
    assert_eq!(tables.len(), 1);

    let record = tables.get("empty").expect("empty table present");
    assert_eq!(record.data.rows, vec![vec!["No data found".to_string()]]);

    let form = build_consent_form("YouTube", &tables);
    assert_eq!(form.tables.len(), 1);
    assert_eq!(form.tables[0].key, "YouTube_empty");
}

#[test]
fn duplicate_keys_are_ignored() {
    let mut tables = NamedTables::new();
    tables.insert(
        "interests",
        Translatable::new("first", "eerste"),
        DataFrame::single_column("Interests", vec!["a".to_string()]),
    );
    tables.insert(
        "interests",
        Translatable::new("second", "tweede"),
        DataFrame::single_column("Interests", vec!["b".to_string()]),
    );
    assert_eq!(tables.len(), 1);
    assert_eq!(tables.get("interests").unwrap().title.en, "first");
}
