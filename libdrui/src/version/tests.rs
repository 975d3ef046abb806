use super::*;

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_latest_is_greater_than_everything() {
    let latest = VersionKey::new("latest");
    for tag in ["0", "1.2.10", "zzz", "v999999", "", "latest-rc", "9999999999999999999999"] {
        assert!(latest > VersionKey::new(tag), "latest should sort after {tag:?}");
    }
}

#[test]
fn test_latest_is_case_insensitive() {
    assert_eq!(VersionKey::new("LATEST"), VersionKey::Latest);
    assert_eq!(VersionKey::new("Latest"), VersionKey::Latest);
    assert_eq!(VersionKey::new("lAtEsT"), VersionKey::Latest);
}

#[test]
fn test_numeric_components_compare_by_value() {
    assert!(VersionKey::new("1.2.10") > VersionKey::new("1.2.9"));
    assert!(VersionKey::new("1.2.9") > VersionKey::new("1.2.2"));
    assert!(VersionKey::new("10") > VersionKey::new("9"));
}

#[test]
fn test_trailing_digit_orders_numerically() {
    assert!(VersionKey::new("v2") > VersionKey::new("v1"));
}

#[test]
fn test_key_flattens_tokens() {
    assert_eq!(VersionKey::new("1.2.10"), VersionKey::Tokens(vec![1, 2, 10]));
    assert_eq!(
        VersionKey::new("rc1"),
        VersionKey::Tokens(vec!['R' as u128, 'C' as u128, '1' as u128])
    );
    assert_eq!(
        VersionKey::new("1.0-beta"),
        VersionKey::Tokens(vec![1, 0, 'B' as u128, 'E' as u128, 'T' as u128, 'A' as u128])
    );
}

#[test]
fn test_text_tokens_are_upper_cased() {
    assert_eq!(VersionKey::new("beta"), VersionKey::new("BETA"));
}

#[test]
fn test_separators_are_ignored() {
    assert_eq!(VersionKey::new("1.0"), VersionKey::new("1-0"));
    assert_eq!(VersionKey::new("1.0"), VersionKey::new("1 0"));
}

#[test]
fn test_underscore_is_part_of_a_token() {
    // `\w` matches '_', so "a_b" is one text token
    assert_eq!(
        VersionKey::new("a_b"),
        VersionKey::Tokens(vec!['A' as u128, '_' as u128, 'B' as u128])
    );
}

#[test]
fn test_prefix_sorts_first() {
    assert!(VersionKey::new("1.0") < VersionKey::new("1.0.1"));
    assert!(VersionKey::new("") < VersionKey::new("0"));
}

#[test]
fn test_oversized_number_saturates() {
    let huge = VersionKey::new("340282366920938463463374607431768211456999");
    assert_eq!(huge, VersionKey::Tokens(vec![u128::MAX]));
    assert!(huge > VersionKey::new("12345678901234567890"));
}

#[test]
fn test_sort_tags_scenario() {
    let mut list = tags(&["2.0", "1.0", "latest"]);
    sort_tags(&mut list);
    assert_eq!(list, ["1.0", "2.0", "latest"]);
}

#[test]
fn test_sort_tags_mixed() {
    let mut list = tags(&["latest", "1.10.0", "1.9.0", "1.9.0-rc1", "1.2.0", "beta"]);
    sort_tags(&mut list);
    assert_eq!(
        list,
        ["1.2.0", "1.9.0", "1.9.0-rc1", "1.10.0", "beta", "latest"]
    );
}

#[test]
fn test_sort_tags_is_stable() {
    // "1-0", "1.0" and "1 0" share a key
    let mut list = tags(&["1-0", "0.9", "1.0", "1 0"]);
    sort_tags(&mut list);
    assert_eq!(list, ["0.9", "1-0", "1.0", "1 0"]);

    let mut list = tags(&["LATEST", "1", "latest"]);
    sort_tags(&mut list);
    assert_eq!(list, ["1", "LATEST", "latest"]);
}

#[test]
fn test_default_tag_prefers_latest() {
    let list = tags(&["1.0", "latest", "2.0"]);
    assert_eq!(default_tag(&list), Some("latest"));
}

#[test]
fn test_default_tag_falls_back_to_last() {
    let list = tags(&["1.0", "2.0"]);
    assert_eq!(default_tag(&list), Some("2.0"));
}

#[test]
fn test_default_tag_empty() {
    assert_eq!(default_tag(&[]), None);
}
