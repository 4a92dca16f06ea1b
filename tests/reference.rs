use burrow_review::github::parse_pr_reference;

#[test]
fn accepts_all_three_documented_forms() {
    let expected = ("obra".to_string(), "lace".to_string(), 278);

    assert_eq!(
        parse_pr_reference("https://github.com/obra/lace/pull/278").unwrap(),
        expected
    );
    assert_eq!(parse_pr_reference("obra/lace/278").unwrap(), expected);
    assert_eq!(parse_pr_reference("obra/lace#278").unwrap(), expected);
}

#[test]
fn surrounding_whitespace_is_tolerated() {
    let (owner, _, num) = parse_pr_reference("  obra/lace/278\n").unwrap();
    assert_eq!(owner, "obra");
    assert_eq!(num, 278);
}

#[test]
fn rejects_non_pull_urls_and_partial_references() {
    assert!(parse_pr_reference("https://github.com/obra/lace").is_err());
    assert!(parse_pr_reference("https://github.com/obra/lace/issues/278").is_err());
    assert!(parse_pr_reference("obra/lace").is_err());
    assert!(parse_pr_reference("278").is_err());
}

#[test]
fn error_message_names_the_bad_reference() {
    let err = parse_pr_reference("what-is-this").unwrap_err();
    assert!(err.to_string().contains("what-is-this"));
}
