use oarr_model::{canonicalize_url, urls_equivalent, variants_intersect};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// ── Closure contents ─────────────────────────────────────────────

#[test]
fn scheme_url_expands_to_four_variants() {
    let v: Vec<_> = canonicalize_url("http://x.org").into_iter().collect();
    assert_eq!(
        v,
        vec!["http://x.org", "http://x.org/", "https://x.org", "https://x.org/"]
    );
}

#[test]
fn trailing_slash_input_gives_same_closure() {
    assert_eq!(canonicalize_url("https://x.org/"), canonicalize_url("http://x.org"));
}

#[test]
fn bare_host_expands_to_both_schemes_and_keeps_bare_forms() {
    let v = canonicalize_url("x.org/repo");
    for expected in [
        "x.org/repo",
        "x.org/repo/",
        "http://x.org/repo",
        "http://x.org/repo/",
        "https://x.org/repo",
        "https://x.org/repo/",
    ] {
        assert!(v.contains(expected), "missing {expected}");
    }
    assert_eq!(v.len(), 6);
}

#[test]
fn only_one_trailing_slash_is_toggled() {
    let v = canonicalize_url("http://x.org//");
    assert!(v.contains("http://x.org/"));
    assert!(v.contains("http://x.org//"));
    assert!(!v.contains("http://x.org"));
}

#[test]
fn closure_contains_input_even_with_odd_casing() {
    let v = canonicalize_url("HTTP://Example.org");
    assert!(v.contains("HTTP://Example.org"));
    assert!(v.contains("https://Example.org/"));
}

#[test]
fn malformed_input_does_not_panic() {
    for input in ["", "/", "http://", "::::", "ünïcødé", " spaced url "] {
        assert!(!canonicalize_url(input).is_empty());
    }
}

// ── Equivalence ──────────────────────────────────────────────────

#[test]
fn http_and_https_with_slash_are_equivalent() {
    assert!(urls_equivalent("http://x.org", "https://x.org/"));
}

#[test]
fn different_hosts_are_not_equivalent() {
    assert!(!urls_equivalent("http://x.org", "http://y.org"));
}

#[test]
fn bare_and_qualified_are_equivalent() {
    assert!(urls_equivalent("x.org", "https://x.org/"));
}

#[test]
fn different_paths_are_not_equivalent() {
    assert!(!urls_equivalent("http://x.org/a", "http://x.org/b"));
}

#[test]
fn variants_intersect_matches_urls_equivalent() {
    let a = canonicalize_url("http://org.1");
    let b = canonicalize_url("http://org.1/");
    assert!(variants_intersect(&a, &b));
}

proptest! {
    #[test]
    fn equivalence_is_reflexive(url in "[a-z:/.]{0,24}") {
        prop_assert!(urls_equivalent(&url, &url));
    }

    #[test]
    fn equivalence_is_symmetric(a in "(https?://)?[a-z]{1,6}\\.org/?", b in "(https?://)?[a-z]{1,6}\\.org/?") {
        prop_assert_eq!(urls_equivalent(&a, &b), urls_equivalent(&b, &a));
    }

    #[test]
    fn scheme_and_slash_toggles_preserve_equivalence(host in "[a-z]{1,8}\\.[a-z]{2,3}", slash in any::<bool>(), secure in any::<bool>()) {
        let scheme = if secure { "https://" } else { "http://" };
        let suffix = if slash { "/" } else { "" };
        let spelled = format!("{scheme}{host}{suffix}");
        prop_assert!(urls_equivalent(&host, &spelled));
    }
}
