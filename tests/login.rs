// tests/login.rs
mod common;

use std::io;

use common::*;
use gc_scrape::core::net::Method;
use gc_scrape::credentials::CredentialsError;
use gc_scrape::{Error, Session};

#[test]
fn starts_logged_out() {
    let (gc, h) = client();
    assert_eq!(gc.session(), &Session::LoggedOut);
    assert!(!gc.is_logged_in());
    assert_eq!(h.count(), 0);
}

#[test]
fn login_posts_assembled_form() {
    let (mut gc, h) = client();
    h.ok(&login_page()).ok(&logged_in_page("alice"));

    gc.login(Some("alice"), Some("pw")).unwrap();

    assert_eq!(gc.session(), &Session::LoggedIn { identity: "alice".into() });
    let sent = h.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].method, Method::Get);
    assert_eq!(sent[0].url, "http://gc.test/login/default.aspx");
    assert_eq!(sent[1].method, Method::Post);
    assert_eq!(sent[1].url, "http://gc.test/login/default.aspx");
    assert_eq!(sent[1].field("ctl00$Username"), Some("alice"));
    assert_eq!(sent[1].field("ctl00$Password"), Some("pw"));
    assert_eq!(sent[1].field("ctl00$Remember"), Some("1"));
    assert_eq!(sent[1].field("__VIEWSTATE"), Some("vs"));
    assert_eq!(sent[1].field("ctl00$Login"), Some("Login"));
}

#[test]
fn relogin_as_same_user_sends_nothing() {
    let (mut gc, h) = logged_in("alice");
    let before = h.count();

    gc.login(Some("alice"), Some("pw")).unwrap();

    assert_eq!(h.count(), before);
    assert_eq!(gc.session().identity(), Some("alice"));
}

#[test]
fn site_session_for_same_user_skips_post() {
    let (mut gc, h) = client();
    h.ok(&logged_in_page("alice"));

    gc.login(Some("alice"), Some("pw")).unwrap();

    assert_eq!(h.count(), 1);
    assert_eq!(h.sent()[0].method, Method::Get);
    assert_eq!(gc.session().identity(), Some("alice"));
    assert_eq!(h.renewals(), 0);
}

#[test]
fn other_user_is_logged_out_exactly_once() {
    let (mut gc, h) = logged_in("alice");
    assert_eq!(h.renewals(), 0);

    // the site still shows alice; then the form post logs bob in
    let page_as_alice = format!("{}{}", logged_in_page("alice"), login_page());
    h.ok(&page_as_alice).ok(&logged_in_page("bob"));

    gc.login(Some("bob"), Some("pw2")).unwrap();

    assert_eq!(h.renewals(), 1);
    assert_eq!(gc.session().identity(), Some("bob"));
    let post = h.sent().into_iter().last().unwrap();
    assert_eq!(post.method, Method::Post);
    assert_eq!(post.field("ctl00$Username"), Some("bob"));
    // the post goes out on the fresh session
    assert_eq!(post.session, 1);
}

#[test]
fn rejected_credentials_fail_and_reset_session() {
    let (mut gc, h) = client();
    h.ok(&login_page()).ok(&login_page());

    let err = gc.login(Some("alice"), Some("wrong")).unwrap_err();

    assert!(matches!(err, Error::LoginFailed(ref m) if m.contains("wrong username or password")));
    assert_eq!(gc.session(), &Session::LoggedOut);
    assert_eq!(h.renewals(), 1);
}

#[test]
fn missing_credentials_come_from_the_source() {
    let (gc, h) = client();
    let mut gc = gc.with_credentials(Fixed("carol", "pw"));
    h.ok(&login_page()).ok(&logged_in_page("carol"));

    gc.login(None, None).unwrap();

    assert_eq!(gc.session().identity(), Some("carol"));
    assert_eq!(h.sent()[1].field("ctl00$Username"), Some("carol"));
}

#[test]
fn half_given_credentials_still_use_the_source() {
    let (gc, h) = client();
    let mut gc = gc.with_credentials(Fixed("carol", "pw"));
    h.ok(&login_page()).ok(&logged_in_page("carol"));

    gc.login(Some("dave"), None).unwrap();

    assert_eq!(h.sent()[1].field("ctl00$Username"), Some("carol"));
}

#[test]
fn credential_source_failure_is_login_failed_without_requests() {
    let (mut gc, h) = client();

    let err = gc.login(None, None).unwrap_err();

    match err {
        Error::LoginFailed(msg) => assert!(msg.contains("not found")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(h.count(), 0);
}

#[test]
fn each_credential_file_problem_has_its_own_message() {
    let cases: [(fn() -> CredentialsError, &str); 3] = [
        (
            || CredentialsError::Malformed(serde_json::from_str::<serde_json::Value>("{").unwrap_err()),
            "Wrong format of credentials file.",
        ),
        (|| CredentialsError::MissingFields, "Credentials file doesn't contain username and password."),
        (
            || CredentialsError::Unreadable(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
            "Credentials file reading error.",
        ),
    ];

    for (cause, expected) in cases {
        let (gc, h) = client();
        let mut gc = gc.with_credentials(Broken(cause));

        let err = gc.login(None, None).unwrap_err();

        match err {
            Error::LoginFailed(msg) => assert_eq!(msg, expected),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(h.count(), 0);
        assert!(!gc.is_logged_in());
    }
}

#[test]
fn transport_failure_during_login_propagates() {
    let (mut gc, h) = client();
    h.reply(503, "down");

    let err = gc.login(Some("alice"), Some("pw")).unwrap_err();

    assert!(matches!(err, Error::Transport { ref url, .. } if url.ends_with("login/default.aspx")));
    assert_eq!(gc.session(), &Session::LoggedOut);
}

#[test]
fn logout_always_resets() {
    let (mut gc, h) = logged_in("alice");

    gc.logout();
    gc.logout();

    assert_eq!(gc.session(), &Session::LoggedOut);
    assert_eq!(h.renewals(), 2);
}

#[test]
fn logged_user_can_be_read_while_logged_out() {
    let (mut gc, h) = client();
    h.ok(&logged_in_page("erin"));

    assert_eq!(gc.get_logged_user(None).unwrap().as_deref(), Some("erin"));
    // reading is not logging in
    assert!(!gc.is_logged_in());
    assert_eq!(h.count(), 1);
}
