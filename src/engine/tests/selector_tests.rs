use super::config;
use super::fake::{FakeItem, FakePage, View};
use crate::engine::{Activation, ErrorRecoveryPolicy, SafeSelector};
use crate::error::BrowserError;

fn page() -> FakePage {
    FakePage::new(vec![
        FakeItem::named("Cafe A"),
        FakeItem::named("Cafe B"),
        FakeItem::named("Cafe C"),
    ])
}

#[tokio::test]
async fn test_activates_requested_index() {
    let page = page();
    let config = config();
    let policy = ErrorRecoveryPolicy::from_config(&config);

    let activation = SafeSelector::new(&page, &config, &policy)
        .resolve_and_activate(1)
        .await
        .unwrap();

    assert_eq!(activation, Activation::Activated);
    assert_eq!(page.state().view, View::Detail(1));
    assert_eq!(page.state().click_attempts, 1);
}

#[tokio::test]
async fn test_out_of_range_fails_without_retry() {
    let page = page();
    let config = config();
    let policy = ErrorRecoveryPolicy::from_config(&config);

    let activation = SafeSelector::new(&page, &config, &policy)
        .resolve_and_activate(7)
        .await
        .unwrap();

    assert_eq!(activation, Activation::OutOfRange { len: 3 });
    assert_eq!(page.state().click_attempts, 0);
}

#[tokio::test]
async fn test_staleness_is_retried_with_fresh_snapshot() {
    let page = page();
    page.state().stale_clicks = 2;
    let config = config();
    let policy = ErrorRecoveryPolicy::from_config(&config);

    let activation = SafeSelector::new(&page, &config, &policy)
        .resolve_and_activate(2)
        .await
        .unwrap();

    assert!(activation.is_activated());
    assert_eq!(page.state().click_attempts, 3);
    assert_eq!(page.state().opened, vec![2]);
}

#[tokio::test]
async fn test_gives_up_after_max_attempts() {
    let page = page();
    page.state().stale_clicks = 10;
    let config = config();
    let policy = ErrorRecoveryPolicy::from_config(&config);

    let activation = SafeSelector::new(&page, &config, &policy)
        .resolve_and_activate(0)
        .await
        .unwrap();

    assert_eq!(activation, Activation::GaveUp { attempts: 3 });
    assert_eq!(page.state().click_attempts, 3);
    assert_eq!(page.state().view, View::List);
}

#[tokio::test]
async fn test_attempt_bound_follows_configuration() {
    for attempts in 1..=5 {
        let page = page();
        page.state().failing_clicks = 100;
        let mut config = config();
        config.limits.select_attempts = attempts;
        let policy = ErrorRecoveryPolicy::from_config(&config);

        let activation = SafeSelector::new(&page, &config, &policy)
            .resolve_and_activate(0)
            .await
            .unwrap();

        assert_eq!(activation, Activation::GaveUp { attempts });
        assert_eq!(page.state().click_attempts, attempts);
    }
}

#[tokio::test]
async fn test_other_failures_retry_the_same_way() {
    let page = page();
    page.state().failing_clicks = 1;
    let config = config();
    let policy = ErrorRecoveryPolicy::from_config(&config);

    let activation = SafeSelector::new(&page, &config, &policy)
        .resolve_and_activate(0)
        .await
        .unwrap();

    assert!(activation.is_activated());
    assert_eq!(page.state().click_attempts, 2);
}

#[tokio::test]
async fn test_lost_session_is_not_retried() {
    let page = page();
    page.state().session_budget = Some(0);
    let config = config();
    let policy = ErrorRecoveryPolicy::from_config(&config);

    let result = SafeSelector::new(&page, &config, &policy)
        .resolve_and_activate(0)
        .await;

    assert!(matches!(result, Err(BrowserError::SessionLost(_))));
    assert_eq!(page.state().click_attempts, 1);
}
