//! Unit tests for the search debouncer

use std::time::{Duration, Instant};

use crate::fetch::{Debouncer, SEARCH_DEBOUNCE};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn test_debounce_coalesces_keystrokes() {
    // Typing "AAP" then "L" within the window issues exactly one
    // request, for "AAPL".
    let t0 = Instant::now();
    let mut debouncer = Debouncer::new(SEARCH_DEBOUNCE);

    debouncer.input("AAP".to_string(), t0);
    assert_eq!(debouncer.poll(t0 + ms(100)), None);

    debouncer.input("AAPL".to_string(), t0 + ms(100));
    assert_eq!(debouncer.poll(t0 + ms(250)), None);
    assert_eq!(debouncer.poll(t0 + ms(400)), Some("AAPL".to_string()));

    // Nothing left to fire.
    assert_eq!(debouncer.poll(t0 + ms(1000)), None);
    assert!(!debouncer.is_pending());
}

#[test]
fn test_debounce_fires_after_quiet_period() {
    let t0 = Instant::now();
    let mut debouncer = Debouncer::new(ms(300));
    debouncer.input("NV".to_string(), t0);
    assert_eq!(debouncer.poll(t0 + ms(299)), None);
    assert_eq!(debouncer.poll(t0 + ms(300)), Some("NV".to_string()));
}

#[test]
fn test_cancel_drops_pending_query() {
    let t0 = Instant::now();
    let mut debouncer = Debouncer::new(ms(300));
    debouncer.input("AAPL".to_string(), t0);
    debouncer.cancel();
    assert!(!debouncer.is_pending());
    assert_eq!(debouncer.poll(t0 + ms(500)), None);
}

#[test]
fn test_time_until_ready() {
    let t0 = Instant::now();
    let mut debouncer = Debouncer::new(ms(300));
    assert_eq!(debouncer.time_until_ready(t0), None);

    debouncer.input("A".to_string(), t0);
    assert_eq!(debouncer.time_until_ready(t0 + ms(100)), Some(ms(200)));
    // Past the deadline it saturates to zero.
    assert_eq!(debouncer.time_until_ready(t0 + ms(400)), Some(ms(0)));
}

#[test]
fn test_each_keystroke_resets_the_timer() {
    let t0 = Instant::now();
    let mut debouncer = Debouncer::new(ms(300));
    debouncer.input("A".to_string(), t0);
    debouncer.input("AA".to_string(), t0 + ms(200));
    debouncer.input("AAP".to_string(), t0 + ms(400));

    // The first two deadlines have passed, but both were superseded.
    assert_eq!(debouncer.poll(t0 + ms(600)), None);
    assert_eq!(debouncer.poll(t0 + ms(700)), Some("AAP".to_string()));
}
