use std::thread::sleep;
use std::time::{Duration, Instant};

use ttlset::{Error, ExpirableSet, Expiry, TimeUnit};

#[test]
fn ttl_expires_on_wall_clock() {
    let mut set = ExpirableSet::new();
    let before = Instant::now();
    set.insert_with_ttl("token", 300, TimeUnit::Milliseconds)
        .unwrap();
    let after = Instant::now();
    let deadline = set.get_expiry("token").unwrap().instant().unwrap();
    assert!(deadline >= before + Duration::from_millis(300));
    assert!(deadline <= after + Duration::from_millis(300));

    sleep(Duration::from_millis(400));
    assert!(set.has_expired("token"));
    assert!(!set.contains("token"));
    assert!(set.has_expired("token"));
    assert_eq!(set.get_expiry("token"), Err(Error::NotFound));
}

#[test]
fn longer_ttl_survives_stale_deadline() {
    let mut set = ExpirableSet::new();
    set.insert_with_ttl(42u32, 10, TimeUnit::Milliseconds)
        .unwrap();
    set.insert_with_ttl(42u32, 10, TimeUnit::Seconds).unwrap();

    sleep(Duration::from_millis(15));
    assert!(set.contains(&42));
    assert_eq!(set.len(), 1);
}

#[test]
fn permanent_after_expiry() {
    let mut set = ExpirableSet::new();
    set.insert_with_ttl("k".to_string(), 1, TimeUnit::Milliseconds)
        .unwrap();
    sleep(Duration::from_millis(5));

    assert!(set.insert("k".to_string()));
    assert!(set.contains("k"));
    assert_eq!(set.get_expiry("k"), Ok(Expiry::Never));
}

#[test]
fn zero_ttl_is_gone_on_next_call() {
    let mut set = ExpirableSet::new();
    assert!(set.insert_with_ttl('z', 0, TimeUnit::Seconds).unwrap());
    assert!(!set.contains(&'z'));
    assert!(set.is_empty());
}

#[test]
fn size_ignores_expired_members() {
    let mut set = ExpirableSet::with_capacity(8);
    set.insert(0);
    for i in 1..8 {
        set.insert_with_ttl(i, 300, TimeUnit::Milliseconds).unwrap();
    }
    assert_eq!(set.len(), 8);

    sleep(Duration::from_millis(400));
    assert_eq!(set.len(), 1);
    assert_eq!(set.iter().collect::<Vec<_>>(), vec![&0]);
}

#[test]
fn element_expiring_mid_iteration_is_still_yielded() {
    let mut set = ExpirableSet::new();
    set.insert_with_ttl(1, 300, TimeUnit::Milliseconds).unwrap();
    set.insert(2);

    let mut seen = Vec::new();
    for item in set.iter() {
        if seen.is_empty() {
            sleep(Duration::from_millis(400));
        }
        seen.push(*item);
    }
    seen.sort();
    assert_eq!(seen, vec![1, 2]);

    assert!(!set.contains(&1));
    assert_eq!(set.iter().collect::<Vec<_>>(), vec![&2]);
}
