//! Fallback cache tests: last-good data per (user, view) and suppression of
//! out-of-order responses.

use attendance_dashboards::backend::ViewCache;

#[test]
fn test_latest_response_becomes_fallback() {
    let cache = ViewCache::new();
    let ticket = cache.begin("7", "admin.faculty");
    assert!(cache.complete(&ticket, &vec!["Asha", "Ravi"]));

    let fallback: Option<Vec<String>> = cache.fallback("7", "admin.faculty");
    assert_eq!(fallback, Some(vec!["Asha".to_string(), "Ravi".to_string()]));
}

#[test]
fn test_stale_response_never_overwrites() {
    let cache = ViewCache::new();
    let slow = cache.begin("7", "student.records");
    let fast = cache.begin("7", "student.records");

    assert!(cache.complete(&fast, &vec![2, 3]));
    assert!(!cache.complete(&slow, &vec![1]));

    let fallback: Option<Vec<u32>> = cache.fallback("7", "student.records");
    assert_eq!(fallback, Some(vec![2, 3]));
}

#[test]
fn test_views_and_users_are_independent() {
    let cache = ViewCache::new();
    let a = cache.begin("7", "admin.students");
    let b = cache.begin("8", "admin.students");
    let c = cache.begin("7", "admin.faculty");
    assert!(cache.complete(&b, &"other user"));
    assert!(cache.complete(&a, &"mine"));
    assert!(cache.complete(&c, &"faculty"));

    assert_eq!(cache.fallback::<String>("7", "admin.students").as_deref(), Some("mine"));
    assert_eq!(cache.fallback::<String>("8", "admin.students").as_deref(), Some("other user"));
}

#[test]
fn test_forget_user_drops_blobs_and_tickets() {
    let cache = ViewCache::new();
    let before = cache.begin("7", "faculty.students");
    cache.forget_user("7");
    assert!(cache.fallback::<Vec<u32>>("7", "faculty.students").is_none());

    // A response still in flight from before the logout is not stored.
    assert!(!cache.complete(&before, &vec![1]));
    assert!(cache.fallback::<Vec<u32>>("7", "faculty.students").is_none());
}

#[test]
fn test_fallback_of_wrong_shape_is_none() {
    let cache = ViewCache::new();
    let ticket = cache.begin("7", "admin.overview");
    cache.complete(&ticket, &"not a list");
    assert!(cache.fallback::<Vec<u32>>("7", "admin.overview").is_none());
}

#[test]
fn test_browsing_dates_keeps_one_entry_per_view() {
    let cache = ViewCache::new();
    for day in 1..=20 {
        let date = format!("2025-03-{day:02}");
        let ticket = cache.begin_variant("7", "admin.attendance", &date);
        assert!(cache.complete(&ticket, &day));
    }
    assert_eq!(cache.len(), 1);

    let latest: Option<u32> = cache.fallback_variant("7", "admin.attendance", "2025-03-20");
    assert_eq!(latest, Some(20));
    let earlier: Option<u32> = cache.fallback_variant("7", "admin.attendance", "2025-03-19");
    assert_eq!(earlier, None);
}

#[test]
fn test_capacity_bounds_entries_across_users() {
    let cache = ViewCache::with_capacity(3);
    for user in 1..=10 {
        let ticket = cache.begin(&user.to_string(), "student.records");
        assert!(cache.complete(&ticket, &user));
    }
    assert_eq!(cache.len(), 3);

    let newest: Option<u32> = cache.fallback("10", "student.records");
    assert_eq!(newest, Some(10));
    let evicted: Option<u32> = cache.fallback("1", "student.records");
    assert_eq!(evicted, None);
}
