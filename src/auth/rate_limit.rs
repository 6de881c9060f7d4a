//! Per-IP throttle on failed logins.

use std::collections::{HashMap, VecDeque};
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const MAX_ATTEMPTS: usize = 5;
pub const WINDOW: Duration = Duration::from_secs(15 * 60);

#[derive(Clone)]
pub struct LoginThrottle {
    max_attempts: usize,
    window: Duration,
    failures: Arc<Mutex<HashMap<IpAddr, VecDeque<Instant>>>>,
}

impl Default for LoginThrottle {
    fn default() -> Self {
        Self::new(MAX_ATTEMPTS, WINDOW)
    }
}

impl LoginThrottle {
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self { max_attempts, window, failures: Arc::new(Mutex::new(HashMap::new())) }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<IpAddr, VecDeque<Instant>>> {
        self.failures.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// True once `ip` has used up its attempts within the window. Expired
    /// failures are dropped as a side effect.
    pub fn is_blocked(&self, ip: IpAddr) -> bool {
        let mut map = self.lock();
        let Some(times) = map.get_mut(&ip) else {
            return false;
        };
        let now = Instant::now();
        while times.front().is_some_and(|t| now.duration_since(*t) >= self.window) {
            times.pop_front();
        }
        if times.is_empty() {
            map.remove(&ip);
            return false;
        }
        times.len() >= self.max_attempts
    }

    /// Record a failed attempt. Addresses whose failures have all expired
    /// are dropped here too, so clients that never return do not linger.
    pub fn record_failure(&self, ip: IpAddr) {
        let now = Instant::now();
        let mut map = self.lock();
        map.retain(|_, times| {
            while times.front().is_some_and(|t| now.duration_since(*t) >= self.window) {
                times.pop_front();
            }
            !times.is_empty()
        });
        map.entry(ip).or_default().push_back(now);
    }

    /// Addresses with at least one failure still inside the window.
    pub fn tracked(&self) -> usize {
        self.lock().len()
    }

    /// Forget `ip`'s failures after a successful login.
    pub fn clear(&self, ip: IpAddr) {
        self.lock().remove(&ip);
    }
}
