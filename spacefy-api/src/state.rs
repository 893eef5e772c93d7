use std::collections::HashMap;
use std::sync::Arc;
use chrono::Duration;
use spacefy_booking::{BookingController, BookingPolicy};
use spacefy_core::{BookingRepository, Instant, ListingRepository};
use spacefy_shared::{BookingConfirmedEvent, Locale};
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 30;

/// One open detail view and when it was last used
#[derive(Debug)]
pub struct Session {
    pub controller: BookingController,
    pub touched_at: Instant,
}

impl Session {
    pub fn new(controller: BookingController, now: Instant) -> Self {
        Self { controller, touched_at: now }
    }

    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.signed_duration_since(self.touched_at) >= ttl
    }

    pub fn touch(&mut self, now: Instant) {
        self.touched_at = now;
    }
}

/// Open detail views keyed by session id, each behind its own lock
pub type Sessions = Arc<RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>>;

pub type Clock = Arc<dyn Fn() -> Instant + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub listings: Arc<dyn ListingRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub sessions: Sessions,
    pub session_ttl: Duration,
    pub policy: BookingPolicy,
    pub default_locale: Locale,
    pub events_tx: broadcast::Sender<BookingConfirmedEvent>,
    pub clock: Clock,
}

impl AppState {
    pub fn new(
        listings: Arc<dyn ListingRepository>,
        bookings: Arc<dyn BookingRepository>,
        policy: BookingPolicy,
        default_locale: Locale,
    ) -> Self {
        let (events_tx, _) = broadcast::channel(100);
        Self {
            listings,
            bookings,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            session_ttl: Duration::minutes(DEFAULT_SESSION_TTL_MINUTES),
            policy,
            default_locale,
            events_tx,
            clock: Arc::new(local_now),
        }
    }

    pub fn with_clock(mut self, clock: impl Fn() -> Instant + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn now(&self) -> Instant {
        (self.clock)()
    }

    /// Drop sessions idle for at least the TTL. Sessions held by an
    /// in-flight request are left for the next sweep.
    pub async fn sweep_sessions(&self) -> usize {
        let now = self.now();
        let ttl = self.session_ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|_, session| match session.try_lock() {
            Ok(session) => !session.is_expired(now, ttl),
            Err(_) => true,
        });

        let removed = before - sessions.len();
        if removed > 0 {
            info!("Swept {} expired session(s)", removed);
        }
        removed
    }
}

fn local_now() -> Instant {
    chrono::Local::now().naive_local()
}
