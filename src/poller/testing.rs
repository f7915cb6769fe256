//! Fakes shared by the poller and tracker tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::time::Instant;

use crate::db::{BoxError, Repository, Snowflake, Subscription, TrackedIdentity};
use crate::identity::RiotId;
use crate::notify::{Announcement, NotificationSink};
use crate::rank::RankSnapshot;
use crate::riot::{MatchSummary, RankedStatsApi, RiotError};

#[derive(Debug, Clone, Copy)]
pub enum FakeFailure {
    Status,
    Auth,
    RateLimited,
    Panic,
    Hang,
}

#[derive(Debug, Default)]
pub struct FakeApi {
    accounts: Mutex<HashMap<String, String>>,
    ranks: Mutex<HashMap<String, Result<RankSnapshot, FakeFailure>>>,
    delays: Mutex<HashMap<String, Duration>>,
    rank_call_starts: Mutex<Vec<Instant>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    with_match: Mutex<Option<bool>>,
    match_fails: Mutex<bool>,
    rank_calls: AtomicUsize,
    match_calls: AtomicUsize,
}

impl FakeApi {
    /// Register `riot_id` (already normalised) under `puuid`.
    pub fn add_account(&self, riot_id: &str, puuid: &str) {
        self.accounts
            .lock()
            .unwrap()
            .insert(riot_id.to_string(), puuid.to_string());
    }

    pub fn set_rank(&self, puuid: &str, rank: RankSnapshot) {
        self.ranks
            .lock()
            .unwrap()
            .insert(puuid.to_string(), Ok(rank));
    }

    pub fn fail_rank(&self, puuid: &str, failure: FakeFailure) {
        self.ranks
            .lock()
            .unwrap()
            .insert(puuid.to_string(), Err(failure));
    }

    /// Rank lookups for `puuid` take `delay` before answering.
    pub fn delay_rank(&self, puuid: &str, delay: Duration) {
        self.delays
            .lock()
            .unwrap()
            .insert(puuid.to_string(), delay);
    }

    /// Latest game is reported, won or lost.
    pub fn set_match(&self, win: bool) {
        *self.with_match.lock().unwrap() = Some(win);
    }

    pub fn fail_match(&self) {
        *self.match_fails.lock().unwrap() = true;
    }

    pub fn rank_calls(&self) -> usize {
        self.rank_calls.load(Ordering::SeqCst)
    }

    pub fn match_calls(&self) -> usize {
        self.match_calls.load(Ordering::SeqCst)
    }

    /// Highest number of rank lookups seen running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn rank_call_starts(&self) -> Vec<Instant> {
        self.rank_call_starts.lock().unwrap().clone()
    }
}

/// Counts a rank lookup as running until dropped, cancellation included.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize, max: &AtomicUsize) -> Self {
        let now = counter.fetch_add(1, Ordering::SeqCst) + 1;
        max.fetch_max(now, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn riot_error(failure: FakeFailure) -> RiotError {
    match failure {
        FakeFailure::Status => RiotError::Status(StatusCode::INTERNAL_SERVER_ERROR),
        FakeFailure::Auth => RiotError::Auth(StatusCode::FORBIDDEN),
        FakeFailure::RateLimited => RiotError::RateLimited { attempts: 3 },
        FakeFailure::Panic | FakeFailure::Hang => unreachable!(),
    }
}

#[async_trait]
impl RankedStatsApi for FakeApi {
    async fn resolve_identity(&self, game_name: &str, tag_line: &str) -> Result<String, RiotError> {
        let key = format!("{game_name}#{tag_line}");
        self.accounts
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or(RiotError::IdentityNotFound(key))
    }

    async fn fetch_rank_snapshot(&self, puuid: &str) -> Result<RankSnapshot, RiotError> {
        self.rank_calls.fetch_add(1, Ordering::SeqCst);
        self.rank_call_starts.lock().unwrap().push(Instant::now());
        let _running = InFlight::enter(&self.in_flight, &self.max_in_flight);

        let delay = self.delays.lock().unwrap().get(puuid).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.ranks.lock().unwrap().get(puuid).copied();
        match scripted {
            None => Ok(RankSnapshot::default()),
            Some(Ok(rank)) => Ok(rank),
            Some(Err(FakeFailure::Panic)) => panic!("fake api exploded for {puuid}"),
            Some(Err(FakeFailure::Hang)) => std::future::pending().await,
            Some(Err(failure)) => Err(riot_error(failure)),
        }
    }

    async fn fetch_recent_match_summary(
        &self,
        _puuid: &str,
    ) -> Result<Option<MatchSummary>, RiotError> {
        self.match_calls.fetch_add(1, Ordering::SeqCst);
        if *self.match_fails.lock().unwrap() {
            return Err(riot_error(FakeFailure::Status));
        }
        let win = *self.with_match.lock().unwrap();
        Ok(win.map(|win| MatchSummary {
            champion: "Ahri".to_string(),
            kills: 7,
            deaths: 2,
            assists: 9,
            win,
        }))
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    attempted: Mutex<Vec<Snowflake>>,
    sent: Mutex<Vec<(Snowflake, Announcement)>>,
    failing: Mutex<HashSet<Snowflake>>,
}

impl RecordingSink {
    pub fn fail_channel(&self, channel: Snowflake) {
        self.failing.lock().unwrap().insert(channel);
    }

    pub fn attempted(&self) -> Vec<Snowflake> {
        self.attempted.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<(Snowflake, Announcement)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(&self, channel: Snowflake, announcement: &Announcement) -> Result<(), BoxError> {
        self.attempted.lock().unwrap().push(channel);
        if self.failing.lock().unwrap().contains(&channel) {
            return Err(format!("channel {channel} is gone").into());
        }
        self.sent
            .lock()
            .unwrap()
            .push((channel, announcement.clone()));
        Ok(())
    }
}

/// Store a tracked identity followed by `communities`, puuid `puuid-<riot id>`.
pub async fn track(
    repo: &Repository,
    riot_id: &str,
    rank: RankSnapshot,
    communities: &[u64],
) -> TrackedIdentity {
    let riot_id = RiotId::parse(riot_id).unwrap();
    let mut identity = TrackedIdentity::new(&riot_id, format!("puuid-{riot_id}"), rank);
    for community in communities {
        identity.subscribers.push(Snowflake(*community));
        identity.communities.insert(
            Snowflake(*community),
            Subscription {
                added_by: Snowflake(1),
                added_at: 1_700_000_000,
            },
        );
    }
    repo.create_identity(&identity).await.unwrap();
    identity
}
