use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::models::event::Event;
use crate::domain::models::geo::{Filter, GeoArea, Interval};
use crate::domain::models::user::Caller;
use crate::domain::models::venue::Venue;
use crate::domain::ports::{EventIndex, EventQuery, EventRepository, VenueIndex, VenueQuery, VenueRepository};
use crate::error::AppError;

/// Outcome of a discovery query. `TooMany` is not an error: the query
/// matched more entities than the configured limit and the client must
/// narrow (zoom in). It is distinct from a legitimately empty result list.
#[derive(Debug, PartialEq)]
pub enum SearchOutcome<T> {
    TooMany,
    Results(Vec<T>),
}

/// Fixed-capacity accumulator threaded through the sub-queries of one
/// search. Sized `limit + 1` so that "exactly full" is observable and
/// distinguishable from "exactly `limit` legitimate results".
struct ResultWindow {
    remaining: usize,
    ids: Vec<String>,
}

impl ResultWindow {
    fn new(limit: usize) -> Self {
        Self { remaining: limit + 1, ids: Vec::new() }
    }

    fn remaining(&self) -> usize {
        self.remaining
    }

    /// Absorbs one sub-query's references. Returns false when the window
    /// filled up, i.e. the true total could exceed what the client can
    /// usefully render.
    fn absorb(&mut self, batch: Vec<String>) -> bool {
        debug_assert!(batch.len() <= self.remaining);
        self.remaining -= batch.len();
        self.ids.extend(batch);
        self.remaining > 0
    }
}

/// One predicate-bounded slice of a search. Processed in a fixed sequence
/// so results are deterministic for a fixed query and data set.
struct Partition {
    owner: Filter<String>,
    private: Filter<bool>,
    category: Filter<u32>,
}

/// The visibility partition plan: a privileged caller gets one
/// unrestricted slice per category; everyone else gets the public slice
/// and, when logged in, their own private slice, public before private,
/// looped per category when categories were requested (an empty category
/// set means all of them).
fn partitions(caller: &Caller, categories: &[u32]) -> Vec<Partition> {
    let category_filters: Vec<Filter<u32>> = if categories.is_empty() {
        vec![Filter::Any]
    } else {
        categories.iter().map(|c| Filter::Only(*c)).collect()
    };

    let mut plan = Vec::new();

    for category in category_filters {
        if caller.is_root() {
            plan.push(Partition { owner: Filter::Any, private: Filter::Any, category });
            continue;
        }

        plan.push(Partition {
            owner: Filter::Any,
            private: Filter::Only(false),
            category,
        });

        if let Some(user_id) = caller.user_id() {
            plan.push(Partition {
                owner: Filter::Only(user_id.to_string()),
                private: Filter::Only(true),
                category,
            });
        }
    }

    plan
}

/// Finds all visible venues in an area, bounded by `limit`.
pub async fn search_venues(
    index: &dyn VenueIndex,
    repo: &dyn VenueRepository,
    limit: usize,
    caller: &Caller,
    area: &GeoArea,
    categories: &[u32],
) -> Result<SearchOutcome<Venue>, AppError> {
    debug!(cached = index.len(), "venue search");
    let mut window = ResultWindow::new(limit);

    for p in partitions(caller, categories) {
        let query = VenueQuery {
            owner: p.owner,
            latitude: area.latitude_interval(),
            longitude: area.longitude_interval(),
            private: p.private,
            category: p.category,
        };
        let batch = index.search(window.remaining(), &query);

        if !window.absorb(batch) {
            debug!("too many venues found, zoom in");
            return Ok(SearchOutcome::TooMany);
        }
    }

    let mut venues = Vec::with_capacity(window.ids.len());
    for id in &window.ids {
        // The cached view may lag a removal; a missing document is simply
        // dropped.
        if let Some(venue) = repo.find_by_id(id).await? {
            venues.push(venue);
        }
    }

    Ok(SearchOutcome::Results(venues))
}

/// Finds all visible, bookable events in an area and optional start
/// period, bounded by `limit`.
///
/// The bookability filter runs at materialization, after the budget
/// accounting: a reply can therefore hold fewer than `limit` events even
/// though the true visible-and-bookable total is below the limit. That
/// pessimistic imprecision is deliberate.
pub async fn search_events(
    index: &dyn EventIndex,
    repo: &dyn EventRepository,
    limit: usize,
    caller: &Caller,
    area: &GeoArea,
    categories: &[u32],
    start: Interval<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<SearchOutcome<Event>, AppError> {
    debug!(cached = index.len(), "event search");
    let mut window = ResultWindow::new(limit);

    for p in partitions(caller, categories) {
        let query = EventQuery {
            organizer: p.owner,
            latitude: area.latitude_interval(),
            longitude: area.longitude_interval(),
            private: p.private,
            category: p.category,
            start,
        };
        let batch = index.search(window.remaining(), &query);

        if !window.absorb(batch) {
            debug!("too many events found, zoom in");
            return Ok(SearchOutcome::TooMany);
        }
    }

    let mut events = Vec::with_capacity(window.ids.len());
    for id in &window.ids {
        if let Some(event) = repo.find_by_id(id).await? {
            if event.is_bookable(now) {
                events.push(event);
            }
        }
    }

    Ok(SearchOutcome::Results(events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::capacity::Capacity;
    use crate::domain::models::geo::Position;
    use crate::domain::models::user::User;
    use crate::domain::models::venue::{NewVenueParams, Venue};
    use crate::domain::ports::VenueEntry;
    use crate::infra::index::memory_index::MemoryVenueIndex;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct MapVenueRepo(HashMap<String, Venue>);

    #[async_trait]
    impl VenueRepository for MapVenueRepo {
        async fn create(&self, venue: &Venue) -> Result<Venue, AppError> {
            Ok(venue.clone())
        }
        async fn find_by_id(&self, id: &str) -> Result<Option<Venue>, AppError> {
            Ok(self.0.get(id).cloned())
        }
        async fn update(&self, venue: &Venue) -> Result<Venue, AppError> {
            Ok(venue.clone())
        }
        async fn delete(&self, _id: &str) -> Result<(), AppError> {
            Ok(())
        }
        async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Venue>, AppError> {
            Ok(self.0.values().filter(|v| v.owner_id == owner_id).cloned().collect())
        }
        async fn list_index_entries(&self) -> Result<Vec<VenueEntry>, AppError> {
            let mut entries: Vec<VenueEntry> = self
                .0
                .values()
                .map(|v| VenueEntry {
                    id: v.id.clone(),
                    owner_id: v.owner_id.clone(),
                    latitude: v.position.latitude,
                    longitude: v.position.longitude,
                    private: v.private,
                    category: v.category,
                })
                .collect();
            entries.sort_by(|a, b| a.id.cmp(&b.id));
            Ok(entries)
        }
    }

    fn venue(owner: &str, private: bool, lat: f64) -> Venue {
        Venue::new(NewVenueParams {
            owner_id: owner.into(),
            name: "V".into(),
            private,
            category: 0,
            category_description: String::new(),
            position: Position { latitude: lat, longitude: 0.0 },
            address: String::new(),
            capacity: Capacity::Infinite,
            description: String::new(),
            confirmation_required: false,
            rating: 0.0,
            images: vec![],
        })
    }

    fn user(id: &str, is_root: bool) -> Caller {
        Caller::User(User {
            id: id.into(),
            username: id.into(),
            email: format!("{id}@example.com"),
            password_hash: String::new(),
            is_root,
            created_at: Utc::now(),
        })
    }

    async fn fixture(venues: Vec<Venue>) -> (MemoryVenueIndex, MapVenueRepo) {
        let repo = MapVenueRepo(venues.into_iter().map(|v| (v.id.clone(), v)).collect());
        let index = MemoryVenueIndex::new();
        index.refresh(&repo).await.unwrap();
        (index, repo)
    }

    fn whole_world() -> GeoArea {
        GeoArea {
            min_latitude: -90.0,
            max_latitude: 90.0,
            min_longitude: -180.0,
            max_longitude: 180.0,
        }
    }

    #[test]
    fn window_distinguishes_full_from_exactly_limit() {
        let mut w = ResultWindow::new(3);
        assert_eq!(w.remaining(), 4);
        assert!(w.absorb(vec!["a".into(), "b".into(), "c".into()]));
        assert_eq!(w.remaining(), 1);

        let mut w = ResultWindow::new(3);
        assert!(!w.absorb(vec!["a".into(), "b".into(), "c".into(), "d".into()]));
    }

    #[test]
    fn partition_order_is_public_then_own_private_per_category() {
        let plan = partitions(&user("u1", false), &[5, 7]);
        assert_eq!(plan.len(), 4);
        assert_eq!(plan[0].private, Filter::Only(false));
        assert_eq!(plan[0].category, Filter::Only(5));
        assert_eq!(plan[1].owner, Filter::Only("u1".to_string()));
        assert_eq!(plan[1].private, Filter::Only(true));
        assert_eq!(plan[1].category, Filter::Only(5));
        assert_eq!(plan[2].category, Filter::Only(7));
        assert_eq!(plan[3].category, Filter::Only(7));
    }

    #[test]
    fn root_gets_one_unrestricted_partition() {
        let plan = partitions(&user("root", true), &[]);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].owner, Filter::Any);
        assert_eq!(plan[0].private, Filter::Any);

        let plan = partitions(&Caller::Anonymous, &[]);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].private, Filter::Only(false));
    }

    #[tokio::test]
    async fn exactly_limit_matches_are_all_returned() {
        let venues: Vec<Venue> = (0..3).map(|i| venue("a", false, i as f64)).collect();
        let (index, repo) = fixture(venues).await;

        let out = search_venues(&index, &repo, 3, &Caller::Anonymous, &whole_world(), &[])
            .await
            .unwrap();
        match out {
            SearchOutcome::Results(v) => assert_eq!(v.len(), 3),
            SearchOutcome::TooMany => panic!("expected results"),
        }
    }

    #[tokio::test]
    async fn limit_plus_one_matches_yield_zoom_in() {
        let venues: Vec<Venue> = (0..4).map(|i| venue("a", false, i as f64)).collect();
        let (index, repo) = fixture(venues).await;

        let out = search_venues(&index, &repo, 3, &Caller::Anonymous, &whole_world(), &[])
            .await
            .unwrap();
        assert_eq!(out, SearchOutcome::TooMany);
    }

    #[tokio::test]
    async fn private_venues_are_visible_to_owner_and_root_only() {
        let secret = venue("alice", true, 10.0);
        let secret_id = secret.id.clone();
        let (index, repo) = fixture(vec![secret, venue("bob", false, 20.0)]).await;
        let area = whole_world();

        let ids = |out: SearchOutcome<Venue>| match out {
            SearchOutcome::Results(v) => v.into_iter().map(|v| v.id).collect::<Vec<_>>(),
            SearchOutcome::TooMany => panic!("expected results"),
        };

        let anon = ids(search_venues(&index, &repo, 10, &Caller::Anonymous, &area, &[]).await.unwrap());
        assert!(!anon.contains(&secret_id));

        let bob = ids(search_venues(&index, &repo, 10, &user("bob", false), &area, &[]).await.unwrap());
        assert!(!bob.contains(&secret_id));

        let alice = ids(search_venues(&index, &repo, 10, &user("alice", false), &area, &[]).await.unwrap());
        assert!(alice.contains(&secret_id));

        let root = ids(search_venues(&index, &repo, 10, &user("r", true), &area, &[]).await.unwrap());
        assert!(root.contains(&secret_id));
    }

    #[tokio::test]
    async fn own_private_matches_count_against_the_budget() {
        // Two public + one own private = three visible; limit 2 must zoom.
        let venues = vec![venue("a", false, 1.0), venue("a", false, 2.0), venue("a", true, 3.0)];
        let (index, repo) = fixture(venues).await;

        let out = search_venues(&index, &repo, 2, &user("a", false), &whole_world(), &[])
            .await
            .unwrap();
        assert_eq!(out, SearchOutcome::TooMany);
    }

    #[tokio::test]
    async fn area_bounds_are_honored() {
        let inside = venue("a", false, 5.0);
        let inside_id = inside.id.clone();
        let (index, repo) = fixture(vec![inside, venue("a", false, 50.0)]).await;

        let area = GeoArea {
            min_latitude: 0.0,
            max_latitude: 10.0,
            min_longitude: -1.0,
            max_longitude: 1.0,
        };
        match search_venues(&index, &repo, 10, &Caller::Anonymous, &area, &[]).await.unwrap() {
            SearchOutcome::Results(v) => {
                assert_eq!(v.len(), 1);
                assert_eq!(v[0].id, inside_id);
            }
            SearchOutcome::TooMany => panic!("expected results"),
        }
    }
}
