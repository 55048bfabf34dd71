//! Pagination coordinator for one listing.
//!
//! A [`PaginationCoordinator`] owns the [`PageState`] of a single listing
//! and mediates every transition into it: first load, guarded load-more,
//! wholesale-replace refresh, and ad-hoc search into a separate state.
//!
//! All mutation happens on the task driving the coordinator - the delivery
//! context. Fetches themselves may run anywhere, which is why load-more and
//! search are split into a `begin_*` step (issued on the driving task,
//! returns a request token) and a `complete_*` step (applies the completion
//! on the driving task). The async convenience methods compose the two for
//! consumers that simply await in place.
//!
//! Completions are not ordered: a response issued earlier can arrive after
//! a later one. Two token fields compensate - a generation stamp discards
//! load-more completions that straddle a wholesale replace, and a search
//! sequence number makes stale query responses inert.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::api::{ListingQuery, PageSource, TransportError};
use crate::model::Page;

use super::merge::{AppendMerge, MergePolicy};
use super::state::PageState;

/// Token for one issued next-page fetch.
///
/// Handing it back to [`PaginationCoordinator::complete_next_page`] consumes
/// it, so a completion cannot be applied twice.
#[derive(Debug)]
pub struct NextPageRequest {
    page: u32,
    generation: u64,
}

impl NextPageRequest {
    /// The page number to request from the data source.
    pub fn page(&self) -> u32 {
        self.page
    }
}

/// Token for one issued ad-hoc search fetch.
#[derive(Debug)]
pub struct SearchRequest {
    seq: u64,
    query: ListingQuery,
}

impl SearchRequest {
    /// The listing query to fetch page 1 of.
    pub fn query(&self) -> &ListingQuery {
        &self.query
    }
}

/// What became of a search completion.
#[derive(Debug)]
pub enum SearchOutcome {
    /// The results replaced the search state.
    Applied,
    /// A newer query was issued before this one completed; dropped.
    Superseded,
    /// The fetch failed; previous search results remain visible.
    Failed(TransportError),
}

/// Orchestrates fetches for one paginated listing.
pub struct PaginationCoordinator<T> {
    source: Arc<dyn PageSource<T>>,
    query: ListingQuery,
    merge: Box<dyn MergePolicy<T>>,
    state: Option<PageState<T>>,
    generation: u64,
    search_state: Option<PageState<T>>,
    search_issued: u64,
}

impl<T> PaginationCoordinator<T> {
    /// Coordinator for a listing, appending pages without deduplication.
    pub fn new(source: Arc<dyn PageSource<T>>, query: ListingQuery) -> Self {
        Self {
            source,
            query,
            merge: Box::new(AppendMerge),
            state: None,
            generation: 0,
            search_state: None,
            search_issued: 0,
        }
    }

    /// Coordinator seeded with an envelope something else already fetched,
    /// e.g. the similar-titles strip handing its page to a full listing.
    pub fn seeded(source: Arc<dyn PageSource<T>>, query: ListingQuery, envelope: Page<T>) -> Self {
        let mut coordinator = Self::new(source, query);
        coordinator.replace_state(envelope);
        coordinator
    }

    /// Replace the merge policy applied to load-more responses.
    pub fn with_merge_policy(mut self, merge: Box<dyn MergePolicy<T>>) -> Self {
        self.merge = merge;
        self
    }

    pub fn query(&self) -> &ListingQuery {
        &self.query
    }

    /// Snapshot of the primary listing state, if one has loaded.
    pub fn state(&self) -> Option<&PageState<T>> {
        self.state.as_ref()
    }

    /// Items loaded so far; empty before the first successful load.
    pub fn items(&self) -> &[T] {
        self.state.as_ref().map(PageState::items).unwrap_or(&[])
    }

    pub fn can_paginate(&self) -> bool {
        self.state.as_ref().is_some_and(PageState::can_paginate)
    }

    pub fn is_fetching_next_page(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(PageState::is_fetching_next_page)
    }

    /// Snapshot of the ad-hoc search state, if a search has applied.
    pub fn search_results(&self) -> Option<&PageState<T>> {
        self.search_state.as_ref()
    }

    /// Load page 1 and replace the listing state wholesale.
    ///
    /// On failure the state is left exactly as it was: absent for an
    /// initial load, the previous (stale but consistent) listing for a
    /// refresh. The error is returned for user-visible display.
    pub async fn load_first_page(&mut self) -> Result<&PageState<T>, TransportError> {
        let envelope = self.source.fetch_page(&self.query, None).await?;
        Ok(self.replace_state(envelope))
    }

    /// Re-fetch the listing from its first page.
    pub async fn refresh(&mut self) -> Result<&PageState<T>, TransportError> {
        self.load_first_page().await
    }

    /// Start a next-page fetch, if one is warranted.
    ///
    /// Returns `None` - and changes nothing - unless a further page exists
    /// and no next-page fetch is already in flight. At most one next-page
    /// fetch is in flight per coordinator.
    pub fn begin_next_page(&mut self) -> Option<NextPageRequest> {
        let state = self.state.as_mut()?;
        if !state.can_paginate() || state.is_fetching_next_page() {
            return None;
        }
        state.set_fetching_next_page(true);
        Some(NextPageRequest {
            page: state.page_number() + 1,
            generation: self.generation,
        })
    }

    /// Apply the completion of a next-page fetch.
    ///
    /// Success appends the response's items and adopts its paging metadata.
    /// Failure resets the in-flight flag and nothing else - a failed
    /// load-more never interrupts the list, so no error is surfaced.
    pub fn complete_next_page(
        &mut self,
        request: NextPageRequest,
        result: Result<Page<T>, TransportError>,
    ) {
        if request.generation != self.generation {
            debug!(
                page = request.page,
                "discarding next-page completion for a replaced listing state"
            );
            return;
        }
        let Some(state) = self.state.as_mut() else {
            return;
        };
        state.set_fetching_next_page(false);
        match result {
            Ok(envelope) => {
                debug!(
                    page = envelope.page_number,
                    items = envelope.results.len(),
                    "appending next page"
                );
                state.apply_next_page(envelope, self.merge.as_ref());
            }
            Err(err) => {
                warn!(page = request.page, error = %err, "next-page fetch failed; keeping current items");
            }
        }
    }

    /// Fetch and merge the next page, if one is warranted.
    ///
    /// Returns whether a fetch was issued. The idempotent guard in
    /// [`begin_next_page`](Self::begin_next_page) makes redundant calls
    /// no-ops.
    pub async fn load_next_page(&mut self) -> bool {
        let Some(request) = self.begin_next_page() else {
            return false;
        };
        let result = self.source.fetch_page(&self.query, Some(request.page())).await;
        self.complete_next_page(request, result);
        true
    }

    /// Issue an ad-hoc search query.
    ///
    /// Each call supersedes every earlier one: only the completion for the
    /// most recently issued request will be applied.
    pub fn begin_search(&mut self, text: &str) -> SearchRequest {
        self.search_issued += 1;
        SearchRequest {
            seq: self.search_issued,
            query: ListingQuery::search(text),
        }
    }

    /// Apply the completion of an ad-hoc search fetch.
    ///
    /// The search state is separate from the primary listing and is
    /// replaced wholesale on success. A completion for anything but the
    /// latest issued request is dropped.
    pub fn complete_search(
        &mut self,
        request: SearchRequest,
        result: Result<Page<T>, TransportError>,
    ) -> SearchOutcome {
        if request.seq != self.search_issued {
            debug!(seq = request.seq, latest = self.search_issued, "discarding stale search response");
            return SearchOutcome::Superseded;
        }
        match result {
            Ok(envelope) => {
                self.search_state = Some(PageState::from_envelope(envelope, None));
                SearchOutcome::Applied
            }
            Err(err) => SearchOutcome::Failed(err),
        }
    }

    /// Search and wait for the result; read it via
    /// [`search_results`](Self::search_results).
    pub async fn search(&mut self, text: &str) -> Result<(), TransportError> {
        let request = self.begin_search(text);
        let result = self.source.fetch_page(request.query(), None).await;
        match self.complete_search(request, result) {
            SearchOutcome::Failed(err) => Err(err),
            SearchOutcome::Applied | SearchOutcome::Superseded => Ok(()),
        }
    }

    /// Scroll-position trigger for load-more.
    ///
    /// True once the viewport's trailing edge is within one viewport extent
    /// of the content's end, provided a further page exists and nothing is
    /// in flight. A scrolling view polls this and calls
    /// [`load_next_page`](Self::load_next_page) on true.
    pub fn should_load_next_page(
        &self,
        viewport_offset: f64,
        viewport_extent: f64,
        content_extent: f64,
    ) -> bool {
        let Some(state) = self.state.as_ref() else {
            return false;
        };
        if !state.can_paginate() || state.is_fetching_next_page() {
            return false;
        }
        viewport_offset + 2.0 * viewport_extent >= content_extent
    }

    fn replace_state(&mut self, envelope: Page<T>) -> &PageState<T> {
        self.generation = self.generation.wrapping_add(1);
        let source_key = self.query.source_key().map(str::to_string);
        &*self
            .state
            .insert(PageState::from_envelope(envelope, source_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockPageSource;

    fn envelope(page_number: u32, total_pages: u32, results: Vec<u32>) -> Page<u32> {
        Page {
            page_number,
            total_pages,
            total_results: 100,
            results,
        }
    }

    fn twenty(base: u32) -> Vec<u32> {
        (base..base + 20).collect()
    }

    fn coordinator_with(
        source: MockPageSource<u32>,
    ) -> (Arc<MockPageSource<u32>>, PaginationCoordinator<u32>) {
        let source = Arc::new(source);
        let coordinator = PaginationCoordinator::new(source.clone(), ListingQuery::top_rated());
        (source, coordinator)
    }

    #[tokio::test]
    async fn test_load_first_page_populates_state() {
        let (source, mut coordinator) =
            coordinator_with(MockPageSource::new().with_page(1, envelope(1, 5, twenty(0))));

        let state = coordinator.load_first_page().await.unwrap();
        assert_eq!(state.page_number(), 1);
        assert_eq!(state.items().len(), 20);
        assert_eq!(source.requested(), vec![None]);
        assert!(coordinator.can_paginate());
    }

    #[tokio::test]
    async fn test_load_first_page_failure_leaves_no_state() {
        let (_, mut coordinator) =
            coordinator_with(MockPageSource::new().with_failing_page(1));

        let result = coordinator.load_first_page().await;
        assert!(matches!(result, Err(TransportError::Network(_))));
        assert!(coordinator.state().is_none());
        assert!(coordinator.items().is_empty());
    }

    #[tokio::test]
    async fn test_begin_next_page_is_single_flight() {
        let (source, mut coordinator) =
            coordinator_with(MockPageSource::new().with_page(1, envelope(1, 5, twenty(0))));
        coordinator.load_first_page().await.unwrap();

        let first = coordinator.begin_next_page();
        assert!(first.is_some());
        assert!(coordinator.is_fetching_next_page());

        // Rapid second trigger while the fetch is pending: no-op.
        assert!(coordinator.begin_next_page().is_none());

        let request = first.unwrap();
        assert_eq!(request.page(), 2);
        coordinator.complete_next_page(request, Ok(envelope(2, 5, twenty(20))));
        assert!(!coordinator.is_fetching_next_page());

        // Only the first-page fetch hit the source; begin itself never does.
        assert_eq!(source.calls(), 1);

        // Once completed, pagination can resume.
        assert!(coordinator.begin_next_page().is_some());
    }

    #[tokio::test]
    async fn test_next_page_merge_follows_scroll_scenario() {
        // PageState{page 1 of 5, 20 items} -> threshold trips -> page 2
        // -> 40 items, page 2, flag reset.
        let source = MockPageSource::new()
            .with_page(1, envelope(1, 5, twenty(0)))
            .with_page(2, envelope(2, 5, twenty(20)));
        let (source, mut coordinator) = coordinator_with(source);
        coordinator.load_first_page().await.unwrap();

        // 20 rows of 50pt in a 400pt viewport, scrolled near the end.
        assert!(coordinator.should_load_next_page(350.0, 400.0, 1000.0));
        assert!(coordinator.load_next_page().await);

        let state = coordinator.state().unwrap();
        assert_eq!(state.items().len(), 40);
        assert_eq!(state.items()[..4], [0, 1, 2, 3]);
        assert_eq!(state.items()[20..24], [20, 21, 22, 23]);
        assert_eq!(state.page_number(), 2);
        assert_eq!(state.total_pages(), 5);
        assert_eq!(state.total_results(), 100);
        assert!(!state.is_fetching_next_page());
        assert_eq!(source.requested(), vec![None, Some(2)]);
    }

    #[tokio::test]
    async fn test_next_page_failure_is_silent() {
        let source = MockPageSource::new()
            .with_page(1, envelope(1, 5, twenty(0)))
            .with_failing_page(2);
        let (source, mut coordinator) = coordinator_with(source);
        coordinator.load_first_page().await.unwrap();

        // load_next_page has no error channel at all; the fetch was
        // issued, the state is untouched, and the flag is reset.
        assert!(coordinator.load_next_page().await);
        assert_eq!(source.calls(), 2);

        let state = coordinator.state().unwrap();
        assert_eq!(state.items().len(), 20);
        assert_eq!(state.page_number(), 1);
        assert!(!state.is_fetching_next_page());

        // The guard is released, so a later trigger retries page 2.
        assert!(coordinator.begin_next_page().is_some());
    }

    #[tokio::test]
    async fn test_no_pagination_past_last_page() {
        let (source, mut coordinator) =
            coordinator_with(MockPageSource::new().with_page(1, envelope(1, 1, twenty(0))));
        coordinator.load_first_page().await.unwrap();

        assert!(!coordinator.can_paginate());
        assert!(!coordinator.load_next_page().await);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_can_paginate_false_even_with_results_remaining() {
        // total_results stays positive; page_number == total_pages decides.
        let (_, mut coordinator) =
            coordinator_with(MockPageSource::new().with_page(1, envelope(5, 5, twenty(0))));
        coordinator.load_first_page().await.unwrap();
        assert_eq!(coordinator.state().unwrap().total_results(), 100);
        assert!(!coordinator.can_paginate());
    }

    #[tokio::test]
    async fn test_refresh_replaces_wholesale() {
        let source = MockPageSource::new()
            .with_page(1, envelope(1, 5, twenty(0)))
            .with_page(2, envelope(2, 5, twenty(20)));
        let (source, mut coordinator) = coordinator_with(source);
        coordinator.load_first_page().await.unwrap();
        coordinator.load_next_page().await;
        assert_eq!(coordinator.items().len(), 40);

        // The catalog changed server-side; refresh starts over.
        source.set_page(1, envelope(1, 2, vec![7, 8, 9]));
        let state = coordinator.refresh().await.unwrap();
        assert_eq!(state.items(), &[7, 8, 9]);
        assert_eq!(state.page_number(), 1);
        assert_eq!(state.total_pages(), 2);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_state() {
        let (source, mut coordinator) =
            coordinator_with(MockPageSource::new().with_page(1, envelope(1, 5, twenty(0))));
        coordinator.load_first_page().await.unwrap();

        source.set_failing(1);
        let result = coordinator.refresh().await;
        assert!(result.is_err());

        // Stale but consistent.
        let state = coordinator.state().unwrap();
        assert_eq!(state.items().len(), 20);
        assert_eq!(state.page_number(), 1);
    }

    #[tokio::test]
    async fn test_stale_next_page_completion_is_discarded_after_refresh() {
        let (_, mut coordinator) =
            coordinator_with(MockPageSource::new().with_page(1, envelope(1, 5, twenty(0))));
        coordinator.load_first_page().await.unwrap();

        let stale = coordinator.begin_next_page().unwrap();

        // A refresh lands while page 2 is still in flight.
        coordinator.refresh().await.unwrap();
        assert!(!coordinator.is_fetching_next_page());

        // The late page-2 completion must not merge into the new state.
        coordinator.complete_next_page(stale, Ok(envelope(2, 5, twenty(20))));
        assert_eq!(coordinator.items().len(), 20);
        assert_eq!(coordinator.state().unwrap().page_number(), 1);
    }

    #[tokio::test]
    async fn test_search_uses_separate_state() {
        let (_, mut coordinator) =
            coordinator_with(MockPageSource::new().with_page(1, envelope(1, 5, twenty(0))));
        coordinator.load_first_page().await.unwrap();

        let request = coordinator.begin_search("heat");
        let outcome = coordinator.complete_search(request, Ok(envelope(1, 1, vec![90, 91])));
        assert!(matches!(outcome, SearchOutcome::Applied));

        assert_eq!(coordinator.search_results().unwrap().items(), &[90, 91]);
        // Primary listing untouched.
        assert_eq!(coordinator.items().len(), 20);
    }

    #[tokio::test]
    async fn test_stale_search_response_cannot_overwrite_newer() {
        let (_, mut coordinator) = coordinator_with(MockPageSource::new());

        let older = coordinator.begin_search("god");
        let newer = coordinator.begin_search("godfather");

        let outcome = coordinator.complete_search(newer, Ok(envelope(1, 1, vec![238])));
        assert!(matches!(outcome, SearchOutcome::Applied));

        // The older query's late response arrives afterwards and is inert.
        let outcome = coordinator.complete_search(older, Ok(envelope(1, 1, vec![1, 2, 3])));
        assert!(matches!(outcome, SearchOutcome::Superseded));
        assert_eq!(coordinator.search_results().unwrap().items(), &[238]);
    }

    #[tokio::test]
    async fn test_search_failure_keeps_previous_results() {
        let (source, mut coordinator) = coordinator_with(
            MockPageSource::new().with_page(1, envelope(1, 1, vec![5, 6])),
        );
        coordinator.search("first").await.unwrap();
        assert_eq!(coordinator.search_results().unwrap().items(), &[5, 6]);

        source.set_failing(1);
        let result = coordinator.search("second").await;
        assert!(result.is_err());
        assert_eq!(coordinator.search_results().unwrap().items(), &[5, 6]);
    }

    #[tokio::test]
    async fn test_should_load_next_page_threshold() {
        let (_, mut coordinator) =
            coordinator_with(MockPageSource::new().with_page(1, envelope(1, 5, twenty(0))));

        // No state yet: never trigger.
        assert!(!coordinator.should_load_next_page(900.0, 400.0, 1000.0));

        coordinator.load_first_page().await.unwrap();

        // Far from the end.
        assert!(!coordinator.should_load_next_page(0.0, 400.0, 2000.0));
        // Trailing edge within one viewport of the end.
        assert!(coordinator.should_load_next_page(1200.0, 400.0, 2000.0));

        // In flight: suppressed.
        let request = coordinator.begin_next_page().unwrap();
        assert!(!coordinator.should_load_next_page(1200.0, 400.0, 2000.0));
        coordinator.complete_next_page(
            request,
            Err(TransportError::Network("scripted".to_string())),
        );
        assert!(coordinator.should_load_next_page(1200.0, 400.0, 2000.0));
    }

    #[tokio::test]
    async fn test_seeded_coordinator_paginates_from_seed() {
        let source = Arc::new(
            MockPageSource::new().with_page(2, envelope(2, 2, vec![30, 31])),
        );
        let mut coordinator = PaginationCoordinator::seeded(
            source.clone(),
            ListingQuery::similar(238),
            envelope(1, 2, vec![10, 11]),
        );

        assert_eq!(coordinator.state().unwrap().source_key(), Some("238"));
        assert!(coordinator.load_next_page().await);
        assert_eq!(coordinator.items(), &[10, 11, 30, 31]);
        assert!(!coordinator.can_paginate());
        assert_eq!(source.requested(), vec![Some(2)]);
    }

    #[tokio::test]
    async fn test_dedup_merge_policy_filters_overlapping_pages() {
        let source = MockPageSource::new()
            .with_page(1, envelope(1, 2, vec![1, 2, 3]))
            .with_page(2, envelope(2, 2, vec![3, 4]));
        let source = Arc::new(source);
        let mut coordinator =
            PaginationCoordinator::new(source.clone(), ListingQuery::top_rated())
                .with_merge_policy(Box::new(super::super::merge::DedupMerge::by_key(
                    |item: &u32| *item,
                )));

        coordinator.load_first_page().await.unwrap();
        coordinator.load_next_page().await;
        assert_eq!(coordinator.items(), &[1, 2, 3, 4]);
    }
}
