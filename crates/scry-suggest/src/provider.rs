//! Combines every source into a stream of progressively refined snapshots.

use std::{
    collections::HashSet,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use futures_util::Stream;
use scry_query::{FilterExpr, PartialFilterTerm};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, trace};

use crate::{
    catalog::CatalogClient,
    sources::{
        EnumeratedValueSource, FilterKeySource, NameSource, ReverseValueSource, StoredFilterSource,
        StoredKind, SuggestionSource,
    },
    store::FilterStore,
    suggestion::Suggestion,
    task::AbortOnDrop,
};

/// Runs every source for the term being typed and merges their results.
///
/// Sources are consulted in priority order: pinned, history, filter key, enumerated value,
/// reverse enumerated value, then card names. A candidate already offered by an earlier
/// source is dropped from later ones. Each source contributes at most `limit` results.
pub struct SuggestionProvider<C> {
    /// Pinned filters.
    pinned: StoredFilterSource,
    /// Recently applied filters.
    history: StoredFilterSource,
    /// Key completion.
    keys: FilterKeySource,
    /// Enumerated values.
    values: EnumeratedValueSource,
    /// Operator alternatives.
    operators: ReverseValueSource,
    /// Card names, shared with the lookup task.
    names: Arc<NameSource<C>>,
}

impl<C> SuggestionProvider<C>
where
    C: CatalogClient + 'static,
{
    /// Creates a provider over the given stores and name source, using the standard vocabulary.
    pub fn new(
        pinned: Arc<dyn FilterStore>,
        history: Arc<dyn FilterStore>,
        names: NameSource<C>,
    ) -> Self {
        Self {
            pinned: StoredFilterSource::new(StoredKind::Pinned, pinned),
            history: StoredFilterSource::new(StoredKind::History, history),
            keys: FilterKeySource::default(),
            values: EnumeratedValueSource::default(),
            operators: ReverseValueSource::default(),
            names: Arc::new(names),
        }
    }

    /// Merges the synchronous sources for `term`.
    pub fn synchronous(
        &self,
        term: &PartialFilterTerm,
        existing: &HashSet<FilterExpr>,
        limit: usize,
    ) -> Vec<Suggestion> {
        let sources: [&dyn SuggestionSource; 5] = [
            &self.pinned,
            &self.history,
            &self.keys,
            &self.values,
            &self.operators,
        ];
        let mut merged = Merged::default();
        for source in sources {
            merged.extend(source.suggestions(term, existing, limit));
        }
        merged.into_inner()
    }

    /// Streams suggestions for `input`, the text of the term being edited.
    ///
    /// The first snapshot holds the synchronous sources. When the term is a name long enough
    /// to look up, a second snapshot adds catalog names once the debounced lookup finishes.
    /// Filters in `existing` are never suggested. Must be called within a tokio runtime.
    pub fn suggestions(
        &self,
        input: &str,
        existing: &HashSet<FilterExpr>,
        limit: usize,
    ) -> SuggestionStream {
        self.stream(PartialFilterTerm::parse(input.trim()), existing, limit)
    }

    /// Streams suggestions for the term under byte `offset` of a multi-term buffer.
    pub fn suggestions_at(
        &self,
        buffer: &str,
        offset: usize,
        existing: &HashSet<FilterExpr>,
        limit: usize,
    ) -> SuggestionStream {
        self.stream(PartialFilterTerm::term_at(buffer, offset), existing, limit)
    }

    /// Emits the synchronous snapshot and spawns the name lookup if the term qualifies.
    ///
    /// Every call supersedes the name lookup of earlier streams, even when this term does not
    /// look names up itself.
    fn stream(
        &self,
        term: PartialFilterTerm,
        existing: &HashSet<FilterExpr>,
        limit: usize,
    ) -> SuggestionStream {
        let ticket = self.names.invalidate();
        let first = self.synchronous(&term, existing, limit);
        trace!(count = first.len(), "synchronous snapshot ready");

        if !self.names.is_eligible(&term) {
            return SuggestionStream {
                first: Some(first),
                rest: None,
                _task: None,
            };
        }

        let (tx, rx) = mpsc::channel(1);
        let names = Arc::clone(&self.names);
        let existing = existing.clone();
        let mut merged = Merged::default();
        merged.extend(first.clone());

        let task = tokio::spawn(async move {
            let Some(found) = names
                .ticketed_suggestions(ticket, &term, &existing, limit)
                .await
            else {
                debug!("names superseded by newer input");
                return;
            };
            merged.extend(found);
            let snapshot = merged.into_inner();
            trace!(count = snapshot.len(), "name snapshot ready");
            if tx.send(snapshot).await.is_err() {
                debug!("suggestion stream dropped before names arrived");
            }
        });

        SuggestionStream {
            first: Some(first),
            rest: Some(ReceiverStream::new(rx)),
            _task: Some(AbortOnDrop(task.abort_handle())),
        }
    }
}

/// Suggestions in priority order, without repeated candidates.
#[derive(Debug, Default)]
struct Merged {
    /// Accepted suggestions.
    suggestions: Vec<Suggestion>,
    /// Renderings already accepted.
    seen: HashSet<String>,
}

impl Merged {
    /// Appends suggestions whose rendering has not been seen.
    fn extend(&mut self, suggestions: Vec<Suggestion>) {
        for suggestion in suggestions {
            if self.seen.insert(suggestion.rendered()) {
                self.suggestions.push(suggestion);
            }
        }
    }

    /// The merged list.
    fn into_inner(self) -> Vec<Suggestion> {
        self.suggestions
    }
}

/// Snapshots of the merged suggestion list, each one superseding the last.
///
/// Dropping the stream aborts any pending name lookup, including its debounce timer and
/// outstanding catalog request.
pub struct SuggestionStream {
    /// The synchronous snapshot, until it is taken.
    first: Option<Vec<Suggestion>>,
    /// Later snapshots from the lookup task.
    rest: Option<ReceiverStream<Vec<Suggestion>>>,
    /// The lookup task, aborted on drop.
    _task: Option<AbortOnDrop>,
}

impl Stream for SuggestionStream {
    type Item = Vec<Suggestion>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(first) = self.first.take() {
            return Poll::Ready(Some(first));
        }
        match self.rest.as_mut() {
            Some(rest) => Pin::new(rest).poll_next(cx),
            None => Poll::Ready(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures_util::StreamExt;
    use scry_query::{Comparison, FilterTerm};
    use tokio::time;

    use super::*;
    use crate::{catalog::StaticCatalog, store::MemoryStore, suggestion::SuggestionKind};

    fn kv(key: &str, value: &str) -> FilterExpr {
        FilterTerm::key_value(key, Comparison::Including, value).into()
    }

    fn provider(
        pinned: Vec<FilterExpr>,
        history: Vec<FilterExpr>,
        catalog: &Arc<StaticCatalog>,
    ) -> SuggestionProvider<StaticCatalog> {
        SuggestionProvider::new(
            Arc::new(MemoryStore::new().with_entries(pinned)),
            Arc::new(MemoryStore::new().with_entries(history)),
            NameSource::new(Arc::clone(catalog), Duration::from_millis(250), 2),
        )
    }

    fn rendered(snapshot: &[Suggestion]) -> Vec<String> {
        snapshot.iter().map(Suggestion::rendered).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn synchronous_sources_merge_in_priority_order() {
        let catalog = Arc::new(StaticCatalog::default());
        let provider = provider(
            vec![kv("f", "modern")],
            vec![kv("f", "modern"), kv("f", "pioneer")],
            &catalog,
        );

        let mut stream = provider.suggestions("f:mo", &HashSet::new(), 10);
        let first = stream.next().await.unwrap();

        assert!(matches!(first[0].kind, SuggestionKind::Pinned(_)));
        assert_eq!(first[0].rendered(), "f:modern");
        let names = rendered(&first);
        assert_eq!(names.iter().filter(|r| *r == "f:modern").count(), 1);
        assert!(names.contains(&"f:premodern".to_string()));
        assert!(!names.contains(&"f:pioneer".to_string()));
        assert!(stream.next().await.is_none());
        assert!(catalog.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn names_arrive_in_a_second_snapshot() {
        let catalog = Arc::new(StaticCatalog::new(["Lightning Bolt", "Lightning Helix"]));
        let provider = provider(
            Vec::new(),
            vec![FilterTerm::name("Lightning Bolt").into()],
            &catalog,
        );

        let mut stream = provider.suggestions("light", &HashSet::new(), 10);
        let first = stream.next().await.unwrap();
        assert_eq!(rendered(&first), vec!["\"Lightning Bolt\""]);

        let second = stream.next().await.unwrap();
        assert_eq!(
            rendered(&second),
            vec!["\"Lightning Bolt\"", "\"Lightning Helix\""]
        );
        assert!(matches!(second[0].kind, SuggestionKind::History(_)));
        assert!(matches!(second[1].kind, SuggestionKind::Name(_)));
        assert!(stream.next().await.is_none());
        assert_eq!(catalog.requests(), vec!["light"]);
    }

    #[tokio::test(start_paused = true)]
    async fn existing_filters_are_excluded_everywhere() {
        let catalog = Arc::new(StaticCatalog::new(["Shock", "Shockwave"]));
        let provider = provider(Vec::new(), Vec::new(), &catalog);
        let existing = HashSet::from([FilterExpr::from(FilterTerm::name("Shock"))]);

        let snapshots: Vec<Vec<Suggestion>> =
            provider.suggestions("shock", &existing, 10).collect().await;

        let last = snapshots.last().unwrap();
        assert_eq!(rendered(last), vec!["Shockwave"]);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_stream_cancels_the_lookup() {
        let catalog = Arc::new(StaticCatalog::new(["Lightning Bolt"]));
        let provider = provider(Vec::new(), Vec::new(), &catalog);

        let mut stream = provider.suggestions("bolt", &HashSet::new(), 10);
        stream.next().await.unwrap();
        time::sleep(Duration::from_millis(100)).await;
        drop(stream);
        time::sleep(Duration::from_secs(1)).await;

        assert!(catalog.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn newer_input_without_names_ends_the_older_stream() {
        let catalog = Arc::new(StaticCatalog::new(["Lightning Bolt"]));
        let provider = provider(Vec::new(), Vec::new(), &catalog);

        let mut older = provider.suggestions("light", &HashSet::new(), 10);
        older.next().await.unwrap();
        time::sleep(Duration::from_millis(100)).await;
        let newer: Vec<Vec<Suggestion>> =
            provider.suggestions("c:red", &HashSet::new(), 10).collect().await;

        assert_eq!(newer.len(), 1);
        assert!(older.next().await.is_none());
        assert!(catalog.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_stream_sends_only_its_first_snapshot() {
        let catalog = Arc::new(StaticCatalog::new(["Lightning Bolt", "Lightning Helix"]));
        let provider = provider(Vec::new(), Vec::new(), &catalog);

        let mut older = provider.suggestions("light", &HashSet::new(), 10);
        let mut newer = provider.suggestions("lightning", &HashSet::new(), 10);
        older.next().await.unwrap();
        newer.next().await.unwrap();

        assert!(older.next().await.is_none());
        let names = newer.next().await.unwrap();
        assert_eq!(
            rendered(&names),
            vec!["\"Lightning Bolt\"", "\"Lightning Helix\""]
        );
        assert_eq!(catalog.requests(), vec!["lightning"]);
    }

    #[tokio::test(start_paused = true)]
    async fn term_under_cursor_is_completed() {
        let catalog = Arc::new(StaticCatalog::default());
        let provider = provider(Vec::new(), Vec::new(), &catalog);

        let mut stream = provider.suggestions_at("c:red fo", 8, &HashSet::new(), 10);
        let first = stream.next().await.unwrap();
        assert_eq!(first[0].rendered(), "fo:");
    }
}
