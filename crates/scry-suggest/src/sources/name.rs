//! Debounced card-name lookup.

use std::{collections::HashSet, sync::Arc, time::Duration};

use parking_lot::Mutex;
use scry_query::{
    FilterExpr, FilterTerm, FilterValue, PartialContent, PartialFilterTerm, PartialText, QuoteKind,
};
use tokio::{task::AbortHandle, time};
use tracing::{debug, warn};

use crate::{
    catalog::CatalogClient,
    matching::{classify, find_ignore_case},
    suggestion::{PrefixKind, Suggestion, SuggestionKind},
    task::AbortOnDrop,
};

/// The single outstanding lookup.
#[derive(Debug, Default)]
struct Slot {
    /// Incremented whenever the input changes.
    generation: u64,
    /// Handle to the newest lookup while it is running.
    pending: Option<AbortHandle>,
}

/// The right to run the lookup for one input, handed out by [`NameSource::invalidate`].
///
/// A ticket goes stale as soon as a later one is handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupTicket(u64);

/// Suggests card names from a [`CatalogClient`].
///
/// Each call waits out the debounce delay before sending a request. Starting a new call aborts
/// the previous one, whether it is still waiting or already talking to the catalog, so only
/// the newest input ever produces results. Dropping the returned future aborts its lookup.
pub struct NameSource<C> {
    /// The catalog.
    client: Arc<C>,
    /// Quiet period before a request is sent.
    debounce: Duration,
    /// Minimum fragment length, in characters, before looking anything up.
    min_length: usize,
    /// The latest lookup.
    slot: Mutex<Slot>,
}

impl<C> NameSource<C>
where
    C: CatalogClient + 'static,
{
    /// Creates a source over `client`.
    pub fn new(client: Arc<C>, debounce: Duration, min_length: usize) -> Self {
        Self {
            client,
            debounce,
            min_length,
            slot: Mutex::new(Slot::default()),
        }
    }

    /// Whether `term` is a name long enough to look up.
    pub fn is_eligible(&self, term: &PartialFilterTerm) -> bool {
        let PartialContent::Name { text, .. } = &term.content else {
            return false;
        };
        let regex = matches!(
            text,
            PartialText::Balanced { quote: QuoteKind::Regex, .. }
                | PartialText::Unterminated { quote: QuoteKind::Regex, .. }
        );
        !regex && text.text().trim().chars().count() >= self.min_length.max(1)
    }

    /// Marks the input as changed. Any pending lookup is aborted and can no longer deliver.
    pub fn invalidate(&self) -> LookupTicket {
        let mut slot = self.slot.lock();
        slot.generation += 1;
        if let Some(previous) = slot.pending.take() {
            previous.abort();
        }
        LookupTicket(slot.generation)
    }

    /// Looks up names for `term` after the debounce delay.
    ///
    /// Returns an empty list when the term is not eligible, when a newer call superseded this
    /// one, or when the catalog fails. An ineligible term still cancels the pending lookup.
    pub async fn suggestions(
        &self,
        term: &PartialFilterTerm,
        excluding: &HashSet<FilterExpr>,
        limit: usize,
    ) -> Vec<Suggestion> {
        let ticket = self.invalidate();
        self.ticketed_suggestions(ticket, term, excluding, limit)
            .await
            .unwrap_or_default()
    }

    /// Looks up names for `term` under a ticket taken earlier from [`NameSource::invalidate`].
    ///
    /// `None` when there is nothing to deliver: the term is ineligible, or the ticket went
    /// stale before or during the lookup. A failed catalog request is an empty list.
    pub async fn ticketed_suggestions(
        &self,
        ticket: LookupTicket,
        term: &PartialFilterTerm,
        excluding: &HashSet<FilterExpr>,
        limit: usize,
    ) -> Option<Vec<Suggestion>> {
        if !self.is_eligible(term) {
            return None;
        }
        let fragment = term.fragment().trim().to_string();
        let names = self.lookup(ticket, fragment.clone()).await?;
        Some(rank(term, &fragment, names, excluding, limit))
    }

    /// Runs one debounced request under `ticket`.
    ///
    /// `None` when the ticket is stale or goes stale before the request completes.
    async fn lookup(&self, ticket: LookupTicket, fragment: String) -> Option<Vec<String>> {
        let LookupTicket(generation) = ticket;

        let client = Arc::clone(&self.client);
        let debounce = self.debounce;
        let task = tokio::spawn(async move {
            time::sleep(debounce).await;
            client.autocomplete(&fragment).await
        });
        let _guard = AbortOnDrop(task.abort_handle());

        {
            let mut slot = self.slot.lock();
            if slot.generation != generation {
                task.abort();
                debug!(generation, "card name lookup superseded before it started");
                return None;
            }
            if let Some(previous) = slot.pending.replace(task.abort_handle()) {
                previous.abort();
            }
        }

        let result = task.await;

        let current = {
            let mut slot = self.slot.lock();
            let current = slot.generation == generation;
            if current {
                slot.pending = None;
            }
            current
        };

        match result {
            Ok(Ok(names)) if current => Some(names),
            Ok(Ok(_)) => {
                debug!(generation, "discarding names for superseded input");
                None
            }
            Ok(Err(err)) if current => {
                warn!(error = %err, "card name lookup failed");
                Some(Vec::new())
            }
            Ok(Err(_)) => None,
            Err(err) if err.is_cancelled() => {
                debug!(generation, "card name lookup cancelled");
                None
            }
            Err(err) => {
                warn!(error = %err, "card name lookup task failed");
                None
            }
        }
    }
}

/// Turns catalog names into ranked suggestions carrying the term's markers.
fn rank(
    term: &PartialFilterTerm,
    fragment: &str,
    names: Vec<String>,
    excluding: &HashSet<FilterExpr>,
    limit: usize,
) -> Vec<Suggestion> {
    let literal_match = matches!(
        term.content,
        PartialContent::Name {
            literal_match: true,
            ..
        }
    );
    let negated = term.polarity.is_negative();

    let mut candidates: Vec<(usize, Suggestion)> = names
        .into_iter()
        .enumerate()
        .filter_map(|(order, name)| {
            let expr = FilterExpr::from(FilterTerm::Name {
                negated,
                literal_match,
                value: FilterValue::Text(name),
            });
            if excluding.contains(&expr) {
                return None;
            }
            let rendered = expr.to_string();
            let range = find_ignore_case(&rendered, fragment);
            let prefix = range
                .as_ref()
                .map_or(PrefixKind::None, |r| classify(&rendered, r));
            Some((order, Suggestion::new(SuggestionKind::Name(expr), range, prefix)))
        })
        .collect();

    candidates.sort_by_key(|(order, s)| (s.prefix_kind, s.match_len, *order));
    candidates
        .into_iter()
        .take(limit)
        .map(|(_, suggestion)| suggestion)
        .collect()
}
