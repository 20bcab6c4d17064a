use crate::catalog::{self, CatalogStore};
use crate::config::HistoryWritePolicy;
use crate::error::{AppError, Result};
use crate::metrics::{
    HISTORY_WRITES_TOTAL, PREFERENCE_REQUESTS_TOTAL, SEARCHES_TOTAL, TAG_BOOSTS_TOTAL,
};
use crate::models::{CatalogItem, NewHistoryEntry, Preferences, TagCounts};
use crate::preferences::PreferenceAggregator;
use crate::state::HistoryStore;
use std::sync::Arc;

/// Outcome of a successful tag boost
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagBoost {
    /// Canonical catalog name of the boosted item
    pub name: String,

    /// Counters after the boost
    pub tags: TagCounts,
}

/// Coordinates the catalog, the history log and preference aggregation
pub struct CatalogProcessor {
    catalog: Arc<CatalogStore>,
    history: Arc<dyn HistoryStore>,
    aggregator: PreferenceAggregator,
    policy: HistoryWritePolicy,
}

impl CatalogProcessor {
    pub fn new(catalog: Arc<CatalogStore>, history: Arc<dyn HistoryStore>) -> Self {
        Self {
            aggregator: PreferenceAggregator::new(history.clone()),
            catalog,
            history,
            policy: HistoryWritePolicy::default(),
        }
    }

    /// Set how history write failures are handled
    pub fn with_write_policy(mut self, policy: HistoryWritePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Get a reference to the catalog
    pub fn catalog(&self) -> &Arc<CatalogStore> {
        &self.catalog
    }

    /// Get a reference to the history store
    pub fn history(&self) -> &Arc<dyn HistoryStore> {
        &self.history
    }

    pub fn write_policy(&self) -> HistoryWritePolicy {
        self.policy
    }

    /// Search the catalog and record the query in the user's history.
    ///
    /// Blank queries return nothing and leave history untouched.
    pub async fn search(&self, user: &str, query: &str) -> Result<Vec<CatalogItem>> {
        let Some(normalized) = catalog::normalize_query(query) else {
            SEARCHES_TOTAL.with_label_values(&["empty"]).inc();
            tracing::debug!(user = %user, "Empty query, skipping search");
            return Ok(Vec::new());
        };

        let results = catalog::search(&self.catalog, &normalized).await;
        let outcome = if results.is_empty() { "miss" } else { "hit" };
        SEARCHES_TOTAL.with_label_values(&[outcome]).inc();

        tracing::info!(
            user = %user,
            query = %normalized,
            matches = results.len(),
            "Catalog searched"
        );

        self.write_history(NewHistoryEntry::search(user, normalized, &results))
            .await?;

        Ok(results)
    }

    /// Add 1 to every tag of the named item and record the new counters.
    ///
    /// The item stays locked until the history write completes. Under the
    /// strict policy a failed write rolls the counters back.
    pub async fn increment_tags(&self, user: &str, name: &str) -> Result<TagBoost> {
        let mut guard = match self.catalog.lock_item(name).await {
            Ok(guard) => guard,
            Err(e) => {
                TAG_BOOSTS_TOTAL.with_label_values(&["not_found"]).inc();
                tracing::debug!(user = %user, item = %name, "Boost on unknown item");
                return Err(e);
            }
        };

        let tags = guard.increment();
        let canonical = guard.name().to_string();

        if let Err(e) = self
            .write_history(NewHistoryEntry::boost(user, canonical.clone(), tags.clone()))
            .await
        {
            guard.revert_increment();
            TAG_BOOSTS_TOTAL.with_label_values(&["failed"]).inc();
            tracing::warn!(user = %user, item = %canonical, "Boost rolled back");
            return Err(e);
        }
        drop(guard);

        TAG_BOOSTS_TOTAL.with_label_values(&["ok"]).inc();
        tracing::info!(user = %user, item = %canonical, "Tags boosted");

        Ok(TagBoost {
            name: canonical,
            tags,
        })
    }

    /// Aggregate the user's history into a tag profile
    pub async fn get_preferences(&self, user: &str) -> Result<Preferences> {
        match self.aggregator.aggregate(user).await {
            Ok(prefs) => {
                let outcome = match prefs {
                    Preferences::NoHistory => "no_history",
                    Preferences::Profile(_) => "profile",
                };
                PREFERENCE_REQUESTS_TOTAL.with_label_values(&[outcome]).inc();
                Ok(prefs)
            }
            Err(e) => {
                PREFERENCE_REQUESTS_TOTAL.with_label_values(&["error"]).inc();
                Err(e)
            }
        }
    }

    /// Append to the history log, applying the configured failure policy
    async fn write_history(&self, entry: NewHistoryEntry) -> Result<()> {
        let kind = entry.kind().to_string();

        match self.history.append(entry).await {
            Ok(stored) => {
                HISTORY_WRITES_TOTAL.with_label_values(&[&kind, "ok"]).inc();
                tracing::debug!(entry_id = stored.id, kind = %kind, "History recorded");
                Ok(())
            }
            Err(e) => {
                HISTORY_WRITES_TOTAL.with_label_values(&[&kind, "failed"]).inc();
                match self.policy {
                    HistoryWritePolicy::Strict => {
                        tracing::error!(error = %e, kind = %kind, "History write failed");
                        Err(match e {
                            AppError::Persistence(_) => e,
                            other => AppError::Persistence(other.to_string()),
                        })
                    }
                    HistoryWritePolicy::BestEffort => {
                        tracing::warn!(error = %e, kind = %kind, "History write failed, continuing");
                        Ok(())
                    }
                }
            }
        }
    }
}
