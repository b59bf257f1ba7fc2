//! Favorites management
//!
//! The per-user list of saved articles. A collection is a JSON array of
//! [`Article`] stored under the current [`OwnerKey`] in an injected
//! [`KeyValueStore`], kept in insertion order and unique by `url`.
//!
//! Storage failures never reach the caller: a read that fails or does not
//! parse is treated as "no favorites", and a failed write is logged and
//! dropped. Callers cannot tell a saved toggle from a lost one.

pub mod notify;
pub mod owner;

pub use notify::{ChangeNotifier, FavoritesChanged, FavoritesView};
pub use owner::OwnerKey;

use itertools::Itertools;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{NewsError, Result};
use crate::models::Article;
use crate::session::IdentityProvider;
use crate::storage::KeyValueStore;

/// Saved articles for whoever is currently signed in
pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
    identity: Arc<dyn IdentityProvider>,
    notifier: ChangeNotifier,
}

impl FavoritesStore {
    pub fn new(store: Arc<dyn KeyValueStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self::with_notifier(store, identity, ChangeNotifier::new())
    }

    /// Build a store that broadcasts on an existing channel.
    ///
    /// Several stores sharing one notifier keep each other's views in sync.
    pub fn with_notifier(
        store: Arc<dyn KeyValueStore>,
        identity: Arc<dyn IdentityProvider>,
        notifier: ChangeNotifier,
    ) -> Self {
        Self {
            store,
            identity,
            notifier,
        }
    }

    /// Owner the next operation will act on.
    pub fn owner_key(&self) -> OwnerKey {
        OwnerKey::from_identity(self.identity.current_email().as_deref())
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// Subscribe a new view, seeded with the current collection.
    pub fn subscribe(&self) -> FavoritesView {
        let receiver = self.notifier.subscribe();
        FavoritesView::new(receiver, self.load_favorites())
    }

    /// Current owner's favorites in insertion order.
    ///
    /// Missing, unreadable and unparseable collections all load as empty.
    #[instrument(level = "debug", skip(self))]
    pub fn load_favorites(&self) -> Vec<Article> {
        let owner = self.owner_key();
        self.load_for(&owner)
    }

    /// Whether an article with this URL is saved for the current owner.
    pub fn is_favorite(&self, url: &str) -> bool {
        self.load_favorites().iter().any(|a| a.url == url)
    }

    /// Number of saved articles for the current owner.
    pub fn count(&self) -> usize {
        self.load_favorites().len()
    }

    /// Add the article if absent, remove it if present.
    ///
    /// Membership is decided by `url` alone. Additions go to the end of
    /// the collection; removals keep the order of the rest.
    ///
    /// # Arguments
    ///
    /// * `article` - The article to save or unsave; its full record is stored
    ///
    /// # Returns
    ///
    /// The new membership state: `true` when the article is now saved.
    ///
    /// # Errors
    ///
    /// [`NewsError::InvalidArticle`] when `article.url` is empty. A failed
    /// write is logged and dropped, not returned. Every accepted toggle
    /// broadcasts a change, whether or not the write succeeded.
    #[instrument(level = "info", skip_all, fields(url = %article.url))]
    pub fn toggle_favorite(&self, article: &Article) -> Result<bool> {
        if article.url.is_empty() {
            return Err(NewsError::InvalidArticle(
                "article url must not be empty".to_string(),
            ));
        }

        let owner = self.owner_key();
        let mut favorites = self.load_for(&owner);

        let saved = match favorites.iter().position(|a| a.url == article.url) {
            Some(index) => {
                favorites.remove(index);
                info!(%owner, "Removed favorite");
                false
            }
            None => {
                favorites.push(article.clone());
                info!(%owner, "Added favorite");
                true
            }
        };

        self.persist(&owner, &favorites);
        self.notifier.notify();
        Ok(saved)
    }

    /// Delete the current owner's collection after `confirm` approves.
    ///
    /// Returns `false` without touching storage when the confirmation is
    /// declined.
    #[instrument(level = "info", skip_all)]
    pub fn clear_favorites(&self, confirm: impl FnOnce() -> bool) -> bool {
        if !confirm() {
            debug!("Clear favorites declined");
            return false;
        }

        let owner = self.owner_key();
        if let Err(e) = self.store.remove(&owner.storage_key()) {
            error!(%owner, error = %e, "Failed to clear favorites");
        } else {
            info!(%owner, "Cleared favorites");
        }
        self.notifier.notify();
        true
    }

    fn load_for(&self, owner: &OwnerKey) -> Vec<Article> {
        let key = owner.storage_key();
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(%owner, error = %e, "Error loading favorites");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Article>>(&raw) {
            Ok(articles) => articles.into_iter().unique_by(|a| a.url.clone()).collect(),
            Err(e) => {
                warn!(%owner, error = %e, "Stored favorites are not valid JSON; treating as empty");
                Vec::new()
            }
        }
    }

    fn persist(&self, owner: &OwnerKey, favorites: &[Article]) {
        let json = match serde_json::to_string(favorites) {
            Ok(json) => json,
            Err(e) => {
                error!(%owner, error = %e, "Failed to serialize favorites");
                return;
            }
        };
        if let Err(e) = self.store.set(&owner.storage_key(), &json) {
            error!(%owner, error = %e, "Failed to save favorites");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::StaticIdentity;
    use crate::storage::MemoryStore;
    use std::sync::Mutex;

    fn article(n: u32) -> Article {
        Article::new(format!("Story {n}"), format!("https://e.com/{n}"))
            .with_description(format!("Description {n}"))
            .with_published_at("2025-05-06T14:30:00Z")
            .with_source("Example Wire")
    }

    fn store_for(
        kv: &Arc<dyn KeyValueStore>,
        email: Option<&str>,
    ) -> FavoritesStore {
        FavoritesStore::new(
            kv.clone(),
            Arc::new(StaticIdentity(email.map(str::to_string))),
        )
    }

    fn memory() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    /// Switchable identity for sign-in / sign-out scenarios
    struct SwitchIdentity(Mutex<Option<String>>);

    impl IdentityProvider for SwitchIdentity {
        fn current_email(&self) -> Option<String> {
            self.0.lock().unwrap().clone()
        }
    }

    /// Store whose writes always fail
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(NewsError::Storage("quota exceeded".to_string()))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Err(NewsError::Storage("quota exceeded".to_string()))
        }
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let favorites = store_for(&memory(), None);
        let a = article(1);

        assert!(favorites.toggle_favorite(&a).unwrap());
        assert!(favorites.is_favorite(&a.url));

        assert!(!favorites.toggle_favorite(&a).unwrap());
        assert!(!favorites.is_favorite(&a.url));
    }

    #[test]
    fn test_fresh_owner_is_empty() {
        let favorites = store_for(&memory(), Some("new@x.com"));
        assert!(favorites.load_favorites().is_empty());
        assert_eq!(favorites.count(), 0);
    }

    #[test]
    fn test_save_reload_remove_scenario() {
        let kv = memory();
        let a = Article::new("One", "https://e.com/1");

        store_for(&kv, None).toggle_favorite(&a).unwrap();

        // A fresh store over the same storage sees the saved entry
        let reloaded = store_for(&kv, None).load_favorites();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].url, "https://e.com/1");

        store_for(&kv, None).toggle_favorite(&a).unwrap();
        assert_eq!(store_for(&kv, None).load_favorites().len(), 0);
    }

    #[test]
    fn test_insertion_order_and_readd_goes_to_end() {
        let favorites = store_for(&memory(), None);
        for n in 1..=3 {
            favorites.toggle_favorite(&article(n)).unwrap();
        }
        favorites.toggle_favorite(&article(1)).unwrap();
        favorites.toggle_favorite(&article(1)).unwrap();

        let urls: Vec<_> = favorites
            .load_favorites()
            .into_iter()
            .map(|a| a.url)
            .collect();
        assert_eq!(
            urls,
            vec!["https://e.com/2", "https://e.com/3", "https://e.com/1"]
        );
    }

    #[test]
    fn test_never_holds_duplicate_urls() {
        let kv = memory();
        let favorites = store_for(&kv, None);
        let a = article(1);
        // Same URL, different title: still one membership
        let twin = Article::new("Other headline", a.url.clone());

        favorites.toggle_favorite(&a).unwrap();
        assert!(!favorites.toggle_favorite(&twin).unwrap());
        assert!(favorites.load_favorites().is_empty());

        // Duplicates written by someone else collapse on read
        let dup = serde_json::to_string(&vec![a.clone(), twin.clone(), article(2)]).unwrap();
        kv.set("favorites", &dup).unwrap();
        let loaded = favorites.load_favorites();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].title, "Story 1");
    }

    #[test]
    fn test_snapshot_is_persisted_as_article_json() {
        let kv = memory();
        let favorites = store_for(&kv, Some("a@x.com"));
        let a = article(7).with_image("https://e.com/7.jpg");
        favorites.toggle_favorite(&a).unwrap();

        let raw = kv.get("favorites_a@x.com").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let entry = &value.as_array().unwrap()[0];
        assert_eq!(entry["url"], "https://e.com/7");
        assert_eq!(entry["urlToImage"], "https://e.com/7.jpg");
        assert_eq!(entry["publishedAt"], "2025-05-06T14:30:00Z");
        assert_eq!(entry["source"]["name"], "Example Wire");
        assert_eq!(entry.as_object().unwrap().len(), 6);
    }

    #[test]
    fn test_empty_url_rejected() {
        let kv = memory();
        let favorites = store_for(&kv, None);
        let mut rx = favorites.notifier().subscribe();

        let result = favorites.toggle_favorite(&Article::new("No link", ""));
        assert!(matches!(result, Err(NewsError::InvalidArticle(_))));
        assert_eq!(kv.get("favorites").unwrap(), None);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_owner_isolation() {
        let kv = memory();
        let alice = store_for(&kv, Some("a@x.com"));
        let bob = store_for(&kv, Some("b@x.com"));
        let anon = store_for(&kv, None);

        alice.toggle_favorite(&article(1)).unwrap();

        assert!(alice.is_favorite("https://e.com/1"));
        assert!(!bob.is_favorite("https://e.com/1"));
        assert!(!anon.is_favorite("https://e.com/1"));
    }

    #[test]
    fn test_sign_in_does_not_migrate_anonymous_favorites() {
        let kv = memory();
        let identity = Arc::new(SwitchIdentity(Mutex::new(None)));
        let favorites = FavoritesStore::new(kv.clone(), identity.clone());

        favorites.toggle_favorite(&article(1)).unwrap();
        assert_eq!(favorites.owner_key(), OwnerKey::Anonymous);

        *identity.0.lock().unwrap() = Some("a@x.com".to_string());
        assert_eq!(favorites.owner_key(), OwnerKey::User("a@x.com".to_string()));
        assert!(favorites.load_favorites().is_empty());

        *identity.0.lock().unwrap() = None;
        assert_eq!(favorites.count(), 1);
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let favorites = store_for(&memory(), None);
        favorites.toggle_favorite(&article(1)).unwrap();
        favorites.toggle_favorite(&article(2)).unwrap();

        assert!(!favorites.clear_favorites(|| false));
        assert_eq!(favorites.count(), 2);

        assert!(favorites.clear_favorites(|| true));
        assert!(favorites.load_favorites().is_empty());
    }

    #[test]
    fn test_clear_only_touches_current_owner() {
        let kv = memory();
        store_for(&kv, None).toggle_favorite(&article(1)).unwrap();
        let alice = store_for(&kv, Some("a@x.com"));
        alice.toggle_favorite(&article(2)).unwrap();

        alice.clear_favorites(|| true);

        assert!(alice.load_favorites().is_empty());
        assert_eq!(store_for(&kv, None).count(), 1);
    }

    #[test]
    fn test_corrupted_json_loads_as_empty() {
        let kv = memory();
        kv.set("favorites", "{not json").unwrap();
        let favorites = store_for(&kv, None);

        assert!(favorites.load_favorites().is_empty());
        assert!(!favorites.is_favorite("https://e.com/1"));

        // The next toggle overwrites the corrupted value
        favorites.toggle_favorite(&article(1)).unwrap();
        assert_eq!(favorites.count(), 1);
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let favorites = FavoritesStore::new(
            Arc::new(ReadOnlyStore(MemoryStore::new())),
            Arc::new(StaticIdentity::anonymous()),
        );
        let mut rx = favorites.notifier().subscribe();

        // Reported as added even though nothing persisted
        assert!(favorites.toggle_favorite(&article(1)).unwrap());
        assert!(!favorites.is_favorite("https://e.com/1"));
        assert_eq!(rx.try_recv().unwrap(), FavoritesChanged);

        assert!(favorites.clear_favorites(|| true));
    }

    #[test]
    fn test_second_view_refreshes_on_change() {
        let favorites = store_for(&memory(), None);
        let mut header = favorites.subscribe();
        let mut list = favorites.subscribe();
        assert_eq!(header.count(), 0);

        assert!(!header.refresh_if_changed(&favorites));

        favorites.toggle_favorite(&article(1)).unwrap();
        favorites.toggle_favorite(&article(2)).unwrap();

        assert!(header.refresh_if_changed(&favorites));
        assert_eq!(header.count(), 2);
        assert!(list.refresh_if_changed(&favorites));
        assert_eq!(list.favorites()[1].url, "https://e.com/2");

        favorites.clear_favorites(|| true);
        assert!(header.refresh_if_changed(&favorites));
        assert_eq!(header.count(), 0);
    }

    #[test]
    fn test_declined_clear_does_not_notify() {
        let favorites = store_for(&memory(), None);
        let mut rx = favorites.notifier().subscribe();
        favorites.clear_favorites(|| false);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_shared_notifier_across_stores() {
        let kv = memory();
        let notifier = ChangeNotifier::new();
        let identity: Arc<dyn IdentityProvider> = Arc::new(StaticIdentity::anonymous());
        let card = FavoritesStore::with_notifier(kv.clone(), identity.clone(), notifier.clone());
        let page = FavoritesStore::with_notifier(kv, identity, notifier);

        let mut view = page.subscribe();
        card.toggle_favorite(&article(3)).unwrap();

        assert!(view.refresh_if_changed(&page));
        assert_eq!(view.count(), 1);
    }
}
