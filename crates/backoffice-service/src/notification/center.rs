//! Latest notifications with an unread counter.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::info;

use backoffice_backend::Backend;
use backoffice_backend::repositories::NotificationRepository;
use backoffice_cache::{CachedCollection, CollectionSource, LiveSubscription, StoreSource};
use backoffice_core::traits::ChangeFeed;
use backoffice_core::types::NotificationId;
use backoffice_core::{AppError, AppResult};
use backoffice_entity::notification::{CreateNotification, Notification, NotificationPatch};

use super::destination::Destination;

/// Holds the latest notifications and how many of them are unread.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    repo: NotificationRepository,
    cache: CachedCollection<Notification>,
    feed: Arc<dyn ChangeFeed>,
    unread: Arc<AtomicUsize>,
}

impl NotificationCenter {
    /// Center showing the latest `limit` notifications.
    pub fn new(backend: &Backend, feed: Arc<dyn ChangeFeed>, limit: usize) -> Self {
        let source: Arc<dyn CollectionSource<Notification>> =
            Arc::new(StoreSource::<Notification>::new(
                backend.records.clone(),
                NotificationRepository::latest_query(limit),
            ));
        Self {
            repo: backend.notifications(),
            cache: CachedCollection::new(source).with_capacity(limit),
            feed,
            unread: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Load the latest notifications and reset the unread counter.
    pub async fn fetch(&self) -> AppResult<Vec<Notification>> {
        let notifications = self.cache.load().await?;
        self.recount().await;
        Ok(notifications)
    }

    /// Cached notifications, newest first.
    pub async fn notifications(&self) -> Vec<Notification> {
        self.cache.snapshot().await
    }

    pub fn unread_count(&self) -> usize {
        self.unread.load(Ordering::Relaxed)
    }

    /// Mark one notification read.
    pub async fn mark_read(&self, id: NotificationId) -> AppResult<()> {
        let result = self.cache.update(id, NotificationPatch::mark_read()).await;
        self.recount().await;
        result
    }

    /// Mark every unread notification read.
    pub async fn mark_all_read(&self) -> AppResult<usize> {
        let changed = self.repo.mark_all_read().await?;
        self.cache
            .replace_with(|notifications| {
                for n in notifications.iter_mut() {
                    n.read = true;
                }
            })
            .await;
        self.unread.store(0, Ordering::Relaxed);
        Ok(changed)
    }

    /// Merge pushed notifications while the guard lives; each one bumps the
    /// unread counter. The cached list keeps only the latest `limit`.
    pub async fn subscribe(&self) -> AppResult<LiveSubscription> {
        self.subscribe_with(|_| {}).await
    }

    /// Like [`subscribe`](Self::subscribe), also handing each pushed
    /// notification to `on_insert`.
    pub async fn subscribe_with<F>(&self, on_insert: F) -> AppResult<LiveSubscription>
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        let unread = Arc::clone(&self.unread);
        self.cache
            .subscribe(self.feed.as_ref(), move |notification: &Notification| {
                unread.fetch_add(1, Ordering::Relaxed);
                on_insert(notification);
            })
            .await
    }

    /// Mark `id` read if needed and resolve where it leads.
    pub async fn open(&self, id: NotificationId) -> AppResult<Destination> {
        let notification = self
            .cache
            .get(id)
            .await
            .ok_or_else(|| AppError::not_found(format!("Notification {id} is not loaded")))?;
        if notification.is_unread() {
            self.mark_read(id).await?;
        }
        Ok(Destination::from(&notification))
    }

    /// Publish a notification to every subscribed client.
    pub async fn publish(&self, data: CreateNotification) -> AppResult<Notification> {
        let notification = self.repo.create(&data).await?;
        info!(
            notification_id = %notification.id,
            kind = %notification.kind,
            "Notification published"
        );
        Ok(notification)
    }

    async fn recount(&self) {
        let unread = self
            .cache
            .snapshot()
            .await
            .iter()
            .filter(|n| n.is_unread())
            .count();
        self.unread.store(unread, Ordering::Relaxed);
    }
}
