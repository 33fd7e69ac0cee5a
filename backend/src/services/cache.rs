use crate::error::FetchError;
use crate::models::{Channel, Video};
use crate::services::metadata_client::MetadataClient;
use futures::future::{BoxFuture, FutureExt, Shared};
use log::{debug, warn};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

type PendingFetch<T> = Shared<BoxFuture<'static, Result<Arc<T>, FetchError>>>;

/// Fetched entities plus the fetches still in flight, keyed by id.
struct Store<T> {
    ready: HashMap<String, Arc<T>>,
    pending: HashMap<String, PendingFetch<T>>,
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self {
            ready: HashMap::new(),
            pending: HashMap::new(),
        }
    }
}

type SharedStore<T> = Arc<Mutex<Store<T>>>;

fn lock<T>(store: &Mutex<Store<T>>) -> MutexGuard<'_, Store<T>> {
    // the store is never left half-updated, so a poisoned lock is still usable
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Bounds a metadata call by `limit`.
pub(crate) async fn with_timeout<T>(
    limit: Duration,
    fetch: impl Future<Output = Result<T, FetchError>>,
) -> Result<T, FetchError> {
    tokio::time::timeout(limit, fetch)
        .await
        .unwrap_or(Err(FetchError::Timeout(limit)))
}

/// Videos and channels fetched so far.
///
/// Entries are never replaced or evicted. Concurrent lookups of the same
/// uncached id share one fetch; a failed fetch is handed to every waiter and
/// leaves nothing behind, so the next lookup tries again.
#[derive(Clone)]
pub struct EntityCache {
    client: Arc<dyn MetadataClient>,
    fetch_timeout: Duration,
    videos: SharedStore<Video>,
    channels: SharedStore<Channel>,
}

impl EntityCache {
    pub fn new(client: Arc<dyn MetadataClient>, fetch_timeout: Duration) -> Self {
        Self {
            client,
            fetch_timeout,
            videos: Arc::default(),
            channels: Arc::default(),
        }
    }

    pub async fn get_or_fetch_video(&self, video_id: &str) -> Result<Arc<Video>, FetchError> {
        let client = Arc::clone(&self.client);
        get_or_fetch(
            &self.videos,
            "video",
            video_id,
            self.fetch_timeout,
            move |id| async move { client.fetch_video(&id).await },
        )
        .await
    }

    pub async fn get_or_fetch_channel(&self, channel_id: &str) -> Result<Arc<Channel>, FetchError> {
        let client = Arc::clone(&self.client);
        get_or_fetch(
            &self.channels,
            "channel",
            channel_id,
            self.fetch_timeout,
            move |id| async move { client.fetch_channel(&id).await },
        )
        .await
    }

    pub fn cached_video_count(&self) -> usize {
        lock(&self.videos).ready.len()
    }

    pub fn cached_channel_count(&self) -> usize {
        lock(&self.channels).ready.len()
    }

    #[cfg(test)]
    fn pending_video_count(&self) -> usize {
        lock(&self.videos).pending.len()
    }
}

async fn get_or_fetch<T, F, Fut>(
    store: &SharedStore<T>,
    kind: &'static str,
    id: &str,
    fetch_timeout: Duration,
    fetch: F,
) -> Result<Arc<T>, FetchError>
where
    T: Send + Sync + 'static,
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
{
    let pending = {
        let mut guard = lock(store);

        if let Some(hit) = guard.ready.get(id) {
            debug!("Cache hit for {kind} {id}");
            return Ok(Arc::clone(hit));
        }

        match guard.pending.get(id) {
            Some(in_flight) => {
                debug!("Joining in-flight fetch for {kind} {id}");
                in_flight.clone()
            }
            None => {
                debug!("Cache miss for {kind} {id}, fetching");
                let fetch = fetch(id.to_string());
                let pending = spawn_fetch(Arc::clone(store), kind, id.to_string(), fetch_timeout, fetch);
                guard.pending.insert(id.to_string(), pending.clone());
                pending
            }
        }
    };

    pending.await
}

/// Runs the fetch on its own task so it completes even if every waiter goes
/// away, and resolves the pending entry exactly once.
fn spawn_fetch<T, Fut>(
    store: SharedStore<T>,
    kind: &'static str,
    id: String,
    fetch_timeout: Duration,
    fetch: Fut,
) -> PendingFetch<T>
where
    T: Send + Sync + 'static,
    Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
{
    let task_store = Arc::clone(&store);
    let task_id = id.clone();
    let task = tokio::spawn(async move {
        let result = with_timeout(fetch_timeout, fetch).await.map(Arc::new);

        let mut guard = lock(&task_store);
        guard.pending.remove(&task_id);
        match result {
            Ok(value) => Ok(Arc::clone(
                guard.ready.entry(task_id).or_insert(value),
            )),
            Err(e) => {
                warn!("Failed to fetch {kind} {task_id}: {e}");
                Err(e)
            }
        }
    });

    async move {
        match task.await {
            Ok(result) => result,
            Err(join_error) => {
                lock(&store).pending.remove(&id);
                Err(FetchError::Aborted(join_error.to_string()))
            }
        }
    }
    .boxed()
    .shared()
}
