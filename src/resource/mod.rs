//! # Resources
//!
//! A [`Resource`] is an exclusive lock shared by two neighbouring agents, with a recorded
//! holder for diagnostics and invariant checks.
//!
//! The lock is a [`tokio::sync::Mutex`], which hands the lock to waiters in FIFO order.
//! That fairness is what keeps a waiting agent from being overtaken forever by a neighbour
//! that releases and immediately asks again.
//!
//! Acquisition returns a [`ResourceGuard`]. The guard releases on drop, so every exit path
//! (including a cancelled future) gives the resource back.

pub mod error;

pub use error::*;

use crate::events::{Event, EventSink};
use crate::model::{AgentId, ResourceId};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, error};

const NO_HOLDER: usize = usize::MAX;

/// An exclusive, fairly-queued lock with a recorded holder.
#[derive(Debug)]
pub struct Resource {
    id: ResourceId,
    lock: Arc<Mutex<()>>,
    holder: AtomicUsize,
    events: EventSink,
}

impl Resource {
    pub fn new(id: ResourceId, events: EventSink) -> Arc<Self> {
        Arc::new(Self {
            id,
            lock: Arc::new(Mutex::new(())),
            holder: AtomicUsize::new(NO_HOLDER),
            events,
        })
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// The agent currently recorded as holder, if any.
    pub fn holder(&self) -> Option<AgentId> {
        match self.holder.load(Ordering::Acquire) {
            NO_HOLDER => None,
            index => Some(AgentId::new(index)),
        }
    }

    /// Waits until the resource is free and records `by` as its holder.
    ///
    /// Waiters are served in arrival order. Dropping the returned future while it waits
    /// leaves the resource untouched.
    ///
    /// # Errors
    /// - [`ResourceError::AlreadyHeld`] if `by` already holds this resource.
    /// - [`ResourceError::HolderConflict`] if the lock was granted while another holder was
    ///   still on record.
    pub async fn acquire(self: &Arc<Self>, by: AgentId) -> Result<ResourceGuard, ResourceError> {
        // Only `by` itself can have written its own id, so this read can't be a stale
        // false positive.
        if self.holder() == Some(by) {
            return Err(ResourceError::AlreadyHeld {
                resource: self.id,
                agent: by,
            });
        }

        let permit = Arc::clone(&self.lock).lock_owned().await;

        if let Err(current) =
            self.holder
                .compare_exchange(NO_HOLDER, by.index(), Ordering::AcqRel, Ordering::Acquire)
        {
            drop(permit);
            return Err(ResourceError::HolderConflict {
                resource: self.id,
                agent: by,
                holder: AgentId::new(current),
            });
        }

        debug!(resource = %self.id, agent = %by, "Acquired");
        self.events.emit(Event::Acquired {
            resource: self.id,
            agent: by,
        });

        Ok(ResourceGuard {
            resource: Arc::clone(self),
            agent: by,
            permit: Some(permit),
        })
    }

    /// Releases the resource held through `guard`.
    ///
    /// Equivalent to [`ResourceGuard::release`], but also checks that the guard belongs
    /// to this resource.
    pub fn release(&self, guard: ResourceGuard) -> Result<(), ResourceError> {
        if guard.resource() != self.id {
            return Err(ResourceError::ForeignGuard {
                resource: self.id,
                guard: guard.resource(),
            });
        }
        guard.release()
    }

    /// Clears the holder record. Must run while the lock is still held so the `Released`
    /// event precedes the next `Acquired`.
    fn clear_holder(&self, by: AgentId) -> Result<(), ResourceError> {
        self.holder
            .compare_exchange(by.index(), NO_HOLDER, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|current| ResourceError::NotHolder {
                resource: self.id,
                agent: by,
                holder: (current != NO_HOLDER).then(|| AgentId::new(current)),
            })?;

        debug!(resource = %self.id, agent = %by, "Released");
        self.events.emit(Event::Released {
            resource: self.id,
            agent: by,
        });
        Ok(())
    }
}

/// Proof that an agent holds a [`Resource`].
///
/// Dropping the guard releases the resource; [`ResourceGuard::release`] does the same but
/// reports a broken holder record instead of only logging it.
#[derive(Debug)]
pub struct ResourceGuard {
    resource: Arc<Resource>,
    agent: AgentId,
    permit: Option<OwnedMutexGuard<()>>,
}

impl ResourceGuard {
    pub fn resource(&self) -> ResourceId {
        self.resource.id
    }

    pub fn agent(&self) -> AgentId {
        self.agent
    }

    pub fn release(mut self) -> Result<(), ResourceError> {
        let permit = self.permit.take();
        let result = self.resource.clear_holder(self.agent);
        // The lock goes back regardless; a broken record must not strand the neighbours.
        drop(permit);
        result
    }
}

impl Drop for ResourceGuard {
    fn drop(&mut self) {
        if let Some(permit) = self.permit.take() {
            if let Err(e) = self.resource.clear_holder(self.agent) {
                error!(
                    resource = %self.resource.id,
                    agent = %self.agent,
                    error = %e,
                    "Release failed"
                );
            }
            drop(permit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventRecorder;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_acquire_records_holder() {
        let resource = Resource::new(ResourceId::new(0), EventSink::disabled());
        assert_eq!(resource.holder(), None);

        let guard = resource.acquire(AgentId::new(3)).await.unwrap();
        assert_eq!(resource.holder(), Some(AgentId::new(3)));
        assert_eq!(guard.agent(), AgentId::new(3));

        guard.release().unwrap();
        assert_eq!(resource.holder(), None);
    }

    #[tokio::test]
    async fn test_drop_releases() {
        let resource = Resource::new(ResourceId::new(0), EventSink::disabled());
        {
            let _guard = resource.acquire(AgentId::new(1)).await.unwrap();
        }
        assert_eq!(resource.holder(), None);
        let again = timeout(Duration::from_secs(1), resource.acquire(AgentId::new(2))).await;
        assert!(again.is_ok(), "resource should be free after the guard drops");
    }

    #[tokio::test]
    async fn test_double_acquire_is_rejected() {
        let resource = Resource::new(ResourceId::new(2), EventSink::disabled());
        let _guard = resource.acquire(AgentId::new(0)).await.unwrap();
        let err = resource.acquire(AgentId::new(0)).await.unwrap_err();
        assert_eq!(
            err,
            ResourceError::AlreadyHeld {
                resource: ResourceId::new(2),
                agent: AgentId::new(0),
            }
        );
    }

    #[tokio::test]
    async fn test_release_by_non_holder_is_rejected() {
        let resource = Resource::new(ResourceId::new(0), EventSink::disabled());
        let _guard = resource.acquire(AgentId::new(0)).await.unwrap();

        let err = resource.clear_holder(AgentId::new(1)).unwrap_err();
        assert_eq!(
            err,
            ResourceError::NotHolder {
                resource: ResourceId::new(0),
                agent: AgentId::new(1),
                holder: Some(AgentId::new(0)),
            }
        );
        assert_eq!(resource.holder(), Some(AgentId::new(0)));
    }

    #[tokio::test]
    async fn test_foreign_guard_is_rejected() {
        let left = Resource::new(ResourceId::new(0), EventSink::disabled());
        let right = Resource::new(ResourceId::new(1), EventSink::disabled());

        let guard = left.acquire(AgentId::new(0)).await.unwrap();
        let err = right.release(guard).unwrap_err();
        assert_eq!(
            err,
            ResourceError::ForeignGuard {
                resource: ResourceId::new(1),
                guard: ResourceId::new(0),
            }
        );
        // The rejected guard was dropped, which still frees the lock.
        assert_eq!(left.holder(), None);
    }

    #[tokio::test]
    async fn test_waiter_blocks_until_release() {
        let resource = Resource::new(ResourceId::new(0), EventSink::disabled());
        let guard = resource.acquire(AgentId::new(0)).await.unwrap();

        let waiting = {
            let resource = Arc::clone(&resource);
            tokio::spawn(async move {
                let guard = resource.acquire(AgentId::new(1)).await.unwrap();
                guard.agent()
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());
        assert_eq!(resource.holder(), Some(AgentId::new(0)));

        resource.release(guard).unwrap();
        let winner = timeout(Duration::from_secs(1), waiting).await.unwrap().unwrap();
        assert_eq!(winner, AgentId::new(1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_holds_never_overlap() {
        let (events, receiver) = EventSink::channel();
        let resource = Resource::new(ResourceId::new(0), events);
        let inside = Arc::new(AtomicUsize::new(0));

        let mut handles = vec![];
        for agent in 0..8 {
            let resource = Arc::clone(&resource);
            let inside = Arc::clone(&inside);
            handles.push(tokio::spawn(async move {
                for _ in 0..200 {
                    let guard = resource.acquire(AgentId::new(agent)).await.unwrap();
                    assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                    assert_eq!(resource.holder(), Some(AgentId::new(agent)));
                    tokio::task::yield_now().await;
                    inside.fetch_sub(1, Ordering::SeqCst);
                    guard.release().unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut recorder = EventRecorder::new(receiver);
        recorder.drain();
        let holds = recorder.check_exclusion().unwrap();
        assert_eq!(holds[&ResourceId::new(0)], 8 * 200);
    }
}
