//! Resolve coordinates into elevations off the caller's thread
use super::ElevationDataSource;
use crate::config::Config;
use crate::{Coordinate, ElevationResult, Error, LookupError};
use log::{debug, info};
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

/// Shared flag used to abandon an in-flight lookup
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Looks up the elevation of single coordinates through an elevation data source
#[derive(Clone)]
pub struct ElevationLookupService {
    source: Arc<dyn ElevationDataSource>,
}

impl ElevationLookupService {
    pub fn new(source: Arc<dyn ElevationDataSource>) -> Self {
        ElevationLookupService { source }
    }

    /// Create the service using the elevation handler defined in the config
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Ok(ElevationLookupService::new(config.get_elevation_handler()?))
    }

    pub fn source(&self) -> &dyn ElevationDataSource {
        self.source.as_ref()
    }

    /// Perform the lookup on the current thread, this blocks until the request completes so
    /// it must not be called from a UI or event loop thread.
    pub fn lookup(&self, coordinate: Coordinate) -> Result<ElevationResult, LookupError> {
        let elevation = self.source.request_elevation(coordinate)?;
        info!("Elevation at ({}) is {}m", coordinate, elevation);
        Ok(ElevationResult::new(coordinate, elevation))
    }

    /// Run the lookup on a worker thread and hand the outcome to `callback` once it is
    /// available. The callback is dropped without being called if the returned token is
    /// cancelled first.
    pub fn spawn_lookup_with<F>(&self, coordinate: Coordinate, callback: F) -> CancelToken
    where
        F: FnOnce(Result<ElevationResult, LookupError>) + Send + 'static,
    {
        let token = CancelToken::new();
        let worker_token = token.clone();
        let service = self.clone();
        thread::spawn(move || {
            if worker_token.is_cancelled() {
                debug!("Lookup for ({}) cancelled before it started", coordinate);
                return;
            }
            let result = service.lookup(coordinate);
            if worker_token.is_cancelled() {
                debug!("Discarding result of cancelled lookup for ({})", coordinate);
                return;
            }
            callback(result);
        });
        token
    }

    /// Run the lookup on a worker thread, the returned handle delivers the result
    pub fn spawn_lookup(&self, coordinate: Coordinate) -> LookupHandle {
        let (tx, rx) = mpsc::channel();
        let token = self.spawn_lookup_with(coordinate, move |result| {
            // the handle may have been dropped already, the result has no other consumer
            let _ = tx.send(result);
        });
        LookupHandle {
            coordinate,
            token,
            receiver: rx,
            delivered: Cell::new(false),
        }
    }
}

/// Handle to a lookup running on a worker thread
#[derive(Debug)]
pub struct LookupHandle {
    coordinate: Coordinate,
    token: CancelToken,
    receiver: Receiver<Result<ElevationResult, LookupError>>,
    delivered: Cell<bool>,
}

impl LookupHandle {
    /// Return the coordinate this lookup was issued for
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Abandon the lookup, any late result is discarded
    pub fn cancel(&self) {
        self.token.cancel()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Token that can cancel this lookup from another owner
    pub fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Block until the lookup finishes, fails with `AlreadyDelivered` if `try_result` has
    /// handed out the outcome already
    pub fn wait(self) -> Result<ElevationResult, LookupError> {
        if self.delivered.get() {
            return Err(LookupError::AlreadyDelivered);
        }
        if self.is_cancelled() {
            return Err(LookupError::Cancelled);
        }
        let result = self.receiver.recv();
        if self.is_cancelled() {
            return Err(LookupError::Cancelled);
        }
        result.unwrap_or(Err(LookupError::Interrupted))
    }

    /// Poll for the outcome without blocking, returns `None` while the request is still in
    /// flight. The outcome is handed out only once, later calls yield `AlreadyDelivered`.
    pub fn try_result(&self) -> Option<Result<ElevationResult, LookupError>> {
        if self.delivered.get() {
            return Some(Err(LookupError::AlreadyDelivered));
        }
        if self.is_cancelled() {
            return Some(Err(LookupError::Cancelled));
        }
        match self.receiver.try_recv() {
            Ok(result) => {
                self.delivered.set(true);
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(LookupError::Interrupted)),
        }
    }
}

/// Keeps only the most recent lookup alive, e.g. when a user taps a new point before the
/// previous elevation arrived.
pub struct LatestLookup {
    service: ElevationLookupService,
    current: Option<LookupHandle>,
}

impl LatestLookup {
    pub fn new(service: ElevationLookupService) -> Self {
        LatestLookup {
            service,
            current: None,
        }
    }

    /// Start a lookup for `coordinate`, cancelling the one in flight. Returns the coordinate
    /// of the superseded lookup if there was one.
    pub fn submit(&mut self, coordinate: Coordinate) -> Option<Coordinate> {
        let previous = self.current.take().map(|handle| {
            debug!(
                "Lookup for ({}) superseded by ({})",
                handle.coordinate(),
                coordinate
            );
            handle.cancel();
            handle.coordinate()
        });
        self.current = Some(self.service.spawn_lookup(coordinate));
        previous
    }

    pub fn current(&self) -> Option<&LookupHandle> {
        self.current.as_ref()
    }

    /// Take ownership of the in-flight lookup
    pub fn take(&mut self) -> Option<LookupHandle> {
        self.current.take()
    }

    /// Block until the most recent lookup finishes
    pub fn wait(&mut self) -> Option<Result<ElevationResult, LookupError>> {
        self.current.take().map(LookupHandle::wait)
    }
}
