use anyhow::Result;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// Completed flights publish the value, or the error shared by every waiter.
type FlightOutcome<T> = Result<T, Arc<anyhow::Error>>;

type FlightTable<T> = HashMap<String, watch::Receiver<Option<FlightOutcome<T>>>>;

enum Role<T> {
    Leader(watch::Sender<Option<FlightOutcome<T>>>),
    Waiter(watch::Receiver<Option<FlightOutcome<T>>>),
}

/// Coalesces concurrent calls on the same key into one execution.
///
/// The table lock is only held to register or deregister a flight, never while
/// the underlying future runs or while a waiter blocks.
pub struct SingleFlight<T> {
    flights: Mutex<FlightTable<T>>,
}

impl<T: Clone> SingleFlight<T> {
    pub fn new() -> Self {
        Self {
            flights: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `work` for `key`, unless a call for the same key is already in
    /// flight, in which case the result of that call is awaited and returned.
    ///
    /// Exactly one execution happens per in-flight window. If the leading call
    /// is dropped before publishing a result, waiters fail with an error and
    /// the next caller starts over.
    pub async fn run<F, Fut>(&self, key: &str, work: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let role = {
            let mut flights = self.flights.lock();
            match flights.get(key) {
                Some(receiver) => Role::Waiter(receiver.clone()),
                None => {
                    let (sender, receiver) = watch::channel(None);
                    flights.insert(key.to_string(), receiver);
                    Role::Leader(sender)
                }
            }
        };

        match role {
            Role::Leader(sender) => {
                // Deregisters the flight on every exit path, panics included.
                let _guard = FlightGuard {
                    flights: &self.flights,
                    key,
                };

                let outcome = match work().await {
                    Ok(value) => Ok(value),
                    Err(err) => Err(Arc::new(err)),
                };
                let _ = sender.send(Some(outcome.clone()));

                resolve(outcome)
            }
            Role::Waiter(mut receiver) => {
                loop {
                    let published = receiver.borrow().clone();
                    if let Some(outcome) = published {
                        return resolve(outcome);
                    }
                    if receiver.changed().await.is_err() {
                        anyhow::bail!("in-flight load for key {:?} was dropped", key);
                    }
                }
            }
        }
    }
}

impl<T: Clone> Default for SingleFlight<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve<T>(outcome: FlightOutcome<T>) -> Result<T> {
    outcome.map_err(|err| anyhow::anyhow!("{:#}", err))
}

struct FlightGuard<'a, T> {
    flights: &'a Mutex<FlightTable<T>>,
    key: &'a str,
}

impl<T> Drop for FlightGuard<'_, T> {
    fn drop(&mut self) {
        self.flights.lock().remove(self.key);
    }
}
