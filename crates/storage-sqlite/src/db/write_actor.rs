use std::any::Any;

use diesel::SqliteConnection;
use log::error;
use tokio::sync::{mpsc, oneshot};

use super::DbPool;
use crate::errors::StorageError;
use goalie_core::errors::{DatabaseError, Error, Result};

/// Capacity of the job queue in front of the writer.
const WRITE_QUEUE_CAPACITY: usize = 1024;

// A write job runs against the writer's connection inside an immediate
// transaction. The return type is erased so one channel serves every job.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;
type ErasedReply = Result<Box<dyn Any + Send + 'static>>;
type Envelope = (Job<Box<dyn Any + Send + 'static>>, oneshot::Sender<ErasedReply>);

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<Envelope>,
}

impl WriteHandle {
    /// Executes `job` on the writer's dedicated connection.
    ///
    /// Jobs run one at a time, each in its own `IMMEDIATE` transaction, so a
    /// read-modify-write inside a job cannot interleave with another write.
    /// An error returned by the job rolls the transaction back.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| writer_unavailable("the writer actor has stopped"))?;

        let boxed = ret_rx
            .await
            .map_err(|_| writer_unavailable("the writer actor dropped the reply"))??;

        boxed
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| writer_unavailable("unexpected result type from the writer actor"))
    }
}

fn writer_unavailable(msg: &str) -> Error {
    Error::Database(DatabaseError::Internal(msg.to_string()))
}

/// Spawns the background task that owns one pooled connection and applies
/// write jobs serially.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<Envelope>(WRITE_QUEUE_CAPACITY);

    tokio::spawn(async move {
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                error!("Writer actor could not acquire a connection: {}", e);
                while let Some((_, reply_tx)) = rx.recv().await {
                    let _ = reply_tx.send(Err(writer_unavailable(
                        "the writer actor has no database connection",
                    )));
                }
                return;
            }
        };

        while let Some((job, reply_tx)) = rx.recv().await {
            let result: ErasedReply = conn
                .immediate_transaction::<_, StorageError, _>(|c| {
                    job(c).map_err(StorageError::from)
                })
                .map_err(Error::from);

            // The requester may have gone away (timeout, cancelled request).
            let _ = reply_tx.send(result);
        }
    });

    WriteHandle { tx }
}
