//! # Example: first_failure
//!
//! One fork fails while another would run for a long time; the failure
//! short-circuits the join and the slow fork is cancelled cooperatively.
//! A [`LogWriter`] subscriber prints the lifecycle events as they happen.
//!
//! ## Flow
//! ```text
//! GroupBuilder::new().with_subscriber(LogWriter)
//!     ├─► fork(slow, selects on ctx.cancelled())
//!     ├─► fork(fails with "Expected error" after 100ms)
//!     ├─► join().await
//!     │     ├─► recv Err("Expected error")   (first failure wins)
//!     │     ├─► cancel group token
//!     │     └─► slow fork acknowledges and stops
//!     ├─► outcome → Failed("Expected error")
//!     └─► close().await
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example first_failure --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use taskgroup::{GroupBuilder, LogWriter, TaskError, TaskGroup};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut group: TaskGroup<(i32, i32)> = GroupBuilder::new()
        .with_subscriber(Arc::new(LogWriter::new()))
        .open();

    group.fork(|ctx| async move {
        tokio::select! {
            () = ctx.cancelled() => {
                println!("[slow] cancelled, stopping early");
                Err(TaskError::Canceled)
            }
            () = tokio::time::sleep(Duration::from_secs(30)) => Ok((3, 4)),
        }
    })?;

    group.fork(|_ctx| async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        Err(TaskError::fail("Expected error"))
    })?;

    group.join().await?;
    match group.outcome()?.error() {
        Some(err) => println!("group failed: {err}"),
        None => println!("group unexpectedly succeeded"),
    }

    group.close().await?;
    Ok(())
}
