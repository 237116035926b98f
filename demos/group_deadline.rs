//! # Example: group_deadline
//!
//! Layers a caller-owned deadline on top of a group via the parent-token
//! extension point: the group token is a child of the caller's token, so
//! cancelling the parent cancels every fork and `join` resolves with
//! `Failed(Canceled)`.
//!
//! ## Flow
//! ```text
//! deadline = CancellationToken (caller-owned)
//! tokio::spawn: sleep(250ms) → deadline.cancel()
//!
//! GroupBuilder::new().child_of(&deadline)
//!     ├─► fork(slow, selects on ctx.cancelled())
//!     ├─► join().await
//!     │     └─► deadline fires → fork stops → Failed(Canceled)
//!     └─► close().await
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example group_deadline
//! ```

use std::time::Duration;

use taskgroup::{GroupBuilder, TaskError, TaskGroup};
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let deadline = CancellationToken::new();

    let timer = deadline.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(250)).await;
        println!("[deadline] expired, cancelling the group");
        timer.cancel();
    });

    let mut group: TaskGroup<u64> = GroupBuilder::new().child_of(&deadline).open();

    group.fork(|ctx| async move {
        tokio::select! {
            () = ctx.cancelled() => Err(TaskError::Canceled),
            () = tokio::time::sleep(Duration::from_secs(30)) => Ok(42),
        }
    })?;

    group.join().await?;
    match group.outcome()?.error() {
        Some(err) if err.is_canceled() => println!("group cancelled by deadline: {err}"),
        Some(err) => println!("group failed: {err}"),
        None => println!("group finished before the deadline"),
    }

    group.close().await?;
    Ok(())
}
