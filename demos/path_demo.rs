//! # Example: path_demo
//!
//! Forks two position-producing tasks, joins, and combines the results
//! into a path. Also shows two tagged-union dispatches with explicit
//! default arms: one over the produced shapes, one with a match guard
//! over plain values (presentation only; the library itself never
//! inspects task results).
//!
//! ## Flow
//! ```text
//! TaskGroup::open()
//!     ├─► fork(position (3, 4))
//!     ├─► fork(position (6, 8))
//!     ├─► join().await          (both complete)
//!     ├─► outcome → AllSucceeded([(3,4), (6,8)])
//!     └─► close().await
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example path_demo
//! ```

use std::time::Duration;

use taskgroup::TaskGroup;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position {
    x: i32,
    y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Path {
    from: Position,
    to: Position,
}

/// Tagged shapes for the dispatch demo.
enum Shape {
    Point(Position),
    Segment(Path),
    Other,
}

/// Dispatch over shapes with an explicit default arm.
fn measure(shape: &Shape) -> f64 {
    match shape {
        Shape::Point(p) => f64::from(p.x * p.x + p.y * p.y).sqrt(),
        Shape::Segment(path) => f64::from(path.from.x + path.from.y + path.to.x + path.to.y),
        Shape::Other => -1.0,
    }
}

/// Tagged values for the guarded dispatch demo.
enum Value {
    Str(String),
    Int(i64),
    Other,
}

/// Guarded dispatch: the first arm only matches long strings.
fn classify(value: &Value) -> &'static str {
    match value {
        Value::Str(s) if s.len() > 5 => "string > 5",
        Value::Str(_) => "string",
        Value::Int(_) => "integer",
        Value::Other => "default",
    }
}

async fn wait_and_get_position(x: i32, y: i32) -> Position {
    tokio::time::sleep(Duration::from_millis(200)).await;
    Position { x, y }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut group: TaskGroup<Position> = TaskGroup::open();

    let p1 = group.fork(|_ctx| async move { Ok(wait_and_get_position(3, 4).await) })?;
    let p2 = group.fork(|_ctx| async move { Ok(wait_and_get_position(6, 8).await) })?;

    group.join().await?;
    let outcome = group.outcome()?;
    let path = Path {
        from: *outcome.get(&p1).expect("p1 succeeded"),
        to: *outcome.get(&p2).expect("p2 succeeded"),
    };
    println!("path: {path:?}");

    for shape in [Shape::Point(path.from), Shape::Segment(path), Shape::Other] {
        println!("measure = {}", measure(&shape));
    }

    for value in [
        Value::Str("greaterthan5".to_string()),
        Value::Str("str".to_string()),
        Value::Int(44),
        Value::Other,
    ] {
        println!("classify = {}", classify(&value));
    }

    group.close().await?;
    Ok(())
}
