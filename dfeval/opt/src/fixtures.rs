//! Graphs shared by the unit tests.
use dfeval_ir::{Builder, Graph};

/// A (x3) -> B (x2) -> C (x6) -> A with six initial tokens on A -> B.
pub fn abc326() -> Graph {
    abc326_with_rates((2, 3), (3, 1), (1, 2))
}

/// ABC326 with rates chosen by the caller. Repetition counts stay 3, 2, 6 so
/// the rates must balance them.
pub fn abc326_with_rates(
    ab: (u64, u64),
    bc: (u64, u64),
    ca: (u64, u64),
) -> Graph {
    let mut g = Graph::new("ABC326");
    let mut b = Builder::new(&mut g);
    b.add_actor("A", 3, 1.0).unwrap();
    b.add_actor("B", 2, 1.0).unwrap();
    b.add_actor("C", 6, 1.0).unwrap();
    b.add_edge("A", "B", ab.0, ab.1, 6).unwrap();
    b.add_edge("B", "C", bc.0, bc.1, 0).unwrap();
    b.add_edge("C", "A", ca.0, ca.1, 0).unwrap();
    g
}

/// X (x2) and Y (x3) joined by two parallel edges of different rates, with
/// `xy` initial tokens on the second one and `yx` on the way back.
pub fn parallel_edges(xy: u64, yx: u64) -> Graph {
    let mut g = Graph::new("parallel");
    let mut b = Builder::new(&mut g);
    b.add_actor("X", 2, 1.0).unwrap();
    b.add_actor("Y", 3, 1.0).unwrap();
    b.add_edge("X", "Y", 3, 2, 0).unwrap();
    b.add_edge("X", "Y", 6, 4, xy).unwrap();
    b.add_edge("Y", "X", 2, 3, yx).unwrap();
    g
}

/// Route log output through the test harness. Run with `RUST_LOG=debug` to
/// trace a simulation.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
