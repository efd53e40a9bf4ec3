//! # Topology Primitives
//!
//! Tuples, message ids, the spout/bolt execution contracts, collectors, the
//! per-task context, and the tuple transport boundary. DAG wiring and
//! cross-process placement are external collaborators; this module only
//! defines what flows and who acknowledges it.

pub mod collector;
pub mod context;
pub mod stage;
pub mod transport;
pub mod tuple;

pub use collector::{OutputCollector, SpoutOutputCollector};
pub use context::TaskContext;
pub use stage::{Bolt, Spout};
pub use transport::{ChannelTransport, TupleTransport};
pub use tuple::{MessageId, TaskId, Tuple};
