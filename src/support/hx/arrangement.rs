//! Flow arrangements supported by the effectiveness-NTU utilities.

mod counter_flow;
mod parallel_flow;

pub use counter_flow::CounterFlow;
pub use parallel_flow::ParallelFlow;
