// Runtime: shutdown coordination, the periodic worker pattern and the
// supervisor that starts and joins every worker.

pub mod shutdown;
pub mod signals;
pub mod supervisor;
pub mod worker;
