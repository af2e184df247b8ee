// Shared helpers that sit outside the worker runtime.

pub mod report;
