//! Off-reducer plumbing: backend seams, the save/log worker and the poller.

pub mod poller;
pub mod sink;
pub mod worker;
