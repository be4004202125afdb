//! Reusable resumable functions
//!
//! Bodies here follow the same protocol as user code and are invoked through
//! [`CallStack::call`](crate::runtime::CallStack::call) and friends.

pub mod time;
