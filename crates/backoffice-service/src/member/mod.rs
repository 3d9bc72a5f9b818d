//! Member (socio) management.

pub mod service;

pub use service::{MemberHistory, MemberService};
