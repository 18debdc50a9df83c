/*
[INPUT]:  Session tokens handed over by the host application
[OUTPUT]: Authorization header values and expiry status
[POS]:    Auth layer - session credential handling
[UPDATE]: When token format or storage strategy changes
*/

pub mod session;

pub use session::{SessionManager, SessionToken, TokenData};
