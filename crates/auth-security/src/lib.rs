//! # Auth Security
//! 
//! Token codec, session window policy, clock, and password hashing.

pub mod clock;
pub mod jwt;
pub mod password;
pub mod session;

pub use clock::{Clock, ManualClock, SystemClock};
pub use jwt::{Claims, TokenCodec, TokenError};
pub use password::PasswordService;
pub use session::{SessionDescriptor, SessionExpired, SessionWindow};
