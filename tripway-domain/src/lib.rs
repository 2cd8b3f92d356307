pub mod booking;
pub mod money;
pub mod user;

pub use booking::{Booking, BookingStatus, CancellationPolicy, ProductKind, TransitionError};
pub use money::apply_bps;
pub use user::{Session, UnknownRole, User, UserRole};
