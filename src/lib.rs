pub mod approval;
pub mod csv;
pub mod model;
pub mod money;
pub mod scooter;
pub mod station;
pub mod system;

pub use approval::{ApprovalChain, ApprovalPolicy, Authority, Decision, RentalChangeRequest};
pub use model::{ClientId, Location, Operation, RentalId, ScooterId, StationId};
pub use money::Money;
pub use scooter::{Scooter, ScooterFactory, ScooterKind};
pub use station::RentalStation;
pub use system::RentalSystem;
