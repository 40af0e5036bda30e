//! Infrastructure layer: persistence contract, in-memory store, entity
//! managers and startup seeding.

pub mod managers;
pub mod seed;
pub mod store;

pub use managers::{
    AuthenticatedUser, ClassroomManager, ManagerError, ManagerResult, Managers, SchoolManager, StudentManager,
    UserManager,
};
pub use seed::{SeedOutcome, SuperAdminSeed, seed_super_admin};
pub use store::{Document, InMemoryRepository, Repository, StoreError, Stores};
