//! Persistence boundary for school-management records.
//!
//! Managers talk to `Repository<D>` only; the in-memory implementation backs
//! dev/test and the default server wiring.

pub mod documents;
pub mod in_memory;
pub mod repository;

use std::sync::Arc;

use edudesk_school::{Classroom, School, Student, UserAccount};

pub use documents::{ClassroomFilter, Document, SchoolFilter, StudentFilter, UserFilter};
pub use in_memory::InMemoryRepository;
pub use repository::{Repository, StoreError};

/// One repository per collection.
#[derive(Clone)]
pub struct Stores {
    pub schools: Arc<dyn Repository<School>>,
    pub classrooms: Arc<dyn Repository<Classroom>>,
    pub students: Arc<dyn Repository<Student>>,
    pub users: Arc<dyn Repository<UserAccount>>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            schools: Arc::new(InMemoryRepository::<School>::new()),
            classrooms: Arc::new(InMemoryRepository::<Classroom>::new()),
            students: Arc::new(InMemoryRepository::<Student>::new()),
            users: Arc::new(InMemoryRepository::<UserAccount>::new()),
        }
    }
}
