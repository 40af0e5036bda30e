//! Collection bindings: which filter each record type is queried with.

use edudesk_core::{ClassroomId, Entity, SchoolId, UserId};
use edudesk_school::{Classroom, School, Student, UserAccount};

/// A record stored in a collection.
pub trait Document: Entity<Id: Ord + Send + Sync> + Clone + Send + Sync + 'static {
    /// Query shape; `Default` matches every document.
    type Filter: Default + Send + Sync;

    const COLLECTION: &'static str;

    fn matches(&self, filter: &Self::Filter) -> bool;
}

fn opt_eq<T: PartialEq>(wanted: &Option<T>, actual: &T) -> bool {
    wanted.as_ref().is_none_or(|w| w == actual)
}

fn not_excluded<T: PartialEq>(excluded: &Option<T>, actual: &T) -> bool {
    excluded.as_ref() != Some(actual)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchoolFilter {
    pub id: Option<SchoolId>,
    pub name: Option<String>,
    pub exclude: Option<SchoolId>,
}

impl SchoolFilter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn only(id: SchoolId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn excluding(mut self, id: SchoolId) -> Self {
        self.exclude = Some(id);
        self
    }
}

impl Document for School {
    type Filter = SchoolFilter;
    const COLLECTION: &'static str = "schools";

    fn matches(&self, f: &SchoolFilter) -> bool {
        opt_eq(&f.id, &self.id) && opt_eq(&f.name, &self.name) && not_excluded(&f.exclude, &self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassroomFilter {
    pub name: Option<String>,
    pub school_id: Option<SchoolId>,
    pub exclude: Option<ClassroomId>,
}

impl ClassroomFilter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn in_school(school_id: SchoolId) -> Self {
        Self {
            school_id: Some(school_id),
            ..Self::default()
        }
    }

    pub fn excluding(mut self, id: ClassroomId) -> Self {
        self.exclude = Some(id);
        self
    }
}

impl Document for Classroom {
    type Filter = ClassroomFilter;
    const COLLECTION: &'static str = "classrooms";

    fn matches(&self, f: &ClassroomFilter) -> bool {
        opt_eq(&f.name, &self.name)
            && opt_eq(&f.school_id, &self.school_id)
            && not_excluded(&f.exclude, &self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    pub classroom_id: Option<ClassroomId>,
    pub school_id: Option<SchoolId>,
}

impl StudentFilter {
    pub fn in_classroom(classroom_id: ClassroomId) -> Self {
        Self {
            classroom_id: Some(classroom_id),
            ..Self::default()
        }
    }

    pub fn in_school(school_id: SchoolId) -> Self {
        Self {
            school_id: Some(school_id),
            ..Self::default()
        }
    }
}

impl Document for Student {
    type Filter = StudentFilter;
    const COLLECTION: &'static str = "students";

    fn matches(&self, f: &StudentFilter) -> bool {
        opt_eq(&f.classroom_id, &self.classroom_id) && opt_eq(&f.school_id, &self.school_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub username: Option<String>,
    pub email: Option<String>,
    pub exclude: Option<UserId>,
}

impl UserFilter {
    pub fn username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Self::default()
        }
    }

    pub fn email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    pub fn excluding(mut self, id: UserId) -> Self {
        self.exclude = Some(id);
        self
    }
}

impl Document for UserAccount {
    type Filter = UserFilter;
    const COLLECTION: &'static str = "users";

    fn matches(&self, f: &UserFilter) -> bool {
        opt_eq(&f.username, &self.username)
            && opt_eq(&f.email, &self.email)
            && not_excluded(&f.exclude, &self.id)
    }
}
