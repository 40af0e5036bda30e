use std::sync::Arc;

use chrono::Utc;

use edudesk_auth::{CredentialHasher, DecodedToken, Role, TenantFilter, scope_for};
use edudesk_core::{ClassroomId, DomainError, SchoolId, StudentId};
use edudesk_school::{Student, StudentInput, UserAccount, parse_id};

use super::{
    ManagerError, ManagerResult, check_record, check_school, ensure_account_available,
    hash_password, supplied_school,
};
use crate::store::{StudentFilter, Stores, UserFilter};

#[derive(Clone)]
pub struct StudentManager {
    stores: Stores,
    hasher: Arc<dyn CredentialHasher>,
}

impl StudentManager {
    pub fn new(stores: Stores, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { stores, hasher }
    }

    async fn load(&self, id: StudentId) -> ManagerResult<Student> {
        self.stores
            .students
            .find_by_id(id)
            .await?
            .ok_or(ManagerError::NotFound("student not found"))
    }

    /// The classroom and school must both exist, and the classroom must
    /// belong to that school.
    async fn ensure_placement(&self, classroom_id: ClassroomId, school_id: SchoolId) -> ManagerResult<()> {
        let classroom = self
            .stores
            .classrooms
            .find_by_id(classroom_id)
            .await?
            .ok_or(ManagerError::NotFound("classroom not found"))?;
        if self.stores.schools.find_by_id(school_id).await?.is_none() {
            return Err(ManagerError::NotFound("school not found"));
        }
        if classroom.school_id != school_id {
            return Err(DomainError::validation("classroomId must belong to schoolId").into());
        }
        Ok(())
    }

    /// Opens a `student` account and the linked student record.
    pub async fn create(&self, caller: &DecodedToken, input: &StudentInput) -> ManagerResult<Student> {
        check_school(caller, supplied_school(input.school_id.as_deref()))?;
        let fields = input.validate_new()?;

        self.ensure_placement(fields.classroom_id, fields.school_id).await?;
        ensure_account_available(&self.stores, &fields.username, &fields.email).await?;

        let now = Utc::now();
        let password_hash = hash_password(&self.hasher, &fields.password).await?;
        let account = self
            .stores
            .users
            .create(UserAccount::new(
                fields.username.clone(),
                fields.email.clone(),
                password_hash,
                Role::Student,
                Some(fields.school_id),
                now,
            ))
            .await?;

        let student = self
            .stores
            .students
            .create(Student::new(&fields, account.id, now))
            .await?;
        tracing::info!(
            student_id = %student.id,
            account_id = %account.id,
            school_id = %student.school_id,
            user_id = %caller.user_id,
            "student created"
        );
        Ok(student)
    }

    pub async fn update(&self, caller: &DecodedToken, input: &StudentInput) -> ManagerResult<Student> {
        check_school(caller, supplied_school(input.school_id.as_deref()))?;
        let (id, fields) = input.validate_update()?;

        let mut student = self.load(id).await?;
        check_record(caller, &student)?;
        self.ensure_placement(fields.classroom_id, fields.school_id).await?;

        if let Some(username) = &fields.username {
            if self
                .stores
                .users
                .find_one(&UserFilter::username(username).excluding(student.user_id))
                .await?
                .is_some()
            {
                return Err(ManagerError::Conflict("User already exists"));
            }
            if let Some(mut account) = self.stores.users.find_by_id(student.user_id).await? {
                account.username = username.clone();
                self.stores
                    .users
                    .find_by_id_and_update(account.id, account)
                    .await?;
            }
        }

        student.apply(&fields, Utc::now());
        let student = self
            .stores
            .students
            .find_by_id_and_update(id, student)
            .await?
            .ok_or(ManagerError::NotFound("student not found"))?;
        tracing::info!(student_id = %id, user_id = %caller.user_id, "student updated");
        Ok(student)
    }

    /// Removes the student record only; the linked account stays.
    pub async fn delete(&self, caller: &DecodedToken, id: Option<&str>) -> ManagerResult<Student> {
        let id: StudentId = parse_id("id", id)?;
        let student = self.load(id).await?;
        check_record(caller, &student)?;

        let removed = self
            .stores
            .students
            .find_by_id_and_delete(id)
            .await?
            .ok_or(ManagerError::NotFound("student not found"))?;
        tracing::info!(student_id = %id, user_id = %caller.user_id, "student deleted");
        Ok(removed)
    }

    pub async fn get_by_id(&self, caller: &DecodedToken, id: Option<&str>) -> ManagerResult<Student> {
        let id: StudentId = parse_id("id", id)?;
        let student = self.load(id).await?;
        check_record(caller, &student)?;
        Ok(student)
    }

    pub async fn get_all(&self, caller: &DecodedToken) -> ManagerResult<Vec<Student>> {
        let filter = match scope_for(caller) {
            TenantFilter::All => StudentFilter::default(),
            TenantFilter::School(own) => StudentFilter::in_school(own),
            TenantFilter::Nothing => return Ok(Vec::new()),
        };
        Ok(self.stores.students.find(&filter).await?)
    }
}

#[cfg(test)]
mod tests {
    use edudesk_school::Classroom;

    use super::*;
    use crate::managers::fixtures::{classroom_input, managers, school_admin, school_input, super_admin};
    use crate::managers::Managers;

    async fn setup(m: &Managers) -> (SchoolId, Classroom) {
        let root = super_admin();
        let s = m.schools.create(&root, &school_input("S")).await.unwrap();
        let room = m.classrooms.create(&root, &classroom_input("1A", s.id)).await.unwrap();
        (s.id, room)
    }

    fn input(school: SchoolId, room: ClassroomId, username: &str) -> StudentInput {
        StudentInput {
            id: None,
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            classroom_id: Some(room.to_string()),
            school_id: Some(school.to_string()),
            email: Some(format!("{username}@example.com")),
            username: Some(username.to_string()),
            password: Some("secret".to_string()),
        }
    }

    #[tokio::test]
    async fn create_opens_a_student_account() {
        let (m, stores) = managers();
        let (school, room) = setup(&m).await;

        let student = m
            .students
            .create(&school_admin(school), &input(school, room.id, "ada"))
            .await
            .unwrap();

        let account = stores.users.find_by_id(student.user_id).await.unwrap().unwrap();
        assert_eq!(account.role, Role::Student);
        assert_eq!(account.school_id, Some(school));
        assert_ne!(account.password_hash, "secret");
    }

    #[tokio::test]
    async fn taken_username_conflicts() {
        let (m, _) = managers();
        let (school, room) = setup(&m).await;
        let root = super_admin();
        m.students.create(&root, &input(school, room.id, "ada")).await.unwrap();

        let err = m
            .students
            .create(&root, &input(school, room.id, "ada"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), 409);
        assert_eq!(err.public_message(), "User already exists");
    }

    #[tokio::test]
    async fn missing_classroom_or_school() {
        let (m, _) = managers();
        let (school, room) = setup(&m).await;
        let root = super_admin();

        let err = m
            .students
            .create(&root, &input(school, ClassroomId::new(), "ada"))
            .await
            .unwrap_err();
        assert_eq!(err.public_message(), "classroom not found");

        let err = m
            .students
            .create(&root, &input(SchoolId::new(), room.id, "ada"))
            .await
            .unwrap_err();
        assert_eq!(err.public_message(), "school not found");
    }

    #[tokio::test]
    async fn classroom_must_belong_to_school() {
        let (m, _) = managers();
        let (_, room) = setup(&m).await;
        let root = super_admin();
        let other = m.schools.create(&root, &school_input("Other")).await.unwrap();

        let err = m
            .students
            .create(&root, &input(other.id, room.id, "ada"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), 400);
    }

    #[tokio::test]
    async fn update_renames_linked_account() {
        let (m, stores) = managers();
        let (school, room) = setup(&m).await;
        let root = super_admin();
        let student = m.students.create(&root, &input(school, room.id, "ada")).await.unwrap();
        m.students.create(&root, &input(school, room.id, "bob")).await.unwrap();

        let mut change = input(school, room.id, "bob");
        change.id = Some(student.id.to_string());
        let err = m.students.update(&root, &change).await.unwrap_err();
        assert_eq!(err.public_message(), "User already exists");

        // Re-submitting one's own username is fine.
        let mut change = input(school, room.id, "ada");
        change.id = Some(student.id.to_string());
        change.first_name = Some("Augusta".to_string());
        let updated = m.students.update(&root, &change).await.unwrap();
        assert_eq!(updated.first_name, "Augusta");

        change.username = Some("ada_l".to_string());
        m.students.update(&root, &change).await.unwrap();
        let account = stores.users.find_by_id(student.user_id).await.unwrap().unwrap();
        assert_eq!(account.username, "ada_l");
    }

    #[tokio::test]
    async fn delete_keeps_the_account() {
        let (m, stores) = managers();
        let (school, room) = setup(&m).await;
        let root = super_admin();
        let student = m.students.create(&root, &input(school, room.id, "ada")).await.unwrap();

        let id = student.id.to_string();
        m.students.delete(&root, Some(&id)).await.unwrap();
        assert_eq!(m.students.get_by_id(&root, Some(&id)).await.unwrap_err().status(), 404);
        assert!(stores.users.find_by_id(student.user_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn foreign_students_are_hidden_from_school_admins() {
        let (m, _) = managers();
        let (school, room) = setup(&m).await;
        let root = super_admin();
        let student = m.students.create(&root, &input(school, room.id, "ada")).await.unwrap();
        let outsider = school_admin(SchoolId::new());

        assert!(matches!(
            m.students.get_by_id(&outsider, Some(&student.id.to_string())).await,
            Err(ManagerError::TenantMismatch)
        ));
        assert!(m.students.get_all(&outsider).await.unwrap().is_empty());
        assert_eq!(m.students.get_all(&school_admin(school)).await.unwrap().len(), 1);
    }
}
