use chrono::Utc;

use edudesk_auth::{DecodedToken, TenantFilter, scope_for};
use edudesk_core::{ClassroomId, SchoolId};
use edudesk_school::{Classroom, ClassroomInput, parse_id};

use super::{ManagerError, ManagerResult, check_record, check_school, supplied_school};
use crate::store::{ClassroomFilter, StudentFilter, Stores};

#[derive(Clone)]
pub struct ClassroomManager {
    stores: Stores,
}

impl ClassroomManager {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    async fn ensure_school(&self, id: SchoolId) -> ManagerResult<()> {
        match self.stores.schools.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(ManagerError::NotFound("school not found")),
        }
    }

    async fn load(&self, id: ClassroomId) -> ManagerResult<Classroom> {
        self.stores
            .classrooms
            .find_by_id(id)
            .await?
            .ok_or(ManagerError::NotFound("classroom not found"))
    }

    pub async fn create(&self, caller: &DecodedToken, input: &ClassroomInput) -> ManagerResult<Classroom> {
        check_school(caller, supplied_school(input.school_id.as_deref()))?;
        let fields = input.validate()?;

        if self
            .stores
            .classrooms
            .find_one(&ClassroomFilter::named(&fields.name))
            .await?
            .is_some()
        {
            return Err(ManagerError::Conflict("classroom already exists"));
        }
        self.ensure_school(fields.school_id).await?;

        let classroom = self
            .stores
            .classrooms
            .create(Classroom::new(fields, Utc::now()))
            .await?;
        tracing::info!(
            classroom_id = %classroom.id,
            school_id = %classroom.school_id,
            user_id = %caller.user_id,
            "classroom created"
        );
        Ok(classroom)
    }

    pub async fn update(&self, caller: &DecodedToken, input: &ClassroomInput) -> ManagerResult<Classroom> {
        check_school(caller, supplied_school(input.school_id.as_deref()))?;
        let (id, fields) = input.validate_with_id()?;

        let mut classroom = self.load(id).await?;
        check_record(caller, &classroom)?;

        if self
            .stores
            .classrooms
            .find_one(&ClassroomFilter::named(&fields.name).excluding(id))
            .await?
            .is_some()
        {
            return Err(ManagerError::Conflict("classroom already exists"));
        }
        self.ensure_school(fields.school_id).await?;

        classroom.apply(fields, Utc::now());
        let classroom = self
            .stores
            .classrooms
            .find_by_id_and_update(id, classroom)
            .await?
            .ok_or(ManagerError::NotFound("classroom not found"))?;
        tracing::info!(classroom_id = %id, user_id = %caller.user_id, "classroom updated");
        Ok(classroom)
    }

    pub async fn delete(&self, caller: &DecodedToken, id: Option<&str>) -> ManagerResult<Classroom> {
        let id: ClassroomId = parse_id("id", id)?;
        let classroom = self.load(id).await?;
        check_record(caller, &classroom)?;

        if self
            .stores
            .students
            .find_one(&StudentFilter::in_classroom(id))
            .await?
            .is_some()
        {
            return Err(ManagerError::Conflict("classroom has students, cannot delete"));
        }

        let removed = self
            .stores
            .classrooms
            .find_by_id_and_delete(id)
            .await?
            .ok_or(ManagerError::NotFound("classroom not found"))?;
        tracing::info!(classroom_id = %id, user_id = %caller.user_id, "classroom deleted");
        Ok(removed)
    }

    pub async fn get_by_id(&self, caller: &DecodedToken, id: Option<&str>) -> ManagerResult<Classroom> {
        let id: ClassroomId = parse_id("id", id)?;
        let classroom = self.load(id).await?;
        check_record(caller, &classroom)?;
        Ok(classroom)
    }

    pub async fn get_all(&self, caller: &DecodedToken) -> ManagerResult<Vec<Classroom>> {
        let filter = match scope_for(caller) {
            TenantFilter::All => ClassroomFilter::default(),
            TenantFilter::School(own) => ClassroomFilter::in_school(own),
            TenantFilter::Nothing => return Ok(Vec::new()),
        };
        Ok(self.stores.classrooms.find(&filter).await?)
    }
}

#[cfg(test)]
mod tests {
    use edudesk_school::StudentInput;

    use super::*;
    use crate::managers::fixtures::{classroom_input, managers, school_admin, school_input, super_admin};

    #[tokio::test]
    async fn school_admin_cannot_create_in_another_school() {
        let (m, stores) = managers();
        let root = super_admin();
        let s1 = m.schools.create(&root, &school_input("S1")).await.unwrap();
        let s2 = m.schools.create(&root, &school_input("S2")).await.unwrap();

        let err = m
            .classrooms
            .create(&school_admin(s1.id), &classroom_input("7B", s2.id))
            .await
            .unwrap_err();
        assert!(matches!(err, ManagerError::TenantMismatch));
        assert_eq!(err.status(), 401);
        assert_eq!(err.public_message(), "Unauthorized");
        assert!(stores.classrooms.find(&ClassroomFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn school_admin_without_school_id_is_refused() {
        let (m, _) = managers();
        let mut input = classroom_input("7B", SchoolId::new());
        input.school_id = None;
        let err = m
            .classrooms
            .create(&school_admin(SchoolId::new()), &input)
            .await
            .unwrap_err();
        assert!(matches!(err, ManagerError::TenantMismatch));
    }

    #[tokio::test]
    async fn super_admin_gets_not_found_for_unknown_school() {
        let (m, _) = managers();
        let err = m
            .classrooms
            .create(&super_admin(), &classroom_input("7B", SchoolId::new()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), 404);
        assert_eq!(err.public_message(), "school not found");
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() {
        let (m, _) = managers();
        let root = super_admin();
        let s = m.schools.create(&root, &school_input("S")).await.unwrap();
        m.classrooms.create(&root, &classroom_input("7B", s.id)).await.unwrap();
        let err = m
            .classrooms
            .create(&root, &classroom_input("7B", s.id))
            .await
            .unwrap_err();
        assert_eq!(err.public_message(), "classroom already exists");
    }

    #[tokio::test]
    async fn delete_refuses_while_students_exist() {
        let (m, _) = managers();
        let root = super_admin();
        let s = m.schools.create(&root, &school_input("S")).await.unwrap();
        let room = m.classrooms.create(&root, &classroom_input("7B", s.id)).await.unwrap();
        m.students
            .create(
                &root,
                &StudentInput {
                    id: None,
                    first_name: Some("Ada".to_string()),
                    last_name: Some("Lovelace".to_string()),
                    classroom_id: Some(room.id.to_string()),
                    school_id: Some(s.id.to_string()),
                    email: Some("ada@example.com".to_string()),
                    username: Some("ada".to_string()),
                    password: Some("secret".to_string()),
                },
            )
            .await
            .unwrap();

        let err = m
            .classrooms
            .delete(&root, Some(&room.id.to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), 409);
        assert_eq!(err.public_message(), "classroom has students, cannot delete");
    }

    #[tokio::test]
    async fn existing_record_is_guarded() {
        let (m, _) = managers();
        let root = super_admin();
        let s1 = m.schools.create(&root, &school_input("S1")).await.unwrap();
        let s2 = m.schools.create(&root, &school_input("S2")).await.unwrap();
        let foreign = m.classrooms.create(&root, &classroom_input("9Z", s2.id)).await.unwrap();
        let admin = school_admin(s1.id);
        let id = foreign.id.to_string();

        assert!(matches!(
            m.classrooms.get_by_id(&admin, Some(&id)).await,
            Err(ManagerError::TenantMismatch)
        ));
        assert!(matches!(
            m.classrooms.delete(&admin, Some(&id)).await,
            Err(ManagerError::TenantMismatch)
        ));

        // Moving a foreign classroom into one's own school is refused too.
        let mut input = classroom_input("9Z", s1.id);
        input.id = Some(id.clone());
        assert!(matches!(
            m.classrooms.update(&admin, &input).await,
            Err(ManagerError::TenantMismatch)
        ));

        assert_eq!(m.classrooms.get_by_id(&root, Some(&id)).await.unwrap().id, foreign.id);
    }

    #[tokio::test]
    async fn listing_is_scoped_for_school_admins() {
        let (m, _) = managers();
        let root = super_admin();
        let s1 = m.schools.create(&root, &school_input("S1")).await.unwrap();
        let s2 = m.schools.create(&root, &school_input("S2")).await.unwrap();
        m.classrooms.create(&root, &classroom_input("1A", s1.id)).await.unwrap();
        m.classrooms.create(&root, &classroom_input("2A", s2.id)).await.unwrap();

        let mine = m.classrooms.get_all(&school_admin(s1.id)).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].school_id, s1.id);
        assert_eq!(m.classrooms.get_all(&root).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_changes_capacity() {
        let (m, _) = managers();
        let root = super_admin();
        let s = m.schools.create(&root, &school_input("S")).await.unwrap();
        let room = m.classrooms.create(&root, &classroom_input("1A", s.id)).await.unwrap();

        let mut input = classroom_input("1A", s.id);
        input.id = Some(room.id.to_string());
        input.capacity = Some(12);
        let updated = m.classrooms.update(&school_admin(s.id), &input).await.unwrap();
        assert_eq!(updated.capacity, 12);
        assert_eq!(updated.created_at, room.created_at);
    }
}
