use chrono::Utc;

use edudesk_auth::{DecodedToken, TenantFilter, scope_for};
use edudesk_core::SchoolId;
use edudesk_school::{School, SchoolInput, parse_id};

use super::{ManagerError, ManagerResult, check_record, check_school, supplied_school};
use crate::store::{ClassroomFilter, SchoolFilter, Stores};

#[derive(Clone)]
pub struct SchoolManager {
    stores: Stores,
}

impl SchoolManager {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn create(&self, caller: &DecodedToken, input: &SchoolInput) -> ManagerResult<School> {
        let fields = input.validate()?;

        if self
            .stores
            .schools
            .find_one(&SchoolFilter::named(&fields.name))
            .await?
            .is_some()
        {
            return Err(ManagerError::Conflict("school already exists"));
        }

        let school = self.stores.schools.create(School::new(fields, Utc::now())).await?;
        tracing::info!(school_id = %school.id, user_id = %caller.user_id, "school created");
        Ok(school)
    }

    pub async fn update(&self, caller: &DecodedToken, input: &SchoolInput) -> ManagerResult<School> {
        let (id, fields) = input.validate_with_id()?;

        let mut school = self
            .stores
            .schools
            .find_by_id(id)
            .await?
            .ok_or(ManagerError::NotFound("school not found"))?;
        check_record(caller, &school)?;

        if self
            .stores
            .schools
            .find_one(&SchoolFilter::named(&fields.name).excluding(id))
            .await?
            .is_some()
        {
            return Err(ManagerError::Conflict("school with this name already exists"));
        }

        school.apply(fields, Utc::now());
        let school = self
            .stores
            .schools
            .find_by_id_and_update(id, school)
            .await?
            .ok_or(ManagerError::NotFound("school not found"))?;
        tracing::info!(school_id = %id, user_id = %caller.user_id, "school updated");
        Ok(school)
    }

    pub async fn delete(&self, caller: &DecodedToken, id: Option<&str>) -> ManagerResult<School> {
        let id: SchoolId = parse_id("id", id)?;

        let school = self
            .stores
            .schools
            .find_by_id(id)
            .await?
            .ok_or(ManagerError::NotFound("school not found"))?;
        check_record(caller, &school)?;

        if self
            .stores
            .classrooms
            .find_one(&ClassroomFilter::in_school(id))
            .await?
            .is_some()
        {
            return Err(ManagerError::Conflict("school has classrooms, cannot be deleted"));
        }

        let removed = self
            .stores
            .schools
            .find_by_id_and_delete(id)
            .await?
            .ok_or(ManagerError::NotFound("school not found"))?;
        tracing::info!(school_id = %id, user_id = %caller.user_id, "school deleted");
        Ok(removed)
    }

    /// A school admin may only read its own school.
    pub async fn get_by_id(&self, caller: &DecodedToken, id: Option<&str>) -> ManagerResult<School> {
        check_school(caller, supplied_school(id))?;
        let id: SchoolId = parse_id("id", id)?;

        self.stores
            .schools
            .find_by_id(id)
            .await?
            .ok_or(ManagerError::NotFound("school not found"))
    }

    pub async fn get_all(&self, caller: &DecodedToken) -> ManagerResult<Vec<School>> {
        let filter = match scope_for(caller) {
            TenantFilter::All => SchoolFilter::default(),
            TenantFilter::School(own) => SchoolFilter::only(own),
            TenantFilter::Nothing => return Ok(Vec::new()),
        };
        Ok(self.stores.schools.find(&filter).await?)
    }
}
