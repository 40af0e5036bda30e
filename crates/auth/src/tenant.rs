//! Tenant (school) scoping for school administrators.
//!
//! A school admin may only see and touch rows of its own school. Every other
//! role passes through untouched; super admins see all tenants.

use edudesk_core::SchoolId;

use crate::{DecodedToken, DenialReason, Role};

/// Marks records that belong to exactly one school.
pub trait TenantScoped {
    fn tenant_id(&self) -> SchoolId;
}

/// Which rows a listing may return for a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantFilter {
    All,
    School(SchoolId),
    /// A school admin whose token carries no school sees nothing.
    Nothing,
}

impl TenantFilter {
    pub fn admits(&self, school_id: SchoolId) -> bool {
        match self {
            TenantFilter::All => true,
            TenantFilter::School(id) => *id == school_id,
            TenantFilter::Nothing => false,
        }
    }

    pub fn school(&self) -> Option<SchoolId> {
        match self {
            TenantFilter::School(id) => Some(*id),
            _ => None,
        }
    }
}

/// Listing scope derived from the caller.
pub fn scope_for(caller: &DecodedToken) -> TenantFilter {
    if !caller.is(Role::SchoolAdmin) {
        return TenantFilter::All;
    }
    caller
        .school_id
        .map(TenantFilter::School)
        .unwrap_or(TenantFilter::Nothing)
}

/// Check a school id the caller supplied or targets directly.
///
/// An absent target never matches: a school admin must name its own school.
pub fn guard_school(caller: &DecodedToken, target: Option<SchoolId>) -> Result<(), DenialReason> {
    if !caller.is(Role::SchoolAdmin) {
        return Ok(());
    }
    match (caller.school_id, target) {
        (Some(own), Some(target)) if own == target => Ok(()),
        _ => Err(DenialReason::TenantMismatch),
    }
}

/// Check an existing record's school against the caller's.
pub fn guard_record<R: TenantScoped + ?Sized>(caller: &DecodedToken, record: &R) -> Result<(), DenialReason> {
    guard_school(caller, Some(record.tenant_id()))
}
