//! Member repository implementation.

use std::sync::Arc;

use tracing::info;

use backoffice_core::error::AppError;
use backoffice_core::result::AppResult;
use backoffice_core::traits::{Record, RecordStore};
use backoffice_core::types::{FilterField, MemberId, SelectQuery, SortField};
use backoffice_entity::member::{CreateMember, Member, UpdateMember};

use super::{decode_row, decode_rows, single};

/// Repository for `socios`.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    store: Arc<dyn RecordStore>,
}

impl MemberRepository {
    /// Create a new member repository.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// All members ordered by name.
    pub async fn list(&self) -> AppResult<Vec<Member>> {
        let query = SelectQuery::all().order_by(SortField::asc("nombre"));
        let rows = self.store.select(Member::TABLE, &query).await?;
        decode_rows(Member::TABLE, rows)
    }

    /// Find a member by ID.
    pub async fn find_by_id(&self, id: MemberId) -> AppResult<Member> {
        let query = SelectQuery::all().filter(FilterField::eq("id", id));
        let rows = self.store.select(Member::TABLE, &query).await?;
        rows.into_iter()
            .next()
            .map(|row| decode_row(Member::TABLE, row))
            .unwrap_or_else(|| Err(AppError::not_found(format!("Member {id} not found"))))
    }

    /// Insert a member.
    pub async fn create(&self, data: &CreateMember) -> AppResult<Member> {
        let row = self
            .store
            .insert(Member::TABLE, serde_json::to_value(data)?)
            .await?;
        let member: Member = decode_row(Member::TABLE, row)?;
        info!(member_id = %member.id, "Member created");
        Ok(member)
    }

    /// Update a member's fields.
    pub async fn update(&self, id: MemberId, patch: &UpdateMember) -> AppResult<Member> {
        let rows = self
            .store
            .update(
                Member::TABLE,
                &[FilterField::eq("id", id)],
                serde_json::to_value(patch)?,
            )
            .await?;
        single(Member::TABLE, id, rows)
    }

    /// Delete a member.
    pub async fn delete(&self, id: MemberId) -> AppResult<()> {
        let removed = self
            .store
            .delete(Member::TABLE, &[FilterField::eq("id", id)])
            .await?;
        info!(member_id = %id, removed, "Member deleted");
        Ok(())
    }
}
