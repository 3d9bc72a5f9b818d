//! Member CRUD and purchase history.

use serde::Serialize;
use tracing::info;

use backoffice_backend::Backend;
use backoffice_backend::repositories::{MemberRepository, OrderRepository};
use backoffice_core::types::MemberId;
use backoffice_core::{AppError, AppResult};
use backoffice_entity::member::{CreateMember, Member, UpdateMember};
use backoffice_entity::order::Order;

use crate::views::{self, MemberMetrics};

/// A member with their orders (newest first) and derived metrics.
#[derive(Debug, Clone, Serialize)]
pub struct MemberHistory {
    pub member: Member,
    pub orders: Vec<Order>,
    pub metrics: MemberMetrics,
}

/// Manages members.
#[derive(Debug, Clone)]
pub struct MemberService {
    members: MemberRepository,
    orders: OrderRepository,
}

impl MemberService {
    pub fn new(backend: &Backend) -> Self {
        Self {
            members: backend.members(),
            orders: backend.orders(),
        }
    }

    /// All members ordered by name.
    pub async fn list(&self) -> AppResult<Vec<Member>> {
        self.members.list().await
    }

    /// Members matching `term` by name or phone, for the order picker.
    pub async fn search(&self, term: &str) -> AppResult<Vec<Member>> {
        let members = self.members.list().await?;
        Ok(views::search_members(&members, term)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn get(&self, id: MemberId) -> AppResult<Member> {
        self.members.find_by_id(id).await
    }

    /// Validate and insert a member.
    pub async fn create(&self, data: CreateMember) -> AppResult<Member> {
        let data = data.prepare()?;
        let member = self.members.create(&data).await?;
        info!(member_id = %member.id, "Member created");
        Ok(member)
    }

    /// Validate and apply an edit.
    pub async fn update(&self, id: MemberId, patch: UpdateMember) -> AppResult<Member> {
        let patch = patch.prepare()?;
        if patch.is_empty() {
            return Err(AppError::validation("Nothing to update"));
        }
        let member = self.members.update(id, &patch).await?;
        info!(member_id = %id, "Member updated");
        Ok(member)
    }

    pub async fn delete(&self, id: MemberId) -> AppResult<()> {
        self.members.delete(id).await?;
        info!(member_id = %id, "Member deleted");
        Ok(())
    }

    /// Member detail: orders newest first plus spend and frequency.
    pub async fn history(&self, id: MemberId) -> AppResult<MemberHistory> {
        let member = self.members.find_by_id(id).await?;
        let orders = self.orders.list_by_member(id).await?;
        let metrics = views::member_metrics(&orders);
        Ok(MemberHistory {
            member,
            orders,
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use backoffice_core::error::ErrorKind;
    use backoffice_entity::order::OrderDraft;

    use super::*;
    use crate::fixtures::{memory_backend, today};

    #[tokio::test]
    async fn test_create_without_phone_reads_back_null_phone() {
        let (backend, store) = memory_backend();
        let service = MemberService::new(&backend);

        let created = service
            .create(CreateMember::new("  Juan Perez ", Some("   ".into())))
            .await
            .unwrap();
        let found = service.get(created.id).await.unwrap();
        assert_eq!(found.name, "Juan Perez");
        assert!(found.phone.is_none());
        assert_eq!(store.count("socios"), 1);
    }

    #[tokio::test]
    async fn test_blank_name_fails_before_insert() {
        let (backend, store) = memory_backend();
        let service = MemberService::new(&backend);

        let err = service.create(CreateMember::new("  ", None)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(store.count("socios"), 0);

        let err = service
            .update(MemberId::new(), UpdateMember::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_list_is_sorted_and_searchable() {
        let (backend, _) = memory_backend();
        let service = MemberService::new(&backend);
        service.create(CreateMember::new("Zoe", None)).await.unwrap();
        service
            .create(CreateMember::new("Ana", Some("099111222".into())))
            .await
            .unwrap();

        let names: Vec<String> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Ana", "Zoe"]);
        assert_eq!(service.search("111").await.unwrap()[0].name, "Ana");
    }

    #[tokio::test]
    async fn test_history_collects_orders_and_metrics() {
        let (backend, _) = memory_backend();
        let service = MemberService::new(&backend);
        let juan = service.create(CreateMember::new("Juan Perez", None)).await.unwrap();
        let other = service.create(CreateMember::new("Otro", None)).await.unwrap();

        for (member, total) in [(juan.id, 25000), (juan.id, 5000), (other.id, 999)] {
            let order = OrderDraft::quick(today())
                .member(member)
                .variety("Amnesia")
                .total(Decimal::from(total))
                .build()
                .unwrap();
            backend.orders().create(&order).await.unwrap();
        }

        let history = service.history(juan.id).await.unwrap();
        assert_eq!(history.member.name, "Juan Perez");
        assert_eq!(history.orders.len(), 2);
        assert_eq!(history.metrics.total_spent, Decimal::from(30000));
        assert_eq!(history.metrics.order_count, 2);
        assert!(history.metrics.frequency_days.is_some());
    }
}
