//! Service order repository.

use chrono::Utc;
use domain::models::{OrderCounts, OrderDraft, OrderSignature, ServiceOrder};
use domain::services::{next_order_number, OrderFilter};
use domain::DomainError;
use shared::cpf::{format_cpf, same_cpf};
use shared::pagination::{paginate, Page, PageRequest};
use uuid::Uuid;

use crate::metrics::{record_store_sizes, StoreTimer};
use crate::store::{Store, StoreState};

/// Repository for service orders.
#[derive(Clone)]
pub struct OrderRepository {
    store: Store,
}

impl OrderRepository {
    /// Creates a new OrderRepository over the given store.
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create a pending order from a complete draft.
    ///
    /// Rejects a second pending order for the same CPF. The duplicate check,
    /// number assignment and insert happen under one write guard.
    pub async fn create_pending(&self, draft: OrderDraft) -> Result<ServiceOrder, DomainError> {
        draft.ensure_complete()?;
        let timer = StoreTimer::new("create_pending_order");

        let mut state = self.store.write().await;
        ensure_no_pending(&state, &draft.cpf, None)?;

        let number = next_order_number(&state.orders);
        let order = ServiceOrder::new(number, draft, Utc::now());
        state.orders.push(order.clone());
        record_store_sizes(&state);

        timer.record();
        Ok(order)
    }

    /// Replace the contents of a pending order.
    pub async fn update(&self, id: Uuid, draft: OrderDraft) -> Result<ServiceOrder, DomainError> {
        draft.ensure_complete()?;
        let timer = StoreTimer::new("update_order");

        let mut state = self.store.write().await;
        ensure_no_pending(&state, &draft.cpf, Some(id))?;

        let order = find_mut(&mut state, id)?;
        order.ensure_pending()?;
        order.apply_draft(draft, Utc::now());
        let updated = order.clone();

        timer.record();
        Ok(updated)
    }

    /// Delete a pending order. Signed orders are kept forever.
    pub async fn delete(&self, id: Uuid) -> Result<ServiceOrder, DomainError> {
        let timer = StoreTimer::new("delete_order");

        let mut state = self.store.write().await;
        let index = state
            .orders
            .iter()
            .position(|o| o.id == id)
            .ok_or(DomainError::NotFound("Order"))?;
        state.orders[index].ensure_pending()?;
        let removed = state.orders.remove(index);
        record_store_sizes(&state);

        timer.record();
        Ok(removed)
    }

    /// Sign a pending order. Succeeds exactly once per order.
    pub async fn sign(&self, id: Uuid, signature: OrderSignature) -> Result<ServiceOrder, DomainError> {
        let timer = StoreTimer::new("sign_order");

        let mut state = self.store.write().await;
        let order = find_mut(&mut state, id)?;
        order.sign(signature)?;
        let signed = order.clone();
        record_store_sizes(&state);

        timer.record();
        Ok(signed)
    }

    /// Find an order by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Option<ServiceOrder> {
        let timer = StoreTimer::new("find_order_by_id");
        let result = self
            .store
            .read()
            .await
            .orders
            .iter()
            .find(|o| o.id == id)
            .cloned();
        timer.record();
        result
    }

    /// Find the order a CPF should sign or review.
    ///
    /// The pending order wins; otherwise the most recently created one.
    pub async fn find_by_cpf(&self, cpf: &str) -> Option<ServiceOrder> {
        let timer = StoreTimer::new("find_order_by_cpf");
        let state = self.store.read().await;
        let matches: Vec<&ServiceOrder> = state
            .orders
            .iter()
            .filter(|o| same_cpf(&o.cpf, cpf))
            .collect();

        let result = matches
            .iter()
            .find(|o| o.is_pending())
            .or_else(|| matches.iter().max_by_key(|o| o.created_at))
            .map(|o| (*o).clone());
        timer.record();
        result
    }

    /// List orders matching the filter, sorted by number, one page at a time.
    pub async fn list(&self, filter: &OrderFilter, page: PageRequest) -> Page<ServiceOrder> {
        let timer = StoreTimer::new("list_orders");
        let matched = filter.apply(&self.store.read().await.orders);
        timer.record();
        paginate(matched, page)
    }

    /// Order counts by status.
    pub async fn counts(&self) -> OrderCounts {
        let state = self.store.read().await;
        let pending = state.orders.iter().filter(|o| o.is_pending()).count();
        OrderCounts {
            pending,
            signed: state.orders.len() - pending,
            total: state.orders.len(),
        }
    }

    /// Most recently created orders, newest first.
    pub async fn recent(&self, limit: usize) -> Vec<ServiceOrder> {
        let state = self.store.read().await;
        let mut orders = state.orders.clone();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.number.cmp(&a.number)));
        orders.truncate(limit);
        orders
    }
}

fn find_mut(state: &mut StoreState, id: Uuid) -> Result<&mut ServiceOrder, DomainError> {
    state
        .orders
        .iter_mut()
        .find(|o| o.id == id)
        .ok_or(DomainError::NotFound("Order"))
}

fn ensure_no_pending(state: &StoreState, cpf: &str, except: Option<Uuid>) -> Result<(), DomainError> {
    let exists = state
        .orders
        .iter()
        .any(|o| o.is_pending() && Some(o.id) != except && same_cpf(&o.cpf, cpf));
    if exists {
        Err(DomainError::PendingOrderExists {
            cpf: format_cpf(cpf),
        })
    } else {
        Ok(())
    }
}
