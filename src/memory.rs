//! In-memory stores used by tests in place of Postgres.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::auth::{repo::UserStore, repo_types::User};
use crate::cart::{
    repo::CartStore,
    repo_types::{CartItem, NewCartItem},
};
use crate::store::{StoreError, StoreResult};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    cart: Mutex<Vec<CartItem>>,
    next_id: AtomicI64,
    hide_users: AtomicBool,
}

impl MemoryStore {
    /// Makes `find_by_username` miss, so only the unique constraint catches duplicates.
    pub fn hide_users_from_lookup(&self) {
        self.hide_users.store(true, Ordering::SeqCst);
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        if self.hide_users.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn create(&self, username: &str, password_hash: &str) -> StoreResult<User> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.username == username) {
            return Err(StoreError::UniqueViolation);
        }
        let user = User {
            id: self.next_id(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn list(&self, user_id: i64) -> StoreResult<Vec<CartItem>> {
        let cart = self.cart.lock().await;
        Ok(cart.iter().filter(|c| c.user_id == user_id).cloned().collect())
    }

    async fn upsert(&self, user_id: i64, item: &NewCartItem) -> StoreResult<()> {
        let mut cart = self.cart.lock().await;
        if let Some(row) = cart
            .iter_mut()
            .find(|c| c.user_id == user_id && c.product_id == item.product_id)
        {
            row.quantity = item.quantity;
            row.price = item.price;
            return Ok(());
        }
        cart.push(CartItem {
            id: self.next_id(),
            user_id,
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity,
        });
        Ok(())
    }

    async fn remove(&self, user_id: i64, product_id: &str) -> StoreResult<u64> {
        let mut cart = self.cart.lock().await;
        let before = cart.len();
        cart.retain(|c| !(c.user_id == user_id && c.product_id == product_id));
        Ok((before - cart.len()) as u64)
    }

    async fn clear(&self, user_id: i64) -> StoreResult<u64> {
        let mut cart = self.cart.lock().await;
        let before = cart.len();
        cart.retain(|c| c.user_id != user_id);
        Ok((before - cart.len()) as u64)
    }
}
