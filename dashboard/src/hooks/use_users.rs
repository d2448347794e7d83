use payloads::requests::{CreateUser, ListUsers, UpdateUser};
use payloads::{Page, User, UserId};

use crate::hooks::MutationState;
use crate::{AppContext, QueryError, QueryKey};

/// Cache resource every user list is stored under.
pub const USERS: &str = "users";

pub fn users_key(params: &ListUsers) -> QueryKey {
    QueryKey::new(USERS, params)
}

/// What a users view renders from.
#[derive(Debug, Default)]
pub struct UsersHookReturn {
    pub users: Vec<User>,
    pub total: u64,
    /// Loading with nothing cached yet.
    pub is_loading: bool,
    pub error: Option<QueryError>,
    pub is_creating: bool,
    pub is_updating: bool,
    pub is_deleting: bool,
}

/// The user list for one set of parameters, plus the user writes.
#[derive(Clone)]
pub struct UsersHook {
    ctx: AppContext,
    params: ListUsers,
    key: QueryKey,
    creating: MutationState,
    updating: MutationState,
    deleting: MutationState,
}

pub fn use_users(ctx: &AppContext, params: ListUsers) -> UsersHook {
    UsersHook {
        ctx: ctx.clone(),
        key: users_key(&params),
        params,
        creating: MutationState::default(),
        updating: MutationState::default(),
        deleting: MutationState::default(),
    }
}

impl UsersHook {
    pub fn params(&self) -> &ListUsers {
        &self.params
    }

    /// Read the list, from cache when fresh.
    pub async fn load(&self) -> UsersHookReturn {
        let client = self.ctx.client.clone();
        let params = self.params.clone();
        let result = self
            .ctx
            .queries
            .fetch(self.key.clone(), move || async move {
                client.list_users(&params).await
            })
            .await;
        self.settled(result)
    }

    /// Read the list again regardless of freshness.
    pub async fn refetch(&self) -> UsersHookReturn {
        let client = self.ctx.client.clone();
        let params = self.params.clone();
        let result = self
            .ctx
            .queries
            .refetch(self.key.clone(), move || async move {
                client.list_users(&params).await
            })
            .await;
        self.settled(result)
    }

    /// Current state without touching the network.
    pub fn snapshot(&self) -> UsersHookReturn {
        let state = self.ctx.queries.state::<Page<User>>(&self.key);
        let (users, total) = state
            .data
            .as_deref()
            .map(|page| (page.data.clone(), page.total))
            .unwrap_or_default();
        UsersHookReturn {
            users,
            total,
            is_loading: state.is_initial_loading(),
            error: state.error,
            is_creating: self.creating.is_pending(),
            is_updating: self.updating.is_pending(),
            is_deleting: self.deleting.is_pending(),
        }
    }

    fn settled(
        &self,
        result: Result<std::sync::Arc<Page<User>>, QueryError>,
    ) -> UsersHookReturn {
        let mut view = self.snapshot();
        match result {
            Ok(page) => {
                view.users = page.data.clone();
                view.total = page.total;
                view.error = None;
            }
            Err(e) => view.error = Some(e),
        }
        view
    }

    pub async fn create_user(
        &self,
        details: &CreateUser,
    ) -> Result<User, QueryError> {
        let user =
            self.creating.run(self.ctx.client.create_user(details)).await?;
        tracing::info!(user_id = %user.id, "created user");
        self.ctx.queries.invalidate(USERS);
        Ok(user)
    }

    pub async fn update_user(
        &self,
        user_id: &UserId,
        details: &UpdateUser,
    ) -> Result<User, QueryError> {
        let user = self
            .updating
            .run(self.ctx.client.update_user(user_id, details))
            .await?;
        tracing::info!(%user_id, "updated user");
        self.ctx.queries.invalidate(USERS);
        Ok(user)
    }

    pub async fn delete_user(&self, user_id: &UserId) -> Result<(), QueryError> {
        self.deleting.run(self.ctx.client.delete_user(user_id)).await?;
        tracing::info!(%user_id, "deleted user");
        self.ctx.queries.invalidate(USERS);
        Ok(())
    }

    pub fn create_error(&self) -> Option<QueryError> {
        self.creating.error()
    }
}
