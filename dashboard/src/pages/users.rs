use payloads::requests::{CreateUser, ListUsers};
use payloads::{Role, User, UserId};

use super::{BadgeVariant, ListNotices, ListView};
use crate::hooks::{UsersHook, UsersHookReturn, use_users};
use crate::utils::format_date;
use crate::{AppContext, QueryError};

const NOTICES: ListNotices = ListNotices {
    failed: "Failed to load users. Please try again later.",
    loading: "Loading users...",
    empty: "No users found",
};

pub fn role_badge(role: Role) -> BadgeVariant {
    match role {
        Role::Admin => BadgeVariant::Destructive,
        Role::Moderator => BadgeVariant::Default,
        Role::User => BadgeVariant::Secondary,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub badge: BadgeVariant,
    /// Formatted creation date, empty when the record has none.
    pub created: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            badge: role_badge(user.role),
            created: user
                .created_at
                .as_deref()
                .map(format_date)
                .unwrap_or_default(),
        }
    }
}

/// Fields of the add-user dialog. Submitted as entered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewUserForm {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&NewUserForm> for CreateUser {
    fn from(form: &NewUserForm) -> Self {
        CreateUser {
            name: form.name.clone(),
            email: form.email.clone(),
            role: form.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UsersView {
    pub search: String,
    pub list: ListView<UserRow>,
    pub dialog_open: bool,
    /// Dialog inputs are disabled while a create is running.
    pub is_creating: bool,
}

/// Searchable user table with an add-user dialog.
pub struct UsersPage {
    ctx: AppContext,
    search: String,
    hook: UsersHook,
    dialog_open: bool,
    form: NewUserForm,
}

impl UsersPage {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            ctx: ctx.clone(),
            hook: use_users(ctx, ListUsers::default()),
            search: String::new(),
            dialog_open: false,
            form: NewUserForm::default(),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Change the search term. An empty term lists everyone.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.hook = use_users(&self.ctx, self.params());
    }

    pub fn params(&self) -> ListUsers {
        ListUsers {
            search: (!self.search.is_empty()).then(|| self.search.clone()),
            ..Default::default()
        }
    }

    pub fn open_dialog(&mut self) {
        self.dialog_open = true;
    }

    pub fn close_dialog(&mut self) {
        self.dialog_open = false;
    }

    pub fn form(&self) -> &NewUserForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut NewUserForm {
        &mut self.form
    }

    /// Submit the dialog. On success the form is reset and the dialog
    /// closed; on failure both are left as they were.
    pub async fn add_user(&mut self) -> Result<User, QueryError> {
        let details = CreateUser::from(&self.form);
        let user = self.hook.create_user(&details).await?;
        self.form = NewUserForm::default();
        self.dialog_open = false;
        Ok(user)
    }

    pub async fn render(&self) -> UsersView {
        let state = self.hook.load().await;
        self.view(state)
    }

    pub fn view(&self, state: UsersHookReturn) -> UsersView {
        let rows = state.users.iter().map(UserRow::from).collect();
        UsersView {
            search: self.search.clone(),
            list: ListView::build(
                &NOTICES,
                state.error.as_ref(),
                state.is_loading,
                rows,
            ),
            dialog_open: self.dialog_open,
            is_creating: state.is_creating,
        }
    }
}
