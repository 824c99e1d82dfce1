//! User selectors.

use super::{Counts, count_by, filter_by, find_by_id, search};
use crate::filter::Filter;
use crate::model::User;
use crate::types::Role;

pub fn user_by_id<'a>(users: &'a [User], id: &str) -> Option<&'a User> {
    find_by_id(users, id)
}

pub fn users_by_role<'a>(
    users: impl IntoIterator<Item = &'a User>,
    role: &Filter<Role>,
) -> Vec<&'a User> {
    filter_by(users, role, |u| u.role.as_ref())
}

pub fn active_users<'a>(users: impl IntoIterator<Item = &'a User>) -> Vec<&'a User> {
    users.into_iter().filter(|u| u.is_active).collect()
}

pub fn user_role_counts<'a>(users: impl IntoIterator<Item = &'a User>) -> Counts<Role> {
    count_by(users, |u| u.role)
}

fn user_search_fields(user: &User) -> [Option<&str>; 2] {
    [user.name.as_deref(), user.email.as_deref()]
}

pub fn search_users<'a>(users: impl IntoIterator<Item = &'a User>, query: &str) -> Vec<&'a User> {
    search(users, query, user_search_fields)
}
