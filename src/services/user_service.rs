use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use sea_orm::sea_query::{Expr, Func};

use crate::{
    auth::Identity,
    db::OrmConn,
    entity::{Users, users},
    error::AppResult,
    models::User,
};

pub async fn get_user_by_id(orm: &OrmConn, id: i32) -> AppResult<Option<User>> {
    let user = Users::find_by_id(id).one(orm).await?;
    Ok(user.map(User::from_entity))
}

pub async fn get_user_by_email(orm: &OrmConn, email: &str) -> AppResult<Option<User>> {
    let user = Users::find()
        .filter(users::Column::Email.eq(email))
        .one(orm)
        .await?;
    Ok(user.map(User::from_entity))
}

pub async fn get_users_by_role(orm: &OrmConn, role: &str) -> AppResult<Vec<User>> {
    let users = Users::find()
        .filter(users::Column::Role.eq(role))
        .order_by_asc(users::Column::Name)
        .all(orm)
        .await?;
    Ok(users.into_iter().map(User::from_entity).collect())
}

pub async fn search_users(orm: &OrmConn, query: &str) -> AppResult<Vec<User>> {
    let pattern = format!("%{}%", query.to_lowercase());
    let condition = Condition::any()
        .add(Expr::expr(Func::lower(Expr::col(users::Column::Name))).like(pattern.clone()))
        .add(Expr::expr(Func::lower(Expr::col(users::Column::Email))).like(pattern));
    let users = Users::find()
        .filter(condition)
        .order_by_asc(users::Column::Name)
        .all(orm)
        .await?;
    Ok(users.into_iter().map(User::from_entity).collect())
}

pub async fn get_current_user(orm: &OrmConn, identity: &Identity) -> AppResult<Option<User>> {
    get_user_by_id(orm, identity.user_id).await
}
