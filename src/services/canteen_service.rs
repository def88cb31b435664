use sea_orm::{EntityTrait, QueryOrder};

use crate::{
    db::OrmConn,
    entity::{Canteens, canteens},
    error::AppResult,
    models::Canteen,
};

pub async fn list_canteens(orm: &OrmConn) -> AppResult<Vec<Canteen>> {
    let canteens = Canteens::find()
        .order_by_asc(canteens::Column::Name)
        .all(orm)
        .await?;
    Ok(canteens.into_iter().map(Canteen::from_entity).collect())
}

pub async fn get_canteen_by_id(orm: &OrmConn, id: i32) -> AppResult<Option<Canteen>> {
    let canteen = Canteens::find_by_id(id).one(orm).await?;
    Ok(canteen.map(Canteen::from_entity))
}
