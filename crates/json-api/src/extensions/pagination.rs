//! Pagination query parsing helpers.

use salvo::{oapi::extract::QueryParam, prelude::StatusError};

use catalog_app::domain::products::data::Pagination;

use crate::extensions::*;

pub(crate) trait PaginationExt {
    fn into_pagination(self) -> Result<Pagination, StatusError>;
}

impl PaginationExt for (QueryParam<i64, false>, QueryParam<i64, false>) {
    fn into_pagination(self) -> Result<Pagination, StatusError> {
        let (page, limit) = self;

        parse_pagination(page.into_inner(), limit.into_inner())
    }
}

fn parse_pagination(page: Option<i64>, limit: Option<i64>) -> Result<Pagination, StatusError> {
    let page = page.map(u32::try_from).transpose().or_400("invalid page")?;
    let limit = limit.map(u32::try_from).transpose().or_400("invalid limit")?;

    Pagination::from_parts(page, limit).or_400("invalid pagination")
}
