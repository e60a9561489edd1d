//! Period settlement handler

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::settlement::PeriodSettlement;
use crate::services::SettlementService;
use crate::AppState;

/// Settle the current accounting period
pub async fn settle_period(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<PeriodSettlement>> {
    let service = SettlementService::new(state.db);
    let settlement = service.settle_period().await?;
    Ok(Json(settlement))
}
