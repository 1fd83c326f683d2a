use api_types::{Envelope, currency::CurrencyView};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Envelope<Vec<CurrencyView>>>, ServerError> {
    let currencies = state
        .engine
        .currencies()
        .await?
        .into_iter()
        .map(|currency| CurrencyView {
            id: currency.id,
            code: currency.code,
            name: currency.name,
            symbol: currency.symbol,
        })
        .collect();
    Ok(Json(Envelope::data(currencies)))
}
