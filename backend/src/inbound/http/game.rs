//! Scratch game layout and evaluation.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Error, GameError, GameLayout, Outcome, Prize, WinRule};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Catalogue entry.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrizeDto {
    #[schema(example = "dishwasher-water-valve")]
    pub id: String,
    pub label: String,
    /// Whole US dollars.
    pub value_usd: u32,
}

impl From<&Prize> for PrizeDto {
    fn from(prize: &Prize) -> Self {
        Self {
            id: prize.id.to_string(),
            label: prize.label.clone(),
            value_usd: prize.value_usd,
        }
    }
}

/// One card; `cells` are prize ids in row-major order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CardDto {
    pub id: u8,
    pub cells: Vec<String>,
}

/// Win rule.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WinRuleDto {
    /// One prize id on at least `count` cells.
    MatchAtLeast {
        prize: Option<String>,
        count: usize,
    },
}

/// Full layout served to the game page.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GameLayoutDto {
    pub prizes: Vec<PrizeDto>,
    pub cards: Vec<CardDto>,
    pub rule: WinRuleDto,
}

impl From<&GameLayout> for GameLayoutDto {
    fn from(layout: &GameLayout) -> Self {
        let rule = match layout.rule() {
            WinRule::MatchAtLeast { prize, count } => WinRuleDto::MatchAtLeast {
                prize: prize.as_ref().map(ToString::to_string),
                count: *count,
            },
        };
        Self {
            prizes: layout.prizes().iter().map(PrizeDto::from).collect(),
            cards: layout
                .cards()
                .iter()
                .map(|card| CardDto {
                    id: card.id,
                    cells: card.cells.iter().map(ToString::to_string).collect(),
                })
                .collect(),
            rule,
        }
    }
}

/// Reveal state of one card.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub card_id: u8,
    /// One flag per cell, `true` once scratched.
    pub revealed: Vec<bool>,
}

/// Outcome category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Win,
    Lose,
    Incomplete,
}

/// Evaluation result; the prize fields are only present on a win.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResponse {
    pub outcome: OutcomeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prize: Option<PrizeDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_value_usd: Option<u32>,
}

impl From<Outcome> for EvaluateResponse {
    fn from(outcome: Outcome) -> Self {
        let bare = |outcome| Self {
            outcome,
            prize: None,
            matches: None,
            total_value_usd: None,
        };
        match outcome {
            Outcome::Incomplete => bare(OutcomeKind::Incomplete),
            Outcome::Lose => bare(OutcomeKind::Lose),
            Outcome::Win {
                prize,
                matches,
                total_value_usd,
            } => Self {
                outcome: OutcomeKind::Win,
                prize: Some(PrizeDto::from(&prize)),
                matches: Some(matches),
                total_value_usd: Some(total_value_usd),
            },
        }
    }
}

fn map_game_error(error: GameError) -> Error {
    match error {
        GameError::UnknownCard(_) => Error::not_found("Card not found"),
        GameError::RevealMismatch { .. } => Error::invalid_request(error.to_string())
            .with_details(json!({ "code": "reveal_mismatch" })),
        other => Error::internal(format!("invalid game layout: {other}")),
    }
}

/// The active game layout.
#[utoipa::path(
    get,
    path = "/api/game",
    responses((status = 200, description = "Layout", body = GameLayoutDto)),
    tags = ["game"],
    operation_id = "getGame"
)]
#[get("/game")]
pub async fn game_layout(state: web::Data<HttpState>) -> web::Json<GameLayoutDto> {
    web::Json(GameLayoutDto::from(state.game.as_ref()))
}

/// Evaluate a card against the win rule.
#[utoipa::path(
    post,
    path = "/api/game/evaluate",
    request_body = EvaluateRequest,
    responses(
        (status = 200, description = "Outcome", body = EvaluateResponse),
        (status = 400, description = "Reveal mask does not match the card", body = Error),
        (status = 404, description = "Card not found", body = Error)
    ),
    tags = ["game"],
    operation_id = "evaluateCard"
)]
#[post("/game/evaluate")]
pub async fn evaluate_card(
    state: web::Data<HttpState>,
    payload: web::Json<EvaluateRequest>,
) -> ApiResult<web::Json<EvaluateResponse>> {
    let outcome = state
        .game
        .evaluate(payload.card_id, &payload.revealed)
        .map_err(map_game_error)?;
    Ok(web::Json(outcome.into()))
}
