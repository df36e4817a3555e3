use axum::{extract::State, Json};
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::orchestrator::{
    export_checklist, export_game_board, ChecklistExportRequest, ExportOutcome,
    GameBoardExportRequest,
};
use crate::state::AppState;

fn require_section_name(section_name: &str) -> Result<(), AppError> {
    if section_name.trim().is_empty() {
        return Err(AppError::Validation(
            "sectionName must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/v1/exports/checklist
pub async fn handle_export_checklist(
    State(state): State<AppState>,
    Json(req): Json<ChecklistExportRequest>,
) -> Result<Json<ExportOutcome>, AppError> {
    require_section_name(&req.section_name)?;
    let _busy = state
        .export_lock
        .try_lock()
        .map_err(|_| AppError::ExportInProgress)?;

    let span = tracing::info_span!("export", id = %Uuid::new_v4(), kind = "checklist");
    async {
        let service = state.docs.connect().await?;
        let outcome = export_checklist(service.as_ref(), &req).await?;
        info!("Checklist export finished: {}", outcome.document_url);
        Ok::<_, AppError>(Json(outcome))
    }
    .instrument(span)
    .await
}

/// POST /api/v1/exports/game-board
pub async fn handle_export_game_board(
    State(state): State<AppState>,
    Json(req): Json<GameBoardExportRequest>,
) -> Result<Json<ExportOutcome>, AppError> {
    require_section_name(&req.section_name)?;
    let _busy = state
        .export_lock
        .try_lock()
        .map_err(|_| AppError::ExportInProgress)?;

    let span = tracing::info_span!("export", id = %Uuid::new_v4(), kind = "game_board");
    async {
        let service = state.docs.connect().await?;
        let outcome =
            export_game_board(service.as_ref(), &req, state.config.export_limits()).await?;
        info!("Game board export finished: {}", outcome.document_url);
        Ok::<_, AppError>(Json(outcome))
    }
    .instrument(span)
    .await
}
