use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use lookout_core::{Command, Report, Target};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 计划维护请求
#[derive(Debug, Deserialize)]
pub struct MaintenanceRequest {
    pub time: String,
    pub reason: String,
}

/// 问题报告请求
#[derive(Debug, Deserialize)]
pub struct ProblemRequest {
    pub issue: String,
}

/// 观察期请求
#[derive(Debug, Deserialize)]
pub struct ObservationRequest {
    pub duration_hours: u32,
}

/// 命令响应
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub message: String,
}

/// 心跳响应
#[derive(Debug, Serialize, Deserialize)]
pub struct HeartbeatResponse {
    pub peer_id: String,
    pub received_at: String,
}

async fn run(state: &AppState, command: Command) -> Result<Json<CommandResponse>, ApiError> {
    let message = state.commands.execute(command).await?;
    Ok(Json(CommandResponse { message }))
}

/// 计划维护
pub async fn schedule_maintenance(
    State(state): State<AppState>,
    Path(site): Path<String>,
    payload: Result<Json<MaintenanceRequest>, JsonRejection>,
) -> Result<Json<CommandResponse>, ApiError> {
    let Json(req) = payload?;
    run(
        &state,
        Command::ScheduleMaintenance {
            site,
            time: req.time,
            reason: req.reason,
        },
    )
    .await
}

/// 报告问题
pub async fn report_problem(
    State(state): State<AppState>,
    Path(site): Path<String>,
    payload: Result<Json<ProblemRequest>, JsonRejection>,
) -> Result<Json<CommandResponse>, ApiError> {
    let Json(req) = payload?;
    run(&state, Command::ReportProblem { site, issue: req.issue }).await
}

/// 开始观察期
pub async fn start_observation(
    State(state): State<AppState>,
    Path(site): Path<String>,
    payload: Result<Json<ObservationRequest>, JsonRejection>,
) -> Result<Json<CommandResponse>, ApiError> {
    let Json(req) = payload?;
    run(
        &state,
        Command::StartObservation {
            site,
            duration_hours: req.duration_hours,
        },
    )
    .await
}

/// 清除全部标注
pub async fn clear_annotations(
    State(state): State<AppState>,
    Path(site): Path<String>,
) -> Result<Json<CommandResponse>, ApiError> {
    run(&state, Command::ClearAnnotations { site }).await
}

/// 目标列表
pub async fn list_targets(State(state): State<AppState>) -> Json<Vec<Target>> {
    Json(state.driver.registry().all().to_vec())
}

/// 最近一次报告
pub async fn get_status(State(state): State<AppState>) -> Result<Json<Report>, ApiError> {
    state
        .driver
        .last_report()
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No status pass has completed yet".to_string()))
}

/// 对端心跳
pub async fn heartbeat(
    State(state): State<AppState>,
    Path(peer_id): Path<String>,
) -> Result<Json<HeartbeatResponse>, ApiError> {
    let received_at = state.presence.heartbeat(&peer_id).await?;
    debug!(peer_id = %peer_id, "Heartbeat received");
    Ok(Json(HeartbeatResponse {
        peer_id,
        received_at: received_at.to_rfc3339(),
    }))
}
