//! 记录与投影到 DTO 的转换
//!
//! 口令字段一律不出现在响应中。

use api_contract::{
    CameraDto, CameraHistoryDto, ChangeLogEntryDto, HistoryEntryDto, HistoryNvrDto,
    ImportResultDto, NvrDto, ProjectDto, ReassignmentEntryDto, RefDto, SkippedRowDto, UserDto,
};
use domain::ChangeLogEntry;
use vss_inventory::{CameraView, HistoryView, ImportReport, NvrView, ProjectView, RefSummary};
use vss_storage::UserRecord;

fn ref_to_dto(summary: RefSummary) -> RefDto {
    RefDto {
        id: summary.id,
        name: summary.name,
    }
}

fn refs_to_dto(summaries: Vec<RefSummary>) -> Vec<RefDto> {
    summaries.into_iter().map(ref_to_dto).collect()
}

/// UserRecord 转 UserDto
pub fn user_to_dto(record: UserRecord) -> UserDto {
    UserDto {
        id: record.user_id,
        name: record.name,
        email: record.email,
        role: record.role.as_str().to_string(),
        created_at: record.created_at_ms,
    }
}

pub fn change_to_dto(entry: ChangeLogEntry) -> ChangeLogEntryDto {
    ChangeLogEntryDto {
        actor: entry.actor,
        date: entry.date_ms,
        changes: entry.changes,
    }
}

/// CameraView 转 CameraDto
pub fn camera_to_dto(view: CameraView) -> CameraDto {
    let camera = view.camera;
    CameraDto {
        id: camera.camera_id,
        name: camera.name,
        model: camera.model,
        ip_address: camera.ip_address,
        location: camera.location,
        mac_address: camera.mac_address,
        serial_number: camera.serial_number,
        username: camera.username,
        firmware: camera.firmware,
        resolution: camera.resolution,
        fps: camera.fps,
        current_nvr: view.nvr.map(ref_to_dto),
        current_project: view.project.map(ref_to_dto),
        assigned_date: camera.assigned_date_ms,
        reassignment_history: camera
            .reassignment_history
            .into_iter()
            .map(|entry| ReassignmentEntryDto {
                nvr: entry.nvr_id,
                date: entry.date_ms,
            })
            .collect(),
        change_log: camera.change_log.into_iter().map(change_to_dto).collect(),
        created_by: view.created_by.map(ref_to_dto),
        updated_by: view.updated_by.map(ref_to_dto),
        created_at: camera.created_at_ms,
        updated_at: camera.updated_at_ms,
    }
}

/// 重分配历史，NVR 展开为名称与通道数
pub fn history_to_dto(view: HistoryView) -> CameraHistoryDto {
    CameraHistoryDto {
        message: format!("Reassignment history for camera {}", view.camera_name),
        history: view
            .entries
            .into_iter()
            .map(|item| HistoryEntryDto {
                nvr: HistoryNvrDto {
                    id: item.nvr.id,
                    name: item.nvr.name,
                    max_channels: item.max_channels,
                },
                date: item.date_ms,
            })
            .collect(),
    }
}

/// NvrView 转 NvrDto
pub fn nvr_to_dto(view: NvrView) -> NvrDto {
    let nvr = view.nvr;
    NvrDto {
        channels_occupied: nvr.channels_occupied(),
        id: nvr.nvr_id,
        name: nvr.name,
        ip_address: nvr.ip_address,
        mac_address: nvr.mac_address,
        ip_address_secondary: nvr.ip_address_secondary,
        mac_address_secondary: nvr.mac_address_secondary,
        model: nvr.model,
        max_channels: nvr.max_channels,
        capacity: nvr.capacity,
        location: nvr.location,
        branch: nvr.branch,
        platform: nvr.platform,
        username: nvr.username,
        cameras: refs_to_dto(view.cameras),
        project: view.project.map(ref_to_dto),
        created_at: nvr.created_at_ms,
        updated_at: nvr.updated_at_ms,
    }
}

/// ProjectView 转 ProjectDto
pub fn project_to_dto(view: ProjectView) -> ProjectDto {
    let project = view.project;
    ProjectDto {
        id: project.project_id,
        name: project.name,
        description: project.description,
        cameras: refs_to_dto(view.cameras),
        nvrs: refs_to_dto(view.nvrs),
        created_by: view.created_by.map(ref_to_dto),
        updated_by: view.updated_by.map(ref_to_dto),
        created_at: project.created_at_ms,
        updated_at: project.updated_at_ms,
    }
}

/// 导入报告转换；摄像头投影由调用方提前展开
pub fn import_to_dto(report: &ImportReport, cameras: Vec<CameraView>) -> ImportResultDto {
    ImportResultDto {
        imported_count: report.imported_count(),
        skipped_count: report.skipped_count(),
        cameras: cameras.into_iter().map(camera_to_dto).collect(),
        skipped: report
            .skipped
            .iter()
            .map(|row| SkippedRowDto {
                line: row.line,
                reason: row.reason.clone(),
            })
            .collect(),
    }
}
