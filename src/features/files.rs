//! 文件管理
//!
//! 上传、列表、编辑、删除文件。上传前在本地检查文件大小上限。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{Collection, PendingDelete, RegionState, take_confirmed};
use crate::client::{ApiClient, ClientError, DEFAULT_PAGE, guess_content_type};
use crate::config::AppConfig;
use crate::models::{FileRecord, FileUpload, UpdateFileRequest};
use crate::ui::modal::{EditFileField, ModalKind};
use crate::ui::{FieldKind, FormField, FormState, ModalId, Ui};
use crate::utils::formatting::{format_short_code, short_url};
use crate::utils::helpers::{FilterType, parse_short_codes};
use crate::utils::time_parser::TimeParser;
use crate::utils::validation::{ValidationErrors, validate_file_size, validate_short_codes};

pub const LOAD_FILES_ERROR: &str = "Failed to load files";

/// 上传表单字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileField {
    FilePath,
    ShortCodes,
    Title,
    Description,
    Password,
    IsPublic,
    Analytics,
}

impl FormField for FileField {
    const ALL: &'static [Self] = &[
        Self::FilePath,
        Self::ShortCodes,
        Self::Title,
        Self::Description,
        Self::Password,
        Self::IsPublic,
        Self::Analytics,
    ];

    fn field_name(&self) -> &'static str {
        match self {
            Self::FilePath => "file",
            Self::ShortCodes => "short_codes",
            Self::Title => "title",
            Self::Description => "description",
            Self::Password => "password",
            Self::IsPublic => "is_public",
            Self::Analytics => "analytics",
        }
    }

    fn display_title(&self) -> &'static str {
        match self {
            Self::FilePath => "File Path",
            Self::ShortCodes => "Short Codes (optional, comma separated)",
            Self::Title => "Title (optional)",
            Self::Description => "Description (optional)",
            Self::Password => "Password (optional)",
            Self::IsPublic => "Public Access",
            Self::Analytics => "Enable Analytics",
        }
    }

    fn kind(&self) -> FieldKind {
        match self {
            Self::Password => FieldKind::Secret,
            Self::IsPublic | Self::Analytics => FieldKind::Toggle,
            _ => FieldKind::Text,
        }
    }

    fn default_flag(&self) -> bool {
        matches!(self, Self::IsPublic | Self::Analytics)
    }
}

pub struct FilesManager {
    api: Arc<ApiClient>,
    files: Collection<FileRecord>,
    pub form: FormState<FileField>,
    file_prefix: String,
    page_size: u32,
    max_upload_mb: u64,
    pending_delete: Option<PendingDelete>,
}

impl FilesManager {
    pub fn new(api: Arc<ApiClient>, config: &AppConfig) -> Self {
        Self {
            api,
            files: Collection::new(),
            form: FormState::new(),
            file_prefix: config.api.file_prefix.clone(),
            page_size: config.ui.page_size,
            max_upload_mb: config.ui.max_upload_mb,
            pending_delete: None,
        }
    }

    pub fn files(&self) -> &Collection<FileRecord> {
        &self.files
    }

    pub fn files_mut(&mut self) -> &mut Collection<FileRecord> {
        &mut self.files
    }

    pub fn state(&self) -> &RegionState {
        self.files.state()
    }

    pub fn max_upload_mb(&self) -> u64 {
        self.max_upload_mb
    }

    // ============ 加载 ============

    pub fn begin_load(&mut self) {
        self.files.set_loading();
    }

    pub async fn fetch(&self) -> Result<Vec<FileRecord>, ClientError> {
        self.api.list_files(DEFAULT_PAGE, self.page_size).await
    }

    pub fn apply(&mut self, result: Result<Vec<FileRecord>, ClientError>, ui: &mut Ui) -> bool {
        match result {
            Ok(files) => {
                debug!("loaded {} files", files.len());
                self.files.replace(files);
                true
            }
            Err(e) => {
                warn!("{}: {}", LOAD_FILES_ERROR, e);
                self.files.fail(LOAD_FILES_ERROR);
                ui.messages.show_api_error(&e);
                false
            }
        }
    }

    pub async fn load_files(&mut self, ui: &mut Ui) -> bool {
        self.begin_load();
        let result = self.fetch().await;
        self.apply(result, ui)
    }

    // ============ 上传 ============

    /// 校验上传表单，返回待读取的文件路径
    pub async fn validate_form(&self) -> Result<PathBuf, ValidationErrors> {
        let form = &self.form;
        let mut errors = ValidationErrors::new();

        let path = form.optional(FileField::FilePath).map(PathBuf::from);
        let size = match &path {
            Some(path) => tokio::fs::metadata(path)
                .await
                .ok()
                .filter(|m| m.is_file())
                .map(|m| m.len()),
            None => None,
        };
        errors
            .check("file", validate_file_size(size, self.max_upload_mb))
            .check("short_codes", validate_short_codes(form.value(FileField::ShortCodes)));
        errors.into_result()?;

        // size 为 Some 时 path 必然存在
        Ok(path.unwrap_or_default())
    }

    fn build_upload(&self, path: &Path, bytes: Vec<u8>) -> FileUpload {
        let form = &self.form;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        FileUpload {
            file_name,
            content_type: guess_content_type(path).to_string(),
            bytes,
            title: form.optional(FileField::Title),
            description: form.optional(FileField::Description),
            short_codes: parse_short_codes(form.value(FileField::ShortCodes)),
            analytics: form.flag(FileField::Analytics),
            is_public: form.flag(FileField::IsPublic),
            password: form.optional(FileField::Password),
        }
    }

    /// 提交上传表单，期间显示不自动消失的加载提示
    pub async fn handle_upload_file(&mut self, ui: &mut Ui) -> bool {
        let path = match self.validate_form().await {
            Ok(path) => path,
            Err(errors) => {
                self.form.apply_errors(&errors);
                ui.messages.show_validation_errors(&errors);
                return false;
            }
        };
        self.form.clear_errors();

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("failed to read {}: {}", path.display(), e);
                ui.messages.show_api_error(&ClientError::from(e));
                return false;
            }
        };
        let upload = self.build_upload(&path, bytes);

        let loading = ui.messages.show_loading("Uploading file...");
        let result = self.api.upload_file(&upload).await;
        ui.messages.dismiss_loading(loading);

        match result {
            Ok(file) => {
                info!("uploaded {} as {}", upload.file_name, file.id);
                ui.messages.success("File uploaded successfully!");
                self.form.clear();
                self.load_files(ui).await;
                true
            }
            Err(e) => {
                ui.messages.show_api_error(&e);
                false
            }
        }
    }

    // ============ 编辑 ============

    pub async fn edit_file(&mut self, id: &str, ui: &mut Ui) -> Option<ModalId> {
        match self.api.get_file(id).await {
            Ok(file) => Some(ui.modals.show_edit_file(&file)),
            Err(e) => {
                ui.messages.show_api_error(&e);
                None
            }
        }
    }

    pub async fn save_file_edit(&mut self, modal_id: ModalId, ui: &mut Ui) -> bool {
        let (record_id, request) = {
            let Some(modal) = ui.modals.get_mut(modal_id) else {
                return false;
            };
            let ModalKind::EditFile(dialog) = &mut modal.kind else {
                return false;
            };
            match update_request(&dialog.form) {
                Ok(request) => {
                    dialog.form.clear_errors();
                    dialog.error = None;
                    dialog.saving = true;
                    (dialog.record_id.clone(), request)
                }
                Err(errors) => {
                    dialog.form.apply_errors(&errors);
                    dialog.error = Some(errors.to_string());
                    return false;
                }
            }
        };

        match self.api.update_file(&record_id, &request).await {
            Ok(()) => {
                ui.modals.close(modal_id);
                ui.messages.success("File updated successfully!");
                self.load_files(ui).await;
                true
            }
            Err(e) => {
                if let Some(modal) = ui.modals.get_mut(modal_id)
                    && let ModalKind::EditFile(dialog) = &mut modal.kind
                {
                    dialog.saving = false;
                    dialog.error = Some(e.to_string());
                }
                false
            }
        }
    }

    // ============ 删除 ============

    pub fn request_delete(&mut self, id: &str, ui: &mut Ui) {
        let confirmation = ui.modals.confirm(
            "Delete File",
            "Are you sure you want to delete this file? This action cannot be undone.",
        );
        self.pending_delete = Some(PendingDelete::new(id, confirmation));
    }

    pub fn pending_delete(&self) -> Option<&PendingDelete> {
        self.pending_delete.as_ref()
    }

    pub fn take_confirmed_delete(&mut self) -> Option<String> {
        take_confirmed(&mut self.pending_delete)
    }

    pub async fn delete_file(&mut self, id: &str, ui: &mut Ui) -> bool {
        match self.api.delete_file(id).await {
            Ok(()) => {
                info!("deleted file {}", id);
                ui.messages.success("File deleted successfully");
                self.load_files(ui).await;
                true
            }
            Err(e) => {
                ui.messages.show_api_error(&e);
                false
            }
        }
    }

    // ============ 视图 ============

    pub fn filter_files(&mut self, query: &str, filter: FilterType) {
        self.files.apply(query, filter);
    }

    pub fn short_url_for(&self, file: &FileRecord) -> String {
        short_url(
            self.api.base_url(),
            &self.file_prefix,
            format_short_code(&file.short_codes),
        )
    }

    pub fn copy_url(&self, id: &str, ui: &mut Ui) -> bool {
        match self.files.get(id) {
            Some(file) => {
                let url = self.short_url_for(file);
                ui.copy_text(&url)
            }
            None => false,
        }
    }

    pub fn count_text(&self) -> String {
        self.files.count_text("file")
    }

    pub fn clear(&mut self) {
        self.files.clear();
        self.form.clear();
        self.pending_delete = None;
    }
}

fn update_request(form: &FormState<EditFileField>) -> Result<UpdateFileRequest, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let expires_at = match form.optional(EditFileField::ExpiresAt) {
        Some(input) => match TimeParser::parse_expire_time(&input) {
            Ok(t) => Some(t),
            Err(e) => {
                errors.check("expires_at", Err(e));
                None
            }
        },
        None => None,
    };
    errors.into_result()?;

    Ok(UpdateFileRequest {
        title: form.optional(EditFileField::Title),
        description: form.optional(EditFileField::Description),
        analytics: form.flag(EditFileField::Analytics),
        is_public: form.flag(EditFileField::IsPublic),
        password: None,
        expires_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_defaults() {
        let form = FormState::<FileField>::new();
        assert!(form.flag(FileField::IsPublic));
        assert!(form.flag(FileField::Analytics));
        assert_eq!(FileField::Password.kind(), FieldKind::Secret);
    }

    #[test]
    fn test_update_request_toggles() {
        let mut form = FormState::<EditFileField>::new();
        form.set_value(EditFileField::Title, "  Q3 report ");
        form.set_flag(EditFileField::IsPublic, false);
        let req = update_request(&form).unwrap();
        assert_eq!(req.title.as_deref(), Some("Q3 report"));
        assert!(!req.is_public);
        assert_eq!(req.expires_at, None);
    }
}
