/// 标识符刷新模块
///
/// 结束编辑器进程，替换 storage.json 中的四个遥测标识符，
/// 并按需更新设备 ID 文件、平台 UUID 记录和 main.js。
pub mod generator;
pub mod patcher;
pub mod report;
pub mod storage;

use crate::config::SystemPaths;
use crate::system::{DefaultSystemCommands, SystemCommands};
use crate::utils::{create_backup, Result};

pub use report::RefreshReport;
pub use storage::{StorageDocument, REQUIRED_FIELDS};

/// 四个遥测标识符
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierSet {
    pub mac_machine_id: String,
    pub machine_id: String,
    pub dev_device_id: String,
    pub sqm_id: String,
}

impl IdentifierSet {
    /// 按 storage.json 键名列出
    pub fn entries(&self) -> [(&'static str, &str); 4] {
        [
            (storage::MAC_MACHINE_ID_KEY, self.mac_machine_id.as_str()),
            (storage::MACHINE_ID_KEY, self.machine_id.as_str()),
            (storage::DEV_DEVICE_ID_KEY, self.dev_device_id.as_str()),
            (storage::SQM_ID_KEY, self.sqm_id.as_str()),
        ]
    }
}

impl std::fmt::Display for IdentifierSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (key, value) in self.entries() {
            writeln!(f, "{}: {}", key, value)?;
        }
        Ok(())
    }
}

/// 标识符生成策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdStrategy {
    /// 每个字段独立随机
    #[default]
    Random,
    /// 由一个随机种子经 MD5 / SHA-256 派生
    HashDerived,
}

impl IdStrategy {
    pub fn generate(self) -> IdentifierSet {
        match self {
            IdStrategy::Random => generator::random(),
            IdStrategy::HashDerived => generator::hash_derived(),
        }
    }
}

/// 刷新选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOptions {
    pub strategy: IdStrategy,
    /// 先结束编辑器进程
    pub kill_process: bool,
    /// 改写 main.js
    pub patch_main_js: bool,
    /// 写入前备份 storage.json
    pub backup: bool,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            strategy: IdStrategy::Random,
            kill_process: true,
            patch_main_js: true,
            backup: false,
        }
    }
}

/// 系统标识符管理器
pub struct SystemIdentifierManager<S: SystemCommands = DefaultSystemCommands> {
    paths: SystemPaths,
    options: RefreshOptions,
    system: S,
}

impl SystemIdentifierManager<DefaultSystemCommands> {
    /// 使用默认系统命令创建
    pub fn new(paths: SystemPaths, options: RefreshOptions) -> Self {
        Self::with_system(paths, options, DefaultSystemCommands)
    }
}

impl<S: SystemCommands> SystemIdentifierManager<S> {
    /// 注入自定义系统命令实现（测试用）
    pub fn with_system(paths: SystemPaths, options: RefreshOptions, system: S) -> Self {
        Self {
            paths,
            options,
            system,
        }
    }

    pub fn paths(&self) -> &SystemPaths {
        &self.paths
    }

    /// 读取当前标识符（不做任何修改）
    pub fn current_identifiers(&self) -> Result<IdentifierSet> {
        Ok(StorageDocument::load(&self.paths.storage)?.identifiers())
    }

    /// 执行完整的刷新流程
    ///
    /// storage.json 缺失、格式错误或缺少必需字段时，不会写入任何文件。
    pub fn refresh(&self) -> Result<RefreshReport> {
        if self.options.kill_process {
            self.kill_editor();
        }

        let mut document = StorageDocument::load(&self.paths.storage)?;
        let mut report = RefreshReport::default();

        if self.options.patch_main_js {
            match patcher::patch_file(&self.paths.main_js)? {
                Some(outcome) => {
                    if outcome.patched.is_empty() {
                        tracing::info!(path = %self.paths.main_js.display(), "main.js pattern not found, left unchanged");
                    }
                    report.patched_methods = outcome.patched;
                }
                None => {
                    tracing::debug!(path = %self.paths.main_js.display(), "main.js not found, skipping patch");
                }
            }
        }

        let ids = self.options.strategy.generate();

        report.device_id_written = self.write_device_id(&ids.dev_device_id)?;
        report.platform_uuid_updated = self.update_platform_uuid(&ids.mac_machine_id)?;

        if self.options.backup {
            let backup = create_backup(document.path())?;
            tracing::info!(path = %backup.display(), "storage backup created");
            report.backup = Some(backup);
        }

        document.apply(&ids);
        document.save()?;
        tracing::info!(path = %document.path().display(), "identifiers refreshed");

        report.identifiers = Some(ids);
        Ok(report)
    }

    /// 结束编辑器进程，失败视为进程已不存在
    fn kill_editor(&self) {
        match self.system.kill_process(&self.paths.process_name) {
            Ok(()) => tracing::info!(process = %self.paths.process_name, "editor process terminated"),
            Err(e) => tracing::debug!(process = %self.paths.process_name, error = %e, "kill ignored"),
        }
    }

    /// 设备 ID 文件存在时覆盖
    fn write_device_id(&self, device_id: &str) -> Result<bool> {
        let path = &self.paths.device_id;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "device id file not found, skipping");
            return Ok(false);
        }

        std::fs::write(path, device_id)?;
        Ok(true)
    }

    /// 平台 UUID 记录存在时更新
    fn update_platform_uuid(&self, value: &str) -> Result<bool> {
        let record = match self.paths.platform_uuid.as_deref() {
            Some(record) if record.exists() => record,
            _ => {
                tracing::debug!("platform uuid record not present, skipping");
                return Ok(false);
            }
        };

        self.system.replace_platform_uuid(record, value)?;
        Ok(true)
    }
}
