/// 系统命令默认实现
///
/// 基于 std::process 调用 pkill / taskkill / plutil
use std::path::Path;
use std::process::{Command, Output};
use super::traits::SystemCommands;
use crate::utils::{RefresherError, Result};

/// 默认的系统命令执行器
#[derive(Debug, Clone, Default)]
pub struct DefaultSystemCommands;

impl SystemCommands for DefaultSystemCommands {
    fn kill_process(&self, name: &str) -> Result<()> {
        #[cfg(target_os = "windows")]
        let output = {
            let image = format!("{}.exe", name);
            Command::new("taskkill")
                .args(["/F", "/IM", image.as_str()])
                .output()?
        };

        #[cfg(not(target_os = "windows"))]
        let output = Command::new("pkill").args(["-9", name]).output()?;

        check_output("kill", &output)
    }

    fn replace_platform_uuid(&self, record: &Path, value: &str) -> Result<()> {
        let output = Command::new("sudo")
            .arg("plutil")
            .args(["-replace", "UUID", "-string", value])
            .arg(record)
            .output()
            .map_err(|e| RefresherError::ExternalTool(format!("无法执行 plutil: {}", e)))?;

        check_output("plutil", &output).map_err(|e| match e {
            RefresherError::ExternalTool(detail) => {
                RefresherError::ExternalTool(format!("更新平台 UUID 失败: {}", detail))
            }
            other => other,
        })
    }
}

/// 检查命令退出状态，失败时带上输出内容
fn check_output(tool: &str, output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let detail = if !stderr.is_empty() {
        stderr
    } else if !stdout.is_empty() {
        stdout
    } else {
        format!("exit {}", output.status)
    };

    Err(RefresherError::ExternalTool(format!("{}: {}", tool, detail)))
}
