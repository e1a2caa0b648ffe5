/// 系统操作抽象层 - trait 定义
///
/// 刷新流程只通过这里的接口接触外部进程，测试中可替换为记录调用的实现。

use std::path::Path;
use crate::utils::Result;

/// 外部系统命令 trait
///
/// # 职责
/// - 结束编辑器进程
/// - 通过特权工具写入平台 UUID 记录
/// - 不负责判断文件是否存在，调用方决定是否执行
pub trait SystemCommands {
    /// 强制结束指定名称的进程
    ///
    /// # 参数
    /// * `name` - 进程名（不含扩展名）
    ///
    /// # 返回
    /// 进程不存在时也可能返回错误，调用方按"已结束"处理
    fn kill_process(&self, name: &str) -> Result<()>;

    /// 替换平台 UUID 记录中的 UUID 值
    ///
    /// # 参数
    /// * `record` - 记录文件路径
    /// * `value` - 新的 UUID 值
    fn replace_platform_uuid(&self, record: &Path, value: &str) -> Result<()>;
}

impl<T: SystemCommands + ?Sized> SystemCommands for &T {
    fn kill_process(&self, name: &str) -> Result<()> {
        (**self).kill_process(name)
    }

    fn replace_platform_uuid(&self, record: &Path, value: &str) -> Result<()> {
        (**self).replace_platform_uuid(record, value)
    }
}
