/// 系统操作抽象层模块
///
/// 该模块把需要外部进程参与的操作（结束进程、修改平台 UUID 记录）抽象为 trait，
/// 支持依赖注入和测试 mock。
///
/// # 架构设计
///
/// - **traits**: 定义 SystemCommands trait 接口
/// - **commands**: 基于 std::process 的默认实现
///
/// # 使用示例
///
/// ```rust,ignore
/// use cursor_refresher::system::{DefaultSystemCommands, SystemCommands};
///
/// let system = DefaultSystemCommands;
/// let _ = system.kill_process("Cursor");
/// ```
pub mod traits;
pub mod commands;

// === 导出 trait 定义 ===
pub use traits::SystemCommands;

// === 导出默认实现 ===
pub use commands::DefaultSystemCommands;
