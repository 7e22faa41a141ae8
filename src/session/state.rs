use serde::Serialize;

/// 编辑会话状态
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SessionState {
    /// 空闲，可以接受新的请求
    #[default]
    Idle,
    /// 正在解析文件
    Loading,
    /// 正在导出文件
    Exporting,
    /// 上一次加载失败，等待确认
    Error { reason: String },
}

impl SessionState {
    /// 是否有进行中的文件操作
    pub fn is_busy(&self) -> bool {
        matches!(self, SessionState::Loading | SessionState::Exporting)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, SessionState::Idle)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "空闲"),
            SessionState::Loading => write!(f, "加载中"),
            SessionState::Exporting => write!(f, "导出中"),
            SessionState::Error { reason } => write!(f, "错误: {}", reason),
        }
    }
}

/// 请求的处理结果
///
/// 适配器失败不在此列，以 `Err` 返回。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// 操作已完成
    Completed,
    /// 未选择文件，什么都没有发生
    Cancelled,
    /// 会话忙或处于错误状态，请求被忽略
    Rejected,
}
