//! 编辑会话
//!
//! 持有唯一的资源模型，负责选择适配器并异步执行加载与导出。
//! 同一时刻只允许一个文件操作；模型锁只在同步片段中持有，不跨越 await。

mod state;

pub use state::{RequestOutcome, SessionState};

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::format::{AdapterSet, FileFormat};
use crate::model::{Content, Project, ProjectStats, ResourceModel};
use crate::utils::{EditorError, Result};

#[derive(Debug, Default)]
struct Inner {
    state: SessionState,
    model: ResourceModel,
}

/// 编辑会话句柄
///
/// 克隆得到的句柄共享同一个会话。
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    inner: Arc<Mutex<Inner>>,
    adapters: AdapterSet,
}

impl EditSession {
    /// 使用默认适配器创建空会话
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用指定的适配器创建空会话
    pub fn with_adapters(adapters: AdapterSet) -> Self {
        Self {
            inner: Arc::default(),
            adapters,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock(&self.inner)
    }

    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    /// 确认错误，回到空闲状态；不在错误状态时返回 false
    pub fn acknowledge_error(&self) -> bool {
        let mut inner = self.lock();
        if let SessionState::Error { .. } = inner.state {
            inner.state = SessionState::Idle;
            true
        } else {
            false
        }
    }

    /// 进入忙碌状态；不在空闲状态时拒绝
    fn begin(&self, next: SessionState) -> Option<MutexGuard<'_, Inner>> {
        let mut inner = self.lock();
        if !inner.state.is_idle() {
            debug!("会话处于 {} 状态，忽略请求", inner.state);
            return None;
        }
        inner.state = next;
        Some(inner)
    }

    /// 请求加载文件
    ///
    /// # 参数
    /// * `format` - 用户选择的格式
    /// * `path` - 选择的文件，`None` 表示取消了选择
    ///
    /// # 返回
    /// 成功时模型被整体替换；失败时模型不变，会话进入错误状态并返回错误
    pub async fn request_load(
        &self,
        format: FileFormat,
        path: Option<PathBuf>,
    ) -> Result<RequestOutcome> {
        let path = match path {
            Some(path) => path,
            None => return Ok(RequestOutcome::Cancelled),
        };
        if self.begin(SessionState::Loading).is_none() {
            return Ok(RequestOutcome::Rejected);
        }

        info!("加载 {:?}（{}）", path, format);
        let adapter = self.adapters.for_format(format);
        let finish = Finish::new(&self.inner);
        // 结果在后台任务中写回会话，调用方放弃等待也不会让会话停在加载状态
        run_blocking(
            move || {
                let result = adapter.parse(&path);
                let mut inner = finish.lock();
                match result {
                    Ok(project) => {
                        inner.model.load(project);
                        inner.state = SessionState::Idle;
                        Ok(RequestOutcome::Completed)
                    }
                    Err(e) => {
                        warn!("加载失败: {}", e);
                        inner.state = SessionState::Error {
                            reason: e.to_string(),
                        };
                        Err(e)
                    }
                }
            },
            |reason| EditorError::parse(reason),
        )
        .await
    }

    /// 请求导出当前项目
    ///
    /// 导出的是请求时刻的项目快照；之前的编辑与提交都可见。
    /// 无论成功失败都回到空闲状态，模型不会被修改。
    pub async fn request_export(
        &self,
        format: FileFormat,
        path: Option<PathBuf>,
    ) -> Result<RequestOutcome> {
        let path = match path {
            Some(path) => path,
            None => return Ok(RequestOutcome::Cancelled),
        };
        let snapshot = match self.begin(SessionState::Exporting) {
            Some(inner) => inner.model.project().clone(),
            None => return Ok(RequestOutcome::Rejected),
        };

        info!("导出到 {:?}（{}）", path, format);
        let adapter = self.adapters.for_format(format);
        let finish = Finish::new(&self.inner);
        run_blocking(
            move || {
                let result = adapter.export(&snapshot, &path);
                finish.lock().state = SessionState::Idle;
                match result {
                    Ok(()) => Ok(RequestOutcome::Completed),
                    Err(e) => {
                        warn!("导出失败: {}", e);
                        Err(e)
                    }
                }
            },
            |reason| EditorError::export(reason),
        )
        .await
    }

    /// 获取条目内容（副本）
    pub fn get_content(&self, category: &str, key: &str) -> Result<Content> {
        self.lock().model.get_content(category, key).cloned()
    }

    pub fn set_edited(&self, category: &str, key: &str, text: impl Into<String>) {
        self.lock().model.set_edited(category, key, text);
    }

    pub fn revert(&self, category: &str, key: &str) -> Result<()> {
        self.lock().model.revert(category, key)
    }

    /// 提交全部编辑，返回基线发生变化的条目数
    pub fn commit(&self) -> usize {
        self.lock().model.commit()
    }

    pub fn reset(&self) {
        self.lock().model.reset();
    }

    /// 当前项目的副本
    pub fn snapshot(&self) -> Project {
        self.lock().model.project().clone()
    }

    /// 在持有锁的情况下读取模型
    ///
    /// 闭包内不要调用本会话的其他方法。
    pub fn with_model<R>(&self, f: impl FnOnce(&ResourceModel) -> R) -> R {
        f(&self.lock().model)
    }

    pub fn stats(&self) -> ProjectStats {
        self.lock().model.stats()
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 后台文件操作持有的会话引用
///
/// 被丢弃时会话仍处于忙碌状态（适配器 panic），转入错误状态。
struct Finish {
    inner: Arc<Mutex<Inner>>,
}

impl Finish {
    fn new(inner: &Arc<Mutex<Inner>>) -> Self {
        Self {
            inner: Arc::clone(inner),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock(&self.inner)
    }
}

impl Drop for Finish {
    fn drop(&mut self) {
        let mut inner = self.lock();
        if inner.state.is_busy() {
            inner.state = SessionState::Error {
                reason: "后台任务异常结束".to_string(),
            };
        }
    }
}

/// 在阻塞线程池中运行适配器调用
async fn run_blocking<T, F>(task: F, to_error: fn(String) -> EditorError) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(task).await {
        Ok(result) => result,
        Err(e) => Err(to_error(format!("后台任务异常结束: {}", e))),
    }
}

/// 供测试注入的适配器
#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;
    use std::sync::mpsc::{channel, Receiver, Sender};
    use std::sync::Mutex;

    use crate::format::{FileFormat, FormatAdapter};
    use crate::model::Project;
    use crate::utils::Result;

    /// 在收到放行信号前阻塞的适配器
    pub struct GatedAdapter {
        inner: Box<dyn FormatAdapter>,
        gate: Mutex<Receiver<()>>,
    }

    impl GatedAdapter {
        pub fn new(inner: Box<dyn FormatAdapter>) -> (Self, Sender<()>) {
            let (sender, receiver) = channel();
            let adapter = Self {
                inner,
                gate: Mutex::new(receiver),
            };
            (adapter, sender)
        }

        fn wait(&self) {
            if let Ok(gate) = self.gate.lock() {
                let _ = gate.recv();
            }
        }
    }

    impl FormatAdapter for GatedAdapter {
        fn parse(&self, path: &Path) -> Result<Project> {
            self.wait();
            self.inner.parse(path)
        }

        fn export(&self, project: &Project, path: &Path) -> Result<()> {
            self.wait();
            self.inner.export(project, path)
        }

        fn format(&self) -> FileFormat {
            self.inner.format()
        }
    }
}
